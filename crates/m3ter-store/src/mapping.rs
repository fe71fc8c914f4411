//! Product-mapping rows.
//!
//! The mapping tables are maintained outside this crate (a CRM sync), so the
//! column names are fixed by the CRM: `Meter_Code__c`, `Internal_Code__c`,
//! `Netsuite_Product_Id__c`. Rows arrive as JSON objects keyed by column
//! name; numeric IDs are normalized to their text form.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Meter code column.
pub const METER_CODE: &str = "Meter_Code__c";

/// Internal product code column.
pub const INTERNAL_CODE: &str = "Internal_Code__c";

/// Netsuite product ID column.
pub const NETSUITE_PRODUCT_ID: &str = "Netsuite_Product_Id__c";

/// Maps a meter code to the Netsuite product it bills as.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductMapping {
    /// Meter code; rows without one never match a line item.
    pub meter_code: Option<String>,
    /// Netsuite product ID, as text.
    pub netsuite_product_id: Option<String>,
    /// Internal product code; keys the bundle cross-reference.
    pub internal_code: Option<String>,
}

impl ProductMapping {
    /// Mapping for a meter code.
    #[must_use]
    pub fn new(meter_code: impl Into<String>, netsuite_product_id: impl Into<String>) -> Self {
        Self {
            meter_code: Some(meter_code.into()),
            netsuite_product_id: Some(netsuite_product_id.into()),
            internal_code: None,
        }
    }

    /// Set the internal product code.
    #[must_use]
    pub fn with_internal_code(mut self, code: impl Into<String>) -> Self {
        self.internal_code = Some(code.into());
        self
    }

    /// Read a row keyed by column name.
    #[must_use]
    pub fn from_row(row: &Map<String, Value>) -> Self {
        Self {
            meter_code: text(row, METER_CODE),
            netsuite_product_id: text(row, NETSUITE_PRODUCT_ID),
            internal_code: text(row, INTERNAL_CODE),
        }
    }
}

/// Maps a bundle's internal code to the Netsuite product the bundle bills as.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BundleMapping {
    /// Internal code, matched against plan codes.
    pub internal_code: Option<String>,
    /// Netsuite product ID, as text.
    pub netsuite_product_id: Option<String>,
}

impl BundleMapping {
    /// Mapping for an internal code.
    #[must_use]
    pub fn new(internal_code: impl Into<String>, netsuite_product_id: impl Into<String>) -> Self {
        Self {
            internal_code: Some(internal_code.into()),
            netsuite_product_id: Some(netsuite_product_id.into()),
        }
    }

    /// Read a row keyed by column name.
    #[must_use]
    pub fn from_row(row: &Map<String, Value>) -> Self {
        Self {
            internal_code: text(row, INTERNAL_CODE),
            netsuite_product_id: text(row, NETSUITE_PRODUCT_ID),
        }
    }
}

fn text(row: &Map<String, Value>, column: &str) -> Option<String> {
    match row.get(column)? {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn row(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => unreachable!(),
        }
    }

    #[test]
    fn product_row_columns() {
        let mapping = ProductMapping::from_row(&row(json!({
            "Meter_Code__c": "checks",
            "Netsuite_Product_Id__c": "555",
            "Internal_Code__c": "CHK",
            "Name": "ignored"
        })));
        assert_eq!(mapping.meter_code.as_deref(), Some("checks"));
        assert_eq!(mapping.netsuite_product_id.as_deref(), Some("555"));
        assert_eq!(mapping.internal_code.as_deref(), Some("CHK"));
    }

    #[test]
    fn numeric_ids_become_text() {
        let mapping = ProductMapping::from_row(&row(json!({
            "Meter_Code__c": "checks",
            "Netsuite_Product_Id__c": 555
        })));
        assert_eq!(mapping.netsuite_product_id.as_deref(), Some("555"));
    }

    #[test]
    fn null_and_missing_columns_are_none() {
        let mapping = ProductMapping::from_row(&row(json!({
            "Meter_Code__c": "checks",
            "Netsuite_Product_Id__c": null
        })));
        assert_eq!(mapping.netsuite_product_id, None);
        assert_eq!(mapping.internal_code, None);
    }

    #[test]
    fn bundle_row_columns() {
        let mapping = BundleMapping::from_row(&row(json!({
            "Internal_Code__c": "BUNDLE-A",
            "Netsuite_Product_Id__c": "777"
        })));
        assert_eq!(mapping, BundleMapping::new("BUNDLE-A", "777"));
    }
}
