//! Flattened bill line items.

use chrono::NaiveDate;

use m3ter_core::{BandUsage, Bill, LineItem};

/// One line item with its parent bill's attributes.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LineItemRow {
    /// Parent bill ID.
    pub bill_id: Option<String>,
    /// Billed account ID.
    pub account_id: Option<String>,
    /// Billed account code (the CRM account ID).
    pub account_code: Option<String>,
    /// Bill date, `YYYY-MM-DD`.
    pub bill_date: Option<String>,
    /// When the bill was last calculated.
    pub last_calculated_date: Option<String>,
    /// Line item ID.
    pub line_item_id: Option<String>,
    /// Meter the usage was measured against.
    pub meter_id: Option<String>,
    /// Plan the usage was priced by.
    pub plan_id: Option<String>,
    /// Product the usage belongs to.
    pub product_id: Option<String>,
    /// Product display name.
    pub product_name: Option<String>,
    /// Line item description.
    pub description: Option<String>,
    /// Billed quantity.
    pub quantity: Option<f64>,
    /// Pricing-band breakdown.
    pub usage_per_pricing_band: Option<Vec<BandUsage>>,
}

impl LineItemRow {
    fn new(bill: &Bill, item: &LineItem) -> Self {
        Self {
            bill_id: bill.id.clone(),
            account_id: bill.account_id.clone(),
            account_code: bill.account_code.clone(),
            bill_date: bill.bill_date.clone(),
            last_calculated_date: bill.last_calculated_date.clone(),
            line_item_id: item.id.clone(),
            meter_id: item.meter_id.clone(),
            plan_id: item.plan_id.clone(),
            product_id: item.product_id.clone(),
            product_name: item.product_name.clone(),
            description: item.description.clone(),
            quantity: item.quantity,
            usage_per_pricing_band: item.usage_per_pricing_band.clone(),
        }
    }

    /// Human-readable identity for log and error messages.
    #[must_use]
    pub fn record(&self) -> String {
        format!(
            "bill {} line item {}",
            self.bill_id.as_deref().unwrap_or("?"),
            self.line_item_id.as_deref().unwrap_or("?")
        )
    }

    /// Calendar day of the bill date, if it parses.
    #[must_use]
    pub fn bill_day(&self) -> Option<NaiveDate> {
        let date = self.bill_date.as_deref()?;
        NaiveDate::parse_from_str(date.get(..10)?, "%Y-%m-%d").ok()
    }
}

/// One row per line item across all bills, bills in order and line items in
/// order within each bill. Bills without line items contribute nothing.
#[must_use]
pub fn flatten_bills(bills: &[Bill]) -> Vec<LineItemRow> {
    bills
        .iter()
        .flat_map(|bill| bill.line_items.iter().map(move |item| LineItemRow::new(bill, item)))
        .collect()
}

/// Keep rows whose bill date falls on `day`.
///
/// Rows with a missing or unparseable bill date are dropped.
#[must_use]
pub fn filter_bill_date(rows: Vec<LineItemRow>, day: NaiveDate) -> Vec<LineItemRow> {
    rows.into_iter()
        .filter(|row| row.bill_day() == Some(day))
        .collect()
}

/// Unit price of a line item priced by exactly one band.
///
/// # Errors
///
/// Returns the reason the row is malformed: no band breakdown, more than one
/// band, or a band without a unit price.
pub fn unit_price(row: &LineItemRow) -> std::result::Result<f64, String> {
    match row.usage_per_pricing_band.as_deref() {
        None | Some([]) => Err("no pricing band".to_string()),
        Some([band]) => band
            .unit_price
            .ok_or_else(|| "pricing band has no unit price".to_string()),
        Some(bands) => Err(format!("{} pricing bands, expected one", bands.len())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bill(id: &str, items: &[&str]) -> Bill {
        Bill {
            id: Some(id.into()),
            account_id: Some(format!("acc-{id}")),
            bill_date: Some("2024-03-14".into()),
            line_items: items
                .iter()
                .map(|item| LineItem {
                    id: Some((*item).into()),
                    quantity: Some(1.0),
                    ..LineItem::default()
                })
                .collect(),
            ..Bill::default()
        }
    }

    fn band(unit_price: Option<f64>) -> BandUsage {
        BandUsage {
            unit_price,
            band_quantity: Some(1.0),
            ..BandUsage::default()
        }
    }

    #[test]
    fn flatten_keeps_order_and_parent_attributes() {
        let rows = flatten_bills(&[bill("b-1", &["li-1", "li-2"]), bill("b-2", &["li-3"])]);

        let ids: Vec<_> = rows.iter().filter_map(|r| r.line_item_id.as_deref()).collect();
        assert_eq!(ids, ["li-1", "li-2", "li-3"]);
        assert_eq!(rows[1].bill_id.as_deref(), Some("b-1"));
        assert_eq!(rows[2].account_id.as_deref(), Some("acc-b-2"));
    }

    #[test]
    fn bill_without_line_items_contributes_nothing() {
        assert!(flatten_bills(&[bill("b-1", &[])]).is_empty());
    }

    #[test]
    fn bill_day_accepts_timestamps() {
        let row = LineItemRow {
            bill_date: Some("2024-03-14T00:00:00Z".into()),
            ..LineItemRow::default()
        };
        assert_eq!(row.bill_day(), NaiveDate::from_ymd_opt(2024, 3, 14));
    }

    #[test]
    fn filter_keeps_only_matching_day() {
        let mut rows = flatten_bills(&[bill("b-1", &["li-1"]), bill("b-2", &["li-2"])]);
        rows[1].bill_date = Some("2024-03-13".into());
        rows.push(LineItemRow::default());

        let day = NaiveDate::from_ymd_opt(2024, 3, 13).unwrap();
        let kept = filter_bill_date(rows, day);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].line_item_id.as_deref(), Some("li-2"));
    }

    #[test]
    fn unit_price_of_single_band() {
        let row = LineItemRow {
            usage_per_pricing_band: Some(vec![band(Some(0.25))]),
            ..LineItemRow::default()
        };
        assert_eq!(unit_price(&row), Ok(0.25));
    }

    #[test]
    fn unit_price_rejects_missing_and_multiple_bands() {
        let none = LineItemRow::default();
        let empty = LineItemRow {
            usage_per_pricing_band: Some(Vec::new()),
            ..LineItemRow::default()
        };
        let two = LineItemRow {
            usage_per_pricing_band: Some(vec![band(Some(1.0)), band(Some(0.5))]),
            ..LineItemRow::default()
        };
        let unpriced = LineItemRow {
            usage_per_pricing_band: Some(vec![band(None)]),
            ..LineItemRow::default()
        };

        assert!(unit_price(&none).is_err());
        assert!(unit_price(&empty).is_err());
        assert_eq!(unit_price(&two), Err("2 pricing bands, expected one".to_string()));
        assert!(unit_price(&unpriced).is_err());
    }
}
