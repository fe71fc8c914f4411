//! Organization-level settings, external mappings and alerts.

use serde::{Deserialize, Serialize};

/// Organization-wide billing configuration.
///
/// A singleton: fetched from `organizationconfig` without an ID, so it does
/// not implement [`Resource`](crate::Resource).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrganizationConfig {
    /// Server-assigned ID.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// IANA timezone bills are calculated in.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timezone: Option<String>,
    /// Epoch for yearly billing.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year_epoch: Option<String>,
    /// Epoch for monthly billing.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub month_epoch: Option<String>,
    /// Epoch for weekly billing.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub week_epoch: Option<String>,
    /// Epoch for daily billing.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub day_epoch: Option<String>,
    /// Default currency.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
    /// Days between bill date and due date.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub days_before_bill_due: Option<i64>,
    /// Interval between scheduled bill runs.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scheduled_bill_interval: Option<f64>,
    /// Bill standing charges in advance.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub standing_charge_bill_in_advance: Option<bool>,
    /// Bill commitment fees in advance.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub commitment_fee_bill_in_advance: Option<bool>,
    /// Bill minimum spend in advance.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub minimum_spend_bill_in_advance: Option<bool>,
    /// Optimistic-locking version.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<i64>,
}

/// Mapping of an m3ter entity to a record in an external system.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExternalMapping {
    /// Server-assigned ID.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Mapped entity type (`Account`, `Product`, ...).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub m3ter_entity: Option<String>,
    /// Mapped entity ID.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub m3ter_id: Option<String>,
    /// External system name (`NetSuite`, `Salesforce`, ...).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external_system: Option<String>,
    /// Table within the external system.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external_table: Option<String>,
    /// Record ID within the external table.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external_id: Option<String>,
    /// Optimistic-locking version.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<i64>,
}

resource!(ExternalMapping, "externalmappings");

/// A system alert raised by the platform.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Alert {
    /// Server-assigned ID.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Alert type.
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub alert_type: Option<String>,
    /// Alert status.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    /// Human-readable message.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Raise timestamp.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_date: Option<String>,
}

resource!(Alert, "alerts");
