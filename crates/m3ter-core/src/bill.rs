//! Bills, their line items, and bill jobs.

use serde::{Deserialize, Serialize};

/// Usage billed within one pricing band of a line item.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BandUsage {
    /// Usage at which the band starts.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lower_limit: Option<f64>,
    /// Price per unit within the band.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit_price: Option<f64>,
    /// Quantity billed within the band.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub band_quantity: Option<f64>,
    /// Fixed price charged for the band.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fixed_price: Option<f64>,
    /// Amount billed for the band.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub band_subtotal: Option<f64>,
}

/// One billable component of a bill.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    /// Line item ID.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Meter the usage was measured on.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meter_id: Option<String>,
    /// Plan the line item was priced under.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plan_id: Option<String>,
    /// Product the line item belongs to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_id: Option<String>,
    /// Product display name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_name: Option<String>,
    /// Aggregation the quantity came from.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aggregation_id: Option<String>,
    /// Line item type (`USAGE`, `STANDING_CHARGE`, ...).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line_item_type: Option<String>,
    /// Free-text description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Billed quantity.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quantity: Option<f64>,
    /// Line item subtotal.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtotal: Option<f64>,
    /// Per-band usage breakdown; absent on non-usage line items.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usage_per_pricing_band: Option<Vec<BandUsage>>,
}

/// A bill for one account and billing period.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bill {
    /// Server-assigned ID.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Optimistic-locking version.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<i64>,
    /// Billed account.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account_id: Option<String>,
    /// Billed account's code.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account_code: Option<String>,
    /// Period start date.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,
    /// Period end date.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
    /// Period start instant.
    #[serde(
        default,
        rename = "startDateTimeUTC",
        skip_serializing_if = "Option::is_none"
    )]
    pub start_date_time_utc: Option<String>,
    /// Period end instant.
    #[serde(
        default,
        rename = "endDateTimeUTC",
        skip_serializing_if = "Option::is_none"
    )]
    pub end_date_time_utc: Option<String>,
    /// Bill date, `YYYY-MM-DD`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bill_date: Option<String>,
    /// Due date.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<String>,
    /// Billing frequency.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub billing_frequency: Option<String>,
    /// Billing frequency multiplier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bill_frequency_interval: Option<i64>,
    /// IANA timezone the bill was calculated in.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timezone: Option<String>,
    /// ISO 4217 currency code.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
    /// Whether the bill is locked.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub locked: Option<bool>,
    /// Creation timestamp.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_date: Option<String>,
    /// Bill status (`PENDING`, `APPROVED`, ...).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    /// Bill job that produced the bill.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bill_job_id: Option<String>,
    /// Last recalculation timestamp.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_calculated_date: Option<String>,
    /// Line items, in bill order.
    #[serde(default)]
    pub line_items: Vec<LineItem>,
}

resource!(Bill, "bills");

/// A request to calculate bills for a period.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BillJob {
    /// Server-assigned ID.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Last day of the billing period to calculate.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_date_in_billing_period: Option<String>,
    /// Currency bills are converted to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_currency: Option<String>,
    /// Currency conversion rates.
    #[serde(default)]
    pub currency_conversions: Vec<serde_json::Value>,
    /// Restrict the job to these accounts; all accounts when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account_ids: Option<Vec<String>>,
    /// Billing frequency.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub billing_frequency: Option<String>,
    /// Billing frequency multiplier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bill_frequency_interval: Option<i64>,
    /// Job status.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    /// Optimistic-locking version.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<i64>,
}

resource!(BillJob, "billjobs");
