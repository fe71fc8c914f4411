//! Plans, plan templates, plan groups and pricing.

use serde::{Deserialize, Serialize};

/// A reusable plan template (currency, standing charge, bill frequency).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanTemplate {
    /// Server-assigned ID.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Owning product.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_id: Option<String>,
    /// Display name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Unique code.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    /// ISO 4217 currency code.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
    /// Recurring standing charge.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub standing_charge: Option<f64>,
    /// Standing charge interval, in bill periods.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub standing_charge_interval: Option<i64>,
    /// Standing charge offset, in bill periods.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub standing_charge_offset: Option<i64>,
    /// Bill frequency (`MONTHLY`, `ANNUALLY`, ...).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bill_frequency: Option<String>,
    /// Bill frequency multiplier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bill_frequency_interval: Option<i64>,
    /// Display ordering.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ordinal: Option<i64>,
    /// Optimistic-locking version.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<i64>,
}

resource!(PlanTemplate, "plantemplates", code, name);

/// A group of plans billed together with a shared minimum spend.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanGroup {
    /// Server-assigned ID.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Display name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Unique code.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    /// Account the group is bespoke to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account_id: Option<String>,
    /// Recurring standing charge.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub standing_charge: Option<f64>,
    /// Minimum spend per bill.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub minimum_spend: Option<f64>,
    /// ISO 4217 currency code.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
    /// Optimistic-locking version.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<i64>,
}

resource!(PlanGroup, "plangroups", code, name);

/// Membership of a plan in a plan group.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanGroupLink {
    /// Server-assigned ID.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Linked plan.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plan_id: Option<String>,
    /// Linked plan group.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plan_group_id: Option<String>,
    /// Optimistic-locking version.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<i64>,
}

resource!(PlanGroupLink, "plangrouplinks");

/// A plan: a template instance, optionally bespoke to one account.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Plan {
    /// Server-assigned ID.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Template the plan is built from.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plan_template_id: Option<String>,
    /// Display name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Unique plan code. The daily report joins bundle mappings on it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    /// Account the plan is bespoke to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account_id: Option<String>,
    /// Recurring standing charge.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub standing_charge: Option<f64>,
    /// Display ordering.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ordinal: Option<i64>,
    /// Whether the plan is bespoke.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bespoke: Option<bool>,
    /// Minimum spend per bill.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub minimum_spend: Option<f64>,
    /// Optimistic-locking version.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<i64>,
}

resource!(Plan, "plans", code, name);

/// One tier of a pricing definition.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PricingBand {
    /// Usage at which the band starts.
    pub lower_limit: f64,
    /// Flat charge for entering the band.
    pub fixed_price: f64,
    /// Price per unit within the band.
    pub unit_price: f64,
    /// Credit type the band draws down, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub credit_type_id: Option<String>,
}

/// Pricing for one aggregation on a plan or plan template.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pricing {
    /// Server-assigned ID.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Plan the pricing belongs to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plan_id: Option<String>,
    /// Plan template the pricing belongs to (template pricing).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plan_template_id: Option<String>,
    /// Priced aggregation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aggregation_id: Option<String>,
    /// Priced compound aggregation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub compound_aggregation_id: Option<String>,
    /// Start of validity (RFC 3339).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,
    /// End of validity (RFC 3339).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
    /// Whether tiers are cumulative.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cumulative: Option<bool>,
    /// Pricing type (`DEBIT`, `PRODUCT_CREDIT`, ...).
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub pricing_type: Option<String>,
    /// Segment the pricing applies to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub segment: Option<serde_json::Value>,
    /// Minimum spend.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub minimum_spend: Option<f64>,
    /// Line item description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Whether tiers span the whole plan rather than each bill.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tiers_span_plan: Option<bool>,
    /// Price tiers.
    #[serde(default)]
    pub pricing_bands: Vec<PricingBand>,
    /// Optimistic-locking version.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<i64>,
}

resource!(Pricing, "pricings");
