//! Accounts and the commercial objects attached to them.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Postal address of an account.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    /// First address line.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address_line1: Option<String>,
    /// Second address line.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address_line2: Option<String>,
    /// Third address line.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address_line3: Option<String>,
    /// Fourth address line.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address_line4: Option<String>,
    /// Town or city.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub locality: Option<String>,
    /// State, county or region.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    /// Postal code.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub post_code: Option<String>,
    /// Country.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
}

/// A customer account.
///
/// `code` holds the CRM (Salesforce) account ID. Organization-specific
/// attributes such as `subsidiaryId` live in the free-form `customFields`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    /// Server-assigned ID.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Display name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Unique account code.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    /// Billing contact email.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email_address: Option<String>,
    /// Parent account for hierarchical billing.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_account_id: Option<String>,
    /// Postal address.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<Address>,
    /// Organization-defined attributes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_fields: Option<Map<String, Value>>,
    /// Optimistic-locking version.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<i64>,
}

resource!(Account, "accounts", code, name);

impl Account {
    /// Look up a custom field; JSON `null` counts as unset.
    #[must_use]
    pub fn custom_field(&self, key: &str) -> Option<&Value> {
        self.custom_fields
            .as_ref()
            .and_then(|fields| fields.get(key))
            .filter(|value| !value.is_null())
    }
}

/// Attachment of a plan or plan group to an account for a period.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountPlan {
    /// Server-assigned ID.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Account the plan is attached to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account_id: Option<String>,
    /// Attached plan.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plan_id: Option<String>,
    /// Attached plan group.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plan_group_id: Option<String>,
    /// Contract the attachment belongs to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contract_id: Option<String>,
    /// Start of the attachment (RFC 3339).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,
    /// End of the attachment (RFC 3339).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
    /// Optimistic-locking version.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<i64>,
}

resource!(AccountPlan, "accountplans");

/// A contract grouping an account's plans and commitments.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Contract {
    /// Server-assigned ID.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Display name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Unique code.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    /// Contracted account.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account_id: Option<String>,
    /// Start date.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,
    /// End date.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
    /// Optimistic-locking version.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<i64>,
}

resource!(Contract, "contracts", code, name);

/// A prepayment or spend commitment on an account.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Commitment {
    /// Server-assigned ID.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Committed account.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account_id: Option<String>,
    /// Plan the commitment fees are billed on.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub billing_plan_id: Option<String>,
    /// Products the commitment may be drawn down by.
    #[serde(default)]
    pub product_ids: Vec<String>,
    /// Contract the commitment belongs to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contract_id: Option<String>,
    /// Start date.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,
    /// End date.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
    /// Committed amount.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<f64>,
    /// ISO 4217 currency code.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
    /// Amount paid up front.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount_pre_paid: Option<f64>,
    /// Amount billed on the first bill.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount_first_bill: Option<f64>,
    /// Billing interval in months.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub billing_interval: Option<i64>,
    /// Billing offset in months.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub billing_offset: Option<i64>,
    /// Surcharge applied to overage.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub overage_surcharge_percent: Option<f64>,
    /// Line item description for commitment fees.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub commitment_fee_description: Option<String>,
    /// Line item description for commitment usage.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub commitment_usage_description: Option<String>,
    /// Line item description for overage.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub overage_description: Option<String>,
    /// Optimistic-locking version.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<i64>,
}

resource!(Commitment, "commitments");

/// A kind of prepaid credit.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreditType {
    /// Server-assigned ID.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Unique code.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    /// Free-text description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Days until granted credit expires.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub days_to_expiry: Option<i64>,
    /// `NEWEST_FIRST` or `OLDEST_FIRST`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub consumption_order: Option<String>,
    /// Optimistic-locking version.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<i64>,
}

resource!(CreditType, "credittypes", code);

/// A credit balance granted to an account.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Credit {
    /// Server-assigned ID.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Credited account.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account_id: Option<String>,
    /// Credit type.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub credit_type_id: Option<String>,
    /// Remaining balance.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_balance: Option<f64>,
    /// Expiry timestamp (RFC 3339).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiry_time: Option<String>,
    /// Optimistic-locking version.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<i64>,
}

resource!(Credit, "credits");
