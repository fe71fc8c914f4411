//! Left joins of line-item rows against reference tables.
//!
//! Every step keeps each left row. A left row with several matching right
//! rows is repeated once per match; a left row without a match (or without
//! a key) keeps `None` in the joined columns.

use std::collections::HashMap;
use std::hash::Hash;

use serde_json::Value;

use m3ter_core::{Account, Meter, Plan};
use m3ter_store::{BundleMapping, ProductMapping};

use crate::rows::LineItemRow;

/// Account custom field holding the finance subsidiary.
pub const SUBSIDIARY_FIELD: &str = "subsidiaryId";

/// A line-item row plus the columns picked up by the joins.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct JoinedRow {
    /// The flattened line item.
    pub line: LineItemRow,
    /// Unit price from the single pricing band (daily only).
    pub unit_price: Option<f64>,
    /// Account `customFields.subsidiaryId`, as stored.
    pub subsidiary_id: Option<Value>,
    /// Meter code.
    pub meter_code: Option<String>,
    /// Plan code (daily only).
    pub plan_code: Option<String>,
    /// Netsuite product ID from the product mapping.
    pub netsuite_product_id: Option<String>,
    /// Internal product code from the product mapping.
    pub internal_code: Option<String>,
    /// Netsuite product ID of the bundle the plan belongs to.
    pub bundle_netsuite_product_id: Option<String>,
}

impl From<LineItemRow> for JoinedRow {
    fn from(line: LineItemRow) -> Self {
        Self {
            line,
            ..Self::default()
        }
    }
}

impl JoinedRow {
    /// Key into the bundle cross-reference: the product mapping's internal
    /// code, or the plan code when the mapping has none.
    #[must_use]
    pub fn bundle_key(&self) -> Option<&str> {
        self.internal_code.as_deref().or(self.plan_code.as_deref())
    }

    /// Netsuite product ID to report: the bundle's when the plan is a
    /// bundle, otherwise the meter's product mapping.
    #[must_use]
    pub fn netsuite_code(&self) -> Option<&str> {
        self.bundle_netsuite_product_id
            .as_deref()
            .or(self.netsuite_product_id.as_deref())
    }
}

/// Generic left join.
///
/// Returns each left row paired with each matching right row, in left order
/// and then right order, or paired with `None` when nothing matches.
pub fn left_join<'r, L, R, K>(
    left: Vec<L>,
    right: &'r [R],
    left_key: impl Fn(&L) -> Option<K>,
    right_key: impl Fn(&R) -> Option<K>,
) -> Vec<(L, Option<&'r R>)>
where
    L: Clone,
    K: Eq + Hash,
{
    let mut index: HashMap<K, Vec<&R>> = HashMap::new();
    for row in right {
        if let Some(key) = right_key(row) {
            index.entry(key).or_default().push(row);
        }
    }

    let mut joined = Vec::with_capacity(left.len());
    for row in left {
        match left_key(&row).and_then(|key| index.get(&key)) {
            Some(matches) => {
                for matched in matches {
                    joined.push((row.clone(), Some(*matched)));
                }
            }
            None => joined.push((row, None)),
        }
    }
    joined
}

/// Join accounts on account ID, picking up the subsidiary ID.
#[must_use]
pub fn join_accounts(rows: Vec<JoinedRow>, accounts: &[Account]) -> Vec<JoinedRow> {
    left_join(
        rows,
        accounts,
        |row| row.line.account_id.clone(),
        |account| account.id.clone(),
    )
    .into_iter()
    .map(|(mut row, account)| {
        row.subsidiary_id = account.and_then(|a| a.custom_field(SUBSIDIARY_FIELD).cloned());
        row
    })
    .collect()
}

/// Join meters on meter ID, picking up the meter code.
#[must_use]
pub fn join_meters(rows: Vec<JoinedRow>, meters: &[Meter]) -> Vec<JoinedRow> {
    left_join(
        rows,
        meters,
        |row| row.line.meter_id.clone(),
        |meter| meter.id.clone(),
    )
    .into_iter()
    .map(|(mut row, meter)| {
        row.meter_code = meter.and_then(|m| m.code.clone());
        row
    })
    .collect()
}

/// Join plans on plan ID, picking up the plan code.
#[must_use]
pub fn join_plans(rows: Vec<JoinedRow>, plans: &[Plan]) -> Vec<JoinedRow> {
    left_join(
        rows,
        plans,
        |row| row.line.plan_id.clone(),
        |plan| plan.id.clone(),
    )
    .into_iter()
    .map(|(mut row, plan)| {
        row.plan_code = plan.and_then(|p| p.code.clone());
        row
    })
    .collect()
}

/// Join the product mapping on meter code.
#[must_use]
pub fn join_product_mapping(rows: Vec<JoinedRow>, mappings: &[ProductMapping]) -> Vec<JoinedRow> {
    left_join(
        rows,
        mappings,
        |row| row.meter_code.clone(),
        |mapping| mapping.meter_code.clone(),
    )
    .into_iter()
    .map(|(mut row, mapping)| {
        row.netsuite_product_id = mapping.and_then(|m| m.netsuite_product_id.clone());
        row.internal_code = mapping.and_then(|m| m.internal_code.clone());
        row
    })
    .collect()
}

/// Join the bundle cross-reference on [`JoinedRow::bundle_key`].
#[must_use]
pub fn join_bundle_mapping(rows: Vec<JoinedRow>, bundles: &[BundleMapping]) -> Vec<JoinedRow> {
    left_join(
        rows,
        bundles,
        |row| row.bundle_key().map(str::to_owned),
        |bundle| bundle.internal_code.clone(),
    )
    .into_iter()
    .map(|(mut row, bundle)| {
        row.bundle_netsuite_product_id = bundle.and_then(|b| b.netsuite_product_id.clone());
        row
    })
    .collect()
}
