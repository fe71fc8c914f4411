//! Report assembly: flatten, join, project and coerce.
//!
//! Two variants share the steps but not the details:
//!
//! | | monthly | daily |
//! |---|---|---|
//! | bills | all | billed yesterday (UTC) |
//! | joins | accounts, meters, product mapping | + plans, bundle mapping |
//! | missing Netsuite code | `N/A` | 0, then dropped |
//! | `Price` column | no | single pricing band unit price |
//! | `Date` column | `lastCalculatedDate` | `billDate` |

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::Serialize;
use serde_json::Value;

use m3ter_core::{Account, Bill, Meter, Plan};
use m3ter_store::{BundleMapping, ProductMapping};

use crate::coerce::{self, NetsuiteCode};
use crate::error::{ExportError, Result};
use crate::join::{
    join_accounts, join_bundle_mapping, join_meters, join_plans, join_product_mapping, JoinedRow,
};
use crate::output::CsvRecord;
use crate::rows::{filter_bill_date, flatten_bills, unit_price};

/// Which report to produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Variant {
    /// Whole-period usage, run on the 27th and at month end.
    Monthly,
    /// Yesterday's bills with unit prices.
    Daily,
}

impl Variant {
    /// Short name used in logs.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Monthly => "monthly",
            Self::Daily => "daily",
        }
    }

    /// Default output file name.
    #[must_use]
    pub fn file_name(self) -> &'static str {
        match self {
            Self::Monthly => "dataExfiltration.csv",
            Self::Daily => "dataExfiltrationDaily.csv",
        }
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What to do with a record the report cannot represent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MalformedPolicy {
    /// Fail the run.
    #[default]
    Abort,
    /// Drop the record, log it and count it.
    Skip,
}

impl FromStr for MalformedPolicy {
    type Err = ExportError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "abort" => Ok(Self::Abort),
            "skip" => Ok(Self::Skip),
            other => Err(ExportError::Configuration(format!(
                "unknown malformed record policy {other:?}, expected abort or skip"
            ))),
        }
    }
}

/// One row of the monthly report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyRecord {
    /// Finance subsidiary of the account.
    pub subsidiary_id: Option<i64>,
    /// CRM account ID (the m3ter account code).
    pub sf_account_id: Option<String>,
    /// Netsuite product, or `N/A`.
    pub netsuite_product_code: NetsuiteCode,
    /// Billed quantity.
    pub quantity: Option<f64>,
    /// Bill calculation date.
    pub date: Option<String>,
}

impl CsvRecord for MonthlyRecord {
    const HEADERS: &'static [&'static str] = &[
        "Subsidiary ID",
        "SF Account ID",
        "Netsuite Product Code",
        "Quantity",
        "Date",
    ];
}

/// One row of the daily report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyRecord {
    /// Finance subsidiary of the account.
    pub subsidiary_id: Option<i64>,
    /// CRM account ID (the m3ter account code).
    pub sf_account_id: Option<String>,
    /// Netsuite product; never 0 in a written report.
    pub netsuite_product_code: i64,
    /// Unit price; never 0 in a written report.
    pub price: f64,
    /// Billed quantity.
    pub quantity: Option<f64>,
    /// Bill date.
    pub date: Option<String>,
}

impl CsvRecord for DailyRecord {
    const HEADERS: &'static [&'static str] = &[
        "Subsidiary ID",
        "SF Account ID",
        "Netsuite Product Code",
        "Price",
        "Quantity",
        "Date",
    ];
}

/// Everything a report is built from.
#[derive(Debug, Clone, Default)]
pub struct ReportInputs {
    /// All bills.
    pub bills: Vec<Bill>,
    /// All accounts.
    pub accounts: Vec<Account>,
    /// All meters.
    pub meters: Vec<Meter>,
    /// All plans (daily only).
    pub plans: Vec<Plan>,
    /// Product-mapping table.
    pub products: Vec<ProductMapping>,
    /// Bundle cross-reference table (daily only).
    pub bundles: Vec<BundleMapping>,
    /// Bills dropped by [`decode_bills`] under [`MalformedPolicy::Skip`].
    pub skipped_bills: usize,
}

/// Report records plus counts for the run summary.
#[derive(Debug, Clone, PartialEq)]
pub struct Report<T> {
    /// Records to write, in line-item order.
    pub records: Vec<T>,
    /// Line items across all bills, before any filtering.
    pub line_items: usize,
    /// Malformed records dropped under [`MalformedPolicy::Skip`].
    pub skipped: usize,
    /// Rows dropped as non-billable (daily zero price or zero code).
    pub filtered: usize,
}

impl<T> Report<T> {
    fn new(line_items: usize, skipped: usize) -> Self {
        Self {
            records: Vec::new(),
            line_items,
            skipped,
            filtered: 0,
        }
    }

    fn admit<V>(
        &mut self,
        policy: MalformedPolicy,
        record: &str,
        outcome: std::result::Result<V, String>,
    ) -> Result<Option<V>> {
        admit(policy, record, outcome, &mut self.skipped)
    }
}

/// Apply the malformed-record policy to one step's outcome.
fn admit<V>(
    policy: MalformedPolicy,
    record: &str,
    outcome: std::result::Result<V, String>,
    skipped: &mut usize,
) -> Result<Option<V>> {
    match (outcome, policy) {
        (Ok(value), _) => Ok(Some(value)),
        (Err(reason), MalformedPolicy::Abort) => Err(ExportError::DataShape {
            record: record.to_string(),
            reason,
        }),
        (Err(reason), MalformedPolicy::Skip) => {
            tracing::warn!(record, reason = %reason, "Skipping malformed record");
            *skipped += 1;
            Ok(None)
        }
    }
}

/// Decode bills one at a time.
///
/// Returns the bills that decoded and how many were skipped. A bill is
/// named by its `id` in errors and logs, or by its position when it has
/// none.
///
/// # Errors
///
/// Returns `ExportError::DataShape` for the first bill that does not decode
/// under [`MalformedPolicy::Abort`].
pub fn decode_bills(raw: Vec<Value>, policy: MalformedPolicy) -> Result<(Vec<Bill>, usize)> {
    let mut bills = Vec::with_capacity(raw.len());
    let mut skipped = 0;

    for (index, value) in raw.into_iter().enumerate() {
        let record = match value.get("id").and_then(Value::as_str) {
            Some(id) => format!("bill {id}"),
            None => format!("bill #{index}"),
        };
        let outcome = serde_json::from_value::<Bill>(value).map_err(|e| e.to_string());
        if let Some(bill) = admit(policy, &record, outcome, &mut skipped)? {
            bills.push(bill);
        }
    }

    Ok((bills, skipped))
}

/// Build the monthly report.
///
/// # Errors
///
/// Returns `ExportError::DataShape` for a malformed record under
/// [`MalformedPolicy::Abort`].
pub fn build_monthly(
    inputs: &ReportInputs,
    policy: MalformedPolicy,
) -> Result<Report<MonthlyRecord>> {
    let lines = flatten_bills(&inputs.bills);
    let mut report = Report::new(lines.len(), inputs.skipped_bills);

    let rows = lines.into_iter().map(JoinedRow::from).collect();
    let rows = join_accounts(rows, &inputs.accounts);
    let rows = join_meters(rows, &inputs.meters);
    let rows = join_product_mapping(rows, &inputs.products);

    for row in rows {
        if let Some(record) = report.admit(policy, &row.line.record(), monthly_record(&row))? {
            report.records.push(record);
        }
    }

    Ok(report)
}

fn monthly_record(row: &JoinedRow) -> std::result::Result<MonthlyRecord, String> {
    Ok(MonthlyRecord {
        subsidiary_id: coerce::subsidiary_id(row.subsidiary_id.as_ref())?,
        sf_account_id: row.line.account_code.clone(),
        netsuite_product_code: coerce::monthly_netsuite_code(row.netsuite_code())?,
        quantity: row.line.quantity,
        date: row.line.last_calculated_date.clone(),
    })
}

/// Build the daily report for bills dated the day before `today`.
///
/// # Errors
///
/// Returns `ExportError::DataShape` for a malformed record under
/// [`MalformedPolicy::Abort`]; a line item whose pricing is not a single
/// band is malformed.
pub fn build_daily(
    inputs: &ReportInputs,
    today: NaiveDate,
    policy: MalformedPolicy,
) -> Result<Report<DailyRecord>> {
    let day = today
        .pred_opt()
        .ok_or_else(|| ExportError::Configuration(format!("no day before {today}")))?;

    let lines = flatten_bills(&inputs.bills);
    let mut report = Report::new(lines.len(), inputs.skipped_bills);
    let lines = filter_bill_date(lines, day);

    tracing::debug!(%day, count = lines.len(), "Line items billed on report day");

    let mut rows = Vec::with_capacity(lines.len());
    for line in lines {
        if let Some(price) = report.admit(policy, &line.record(), unit_price(&line))? {
            rows.push(JoinedRow {
                line,
                unit_price: Some(price),
                ..JoinedRow::default()
            });
        }
    }

    let rows = join_accounts(rows, &inputs.accounts);
    let rows = join_meters(rows, &inputs.meters);
    let rows = join_plans(rows, &inputs.plans);
    let rows = join_product_mapping(rows, &inputs.products);
    let rows = join_bundle_mapping(rows, &inputs.bundles);

    for row in rows {
        let Some(record) = report.admit(policy, &row.line.record(), daily_record(&row))? else {
            continue;
        };
        if record.price.abs() < f64::EPSILON || record.netsuite_product_code == 0 {
            report.filtered += 1;
            continue;
        }
        report.records.push(record);
    }

    Ok(report)
}

fn daily_record(row: &JoinedRow) -> std::result::Result<DailyRecord, String> {
    Ok(DailyRecord {
        subsidiary_id: coerce::subsidiary_id(row.subsidiary_id.as_ref())?,
        sf_account_id: row.line.account_code.clone(),
        netsuite_product_code: coerce::daily_netsuite_code(row.netsuite_code())?,
        price: row.unit_price.unwrap_or_default(),
        quantity: row.line.quantity,
        date: row.line.bill_date.clone(),
    })
}
