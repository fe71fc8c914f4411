//! End-to-end export run.

use std::path::PathBuf;
use std::time::{Duration, Instant};

use chrono::{NaiveDate, Utc};

use m3ter_client::ApiClient;
use m3ter_core::{Account, Bill, Meter, Plan};
use m3ter_store::{MappingSource, PgMappingSource};

use crate::config::{ExportConfig, RunOptions};
use crate::error::Result;
use crate::output::write_csv;
use crate::report::{
    build_daily, build_monthly, decode_bills, MalformedPolicy, Report, ReportInputs, Variant,
};

/// Outcome of a successful run.
#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    /// Report produced.
    pub variant: Variant,
    /// Bills decoded.
    pub bills: usize,
    /// Line items across those bills.
    pub line_items: usize,
    /// Records written.
    pub rows_written: usize,
    /// Malformed records skipped.
    pub rows_skipped: usize,
    /// Non-billable rows dropped.
    pub rows_filtered: usize,
    /// Report file.
    pub output_path: PathBuf,
    /// Wall-clock duration.
    pub elapsed: Duration,
}

impl RunSummary {
    /// Log the summary at info level.
    pub fn log(&self) {
        tracing::info!(
            variant = %self.variant,
            bills = self.bills,
            line_items = self.line_items,
            rows_written = self.rows_written,
            rows_skipped = self.rows_skipped,
            rows_filtered = self.rows_filtered,
            output = %self.output_path.display(),
            elapsed_ms = u64::try_from(self.elapsed.as_millis()).unwrap_or(u64::MAX),
            "Export complete"
        );
    }
}

/// Load everything `variant` needs.
///
/// Mapping tables first, then bills, accounts and meters; plans and bundle
/// mappings only for the daily report. Bills are decoded one at a time under
/// `policy`.
///
/// # Errors
///
/// Returns the first load failure, or a malformed bill under
/// [`MalformedPolicy::Abort`].
pub async fn load_inputs(
    variant: Variant,
    api: &ApiClient,
    mappings: &dyn MappingSource,
    policy: MalformedPolicy,
) -> Result<ReportInputs> {
    let products = mappings.product_mappings().await?;
    let bundles = match variant {
        Variant::Daily => mappings.bundle_mappings().await?,
        Variant::Monthly => Vec::new(),
    };

    let raw_bills = api.resource::<Bill>().load_raw().await?;
    let (bills, skipped_bills) = decode_bills(raw_bills, policy)?;
    let accounts = api.resource::<Account>().load().await?;
    let meters = api.resource::<Meter>().load().await?;
    let plans = match variant {
        Variant::Daily => api.resource::<Plan>().load().await?,
        Variant::Monthly => Vec::new(),
    };

    Ok(ReportInputs {
        bills,
        accounts,
        meters,
        plans,
        products,
        bundles,
        skipped_bills,
    })
}

/// Produce one report and write it.
///
/// `today` is the run date in UTC; the daily report covers the day before.
///
/// # Errors
///
/// Returns an error if loading, building or writing fails. Nothing is
/// written unless the whole report was built.
pub async fn run(
    variant: Variant,
    api: &ApiClient,
    mappings: &dyn MappingSource,
    options: &RunOptions,
    today: NaiveDate,
) -> Result<RunSummary> {
    let started = Instant::now();
    tracing::info!(%variant, %today, "Starting export");

    let inputs = load_inputs(variant, api, mappings, options.malformed).await?;
    let bills = inputs.bills.len();
    let output_path = options.output_path(variant);

    let (rows_written, counts) = match variant {
        Variant::Monthly => {
            let report = build_monthly(&inputs, options.malformed)?;
            (write_csv(&output_path, &report.records)?, Counts::of(&report))
        }
        Variant::Daily => {
            let report = build_daily(&inputs, today, options.malformed)?;
            (write_csv(&output_path, &report.records)?, Counts::of(&report))
        }
    };

    Ok(RunSummary {
        variant,
        bills,
        line_items: counts.line_items,
        rows_written,
        rows_skipped: counts.skipped,
        rows_filtered: counts.filtered,
        output_path,
        elapsed: started.elapsed(),
    })
}

struct Counts {
    line_items: usize,
    skipped: usize,
    filtered: usize,
}

impl Counts {
    fn of<T>(report: &Report<T>) -> Self {
        Self {
            line_items: report.line_items,
            skipped: report.skipped,
            filtered: report.filtered,
        }
    }
}

/// Run `variant` with settings from the environment against the live API
/// and database.
///
/// # Errors
///
/// Returns an error if configuration is incomplete, authentication fails or
/// the run fails.
pub async fn run_from_env(variant: Variant) -> Result<RunSummary> {
    let config = ExportConfig::from_env()?;

    let mappings = PgMappingSource::connect(&config.database).await?;
    let api = ApiClient::connect(config.client).await?;

    run(variant, &api, &mappings, &config.run, Utc::now().date_naive()).await
}
