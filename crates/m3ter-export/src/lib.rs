//! Billing report export.
//!
//! Joins m3ter bills with accounts, meters and plans from the billing API
//! and with the Netsuite product-mapping tables from Postgres, then writes
//! one CSV row per billed line item for finance.
//!
//! Two reports are produced by the `monthly-export` and `daily-export`
//! binaries; see [`report`] for how they differ.
//!
//! # Example
//!
//! ```no_run
//! use m3ter_export::{run_from_env, Variant};
//!
//! # async fn example() -> m3ter_export::Result<()> {
//! let summary = run_from_env(Variant::Monthly).await?;
//! summary.log();
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod coerce;
pub mod config;
pub mod error;
pub mod join;
pub mod output;
pub mod pipeline;
pub mod report;
pub mod rows;

pub use config::{load_env_file, ExportConfig, RunOptions};
pub use error::{ExportError, Result};
pub use pipeline::{load_inputs, run, run_from_env, RunSummary};
pub use report::{
    build_daily, build_monthly, decode_bills, DailyRecord, MalformedPolicy, MonthlyRecord,
    Report, ReportInputs, Variant,
};

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Install the `fmt` subscriber, filtered by `RUST_LOG` (default
/// `info,m3ter=debug`).
pub fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,m3ter=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}
