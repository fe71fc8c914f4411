//! Monthly billing export.
//!
//! Scheduled on the 27th and again on the last day of the month. Writes
//! `dataExfiltration.csv` with every bill's line items.

use m3ter_export::{init_tracing, run_from_env, Variant};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    match run_from_env(Variant::Monthly).await {
        Ok(summary) => {
            summary.log();
            Ok(())
        }
        Err(e) => {
            tracing::error!(error = %e, "Monthly export failed");
            Err(e.into())
        }
    }
}
