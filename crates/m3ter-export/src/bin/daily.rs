//! Daily billing export.
//!
//! Writes `dataExfiltrationDaily.csv` with yesterday's billable line items
//! and their unit prices.

use m3ter_export::{init_tracing, run_from_env, Variant};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    match run_from_env(Variant::Daily).await {
        Ok(summary) => {
            summary.log();
            Ok(())
        }
        Err(e) => {
            tracing::error!(error = %e, "Daily export failed");
            Err(e.into())
        }
    }
}
