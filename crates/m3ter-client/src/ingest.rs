//! Measurement submission and per-aggregation measurement queries.

use reqwest::Method;
use serde_json::Value;

use m3ter_core::{Measurement, MeasurementBatch};

use crate::client::{with_query, ApiClient};
use crate::error::Result;

/// Status the API returns when an aggregation query covers too much data.
const GATEWAY_TIMEOUT: u16 = 504;

impl ApiClient {
    /// Submit a batch of measurements to the ingest host.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the response is not JSON.
    pub async fn submit_measurements(&self, measurements: &[Measurement]) -> Result<Value> {
        let body = serde_json::to_value(MeasurementBatch { measurements })?;
        let response = self
            .send(Method::POST, self.ingest_url("measurements"), Some(body))
            .await?;

        tracing::info!(count = measurements.len(), "Submitted measurements");
        Ok(response)
    }

    /// Aggregated measurements for one account and aggregation over a period.
    ///
    /// A gateway timeout (the server giving up on a large range) yields
    /// `{"values": []}` rather than an error.
    ///
    /// # Errors
    ///
    /// Returns an error for any other failed request or a non-JSON body.
    pub async fn measurements_for_aggregation(
        &self,
        aggregation_id: &str,
        start_date: &str,
        end_date: &str,
        account_code: &str,
    ) -> Result<Value> {
        let url = with_query(
            &self.api_url(&format!("measurements/aggregations/{aggregation_id}")),
            &[
                ("startDate", start_date.to_string()),
                ("endDate", end_date.to_string()),
                ("accountCode", account_code.to_string()),
            ],
        )?;

        let response = self.execute(Method::GET, url, None).await?;
        if response.status == GATEWAY_TIMEOUT {
            tracing::warn!(
                aggregation_id,
                account_code,
                "Aggregation query timed out, treating as no values"
            );
            return Ok(serde_json::json!({ "values": [] }));
        }

        response.error_for_status()?.json()
    }
}
