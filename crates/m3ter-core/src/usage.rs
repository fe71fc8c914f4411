//! Measurements submitted to the ingest API.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

/// A single usage measurement against a meter for one account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Measurement {
    /// Unique measurement ID, used by the ingest API for deduplication.
    pub uid: String,

    /// Meter code.
    pub meter: String,

    /// Account code.
    pub account: String,

    /// Measurement timestamp, `YYYY-MM-DDTHH:MM:SSZ`.
    pub ts: String,

    /// Optional end timestamp for interval measurements.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ets: Option<String>,

    /// `MEASURE` data field values.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub measure: Option<serde_json::Value>,

    /// `WHO` data field values.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub who: Option<serde_json::Value>,

    /// `WHERE` data field values.
    #[serde(default, rename = "where", skip_serializing_if = "Option::is_none")]
    pub location: Option<serde_json::Value>,

    /// `WHAT` data field values.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub what: Option<serde_json::Value>,

    /// `METADATA` data field values.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<serde_json::Value>,
}

impl Measurement {
    /// Create a measurement with a fresh UID.
    #[must_use]
    pub fn new(meter: impl Into<String>, account: impl Into<String>, ts: DateTime<Utc>) -> Self {
        Self {
            uid: uuid::Uuid::new_v4().to_string(),
            meter: meter.into(),
            account: account.into(),
            ts: ts.to_rfc3339_opts(SecondsFormat::Secs, true),
            ets: None,
            measure: None,
            who: None,
            location: None,
            what: None,
            metadata: None,
        }
    }

    /// Create a measurement timestamped now.
    #[must_use]
    pub fn now(meter: impl Into<String>, account: impl Into<String>) -> Self {
        Self::new(meter, account, Utc::now())
    }

    /// Set the `MEASURE` values.
    #[must_use]
    pub fn with_measure(mut self, measure: serde_json::Value) -> Self {
        self.measure = Some(measure);
        self
    }

    /// Set the `WHO` values.
    #[must_use]
    pub fn with_who(mut self, who: serde_json::Value) -> Self {
        self.who = Some(who);
        self
    }

    /// Set the `WHAT` values.
    #[must_use]
    pub fn with_what(mut self, what: serde_json::Value) -> Self {
        self.what = Some(what);
        self
    }
}

/// Request body for a measurement submission.
#[derive(Debug, Clone, Default, Serialize)]
pub struct MeasurementBatch<'a> {
    /// Measurements in submission order.
    pub measurements: &'a [Measurement],
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    #[test]
    fn measurement_wire_shape() {
        let ts = Utc.with_ymd_and_hms(2024, 3, 1, 12, 30, 0).unwrap();
        let measurement = Measurement::new("api_calls", "SF-1", ts)
            .with_measure(json!({"calls": 3}));

        let value = serde_json::to_value(&measurement).unwrap();
        assert_eq!(value["ts"], "2024-03-01T12:30:00Z");
        assert_eq!(value["meter"], "api_calls");
        assert_eq!(value["measure"]["calls"], 3);
        assert!(value.get("where").is_none());
        assert_eq!(measurement.uid.len(), 36);
    }

    #[test]
    fn location_uses_reserved_wire_name() {
        let mut measurement = Measurement::now("m", "a");
        measurement.location = Some(json!({"region": "eu"}));
        let value = serde_json::to_value(&measurement).unwrap();
        assert_eq!(value["where"]["region"], "eu");
    }

    #[test]
    fn batch_wraps_measurements() {
        let items = [Measurement::now("m", "a")];
        let value = serde_json::to_value(MeasurementBatch { measurements: &items }).unwrap();
        assert_eq!(value["measurements"].as_array().unwrap().len(), 1);
    }
}
