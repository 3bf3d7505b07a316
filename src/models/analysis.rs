use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

/// Response of `POST /analyze`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    #[serde(default)]
    pub token_address: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub symbol: Option<String>,
    /// Heuristic safety score, 0-100.
    pub score: f64,
    #[serde(default)]
    pub verdict: String,
    #[serde(default)]
    pub metrics: TokenMetrics,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TokenMetrics {
    #[serde(default, deserialize_with = "super::lenient_f64")]
    pub liquidity_usd: Option<f64>,
    #[serde(default, deserialize_with = "super::lenient_f64")]
    pub volume_h24: Option<f64>,
    #[serde(default, deserialize_with = "super::lenient_f64")]
    pub fdv: Option<f64>,
    #[serde(default, deserialize_with = "super::lenient_f64")]
    pub age_days: Option<f64>,
    #[serde(default, deserialize_with = "super::lenient_f64")]
    pub price_change_h24: Option<f64>,
    #[serde(default)]
    pub pair_created_at: Option<Timestamp>,
}

/// A point in time as the backend sends it: epoch milliseconds or a date string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Timestamp {
    Millis(f64),
    Text(String),
}

impl Timestamp {
    pub fn to_datetime(&self) -> Option<DateTime<Utc>> {
        match self {
            Timestamp::Millis(ms) if ms.is_finite() => Utc.timestamp_millis_opt(*ms as i64).single(),
            Timestamp::Millis(_) => None,
            Timestamp::Text(text) => DateTime::parse_from_rfc3339(text)
                .map(|dt| dt.with_timezone(&Utc))
                .ok()
                .or_else(|| text.trim().parse::<i64>().ok().and_then(|ms| Utc.timestamp_millis_opt(ms).single())),
        }
    }

    /// Zero and empty values are treated as absent.
    pub fn is_set(&self) -> bool {
        match self {
            Timestamp::Millis(ms) => *ms != 0.0 && !ms.is_nan(),
            Timestamp::Text(text) => !text.is_empty(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_payload_defaults_missing_metrics() {
        let result: AnalysisResult = serde_json::from_str(
            r#"{"score": 82.7, "verdict": "Healthy", "metrics": {"liquidity_usd": 1234567}}"#,
        )
        .unwrap();
        assert_eq!(result.score, 82.7);
        assert_eq!(result.metrics.liquidity_usd, Some(1_234_567.0));
        assert_eq!(result.metrics.fdv, None);
        assert!(result.name.is_none());
        assert!(result.token_address.is_empty());
    }

    #[test]
    fn test_null_metrics_fields() {
        let result: AnalysisResult = serde_json::from_str(
            r#"{"token_address": "DezX", "score": 10, "verdict": "Risky",
                "metrics": {"fdv": null, "age_days": "3", "pair_created_at": null}}"#,
        )
        .unwrap();
        assert_eq!(result.metrics.fdv, None);
        assert_eq!(result.metrics.age_days, Some(3.0));
        assert_eq!(result.metrics.pair_created_at, None);
    }

    #[test]
    fn test_timestamp_forms() {
        let millis = Timestamp::Millis(1_700_000_000_000.0);
        assert_eq!(millis.to_datetime().unwrap().timestamp(), 1_700_000_000);

        let text = Timestamp::Text("2023-11-14T22:13:20Z".to_string());
        assert_eq!(text.to_datetime().unwrap().timestamp(), 1_700_000_000);

        assert!(Timestamp::Text("yesterday".to_string()).to_datetime().is_none());
        assert!(!Timestamp::Millis(0.0).is_set());
    }

    #[test]
    fn test_timestamp_deserializes_number_or_string() {
        let metrics: TokenMetrics =
            serde_json::from_str(r#"{"pair_created_at": 1700000000000}"#).unwrap();
        assert_eq!(metrics.pair_created_at, Some(Timestamp::Millis(1_700_000_000_000.0)));

        let metrics: TokenMetrics =
            serde_json::from_str(r#"{"pair_created_at": "2024-01-01T00:00:00Z"}"#).unwrap();
        assert!(matches!(metrics.pair_created_at, Some(Timestamp::Text(_))));
    }
}
