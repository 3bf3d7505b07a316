use async_trait::async_trait;
use serde::Deserialize;

use crate::error::{Error, Result};
use crate::models::{
    AnalysisResult, ChartPlan, ChartUpload, IndicatorSeries, IndicatorTimeframe, LeaderboardEntry,
    LeaderboardSort, LeaderboardWindow, TrackRequest,
};

pub mod client;

pub use client::HttpBackend;

pub const ANALYZE_PATH: &str = "/analyze";
pub const CHART_ANALYZE_PATH: &str = "/chart/analyze";
pub const MACD_ANALYZE_PATH: &str = "/indicator/macd/analyze";
pub const LEADERBOARD_PATH: &str = "/wallets/leaderboard";
pub const TRACK_WALLET_PATH: &str = "/wallets/track";

/// The analytics backend as seen by the dashboard. Scoring, chart reading, MACD and PnL
/// accounting all happen behind this trait.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Backend: Send + Sync {
    async fn analyze_token(&self, query: &str) -> Result<AnalysisResult>;

    async fn analyze_chart(&self, upload: ChartUpload) -> Result<ChartPlan>;

    async fn macd_analysis(&self, query: &str, timeframe: IndicatorTimeframe) -> Result<IndicatorSeries>;

    /// A body that is not a JSON array is an empty leaderboard, not an error.
    async fn leaderboard(
        &self,
        window: LeaderboardWindow,
        sort: LeaderboardSort,
    ) -> Result<Vec<LeaderboardEntry>>;

    async fn track_wallet(&self, request: &TrackRequest) -> Result<()>;
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    detail: Option<serde_json::Value>,
}

/// Turns a non-2xx response into an error, preferring the backend's `detail` field.
pub(crate) fn error_from_body(status: u16, body: &[u8]) -> Error {
    match serde_json::from_slice::<ErrorBody>(body) {
        Ok(ErrorBody { detail: Some(serde_json::Value::String(detail)) }) if !detail.is_empty() => {
            Error::BackendError(detail)
        }
        Ok(ErrorBody { detail: Some(detail) }) if !detail.is_null() && !detail.is_string() => {
            Error::BackendError(detail.to_string())
        }
        _ => Error::HttpStatus(status),
    }
}

/// Keeps the elements of a JSON array that look like leaderboard entries.
pub(crate) fn entries_from_value(value: serde_json::Value) -> Vec<LeaderboardEntry> {
    match value {
        serde_json::Value::Array(items) => items
            .into_iter()
            .enumerate()
            .filter_map(|(i, item)| match serde_json::from_value::<LeaderboardEntry>(item) {
                Ok(entry) => Some(entry),
                Err(e) => {
                    log::warn!("Skipping malformed leaderboard entry at index {}: {}", i, e);
                    None
                }
            })
            .collect(),
        other => {
            log::warn!("Leaderboard response is not an array ({}), treating as empty", json_type(&other));
            Vec::new()
        }
    }
}

fn json_type(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "bool",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}
