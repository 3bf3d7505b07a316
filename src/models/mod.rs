use serde::{Deserialize, Deserializer};

pub mod analysis;
pub mod chart;
pub mod indicator;
pub mod wallet;

pub use analysis::{AnalysisResult, Timestamp, TokenMetrics};
pub use chart::{ChartImage, ChartPlan, ChartTimeframe, ChartUpload, KeyLevels, TradeSide, TradeSuggestion};
pub use indicator::{IndicatorCandle, IndicatorSeries, IndicatorTimeframe, SignalEvent, SignalKind};
pub use wallet::{LeaderboardEntry, LeaderboardSort, LeaderboardWindow, TrackRequest};

/// Accepts a JSON number, a numeric string, or null. Strings that are not numbers become NaN
/// so the formatters can render them as a placeholder instead of failing the whole payload.
pub(crate) fn lenient_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        None | Some(serde_json::Value::Null) => None,
        Some(serde_json::Value::Number(n)) => n.as_f64(),
        Some(serde_json::Value::String(s)) if s.trim().is_empty() => Some(0.0),
        Some(serde_json::Value::String(s)) => Some(s.trim().parse::<f64>().unwrap_or(f64::NAN)),
        Some(serde_json::Value::Bool(b)) => Some(if b { 1.0 } else { 0.0 }),
        Some(_) => Some(f64::NAN),
    })
}

/// Epoch seconds sent as an integer, a float, or a numeric string. Fractions are dropped.
pub(crate) fn lenient_epoch<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    let seconds = match &value {
        serde_json::Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f.floor() as i64)),
        serde_json::Value::String(s) => s
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|f| f.is_finite())
            .map(|f| f.floor() as i64),
        _ => None,
    };
    seconds.ok_or_else(|| {
        serde::de::Error::custom(format!("expected an epoch timestamp, got {}", value))
    })
}
