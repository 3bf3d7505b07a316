use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum IndicatorTimeframe {
    #[serde(rename = "15m")]
    M15,
    #[default]
    #[serde(rename = "1h")]
    H1,
    #[serde(rename = "4h")]
    H4,
}

impl IndicatorTimeframe {
    pub const ALL: [IndicatorTimeframe; 3] =
        [IndicatorTimeframe::M15, IndicatorTimeframe::H1, IndicatorTimeframe::H4];

    pub fn as_str(&self) -> &'static str {
        match self {
            IndicatorTimeframe::M15 => "15m",
            IndicatorTimeframe::H1 => "1h",
            IndicatorTimeframe::H4 => "4h",
        }
    }
}

impl fmt::Display for IndicatorTimeframe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for IndicatorTimeframe {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        IndicatorTimeframe::ALL
            .into_iter()
            .find(|tf| tf.as_str() == s)
            .ok_or_else(|| Error::ValidationError(format!("Unsupported indicator timeframe: {}", s)))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SignalKind {
    Bullish,
    Bearish,
}

impl SignalKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SignalKind::Bullish => "bullish",
            SignalKind::Bearish => "bearish",
        }
    }
}

impl fmt::Display for SignalKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IndicatorCandle {
    #[serde(default, alias = "t", alias = "time", deserialize_with = "super::lenient_epoch")]
    pub timestamp: i64,
    #[serde(alias = "c")]
    pub close: f64,
}

/// A MACD crossover reported by the backend. `time` is in epoch seconds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SignalEvent {
    #[serde(rename = "type")]
    pub kind: SignalKind,
    #[serde(deserialize_with = "super::lenient_epoch")]
    pub time: i64,
}

/// Response of `GET /indicator/macd/analyze`. The four numeric series share one time axis
/// and are expected to have equal length.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IndicatorSeries {
    #[serde(default)]
    pub candles: Vec<IndicatorCandle>,
    #[serde(default)]
    pub macd: Vec<f64>,
    #[serde(default)]
    pub signal: Vec<f64>,
    #[serde(default)]
    pub histogram: Vec<f64>,
    #[serde(default)]
    pub signals: Vec<SignalEvent>,
    #[serde(default)]
    pub confidence: f64,
}

impl IndicatorSeries {
    pub fn closes(&self) -> Vec<f64> {
        self.candles.iter().map(|candle| candle.close).collect()
    }

    /// Last signal in chronological order.
    pub fn latest_signal(&self) -> Option<&SignalEvent> {
        self.signals.last()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_candle_keys() {
        let series: IndicatorSeries = serde_json::from_str(
            r#"{"candles": [{"t": 1700000000, "o": 1.0, "c": 1.5}, {"t": 1700003600, "c": 1.7}],
                "macd": [0.1, 0.2], "signal": [0.05, 0.1], "histogram": [0.05, 0.1],
                "signals": [{"type": "bullish", "time": 1700003600}],
                "confidence": 0.72}"#,
        )
        .unwrap();
        assert_eq!(series.closes(), vec![1.5, 1.7]);
        assert_eq!(series.candles[1].timestamp, 1_700_003_600);
        assert_eq!(series.latest_signal().unwrap().kind, SignalKind::Bullish);
    }

    #[test]
    fn test_float_epochs_are_accepted() {
        let series: IndicatorSeries = serde_json::from_str(
            r#"{"candles": [{"t": 1700000000.0, "c": 1.5}, {"t": "1700003600", "c": 1.7}],
                "signals": [{"type": "bullish", "time": 1700000000.0},
                            {"type": "bearish", "time": 1700003600.75}]}"#,
        )
        .unwrap();
        assert_eq!(series.candles[0].timestamp, 1_700_000_000);
        assert_eq!(series.candles[1].timestamp, 1_700_003_600);
        assert_eq!(series.signals[0].time, 1_700_000_000);
        assert_eq!(series.latest_signal().unwrap().time, 1_700_003_600);

        assert!(serde_json::from_str::<SignalEvent>(r#"{"type": "bullish", "time": "soon"}"#).is_err());
    }

    #[test]
    fn test_missing_series_default_to_empty() {
        let series: IndicatorSeries = serde_json::from_str("{}").unwrap();
        assert!(series.candles.is_empty());
        assert!(series.histogram.is_empty());
        assert!(series.latest_signal().is_none());
        assert_eq!(series.confidence, 0.0);
    }

    #[test]
    fn test_timeframe_default_and_parse() {
        assert_eq!(IndicatorTimeframe::default(), IndicatorTimeframe::H1);
        assert_eq!("15m".parse::<IndicatorTimeframe>().unwrap(), IndicatorTimeframe::M15);
        assert!("1d".parse::<IndicatorTimeframe>().is_err());
    }
}
