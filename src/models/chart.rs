use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

use crate::error::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ChartTimeframe {
    #[serde(rename = "1m")]
    M1,
    #[serde(rename = "3m")]
    M3,
    #[serde(rename = "5m")]
    M5,
    #[default]
    #[serde(rename = "15m")]
    M15,
    #[serde(rename = "1h")]
    H1,
    #[serde(rename = "4h")]
    H4,
    #[serde(rename = "1d")]
    D1,
}

impl ChartTimeframe {
    pub const ALL: [ChartTimeframe; 7] = [
        ChartTimeframe::M1,
        ChartTimeframe::M3,
        ChartTimeframe::M5,
        ChartTimeframe::M15,
        ChartTimeframe::H1,
        ChartTimeframe::H4,
        ChartTimeframe::D1,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ChartTimeframe::M1 => "1m",
            ChartTimeframe::M3 => "3m",
            ChartTimeframe::M5 => "5m",
            ChartTimeframe::M15 => "15m",
            ChartTimeframe::H1 => "1h",
            ChartTimeframe::H4 => "4h",
            ChartTimeframe::D1 => "1d",
        }
    }
}

impl fmt::Display for ChartTimeframe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ChartTimeframe {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        ChartTimeframe::ALL
            .into_iter()
            .find(|tf| tf.as_str() == s)
            .ok_or_else(|| Error::ValidationError(format!("Unsupported chart timeframe: {}", s)))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TradeSide {
    Long,
    Short,
}

impl TradeSide {
    pub fn as_str(&self) -> &'static str {
        match self {
            TradeSide::Long => "long",
            TradeSide::Short => "short",
        }
    }
}

/// Response of `POST /chart/analyze`. Every level is an offset from a reference price
/// chosen by the reader; nothing here is an absolute price.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartPlan {
    pub timeframe: ChartTimeframe,
    #[serde(default)]
    pub trend: String,
    #[serde(default)]
    pub momentum: String,
    #[serde(default)]
    pub confidence: f64,
    pub trade: TradeSuggestion,
    #[serde(default)]
    pub key_levels: KeyLevels,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradeSuggestion {
    pub side: TradeSide,
    pub risk_reward: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct KeyLevels {
    #[serde(default, deserialize_with = "super::lenient_f64")]
    pub entry_offset_pct: Option<f64>,
    #[serde(default, deserialize_with = "super::lenient_f64")]
    pub stop_offset_pct: Option<f64>,
    #[serde(default, deserialize_with = "super::lenient_f64")]
    pub tp1_offset_pct: Option<f64>,
    #[serde(default, deserialize_with = "super::lenient_f64")]
    pub tp2_offset_pct: Option<f64>,
}

/// An image selected for upload.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartImage {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl ChartImage {
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            bytes,
        }
    }

    pub async fn from_path(path: &Path) -> Result<Self> {
        let bytes = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "chart.png".to_string());
        Ok(Self { file_name, bytes })
    }

    pub fn mime_type(&self) -> &'static str {
        let extension = Path::new(&self.file_name)
            .extension()
            .map(|ext| ext.to_string_lossy().to_ascii_lowercase())
            .unwrap_or_default();
        match extension.as_str() {
            "png" => "image/png",
            "jpg" | "jpeg" => "image/jpeg",
            "gif" => "image/gif",
            "webp" => "image/webp",
            "bmp" => "image/bmp",
            _ => "application/octet-stream",
        }
    }
}

/// Everything sent to `/chart/analyze`. `notes` is `None` rather than empty so the part is
/// left out of the form entirely.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartUpload {
    pub image: ChartImage,
    pub timeframe: ChartTimeframe,
    pub notes: Option<String>,
}
