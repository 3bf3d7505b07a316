use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum LeaderboardWindow {
    #[serde(rename = "1d")]
    Day,
    #[default]
    #[serde(rename = "7d")]
    Week,
    #[serde(rename = "30d")]
    Month,
}

impl LeaderboardWindow {
    pub const ALL: [LeaderboardWindow; 3] =
        [LeaderboardWindow::Day, LeaderboardWindow::Week, LeaderboardWindow::Month];

    pub fn as_str(&self) -> &'static str {
        match self {
            LeaderboardWindow::Day => "1d",
            LeaderboardWindow::Week => "7d",
            LeaderboardWindow::Month => "30d",
        }
    }

    /// Short label for window toggles.
    pub fn label(&self) -> &'static str {
        match self {
            LeaderboardWindow::Day => "1D",
            LeaderboardWindow::Week => "7D",
            LeaderboardWindow::Month => "1M",
        }
    }
}

impl fmt::Display for LeaderboardWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LeaderboardWindow {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        LeaderboardWindow::ALL
            .into_iter()
            .find(|w| w.as_str() == s)
            .ok_or_else(|| Error::ValidationError(format!("Unsupported leaderboard window: {}", s)))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeaderboardSort {
    #[default]
    Pnl,
    HitRate,
    Trades,
}

impl LeaderboardSort {
    pub const ALL: [LeaderboardSort; 3] =
        [LeaderboardSort::Pnl, LeaderboardSort::HitRate, LeaderboardSort::Trades];

    pub fn as_str(&self) -> &'static str {
        match self {
            LeaderboardSort::Pnl => "pnl",
            LeaderboardSort::HitRate => "hit_rate",
            LeaderboardSort::Trades => "trades",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            LeaderboardSort::Pnl => "PnL",
            LeaderboardSort::HitRate => "Hit-Rate",
            LeaderboardSort::Trades => "Trades",
        }
    }
}

impl fmt::Display for LeaderboardSort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LeaderboardSort {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        LeaderboardSort::ALL
            .into_iter()
            .find(|sort| sort.as_str() == s)
            .ok_or_else(|| Error::ValidationError(format!("Unsupported leaderboard sort: {}", s)))
    }
}

/// One ranked wallet. The rank is the position in the backend's array, never a field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub address: String,
    #[serde(default)]
    pub label: Option<String>,
    pub pnl_usd: f64,
    /// Fraction of winning trades, 0-1.
    pub hit_rate: f64,
    pub trades: u64,
}

/// Body of `POST /wallets/track`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrackRequest {
    pub address: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl TrackRequest {
    pub fn new(address: impl Into<String>, label: Option<String>) -> Self {
        Self {
            address: address.into(),
            label: label.filter(|l| !l.trim().is_empty()),
        }
    }
}
