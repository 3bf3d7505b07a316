pub mod chart;
pub mod controller;
pub mod indicator;
pub mod leaderboard;
pub mod token;

#[cfg(test)]
pub(crate) mod testing;

pub use chart::{ChartAnalyzer, ChartReport};
pub use controller::{RequestController, RequestState};
pub use indicator::{IndicatorReport, MacdMonitor, SignalRow};
pub use leaderboard::{LeaderboardRow, LeaderboardStore, LEADERBOARD_FAILURE};
pub use token::{MetricCard, TokenAnalyzer, TokenReport};
