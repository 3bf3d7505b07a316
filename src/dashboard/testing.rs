use async_trait::async_trait;
use tokio::sync::{oneshot, Mutex};

use crate::api::Backend;
use crate::error::Result;
use crate::models::{
    AnalysisResult, ChartPlan, ChartUpload, IndicatorSeries, IndicatorTimeframe,
    KeyLevels, LeaderboardEntry, LeaderboardSort, LeaderboardWindow, TokenMetrics, TrackRequest,
    TradeSide, TradeSuggestion,
};

/// Backend whose calls stay pending until the paired sender fires, for observing widgets
/// mid-request.
pub struct GatedBackend {
    gate: Mutex<Option<oneshot::Receiver<()>>>,
}

impl GatedBackend {
    pub fn new() -> (Self, oneshot::Sender<()>) {
        let (tx, rx) = oneshot::channel();
        (Self { gate: Mutex::new(Some(rx)) }, tx)
    }

    async fn wait(&self) {
        let gate = self.gate.lock().await.take();
        if let Some(gate) = gate {
            let _ = gate.await;
        }
    }
}

#[async_trait]
impl Backend for GatedBackend {
    async fn analyze_token(&self, query: &str) -> Result<AnalysisResult> {
        self.wait().await;
        Ok(AnalysisResult {
            token_address: String::new(),
            name: None,
            symbol: Some(query.to_string()),
            score: 50.0,
            verdict: "Neutral".to_string(),
            metrics: TokenMetrics::default(),
        })
    }

    async fn analyze_chart(&self, upload: ChartUpload) -> Result<ChartPlan> {
        self.wait().await;
        Ok(ChartPlan {
            timeframe: upload.timeframe,
            trend: "sideways".to_string(),
            momentum: "flat".to_string(),
            confidence: 0.5,
            trade: TradeSuggestion {
                side: TradeSide::Long,
                risk_reward: 1.0,
            },
            key_levels: KeyLevels::default(),
        })
    }

    async fn macd_analysis(&self, _query: &str, _timeframe: IndicatorTimeframe) -> Result<IndicatorSeries> {
        self.wait().await;
        Ok(IndicatorSeries::default())
    }

    async fn leaderboard(
        &self,
        _window: LeaderboardWindow,
        _sort: LeaderboardSort,
    ) -> Result<Vec<LeaderboardEntry>> {
        self.wait().await;
        Ok(Vec::new())
    }

    async fn track_wallet(&self, _request: &TrackRequest) -> Result<()> {
        self.wait().await;
        Ok(())
    }
}
