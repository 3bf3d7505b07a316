use std::fmt;
use std::sync::Arc;

use crate::api::Backend;
use crate::dashboard::controller::{RequestController, RequestState};
use crate::error::{Error, Result};
use crate::models::{ChartImage, ChartPlan, ChartTimeframe, ChartUpload};
use crate::utils::format::{format_percent, format_ratio_percent, format_risk_reward};
use crate::validation::MISSING_CHART_IMAGE;

/// Render model for a chart trade plan. Levels stay offsets; nothing is resolved to a price.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartReport {
    pub timeframe: String,
    pub trend: String,
    pub momentum: String,
    pub confidence: String,
    pub side: String,
    pub entry: String,
    pub stop: String,
    pub tp1: String,
    pub tp2: String,
    pub risk_reward: String,
}

impl From<&ChartPlan> for ChartReport {
    fn from(plan: &ChartPlan) -> Self {
        let levels = &plan.key_levels;
        Self {
            timeframe: plan.timeframe.to_string(),
            trend: plan.trend.clone(),
            momentum: plan.momentum.clone(),
            confidence: format_ratio_percent(plan.confidence),
            side: plan.trade.side.as_str().to_uppercase(),
            entry: format_percent(levels.entry_offset_pct),
            stop: format_percent(levels.stop_offset_pct),
            tp1: format_percent(levels.tp1_offset_pct),
            tp2: format_percent(levels.tp2_offset_pct),
            risk_reward: format_risk_reward(plan.trade.risk_reward),
        }
    }
}

impl fmt::Display for ChartReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Timeframe:  {}", self.timeframe)?;
        writeln!(f, "Trend:      {}", self.trend)?;
        writeln!(f, "Momentum:   {}", self.momentum)?;
        writeln!(f, "Confidence: {}", self.confidence)?;
        writeln!(f, "Side:       {}  ({})", self.side, self.risk_reward)?;
        writeln!(f, "Entry:      {}", self.entry)?;
        writeln!(f, "Stop:       {}", self.stop)?;
        writeln!(f, "TP1:        {}", self.tp1)?;
        writeln!(f, "TP2:        {}", self.tp2)
    }
}

pub struct ChartAnalyzer {
    backend: Arc<dyn Backend>,
    file: Option<ChartImage>,
    timeframe: ChartTimeframe,
    notes: String,
    controller: RequestController<ChartPlan>,
}

impl ChartAnalyzer {
    pub fn new(backend: Arc<dyn Backend>) -> Self {
        Self {
            backend,
            file: None,
            timeframe: ChartTimeframe::default(),
            notes: String::new(),
            controller: RequestController::new(),
        }
    }

    pub fn set_file(&mut self, file: Option<ChartImage>) {
        self.file = file;
    }

    pub fn file(&self) -> Option<&ChartImage> {
        self.file.as_ref()
    }

    pub fn set_timeframe(&mut self, timeframe: ChartTimeframe) {
        self.timeframe = timeframe;
    }

    pub fn timeframe(&self) -> ChartTimeframe {
        self.timeframe
    }

    pub fn set_notes(&mut self, notes: impl Into<String>) {
        self.notes = notes.into();
    }

    pub fn can_submit(&self) -> bool {
        self.file.is_some() && !self.controller.is_pending()
    }

    /// Uploads the selected image. Without one the request is refused locally.
    pub async fn submit(&self) -> Result<ChartPlan> {
        let Some(image) = self.file.clone() else {
            return Err(self
                .controller
                .reject(Error::ValidationError(MISSING_CHART_IMAGE.to_string())));
        };
        let notes = Some(self.notes.clone()).filter(|n| !n.is_empty());
        let upload = ChartUpload {
            image,
            timeframe: self.timeframe,
            notes,
        };
        self.controller.run(self.backend.analyze_chart(upload)).await
    }

    pub fn controller(&self) -> &RequestController<ChartPlan> {
        &self.controller
    }

    pub fn state(&self) -> RequestState<ChartPlan> {
        self.controller.state()
    }

    pub fn view(&self) -> RequestState<ChartReport> {
        self.controller
            .with_state(|state| state.clone().map(|plan| ChartReport::from(&plan)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::MockBackend;
    use crate::dashboard::testing::GatedBackend;
    use crate::models::{KeyLevels, TradeSide, TradeSuggestion};

    #[tokio::test]
    async fn test_cannot_submit_while_pending() {
        let (backend, release) = GatedBackend::new();
        let mut analyzer = ChartAnalyzer::new(Arc::new(backend));
        analyzer.set_file(Some(ChartImage::new("sol.png", vec![1, 2, 3])));
        assert!(analyzer.can_submit());

        let submit = analyzer.submit();
        let check = async {
            tokio::task::yield_now().await;
            assert!(!analyzer.can_submit());
            release.send(()).unwrap();
        };
        let (result, _) = tokio::join!(submit, check);
        assert_eq!(result.unwrap().timeframe, ChartTimeframe::M15);
        assert!(analyzer.can_submit());
    }

    fn plan() -> ChartPlan {
        ChartPlan {
            timeframe: ChartTimeframe::H1,
            trend: "up".to_string(),
            momentum: "strong".to_string(),
            confidence: 0.64,
            trade: TradeSuggestion {
                side: TradeSide::Short,
                risk_reward: 2.5,
            },
            key_levels: KeyLevels {
                entry_offset_pct: Some(-0.5),
                stop_offset_pct: Some(1.25),
                tp1_offset_pct: Some(f64::NAN),
                tp2_offset_pct: None,
            },
        }
    }

    #[tokio::test]
    async fn test_submit_without_file_is_refused() {
        let backend = MockBackend::new();
        let analyzer = ChartAnalyzer::new(Arc::new(backend));
        assert!(!analyzer.can_submit());

        let err = analyzer.submit().await.unwrap_err();
        assert!(matches!(err, Error::ValidationError(_)));
        assert_eq!(analyzer.view(), RequestState::Failed("Please upload a chart image".to_string()));
    }

    #[tokio::test]
    async fn test_upload_carries_timeframe_and_drops_empty_notes() {
        let mut backend = MockBackend::new();
        backend
            .expect_analyze_chart()
            .withf(|upload| {
                upload.timeframe == ChartTimeframe::H1
                    && upload.notes.is_none()
                    && upload.image.file_name == "sol.png"
            })
            .times(1)
            .returning(|_| Ok(plan()));

        let mut analyzer = ChartAnalyzer::new(Arc::new(backend));
        assert_eq!(analyzer.timeframe(), ChartTimeframe::M15);
        analyzer.set_file(Some(ChartImage::new("sol.png", vec![0x89, 0x50, 0x4e, 0x47])));
        analyzer.set_timeframe(ChartTimeframe::H1);
        analyzer.set_notes("");
        assert!(analyzer.can_submit());
        analyzer.submit().await.unwrap();

        let RequestState::Succeeded(report) = analyzer.view() else {
            panic!("expected a report");
        };
        assert_eq!(report.timeframe, "1h");
        assert_eq!(report.confidence, "64%");
        assert_eq!(report.side, "SHORT");
        assert_eq!(report.entry, "-0.50%");
        assert_eq!(report.stop, "1.25%");
        assert_eq!(report.tp1, "-");
        assert_eq!(report.tp2, "-");
        assert_eq!(report.risk_reward, "2.5R");
    }

    #[tokio::test]
    async fn test_notes_are_forwarded() {
        let mut backend = MockBackend::new();
        backend
            .expect_analyze_chart()
            .withf(|upload| upload.notes.as_deref() == Some("  breakout retest "))
            .times(1)
            .returning(|_| Ok(plan()));

        let mut analyzer = ChartAnalyzer::new(Arc::new(backend));
        analyzer.set_file(Some(ChartImage::new("chart.jpg", vec![1, 2, 3])));
        analyzer.set_notes("  breakout retest ");
        assert!(analyzer.submit().await.is_ok());
    }
}
