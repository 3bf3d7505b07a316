use std::fmt;
use std::sync::Arc;

use crate::api::Backend;
use crate::dashboard::controller::{RequestController, RequestState};
use crate::error::Result;
use crate::models::{AnalysisResult, Timestamp};
use crate::utils::format::{
    format_change, format_datetime, format_number, format_plain, round_display, PLACEHOLDER,
};
use crate::validation::validate_query;

#[derive(Debug, Clone, PartialEq)]
pub struct MetricCard {
    pub label: &'static str,
    pub value: String,
}

/// Render model for one token analysis.
#[derive(Debug, Clone, PartialEq)]
pub struct TokenReport {
    pub display_name: String,
    pub address: String,
    pub score: i64,
    pub verdict: String,
    pub cards: Vec<MetricCard>,
}

impl From<&AnalysisResult> for TokenReport {
    fn from(result: &AnalysisResult) -> Self {
        let name = result.name.as_deref().filter(|n| !n.is_empty()).unwrap_or("Unknown");
        let display_name = match result.symbol.as_deref().filter(|s| !s.is_empty()) {
            Some(symbol) => format!("{} ({})", name, symbol),
            None => name.to_string(),
        };
        let address = if result.token_address.is_empty() {
            PLACEHOLDER.to_string()
        } else {
            result.token_address.clone()
        };

        let metrics = &result.metrics;
        let pair_created = metrics
            .pair_created_at
            .as_ref()
            .filter(|ts| ts.is_set())
            .map(|ts| match (ts.to_datetime(), ts) {
                (Some(dt), _) => format_datetime(&dt),
                (None, Timestamp::Text(raw)) => raw.clone(),
                (None, _) => PLACEHOLDER.to_string(),
            })
            .unwrap_or_else(|| PLACEHOLDER.to_string());

        Self {
            display_name,
            address,
            score: round_display(result.score),
            verdict: result.verdict.clone(),
            cards: vec![
                MetricCard { label: "Liquidity (USD)", value: format_number(metrics.liquidity_usd) },
                MetricCard { label: "24h Volume", value: format_number(metrics.volume_h24) },
                MetricCard { label: "FDV", value: format_number(metrics.fdv) },
                MetricCard { label: "Age (days)", value: format_plain(metrics.age_days) },
                MetricCard { label: "24h Change", value: format_change(metrics.price_change_h24) },
                MetricCard { label: "Pair Created", value: pair_created },
            ],
        }
    }
}

impl TokenReport {
    pub fn card(&self, label: &str) -> Option<&str> {
        self.cards
            .iter()
            .find(|card| card.label == label)
            .map(|card| card.value.as_str())
    }
}

impl fmt::Display for TokenReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Token:   {}", self.display_name)?;
        writeln!(f, "Address: {}", self.address)?;
        writeln!(f, "Score:   {} ({})", self.score, self.verdict)?;
        for card in &self.cards {
            writeln!(f, "  {:<16} {}", card.label, card.value)?;
        }
        Ok(())
    }
}

/// Token lookup: a free-text query (address, name or symbol) scored by the backend.
pub struct TokenAnalyzer {
    backend: Arc<dyn Backend>,
    query: String,
    controller: RequestController<AnalysisResult>,
}

impl TokenAnalyzer {
    pub fn new(backend: Arc<dyn Backend>) -> Self {
        Self {
            backend,
            query: String::new(),
            controller: RequestController::new(),
        }
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn set_query(&mut self, query: impl Into<String>) {
        self.query = query.into();
    }

    pub fn can_submit(&self) -> bool {
        !self.query.trim().is_empty() && !self.controller.is_pending()
    }

    pub async fn submit(&self) -> Result<AnalysisResult> {
        let query = match validate_query(&self.query) {
            Ok(query) => query,
            Err(err) => return Err(self.controller.reject(err)),
        };
        self.controller.run(self.backend.analyze_token(query)).await
    }

    pub fn controller(&self) -> &RequestController<AnalysisResult> {
        &self.controller
    }

    pub fn state(&self) -> RequestState<AnalysisResult> {
        self.controller.state()
    }

    pub fn view(&self) -> RequestState<TokenReport> {
        self.controller
            .with_state(|state| state.clone().map(|result| TokenReport::from(&result)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::MockBackend;
    use crate::error::Error;
    use crate::dashboard::testing::GatedBackend;
    use crate::models::TokenMetrics;

    #[tokio::test]
    async fn test_cannot_submit_while_pending() {
        let (backend, release) = GatedBackend::new();
        let mut analyzer = TokenAnalyzer::new(Arc::new(backend));
        analyzer.set_query("BONK");
        assert!(analyzer.can_submit());

        let submit = analyzer.submit();
        let check = async {
            tokio::task::yield_now().await;
            assert!(analyzer.state().is_pending());
            assert!(!analyzer.can_submit());
            release.send(()).unwrap();
        };
        let (result, _) = tokio::join!(submit, check);
        assert!(result.is_ok());
        assert!(analyzer.can_submit());
    }

    fn bonk_result() -> AnalysisResult {
        AnalysisResult {
            token_address: "DezXAZ8z7PnrnRJjz3wXBoRgixCa6xjnB7YaB1pPB263".to_string(),
            name: Some("Bonk".to_string()),
            symbol: Some("BONK".to_string()),
            score: 82.7,
            verdict: "Healthy".to_string(),
            metrics: TokenMetrics {
                liquidity_usd: Some(1_234_567.0),
                ..TokenMetrics::default()
            },
        }
    }

    #[tokio::test]
    async fn test_submit_renders_score_and_metrics() {
        let mut backend = MockBackend::new();
        backend
            .expect_analyze_token()
            .withf(|query| query.to_string() == "BONK")
            .times(1)
            .returning(|_| Ok(bonk_result()));

        let mut analyzer = TokenAnalyzer::new(Arc::new(backend));
        analyzer.set_query("BONK");
        assert!(analyzer.can_submit());
        analyzer.submit().await.unwrap();

        let RequestState::Succeeded(report) = analyzer.view() else {
            panic!("expected a report");
        };
        assert_eq!(report.score, 83);
        assert_eq!(report.verdict, "Healthy");
        assert_eq!(report.display_name, "Bonk (BONK)");
        assert_eq!(report.card("Liquidity (USD)"), Some("1.23M"));
        assert_eq!(report.card("FDV"), Some("-"));
        assert_eq!(report.card("Age (days)"), Some("-"));
        assert_eq!(report.card("24h Change"), Some("-"));
        assert_eq!(report.card("Pair Created"), Some("-"));
        assert_eq!(report.cards.len(), 6);
    }

    #[tokio::test]
    async fn test_empty_query_never_calls_backend() {
        let backend = MockBackend::new();
        let mut analyzer = TokenAnalyzer::new(Arc::new(backend));
        analyzer.set_query("   ");
        assert!(!analyzer.can_submit());

        let err = analyzer.submit().await.unwrap_err();
        assert!(matches!(err, Error::ValidationError(_)));
        assert!(analyzer.state().error().is_some());
    }

    #[tokio::test]
    async fn test_backend_detail_replaces_previous_result() {
        let mut backend = MockBackend::new();
        let mut calls = 0;
        backend.expect_analyze_token().times(2).returning(move |_| {
            calls += 1;
            if calls == 1 {
                Ok(bonk_result())
            } else {
                Err(Error::BackendError("Token not found".to_string()))
            }
        });

        let mut analyzer = TokenAnalyzer::new(Arc::new(backend));
        analyzer.set_query("BONK");
        analyzer.submit().await.unwrap();
        analyzer.set_query("NOPE");
        assert!(analyzer.submit().await.is_err());

        assert_eq!(analyzer.view(), RequestState::Failed("Token not found".to_string()));
    }

    #[test]
    fn test_report_with_full_metrics() {
        let result = AnalysisResult {
            token_address: String::new(),
            name: None,
            symbol: None,
            score: 41.2,
            verdict: "Risky".to_string(),
            metrics: TokenMetrics {
                liquidity_usd: Some(950.0),
                volume_h24: Some(2_500_000_000.0),
                fdv: Some(12_000.0),
                age_days: Some(2.5),
                price_change_h24: Some(-12.4),
                pair_created_at: Some(Timestamp::Millis(1_700_000_000_000.0)),
            },
        };
        let report = TokenReport::from(&result);
        assert_eq!(report.display_name, "Unknown");
        assert_eq!(report.address, "-");
        assert_eq!(report.score, 41);
        assert_eq!(report.card("Liquidity (USD)"), Some("950"));
        assert_eq!(report.card("24h Volume"), Some("2.50B"));
        assert_eq!(report.card("FDV"), Some("12.00K"));
        assert_eq!(report.card("Age (days)"), Some("2.5"));
        assert_eq!(report.card("24h Change"), Some("-12.4%"));
        assert_eq!(report.card("Pair Created"), Some("2023-11-14 22:13:20 UTC"));
    }
}
