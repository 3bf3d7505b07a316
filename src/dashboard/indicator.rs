use std::fmt;
use std::sync::Arc;

use crate::api::Backend;
use crate::dashboard::controller::{RequestController, RequestState};
use crate::error::Result;
use crate::models::{IndicatorSeries, IndicatorTimeframe, SignalEvent, SignalKind};
use crate::utils::format::{format_epoch_seconds, format_ratio_percent};
use crate::utils::series::Sparkline;
use crate::validation::validate_mint;

#[derive(Debug, Clone, PartialEq)]
pub struct SignalRow {
    pub kind: SignalKind,
    pub time: i64,
    pub when: String,
}

impl From<&SignalEvent> for SignalRow {
    fn from(event: &SignalEvent) -> Self {
        Self {
            kind: event.kind,
            time: event.time,
            when: format_epoch_seconds(event.time),
        }
    }
}

/// Render model for a MACD query. Each plot is scaled on its own range.
#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorReport {
    pub price: Sparkline,
    pub macd: Sparkline,
    pub signal: Sparkline,
    pub histogram: Sparkline,
    /// Most recent first.
    pub signals: Vec<SignalRow>,
    pub latest: Option<SignalRow>,
    pub approval: String,
}

impl From<&IndicatorSeries> for IndicatorReport {
    fn from(series: &IndicatorSeries) -> Self {
        Self {
            price: Sparkline::from_values(&series.closes()),
            macd: Sparkline::from_values(&series.macd),
            signal: Sparkline::from_values(&series.signal),
            histogram: Sparkline::from_values(&series.histogram),
            signals: series.signals.iter().rev().map(SignalRow::from).collect(),
            latest: series.latest_signal().map(SignalRow::from),
            approval: format_ratio_percent(series.confidence),
        }
    }
}

impl fmt::Display for IndicatorReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "AI approval: {}", self.approval)?;
        match &self.latest {
            Some(latest) => writeln!(f, "Latest:      {} at {}", latest.kind, latest.when)?,
            None => writeln!(f, "Latest:      -")?,
        }
        writeln!(f, "Price:       {}", self.price.polyline())?;
        writeln!(f, "MACD:        {}", self.macd.polyline())?;
        writeln!(f, "Signal:      {}", self.signal.polyline())?;
        writeln!(f, "Histogram:   {}", self.histogram.polyline())?;
        for row in &self.signals {
            writeln!(f, "  {:<8} {}", row.kind, row.when)?;
        }
        Ok(())
    }
}

pub struct MacdMonitor {
    backend: Arc<dyn Backend>,
    query: String,
    timeframe: IndicatorTimeframe,
    controller: RequestController<IndicatorSeries>,
}

impl MacdMonitor {
    pub fn new(backend: Arc<dyn Backend>) -> Self {
        Self {
            backend,
            query: String::new(),
            timeframe: IndicatorTimeframe::default(),
            controller: RequestController::new(),
        }
    }

    pub fn set_query(&mut self, query: impl Into<String>) {
        self.query = query.into();
    }

    pub fn set_timeframe(&mut self, timeframe: IndicatorTimeframe) {
        self.timeframe = timeframe;
    }

    pub fn timeframe(&self) -> IndicatorTimeframe {
        self.timeframe
    }

    pub fn can_submit(&self) -> bool {
        !self.query.trim().is_empty() && !self.controller.is_pending()
    }

    pub async fn submit(&self) -> Result<IndicatorSeries> {
        let mint = match validate_mint(&self.query) {
            Ok(mint) => mint,
            Err(err) => return Err(self.controller.reject(err)),
        };
        self.controller
            .run(self.backend.macd_analysis(mint, self.timeframe))
            .await
    }

    pub fn controller(&self) -> &RequestController<IndicatorSeries> {
        &self.controller
    }

    pub fn state(&self) -> RequestState<IndicatorSeries> {
        self.controller.state()
    }

    pub fn view(&self) -> RequestState<IndicatorReport> {
        self.controller
            .with_state(|state| state.clone().map(|series| IndicatorReport::from(&series)))
    }
}
