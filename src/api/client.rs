use async_trait::async_trait;
use log::{debug, error, warn};
use reqwest::multipart::{Form, Part};
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use serde_json::json;

use crate::api::{
    entries_from_value, error_from_body, Backend, ANALYZE_PATH, CHART_ANALYZE_PATH, LEADERBOARD_PATH,
    MACD_ANALYZE_PATH, TRACK_WALLET_PATH,
};
use crate::config::BackendConfig;
use crate::error::{Error, Result};
use crate::models::{
    AnalysisResult, ChartPlan, ChartUpload, IndicatorSeries, IndicatorTimeframe, LeaderboardEntry,
    LeaderboardSort, LeaderboardWindow, TrackRequest,
};

/// reqwest-backed [`Backend`]. The base URL comes from the injected [`BackendConfig`]; one
/// call is one HTTP request, with no retries.
#[derive(Debug, Clone)]
pub struct HttpBackend {
    client: Client,
    config: BackendConfig,
}

impl HttpBackend {
    pub fn new(config: BackendConfig) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.request_timeout() {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            client: builder.build()?,
            config,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    async fn send(&self, request: RequestBuilder, endpoint: &str) -> Result<reqwest::Response> {
        request.send().await.map_err(|e| {
            error!("Request to {} failed: {}", endpoint, e);
            Error::HttpError(e)
        })
    }

    /// Sends the request and decodes a 2xx body as `T`; any other status becomes an error
    /// built from the response body.
    async fn fetch_json<T: DeserializeOwned>(&self, request: RequestBuilder, endpoint: &str) -> Result<T> {
        let response = self.send(request, endpoint).await?;
        let status = response.status();
        let body = response.bytes().await.map_err(|e| {
            error!("Failed to read {} response body: {}", endpoint, e);
            Error::HttpError(e)
        })?;

        if !status.is_success() {
            let err = error_from_body(status.as_u16(), &body);
            error!("{} returned status {}: {}", endpoint, status, err);
            return Err(err);
        }

        serde_json::from_slice::<T>(&body).map_err(|e| {
            error!("Failed to parse {} response: {}", endpoint, e);
            Error::InvalidResponse(format!("Failed to parse {} response: {}", endpoint, e))
        })
    }
}

#[async_trait]
impl Backend for HttpBackend {
    async fn analyze_token(&self, query: &str) -> Result<AnalysisResult> {
        let url = self.config.endpoint(ANALYZE_PATH);
        debug!("Sending token analysis request to {}: {}", url, query);
        let request = self.client.post(&url).json(&json!({ "query": query }));
        self.fetch_json(request, ANALYZE_PATH).await
    }

    async fn analyze_chart(&self, upload: ChartUpload) -> Result<ChartPlan> {
        let url = self.config.endpoint(CHART_ANALYZE_PATH);
        debug!(
            "Uploading chart {} ({} bytes, {}) to {}",
            upload.image.file_name,
            upload.image.bytes.len(),
            upload.timeframe,
            url
        );

        let mime = upload.image.mime_type();
        let file = Part::bytes(upload.image.bytes)
            .file_name(upload.image.file_name)
            .mime_str(mime)?;
        let mut form = Form::new()
            .part("file", file)
            .text("timeframe", upload.timeframe.as_str());
        if let Some(notes) = upload.notes.filter(|n| !n.is_empty()) {
            form = form.text("notes", notes);
        }

        let request = self.client.post(&url).multipart(form);
        self.fetch_json(request, CHART_ANALYZE_PATH).await
    }

    async fn macd_analysis(&self, query: &str, timeframe: IndicatorTimeframe) -> Result<IndicatorSeries> {
        let url = self.config.endpoint(MACD_ANALYZE_PATH);
        debug!("Requesting MACD analysis for {} on {}", query, timeframe);
        let request = self
            .client
            .get(&url)
            .query(&[("query", query), ("timeframe", timeframe.as_str())]);
        self.fetch_json(request, MACD_ANALYZE_PATH).await
    }

    async fn leaderboard(
        &self,
        window: LeaderboardWindow,
        sort: LeaderboardSort,
    ) -> Result<Vec<LeaderboardEntry>> {
        let url = self.config.endpoint(LEADERBOARD_PATH);
        debug!("Fetching leaderboard window={} sort={}", window, sort);
        let request = self
            .client
            .get(&url)
            .query(&[("window", window.as_str()), ("sort", sort.as_str())]);

        let response = self.send(request, LEADERBOARD_PATH).await?;
        if !response.status().is_success() {
            warn!("{} returned status {}, reading body anyway", LEADERBOARD_PATH, response.status());
        }
        let body = response.bytes().await?;
        let value: serde_json::Value = serde_json::from_slice(&body).map_err(|e| {
            error!("Leaderboard response is not JSON: {}", e);
            Error::InvalidResponse(format!("Leaderboard response is not JSON: {}", e))
        })?;
        Ok(entries_from_value(value))
    }

    async fn track_wallet(&self, request: &TrackRequest) -> Result<()> {
        let url = self.config.endpoint(TRACK_WALLET_PATH);
        debug!("Tracking wallet {} ({:?})", request.address, request.label);
        let response = self.send(self.client.post(&url).json(request), TRACK_WALLET_PATH).await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.bytes().await.unwrap_or_default();
            let err = error_from_body(status.as_u16(), &body);
            warn!("Tracking wallet {} was rejected: {}", request.address, err);
            return Err(err);
        }
        Ok(())
    }
}
