#![allow(dead_code)]

use serde_json::{json, Value};
use std::sync::Arc;
use token_dashboard::api::{Backend, HttpBackend};
use token_dashboard::config::BackendConfig;
use wiremock::MockServer;

/// Backend pointed at a fresh mock server. The server must outlive the backend's requests.
pub async fn mock_backend() -> (MockServer, Arc<dyn Backend>) {
    let server = MockServer::start().await;
    let backend = HttpBackend::new(BackendConfig::new(server.uri())).expect("client builds");
    (server, Arc::new(backend))
}

pub fn bonk_analysis() -> Value {
    json!({
        "token_address": "DezXAZ8z7PnrnRJjz3wXBoRgixCa6xjnB7YaB1pPB263",
        "name": "Bonk",
        "symbol": "BONK",
        "score": 82.7,
        "verdict": "Healthy",
        "metrics": {
            "liquidity_usd": 1234567,
            "volume_h24": "2500000",
            "price_change_h24": -4.2,
            "pair_created_at": "2023-11-14T22:13:20Z"
        }
    })
}

pub fn chart_plan() -> Value {
    json!({
        "timeframe": "1h",
        "trend": "down",
        "momentum": "weak",
        "confidence": 0.81,
        "trade": {"side": "short", "risk_reward": 1.8},
        "key_levels": {
            "entry_offset_pct": 0.25,
            "stop_offset_pct": 1.5,
            "tp1_offset_pct": -2,
            "tp2_offset_pct": "-3.5"
        }
    })
}

pub fn macd_series() -> Value {
    json!({
        "candles": [
            {"t": 1700000000, "c": 0.95},
            {"t": 1700014400, "c": 1.05},
            {"t": 1700028800, "c": 1.0}
        ],
        "macd": [0.01, 0.03, 0.02],
        "signal": [0.02, 0.02, 0.025],
        "histogram": [-0.01, 0.01, -0.005],
        "signals": [
            {"type": "bullish", "time": 1700000000},
            {"type": "bearish", "time": 1700003600}
        ],
        "confidence": 0.66
    })
}

pub fn leaderboard_entries() -> Value {
    json!([
        {"address": "7xKXtg2CW87d97TXJSDpbD5jBkheTqA83TZRuJosgAsU", "label": "whale", "pnl_usd": 15234.5, "hit_rate": 0.71, "trades": 42},
        {"address": "9WzDXwBbmkg8ZTbNMqUxvQRAyrZzDsGYdLVL9zYtAWWM", "pnl_usd": -120.5, "hit_rate": 0.4, "trades": 5}
    ])
}
