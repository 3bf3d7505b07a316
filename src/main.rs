use anyhow::{Context, Result};
use clap::Parser;
use log::{info, warn};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use token_dashboard::api::{Backend, HttpBackend};
use token_dashboard::cli::{Cli, Command};
use token_dashboard::config::Config;
use token_dashboard::dashboard::{
    ChartAnalyzer, LeaderboardStore, MacdMonitor, RequestState, TokenAnalyzer,
};
use token_dashboard::logging;
use token_dashboard::models::ChartImage;

const DEFAULT_CONFIG_PATH: &str = "config/config.toml";

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = load_config(cli.config.as_deref())?.apply_env_overrides();
    if let Some(url) = &cli.backend_url {
        config.backend.base_url = url.clone();
    }
    config.validate()?;

    logging::init(&config.logging, cli.debug)?;
    info!("Using backend at {}", config.backend.base_url);

    let backend: Arc<dyn Backend> = Arc::new(HttpBackend::new(config.backend.clone())?);

    match cli.command {
        Command::Analyze { query } => {
            let mut analyzer = TokenAnalyzer::new(backend);
            analyzer.set_query(query);
            let _ = analyzer.submit().await;
            print_state(analyzer.view())
        }
        Command::Chart { file, timeframe, notes } => {
            let mut analyzer = ChartAnalyzer::new(backend);
            let image = ChartImage::from_path(&file)
                .await
                .with_context(|| format!("Failed to read chart image {:?}", file))?;
            analyzer.set_file(Some(image));
            analyzer.set_timeframe(timeframe);
            analyzer.set_notes(notes.unwrap_or_default());
            let _ = analyzer.submit().await;
            print_state(analyzer.view())
        }
        Command::Macd { query, timeframe } => {
            let mut monitor = MacdMonitor::new(backend);
            monitor.set_query(query);
            monitor.set_timeframe(timeframe);
            let _ = monitor.submit().await;
            print_state(monitor.view())
        }
        Command::Leaderboard { window, sort } => {
            let store = LeaderboardStore::with_params(backend, window, sort);
            let _ = store.refresh().await;
            print_leaderboard(&store)
        }
        Command::Track { address, label, window, sort } => {
            let mut store = LeaderboardStore::with_params(backend, window, sort);
            store.set_draft_address(address);
            store.set_draft_label(label.unwrap_or_default());
            if let Err(e) = store.track().await {
                warn!("Wallet was not tracked: {}", e);
                eprintln!("Tracking failed: {}", e.user_message());
            }
            print_leaderboard(&store)
        }
    }
}

fn load_config(path: Option<&Path>) -> Result<Config> {
    match path {
        Some(path) => Config::load(path)
            .with_context(|| format!("Failed to load configuration from {:?}", path)),
        None => {
            let default_path = PathBuf::from(DEFAULT_CONFIG_PATH);
            if default_path.exists() {
                Config::load(&default_path)
                    .with_context(|| format!("Failed to load configuration from {:?}", default_path))
            } else {
                Ok(Config::default())
            }
        }
    }
}

fn print_state<T: std::fmt::Display>(state: RequestState<T>) -> Result<()> {
    match state {
        RequestState::Succeeded(report) => {
            print!("{}", report);
            Ok(())
        }
        RequestState::Failed(message) => anyhow::bail!("{}", message),
        RequestState::Idle | RequestState::Pending => anyhow::bail!("No result"),
    }
}

fn print_leaderboard(store: &LeaderboardStore) -> Result<()> {
    if let Some(message) = store.controller().error() {
        anyhow::bail!("{}", message);
    }
    println!(
        "Window: {}  Sort: {}",
        store.window().label(),
        store.sort().label()
    );
    let rows = store.rows();
    if rows.is_empty() {
        println!("No wallets yet");
    }
    for row in rows {
        println!("{}", row);
    }
    Ok(())
}
