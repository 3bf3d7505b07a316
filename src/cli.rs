use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::config::BACKEND_URL_ENV;
use crate::models::{ChartTimeframe, IndicatorTimeframe, LeaderboardSort, LeaderboardWindow};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to the configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Base URL of the analytics backend, overrides the configuration file
    #[arg(long, env = BACKEND_URL_ENV)]
    pub backend_url: Option<String>,

    /// Enable debug logging
    #[arg(short, long)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Score a token by address, name or symbol
    Analyze { query: String },

    /// Upload a chart screenshot and print the suggested trade plan
    Chart {
        file: PathBuf,
        #[arg(short, long, default_value_t = ChartTimeframe::default())]
        timeframe: ChartTimeframe,
        #[arg(short, long)]
        notes: Option<String>,
    },

    /// MACD series and crossover signals for a token mint
    Macd {
        query: String,
        #[arg(short, long, default_value_t = IndicatorTimeframe::default())]
        timeframe: IndicatorTimeframe,
    },

    /// Ranked wallets for a time window
    Leaderboard {
        #[arg(short, long, default_value_t = LeaderboardWindow::default())]
        window: LeaderboardWindow,
        #[arg(short, long, default_value_t = LeaderboardSort::default())]
        sort: LeaderboardSort,
    },

    /// Start tracking a wallet, then print the refreshed leaderboard
    Track {
        address: String,
        #[arg(short, long)]
        label: Option<String>,
        #[arg(short, long, default_value_t = LeaderboardWindow::default())]
        window: LeaderboardWindow,
        #[arg(short, long, default_value_t = LeaderboardSort::default())]
        sort: LeaderboardSort,
    },
}
