use log::{info, warn};
use std::fmt;
use std::sync::Arc;

use crate::api::Backend;
use crate::dashboard::controller::{RequestController, RequestState};
use crate::error::Result;
use crate::models::{LeaderboardEntry, LeaderboardSort, LeaderboardWindow, TrackRequest};
use crate::utils::format::{format_ratio_percent, format_usd};
use crate::validation::validate_wallet_address;

pub const LEADERBOARD_FAILURE: &str = "Failed to load leaderboard";

const PNL_DECIMALS: usize = 4;

#[derive(Debug, Clone, PartialEq)]
pub struct LeaderboardRow {
    pub rank: usize,
    pub wallet: String,
    pub pnl: String,
    pub hit_rate: String,
    pub trades: u64,
}

impl LeaderboardRow {
    fn new(rank: usize, entry: &LeaderboardEntry) -> Self {
        let wallet = match entry.label.as_deref().filter(|l| !l.is_empty()) {
            Some(label) => format!("{} · {}", label, entry.address),
            None => entry.address.clone(),
        };
        Self {
            rank,
            wallet,
            pnl: format_usd(entry.pnl_usd, PNL_DECIMALS),
            hit_rate: format_ratio_percent(entry.hit_rate),
            trades: entry.trades,
        }
    }
}

impl fmt::Display for LeaderboardRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:>3}  {:<56} {:>14} {:>5} {:>6}",
            self.rank, self.wallet, self.pnl, self.hit_rate, self.trades
        )
    }
}

/// Server-ordered wallet leaderboard plus the "track a wallet" form.
///
/// Entries are replaced wholesale on every refresh and never re-sorted locally; the rank of
/// an entry is its position in the backend's response. Changing the window or the sort
/// refetches once, setting the current value does nothing.
pub struct LeaderboardStore {
    backend: Arc<dyn Backend>,
    window: LeaderboardWindow,
    sort: LeaderboardSort,
    entries: RequestController<Vec<LeaderboardEntry>>,
    tracking: RequestController<()>,
    draft_address: String,
    draft_label: String,
}

impl LeaderboardStore {
    pub fn new(backend: Arc<dyn Backend>) -> Self {
        Self::with_params(backend, LeaderboardWindow::default(), LeaderboardSort::default())
    }

    /// Starts on the given window and sort without fetching anything.
    pub fn with_params(backend: Arc<dyn Backend>, window: LeaderboardWindow, sort: LeaderboardSort) -> Self {
        Self {
            backend,
            window,
            sort,
            entries: RequestController::new(),
            tracking: RequestController::new(),
            draft_address: String::new(),
            draft_label: String::new(),
        }
    }

    pub fn window(&self) -> LeaderboardWindow {
        self.window
    }

    pub fn sort(&self) -> LeaderboardSort {
        self.sort
    }

    pub async fn refresh(&self) -> Result<Vec<LeaderboardEntry>> {
        self.entries
            .run_with_message(self.backend.leaderboard(self.window, self.sort), |_| {
                LEADERBOARD_FAILURE.to_string()
            })
            .await
    }

    /// Returns `None` when `window` is already selected and nothing was fetched.
    pub async fn set_window(&mut self, window: LeaderboardWindow) -> Option<Result<Vec<LeaderboardEntry>>> {
        if self.window == window {
            return None;
        }
        self.window = window;
        Some(self.refresh().await)
    }

    /// Returns `None` when `sort` is already selected and nothing was fetched.
    pub async fn set_sort(&mut self, sort: LeaderboardSort) -> Option<Result<Vec<LeaderboardEntry>>> {
        if self.sort == sort {
            return None;
        }
        self.sort = sort;
        Some(self.refresh().await)
    }

    pub fn set_draft_address(&mut self, address: impl Into<String>) {
        self.draft_address = address.into();
    }

    pub fn set_draft_label(&mut self, label: impl Into<String>) {
        self.draft_label = label.into();
    }

    pub fn draft_address(&self) -> &str {
        &self.draft_address
    }

    pub fn draft_label(&self) -> &str {
        &self.draft_label
    }

    pub fn can_track(&self) -> bool {
        !self.draft_address.trim().is_empty() && !self.tracking.is_pending()
    }

    /// Submits the drafted wallet. Once the backend has been asked, the drafts are cleared
    /// and the leaderboard is refreshed whether or not tracking succeeded.
    pub async fn track(&mut self) -> Result<()> {
        let request = match validate_wallet_address(&self.draft_address) {
            Ok(address) => TrackRequest::new(address, Some(self.draft_label.trim().to_string())),
            Err(err) => return Err(self.tracking.reject(err)),
        };

        let outcome = self.tracking.run(self.backend.track_wallet(&request)).await;
        match &outcome {
            Ok(()) => info!("Tracking wallet {}", request.address),
            Err(err) => warn!("Failed to track wallet {}: {}", request.address, err),
        }

        self.draft_address.clear();
        self.draft_label.clear();
        if let Err(err) = self.refresh().await {
            warn!("Leaderboard refresh after tracking failed: {}", err);
        }
        outcome
    }

    pub fn state(&self) -> RequestState<Vec<LeaderboardEntry>> {
        self.entries.state()
    }

    pub fn tracking_state(&self) -> RequestState<()> {
        self.tracking.state()
    }

    pub fn controller(&self) -> &RequestController<Vec<LeaderboardEntry>> {
        &self.entries
    }

    /// Entries of the last successful refresh, empty otherwise.
    pub fn entries(&self) -> Vec<LeaderboardEntry> {
        self.entries.data().unwrap_or_default()
    }

    pub fn rows(&self) -> Vec<LeaderboardRow> {
        self.entries.with_state(|state| {
            state
                .data()
                .map(|entries| {
                    entries
                        .iter()
                        .enumerate()
                        .map(|(i, entry)| LeaderboardRow::new(i + 1, entry))
                        .collect()
                })
                .unwrap_or_default()
        })
    }
}
