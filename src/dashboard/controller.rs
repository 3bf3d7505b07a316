use log::debug;
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::watch;

use crate::error::{Error, Result};

/// Observable outcome of one asynchronous operation. Exactly one variant holds at a time.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum RequestState<T> {
    #[default]
    Idle,
    Pending,
    Failed(String),
    Succeeded(T),
}

impl<T> RequestState<T> {
    pub fn is_idle(&self) -> bool {
        matches!(self, RequestState::Idle)
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, RequestState::Pending)
    }

    pub fn data(&self) -> Option<&T> {
        match self {
            RequestState::Succeeded(data) => Some(data),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            RequestState::Failed(message) => Some(message),
            _ => None,
        }
    }

    /// Converts the success payload, e.g. into a render model.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> RequestState<U> {
        match self {
            RequestState::Idle => RequestState::Idle,
            RequestState::Pending => RequestState::Pending,
            RequestState::Failed(message) => RequestState::Failed(message),
            RequestState::Succeeded(data) => RequestState::Succeeded(f(data)),
        }
    }
}

/// Owns the [`RequestState`] of one widget and moves it through
/// `Idle/Failed/Succeeded -> Pending -> Succeeded | Failed`.
///
/// Every submission takes a ticket. When a newer submission (or [`cancel`](Self::cancel), or
/// [`reject`](Self::reject)) has happened by the time a response arrives, that response is
/// dropped and the state keeps reflecting the newer request.
#[derive(Debug)]
pub struct RequestController<T> {
    state: watch::Sender<RequestState<T>>,
    latest_ticket: AtomicU64,
}

impl<T> Default for RequestController<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> RequestController<T> {
    pub fn new() -> Self {
        let (state, _) = watch::channel(RequestState::Idle);
        Self {
            state,
            latest_ticket: AtomicU64::new(0),
        }
    }

    /// Receiver notified on every transition.
    pub fn subscribe(&self) -> watch::Receiver<RequestState<T>> {
        self.state.subscribe()
    }

    pub fn is_pending(&self) -> bool {
        self.state.borrow().is_pending()
    }

    pub fn error(&self) -> Option<String> {
        self.state.borrow().error().map(str::to_string)
    }

    /// Runs `f` against the current state without cloning it.
    pub fn with_state<R>(&self, f: impl FnOnce(&RequestState<T>) -> R) -> R {
        f(&self.state.borrow())
    }

    fn next_ticket(&self) -> u64 {
        self.latest_ticket.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Records a client-side failure without touching the network. Any in-flight request
    /// is superseded.
    pub fn reject(&self, err: Error) -> Error {
        self.next_ticket();
        debug!("Request rejected before sending: {}", err);
        self.state.send_replace(RequestState::Failed(err.user_message()));
        err
    }

    /// Supersedes the in-flight request, if any, and goes back to `Idle`.
    pub fn cancel(&self) {
        self.next_ticket();
        self.state.send_if_modified(|state| {
            if state.is_pending() {
                *state = RequestState::Idle;
                true
            } else {
                false
            }
        });
    }

    pub fn reset(&self) {
        self.next_ticket();
        self.state.send_replace(RequestState::Idle);
    }
}

impl<T: Clone> RequestController<T> {
    pub fn state(&self) -> RequestState<T> {
        self.state.borrow().clone()
    }

    pub fn data(&self) -> Option<T> {
        self.state.borrow().data().cloned()
    }

    /// Submits `request` and stores its outcome, using [`Error::user_message`] for failures.
    /// The outcome is also returned to the caller, even when it arrived too late to be stored.
    pub async fn run<F>(&self, request: F) -> Result<T>
    where
        F: Future<Output = Result<T>>,
    {
        self.run_with_message(request, Error::user_message).await
    }

    /// Like [`run`](Self::run) with a custom failure message.
    pub async fn run_with_message<F, M>(&self, request: F, message_for: M) -> Result<T>
    where
        F: Future<Output = Result<T>>,
        M: FnOnce(&Error) -> String,
    {
        let ticket = self.next_ticket();
        self.state.send_replace(RequestState::Pending);

        let outcome = request.await;

        let stored = self.state.send_if_modified(|state| {
            if self.latest_ticket.load(Ordering::SeqCst) != ticket {
                return false;
            }
            *state = match &outcome {
                Ok(data) => RequestState::Succeeded(data.clone()),
                Err(err) => RequestState::Failed(message_for(err)),
            };
            true
        });
        if !stored {
            debug!("Discarding stale response for request #{}", ticket);
        }

        outcome
    }
}
