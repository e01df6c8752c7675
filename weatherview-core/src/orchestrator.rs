//! Drives fetches and owns the one [`FetchState`] the display reads.
//!
//! Policy for overlapping submissions is "latest wins": every submission
//! switches the state to `Loading` straight away and takes a ticket; a
//! completed fetch is applied only if its ticket is still the newest one.
//! Superseded requests are not aborted, their results are just dropped.

use std::sync::{
    Arc,
    atomic::{AtomicU64, Ordering},
};

use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::{
    model::{FetchState, Location},
    provider::WeatherProvider,
};

#[derive(Debug)]
pub struct FetchOrchestrator {
    provider: Arc<dyn WeatherProvider>,
    state: watch::Sender<FetchState>,
    latest: AtomicU64,
}

impl FetchOrchestrator {
    pub fn new(provider: Arc<dyn WeatherProvider>) -> Self {
        let (state, _) = watch::channel(FetchState::Idle);
        Self { provider, state, latest: AtomicU64::new(0) }
    }

    pub fn provider(&self) -> &Arc<dyn WeatherProvider> {
        &self.provider
    }

    /// Snapshot of the current state.
    pub fn state(&self) -> FetchState {
        self.state.borrow().clone()
    }

    /// Receiver notified on every state transition.
    pub fn subscribe(&self) -> watch::Receiver<FetchState> {
        self.state.subscribe()
    }

    /// Initial fetch for the start-up location, no user action required.
    pub async fn initialize(&self, default_location: &str) -> bool {
        self.submit_input(default_location).await
    }

    /// Resolve raw user input and fetch it. Resolution errors become
    /// `Failure` without touching the network.
    pub async fn submit_input(&self, input: &str) -> bool {
        match self.provider.resolver().resolve(input) {
            Ok(location) => self.submit(location).await,
            Err(err) => {
                warn!(input, error = %err, "could not resolve location");
                self.state.send_modify(|state| {
                    self.latest.fetch_add(1, Ordering::SeqCst);
                    *state = FetchState::Failure(err.to_string());
                });
                true
            }
        }
    }

    /// Fetch weather for `location`. Returns `false` when a newer submission
    /// superseded this one and its outcome was discarded.
    pub async fn submit(&self, location: Location) -> bool {
        let ticket = self.begin();
        info!(ticket, location = location.label(), "fetching weather");

        let next = match self.provider.fetch_weather(&location).await {
            Ok(record) => FetchState::Success(record),
            Err(err) => {
                warn!(ticket, error = %err, "weather fetch failed");
                FetchState::Failure(err.to_string())
            }
        };

        self.settle(ticket, next)
    }

    fn begin(&self) -> u64 {
        let mut ticket = 0;
        self.state.send_modify(|state| {
            ticket = self.latest.fetch_add(1, Ordering::SeqCst) + 1;
            *state = FetchState::Loading;
        });
        ticket
    }

    // Runs under the channel's write lock, so it cannot interleave with `begin`.
    fn settle(&self, ticket: u64, next: FetchState) -> bool {
        self.state.send_if_modified(|state| {
            if self.latest.load(Ordering::SeqCst) != ticket {
                debug!(ticket, "discarding stale response");
                return false;
            }
            *state = next;
            true
        })
    }
}
