//! The refresh cycle orchestrator.
//!
//! The [`Poller`] owns the working reading set and all derived state. It
//! fetches from a [`TelemetrySource`], normalizes the payload, and applies
//! the result atomically, re-running the alert evaluator over the newest
//! reading. Consumers only ever see read-only [`Snapshot`]s.
//!
//! # Overlapping cycles
//!
//! A timer-plus-async design admits overlapping fetches: a slow call can
//! finish after a faster, later one. Every `refresh()` invocation is tagged
//! with a monotonically increasing sequence number at dispatch, and a
//! completing fetch only applies its result when its number is the highest
//! completed so far. Stale completions are discarded, not cancelled.
//!
//! The automatic loop additionally skips a cycle while a fetch is still in
//! flight, so the sequence gate mainly protects manual refreshes racing the
//! timer.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use verdant_core::{FeedClient, Poller, PollerConfig};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = FeedClient::new("http://sensors.local/api/readings")?;
//! let poller = Arc::new(Poller::new(client, PollerConfig::default())?);
//!
//! let handle = poller.spawn();
//! let snapshot = poller.snapshot().await;
//! println!("{} readings", snapshot.readings.len());
//! handle.close();
//! # Ok(())
//! # }
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicU32, AtomicU64, Ordering};

use time::OffsetDateTime;
use tokio::sync::RwLock;
use tokio::time::interval;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use verdant_types::{Reading, SensorField};

use crate::alerts::Alert;
use crate::config::PollerConfig;
use crate::error::Result;
use crate::normalize::normalize;
use crate::snapshot::{FieldSummary, LastError, Snapshot};
use crate::source::TelemetrySource;
use crate::stats::field_stats;
use crate::trend::field_trend;

/// Outcome of one completed fetch, before the freshness gate.
enum CycleOutcome {
    /// A non-empty normalized batch ready to replace the working set.
    Batch(Vec<Reading>),
    /// Structurally valid but data-empty payload; nothing changes.
    Empty,
    /// The cycle failed; message recorded as last-error.
    Failure(String),
}

/// State mutated only at the completion of a refresh cycle.
struct EngineState {
    readings: Vec<Reading>,
    last_updated: Option<OffsetDateTime>,
    last_error: Option<LastError>,
    alerts: Vec<Alert>,
    alerts_visible: bool,
    /// Highest sequence number whose completion has been seen.
    completed_seq: u64,
}

impl EngineState {
    fn new() -> Self {
        Self {
            readings: Vec::new(),
            last_updated: None,
            last_error: None,
            alerts: Vec::new(),
            alerts_visible: false,
            completed_seq: 0,
        }
    }
}

/// Polls a telemetry source and maintains the derived engine state.
///
/// Wrap in an [`Arc`] and call [`spawn`](Self::spawn) for the automatic
/// cycle; [`refresh`](Self::refresh) is the manual/forced entry point and is
/// safe to call concurrently with the timer.
pub struct Poller<S> {
    source: S,
    config: PollerConfig,
    state: RwLock<EngineState>,
    /// Sequence number handed out at dispatch time.
    next_seq: AtomicU64,
    /// Number of fetches currently awaiting completion.
    in_flight: AtomicU32,
}

impl<S: TelemetrySource> Poller<S> {
    /// Create a poller over the given source.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::InvalidConfig`](crate::FetchError::InvalidConfig)
    /// when the configuration fails [`PollerConfig::validate`]; a zero
    /// interval or cap can therefore never reach the refresh cycle.
    pub fn new(source: S, config: PollerConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            source,
            config,
            state: RwLock::new(EngineState::new()),
            next_seq: AtomicU64::new(0),
            in_flight: AtomicU32::new(0),
        })
    }

    /// The configuration this poller runs with.
    pub fn config(&self) -> &PollerConfig {
        &self.config
    }

    /// Whether a fetch is currently in flight.
    pub fn fetch_in_flight(&self) -> bool {
        self.in_flight.load(Ordering::SeqCst) > 0
    }

    /// Run one refresh cycle.
    ///
    /// Never propagates an error past its own boundary: transport, protocol,
    /// and decode failures are recorded as last-error state and the previous
    /// working set stays available. A payload that normalizes to nothing is
    /// treated as "no data yet" and changes no state.
    pub async fn refresh(&self) {
        let seq = self.next_seq.fetch_add(1, Ordering::SeqCst) + 1;
        self.in_flight.fetch_add(1, Ordering::SeqCst);

        let outcome = match self.source.fetch().await {
            Ok(payload) => match normalize(&payload) {
                Ok(batch) if batch.is_empty() => CycleOutcome::Empty,
                Ok(batch) => CycleOutcome::Batch(batch),
                Err(e) => CycleOutcome::Failure(e.to_string()),
            },
            Err(e) => CycleOutcome::Failure(e.to_string()),
        };

        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        self.apply(seq, outcome).await;
    }

    /// Apply a completed cycle's outcome, discarding stale completions.
    async fn apply(&self, seq: u64, outcome: CycleOutcome) {
        let mut state = self.state.write().await;

        if seq <= state.completed_seq {
            debug!(seq, latest = state.completed_seq, "discarding stale fetch completion");
            return;
        }
        state.completed_seq = seq;

        match outcome {
            CycleOutcome::Failure(message) => {
                warn!(seq, %message, "refresh cycle failed");
                state.last_error = Some(LastError {
                    message,
                    at: OffsetDateTime::now_utc(),
                });
            }
            CycleOutcome::Empty => {
                debug!(seq, "payload held no readings, keeping previous state");
            }
            CycleOutcome::Batch(mut readings) => {
                readings.truncate(self.config.max_readings);
                debug!(seq, count = readings.len(), "applying new working set");

                // Safe to index: the Empty arm handled zero-length batches
                // and the cap is validated nonzero at construction.
                let alerts = self.config.thresholds.evaluate(&readings[0]);
                state.alerts_visible = !alerts.is_empty();
                state.alerts = alerts;
                state.readings = readings;
                state.last_error = None;
                state.last_updated = Some(OffsetDateTime::now_utc());
            }
        }
    }

    /// Take a read-only snapshot of the current engine state.
    pub async fn snapshot(&self) -> Snapshot {
        let state = self.state.read().await;

        let summaries = SensorField::ALL
            .into_iter()
            .map(|field| FieldSummary {
                field,
                stats: field_stats(field, &state.readings),
                trend: field_trend(field, &state.readings),
            })
            .collect();

        Snapshot {
            readings: state.readings.clone(),
            summaries,
            alerts: state.alerts.clone(),
            alerts_visible: state.alerts_visible,
            last_updated: state.last_updated,
            last_error: state.last_error.clone(),
        }
    }

    /// Hide the current alerts until the next evaluation produces any.
    ///
    /// Dismissal does not suppress future alerts; a later non-empty
    /// evaluation makes them visible again.
    pub async fn dismiss_alerts(&self) {
        let mut state = self.state.write().await;
        state.alerts_visible = false;
    }
}

impl<S: TelemetrySource + 'static> Poller<S> {
    /// Start the automatic refresh loop.
    ///
    /// Runs one refresh eagerly, then one per configured interval until the
    /// returned handle is closed or dropped. Cycles that would overlap a
    /// fetch still in flight are skipped.
    pub fn spawn(self: &Arc<Self>) -> PollerHandle {
        let poller = Arc::clone(self);
        let cancel_token = CancellationToken::new();
        let task_token = cancel_token.clone();

        let handle = tokio::spawn(async move {
            // The first tick fires immediately: the eager startup refresh.
            let mut ticker = interval(poller.config.poll_interval);

            loop {
                tokio::select! {
                    _ = task_token.cancelled() => {
                        debug!("poller cancelled, stopping gracefully");
                        break;
                    }
                    _ = ticker.tick() => {
                        if poller.fetch_in_flight() {
                            debug!("previous fetch still in flight, skipping cycle");
                            continue;
                        }
                        poller.refresh().await;
                    }
                }
            }
        });

        PollerHandle {
            handle,
            cancel_token,
        }
    }
}

/// Handle to a running poller loop.
///
/// Closing (or dropping) the handle cancels the loop, so discarding a view
/// never leaves a dangling timer behind.
pub struct PollerHandle {
    handle: tokio::task::JoinHandle<()>,
    cancel_token: CancellationToken,
}

impl PollerHandle {
    /// Stop the refresh loop gracefully.
    pub fn close(self) {
        self.cancel_token.cancel();
    }

    /// Get a token that can cancel the loop from elsewhere.
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel_token.clone()
    }

    /// Check if the loop is still running.
    pub fn is_active(&self) -> bool {
        !self.handle.is_finished()
    }
}

impl Drop for PollerHandle {
    fn drop(&mut self) {
        self.cancel_token.cancel();
    }
}
