//! Job status poller
//!
//! Keeps an up-to-date view of the latest indicator job. While the job is
//! queued or processing it is re-fetched on a fixed interval; once it is
//! complete, failed or unrecognized polling stops.
//!
//! State is published through a [`watch`] channel owned by the poller. Each
//! poll cycle runs as a single spawned task under its own cancellation token,
//! so restarting or shutting down never leaves a second timer chain behind.

use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use chrono::{DateTime, Utc};
use oti_client::{ClientError, JobApi};
use oti_core::domain::job::{Job, JobStatus};
use oti_core::dto::job::CreateJob;
use oti_core::labels::missing_settings;
use oti_core::view::{StatusView, record_completed};
use thiserror::Error;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Where the poller is in its fetch/wait cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PollPhase {
    /// Not started, or reset by a submission
    #[default]
    Idle,
    /// A request for the latest job is in flight
    Fetching,
    /// Waiting for the next poll
    Scheduled,
    /// The job is finished; no more polls
    Settled,
}

/// Snapshot published to subscribers after every transition
#[derive(Debug, Clone, Default)]
pub struct PollerState {
    pub phase: PollPhase,
    /// False until the first successful fetch since start or submission
    pub status_fetched: bool,
    pub view: Option<StatusView>,
    /// Latest completed job per city and scenario
    pub completed: Vec<Job>,
    pub last_fetched_at: Option<DateTime<Utc>>,
}

/// Why a job submission was not accepted
#[derive(Debug, Error)]
pub enum SubmitError {
    /// Required settings are missing; `settings` holds their display labels
    #[error("Calculation settings are incomplete: {}", settings.join(", "))]
    NotConfigured { settings: Vec<String> },

    #[error(transparent)]
    Client(#[from] ClientError),
}

struct Cycle {
    cancel: CancellationToken,
    handle: JoinHandle<()>,
}

/// Polls the latest job and republishes its view model
pub struct JobStatusPoller {
    api: Arc<dyn JobApi>,
    interval: Duration,
    state: Arc<watch::Sender<PollerState>>,
    shutdown: CancellationToken,
    cycle: Mutex<Option<Cycle>>,
}

impl JobStatusPoller {
    /// Creates an idle poller; call [`start`](Self::start) to begin fetching
    pub fn new(api: Arc<dyn JobApi>, interval: Duration) -> Self {
        let (state, _) = watch::channel(PollerState::default());
        Self {
            api,
            interval,
            state: Arc::new(state),
            shutdown: CancellationToken::new(),
            cycle: Mutex::new(None),
        }
    }

    /// Receiver for every published state
    pub fn subscribe(&self) -> watch::Receiver<PollerState> {
        self.state.subscribe()
    }

    /// Copy of the current state
    pub fn current(&self) -> PollerState {
        self.state.borrow().clone()
    }

    /// Begin polling from a fresh fetch
    ///
    /// Any cycle already running is cancelled first.
    pub fn start(&self) {
        self.stop_cycle();
        self.spawn_cycle();
    }

    /// Submit a calculation for a city and restart polling from a clean slate
    ///
    /// An invalid-configuration rejection is turned into the labels of the
    /// missing settings so the caller can point the user at the configuration
    /// screen. Other failures are passed through.
    pub async fn submit_job(
        &self,
        city_name: impl Into<String>,
        scenario: Option<i64>,
    ) -> Result<Job, SubmitError> {
        let req = CreateJob {
            city_name: city_name.into(),
            scenario,
        };

        match self.api.submit_job(req).await {
            Ok(job) => {
                info!(job_id = job.id, city = %job.city_name, "Submitted indicator job");
                self.stop_cycle();
                self.state.send_modify(|state| {
                    state.phase = PollPhase::Idle;
                    state.status_fetched = false;
                    state.view = None;
                });
                self.spawn_cycle();
                Ok(job)
            }
            Err(ClientError::InvalidConfiguration { items }) => {
                warn!(missing = ?items, "Job rejected, configuration incomplete");
                Err(SubmitError::NotConfigured {
                    settings: missing_settings(&items),
                })
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Stop polling for good
    ///
    /// The pending timer and any in-flight fetch are cancelled; a response
    /// arriving afterwards is dropped.
    pub fn shutdown(&self) {
        self.shutdown.cancel();
        self.stop_cycle();
    }

    fn stop_cycle(&self) {
        let previous = self
            .cycle
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();

        if let Some(previous) = previous {
            previous.cancel.cancel();
            previous.handle.abort();
        }
    }

    fn spawn_cycle(&self) {
        if self.shutdown.is_cancelled() {
            debug!("Poller is shut down, not starting a new cycle");
            return;
        }

        let cancel = self.shutdown.child_token();
        let handle = tokio::spawn(run_cycle(
            Arc::clone(&self.api),
            self.interval,
            Arc::clone(&self.state),
            cancel.clone(),
        ));

        let mut cycle = self.cycle.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(previous) = cycle.replace(Cycle { cancel, handle }) {
            previous.cancel.cancel();
            previous.handle.abort();
        }
    }
}

impl Drop for JobStatusPoller {
    fn drop(&mut self) {
        self.shutdown();
    }
}

/// Apply `update` unless the cycle has been cancelled
///
/// The check runs under the channel lock, so a cancelled cycle can never
/// overwrite a reset made after its cancellation.
fn publish(
    state: &watch::Sender<PollerState>,
    cancel: &CancellationToken,
    update: impl FnOnce(&mut PollerState),
) -> bool {
    state.send_if_modified(|current| {
        if cancel.is_cancelled() {
            return false;
        }
        update(current);
        true
    })
}

async fn run_cycle(
    api: Arc<dyn JobApi>,
    interval: Duration,
    state: Arc<watch::Sender<PollerState>>,
    cancel: CancellationToken,
) {
    loop {
        if !publish(&state, &cancel, |s| s.phase = PollPhase::Fetching) {
            return;
        }

        let fetched = tokio::select! {
            _ = cancel.cancelled() => {
                debug!("Poll cycle cancelled while fetching");
                return;
            }
            result = api.latest_job() => result,
        };

        let seen_job = state.borrow().status_fetched;

        match fetched {
            Ok(job) => {
                let finished = job.is_finished();
                if !finished {
                    debug!(job_id = job.id, status = %job.job_status, "Job still running");
                }

                let view = StatusView::from_job(job.clone());
                let applied = publish(&state, &cancel, |s| {
                    if job.job_status == JobStatus::Complete {
                        record_completed(&mut s.completed, &job);
                    }
                    s.view = Some(view);
                    s.status_fetched = true;
                    s.last_fetched_at = Some(Utc::now());
                    s.phase = if finished {
                        PollPhase::Settled
                    } else {
                        PollPhase::Scheduled
                    };
                });

                if !applied {
                    return;
                }
                if finished {
                    info!(
                        job_id = job.id,
                        status = %job.job_status,
                        "Job finished, polling stopped"
                    );
                    return;
                }
            }
            Err(e) if e.is_not_found() && !seen_job => {
                info!("No indicator job exists yet, polling stopped");
                publish(&state, &cancel, |s| s.phase = PollPhase::Settled);
                return;
            }
            Err(e) => {
                // Keep the last view; the next scheduled poll retries
                warn!(error = %e, "Failed to fetch latest job");
                if !publish(&state, &cancel, |s| s.phase = PollPhase::Scheduled) {
                    return;
                }
            }
        }

        tokio::select! {
            _ = cancel.cancelled() => {
                debug!("Poll cycle cancelled while waiting");
                return;
            }
            _ = tokio::time::sleep(interval) => {}
        }
    }
}
