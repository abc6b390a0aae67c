//! Scheduler layer for the monitor
//!
//! Timer-driven background work: polling the latest indicator job and
//! refreshing the job statuses shown next to scenarios. Each piece owns its
//! state and is torn down through a cancellation token.

pub mod poller;
pub mod scenarios;

#[cfg(test)]
mod fake;

pub use poller::{JobStatusPoller, PollPhase, PollerState, SubmitError};
pub use scenarios::{ScenarioBoard, ScenarioJobRefresher};
