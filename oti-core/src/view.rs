//! View model assembly
//!
//! Builds the UI-ready summary of a job snapshot from the status aggregator.

use serde::Serialize;
use tracing::warn;

use crate::domain::job::{IndicatorStatuses, Job};
use crate::labels::{DisplayStatus, display_status};
use crate::status::{self, CellRef, Completion};

/// Everything a view needs to render the progress of one job
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatusView {
    pub job: Job,
    pub display_status: DisplayStatus,
    /// Periods in the order reported by the backend
    pub periods: Vec<String>,
    pub completion: Option<Completion>,
    pub currently_processing: Option<CellRef>,
    /// Indicator -> period -> status
    pub calculations: Option<IndicatorStatuses>,
}

impl StatusView {
    /// Assemble the view for a fetched job
    ///
    /// A job whose status text is missing or unreadable still produces a
    /// view; only the aggregate fields are left empty.
    pub fn from_job(job: Job) -> Self {
        let display_status = display_status(&job.job_status);

        let grid = match job.calculation_status.as_deref().map(status::decode) {
            Some(Ok(grid)) => grid,
            Some(Err(e)) => {
                warn!(job_id = job.id, error = %e, "Unreadable calculation status");
                None
            }
            None => None,
        };

        let (periods, completion, currently_processing, calculations) = match grid {
            Some(grid) => (
                grid.keys().cloned().collect(),
                Some(status::completion_ratio(&grid)),
                status::currently_processing(&grid),
                Some(status::transpose(&grid)),
            ),
            None => (Vec::new(), None, None, None),
        };

        Self {
            job,
            display_status,
            periods,
            completion,
            currently_processing,
            calculations,
        }
    }

    pub fn is_finished(&self) -> bool {
        self.job.is_finished()
    }
}

/// Most recent job by identifier
///
/// The backend order is not trusted; the highest id wins.
pub fn latest_job<'a, I>(jobs: I) -> Option<&'a Job>
where
    I: IntoIterator<Item = &'a Job>,
{
    jobs.into_iter().max_by_key(|job| job.id)
}

/// Record a completed job, replacing the previous one for the same city and scenario
pub fn record_completed(history: &mut Vec<Job>, job: &Job) {
    history.retain(|known| !(known.city_name == job.city_name && known.scenario == job.scenario));
    history.push(job.clone());
}
