//! Indicator job domain types

use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};

/// One submitted indicator-calculation run
///
/// The client never mutates a job; it only reads snapshots of it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Job {
    pub id: i64,
    pub city_name: String,
    /// Scenario being calculated, absent for the baseline
    #[serde(default)]
    pub scenario: Option<i64>,
    #[serde(default = "JobStatus::unreported")]
    pub job_status: JobStatus,
    /// JSON text mapping period -> indicator -> cell status
    #[serde(default)]
    pub calculation_status: Option<String>,
}

impl Job {
    /// Whether no further status changes are expected for this job
    pub fn is_finished(&self) -> bool {
        self.job_status.is_terminal()
    }
}

/// Job status as reported by the backend
///
/// Unknown wire values are kept as [`JobStatus::Unrecognized`] instead of
/// failing the whole decode, and are treated as errors downstream. This
/// includes values that are not strings at all, which keep their JSON text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(into = "String")]
pub enum JobStatus {
    Queued,
    Processing,
    Complete,
    Error,
    Unrecognized(String),
}

impl JobStatus {
    /// Wire representation of this status
    pub fn as_str(&self) -> &str {
        match self {
            JobStatus::Queued => "queued",
            JobStatus::Processing => "processing",
            JobStatus::Complete => "complete",
            JobStatus::Error => "error",
            JobStatus::Unrecognized(raw) => raw,
        }
    }

    /// Status of a job whose record carries no `job_status` at all
    pub fn unreported() -> Self {
        JobStatus::Unrecognized("null".to_string())
    }

    /// `queued` and `processing` jobs are still moving; everything else is final.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, JobStatus::Queued | JobStatus::Processing)
    }
}

impl From<String> for JobStatus {
    fn from(value: String) -> Self {
        match value.as_str() {
            "queued" => JobStatus::Queued,
            "processing" => JobStatus::Processing,
            "complete" => JobStatus::Complete,
            "error" => JobStatus::Error,
            _ => JobStatus::Unrecognized(value),
        }
    }
}

impl<'de> Deserialize<'de> for JobStatus {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        match serde_json::Value::deserialize(deserializer)? {
            serde_json::Value::String(raw) => Ok(JobStatus::from(raw)),
            other => Ok(JobStatus::Unrecognized(other.to_string())),
        }
    }
}

impl From<&str> for JobStatus {
    fn from(value: &str) -> Self {
        JobStatus::from(value.to_string())
    }
}

impl From<JobStatus> for String {
    fn from(status: JobStatus) -> Self {
        match status {
            JobStatus::Unrecognized(raw) => raw,
            other => other.as_str().to_string(),
        }
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// State of a single (period, indicator) calculation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CellState {
    Queued,
    Processing,
    Complete,
    Error,
    #[serde(other)]
    Unknown,
}

/// Status entry for one cell of the calculation grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellStatus {
    pub status: CellState,
}

impl CellStatus {
    pub fn new(status: CellState) -> Self {
        Self { status }
    }
}

/// Period -> indicator -> status, in wire order
pub type PeriodStatuses = IndexMap<String, IndexMap<String, CellStatus>>;

/// Indicator -> period -> status, in first-seen order
pub type IndicatorStatuses = IndexMap<String, IndexMap<String, CellStatus>>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_job_status_round_trips_known_values() {
        for raw in ["queued", "processing", "complete", "error"] {
            let status: JobStatus = serde_json::from_str(&format!("\"{}\"", raw)).unwrap();
            assert_eq!(status.as_str(), raw);
            assert_eq!(serde_json::to_string(&status).unwrap(), format!("\"{}\"", raw));
        }
    }

    #[test]
    fn test_unrecognized_job_status_is_kept_and_terminal() {
        let status: JobStatus = serde_json::from_str("\"bogus\"").unwrap();
        assert_eq!(status, JobStatus::Unrecognized("bogus".to_string()));
        assert!(status.is_terminal());
    }

    #[test]
    fn test_non_string_job_status_is_unrecognized() {
        let job: Job =
            serde_json::from_str(r#"{"id": 3, "city_name": "Lagos", "job_status": null}"#)
                .unwrap();
        assert_eq!(job.job_status, JobStatus::Unrecognized("null".to_string()));
        assert!(job.is_finished());

        let job: Job =
            serde_json::from_str(r#"{"id": 3, "city_name": "Lagos", "job_status": 7}"#).unwrap();
        assert_eq!(job.job_status, JobStatus::Unrecognized("7".to_string()));
        assert!(job.is_finished());

        let job: Job = serde_json::from_str(r#"{"id": 3, "city_name": "Lagos"}"#).unwrap();
        assert_eq!(job.job_status, JobStatus::unreported());
    }

    #[test]
    fn test_terminal_statuses() {
        assert!(!JobStatus::Queued.is_terminal());
        assert!(!JobStatus::Processing.is_terminal());
        assert!(JobStatus::Complete.is_terminal());
        assert!(JobStatus::Error.is_terminal());
    }

    #[test]
    fn test_job_decodes_without_optional_fields() {
        let job: Job =
            serde_json::from_str(r#"{"id": 3, "city_name": "Lagos", "job_status": "queued"}"#)
                .unwrap();
        assert_eq!(job.scenario, None);
        assert_eq!(job.calculation_status, None);
        assert!(!job.is_finished());
    }

    #[test]
    fn test_unknown_cell_state() {
        let cell: CellStatus = serde_json::from_str(r#"{"status": "paused"}"#).unwrap();
        assert_eq!(cell.status, CellState::Unknown);
    }
}
