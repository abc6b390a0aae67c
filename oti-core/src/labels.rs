//! Display labels
//!
//! Labels are translation keys for the front end, never translated text.

use std::fmt;

use serde::Serialize;
use tracing::warn;

use crate::domain::job::JobStatus;

/// Configuration keys the backend may report as missing, with their labels
const CONFIG_PARAM_LABELS: &[(&str, &str)] = &[
    ("poverty_line", "SETTINGS.POVERTY_LINE"),
    ("nearby_buffer_distance_m", "SETTINGS.DISTANCE_BUFFER"),
    ("max_commute_time_s", "SETTINGS.JOB_TRAVEL_TIME"),
    ("arrive_by_time_s", "SETTINGS.JOB_ARRIVE_BY_TIME"),
    ("avg_fare", "SETTINGS.AVG_FARE"),
    ("osm_data", "CALCULATION.OSM_DATA"),
];

/// Message key shown above the list of missing settings
pub const NOT_CONFIGURED: &str = "CALCULATION.NOT_CONFIGURED";

/// Label for a configuration key, or the key itself when unknown
pub fn config_param_label(key: &str) -> &str {
    CONFIG_PARAM_LABELS
        .iter()
        .find(|(known, _)| *known == key)
        .map(|(_, label)| *label)
        .unwrap_or(key)
}

/// Labels for every missing configuration key, in the order reported
pub fn missing_settings<S: AsRef<str>>(items: &[S]) -> Vec<String> {
    items
        .iter()
        .map(|item| config_param_label(item.as_ref()).to_string())
        .collect()
}

/// Job status as presented to the user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DisplayStatus {
    Processing,
    Queued,
    Complete,
    Failed,
}

impl DisplayStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            DisplayStatus::Processing => "PROCESSING",
            DisplayStatus::Queued => "QUEUED",
            DisplayStatus::Complete => "COMPLETE",
            DisplayStatus::Failed => "FAILED",
        }
    }

    /// Translation key, e.g. `STATUS.PROCESSING`
    pub fn translation_key(&self) -> String {
        format!("STATUS.{}", self.as_str())
    }
}

impl fmt::Display for DisplayStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Map a job status onto its display label
///
/// Unrecognized statuses show as failed and are logged so the anomaly can be
/// found later.
pub fn display_status(status: &JobStatus) -> DisplayStatus {
    match status {
        JobStatus::Processing => DisplayStatus::Processing,
        JobStatus::Queued => DisplayStatus::Queued,
        JobStatus::Complete => DisplayStatus::Complete,
        JobStatus::Error => DisplayStatus::Failed,
        JobStatus::Unrecognized(raw) => {
            warn!(job_status = %raw, "Unrecognized job status, displaying as failed");
            DisplayStatus::Failed
        }
    }
}
