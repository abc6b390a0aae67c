//! Scenario domain types

use serde::{Deserialize, Serialize};

use crate::domain::job::JobStatus;

/// A named what-if variant of the city's transit data
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    pub id: i64,
    pub name: String,
    /// Username of the scenario's author
    pub created_by: String,
    #[serde(default)]
    pub description: Option<String>,
}

/// Scenario paired with the status of its most recent indicator job
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnnotatedScenario {
    #[serde(flatten)]
    pub scenario: Scenario,
    pub indicator_job_status: Option<JobStatus>,
}
