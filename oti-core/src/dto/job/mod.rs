//! Indicator job DTOs

use serde::{Deserialize, Serialize};

use crate::domain::job::JobStatus;

/// Error string the backend uses when required settings are missing
pub const INVALID_CONFIGURATION: &str = "Invalid configuration";

/// Request to submit a new indicator calculation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateJob {
    pub city_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scenario: Option<i64>,
}

impl CreateJob {
    /// Request a baseline calculation for a city
    pub fn for_city(city_name: impl Into<String>) -> Self {
        Self {
            city_name: city_name.into(),
            scenario: None,
        }
    }

    pub fn with_scenario(mut self, scenario: i64) -> Self {
        self.scenario = Some(scenario);
        self
    }
}

/// Entry of the per-user job list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobSummary {
    pub id: i64,
    #[serde(default)]
    pub scenario: Option<i64>,
    pub job_status: JobStatus,
}

/// Structured error body returned on a rejected request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
    /// Offending configuration keys, when `error` is [`INVALID_CONFIGURATION`]
    #[serde(default)]
    pub items: Vec<String>,
}

impl ErrorBody {
    /// Missing configuration keys, if this is an invalid-configuration error
    pub fn missing_configuration(&self) -> Option<&[String]> {
        (self.error == INVALID_CONFIGURATION).then_some(self.items.as_slice())
    }
}
