//! Job API seam
//!
//! The poller only needs three calls from the backend. Keeping them behind a
//! trait lets it run against an in-memory fake in tests.

use async_trait::async_trait;
use oti_core::domain::job::Job;
use oti_core::dto::job::{CreateJob, JobSummary};

use crate::IndicatorsClient;
use crate::error::Result;

/// Job operations consumed by the status poller
#[async_trait]
pub trait JobApi: Send + Sync {
    /// Fetch the most recent job; must be free of side effects
    async fn latest_job(&self) -> Result<Job>;

    /// Submit a new calculation
    async fn submit_job(&self, req: CreateJob) -> Result<Job>;

    /// List all jobs created by a user
    async fn list_jobs_for_user(&self, user_id: i64) -> Result<Vec<JobSummary>>;
}

#[async_trait]
impl JobApi for IndicatorsClient {
    async fn latest_job(&self) -> Result<Job> {
        IndicatorsClient::latest_job(self).await
    }

    async fn submit_job(&self, req: CreateJob) -> Result<Job> {
        IndicatorsClient::submit_job(self, req).await
    }

    async fn list_jobs_for_user(&self, user_id: i64) -> Result<Vec<JobSummary>> {
        IndicatorsClient::list_jobs_for_user(self, user_id).await
    }
}
