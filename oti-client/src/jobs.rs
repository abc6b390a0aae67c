//! Indicator job endpoints

use crate::IndicatorsClient;
use crate::error::{ClientError, Result};
use oti_core::domain::job::Job;
use oti_core::dto::job::{CreateJob, JobSummary};
use oti_core::view::latest_job;
use serde::Deserialize;

/// Body of the latest-job endpoint
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum LatestResponse {
    One(Job),
    Many(Vec<Job>),
}

impl LatestResponse {
    fn into_job(self) -> Result<Job> {
        match self {
            LatestResponse::One(job) => Ok(job),
            LatestResponse::Many(jobs) => latest_job(&jobs)
                .cloned()
                .ok_or_else(|| ClientError::NotFound("no indicator jobs".to_string())),
        }
    }
}

impl IndicatorsClient {
    // =============================================================================
    // Job Lifecycle
    // =============================================================================

    /// Fetch the most recent indicator job
    ///
    /// The endpoint normally answers with a single job. If it answers with a
    /// list, the job with the highest id is taken.
    ///
    /// # Returns
    /// The latest job for the current city
    pub async fn latest_job(&self) -> Result<Job> {
        let url = format!("{}/api/indicator-jobs/latest/", self.base_url);
        let response = self.client.get(&url).send().await?;

        let latest: LatestResponse = self.handle_response(response).await?;
        latest.into_job()
    }

    /// Submit a new indicator calculation
    ///
    /// # Arguments
    /// * `req` - City (and optional scenario) to calculate
    ///
    /// # Returns
    /// The created job. Fails with
    /// [`ClientError::InvalidConfiguration`](crate::ClientError::InvalidConfiguration)
    /// when the backend is missing required settings.
    ///
    /// # Example
    /// ```no_run
    /// # use oti_client::IndicatorsClient;
    /// # use oti_core::dto::job::CreateJob;
    /// # async fn example() -> anyhow::Result<()> {
    /// let client = IndicatorsClient::new("http://localhost:8000");
    /// let job = client.submit_job(CreateJob::for_city("Accra").with_scenario(3)).await?;
    /// # Ok(())
    /// # }
    /// ```
    pub async fn submit_job(&self, req: CreateJob) -> Result<Job> {
        let url = format!("{}/api/indicator-jobs/", self.base_url);
        let response = self.client.post(&url).json(&req).send().await?;

        self.handle_response(response).await
    }

    /// List every job visible to a user
    ///
    /// # Arguments
    /// * `user_id` - Id of the user who created the jobs
    pub async fn list_jobs_for_user(&self, user_id: i64) -> Result<Vec<JobSummary>> {
        let url = format!("{}/api/indicator-jobs/", self.base_url);
        let response = self
            .client
            .get(&url)
            .query(&[("created_by", user_id)])
            .send()
            .await?;

        self.handle_response(response).await
    }
}
