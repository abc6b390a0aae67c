//! Scripted in-memory [`JobApi`] for scheduler tests

use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use oti_client::{ClientError, JobApi, Result};
use oti_core::domain::job::{Job, JobStatus};
use oti_core::dto::job::{CreateJob, JobSummary};

/// One scripted answer to `latest_job`
#[derive(Debug, Clone)]
pub enum Step {
    Job(Job),
    Fail,
    /// The backend has no job to report
    Missing,
}

impl Step {
    pub fn job(id: i64, status: &str) -> Self {
        Step::Job(FakeJobApi::job(id, status))
    }
}

/// Answers `latest_job` from a script, repeating the last step once exhausted
pub struct FakeJobApi {
    script: Vec<Step>,
    fetches: AtomicUsize,
    delay: Option<Duration>,
    submit_result: Mutex<Option<Result<Job>>>,
    submitted: Mutex<Vec<CreateJob>>,
    jobs: Mutex<Vec<JobSummary>>,
    job_list_fetches: AtomicUsize,
}

impl FakeJobApi {
    pub fn new(script: Vec<Step>) -> Self {
        Self {
            script,
            fetches: AtomicUsize::new(0),
            delay: None,
            submit_result: Mutex::new(None),
            submitted: Mutex::new(Vec::new()),
            jobs: Mutex::new(Vec::new()),
            job_list_fetches: AtomicUsize::new(0),
        }
    }

    pub fn job(id: i64, status: &str) -> Job {
        Job {
            id,
            city_name: "Accra".to_string(),
            scenario: None,
            job_status: JobStatus::from(status),
            calculation_status: Some(
                r#"{"am": {"coverage": {"status": "complete"}, "fare": {"status": "queued"}}}"#
                    .to_string(),
            ),
        }
    }

    /// Make every `latest_job` call take `delay` before answering
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn with_submit(self, result: Result<Job>) -> Self {
        *self.submit_result.lock().unwrap() = Some(result);
        self
    }

    pub fn with_jobs(self, jobs: Vec<JobSummary>) -> Self {
        self.set_jobs(jobs);
        self
    }

    pub fn set_jobs(&self, jobs: Vec<JobSummary>) {
        *self.jobs.lock().unwrap() = jobs;
    }

    pub fn fetches(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }

    pub fn job_list_fetches(&self) -> usize {
        self.job_list_fetches.load(Ordering::SeqCst)
    }

    pub fn submitted(&self) -> Vec<CreateJob> {
        self.submitted.lock().unwrap().clone()
    }
}

#[async_trait]
impl JobApi for FakeJobApi {
    async fn latest_job(&self) -> Result<Job> {
        let index = self.fetches.fetch_add(1, Ordering::SeqCst);

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        let step = self
            .script
            .get(index)
            .or_else(|| self.script.last())
            .cloned()
            .unwrap_or(Step::Fail);

        match step {
            Step::Job(job) => Ok(job),
            Step::Fail => Err(ClientError::api_error(503, "unavailable")),
            Step::Missing => Err(ClientError::api_error(404, "no indicator jobs")),
        }
    }

    async fn submit_job(&self, req: CreateJob) -> Result<Job> {
        self.submitted.lock().unwrap().push(req);
        self.submit_result
            .lock()
            .unwrap()
            .take()
            .unwrap_or_else(|| Err(ClientError::api_error(500, "no scripted submission")))
    }

    async fn list_jobs_for_user(&self, _user_id: i64) -> Result<Vec<JobSummary>> {
        self.job_list_fetches.fetch_add(1, Ordering::SeqCst);
        Ok(self.jobs.lock().unwrap().clone())
    }
}
