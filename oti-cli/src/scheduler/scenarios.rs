//! Scenario job-status refresher
//!
//! Re-fetches a user's indicator jobs on a fixed interval and republishes
//! their scenarios, each annotated with the status of its most recent job.
//! Runs until its cancellation token fires.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use oti_client::JobApi;
use oti_core::domain::scenario::{AnnotatedScenario, Scenario};
use oti_core::scenarios::{annotate, paginate};
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Paged scenario list with job statuses
#[derive(Debug, Clone, Default)]
pub struct ScenarioBoard {
    pub pages: Vec<Vec<AnnotatedScenario>>,
    pub refreshed_at: Option<DateTime<Utc>>,
}

pub struct ScenarioJobRefresher {
    api: Arc<dyn JobApi>,
    user_id: i64,
    scenarios: Vec<Scenario>,
    interval: Duration,
    page_size: usize,
    state: watch::Sender<ScenarioBoard>,
}

impl ScenarioJobRefresher {
    pub fn new(
        api: Arc<dyn JobApi>,
        user_id: i64,
        scenarios: Vec<Scenario>,
        interval: Duration,
        page_size: usize,
    ) -> Self {
        let (state, _) = watch::channel(ScenarioBoard::default());
        Self {
            api,
            user_id,
            scenarios,
            interval,
            page_size,
            state,
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<ScenarioBoard> {
        self.state.subscribe()
    }

    /// Refresh immediately, then every interval, until `cancel` is triggered
    pub async fn run(&self, cancel: CancellationToken) {
        info!(
            user_id = self.user_id,
            scenarios = self.scenarios.len(),
            interval_secs = self.interval.as_secs(),
            "Scenario job refresher started"
        );

        let mut interval = tokio::time::interval(self.interval);

        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    info!("Scenario job refresher stopping");
                    break;
                }
                _ = interval.tick() => {
                    let jobs = tokio::select! {
                        _ = cancel.cancelled() => break,
                        jobs = self.api.list_jobs_for_user(self.user_id) => jobs,
                    };

                    match jobs {
                        Ok(jobs) => {
                            debug!(jobs = jobs.len(), "Refreshed scenario job statuses");
                            let annotated = annotate(self.scenarios.clone(), &jobs);
                            self.state.send_replace(ScenarioBoard {
                                pages: paginate(&annotated, self.page_size),
                                refreshed_at: Some(Utc::now()),
                            });
                        }
                        Err(e) => {
                            warn!(error = %e, "Failed to refresh scenario job statuses");
                        }
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scheduler::fake::FakeJobApi;
    use oti_core::domain::job::JobStatus;
    use oti_core::dto::job::JobSummary;

    fn scenarios(count: i64) -> Vec<Scenario> {
        (1..=count)
            .map(|id| Scenario {
                id,
                name: format!("Scenario {}", id),
                created_by: "ana".to_string(),
                description: None,
            })
            .collect()
    }

    fn summary(id: i64, scenario: i64, status: JobStatus) -> JobSummary {
        JobSummary {
            id,
            scenario: Some(scenario),
            job_status: status,
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_refresh_annotates_and_pages() {
        let api = Arc::new(FakeJobApi::new(vec![]).with_jobs(vec![
            summary(1, 2, JobStatus::Error),
            summary(3, 2, JobStatus::Processing),
        ]));
        let refresher = Arc::new(ScenarioJobRefresher::new(
            api.clone(),
            7,
            scenarios(6),
            Duration::from_secs(10),
            5,
        ));
        let mut board = refresher.subscribe();
        let cancel = CancellationToken::new();

        let task = tokio::spawn({
            let refresher = Arc::clone(&refresher);
            let cancel = cancel.clone();
            async move { refresher.run(cancel).await }
        });

        board.changed().await.unwrap();
        {
            let current = board.borrow_and_update();
            assert_eq!(current.pages.len(), 2);
            assert_eq!(current.pages[1].len(), 1);
            assert_eq!(
                current.pages[0][1].indicator_job_status,
                Some(JobStatus::Processing)
            );
            assert_eq!(current.pages[0][0].indicator_job_status, None);
        }

        api.set_jobs(vec![summary(9, 1, JobStatus::Complete)]);
        board.changed().await.unwrap();
        assert_eq!(
            board.borrow().pages[0][0].indicator_job_status,
            Some(JobStatus::Complete)
        );

        cancel.cancel();
        task.await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_stops_refreshing() {
        let api = Arc::new(FakeJobApi::new(vec![]));
        let refresher = Arc::new(ScenarioJobRefresher::new(
            api.clone(),
            7,
            scenarios(1),
            Duration::from_secs(10),
            5,
        ));
        let cancel = CancellationToken::new();

        let task = tokio::spawn({
            let refresher = Arc::clone(&refresher);
            let cancel = cancel.clone();
            async move { refresher.run(cancel).await }
        });

        tokio::time::sleep(Duration::from_secs(25)).await;
        assert_eq!(api.job_list_fetches(), 3);

        cancel.cancel();
        task.await.unwrap();

        tokio::time::sleep(Duration::from_secs(60)).await;
        assert_eq!(api.job_list_fetches(), 3);
    }
}
