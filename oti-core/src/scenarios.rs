//! Scenario list helpers

use std::collections::{HashMap, HashSet};

use crate::domain::job::JobStatus;
use crate::domain::scenario::{AnnotatedScenario, Scenario};
use crate::dto::job::JobSummary;

/// Scenarios listed per page
pub const DEFAULT_PAGE_SIZE: usize = 5;

/// Most recent job for each scenario, keyed by scenario id
///
/// The baseline is keyed by `None`. When a scenario has several jobs the one
/// with the highest id wins, whatever the order of `jobs`.
pub fn latest_by_scenario(jobs: &[JobSummary]) -> HashMap<Option<i64>, &JobSummary> {
    let mut latest: HashMap<Option<i64>, &JobSummary> = HashMap::new();
    for job in jobs {
        latest
            .entry(job.scenario)
            .and_modify(|current| {
                if job.id > current.id {
                    *current = job;
                }
            })
            .or_insert(job);
    }
    latest
}

/// Ids of the jobs that are the most recent for their scenario
pub fn latest_job_ids(jobs: &[JobSummary]) -> HashSet<i64> {
    latest_by_scenario(jobs).values().map(|job| job.id).collect()
}

/// Attach the status of each scenario's most recent job
///
/// Jobs are matched on scenario id. Baseline jobs are ignored.
pub fn annotate(scenarios: Vec<Scenario>, jobs: &[JobSummary]) -> Vec<AnnotatedScenario> {
    let latest = latest_by_scenario(jobs);

    scenarios
        .into_iter()
        .map(|scenario| {
            let indicator_job_status: Option<JobStatus> = latest
                .get(&Some(scenario.id))
                .map(|job| job.job_status.clone());
            AnnotatedScenario {
                scenario,
                indicator_job_status,
            }
        })
        .collect()
}

/// Split a list into pages of `page_size` items
///
/// A page size of zero is treated as one.
pub fn paginate<T: Clone>(items: &[T], page_size: usize) -> Vec<Vec<T>> {
    items
        .chunks(page_size.max(1))
        .map(|page| page.to_vec())
        .collect()
}

/// Scenarios authored by someone other than `username`
pub fn colleague_scenarios(scenarios: Vec<Scenario>, username: &str) -> Vec<Scenario> {
    scenarios
        .into_iter()
        .filter(|scenario| scenario.created_by != username)
        .collect()
}
