//! Job command handlers
//!
//! Shows the progress of the latest indicator job, submits new
//! calculations, and lists a user's jobs.

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Subcommand;
use colored::*;
use oti_client::{ClientError, IndicatorsClient};
use oti_core::domain::job::{Job, JobStatus};
use oti_core::dto::job::{CreateJob, JobSummary};
use oti_core::labels::{self, DisplayStatus};
use oti_core::scenarios::latest_job_ids;
use oti_core::view::StatusView;

use crate::config::Config;
use crate::scheduler::{JobStatusPoller, PollPhase, PollerState, SubmitError};

/// Job subcommands
#[derive(Subcommand)]
pub enum JobCommands {
    /// Show the latest indicator job
    Status {
        /// Keep polling until the job finishes
        #[arg(short, long)]
        watch: bool,

        /// Print the status view as JSON
        #[arg(long)]
        json: bool,
    },
    /// Submit a new indicator calculation
    Submit {
        /// City to calculate indicators for
        #[arg(long)]
        city: String,

        /// Scenario id; omit for the baseline
        #[arg(long)]
        scenario: Option<i64>,

        /// Follow the submitted job until it finishes
        #[arg(short, long)]
        watch: bool,
    },
    /// List jobs created by a user
    List {
        /// User id
        #[arg(long)]
        user: i64,
    },
}

/// Handle job commands
///
/// # Arguments
/// * `command` - The job command to execute
/// * `config` - The CLI configuration
pub async fn handle_job_command(command: JobCommands, config: &Config) -> Result<()> {
    let client = Arc::new(IndicatorsClient::new(&config.api_url));

    match command {
        JobCommands::Status { watch, json } => show_status(client, config, watch, json).await,
        JobCommands::Submit {
            city,
            scenario,
            watch,
        } => submit_job(client, config, city, scenario, watch).await,
        JobCommands::List { user } => list_jobs(&client, user).await,
    }
}

/// Show the latest job once, or follow it with a poller
async fn show_status(
    client: Arc<IndicatorsClient>,
    config: &Config,
    watch: bool,
    json: bool,
) -> Result<()> {
    if watch {
        let poller = JobStatusPoller::new(client, config.poll_interval);
        poller.start();
        return follow(&poller, json).await;
    }

    let job = client
        .latest_job()
        .await
        .context("Failed to fetch latest job")?;

    print_view(&StatusView::from_job(job), json)
}

/// Submit a calculation and optionally follow it
async fn submit_job(
    client: Arc<IndicatorsClient>,
    config: &Config,
    city: String,
    scenario: Option<i64>,
    watch: bool,
) -> Result<()> {
    if watch {
        let poller = JobStatusPoller::new(client, config.poll_interval);
        return match poller.submit_job(city, scenario).await {
            Ok(job) => {
                print_submitted(&job);
                follow(&poller, false).await
            }
            Err(SubmitError::NotConfigured { settings }) => report_not_configured(&settings),
            Err(SubmitError::Client(e)) => Err(e).context("Failed to submit job"),
        };
    }

    let req = CreateJob {
        city_name: city,
        scenario,
    };

    match client.submit_job(req).await {
        Ok(job) => {
            print_submitted(&job);
            Ok(())
        }
        Err(ClientError::InvalidConfiguration { items }) => {
            report_not_configured(&labels::missing_settings(&items))
        }
        Err(e) => Err(e).context("Failed to submit job"),
    }
}

/// List a user's jobs, newest first, marking the latest one per scenario
async fn list_jobs(client: &IndicatorsClient, user_id: i64) -> Result<()> {
    let mut jobs = client
        .list_jobs_for_user(user_id)
        .await
        .context("Failed to list jobs")?;

    if jobs.is_empty() {
        println!("{}", "No jobs found.".yellow());
        return Ok(());
    }

    let latest = latest_job_ids(&jobs);
    jobs.sort_by(|a, b| b.id.cmp(&a.id));

    println!("{}", format!("Found {} job(s):", jobs.len()).bold());
    println!();
    for job in &jobs {
        print_job_summary(job, latest.contains(&job.id));
    }

    Ok(())
}

/// Render every newly fetched state until the job settles or Ctrl-C
async fn follow(poller: &JobStatusPoller, json: bool) -> Result<()> {
    let mut updates = poller.subscribe();
    let mut last_rendered = None;

    loop {
        let state: PollerState = updates.borrow_and_update().clone();

        if state.status_fetched && state.last_fetched_at != last_rendered {
            if let Some(view) = &state.view {
                print_view(view, json)?;
            }
            last_rendered = state.last_fetched_at;
        }

        if state.phase == PollPhase::Settled {
            break;
        }

        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                println!("{}", "Stopped watching.".dimmed());
                break;
            }
            changed = updates.changed() => {
                if changed.is_err() {
                    break;
                }
            }
        }
    }

    poller.shutdown();

    let last = poller.current();
    if last.phase == PollPhase::Settled {
        if last.view.is_none() {
            println!("{}", "No indicator jobs found.".yellow());
        }
        print_completed(&last.completed);
    }

    Ok(())
}

/// Print a status view, as JSON or as a progress table
fn print_view(view: &StatusView, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(view)?);
        return Ok(());
    }

    let job = &view.job;
    println!(
        "{} {} ({}, {})",
        "Job".bold(),
        job.id.to_string().cyan(),
        job.city_name,
        scenario_label(job.scenario)
    );
    println!("  Status:     {}", colorize_display(view.display_status));

    match &view.completion {
        Some(completion) if completion.has_cells() => println!(
            "  Progress:   {}/{} ({}%)",
            completion.numerator, completion.denominator, completion.ratio
        ),
        _ => println!("  Progress:   {}", "no data yet".dimmed()),
    }

    if let Some(current) = &view.currently_processing {
        println!(
            "  Processing: {} {} {}",
            current.indicator.cyan(),
            "during".dimmed(),
            current.period
        );
    }

    if let Some(calculations) = &view.calculations {
        println!();
        print!("  {}", format!("{:<28}", "Indicator").bold());
        for period in &view.periods {
            print!("{}", format!("{:<12}", period).bold());
        }
        println!();

        for (indicator, by_period) in calculations {
            print!("  {:<28}", indicator);
            for period in &view.periods {
                let cell = by_period
                    .get(period)
                    .map(|cell| format!("{:?}", cell.status).to_lowercase())
                    .unwrap_or_else(|| "-".to_string());
                print!("{:<12}", cell);
            }
            println!();
        }
    }
    println!();

    Ok(())
}

fn print_submitted(job: &Job) {
    println!(
        "{} Submitted job {} for {} ({})",
        "✓".green(),
        job.id.to_string().cyan(),
        job.city_name,
        scenario_label(job.scenario)
    );
}

/// Print completed calculations remembered by the poller
fn print_completed(completed: &[Job]) {
    if completed.is_empty() {
        return;
    }

    println!("{}", "Completed calculations:".bold());
    for job in completed {
        println!(
            "  {} {} ({}) job {}",
            "▸".cyan(),
            job.city_name,
            scenario_label(job.scenario),
            job.id
        );
    }
}

/// Explain which settings block the calculation and fail the command
fn report_not_configured(settings: &[String]) -> Result<()> {
    println!("{}", labels::NOT_CONFIGURED.yellow().bold());
    for setting in settings {
        println!("  {} {}", "•".yellow(), setting);
    }
    println!(
        "{}",
        "Fill in these settings on the configuration screen, then submit again.".dimmed()
    );

    anyhow::bail!("indicator calculation is not configured")
}

fn print_job_summary(job: &JobSummary, latest: bool) {
    if latest {
        println!(
            "  {} Job {} {}",
            "▸".cyan(),
            job.id.to_string().bold(),
            "(latest)".green()
        );
    } else {
        println!("  {} Job {}", "▸".cyan(), job.id.to_string().dimmed());
    }
    println!("    Scenario: {}", scenario_label(job.scenario));
    println!("    Status:   {}", colorize_status(&job.job_status));
    println!();
}

fn scenario_label(scenario: Option<i64>) -> String {
    match scenario {
        Some(id) => format!("scenario {}", id),
        None => "baseline".to_string(),
    }
}

/// Colorize a display label
fn colorize_display(status: DisplayStatus) -> ColoredString {
    let label = status.as_str();
    match status {
        DisplayStatus::Queued => label.yellow(),
        DisplayStatus::Processing => label.cyan(),
        DisplayStatus::Complete => label.green(),
        DisplayStatus::Failed => label.red(),
    }
}

/// Colorize job status for display
pub fn colorize_status(status: &JobStatus) -> ColoredString {
    colorize_display(labels::display_status(status))
}
