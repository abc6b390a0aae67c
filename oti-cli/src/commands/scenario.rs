//! Scenario command handlers
//!
//! Lists a user's scenarios with the status of their latest indicator job,
//! followed by scenarios created by colleagues.

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Subcommand;
use colored::*;
use oti_client::IndicatorsClient;
use oti_core::domain::scenario::{AnnotatedScenario, Scenario};
use oti_core::scenarios::{annotate, colleague_scenarios, paginate};
use tokio_util::sync::CancellationToken;

use super::job::colorize_status;
use crate::config::Config;
use crate::scheduler::{ScenarioBoard, ScenarioJobRefresher};

/// Scenario subcommands
#[derive(Subcommand)]
pub enum ScenarioCommands {
    /// List scenarios with their latest indicator job status
    List {
        /// Id of the user whose scenarios are listed
        #[arg(long)]
        user: i64,

        /// Username, used to separate colleagues' scenarios
        #[arg(long)]
        username: String,

        /// Page to show, starting at 1
        #[arg(long, default_value_t = 1)]
        page: usize,

        /// Keep refreshing job statuses until Ctrl-C
        #[arg(short, long)]
        watch: bool,
    },
}

/// Handle scenario commands
///
/// # Arguments
/// * `command` - The scenario command to execute
/// * `config` - The CLI configuration
pub async fn handle_scenario_command(command: ScenarioCommands, config: &Config) -> Result<()> {
    let client = Arc::new(IndicatorsClient::new(&config.api_url));

    match command {
        ScenarioCommands::List {
            user,
            username,
            page,
            watch,
        } => list_scenarios(client, config, user, &username, page, watch).await,
    }
}

async fn list_scenarios(
    client: Arc<IndicatorsClient>,
    config: &Config,
    user_id: i64,
    username: &str,
    page: usize,
    watch: bool,
) -> Result<()> {
    let mine = client
        .list_scenarios(Some(user_id))
        .await
        .context("Failed to list scenarios")?;
    let everyone = client
        .list_scenarios(None)
        .await
        .context("Failed to list colleague scenarios")?;
    let colleagues = colleague_scenarios(everyone, username);

    if watch {
        return watch_scenarios(client, config, user_id, mine, &colleagues, page).await;
    }

    let jobs = client
        .list_jobs_for_user(user_id)
        .await
        .context("Failed to list jobs")?;
    let pages = paginate(&annotate(mine, &jobs), config.page_size);

    print_my_scenarios(&pages, page);
    print_colleague_scenarios(&paginate(&colleagues, config.page_size), page);

    Ok(())
}

/// Re-render the list every time the refresher publishes
async fn watch_scenarios(
    client: Arc<IndicatorsClient>,
    config: &Config,
    user_id: i64,
    mine: Vec<Scenario>,
    colleagues: &[Scenario],
    page: usize,
) -> Result<()> {
    let refresher = Arc::new(ScenarioJobRefresher::new(
        client,
        user_id,
        mine,
        config.scenario_poll_interval,
        config.page_size,
    ));
    let mut board = refresher.subscribe();
    let cancel = CancellationToken::new();

    let task = tokio::spawn({
        let refresher = Arc::clone(&refresher);
        let cancel = cancel.clone();
        async move { refresher.run(cancel).await }
    });

    let colleague_pages = paginate(colleagues, config.page_size);

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                println!("{}", "Stopped watching.".dimmed());
                break;
            }
            changed = board.changed() => {
                if changed.is_err() {
                    break;
                }
                let current: ScenarioBoard = board.borrow_and_update().clone();
                if let Some(refreshed_at) = current.refreshed_at {
                    println!(
                        "{}",
                        format!("Refreshed {}", refreshed_at.format("%H:%M:%S")).dimmed()
                    );
                }
                print_my_scenarios(&current.pages, page);
                print_colleague_scenarios(&colleague_pages, page);
            }
        }
    }

    cancel.cancel();
    task.await.context("Scenario refresher panicked")?;

    Ok(())
}

fn print_my_scenarios(pages: &[Vec<AnnotatedScenario>], page: usize) {
    let Some(scenarios) = page_of(pages, page) else {
        println!("{}", "No scenarios on this page.".yellow());
        return;
    };

    println!(
        "{}",
        format!("My scenarios (page {} of {}):", page, pages.len()).bold()
    );
    for annotated in scenarios {
        let status = match &annotated.indicator_job_status {
            Some(status) => colorize_status(status).to_string(),
            None => "not calculated".dimmed().to_string(),
        };
        println!(
            "  {} {} {}  {}",
            "▸".cyan(),
            annotated.scenario.id.to_string().dimmed(),
            annotated.scenario.name,
            status
        );
    }
    println!();
}

fn print_colleague_scenarios(pages: &[Vec<Scenario>], page: usize) {
    let Some(scenarios) = page_of(pages, page) else {
        return;
    };

    println!(
        "{}",
        format!("Colleague scenarios (page {} of {}):", page, pages.len()).bold()
    );
    for scenario in scenarios {
        println!(
            "  {} {} {}  {}",
            "▸".cyan(),
            scenario.id.to_string().dimmed(),
            scenario.name,
            format!("by {}", scenario.created_by).dimmed()
        );
    }
    println!();
}

/// One-based page lookup
fn page_of<T>(pages: &[Vec<T>], page: usize) -> Option<&Vec<T>> {
    page.checked_sub(1).and_then(|index| pages.get(index))
}
