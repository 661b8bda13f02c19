//! `pr-automation` entry point.
//!
//! This binary is the composition root. Responsibilities:
//!
//! 1. **Parse configuration**: read flags / action inputs with `clap` and
//!    validate them into an [`automation::AutomationConfig`].
//! 2. **Wire observability**: JSON `tracing-subscriber` output plus an optional
//!    OpenTelemetry OTLP exporter. Every run gets a [`automation::RunId`] on its
//!    root span.
//! 3. **Construct infrastructure**: the GitHub repository and organization
//!    clients and the ZenHub client, injected into
//!    [`automation::PullRequestAutomation`].
//! 4. **Report**: a failed run, including invalid or missing inputs, prints an
//!    escaped `::error::` workflow command so the message shows up in the
//!    check annotations, and exits with status 1.

mod args;
mod report;
mod telemetry;

use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Context;
use automation::{PullRequestAutomation, RunId, RunOutcome};
use clap::Parser;
use github::{GitHubClient, OrganizationClient, RepositoryClient};
use tracing::{error, info, info_span, Instrument};
use zenhub::ZenHubClient;

use crate::args::Args;

#[tokio::main]
async fn main() -> ExitCode {
    let args = match Args::try_parse() {
        Ok(args) => args,
        // --help and --version
        Err(e) if !e.use_stderr() => e.exit(),
        Err(e) => {
            let _ = e.print();
            println!("{}", report::error_command(&e.to_string()));
            return ExitCode::FAILURE;
        }
    };

    let _telemetry = match telemetry::init() {
        Ok(guard) => guard,
        Err(e) => {
            println!("{}", report::error_command(&format!("{e:#}")));
            return ExitCode::FAILURE;
        }
    };

    let run_id = RunId::new_random();
    let span = info_span!("pr_automation", run_id = %run_id);
    match run(args).instrument(span).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(run_id = %run_id, error = format!("{e:#}"), "Run failed");
            println!("{}", report::error_command(&format!("{e:#}")));
            ExitCode::FAILURE
        }
    }
}

async fn run(args: Args) -> anyhow::Result<()> {
    let config = args.automation_config()?;

    let payload = tokio::fs::read_to_string(&args.event_path)
        .await
        .with_context(|| format!("failed to read event payload {}", args.event_path.display()))?;
    let pr = github::parse_pull_request_event(&payload)?;
    info!(pr = %pr.number, author = %pr.author, "Processing pull request");

    let (owner, repo) = args.repository.clone();
    let pull_requests = RepositoryClient::new(GitHubClient::new(&args.repo_token)?, owner, repo);
    let teams = OrganizationClient::new(
        GitHubClient::new(&args.org_token)?,
        config.organization.clone(),
    );
    let tracker = ZenHubClient::new(&args.zenhub_token, &args.zenhub_workspace_id)?;

    let automation = PullRequestAutomation::new(
        config,
        Arc::new(pull_requests),
        Arc::new(teams),
        Arc::new(tracker),
    );

    match automation.run(&pr).await? {
        RunOutcome::Completed { team } => info!(team = %team, "Pull request verified"),
        RunOutcome::Skipped(reason) => info!(reason = %reason, "Nothing to do"),
    }
    Ok(())
}
