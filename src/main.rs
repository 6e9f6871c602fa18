use std::backtrace::Backtrace;
use std::process::ExitCode;

use chrono::Utc;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use jobwatch::cli::{Cli, Commands};
use jobwatch::config::Config;
use jobwatch::domain::Digest;
use jobwatch::errors::{FeederError, FeederResult};
use jobwatch::matching::JobProfilePredicate;
use jobwatch::services::{
    DailyScheduler, MatchService, NotificationService, RunLock, RunService, SmtpMailTransport,
};
use jobwatch::sources::RssAtomSource;

type LiveRunService = RunService<RssAtomSource, JobProfilePredicate, SmtpMailTransport>;

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    // Unattended runs must never die silently
    std::panic::set_hook(Box::new(|info| {
        let backtrace = Backtrace::force_capture();
        tracing::error!(panic = %info, backtrace = %backtrace, "Unhandled panic");
    }));

    match std::panic::catch_unwind(run) {
        Ok(Ok(())) => ExitCode::SUCCESS,
        Ok(Err(e)) => {
            tracing::error!(error = %e, details = ?e, "Run failed");
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
        Err(_) => ExitCode::FAILURE,
    }
}

fn run() -> FeederResult<()> {
    let cli = Cli::parse();

    // Load configuration
    let config = Config::from_env()?;

    match cli.command {
        Commands::Run { dry_run, json } => cmd_run(&config, dry_run, json),
        Commands::Schedule { skip_initial } => cmd_schedule(&config, skip_initial),
        Commands::Feeds => cmd_feeds(&config),
        Commands::Check { text } => cmd_check(&text),
    }
}

fn build_runner(config: &Config) -> FeederResult<LiveRunService> {
    let matcher = MatchService::new(
        RssAtomSource::new(config.fetch_timeout)?,
        JobProfilePredicate::new()?,
    );
    let notifier = NotificationService::new(config, SmtpMailTransport::new(config.smtp_timeout));

    Ok(RunService::new(matcher, notifier))
}

fn report_configuration(config: &Config) {
    let masked_password = config
        .app_password
        .as_ref()
        .map(|p| "*".repeat(p.len()))
        .unwrap_or_else(|| "None".to_string());

    tracing::info!(
        email_from = config.email_from.as_deref().unwrap_or("None"),
        email_to = config.recipient().unwrap_or("None"),
        app_password = %masked_password,
        feeds = config.feeds.len(),
        "Configuration loaded"
    );

    for problem in config.validate() {
        tracing::warn!(problem = %problem, "Configuration problem");
    }
}

/// One guarded pipeline run. An overlapping run is skipped, not failed.
fn execute_run(runner: &LiveRunService, config: &Config) -> FeederResult<()> {
    let lock = match RunLock::acquire(&config.lock_path) {
        Ok(lock) => lock,
        Err(FeederError::RunInProgress(path)) => {
            tracing::warn!(lock = %path, "Another run is in progress, skipping");
            println!("Another run is in progress, skipping.");
            return Ok(());
        }
        Err(e) => return Err(e),
    };

    tracing::info!(
        started_at = %Utc::now().to_rfc3339(),
        lock = %lock.path().display(),
        "Job run started"
    );

    let summary = runner.run(&config.feeds)?;

    if summary.notified {
        println!(
            "Sent digest with {} jobs ({} of {} feeds failed).",
            summary.report.matches.len(),
            summary.report.failures.len(),
            summary.report.sources_checked
        );
    } else {
        println!("No jobs found matching criteria.");
    }

    tracing::info!(finished_at = %Utc::now().to_rfc3339(), "Job run finished");
    Ok(())
}

fn cmd_run(config: &Config, dry_run: bool, json: bool) -> FeederResult<()> {
    report_configuration(config);
    let runner = build_runner(config)?;

    if !dry_run {
        return execute_run(&runner, config);
    }

    println!("Fetching feeds...\n");
    let report = runner.matcher().find_matches(&config.feeds);

    if json {
        println!("{}", serde_json::to_string_pretty(&report.matches)?);
        return Ok(());
    }

    if report.is_empty() {
        println!("No jobs found matching criteria.");
    } else {
        let digest = Digest::new(&report.matches, Utc::now());
        println!("[DRY RUN] Subject: {}\n", digest.subject());
        println!("{}", digest.body());
    }

    println!(
        "\nDry run complete. {} feeds checked, {} failed.",
        report.sources_checked,
        report.failures.len()
    );

    Ok(())
}

fn cmd_schedule(config: &Config, skip_initial: bool) -> FeederResult<()> {
    report_configuration(config);
    let runner = build_runner(config)?;

    let times: Vec<String> = config
        .schedule
        .iter()
        .map(|t| t.format("%H:%M").to_string())
        .collect();
    tracing::info!(times = %times.join(", "), "Scheduler started (UTC)");

    let run_once = || {
        if let Err(e) = execute_run(&runner, config) {
            // The loop keeps going; the next slot gets a fresh attempt
            tracing::error!(error = %e, details = ?e, "Scheduled run failed");
        }
    };

    if !skip_initial {
        run_once();
    }

    DailyScheduler::new(config.schedule.clone()).run_forever(run_once);
    Ok(())
}

fn cmd_feeds(config: &Config) -> FeederResult<()> {
    if config.feeds.is_empty() {
        println!("No feeds configured.");
        return Ok(());
    }

    println!("Configured feeds:\n");
    for (i, feed) in config.feeds.iter().enumerate() {
        println!("  {}. {}", i + 1, feed);
    }

    Ok(())
}

fn cmd_check(text: &str) -> FeederResult<()> {
    let predicate = JobProfilePredicate::new()?;

    match predicate.matched_rule(text) {
        Some(rule) => println!("match ({})", rule),
        None => println!("no match"),
    }

    Ok(())
}
