//! `phonewatch` - notification screener and device health monitor
//!
//! Drives `phonewatch-core` over JSON lines and manages the rule table.

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

mod cli;
mod event;
mod notifier;

use std::path::{Path, PathBuf};

use anyhow::Context;
use chrono::Utc;
use clap::Parser;
use phonewatch_core::{
    AlertRelay, Config, FilterRule, FilterRuleRepository, NotificationSample, RuleKind,
    filter::FilterReport,
};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::{debug, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use cli::{Cli, Command};
use event::{Event, Output};
use notifier::LogNotifier;

const CONFIG_ENV: &str = "PHONEWATCH_CONFIG";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr; stdout carries results
    let default_filter = if cli.verbose {
        "phonewatch=debug,phonewatch_core=debug"
    } else {
        "phonewatch=info,phonewatch_core=info"
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config_path = cli.config.clone().unwrap_or_else(default_config_path);
    let config = Config::load(&config_path)
        .await
        .with_context(|| format!("loading {}", config_path.display()))?;

    let db_path = cli
        .database
        .clone()
        .or_else(|| config.database_path.clone())
        .unwrap_or_else(default_database_path);
    let repo = open_repository(&db_path).await?;

    match cli.command.unwrap_or(Command::Run) {
        Command::Run => run(&config, &repo).await,
        Command::Seed { reset } => {
            let report = repo
                .seed_defaults(reset, &config.filter.sms_package)
                .await?;
            print_json(&report)
        }
        Command::Report => report(&config, &repo).await,
        Command::Rules => {
            for rule in repo.list_rules().await? {
                print_json(&rule)?;
            }
            Ok(())
        }
        Command::Stats => print_json(&repo.stats().await?),
        Command::Set {
            pattern,
            kind,
            description,
            inactive,
        } => {
            let mut rule = match kind {
                RuleKind::Allow => FilterRule::allow(pattern, description),
                RuleKind::Deny => FilterRule::deny(pattern, description),
            };
            if inactive {
                rule = rule.inactive();
            }
            let created = repo.upsert_rule(&rule).await?;
            info!(
                pattern = %rule.package_pattern,
                kind = %rule.kind.as_str(),
                created,
                "Rule saved"
            );
            Ok(())
        }
        Command::Toggle { pattern, off } => {
            repo.set_active(&pattern, !off).await?;
            info!(%pattern, active = !off, "Rule updated");
            Ok(())
        }
        Command::Remove { pattern } => {
            repo.delete_rule(&pattern).await?;
            info!(%pattern, "Rule removed");
            Ok(())
        }
    }
}

/// Process stdin events until EOF.
async fn run(config: &Config, repo: &FilterRuleRepository) -> anyhow::Result<()> {
    if repo.stats().await?.total == 0 {
        repo.seed_defaults(false, &config.filter.sms_package).await?;
    }

    let relay = config.relay(LogNotifier)?;
    let engine = relay.engine();
    info!(
        system_packages = engine.catalog().system_package_count(),
        default_action = engine.policy().default_action.as_str(),
        sms_whitelist = engine.policy().sms_whitelist,
        "Reading events from stdin"
    );

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();
    let mut processed = 0_u64;

    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let event: Event = match serde_json::from_str(line) {
            Ok(event) => event,
            Err(e) => {
                warn!("Skipping malformed event: {e}");
                continue;
            }
        };

        let out = handle(&relay, repo, &event)
            .await
            .with_context(|| format!("handling event from {}", event.device()))?;
        stdout.write_all(out.as_bytes()).await?;
        stdout.write_all(b"\n").await?;
        stdout.flush().await?;
        processed += 1;
    }

    info!(processed, "Input closed");
    Ok(())
}

/// Evaluate every notification on stdin without forwarding anything.
async fn report(config: &Config, repo: &FilterRuleRepository) -> anyhow::Result<()> {
    let engine = config.engine()?;
    let rules = repo.snapshot().await?;
    if rules.is_empty() {
        warn!("Rule table is empty, only built-in lists apply; run `phonewatch seed` first");
    }
    debug!(
        rules = rules.len(),
        active = rules.iter().filter(|r| r.active).count(),
        "Rule snapshot loaded"
    );

    let mut samples = Vec::new();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        match serde_json::from_str::<Event>(line.trim()) {
            Ok(Event::Notification {
                package_name,
                sender,
                text,
                ..
            }) => samples.push(NotificationSample::new(package_name.as_deref(), sender, text)),
            Ok(Event::Telemetry { .. }) => {}
            Err(e) if !line.trim().is_empty() => warn!("Skipping malformed event: {e}"),
            Err(_) => {}
        }
    }

    print_json(&FilterReport::build(&engine, &rules, &samples))
}

/// Evaluate one event and render the result line.
async fn handle(
    relay: &AlertRelay<LogNotifier>,
    repo: &FilterRuleRepository,
    event: &Event,
) -> anyhow::Result<String> {
    let line = match event {
        Event::Notification {
            device,
            package_name,
            sender,
            text,
        } => {
            let sample =
                NotificationSample::new(package_name.as_deref(), sender.as_str(), text.as_str());
            let decision = relay.on_notification(repo, device, &sample).await;
            debug!(device, blocked = decision.blocked, "Notification handled");
            serde_json::to_string(&Output::Decision {
                device,
                decision: &decision,
            })?
        }
        Event::Telemetry {
            device,
            battery_percent,
            is_charging,
            network_available,
            unsent_count,
            last_notification_at,
        } => {
            let now = Utc::now();
            let snapshot = event::snapshot(
                *battery_percent,
                *is_charging,
                *network_available,
                *unsent_count,
                *last_notification_at,
                now,
            );
            let status = relay.on_telemetry(device, &snapshot, now).await;
            debug!(
                device,
                level = %status.level,
                reasons = %status.summary(),
                "Telemetry handled"
            );
            serde_json::to_string(&Output::Status {
                device,
                status: &status,
            })?
        }
    };
    Ok(line)
}

async fn open_repository(path: &Path) -> anyhow::Result<FilterRuleRepository> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent)
            .await
            .with_context(|| format!("creating {}", parent.display()))?;
    }

    let repo = FilterRuleRepository::new(&path.to_string_lossy())
        .await
        .with_context(|| format!("opening rule database {}", path.display()))?;
    debug!("Rule database at {}", path.display());
    Ok(repo)
}

fn print_json<T: serde::Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string(value)?);
    Ok(())
}

fn default_config_path() -> PathBuf {
    std::env::var_os(CONFIG_ENV).map_or_else(
        || {
            dirs::config_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("phonewatch")
                .join("config.json")
        },
        PathBuf::from,
    )
}

fn default_database_path() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("phonewatch")
        .join("rules.db")
}
