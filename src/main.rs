//! XAUUSD Daily Analyst
//!
//! Generates a daily gold trading analysis with an LLM and emails it.
//!
//! # Usage
//!
//! ```bash
//! # Scheduled mode: run every day at ANALYSIS_TIME (default 05:30 UTC)
//! cargo run --release
//!
//! # Test mode: run once immediately, then exit
//! TEST_MODE=true cargo run --release
//! cargo run --release -- --test-mode
//! ```
//!
//! # Environment Variables
//!
//! - `ANTHROPIC_API_KEY`: API key for the LLM provider
//! - `SMTP_SERVER` / `SMTP_PORT`: SMTP relay (default smtp.gmail.com:587)
//! - `EMAIL_USER` / `EMAIL_PASSWORD`: SMTP login, `EMAIL_USER` is the sender
//! - `EMAIL_RECIPIENTS`: comma-separated recipient list
//! - `PORT`: health endpoint port (default 8080)
//! - `TEST_MODE`: `true`/`1`/`yes` to run once immediately
//! - `ANALYSIS_TIME`: daily trigger, `HH:MM` UTC (default 05:30)
//! - `MARKET_DATA_URL`: optional JSON quote endpoint, empty to disable
//! - `RUST_LOG`: logging level (default: info)
//! - `LOG_FORMAT`: `json` for JSON log lines

use anyhow::Result;
use chrono::Utc;
use clap::Parser;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

use xauusd_analyst::config::{defaults, AppConfig};
use xauusd_analyst::email::SmtpMailer;
use xauusd_analyst::{api, DailyAnalysis, DailyTrigger, Scheduler, SystemClock};

// ============================================================================
// CLI Arguments
// ============================================================================

#[derive(Parser, Debug)]
#[command(name = "xauusd-analyst")]
#[command(about = "Daily XAUUSD analysis by LLM, delivered by email")]
#[command(version)]
struct CliArgs {
    /// Run the analysis once immediately and exit (same as TEST_MODE=true)
    #[arg(long)]
    test_mode: bool,

    /// Override the health endpoint port (default: $PORT or 8080)
    #[arg(short, long)]
    port: Option<u16>,
}

// ============================================================================
// Task Names for Supervisor Logging
// ============================================================================

#[derive(Debug, Clone, Copy)]
enum TaskName {
    HealthServer,
    Scheduler,
}

impl std::fmt::Display for TaskName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TaskName::HealthServer => write!(f, "HealthServer"),
            TaskName::Scheduler => write!(f, "Scheduler"),
        }
    }
}

/// Spawn the health endpoint into the JoinSet.
fn spawn_health_server(
    task_set: &mut JoinSet<Result<TaskName>>,
    listener: TcpListener,
    cancel_token: CancellationToken,
) {
    task_set.spawn(async move {
        info!("[HealthServer] Task starting");
        match api::serve(listener, cancel_token).await {
            Ok(()) => {
                info!("[HealthServer] Graceful shutdown complete");
                Ok(TaskName::HealthServer)
            }
            Err(e) => {
                error!("[HealthServer] Server error: {:#}", e);
                Err(e)
            }
        }
    });
}

/// Spawn the daily scheduler into the JoinSet.
fn spawn_scheduler(
    task_set: &mut JoinSet<Result<TaskName>>,
    scheduler: Scheduler<SmtpMailer>,
    cancel_token: CancellationToken,
) {
    task_set.spawn(async move {
        let clock = SystemClock;
        scheduler
            .run(
                &clock,
                Duration::from_secs(defaults::SCHEDULER_POLL_INTERVAL_SECS),
                cancel_token,
            )
            .await;
        Ok(TaskName::Scheduler)
    });
}

/// Run the supervisor loop: monitor tasks, cancel on failure.
async fn run_supervisor(
    task_set: &mut JoinSet<Result<TaskName>>,
    cancel_token: CancellationToken,
) -> Result<()> {
    info!("🔒 Supervisor: All tasks spawned, monitoring...");

    while let Some(result) = task_set.join_next().await {
        match result {
            Ok(Ok(task_name)) => {
                info!("🔒 Supervisor: Task {} completed normally", task_name);
            }
            Ok(Err(e)) => {
                error!("🔒 Supervisor: Task failed with error: {:#}", e);
                cancel_token.cancel();
                return Err(e);
            }
            Err(e) => {
                error!("🔒 Supervisor: Task panicked: {}", e);
                cancel_token.cancel();
                return Err(anyhow::anyhow!("Task panicked: {}", e));
            }
        }
    }

    info!("🔒 Supervisor: All tasks completed");
    Ok(())
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    let json = std::env::var("LOG_FORMAT").is_ok_and(|v| v.eq_ignore_ascii_case("json"));
    if json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .init();
    }
}

// ============================================================================
// Main Entry Point
// ============================================================================

#[tokio::main]
async fn main() -> Result<()> {
    // Seed the environment from .env if present; real env vars win.
    dotenvy::dotenv().ok();

    init_tracing();

    let args = CliArgs::parse();

    let mut config = AppConfig::from_env()?;
    if args.test_mode {
        config.test_mode = true;
    }
    if let Some(port) = args.port {
        config.port = port;
    }
    let config = Arc::new(config);

    info!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    info!("  XAUUSD Daily Analyst v{}", env!("CARGO_PKG_VERSION"));
    info!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    info!(
        test_mode = config.test_mode,
        model = %config.anthropic_model,
        smtp = %format!("{}:{}", config.smtp_server, config.smtp_port),
        recipients = config.recipients.len(),
        market_data = config.market_data_url.is_some(),
        "Configuration loaded"
    );
    config.warn_missing();

    // Graceful shutdown via Ctrl+C
    let cancel_token = CancellationToken::new();
    let shutdown_token = cancel_token.clone();
    tokio::spawn(async move {
        tokio::signal::ctrl_c().await.ok();
        info!("🛑 Received Ctrl+C, initiating shutdown...");
        shutdown_token.cancel();
    });

    // Fails fast if the port is taken.
    let listener = api::bind(config.port).await?;
    let cycle = Arc::new(DailyAnalysis::from_config(&config)?);

    let mut task_set: JoinSet<Result<TaskName>> = JoinSet::new();
    spawn_health_server(&mut task_set, listener, cancel_token.clone());

    if config.test_mode {
        info!("🧪 Running in TEST MODE - executing analysis immediately");
        cycle.run_once(Utc::now(), &cancel_token).await;
    } else {
        info!(
            "📅 Running in SCHEDULED MODE - waiting for {} UTC",
            config.analysis_time.format("%H:%M")
        );
        let trigger = DailyTrigger::new(config.analysis_time, Utc::now());
        spawn_scheduler(&mut task_set, Scheduler::new(cycle, trigger), cancel_token.clone());
    }

    run_supervisor(&mut task_set, cancel_token).await?;

    info!("✓ XAUUSD Daily Analyst shutdown complete");
    Ok(())
}
