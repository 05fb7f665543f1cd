//! newscast-bot - Headline posting daemon
//!
//! Runs one posting cycle immediately, then one per cycle interval: fetch
//! top headlines, post the first unseen one, respect the daily cap.

use clap::Parser;
use libnewscast::config::Config;
use libnewscast::controller::{CycleOutcome, PostingController, TokioSleeper};
use libnewscast::credentials::{news_api_key_from_env, TwitterCredentials};
use libnewscast::error::Result;
use libnewscast::logging::{self, LogFormat, LoggingConfig};
use libnewscast::news::NewsApiSource;
use libnewscast::platforms::twitter::TwitterPublisher;
use libnewscast::state::{FileDedupStore, FileRateLedger};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{error, info};

#[derive(Parser, Debug)]
#[command(name = "newscast-bot")]
#[command(version)]
#[command(about = "Daemon that polls a news feed and posts unseen headlines")]
#[command(long_about = "\
newscast-bot - Headline posting daemon

DESCRIPTION:
    newscast-bot is a long-running daemon that periodically fetches top
    headlines and posts the first one it has not posted before. Posts are
    capped per rolling 24-hour window and every posted headline is
    remembered across restarts, so nothing is ever posted twice.

USAGE:
    # Run in foreground (logs to stderr)
    newscast-bot

    # Post one headline and exit
    newscast-bot --once

    # Run with a custom cycle interval
    newscast-bot --cycle-interval 3600

CREDENTIALS:
    TWITTER_ACCESS_TOKEN - OAuth 2.0 user-context token for posting
    NEWS_API_KEY         - NewsAPI key for the headlines feed

    Both are read from the environment; a .env file in the working
    directory is loaded first if present.

SIGNALS:
    SIGTERM, SIGINT - Graceful shutdown (finishes the current cycle)

CONFIGURATION:
    Configuration file: ~/.config/newscast/config.toml
    State files: ~/.local/share/newscast/

EXIT CODES:
    0 - Clean shutdown
    1 - Runtime error
    2 - Credential error
    3 - Invalid input
")]
struct Cli {
    /// Seconds between posting cycles (overrides config)
    #[arg(long, value_name = "SECONDS")]
    cycle_interval: Option<u64>,

    /// Granularity of the idle sleep in seconds (overrides config)
    #[arg(long, value_name = "SECONDS")]
    poll_interval: Option<u64>,

    /// Run one cycle and exit
    #[arg(long)]
    once: bool,

    /// Enable verbose logging to stderr
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() {
    // Load .env before reading any credentials
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(e) = run(cli).await {
        error!("{}", e);
        std::process::exit(e.exit_code());
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config = Config::load_or_default()?;

    let mut controller = build_controller(&config)?;

    info!("newscast-bot starting");

    let shutdown = Arc::new(AtomicBool::new(false));
    setup_signal_handlers(shutdown.clone())?;

    let cycle_interval = cli
        .cycle_interval
        .unwrap_or(config.scheduler.cycle_interval_secs)
        .max(1);
    let poll_interval = cli
        .poll_interval
        .unwrap_or(config.scheduler.poll_interval_secs)
        .max(1);

    if cli.once {
        let outcome = controller.run_cycle().await?;
        info!(?outcome, "single cycle complete, exiting");
        return Ok(());
    }

    info!(cycle_interval, poll_interval, "entering daemon loop");
    run_daemon_loop(&mut controller, cycle_interval, poll_interval, shutdown).await?;

    info!("newscast-bot stopped");
    Ok(())
}

/// Wire the controller from config and environment credentials
fn build_controller(config: &Config) -> Result<PostingController> {
    let credentials = TwitterCredentials::from_env()?;
    let api_key = news_api_key_from_env()?;

    let dedup = FileDedupStore::open(&config.state.expand_dedup_path()?)?;
    let ledger = FileRateLedger::new(&config.state.expand_ledger_path()?, config.limits.daily_cap);

    Ok(PostingController::new(
        Box::new(NewsApiSource::new(&config.news, api_key)),
        Box::new(TwitterPublisher::new(credentials)),
        Box::new(dedup),
        Box::new(ledger),
        Box::new(TokioSleeper),
        Duration::from_secs(config.limits.throttle_floor_secs),
        config.limits.max_post_chars,
    ))
}

/// Initialize logging based on verbosity level
fn init_logging(verbose: bool) {
    if verbose {
        LoggingConfig::new(LogFormat::Text, "debug".to_string(), true).init();
    } else {
        logging::init_default();
    }
}

/// Set up signal handlers for graceful shutdown
fn setup_signal_handlers(shutdown: Arc<AtomicBool>) -> Result<()> {
    use signal_hook::consts::{SIGINT, SIGTERM};
    use signal_hook::iterator::Signals;

    let mut signals = Signals::new([SIGINT, SIGTERM]).map_err(|e| {
        libnewscast::NewscastError::InvalidInput(format!("signal setup failed: {}", e))
    })?;

    let shutdown_clone = shutdown.clone();
    std::thread::spawn(move || {
        for sig in signals.forever() {
            match sig {
                SIGTERM | SIGINT => {
                    info!("received shutdown signal, stopping gracefully");
                    shutdown_clone.store(true, Ordering::Relaxed);
                    break;
                }
                _ => {}
            }
        }
    });

    Ok(())
}

/// Main daemon loop: one cycle per interval, shutdown checked every second
///
/// Cycle outcomes are informational; only persisted-state errors escape,
/// because continuing without working state files risks duplicate posts.
async fn run_daemon_loop(
    controller: &mut PostingController,
    cycle_interval: u64,
    poll_interval: u64,
    shutdown: Arc<AtomicBool>,
) -> Result<()> {
    let mut until_next_cycle = 0u64;

    loop {
        if shutdown.load(Ordering::Relaxed) {
            info!("shutdown requested, stopping daemon loop");
            break;
        }

        if until_next_cycle == 0 {
            match controller.run_cycle().await? {
                CycleOutcome::Posted { post_id } => info!(%post_id, "cycle posted"),
                CycleOutcome::Skipped(reason) => info!(?reason, "cycle skipped"),
                CycleOutcome::Throttled { waited } => {
                    info!(waited_secs = waited.as_secs(), "cycle throttled")
                }
                CycleOutcome::Failed => info!("cycle failed, will retry next interval"),
            }
            until_next_cycle = cycle_interval;
        }

        let idle = poll_interval.min(until_next_cycle);
        for _ in 0..idle {
            if shutdown.load(Ordering::Relaxed) {
                break;
            }
            sleep(Duration::from_secs(1)).await;
        }
        until_next_cycle = until_next_cycle.saturating_sub(idle);
    }

    Ok(())
}
