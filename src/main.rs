//! SURGE — Momentum scan-score-alert agent.
//!
//! Entry point. Loads configuration, initialises structured logging,
//! wires the feed, notifier, store and dashboard together, and runs the
//! periodic scan cycle with graceful shutdown.

use anyhow::Result;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

use surge::config::AppConfig;
use surge::dashboard;
use surge::engine::scanner::Scanner;
use surge::feed::tsetmc::TsetmcClient;
use surge::feed::MarketFeed;
use surge::keepalive;
use surge::notify::telegram::TelegramNotifier;
use surge::notify::Notifier;
use surge::store::SnapshotStore;
use surge::types::CycleReport;

const BANNER: &str = r#"
  ____  _   _ ____   ____ _____
 / ___|| | | |  _ \ / ___| ____|
 \___ \| | | | |_) | |  _|  _|
  ___) | |_| |  _ <| |_| | |___
 |____/ \___/|_| \_\\____|_____|

  Symbol Upswing Recognition & Grading Engine
  v0.1.0 — Momentum Scan Agent
"#;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (non-fatal if missing)
    let _ = dotenv::dotenv();

    // Load configuration from TOML
    let cfg = AppConfig::load("config.toml")?;

    // Initialise structured logging
    init_logging();

    // Print startup banner
    println!("{BANNER}");
    info!(
        watchlist = cfg.watchlist.len(),
        interval_secs = cfg.scanner.interval_secs,
        alert_threshold = cfg.scanner.alert_threshold,
        clear_threshold = cfg.scanner.clear_threshold,
        "SURGE starting up"
    );

    // -- Initialise components -------------------------------------------

    let feed: Arc<dyn MarketFeed> = Arc::new(TsetmcClient::new(
        &cfg.feed.base_url,
        Duration::from_secs(cfg.feed.timeout_secs),
    )?);

    // Telegram credentials are optional: without them the agent runs in
    // dashboard-only mode — a supported mode, not an error.
    let notifier = build_notifier(&cfg)?;

    let store = SnapshotStore::new();

    if cfg.dashboard.enabled {
        dashboard::spawn_dashboard(store.clone(), cfg.dashboard.port);
    }

    if let Some(env_name) = &cfg.keepalive.url_env {
        if let Ok(url) = std::env::var(env_name) {
            keepalive::spawn_keepalive(url);
        }
    }

    // Startup test message, fire-and-forget like every other alert.
    if let Some(notifier) = &notifier {
        let notifier = Arc::clone(notifier);
        tokio::spawn(async move {
            if let Err(e) = notifier.notify("✅ SURGE scanner online.").await {
                warn!(error = %e, "Startup test message failed");
            }
        });
    }

    let mut scanner = Scanner::new(
        cfg.watchlist.clone(),
        feed,
        notifier,
        store,
        &cfg.scanner,
    );

    // -- Main loop -------------------------------------------------------

    let mut interval = tokio::time::interval(Duration::from_secs(cfg.scanner.interval_secs));
    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    info!(
        interval_secs = cfg.scanner.interval_secs,
        "Entering scan loop. Press Ctrl+C to stop."
    );

    loop {
        tokio::select! {
            // Cycles never overlap: the next tick waits for this arm.
            _ = interval.tick() => {
                let report = scanner.run_cycle().await;
                log_cycle_report(&report);
            }
            _ = &mut shutdown => {
                info!("Shutdown signal received.");
                break;
            }
        }
    }

    info!("SURGE shut down cleanly.");
    Ok(())
}

/// Build the Telegram notifier if both credentials resolve, otherwise
/// degrade to dashboard-only mode.
fn build_notifier(cfg: &AppConfig) -> Result<Option<Arc<dyn Notifier>>> {
    let token = std::env::var(&cfg.telegram.bot_token_env).ok();
    let chat_id = std::env::var(&cfg.telegram.chat_id_env).ok();

    match (token, chat_id) {
        (Some(token), Some(chat_id)) if !token.is_empty() && !chat_id.is_empty() => {
            info!("Telegram notifier configured");
            Ok(Some(Arc::new(TelegramNotifier::new(token, chat_id)?)))
        }
        _ => {
            warn!(
                token_env = %cfg.telegram.bot_token_env,
                chat_id_env = %cfg.telegram.chat_id_env,
                "Telegram credentials not set — running in dashboard-only mode"
            );
            Ok(None)
        }
    }
}

/// Log a human-readable cycle summary.
fn log_cycle_report(report: &CycleReport) {
    info!(
        cycle = report.cycle,
        scanned = report.scanned,
        no_data = report.no_data,
        published = report.published,
        alerts = report.alerts_sent,
        reset = report.reset,
        "Cycle complete"
    );
}

/// Initialise the `tracing` subscriber.
fn init_logging() {
    use tracing_subscriber::{fmt, EnvFilter};

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("surge=info"));

    let json_logging = std::env::var("SURGE_LOG_JSON").is_ok();

    if json_logging {
        fmt()
            .json()
            .with_env_filter(env_filter)
            .with_target(true)
            .with_thread_ids(true)
            .init();
    } else {
        fmt()
            .with_env_filter(env_filter)
            .with_target(true)
            .init();
    }
}
