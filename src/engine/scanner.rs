//! Scan cycle orchestrator.
//!
//! One `run_cycle` call drives the whole pipeline for the watch-list:
//! fan out the fetches, score each quote, walk the alert state machine,
//! dispatch notifications fire-and-forget, and publish a fresh snapshot
//! in a single atomic swap. Cycles never overlap — the binary's timer
//! awaits one cycle before ticking the next — so the alert book and the
//! publish path have exactly one writer.

use futures::future;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::Arc;
use tracing::{debug, info, warn};

use super::alerts::{AlertBook, Transition};
use crate::config::ScannerConfig;
use crate::feed::MarketFeed;
use crate::notify::{self, Notifier};
use crate::scoring;
use crate::store::SnapshotStore;
use crate::types::{CycleReport, Instrument, Quote, ScanEntry, ScanSnapshot, ScoreCard};

/// The per-cycle orchestrator. Owns the alert book; everything shared is
/// behind the feed/notifier traits and the snapshot store handle.
pub struct Scanner {
    watchlist: Vec<Instrument>,
    feed: Arc<dyn MarketFeed>,
    /// Absent in dashboard-only mode (no credentials configured).
    notifier: Option<Arc<dyn Notifier>>,
    store: SnapshotStore,
    alerts: AlertBook,
    reset_probability: f64,
    rng: StdRng,
    cycle_count: u64,
}

impl Scanner {
    pub fn new(
        watchlist: Vec<Instrument>,
        feed: Arc<dyn MarketFeed>,
        notifier: Option<Arc<dyn Notifier>>,
        store: SnapshotStore,
        cfg: &ScannerConfig,
    ) -> Self {
        Self {
            watchlist,
            feed,
            notifier,
            store,
            alerts: AlertBook::new(cfg.alert_threshold, cfg.clear_threshold),
            reset_probability: cfg.reset_probability,
            rng: StdRng::from_entropy(),
            cycle_count: 0,
        }
    }

    /// Run one scan cycle over the full watch-list.
    ///
    /// A NoData fetch skips that instrument — no score, no state change,
    /// no snapshot entry — and never aborts the rest of the cycle.
    pub async fn run_cycle(&mut self) -> CycleReport {
        self.cycle_count += 1;

        // One independent draw per cycle; a hit wipes the alert book so
        // persistent strong signals get to notify again.
        let reset = self
            .alerts
            .maybe_reset(&mut self.rng, self.reset_probability);
        if reset {
            info!(cycle = self.cycle_count, "Alert book reset");
        }

        // Fan out: one fetch task per instrument, read-only with respect
        // to shared state. join_all keeps results in watch-list order.
        let fetches = self.watchlist.iter().map(|instrument| {
            let feed = Arc::clone(&self.feed);
            let code = instrument.code.clone();
            async move { feed.fetch_quote(&code).await }
        });
        let quotes: Vec<Option<Quote>> = future::join_all(fetches).await;

        let now = chrono::Local::now().format("%H:%M:%S").to_string();
        let mut stocks: Vec<ScanEntry> = Vec::new();
        let mut no_data = 0usize;
        let mut alerts_sent = 0usize;

        // Serial pass: all alert-book mutation happens here, in
        // watch-list order, on this one logical thread.
        for (instrument, quote) in self.watchlist.iter().zip(quotes) {
            let Some(quote) = quote else {
                no_data += 1;
                debug!(symbol = %instrument.name, "No data this cycle");
                continue;
            };

            let card = scoring::score(&quote);
            let transition = self.alerts.observe(&instrument.name, card.total);

            if card.total >= self.alerts.alert_threshold() {
                stocks.push(ScanEntry::new(instrument, &card, &quote, &now));
            }

            match transition {
                Transition::Notify => {
                    if self.dispatch_alert(instrument, &card, &quote) {
                        alerts_sent += 1;
                    }
                }
                Transition::Clear => {
                    debug!(symbol = %instrument.name, score = card.total, "Alert cleared");
                }
                Transition::Hold | Transition::Idle => {}
            }
        }

        let published = stocks.len();
        self.store
            .publish(ScanSnapshot {
                timestamp: now,
                stocks,
            })
            .await;

        CycleReport {
            cycle: self.cycle_count,
            scanned: self.watchlist.len(),
            no_data,
            published,
            alerts_sent,
            reset,
        }
    }

    /// Fire-and-forget notification dispatch. The cycle does not await
    /// delivery; the spawned task logs failure and drops it. Returns
    /// whether anything was dispatched (false in dashboard-only mode).
    fn dispatch_alert(&self, instrument: &Instrument, card: &ScoreCard, quote: &Quote) -> bool {
        let Some(notifier) = &self.notifier else {
            debug!(symbol = %instrument.name, "No notifier configured, alert suppressed");
            return false;
        };

        let text = notify::format_alert(&instrument.name, card, quote);
        let symbol = instrument.name.clone();
        let notifier = Arc::clone(notifier);

        info!(symbol = %symbol, score = card.total, "Dispatching alert");
        tokio::spawn(async move {
            if let Err(e) = notifier.notify(&text).await {
                warn!(symbol = %symbol, error = %e, "Alert delivery failed");
            }
        });

        true
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
