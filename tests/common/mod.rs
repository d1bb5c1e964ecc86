//! Deterministic in-memory doubles for end-to-end tests.
//!
//! `ScriptedFeed` serves whatever quotes the test installs (absent code =
//! NoData) and `RecordingNotifier` captures every delivered message —
//! no network, no timing dependence beyond the fire-and-forget dispatch.

use anyhow::Result;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;

use surge::feed::MarketFeed;
use surge::notify::Notifier;
use surge::types::Quote;

// ---------------------------------------------------------------------------
// ScriptedFeed
// ---------------------------------------------------------------------------

/// A feed whose per-code responses are fully controlled by test code and
/// can change between cycles.
#[derive(Default)]
pub struct ScriptedFeed {
    quotes: Mutex<HashMap<String, Quote>>,
}

impl ScriptedFeed {
    pub fn new() -> Self {
        Self::default()
    }

    /// Install (or replace) the quote served for a code.
    pub fn set_quote(&self, code: &str, quote: Quote) {
        self.quotes.lock().unwrap().insert(code.to_string(), quote);
    }

    /// Make a code return NoData from now on.
    pub fn clear_quote(&self, code: &str) {
        self.quotes.lock().unwrap().remove(code);
    }
}

#[async_trait]
impl MarketFeed for ScriptedFeed {
    async fn fetch_quote(&self, code: &str) -> Option<Quote> {
        self.quotes.lock().unwrap().get(code).cloned()
    }

    fn name(&self) -> &str {
        "scripted"
    }
}

// ---------------------------------------------------------------------------
// RecordingNotifier
// ---------------------------------------------------------------------------

/// Captures every message; optionally rejects deliveries to exercise the
/// failure path.
#[derive(Default)]
pub struct RecordingNotifier {
    messages: Mutex<Vec<String>>,
    fail: Mutex<bool>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// All messages delivered so far, in order.
    pub fn sent(&self) -> Vec<String> {
        self.messages.lock().unwrap().clone()
    }

    /// Reject all subsequent deliveries.
    pub fn set_failing(&self, failing: bool) {
        *self.fail.lock().unwrap() = failing;
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn notify(&self, text: &str) -> Result<()> {
        if *self.fail.lock().unwrap() {
            anyhow::bail!("scripted delivery failure");
        }
        self.messages.lock().unwrap().push(text.to_string());
        Ok(())
    }

    fn name(&self) -> &str {
        "recording"
    }
}

// ---------------------------------------------------------------------------
// Quote builders
// ---------------------------------------------------------------------------

/// A flat, balanced quote that scores zero.
pub fn neutral_quote() -> Quote {
    Quote {
        last_price: 5000.0,
        close_price: 5000.0,
        high_limit: 5250.0,
        volume: 1_000_000,
        yesterday_price: 5000.0,
        real_buy_volume: 400_000.0,
        real_sell_volume: 400_000.0,
        real_buy_count: 100,
        real_sell_count: 100,
        best_bid_volume: 50_000,
        best_ask_volume: 50_000,
        best_bid_count: 10,
        best_ask_count: 10,
    }
}

/// Scores 80: buy power 4.0 (+35), heavy volume (+25), close above
/// yesterday (+10), buyer count imbalance (+10).
pub fn strong_quote() -> Quote {
    Quote {
        close_price: 5020.0,
        volume: 9_000_000,
        real_buy_volume: 800_000.0,
        real_sell_volume: 200_000.0,
        real_buy_count: 150,
        real_sell_count: 100,
        ..neutral_quote()
    }
}

/// Scores 70 — inside the 60..75 dead band: buy power 4.0 (+35),
/// heavy volume (+25), close above yesterday (+10).
pub fn dead_band_quote() -> Quote {
    Quote {
        real_buy_count: 100,
        real_sell_count: 100,
        ..strong_quote()
    }
}
