//! Shared types for the SURGE agent.
//!
//! These types form the data model used across all modules: the static
//! watch-list entry, the per-symbol quote snapshot, the score card the
//! scorer produces, and the published results snapshot the dashboard
//! reads. They are designed to be stable so that feed, engine, and
//! dashboard modules can depend on them without circular references.

use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// Instrument
// ---------------------------------------------------------------------------

/// One watch-list entry: a human display name and the exchange code the
/// feed is queried with. Display names are the unique key of the
/// watch-list; the set is fixed for the process lifetime.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Instrument {
    pub name: String,
    pub code: String,
}

impl fmt::Display for Instrument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.code)
    }
}

// ---------------------------------------------------------------------------
// Quote
// ---------------------------------------------------------------------------

/// A point-in-time quote for one instrument.
///
/// Every field is a non-negative observation taken from the upstream
/// record. A field the feed could not parse arrives here as zero — the
/// normalisation happens once at the feed boundary, so consumers never
/// guard against absent data, only against zero denominators.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Quote {
    pub last_price: f64,
    pub close_price: f64,
    /// Session high-limit price (maximum allowed price for the day).
    pub high_limit: f64,
    pub volume: u64,
    /// Previous session's closing price.
    pub yesterday_price: f64,
    /// Traded volume attributed to individual (retail) buyers.
    pub real_buy_volume: f64,
    /// Traded volume attributed to individual (retail) sellers.
    pub real_sell_volume: f64,
    pub real_buy_count: u64,
    pub real_sell_count: u64,
    pub best_bid_volume: u64,
    pub best_ask_volume: u64,
    pub best_bid_count: u64,
    pub best_ask_count: u64,
}

impl Quote {
    /// Retail buy volume over retail sell volume. Zero when there is no
    /// retail sell volume — never infinite or NaN.
    pub fn real_buy_power(&self) -> f64 {
        if self.real_sell_volume > 0.0 {
            self.real_buy_volume / self.real_sell_volume
        } else {
            0.0
        }
    }

    /// Percent change of the close against yesterday's close. Zero when
    /// yesterday's close is zero (new listing, halted symbol), so no
    /// NaN/Infinity ever reaches the scorer.
    pub fn price_change_percent(&self) -> f64 {
        if self.yesterday_price > 0.0 {
            (self.close_price - self.yesterday_price) / self.yesterday_price * 100.0
        } else {
            0.0
        }
    }

    /// Whether the last trade sits within 0.5% of the session high-limit.
    /// False when no high-limit is published.
    pub fn is_near_high(&self) -> bool {
        if self.high_limit > 0.0 {
            (self.high_limit - self.last_price) / self.high_limit < 0.005
        } else {
            false
        }
    }

    /// Retail buy-order count over retail sell-order count. Zero when
    /// there are no retail sell orders.
    pub fn real_count_ratio(&self) -> f64 {
        if self.real_sell_count > 0 {
            self.real_buy_count as f64 / self.real_sell_count as f64
        } else {
            0.0
        }
    }

    /// Helper to build a quote with unremarkable mid-session values —
    /// scores zero. Tests override individual fields.
    #[cfg(test)]
    pub fn sample() -> Self {
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
}

impl fmt::Display for Quote {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "last={:.0} close={:.0} ({:+.2}%) vol={} power={:.2}",
            self.last_price,
            self.close_price,
            self.price_change_percent(),
            self.volume,
            self.real_buy_power(),
        )
    }
}

// ---------------------------------------------------------------------------
// ScoreCard
// ---------------------------------------------------------------------------

/// Output of the scorer: a clamped total and the fired rule labels in
/// evaluation order. Recomputed every cycle; has no identity of its own.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreCard {
    pub total: u8,
    pub factors: Vec<String>,
}

impl fmt::Display for ScoreCard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/100 [{}]", self.total, self.factors.join(", "))
    }
}

// ---------------------------------------------------------------------------
// Published results
// ---------------------------------------------------------------------------

/// One row of the published snapshot: the instrument, its score, and the
/// quote fields the dashboard renders. Serialises in camelCase to match
/// the `/api/stocks` wire shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanEntry {
    pub name: String,
    pub code: String,
    pub score: u8,
    pub factors: Vec<String>,
    pub last_price: f64,
    pub close_price: f64,
    pub high_limit: f64,
    pub volume: u64,
    pub yesterday_price: f64,
    pub real_buy_volume: f64,
    pub real_sell_volume: f64,
    pub price_change_percent: f64,
    pub real_buy_power: f64,
    pub last_update: String,
}

impl ScanEntry {
    /// Assemble a row from the pieces the orchestrator has in hand.
    pub fn new(instrument: &Instrument, card: &ScoreCard, quote: &Quote, last_update: &str) -> Self {
        ScanEntry {
            name: instrument.name.clone(),
            code: instrument.code.clone(),
            score: card.total,
            factors: card.factors.clone(),
            last_price: quote.last_price,
            close_price: quote.close_price,
            high_limit: quote.high_limit,
            volume: quote.volume,
            yesterday_price: quote.yesterday_price,
            real_buy_volume: quote.real_buy_volume,
            real_sell_volume: quote.real_sell_volume,
            price_change_percent: quote.price_change_percent(),
            real_buy_power: quote.real_buy_power(),
            last_update: last_update.to_string(),
        }
    }
}

/// The immutable snapshot a completed cycle publishes. Readers always get
/// a whole snapshot or the empty initial one — never a partial build.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScanSnapshot {
    /// Local time string of cycle completion; empty until the first
    /// cycle finishes.
    pub timestamp: String,
    pub stocks: Vec<ScanEntry>,
}

// ---------------------------------------------------------------------------
// Cycle report
// ---------------------------------------------------------------------------

/// Summary of a single scan cycle, for structured logging.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CycleReport {
    pub cycle: u64,
    pub scanned: usize,
    pub no_data: usize,
    pub published: usize,
    pub alerts_sent: usize,
    pub reset: bool,
}

impl fmt::Display for CycleReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Cycle #{}: scanned={} no_data={} published={} alerts={}{}",
            self.cycle,
            self.scanned,
            self.no_data,
            self.published,
            self.alerts_sent,
            if self.reset { " (alert reset)" } else { "" },
        )
    }
}

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Failures internal to the feed boundary. These never cross the
/// `MarketFeed` trait — the client maps them all to NoData.
#[derive(Debug, thiserror::Error)]
pub enum FeedError {
    #[error("http request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("upstream returned status {0}")]
    Status(reqwest::StatusCode),

    #[error("record too short: {got} fields, expected at least {need}")]
    TruncatedRecord { got: usize, need: usize },

    #[error("empty response body")]
    EmptyBody,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
