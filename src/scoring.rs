//! Momentum scoring.
//!
//! A fixed set of independently-firing heuristic rules over a single
//! immutable quote. Each rule adds a fixed point value and a human-readable
//! factor label; the running total clamps to [0, 100]. Pure and
//! deterministic — no I/O, no shared state, no panics. The rule set is a
//! versioned heuristic: changing any threshold or point value is a
//! behaviour change, not a bug fix.

use crate::types::{Quote, ScoreCard};

// ---------------------------------------------------------------------------
// Rule thresholds and point values
// ---------------------------------------------------------------------------

/// Retail buy power above this marks strong buyer interest.
const BUY_POWER_EXCELLENT: f64 = 1.5;
/// Buy power above this marks an unusually one-sided tape.
const BUY_POWER_VERY_STRONG: f64 = 3.0;

/// Session volume above this counts as a surge.
const VOLUME_SURGE: u64 = 3_000_000;
/// Session volume above this counts as a heavy surge.
const VOLUME_HEAVY: u64 = 8_000_000;

/// Minimum percent change for the near-high breakout rule.
const BREAKOUT_MIN_CHANGE_PCT: f64 = 1.0;

/// Retail buy/sell order-count ratio thresholds.
const COUNT_IMBALANCE: f64 = 1.2;
const COUNT_IMBALANCE_STRONG: f64 = 2.0;

/// Thin-ask order book pattern: an empty ask queue opposite a huge bid
/// queue held by few orders is a manipulation tell, not strength.
const WEAK_QUEUE_BID_VOLUME: u64 = 100_000_000;
const WEAK_QUEUE_MAX_ASK_COUNT: u64 = 5;
const WEAK_QUEUE_MIN_BID_COUNT: u64 = 50;

// ---------------------------------------------------------------------------
// Scorer
// ---------------------------------------------------------------------------

/// Score one quote. Rules are additive and only read the quote, so
/// evaluation order affects nothing but the factor list ordering.
pub fn score(quote: &Quote) -> ScoreCard {
    let mut total: i32 = 0;
    let mut factors: Vec<String> = Vec::new();

    // Smart-money entry: retail buy volume swamping retail sell volume.
    let buy_power = quote.real_buy_power();
    if buy_power > BUY_POWER_EXCELLENT {
        total += 20;
        factors.push("buy power excellent".to_string());
        if buy_power > BUY_POWER_VERY_STRONG {
            total += 15;
            factors.push("buy power very strong".to_string());
        }
    }

    // Volume surge, tiered. One label describing the strongest tier.
    if quote.volume > VOLUME_SURGE {
        total += 15;
        if quote.volume > VOLUME_HEAVY {
            total += 10;
            factors.push("heavy volume surge".to_string());
        } else {
            factors.push("volume surge".to_string());
        }
    }

    // Early breakout: real price movement pressing the session limit.
    if quote.price_change_percent() > BREAKOUT_MIN_CHANGE_PCT && quote.is_near_high() {
        total += 15;
        factors.push("breakout near high limit".to_string());
    }
    if quote.close_price > quote.yesterday_price {
        total += 10;
        factors.push("close above yesterday".to_string());
    }

    // Buyer/seller order-count imbalance, tiered like volume.
    let count_ratio = quote.real_count_ratio();
    if count_ratio > COUNT_IMBALANCE {
        total += 10;
        if count_ratio > COUNT_IMBALANCE_STRONG {
            total += 10;
            factors.push("strong buyer count imbalance".to_string());
        } else {
            factors.push("buyer count imbalance".to_string());
        }
    }

    // Weak-queue risk: empty ask side against a massive, concentrated bid
    // queue reads as a thin, potentially staged book.
    if quote.best_ask_volume == 0
        && quote.best_bid_volume > WEAK_QUEUE_BID_VOLUME
        && quote.best_ask_count < WEAK_QUEUE_MAX_ASK_COUNT
        && quote.best_bid_count > WEAK_QUEUE_MIN_BID_COUNT
    {
        total -= 20;
        factors.push("weak buy queue risk".to_string());
    }

    ScoreCard {
        total: total.clamp(0, 100) as u8,
        factors,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
