//! TSETMC instrument-info feed client.
//!
//! The upstream endpoint returns a bare-text record: `;`-separated
//! sections of comma-separated positional fields. The first section
//! carries the session trade fields, the second the best-limit (order
//! book) row. No JSON, no schema — positions are the contract.
//!
//! Parsing is best-effort: any field that is missing or fails
//! to parse becomes zero, once, here. A record with fewer than the
//! minimum field count yields NoData rather than a partially populated
//! quote.

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::debug;

use super::MarketFeed;
use crate::types::{FeedError, Quote};

// ---------------------------------------------------------------------------
// Record layout
// ---------------------------------------------------------------------------

const FEED_NAME: &str = "tsetmc";

/// Minimum comma-field count for the trade section to be trusted.
const MIN_TRADE_FIELDS: usize = 22;

// Trade section positions.
const POS_LAST_PRICE: usize = 2;
const POS_CLOSE_PRICE: usize = 3;
const POS_HIGH_LIMIT: usize = 6;
const POS_VOLUME: usize = 8;
const POS_YESTERDAY_PRICE: usize = 14;
const POS_REAL_BUY_VOLUME: usize = 16;
const POS_REAL_SELL_VOLUME: usize = 17;
const POS_REAL_BUY_COUNT: usize = 18;
const POS_REAL_SELL_COUNT: usize = 19;

// Best-limit section positions (top row only).
const POS_BID_COUNT: usize = 0;
const POS_BID_VOLUME: usize = 1;
const POS_ASK_VOLUME: usize = 4;
const POS_ASK_COUNT: usize = 5;

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

/// TSETMC quote client with a bounded per-request timeout.
pub struct TsetmcClient {
    http: Client,
    base_url: String,
}

impl TsetmcClient {
    /// Create a new client. `timeout` bounds every fetch — the only
    /// timeout boundary in the scan path.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let http = Client::builder()
            .timeout(timeout)
            .user_agent("SURGE/0.1.0 (momentum-scanner)")
            .build()
            .context("Failed to build HTTP client for TSETMC")?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    // -- Internal helpers ------------------------------------------------

    /// Fetch and parse one record. Errors stay inside the feed boundary;
    /// the trait impl maps them to NoData.
    async fn try_fetch(&self, code: &str) -> std::result::Result<Quote, FeedError> {
        let url = format!("{}?i={}&heven=0", self.base_url, code);

        let resp = self.http.get(&url).send().await?;
        if !resp.status().is_success() {
            return Err(FeedError::Status(resp.status()));
        }

        let body = resp.text().await?;
        parse_record(&body)
    }
}

/// Parse a raw instrument-info record into a quote.
fn parse_record(body: &str) -> std::result::Result<Quote, FeedError> {
    if body.trim().is_empty() {
        return Err(FeedError::EmptyBody);
    }

    let sections: Vec<&str> = body.split(';').collect();
    let trade: Vec<&str> = sections[0].split(',').collect();

    if trade.len() < MIN_TRADE_FIELDS {
        return Err(FeedError::TruncatedRecord {
            got: trade.len(),
            need: MIN_TRADE_FIELDS,
        });
    }

    // The best-limit section is optional; a missing book reads as empty.
    let book: Vec<&str> = sections
        .get(1)
        .map(|s| s.split(',').collect())
        .unwrap_or_default();

    Ok(Quote {
        last_price: num(&trade, POS_LAST_PRICE),
        close_price: num(&trade, POS_CLOSE_PRICE),
        high_limit: num(&trade, POS_HIGH_LIMIT),
        volume: int(&trade, POS_VOLUME),
        yesterday_price: num(&trade, POS_YESTERDAY_PRICE),
        real_buy_volume: num(&trade, POS_REAL_BUY_VOLUME),
        real_sell_volume: num(&trade, POS_REAL_SELL_VOLUME),
        real_buy_count: int(&trade, POS_REAL_BUY_COUNT),
        real_sell_count: int(&trade, POS_REAL_SELL_COUNT),
        best_bid_volume: int(&book, POS_BID_VOLUME),
        best_ask_volume: int(&book, POS_ASK_VOLUME),
        best_bid_count: int(&book, POS_BID_COUNT),
        best_ask_count: int(&book, POS_ASK_COUNT),
    })
}

/// Positional float field; missing or unparsable reads as zero.
fn num(parts: &[&str], idx: usize) -> f64 {
    parts
        .get(idx)
        .and_then(|s| s.trim().parse::<f64>().ok())
        .filter(|v| v.is_finite() && *v >= 0.0)
        .unwrap_or(0.0)
}

/// Positional integer field; the feed sometimes emits large counts in
/// float notation, so parse through f64.
fn int(parts: &[&str], idx: usize) -> u64 {
    let v = parts
        .get(idx)
        .and_then(|s| s.trim().parse::<f64>().ok())
        .filter(|v| v.is_finite() && *v >= 0.0)
        .unwrap_or(0.0);
    v as u64
}

// ---------------------------------------------------------------------------
// MarketFeed trait implementation
// ---------------------------------------------------------------------------

#[async_trait]
impl MarketFeed for TsetmcClient {
    async fn fetch_quote(&self, code: &str) -> Option<Quote> {
        match self.try_fetch(code).await {
            Ok(quote) => Some(quote),
            Err(e) => {
                debug!(code, error = %e, "Fetch yielded no data");
                None
            }
        }
    }

    fn name(&self) -> &str {
        FEED_NAME
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
