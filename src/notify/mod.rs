//! Outbound notifications.
//!
//! Defines the `Notifier` trait the scan cycle dispatches through and the
//! Telegram implementation. Delivery is best-effort fire-and-forget: the
//! orchestrator spawns the send and moves on; a failure is logged at the
//! dispatch site and never retried, never surfaced to the cycle.

pub mod telegram;

use anyhow::Result;
use async_trait::async_trait;

use crate::types::{Quote, ScoreCard};

/// Abstraction over the notification channel.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Attempt to deliver one message. An `Err` means delivery failed —
    /// the caller logs it and drops it.
    async fn notify(&self, text: &str) -> Result<()>;

    /// Channel name for logging and identification.
    fn name(&self) -> &str;
}

/// Format the alert body for one instrument: name, score, last price,
/// percent change, retail buy power, and the fired factor list. HTML,
/// single fixed destination.
pub fn format_alert(name: &str, card: &ScoreCard, quote: &Quote) -> String {
    format!(
        "🚨 <b>Strong signal!</b>\nSymbol: {}\nScore: {}/100\nPrice: {:.0}\nChange: {:+.2}%\nReal buy power: {:.2}\nFactors: {}",
        name,
        card.total,
        quote.last_price,
        quote.price_change_percent(),
        quote.real_buy_power(),
        card.factors.join(", "),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_alert_contents() {
        let quote = Quote {
            last_price: 5240.0,
            close_price: 5200.0,
            yesterday_price: 5000.0,
            real_buy_volume: 700_000.0,
            real_sell_volume: 200_000.0,
            ..Quote::sample()
        };
        let card = ScoreCard {
            total: 80,
            factors: vec![
                "buy power very strong".to_string(),
                "close above yesterday".to_string(),
            ],
        };

        let text = format_alert("فولاد", &card, &quote);
        assert!(text.contains("فولاد"));
        assert!(text.contains("80/100"));
        assert!(text.contains("5240"));
        assert!(text.contains("+4.00%"));
        assert!(text.contains("3.50"));
        assert!(text.contains("buy power very strong, close above yesterday"));
        assert!(text.contains("<b>"));
    }

    #[test]
    fn test_format_alert_no_factors() {
        let card = ScoreCard { total: 75, factors: vec![] };
        let text = format_alert("خودرو", &card, &Quote::sample());
        assert!(text.contains("75/100"));
        assert!(text.ends_with("Factors: "));
    }
}
