//! Keep-alive self-ping.
//!
//! Free-tier hosts idle out processes with no inbound traffic. When an
//! externally reachable URL is configured, a background task GETs it
//! every ten minutes so the platform keeps the instance warm. Failures
//! are logged and ignored — the next ping simply tries again.

use std::time::Duration;
use tracing::{info, warn};

/// Seconds between self-pings.
const PING_PERIOD: Duration = Duration::from_secs(10 * 60);

/// Spawn the keep-alive loop. Does not block.
pub fn spawn_keepalive(url: String) {
    info!(url = %url, "Keep-alive enabled");

    tokio::spawn(async move {
        let client = match reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
        {
            Ok(c) => c,
            Err(e) => {
                warn!(error = %e, "Keep-alive client build failed, pings disabled");
                return;
            }
        };

        let mut interval = tokio::time::interval(PING_PERIOD);
        interval.tick().await; // the first tick completes immediately

        loop {
            interval.tick().await;
            match client.get(&url).send().await {
                Ok(resp) => info!(status = %resp.status(), "Keep-alive ping"),
                Err(e) => warn!(error = %e, "Keep-alive ping failed"),
            }
        }
    });
}
