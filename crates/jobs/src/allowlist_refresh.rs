use bastion_dns_application::ports::{AllowlistFetcherPort, RateLimiterPort};
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

pub struct AllowlistRefreshJob {
    fetcher: Arc<dyn AllowlistFetcherPort>,
    limiter: Arc<dyn RateLimiterPort>,
    interval_secs: u64,
    shutdown: CancellationToken,
}

impl AllowlistRefreshJob {
    pub fn new(fetcher: Arc<dyn AllowlistFetcherPort>, limiter: Arc<dyn RateLimiterPort>) -> Self {
        Self {
            fetcher,
            limiter,
            interval_secs: 300,
            shutdown: CancellationToken::new(),
        }
    }

    pub fn with_interval(mut self, interval_secs: u64) -> Self {
        self.interval_secs = interval_secs;
        self
    }

    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.shutdown = token;
        self
    }

    pub async fn start(self: Arc<Self>) {
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(Duration::from_secs(self.interval_secs));
            interval.tick().await;
            loop {
                tokio::select! {
                    _ = self.shutdown.cancelled() => {
                        info!("Allowlist refresh job shutting down");
                        break;
                    }
                    _ = interval.tick() => {
                        match self.fetcher.fetch().await {
                            Ok(cidrs) => {
                                let count = cidrs.len();
                                if let Err(err) = self.limiter.reload_allowlist(cidrs) {
                                    error!(error = %err, "Failed to apply refreshed allowlist");
                                } else {
                                    info!(entries = count, "Refreshed rate-limit allowlist");
                                }
                            }
                            Err(err) => error!(error = %err, "Failed to fetch rate-limit allowlist"),
                        }
                    }
                }
            }
        });
    }
}
