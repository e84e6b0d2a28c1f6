use bastion_dns_application::ports::HashPrefixPort;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

pub struct HashPrefixSyncJob {
    filter: Arc<dyn HashPrefixPort>,
    interval_secs: u64,
    shutdown: CancellationToken,
}

impl HashPrefixSyncJob {
    pub fn new(filter: Arc<dyn HashPrefixPort>) -> Self {
        Self {
            filter,
            interval_secs: 86400,
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
        info!(
            interval_secs = self.interval_secs,
            "Starting hash-prefix sync job"
        );

        tokio::spawn(async move {
            let mut interval = tokio::time::interval(Duration::from_secs(self.interval_secs));
            interval.tick().await;

            loop {
                tokio::select! {
                    _ = self.shutdown.cancelled() => {
                        info!("HashPrefixSyncJob: shutting down");
                        break;
                    }
                    _ = interval.tick() => {
                        info!("HashPrefixSyncJob: reloading hash-prefix sources");
                        match self.filter.reload().await {
                            Ok(()) => info!("HashPrefixSyncJob: reload completed successfully"),
                            Err(e) => error!(error = %e, "HashPrefixSyncJob: reload failed"),
                        }
                    }
                }
            }
        });
    }
}
