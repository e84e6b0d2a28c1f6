use bastion_dns_application::ports::{BillstatRecorderPort, StatsUploaderPort};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

pub struct BillstatUploadJob {
    recorder: Arc<dyn BillstatRecorderPort>,
    uploader: Arc<dyn StatsUploaderPort<HashMap<String, (u64, u64)>>>,
    interval_secs: u64,
    shutdown: CancellationToken,
}

impl BillstatUploadJob {
    pub fn new(
        recorder: Arc<dyn BillstatRecorderPort>,
        uploader: Arc<dyn StatsUploaderPort<HashMap<String, (u64, u64)>>>,
    ) -> Self {
        Self {
            recorder,
            uploader,
            interval_secs: 60,
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
                        info!("Bill-stat upload job shutting down");
                        break;
                    }
                    _ = interval.tick() => {
                        let snapshot = self.recorder.snapshot_and_reset();
                        if snapshot.is_empty() {
                            continue;
                        }
                        let count = snapshot.len();
                        if let Err(err) = self.uploader.upload(snapshot.clone()).await {
                            error!(error = %err, devices = count, "Bill-stat upload failed, merging counts back");
                            self.recorder.merge_back(snapshot);
                        } else {
                            info!(devices = count, "Uploaded bill-stat snapshot");
                        }
                    }
                }
            }
        });
    }
}
