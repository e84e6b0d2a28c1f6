use async_trait::async_trait;
use bastion_dns_domain::DomainError;
use std::collections::HashMap;

/// Per-(profile, rule) block counters, recorded on the hot path and
/// periodically snapshotted-and-reset by `RuleStatUploadJob`.
pub trait RuleStatRecorderPort: Send + Sync {
    fn record_block(&self, profile_id: i64, list_id: &str);

    /// Take the current counters and reset them to zero, returning what was
    /// taken. Not atomic across keys, but each key's swap is.
    fn snapshot_and_reset(&self) -> HashMap<(i64, String), u64>;

    /// Add counts back in after a failed upload, so nothing is lost.
    fn merge_back(&self, counts: HashMap<(i64, String), u64>);
}

/// Per-device query counters for billing, same snapshot/merge-back shape as
/// `RuleStatRecorderPort`.
pub trait BillstatRecorderPort: Send + Sync {
    fn record_query(&self, device_id: &str, bytes: u64);

    fn snapshot_and_reset(&self) -> HashMap<String, (u64, u64)>;

    fn merge_back(&self, counts: HashMap<String, (u64, u64)>);
}

/// Uploads a snapshot to wherever stats are collected centrally. Separate
/// from the recorder ports because the recorder lives on the hot path and
/// the uploader doesn't.
#[async_trait]
pub trait StatsUploaderPort<T>: Send + Sync {
    async fn upload(&self, snapshot: T) -> Result<(), DomainError>;
}
