use crate::{
    AllowlistRefreshJob, BillstatUploadJob, BlocklistSyncJob, HashPrefixSyncJob, QueryLogRetentionJob,
    RuleStatUploadJob,
};
use std::sync::Arc;
use tracing::info;

/// Central orchestrator for all background jobs.
///
/// Use the builder pattern to register jobs, then call `.start()` once.
/// The forwarder health-check loop is not registered here — it is started
/// directly from the CLI composition root against the infrastructure
/// crate's `HealthChecker`, which already owns its own lifecycle.
///
/// # Example
///
/// ```rust,ignore
/// JobRunner::new()
///     .with_query_log_retention(QueryLogRetentionJob::new(cleanup, 30))
///     .with_blocklist_sync(BlocklistSyncJob::new(engine))
///     .start()
///     .await;
/// ```
#[derive(Default)]
pub struct JobRunner {
    query_log_retention: Option<QueryLogRetentionJob>,
    blocklist_sync: Option<BlocklistSyncJob>,
    hash_prefix_sync: Option<HashPrefixSyncJob>,
    allowlist_refresh: Option<AllowlistRefreshJob>,
    billstat_upload: Option<BillstatUploadJob>,
    rulestat_upload: Option<RuleStatUploadJob>,
}

impl JobRunner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_query_log_retention(mut self, job: QueryLogRetentionJob) -> Self {
        self.query_log_retention = Some(job);
        self
    }

    pub fn with_blocklist_sync(mut self, job: BlocklistSyncJob) -> Self {
        self.blocklist_sync = Some(job);
        self
    }

    pub fn with_hash_prefix_sync(mut self, job: HashPrefixSyncJob) -> Self {
        self.hash_prefix_sync = Some(job);
        self
    }

    pub fn with_allowlist_refresh(mut self, job: AllowlistRefreshJob) -> Self {
        self.allowlist_refresh = Some(job);
        self
    }

    pub fn with_billstat_upload(mut self, job: BillstatUploadJob) -> Self {
        self.billstat_upload = Some(job);
        self
    }

    pub fn with_rulestat_upload(mut self, job: RuleStatUploadJob) -> Self {
        self.rulestat_upload = Some(job);
        self
    }

    /// Start all registered background jobs.
    pub async fn start(self) {
        info!("Starting background job runner");

        if let Some(job) = self.query_log_retention {
            Arc::new(job).start().await;
        }
        if let Some(job) = self.blocklist_sync {
            Arc::new(job).start().await;
        }
        if let Some(job) = self.hash_prefix_sync {
            Arc::new(job).start().await;
        }
        if let Some(job) = self.allowlist_refresh {
            Arc::new(job).start().await;
        }
        if let Some(job) = self.billstat_upload {
            Arc::new(job).start().await;
        }
        if let Some(job) = self.rulestat_upload {
            Arc::new(job).start().await;
        }

        info!("All background jobs started");
    }
}
