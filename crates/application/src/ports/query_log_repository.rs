use async_trait::async_trait;
use bastion_dns_domain::{DomainError, QueryLog};

/// Opaque persistence contract for the query log, kept separate from the
/// hot-path `RuleStatRecorderPort`/`BillstatRecorderPort` counters: this is
/// the per-query audit trail an admin can page through, not an aggregate.
#[async_trait]
pub trait QueryLogRepository: Send + Sync {
    async fn insert(&self, entry: QueryLog) -> Result<(), DomainError>;

    async fn recent(&self, limit: usize) -> Result<Vec<QueryLog>, DomainError>;

    /// Delete every entry older than `retention_days`. Returns the count
    /// removed, so the retention job can log how much it reclaimed.
    async fn delete_older_than(&self, retention_days: u32) -> Result<u64, DomainError>;
}
