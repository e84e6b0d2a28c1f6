use std::sync::Arc;

use bastion_dns_domain::DomainError;

use crate::ports::QueryLogRepository;

/// Deletes query log rows past the configured retention window. Run
/// periodically by `QueryLogRetentionJob`; exposed as a plain use case so
/// tests can drive it without a running job loop.
pub struct CleanupOldQueryLogsUseCase {
    repo: Arc<dyn QueryLogRepository>,
}

impl CleanupOldQueryLogsUseCase {
    pub fn new(repo: Arc<dyn QueryLogRepository>) -> Self {
        Self { repo }
    }

    /// Returns the number of rows deleted.
    pub async fn execute(&self, retention_days: u32) -> Result<u64, DomainError> {
        self.repo.delete_older_than(retention_days).await
    }
}
