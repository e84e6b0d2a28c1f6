use async_trait::async_trait;
use bastion_dns_domain::{DomainError, Group, GroupStats};

/// Persistence contract for the admin-managed group table. Groups are the
/// unit `client_subnets`/`blocklist_sources`/`profiles` attach to; this
/// port never reaches into those tables itself (see `GroupHasAssignedClients`
/// guard in `DeleteGroupUseCase` for the one place that cares).
#[async_trait]
pub trait GroupRepository: Send + Sync {
    async fn create(&self, name: String, comment: Option<String>) -> Result<Group, DomainError>;

    async fn get_by_id(&self, id: i64) -> Result<Option<Group>, DomainError>;

    async fn get_all(&self) -> Result<Vec<Group>, DomainError>;

    async fn update(
        &self,
        id: i64,
        name: Option<String>,
        comment: Option<String>,
    ) -> Result<Group, DomainError>;

    async fn delete(&self, id: i64) -> Result<(), DomainError>;

    /// Number of rows in `client_subnets` referencing this group, used to
    /// guard deletion of a group still in use.
    async fn count_assigned_subnets(&self, id: i64) -> Result<u64, DomainError>;

    async fn stats(&self) -> Result<GroupStats, DomainError>;
}
