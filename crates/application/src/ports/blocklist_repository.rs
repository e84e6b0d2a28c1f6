use async_trait::async_trait;
use bastion_dns_domain::{BlockedDomain, DomainError};

/// CRUD over the manual `blocklist` table — the small user-maintained
/// override list, not the compiled rule-list engine.
#[async_trait]
pub trait BlocklistRepository: Send + Sync {
    async fn list(&self) -> Result<Vec<BlockedDomain>, DomainError>;

    async fn add(&self, domain: String) -> Result<BlockedDomain, DomainError>;

    async fn remove(&self, domain: &str) -> Result<(), DomainError>;
}
