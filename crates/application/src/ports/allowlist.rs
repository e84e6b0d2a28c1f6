use async_trait::async_trait;
use bastion_dns_domain::DomainError;

/// Fetches the rate-limit allowlist (a flat list of CIDRs) from wherever it
/// is published. The only implementation today is an HTTP JSON poll; the
/// port exists so `AllowlistRefreshJob` doesn't have to know that.
#[async_trait]
pub trait AllowlistFetcherPort: Send + Sync {
    async fn fetch(&self) -> Result<Vec<String>, DomainError>;
}
