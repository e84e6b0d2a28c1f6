use async_trait::async_trait;
use bastion_dns_domain::DomainError;
use std::time::Duration;

/// Minimal key-value store, pluggable so the DNSCheck engine can run against
/// an in-process map in dev/test and a shared Consul or Redis store in
/// production without changing call sites.
#[async_trait]
pub trait KvStorePort: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>, DomainError>;
    async fn set(&self, key: &str, value: &str, ttl: Option<Duration>) -> Result<(), DomainError>;
    async fn delete(&self, key: &str) -> Result<(), DomainError>;
}

/// DNSCheck: answers whether a given "check domain" query originated from a
/// client that is reachable and correctly configured, recording the result
/// in the `KvStorePort` so a later HTTP poll can read it back.
#[async_trait]
pub trait DnsCheckPort: Send + Sync {
    /// `true` if `qname` is a recognized check-domain pattern for this
    /// server (e.g. `<token>.check.example.com`).
    fn is_check_domain(&self, qname: &str) -> bool;

    /// Record that `token` was observed, keyed so a follow-up status poll
    /// can confirm resolution succeeded.
    async fn record_check(&self, token: &str, client_ip: std::net::IpAddr) -> Result<(), DomainError>;

    async fn check_status(&self, token: &str) -> Result<bool, DomainError>;
}
