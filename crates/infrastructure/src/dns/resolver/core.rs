use super::super::load_balancer::PoolManager;
use async_trait::async_trait;
use bastion_dns_application::ports::{DnsResolution, DnsResolver};
use bastion_dns_domain::{DnsQuery, DomainError};
use std::sync::Arc;

/// Bottom of the resolver decorator chain: forwards every query to the
/// configured upstream pools and has no opinion on caching, DNSSEC, or
/// filtering.
pub struct CoreResolver {
    pool_manager: Arc<PoolManager>,
    query_timeout_ms: u64,
    dnssec_enabled: bool,
    local_domain: Option<String>,
    local_dns_server: Option<String>,
}

impl CoreResolver {
    pub fn new(pool_manager: Arc<PoolManager>, query_timeout_ms: u64, dnssec_enabled: bool) -> Self {
        Self {
            pool_manager,
            query_timeout_ms,
            dnssec_enabled,
            local_domain: None,
            local_dns_server: None,
        }
    }

    pub fn with_local_domain(mut self, domain: Option<String>) -> Self {
        self.local_domain = domain;
        self
    }

    pub fn with_local_dns_server(mut self, server: Option<String>) -> Self {
        self.local_dns_server = server;
        self
    }
}

#[async_trait]
impl DnsResolver for CoreResolver {
    async fn resolve(&self, query: &DnsQuery) -> Result<DnsResolution, DomainError> {
        let result = self
            .pool_manager
            .query(&query.domain, &query.record_type, self.query_timeout_ms)
            .await?;

        let response = result.response;

        if response.is_nxdomain() {
            return Err(DomainError::NxDomain);
        }

        let dnssec_status = if self.dnssec_enabled {
            Some("insecure")
        } else {
            None
        };

        Ok(DnsResolution {
            addresses: Arc::new(response.addresses),
            cache_hit: false,
            local_dns: false,
            dnssec_status,
            cname_chain: Arc::from(response.cname_chain),
            upstream_server: Some(Arc::from(result.server.to_string().as_str())),
            upstream_pool: None,
            min_ttl: response.min_ttl,
            negative_soa_ttl: response.negative_soa_ttl,
            upstream_wire_data: Some(response.raw_bytes),
        })
    }
}
