use bastion_dns_domain::QueryLog;
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct QueryResponse {
    pub domain: String,
    pub record_type: String,
    pub client_ip: String,
    pub blocked: bool,
    pub response_time_ms: Option<u64>,
    pub cache_hit: bool,
    pub dnssec_status: Option<&'static str>,
    pub upstream_server: Option<String>,
    pub timestamp: Option<String>,
}

impl From<QueryLog> for QueryResponse {
    fn from(log: QueryLog) -> Self {
        Self {
            domain: log.domain.to_string(),
            record_type: log.record_type.to_string(),
            client_ip: log.client_ip.to_string(),
            blocked: log.blocked,
            response_time_ms: log.response_time_ms,
            cache_hit: log.cache_hit,
            dnssec_status: log.dnssec_status,
            upstream_server: log.upstream_server,
            timestamp: log.timestamp,
        }
    }
}
