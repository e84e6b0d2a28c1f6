use super::RecordType;
use std::net::IpAddr;
use std::sync::Arc;

/// EDNS Client Subnet scope attached to a query: the client's address
/// truncated to `scope_prefix` bits. Carried alongside a `DnsQuery` so the
/// cache layer can partition answers that legitimately differ by subnet
/// (e.g. a CDN returning a different edge IP) without polluting the shared,
/// subnet-agnostic cache partition used by queries with no ECS hint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EcsScope {
    pub subnet: IpAddr,
    pub scope_prefix: u8,
}

impl EcsScope {
    /// Truncates `client_ip` to its network address at `scope_prefix` bits.
    pub fn new(client_ip: IpAddr, scope_prefix: u8) -> Self {
        let subnet = match ipnetwork::IpNetwork::new(client_ip, scope_prefix) {
            Ok(net) => net.network(),
            Err(_) => client_ip,
        };
        Self { subnet, scope_prefix }
    }
}

/// DNS query (domain + record type), with an optional ECS scope.
/// Uses `Arc<str>` for zero-cost cloning across resolver → cache → prefetch layers.
#[derive(Debug, Clone)]
pub struct DnsQuery {
    pub domain: Arc<str>,
    pub record_type: RecordType,
    pub ecs: Option<EcsScope>,
}

impl DnsQuery {
    pub fn new(domain: impl Into<Arc<str>>, record_type: RecordType) -> Self {
        Self {
            domain: domain.into(),
            record_type,
            ecs: None,
        }
    }

    pub fn with_ecs(mut self, ecs: Option<EcsScope>) -> Self {
        self.ecs = ecs;
        self
    }
}
