use super::failover::FailoverStrategy;
use super::strategy::{QueryContext, UpstreamResult};
use bastion_dns_domain::{DnsProtocol, DomainError};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Round-robins across the pool's servers, falling back to the rest of the
/// pool in order if the chosen server is unreachable.
pub struct BalancedStrategy {
    next: AtomicUsize,
}

impl BalancedStrategy {
    pub fn new() -> Self {
        Self {
            next: AtomicUsize::new(0),
        }
    }

    pub async fn query(&self, ctx: &QueryContext<'_>) -> Result<UpstreamResult, DomainError> {
        if ctx.servers.is_empty() {
            return Err(DomainError::TransportAllServersUnreachable);
        }

        let start = self.next.fetch_add(1, Ordering::Relaxed) % ctx.servers.len();
        let ordered: Vec<Arc<DnsProtocol>> = ctx.servers[start..]
            .iter()
            .chain(ctx.servers[..start].iter())
            .cloned()
            .collect();

        let reordered_ctx = QueryContext {
            servers: &ordered,
            query_bytes: ctx.query_bytes,
            domain: ctx.domain,
            record_type: ctx.record_type,
            timeout_ms: ctx.timeout_ms,
            emitter: ctx.emitter,
        };
        FailoverStrategy::new().query(&reordered_ctx).await
    }
}

impl Default for BalancedStrategy {
    fn default() -> Self {
        Self::new()
    }
}
