use super::query::query_server;
use super::strategy::{QueryContext, UpstreamResult};
use bastion_dns_domain::DomainError;
use futures::stream::FuturesUnordered;
use futures::StreamExt;

/// Queries every healthy server in the pool concurrently and returns the
/// first answer. The rest keep running to completion in the background
/// (dropped once the first result resolves this future).
pub struct ParallelStrategy;

impl ParallelStrategy {
    pub fn new() -> Self {
        Self
    }

    pub async fn query(&self, ctx: &QueryContext<'_>) -> Result<UpstreamResult, DomainError> {
        if ctx.servers.is_empty() {
            return Err(DomainError::TransportAllServersUnreachable);
        }

        let mut attempts: FuturesUnordered<_> = ctx
            .servers
            .iter()
            .map(|server| {
                query_server(
                    server,
                    ctx.query_bytes,
                    ctx.domain,
                    ctx.record_type,
                    ctx.timeout_ms,
                    ctx.emitter,
                )
            })
            .collect();

        let mut last_err = DomainError::TransportAllServersUnreachable;
        while let Some(result) = attempts.next().await {
            match result {
                Ok(result) => return Ok(result),
                Err(e) => last_err = e,
            }
        }
        Err(last_err)
    }
}

impl Default for ParallelStrategy {
    fn default() -> Self {
        Self::new()
    }
}
