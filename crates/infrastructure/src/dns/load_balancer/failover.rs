use super::query::query_server;
use super::strategy::QueryContext;
use crate::dns::forwarding::ResponseParser;
use bastion_dns_domain::DomainError;
use tracing::debug;

/// Always prefers the first server, advancing only on transport failure.
pub struct FailoverStrategy;

impl FailoverStrategy {
    pub fn new() -> Self {
        Self
    }

    pub async fn query(
        &self,
        ctx: &QueryContext<'_>,
    ) -> Result<super::strategy::UpstreamResult, DomainError> {
        let mut last_err = DomainError::TransportAllServersUnreachable;
        for server in ctx.servers {
            match query_server(
                server,
                ctx.query_bytes,
                ctx.domain,
                ctx.record_type,
                ctx.timeout_ms,
                ctx.emitter,
            )
            .await
            {
                Ok(result) => return Ok(result),
                Err(e) if ResponseParser::is_transport_error(&e) => {
                    debug!(server = %server, error = %e, "failover: server unreachable, trying next");
                    last_err = e;
                }
                Err(e) => return Err(e),
            }
        }
        Err(last_err)
    }
}

impl Default for FailoverStrategy {
    fn default() -> Self {
        Self::new()
    }
}
