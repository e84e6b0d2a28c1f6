use super::balanced::BalancedStrategy;
use super::failover::FailoverStrategy;
use super::parallel::ParallelStrategy;
use super::query::QueryAttemptResult;
use crate::dns::events::QueryEventEmitter;
use bastion_dns_domain::{DnsProtocol, DomainError, RecordType};
use std::sync::Arc;

pub type UpstreamResult = QueryAttemptResult;

/// Everything a strategy needs to fan a query out across one pool's servers.
pub struct QueryContext<'a> {
    pub servers: &'a [Arc<DnsProtocol>],
    pub query_bytes: &'a [u8],
    pub domain: &'a str,
    pub record_type: &'a RecordType,
    pub timeout_ms: u64,
    pub emitter: &'a QueryEventEmitter,
}

/// Stack-allocated enum dispatch for load balancing strategies.
pub enum Strategy {
    Parallel(ParallelStrategy),
    Balanced(BalancedStrategy),
    Failover(FailoverStrategy),
}

impl Strategy {
    pub async fn query(&self, ctx: &QueryContext<'_>) -> Result<UpstreamResult, DomainError> {
        match self {
            Self::Parallel(s) => s.query(ctx).await,
            Self::Balanced(s) => s.query(ctx).await,
            Self::Failover(s) => s.query(ctx).await,
        }
    }
}
