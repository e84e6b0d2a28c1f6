use super::balanced::BalancedStrategy;
use super::failover::FailoverStrategy;
use super::health::HealthChecker;
use super::parallel::ParallelStrategy;
use super::strategy::{QueryContext, Strategy, UpstreamResult};
use crate::dns::events::QueryEventEmitter;
use crate::dns::forwarding::{MessageBuilder, ResponseParser};
use bastion_dns_domain::{
    Config, DnsProtocol, DomainError, RecordType, UpstreamPool, UpstreamStrategy,
};
use smallvec::SmallVec;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

struct PoolWithStrategy {
    config: UpstreamPool,
    strategy: Strategy,
    servers: Vec<Arc<DnsProtocol>>,
}

/// Orders configured upstream pools by priority and tries each in turn,
/// skipping pools with no healthy server and falling through to the next
/// on transport failure.
pub struct PoolManager {
    pools: Vec<PoolWithStrategy>,
    health_checker: Option<Arc<HealthChecker>>,
    emitter: QueryEventEmitter,
}

impl PoolManager {
    pub fn new(
        pools: Vec<UpstreamPool>,
        health_checker: Option<Arc<HealthChecker>>,
        emitter: QueryEventEmitter,
    ) -> Result<Self, DomainError> {
        if pools.is_empty() {
            return Err(DomainError::InvalidDomainName(
                "at least one upstream pool must be configured".into(),
            ));
        }

        let mut pools_with_strategy = Vec::with_capacity(pools.len());
        for pool in pools {
            let strategy = match pool.strategy {
                UpstreamStrategy::Parallel => Strategy::Parallel(ParallelStrategy::new()),
                UpstreamStrategy::Balanced => Strategy::Balanced(BalancedStrategy::new()),
                UpstreamStrategy::Failover => Strategy::Failover(FailoverStrategy::new()),
            };

            let servers: Result<Vec<Arc<DnsProtocol>>, DomainError> = pool
                .servers
                .iter()
                .map(|s| {
                    s.parse::<DnsProtocol>()
                        .map(Arc::new)
                        .map_err(|e| {
                            DomainError::InvalidDomainName(format!(
                                "invalid upstream endpoint '{}': {}",
                                s, e
                            ))
                        })
                })
                .collect();

            pools_with_strategy.push(PoolWithStrategy {
                config: pool,
                strategy,
                servers: servers?,
            });
        }
        pools_with_strategy.sort_by_key(|p| p.config.priority);

        Ok(Self {
            pools: pools_with_strategy,
            health_checker,
            emitter,
        })
    }

    pub async fn from_config(config: &Config) -> Result<Self, DomainError> {
        Self::new(config.dns.pools.clone(), None, QueryEventEmitter::new_disabled())
    }

    /// Builds a `PoolManager` together with a started health-check loop.
    pub fn with_health_checks(
        pools: Vec<UpstreamPool>,
        health_config: bastion_dns_domain::config::HealthCheckConfig,
        emitter: QueryEventEmitter,
        shutdown: CancellationToken,
    ) -> Result<Self, DomainError> {
        let mut manager = Self::new(pools, None, emitter.clone())?;
        let all_servers = manager.get_all_protocols();
        let checker = Arc::new(HealthChecker::new(all_servers, health_config));
        checker.clone().start(emitter, shutdown);
        manager.health_checker = Some(checker);
        Ok(manager)
    }

    pub async fn query(
        &self,
        domain: &str,
        record_type: &RecordType,
        timeout_ms: u64,
    ) -> Result<UpstreamResult, DomainError> {
        debug!(total_pools = self.pools.len(), %domain, "starting forwarder query");

        let query_bytes = MessageBuilder::build_query(domain, record_type)?;

        for pool in &self.pools {
            let healthy: SmallVec<[Arc<DnsProtocol>; 16]> = if let Some(checker) = &self.health_checker {
                pool.servers
                    .iter()
                    .filter(|s| checker.is_healthy(s))
                    .cloned()
                    .collect()
            } else {
                pool.servers.iter().cloned().collect()
            };

            if healthy.is_empty() {
                debug!(pool = %pool.config.name, "all servers unhealthy, skipping pool");
                continue;
            }

            let ctx = QueryContext {
                servers: &healthy[..],
                query_bytes: &query_bytes,
                domain,
                record_type,
                timeout_ms,
                emitter: &self.emitter,
            };

            match pool.strategy.query(&ctx).await {
                Ok(result) => return Ok(result),
                Err(e) if ResponseParser::is_transport_error(&e) => {
                    warn!(pool = %pool.config.name, error = %e, "pool unreachable, trying next pool");
                    continue;
                }
                Err(e) => return Err(e),
            }
        }

        Err(DomainError::TransportAllServersUnreachable)
    }

    pub fn get_all_protocols(&self) -> Vec<DnsProtocol> {
        self.pools
            .iter()
            .flat_map(|p| p.servers.iter().map(|s| (**s).clone()))
            .collect()
    }
}
