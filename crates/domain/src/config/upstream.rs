//! Upstream pool configuration.

use serde::{Deserialize, Serialize};

/// Strategy used to fan a query out across the servers in a pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum UpstreamStrategy {
    /// Query every server in the pool concurrently, return the first answer.
    #[default]
    Parallel,
    /// Spread queries across servers (round-robin / weighted).
    Balanced,
    /// Always prefer the first healthy server, falling back in order.
    Failover,
}

impl UpstreamStrategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            UpstreamStrategy::Parallel => "parallel",
            UpstreamStrategy::Balanced => "balanced",
            UpstreamStrategy::Failover => "failover",
        }
    }
}

/// A named group of upstream servers sharing a fan-out strategy.
///
/// Pools are tried in ascending `priority` order by the forwarder; the first
/// pool with at least one healthy server wins (see
/// `ferrous_dns_infrastructure::dns::load_balancer::PoolManager`, now
/// `bastion_dns_infrastructure`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpstreamPool {
    pub name: String,
    #[serde(default)]
    pub strategy: UpstreamStrategy,
    #[serde(default)]
    pub priority: i32,
    pub servers: Vec<String>,
    /// Optional weight, used by the `Balanced` strategy. `None` means equal
    /// weighting across servers.
    #[serde(default)]
    pub weight: Option<u32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_strategy_is_parallel() {
        assert_eq!(UpstreamStrategy::default(), UpstreamStrategy::Parallel);
    }

    #[test]
    fn strategy_as_str() {
        assert_eq!(UpstreamStrategy::Failover.as_str(), "failover");
    }
}
