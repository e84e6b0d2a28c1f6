use crate::dns::events::QueryEventEmitter;
use crate::dns::forwarding::MessageBuilder;
use bastion_dns_domain::config::HealthCheckConfig;
use bastion_dns_domain::{DnsProtocol, RecordType};
use dashmap::DashMap;
use std::sync::atomic::{AtomicBool, AtomicU8, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::interval;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use super::query::query_server;

/// Well-known name health checks probe through each upstream. Any rcode
/// (including NXDOMAIN) counts as a success — we only care that the server
/// answered.
const PROBE_DOMAIN: &str = "health-check.bastion-dns.internal.";

struct ServerHealth {
    healthy: AtomicBool,
    consecutive_failures: AtomicU8,
    consecutive_successes: AtomicU8,
}

impl Default for ServerHealth {
    fn default() -> Self {
        Self {
            healthy: AtomicBool::new(true),
            consecutive_failures: AtomicU8::new(0),
            consecutive_successes: AtomicU8::new(0),
        }
    }
}

/// Periodically probes every configured upstream and tracks healthy/unhealthy
/// state using consecutive-failure/-success thresholds, so a single blip
/// doesn't flap a server in and out of rotation.
pub struct HealthChecker {
    servers: DashMap<DnsProtocol, ServerHealth>,
    config: HealthCheckConfig,
}

impl HealthChecker {
    pub fn new(servers: Vec<DnsProtocol>, config: HealthCheckConfig) -> Self {
        let map = DashMap::new();
        for server in servers {
            map.insert(server, ServerHealth::default());
        }
        Self {
            servers: map,
            config,
        }
    }

    pub fn is_healthy(&self, server: &DnsProtocol) -> bool {
        self.servers
            .get(server)
            .map(|h| h.healthy.load(Ordering::Relaxed))
            .unwrap_or(true)
    }

    async fn probe_one(&self, server: &DnsProtocol, emitter: &QueryEventEmitter) {
        let query_bytes = match MessageBuilder::build_query(PROBE_DOMAIN, &RecordType::A) {
            Ok(bytes) => bytes,
            Err(_) => return,
        };

        let ok = query_server(
            server,
            &query_bytes,
            PROBE_DOMAIN,
            &RecordType::A,
            self.config.timeout,
            emitter,
        )
        .await
        .is_ok();

        let Some(health) = self.servers.get(server) else {
            return;
        };

        if ok {
            health.consecutive_failures.store(0, Ordering::Relaxed);
            let successes = health.consecutive_successes.fetch_add(1, Ordering::Relaxed) + 1;
            if successes >= self.config.success_threshold
                && !health.healthy.swap(true, Ordering::Relaxed)
            {
                info!(server = %server, "upstream marked healthy");
            }
        } else {
            health.consecutive_successes.store(0, Ordering::Relaxed);
            let failures = health.consecutive_failures.fetch_add(1, Ordering::Relaxed) + 1;
            if failures >= self.config.failure_threshold
                && health.healthy.swap(false, Ordering::Relaxed)
            {
                warn!(server = %server, failures, "upstream marked unhealthy");
            }
        }
    }

    /// Spawns the periodic probe loop. Returns a guard; dropping it has no
    /// effect, cancellation is via `shutdown`.
    pub fn start(self: Arc<Self>, emitter: QueryEventEmitter, shutdown: CancellationToken) {
        tokio::spawn(async move {
            let mut tick = interval(Duration::from_secs(self.config.interval));
            loop {
                tokio::select! {
                    _ = shutdown.cancelled() => break,
                    _ = tick.tick() => {
                        let servers: Vec<DnsProtocol> =
                            self.servers.iter().map(|e| e.key().clone()).collect();
                        for server in servers {
                            self.probe_one(&server, &emitter).await;
                        }
                    }
                }
            }
        });
    }
}
