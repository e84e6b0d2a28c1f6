use super::super::cache::{CachedData, DnsCache, DnssecStatus, NegativeQueryTracker};
use super::super::prefetch::PrefetchPredictor;
use async_trait::async_trait;
use bastion_dns_application::ports::{DnsResolution, DnsResolver, EMPTY_CNAME_CHAIN};
use bastion_dns_domain::{DnsQuery, DomainError, EcsScope, RecordType};
use dashmap::DashMap;
use std::sync::Arc;
use tokio::sync::Notify;
use tracing::{debug, warn};

/// Key for the in-flight request gate: identical to the cache partition
/// key, so two queries that would land in the same cache slot also share
/// at most one concurrent upstream call.
type InFlightKey = (Arc<str>, RecordType, Option<EcsScope>);

/// Cache decorator for DNS resolver
///
/// Wraps another resolver and adds caching functionality. Also coalesces
/// concurrent cache misses for the same `(domain, record_type, ecs)` key
/// into a single upstream call via `in_flight` — without it, a burst of
/// identical queries arriving while the cache is still empty for that key
/// would each race to the inner resolver independently.
pub struct CachedResolver {
    inner: Arc<dyn DnsResolver>,
    cache: Arc<DnsCache>,
    cache_ttl: u32,
    negative_ttl_tracker: Arc<NegativeQueryTracker>,
    prefetch_predictor: Option<Arc<PrefetchPredictor>>,
    in_flight: Arc<DashMap<InFlightKey, Arc<Notify>>>,
}

impl CachedResolver {
    /// Wrap a resolver with caching
    pub fn new(inner: Arc<dyn DnsResolver>, cache: Arc<DnsCache>, cache_ttl: u32) -> Self {
        Self {
            inner,
            cache,
            cache_ttl,
            negative_ttl_tracker: Arc::new(NegativeQueryTracker::new()),
            prefetch_predictor: None,
            in_flight: Arc::new(DashMap::new()),
        }
    }

    /// Add prefetch predictor
    pub fn with_prefetch(mut self, predictor: Arc<PrefetchPredictor>) -> Self {
        self.prefetch_predictor = Some(predictor);
        self
    }

    fn in_flight_key(query: &DnsQuery) -> InFlightKey {
        (query.domain.clone(), query.record_type.clone(), query.ecs)
    }

    /// Try to resolve from cache
    fn check_cache(&self, query: &DnsQuery) -> Option<DnsResolution> {
        self.cache
            .get(&query.domain, &query.record_type, query.ecs)
            .map(|(data, dnssec_status)| {
                debug!(
                    domain = %query.domain,
                    record_type = %query.record_type,
                    "Cache HIT"
                );

                let dnssec_str = dnssec_status.map(|s| s.as_str());

                match data {
                    CachedData::IpAddresses(addrs) => DnsResolution {
                        // Arc::clone = atomic increment only, no Vec allocation
                        addresses: Arc::clone(&addrs),
                        cache_hit: true,
                        local_dns: false,
                        dnssec_status: dnssec_str,
                        cname_chain: EMPTY_CNAME_CHAIN.clone(),
                        upstream_server: None,
                        upstream_pool: None,
                        min_ttl: None,
                        negative_soa_ttl: None,
                        upstream_wire_data: None,
                    },
                    // CNAME records aren't cached as a distinct resolution path yet;
                    // treated as a cache miss by falling through to an empty result.
                    CachedData::CanonicalName(_) | CachedData::NegativeResponse => DnsResolution {
                        addresses: Arc::new(vec![]),
                        cache_hit: true,
                        local_dns: false,
                        dnssec_status: dnssec_str,
                        cname_chain: EMPTY_CNAME_CHAIN.clone(),
                        upstream_server: None,
                        upstream_pool: None,
                        min_ttl: None,
                        negative_soa_ttl: None,
                        upstream_wire_data: None,
                    },
                }
            })
    }

    /// Store result in cache
    fn store_in_cache(&self, query: &DnsQuery, resolution: &DnsResolution) {
        if resolution.addresses.is_empty() {
            // Negative response
            let dynamic_ttl = self.negative_ttl_tracker.record_and_get_ttl(&query.domain);
            self.cache.insert(
                &query.domain,
                &query.record_type,
                CachedData::NegativeResponse,
                dynamic_ttl,
                Some(DnssecStatus::Insecure),
                query.ecs,
            );

        } else {
            // Positive response — Arc::clone avoids cloning the Vec
            let addresses = Arc::clone(&resolution.addresses);
            let dnssec_status = resolution
                .dnssec_status
                .and_then(|s| s.parse().ok())
                .unwrap_or(DnssecStatus::Insecure);

            self.cache.insert(
                &query.domain,
                &query.record_type,
                CachedData::IpAddresses(addresses),
                self.cache_ttl,
                Some(dnssec_status),
                query.ecs,
            );

            // Record for prefetching if enabled
            if let Some(ref predictor) = self.prefetch_predictor {
                predictor.on_query(&query.domain);
            }
        }
    }

    /// Resolve via the inner resolver, coalescing concurrent callers for the
    /// same `(domain, record_type, ecs)` key into a single upstream call.
    /// The caller that wins the race does the real resolve and stores the
    /// result; everyone else waits on the same `Notify` and then re-checks
    /// the cache, which the winner just populated.
    async fn resolve_coalesced(&self, query: &DnsQuery) -> Result<DnsResolution, DomainError> {
        let key = Self::in_flight_key(query);

        loop {
            let mut claimed = false;
            let notify = {
                let entry = self
                    .in_flight
                    .entry(key.clone())
                    .or_insert_with(|| {
                        claimed = true;
                        Arc::new(Notify::new())
                    });
                Arc::clone(entry.value())
            };

            if claimed {
                let result = self.inner.resolve(query).await;
                match &result {
                    Ok(resolution) => self.store_in_cache(query, resolution),
                    Err(_) => {
                        let dynamic_ttl = self.negative_ttl_tracker.record_and_get_ttl(&query.domain);
                        self.cache.insert(
                            &query.domain,
                            &query.record_type,
                            CachedData::NegativeResponse,
                            dynamic_ttl,
                            Some(DnssecStatus::Insecure),
                            query.ecs,
                        );
                    }
                }
                self.in_flight.remove(&key);
                notify.notify_waiters();
                return result;
            }

            // Someone else is already resolving this key — wait for them,
            // then re-check the cache instead of issuing our own upstream call.
            notify.notified().await;
            if let Some(cached) = self.check_cache(query) {
                if cached.addresses.is_empty() {
                    return Err(DomainError::NxDomain);
                }
                return Ok(cached);
            }
            // The winner's resolve failed and left nothing cacheable (e.g. a
            // transient error that skipped negative caching) — loop and
            // try to become the new winner ourselves.
        }
    }
}

#[async_trait]
impl DnsResolver for CachedResolver {
    async fn resolve(&self, query: &DnsQuery) -> Result<DnsResolution, DomainError> {
        // Try cache first
        if let Some(cached) = self.check_cache(query) {
            if cached.addresses.is_empty() {
                // Negative cache hit
                return Err(DomainError::NxDomain);
            }
            return Ok(cached);
        }

        // Cache miss - resolve via inner resolver, at most once per key
        debug!(
            domain = %query.domain,
            record_type = %query.record_type,
            "Cache MISS"
        );

        self.resolve_coalesced(query).await.map_err(|e| {
            if !matches!(e, DomainError::NxDomain) {
                warn!(domain = %query.domain, error = %e, "Query failed, caching negative response");
            }
            e
        })
    }
}
