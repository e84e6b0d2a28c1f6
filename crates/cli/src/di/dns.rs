//! Wires every DNS-pipeline adapter named in the config against the ports
//! `HandleDnsQueryUseCase` and the background jobs consume.

use std::sync::Arc;
use std::time::Duration;

use bastion_dns_application::ports::{
    AccessControlPort, BlockFilterEnginePort, BillstatRecorderPort, ConnLimiterPort, DeviceFinderPort,
    DnsCheckPort, DnsResolver, GeoIpPort, HashPrefixPort, KvStorePort, RateLimiterPort, RuleStatRecorderPort,
};
use bastion_dns_domain::{Config, Device};
use bastion_dns_infrastructure::dns::access::AccessControlAdapter;
use bastion_dns_infrastructure::dns::block_filter::{BlockFilterEngine, HashPrefixFilter};
use bastion_dns_infrastructure::dns::cache::{DnsCache, EvictionStrategy};
use bastion_dns_infrastructure::dns::connlimiter::ConnLimiterAdapter;
use bastion_dns_infrastructure::dns::device_finder::DeviceFinderAdapter;
use bastion_dns_infrastructure::dns::dnscheck::{DnsCheckEngine, MemoryKvStore, RedisKvStore};
use bastion_dns_infrastructure::dns::events::QueryEventEmitter;
use bastion_dns_infrastructure::dns::load_balancer::PoolManager;
use bastion_dns_infrastructure::dns::ratelimit::RateLimiterAdapter;
use bastion_dns_infrastructure::dns::resolver::{QueryFilters, QueryFiltersConfig, ResolverBuilder, ResolverConfig};
use bastion_dns_infrastructure::dns::stats::{BillstatRecorder, RuleStatRecorder};
use bastion_dns_infrastructure::geoip::MaxMindGeoIpAdapter;
use sqlx::SqlitePool;
use tokio_util::sync::CancellationToken;

use super::repositories::Repositories;

/// Every DNS-side adapter, held together so the CLI can hand pieces to
/// `HandleDnsQueryUseCase`, `JobRunner`, and the transport listeners.
pub struct DnsServices {
    pub access: Arc<dyn AccessControlPort>,
    pub ratelimit: Arc<dyn RateLimiterPort>,
    pub connlimiter: Arc<dyn ConnLimiterPort>,
    pub device_finder: Arc<dyn DeviceFinderPort>,
    pub filter: Arc<BlockFilterEngine>,
    pub hash_prefix: Arc<HashPrefixFilter>,
    pub resolver: Arc<dyn DnsResolver>,
    pub cache: Arc<DnsCache>,
    pub rule_stats: Arc<dyn RuleStatRecorderPort>,
    pub billstats: Arc<dyn BillstatRecorderPort>,
    pub geoip: Option<Arc<dyn GeoIpPort>>,
    pub dnscheck: Option<Arc<dyn DnsCheckPort>>,
}

impl DnsServices {
    pub async fn build(
        config: &Config,
        write_pool: SqlitePool,
        repos: &Repositories,
        shutdown: CancellationToken,
    ) -> anyhow::Result<Self> {
        let access = Arc::new(AccessControlAdapter::new());
        access.reload(
            config.access.blocked_hosts.clone(),
            config.access.blocked_subnets.clone(),
        );
        for profile in repos.profiles.iter() {
            access.set_profile_policy(
                profile.id,
                profile.access.blocked_hosts.iter().map(|h| h.to_string()).collect(),
                profile.access.blocked_subnets.iter().map(|s| s.to_string()).collect(),
            );
        }

        let ratelimit = Arc::new(RateLimiterAdapter::new(
            config.ratelimit.ipv4_prefix,
            config.ratelimit.ipv6_prefix,
        ));

        let connlimiter = Arc::new(ConnLimiterAdapter::new(
            config.connlimiter.stop_watermark as u32,
            config.connlimiter.resume_watermark as u32,
        ));

        let (provision_tx, provision_rx) = tokio::sync::mpsc::unbounded_channel::<Device>();
        let device_finder = Arc::new(
            DeviceFinderAdapter::new(
                repos.devices.clone(),
                repos.profiles.clone(),
                config.dns.local_domain.clone().map(Arc::from),
            )
            .with_provisioning(provision_tx),
        );
        spawn_device_provisioning_writer(write_pool.clone(), provision_rx);

        let default_group_id = 1;
        let filter = Arc::new(BlockFilterEngine::new(write_pool, default_group_id).await?);

        let hash_prefix_client = reqwest::Client::builder()
            .user_agent("Bastion-DNS/1.0 (hash-prefix-filters)")
            .timeout(std::time::Duration::from_secs(30))
            .build()?;
        let hash_prefix = Arc::new(HashPrefixFilter::new(
            config.filter.safe_browsing_hash_source.clone(),
            config.filter.parental_hash_source.clone(),
            config.filter.newly_registered_domains_source.clone(),
            hash_prefix_client,
        ));
        hash_prefix.reload().await?;

        let rule_stats: Arc<dyn RuleStatRecorderPort> = Arc::new(RuleStatRecorder::new());
        let billstats: Arc<dyn BillstatRecorderPort> = Arc::new(BillstatRecorder::new());

        let geoip: Option<Arc<dyn GeoIpPort>> = config.geoip.enabled.then(|| {
            let adapter = MaxMindGeoIpAdapter::new(
                config.geoip.country_db_path.as_deref().map(std::path::Path::new),
                config.geoip.asn_db_path.as_deref().map(std::path::Path::new),
            );
            Arc::new(adapter) as Arc<dyn GeoIpPort>
        });

        let dnscheck: Option<Arc<dyn DnsCheckPort>> = if config.dnscheck.enabled {
            let kv: Arc<dyn KvStorePort> = match config.dnscheck.kv_backend.as_str() {
                "redis" => {
                    let url = config
                        .dnscheck
                        .kv_url
                        .as_deref()
                        .ok_or_else(|| anyhow::anyhow!("dnscheck.kv_url required when kv_backend = \"redis\""))?;
                    Arc::new(RedisKvStore::new(url).map_err(|e| anyhow::anyhow!(e))?)
                }
                _ => Arc::new(MemoryKvStore::new()),
            };
            Some(Arc::new(DnsCheckEngine::new(
                kv,
                config.dnscheck.suffix.clone(),
                Duration::from_secs(config.dnscheck.kv_record_ttl_secs),
            )) as Arc<dyn DnsCheckPort>)
        } else {
            None
        };

        let emitter = QueryEventEmitter::new_disabled();
        let pool_manager = Arc::new(PoolManager::with_health_checks(
            config.dns.pools.clone(),
            config.dns.health_check.clone(),
            emitter,
            shutdown,
        )?);

        let eviction_strategy = EvictionStrategy::from_str(&config.dns.cache_eviction_strategy);
        let min_threshold = match eviction_strategy {
            EvictionStrategy::LFU => config.dns.cache_min_frequency as f64,
            EvictionStrategy::LFUK => config.dns.cache_min_lfuk_score,
            EvictionStrategy::HitRate => config.dns.cache_min_hit_rate,
        };
        let cache = Arc::new(DnsCache::new(
            config.dns.cache_max_entries,
            eviction_strategy,
            min_threshold,
            config.dns.cache_refresh_threshold,
            config.dns.cache_lfuk_history_size,
            config.dns.cache_batch_eviction_percentage,
            config.dns.cache_adaptive_thresholds,
        ));

        let resolver_config = ResolverConfig {
            cache_ttl: config.dns.cache_ttl,
            query_timeout_ms: config.dns.query_timeout,
            dnssec_enabled: config.dns.dnssec_enabled,
            filters: QueryFiltersConfig {
                block_private_ptr: config.dns.block_private_ptr,
                block_non_fqdn: config.dns.block_non_fqdn,
                local_domain: config.dns.local_domain.clone(),
            },
            prefetch_enabled: false,
            ..ResolverConfig::default()
        };

        let query_filters = QueryFilters {
            block_private_ptr: resolver_config.filters.block_private_ptr,
            block_non_fqdn: resolver_config.filters.block_non_fqdn,
            local_domain: resolver_config.filters.local_domain.clone(),
        };

        let resolver = ResolverBuilder::new(pool_manager)
            .with_config(resolver_config)
            .with_cache(cache.clone())
            .with_filters(query_filters)
            .build();

        Ok(Self {
            access,
            ratelimit,
            connlimiter,
            device_finder,
            filter,
            hash_prefix,
            resolver,
            cache,
            rule_stats,
            billstats,
            geoip,
            dnscheck,
        })
    }
}

/// Drains auto-provisioned devices into SQLite so they survive a restart.
/// Runs off the query hot path — `DeviceFinderAdapter::identify` only ever
/// sends into this channel, never waits on it.
fn spawn_device_provisioning_writer(pool: SqlitePool, mut rx: tokio::sync::mpsc::UnboundedReceiver<Device>) {
    tokio::spawn(async move {
        while let Some(device) = rx.recv().await {
            let empty_ips = serde_json::to_string::<Vec<std::net::IpAddr>>(&vec![]).unwrap_or_else(|_| "[]".to_string());
            let result = sqlx::query(
                "INSERT OR IGNORE INTO devices (device_id, human_readable_id, profile_id, linked_ips, dedicated_ips, doh_auth_enabled, doh_password_hash) \
                 VALUES (?, ?, ?, ?, ?, 0, NULL)",
            )
            .bind(device.device_id.as_ref())
            .bind(device.human_readable_id.as_ref())
            .bind(device.profile_id)
            .bind(&empty_ips)
            .bind(&empty_ips)
            .execute(&pool)
            .await;

            if let Err(e) = result {
                tracing::warn!(device_id = %device.device_id, error = %e, "failed to persist auto-provisioned device");
            }
        }
    });
}
