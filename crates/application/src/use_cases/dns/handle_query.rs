use std::net::IpAddr;
use std::sync::Arc;

use bastion_dns_domain::{DnsQuery, DnsRequestContext, DomainError, Profile, ProfileDb};

use crate::ports::{
    AccessControlPort, BlockFilterEnginePort, DeviceFinderPort, DnsResolution, DnsResolver,
    FilterDecision, HashPrefixCategory, HashPrefixPort, RateLimitDecision, RateLimiterPort,
    RuleStatRecorderPort,
};

/// Server-wide fallback for each hash-prefix category, used when a request
/// has no attached profile to read a per-profile `FilterPolicy` toggle from.
#[derive(Debug, Clone, Copy)]
pub struct HashPrefixDefaults {
    pub safe_browsing: bool,
    pub parental: bool,
    pub newly_registered: bool,
}

/// Result of running a request through the full pipeline: either a
/// resolution to answer with, or the reason it was short-circuited before
/// ever reaching the resolver.
#[derive(Debug)]
pub enum QueryOutcome {
    Resolved(DnsResolution),
    Blocked { list_id: String },
    Denied,
    Throttled,
    /// Device-finder came back empty on a server that doesn't allow
    /// anonymous use.
    IdentificationRequired,
}

/// Runs one request through the fixed-order middleware chain — access,
/// rate limit, device/profile identification, filtering — before handing
/// whatever survives to the resolver (cache + forwarder) behind
/// `DnsResolver`. Each stage is a plain method so tests can exercise them
/// independently of the whole chain.
pub struct HandleDnsQueryUseCase {
    access: Arc<dyn AccessControlPort>,
    ratelimit: Arc<dyn RateLimiterPort>,
    device_finder: Arc<dyn DeviceFinderPort>,
    filter: Arc<dyn BlockFilterEnginePort>,
    hash_prefix: Arc<dyn HashPrefixPort>,
    resolver: Arc<dyn DnsResolver>,
    rule_stats: Arc<dyn RuleStatRecorderPort>,
    profiles: Arc<ProfileDb>,
    default_group_id: i64,
    hash_prefix_defaults: HashPrefixDefaults,
}

impl HandleDnsQueryUseCase {
    pub fn new(
        access: Arc<dyn AccessControlPort>,
        ratelimit: Arc<dyn RateLimiterPort>,
        device_finder: Arc<dyn DeviceFinderPort>,
        filter: Arc<dyn BlockFilterEnginePort>,
        hash_prefix: Arc<dyn HashPrefixPort>,
        resolver: Arc<dyn DnsResolver>,
        rule_stats: Arc<dyn RuleStatRecorderPort>,
        profiles: Arc<ProfileDb>,
        default_group_id: i64,
        hash_prefix_defaults: HashPrefixDefaults,
    ) -> Self {
        Self {
            access,
            ratelimit,
            device_finder,
            filter,
            hash_prefix,
            resolver,
            rule_stats,
            profiles,
            default_group_id,
            hash_prefix_defaults,
        }
    }

    /// Whether `category` applies to this request: a profile's own
    /// `FilterPolicy` toggle if one is attached, else the server-wide
    /// default for that category.
    fn category_enabled(&self, profile: &Option<Arc<Profile>>, category: HashPrefixCategory) -> bool {
        match (profile, category) {
            (Some(p), HashPrefixCategory::SafeBrowsing) => p.filter.safe_browsing_enabled,
            (Some(p), HashPrefixCategory::Parental) => p.filter.parental_enabled,
            (Some(p), HashPrefixCategory::NewlyRegistered) => p.filter.newly_registered_domains_enabled,
            (None, HashPrefixCategory::SafeBrowsing) => self.hash_prefix_defaults.safe_browsing,
            (None, HashPrefixCategory::Parental) => self.hash_prefix_defaults.parental,
            (None, HashPrefixCategory::NewlyRegistered) => self.hash_prefix_defaults.newly_registered,
        }
    }

    pub async fn execute(
        &self,
        ctx: &DnsRequestContext,
        query: &DnsQuery,
    ) -> Result<QueryOutcome, DomainError> {
        let client_ip = ctx.client_ip();

        if self.access.is_globally_denied(client_ip) {
            return Ok(QueryOutcome::Denied);
        }

        let identification = self.device_finder.identify(ctx);
        if identification.device.is_none() && ctx.server.requires_identification {
            return Ok(QueryOutcome::IdentificationRequired);
        }
        let profile = identification
            .device
            .as_ref()
            .and_then(|d| self.profiles.get(d.profile_id));

        if !self.ratelimit.is_allowlisted(client_ip) {
            let (capacity, refill) = profile
                .as_ref()
                .map(|p| {
                    (
                        p.rate_limit.capacity.unwrap_or(100),
                        p.rate_limit.refill_per_sec.unwrap_or(20),
                    )
                })
                .unwrap_or((100, 20));

            if self.ratelimit.check(client_ip, capacity, refill) == RateLimitDecision::Throttle {
                return Ok(QueryOutcome::Throttled);
            }

            if let Some(profile) = &profile {
                if self
                    .access
                    .is_denied_for_profile(profile.id, client_ip, &query.domain)
                {
                    return Ok(QueryOutcome::Denied);
                }
            }
        }

        let group_id = profile
            .as_ref()
            .map(|p| p.group_id)
            .unwrap_or(self.default_group_id);

        // Custom rewrites are profile-scoped and take precedence over
        // anything the filter engine's own (list-sourced) rewrites would
        // produce, so they're checked first and short-circuit the engine
        // entirely on a match.
        if let Some(profile) = &profile {
            if let Some(rewrite) = find_custom_rewrite(profile, &query.domain) {
                return Ok(QueryOutcome::Resolved(self.resolve_rewrite_target(rewrite, query.ecs).await?));
            }
        }

        match self.filter.check(&query.domain, group_id) {
            FilterDecision::Block => {
                self.rule_stats.record_block(group_id, "filter");
                return Ok(QueryOutcome::Blocked {
                    list_id: "filter".to_string(),
                });
            }
            FilterDecision::Rewrite(target) => {
                return Ok(QueryOutcome::Resolved(self.resolve_rewrite_target(&target, query.ecs).await?));
            }
            FilterDecision::Allow => {}
        }

        for category in [
            HashPrefixCategory::SafeBrowsing,
            HashPrefixCategory::Parental,
            HashPrefixCategory::NewlyRegistered,
        ] {
            if self.category_enabled(&profile, category) && self.hash_prefix.is_listed(&query.domain, category) {
                self.rule_stats.record_block(group_id, category.list_id());
                return Ok(QueryOutcome::Blocked {
                    list_id: category.list_id().to_string(),
                });
            }
        }

        let resolution = self.resolver.resolve(query).await?;
        Ok(QueryOutcome::Resolved(resolution))
    }

    /// A rewrite target is either a literal IP (answered directly, no
    /// upstream round trip) or a CNAME target (resolved as if the client
    /// had queried it). The CNAME case carries the original query's ECS
    /// scope forward so the rewritten lookup lands in the same cache
    /// partition a direct query for that target would.
    async fn resolve_rewrite_target(
        &self,
        target: &str,
        ecs: Option<bastion_dns_domain::EcsScope>,
    ) -> Result<DnsResolution, DomainError> {
        if let Ok(ip) = target.parse::<IpAddr>() {
            let mut resolution = DnsResolution::new(vec![ip], false);
            resolution.local_dns = true;
            return Ok(resolution);
        }
        let rewritten = DnsQuery::new(target.trim_end_matches('.').to_string(), bastion_dns_domain::RecordType::A)
            .with_ecs(ecs);
        self.resolver.resolve(&rewritten).await
    }
}

/// Exact-match lookup against a profile's custom rewrite table.
fn find_custom_rewrite<'a>(profile: &'a Profile, domain: &str) -> Option<&'a str> {
    profile
        .filter
        .custom_rewrites
        .iter()
        .find(|r| r.domain.as_ref() == domain)
        .map(|r| r.target.as_ref())
}

#[cfg(test)]
mod tests {
    use super::*;
    use bastion_dns_domain::{RecordType, RequestId};
    use std::net::{IpAddr, SocketAddr};
    use std::sync::atomic::{AtomicU32, Ordering};

    struct AllowAccess;
    impl AccessControlPort for AllowAccess {
        fn is_globally_denied(&self, _ip: IpAddr) -> bool {
            false
        }
        fn is_denied_for_profile(&self, _profile_id: i64, _ip: IpAddr, _qname: &str) -> bool {
            false
        }
        fn reload(&self, _global_hosts: Vec<String>, _global_subnets: Vec<String>) {}
    }

    struct AlwaysAllowRate;
    impl RateLimiterPort for AlwaysAllowRate {
        fn check(&self, _ip: IpAddr, _capacity: u32, _refill_per_sec: u32) -> RateLimitDecision {
            RateLimitDecision::Allow
        }
        fn is_allowlisted(&self, _ip: IpAddr) -> bool {
            true
        }
        fn reload_allowlist(&self, _cidrs: Vec<String>) -> Result<(), String> {
            Ok(())
        }
    }

    struct NoDevice;
    impl DeviceFinderPort for NoDevice {
        fn identify(&self, _ctx: &DnsRequestContext) -> crate::ports::Identification {
            crate::ports::Identification {
                device: None,
                channel: crate::ports::IdentificationChannel::Unidentified,
            }
        }
    }

    struct AlwaysAllowFilter(AtomicU32);
    #[async_trait::async_trait]
    impl BlockFilterEnginePort for AlwaysAllowFilter {
        fn resolve_group(&self, _ip: IpAddr) -> i64 {
            1
        }
        fn check(&self, _domain: &str, _group_id: i64) -> FilterDecision {
            self.0.fetch_add(1, Ordering::Relaxed);
            FilterDecision::Allow
        }
        async fn reload(&self) -> Result<(), DomainError> {
            Ok(())
        }
        async fn load_client_groups(&self) -> Result<(), DomainError> {
            Ok(())
        }
        fn compiled_domain_count(&self) -> usize {
            0
        }
    }

    struct StubResolver;
    #[async_trait::async_trait]
    impl DnsResolver for StubResolver {
        async fn resolve(&self, _query: &DnsQuery) -> Result<DnsResolution, DomainError> {
            Ok(DnsResolution::new(vec!["93.184.216.34".parse().unwrap()], false))
        }
    }

    struct NullRuleStats;
    impl RuleStatRecorderPort for NullRuleStats {
        fn record_block(&self, _profile_id: i64, _list_id: &str) {}
        fn snapshot_and_reset(&self) -> std::collections::HashMap<(i64, String), u64> {
            Default::default()
        }
        fn merge_back(&self, _counts: std::collections::HashMap<(i64, String), u64>) {}
    }

    struct NeverListed;
    impl HashPrefixPort for NeverListed {
        fn is_listed(&self, _domain: &str, _category: HashPrefixCategory) -> bool {
            false
        }
    }

    struct AlwaysListed(HashPrefixCategory);
    impl HashPrefixPort for AlwaysListed {
        fn is_listed(&self, _domain: &str, category: HashPrefixCategory) -> bool {
            category == self.0
        }
    }

    fn no_hash_prefix_defaults() -> HashPrefixDefaults {
        HashPrefixDefaults {
            safe_browsing: false,
            parental: false,
            newly_registered: false,
        }
    }

    fn test_ctx() -> DnsRequestContext {
        DnsRequestContext::new(
            RequestId(1),
            SocketAddr::from(([127, 0, 0, 1], 5353)),
            bastion_dns_domain::ServerInfo {
                name: "test".into(),
                group: "udp".into(),
                protocol: bastion_dns_domain::TransportKind::Udp,
                local_addr: "0.0.0.0:53".parse().unwrap(),
                tls_server_name: None,
                requires_identification: false,
            },
            "example.com",
            RecordType::A,
        )
    }

    #[tokio::test]
    async fn allowed_query_resolves() {
        let use_case = HandleDnsQueryUseCase::new(
            Arc::new(AllowAccess),
            Arc::new(AlwaysAllowRate),
            Arc::new(NoDevice),
            Arc::new(AlwaysAllowFilter(AtomicU32::new(0))),
            Arc::new(NeverListed),
            Arc::new(StubResolver),
            Arc::new(NullRuleStats),
            Arc::new(ProfileDb::default()),
            1,
            no_hash_prefix_defaults(),
        );

        let query = DnsQuery::new("example.com", RecordType::A);
        let outcome = use_case.execute(&test_ctx(), &query).await.unwrap();
        assert!(matches!(outcome, QueryOutcome::Resolved(_)));
    }

    #[tokio::test]
    async fn refuses_unidentified_when_server_requires_identification() {
        let use_case = HandleDnsQueryUseCase::new(
            Arc::new(AllowAccess),
            Arc::new(AlwaysAllowRate),
            Arc::new(NoDevice),
            Arc::new(AlwaysAllowFilter(AtomicU32::new(0))),
            Arc::new(NeverListed),
            Arc::new(StubResolver),
            Arc::new(NullRuleStats),
            Arc::new(ProfileDb::default()),
            1,
            no_hash_prefix_defaults(),
        );

        let mut ctx = test_ctx();
        ctx.server.requires_identification = true;

        let query = DnsQuery::new("example.com", RecordType::A);
        let outcome = use_case.execute(&ctx, &query).await.unwrap();
        assert!(matches!(outcome, QueryOutcome::IdentificationRequired));
    }

    #[tokio::test]
    async fn hash_prefix_hit_blocks_when_default_enabled() {
        let use_case = HandleDnsQueryUseCase::new(
            Arc::new(AllowAccess),
            Arc::new(AlwaysAllowRate),
            Arc::new(NoDevice),
            Arc::new(AlwaysAllowFilter(AtomicU32::new(0))),
            Arc::new(AlwaysListed(HashPrefixCategory::SafeBrowsing)),
            Arc::new(StubResolver),
            Arc::new(NullRuleStats),
            Arc::new(ProfileDb::default()),
            1,
            HashPrefixDefaults {
                safe_browsing: true,
                parental: false,
                newly_registered: false,
            },
        );

        let query = DnsQuery::new("malware.example", RecordType::A);
        let outcome = use_case.execute(&test_ctx(), &query).await.unwrap();
        assert!(matches!(outcome, QueryOutcome::Blocked { list_id } if list_id == "safe_browsing"));
    }

    #[tokio::test]
    async fn hash_prefix_hit_allowed_when_category_disabled() {
        let use_case = HandleDnsQueryUseCase::new(
            Arc::new(AllowAccess),
            Arc::new(AlwaysAllowRate),
            Arc::new(NoDevice),
            Arc::new(AlwaysAllowFilter(AtomicU32::new(0))),
            Arc::new(AlwaysListed(HashPrefixCategory::Parental)),
            Arc::new(StubResolver),
            Arc::new(NullRuleStats),
            Arc::new(ProfileDb::default()),
            1,
            no_hash_prefix_defaults(),
        );

        let query = DnsQuery::new("adult.example", RecordType::A);
        let outcome = use_case.execute(&test_ctx(), &query).await.unwrap();
        assert!(matches!(outcome, QueryOutcome::Resolved(_)));
    }
}
