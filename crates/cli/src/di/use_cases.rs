//! Assembles the request-processing use case and the background job
//! runner from the wired ports.

use std::sync::Arc;

use bastion_dns_application::use_cases::CleanupOldQueryLogsUseCase;
use bastion_dns_application::{HandleDnsQueryUseCase, HashPrefixDefaults};
use bastion_dns_domain::Config;
use bastion_dns_infrastructure::dns::http_adapters::{
    HttpAllowlistFetcher, HttpBillstatUploader, HttpRuleStatUploader,
};
use bastion_dns_jobs::{
    AllowlistRefreshJob, BillstatUploadJob, BlocklistSyncJob, HashPrefixSyncJob, JobRunner,
    QueryLogRetentionJob, RuleStatUploadJob,
};

use super::dns::DnsServices;
use super::repositories::Repositories;

pub struct UseCases {
    pub handle_query: Arc<HandleDnsQueryUseCase>,
}

impl UseCases {
    pub fn build(
        config: &Config,
        dns: &DnsServices,
        repos: &Repositories,
        default_group_id: i64,
    ) -> Self {
        let handle_query = Arc::new(HandleDnsQueryUseCase::new(
            dns.access.clone(),
            dns.ratelimit.clone(),
            dns.device_finder.clone(),
            dns.filter.clone(),
            dns.hash_prefix.clone(),
            dns.resolver.clone(),
            dns.rule_stats.clone(),
            repos.profiles.clone(),
            default_group_id,
            HashPrefixDefaults {
                safe_browsing: config.filter.safe_browsing_enabled,
                parental: config.filter.parental_enabled,
                newly_registered: config.filter.newly_registered_domains_enabled,
            },
        ));

        Self { handle_query }
    }

    /// Registers every background job the config turns on. Retention and
    /// blocklist sync always run; allowlist refresh and the two stat
    /// uploaders only run once their upload URL is configured, mirroring
    /// how `dnscheck`/`geoip` gate themselves on their own `enabled` flag.
    pub fn build_job_runner(config: &Config, dns: &DnsServices, repos: &Repositories) -> JobRunner {
        let http_client = reqwest::Client::builder()
            .user_agent("Bastion-DNS/1.0 (stats-upload)")
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .expect("building the stats-upload HTTP client");

        let mut runner = JobRunner::new()
            .with_query_log_retention(QueryLogRetentionJob::new(
                Arc::new(CleanupOldQueryLogsUseCase::new(repos.query_log.clone())),
                30,
            ))
            .with_blocklist_sync(BlocklistSyncJob::new(dns.filter.clone()))
            .with_hash_prefix_sync(
                HashPrefixSyncJob::new(dns.hash_prefix.clone())
                    .with_interval(config.filter.refresh_interval_secs),
            );

        if let Some(url) = &config.ratelimit.allowlist_url {
            let fetcher = Arc::new(HttpAllowlistFetcher::new(http_client.clone(), url.clone()));
            let job = AllowlistRefreshJob::new(fetcher, dns.ratelimit.clone())
                .with_interval(config.ratelimit.allowlist_refresh_secs);
            runner = runner.with_allowlist_refresh(job);
        }

        if let Some(url) = &config.stats.rulestat_url {
            let uploader = Arc::new(HttpRuleStatUploader::new(http_client.clone(), url.clone()));
            let job = RuleStatUploadJob::new(dns.rule_stats.clone(), uploader)
                .with_interval(config.stats.rulestat_upload_interval_secs);
            runner = runner.with_rulestat_upload(job);
        }

        if let Some(url) = &config.stats.billstat_url {
            let uploader = Arc::new(HttpBillstatUploader::new(http_client.clone(), url.clone()));
            let job = BillstatUploadJob::new(dns.billstats.clone(), uploader)
                .with_interval(config.stats.billstat_upload_interval_secs);
            runner = runner.with_billstat_upload(job);
        }

        runner
    }
}
