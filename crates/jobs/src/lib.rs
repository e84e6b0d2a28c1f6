//! Background refresh/upload loops.
//!
//! Every job here follows the same shape: a `tokio::select! { shutdown, tick }`
//! loop started via `Arc<Self>::start`, so it can be cancelled cleanly at
//! shutdown and polled independently of the request path.

pub mod allowlist_refresh;
pub mod billstat_upload;
pub mod blocklist_sync;
pub mod hash_prefix_sync;
pub mod query_log_retention;
pub mod rulestat_upload;
pub mod runner;

pub use allowlist_refresh::AllowlistRefreshJob;
pub use billstat_upload::BillstatUploadJob;
pub use blocklist_sync::BlocklistSyncJob;
pub use hash_prefix_sync::HashPrefixSyncJob;
pub use query_log_retention::QueryLogRetentionJob;
pub use rulestat_upload::RuleStatUploadJob;
pub use runner::JobRunner;

// The forwarder's health-check loop (spec.md §4.8) lives in
// `bastion_dns_infrastructure::dns::load_balancer::health::HealthChecker`
// instead of here: it already owns a self-contained `Arc<Self>::start()`
// loop with the same cancellation-token shape as these jobs, and probing
// upstreams needs transport/codec types this crate deliberately doesn't
// depend on. The CLI composition root starts it directly alongside
// `JobRunner`.
