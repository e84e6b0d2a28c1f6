//! Configuration module for Bastion DNS
//!
//! This module contains all configuration structures organized by domain:
//! - `root`: Main configuration and CLI overrides
//! - `server`: Server ports and binding
//! - `dns`: DNS resolution settings
//! - `upstream`: Upstream server pools and strategies
//! - `health`: Health check configuration
//! - `blocking`: Ad-blocking configuration
//! - `access`: Global host/subnet deny-lists
//! - `ratelimit`: Token-bucket rate limiting and allowlist refresh
//! - `filter`: Rule-list and hash-prefix filter sources
//! - `dnscheck`: Check-domain protocol and remote KV backend
//! - `connlimiter`: Stream-connection watermarks
//! - `stats`: RuleStat/Billstat uploader endpoints
//! - `geoip`: MaxMind database paths
//! - `logging`: Logging settings
//! - `database`: Database configuration
//! - `local_records`: Local DNS records
//! - `errors`: Configuration errors

pub mod access;
pub mod blocking;
pub mod connlimiter;
pub mod database;
pub mod dns;
pub mod dnscheck;
pub mod errors;
pub mod filter;
pub mod geoip;
pub mod health;
pub mod local_records;
pub mod logging;
pub mod ratelimit;
pub mod root;
pub mod server;
pub mod stats;
pub mod upstream;

pub use access::AccessConfig;
pub use blocking::BlockingConfig;
pub use connlimiter::ConnLimiterConfig;
pub use database::DatabaseConfig;
pub use dns::{ConditionalForward, DnsConfig};
pub use dnscheck::DnsCheckConfig;
pub use errors::ConfigError;
pub use filter::{FilterConfig, RuleListSource};
pub use geoip::GeoIpConfig;
pub use health::HealthCheckConfig;
pub use local_records::LocalDnsRecord;
pub use logging::LoggingConfig;
pub use ratelimit::RateLimitConfig;
pub use root::{CliOverrides, Config};
pub use server::ServerConfig;
pub use stats::StatsConfig;
pub use upstream::{UpstreamPool, UpstreamStrategy};
