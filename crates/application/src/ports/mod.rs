pub mod access;
pub mod allowlist;
pub mod block_filter_engine;
pub mod blocklist_repository;
pub mod client_subnet_repository;
pub mod connlimiter;
pub mod device_finder;
pub mod dns_resolver;
pub mod dnscheck;
pub mod geoip;
pub mod group_repository;
pub mod hash_prefix;
pub mod query_log_repository;
pub mod ratelimit;
pub mod stats;

pub use access::AccessControlPort;
pub use allowlist::AllowlistFetcherPort;
pub use block_filter_engine::{BlockFilterEnginePort, FilterDecision};
pub use blocklist_repository::BlocklistRepository;
pub use client_subnet_repository::ClientSubnetRepository;
pub use connlimiter::ConnLimiterPort;
pub use device_finder::{DeviceFinderPort, Identification, IdentificationChannel};
pub use dns_resolver::{DnsResolution, DnsResolver, EMPTY_CNAME_CHAIN};
pub use dnscheck::{DnsCheckPort, KvStorePort};
pub use geoip::{GeoIpLookup, GeoIpPort};
pub use group_repository::GroupRepository;
pub use hash_prefix::{HashPrefixCategory, HashPrefixPort};
pub use query_log_repository::QueryLogRepository;
pub use ratelimit::{RateLimitDecision, RateLimiterPort};
pub use stats::{BillstatRecorderPort, RuleStatRecorderPort, StatsUploaderPort};
