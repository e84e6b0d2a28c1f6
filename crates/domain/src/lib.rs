//! Bastion DNS Domain Layer
//!
//! Plain data types and pure logic shared by every other crate. Nothing
//! here talks to a database, the network, or the filesystem — that's the
//! infrastructure layer's job.

pub mod blocklist;
pub mod client_subnet;
pub mod config;
pub mod device;
pub mod dns_protocol;
pub mod dns_query;
pub mod dns_record;
pub mod dns_request;
pub mod errors;
pub mod group;
pub mod netutil;
pub mod profile;
pub mod psl;
pub mod query_log;
pub mod validators;
pub mod whitelist_source;

pub use blocklist::BlockedDomain;
pub use client_subnet::{ClientSubnet, SubnetMatcher};
pub use config::{CliOverrides, Config, ConfigError, UpstreamPool, UpstreamStrategy};
pub use device::{Device, DeviceDb, DohAuth};
pub use dns_protocol::DnsProtocol;
pub use dns_query::{DnsQuery, EcsScope};
pub use dns_record::{DnsRecord, RecordType};
pub use dns_request::{
    canonicalize, DnsRequest, DnsRequestContext, RequestId, ServerInfo, TlsInfo, TransportKind,
};
pub use errors::DomainError;
pub use group::{Group, GroupStats};
pub use netutil::{format_prefix_addr, parse_subnets};
pub use profile::{AccessPolicy, CustomRewrite, FilterPolicy, Profile, ProfileDb, RateLimitOverride};
pub use psl::{android_metric_domain_replacement, append_subdomains, is_immediate_subdomain, is_subdomain, DefaultPsl, PublicSuffixList};
pub use query_log::{CacheStats, QueryLog, QuerySource, QueryStats};
pub use whitelist_source::WhitelistSource;
