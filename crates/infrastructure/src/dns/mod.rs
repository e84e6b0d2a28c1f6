pub mod access;
pub mod block_filter;
pub mod cache;
pub mod connlimiter;
pub mod device_finder;
pub mod dnscheck;
pub mod dnssec;
pub mod events;
pub mod forwarding;
pub mod http_adapters;
pub mod load_balancer;
pub mod prefetch;
pub mod query_logger;
pub mod ratelimit;
pub mod resolver;
pub mod server;
pub mod stats;
pub mod transport;

pub use cache::{
    CacheKey, CacheMetrics, CachedData, CachedRecord, DnsCache, DnssecStatus, EvictionStrategy,
    NegativeQueryTracker,
};
pub use prefetch::PrefetchPredictor;
pub use resolver::HickoryDnsResolver;
pub use server::{ChaosReplies, DnsServerHandler, EcsPolicy};
