use std::sync::atomic::AtomicU64;

/// Lock-free cache counters, read by the stats surface and reset on
/// `DnsCache::clear`.
#[derive(Debug, Default)]
pub struct CacheMetrics {
    pub hits: AtomicU64,
    pub misses: AtomicU64,
    pub evictions: AtomicU64,
    pub insertions: AtomicU64,
}
