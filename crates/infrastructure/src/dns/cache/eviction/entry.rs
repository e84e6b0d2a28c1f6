use super::super::key::CacheKey;

/// A candidate for eviction, scored by whichever `EvictionStrategy` the
/// cache is configured with.
#[derive(Debug, Clone)]
pub struct EvictionEntry {
    pub key: CacheKey,
    pub score: f64,
    pub last_access: u64,
}
