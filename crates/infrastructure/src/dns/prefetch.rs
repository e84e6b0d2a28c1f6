use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use dashmap::DashMap;

/// Tracks how often each domain is queried so a background job could, in
/// principle, refresh hot entries before they expire. The predictor only
/// records observations here; nothing currently consumes the signal to
/// actually trigger a refresh, since no job in this deployment runs ahead
/// of TTL expiry.
pub struct PrefetchPredictor {
    counts: DashMap<Box<str>, (AtomicU64, Instant)>,
    window: Duration,
}

impl PrefetchPredictor {
    pub fn new() -> Self {
        Self {
            counts: DashMap::new(),
            window: Duration::from_secs(300),
        }
    }

    pub fn on_query(&self, domain: &str) {
        match self.counts.get(domain) {
            Some(entry) => {
                entry.0.fetch_add(1, Ordering::Relaxed);
            }
            None => {
                self.counts
                    .insert(domain.into(), (AtomicU64::new(1), Instant::now()));
            }
        }
    }

    /// Domains queried often enough, recently enough, to be worth a
    /// pre-expiry refresh.
    pub fn hot_domains(&self, min_hits: u64) -> Vec<String> {
        self.counts
            .iter()
            .filter(|e| e.0.load(Ordering::Relaxed) >= min_hits && e.1.elapsed() < self.window)
            .map(|e| e.key().to_string())
            .collect()
    }
}

impl Default for PrefetchPredictor {
    fn default() -> Self {
        Self::new()
    }
}
