use std::sync::atomic::{AtomicBool, AtomicU32, AtomicU64, Ordering};

use bastion_dns_domain::RecordType;

use super::coarse_clock::coarse_now_secs;
use super::data::{CachedData, DnssecStatus};

/// A grace window past expiry during which a stale entry is still served
/// (stale-while-revalidate) instead of blocking the client on a fresh
/// upstream round trip.
const STALE_GRACE_SECS: u64 = 30;

/// One cache slot. Frequency/recency bookkeeping is all atomics so reads
/// never take a write lock on the DashMap shard.
#[derive(Debug)]
pub struct CachedRecord {
    pub data: CachedData,
    pub dnssec_status: DnssecStatus,
    pub record_type: RecordType,
    inserted_at: u64,
    ttl: u32,
    pub last_access: AtomicU64,
    hit_count: AtomicU64,
    lfuk_window: AtomicU32,
    use_lfuk: bool,
    pub refreshing: AtomicBool,
    tombstoned: AtomicBool,
}

impl CachedRecord {
    pub fn new(
        data: CachedData,
        ttl: u32,
        record_type: RecordType,
        use_lfuk: bool,
        dnssec_status: Option<DnssecStatus>,
    ) -> Self {
        let now = coarse_now_secs();
        Self {
            data,
            dnssec_status: dnssec_status.unwrap_or(DnssecStatus::Unknown),
            record_type,
            inserted_at: now,
            ttl,
            last_access: AtomicU64::new(now),
            hit_count: AtomicU64::new(0),
            lfuk_window: AtomicU32::new(0),
            use_lfuk,
            refreshing: AtomicBool::new(false),
            tombstoned: AtomicBool::new(false),
        }
    }

    fn age_secs(&self) -> u64 {
        coarse_now_secs().saturating_sub(self.inserted_at)
    }

    pub fn is_expired(&self) -> bool {
        self.age_secs() >= self.ttl as u64
    }

    /// Expired, but still within the stale-while-revalidate grace window.
    pub fn is_stale_usable(&self) -> bool {
        let age = self.age_secs();
        age >= self.ttl as u64 && age < self.ttl as u64 + STALE_GRACE_SECS
    }

    pub fn should_refresh(&self, threshold: f64) -> bool {
        if self.ttl == 0 {
            return false;
        }
        (self.age_secs() as f64 / self.ttl as f64) >= threshold
    }

    pub fn is_marked_for_deletion(&self) -> bool {
        self.tombstoned.load(Ordering::Relaxed)
    }

    pub fn mark_for_deletion(&self) {
        self.tombstoned.store(true, Ordering::Relaxed);
    }

    pub fn record_hit(&self) {
        self.last_access.store(coarse_now_secs(), Ordering::Relaxed);
        self.hit_count.fetch_add(1, Ordering::Relaxed);
        if self.use_lfuk {
            self.lfuk_window.fetch_add(1, Ordering::Relaxed);
        }
    }

    pub fn frequency(&self) -> u64 {
        self.hit_count.load(Ordering::Relaxed)
    }

    /// Hits per second since insertion — the `HitRate` eviction strategy's
    /// score.
    pub fn hit_rate(&self) -> f64 {
        let age = self.age_secs().max(1);
        self.frequency() as f64 / age as f64
    }

    /// Hits within the current LFU-K sliding window, normalized by age so
    /// long-lived popular entries don't dominate forever.
    pub fn lfuk_score(&self) -> f64 {
        let window = self.lfuk_window.load(Ordering::Relaxed) as f64;
        let age = self.age_secs().max(1) as f64;
        window / age.sqrt()
    }
}
