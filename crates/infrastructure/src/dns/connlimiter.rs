//! Stream-connection limiter with stop/resume watermarks: once the total
//! active count hits `stop`, new connections are refused until it drops
//! back to `resume`, so a burst of slow clients can't starve everyone else.

use bastion_dns_application::ports::ConnLimiterPort;
use dashmap::DashMap;
use std::net::IpAddr;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};

pub struct ConnLimiterAdapter {
    per_ip: DashMap<IpAddr, AtomicU32>,
    active_total: AtomicU32,
    /// `true` while paused (total hit `stop` and hasn't yet dropped to `resume`).
    paused: AtomicBool,
    stop_watermark: u32,
    resume_watermark: u32,
}

impl ConnLimiterAdapter {
    pub fn new(stop_watermark: u32, resume_watermark: u32) -> Self {
        Self {
            per_ip: DashMap::new(),
            active_total: AtomicU32::new(0),
            paused: AtomicBool::new(false),
            stop_watermark,
            resume_watermark,
        }
    }

    pub fn total_active(&self) -> u32 {
        self.active_total.load(Ordering::Relaxed)
    }

    pub fn is_paused(&self) -> bool {
        self.paused.load(Ordering::Relaxed)
    }
}

impl ConnLimiterPort for ConnLimiterAdapter {
    fn try_acquire(&self, ip: IpAddr) -> bool {
        if self.paused.load(Ordering::Relaxed) {
            return false;
        }
        let total = self.active_total.fetch_add(1, Ordering::AcqRel) + 1;
        if total >= self.stop_watermark {
            self.paused.store(true, Ordering::Relaxed);
        }
        self.per_ip.entry(ip).or_insert_with(|| AtomicU32::new(0)).fetch_add(1, Ordering::AcqRel);
        true
    }

    fn release(&self, ip: IpAddr) {
        let prev = self.active_total.fetch_sub(1, Ordering::AcqRel);
        let total = prev.saturating_sub(1);
        if total <= self.resume_watermark {
            self.paused.store(false, Ordering::Relaxed);
        }
        if let Some(counter) = self.per_ip.get(&ip) {
            counter.fetch_sub(1, Ordering::AcqRel);
        }
    }

    fn active_connections(&self, ip: IpAddr) -> u32 {
        self.per_ip.get(&ip).map(|c| c.load(Ordering::Relaxed)).unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn refuses_past_stop_watermark_until_resume() {
        let limiter = ConnLimiterAdapter::new(2, 1);
        let ip: IpAddr = "192.0.2.1".parse().unwrap();
        assert!(limiter.try_acquire(ip));
        assert!(limiter.try_acquire(ip));
        assert!(limiter.is_paused());
        assert!(!limiter.try_acquire(ip));

        limiter.release(ip);
        assert!(!limiter.is_paused());
        assert!(limiter.try_acquire(ip));
    }

    #[test]
    fn tracks_per_ip_counts_independently() {
        let limiter = ConnLimiterAdapter::new(100, 50);
        let a: IpAddr = "192.0.2.1".parse().unwrap();
        let b: IpAddr = "192.0.2.2".parse().unwrap();
        limiter.try_acquire(a);
        limiter.try_acquire(a);
        limiter.try_acquire(b);
        assert_eq!(limiter.active_connections(a), 2);
        assert_eq!(limiter.active_connections(b), 1);
    }
}
