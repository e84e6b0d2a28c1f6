//! Token-bucket rate limiting keyed by client subnet (not bare IP, so a
//! household behind one prefix shares a single bucket), with a CIDR
//! allowlist that bypasses the bucket entirely.

use arc_swap::ArcSwap;
use bastion_dns_application::ports::{RateLimitDecision, RateLimiterPort};
use bastion_dns_domain::netutil::parse_subnets;
use dashmap::DashMap;
use ipnetwork::IpNetwork;
use std::net::IpAddr;
use std::sync::Mutex;
use std::time::Instant;

struct Bucket {
    tokens: f64,
    last_refill: Instant,
}

/// Buckets are created lazily on first sight of a subnet key and refilled
/// lazily on each check; there is no background sweep, so long-idle keys
/// just sit at full capacity until touched again.
pub struct RateLimiterAdapter {
    buckets: DashMap<IpNetwork, Mutex<Bucket>>,
    allowlist: ArcSwap<Vec<IpNetwork>>,
    ipv4_prefix: u8,
    ipv6_prefix: u8,
}

impl RateLimiterAdapter {
    pub fn new(ipv4_prefix: u8, ipv6_prefix: u8) -> Self {
        Self {
            buckets: DashMap::new(),
            allowlist: ArcSwap::from_pointee(Vec::new()),
            ipv4_prefix,
            ipv6_prefix,
        }
    }

    fn bucket_key(&self, ip: IpAddr) -> IpNetwork {
        let prefix = match ip {
            IpAddr::V4(_) => self.ipv4_prefix,
            IpAddr::V6(_) => self.ipv6_prefix,
        };
        IpNetwork::new(ip, prefix)
            .and_then(|n| IpNetwork::new(n.network(), prefix))
            .unwrap_or_else(|_| IpNetwork::from(ip))
    }
}

impl RateLimiterPort for RateLimiterAdapter {
    fn check(&self, ip: IpAddr, capacity: u32, refill_per_sec: u32) -> RateLimitDecision {
        let key = self.bucket_key(ip);
        let entry = self
            .buckets
            .entry(key)
            .or_insert_with(|| {
                Mutex::new(Bucket {
                    tokens: capacity as f64,
                    last_refill: Instant::now(),
                })
            });

        let mut bucket = entry.lock().unwrap();
        let now = Instant::now();
        let elapsed = now.duration_since(bucket.last_refill).as_secs_f64();
        bucket.last_refill = now;
        bucket.tokens = (bucket.tokens + elapsed * refill_per_sec as f64).min(capacity as f64);

        if bucket.tokens >= 1.0 {
            bucket.tokens -= 1.0;
            RateLimitDecision::Allow
        } else {
            RateLimitDecision::Throttle
        }
    }

    fn is_allowlisted(&self, ip: IpAddr) -> bool {
        self.allowlist.load().iter().any(|n| n.contains(ip))
    }

    fn reload_allowlist(&self, cidrs: Vec<String>) -> Result<(), String> {
        let parsed = parse_subnets(cidrs.iter().map(String::as_str))?;
        self.allowlist.store(std::sync::Arc::new(parsed));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn depletes_bucket_then_throttles() {
        let limiter = RateLimiterAdapter::new(24, 64);
        let ip: IpAddr = "192.0.2.1".parse().unwrap();
        assert_eq!(limiter.check(ip, 2, 0), RateLimitDecision::Allow);
        assert_eq!(limiter.check(ip, 2, 0), RateLimitDecision::Allow);
        assert_eq!(limiter.check(ip, 2, 0), RateLimitDecision::Throttle);
    }

    #[test]
    fn shares_bucket_across_same_v4_subnet() {
        let limiter = RateLimiterAdapter::new(24, 64);
        limiter.check("192.0.2.1".parse().unwrap(), 1, 0);
        assert_eq!(
            limiter.check("192.0.2.2".parse().unwrap(), 1, 0),
            RateLimitDecision::Throttle
        );
    }

    #[test]
    fn allowlisted_ip_bypasses_bucket() {
        let limiter = RateLimiterAdapter::new(24, 64);
        limiter.reload_allowlist(vec!["203.0.113.0/24".to_string()]).unwrap();
        assert!(limiter.is_allowlisted("203.0.113.5".parse().unwrap()));
        assert!(!limiter.is_allowlisted("192.0.2.1".parse().unwrap()));
    }
}
