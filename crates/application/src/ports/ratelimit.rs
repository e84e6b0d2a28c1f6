use std::net::IpAddr;

/// Outcome of a rate-limit check for one request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateLimitDecision {
    Allow,
    Throttle,
}

/// Token-bucket rate limiting, keyed by client IP, with a CIDR allowlist
/// that bypasses the bucket entirely. Buckets are created lazily on first
/// sight of an IP and refilled lazily on each check — there is no
/// background refill task.
pub trait RateLimiterPort: Send + Sync {
    /// Consume one token for `ip`, using `capacity`/`refill_per_sec` if the
    /// caller has a per-profile override, or the server default otherwise.
    fn check(&self, ip: IpAddr, capacity: u32, refill_per_sec: u32) -> RateLimitDecision;

    /// `true` if `ip` falls in the allowlist and should skip rate limiting
    /// entirely.
    fn is_allowlisted(&self, ip: IpAddr) -> bool;

    /// Atomically swap in a freshly fetched allowlist snapshot.
    fn reload_allowlist(&self, cidrs: Vec<String>) -> Result<(), String>;
}
