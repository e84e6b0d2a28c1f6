use std::net::IpAddr;

/// Access control: the first gate after initial request shaping. Runs a
/// global deny-list first, then (once a profile is attached) a per-profile
/// one. Both tiers are plain host/subnet membership checks, synchronous
/// and allocation-free on the hit path.
pub trait AccessControlPort: Send + Sync {
    /// `true` if `ip` is denied by the server-wide access list.
    fn is_globally_denied(&self, ip: IpAddr) -> bool;

    /// `true` if `ip` or `qname` is denied by `profile_id`'s access policy.
    /// Called only after a profile has been resolved for the request.
    fn is_denied_for_profile(&self, profile_id: i64, ip: IpAddr, qname: &str) -> bool;

    /// Atomically swap in a freshly loaded access-list snapshot.
    fn reload(&self, global_hosts: Vec<String>, global_subnets: Vec<String>);
}
