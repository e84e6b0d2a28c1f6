use std::net::IpAddr;

/// Stream-oriented (TCP/DoT/DoH/DoQ) per-client connection limiter with
/// stop/resume watermarks, so a handful of misbehaving clients can't
/// starve new connections from everyone else.
pub trait ConnLimiterPort: Send + Sync {
    /// Call on connection accept. Returns `false` if the high watermark has
    /// been hit and the connection should be refused.
    fn try_acquire(&self, ip: IpAddr) -> bool;

    /// Call on connection close.
    fn release(&self, ip: IpAddr);

    fn active_connections(&self, ip: IpAddr) -> u32;
}
