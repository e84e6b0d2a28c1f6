//! Rate-limit middleware configuration.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateLimitConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Token-bucket capacity per subnet.
    #[serde(default = "default_capacity")]
    pub capacity: u32,
    /// Tokens refilled per second.
    #[serde(default = "default_refill_rate")]
    pub refill_per_sec: u32,
    /// IPv4 subnet mask used to bucket clients, e.g. 24 for a /24.
    #[serde(default = "default_v4_prefix")]
    pub ipv4_prefix: u8,
    /// IPv6 subnet mask used to bucket clients, e.g. 64 for a /64.
    #[serde(default = "default_v6_prefix")]
    pub ipv6_prefix: u8,
    /// URL polled periodically for the dynamic allowlist JSON document.
    #[serde(default)]
    pub allowlist_url: Option<String>,
    /// Allowlist poll interval, seconds.
    #[serde(default = "default_allowlist_interval")]
    pub allowlist_refresh_secs: u64,
    /// What to do with a UDP query once the bucket is depleted: "drop" or "refused".
    #[serde(default = "default_udp_deplete_action")]
    pub udp_deplete_action: String,
    /// What to do with a TCP/stream query once the bucket is depleted.
    #[serde(default = "default_tcp_deplete_action")]
    pub tcp_deplete_action: String,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            enabled: default_true(),
            capacity: default_capacity(),
            refill_per_sec: default_refill_rate(),
            ipv4_prefix: default_v4_prefix(),
            ipv6_prefix: default_v6_prefix(),
            allowlist_url: None,
            allowlist_refresh_secs: default_allowlist_interval(),
            udp_deplete_action: default_udp_deplete_action(),
            tcp_deplete_action: default_tcp_deplete_action(),
        }
    }
}

fn default_true() -> bool {
    true
}
fn default_capacity() -> u32 {
    50
}
fn default_refill_rate() -> u32 {
    10
}
fn default_v4_prefix() -> u8 {
    24
}
fn default_v6_prefix() -> u8 {
    64
}
fn default_allowlist_interval() -> u64 {
    60
}
fn default_udp_deplete_action() -> String {
    "drop".to_string()
}
fn default_tcp_deplete_action() -> String {
    "refused".to_string()
}
