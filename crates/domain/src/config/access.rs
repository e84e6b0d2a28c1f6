//! Global access-policy configuration (host/subnet deny-lists).
//!
//! Per-profile deny-lists live on `Profile` itself; this is only the
//! server-wide tier consulted by the access middleware before a profile is
//! known.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AccessConfig {
    /// Exact or suffix (leading dot) host names to refuse globally.
    #[serde(default)]
    pub blocked_hosts: Vec<String>,
    /// CIDR blocks to refuse globally.
    #[serde(default)]
    pub blocked_subnets: Vec<String>,
    /// Response to return on a match: "refused" (default) or "drop".
    #[serde(default = "default_on_deny")]
    pub on_deny: String,
}

fn default_on_deny() -> String {
    "refused".to_string()
}
