//! DNSCheck feature configuration.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DnsCheckConfig {
    #[serde(default)]
    pub enabled: bool,
    /// Domain suffix check-queries must end with, e.g. "check.example.local".
    #[serde(default = "default_suffix")]
    pub suffix: String,
    #[serde(default = "default_ttl")]
    pub record_ttl_secs: u32,
    #[serde(default)]
    pub answer_a: Option<String>,
    #[serde(default)]
    pub answer_aaaa: Option<String>,
    /// Remote KV backend: "memory", "consul", or "redis".
    #[serde(default = "default_kv_backend")]
    pub kv_backend: String,
    #[serde(default)]
    pub kv_url: Option<String>,
    #[serde(default = "default_record_ttl")]
    pub kv_record_ttl_secs: u64,
}

impl Default for DnsCheckConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            suffix: default_suffix(),
            record_ttl_secs: default_ttl(),
            answer_a: None,
            answer_aaaa: None,
            kv_backend: default_kv_backend(),
            kv_url: None,
            kv_record_ttl_secs: default_record_ttl(),
        }
    }
}

fn default_suffix() -> String {
    "check.example.local".to_string()
}
fn default_ttl() -> u32 {
    10
}
fn default_kv_backend() -> String {
    "memory".to_string()
}
fn default_record_ttl() -> u64 {
    300
}
