//! Filter-engine configuration: rule lists, hash-prefix sources, rewrites.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct FilterConfig {
    #[serde(default = "default_true")]
    pub safe_browsing_enabled: bool,
    #[serde(default)]
    pub safe_browsing_hash_source: Option<String>,
    #[serde(default)]
    pub parental_enabled: bool,
    #[serde(default)]
    pub parental_hash_source: Option<String>,
    #[serde(default)]
    pub newly_registered_domains_enabled: bool,
    #[serde(default)]
    pub newly_registered_domains_source: Option<String>,
    /// Directory used to cache downloaded hash/rule sources on disk.
    #[serde(default = "default_cache_dir")]
    pub cache_dir: String,
    /// Rule-list sources (URLs or local paths).
    #[serde(default)]
    pub rule_lists: Vec<RuleListSource>,
    #[serde(default = "default_refresh_interval")]
    pub refresh_interval_secs: u64,
    /// What a block decision synthesizes: "nxdomain", "nodata", "null_ip", or "block_page_ip".
    #[serde(default = "default_block_mode")]
    pub block_mode: String,
    #[serde(default)]
    pub block_page_ip: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuleListSource {
    pub id: String,
    pub category: String,
    pub url: String,
}

fn default_true() -> bool {
    true
}
fn default_cache_dir() -> String {
    "./cache/filters".to_string()
}
fn default_refresh_interval() -> u64 {
    3600
}
fn default_block_mode() -> String {
    "nxdomain".to_string()
}
