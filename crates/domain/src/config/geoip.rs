//! GeoIP database configuration.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct GeoIpConfig {
    #[serde(default)]
    pub enabled: bool,
    /// Path to a MaxMind GeoLite2-Country/ASN `.mmdb` file.
    #[serde(default)]
    pub country_db_path: Option<String>,
    #[serde(default)]
    pub asn_db_path: Option<String>,
    /// Re-check the files for changes on disk every N seconds.
    #[serde(default = "default_reload")]
    pub reload_interval_secs: u64,
}

fn default_reload() -> u64 {
    3600
}
