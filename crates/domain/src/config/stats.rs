//! RuleStat / Billstat uploader configuration.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatsConfig {
    #[serde(default)]
    pub rulestat_url: Option<String>,
    #[serde(default = "default_interval")]
    pub rulestat_upload_interval_secs: u64,
    #[serde(default)]
    pub billstat_url: Option<String>,
    #[serde(default = "default_interval")]
    pub billstat_upload_interval_secs: u64,
}

impl Default for StatsConfig {
    fn default() -> Self {
        Self {
            rulestat_url: None,
            rulestat_upload_interval_secs: default_interval(),
            billstat_url: None,
            billstat_upload_interval_secs: default_interval(),
        }
    }
}

fn default_interval() -> u64 {
    300
}
