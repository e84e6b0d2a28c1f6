//! Stream-connection limiter configuration (TCP/DoT/DoH/DoQ listeners).

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConnLimiterConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Pause accepting new connections once this many are active.
    #[serde(default = "default_stop")]
    pub stop_watermark: usize,
    /// Resume accepting once active connections drop below this.
    #[serde(default = "default_resume")]
    pub resume_watermark: usize,
}

impl Default for ConnLimiterConfig {
    fn default() -> Self {
        Self {
            enabled: default_true(),
            stop_watermark: default_stop(),
            resume_watermark: default_resume(),
        }
    }
}

fn default_true() -> bool {
    true
}
fn default_stop() -> usize {
    10_000
}
fn default_resume() -> usize {
    9_000
}
