//! Top-level configuration: aggregates every config section and owns the
//! load/validate lifecycle.
//!
//! Config is a single TOML file plus environment variable and CLI overrides,
//! following the composition-root rule in the design notes: there is no
//! global `init()`; `bootstrap::config::load_config` builds one `Config` and
//! passes it down explicitly.

use std::path::Path;

use serde::{Deserialize, Serialize};

use super::{
    AccessConfig, BlockingConfig, ConfigError, ConnLimiterConfig, DatabaseConfig, DnsCheckConfig,
    DnsConfig, FilterConfig, GeoIpConfig, HealthCheckConfig, LoggingConfig, RateLimitConfig,
    ServerConfig, StatsConfig,
};

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub dns: DnsConfig,
    #[serde(default)]
    pub blocking: BlockingConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub access: AccessConfig,
    #[serde(default)]
    pub ratelimit: RateLimitConfig,
    #[serde(default)]
    pub filter: FilterConfig,
    #[serde(default)]
    pub dnscheck: DnsCheckConfig,
    #[serde(default)]
    pub connlimiter: ConnLimiterConfig,
    #[serde(default)]
    pub stats: StatsConfig,
    #[serde(default)]
    pub geoip: GeoIpConfig,
}

/// Overrides passed on the command line that take precedence over the file
/// and environment, e.g. `bastion-dnsd --dns-port 5353`.
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub dns_port: Option<u16>,
    pub web_port: Option<u16>,
    pub bind_address: Option<String>,
    pub config_path: Option<String>,
    pub database_path: Option<String>,
    pub log_level: Option<String>,
}

impl Config {
    /// Load a config file from `path`, applying environment and CLI
    /// overrides in that order (file < env < CLI).
    pub fn load(path: impl AsRef<Path>, overrides: CliOverrides) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;

        let mut config: Config = toml::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        })?;

        config.apply_env();
        config.apply_overrides(overrides);
        Ok(config)
    }

    /// Load defaults, used by tests and by `--config` being absent.
    pub fn load_default_with_overrides(overrides: CliOverrides) -> Self {
        let mut config = Config::default();
        config.apply_env();
        config.apply_overrides(overrides);
        config
    }

    fn apply_env(&mut self) {
        if let Ok(path) = std::env::var("BASTION_DNS_DB_PATH") {
            self.database.path = path;
        }
        if let Ok(level) = std::env::var("BASTION_DNS_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Ok(url) = std::env::var("BASTION_DNS_ALLOWLIST_URL") {
            self.ratelimit.allowlist_url = Some(url);
        }
    }

    fn apply_overrides(&mut self, overrides: CliOverrides) {
        if let Some(port) = overrides.dns_port {
            self.server.dns_port = port;
        }
        if let Some(port) = overrides.web_port {
            self.server.web_port = port;
        }
        if let Some(bind) = overrides.bind_address {
            self.server.bind_address = bind;
        }
        if let Some(path) = overrides.database_path {
            self.database.path = path;
        }
        if let Some(level) = overrides.log_level {
            self.logging.level = level;
        }
    }

    /// Validate cross-field invariants that serde defaults can't express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.dns.upstream_servers.is_empty() && self.dns.pools.is_empty() {
            return Err(ConfigError::Invalid(
                "at least one upstream server or pool must be configured".into(),
            ));
        }
        if self.ratelimit.ipv4_prefix > 32 {
            return Err(ConfigError::Invalid("ratelimit.ipv4_prefix must be <= 32".into()));
        }
        if self.ratelimit.ipv6_prefix > 128 {
            return Err(ConfigError::Invalid("ratelimit.ipv6_prefix must be <= 128".into()));
        }
        if self.connlimiter.resume_watermark >= self.connlimiter.stop_watermark {
            return Err(ConfigError::Invalid(
                "connlimiter.resume_watermark must be less than stop_watermark".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_validate() {
        let config = Config::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn cli_overrides_take_precedence() {
        let overrides = CliOverrides {
            dns_port: Some(5353),
            ..Default::default()
        };
        let config = Config::load_default_with_overrides(overrides);
        assert_eq!(config.server.dns_port, 5353);
    }

    #[test]
    fn rejects_inverted_watermarks() {
        let mut config = Config::default();
        config.connlimiter.stop_watermark = 10;
        config.connlimiter.resume_watermark = 20;
        assert!(config.validate().is_err());
    }
}
