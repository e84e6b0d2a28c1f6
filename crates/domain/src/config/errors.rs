use thiserror::Error;

/// Errors raised while loading or validating configuration.
///
/// Per the error-handling design, a config/init error is fatal: the binary
/// logs it and exits with a non-zero status rather than attempting recovery.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid configuration: {0}")]
    Invalid(String),

    #[error("missing required environment variable: {0}")]
    MissingEnv(String),
}
