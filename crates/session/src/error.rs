use thiserror::Error;

/// Configuration failures. The only fatal error class: a config that does
/// not validate is rejected before any session starts.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config {path}: {error}")]
    Io { path: String, error: String },

    #[error("failed to parse config: {0}")]
    Parse(String),

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Session lifecycle errors
#[derive(Error, Debug)]
pub enum SessionError {
    #[error("session is closed")]
    Closed,
}
