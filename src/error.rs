//! Error types for chat-relay.

/// Top-level error type for the relay.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),
}

/// Configuration-related errors.
///
/// Always fatal: raised during startup validation, before any event is
/// consumed.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required configuration: {key}. {hint}")]
    MissingRequired { key: String, hint: String },

    #[error("Invalid configuration value for {key}: {message}")]
    InvalidValue { key: String, message: String },
}

/// Transport-related errors.
///
/// Transient: the dispatch loop logs them and enters its failure cooldown.
/// The message that triggered the error is considered lost.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("Transport {name} failed to start: {reason}")]
    StartupFailed { name: String, reason: String },

    #[error("Polling {name} failed: {reason}")]
    PollFailed { name: String, reason: String },

    #[error("Forward to {destination} failed: {reason}")]
    SendFailed { destination: i64, reason: String },

    #[error("Transport {name} disconnected: {reason}")]
    Disconnected { name: String, reason: String },
}

/// Result type alias for the relay.
pub type Result<T> = std::result::Result<T, Error>;
