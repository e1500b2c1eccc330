//! Error types for the verse clock binary.
//!
//! Everything that can go wrong before the controller starts. Load
//! failures after that are reported by the controller itself as
//! [`LoadError`](verseclock_core::error::LoadError).

/// Errors that can occur while setting up the verse clock.
#[derive(Debug, thiserror::Error)]
pub enum RunnerError {
    /// Configuration is invalid or unreadable.
    #[error("config error: {source}")]
    Config {
        /// The underlying config error.
        #[from]
        source: verseclock_core::config::ConfigError,
    },

    /// The HTTP client could not be built.
    #[error("HTTP client error: {0}")]
    HttpClient(String),
}
