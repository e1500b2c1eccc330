//! Error types for loading verse data.

/// Errors that can occur while loading the verse collection.
///
/// Any of these leaves the store unbuilt. The controller surfaces them to
/// the output sink and stops; nothing is retried automatically.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// The provider could not be reached at all.
    #[error("verse source unreachable: {message}")]
    Unreachable {
        /// Description of the transport or I/O failure.
        message: String,
    },

    /// The provider answered with a non-success status.
    #[error("verse source returned status {status}")]
    Status {
        /// The status code received.
        status: u16,
    },

    /// The payload could not be parsed as a verse document.
    #[error("malformed verse payload: {source}")]
    Malformed {
        /// The underlying JSON error.
        #[from]
        source: serde_json::Error,
    },
}
