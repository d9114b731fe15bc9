use thiserror::Error;

/// Failures returned by [`NoteStore`](crate::services::note_service::NoteStore)
/// operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NoteError {
    /// Malformed text, position or lifetime.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("User not found")]
    UnknownUser,

    /// The user exists but no note survived the expiry sweep.
    #[error("User has no notes")]
    EmptyLedger,

    /// The requested position is past the end of the ledger.
    #[error("Note not found")]
    NotFound,
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("config.json not found in:\n  {0}\n  {1}\nCopy config.json to one of these paths.")]
    Missing(String, String),
}
