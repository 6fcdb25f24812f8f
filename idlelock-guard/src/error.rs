//! Error types for the process guard.

use std::path::PathBuf;

/// Error type for guard operations.
///
/// Missing records and dead pids are not errors; they are reconciled
/// in place. Only the two conditions below reach the caller.
#[derive(Debug, thiserror::Error)]
pub enum GuardError {
    /// The managed process could not be spawned.
    #[error("failed to launch {program}: {source}")]
    Launch {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// The pid record could not be written after a successful spawn.
    #[error("failed to write pid record {}: {source}", path.display())]
    Record {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Result type alias for guard operations.
pub type Result<T> = std::result::Result<T, GuardError>;
