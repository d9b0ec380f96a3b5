use std::io;
use std::path::PathBuf;

/// Errors that abort a goss invocation before a report can be produced.
#[derive(Debug, thiserror::Error)]
pub enum RunError {
    /// A precondition on the module parameters or the filesystem was violated.
    #[error("{0}")]
    Configuration(String),

    /// The executable could not be started.
    #[error("failed to run {executable}: {source}")]
    Spawn {
        executable: String,
        #[source]
        source: io::Error,
    },

    /// The captured output could not be written.
    #[error("failed to write {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Reading the child process output failed.
    #[error("failed to collect output of {executable}: {message}")]
    Capture { executable: String, message: String },
}

impl RunError {
    pub fn configuration(msg: impl Into<String>) -> Self {
        RunError::Configuration(msg.into())
    }
}

/// Result type alias for runner operations
pub type Result<T> = std::result::Result<T, RunError>;
