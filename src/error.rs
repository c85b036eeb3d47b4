use thiserror::Error;

/// Unified error type for release-gate operations
#[derive(Error, Debug)]
pub enum ReleaseGateError {
    /// The environment cannot support a release at all: no repository, no git
    /// binary, or unusable configuration. No version can even be computed.
    #[error("Environment error: {0}")]
    Environment(String),

    /// A precondition gate refused the release. Carries the exit code
    /// reserved for that gate.
    #[error("{message}")]
    Blocked { code: i32, message: String },

    /// The packaging collaborator failed with the given exit status.
    #[error("Packaging failed (status {status}): {message}")]
    Package { status: i32, message: String },

    /// The publication collaborator failed with the given exit status.
    #[error("Publish failed (status {status}): {message}")]
    Publish { status: i32, message: String },

    /// Pushing the tag or branch failed. Only raised after publication, so
    /// the remedy is a manual push, never a republish.
    #[error("could not sync with remote: {0}")]
    Sync(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience type alias for Results in release-gate
pub type Result<T> = std::result::Result<T, ReleaseGateError>;

impl ReleaseGateError {
    /// Create an environment error with context
    pub fn environment(msg: impl Into<String>) -> Self {
        ReleaseGateError::Environment(msg.into())
    }

    /// Create a precondition failure carrying its reserved exit code
    pub fn blocked(code: i32, msg: impl Into<String>) -> Self {
        ReleaseGateError::Blocked {
            code,
            message: msg.into(),
        }
    }

    /// Create a packaging failure with the collaborator's exit status
    pub fn package_failed(status: i32, msg: impl Into<String>) -> Self {
        ReleaseGateError::Package {
            status,
            message: msg.into(),
        }
    }

    /// Create a publication failure with the collaborator's exit status
    pub fn publish_failed(status: i32, msg: impl Into<String>) -> Self {
        ReleaseGateError::Publish {
            status,
            message: msg.into(),
        }
    }

    /// Create a tag/branch sync failure
    pub fn sync(msg: impl Into<String>) -> Self {
        ReleaseGateError::Sync(msg.into())
    }

    /// Process exit status for this failure.
    ///
    /// Precondition failures carry their own reserved code (10-14), sync
    /// failures exit 15, environment failures exit 2, and collaborator
    /// failures propagate whatever status the external command raised.
    pub fn exit_code(&self) -> i32 {
        match self {
            ReleaseGateError::Environment(_) => 2,
            ReleaseGateError::Blocked { code, .. } => *code,
            ReleaseGateError::Package { status, .. }
            | ReleaseGateError::Publish { status, .. } => {
                if *status > 0 {
                    *status
                } else {
                    1
                }
            }
            ReleaseGateError::Sync(_) => 15,
            ReleaseGateError::Io(_) => 1,
        }
    }
}
