use std::path::PathBuf;

/// Failure of a call to the remote engine.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EngineError {
    /// The request could not complete (connect, timeout, body read).
    #[error("transport error: {message}")]
    Transport { message: String },
    /// The engine answered with a non-success status.
    #[error("engine returned status {status}: {message}")]
    Status { status: u16, message: String },
    /// The engine answered 2xx but the body did not match the contract.
    #[error("invalid engine response: {message}")]
    Decode { message: String },
}

impl EngineError {
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
        }
    }

    pub fn status(status: u16, message: impl Into<String>) -> Self {
        Self::Status {
            status,
            message: message.into(),
        }
    }

    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        match self {
            Self::Transport { message }
            | Self::Status { message, .. }
            | Self::Decode { message } => message,
        }
    }

    /// HTTP status, when the engine answered at all.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Failure of the persistence adapter.
#[derive(Debug, thiserror::Error)]
pub enum PersistError {
    #[error("failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("corrupt persisted workflow: {0}")]
    Serde(#[from] serde_json::Error),
}

/// Failure to import a workflow document. State is left unchanged.
#[derive(Debug, thiserror::Error)]
pub enum ImportError {
    #[error("invalid workflow file: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Failure to write an exported workflow document.
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("failed to serialize workflow: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
