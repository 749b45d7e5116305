//! Engine Error Types

use thiserror::Error;

use stridelock_core::EconomyError;

/// Engine Result type
pub type EngineResult<T> = Result<T, EngineError>;

/// Engine error
#[derive(Debug, Error)]
pub enum EngineError {
    /// Economy rule refused the operation
    #[error("Economy error: {0}")]
    Economy(EconomyError),

    /// Storage backend error
    #[error("Storage error: {0}")]
    Storage(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl EngineError {
    /// Create a storage error
    pub fn storage(reason: impl Into<String>) -> Self {
        Self::Storage(reason.into())
    }

    /// Check whether retrying or ordinary user action can succeed
    pub fn is_recoverable(&self) -> bool {
        match self {
            EngineError::Economy(err) => err.is_recoverable(),
            EngineError::Storage(_) => true,
            EngineError::Serialization(_) => false,
        }
    }
}

impl From<EconomyError> for EngineError {
    fn from(err: EconomyError) -> Self {
        EngineError::Economy(err)
    }
}

impl From<serde_json::Error> for EngineError {
    fn from(err: serde_json::Error) -> Self {
        EngineError::Serialization(err.to_string())
    }
}

impl From<std::io::Error> for EngineError {
    fn from(err: std::io::Error) -> Self {
        EngineError::Storage(err.to_string())
    }
}
