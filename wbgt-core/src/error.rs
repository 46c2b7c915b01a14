//! Error types for the wbgt ecosystem.

use thiserror::Error;

/// Errors that can occur in wbgt operations.
#[derive(Error, Debug)]
pub enum WbgtError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Remote store error: {0}")]
    Remote(String),

    #[error("Provider '{0}' not found in PATH")]
    ProviderNotInstalled(String),

    #[error("Provider request timed out after {0}s")]
    ProviderTimeout(u64),

    #[error("No remote configured")]
    NoRemoteConfigured,

    #[error("Local cache error: {0}")]
    Cache(String),

    #[error("Record '{0}' is already synced and cannot be edited while offline")]
    SyncedRecordOffline(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl WbgtError {
    /// Whether the error came from talking to the remote store.
    pub fn is_remote(&self) -> bool {
        matches!(
            self,
            WbgtError::Remote(_)
                | WbgtError::ProviderTimeout(_)
                | WbgtError::ProviderNotInstalled(_)
                | WbgtError::NoRemoteConfigured
        )
    }
}

impl From<serde_json::Error> for WbgtError {
    fn from(err: serde_json::Error) -> Self {
        WbgtError::Serialization(err.to_string())
    }
}

/// Result type alias for wbgt operations.
pub type WbgtResult<T> = Result<T, WbgtError>;
