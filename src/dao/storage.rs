use std::error::Error;
use thiserror::Error;

/// Result alias for spreadsheet operations.
pub type StorageResult<T> = Result<T, StorageError>;

type Source = Box<dyn Error + Send + Sync>;

/// Why a spreadsheet backend could not serve a call, independent of the service behind it.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Credentials are missing, unreadable or refused. Retrying will not help until the
    /// configuration changes.
    #[error("spreadsheet access denied: {message}")]
    Credentials {
        message: String,
        #[source]
        source: Source,
    },
    /// The spreadsheet could not be reached or refused a read or write.
    #[error("spreadsheet unavailable: {message}")]
    Unavailable {
        message: String,
        #[source]
        source: Source,
    },
}

impl StorageError {
    /// Credential or token failure.
    pub fn credentials(message: String, source: impl Error + Send + Sync + 'static) -> Self {
        StorageError::Credentials {
            message,
            source: Box::new(source),
        }
    }

    /// Transport or API failure on a read or write.
    pub fn unavailable(message: String, source: impl Error + Send + Sync + 'static) -> Self {
        StorageError::Unavailable {
            message,
            source: Box::new(source),
        }
    }

    /// Whether the failure comes from configuration rather than the network.
    pub fn is_credentials(&self) -> bool {
        matches!(self, StorageError::Credentials { .. })
    }
}
