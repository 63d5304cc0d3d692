use std::time::Duration;

use crate::db::StoreError;

/// Application-level errors
#[derive(thiserror::Error, Debug)]
pub enum AppError {
    #[error("Configuration missing: {0}")]
    ConfigurationMissing(String),

    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),

    #[error("Catalog error: {0}")]
    Catalog(String),

    #[error("Catalog call timed out after {0:?}")]
    CatalogTimeout(Duration),

    #[error("Cache store error: {0}")]
    Store(#[from] StoreError),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Whether this error came from talking to the external movie catalog
    ///
    /// Catalog failures are recoverable at the resolver boundary: the caller
    /// swaps in the static fallback table instead of surfacing the error.
    pub fn is_catalog_failure(&self) -> bool {
        matches!(
            self,
            AppError::HttpClient(_) | AppError::Catalog(_) | AppError::CatalogTimeout(_)
        )
    }
}

pub type AppResult<T> = Result<T, AppError>;
