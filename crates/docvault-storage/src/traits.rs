//! Storage abstraction trait
//!
//! This module defines the CloudStorage trait that every provider client implements.

use async_trait::async_trait;
use bytes::Bytes;
use docvault_core::{CloudUploadResult, Document, StorageProvider, UploadFile};
use thiserror::Error;

/// Storage operation errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Upload failed: {0}")]
    UploadFailed(String),

    #[error("Upload session failed: {0}")]
    UploadSession(String),

    #[error("Document {0} has no external file id")]
    MissingFileId(String),

    #[error("Storage provider '{0}' is not implemented")]
    UnsupportedProvider(StorageProvider),

    #[error("{operation} returned status {status}: {body}")]
    UnexpectedStatus {
        operation: &'static str,
        status: u16,
        body: String,
    },

    #[error("Invalid provider response: {0}")]
    InvalidResponse(String),

    #[error("Token refresh failed: {0}")]
    TokenRefresh(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Capability set of a remote storage provider.
///
/// Implementations report raw outcomes: `delete` and `exists` return
/// `Ok(false)` for a non-success status and `Err` for transport or
/// configuration failures. Folding errors into booleans is left to
/// [`crate::DocumentStorage`].
#[async_trait]
pub trait CloudStorage: Send + Sync {
    /// Upload a file under a timestamp-qualified name derived from `document.file_name`.
    async fn upload(
        &self,
        file: &UploadFile,
        document: &Document,
    ) -> StorageResult<CloudUploadResult>;

    /// Cached download link if the record has one, otherwise a link built
    /// from the provider file id. Never touches the network.
    async fn get_download_url(&self, document: &Document) -> StorageResult<String>;

    /// `Ok(true)` only when the provider answers "no content".
    async fn delete(&self, document: &Document) -> StorageResult<bool>;

    async fn download(&self, document: &Document) -> StorageResult<Bytes>;

    /// `Ok(true)` only when the provider answers 200.
    async fn exists(&self, document: &Document) -> StorageResult<bool>;

    /// Exchange the refresh token for a new access token and return it.
    ///
    /// Requests already in flight keep the token they captured.
    async fn refresh_access_token(&self) -> StorageResult<String>;

    /// Provider tag this client serves
    fn provider(&self) -> StorageProvider;
}

/// External file id of an uploaded document.
pub(crate) fn require_file_id(document: &Document) -> StorageResult<&str> {
    document
        .external_file_id()
        .ok_or_else(|| StorageError::MissingFileId(document.id.to_string()))
}
