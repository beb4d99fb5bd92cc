//! Provider-agnostic entry point for document storage.
//!
//! Every call is dispatched on the document's provider tag. Upload and
//! download propagate failures; delete and exists fold every failure into
//! `false` so callers can treat them as advisory.

use std::collections::HashMap;
use std::sync::Arc;

use bytes::Bytes;
use docvault_core::{CloudUploadResult, Document, StorageProvider, UploadFile};

use crate::traits::{CloudStorage, StorageError, StorageResult};

/// Registry of provider clients keyed by provider tag.
#[derive(Clone, Default)]
pub struct DocumentStorage {
    providers: HashMap<StorageProvider, Arc<dyn CloudStorage>>,
}

impl DocumentStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a client under the tag it reports; replaces any previous one.
    pub fn register(&mut self, storage: Arc<dyn CloudStorage>) {
        self.providers.insert(storage.provider(), storage);
    }

    pub fn with_provider(mut self, storage: Arc<dyn CloudStorage>) -> Self {
        self.register(storage);
        self
    }

    /// Registered provider tags
    pub fn providers(&self) -> Vec<StorageProvider> {
        let mut tags: Vec<_> = self.providers.keys().copied().collect();
        tags.sort_by_key(|tag| tag.to_string());
        tags
    }

    /// Client for a tag; unregistered tags (e.g. `Local`) fail fast.
    pub fn client(&self, provider: StorageProvider) -> StorageResult<Arc<dyn CloudStorage>> {
        self.providers
            .get(&provider)
            .cloned()
            .ok_or(StorageError::UnsupportedProvider(provider))
    }

    pub async fn upload(
        &self,
        file: &UploadFile,
        document: &Document,
    ) -> StorageResult<CloudUploadResult> {
        let client = self.client(document.storage_provider)?;
        tracing::info!(
            provider = %document.storage_provider,
            document_id = %document.id,
            size_bytes = file.size(),
            "Uploading document"
        );
        client.upload(file, document).await
    }

    /// Cached link without any provider call, otherwise the provider's link.
    ///
    /// The tag is resolved first so unsupported providers fail even when a
    /// link is cached.
    pub async fn get_download_url(&self, document: &Document) -> StorageResult<String> {
        let client = self.client(document.storage_provider)?;
        if let Some(cached) = document.cached_download_url() {
            return Ok(cached.to_string());
        }
        client.get_download_url(document).await
    }

    pub async fn download(&self, document: &Document) -> StorageResult<Bytes> {
        self.client(document.storage_provider)?
            .download(document)
            .await
    }

    /// `true` only if the provider confirmed the deletion.
    pub async fn delete(&self, document: &Document) -> bool {
        let result = match self.client(document.storage_provider) {
            Ok(client) => client.delete(document).await,
            Err(e) => Err(e),
        };

        match result {
            Ok(deleted) => deleted,
            Err(e) => {
                tracing::error!(
                    provider = %document.storage_provider,
                    document_id = %document.id,
                    error = %e,
                    "Error deleting file"
                );
                false
            }
        }
    }

    /// `true` only if the provider confirmed the file is present.
    pub async fn exists(&self, document: &Document) -> bool {
        let result = match self.client(document.storage_provider) {
            Ok(client) => client.exists(document).await,
            Err(e) => Err(e),
        };

        match result {
            Ok(found) => found,
            Err(e) => {
                tracing::warn!(
                    provider = %document.storage_provider,
                    document_id = %document.id,
                    error = %e,
                    "Error checking file existence"
                );
                false
            }
        }
    }

    /// Refresh one provider's access token and return the new one.
    ///
    /// Never triggered automatically.
    pub async fn refresh_access_token(&self, provider: StorageProvider) -> StorageResult<String> {
        self.client(provider)?.refresh_access_token().await
    }
}
