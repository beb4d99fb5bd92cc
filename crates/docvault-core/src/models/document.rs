use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::upload::CloudUploadResult;
use crate::storage_types::StorageProvider;

/// Document metadata record as seen by the storage layer.
///
/// The persistence layer owns this record. `external_file_id`, `external_url`
/// and `download_url` stay `None` until an upload succeeds; after that they
/// are the only handle used for download, delete and existence checks.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub file_name: String,
    pub file_type: String,
    pub file_size: Option<i64>,
    pub mime_type: Option<String>,
    pub storage_provider: StorageProvider,
    pub external_file_id: Option<String>,
    pub external_url: Option<String>,
    pub download_url: Option<String>,
    pub uploaded_at: Option<DateTime<Utc>>,
}

impl Document {
    /// New, not yet uploaded record.
    pub fn new(
        storage_provider: StorageProvider,
        file_name: impl Into<String>,
        file_type: impl Into<String>,
    ) -> Self {
        let file_name = file_name.into();
        Self {
            id: Uuid::new_v4(),
            title: file_name.clone(),
            description: None,
            file_name,
            file_type: file_type.into(),
            file_size: None,
            mime_type: None,
            storage_provider,
            external_file_id: None,
            external_url: None,
            download_url: None,
            uploaded_at: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_mime_type(mut self, mime_type: impl Into<String>) -> Self {
        self.mime_type = Some(mime_type.into());
        self
    }

    /// Cached download link, ignoring empty strings.
    pub fn cached_download_url(&self) -> Option<&str> {
        self.download_url.as_deref().filter(|url| !url.is_empty())
    }

    /// Provider file id, ignoring empty strings.
    pub fn external_file_id(&self) -> Option<&str> {
        self.external_file_id.as_deref().filter(|id| !id.is_empty())
    }

    pub fn is_uploaded(&self) -> bool {
        self.external_file_id().is_some()
    }

    /// Copy the identifiers returned by a successful upload onto this record.
    ///
    /// The caller is responsible for persisting the record afterwards.
    pub fn apply_upload_result(&mut self, result: &CloudUploadResult) {
        self.external_file_id = Some(result.provider_file_id().to_string());
        self.external_url = Some(result.view_url().to_string());
        self.download_url = Some(result.download_url().to_string());
        self.uploaded_at = Some(Utc::now());
    }
}
