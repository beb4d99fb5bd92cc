use crate::credentials::OAuthCredentials;
use crate::http::{build_http_client, parse_json, unexpected_status};
use crate::naming::generate_stored_name;
use crate::traits::{require_file_id, CloudStorage, StorageError, StorageResult};
use async_trait::async_trait;
use bytes::Bytes;
use docvault_core::{CloudUploadResult, Document, GoogleDriveConfig, StorageProvider, UploadFile};
use reqwest::multipart::{Form, Part};
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde_json::json;
use std::time::{Duration, Instant};

const PROVIDER: &str = "googledrive";
const UPLOAD_FIELDS: &str = "id,name,webViewLink,webContentLink";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DriveFile {
    id: Option<String>,
    name: Option<String>,
    web_view_link: Option<String>,
    web_content_link: Option<String>,
}

/// Google Drive storage implementation (Drive API v3)
pub struct GoogleDriveStorage {
    http: Client,
    credentials: OAuthCredentials,
    api_base: String,
    upload_base: String,
    share_publicly: bool,
}

impl GoogleDriveStorage {
    /// Create a new GoogleDriveStorage instance
    pub fn new(config: &GoogleDriveConfig, timeout: Duration) -> StorageResult<Self> {
        let credentials = OAuthCredentials::new(
            PROVIDER,
            config.client_id.clone(),
            config.client_secret.clone(),
            config.token_url.clone(),
        )
        .with_tokens(config.access_token.clone(), config.refresh_token.clone());

        Ok(GoogleDriveStorage {
            http: build_http_client(timeout)?,
            credentials,
            api_base: config.api_base.trim_end_matches('/').to_string(),
            upload_base: config.upload_base.trim_end_matches('/').to_string(),
            share_publicly: config.share_publicly,
        })
    }

    pub fn credentials(&self) -> &OAuthCredentials {
        &self.credentials
    }

    fn file_url(&self, file_id: &str) -> String {
        format!("{}/files/{}", self.api_base, file_id)
    }

    fn media_url(&self, file_id: &str) -> String {
        format!("{}/files/{}?alt=media", self.api_base, file_id)
    }

    fn build_form(
        &self,
        file: &UploadFile,
        document: &Document,
        stored_name: &str,
    ) -> StorageResult<Form> {
        let metadata = json!({
            "name": stored_name,
            "description": document.description,
        });

        let metadata_part = Part::text(metadata.to_string())
            .mime_str("application/json")
            .map_err(|e| StorageError::UploadFailed(format!("Invalid metadata part: {}", e)))?;
        let file_part = Part::bytes(file.data.to_vec())
            .file_name(stored_name.to_string())
            .mime_str(&file.content_type)
            .map_err(|e| {
                StorageError::UploadFailed(format!(
                    "Invalid content type '{}': {}",
                    file.content_type, e
                ))
            })?;

        Ok(Form::new()
            .part("metadata", metadata_part)
            .part("file", file_part))
    }

    /// Grant "anyone with the link can view" in a detached task.
    ///
    /// The outcome is only logged; it never affects the upload result.
    fn share_in_background(&self, token: String, file_id: String) {
        let http = self.http.clone();
        let url = format!("{}/files/{}/permissions", self.api_base, file_id);

        tokio::spawn(async move {
            let permission = json!({ "role": "reader", "type": "anyone" });
            match http.post(&url).bearer_auth(&token).json(&permission).send().await {
                Ok(response) if response.status().is_success() => {
                    tracing::debug!(provider = PROVIDER, file_id = %file_id, "Google Drive file shared by link");
                }
                Ok(response) => {
                    tracing::warn!(
                        provider = PROVIDER,
                        file_id = %file_id,
                        status = response.status().as_u16(),
                        "Could not make Google Drive file public"
                    );
                }
                Err(e) => {
                    tracing::warn!(
                        provider = PROVIDER,
                        file_id = %file_id,
                        error = %e,
                        "Could not make Google Drive file public"
                    );
                }
            }
        });
    }
}

#[async_trait]
impl CloudStorage for GoogleDriveStorage {
    async fn upload(
        &self,
        file: &UploadFile,
        document: &Document,
    ) -> StorageResult<CloudUploadResult> {
        let token = self.credentials.access_token().await?;
        let stored_name = generate_stored_name(&document.file_name);
        let size = file.size();
        let start = Instant::now();

        let form = self.build_form(file, document, &stored_name)?;
        let response = self
            .http
            .post(format!("{}/files", self.upload_base))
            .query(&[("uploadType", "multipart"), ("fields", UPLOAD_FIELDS)])
            .bearer_auth(&token)
            .multipart(form)
            .send()
            .await
            .map_err(|e| {
                tracing::error!(provider = PROVIDER, error = %e, stored_name = %stored_name, "Google Drive upload failed");
                StorageError::from(e)
            })?;

        if response.status() != StatusCode::OK {
            let err = unexpected_status("Google Drive upload", response).await;
            tracing::error!(
                provider = PROVIDER,
                error = %err,
                stored_name = %stored_name,
                size_bytes = size,
                duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                "Google Drive upload failed"
            );
            return Err(err);
        }

        let uploaded: DriveFile = parse_json("Google Drive upload", response).await?;
        let file_id = uploaded
            .id
            .ok_or_else(|| StorageError::InvalidResponse("uploaded file has no id".to_string()))?;
        let view_url = uploaded.web_view_link.ok_or_else(|| {
            StorageError::InvalidResponse("uploaded file has no webViewLink".to_string())
        })?;
        let download_url = uploaded
            .web_content_link
            .filter(|url| !url.is_empty())
            .unwrap_or_else(|| self.media_url(&file_id));
        let name = uploaded.name.unwrap_or(stored_name);

        if self.share_publicly {
            self.share_in_background(token, file_id.clone());
        }

        tracing::info!(
            provider = PROVIDER,
            file_id = %file_id,
            stored_name = %name,
            size_bytes = size,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Google Drive upload successful"
        );

        Ok(CloudUploadResult::new(file_id, view_url, download_url, name))
    }

    async fn get_download_url(&self, document: &Document) -> StorageResult<String> {
        if let Some(cached) = document.cached_download_url() {
            return Ok(cached.to_string());
        }
        let file_id = require_file_id(document)?;
        Ok(self.media_url(file_id))
    }

    async fn delete(&self, document: &Document) -> StorageResult<bool> {
        let file_id = require_file_id(document)?;
        let token = self.credentials.access_token().await?;

        let response = self
            .http
            .delete(self.file_url(file_id))
            .bearer_auth(&token)
            .send()
            .await?;

        let deleted = response.status() == StatusCode::NO_CONTENT;
        tracing::info!(
            provider = PROVIDER,
            file_id = %file_id,
            status = response.status().as_u16(),
            deleted,
            "Google Drive delete finished"
        );
        Ok(deleted)
    }

    async fn download(&self, document: &Document) -> StorageResult<Bytes> {
        let url = self.get_download_url(document).await?;
        let start = Instant::now();

        let mut request = self.http.get(&url);
        if url.starts_with(&self.api_base) {
            request = request.bearer_auth(self.credentials.access_token().await?);
        }

        let response = request.send().await?;
        if response.status() != StatusCode::OK {
            let err = unexpected_status("Google Drive download", response).await;
            tracing::error!(provider = PROVIDER, document_id = %document.id, error = %err, "Google Drive download failed");
            return Err(err);
        }

        let bytes = response.bytes().await?;
        tracing::info!(
            provider = PROVIDER,
            document_id = %document.id,
            size_bytes = bytes.len(),
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Google Drive download successful"
        );
        Ok(bytes)
    }

    async fn exists(&self, document: &Document) -> StorageResult<bool> {
        let file_id = require_file_id(document)?;
        let token = self.credentials.access_token().await?;

        let response = self
            .http
            .get(self.file_url(file_id))
            .bearer_auth(&token)
            .send()
            .await?;

        Ok(response.status() == StatusCode::OK)
    }

    async fn refresh_access_token(&self) -> StorageResult<String> {
        self.credentials.refresh(&self.http).await
    }

    fn provider(&self) -> StorageProvider {
        StorageProvider::GoogleDrive
    }
}
