use crate::credentials::OAuthCredentials;
use crate::http::{build_http_client, parse_json, unexpected_status};
use crate::naming::generate_stored_name;
use crate::session::UploadSession;
use crate::traits::{require_file_id, CloudStorage, StorageError, StorageResult};
use async_trait::async_trait;
use bytes::Bytes;
use docvault_core::constants::{SIMPLE_UPLOAD_LIMIT_BYTES, UPLOAD_CHUNK_SIZE_BYTES};
use docvault_core::{CloudUploadResult, Document, OneDriveConfig, StorageProvider, UploadFile};
use reqwest::header::{CONTENT_RANGE, CONTENT_TYPE};
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde_json::json;
use std::time::{Duration, Instant};

const PROVIDER: &str = "onedrive";
const TOKEN_SCOPE: &str = "offline_access Files.ReadWrite.All";

/// Drive item fields returned by Graph after an upload completes.
#[derive(Debug, Deserialize)]
struct DriveItem {
    id: Option<String>,
    #[serde(rename = "webUrl")]
    web_url: Option<String>,
    #[serde(rename = "@microsoft.graph.downloadUrl")]
    download_url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct UploadSessionResponse {
    #[serde(rename = "uploadUrl")]
    upload_url: String,
}

/// OneDrive storage implementation (Microsoft Graph)
pub struct OneDriveStorage {
    http: Client,
    credentials: OAuthCredentials,
    api_base: String,
}

impl OneDriveStorage {
    /// Create a new OneDriveStorage instance
    ///
    /// Missing credentials are accepted here and reported by the first call
    /// that needs them.
    pub fn new(config: &OneDriveConfig, timeout: Duration) -> StorageResult<Self> {
        let credentials = OAuthCredentials::new(
            PROVIDER,
            config.client_id.clone(),
            config.client_secret.clone(),
            config.token_url.clone(),
        )
        .with_tokens(config.access_token.clone(), config.refresh_token.clone())
        .with_scope(TOKEN_SCOPE);

        Ok(OneDriveStorage {
            http: build_http_client(timeout)?,
            credentials,
            api_base: config.api_base.trim_end_matches('/').to_string(),
        })
    }

    pub fn credentials(&self) -> &OAuthCredentials {
        &self.credentials
    }

    fn simple_upload_url(&self, stored_name: &str) -> String {
        format!(
            "{}/me/drive/root:/{}:/content",
            self.api_base,
            urlencoding::encode(stored_name)
        )
    }

    fn upload_session_url(&self, stored_name: &str) -> String {
        format!(
            "{}/me/drive/root:/{}:/createUploadSession",
            self.api_base,
            urlencoding::encode(stored_name)
        )
    }

    fn item_url(&self, file_id: &str) -> String {
        format!("{}/me/drive/items/{}", self.api_base, file_id)
    }

    fn content_url(&self, file_id: &str) -> String {
        format!("{}/me/drive/items/{}/content", self.api_base, file_id)
    }

    fn upload_result(&self, item: DriveItem, stored_name: &str) -> StorageResult<CloudUploadResult> {
        let file_id = item
            .id
            .ok_or_else(|| StorageError::InvalidResponse("drive item has no id".to_string()))?;
        let web_url = item
            .web_url
            .ok_or_else(|| StorageError::InvalidResponse("drive item has no webUrl".to_string()))?;
        let download_url = item
            .download_url
            .filter(|url| !url.is_empty())
            .unwrap_or_else(|| self.content_url(&file_id));

        Ok(CloudUploadResult::new(file_id, web_url, download_url, stored_name))
    }

    async fn simple_upload(
        &self,
        token: &str,
        file: &UploadFile,
        stored_name: &str,
    ) -> StorageResult<CloudUploadResult> {
        let response = self
            .http
            .put(self.simple_upload_url(stored_name))
            .bearer_auth(token)
            .header(CONTENT_TYPE, file.content_type.as_str())
            .body(file.data.clone())
            .send()
            .await?;

        match response.status() {
            StatusCode::OK | StatusCode::CREATED => {
                let item: DriveItem = parse_json("OneDrive upload", response).await?;
                self.upload_result(item, stored_name)
            }
            _ => Err(unexpected_status("OneDrive upload", response).await),
        }
    }

    async fn create_upload_session(
        &self,
        token: &str,
        stored_name: &str,
        total_size: u64,
    ) -> StorageResult<UploadSession> {
        let body = json!({
            "item": {
                "@microsoft.graph.conflictBehavior": "rename"
            }
        });

        let response = self
            .http
            .post(self.upload_session_url(stored_name))
            .bearer_auth(token)
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(unexpected_status("OneDrive createUploadSession", response).await);
        }

        let created: UploadSessionResponse =
            parse_json("OneDrive createUploadSession", response).await?;

        Ok(UploadSession::new(created.upload_url, total_size))
    }

    /// Send every chunk in order; only the terminal response carries the item.
    ///
    /// The pre-authenticated session URL must not receive the bearer token.
    async fn send_chunks(&self, session: &mut UploadSession, data: &Bytes) -> StorageResult<DriveItem> {
        while let Some(range) = session.next_range(UPLOAD_CHUNK_SIZE_BYTES) {
            let content_range = session.content_range(&range);
            let is_final = session.is_final_range(&range);

            let response = self
                .http
                .put(&session.upload_url)
                .header(CONTENT_RANGE, content_range.as_str())
                .header(CONTENT_TYPE, "application/octet-stream")
                .body(data.slice(range.clone()))
                .send()
                .await?;

            let status = response.status();
            tracing::debug!(
                provider = PROVIDER,
                content_range = %content_range,
                status = status.as_u16(),
                "Upload chunk sent"
            );

            if is_final {
                return match status {
                    StatusCode::OK | StatusCode::CREATED => {
                        session.advance(&range);
                        parse_json("OneDrive final chunk", response).await
                    }
                    _ => Err(unexpected_status("OneDrive final chunk", response).await),
                };
            }

            if status != StatusCode::ACCEPTED {
                return Err(unexpected_status("OneDrive chunk", response).await);
            }
            session.advance(&range);
        }

        Err(StorageError::UploadSession(
            "session ended without a terminal response".to_string(),
        ))
    }

    /// Ask Graph to discard a failed session. Best effort.
    async fn cancel_upload_session(&self, session: &UploadSession) {
        match self.http.delete(&session.upload_url).send().await {
            Ok(response) if response.status().is_success() => {
                tracing::debug!(provider = PROVIDER, "Upload session cancelled");
            }
            Ok(response) => {
                tracing::warn!(
                    provider = PROVIDER,
                    status = response.status().as_u16(),
                    "Could not cancel upload session"
                );
            }
            Err(e) => {
                tracing::warn!(provider = PROVIDER, error = %e, "Could not cancel upload session");
            }
        }
    }

    async fn session_upload(
        &self,
        token: &str,
        file: &UploadFile,
        stored_name: &str,
    ) -> StorageResult<CloudUploadResult> {
        let mut session = self
            .create_upload_session(token, stored_name, file.size() as u64)
            .await?;

        match self.send_chunks(&mut session, &file.data).await {
            Ok(item) => self.upload_result(item, stored_name),
            Err(e) => {
                tracing::error!(
                    provider = PROVIDER,
                    error = %e,
                    bytes_sent = session.bytes_sent,
                    total_size = session.total_size,
                    "Upload session aborted"
                );
                self.cancel_upload_session(&session).await;
                Err(match e {
                    StorageError::UploadSession(_) => e,
                    other => StorageError::UploadSession(other.to_string()),
                })
            }
        }
    }
}

#[async_trait]
impl CloudStorage for OneDriveStorage {
    async fn upload(
        &self,
        file: &UploadFile,
        document: &Document,
    ) -> StorageResult<CloudUploadResult> {
        let token = self.credentials.access_token().await?;
        let stored_name = generate_stored_name(&document.file_name);
        let size = file.size();
        let start = Instant::now();

        let result = if size < SIMPLE_UPLOAD_LIMIT_BYTES {
            self.simple_upload(&token, file, &stored_name).await
        } else {
            self.session_upload(&token, file, &stored_name).await
        };

        match &result {
            Ok(uploaded) => tracing::info!(
                provider = PROVIDER,
                file_id = %uploaded.provider_file_id(),
                stored_name = %stored_name,
                size_bytes = size,
                chunked = size >= SIMPLE_UPLOAD_LIMIT_BYTES,
                duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                "OneDrive upload successful"
            ),
            Err(e) => tracing::error!(
                provider = PROVIDER,
                error = %e,
                stored_name = %stored_name,
                size_bytes = size,
                duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                "OneDrive upload failed"
            ),
        }

        result
    }

    async fn get_download_url(&self, document: &Document) -> StorageResult<String> {
        if let Some(cached) = document.cached_download_url() {
            return Ok(cached.to_string());
        }
        let file_id = require_file_id(document)?;
        Ok(self.content_url(file_id))
    }

    async fn delete(&self, document: &Document) -> StorageResult<bool> {
        let file_id = require_file_id(document)?;
        let token = self.credentials.access_token().await?;

        let response = self
            .http
            .delete(self.item_url(file_id))
            .bearer_auth(&token)
            .send()
            .await?;

        let deleted = response.status() == StatusCode::NO_CONTENT;
        tracing::info!(
            provider = PROVIDER,
            file_id = %file_id,
            status = response.status().as_u16(),
            deleted,
            "OneDrive delete finished"
        );
        Ok(deleted)
    }

    async fn download(&self, document: &Document) -> StorageResult<Bytes> {
        let url = self.get_download_url(document).await?;
        let start = Instant::now();

        let mut request = self.http.get(&url);
        // Graph-hosted links need the token; pre-signed links must not get it.
        if url.starts_with(&self.api_base) {
            request = request.bearer_auth(self.credentials.access_token().await?);
        }

        let response = request.send().await?;
        if response.status() != StatusCode::OK {
            let err = unexpected_status("OneDrive download", response).await;
            tracing::error!(provider = PROVIDER, document_id = %document.id, error = %err, "OneDrive download failed");
            return Err(err);
        }

        let bytes = response.bytes().await?;
        tracing::info!(
            provider = PROVIDER,
            document_id = %document.id,
            size_bytes = bytes.len(),
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "OneDrive download successful"
        );
        Ok(bytes)
    }

    async fn exists(&self, document: &Document) -> StorageResult<bool> {
        let file_id = require_file_id(document)?;
        let token = self.credentials.access_token().await?;

        let response = self
            .http
            .get(self.item_url(file_id))
            .bearer_auth(&token)
            .send()
            .await?;

        Ok(response.status() == StatusCode::OK)
    }

    async fn refresh_access_token(&self) -> StorageResult<String> {
        self.credentials.refresh(&self.http).await
    }

    fn provider(&self) -> StorageProvider {
        StorageProvider::OneDrive
    }
}
