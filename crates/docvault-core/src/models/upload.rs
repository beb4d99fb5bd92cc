use bytes::Bytes;
use serde::{Deserialize, Serialize};

/// File payload handed to the storage layer for upload.
#[derive(Debug, Clone)]
pub struct UploadFile {
    pub data: Bytes,
    pub content_type: String,
}

impl UploadFile {
    pub fn new(data: impl Into<Bytes>, content_type: impl Into<String>) -> Self {
        Self {
            data: data.into(),
            content_type: content_type.into(),
        }
    }

    pub fn size(&self) -> usize {
        self.data.len()
    }
}

/// Provider-agnostic result of a successful upload.
///
/// Built once by a provider client and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CloudUploadResult {
    provider_file_id: String,
    view_url: String,
    download_url: String,
    stored_name: String,
}

impl CloudUploadResult {
    pub fn new(
        provider_file_id: impl Into<String>,
        view_url: impl Into<String>,
        download_url: impl Into<String>,
        stored_name: impl Into<String>,
    ) -> Self {
        Self {
            provider_file_id: provider_file_id.into(),
            view_url: view_url.into(),
            download_url: download_url.into(),
            stored_name: stored_name.into(),
        }
    }

    pub fn provider_file_id(&self) -> &str {
        &self.provider_file_id
    }

    pub fn view_url(&self) -> &str {
        &self.view_url
    }

    pub fn download_url(&self) -> &str {
        &self.download_url
    }

    pub fn stored_name(&self) -> &str {
        &self.stored_name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upload_file_reports_payload_size() {
        let file = UploadFile::new(vec![0u8; 1024], "text/plain");
        assert_eq!(file.size(), 1024);
        assert_eq!(file.content_type, "text/plain");
    }

    #[test]
    fn upload_result_serializes_with_snake_case_fields() {
        let result = CloudUploadResult::new("id-1", "view", "download", "a_1.txt");
        let value = serde_json::to_value(&result).unwrap();
        assert_eq!(value["provider_file_id"], "id-1");
        assert_eq!(value["view_url"], "view");
        assert_eq!(value["download_url"], "download");
        assert_eq!(value["stored_name"], "a_1.txt");
    }
}
