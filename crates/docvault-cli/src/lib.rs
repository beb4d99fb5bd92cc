use std::path::Path;

use anyhow::{Context, Result};
use docvault_core::{Document, StorageProvider, UploadFile};

/// Initialize tracing for CLI binaries.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();
}

/// Read a local file into an upload payload plus a fresh metadata record.
pub fn load_upload(
    path: &Path,
    provider: StorageProvider,
    content_type: &str,
    description: Option<String>,
) -> Result<(UploadFile, Document)> {
    let data = std::fs::read(path).with_context(|| format!("Failed to read file: {}", path.display()))?;
    let file_name = path
        .file_name()
        .and_then(|n| n.to_str())
        .with_context(|| format!("Invalid file name: {}", path.display()))?
        .to_string();
    let file_type = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_uppercase())
        .unwrap_or_else(|| "OTHER".to_string());

    let mut document = Document::new(provider, file_name, file_type)
        .with_mime_type(content_type);
    document.file_size = Some(data.len() as i64);
    document.description = description;

    let file = UploadFile::new(data, content_type);
    Ok((file, document))
}

/// Metadata record for an already uploaded file.
pub fn existing_document(
    provider: StorageProvider,
    file_id: String,
    download_url: Option<String>,
) -> Document {
    let mut document = Document::new(provider, file_id.clone(), "OTHER");
    document.external_file_id = Some(file_id);
    document.download_url = download_url;
    document
}
