//! Docvault CLI — exercise the document storage providers from a shell.
//!
//! Provider credentials come from the environment (see `StorageConfig`).

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use docvault_cli::{existing_document, init_tracing, load_upload};
use docvault_core::{StorageConfig, StorageProvider};
use docvault_storage::create_document_storage;
use serde::Serialize;

#[derive(Parser)]
#[command(name = "docvault", about = "Document storage CLI")]
struct Cli {
    /// Provider tag: onedrive, googledrive (defaults to DEFAULT_STORAGE_PROVIDER)
    #[arg(long, global = true)]
    provider: Option<StorageProvider>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct FileRef {
    /// Provider file id returned by a previous upload
    file_id: String,
    /// Cached download URL, if known
    #[arg(long)]
    download_url: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Upload a local file
    Upload {
        /// Path to the file to upload
        file: std::path::PathBuf,
        /// MIME type sent to the provider
        #[arg(long, default_value = "application/octet-stream")]
        content_type: String,
        /// Description stored with the file
        #[arg(long)]
        description: Option<String>,
    },
    /// Print a download URL
    Url(FileRef),
    /// Download a file
    Download {
        #[command(flatten)]
        file: FileRef,
        /// Where to write the bytes
        #[arg(long, short)]
        output: std::path::PathBuf,
    },
    /// Delete a file
    Delete(FileRef),
    /// Check whether a file exists
    Exists(FileRef),
    /// Exchange the refresh token for a new access token and print it
    ///
    /// The token is not persisted; export it as the provider's ACCESS_TOKEN.
    RefreshToken,
}

#[derive(Serialize)]
struct TokenOutput {
    provider: StorageProvider,
    access_token: String,
}

#[derive(Serialize)]
struct BoolOutput {
    file_id: String,
    result: bool,
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let config = StorageConfig::from_env().context("Failed to load storage configuration")?;
    let provider = cli.provider.unwrap_or(config.default_provider);
    let storage = create_document_storage(&config).context("Failed to initialize storage")?;

    match cli.command {
        Commands::Upload {
            file,
            content_type,
            description,
        } => {
            let (upload, mut document) = load_upload(&file, provider, &content_type, description)?;
            let result = storage
                .upload(&upload, &document)
                .await
                .with_context(|| format!("Upload to {} failed", provider))?;
            document.apply_upload_result(&result);
            print_json(&document)?;
        }
        Commands::Url(file) => {
            let document = existing_document(provider, file.file_id, file.download_url);
            let url = storage.get_download_url(&document).await?;
            println!("{}", url);
        }
        Commands::Download { file, output } => {
            let document = existing_document(provider, file.file_id, file.download_url);
            let bytes = storage
                .download(&document)
                .await
                .with_context(|| format!("Download from {} failed", provider))?;
            std::fs::write(&output, &bytes)
                .with_context(|| format!("Failed to write {}", output.display()))?;
            tracing::info!(path = %output.display(), size_bytes = bytes.len(), "File written");
        }
        Commands::Delete(file) => {
            let document = existing_document(provider, file.file_id.clone(), None);
            let result = storage.delete(&document).await;
            print_json(&BoolOutput {
                file_id: file.file_id,
                result,
            })?;
        }
        Commands::Exists(file) => {
            let document = existing_document(provider, file.file_id.clone(), None);
            let result = storage.exists(&document).await;
            print_json(&BoolOutput {
                file_id: file.file_id,
                result,
            })?;
        }
        Commands::RefreshToken => {
            let access_token = storage
                .refresh_access_token(provider)
                .await
                .with_context(|| format!("Token refresh for {} failed", provider))?;
            print_json(&TokenOutput {
                provider,
                access_token,
            })?;
        }
    }

    Ok(())
}
