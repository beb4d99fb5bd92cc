//! Docvault Storage Library
//!
//! Uploads, downloads, existence checks and deletes documents against remote
//! cloud drives behind one provider-agnostic interface.
//!
//! # Providers
//!
//! - **OneDrive** (Graph API): single PUT below 4 MiB, otherwise an upload
//!   session fed with 320 KiB chunks in strict byte order.
//! - **Google Drive**: single multipart POST, followed by a background
//!   request that makes the file viewable by link.
//!
//! Callers go through [`DocumentStorage`], which picks the client from the
//! document's provider tag. Stored names are timestamp-qualified by the
//! `naming` module so every provider derives them the same way.

pub mod credentials;
pub mod factory;
#[cfg(feature = "storage-googledrive")]
pub mod google_drive;
pub(crate) mod http;
pub mod naming;
#[cfg(feature = "storage-onedrive")]
pub mod onedrive;
pub mod router;
#[cfg(feature = "storage-onedrive")]
pub mod session;
pub mod traits;

// Re-export commonly used types
pub use credentials::OAuthCredentials;
pub use docvault_core::{CloudUploadResult, Document, StorageProvider, UploadFile};
pub use factory::create_document_storage;
#[cfg(feature = "storage-googledrive")]
pub use google_drive::GoogleDriveStorage;
#[cfg(feature = "storage-onedrive")]
pub use onedrive::OneDriveStorage;
pub use router::DocumentStorage;
#[cfg(feature = "storage-onedrive")]
pub use session::UploadSession;
pub use traits::{CloudStorage, StorageError, StorageResult};
