//! Docvault Core Library
//!
//! This crate provides the domain types shared by the document storage
//! components: the provider tag, the document metadata record, upload
//! inputs and results, and configuration loaded from the environment.

pub mod config;
pub mod constants;
pub mod models;
pub mod storage_types;

// Re-export commonly used types
pub use config::{GoogleDriveConfig, OneDriveConfig, StorageConfig};
pub use models::{CloudUploadResult, Document, UploadFile};
pub use storage_types::StorageProvider;
