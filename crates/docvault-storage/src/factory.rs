#[cfg(feature = "storage-googledrive")]
use crate::GoogleDriveStorage;
#[cfg(feature = "storage-onedrive")]
use crate::OneDriveStorage;
use crate::{DocumentStorage, StorageResult};
use docvault_core::StorageConfig;
#[cfg(any(feature = "storage-onedrive", feature = "storage-googledrive"))]
use std::sync::Arc;
use std::time::Duration;

/// Create the document storage facade with every compiled-in provider.
///
/// Credentials are not checked here; a provider without a token still gets
/// registered and fails on first use.
pub fn create_document_storage(config: &StorageConfig) -> StorageResult<DocumentStorage> {
    let timeout = Duration::from_secs(config.http_timeout_secs);
    #[allow(unused_mut)]
    let mut storage = DocumentStorage::new();

    #[cfg(feature = "storage-onedrive")]
    {
        let onedrive = OneDriveStorage::new(&config.onedrive, timeout)?;
        storage.register(Arc::new(onedrive));
    }

    #[cfg(feature = "storage-googledrive")]
    {
        let google_drive = GoogleDriveStorage::new(&config.google_drive, timeout)?;
        storage.register(Arc::new(google_drive));
    }

    tracing::info!(
        providers = ?storage.providers(),
        timeout_secs = timeout.as_secs(),
        "Document storage initialized"
    );

    Ok(storage)
}

#[cfg(all(test, feature = "storage-onedrive", feature = "storage-googledrive"))]
mod tests {
    use super::*;
    use docvault_core::StorageProvider;

    #[test]
    fn registers_both_providers_without_credentials() {
        let config = StorageConfig::from_lookup(|_| None).unwrap();
        let storage = create_document_storage(&config).unwrap();

        assert_eq!(
            storage.providers(),
            vec![StorageProvider::GoogleDrive, StorageProvider::OneDrive]
        );
        assert!(storage.client(StorageProvider::Local).is_err());
    }
}
