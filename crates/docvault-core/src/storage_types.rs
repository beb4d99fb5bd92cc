use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;

/// Storage provider tags
///
/// Every document record carries one of these tags; it selects which remote
/// backend owns the file. `Local` is reserved and has no client yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageProvider {
    OneDrive,
    GoogleDrive,
    Local,
}

impl FromStr for StorageProvider {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "onedrive" => Ok(StorageProvider::OneDrive),
            "googledrive" | "google_drive" | "gdrive" => Ok(StorageProvider::GoogleDrive),
            "local" => Ok(StorageProvider::Local),
            _ => Err(anyhow::anyhow!("Invalid storage provider: {}", s)),
        }
    }
}

impl Display for StorageProvider {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            StorageProvider::OneDrive => write!(f, "onedrive"),
            StorageProvider::GoogleDrive => write!(f, "googledrive"),
            StorageProvider::Local => write!(f, "local"),
        }
    }
}
