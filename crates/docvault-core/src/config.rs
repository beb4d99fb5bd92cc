//! Configuration module
//!
//! Provider credentials and endpoints are read once from the environment.
//! Credentials are not validated here: a missing token only fails the call
//! that needs it.

use std::env;

use crate::constants::{
    DEFAULT_HTTP_TIMEOUT_SECS, GOOGLEDRIVE_API_BASE, GOOGLEDRIVE_TOKEN_URL,
    GOOGLEDRIVE_UPLOAD_BASE, ONEDRIVE_API_BASE, ONEDRIVE_LOGIN_BASE,
};
use crate::storage_types::StorageProvider;

/// Graph-style provider settings
#[derive(Clone, Debug, Default)]
pub struct OneDriveConfig {
    pub client_id: Option<String>,
    pub client_secret: Option<String>,
    pub tenant_id: Option<String>,
    pub access_token: Option<String>,
    pub refresh_token: Option<String>,
    pub api_base: String,
    pub token_url: String,
}

/// Drive-style provider settings
#[derive(Clone, Debug, Default)]
pub struct GoogleDriveConfig {
    pub client_id: Option<String>,
    pub client_secret: Option<String>,
    pub access_token: Option<String>,
    pub refresh_token: Option<String>,
    pub api_base: String,
    pub upload_base: String,
    pub token_url: String,
    /// Grant "anyone with the link can view" after each upload
    pub share_publicly: bool,
}

/// Storage configuration for all providers
#[derive(Clone, Debug)]
pub struct StorageConfig {
    pub onedrive: OneDriveConfig,
    pub google_drive: GoogleDriveConfig,
    pub http_timeout_secs: u64,
    pub default_provider: StorageProvider,
}

impl StorageConfig {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, anyhow::Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let tenant_id = get("ONEDRIVE_TENANT_ID");
        let onedrive_token_url = get("ONEDRIVE_TOKEN_URL").unwrap_or_else(|| {
            format!(
                "{}/{}/oauth2/v2.0/token",
                ONEDRIVE_LOGIN_BASE,
                tenant_id.as_deref().unwrap_or("common")
            )
        });

        let onedrive = OneDriveConfig {
            client_id: get("ONEDRIVE_CLIENT_ID"),
            client_secret: get("ONEDRIVE_CLIENT_SECRET"),
            tenant_id,
            access_token: get("ONEDRIVE_ACCESS_TOKEN"),
            refresh_token: get("ONEDRIVE_REFRESH_TOKEN"),
            api_base: trim_base(get("ONEDRIVE_API_BASE"), ONEDRIVE_API_BASE),
            token_url: onedrive_token_url,
        };

        let share_publicly = match get("GOOGLEDRIVE_SHARE_PUBLICLY") {
            Some(value) => parse_bool(&value).ok_or_else(|| {
                anyhow::anyhow!("GOOGLEDRIVE_SHARE_PUBLICLY must be a boolean, got '{}'", value)
            })?,
            None => true,
        };

        let google_drive = GoogleDriveConfig {
            client_id: get("GOOGLEDRIVE_CLIENT_ID"),
            client_secret: get("GOOGLEDRIVE_CLIENT_SECRET"),
            access_token: get("GOOGLEDRIVE_ACCESS_TOKEN"),
            refresh_token: get("GOOGLEDRIVE_REFRESH_TOKEN"),
            api_base: trim_base(get("GOOGLEDRIVE_API_BASE"), GOOGLEDRIVE_API_BASE),
            upload_base: trim_base(get("GOOGLEDRIVE_UPLOAD_BASE"), GOOGLEDRIVE_UPLOAD_BASE),
            token_url: get("GOOGLEDRIVE_TOKEN_URL")
                .unwrap_or_else(|| GOOGLEDRIVE_TOKEN_URL.to_string()),
            share_publicly,
        };

        let http_timeout_secs = get("STORAGE_HTTP_TIMEOUT_SECS")
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(DEFAULT_HTTP_TIMEOUT_SECS);

        let default_provider = match get("DEFAULT_STORAGE_PROVIDER") {
            Some(tag) => tag.parse::<StorageProvider>()?,
            None => StorageProvider::OneDrive,
        };

        Ok(StorageConfig {
            onedrive,
            google_drive,
            http_timeout_secs,
            default_provider,
        })
    }
}

fn trim_base(value: Option<String>, default: &str) -> String {
    value
        .unwrap_or_else(|| default.to_string())
        .trim_end_matches('/')
        .to_string()
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Result<StorageConfig, anyhow::Error> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        StorageConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_apply_when_nothing_is_set() {
        let config = config_from(&[]).unwrap();

        assert_eq!(config.onedrive.api_base, ONEDRIVE_API_BASE);
        assert_eq!(
            config.onedrive.token_url,
            "https://login.microsoftonline.com/common/oauth2/v2.0/token"
        );
        assert!(config.onedrive.access_token.is_none());
        assert_eq!(config.google_drive.api_base, GOOGLEDRIVE_API_BASE);
        assert_eq!(config.google_drive.upload_base, GOOGLEDRIVE_UPLOAD_BASE);
        assert_eq!(config.google_drive.token_url, GOOGLEDRIVE_TOKEN_URL);
        assert!(config.google_drive.share_publicly);
        assert_eq!(config.http_timeout_secs, DEFAULT_HTTP_TIMEOUT_SECS);
        assert_eq!(config.default_provider, StorageProvider::OneDrive);
    }

    #[test]
    fn tenant_id_shapes_token_url() {
        let config = config_from(&[("ONEDRIVE_TENANT_ID", "contoso")]).unwrap();
        assert_eq!(
            config.onedrive.token_url,
            "https://login.microsoftonline.com/contoso/oauth2/v2.0/token"
        );
    }

    #[test]
    fn empty_credentials_are_treated_as_missing() {
        let config = config_from(&[
            ("ONEDRIVE_ACCESS_TOKEN", "   "),
            ("GOOGLEDRIVE_ACCESS_TOKEN", ""),
        ])
        .unwrap();
        assert!(config.onedrive.access_token.is_none());
        assert!(config.google_drive.access_token.is_none());
    }

    #[test]
    fn base_urls_lose_trailing_slash() {
        let config = config_from(&[
            ("ONEDRIVE_API_BASE", "http://localhost:1234/"),
            ("GOOGLEDRIVE_UPLOAD_BASE", "http://localhost:1234/upload/"),
        ])
        .unwrap();
        assert_eq!(config.onedrive.api_base, "http://localhost:1234");
        assert_eq!(config.google_drive.upload_base, "http://localhost:1234/upload");
    }

    #[test]
    fn share_publicly_and_default_provider_are_parsed() {
        let config = config_from(&[
            ("GOOGLEDRIVE_SHARE_PUBLICLY", "false"),
            ("DEFAULT_STORAGE_PROVIDER", "googledrive"),
            ("STORAGE_HTTP_TIMEOUT_SECS", "15"),
        ])
        .unwrap();
        assert!(!config.google_drive.share_publicly);
        assert_eq!(config.default_provider, StorageProvider::GoogleDrive);
        assert_eq!(config.http_timeout_secs, 15);
    }

    #[test]
    fn invalid_values_are_rejected() {
        assert!(config_from(&[("GOOGLEDRIVE_SHARE_PUBLICLY", "maybe")]).is_err());
        assert!(config_from(&[("DEFAULT_STORAGE_PROVIDER", "dropbox")]).is_err());
    }
}
