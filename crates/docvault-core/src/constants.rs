//! Protocol constants shared by the provider clients.

/// Payloads strictly below this size are sent in a single request to the
/// Graph-style provider; anything at or above goes through an upload session.
pub const SIMPLE_UPLOAD_LIMIT_BYTES: usize = 4 * 1024 * 1024;

/// Chunk size for upload sessions. Graph requires multiples of 320 KiB.
pub const UPLOAD_CHUNK_SIZE_BYTES: usize = 320 * 1024;

pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 60;

pub const ONEDRIVE_API_BASE: &str = "https://graph.microsoft.com/v1.0";
pub const ONEDRIVE_LOGIN_BASE: &str = "https://login.microsoftonline.com";

pub const GOOGLEDRIVE_API_BASE: &str = "https://www.googleapis.com/drive/v3";
pub const GOOGLEDRIVE_UPLOAD_BASE: &str = "https://www.googleapis.com/upload/drive/v3";
pub const GOOGLEDRIVE_TOKEN_URL: &str = "https://oauth2.googleapis.com/token";
