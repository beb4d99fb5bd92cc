use std::time::Duration;

use reqwest::{Client, Response};

use crate::traits::{StorageError, StorageResult};

pub(crate) fn build_http_client(timeout: Duration) -> StorageResult<Client> {
    Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| StorageError::ConfigError(format!("Failed to create HTTP client: {}", e)))
}

/// Turn a non-success response into an error carrying its body.
pub(crate) async fn unexpected_status(operation: &'static str, response: Response) -> StorageError {
    let status = response.status().as_u16();
    let body = response
        .text()
        .await
        .unwrap_or_else(|_| "Unknown error".to_string());
    StorageError::UnexpectedStatus {
        operation,
        status,
        body,
    }
}

/// Parse a JSON response body, reporting malformed payloads as invalid responses.
pub(crate) async fn parse_json<T: serde::de::DeserializeOwned>(
    operation: &'static str,
    response: Response,
) -> StorageResult<T> {
    response
        .json::<T>()
        .await
        .map_err(|e| StorageError::InvalidResponse(format!("{}: {}", operation, e)))
}
