//! OAuth credential state for one provider.
//!
//! Loaded once from configuration. The access token can be replaced by a
//! refresh; requests that already read the old token keep using it.

use reqwest::Client;
use serde::Deserialize;
use tokio::sync::RwLock;

use crate::traits::{StorageError, StorageResult};

#[derive(Debug, Default)]
struct TokenState {
    access_token: Option<String>,
    refresh_token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    refresh_token: Option<String>,
    #[serde(default)]
    expires_in: Option<u64>,
}

/// Client credentials plus the mutable token pair.
#[derive(Debug)]
pub struct OAuthCredentials {
    provider: &'static str,
    client_id: Option<String>,
    client_secret: Option<String>,
    token_url: String,
    scope: Option<String>,
    tokens: RwLock<TokenState>,
}

impl OAuthCredentials {
    pub fn new(
        provider: &'static str,
        client_id: Option<String>,
        client_secret: Option<String>,
        token_url: impl Into<String>,
    ) -> Self {
        Self {
            provider,
            client_id,
            client_secret,
            token_url: token_url.into(),
            scope: None,
            tokens: RwLock::new(TokenState::default()),
        }
    }

    pub fn with_tokens(self, access_token: Option<String>, refresh_token: Option<String>) -> Self {
        Self {
            tokens: RwLock::new(TokenState {
                access_token,
                refresh_token,
            }),
            ..self
        }
    }

    pub fn with_scope(mut self, scope: impl Into<String>) -> Self {
        self.scope = Some(scope.into());
        self
    }

    /// Current access token; a missing token is a configuration error.
    pub async fn access_token(&self) -> StorageResult<String> {
        let tokens = self.tokens.read().await;
        tokens
            .access_token
            .clone()
            .filter(|t| !t.is_empty())
            .ok_or_else(|| {
                StorageError::ConfigError(format!(
                    "{} access token is not configured",
                    self.provider
                ))
            })
    }

    /// Exchange the refresh token at the token endpoint, store the new access
    /// token and return it.
    pub async fn refresh(&self, http: &Client) -> StorageResult<String> {
        let refresh_token = self
            .tokens
            .read()
            .await
            .refresh_token
            .clone()
            .filter(|t| !t.is_empty())
            .ok_or_else(|| {
                StorageError::ConfigError(format!("{} refresh token is not configured", self.provider))
            })?;
        let client_id = self.client_id.clone().ok_or_else(|| {
            StorageError::ConfigError(format!("{} client id is not configured", self.provider))
        })?;

        let mut form: Vec<(&str, String)> = vec![
            ("client_id", client_id),
            ("refresh_token", refresh_token),
            ("grant_type", "refresh_token".to_string()),
        ];
        if let Some(secret) = &self.client_secret {
            form.push(("client_secret", secret.clone()));
        }
        if let Some(scope) = &self.scope {
            form.push(("scope", scope.clone()));
        }

        let response = http.post(&self.token_url).form(&form).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            tracing::error!(
                provider = self.provider,
                status = status.as_u16(),
                "Access token refresh rejected"
            );
            return Err(StorageError::TokenRefresh(format!(
                "{} token endpoint returned {}: {}",
                self.provider, status, body
            )));
        }

        let payload: TokenResponse = response
            .json()
            .await
            .map_err(|e| StorageError::TokenRefresh(format!("Malformed token response: {}", e)))?;

        let mut tokens = self.tokens.write().await;
        tokens.access_token = Some(payload.access_token.clone());
        if let Some(rotated) = payload.refresh_token {
            tokens.refresh_token = Some(rotated);
        }

        tracing::info!(
            provider = self.provider,
            expires_in_secs = payload.expires_in,
            "Access token refreshed"
        );

        Ok(payload.access_token)
    }
}
