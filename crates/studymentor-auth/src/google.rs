//! Google OAuth2 token refresh.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::storage::AuthorizedUserCredential;

pub const GOOGLE_TOKEN_URL: &str = "https://oauth2.googleapis.com/token";

/// Full read/write access to the user's calendars.
pub const CALENDAR_SCOPE: &str = "https://www.googleapis.com/auth/calendar";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GoogleTokenResponse {
    pub access_token: String,
    pub refresh_token: Option<String>,
    pub expires_in: Option<u64>,
    pub token_type: Option<String>,
    pub scope: Option<String>,
}

/// Exchanges a stored refresh token for a new access token.
pub struct GoogleTokenRefresher {
    client: reqwest::Client,
}

impl Default for GoogleTokenRefresher {
    fn default() -> Self {
        Self::new()
    }
}

impl GoogleTokenRefresher {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }

    /// Refresh the credential's access token against its `token_uri`.
    #[tracing::instrument(skip(self, credential), level = "info")]
    pub async fn refresh(&self, credential: &AuthorizedUserCredential) -> Result<GoogleTokenResponse> {
        let refresh_token = credential
            .refresh_token
            .as_deref()
            .context("Credential has no refresh token")?;
        let client_id = credential
            .client_id
            .as_deref()
            .context("Credential has no client_id")?;
        let client_secret = credential
            .client_secret
            .as_deref()
            .context("Credential has no client_secret")?;

        let response = self
            .client
            .post(&credential.token_uri)
            .form(&[
                ("client_id", client_id),
                ("client_secret", client_secret),
                ("refresh_token", refresh_token),
                ("grant_type", "refresh_token"),
            ])
            .send()
            .await
            .context("Failed to send refresh request")?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            anyhow::bail!("Token refresh failed ({}): {}", status, error_text);
        }

        response
            .json::<GoogleTokenResponse>()
            .await
            .context("Failed to parse refresh response")
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
    use super::*;

    #[test]
    fn test_token_response_minimal() {
        let resp: GoogleTokenResponse =
            serde_json::from_str(r#"{"access_token": "ya29.x"}"#).unwrap();
        assert_eq!(resp.access_token, "ya29.x");
        assert!(resp.refresh_token.is_none());
        assert!(resp.expires_in.is_none());
    }

    #[tokio::test]
    async fn test_refresh_without_refresh_token_fails_fast() {
        let credential = AuthorizedUserCredential {
            token: None,
            refresh_token: None,
            token_uri: "http://127.0.0.1:9/token".to_string(),
            client_id: Some("id".to_string()),
            client_secret: Some("secret".to_string()),
            scopes: vec![],
            expiry: None,
        };

        let err = GoogleTokenRefresher::new()
            .refresh(&credential)
            .await
            .unwrap_err();
        assert!(err.to_string().contains("refresh token"));
    }
}
