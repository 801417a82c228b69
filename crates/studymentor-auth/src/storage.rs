use anyhow::{Context, Result};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::google::{GoogleTokenResponse, GOOGLE_TOKEN_URL};

/// Seconds before `expiry` at which a token is already treated as expired.
const REFRESH_BUFFER_SECS: i64 = 300;

/// Authorized-user credential as written by Google's installed-app flow
/// (`token.json`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthorizedUserCredential {
    /// Access token for API requests
    #[serde(default)]
    pub token: Option<String>,

    /// Refresh token for token renewal
    #[serde(default)]
    pub refresh_token: Option<String>,

    /// Endpoint used to exchange the refresh token
    #[serde(default = "default_token_uri")]
    pub token_uri: String,

    #[serde(default)]
    pub client_id: Option<String>,

    #[serde(default)]
    pub client_secret: Option<String>,

    /// Scopes granted to this token
    #[serde(default)]
    pub scopes: Vec<String>,

    /// Access token expiration; `None` means no known expiry
    #[serde(default)]
    pub expiry: Option<DateTime<Utc>>,
}

fn default_token_uri() -> String {
    GOOGLE_TOKEN_URL.to_string()
}

impl AuthorizedUserCredential {
    /// Read a credential from disk.
    pub fn load(path: &Path) -> Result<Self> {
        let json = fs::read_to_string(path)
            .with_context(|| format!("Failed to read credential file {}", path.display()))?;

        let credential: Self =
            serde_json::from_str(&json).context("Failed to deserialize credential file")?;

        tracing::debug!("Loaded credential from {}", path.display());
        Ok(credential)
    }

    /// Expired (or about to expire) relative to `now`.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        let Some(expiry) = self.expiry else {
            return false;
        };
        match expiry.checked_sub_signed(Duration::seconds(REFRESH_BUFFER_SECS)) {
            Some(threshold) => now >= threshold,
            None => true,
        }
    }

    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }

    /// Has a usable access token that has not expired.
    pub fn is_valid(&self) -> bool {
        self.access_token().is_some() && !self.is_expired()
    }

    /// Carries everything needed for a refresh-token grant.
    pub fn can_refresh(&self) -> bool {
        [&self.refresh_token, &self.client_id, &self.client_secret]
            .iter()
            .all(|v| v.as_deref().is_some_and(|s| !s.is_empty()))
    }

    pub fn access_token(&self) -> Option<&str> {
        self.token.as_deref().filter(|t| !t.is_empty())
    }

    pub fn has_scope(&self, scope: &str) -> bool {
        self.scopes.iter().any(|s| s == scope)
    }

    /// Replace the access token with a freshly refreshed one.
    ///
    /// Only the in-memory copy changes; the credential file is left as is.
    /// An `expires_in` that does not fit a timestamp leaves the expiry unknown.
    pub fn apply_refresh(&mut self, response: GoogleTokenResponse, now: DateTime<Utc>) {
        self.token = Some(response.access_token);
        self.expiry = response.expires_in.and_then(|secs| {
            let expiry = i64::try_from(secs)
                .ok()
                .and_then(Duration::try_seconds)
                .and_then(|lifetime| now.checked_add_signed(lifetime));
            if expiry.is_none() {
                tracing::warn!("Ignoring out-of-range token lifetime of {}s", secs);
            }
            expiry
        });
        if let Some(refresh_token) = response.refresh_token {
            self.refresh_token = Some(refresh_token);
        }
        if let Some(scope) = response.scope {
            self.scopes = scope.split_whitespace().map(str::to_string).collect();
        }
    }
}
