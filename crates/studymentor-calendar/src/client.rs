//! Google Calendar API client.

use chrono::{DateTime, SecondsFormat, Utc};
use tracing::instrument;

use crate::error::CalendarError;
use crate::types::*;

const CALENDAR_API_BASE: &str = "https://www.googleapis.com/calendar/v3";

/// Authenticated session against the Calendar API.
pub struct CalendarClient {
    client: reqwest::Client,
    access_token: String,
    base_url: String,
}

impl CalendarClient {
    pub fn new(access_token: &str) -> Result<Self, CalendarError> {
        Self::with_base_url(access_token, CALENDAR_API_BASE)
    }

    pub fn with_base_url(access_token: &str, base_url: &str) -> Result<Self, CalendarError> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("studymentor/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            access_token: access_token.to_string(),
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn auth_header(&self) -> String {
        format!("Bearer {}", self.access_token)
    }

    /// Insert an event and return the created resource.
    #[instrument(skip(self, event), fields(summary = %event.summary), level = "info")]
    pub async fn insert_event(
        &self,
        calendar_id: &str,
        event: &EventRequest,
    ) -> Result<ApiEvent, CalendarError> {
        let url = format!(
            "{}/calendars/{}/events",
            self.base_url,
            urlencoding::encode(calendar_id),
        );

        let response = self
            .client
            .post(&url)
            .header("Authorization", self.auth_header())
            .json(event)
            .send()
            .await?;

        self.handle_response(response).await
    }

    /// List single-occurrence events starting at or after `time_min`,
    /// ordered by start time.
    #[instrument(skip(self), level = "info")]
    pub async fn list_upcoming(
        &self,
        calendar_id: &str,
        time_min: DateTime<Utc>,
        max_results: usize,
    ) -> Result<EventListResponse, CalendarError> {
        let url = format!(
            "{}/calendars/{}/events?timeMin={}&maxResults={}&singleEvents=true&orderBy=startTime",
            self.base_url,
            urlencoding::encode(calendar_id),
            urlencoding::encode(&time_min.to_rfc3339_opts(SecondsFormat::Micros, true)),
            max_results,
        );

        let response = self
            .client
            .get(&url)
            .header("Authorization", self.auth_header())
            .send()
            .await?;

        self.handle_response(response).await
    }

    /// Helper to handle API responses and errors.
    async fn handle_response<T: serde::de::DeserializeOwned>(
        &self,
        response: reqwest::Response,
    ) -> Result<T, CalendarError> {
        let status = response.status();

        if status.is_success() {
            response
                .json()
                .await
                .map_err(|e| CalendarError::ApiError(format!("JSON parse error: {}", e)))
        } else if status.as_u16() == 401 {
            Err(CalendarError::TokenExpired)
        } else if status.as_u16() == 403 {
            Err(CalendarError::AuthRequired)
        } else if status.as_u16() == 404 {
            let text = response.text().await.unwrap_or_default();
            Err(CalendarError::NotFound(text))
        } else if status.as_u16() == 429 {
            let retry_after = response
                .headers()
                .get("Retry-After")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse().ok())
                .unwrap_or(60);
            Err(CalendarError::RateLimited(retry_after))
        } else {
            let text = response.text().await.unwrap_or_default();
            Err(CalendarError::ApiError(format!("{}: {}", status, text)))
        }
    }
}
