//! Calendar adapter used by the bot layer.
//!
//! Every operation reports failure through its return value (`None` or an
//! empty `Vec`) and logs the cause; nothing is propagated to the caller.

use chrono::{NaiveDate, NaiveDateTime, Utc};
use studymentor_auth::{AuthorizedUserCredential, GoogleTokenRefresher, CALENDAR_SCOPE};
use studymentor_core::CalendarConfig;
use tracing::{debug, error, info, warn};

use crate::client::CalendarClient;
use crate::error::CalendarError;
use crate::types::{CalendarEventView, DeadlineEvent, EventRequest, StudyEvent};

pub const DEFAULT_MAX_RESULTS: usize = 10;

const PRIMARY_CALENDAR: &str = "primary";

pub struct CalendarAdapter {
    client: Option<CalendarClient>,
    time_zone: String,
}

impl CalendarAdapter {
    /// Authenticate once from the persisted credential.
    ///
    /// Never fails: any problem leaves the adapter disabled.
    pub async fn setup(config: &CalendarConfig) -> Self {
        let client = match resolve_access_token(config).await {
            Some(token) => match CalendarClient::with_base_url(&token, &config.api_base_url) {
                Ok(client) => {
                    info!("Google Calendar service initialized");
                    Some(client)
                }
                Err(e) => {
                    error!("Failed to initialize Google Calendar service: {}", e);
                    None
                }
            },
            None => None,
        };

        Self::new(client, &config.time_zone)
    }

    pub fn new(client: Option<CalendarClient>, time_zone: &str) -> Self {
        Self {
            client,
            time_zone: time_zone.to_string(),
        }
    }

    /// An adapter with no session; every operation returns its sentinel.
    pub fn disabled() -> Self {
        Self::new(None, &CalendarConfig::default().time_zone)
    }

    pub fn is_enabled(&self) -> bool {
        self.client.is_some()
    }

    /// Create a timed study session. Returns the event's web link.
    pub async fn create_study_event(
        &self,
        title: &str,
        description: &str,
        start: NaiveDateTime,
        duration_minutes: u32,
    ) -> Option<String> {
        let client = self.client.as_ref()?;

        let event = StudyEvent {
            title: title.to_string(),
            description: description.to_string(),
            start,
            duration_minutes,
        };
        let Some(request) = event.to_request(&self.time_zone) else {
            warn!(
                "Study event {:?} starting {} for {} minutes ends out of range",
                title, start, duration_minutes
            );
            return None;
        };
        insert(client, &request).await
    }

    /// Create an all-day deadline on `due_date`. Returns the event's web link.
    pub async fn create_assignment_deadline(
        &self,
        title: &str,
        description: &str,
        due_date: NaiveDate,
    ) -> Option<String> {
        let client = self.client.as_ref()?;

        let event = DeadlineEvent {
            title: title.to_string(),
            description: description.to_string(),
            due_date,
        };
        insert(client, &event.to_request()).await
    }

    /// Upcoming events on the primary calendar, soonest first.
    pub async fn get_upcoming_events(&self, max_results: usize) -> Vec<CalendarEventView> {
        let Some(client) = self.client.as_ref() else {
            return Vec::new();
        };
        if max_results == 0 {
            return Vec::new();
        }

        match client
            .list_upcoming(PRIMARY_CALENDAR, Utc::now(), max_results)
            .await
        {
            Ok(response) => response
                .items
                .into_iter()
                .filter_map(CalendarEventView::from_api)
                .take(max_results)
                .collect(),
            Err(e) => {
                log_failure("list calendar events", &e);
                Vec::new()
            }
        }
    }
}

async fn insert(client: &CalendarClient, request: &EventRequest) -> Option<String> {
    match client.insert_event(PRIMARY_CALENDAR, request).await {
        Ok(event) => {
            if event.html_link.is_none() {
                warn!("Calendar event created without an htmlLink");
            }
            event.html_link
        }
        Err(e) => {
            log_failure("create calendar event", &e);
            None
        }
    }
}

fn log_failure(action: &str, e: &CalendarError) {
    if e.is_auth_failure() {
        error!("Failed to {}: {} (credential rejected)", action, e);
    } else {
        warn!("Failed to {}: {}", action, e);
    }
}

/// Usable access token from the credential file, refreshing once if needed.
async fn resolve_access_token(config: &CalendarConfig) -> Option<String> {
    let credential = match AuthorizedUserCredential::load(&config.credentials_path) {
        Ok(credential) => Some(credential),
        Err(e) => {
            debug!("No calendar credential: {:#}", e);
            None
        }
    };

    if let Some(credential) = &credential {
        if !credential.scopes.is_empty() && !credential.has_scope(CALENDAR_SCOPE) {
            warn!("Calendar credential lacks scope {}", CALENDAR_SCOPE);
        }
    }

    match credential {
        Some(credential) if credential.is_valid() => {
            credential.access_token().map(str::to_string)
        }
        Some(mut credential) if credential.can_refresh() => {
            match GoogleTokenRefresher::new().refresh(&credential).await {
                Ok(response) => {
                    credential.apply_refresh(response, Utc::now());
                    info!("Refreshed Google Calendar access token");
                    credential.access_token().map(str::to_string)
                }
                Err(e) => {
                    error!("Failed to refresh Google Calendar credential: {:#}", e);
                    None
                }
            }
        }
        _ => {
            if config.api_key.is_some() {
                // Key-based access is not implemented; the integration stays off.
                info!("Using Google API key for calendar access");
            } else {
                info!("Google Calendar integration not configured");
            }
            None
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used)]
    use super::*;

    #[tokio::test]
    async fn test_disabled_adapter_returns_sentinels() {
        let adapter = CalendarAdapter::disabled();
        assert!(!adapter.is_enabled());

        let start = NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .and_hms_opt(9, 0, 0)
            .unwrap();
        assert!(adapter
            .create_study_event("Math", "Algebra", start, 60)
            .await
            .is_none());
        assert!(adapter
            .create_assignment_deadline("Essay", "", start.date())
            .await
            .is_none());
        assert!(adapter.get_upcoming_events(DEFAULT_MAX_RESULTS).await.is_empty());
    }

    #[tokio::test]
    async fn test_setup_without_credentials_is_disabled() {
        let dir = tempfile::tempdir().unwrap();
        let config = CalendarConfig {
            credentials_path: dir.path().join("token.json"),
            api_key: Some("AIza-test".to_string()),
            ..CalendarConfig::default()
        };

        let adapter = CalendarAdapter::setup(&config).await;
        assert!(!adapter.is_enabled());
    }
}
