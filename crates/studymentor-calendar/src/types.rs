//! Calendar domain records and Google Calendar API wire types.

use chrono::{Duration, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

const STUDY_SUMMARY_PREFIX: &str = "📚";
const DEADLINE_SUMMARY_PREFIX: &str = "📝 DUE:";
const STUDY_DESCRIPTION_LABEL: &str = "StudyMentor Session:";
const DEADLINE_DESCRIPTION_LABEL: &str = "StudyMentor Assignment:";

/// Shown for listed events that have no summary upstream.
pub const UNTITLED_EVENT: &str = "(No title)";

const MINUTES_PER_DAY: u32 = 24 * 60;

/// Email one day before, popup ten minutes before.
pub const STUDY_EVENT_REMINDERS: [ReminderOverride; 2] = [
    ReminderOverride::email(MINUTES_PER_DAY),
    ReminderOverride::popup(10),
];

/// Email three days and one day before, popup one hour before.
pub const DEADLINE_REMINDERS: [ReminderOverride; 3] = [
    ReminderOverride::email(3 * MINUTES_PER_DAY),
    ReminderOverride::email(MINUTES_PER_DAY),
    ReminderOverride::popup(60),
];

/// A timed study session.
#[derive(Debug, Clone, PartialEq)]
pub struct StudyEvent {
    pub title: String,
    pub description: String,
    /// Wall-clock start in the adapter's configured time zone
    pub start: NaiveDateTime,
    pub duration_minutes: u32,
}

impl StudyEvent {
    /// `None` when the end falls past the representable date range.
    pub fn end(&self) -> Option<NaiveDateTime> {
        self.start
            .checked_add_signed(Duration::minutes(i64::from(self.duration_minutes)))
    }

    pub fn to_request(&self, time_zone: &str) -> Option<EventRequest> {
        Some(EventRequest {
            summary: format!("{} {}", STUDY_SUMMARY_PREFIX, self.title),
            description: format!("{} {}", STUDY_DESCRIPTION_LABEL, self.description),
            start: EventDateTime::timed(self.start, time_zone),
            end: EventDateTime::timed(self.end()?, time_zone),
            reminders: Reminders::overrides(&STUDY_EVENT_REMINDERS),
        })
    }
}

/// An all-day assignment deadline.
#[derive(Debug, Clone, PartialEq)]
pub struct DeadlineEvent {
    pub title: String,
    pub description: String,
    pub due_date: NaiveDate,
}

impl DeadlineEvent {
    /// Start and end are both the due date.
    pub fn to_request(&self) -> EventRequest {
        EventRequest {
            summary: format!("{} {}", DEADLINE_SUMMARY_PREFIX, self.title),
            description: format!("{} {}", DEADLINE_DESCRIPTION_LABEL, self.description),
            start: EventDateTime::all_day(self.due_date),
            end: EventDateTime::all_day(self.due_date),
            reminders: Reminders::overrides(&DEADLINE_REMINDERS),
        }
    }
}

/// Normalized view of an upcoming event.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CalendarEventView {
    pub summary: String,
    /// RFC 3339 date-time, or `YYYY-MM-DD` for all-day events
    pub start: String,
    pub description: String,
    pub link: String,
}

impl CalendarEventView {
    /// Project an API event. Events without any start are dropped.
    pub fn from_api(api: ApiEvent) -> Option<Self> {
        let start = api.start.and_then(|t| t.date_time.or(t.date))?;

        Some(Self {
            summary: api
                .summary
                .filter(|s| !s.is_empty())
                .unwrap_or_else(|| UNTITLED_EVENT.to_string()),
            start,
            description: api.description.unwrap_or_default(),
            link: api.html_link.unwrap_or_default(),
        })
    }
}

// API Request Types

/// Body of an events.insert call.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EventRequest {
    pub summary: String,
    pub description: String,
    pub start: EventDateTime,
    pub end: EventDateTime,
    pub reminders: Reminders,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventDateTime {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_zone: Option<String>,
}

impl EventDateTime {
    pub fn timed(at: NaiveDateTime, time_zone: &str) -> Self {
        Self {
            date_time: Some(at.format("%Y-%m-%dT%H:%M:%S").to_string()),
            date: None,
            time_zone: Some(time_zone.to_string()),
        }
    }

    pub fn all_day(date: NaiveDate) -> Self {
        Self {
            date_time: None,
            date: Some(date.format("%Y-%m-%d").to_string()),
            time_zone: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Reminders {
    pub use_default: bool,
    pub overrides: Vec<ReminderOverride>,
}

impl Reminders {
    /// Replace the calendar's default reminders.
    pub fn overrides(overrides: &[ReminderOverride]) -> Self {
        Self {
            use_default: false,
            overrides: overrides.to_vec(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ReminderOverride {
    pub method: ReminderMethod,
    pub minutes: u32,
}

impl ReminderOverride {
    pub const fn email(minutes: u32) -> Self {
        Self {
            method: ReminderMethod::Email,
            minutes,
        }
    }

    pub const fn popup(minutes: u32) -> Self {
        Self {
            method: ReminderMethod::Popup,
            minutes,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ReminderMethod {
    Email,
    Popup,
}

// API Response Types

/// Google Calendar API event response.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiEvent {
    pub id: Option<String>,
    pub summary: Option<String>,
    pub description: Option<String>,
    pub start: Option<ApiEventTime>,
    pub html_link: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiEventTime {
    pub date_time: Option<String>,
    pub date: Option<String>,
}

/// API response for event list.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventListResponse {
    #[serde(default)]
    pub items: Vec<ApiEvent>,
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used)]
    use super::*;

    fn study_event() -> StudyEvent {
        StudyEvent {
            title: "Math".to_string(),
            description: "Algebra".to_string(),
            start: NaiveDate::from_ymd_opt(2024, 3, 10)
                .unwrap()
                .and_hms_opt(23, 30, 0)
                .unwrap(),
            duration_minutes: 60,
        }
    }

    #[test]
    fn test_study_event_request() {
        let request = study_event().to_request("America/New_York").unwrap();
        let json = serde_json::to_value(&request).unwrap();

        assert_eq!(json["summary"], "📚 Math");
        assert_eq!(json["description"], "StudyMentor Session: Algebra");
        assert_eq!(json["start"]["dateTime"], "2024-03-10T23:30:00");
        // Crosses midnight
        assert_eq!(json["end"]["dateTime"], "2024-03-11T00:30:00");
        assert_eq!(json["end"]["timeZone"], "America/New_York");
        assert!(json["start"].get("date").is_none());
        assert_eq!(json["reminders"]["useDefault"], false);
        assert_eq!(
            json["reminders"]["overrides"],
            serde_json::json!([
                {"method": "email", "minutes": 1440},
                {"method": "popup", "minutes": 10}
            ])
        );
    }

    #[test]
    fn test_study_event_end_overflow() {
        let event = StudyEvent {
            start: NaiveDateTime::MAX,
            ..study_event()
        };
        assert!(event.end().is_none());
        assert!(event.to_request("America/New_York").is_none());

        let zero = StudyEvent {
            start: NaiveDateTime::MAX,
            duration_minutes: 0,
            ..study_event()
        };
        assert_eq!(zero.end(), Some(NaiveDateTime::MAX));
    }

    #[test]
    fn test_deadline_request() {
        let deadline = DeadlineEvent {
            title: "Essay".to_string(),
            description: "History essay".to_string(),
            due_date: NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(),
        };
        let json = serde_json::to_value(deadline.to_request()).unwrap();

        assert_eq!(json["summary"], "📝 DUE: Essay");
        assert_eq!(json["description"], "StudyMentor Assignment: History essay");
        assert_eq!(json["start"], serde_json::json!({"date": "2024-05-01"}));
        assert_eq!(json["end"], serde_json::json!({"date": "2024-05-01"}));
        assert_eq!(
            json["reminders"]["overrides"],
            serde_json::json!([
                {"method": "email", "minutes": 4320},
                {"method": "email", "minutes": 1440},
                {"method": "popup", "minutes": 60}
            ])
        );
    }

    #[test]
    fn test_view_prefers_date_time() {
        let json = r#"{
            "id": "e1",
            "summary": "Lecture",
            "start": {"dateTime": "2024-02-01T10:00:00-05:00", "date": "2024-02-01"},
            "htmlLink": "https://calendar.google.com/event?eid=1"
        }"#;
        let view = CalendarEventView::from_api(serde_json::from_str(json).unwrap()).unwrap();

        assert_eq!(view.start, "2024-02-01T10:00:00-05:00");
        assert_eq!(view.description, "");
        assert_eq!(view.link, "https://calendar.google.com/event?eid=1");
    }

    #[test]
    fn test_view_all_day_and_defaults() {
        let json = r#"{"id": "e2", "start": {"date": "2024-02-02"}}"#;
        let view = CalendarEventView::from_api(serde_json::from_str(json).unwrap()).unwrap();

        assert_eq!(view.summary, UNTITLED_EVENT);
        assert_eq!(view.start, "2024-02-02");
        assert_eq!(view.link, "");
    }

    #[test]
    fn test_view_without_start_is_dropped() {
        let api: ApiEvent = serde_json::from_str(r#"{"id": "e3", "summary": "Ghost"}"#).unwrap();
        assert!(CalendarEventView::from_api(api).is_none());
    }
}
