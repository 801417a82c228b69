//! Google Calendar integration for StudyMentor.
//!
//! Creates study sessions and assignment deadlines on the primary calendar
//! and lists upcoming events.

pub mod adapter;
pub mod client;
pub mod error;
pub mod types;

pub use adapter::{CalendarAdapter, DEFAULT_MAX_RESULTS};
pub use client::CalendarClient;
pub use error::CalendarError;
pub use types::{
    CalendarEventView, DeadlineEvent, EventDateTime, EventRequest, ReminderMethod,
    ReminderOverride, Reminders, StudyEvent,
};
