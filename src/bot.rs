//! Helpers called by bot commands. Each one forwards to its adapter and
//! keeps the adapter's sentinel-on-failure contract.

use chrono::{NaiveDate, NaiveDateTime};

use crate::{CalendarEventView, Integrations, TaskView};

/// Events shown by the bot's calendar listing.
pub const BOT_EVENT_LIMIT: usize = 5;
/// Tasks shown by the bot's task listing.
pub const BOT_TASK_LIMIT: usize = 5;

/// Add a study session to Google Calendar.
pub async fn add_study_session_to_calendar(
    integrations: &Integrations,
    title: &str,
    description: &str,
    start: NaiveDateTime,
    duration_minutes: u32,
) -> Option<String> {
    integrations
        .calendar
        .create_study_event(title, description, start, duration_minutes)
        .await
}

/// Add an assignment deadline to Google Calendar.
pub async fn add_assignment_to_calendar(
    integrations: &Integrations,
    title: &str,
    description: &str,
    due_date: NaiveDate,
) -> Option<String> {
    integrations
        .calendar
        .create_assignment_deadline(title, description, due_date)
        .await
}

/// Upcoming Google Calendar events, soonest first.
pub async fn get_calendar_events(
    integrations: &Integrations,
    max_results: usize,
) -> Vec<CalendarEventView> {
    integrations.calendar.get_upcoming_events(max_results).await
}

/// Sync a task to Notion.
pub async fn sync_task_to_notion(
    integrations: &Integrations,
    title: &str,
    description: &str,
    due_date: Option<&str>,
    priority: i64,
) -> Option<String> {
    integrations
        .task_board
        .create_task_page(title, description, due_date, priority)
        .await
}

/// Set a Notion task's status.
pub async fn update_notion_task_status(
    integrations: &Integrations,
    page_id: &str,
    status: &str,
) -> bool {
    integrations
        .task_board
        .update_task_status(page_id, status)
        .await
}

/// Log a study session to Notion.
pub async fn log_study_session_to_notion(
    integrations: &Integrations,
    subject: &str,
    duration_minutes: u32,
    notes: &str,
) -> Option<String> {
    integrations
        .task_board
        .create_study_log(subject, duration_minutes, notes)
        .await
}

/// Most recent Notion tasks, newest first.
pub async fn get_notion_tasks(integrations: &Integrations, limit: usize) -> Vec<TaskView> {
    integrations.task_board.get_recent_tasks(limit).await
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used)]
    use super::*;

    #[tokio::test]
    async fn test_helpers_on_disabled_integrations() {
        let integrations = Integrations::disabled();
        let start = NaiveDate::from_ymd_opt(2024, 6, 1)
            .unwrap()
            .and_hms_opt(10, 0, 0)
            .unwrap();

        assert!(
            add_study_session_to_calendar(&integrations, "Math", "Algebra", start, 60)
                .await
                .is_none()
        );
        assert!(
            add_assignment_to_calendar(&integrations, "Essay", "", start.date())
                .await
                .is_none()
        );
        assert!(get_calendar_events(&integrations, BOT_EVENT_LIMIT)
            .await
            .is_empty());
        assert!(
            sync_task_to_notion(&integrations, "Read", "Ch. 2", Some("2024-06-10"), 2)
                .await
                .is_none()
        );
        assert!(!update_notion_task_status(&integrations, "p1", "Done").await);
        assert!(
            log_study_session_to_notion(&integrations, "Math", 30, "")
                .await
                .is_none()
        );
        assert!(get_notion_tasks(&integrations, BOT_TASK_LIMIT)
            .await
            .is_empty());
    }
}
