//! Task board adapter used by the bot layer.

use chrono::Utc;
use studymentor_core::NotionConfig;
use tracing::{error, info, warn};

use crate::client::NotionClient;
use crate::types::{
    CreatePageRequest, Priority, QueryDatabaseRequest, SelectProperty, StatusUpdateProperties,
    StudySessionLog, TaskRecord, TaskView, UpdatePageRequest, NO_DEADLINE,
};

pub const DEFAULT_TASK_LIMIT: usize = 10;
pub const DEFAULT_PRIORITY: i64 = 1;

/// Largest `page_size` the query endpoint accepts.
const MAX_PAGE_SIZE: usize = 100;

pub struct TaskBoardAdapter {
    client: Option<NotionClient>,
    database_id: Option<String>,
}

impl TaskBoardAdapter {
    /// Build the session from configuration. Never fails; a missing token or
    /// a client construction error leaves the adapter disabled.
    pub fn setup(config: &NotionConfig) -> Self {
        let client = match config.token.as_deref() {
            Some(token) => {
                match NotionClient::with_base_url(token, &config.api_base_url, &config.api_version)
                {
                    Ok(client) => {
                        info!("Notion client initialized");
                        Some(client)
                    }
                    Err(e) => {
                        error!("Failed to initialize Notion client: {}", e);
                        None
                    }
                }
            }
            None => {
                info!("Notion integration not configured - NOTION_TOKEN not found");
                None
            }
        };

        if client.is_some() && config.database_id.is_none() {
            warn!("NOTION_DATABASE_ID not set - pages cannot be created or queried");
        }

        Self::new(client, config.database_id.clone())
    }

    pub fn new(client: Option<NotionClient>, database_id: Option<String>) -> Self {
        Self {
            client,
            database_id,
        }
    }

    pub fn disabled() -> Self {
        Self::new(None, None)
    }

    pub fn is_enabled(&self) -> bool {
        self.client.is_some()
    }

    fn database_session(&self) -> Option<(&NotionClient, &str)> {
        Some((self.client.as_ref()?, self.database_id.as_deref()?))
    }

    /// Create a task page. `priority` 3/2 map to High/Medium, anything else
    /// to Low. Returns the page URL.
    pub async fn create_task_page(
        &self,
        title: &str,
        description: &str,
        due_date: Option<&str>,
        priority: i64,
    ) -> Option<String> {
        let (client, database_id) = self.database_session()?;

        let task = TaskRecord::new(title, description, Priority::from_level(priority), Utc::now())
            .with_due_date_text(due_date);
        if due_date.is_some_and(|d| d != NO_DEADLINE) && task.due_date.is_none() {
            info!("Ignoring unusable due date {:?} for task {:?}", due_date, title);
        }

        let request = CreatePageRequest::in_database(database_id, task.to_properties());
        match client.create_page(&request).await {
            Ok(page) => Some(page.url),
            Err(e) => {
                warn!("Failed to create Notion page: {}", e);
                None
            }
        }
    }

    /// Overwrite a page's Status.
    pub async fn update_task_status(&self, page_id: &str, status: &str) -> bool {
        let Some(client) = self.client.as_ref() else {
            return false;
        };

        let request = UpdatePageRequest {
            properties: StatusUpdateProperties {
                status: SelectProperty::named(status),
            },
        };
        match client.update_page(page_id, &request).await {
            Ok(_) => true,
            Err(e) => {
                warn!("Failed to update Notion page {}: {}", page_id, e);
                false
            }
        }
    }

    /// Log a study session. Empty `notes` get a generated summary.
    pub async fn create_study_log(
        &self,
        subject: &str,
        duration_minutes: u32,
        notes: &str,
    ) -> Option<String> {
        let (client, database_id) = self.database_session()?;

        let log = StudySessionLog::new(subject, duration_minutes, notes, Utc::now());
        let request = CreatePageRequest::in_database(database_id, log.to_properties());
        match client.create_page(&request).await {
            Ok(page) => Some(page.url),
            Err(e) => {
                warn!("Failed to create study log in Notion: {}", e);
                None
            }
        }
    }

    /// Most recently created tasks, newest first.
    pub async fn get_recent_tasks(&self, limit: usize) -> Vec<TaskView> {
        let Some((client, database_id)) = self.database_session() else {
            return Vec::new();
        };
        if limit == 0 {
            return Vec::new();
        }

        let request = QueryDatabaseRequest::recent_first(limit.min(MAX_PAGE_SIZE));
        match client.query_database(database_id, &request).await {
            Ok(response) => response
                .results
                .into_iter()
                .take(limit)
                .map(TaskView::from_api)
                .collect(),
            Err(e) => {
                warn!("Failed to get tasks from Notion: {}", e);
                Vec::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_disabled_adapter_returns_sentinels() {
        let adapter = TaskBoardAdapter::disabled();
        assert!(!adapter.is_enabled());

        assert!(adapter
            .create_task_page("t", "d", Some("2024-01-01"), 3)
            .await
            .is_none());
        assert!(!adapter.update_task_status("page", "Done").await);
        assert!(adapter.create_study_log("Math", 30, "").await.is_none());
        assert!(adapter.get_recent_tasks(DEFAULT_TASK_LIMIT).await.is_empty());
    }

    #[test]
    fn test_setup_without_token_is_disabled() {
        let config = NotionConfig {
            database_id: Some("db".to_string()),
            ..NotionConfig::default()
        };
        assert!(!TaskBoardAdapter::setup(&config).is_enabled());
    }

    #[test]
    fn test_setup_with_token() {
        let config = NotionConfig {
            token: Some("secret_x".to_string()),
            ..NotionConfig::default()
        };
        let adapter = TaskBoardAdapter::setup(&config);
        assert!(adapter.is_enabled());
        assert!(adapter.database_session().is_none());
    }
}
