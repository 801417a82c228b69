//! Notion task board integration for StudyMentor.
//!
//! Writes task pages and study session logs into one Notion database and
//! reads back recent tasks.

pub mod adapter;
pub mod client;
pub mod error;
pub mod types;

pub use adapter::{TaskBoardAdapter, DEFAULT_PRIORITY, DEFAULT_TASK_LIMIT};
pub use client::NotionClient;
pub use error::NotionError;
pub use types::{Priority, StudySessionLog, TaskRecord, TaskView};
