//! StudyMentor integrations.
//!
//! [`Integrations`] is built once per process and handed by reference to
//! whatever runs bot commands; the [`bot`] module holds the command-facing
//! helpers.

pub mod bot;

use studymentor_calendar::CalendarAdapter;
use studymentor_core::Config;
use studymentor_notion::TaskBoardAdapter;

pub use studymentor_calendar::CalendarEventView;
pub use studymentor_notion::TaskView;

/// The process-wide calendar and task board sessions.
pub struct Integrations {
    pub calendar: CalendarAdapter,
    pub task_board: TaskBoardAdapter,
}

impl Integrations {
    /// Set up both adapters. Each one that lacks credentials comes up disabled.
    pub async fn setup(config: &Config) -> Self {
        let calendar = CalendarAdapter::setup(&config.calendar).await;
        let task_board = TaskBoardAdapter::setup(&config.notion);

        tracing::info!(
            calendar = calendar.is_enabled(),
            notion = task_board.is_enabled(),
            "Integrations ready"
        );

        Self {
            calendar,
            task_board,
        }
    }

    /// Both adapters disabled.
    pub fn disabled() -> Self {
        Self {
            calendar: CalendarAdapter::disabled(),
            task_board: TaskBoardAdapter::disabled(),
        }
    }
}
