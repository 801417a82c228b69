use anyhow::Result;
use studymentor::{bot, Integrations};

#[tokio::main]
async fn main() -> Result<()> {
    studymentor_core::init()?;

    let (config, _validation) = studymentor_core::Config::load_validated()?;
    let integrations = Integrations::setup(&config).await;

    println!("StudyMentor integrations");
    println!(
        "  Google Calendar: {}",
        if integrations.calendar.is_enabled() { "connected" } else { "disabled" }
    );
    println!(
        "  Notion:          {}",
        if integrations.task_board.is_enabled() { "connected" } else { "disabled" }
    );

    let events = bot::get_calendar_events(&integrations, bot::BOT_EVENT_LIMIT).await;
    if !events.is_empty() {
        println!("\nUpcoming events:");
        for event in &events {
            println!("  {}  {}", event.start, event.summary);
        }
    }

    let tasks = bot::get_notion_tasks(&integrations, bot::BOT_TASK_LIMIT).await;
    if !tasks.is_empty() {
        println!("\nRecent tasks:");
        for task in &tasks {
            let due = task.due_date.as_deref().unwrap_or("no due date");
            println!("  [{}] {} ({}, {})", task.status, task.title, task.priority, due);
        }
    }

    Ok(())
}
