pub mod config;

pub use config::{CalendarConfig, Config, NotionConfig, ValidationResult};

use anyhow::Result;

/// Initialize logging for the StudyMentor process.
///
/// Honors `RUST_LOG`; defaults to `info`. Calling this twice is harmless.
pub fn init() -> Result<()> {
    let installed = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .try_init()
        .is_ok();

    if installed {
        tracing::info!("StudyMentor core initialized");
    }
    Ok(())
}
