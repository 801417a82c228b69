use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use url::Url;

/// Environment variable holding the (currently inert) Google API key.
pub const GOOGLE_API_KEY_ENV: &str = "GOOGLE_API_KEY";
/// Environment variable holding the Notion integration token.
pub const NOTION_TOKEN_ENV: &str = "NOTION_TOKEN";
/// Environment variable holding the target Notion database id.
pub const NOTION_DATABASE_ID_ENV: &str = "NOTION_DATABASE_ID";

const DEFAULT_CALENDAR_API_BASE: &str = "https://www.googleapis.com/calendar/v3";
const DEFAULT_NOTION_API_BASE: &str = "https://api.notion.com/v1";
const DEFAULT_NOTION_VERSION: &str = "2022-06-28";
const DEFAULT_TIME_ZONE: &str = "America/New_York";
const DEFAULT_CREDENTIALS_FILE: &str = "token.json";

/// Configuration validation errors
#[derive(Debug, Clone)]
pub struct ConfigValidationError {
    pub field: String,
    pub message: String,
}

impl std::fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Result of config validation
#[derive(Debug, Clone, Default)]
pub struct ValidationResult {
    pub errors: Vec<ConfigValidationError>,
    pub warnings: Vec<ConfigValidationError>,
}

impl ValidationResult {
    /// Returns true if there are no errors (warnings are OK)
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn add_error(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors.push(ConfigValidationError {
            field: field.into(),
            message: message.into(),
        });
    }

    pub fn add_warning(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.warnings.push(ConfigValidationError {
            field: field.into(),
            message: message.into(),
        });
    }

    /// Get a single-line message summarizing all errors
    pub fn error_summary(&self) -> String {
        self.errors
            .iter()
            .map(|e| e.to_string())
            .collect::<Vec<_>>()
            .join("; ")
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// Google Calendar settings
    #[serde(default)]
    pub calendar: CalendarConfig,

    /// Notion task board settings
    #[serde(default)]
    pub notion: NotionConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CalendarConfig {
    /// Authorized-user credential file produced by the OAuth consent flow
    #[serde(default = "default_credentials_path")]
    pub credentials_path: PathBuf,

    /// IANA time zone attached to timed events
    #[serde(default = "default_time_zone")]
    pub time_zone: String,

    #[serde(default = "default_calendar_api_base")]
    pub api_base_url: String,

    /// Google API key. Detected and logged only; no call is made with it.
    #[serde(default)]
    pub api_key: Option<String>,
}

fn default_credentials_path() -> PathBuf {
    PathBuf::from(DEFAULT_CREDENTIALS_FILE)
}

fn default_time_zone() -> String {
    DEFAULT_TIME_ZONE.to_string()
}

fn default_calendar_api_base() -> String {
    DEFAULT_CALENDAR_API_BASE.to_string()
}

impl Default for CalendarConfig {
    fn default() -> Self {
        Self {
            credentials_path: default_credentials_path(),
            time_zone: default_time_zone(),
            api_base_url: default_calendar_api_base(),
            api_key: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct NotionConfig {
    /// Integration token (usually supplied through `NOTION_TOKEN`)
    #[serde(default)]
    pub token: Option<String>,

    /// Database that receives task pages and study logs
    #[serde(default)]
    pub database_id: Option<String>,

    #[serde(default = "default_notion_api_base")]
    pub api_base_url: String,

    /// Value sent in the `Notion-Version` header
    #[serde(default = "default_notion_version")]
    pub api_version: String,
}

fn default_notion_api_base() -> String {
    DEFAULT_NOTION_API_BASE.to_string()
}

fn default_notion_version() -> String {
    DEFAULT_NOTION_VERSION.to_string()
}

impl Default for NotionConfig {
    fn default() -> Self {
        Self {
            token: None,
            database_id: None,
            api_base_url: default_notion_api_base(),
            api_version: default_notion_version(),
        }
    }
}

impl NotionConfig {
    /// Token and database id are both present.
    pub fn is_configured(&self) -> bool {
        self.token.is_some() && self.database_id.is_some()
    }
}

impl Config {
    /// Load configuration from the default file (if any), then apply
    /// environment overrides.
    pub fn load() -> Result<Self> {
        let mut config = match Self::config_path() {
            Some(path) if path.exists() => Self::load_from_path(&path)?,
            _ => Self::default(),
        };
        config.apply_env_overrides(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Load configuration and validate it
    ///
    /// Returns the config along with any validation warnings.
    /// Returns an error if validation fails with critical errors.
    pub fn load_validated() -> Result<(Self, ValidationResult)> {
        let config = Self::load()?;
        let validation = config.validate();

        if !validation.is_valid() {
            anyhow::bail!(
                "Configuration validation failed: {}",
                validation.error_summary()
            );
        }

        for warning in &validation.warnings {
            tracing::warn!("Config warning: {}", warning);
        }

        Ok((config, validation))
    }

    /// Parse a TOML configuration file without consulting the environment.
    pub fn load_from_path(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;

        toml::from_str(&contents).context("Failed to parse config file")
    }

    /// Overlay values from the environment. Empty values are ignored.
    pub fn apply_env_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(key) = non_empty(GOOGLE_API_KEY_ENV) {
            self.calendar.api_key = Some(key);
        }
        if let Some(token) = non_empty(NOTION_TOKEN_ENV) {
            self.notion.token = Some(token);
        }
        if let Some(database_id) = non_empty(NOTION_DATABASE_ID_ENV) {
            self.notion.database_id = Some(database_id);
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> ValidationResult {
        let mut result = ValidationResult::default();

        validate_url(&self.calendar.api_base_url, "calendar.api_base_url", &mut result);
        validate_url(&self.notion.api_base_url, "notion.api_base_url", &mut result);

        if self.calendar.time_zone.parse::<chrono_tz::Tz>().is_err() {
            result.add_error(
                "calendar.time_zone",
                format!("Unknown time zone: {}", self.calendar.time_zone),
            );
        }

        if self.notion.api_version.trim().is_empty() {
            result.add_error("notion.api_version", "Notion API version must not be empty");
        }

        if !self.calendar.credentials_path.exists() {
            result.add_warning(
                "calendar.credentials_path",
                format!(
                    "Credential file not found: {} - calendar integration will be disabled",
                    self.calendar.credentials_path.display()
                ),
            );
        }

        match (&self.notion.token, &self.notion.database_id) {
            (None, _) => result.add_warning(
                "notion.token",
                format!("{} not set - Notion integration will be disabled", NOTION_TOKEN_ENV),
            ),
            (Some(_), None) => result.add_warning(
                "notion.database_id",
                format!(
                    "{} not set - only task status updates will work",
                    NOTION_DATABASE_ID_ENV
                ),
            ),
            (Some(_), Some(_)) => {}
        }

        result
    }

    /// Path of the optional configuration file
    fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("studymentor").join("config.toml"))
    }
}

fn validate_url(url_str: &str, field_name: &str, result: &mut ValidationResult) {
    match Url::parse(url_str) {
        Ok(url) => {
            if url.scheme() != "http" && url.scheme() != "https" {
                result.add_error(
                    field_name,
                    format!("URL must use http or https scheme, got: {}", url.scheme()),
                );
            }
            if url.host().is_none() {
                result.add_error(field_name, "URL must have a host");
            }
        }
        Err(e) => result.add_error(field_name, format!("Invalid URL: {}", e)),
    }
}
