//! Task board records and their Notion property schema.

use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

pub const STATUS_NOT_STARTED: &str = "Not Started";
pub const STUDY_SESSION_TYPE: &str = "Study Session";

/// Due-date value the bot uses for "no due date".
pub const NO_DEADLINE: &str = "No deadline";

const UNTITLED: &str = "Untitled";
const UNKNOWN_STATUS: &str = "Unknown";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Priority {
    #[default]
    Low,
    Medium,
    High,
}

impl Priority {
    /// 3 is High, 2 is Medium, anything else is Low.
    pub fn from_level(level: i64) -> Self {
        match level {
            3 => Self::High,
            2 => Self::Medium,
            _ => Self::Low,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
        }
    }
}

/// A task to be written as a database page.
#[derive(Debug, Clone, PartialEq)]
pub struct TaskRecord {
    pub title: String,
    pub description: String,
    pub status: String,
    pub priority: Priority,
    pub created: DateTime<Utc>,
    pub due_date: Option<NaiveDate>,
}

impl TaskRecord {
    pub fn new(title: &str, description: &str, priority: Priority, created: DateTime<Utc>) -> Self {
        Self {
            title: title.to_string(),
            description: description.to_string(),
            status: STATUS_NOT_STARTED.to_string(),
            priority,
            created,
            due_date: None,
        }
    }

    /// Attach a due date given as free text.
    ///
    /// Only a 10-character `YYYY-MM-DD` string is accepted; anything else
    /// (including "No deadline") leaves the task without a due date.
    pub fn with_due_date_text(mut self, due_date: Option<&str>) -> Self {
        self.due_date = due_date
            .filter(|d| *d != NO_DEADLINE && d.len() == 10)
            .and_then(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").ok());
        self
    }

    pub fn to_properties(&self) -> TaskPageProperties {
        TaskPageProperties {
            title: TitleProperty::from_text(&self.title),
            description: RichTextProperty::from_text(&self.description),
            status: SelectProperty::named(&self.status),
            priority: SelectProperty::named(self.priority.as_str()),
            created: DateProperty::at(self.created),
            due_date: self.due_date.map(DateProperty::on),
        }
    }
}

/// A study session log entry.
#[derive(Debug, Clone, PartialEq)]
pub struct StudySessionLog {
    pub subject: String,
    pub duration_minutes: u32,
    pub date: DateTime<Utc>,
    pub notes: String,
}

impl StudySessionLog {
    /// Empty notes are replaced by a generated summary.
    pub fn new(subject: &str, duration_minutes: u32, notes: &str, date: DateTime<Utc>) -> Self {
        let notes = if notes.is_empty() {
            format!("Studied {} for {} minutes", subject, duration_minutes)
        } else {
            notes.to_string()
        };

        Self {
            subject: subject.to_string(),
            duration_minutes,
            date,
            notes,
        }
    }

    pub fn to_properties(&self) -> StudyLogProperties {
        StudyLogProperties {
            subject: TitleProperty::from_text(&format!("Study Session: {}", self.subject)),
            duration: NumberProperty {
                number: self.duration_minutes,
            },
            date: DateProperty::at(self.date),
            notes: RichTextProperty::from_text(&self.notes),
            kind: SelectProperty::named(STUDY_SESSION_TYPE),
        }
    }
}

/// Normalized view of a task page.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TaskView {
    pub id: String,
    pub title: String,
    pub status: String,
    pub priority: String,
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<String>,
}

impl TaskView {
    pub fn from_api(page: ApiPage) -> Self {
        let props = page.properties;

        Self {
            id: page.id,
            title: props
                .title
                .and_then(|t| t.first_text())
                .unwrap_or_else(|| UNTITLED.to_string()),
            status: props
                .status
                .and_then(SelectProperty::into_name)
                .unwrap_or_else(|| UNKNOWN_STATUS.to_string()),
            priority: props
                .priority
                .and_then(SelectProperty::into_name)
                .unwrap_or_else(|| Priority::Low.as_str().to_string()),
            url: page.url,
            due_date: props.due_date.and_then(|d| d.date).map(|d| d.start),
        }
    }
}

// Property value types, shared by requests and responses

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextContent {
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RichText {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<TextContent>,
    #[serde(default, skip_serializing)]
    pub plain_text: Option<String>,
}

impl RichText {
    fn plain(content: &str) -> Self {
        Self {
            text: Some(TextContent {
                content: content.to_string(),
            }),
            plain_text: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TitleProperty {
    #[serde(default)]
    pub title: Vec<RichText>,
}

impl TitleProperty {
    pub fn from_text(content: &str) -> Self {
        Self {
            title: vec![RichText::plain(content)],
        }
    }

    /// Content of the first title fragment.
    fn first_text(self) -> Option<String> {
        let first = self.title.into_iter().next()?;
        first.text.map(|t| t.content).or(first.plain_text)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RichTextProperty {
    #[serde(default)]
    pub rich_text: Vec<RichText>,
}

impl RichTextProperty {
    pub fn from_text(content: &str) -> Self {
        Self {
            rich_text: vec![RichText::plain(content)],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectOption {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectProperty {
    #[serde(default)]
    pub select: Option<SelectOption>,
}

impl SelectProperty {
    pub fn named(name: &str) -> Self {
        Self {
            select: Some(SelectOption {
                name: name.to_string(),
            }),
        }
    }

    fn into_name(self) -> Option<String> {
        self.select.map(|s| s.name)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DateValue {
    pub start: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DateProperty {
    #[serde(default)]
    pub date: Option<DateValue>,
}

impl DateProperty {
    pub fn at(timestamp: DateTime<Utc>) -> Self {
        Self::starting(timestamp.to_rfc3339_opts(SecondsFormat::Millis, true))
    }

    pub fn on(date: NaiveDate) -> Self {
        Self::starting(date.format("%Y-%m-%d").to_string())
    }

    fn starting(start: String) -> Self {
        Self {
            date: Some(DateValue { start }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NumberProperty {
    pub number: u32,
}

// API Request Types

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TaskPageProperties {
    #[serde(rename = "Title")]
    pub title: TitleProperty,
    #[serde(rename = "Description")]
    pub description: RichTextProperty,
    #[serde(rename = "Status")]
    pub status: SelectProperty,
    #[serde(rename = "Priority")]
    pub priority: SelectProperty,
    #[serde(rename = "Created")]
    pub created: DateProperty,
    #[serde(rename = "Due Date", skip_serializing_if = "Option::is_none")]
    pub due_date: Option<DateProperty>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StudyLogProperties {
    #[serde(rename = "Subject")]
    pub subject: TitleProperty,
    #[serde(rename = "Duration")]
    pub duration: NumberProperty,
    #[serde(rename = "Date")]
    pub date: DateProperty,
    #[serde(rename = "Notes")]
    pub notes: RichTextProperty,
    #[serde(rename = "Type")]
    pub kind: SelectProperty,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatusUpdateProperties {
    #[serde(rename = "Status")]
    pub status: SelectProperty,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DatabaseParent {
    pub database_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CreatePageRequest<P> {
    pub parent: DatabaseParent,
    pub properties: P,
}

impl<P: Serialize> CreatePageRequest<P> {
    pub fn in_database(database_id: &str, properties: P) -> Self {
        Self {
            parent: DatabaseParent {
                database_id: database_id.to_string(),
            },
            properties,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UpdatePageRequest<P> {
    pub properties: P,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Ascending,
    Descending,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PropertySort {
    pub property: String,
    pub direction: SortDirection,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QueryDatabaseRequest {
    pub sorts: Vec<PropertySort>,
    pub page_size: usize,
}

impl QueryDatabaseRequest {
    /// Newest tasks first.
    pub fn recent_first(page_size: usize) -> Self {
        Self {
            sorts: vec![PropertySort {
                property: "Created".to_string(),
                direction: SortDirection::Descending,
            }],
            page_size,
        }
    }
}

// API Response Types

/// A page object. Properties that are missing or of an unexpected type
/// deserialize as `None`.
#[derive(Debug, Deserialize)]
pub struct ApiPage {
    pub id: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub properties: ApiTaskProperties,
}

#[derive(Debug, Default, Deserialize)]
pub struct ApiTaskProperties {
    #[serde(rename = "Title", default, deserialize_with = "lenient")]
    pub title: Option<TitleProperty>,
    #[serde(rename = "Status", default, deserialize_with = "lenient")]
    pub status: Option<SelectProperty>,
    #[serde(rename = "Priority", default, deserialize_with = "lenient")]
    pub priority: Option<SelectProperty>,
    #[serde(rename = "Due Date", default, deserialize_with = "lenient")]
    pub due_date: Option<DateProperty>,
}

/// Deserialize a property, yielding `None` when its shape does not match.
fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: serde::Deserializer<'de>,
    T: serde::de::DeserializeOwned,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).ok())
}

#[derive(Debug, Deserialize)]
pub struct QueryDatabaseResponse {
    #[serde(default)]
    pub results: Vec<ApiPage>,
}
