use std::collections::BTreeMap;
use std::fmt;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::task::Task;

pub const TITLE_MAX_CHARS: usize = 255;

/// Value browsers submit for a ticked checkbox without an explicit `value`.
pub const CHECKBOX_ON: &str = "on";

/// Accepted `due_date` spellings, tried in order. `%y` precedes `%Y` since
/// chrono's `%Y` would also take a two-digit year literally.
const DATE_INPUT_FORMATS: &[&str] = &["%Y-%m-%d", "%m/%d/%y", "%m/%d/%Y"];

/// Years outside this range would not sort correctly as `YYYY-MM-DD` text.
const YEAR_RANGE: std::ops::RangeInclusive<i32> = 1..=9999;

const REQUIRED: &str = "This field is required.";
const INVALID_DATE: &str = "Enter a valid date.";

/// Raw task form as submitted by the browser.
///
/// Every field is kept as the user typed it so a rejected submission can be
/// re-rendered verbatim next to its errors.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskForm {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub due_date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed: Option<String>,
}

/// Validated field set, ready to build or rewrite a task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskFields {
    pub title: String,
    pub description: String,
    pub due_date: NaiveDate,
}

impl TaskForm {
    /// Pre-fill from an existing task for the edit page.
    pub fn from_task(task: &Task) -> Self {
        Self {
            title: task.title.clone(),
            description: task.description.clone(),
            due_date: task.due_date.format("%Y-%m-%d").to_string(),
            completed: task.completed.then(|| CHECKBOX_ON.to_string()),
        }
    }

    pub fn is_completed(&self) -> bool {
        self.completed.as_deref() == Some(CHECKBOX_ON)
    }

    pub fn validate(&self) -> Result<TaskFields, FormErrors> {
        let mut errors = FormErrors::default();

        let title = self.title.trim();
        let char_count = title.chars().count();
        if title.is_empty() {
            errors.add("title", REQUIRED);
        } else if char_count > TITLE_MAX_CHARS {
            errors.add(
                "title",
                format!(
                    "Ensure this value has at most {TITLE_MAX_CHARS} characters (it has {char_count})."
                ),
            );
        }

        let due_date = match self.due_date.trim() {
            "" => {
                errors.add("due_date", REQUIRED);
                None
            }
            raw => {
                let parsed = parse_date(raw);
                if parsed.is_none() {
                    errors.add("due_date", INVALID_DATE);
                }
                parsed
            }
        };

        match due_date {
            Some(due_date) if errors.is_empty() => Ok(TaskFields {
                title: title.to_string(),
                description: self.description.trim().to_string(),
                due_date,
            }),
            _ => Err(errors),
        }
    }
}

fn parse_date(raw: &str) -> Option<NaiveDate> {
    DATE_INPUT_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(raw, format).ok())
        .filter(|date| YEAR_RANGE.contains(&date.year()))
}

/// Field name to messages, in field-name order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FormErrors(BTreeMap<String, Vec<String>>);

impl FormErrors {
    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.0
            .entry(field.to_string())
            .or_default()
            .push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn field(&self, name: &str) -> &[String] {
        self.0.get(name).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }
}

impl fmt::Display for FormErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, messages) in self.iter() {
            for message in messages {
                if !first {
                    f.write_str("; ")?;
                }
                write!(f, "{field}: {message}")?;
                first = false;
            }
        }
        Ok(())
    }
}

impl std::error::Error for FormErrors {}
