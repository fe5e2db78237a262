//! To-do item forms and validation.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::forms::FormErrors;

/// Maximum title length (characters).
pub const MAX_TITLE_LENGTH: usize = 50;

/// Accepted input formats for date fields, tried in order.
///
/// The two-digit year form must come before the four-digit one: `%Y`
/// happily reads `26` as the year 26.
pub const DATE_INPUT_FORMATS: &[&str] = &["%Y-%m-%d", "%m/%d/%y", "%m/%d/%Y"];

/// Format used when a stored date is written back into a form input.
pub const DATE_OUTPUT_FORMAT: &str = "%Y-%m-%d";

const INVALID_DATE_MESSAGE: &str = "Enter a valid date.";
const END_BEFORE_START_MESSAGE: &str = "End date cannot be earlier than the start date.";

/// Submitted fields of the create form, exactly as typed.
#[derive(Debug, Clone, Default, Deserialize, Serialize, Validate)]
#[serde(default)]
pub struct TodoForm {
    #[validate(length(
        max = 50,
        message = "Ensure this value has at most 50 characters."
    ))]
    pub title: String,
    pub description: String,
    pub start_date: String,
    pub end_date: String,
}

/// Submitted fields of the update form.
///
/// `is_completed` is an HTML checkbox: present (any value) when ticked,
/// absent otherwise.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct TodoUpdateForm {
    #[serde(flatten)]
    pub fields: TodoForm,
    pub is_completed: Option<String>,
}

/// Validated to-do fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CleanTodo {
    pub title: String,
    pub description: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

impl TodoForm {
    /// Copy with surrounding whitespace removed from every field.
    pub fn trimmed(&self) -> Self {
        Self {
            title: self.title.trim().to_string(),
            description: self.description.trim().to_string(),
            start_date: self.start_date.trim().to_string(),
            end_date: self.end_date.trim().to_string(),
        }
    }

    /// Validate and convert the submitted strings.
    ///
    /// Length limits apply to the trimmed values.
    pub fn clean(&self) -> Result<CleanTodo, FormErrors> {
        let form = self.trimmed();
        let mut errors = match form.validate() {
            Ok(()) => FormErrors::new(),
            Err(e) => FormErrors::from_validation(&e),
        };

        errors.require("title", &form.title);
        errors.require("description", &form.description);
        let start_date = clean_date(&mut errors, "start_date", &form.start_date);
        let end_date = clean_date(&mut errors, "end_date", &form.end_date);

        if let (Some(start), Some(end)) = (start_date, end_date) {
            if end < start {
                errors.add("end_date", END_BEFORE_START_MESSAGE);
            }
        }

        match (start_date, end_date) {
            (Some(start_date), Some(end_date)) if errors.is_empty() => Ok(CleanTodo {
                title: form.title,
                description: form.description,
                start_date,
                end_date,
            }),
            _ => Err(errors),
        }
    }
}

impl TodoUpdateForm {
    /// Pre-fill the form from stored values.
    pub fn from_values(
        title: &str,
        description: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
        is_completed: bool,
    ) -> Self {
        Self {
            fields: TodoForm {
                title: title.to_string(),
                description: description.to_string(),
                start_date: start_date.format(DATE_OUTPUT_FORMAT).to_string(),
                end_date: end_date.format(DATE_OUTPUT_FORMAT).to_string(),
            },
            is_completed: is_completed.then(|| "on".to_string()),
        }
    }

    pub fn completed(&self) -> bool {
        // An unchecked box is never submitted; "false" comes from scripted clients.
        !matches!(self.is_completed.as_deref(), None | Some("") | Some("false"))
    }

    /// Validate and convert, returning the cleaned fields and the flag.
    pub fn clean(&self) -> Result<(CleanTodo, bool), FormErrors> {
        self.fields.clean().map(|todo| (todo, self.completed()))
    }
}

/// Parse one date field, recording a message when blank or malformed.
fn clean_date(errors: &mut FormErrors, field: &str, raw: &str) -> Option<NaiveDate> {
    if errors.require(field, raw) {
        return None;
    }
    let parsed = parse_date(raw);
    if parsed.is_none() {
        errors.add(field, INVALID_DATE_MESSAGE);
    }
    parsed
}

/// Parse a date in any of [`DATE_INPUT_FORMATS`].
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    DATE_INPUT_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(raw, fmt).ok())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
