//! Form error collection.
//!
//! HTML forms are deserialized as plain strings, then cleaned into typed
//! values. Anything that fails is recorded here per field so the page can
//! be re-rendered with the submitted values and messages next to inputs.

use std::collections::BTreeMap;

use serde::Serialize;
use validator::ValidationErrors;

/// Message for a blank required field.
pub const REQUIRED_MESSAGE: &str = "This field is required.";

/// Field-level and form-level validation messages.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FormErrors {
    /// Messages keyed by form field name.
    pub fields: BTreeMap<String, Vec<String>>,
    /// Messages that are not tied to a single field.
    pub non_field: Vec<String>,
}

impl FormErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Collect the messages produced by a `#[derive(Validate)]` struct.
    ///
    /// Struct-level (`__all__`) errors become non-field errors. Rules
    /// without a custom message fall back to their code.
    pub fn from_validation(errors: &ValidationErrors) -> Self {
        let mut out = Self::new();
        for (field, field_errors) in errors.field_errors() {
            for err in field_errors.iter() {
                let message = err
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| err.code.to_string());
                if field == "__all__" {
                    out.add_non_field(message);
                } else {
                    out.add(&field.to_string(), message);
                }
            }
        }
        out
    }

    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.fields
            .entry(field.to_string())
            .or_default()
            .push(message.into());
    }

    pub fn add_non_field(&mut self, message: impl Into<String>) {
        self.non_field.push(message.into());
    }

    /// Record [`REQUIRED_MESSAGE`] when `value` is empty.
    ///
    /// Returns `true` when the field was blank.
    pub fn require(&mut self, field: &str, value: &str) -> bool {
        if value.trim().is_empty() {
            self.add(field, REQUIRED_MESSAGE);
            true
        } else {
            false
        }
    }

    pub fn has_field(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }

    pub fn field(&self, field: &str) -> &[String] {
        self.fields.get(field).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Merge `other` into `self`.
    pub fn extend(&mut self, other: FormErrors) {
        for (field, messages) in other.fields {
            self.fields.entry(field).or_default().extend(messages);
        }
        self.non_field.extend(other.non_field);
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty() && self.non_field.is_empty()
    }

    /// `Ok(value)` when nothing was recorded, otherwise `Err(self)`.
    pub fn finish<T>(self, value: impl FnOnce() -> T) -> Result<T, FormErrors> {
        if self.is_empty() {
            Ok(value())
        } else {
            Err(self)
        }
    }
}
