//! Comment form and validation.

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::forms::FormErrors;

/// Maximum comment length (characters).
pub const MAX_MESSAGE_LENGTH: usize = 200;

#[derive(Debug, Clone, Default, Deserialize, Serialize, Validate)]
#[serde(default)]
pub struct CommentForm {
    #[validate(length(
        max = 200,
        message = "Ensure this value has at most 200 characters."
    ))]
    pub message: String,
}

impl CommentForm {
    /// Return the message to store, or the field errors.
    ///
    /// The length limit applies to the trimmed message.
    pub fn clean(&self) -> Result<String, FormErrors> {
        let form = Self {
            message: self.message.trim().to_string(),
        };
        let mut errors = match form.validate() {
            Ok(()) => FormErrors::new(),
            Err(e) => FormErrors::from_validation(&e),
        };
        errors.require("message", &form.message);
        errors.finish(|| form.message.clone())
    }
}
