use serde::{Deserialize, Serialize};

/// What went wrong while rendering a filing. The context names what was being done, e.g. the
/// element and page being drawn or the file being read, and `source_error` keeps the message of
/// the failure underneath, so that nested errors print as one line:
/// `Failed to draw element 3 of page 2: the font "Garamond" is neither a standard font ...`.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct ContextError {
    pub context: String,
    pub source_error: Option<String>,
}

impl std::fmt::Display for ContextError {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.source_error {
            Some(source_error) => write!(
                formatter,
                "{}: {}",
                self.context,
                lowercase_first_letter(source_error)
            ),
            None => write!(formatter, "{}", self.context),
        }
    }
}

impl std::error::Error for ContextError {}

impl ContextError {
    /// An error that is not caused by another one, such as an invalid line number.
    pub fn with_context<S: Into<String>>(context: S) -> ContextError {
        ContextError {
            context: context.into(),
            source_error: None,
        }
    }

    /// Wraps the error of a lower layer (I/O, JSON, PDF parsing or another `ContextError`).
    pub fn with_error<S: Into<String>>(context: S, error: &dyn std::error::Error) -> ContextError {
        ContextError {
            context: context.into(),
            source_error: Some(error.to_string()),
        }
    }
}

fn lowercase_first_letter(message: &str) -> String {
    let mut characters = message.chars();
    match characters.next() {
        None => String::new(),
        Some(character) => character.to_lowercase().chain(characters).collect(),
    }
}
