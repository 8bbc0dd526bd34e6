//! Field Validation
//!
//! Request bodies are accepted as loosely typed JSON and checked field by
//! field. Every field yields at most one [`FieldError`]; checks on a field
//! stop at the first failure.
//!
//! ```rust
//! use kernel::validation::Validator;
//! use serde_json::json;
//!
//! let body = json!({ "name": "  " });
//! let mut v = Validator::new();
//! let name = v.field("name", body.get("name")).string().trim().not_empty().max_len(15).done();
//! assert!(name.is_none());
//! assert!(v.finish().is_err());
//! ```

use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::app_error::{AppError, AppResult};

/// A single rejected field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub message: String,
    pub field: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            field: field.into(),
        }
    }
}

/// `{"errorsMessages": [...]}` response body
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorsMessages {
    pub errors_messages: Vec<FieldError>,
}

/// Collects field errors across a request body
#[derive(Debug, Default)]
pub struct Validator {
    errors: Vec<FieldError>,
}

impl Validator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start checking a field. `value` is the raw JSON value, if present.
    pub fn field<'a>(&'a mut self, name: &'static str, value: Option<&'a Value>) -> FieldCheck<'a> {
        FieldCheck {
            validator: self,
            name,
            raw: value.filter(|v| !v.is_null()),
            text: None,
            error: None,
        }
    }

    /// Record an error produced outside of a [`FieldCheck`] chain
    pub fn push(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors.push(FieldError::new(field, message));
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// `Err(400 + errorsMessages)` if any field failed
    pub fn finish(self) -> AppResult<()> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(AppError::validation(self.errors))
        }
    }
}

/// Fluent checks for one field
pub struct FieldCheck<'a> {
    validator: &'a mut Validator,
    name: &'static str,
    raw: Option<&'a Value>,
    text: Option<String>,
    error: Option<String>,
}

impl<'a> FieldCheck<'a> {
    fn fail(mut self, message: String) -> Self {
        if self.error.is_none() {
            self.error = Some(message);
        }
        self
    }

    fn failed(&self) -> bool {
        self.error.is_some()
    }

    /// The field must be present and be a JSON string
    pub fn string(self) -> Self {
        if self.failed() {
            return self;
        }
        let raw = self.raw;
        match raw {
            None => {
                let message = format!("{} is required", self.name);
                self.fail(message)
            }
            Some(Value::String(s)) => {
                let text = s.clone();
                let mut this = self;
                this.text = Some(text);
                this
            }
            Some(_) => {
                let message = format!("{} must be a string", self.name);
                self.fail(message)
            }
        }
    }

    pub fn trim(mut self) -> Self {
        if let Some(text) = self.text.take() {
            self.text = Some(text.trim().to_string());
        }
        self
    }

    pub fn not_empty(self) -> Self {
        if self.failed() {
            return self;
        }
        if self.text.as_deref().is_some_and(str::is_empty) {
            let message = format!("{} should not be empty", self.name);
            return self.fail(message);
        }
        self
    }

    /// Inclusive bounds, counted in characters
    pub fn length(self, min: usize, max: usize) -> Self {
        if self.failed() {
            return self;
        }
        let len = self.text.as_deref().map(|t| t.chars().count()).unwrap_or(0);
        if len < min || len > max {
            let message = format!("{} length should be from {} to {}", self.name, min, max);
            return self.fail(message);
        }
        self
    }

    pub fn max_len(self, max: usize) -> Self {
        if self.failed() {
            return self;
        }
        let len = self.text.as_deref().map(|t| t.chars().count()).unwrap_or(0);
        if len > max {
            let message = format!("{} length should be at most {}", self.name, max);
            return self.fail(message);
        }
        self
    }

    pub fn matches(self, pattern: &Regex) -> Self {
        if self.failed() {
            return self;
        }
        if !self.text.as_deref().is_some_and(|t| pattern.is_match(t)) {
            let message = format!("{} has invalid format", self.name);
            return self.fail(message);
        }
        self
    }

    pub fn one_of(self, allowed: &[&str]) -> Self {
        if self.failed() {
            return self;
        }
        if !self.text.as_deref().is_some_and(|t| allowed.contains(&t)) {
            let message = format!("{} should be one of: {}", self.name, allowed.join(", "));
            return self.fail(message);
        }
        self
    }

    /// Finish the chain, returning the checked value on success
    pub fn done(self) -> Option<String> {
        match self.error {
            Some(message) => {
                self.validator.push(self.name, message);
                None
            }
            None => self.text,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_missing_field_is_required() {
        let body = json!({});
        let mut v = Validator::new();
        assert!(v.field("title", body.get("title")).string().done().is_none());
        let err = v.finish().unwrap_err();
        assert_eq!(err.field_errors()[0].field, "title");
    }

    #[test]
    fn test_null_is_missing() {
        let body = json!({ "title": null });
        let mut v = Validator::new();
        assert!(v.field("title", body.get("title")).string().done().is_none());
        assert!(v.has_errors());
    }

    #[test]
    fn test_non_string_rejected() {
        let body = json!({ "title": 42 });
        let mut v = Validator::new();
        v.field("title", body.get("title")).string().done();
        let err = v.finish().unwrap_err();
        assert_eq!(err.field_errors()[0].message, "title must be a string");
    }

    #[test]
    fn test_trim_then_not_empty() {
        let body = json!({ "name": "   " });
        let mut v = Validator::new();
        v.field("name", body.get("name")).string().trim().not_empty().done();
        assert!(v.has_errors());
    }

    #[test]
    fn test_one_error_per_field() {
        let body = json!({ "name": "" });
        let mut v = Validator::new();
        v.field("name", body.get("name"))
            .string()
            .not_empty()
            .length(3, 10)
            .done();
        let err = v.finish().unwrap_err();
        assert_eq!(err.field_errors().len(), 1);
    }

    #[test]
    fn test_length_counts_characters() {
        let body = json!({ "login": "ålpha" });
        let mut v = Validator::new();
        let login = v.field("login", body.get("login")).string().length(3, 5).done();
        assert_eq!(login.as_deref(), Some("ålpha"));
    }

    #[test]
    fn test_matches_and_one_of() {
        let re = Regex::new(r"^[a-z]+$").unwrap();
        let body = json!({ "a": "abc", "b": "ABC", "c": "Like", "d": "Love" });
        let mut v = Validator::new();
        assert!(v.field("a", body.get("a")).string().matches(&re).done().is_some());
        assert!(v.field("b", body.get("b")).string().matches(&re).done().is_none());
        assert!(v.field("c", body.get("c")).string().one_of(&["Like", "None"]).done().is_some());
        assert!(v.field("d", body.get("d")).string().one_of(&["Like", "None"]).done().is_none());
        let err = v.finish().unwrap_err();
        let fields: Vec<_> = err.field_errors().iter().map(|e| e.field.as_str()).collect();
        assert_eq!(fields, vec!["b", "d"]);
    }

    #[test]
    fn test_errors_messages_shape() {
        let body = ErrorsMessages {
            errors_messages: vec![FieldError::new("name", "bad")],
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["errorsMessages"][0]["field"], "name");
        assert_eq!(json["errorsMessages"][0]["message"], "bad");
    }
}
