//! Error types for schema decoding and form value validation
//!
//! Every rule violation is a distinct [`Error`] variant. Callers that need to
//! branch on the failure use [`Error::kind`] instead of parsing the message.
//!
//! Copyright (c) 2025 Formfields Team
//! Licensed under the Apache-2.0 license

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Matchable category of an [`Error`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Malformed schema bytes or an unknown field type tag
    SchemaDecode,
    /// A required field has no non-empty value
    RequiredFieldMissing,
    /// A submitted value is not among the field's choice values
    InvalidChoice,
    /// An email field holds a malformed address
    InvalidEmail,
    /// A value does not match the field's `pattern` attribute
    InvalidPattern,
    /// A short text value contains a line break
    LineBreakNotAllowed,
    /// A value exceeds the field's maximum length
    TooLong,
    /// A value is shorter than the field's minimum length
    TooShort,
    /// A value is not valid for the field's input type (url, date, ...)
    InvalidFormat,
}

impl ErrorKind {
    /// Message prefix used when rendering errors of this kind
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SchemaDecode => "schema decode error",
            Self::RequiredFieldMissing => "required field missing",
            Self::InvalidChoice => "invalid choice",
            Self::InvalidEmail => "invalid email",
            Self::InvalidPattern => "invalid pattern",
            Self::LineBreakNotAllowed => "line break not allowed",
            Self::TooLong => "value too long",
            Self::TooShort => "value too short",
            Self::InvalidFormat => "invalid format",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error produced while decoding a schema or validating submitted values
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Error {
    #[error("schema decode error: {message}")]
    SchemaDecode { message: String },

    #[error("required field missing: {field} requires a value")]
    RequiredFieldMissing { field: String, label: String },

    #[error(
        "invalid choice: {field} has invalid value '{value}'. Valid choices are: [{}]",
        .choices.join(" ")
    )]
    InvalidChoice {
        field: String,
        value: String,
        choices: Vec<String>,
    },

    #[error("invalid email: {field} has invalid value '{value}'")]
    InvalidEmail { field: String, value: String },

    #[error("invalid pattern: {field} has invalid value '{value}'. Value must match {pattern}")]
    InvalidPattern {
        field: String,
        value: String,
        pattern: String,
    },

    #[error("line break not allowed: {field} has invalid value '{}'", .value.escape_default())]
    LineBreakNotAllowed { field: String, value: String },

    #[error("value too long: {field} has {actual} characters, maximum allowed is {max}")]
    TooLong {
        field: String,
        max: usize,
        actual: usize,
    },

    #[error("value too short: {field} has {actual} characters, minimum allowed is {min}")]
    TooShort {
        field: String,
        min: usize,
        actual: usize,
    },

    #[error("invalid format: {field} has invalid value '{value}'. Expected a valid {input_type}")]
    InvalidFormat {
        field: String,
        value: String,
        input_type: String,
    },
}

impl Error {
    /// Create a schema decode error
    pub fn schema_decode(message: impl Into<String>) -> Self {
        Self::SchemaDecode {
            message: message.into(),
        }
    }

    /// The category of this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::SchemaDecode { .. } => ErrorKind::SchemaDecode,
            Self::RequiredFieldMissing { .. } => ErrorKind::RequiredFieldMissing,
            Self::InvalidChoice { .. } => ErrorKind::InvalidChoice,
            Self::InvalidEmail { .. } => ErrorKind::InvalidEmail,
            Self::InvalidPattern { .. } => ErrorKind::InvalidPattern,
            Self::LineBreakNotAllowed { .. } => ErrorKind::LineBreakNotAllowed,
            Self::TooLong { .. } => ErrorKind::TooLong,
            Self::TooShort { .. } => ErrorKind::TooShort,
            Self::InvalidFormat { .. } => ErrorKind::InvalidFormat,
        }
    }

    /// Check whether this error is of the given kind
    pub fn is(&self, kind: ErrorKind) -> bool {
        self.kind() == kind
    }

    /// Name of the offending field, if the error is tied to one
    pub fn field(&self) -> Option<&str> {
        match self {
            Self::SchemaDecode { .. } => None,
            Self::RequiredFieldMissing { field, .. }
            | Self::InvalidChoice { field, .. }
            | Self::InvalidEmail { field, .. }
            | Self::InvalidPattern { field, .. }
            | Self::LineBreakNotAllowed { field, .. }
            | Self::TooLong { field, .. }
            | Self::TooShort { field, .. }
            | Self::InvalidFormat { field, .. } => Some(field),
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(error: serde_json::Error) -> Self {
        Self::schema_decode(error.to_string())
    }
}

impl From<serde_yaml::Error> for Error {
    fn from(error: serde_yaml::Error) -> Self {
        Self::schema_decode(error.to_string())
    }
}

/// Result type for decoding and validation operations
pub type Result<T> = std::result::Result<T, Error>;

/// Several validation errors collected from one submission
#[derive(Debug, Clone, Default, PartialEq, Eq, Error, Serialize)]
pub struct ValidationErrors {
    /// Errors in field order
    pub errors: Vec<Error>,
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} validation error(s) occurred:", self.errors.len())?;
        for (i, error) in self.errors.iter().enumerate() {
            write!(f, "\n{}. {}", i + 1, error)?;
        }
        Ok(())
    }
}

impl ValidationErrors {
    /// Create an empty collection
    pub fn new() -> Self {
        Self { errors: Vec::new() }
    }

    /// Add an error to the collection
    pub fn add(&mut self, error: Error) {
        self.errors.push(error);
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// The first collected error
    pub fn first(&self) -> Option<&Error> {
        self.errors.first()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Error> {
        self.errors.iter()
    }

    /// Ok if no errors were collected, Err otherwise
    pub fn into_result(self) -> std::result::Result<(), Self> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl From<Error> for ValidationErrors {
    fn from(error: Error) -> Self {
        Self {
            errors: vec![error],
        }
    }
}

impl From<Vec<Error>> for ValidationErrors {
    fn from(errors: Vec<Error>) -> Self {
        Self { errors }
    }
}

impl IntoIterator for ValidationErrors {
    type Item = Error;
    type IntoIter = std::vec::IntoIter<Error>;

    fn into_iter(self) -> Self::IntoIter {
        self.errors.into_iter()
    }
}

impl<'a> IntoIterator for &'a ValidationErrors {
    type Item = &'a Error;
    type IntoIter = std::slice::Iter<'a, Error>;

    fn into_iter(self) -> Self::IntoIter {
        self.errors.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_choice_message() {
        let error = Error::InvalidChoice {
            field: "question_1".to_string(),
            value: "Purple".to_string(),
            choices: vec!["Red".to_string(), "Green".to_string(), "Blue".to_string()],
        };
        assert_eq!(
            error.to_string(),
            "invalid choice: question_1 has invalid value 'Purple'. Valid choices are: [Red Green Blue]"
        );
        assert_eq!(error.kind(), ErrorKind::InvalidChoice);
        assert_eq!(error.field(), Some("question_1"));
    }

    #[test]
    fn test_line_break_message_is_single_line() {
        let error = Error::LineBreakNotAllowed {
            field: "short_text".to_string(),
            value: "Line1\nLine2".to_string(),
        };
        let message = error.to_string();
        assert!(!message.contains('\n'));
        assert!(message.contains("Line1\\nLine2"));
    }

    #[test]
    fn test_kind_prefixes_message() {
        let error = Error::InvalidEmail {
            field: "email".to_string(),
            value: "nope".to_string(),
        };
        assert!(error.to_string().starts_with(ErrorKind::InvalidEmail.as_str()));
        assert!(error.is(ErrorKind::InvalidEmail));
        assert!(!error.is(ErrorKind::InvalidPattern));
    }

    #[test]
    fn test_schema_decode_has_no_field() {
        let error = Error::schema_decode("unexpected end of input");
        assert_eq!(error.kind(), ErrorKind::SchemaDecode);
        assert_eq!(error.field(), None);
    }

    #[test]
    fn test_validation_errors_into_result() {
        assert!(ValidationErrors::new().into_result().is_ok());

        let errors = ValidationErrors::from(Error::schema_decode("bad"));
        assert_eq!(errors.len(), 1);
        let err = errors.into_result().unwrap_err();
        assert!(err.to_string().starts_with("1 validation error(s) occurred:"));
    }

    #[test]
    fn test_error_serializes_with_kind_tag() {
        let error = Error::TooLong {
            field: "bio".to_string(),
            max: 10,
            actual: 12,
        };
        let json = serde_json::to_value(&error).unwrap();
        assert_eq!(json["kind"], "too_long");
        assert_eq!(json["max"], 10);
    }
}
