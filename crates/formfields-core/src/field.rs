//! Field descriptors and the per-type validation rules
//!
//! [`FieldType`] is a closed set of variants. Each variant owns its rule in
//! [`FieldType::validate`], which is only called once the engine has decided
//! the field is present in the submission.
//!
//! Copyright (c) 2025 Formfields Team
//! Licensed under the Apache-2.0 license

use crate::choice::Choices;
use crate::error::{Error, Result};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::OnceLock;

/// Attribute keys with validation meaning on short text fields
pub mod attr {
    pub const TYPE: &str = "type";
    pub const PATTERN: &str = "pattern";
    pub const MAX_LENGTH: &str = "maxlength";
    pub const MIN_LENGTH: &str = "minlength";
    pub const MULTIPLE: &str = "multiple";
}

static COLOR_REGEX: OnceLock<Regex> = OnceLock::new();
static DATE_REGEX: OnceLock<Regex> = OnceLock::new();
static TIME_REGEX: OnceLock<Regex> = OnceLock::new();
static DATETIME_REGEX: OnceLock<Regex> = OnceLock::new();
static NUMBER_REGEX: OnceLock<Regex> = OnceLock::new();

fn color_regex() -> &'static Regex {
    COLOR_REGEX.get_or_init(|| Regex::new(r"^#[0-9a-fA-F]{6}$").expect("color regex is valid"))
}

/// `YYYY-MM-DD`, zero padded, no sign
fn date_regex() -> &'static Regex {
    DATE_REGEX.get_or_init(|| Regex::new(r"^[0-9]{4}-[0-9]{2}-[0-9]{2}$").expect("date regex is valid"))
}

/// `HH:MM[:SS]`; seconds stop at 59
fn time_regex() -> &'static Regex {
    TIME_REGEX.get_or_init(|| {
        Regex::new(r"^[0-9]{2}:[0-9]{2}(:[0-5][0-9])?$").expect("time regex is valid")
    })
}

fn datetime_regex() -> &'static Regex {
    DATETIME_REGEX.get_or_init(|| {
        Regex::new(r"^[0-9]{4}-[0-9]{2}-[0-9]{2}T[0-9]{2}:[0-9]{2}(:[0-5][0-9])?$")
            .expect("datetime regex is valid")
    })
}

/// HTML valid floating-point number: optional `-`, no `+`, no trailing `.`
fn number_regex() -> &'static Regex {
    NUMBER_REGEX.get_or_init(|| {
        Regex::new(r"^-?([0-9]+|[0-9]*\.[0-9]+)([eE][-+]?[0-9]+)?$").expect("number regex is valid")
    })
}

/// Whether a field must be submitted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Presence {
    Required,
    Optional,
}

impl Presence {
    pub fn is_required(&self) -> bool {
        matches!(self, Self::Required)
    }
}

impl fmt::Display for Presence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Required => f.write_str("Required"),
            Self::Optional => f.write_str("Optional"),
        }
    }
}

/// A decoded schema entry
#[derive(Debug, Clone, Serialize)]
pub struct FieldDescriptor {
    pub label: String,
    /// Key into the submitted values
    pub name: String,
    pub presence: Presence,
    pub description: String,
    #[serde(rename = "type")]
    pub field_type: FieldType,
}

impl FieldDescriptor {
    pub fn is_required(&self) -> bool {
        self.presence.is_required()
    }
}

/// The closed set of field types
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type")]
pub enum FieldType {
    Dropdown { choices: Choices },
    ChooseOne { choices: Choices },
    ChooseMultiple { choices: Choices },
    LongText {
        #[serde(rename = "maxLength", skip_serializing_if = "Option::is_none")]
        max_length: Option<usize>,
    },
    ShortText(ShortText),
}

impl FieldType {
    /// Schema tag of this variant
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Dropdown { .. } => "Dropdown",
            Self::ChooseOne { .. } => "ChooseOne",
            Self::ChooseMultiple { .. } => "ChooseMultiple",
            Self::LongText { .. } => "LongText",
            Self::ShortText(_) => "ShortText",
        }
    }

    /// Fields that accept exactly one submitted entry
    pub fn is_single_valued(&self) -> bool {
        matches!(self, Self::Dropdown { .. } | Self::ChooseOne { .. })
    }

    /// Choices declared by the field, if it is an enumerated type
    pub fn choices(&self) -> Option<&Choices> {
        match self {
            Self::Dropdown { choices }
            | Self::ChooseOne { choices }
            | Self::ChooseMultiple { choices } => Some(choices),
            Self::LongText { .. } | Self::ShortText(_) => None,
        }
    }

    /// Apply this type's rule to the values submitted for `field`
    pub fn validate(&self, field: &str, values: &[String]) -> Result<()> {
        match self {
            // Dropdown and ChooseOne share one rule
            Self::Dropdown { choices } | Self::ChooseOne { choices } => {
                validate_choices(field, choices, values)
            }
            Self::ChooseMultiple { choices } => validate_choices(field, choices, values),
            Self::LongText { max_length } => validate_long_text(field, *max_length, values),
            Self::ShortText(short_text) => short_text.validate(field, values),
        }
    }
}

fn validate_choices(field: &str, choices: &Choices, values: &[String]) -> Result<()> {
    for value in values {
        if !choices.contains_value(value) {
            return Err(Error::InvalidChoice {
                field: field.to_string(),
                value: value.clone(),
                choices: choices.values(),
            });
        }
    }
    Ok(())
}

fn validate_long_text(field: &str, max_length: Option<usize>, values: &[String]) -> Result<()> {
    let Some(max) = max_length else {
        return Ok(());
    };
    for value in values {
        let actual = value.chars().count();
        if actual > max {
            return Err(Error::TooLong {
                field: field.to_string(),
                max,
                actual,
            });
        }
    }
    Ok(())
}

/// Single-line text input with HTML-style attributes
#[derive(Debug, Clone, Serialize)]
pub struct ShortText {
    #[serde(rename = "inputType")]
    pub input_type: String,
    /// All declared attributes, including ones without validation meaning
    pub attributes: BTreeMap<String, String>,
    #[serde(skip)]
    pattern: Option<Regex>,
    #[serde(skip)]
    max_length: Option<usize>,
    #[serde(skip)]
    min_length: Option<usize>,
}

impl ShortText {
    /// Build a short text field, compiling the `pattern` and length attributes
    pub fn new(input_type: impl Into<String>, attributes: BTreeMap<String, String>) -> Result<Self> {
        let pattern = attributes
            .get(attr::PATTERN)
            .map(|pattern| {
                Regex::new(pattern).map_err(|e| {
                    Error::schema_decode(format!("invalid pattern '{}': {}", pattern, e))
                })
            })
            .transpose()?;
        let max_length = parse_length(&attributes, attr::MAX_LENGTH)?;
        let min_length = parse_length(&attributes, attr::MIN_LENGTH)?;

        Ok(Self {
            input_type: input_type.into(),
            attributes,
            pattern,
            max_length,
            min_length,
        })
    }

    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).map(String::as_str)
    }

    /// The HTML `type` attribute, defaulting to `text`
    pub fn html_type(&self) -> &str {
        self.attribute(attr::TYPE).unwrap_or("text")
    }

    /// Whether the field accepts a comma-separated list
    pub fn is_multiple(&self) -> bool {
        self.attribute(attr::MULTIPLE) == Some("true")
    }

    pub fn pattern(&self) -> Option<&Regex> {
        self.pattern.as_ref()
    }

    pub fn max_length(&self) -> Option<usize> {
        self.max_length
    }

    pub fn min_length(&self) -> Option<usize> {
        self.min_length
    }

    /// Validate submitted values; line breaks are rejected before any other rule
    pub fn validate(&self, field: &str, values: &[String]) -> Result<()> {
        if let Some(value) = values.iter().find(|v| v.contains(|c: char| c == '\n' || c == '\r')) {
            return Err(Error::LineBreakNotAllowed {
                field: field.to_string(),
                value: value.clone(),
            });
        }

        for value in values {
            self.validate_length(field, value)?;
        }

        match self.html_type() {
            "email" => self.validate_emails(field, values)?,
            input_type => {
                for value in values {
                    validate_format(field, input_type, value)?;
                }
            }
        }

        if let Some(pattern) = &self.pattern {
            for value in values {
                if !pattern.is_match(value) {
                    return Err(Error::InvalidPattern {
                        field: field.to_string(),
                        value: value.clone(),
                        pattern: pattern.as_str().to_string(),
                    });
                }
            }
        }

        Ok(())
    }

    fn validate_length(&self, field: &str, value: &str) -> Result<()> {
        let actual = value.chars().count();
        if let Some(max) = self.max_length {
            if actual > max {
                return Err(Error::TooLong {
                    field: field.to_string(),
                    max,
                    actual,
                });
            }
        }
        if let Some(min) = self.min_length {
            if actual < min {
                return Err(Error::TooShort {
                    field: field.to_string(),
                    min,
                    actual,
                });
            }
        }
        Ok(())
    }

    fn validate_emails(&self, field: &str, values: &[String]) -> Result<()> {
        let invalid = |value: &str| Error::InvalidEmail {
            field: field.to_string(),
            value: value.to_string(),
        };

        if self.is_multiple() {
            for value in values {
                if let Some(segment) = value.split(',').map(str::trim).find(|s| !is_valid_email(s)) {
                    return Err(invalid(segment));
                }
            }
            return Ok(());
        }

        match values {
            [value] if is_valid_email(value) => Ok(()),
            [value] => Err(invalid(value.as_str())),
            _ => Err(invalid(values.join(",").as_str())),
        }
    }
}

fn parse_length(attributes: &BTreeMap<String, String>, key: &str) -> Result<Option<usize>> {
    attributes
        .get(key)
        .map(|raw| {
            raw.trim().parse::<usize>().map_err(|_| {
                Error::schema_decode(format!(
                    "attribute '{}' must be a non-negative integer, found '{}'",
                    key, raw
                ))
            })
        })
        .transpose()
}

/// Check `local@domain` syntax: one `@`, no whitespace, dotted domain
pub fn is_valid_email(value: &str) -> bool {
    if value.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = value.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') || !domain.contains('.') {
        return false;
    }
    domain.split('.').all(|label| !label.is_empty())
}

/// Format check for HTML input types with a well-defined value syntax
fn validate_format(field: &str, input_type: &str, value: &str) -> Result<()> {
    let valid = match input_type {
        "url" => url::Url::parse(value).is_ok(),
        "date" => {
            date_regex().is_match(value) && NaiveDate::parse_from_str(value, "%Y-%m-%d").is_ok()
        }
        "time" => {
            time_regex().is_match(value)
                && (NaiveTime::parse_from_str(value, "%H:%M").is_ok()
                    || NaiveTime::parse_from_str(value, "%H:%M:%S").is_ok())
        }
        "datetime-local" => {
            datetime_regex().is_match(value)
                && (NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M").is_ok()
                    || NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S").is_ok())
        }
        "color" => color_regex().is_match(value),
        "number" => {
            number_regex().is_match(value)
                && value.parse::<f64>().map(f64::is_finite).unwrap_or(false)
        }
        _ => true,
    };

    if valid {
        Ok(())
    } else {
        Err(Error::InvalidFormat {
            field: field.to_string(),
            value: value.to_string(),
            input_type: input_type.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    fn short_text(pairs: &[(&str, &str)]) -> ShortText {
        let attributes = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ShortText::new("Single-line free text", attributes).unwrap()
    }

    fn values(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_email_syntax() {
        assert!(is_valid_email("alice@example.com"));
        assert!(is_valid_email("a.b+c@mail.example.co"));
        assert!(!is_valid_email("invalid-email"));
        assert!(!is_valid_email("alice@localhost"));
        assert!(!is_valid_email("@example.com"));
        assert!(!is_valid_email("alice@.com"));
        assert!(!is_valid_email("alice@example."));
        assert!(!is_valid_email("al ice@example.com"));
        assert!(!is_valid_email("a@b@example.com"));
        assert!(!is_valid_email(""));
    }

    #[test]
    fn test_line_break_wins_over_pattern() {
        let field = short_text(&[("type", "text"), ("pattern", "^[0-9]{3}$")]);
        let err = field.validate("f", &values(&["12\n3"])).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::LineBreakNotAllowed);
    }

    #[test]
    fn test_carriage_return_rejected() {
        let field = short_text(&[("type", "text")]);
        let err = field.validate("f", &values(&["a\r\nb"])).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::LineBreakNotAllowed);
    }

    #[test]
    fn test_pattern_is_not_auto_anchored() {
        let field = short_text(&[("pattern", "[0-9]{3}")]);
        assert!(field.validate("f", &values(&["ab123cd"])).is_ok());

        let anchored = short_text(&[("pattern", "^[0-9]{3}$")]);
        let err = anchored.validate("f", &values(&["ab123cd"])).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidPattern);
    }

    #[test]
    fn test_invalid_pattern_is_decode_error() {
        let attributes = BTreeMap::from([("pattern".to_string(), "([a-z".to_string())]);
        let err = ShortText::new("Text", attributes).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::SchemaDecode);
    }

    #[test]
    fn test_length_attributes() {
        let field = short_text(&[("maxlength", "9"), ("minlength", "9")]);
        assert!(field.validate("f", &values(&["S1234567A"])).is_ok());
        assert_eq!(
            field.validate("f", &values(&["S1234567AB"])).unwrap_err().kind(),
            ErrorKind::TooLong
        );
        assert_eq!(
            field.validate("f", &values(&["S12"])).unwrap_err().kind(),
            ErrorKind::TooShort
        );
    }

    #[test]
    fn test_non_numeric_length_is_decode_error() {
        let attributes = BTreeMap::from([("maxlength".to_string(), "nine".to_string())]);
        assert!(ShortText::new("Text", attributes).is_err());
    }

    #[test]
    fn test_single_email_rejects_multiple_values() {
        let field = short_text(&[("type", "email")]);
        let err = field
            .validate("f", &values(&["a@x.com", "b@x.com"]))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidEmail);
    }

    #[test]
    fn test_multiple_emails_report_offending_segment() {
        let field = short_text(&[("type", "email"), ("multiple", "true")]);
        assert!(field.validate("f", &values(&["a@x.com, b@x.com"])).is_ok());

        let err = field
            .validate("f", &values(&["a@x.com,not-an-email"]))
            .unwrap_err();
        assert_eq!(
            err,
            Error::InvalidEmail {
                field: "f".to_string(),
                value: "not-an-email".to_string(),
            }
        );
    }

    #[test]
    fn test_format_checks() {
        let cases = [
            ("url", "ftp://example.com", true),
            ("url", "example.com", false),
            ("date", "2024-09-19", true),
            ("date", "2024-02-30", false),
            ("time", "19:18", true),
            ("time", "19:18:05", true),
            ("time", "25:00", false),
            ("datetime-local", "2024-09-19T21:01", true),
            ("datetime-local", "2024-09-19 21:01", false),
            ("color", "#000000", true),
            ("color", "#00000g", false),
            ("number", "3.14", true),
            ("number", "NaN", false),
            ("number", "-1.5e3", true),
            ("number", ".5", true),
            ("number", "+1", false),
            ("number", "5.", false),
            ("number", " 1", false),
            ("number", "1e400", false),
            ("date", "2024-9-1", false),
            ("date", "+2024-09-19", false),
            ("date", "24-09-19", false),
            ("time", "9:5", false),
            ("time", "19:18:60", false),
            ("time", "19:18:59", true),
            ("datetime-local", "2024-9-19T9:01", false),
            ("datetime-local", "2024-09-19T21:01:60", false),
            ("datetime-local", "2024-09-19T21:01:30", true),
            ("tel", "123", true),
            ("text", "anything", true),
        ];
        for (input_type, value, expected) in cases {
            let field = short_text(&[("type", input_type)]);
            assert_eq!(
                field.validate("f", &values(&[value])).is_ok(),
                expected,
                "{} / {}",
                input_type,
                value
            );
        }
    }

    #[test]
    fn test_long_text_accepts_crlf_and_checks_length() {
        let field = FieldType::LongText {
            max_length: Some(10),
        };
        assert!(field.validate("f", &values(&["a\r\nb"])).is_ok());
        let err = field.validate("f", &values(&["0123456789x"])).unwrap_err();
        assert_eq!(
            err,
            Error::TooLong {
                field: "f".to_string(),
                max: 10,
                actual: 11,
            }
        );
    }

    #[test]
    fn test_long_text_length_counts_characters() {
        let field = FieldType::LongText {
            max_length: Some(3),
        };
        assert!(field.validate("f", &values(&["héé"])).is_ok());
    }

    #[test]
    fn test_choose_multiple_checks_duplicates_independently() {
        let field = FieldType::ChooseMultiple {
            choices: Choices::parse(["A", "B"]),
        };
        assert!(field.validate("f", &values(&["A", "A", "B"])).is_ok());
        let err = field.validate("f", &values(&["A", "C"])).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidChoice);
    }

    #[test]
    fn test_dropdown_and_choose_one_share_rule() {
        let choices = Choices::parse(["Yes", "No"]);
        let dropdown = FieldType::Dropdown {
            choices: choices.clone(),
        };
        let choose_one = FieldType::ChooseOne { choices };
        for value in ["Yes", "no", "Maybe"] {
            assert_eq!(
                dropdown.validate("f", &values(&[value])),
                choose_one.validate("f", &values(&[value]))
            );
        }
        assert!(dropdown.is_single_valued());
        assert!(choose_one.is_single_valued());
    }
}
