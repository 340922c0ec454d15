//! Choice parsing for enumerated field types
//!
//! A raw choice string is either a bare value (`"Yes"`) or a value with a
//! display label (`"Maybe | I might want to go!"`). Only the value is ever
//! compared against submitted data.
//!
//! Copyright (c) 2025 Formfields Team
//! Licensed under the Apache-2.0 license

use serde::Serialize;
use std::fmt;

const SEPARATOR: char = '|';

/// A selectable value with its display label
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Choice {
    /// Value that must appear in submitted data
    pub value: String,
    /// Human readable label
    pub label: String,
}

impl Choice {
    /// Parse a raw choice string, splitting on the first `|`
    ///
    /// # Examples
    ///
    /// ```rust
    /// use formfields_core::Choice;
    ///
    /// let choice = Choice::parse("Maybe | I might want to go!");
    /// assert_eq!(choice.value, "Maybe");
    /// assert_eq!(choice.label, "I might want to go!");
    ///
    /// let bare = Choice::parse("  Yes ");
    /// assert_eq!(bare.value, "Yes");
    /// assert_eq!(bare.label, "Yes");
    /// ```
    pub fn parse(raw: &str) -> Self {
        match raw.split_once(SEPARATOR) {
            Some((value, label)) => Self {
                value: value.trim().to_string(),
                label: label.trim().to_string(),
            },
            None => {
                let value = raw.trim().to_string();
                Self {
                    label: value.clone(),
                    value,
                }
            }
        }
    }

    /// Whether the label differs from the value
    pub fn has_label(&self) -> bool {
        self.label != self.value
    }
}

impl fmt::Display for Choice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.has_label() {
            write!(f, "{} | {}", self.value, self.label)
        } else {
            f.write_str(&self.value)
        }
    }
}

/// Ordered set of choices declared by a field
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Choices(Vec<Choice>);

impl Choices {
    /// Parse every raw choice string, keeping declaration order
    pub fn parse<I, S>(raw: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self(raw.into_iter().map(|s| Choice::parse(s.as_ref())).collect())
    }

    /// Whether `value` exactly equals one of the choice values
    pub fn contains_value(&self, value: &str) -> bool {
        self.0.iter().any(|choice| choice.value == value)
    }

    /// Choice values in declaration order
    pub fn values(&self) -> Vec<String> {
        self.0.iter().map(|choice| choice.value.clone()).collect()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Choice> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<'a> IntoIterator for &'a Choices {
    type Item = &'a Choice;
    type IntoIter = std::slice::Iter<'a, Choice>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl FromIterator<Choice> for Choices {
    fn from_iter<T: IntoIterator<Item = Choice>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}
