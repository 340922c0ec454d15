//! Submitted form values
//!
//! A submission maps each field name to an ordered list of strings, the same
//! shape an HTML form produces when a name repeats (`a=1&a=2`).
//!
//! Copyright (c) 2025 Formfields Team
//! Licensed under the Apache-2.0 license

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::HashMap;

/// Field name to submitted values
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubmittedValues {
    values: HashMap<String, Vec<String>>,
}

/// Accepts `"name": "value"` as well as `"name": ["a", "b"]`
#[derive(Deserialize)]
#[serde(untagged)]
enum OneOrMany {
    One(String),
    Many(Vec<String>),
}

impl<'de> Deserialize<'de> for SubmittedValues {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = HashMap::<String, OneOrMany>::deserialize(deserializer)?;
        let values = raw
            .into_iter()
            .map(|(name, value)| match value {
                OneOrMany::One(value) => (name, vec![value]),
                OneOrMany::Many(values) => (name, values),
            })
            .collect();
        Ok(Self { values })
    }
}

impl Serialize for SubmittedValues {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.values.serialize(serializer)
    }
}

impl SubmittedValues {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse an `application/x-www-form-urlencoded` body or query string
    ///
    /// # Examples
    ///
    /// ```rust
    /// use formfields_core::SubmittedValues;
    ///
    /// let values = SubmittedValues::from_query("fruit=Apple&fruit=Durian&note=hi+there");
    /// assert_eq!(values.get("fruit"), ["Apple", "Durian"]);
    /// assert_eq!(values.get("note"), ["hi there"]);
    /// assert!(values.get("missing").is_empty());
    /// ```
    pub fn from_query(query: &str) -> Self {
        let query = query.trim().trim_start_matches('?');
        url::form_urlencoded::parse(query.as_bytes())
            .map(|(name, value)| (name.into_owned(), value.into_owned()))
            .collect()
    }

    /// Values submitted under `name`, empty if the name was not submitted
    pub fn get(&self, name: &str) -> &[String] {
        self.values.get(name).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Replace all values for `name`
    pub fn insert<I, S>(&mut self, name: impl Into<String>, values: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.values
            .insert(name.into(), values.into_iter().map(Into::into).collect());
    }

    /// Add one more value for `name`
    pub fn append(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.values.entry(name.into()).or_default().push(value.into());
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    /// Submitted names, in no particular order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl From<HashMap<String, Vec<String>>> for SubmittedValues {
    fn from(values: HashMap<String, Vec<String>>) -> Self {
        Self { values }
    }
}

impl<K, V> FromIterator<(K, V)> for SubmittedValues
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut values = Self::new();
        for (name, value) in iter {
            values.append(name, value);
        }
        values
    }
}
