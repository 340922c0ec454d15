//! Schema decoding
//!
//! The wire format is an ordered list of field objects. Each field carries a
//! `type` object whose own `type` key selects the [`FieldType`] variant:
//!
//! ```json
//! [
//!   {
//!     "label": "Favourite colour",
//!     "name": "colour",
//!     "presence": "Required",
//!     "description": "",
//!     "type": { "type": "Dropdown", "choices": ["Red", "Green | Leafy green"] }
//!   }
//! ]
//! ```
//!
//! Decoding goes through private raw structs so that choice strings are parsed
//! and short text attributes are compiled once, before any validation runs.
//!
//! Copyright (c) 2025 Formfields Team
//! Licensed under the Apache-2.0 license

use crate::choice::Choices;
use crate::error::{Error, Result};
use crate::field::{FieldDescriptor, FieldType, Presence, ShortText};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{BTreeMap, HashSet};
use tracing::debug;

#[derive(Debug, Deserialize)]
struct RawField {
    #[serde(default)]
    label: String,
    name: String,
    presence: Presence,
    #[serde(default)]
    description: String,
    #[serde(rename = "type")]
    field_type: RawFieldType,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type")]
enum RawFieldType {
    Dropdown {
        choices: Vec<String>,
    },
    ChooseOne {
        choices: Vec<String>,
    },
    ChooseMultiple {
        choices: Vec<String>,
    },
    LongText {
        #[serde(rename = "maxLength", default)]
        max_length: Option<usize>,
    },
    ShortText {
        #[serde(rename = "inputType", default)]
        input_type: String,
        #[serde(default)]
        attributes: BTreeMap<String, String>,
    },
}

impl TryFrom<RawFieldType> for FieldType {
    type Error = Error;

    fn try_from(raw: RawFieldType) -> Result<Self> {
        Ok(match raw {
            RawFieldType::Dropdown { choices } => FieldType::Dropdown {
                choices: Choices::parse(choices),
            },
            RawFieldType::ChooseOne { choices } => FieldType::ChooseOne {
                choices: Choices::parse(choices),
            },
            RawFieldType::ChooseMultiple { choices } => FieldType::ChooseMultiple {
                choices: Choices::parse(choices),
            },
            RawFieldType::LongText { max_length } => FieldType::LongText { max_length },
            RawFieldType::ShortText {
                input_type,
                attributes,
            } => FieldType::ShortText(ShortText::new(input_type, attributes)?),
        })
    }
}

impl TryFrom<RawField> for FieldDescriptor {
    type Error = Error;

    fn try_from(raw: RawField) -> Result<Self> {
        let field_type = FieldType::try_from(raw.field_type).map_err(|e| match e {
            Error::SchemaDecode { message } => {
                Error::schema_decode(format!("field '{}': {}", raw.name, message))
            }
            other => other,
        })?;

        Ok(Self {
            label: raw.label,
            name: raw.name,
            presence: raw.presence,
            description: raw.description,
            field_type,
        })
    }
}

/// A decoded form schema: field descriptors in declaration order
#[derive(Debug, Clone, Default, Serialize)]
#[serde(transparent)]
pub struct FormSchema {
    fields: Vec<FieldDescriptor>,
}

impl FormSchema {
    /// Build a schema from already constructed descriptors
    ///
    /// Field names key the submitted values, so duplicates are rejected.
    pub fn new(fields: Vec<FieldDescriptor>) -> Result<Self> {
        let mut seen = HashSet::new();
        for field in &fields {
            if !seen.insert(field.name.as_str()) {
                return Err(Error::schema_decode(format!(
                    "duplicate field name '{}'",
                    field.name
                )));
            }
        }
        Ok(Self { fields })
    }

    /// Decode a schema from JSON bytes
    ///
    /// # Examples
    ///
    /// ```rust
    /// use formfields_core::FormSchema;
    ///
    /// let schema = FormSchema::from_json_slice(br#"[
    ///     {"label": "Q1", "name": "q1", "presence": "Required",
    ///      "type": {"type": "ChooseOne", "choices": ["Yes", "No"]}}
    /// ]"#).unwrap();
    /// assert_eq!(schema.len(), 1);
    /// assert_eq!(schema.fields()[0].field_type.type_name(), "ChooseOne");
    /// ```
    pub fn from_json_slice(bytes: &[u8]) -> Result<Self> {
        let raw: Vec<RawField> = serde_json::from_slice(bytes)?;
        Self::from_raw(raw)
    }

    /// Decode a schema from a JSON string
    pub fn from_json_str(json: &str) -> Result<Self> {
        Self::from_json_slice(json.as_bytes())
    }

    /// Decode a schema from a YAML string with the same structure as the JSON form
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let raw: Vec<RawField> = serde_yaml::from_str(yaml)?;
        Self::from_raw(raw)
    }

    /// Decode a schema from an in-memory JSON value
    pub fn from_value(value: Value) -> Result<Self> {
        let raw: Vec<RawField> = serde_json::from_value(value)?;
        Self::from_raw(raw)
    }

    fn from_raw(raw: Vec<RawField>) -> Result<Self> {
        let fields = raw
            .into_iter()
            .map(FieldDescriptor::try_from)
            .collect::<Result<Vec<_>>>()?;
        debug!(fields = fields.len(), "Decoded form schema");
        Self::new(fields)
    }

    /// Field descriptors in declaration order
    pub fn fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }

    /// Look up a field by name
    pub fn field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|field| field.name == name)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, FieldDescriptor> {
        self.fields.iter()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl<'a> IntoIterator for &'a FormSchema {
    type Item = &'a FieldDescriptor;
    type IntoIter = std::slice::Iter<'a, FieldDescriptor>;

    fn into_iter(self) -> Self::IntoIter {
        self.fields.iter()
    }
}
