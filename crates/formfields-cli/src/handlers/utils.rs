//! Shared utilities for command handlers

use crate::error::{Error, Result};
use formfields_core::{FormSchema, SubmittedValues};
use std::fs;
use std::path::Path;
use tracing::debug;

/// Input file kinds, decided by extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FileKind {
    Json,
    Yaml,
    Query,
}

fn file_kind(path: &Path) -> FileKind {
    match path.extension().and_then(|s| s.to_str()) {
        Some("yaml") | Some("yml") => FileKind::Yaml,
        Some("txt") | Some("query") => FileKind::Query,
        _ => FileKind::Json,
    }
}

fn read_existing(path: &Path) -> Result<String> {
    if !path.exists() {
        return Err(Error::FileNotFound {
            path: path.to_path_buf(),
        });
    }
    let content = fs::read_to_string(path)?;
    debug!(path = %path.display(), bytes = content.len(), "File read successfully");
    Ok(content)
}

/// Load and decode a form schema from a JSON or YAML file
pub fn load_schema(path: &Path) -> Result<FormSchema> {
    let content = read_existing(path)?;

    let schema = match file_kind(path) {
        FileKind::Yaml => FormSchema::from_yaml_str(&content)?,
        FileKind::Json => FormSchema::from_json_str(&content)?,
        FileKind::Query => {
            return Err(Error::InvalidFormat {
                path: path.to_path_buf(),
                expected: "a JSON or YAML form schema".to_string(),
                reason: "query files hold submitted values, not schemas".to_string(),
            })
        }
    };

    Ok(schema)
}

/// Load submitted values from a JSON/YAML mapping or a urlencoded query file
pub fn load_values(path: &Path) -> Result<SubmittedValues> {
    let content = read_existing(path)?;

    let values = match file_kind(path) {
        FileKind::Query => SubmittedValues::from_query(&content),
        FileKind::Yaml => serde_yaml::from_str(&content).map_err(|e| Error::InvalidFormat {
            path: path.to_path_buf(),
            expected: "a YAML mapping of field names to strings or lists of strings".to_string(),
            reason: e.to_string(),
        })?,
        FileKind::Json => serde_json::from_str(&content).map_err(|e| Error::InvalidFormat {
            path: path.to_path_buf(),
            expected: "a JSON object of field names to strings or lists of strings".to_string(),
            reason: e.to_string(),
        })?,
    };

    Ok(values)
}
