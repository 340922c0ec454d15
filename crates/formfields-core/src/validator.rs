//! Validation engine
//!
//! Fields are checked in schema order. For each field the presence rule runs
//! first; the type rule only runs when the field is present. The default
//! policy stops at the first failing field so error messages are reproducible
//! for a given schema and submission.
//!
//! Copyright (c) 2025 Formfields Team
//! Licensed under the Apache-2.0 license

use crate::error::{Error, Result, ValidationErrors};
use crate::field::{FieldDescriptor, FieldType};
use crate::schema::FormSchema;
use crate::values::SubmittedValues;
use tracing::{debug, instrument, trace};

/// Controls error collection in [`FormSchema::collect_errors`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationConfig {
    /// Stop at the first failing field
    pub fail_fast: bool,
    /// Maximum number of errors to collect (0 = unlimited)
    pub max_errors: usize,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            fail_fast: false,
            max_errors: 0,
        }
    }
}

impl ValidationConfig {
    /// Configuration that reports only the first failing field
    pub fn first_error() -> Self {
        Self {
            fail_fast: true,
            max_errors: 0,
        }
    }

    /// Enable fail-fast mode
    pub fn with_fail_fast(mut self) -> Self {
        self.fail_fast = true;
        self
    }

    /// Set maximum number of errors to collect
    pub fn with_max_errors(mut self, max_errors: usize) -> Self {
        self.max_errors = max_errors;
        self
    }

    fn is_full(&self, collected: usize) -> bool {
        self.fail_fast || (self.max_errors > 0 && collected >= self.max_errors)
    }
}

/// Whether a field counts as submitted
///
/// Single-valued fields need exactly one entry; every field needs at least
/// one entry that is non-empty after trimming.
fn is_present(field_type: &FieldType, submitted: &[String]) -> bool {
    if field_type.is_single_valued() {
        matches!(submitted, [value] if !value.trim().is_empty())
    } else {
        submitted.iter().any(|value| !value.trim().is_empty())
    }
}

impl FieldDescriptor {
    /// Check this field against the submission: presence first, then the type rule
    pub fn validate(&self, values: &SubmittedValues) -> Result<()> {
        let submitted = values.get(&self.name);

        if !is_present(&self.field_type, submitted) {
            if self.is_required() {
                return Err(Error::RequiredFieldMissing {
                    field: self.name.clone(),
                    label: self.label.clone(),
                });
            }
            trace!(field = %self.name, "Optional field absent, skipping type rule");
            return Ok(());
        }

        trace!(
            field = %self.name,
            field_type = self.field_type.type_name(),
            values = submitted.len(),
            "Applying type rule"
        );
        self.field_type.validate(&self.name, submitted)
    }
}

impl FormSchema {
    /// Validate a submission, returning the first failing field's error
    ///
    /// # Examples
    ///
    /// ```rust
    /// use formfields_core::{ErrorKind, FormSchema, SubmittedValues};
    ///
    /// let schema = FormSchema::from_json_str(r#"[
    ///     {"label": "Colour", "name": "colour", "presence": "Required",
    ///      "type": {"type": "Dropdown", "choices": ["Red", "Green", "Blue"]}}
    /// ]"#).unwrap();
    ///
    /// let values = SubmittedValues::from_query("colour=Purple");
    /// let err = schema.validate(&values).unwrap_err();
    /// assert_eq!(err.kind(), ErrorKind::InvalidChoice);
    /// ```
    #[instrument(skip_all, fields(fields = self.len()))]
    pub fn validate(&self, values: &SubmittedValues) -> Result<()> {
        log_unknown_names(self, values);

        for field in self {
            if let Err(error) = field.validate(values) {
                debug!(field = %field.name, kind = %error.kind(), "Field failed validation");
                return Err(error);
            }
        }
        Ok(())
    }

    /// Validate a submission and collect errors, at most one per field
    #[instrument(skip_all, fields(fields = self.len(), fail_fast = config.fail_fast))]
    pub fn collect_errors(
        &self,
        values: &SubmittedValues,
        config: &ValidationConfig,
    ) -> ValidationErrors {
        log_unknown_names(self, values);

        let mut errors = ValidationErrors::new();
        for field in self {
            if let Err(error) = field.validate(values) {
                debug!(field = %field.name, kind = %error.kind(), "Field failed validation");
                errors.add(error);
                if config.is_full(errors.len()) {
                    break;
                }
            }
        }
        errors
    }
}

fn log_unknown_names(schema: &FormSchema, values: &SubmittedValues) {
    for name in values.names() {
        if schema.field(name).is_none() {
            debug!(name, "Ignoring submitted value with no matching field");
        }
    }
}

/// Decode `schema` and validate `values` against it, stopping at the first error
///
/// Schema decode failures are returned before any field is checked.
pub fn validate_form_values(schema: &[u8], values: &SubmittedValues) -> Result<()> {
    FormSchema::from_json_slice(schema)?.validate(values)
}

/// Decode `schema` and collect validation errors according to `config`
pub fn collect_form_errors(
    schema: &[u8],
    values: &SubmittedValues,
    config: &ValidationConfig,
) -> std::result::Result<(), ValidationErrors> {
    let schema = FormSchema::from_json_slice(schema).map_err(ValidationErrors::from)?;
    schema.collect_errors(values, config).into_result()
}
