//! Output formatting and writing utilities
//!
//! This module provides utilities for formatting and writing output
//! in various formats (JSON, YAML, human-readable), with specialized
//! support for validation errors and decoded form schemas.

use crate::cli::OutputFormat;
use crate::error::Result;
use colored::Colorize;
use formfields_core::{FieldType, FormSchema, ValidationErrors};
use serde::Serialize;
use std::io::{self, Write};
use tracing::debug;

/// Trait for formatting output with specialized support for common types
pub trait OutputFormatter {
    /// Format a serializable value
    fn format<T: Serialize>(&self, value: &T) -> Result<String>;

    /// Format validation errors, one entry per failing field
    fn format_validation_errors(&self, errors: &ValidationErrors) -> Result<String>;

    /// Format a decoded form schema
    fn format_schema(&self, schema: &FormSchema) -> Result<String>;
}

impl OutputFormatter for OutputFormat {
    fn format<T: Serialize>(&self, value: &T) -> Result<String> {
        match self {
            OutputFormat::Json => Ok(serde_json::to_string(value)?),
            OutputFormat::JsonPretty => Ok(serde_json::to_string_pretty(value)?),
            OutputFormat::Yaml => Ok(serde_yaml::to_string(value)?),
            // For human format, use pretty JSON as fallback
            OutputFormat::Human => Ok(serde_json::to_string_pretty(value)?),
        }
    }

    fn format_validation_errors(&self, errors: &ValidationErrors) -> Result<String> {
        match self {
            OutputFormat::Human => Ok(format_validation_errors_human(errors)),
            _ => self.format(&ValidationReport::from(errors)),
        }
    }

    fn format_schema(&self, schema: &FormSchema) -> Result<String> {
        match self {
            OutputFormat::Human => Ok(format_schema_human(schema)),
            _ => self.format(schema),
        }
    }
}

/// Machine-readable validation outcome
#[derive(Debug, Serialize)]
struct ValidationReport<'a> {
    valid: bool,
    errors: Vec<ReportedError<'a>>,
}

#[derive(Debug, Serialize)]
struct ReportedError<'a> {
    /// Rendered message; the flattened error may carry its own `message` field
    #[serde(rename = "error")]
    rendered: String,
    #[serde(flatten)]
    error: &'a formfields_core::Error,
}

impl<'a> From<&'a ValidationErrors> for ValidationReport<'a> {
    fn from(errors: &'a ValidationErrors) -> Self {
        Self {
            valid: errors.is_empty(),
            errors: errors
                .iter()
                .map(|error| ReportedError {
                    rendered: error.to_string(),
                    error,
                })
                .collect(),
        }
    }
}

/// Output writer that handles different output formats and colors
pub struct OutputWriter {
    format: OutputFormat,
    use_color: bool,
    quiet: bool,
    writer: Box<dyn Write>,
}

impl OutputWriter {
    /// Create a new output writer
    pub fn new(format: OutputFormat, use_color: bool, quiet: bool) -> Self {
        Self::with_writer(format, use_color, quiet, Box::new(io::stdout()))
    }

    /// Create an output writer with a custom writer
    pub fn with_writer(
        format: OutputFormat,
        use_color: bool,
        quiet: bool,
        writer: Box<dyn Write>,
    ) -> Self {
        Self {
            format,
            use_color,
            quiet,
            writer,
        }
    }

    /// Write raw output
    pub fn write(&mut self, content: &str) -> Result<()> {
        write!(self.writer, "{}", content)?;
        self.writer.flush()?;
        Ok(())
    }

    /// Write a line of output
    pub fn writeln(&mut self, content: &str) -> Result<()> {
        writeln!(self.writer, "{}", content)?;
        self.writer.flush()?;
        Ok(())
    }

    /// Write an info message
    pub fn info(&mut self, message: &str) -> Result<()> {
        debug!("Output info: {}", message);

        if self.quiet || self.format != OutputFormat::Human {
            return Ok(());
        }

        if self.use_color {
            self.writeln(&format!("{} {}", "ℹ".blue(), message))
        } else {
            self.writeln(&format!("INFO: {}", message))
        }
    }

    /// Write a success message
    pub fn success(&mut self, message: &str) -> Result<()> {
        if self.quiet || self.format != OutputFormat::Human {
            return Ok(());
        }

        if self.use_color {
            self.writeln(&message.green().to_string())
        } else {
            self.writeln(message)
        }
    }

    /// Write a section header
    pub fn section(&mut self, title: &str) -> Result<()> {
        if self.quiet || self.format != OutputFormat::Human {
            return Ok(());
        }

        self.writeln("")?;
        if self.use_color {
            self.writeln(&format!("═══ {} ═══", title).bright_blue().to_string())
        } else {
            self.writeln(&format!("=== {} ===", title))
        }
    }

    /// Whether output goes to a JSON or YAML consumer
    pub fn is_machine(&self) -> bool {
        self.format != OutputFormat::Human
    }

    /// Write validation errors with specialized formatting
    ///
    /// Machine formats are written even in quiet mode, and an empty error
    /// list renders as a `valid: true` report.
    pub fn validation_errors(&mut self, errors: &ValidationErrors) -> Result<()> {
        if self.format == OutputFormat::Human && errors.is_empty() {
            return Ok(());
        }
        let formatted = self.format.format_validation_errors(errors)?;
        self.write_formatted(&formatted)
    }

    /// Write a decoded schema with specialized formatting
    pub fn schema(&mut self, schema: &FormSchema) -> Result<()> {
        let formatted = self.format.format_schema(schema)?;
        self.write_formatted(&formatted)
    }

    fn write_formatted(&mut self, formatted: &str) -> Result<()> {
        if formatted.ends_with('\n') {
            self.write(formatted)
        } else {
            self.writeln(formatted)
        }
    }
}

/// Format validation errors for human reading
fn format_validation_errors_human(errors: &ValidationErrors) -> String {
    let mut output = String::new();

    output.push_str(&format!("✗ Validation failed - {} error(s)\n", errors.len()));

    for (i, error) in errors.iter().enumerate() {
        output.push_str(&format!("  {}. [{}] {}\n", i + 1, error.kind(), error));
    }

    output
}

/// Format a decoded schema as a table of fields
fn format_schema_human(schema: &FormSchema) -> String {
    let headers = ["NAME", "TYPE", "PRESENCE", "LABEL", "RULES"];
    let rows: Vec<[String; 5]> = schema
        .iter()
        .map(|field| {
            [
                field.name.clone(),
                field.field_type.type_name().to_string(),
                field.presence.to_string(),
                field.label.clone(),
                describe_rules(&field.field_type),
            ]
        })
        .collect();

    let mut widths = headers.map(|h| h.chars().count());
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let render = |cells: &[String]| {
        cells
            .iter()
            .zip(widths)
            .map(|(cell, width)| format!("{:width$}", cell, width = width))
            .collect::<Vec<_>>()
            .join(" │ ")
            .trim_end()
            .to_string()
    };

    let mut output = String::new();
    output.push_str(&format!("{} field(s)\n", schema.len()));
    output.push_str(&render(&headers.map(String::from)));
    output.push('\n');
    output.push_str(
        &widths
            .iter()
            .map(|w| "─".repeat(*w))
            .collect::<Vec<_>>()
            .join("─┼─"),
    );
    output.push('\n');
    for row in &rows {
        output.push_str(&render(row));
        output.push('\n');
    }

    output
}

/// One-line summary of the rule a field type enforces
fn describe_rules(field_type: &FieldType) -> String {
    match field_type {
        FieldType::Dropdown { choices }
        | FieldType::ChooseOne { choices }
        | FieldType::ChooseMultiple { choices } => {
            format!("one of [{}]", choices.values().join(" "))
        }
        FieldType::LongText { max_length: Some(max) } => format!("at most {} chars", max),
        FieldType::LongText { max_length: None } => String::new(),
        FieldType::ShortText(short) => {
            let mut rules = vec![format!("type={}", short.html_type())];
            if short.is_multiple() {
                rules.push("multiple".to_string());
            }
            if let Some(min) = short.min_length() {
                rules.push(format!("minlength={}", min));
            }
            if let Some(max) = short.max_length() {
                rules.push(format!("maxlength={}", max));
            }
            if let Some(pattern) = short.pattern() {
                rules.push(format!("pattern={}", pattern.as_str()));
            }
            rules.join(" ")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use formfields_core::{Error, SubmittedValues, ValidationConfig};
    use std::sync::{Arc, Mutex};

    const SCHEMA: &str = r#"[
        {"label": "Colour", "name": "colour", "presence": "Required",
         "type": {"type": "Dropdown", "choices": ["Red", "Green | Leafy"]}},
        {"label": "NRIC", "name": "nric", "presence": "Optional",
         "type": {"type": "ShortText", "attributes": {"type": "text", "pattern": "^[STFG]\\d{7}[A-Z]$", "maxlength": "9"}}}
    ]"#;

    /// Writer that keeps everything written to it for inspection
    #[derive(Clone, Default)]
    struct Captured(Arc<Mutex<Vec<u8>>>);

    impl Write for Captured {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl Captured {
        fn text(&self) -> String {
            String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
        }
    }

    fn writer(format: OutputFormat, quiet: bool) -> (OutputWriter, Captured) {
        let captured = Captured::default();
        let writer = OutputWriter::with_writer(format, false, quiet, Box::new(captured.clone()));
        (writer, captured)
    }

    fn failing_errors() -> ValidationErrors {
        let schema = FormSchema::from_json_str(SCHEMA).unwrap();
        let values = SubmittedValues::from_query("colour=Blue&nric=X123");
        schema.collect_errors(&values, &ValidationConfig::default())
    }

    #[test]
    fn test_human_validation_errors() {
        let formatted = format_validation_errors_human(&failing_errors());
        assert!(formatted.starts_with("✗ Validation failed - 2 error(s)"));
        assert!(formatted.contains(
            "1. [invalid choice] invalid choice: colour has invalid value 'Blue'. Valid choices are: [Red Green]"
        ));
        assert!(formatted.contains("2. [invalid pattern]"));
    }

    #[test]
    fn test_json_validation_report() {
        let formatted = OutputFormat::Json
            .format_validation_errors(&failing_errors())
            .unwrap();
        let value: serde_json::Value = serde_json::from_str(&formatted).unwrap();
        assert_eq!(value["valid"], false);
        assert_eq!(value["errors"][0]["kind"], "invalid_choice");
        assert_eq!(value["errors"][0]["field"], "colour");
        assert_eq!(value["errors"][0]["choices"], serde_json::json!(["Red", "Green"]));
        assert!(value["errors"][1]["error"].as_str().unwrap().contains("nric"));
    }

    #[test]
    fn test_empty_report_is_valid() {
        let formatted = OutputFormat::Yaml
            .format_validation_errors(&ValidationErrors::new())
            .unwrap();
        assert!(formatted.contains("valid: true"));
    }

    #[test]
    fn test_human_schema_table() {
        let schema = FormSchema::from_json_str(SCHEMA).unwrap();
        let formatted = format_schema_human(&schema);
        assert!(formatted.starts_with("2 field(s)"));
        assert!(formatted.contains("NAME"));
        assert!(formatted.contains("one of [Red Green]"));
        assert!(formatted.contains("type=text maxlength=9 pattern=^[STFG]\\d{7}[A-Z]$"));
    }

    #[test]
    fn test_quiet_suppresses_messages_but_not_errors() {
        let (mut output, captured) = writer(OutputFormat::Human, true);
        output.info("hidden").unwrap();
        output.success("hidden").unwrap();
        output.section("hidden").unwrap();
        output.validation_errors(&failing_errors()).unwrap();
        let text = captured.text();
        assert!(!text.contains("hidden"));
        assert!(text.starts_with("✗ Validation failed - 2 error(s)"));
    }

    #[test]
    fn test_machine_formats_skip_messages() {
        let (mut output, captured) = writer(OutputFormat::Json, false);
        output.info("hidden").unwrap();
        output.section("hidden").unwrap();
        output.validation_errors(&ValidationErrors::from(Error::schema_decode("bad"))).unwrap();
        let text = captured.text();
        assert!(!text.contains("hidden"));
        assert!(text.ends_with('\n'));
        assert!(text.contains("\"schema_decode\""));
    }

    #[test]
    fn test_human_section_and_empty_errors() {
        let (mut output, captured) = writer(OutputFormat::Human, false);
        output.section("Fields").unwrap();
        output.validation_errors(&ValidationErrors::new()).unwrap();
        assert_eq!(captured.text(), "\n=== Fields ===\n");
    }
}
