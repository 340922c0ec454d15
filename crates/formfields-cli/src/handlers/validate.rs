//! Validation command handler

use super::utils::{load_schema, load_values};
use crate::cli::ValidateArgs;
use crate::config::Config;
use crate::error::{Error, Result};
use crate::logging::timing::Timer;
use crate::output::OutputWriter;
use formfields_core::ValidationErrors;
use tracing::{debug, info, instrument, warn};

/// Handle the validate command
///
/// Schema and values are loaded before anything is checked, so a malformed
/// schema is reported as a decode error rather than as field failures. Under
/// JSON or YAML output the decode error is written as a one-entry report.
#[instrument(skip(config, output), fields(schema = %args.schema.display(), values = %args.values.display()))]
pub fn handle_validate(args: ValidateArgs, config: &Config, output: &mut OutputWriter) -> Result<()> {
    let _timer = Timer::with_details("validate_command", &args.schema.display().to_string());
    info!("Starting validation process");
    output.info(&format!(
        "Validating {} against {}",
        args.values.display(),
        args.schema.display()
    ))?;

    let schema = match load_schema(&args.schema) {
        Ok(schema) => schema,
        Err(Error::Core(e)) if output.is_machine() => {
            warn!(error = %e, "Schema rejected");
            output.validation_errors(&ValidationErrors::from(e.clone()))?;
            return Err(Error::SchemaRejected(e));
        }
        Err(e) => return Err(e),
    };
    debug!(fields = schema.len(), "Schema decoded");
    let values = load_values(&args.values)?;
    debug!(names = values.len(), "Submitted values loaded");

    let validation_config = config
        .validation
        .to_validation_config(args.all, args.max_errors);
    debug!(?validation_config, "Using validation config");

    let validation_timer = Timer::new("form_validation");
    let errors = schema.collect_errors(&values, &validation_config);
    debug!(
        errors = errors.len(),
        elapsed_us = validation_timer.elapsed().as_micros() as u64,
        "Form validated"
    );
    drop(validation_timer);

    output.validation_errors(&errors)?;

    if errors.is_empty() {
        info!("Validation completed successfully");
        output.success(&format!("✓ Submission is valid ({} field(s) checked)", schema.len()))?;
        Ok(())
    } else {
        warn!(errors = errors.len(), "Validation failed");
        Err(Error::ValidationFailed {
            count: errors.len(),
        })
    }
}
