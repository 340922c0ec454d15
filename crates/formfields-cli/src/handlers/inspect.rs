//! Inspect command handler

use super::utils::load_schema;
use crate::cli::InspectArgs;
use crate::error::Result;
use crate::logging::timing::Timer;
use crate::output::OutputWriter;
use tracing::{info, instrument};

/// Handle the inspect command
#[instrument(skip(output), fields(schema = %args.schema.display()))]
pub fn handle_inspect(args: InspectArgs, output: &mut OutputWriter) -> Result<()> {
    let _timer = Timer::with_details("inspect_command", &args.schema.display().to_string());

    let schema = load_schema(&args.schema)?;
    info!(fields = schema.len(), "Schema decoded");

    output.success(&format!("✓ Schema is valid: {}", args.schema.display()))?;
    output.section("Fields")?;
    output.schema(&schema)
}
