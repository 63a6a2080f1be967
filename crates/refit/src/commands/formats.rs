//! `refit formats` command implementation.

use refit_backend::{BASELINE_FORMAT, BackendRegistry};

use crate::error::CliError;
use crate::output::Output;

/// List registered backends with their descriptions.
pub(crate) fn execute() -> Result<(), CliError> {
    let output = Output::new();
    let registry = BackendRegistry::with_defaults();

    for name in registry.list_formats() {
        let backend = registry.get(name)?;
        let line = format!("{name:<10} {}", backend.description());
        if name == BASELINE_FORMAT {
            output.highlight(&line);
        } else {
            output.line(&line);
        }
    }

    Ok(())
}
