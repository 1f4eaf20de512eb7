use std::path::Path;

use anyhow::{Context, Result};

use flakemx_lib::registry::OutputRegistry;

use crate::output::print_json;

pub fn cmd_get(config: &Path, system: &str, output: &str) -> Result<()> {
  let result = super::evaluate(config, None)?;
  let registry = OutputRegistry::new(&result);

  let descriptor = registry
    .get(system, output)
    .with_context(|| format!("Failed to look up {}.{}", system, output))?;

  print_json(descriptor)
}
