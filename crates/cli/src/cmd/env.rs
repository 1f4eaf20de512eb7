//! Implementation of the `flakemx env` command.
//!
//! Prints an activation script for one system's development shell. The script
//! goes to stdout so it can be evaluated directly, e.g.
//! `eval "$(flakemx env)"`.

use std::path::Path;

use anyhow::{Context, Result, anyhow, bail};

use flakemx_lib::consts::DEV_SHELL_OUTPUT;
use flakemx_lib::platform::SystemId;
use flakemx_lib::registry::OutputRegistry;
use flakemx_lib::shell::Shell;

pub fn cmd_env(config: &Path, system: Option<&str>, shell_name: Option<&str>) -> Result<()> {
  let shell = match shell_name {
    Some(name) => Shell::parse(name)
      .ok_or_else(|| anyhow!("Unknown shell: {}. Supported: bash, zsh, fish, sh, powershell", name))?,
    None => Shell::detect(),
  };

  let system = match system {
    Some(system) => SystemId::new(system),
    None => SystemId::current().context("Could not detect the host system; pass one explicitly")?,
  };

  let result = super::evaluate(config, None)?;
  let registry = OutputRegistry::new(&result);
  let descriptor = registry
    .get(system.as_str(), DEV_SHELL_OUTPUT)
    .with_context(|| format!("Failed to look up the development shell for {}", system))?;

  let Some(spec) = descriptor.as_shell() else {
    bail!("Output {}.{} is not a development shell", system, DEV_SHELL_OUTPUT);
  };

  print!("{}", shell.render(spec));
  Ok(())
}
