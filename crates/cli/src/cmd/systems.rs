use std::path::Path;

use anyhow::{Context, Result};

use flakemx_lib::systems::SystemEnumerator;

pub fn cmd_systems(config: &Path) -> Result<()> {
  let descriptor = super::load_descriptor(config)?;
  let systems = descriptor
    .enumerator()
    .list()
    .context("Failed to enumerate systems")?;

  for system in systems {
    println!("{}", system);
  }
  Ok(())
}
