mod env;
mod get;
mod info;
mod show;
mod systems;

use std::path::Path;

use anyhow::{Context, Result};
use tracing::debug;

use flakemx_lib::config::Descriptor;
use flakemx_lib::eval::evaluator_from_descriptor;
use flakemx_lib::matrix::MatrixResult;

pub use env::cmd_env;
pub use get::cmd_get;
pub use info::cmd_info;
pub use show::cmd_show;
pub use systems::cmd_systems;

/// Load a descriptor, attaching the path to any failure.
fn load_descriptor(config: &Path) -> Result<Descriptor> {
  Descriptor::load(config).with_context(|| format!("Failed to load descriptor: {}", config.display()))
}

/// Evaluate every system of a descriptor in parallel.
fn evaluate(config: &Path, jobs: Option<usize>) -> Result<MatrixResult> {
  let mut descriptor = load_descriptor(config)?;
  if jobs.is_some() {
    descriptor.parallelism = jobs;
  }
  debug!(
    config = %config.display(),
    parallelism = ?descriptor.parallelism,
    "loaded descriptor"
  );

  let evaluator = evaluator_from_descriptor(&descriptor)
    .with_context(|| format!("Failed to prepare evaluation: {}", config.display()))?;

  let rt = tokio::runtime::Runtime::new().context("Failed to create async runtime")?;
  rt.block_on(evaluator.evaluate_parallel())
    .with_context(|| format!("Failed to evaluate descriptor: {}", config.display()))
}
