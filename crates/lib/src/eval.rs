//! Descriptor file evaluation.
//!
//! This module provides [`evaluate_config`], which takes a path to a
//! descriptor file and returns the [`MatrixResult`] holding every output for
//! every configured system.

use std::path::Path;

use tracing::info;

use crate::config::Descriptor;
use crate::matrix::{EvalConfig, EvalError, MatrixEvaluator, MatrixResult};

/// Build the evaluator described by a loaded descriptor.
///
/// The shared dependency set is constructed here, once, and handed to every
/// builder invocation.
pub fn evaluator_from_descriptor(descriptor: &Descriptor) -> Result<MatrixEvaluator, EvalError> {
  let deps = descriptor.dependency_set()?;
  let builder = descriptor.builder()?;

  let mut config = EvalConfig {
    required_outputs: descriptor.outputs.clone(),
    ..EvalConfig::default()
  };
  if let Some(parallelism) = descriptor.parallelism {
    config.parallelism = parallelism;
  }

  Ok(MatrixEvaluator::new(descriptor.enumerator(), builder, deps).with_config(config))
}

/// Evaluate a descriptor file sequentially.
///
/// # Example
/// ```ignore
/// use std::path::Path;
/// use flakemx_lib::eval::evaluate_config;
///
/// let result = evaluate_config(Path::new("flakemx.toml"))?;
/// println!("Systems: {}", result.len());
/// ```
pub fn evaluate_config(path: &Path) -> Result<MatrixResult, EvalError> {
  let descriptor = Descriptor::load(path)?;
  info!(path = %path.display(), "evaluating descriptor");
  evaluator_from_descriptor(&descriptor)?.evaluate()
}

/// Evaluate a descriptor file with one unit of work per system.
pub async fn evaluate_config_parallel(path: &Path) -> Result<MatrixResult, EvalError> {
  let descriptor = Descriptor::load(path)?;
  info!(path = %path.display(), "evaluating descriptor");
  evaluator_from_descriptor(&descriptor)?.evaluate_parallel().await
}
