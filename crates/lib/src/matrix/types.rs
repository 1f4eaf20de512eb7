use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::builder::SystemError;
use crate::config::ConfigError;
use crate::output::OutputMap;
use crate::platform::SystemId;
use crate::util::hash::Hashable;

/// The evaluated outputs of every enumerated system.
///
/// Keys are exactly the systems the enumerator listed; a result is only ever
/// produced when every system succeeded.
///
/// # Example
///
/// ```json
/// {
///   "x86_64-linux": {
///     "devShell": { "type": "devShell", ... },
///     "package": { "type": "package", ... }
///   }
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MatrixResult(BTreeMap<SystemId, OutputMap>);

impl MatrixResult {
  pub(crate) fn from_map(outputs: BTreeMap<SystemId, OutputMap>) -> Self {
    Self(outputs)
  }

  pub fn get(&self, system: &str) -> Option<&OutputMap> {
    self.0.get(system)
  }

  pub fn contains(&self, system: &str) -> bool {
    self.0.contains_key(system)
  }

  /// Systems in sorted order.
  pub fn systems(&self) -> impl Iterator<Item = &SystemId> {
    self.0.keys()
  }

  pub fn iter(&self) -> impl Iterator<Item = (&SystemId, &OutputMap)> {
    self.0.iter()
  }

  pub fn len(&self) -> usize {
    self.0.len()
  }

  pub fn is_empty(&self) -> bool {
    self.0.is_empty()
  }
}

impl Hashable for MatrixResult {}

/// Every per-system failure of one evaluation, in enumeration order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AggregateEvaluationError {
  failures: Vec<(SystemId, SystemError)>,
}

impl AggregateEvaluationError {
  pub(crate) fn new(failures: Vec<(SystemId, SystemError)>) -> Self {
    Self { failures }
  }

  pub fn failures(&self) -> &[(SystemId, SystemError)] {
    &self.failures
  }

  /// The failing systems, in enumeration order.
  pub fn systems(&self) -> impl Iterator<Item = &SystemId> {
    self.failures.iter().map(|(system, _)| system)
  }

  pub fn len(&self) -> usize {
    self.failures.len()
  }

  pub fn is_empty(&self) -> bool {
    self.failures.is_empty()
  }
}

impl fmt::Display for AggregateEvaluationError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "evaluation failed for {} system(s):", self.failures.len())?;
    for (system, error) in &self.failures {
      write!(f, "\n  {}: {}", system, error)?;
    }
    Ok(())
  }
}

impl std::error::Error for AggregateEvaluationError {}

/// Errors returned by a matrix evaluation.
#[derive(Debug, Error)]
pub enum EvalError {
  /// The configuration is unusable; no system was evaluated.
  #[error("configuration error: {0}")]
  Config(#[from] ConfigError),

  /// One or more systems failed; no result was produced.
  #[error(transparent)]
  Evaluation(#[from] AggregateEvaluationError),
}

/// Configuration for matrix evaluation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EvalConfig {
  /// Maximum number of systems evaluated at once by
  /// [`MatrixEvaluator::evaluate_parallel`](super::MatrixEvaluator::evaluate_parallel).
  pub parallelism: usize,

  /// Outputs every system's map must contain.
  pub required_outputs: Vec<String>,
}

impl Default for EvalConfig {
  fn default() -> Self {
    Self {
      parallelism: num_cpus(),
      required_outputs: Vec::new(),
    }
  }
}

/// Get the number of CPUs for default parallelism.
fn num_cpus() -> usize {
  std::thread::available_parallelism().map(|p| p.get()).unwrap_or(4)
}
