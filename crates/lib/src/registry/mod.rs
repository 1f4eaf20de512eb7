//! Queryable view over an evaluated matrix.
//!
//! The registry borrows a [`MatrixResult`] and answers lookups against it. It
//! holds no state of its own, so a bad query can never affect the result.

use std::collections::{BTreeMap, BTreeSet};

use thiserror::Error;

use crate::matrix::MatrixResult;
use crate::output::OutputDescriptor;
use crate::platform::SystemId;

/// Lookup failures. These indicate the caller asked for something the
/// evaluation did not produce.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryError {
  #[error("unknown system '{0}'")]
  UnknownSystem(String),

  #[error("unknown output '{output}' for system '{system}'")]
  UnknownOutput { system: String, output: String },
}

/// Read-only query surface over a [`MatrixResult`].
#[derive(Debug, Clone, Copy)]
pub struct OutputRegistry<'a> {
  result: &'a MatrixResult,
}

impl<'a> OutputRegistry<'a> {
  pub fn new(result: &'a MatrixResult) -> Self {
    Self { result }
  }

  /// The descriptor of `output` built for `system`.
  pub fn get(&self, system: &str, output: &str) -> Result<&'a OutputDescriptor, QueryError> {
    let outputs = self
      .result
      .get(system)
      .ok_or_else(|| QueryError::UnknownSystem(system.to_string()))?;

    outputs.get(output).ok_or_else(|| QueryError::UnknownOutput {
      system: system.to_string(),
      output: output.to_string(),
    })
  }

  /// Names of every output available for `system`.
  pub fn list_outputs(&self, system: &str) -> Result<BTreeSet<&'a str>, QueryError> {
    let outputs = self
      .result
      .get(system)
      .ok_or_else(|| QueryError::UnknownSystem(system.to_string()))?;
    Ok(outputs.names().collect())
  }

  /// Evaluated systems in sorted order.
  pub fn systems(&self) -> Vec<&'a SystemId> {
    self.result.systems().collect()
  }

  /// Every `(system, output, descriptor)` triple, sorted by system then output.
  pub fn iter(&self) -> impl Iterator<Item = (&'a SystemId, &'a str, &'a OutputDescriptor)> + 'a {
    self
      .result
      .iter()
      .flat_map(|(system, outputs)| outputs.iter().map(move |(name, descriptor)| (system, name, descriptor)))
  }

  /// Transposed view keyed by output name, then system.
  pub fn by_output(&self) -> BTreeMap<&'a str, BTreeMap<&'a SystemId, &'a OutputDescriptor>> {
    let mut view: BTreeMap<&'a str, BTreeMap<&'a SystemId, &'a OutputDescriptor>> = BTreeMap::new();
    for (system, name, descriptor) in self.iter() {
      view.entry(name).or_default().insert(system, descriptor);
    }
    view
  }
}
