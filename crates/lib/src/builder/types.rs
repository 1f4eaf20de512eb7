use thiserror::Error;

use crate::deps::DependencySet;
use crate::output::{OutputError, OutputMap, is_valid_output_name};
use crate::platform::SystemId;

/// Failure of a single system's evaluation.
///
/// These are collected by the matrix evaluator and never abort sibling
/// systems.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SystemError {
  /// The system cannot be built with the available toolchain.
  #[error("unsupported system {system}: {reason}")]
  Unsupported { system: SystemId, reason: String },

  /// A named dependency could not be located for the system.
  #[error("cannot resolve dependency '{dependency}' for {system}: {message}")]
  Resolution {
    dependency: String,
    system: SystemId,
    message: String,
  },

  /// The builder returned an output map violating the output contract.
  #[error("invalid outputs: {0}")]
  InvalidOutputs(#[from] OutputError),

  /// The unit of work evaluating the system did not complete.
  #[error("evaluation aborted: {0}")]
  Aborted(String),
}

impl SystemError {
  pub fn unsupported(system: &SystemId, reason: impl Into<String>) -> Self {
    Self::Unsupported {
      system: system.clone(),
      reason: reason.into(),
    }
  }

  pub fn resolution(dependency: &str, system: &SystemId, message: impl Into<String>) -> Self {
    Self::Resolution {
      dependency: dependency.to_string(),
      system: system.clone(),
      message: message.into(),
    }
  }
}

/// Produces the named outputs of a single system.
pub trait OutputBuilder: Send + Sync {
  fn build(&self, system: &SystemId, deps: &DependencySet) -> Result<OutputMap, SystemError>;
}

impl<F> OutputBuilder for F
where
  F: Fn(&SystemId, &DependencySet) -> Result<OutputMap, SystemError> + Send + Sync,
{
  fn build(&self, system: &SystemId, deps: &DependencySet) -> Result<OutputMap, SystemError> {
    self(system, deps)
  }
}

/// Check a produced output map against the output contract.
///
/// Every name must be a valid output name and every name in `required` must
/// be present.
pub fn validate_outputs(outputs: &OutputMap, required: &[String]) -> Result<(), OutputError> {
  if let Some(name) = outputs.names().find(|name| !is_valid_output_name(name)) {
    return Err(OutputError::InvalidName(name.to_string()));
  }

  if let Some(name) = required.iter().find(|name| !outputs.contains(name)) {
    return Err(OutputError::Missing(name.clone()));
  }

  Ok(())
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::output::{OutputDescriptor, ShellSpec};

  fn outputs(names: &[&str]) -> OutputMap {
    let mut map = OutputMap::new();
    for name in names {
      map
        .insert(*name, OutputDescriptor::dev_shell(ShellSpec::default(), DependencySet::empty()))
        .unwrap();
    }
    map
  }

  fn required(names: &[&str]) -> Vec<String> {
    names.iter().map(|s| s.to_string()).collect()
  }

  #[test]
  fn validate_accepts_superset_of_required() {
    let map = outputs(&["package", "devShell", "default"]);
    assert_eq!(validate_outputs(&map, &required(&["package", "devShell"])), Ok(()));
  }

  #[test]
  fn validate_reports_first_missing_output() {
    let map = outputs(&["package"]);
    assert_eq!(
      validate_outputs(&map, &required(&["package", "devShell"])),
      Err(OutputError::Missing("devShell".to_string()))
    );
  }

  #[test]
  fn validate_rejects_invalid_names_from_deserialized_maps() {
    // Deserialization bypasses OutputMap::insert checks
    let map: OutputMap = serde_json::from_str(r#"{"a b": {"type": "devShell", "env": {}, "search_paths": {}, "packages": [], "dependencies": []}}"#).unwrap();
    assert_eq!(
      validate_outputs(&map, &[]),
      Err(OutputError::InvalidName("a b".to_string()))
    );
  }

  #[test]
  fn closures_are_builders() {
    let builder = |system: &SystemId, deps: &DependencySet| -> Result<OutputMap, SystemError> {
      if system.as_str() == "x86_64-linux" {
        Ok(OutputMap::new().with("devShell", OutputDescriptor::dev_shell(ShellSpec::default(), deps.clone()))?)
      } else {
        Err(SystemError::unsupported(system, "linux only"))
      }
    };

    let deps = DependencySet::empty();
    assert!(builder.build(&SystemId::from("x86_64-linux"), &deps).is_ok());
    assert_eq!(
      builder.build(&SystemId::from("aarch64-darwin"), &deps).unwrap_err().to_string(),
      "unsupported system aarch64-darwin: linux only"
    );
  }
}
