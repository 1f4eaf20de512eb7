//! System enumeration.
//!
//! The enumerator decides *which* systems exist; it knows nothing about how
//! outputs are computed. Its list is finite, deterministic and never empty.

use std::collections::HashSet;

use tracing::debug;

use crate::config::ConfigError;
use crate::platform::{SystemId, default_systems};

/// Supplies the closed set of systems an evaluation runs against.
pub trait SystemEnumerator: Send + Sync {
  /// List the systems to evaluate, in reporting order.
  fn list(&self) -> Result<Vec<SystemId>, ConfigError>;
}

/// Enumerator backed by a fixed, configured list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaticSystems {
  systems: Vec<SystemId>,
}

impl StaticSystems {
  pub fn new<I, S>(systems: I) -> Self
  where
    I: IntoIterator<Item = S>,
    S: Into<SystemId>,
  {
    Self {
      systems: systems.into_iter().map(Into::into).collect(),
    }
  }

  /// The four common Linux and Darwin systems.
  pub fn defaults() -> Self {
    Self {
      systems: default_systems(),
    }
  }
}

impl SystemEnumerator for StaticSystems {
  fn list(&self) -> Result<Vec<SystemId>, ConfigError> {
    if self.systems.is_empty() {
      return Err(ConfigError::NoSystems);
    }

    let mut seen = HashSet::new();
    for system in &self.systems {
      if system.as_str().trim().is_empty() {
        return Err(ConfigError::EmptySystemId);
      }
      if !seen.insert(system) {
        return Err(ConfigError::DuplicateSystem(system.clone()));
      }
    }

    debug!(count = self.systems.len(), "enumerated systems");
    Ok(self.systems.clone())
  }
}

impl<F> SystemEnumerator for F
where
  F: Fn() -> Vec<SystemId> + Send + Sync,
{
  fn list(&self) -> Result<Vec<SystemId>, ConfigError> {
    StaticSystems { systems: self() }.list()
  }
}
