//! Descriptor file loading.
//!
//! A descriptor lists the systems to support, the shared dependency list and
//! the templates the standard builder uses. It is read once, validated, and
//! turned into the immutable values evaluation runs on. JSON files are
//! recognised by their `.json` extension; everything else is read as TOML.

mod types;

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use thiserror::Error;
use tracing::debug;

use crate::builder::{CatalogResolver, SearchPathComposer, StandardBuilder};
use crate::deps::{DependencyError, DependencySet};
use crate::output::is_valid_output_name;
use crate::platform::paths::store_dir;
use crate::platform::{SystemId, known_systems};
use crate::systems::{StaticSystems, SystemEnumerator};

pub use types::*;

/// Fatal configuration problems. Evaluation never starts when one occurs.
#[derive(Debug, Error)]
pub enum ConfigError {
  /// The descriptor file could not be read.
  #[error("failed to read {}: {source}", .path.display())]
  Read {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },

  /// The descriptor is not valid JSON for the schema.
  #[error("failed to parse {origin} as JSON: {source}")]
  ParseJson {
    origin: String,
    #[source]
    source: serde_json::Error,
  },

  /// The descriptor is not valid TOML for the schema.
  #[error("failed to parse {origin} as TOML: {source}")]
  ParseToml {
    origin: String,
    #[source]
    source: toml::de::Error,
  },

  /// The system list is empty.
  #[error("no systems configured")]
  NoSystems,

  /// A system appears twice in the system list.
  #[error("system '{0}' is listed more than once")]
  DuplicateSystem(SystemId),

  /// A system id is blank.
  #[error("system ids must not be empty")]
  EmptySystemId,

  /// The dependency list is malformed.
  #[error("invalid dependency list: {0}")]
  Dependency(#[from] DependencyError),

  /// The package template is incomplete.
  #[error("invalid package: {0}")]
  InvalidPackage(String),

  /// A required output name is not a valid output name.
  #[error("invalid output name '{0}'")]
  InvalidOutputName(String),

  /// Parallelism was set to zero.
  #[error("parallelism must be at least 1")]
  InvalidParallelism,
}

impl Descriptor {
  /// Load and validate a descriptor file.
  pub fn load(path: &Path) -> Result<Self, ConfigError> {
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
      path: path.to_path_buf(),
      source,
    })?;

    let origin = path.display().to_string();
    let is_json = path.extension().is_some_and(|ext| ext == "json");
    let descriptor = if is_json {
      Self::parse_json(&content, &origin)?
    } else {
      Self::parse_toml(&content, &origin)?
    };

    debug!(path = %origin, "loaded descriptor");
    Ok(descriptor)
  }

  /// Parse and validate a JSON descriptor.
  pub fn from_json_str(content: &str) -> Result<Self, ConfigError> {
    Self::parse_json(content, "<string>")
  }

  /// Parse and validate a TOML descriptor.
  pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
    Self::parse_toml(content, "<string>")
  }

  fn parse_json(content: &str, origin: &str) -> Result<Self, ConfigError> {
    let descriptor: Self = serde_json::from_str(content).map_err(|source| ConfigError::ParseJson {
      origin: origin.to_string(),
      source,
    })?;
    descriptor.validate()?;
    Ok(descriptor)
  }

  fn parse_toml(content: &str, origin: &str) -> Result<Self, ConfigError> {
    let descriptor: Self = toml::from_str(content).map_err(|source| ConfigError::ParseToml {
      origin: origin.to_string(),
      source,
    })?;
    descriptor.validate()?;
    Ok(descriptor)
  }

  /// Check everything that can be checked before evaluation starts.
  pub fn validate(&self) -> Result<(), ConfigError> {
    if self.package.name.trim().is_empty() {
      return Err(ConfigError::InvalidPackage("name must not be empty".to_string()));
    }
    if self.package.version.trim().is_empty() {
      return Err(ConfigError::InvalidPackage("version must not be empty".to_string()));
    }
    if let Some(name) = self.outputs.iter().find(|name| !is_valid_output_name(name)) {
      return Err(ConfigError::InvalidOutputName(name.clone()));
    }
    if self.parallelism == Some(0) {
      return Err(ConfigError::InvalidParallelism);
    }

    self.dependency_set()?;
    self.shell_dependency_set()?;
    self.enumerator().list()?;
    Ok(())
  }

  /// The shared dependency set composed into every output.
  pub fn dependency_set(&self) -> Result<DependencySet, ConfigError> {
    Ok(DependencySet::build(self.dependencies.iter().cloned())?)
  }

  /// Tools only present in the development shell.
  pub fn shell_dependency_set(&self) -> Result<DependencySet, ConfigError> {
    Ok(DependencySet::build(self.shell.dependencies.iter().cloned())?)
  }

  /// Enumerator over the configured systems, or the defaults when omitted.
  pub fn enumerator(&self) -> StaticSystems {
    match &self.systems {
      Some(systems) => StaticSystems::new(systems.iter().cloned()),
      None => StaticSystems::defaults(),
    }
  }

  /// Systems the toolchain can build for.
  pub fn toolchain_systems(&self) -> Vec<SystemId> {
    self.toolchain.systems.clone().unwrap_or_else(known_systems)
  }

  /// Store root, from the descriptor or the environment.
  pub fn store_root(&self) -> String {
    self
      .store
      .clone()
      .unwrap_or_else(|| store_dir().to_string_lossy().into_owned())
  }

  /// The standard builder wired with the default collaborators.
  pub fn builder(&self) -> Result<StandardBuilder, ConfigError> {
    let store_root = self.store_root();
    let builder = StandardBuilder::new(
      self.package.clone(),
      Arc::new(CatalogResolver::new(self.catalog.clone(), store_root.clone())),
      Arc::new(SearchPathComposer::new(store_root)),
    )
    .with_shell(self.shell_dependency_set()?, self.shell.env.clone())
    .with_toolchain(self.toolchain_systems());
    Ok(builder)
  }
}
