//! Package resolution.
//!
//! The resolver turns a [`DependencyRef`] into an [`ArtifactSpec`] for one
//! system. [`CatalogResolver`] is the descriptive default: it answers from a
//! configured catalog and never touches the network or the filesystem.

use std::collections::BTreeMap;

use semver::{Version, VersionReq};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::builder::SystemError;
use crate::deps::DependencyRef;
use crate::output::ArtifactSpec;
use crate::platform::SystemId;
use crate::platform::paths::artifact_prefix;

/// Version reported for dependencies resolved without a catalog entry.
pub const LATEST: &str = "latest";

/// Turns dependency refs into artifacts for a target system.
pub trait PackageResolver: Send + Sync {
  fn resolve(&self, dep: &DependencyRef, system: &SystemId) -> Result<ArtifactSpec, SystemError>;
}

/// One package known to the catalog.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
  /// Version the catalog provides.
  pub version: Option<String>,
  /// Attribute path, defaults to `pkgs.<name>`.
  pub attr: Option<String>,
  /// Systems the package is available on, defaults to all.
  pub systems: Option<Vec<SystemId>>,
}

/// Resolver answering from a fixed catalog.
///
/// An empty catalog is open: every dependency resolves to `pkgs.<name>` at the
/// constrained version (or `latest`). A non-empty catalog is authoritative and
/// unknown names fail to resolve.
#[derive(Debug, Clone)]
pub struct CatalogResolver {
  entries: BTreeMap<String, CatalogEntry>,
  store_root: String,
}

impl CatalogResolver {
  pub fn new(entries: BTreeMap<String, CatalogEntry>, store_root: impl Into<String>) -> Self {
    Self {
      entries,
      store_root: store_root.into(),
    }
  }

  /// An open catalog with no entries.
  pub fn open(store_root: impl Into<String>) -> Self {
    Self::new(BTreeMap::new(), store_root)
  }

  fn artifact(&self, name: &str, version: &str, attr: Option<&str>, system: &SystemId) -> ArtifactSpec {
    ArtifactSpec {
      name: name.to_string(),
      version: version.to_string(),
      attr: attr.map(str::to_string).unwrap_or_else(|| format!("pkgs.{}", name)),
      prefix: artifact_prefix(&self.store_root, system, name, version),
      system: system.clone(),
    }
  }
}

impl PackageResolver for CatalogResolver {
  fn resolve(&self, dep: &DependencyRef, system: &SystemId) -> Result<ArtifactSpec, SystemError> {
    if self.entries.is_empty() {
      // Exact constraints pin the version, ranges resolve to latest
      let version = dep
        .version
        .as_deref()
        .filter(|v| parse_lenient(v).is_some())
        .unwrap_or(LATEST);
      return Ok(self.artifact(&dep.name, version, None, system));
    }

    let entry = self
      .entries
      .get(&dep.name)
      .ok_or_else(|| SystemError::resolution(&dep.name, system, "not found in catalog"))?;

    if let Some(systems) = &entry.systems {
      if !systems.contains(system) {
        return Err(SystemError::resolution(&dep.name, system, "not available for this system"));
      }
    }

    let version = entry.version.as_deref().unwrap_or(LATEST);
    if let Some(constraint) = &dep.version {
      if !satisfies(version, constraint) {
        return Err(SystemError::resolution(
          &dep.name,
          system,
          format!("catalog version {} does not satisfy {}", version, constraint),
        ));
      }
    }

    debug!(dependency = %dep.name, %system, version, "resolved dependency");
    Ok(self.artifact(&dep.name, version, entry.attr.as_deref(), system))
  }
}

/// Check `version` against a constraint.
///
/// Constraints use semver requirement syntax (`>=2.76`, `^1`, `=0.29`).
/// Versions with fewer than three components are padded with zeros. Anything
/// that does not parse as semver is compared as an exact string.
pub fn satisfies(version: &str, constraint: &str) -> bool {
  match (parse_lenient(version), VersionReq::parse(constraint)) {
    (Some(version), Ok(req)) => req.matches(&version),
    _ => version == constraint,
  }
}

fn parse_lenient(version: &str) -> Option<Version> {
  if let Ok(v) = Version::parse(version) {
    return Some(v);
  }

  let parts: Vec<&str> = version.split('.').collect();
  if parts.is_empty() || parts.len() > 3 || parts.iter().any(|p| p.parse::<u64>().is_err()) {
    return None;
  }

  let mut padded = parts.join(".");
  for _ in parts.len()..3 {
    padded.push_str(".0");
  }
  Version::parse(&padded).ok()
}
