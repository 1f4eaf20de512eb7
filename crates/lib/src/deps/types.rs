use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize, Serializer};
use thiserror::Error;
use tracing::warn;

/// Errors raised while constructing dependency refs and sets.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DependencyError {
  /// The same name was listed with two different version constraints.
  #[error("duplicate dependency '{name}' with conflicting constraints: {} vs {}", describe(.existing), describe(.conflicting))]
  Conflict {
    name: String,
    existing: Option<String>,
    conflicting: Option<String>,
  },

  /// A dependency ref had an empty name.
  #[error("dependency name must not be empty")]
  EmptyName,
}

fn describe(constraint: &Option<String>) -> &str {
  constraint.as_deref().unwrap_or("any")
}

/// A named dependency with an optional version constraint.
///
/// In configuration files a ref is either a string (`"glib"`, `"glib@>=2.76"`)
/// or a table (`{ name = "glib", version = ">=2.76" }`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawDependencyRef")]
pub struct DependencyRef {
  pub name: String,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub version: Option<String>,
}

impl DependencyRef {
  /// Create an unconstrained ref.
  pub fn new(name: impl Into<String>) -> Self {
    Self {
      name: name.into(),
      version: None,
    }
  }

  /// Set the version constraint.
  pub fn with_version(mut self, version: impl Into<String>) -> Self {
    self.version = Some(version.into());
    self
  }

  /// Parse the string form `name` or `name@constraint`.
  pub fn parse(s: &str) -> Result<Self, DependencyError> {
    let (name, version) = match s.split_once('@') {
      Some((name, version)) => (name.trim(), Some(version.trim())),
      None => (s.trim(), None),
    };

    if name.is_empty() {
      return Err(DependencyError::EmptyName);
    }

    Ok(Self {
      name: name.to_string(),
      version: version.filter(|v| !v.is_empty()).map(str::to_string),
    })
  }
}

impl fmt::Display for DependencyRef {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match &self.version {
      Some(version) => write!(f, "{}@{}", self.name, version),
      None => f.write_str(&self.name),
    }
  }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawDependencyRef {
  Short(String),
  Full { name: String, version: Option<String> },
}

impl TryFrom<RawDependencyRef> for DependencyRef {
  type Error = DependencyError;

  fn try_from(raw: RawDependencyRef) -> Result<Self, Self::Error> {
    match raw {
      RawDependencyRef::Short(s) => DependencyRef::parse(&s),
      RawDependencyRef::Full { name, version } => {
        if name.trim().is_empty() {
          return Err(DependencyError::EmptyName);
        }
        Ok(DependencyRef {
          name: name.trim().to_string(),
          version: version
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty()),
        })
      }
    }
  }
}

/// Immutable, ordered, name-unique collection of [`DependencyRef`]s.
///
/// Cloning is cheap and shares storage with the original; use
/// [`DependencySet::shares_storage_with`] to observe that.
#[derive(Clone, Deserialize)]
#[serde(try_from = "Vec<DependencyRef>")]
pub struct DependencySet {
  entries: Arc<[DependencyRef]>,
}

impl DependencySet {
  /// An empty set.
  pub fn empty() -> Self {
    Self {
      entries: Arc::from(Vec::new()),
    }
  }

  /// Build a set from refs in order.
  ///
  /// Identical refs are kept once, at the position of their first
  /// occurrence. Two refs with the same name and different constraints are
  /// rejected.
  pub fn build<I>(refs: I) -> Result<Self, DependencyError>
  where
    I: IntoIterator<Item = DependencyRef>,
  {
    let mut entries: Vec<DependencyRef> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for dep in refs {
      if dep.name.is_empty() {
        return Err(DependencyError::EmptyName);
      }
      match index.get(&dep.name) {
        Some(&i) if entries[i].version == dep.version => continue,
        Some(&i) => {
          return Err(DependencyError::Conflict {
            name: dep.name,
            existing: entries[i].version.clone(),
            conflicting: dep.version,
          });
        }
        None => {
          index.insert(dep.name.clone(), entries.len());
          entries.push(dep);
        }
      }
    }

    Ok(Self {
      entries: Arc::from(entries),
    })
  }

  /// Build a set from the string forms accepted by [`DependencyRef::parse`].
  pub fn parse<'a, I>(refs: I) -> Result<Self, DependencyError>
  where
    I: IntoIterator<Item = &'a str>,
  {
    let refs = refs
      .into_iter()
      .map(DependencyRef::parse)
      .collect::<Result<Vec<_>, _>>()?;
    Self::build(refs)
  }

  /// Merge `other` into a new set.
  ///
  /// Entries of `self` come first in their order, then entries of `other`
  /// whose names are not already present, in their order. When a name is in
  /// both sets with different constraints, `self`'s entry is kept.
  pub fn merge(&self, other: &DependencySet) -> DependencySet {
    if other.is_empty() || self.shares_storage_with(other) {
      return self.clone();
    }

    let mut entries: Vec<DependencyRef> = self.entries.to_vec();
    for dep in other.iter() {
      match self.get(&dep.name) {
        Some(existing) if existing.version != dep.version => {
          warn!(
            dependency = %dep.name,
            kept = describe(&existing.version),
            dropped = describe(&dep.version),
            "conflicting constraint during merge, keeping first"
          );
        }
        Some(_) => {}
        None => entries.push(dep.clone()),
      }
    }

    DependencySet {
      entries: Arc::from(entries),
    }
  }

  /// Return a new set with `dep` appended. `self` is left untouched.
  pub fn with(&self, dep: DependencyRef) -> Result<DependencySet, DependencyError> {
    Self::build(self.iter().cloned().chain(std::iter::once(dep)))
  }

  pub fn iter(&self) -> std::slice::Iter<'_, DependencyRef> {
    self.entries.iter()
  }

  /// Dependency names in set order.
  pub fn names(&self) -> impl Iterator<Item = &str> {
    self.entries.iter().map(|d| d.name.as_str())
  }

  pub fn get(&self, name: &str) -> Option<&DependencyRef> {
    self.entries.iter().find(|d| d.name == name)
  }

  pub fn contains(&self, name: &str) -> bool {
    self.get(name).is_some()
  }

  pub fn len(&self) -> usize {
    self.entries.len()
  }

  pub fn is_empty(&self) -> bool {
    self.entries.is_empty()
  }

  /// True when both sets are views of the same allocation.
  pub fn shares_storage_with(&self, other: &DependencySet) -> bool {
    Arc::ptr_eq(&self.entries, &other.entries)
  }
}

impl Default for DependencySet {
  fn default() -> Self {
    Self::empty()
  }
}

impl PartialEq for DependencySet {
  fn eq(&self, other: &Self) -> bool {
    self.entries[..] == other.entries[..]
  }
}

impl Eq for DependencySet {}

impl fmt::Debug for DependencySet {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_list().entries(self.entries.iter()).finish()
  }
}

impl Serialize for DependencySet {
  fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_seq(self.entries.iter())
  }
}

impl TryFrom<Vec<DependencyRef>> for DependencySet {
  type Error = DependencyError;

  fn try_from(refs: Vec<DependencyRef>) -> Result<Self, Self::Error> {
    Self::build(refs)
  }
}

impl<'a> IntoIterator for &'a DependencySet {
  type Item = &'a DependencyRef;
  type IntoIter = std::slice::Iter<'a, DependencyRef>;

  fn into_iter(self) -> Self::IntoIter {
    self.iter()
  }
}
