use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::deps::DependencySet;
use crate::platform::SystemId;

/// Errors raised when an output map violates the output contract.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OutputError {
  /// The same output name was produced twice.
  #[error("output '{0}' produced more than once")]
  Duplicate(String),

  /// The output name is empty or contains `.` or whitespace.
  #[error("invalid output name '{0}'")]
  InvalidName(String),

  /// A required output was not produced.
  #[error("required output '{0}' is missing")]
  Missing(String),
}

/// What the package resolver produced for one dependency on one system.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtifactSpec {
  pub name: String,
  pub version: String,
  /// Attribute path the artifact is known by in the package set.
  pub attr: String,
  /// Install prefix of the artifact for the target system.
  pub prefix: String,
  pub system: SystemId,
}

/// A package build description.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageSpec {
  pub name: String,
  pub version: String,
  pub src: String,
  pub build_system: String,
  /// Resolved native inputs, in dependency set order.
  pub inputs: Vec<ArtifactSpec>,
  /// Arguments handed to the build system, derived from `inputs`.
  pub build_args: Vec<String>,
}

/// A development shell environment description.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShellSpec {
  /// Plain environment variables.
  pub env: BTreeMap<String, String>,
  /// `PATH`-like variables and the entries prepended to them, in order.
  pub search_paths: BTreeMap<String, Vec<String>>,
  /// Names of the packages available in the shell, in order.
  pub packages: Vec<String>,
}

impl ShellSpec {
  /// Append `entry` to the search path `var`, skipping duplicates.
  pub fn push_path(&mut self, var: &str, entry: impl Into<String>) {
    let entry = entry.into();
    let paths = self.search_paths.entry(var.to_string()).or_default();
    if !paths.contains(&entry) {
      paths.push(entry);
    }
  }
}

/// Capability-specific payload of an output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum OutputPayload {
  Package(PackageSpec),
  DevShell(ShellSpec),
}

/// A named build output for one system.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputDescriptor {
  #[serde(flatten)]
  payload: OutputPayload,
  dependencies: DependencySet,
}

impl OutputDescriptor {
  pub fn new(payload: OutputPayload, dependencies: DependencySet) -> Self {
    Self { payload, dependencies }
  }

  pub fn package(spec: PackageSpec, dependencies: DependencySet) -> Self {
    Self::new(OutputPayload::Package(spec), dependencies)
  }

  pub fn dev_shell(spec: ShellSpec, dependencies: DependencySet) -> Self {
    Self::new(OutputPayload::DevShell(spec), dependencies)
  }

  pub fn payload(&self) -> &OutputPayload {
    &self.payload
  }

  /// The dependency set this output was composed with.
  pub fn dependencies(&self) -> &DependencySet {
    &self.dependencies
  }

  /// Short name of the payload kind, as used in serialized output.
  pub fn kind(&self) -> &'static str {
    match self.payload {
      OutputPayload::Package(_) => "package",
      OutputPayload::DevShell(_) => "devShell",
    }
  }

  pub fn as_package(&self) -> Option<&PackageSpec> {
    match &self.payload {
      OutputPayload::Package(spec) => Some(spec),
      _ => None,
    }
  }

  pub fn as_shell(&self) -> Option<&ShellSpec> {
    match &self.payload {
      OutputPayload::DevShell(spec) => Some(spec),
      _ => None,
    }
  }
}

/// Returns true when `name` may be used as an output name.
pub fn is_valid_output_name(name: &str) -> bool {
  !name.is_empty() && !name.contains('.') && !name.chars().any(char::is_whitespace)
}

/// Output name to descriptor mapping for a single system.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OutputMap(BTreeMap<String, OutputDescriptor>);

impl OutputMap {
  pub fn new() -> Self {
    Self(BTreeMap::new())
  }

  /// Insert a new output. Names must be valid and unique within the map.
  pub fn insert(&mut self, name: impl Into<String>, descriptor: OutputDescriptor) -> Result<(), OutputError> {
    let name = name.into();
    if !is_valid_output_name(&name) {
      return Err(OutputError::InvalidName(name));
    }
    if self.0.contains_key(&name) {
      return Err(OutputError::Duplicate(name));
    }
    self.0.insert(name, descriptor);
    Ok(())
  }

  /// Builder-style [`insert`](Self::insert).
  pub fn with(mut self, name: impl Into<String>, descriptor: OutputDescriptor) -> Result<Self, OutputError> {
    self.insert(name, descriptor)?;
    Ok(self)
  }

  pub fn get(&self, name: &str) -> Option<&OutputDescriptor> {
    self.0.get(name)
  }

  pub fn contains(&self, name: &str) -> bool {
    self.0.contains_key(name)
  }

  /// Output names in sorted order.
  pub fn names(&self) -> impl Iterator<Item = &str> {
    self.0.keys().map(String::as_str)
  }

  pub fn iter(&self) -> impl Iterator<Item = (&str, &OutputDescriptor)> {
    self.0.iter().map(|(name, descriptor)| (name.as_str(), descriptor))
  }

  pub fn len(&self) -> usize {
    self.0.len()
  }

  pub fn is_empty(&self) -> bool {
    self.0.is_empty()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn shell(deps: &DependencySet) -> OutputDescriptor {
    OutputDescriptor::dev_shell(ShellSpec::default(), deps.clone())
  }

  mod output_map {
    use super::*;

    #[test]
    fn insert_rejects_duplicate_names() {
      let deps = DependencySet::parse(["glib"]).unwrap();
      let mut outputs = OutputMap::new();

      outputs.insert("devShell", shell(&deps)).unwrap();
      let result = outputs.insert("devShell", shell(&deps));

      assert_eq!(result, Err(OutputError::Duplicate("devShell".to_string())));
      assert_eq!(outputs.len(), 1);
    }

    #[test]
    fn insert_rejects_invalid_names() {
      let deps = DependencySet::empty();
      let mut outputs = OutputMap::new();

      for name in ["", "dev shell", "packages.default"] {
        assert_eq!(
          outputs.insert(name, shell(&deps)),
          Err(OutputError::InvalidName(name.to_string()))
        );
      }
      assert!(outputs.is_empty());
    }

    #[test]
    fn names_are_sorted() {
      let deps = DependencySet::empty();
      let outputs = OutputMap::new()
        .with("package", shell(&deps))
        .unwrap()
        .with("devShell", shell(&deps))
        .unwrap()
        .with("default", shell(&deps))
        .unwrap();

      assert_eq!(outputs.names().collect::<Vec<_>>(), ["default", "devShell", "package"]);
    }
  }

  mod descriptor {
    use super::*;

    #[test]
    fn shares_dependency_storage() {
      let deps = DependencySet::parse(["glib", "polkit"]).unwrap();
      let descriptor = shell(&deps);
      assert!(descriptor.dependencies().shares_storage_with(&deps));
    }

    #[test]
    fn serializes_with_type_tag_and_dependencies() {
      let deps = DependencySet::parse(["glib"]).unwrap();
      let mut spec = ShellSpec::default();
      spec.packages.push("glib".to_string());

      let json = serde_json::to_value(OutputDescriptor::dev_shell(spec, deps)).unwrap();

      assert_eq!(json["type"], "devShell");
      assert_eq!(json["packages"][0], "glib");
      assert_eq!(json["dependencies"][0]["name"], "glib");
    }

    #[test]
    fn kind_matches_payload() {
      let descriptor = shell(&DependencySet::empty());
      assert_eq!(descriptor.kind(), "devShell");
      assert!(descriptor.as_shell().is_some());
      assert!(descriptor.as_package().is_none());
    }
  }

  #[test]
  fn push_path_skips_duplicates() {
    let mut spec = ShellSpec::default();
    spec.push_path("PATH", "/a/bin");
    spec.push_path("PATH", "/b/bin");
    spec.push_path("PATH", "/a/bin");

    assert_eq!(spec.search_paths["PATH"], ["/a/bin", "/b/bin"]);
  }
}
