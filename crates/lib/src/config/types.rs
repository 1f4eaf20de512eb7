use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::builder::CatalogEntry;
use crate::consts::{DEV_SHELL_OUTPUT, PACKAGE_OUTPUT};
use crate::deps::DependencyRef;
use crate::platform::SystemId;

/// A parsed descriptor file.
///
/// # Example
///
/// ```toml
/// systems = ["x86_64-linux", "aarch64-linux"]
/// dependencies = ["glib", "polkit", "pkg-config"]
///
/// [package]
/// name = "udisks-tui"
///
/// [shell]
/// dependencies = ["cargo", "rustc"]
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Descriptor {
  #[serde(default)]
  pub description: Option<String>,
  /// Systems to evaluate. Defaults to the common Linux and Darwin systems.
  #[serde(default)]
  pub systems: Option<Vec<SystemId>>,
  /// Native inputs shared by every output.
  #[serde(default)]
  pub dependencies: Vec<DependencyRef>,
  /// Outputs every system must produce.
  #[serde(default = "default_outputs")]
  pub outputs: Vec<String>,
  /// Maximum number of systems evaluated at once.
  #[serde(default)]
  pub parallelism: Option<usize>,
  /// Store root for artifact prefixes, overriding `FLAKEMX_STORE`.
  #[serde(default)]
  pub store: Option<String>,
  pub package: PackageConfig,
  #[serde(default)]
  pub shell: ShellConfig,
  #[serde(default)]
  pub toolchain: ToolchainConfig,
  #[serde(default)]
  pub catalog: BTreeMap<String, CatalogEntry>,
}

fn default_outputs() -> Vec<String> {
  vec![PACKAGE_OUTPUT.to_string(), DEV_SHELL_OUTPUT.to_string()]
}

/// Template for the `package` output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PackageConfig {
  pub name: String,
  #[serde(default = "default_version")]
  pub version: String,
  #[serde(default = "default_src")]
  pub src: String,
  #[serde(default = "default_build_system")]
  pub build_system: String,
  /// Also expose the package as the `default` output.
  #[serde(default)]
  pub default_alias: bool,
}

fn default_version() -> String {
  "0.1.0".to_string()
}

fn default_src() -> String {
  ".".to_string()
}

fn default_build_system() -> String {
  "cargo".to_string()
}

/// Development shell extras.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ShellConfig {
  /// Tools only present in the shell, appended after the shared inputs.
  #[serde(default)]
  pub dependencies: Vec<DependencyRef>,
  #[serde(default)]
  pub env: BTreeMap<String, String>,
}

/// Toolchain capabilities.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ToolchainConfig {
  /// Systems the toolchain can build for. Defaults to every known system.
  #[serde(default)]
  pub systems: Option<Vec<SystemId>>,
}
