//! The configuration-driven output builder.

use std::collections::BTreeMap;
use std::sync::Arc;

use tracing::debug;

use crate::builder::{OutputBuilder, PackageResolver, ShellComposer, SystemError};
use crate::config::PackageConfig;
use crate::consts::{DEFAULT_OUTPUT, DEV_SHELL_OUTPUT, PACKAGE_OUTPUT};
use crate::deps::DependencySet;
use crate::output::{ArtifactSpec, OutputDescriptor, OutputMap, PackageSpec};
use crate::platform::{SystemId, known_systems};

/// Builds `package` and `devShell` outputs from a package template.
///
/// - `package` carries the shared dependency set itself, so every system's
///   package points at the same storage.
/// - `devShell` carries the shared set merged with the shell-only tools
///   (shared entries first).
/// - `default` aliases `package` when enabled in the template.
#[derive(Clone)]
pub struct StandardBuilder {
  package: PackageConfig,
  shell_deps: DependencySet,
  shell_env: BTreeMap<String, String>,
  toolchain: Vec<SystemId>,
  resolver: Arc<dyn PackageResolver>,
  composer: Arc<dyn ShellComposer>,
}

impl StandardBuilder {
  /// Create a builder supporting every known system and no shell extras.
  pub fn new(package: PackageConfig, resolver: Arc<dyn PackageResolver>, composer: Arc<dyn ShellComposer>) -> Self {
    Self {
      package,
      shell_deps: DependencySet::empty(),
      shell_env: BTreeMap::new(),
      toolchain: known_systems(),
      resolver,
      composer,
    }
  }

  /// Tools and variables only present in the development shell.
  pub fn with_shell(mut self, deps: DependencySet, env: BTreeMap<String, String>) -> Self {
    self.shell_deps = deps;
    self.shell_env = env;
    self
  }

  /// Restrict the systems the toolchain can build for.
  pub fn with_toolchain(mut self, systems: Vec<SystemId>) -> Self {
    self.toolchain = systems;
    self
  }

  fn resolve_all(&self, deps: &DependencySet, system: &SystemId) -> Result<Vec<ArtifactSpec>, SystemError> {
    deps.iter().map(|dep| self.resolver.resolve(dep, system)).collect()
  }

  fn package_spec(&self, system: &SystemId, inputs: Vec<ArtifactSpec>) -> PackageSpec {
    let mut build_args = vec![format!("--system={}", system)];
    build_args.extend(inputs.iter().map(|a| format!("--input={}={}", a.name, a.prefix)));

    PackageSpec {
      name: self.package.name.clone(),
      version: self.package.version.clone(),
      src: self.package.src.clone(),
      build_system: self.package.build_system.clone(),
      inputs,
      build_args,
    }
  }
}

impl OutputBuilder for StandardBuilder {
  fn build(&self, system: &SystemId, deps: &DependencySet) -> Result<OutputMap, SystemError> {
    if !self.toolchain.contains(system) {
      let supported: Vec<&str> = self.toolchain.iter().map(SystemId::as_str).collect();
      return Err(SystemError::unsupported(
        system,
        format!("toolchain targets {}", supported.join(", ")),
      ));
    }

    let inputs = self.resolve_all(deps, system)?;
    let package = OutputDescriptor::package(self.package_spec(system, inputs), deps.clone());

    let shell_deps = deps.merge(&self.shell_deps);
    // Shell-only tools must exist for the system too. Shared names were
    // resolved above with the constraint the merge kept.
    for dep in shell_deps.iter().filter(|d| !deps.contains(&d.name)) {
      self.resolver.resolve(dep, system)?;
    }
    let mut shell = self.composer.compose(&shell_deps, system);
    shell
      .env
      .extend(self.shell_env.iter().map(|(k, v)| (k.clone(), v.clone())));

    let mut outputs = OutputMap::new();
    if self.package.default_alias {
      outputs.insert(DEFAULT_OUTPUT, package.clone())?;
    }
    outputs.insert(PACKAGE_OUTPUT, package)?;
    outputs.insert(DEV_SHELL_OUTPUT, OutputDescriptor::dev_shell(shell, shell_deps))?;

    debug!(%system, outputs = outputs.len(), "built outputs");
    Ok(outputs)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::builder::{CatalogEntry, CatalogResolver, SearchPathComposer};

  fn package() -> PackageConfig {
    PackageConfig {
      name: "udisks-tui".to_string(),
      version: "0.1.0".to_string(),
      src: ".".to_string(),
      build_system: "cargo".to_string(),
      default_alias: false,
    }
  }

  fn builder() -> StandardBuilder {
    StandardBuilder::new(
      package(),
      Arc::new(CatalogResolver::open("/store")),
      Arc::new(SearchPathComposer::new("/store")),
    )
    .with_shell(
      DependencySet::parse(["cargo", "rustc"]).unwrap(),
      BTreeMap::from([("RUST_BACKTRACE".to_string(), "1".to_string())]),
    )
  }

  fn native() -> DependencySet {
    DependencySet::parse(["glib", "polkit", "pkg-config"]).unwrap()
  }

  fn linux() -> SystemId {
    SystemId::from("x86_64-linux")
  }

  #[test]
  fn produces_package_and_dev_shell() {
    let outputs = builder().build(&linux(), &native()).unwrap();
    assert_eq!(outputs.names().collect::<Vec<_>>(), ["devShell", "package"]);
  }

  #[test]
  fn package_shares_the_input_set() {
    let deps = native();
    let outputs = builder().build(&linux(), &deps).unwrap();

    let package = outputs.get(PACKAGE_OUTPUT).unwrap();
    assert!(package.dependencies().shares_storage_with(&deps));

    let spec = package.as_package().unwrap();
    let inputs: Vec<&str> = spec.inputs.iter().map(|a| a.name.as_str()).collect();
    assert_eq!(inputs, ["glib", "polkit", "pkg-config"]);
    assert_eq!(spec.build_args[0], "--system=x86_64-linux");
    assert_eq!(spec.build_args[1], "--input=glib=/store/x86_64-linux/glib-latest");
  }

  #[test]
  fn dev_shell_puts_shared_inputs_before_tools() {
    let outputs = builder().build(&linux(), &native()).unwrap();
    let shell = outputs.get(DEV_SHELL_OUTPUT).unwrap();

    let names: Vec<&str> = shell.dependencies().names().collect();
    assert_eq!(names, ["glib", "polkit", "pkg-config", "cargo", "rustc"]);

    let spec = shell.as_shell().unwrap();
    assert_eq!(spec.packages, names);
    assert_eq!(spec.env["RUST_BACKTRACE"], "1");
  }

  #[test]
  fn default_alias_duplicates_package() {
    let mut template = package();
    template.default_alias = true;
    let builder = StandardBuilder::new(
      template,
      Arc::new(CatalogResolver::open("/store")),
      Arc::new(SearchPathComposer::new("/store")),
    );

    let outputs = builder.build(&linux(), &native()).unwrap();
    assert_eq!(outputs.get(DEFAULT_OUTPUT), outputs.get(PACKAGE_OUTPUT));
  }

  #[test]
  fn system_outside_toolchain_is_unsupported() {
    let builder = builder().with_toolchain(vec![linux()]);
    let err = builder.build(&SystemId::from("aarch64-darwin"), &native()).unwrap_err();

    assert_eq!(
      err,
      SystemError::Unsupported {
        system: SystemId::from("aarch64-darwin"),
        reason: "toolchain targets x86_64-linux".to_string(),
      }
    );
  }

  #[test]
  fn missing_shell_tool_is_a_resolution_error() {
    let catalog = BTreeMap::from([
      ("glib".to_string(), CatalogEntry::default()),
      ("polkit".to_string(), CatalogEntry::default()),
      ("pkg-config".to_string(), CatalogEntry::default()),
      ("cargo".to_string(), CatalogEntry::default()),
    ]);
    let builder = StandardBuilder::new(
      package(),
      Arc::new(CatalogResolver::new(catalog, "/store")),
      Arc::new(SearchPathComposer::new("/store")),
    )
    .with_shell(DependencySet::parse(["cargo", "rustc"]).unwrap(), BTreeMap::new());

    let err = builder.build(&linux(), &native()).unwrap_err();
    assert!(matches!(err, SystemError::Resolution { ref dependency, .. } if dependency == "rustc"));
  }

  #[test]
  fn shell_constraint_dropped_by_merge_is_not_resolved() {
    let catalog = BTreeMap::from([
      (
        "glib".to_string(),
        CatalogEntry {
          version: Some("2.76.0".to_string()),
          ..Default::default()
        },
      ),
      ("cargo".to_string(), CatalogEntry::default()),
    ]);
    let builder = StandardBuilder::new(
      package(),
      Arc::new(CatalogResolver::new(catalog, "/store")),
      Arc::new(SearchPathComposer::new("/store")),
    )
    .with_shell(DependencySet::parse(["glib@>=2.80", "cargo"]).unwrap(), BTreeMap::new());

    let outputs = builder
      .build(&linux(), &DependencySet::parse(["glib@>=2.76"]).unwrap())
      .unwrap();
    let shell = outputs.get(DEV_SHELL_OUTPUT).unwrap();
    assert_eq!(shell.dependencies().get("glib").unwrap().version.as_deref(), Some(">=2.76"));
    assert!(shell.dependencies().contains("cargo"));
  }

  #[test]
  fn same_inputs_build_equal_outputs() {
    let builder = builder();
    let deps = native();
    assert_eq!(
      builder.build(&linux(), &deps).unwrap(),
      builder.build(&linux(), &deps).unwrap()
    );
  }
}
