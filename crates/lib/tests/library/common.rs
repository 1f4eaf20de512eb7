use flakemx_lib::builder::SystemError;
use flakemx_lib::deps::DependencySet;
use flakemx_lib::output::{OutputDescriptor, OutputMap, PackageSpec, ShellSpec};
use flakemx_lib::platform::SystemId;

pub fn shared_deps() -> DependencySet {
  DependencySet::parse(["glib", "polkit", "pkg-config"]).unwrap()
}

pub fn shell_deps() -> DependencySet {
  DependencySet::parse(["cargo", "rustc"]).unwrap()
}

/// Emits a package carrying the shared set and a shell carrying the merged set.
pub fn package_and_shell(system: &SystemId, deps: &DependencySet) -> Result<OutputMap, SystemError> {
  let package = PackageSpec {
    name: "udisks-tui".to_string(),
    version: "0.1.0".to_string(),
    src: ".".to_string(),
    build_system: "cargo".to_string(),
    inputs: Vec::new(),
    build_args: vec![format!("--system={}", system)],
  };

  let merged = deps.merge(&shell_deps());
  let shell = ShellSpec {
    packages: merged.names().map(String::from).collect(),
    ..Default::default()
  };

  OutputMap::new()
    .with("package", OutputDescriptor::package(package, deps.clone()))?
    .with("devShell", OutputDescriptor::dev_shell(shell, merged))
    .map_err(SystemError::from)
}
