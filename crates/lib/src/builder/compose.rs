//! Shell environment composition.

use crate::deps::DependencySet;
use crate::output::ShellSpec;
use crate::platform::SystemId;
use crate::platform::os::Os;
use crate::platform::paths::profile_prefix;

/// Variable recording which system a shell was composed for.
pub const SYSTEM_VAR: &str = "FLAKEMX_SYSTEM";

/// Turns a dependency set into a shell environment for a system.
pub trait ShellComposer: Send + Sync {
  fn compose(&self, deps: &DependencySet, system: &SystemId) -> ShellSpec;
}

/// Composer laying every dependency out under a profile prefix and
/// prepending its directories to the usual search paths, in set order.
#[derive(Debug, Clone)]
pub struct SearchPathComposer {
  store_root: String,
}

impl SearchPathComposer {
  pub fn new(store_root: impl Into<String>) -> Self {
    Self {
      store_root: store_root.into(),
    }
  }
}

/// Dynamic library search variable for the system's OS, if known.
fn library_path_var(system: &SystemId) -> Option<&'static str> {
  match system.platform()?.os {
    Os::Linux => Some("LD_LIBRARY_PATH"),
    Os::MacOs => Some("DYLD_FALLBACK_LIBRARY_PATH"),
    Os::Windows => Some("PATH"),
  }
}

impl ShellComposer for SearchPathComposer {
  fn compose(&self, deps: &DependencySet, system: &SystemId) -> ShellSpec {
    let mut spec = ShellSpec::default();
    spec.env.insert(SYSTEM_VAR.to_string(), system.to_string());

    let lib_var = library_path_var(system);
    for dep in deps {
      let prefix = profile_prefix(&self.store_root, system, &dep.name);
      spec.push_path("PATH", format!("{}/bin", prefix));
      spec.push_path("PKG_CONFIG_PATH", format!("{}/lib/pkgconfig", prefix));
      if let Some(var) = lib_var {
        spec.push_path(var, format!("{}/lib", prefix));
      }
      spec.packages.push(dep.name.clone());
    }

    spec
  }
}
