use std::path::PathBuf;

use crate::consts::APP_NAME;
use crate::platform::SystemId;

/// Environment variable overriding the store root.
pub const STORE_ENV: &str = "FLAKEMX_STORE";

#[cfg(windows)]
pub fn root_dir() -> PathBuf {
  let drive = std::env::var("SYSTEMDRIVE").unwrap_or_else(|_| "C:".to_string());
  PathBuf::from(format!("{}\\", drive)).join(APP_NAME)
}

#[cfg(not(windows))]
pub fn root_dir() -> PathBuf {
  PathBuf::from("/").join(APP_NAME)
}

/// Returns the store root artifact prefixes are laid out under.
///
/// `FLAKEMX_STORE` takes precedence over the platform default.
pub fn store_dir() -> PathBuf {
  std::env::var_os(STORE_ENV)
    .filter(|v| !v.is_empty())
    .map(PathBuf::from)
    .unwrap_or_else(|| root_dir().join("store"))
}

/// Prefix of a versioned artifact: `<root>/<system>/<name>-<version>`.
pub fn artifact_prefix(root: &str, system: &SystemId, name: &str, version: &str) -> String {
  format!("{}/{}/{}-{}", root.trim_end_matches('/'), system, name, version)
}

/// Prefix of a profile link for a dependency: `<root>/<system>/<name>`.
pub fn profile_prefix(root: &str, system: &SystemId, name: &str) -> String {
  format!("{}/{}/{}", root.trim_end_matches('/'), system, name)
}
