/// Application name used for store prefixes and log targets.
pub const APP_NAME: &str = "flakemx";

/// Default descriptor file looked up when no path is given.
pub const CONFIG_FILENAME: &str = "flakemx.toml";

/// Length of the truncated object hash used to fingerprint results.
pub const OBJ_HASH_PREFIX_LEN: usize = 20;

/// Output name carrying the package build description.
pub const PACKAGE_OUTPUT: &str = "package";

/// Output name carrying the development shell description.
pub const DEV_SHELL_OUTPUT: &str = "devShell";

/// Output name aliased to the package when `default_alias` is enabled.
pub const DEFAULT_OUTPUT: &str = "default";
