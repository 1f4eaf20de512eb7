//! Target systems.
//!
//! A [`SystemId`] is the opaque identifier evaluation is keyed by. Known
//! architecture/OS pairs can be interpreted as a [`Platform`], but any
//! non-empty string is a valid system id.

pub mod arch;
pub mod os;
pub mod paths;

use std::borrow::Borrow;
use std::fmt;

use arch::Arch;
use os::Os;
use serde::{Deserialize, Serialize};

/// Platform identifier combining architecture and OS (e.g., "aarch64-darwin")
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Platform {
  pub arch: Arch,
  pub os: Os,
}

impl Platform {
  /// Create a new platform identifier
  pub fn new(arch: Arch, os: Os) -> Self {
    Self { arch, os }
  }

  /// Detect the current platform at runtime
  ///
  /// Returns `None` if the OS or architecture is not supported
  pub fn current() -> Option<Self> {
    Some(Self {
      arch: Arch::current()?,
      os: Os::current()?,
    })
  }

  /// Parse a triple such as `x86_64-linux`
  pub fn parse(triple: &str) -> Option<Self> {
    let (arch, os) = triple.split_once('-')?;
    Some(Self {
      arch: Arch::parse(arch)?,
      os: Os::parse(os)?,
    })
  }

  /// Returns the platform triple string (e.g., "aarch64-darwin")
  pub fn triple(&self) -> String {
    format!("{}-{}", self.arch, self.os)
  }
}

impl fmt::Display for Platform {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.triple())
  }
}

/// Identifier of a target system, compared by exact string equality.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SystemId(String);

impl SystemId {
  pub fn new(id: impl Into<String>) -> Self {
    Self(id.into())
  }

  /// The system id of the host, if the host platform is known.
  pub fn current() -> Option<Self> {
    Platform::current().map(Self::from)
  }

  pub fn as_str(&self) -> &str {
    &self.0
  }

  /// Interpret this id as a known platform pair.
  pub fn platform(&self) -> Option<Platform> {
    Platform::parse(&self.0)
  }
}

impl fmt::Display for SystemId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.0)
  }
}

impl From<Platform> for SystemId {
  fn from(platform: Platform) -> Self {
    Self(platform.triple())
  }
}

impl From<&str> for SystemId {
  fn from(id: &str) -> Self {
    Self(id.to_string())
  }
}

impl From<String> for SystemId {
  fn from(id: String) -> Self {
    Self(id)
  }
}

impl Borrow<str> for SystemId {
  fn borrow(&self) -> &str {
    &self.0
  }
}

/// The systems evaluated when a descriptor does not list any.
pub fn default_systems() -> Vec<SystemId> {
  [
    Platform::new(Arch::X86_64, Os::Linux),
    Platform::new(Arch::Aarch64, Os::Linux),
    Platform::new(Arch::X86_64, Os::MacOs),
    Platform::new(Arch::Aarch64, Os::MacOs),
  ]
  .into_iter()
  .map(SystemId::from)
  .collect()
}

/// Every known architecture/OS pair.
pub fn known_systems() -> Vec<SystemId> {
  let mut systems = Vec::new();
  for os in [Os::Linux, Os::MacOs, Os::Windows] {
    for arch in Arch::ALL {
      systems.push(SystemId::from(Platform::new(arch, os)));
    }
  }
  systems
}

/// Returns the platform triple for the current system (e.g., "aarch64-darwin")
///
/// Returns `None` if the current platform is not supported
pub fn platform_triple() -> Option<String> {
  Platform::current().map(|p| p.triple())
}
