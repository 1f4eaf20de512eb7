use std::fmt;

/// CPU architecture variants known to flakemx
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Arch {
  X86_64,
  Aarch64,
  I686,
}

impl Arch {
  /// All known architectures, in the order used for default system lists
  pub const ALL: [Arch; 3] = [Arch::X86_64, Arch::Aarch64, Arch::I686];

  /// Detect the current CPU architecture at runtime
  pub fn current() -> Option<Self> {
    Self::parse(std::env::consts::ARCH)
  }

  /// Parse the lowercase identifier used in system ids
  pub fn parse(s: &str) -> Option<Self> {
    match s {
      "x86_64" => Some(Self::X86_64),
      "aarch64" => Some(Self::Aarch64),
      "i686" | "x86" => Some(Self::I686),
      _ => None,
    }
  }

  /// Returns the lowercase string identifier for this architecture
  pub fn as_str(&self) -> &'static str {
    match self {
      Self::X86_64 => "x86_64",
      Self::Aarch64 => "aarch64",
      Self::I686 => "i686",
    }
  }
}

impl fmt::Display for Arch {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.as_str())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn parse_roundtrips_identifier() {
    for arch in Arch::ALL {
      assert_eq!(Arch::parse(arch.as_str()), Some(arch));
    }
  }

  #[test]
  fn rust_x86_alias_maps_to_i686() {
    // std::env::consts::ARCH reports "x86" for 32-bit Intel targets
    assert_eq!(Arch::parse("x86"), Some(Arch::I686));
  }

  #[test]
  fn unknown_arch_is_none() {
    assert_eq!(Arch::parse("sparc64"), None);
  }
}
