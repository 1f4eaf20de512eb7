//! Output descriptors and per-system output maps.
//!
//! An [`OutputDescriptor`] pairs a capability-specific payload (a package
//! build description or a development shell environment) with the
//! [`DependencySet`](crate::deps::DependencySet) it was composed with. The set
//! is shared, never copied: descriptors built from the same set point at the
//! same storage.

mod types;

pub use types::*;
