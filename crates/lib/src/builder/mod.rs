//! Output builders and their collaborators.
//!
//! An [`OutputBuilder`] turns one system plus the shared dependency set into
//! that system's [`OutputMap`](crate::output::OutputMap). It is invoked once
//! per system and must be pure with respect to those two inputs.
//!
//! # Submodules
//!
//! - [`resolver`] - Package Resolver capability and the catalog-backed default
//! - [`compose`] - Shell Environment Composer capability and the search-path default
//! - [`standard`] - The configuration-driven builder producing `package` and `devShell`

pub mod compose;
pub mod resolver;
pub mod standard;
mod types;

pub use compose::{SearchPathComposer, ShellComposer};
pub use resolver::{CatalogEntry, CatalogResolver, PackageResolver};
pub use standard::StandardBuilder;
pub use types::*;
