//! Shared dependency sets.
//!
//! A [`DependencySet`] is the ordered, deduplicated list of native and runtime
//! dependencies composed into every output of an evaluation. Sets are built
//! once from configuration and never mutated: every transform returns a new
//! set, and clones share the same storage.
//!
//! # Ordering
//!
//! Insertion order is preserved because it is observable downstream (it
//! becomes the order of build arguments and search paths). [`DependencySet::merge`]
//! keeps the receiver's entries first, in their order, followed by the other
//! set's entries whose names are not already present.

mod types;

pub use types::*;
