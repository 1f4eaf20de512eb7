//! flakemx-lib: Core types and logic for flakemx
//!
//! This crate evaluates a multi-target build descriptor into a queryable map
//! of outputs keyed by system and output name:
//! - `DependencySet`: immutable, ordered native dependencies shared by outputs
//! - `SystemEnumerator`: the closed set of target systems
//! - `OutputBuilder`: per-system function producing named outputs
//! - `MatrixEvaluator`: runs the builder across every system
//! - `OutputRegistry`: read-only queries over a completed evaluation

pub mod builder;
pub mod config;
pub mod consts;
pub mod deps;
pub mod eval;
pub mod matrix;
pub mod output;
pub mod platform;
pub mod registry;
pub mod shell;
pub mod systems;
pub mod util;
