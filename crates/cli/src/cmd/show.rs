//! Implementation of the `flakemx show` command.
//!
//! Evaluates the descriptor for every system and prints the outputs, either as
//! a colored summary or as the full result plus its content hash.

use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;

use flakemx_lib::matrix::MatrixResult;
use flakemx_lib::output::{OutputDescriptor, OutputPayload};
use flakemx_lib::util::hash::Hashable;

use crate::output::{OutputFormat, print_json, print_stat, print_success, symbols, truncate_hash};

#[derive(Serialize)]
struct ShowOutput<'a> {
  hash: String,
  systems: &'a MatrixResult,
}

pub fn cmd_show(config: &Path, format: OutputFormat, jobs: Option<usize>, verbose: bool) -> Result<()> {
  let result = super::evaluate(config, jobs)?;
  let hash = result.compute_hash().context("Failed to compute result hash")?;

  if format.is_json() {
    return print_json(&ShowOutput {
      hash: hash.0,
      systems: &result,
    });
  }

  for (system, outputs) in result.iter() {
    print_success(system.as_str());
    for (name, descriptor) in outputs.iter() {
      print_stat(name, &summarize(descriptor));
      if verbose {
        let deps: Vec<_> = descriptor.dependencies().names().collect();
        println!("      {} {}", symbols::ARROW, deps.join(", "));
      }
    }
  }

  println!();
  println!("Systems: {}", result.len());
  println!("Hash: {}", truncate_hash(&hash.0));
  Ok(())
}

fn summarize(descriptor: &OutputDescriptor) -> String {
  match descriptor.payload() {
    OutputPayload::Package(spec) => format!(
      "{} {}-{} ({} inputs)",
      descriptor.kind(),
      spec.name,
      spec.version,
      spec.inputs.len()
    ),
    OutputPayload::DevShell(spec) => format!("{} ({} packages)", descriptor.kind(), spec.packages.len()),
  }
}
