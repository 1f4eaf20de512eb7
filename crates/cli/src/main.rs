mod cmd;
mod output;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use flakemx_lib::consts::CONFIG_FILENAME;

use crate::cmd::{cmd_env, cmd_get, cmd_info, cmd_show, cmd_systems};
use crate::output::OutputFormat;

/// flakemx - Multi-target build descriptor evaluator
#[derive(Parser)]
#[command(name = "flakemx")]
#[command(author, version, about, long_about = None)]
struct Cli {
  /// Enable verbose output
  #[arg(short, long, global = true)]
  verbose: bool,

  #[command(subcommand)]
  command: Commands,
}

#[derive(Subcommand)]
enum Commands {
  /// Evaluate the descriptor and show every system and output
  Show {
    /// Path to the descriptor file
    #[arg(short, long, default_value = CONFIG_FILENAME)]
    config: PathBuf,

    /// Output format
    #[arg(short = 'o', long, value_enum, default_value = "text")]
    format: OutputFormat,

    /// Maximum number of systems evaluated at once
    #[arg(short, long, value_parser = clap::value_parser!(u16).range(1..))]
    jobs: Option<u16>,
  },

  /// Print one output descriptor as JSON
  Get {
    /// Target system, e.g. x86_64-linux
    system: String,

    /// Output name, e.g. package
    output: String,

    /// Path to the descriptor file
    #[arg(short, long, default_value = CONFIG_FILENAME)]
    config: PathBuf,
  },

  /// List the systems the descriptor evaluates
  Systems {
    /// Path to the descriptor file
    #[arg(short, long, default_value = CONFIG_FILENAME)]
    config: PathBuf,
  },

  /// Print a development shell activation script
  Env {
    /// Target system (defaults to the host system)
    system: Option<String>,

    /// Path to the descriptor file
    #[arg(short, long, default_value = CONFIG_FILENAME)]
    config: PathBuf,

    /// Shell to generate the script for (auto-detected if not specified)
    #[arg(short, long)]
    shell: Option<String>,
  },

  /// Show host platform information
  Info,
}

fn main() -> Result<()> {
  let cli = Cli::parse();

  let default_level = if cli.verbose { "debug" } else { "warn" };
  let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
  tracing_subscriber::fmt()
    .with_env_filter(filter)
    .with_writer(std::io::stderr)
    .without_time()
    .init();

  match cli.command {
    Commands::Show { config, format, jobs } => cmd_show(&config, format, jobs.map(usize::from), cli.verbose),
    Commands::Get { system, output, config } => cmd_get(&config, &system, &output),
    Commands::Systems { config } => cmd_systems(&config),
    Commands::Env { system, config, shell } => cmd_env(&config, system.as_deref(), shell.as_deref()),
    Commands::Info => {
      cmd_info();
      Ok(())
    }
  }
}
