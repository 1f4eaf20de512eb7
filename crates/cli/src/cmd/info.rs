use flakemx_lib::platform::paths::store_dir;
use flakemx_lib::platform::{default_systems, platform_triple};

use crate::output::print_stat;

pub fn cmd_info() {
  println!("System:");
  match platform_triple() {
    Some(triple) => print_stat("Platform", &triple),
    _ => println!("Could not detect platform."),
  }
  print_stat("Store", &store_dir().display().to_string());

  let defaults: Vec<_> = default_systems().iter().map(|s| s.to_string()).collect();
  print_stat("Default systems", &defaults.join(", "));
}
