use flakemx_lib::builder::SystemError;
use flakemx_lib::deps::DependencySet;
use flakemx_lib::matrix::{EvalConfig, EvalError, MatrixEvaluator};
use flakemx_lib::output::OutputMap;
use flakemx_lib::platform::SystemId;
use flakemx_lib::systems::StaticSystems;
use flakemx_lib::util::hash::Hashable;

use super::common::{package_and_shell, shared_deps};

const SYSTEMS: [&str; 3] = ["x86_64-linux", "aarch64-linux", "x86_64-darwin"];

fn rejects_aarch64(system: &SystemId, deps: &DependencySet) -> Result<OutputMap, SystemError> {
  if system.as_str() == "aarch64-linux" {
    return Err(SystemError::unsupported(system, "no cross toolchain"));
  }
  package_and_shell(system, deps)
}

fn required() -> EvalConfig {
  EvalConfig {
    parallelism: 2,
    required_outputs: vec!["package".to_string(), "devShell".to_string()],
  }
}

#[test]
fn every_enumerated_system_is_present() {
  let evaluator = MatrixEvaluator::new(StaticSystems::new(SYSTEMS), package_and_shell, shared_deps());
  let result = evaluator.evaluate().unwrap();

  assert_eq!(result.len(), 3);
  for system in SYSTEMS {
    assert!(result.contains(system), "missing {system}");
  }
}

#[test]
fn package_outputs_share_the_dependency_set() {
  let deps = shared_deps();
  let evaluator = MatrixEvaluator::new(StaticSystems::new(SYSTEMS), package_and_shell, deps.clone());
  let result = evaluator.evaluate().unwrap();

  for (_, outputs) in result.iter() {
    let package = outputs.get("package").unwrap();
    assert!(package.dependencies().shares_storage_with(&deps));

    let shell = outputs.get("devShell").unwrap();
    let names: Vec<_> = shell.dependencies().names().collect();
    assert_eq!(names, ["glib", "polkit", "pkg-config", "cargo", "rustc"]);
  }
}

#[test]
fn one_unsupported_system_fails_the_whole_matrix() {
  let evaluator =
    MatrixEvaluator::new(StaticSystems::new(SYSTEMS), rejects_aarch64, shared_deps()).with_config(required());

  match evaluator.evaluate() {
    Err(EvalError::Evaluation(aggregate)) => {
      let failed: Vec<_> = aggregate.systems().map(|s| s.as_str()).collect();
      assert_eq!(failed, ["aarch64-linux"]);
      assert!(aggregate.to_string().contains("no cross toolchain"));
    }
    other => panic!("expected aggregate failure, got {other:?}"),
  }
}

#[tokio::test]
async fn parallel_evaluation_is_deterministic() {
  let evaluator =
    MatrixEvaluator::new(StaticSystems::new(SYSTEMS), package_and_shell, shared_deps()).with_config(required());

  let first = evaluator.evaluate_parallel().await.unwrap();
  let second = evaluator.evaluate_parallel().await.unwrap();

  assert_eq!(first, second);
  assert_eq!(first.compute_hash().unwrap(), second.compute_hash().unwrap());
  assert_eq!(first, evaluator.evaluate().unwrap());
}
