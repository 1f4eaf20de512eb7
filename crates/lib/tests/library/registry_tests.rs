use flakemx_lib::matrix::MatrixEvaluator;
use flakemx_lib::registry::{OutputRegistry, QueryError};
use flakemx_lib::systems::StaticSystems;

use super::common::{package_and_shell, shared_deps};

#[test]
fn queries_against_an_evaluated_matrix() {
  let evaluator = MatrixEvaluator::new(
    StaticSystems::new(["x86_64-linux", "aarch64-darwin"]),
    package_and_shell,
    shared_deps(),
  );
  let result = evaluator.evaluate().unwrap();
  let registry = OutputRegistry::new(&result);

  let package = registry.get("x86_64-linux", "package").unwrap();
  assert_eq!(package.as_package().unwrap().build_args, ["--system=x86_64-linux"]);

  let outputs: Vec<_> = registry.list_outputs("aarch64-darwin").unwrap().into_iter().collect();
  assert_eq!(outputs, ["devShell", "package"]);

  assert_eq!(
    registry.get("x86_64-linux", "nonexistent").unwrap_err(),
    QueryError::UnknownOutput {
      system: "x86_64-linux".to_string(),
      output: "nonexistent".to_string(),
    }
  );
  assert_eq!(
    registry.list_outputs("riscv64-linux").unwrap_err(),
    QueryError::UnknownSystem("riscv64-linux".to_string())
  );
}
