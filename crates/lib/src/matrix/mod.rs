//! System-matrix evaluation.
//!
//! The evaluator runs the output builder once for every enumerated system and
//! aggregates the outcome:
//! - every system succeeded: a complete [`MatrixResult`]
//! - any system failed: an [`AggregateEvaluationError`] naming every failed
//!   system, and no result at all
//!
//! Failures are never retried and never cancel sibling systems, so one pass
//! reports everything that is broken.

mod types;

use std::any::Any;
use std::collections::BTreeMap;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, error, info};

use crate::builder::{OutputBuilder, SystemError, validate_outputs};
use crate::deps::DependencySet;
use crate::output::OutputMap;
use crate::platform::SystemId;
use crate::systems::SystemEnumerator;

pub use types::*;

type Outcome = Result<OutputMap, SystemError>;

/// Orchestrates a system enumerator and an output builder over a shared
/// dependency set.
#[derive(Clone)]
pub struct MatrixEvaluator {
  systems: Arc<dyn SystemEnumerator>,
  builder: Arc<dyn OutputBuilder>,
  deps: DependencySet,
  config: EvalConfig,
}

impl MatrixEvaluator {
  pub fn new(
    systems: impl SystemEnumerator + 'static,
    builder: impl OutputBuilder + 'static,
    deps: DependencySet,
  ) -> Self {
    Self {
      systems: Arc::new(systems),
      builder: Arc::new(builder),
      deps,
      config: EvalConfig::default(),
    }
  }

  pub fn with_config(mut self, config: EvalConfig) -> Self {
    self.config = config;
    self
  }

  pub fn config(&self) -> &EvalConfig {
    &self.config
  }

  /// The shared dependency set handed to every builder invocation.
  pub fn dependencies(&self) -> &DependencySet {
    &self.deps
  }

  /// Evaluate every system in enumeration order on the current thread.
  pub fn evaluate(&self) -> Result<MatrixResult, EvalError> {
    let systems = self.systems.list()?;
    info!(
      systems = systems.len(),
      dependencies = self.deps.len(),
      "starting matrix evaluation"
    );

    let outcomes = systems
      .into_iter()
      .map(|system| {
        let outcome = evaluate_system(self.builder.as_ref(), &system, &self.deps, &self.config.required_outputs);
        (system, outcome)
      })
      .collect();

    Ok(aggregate(outcomes)?)
  }

  /// Evaluate every system as an independent unit of work.
  ///
  /// At most `parallelism` builders run at once. All units are joined before
  /// anything is reported; failures are reported in enumeration order.
  pub async fn evaluate_parallel(&self) -> Result<MatrixResult, EvalError> {
    let systems = self.systems.list()?;
    info!(
      systems = systems.len(),
      dependencies = self.deps.len(),
      parallelism = self.config.parallelism,
      "starting parallel matrix evaluation"
    );

    let permits = self
      .config
      .parallelism
      .min(systems.len())
      .min(Semaphore::MAX_PERMITS)
      .max(1);
    let semaphore = Arc::new(Semaphore::new(permits));
    let mut join_set = JoinSet::new();

    for (index, system) in systems.iter().enumerate() {
      let system = system.clone();
      let builder = self.builder.clone();
      let deps = self.deps.clone();
      let required = self.config.required_outputs.clone();
      let semaphore = semaphore.clone();

      join_set.spawn(async move {
        let _permit = match semaphore.acquire_owned().await {
          Ok(permit) => permit,
          Err(e) => return (index, Err(SystemError::Aborted(e.to_string()))),
        };

        let outcome = tokio::task::spawn_blocking(move || {
          evaluate_system(builder.as_ref(), &system, &deps, &required)
        })
        .await
        .unwrap_or_else(|e| Err(SystemError::Aborted(e.to_string())));

        (index, outcome)
      });
    }

    let mut slots: Vec<Option<Outcome>> = (0..systems.len()).map(|_| None).collect();
    while let Some(joined) = join_set.join_next().await {
      match joined {
        Ok((index, outcome)) => slots[index] = Some(outcome),
        Err(e) => error!(error = %e, "evaluation task failed"),
      }
    }

    let outcomes = systems
      .into_iter()
      .zip(slots)
      .map(|(system, slot)| {
        let outcome = slot.unwrap_or_else(|| Err(SystemError::Aborted("task did not complete".to_string())));
        (system, outcome)
      })
      .collect();

    Ok(aggregate(outcomes)?)
  }
}

/// Build and validate one system's outputs.
///
/// A panicking builder is recorded as [`SystemError::Aborted`] for its
/// system, so a panic never escapes either evaluation mode.
fn evaluate_system(
  builder: &dyn OutputBuilder,
  system: &SystemId,
  deps: &DependencySet,
  required: &[String],
) -> Outcome {
  debug!(%system, "evaluating system");
  let outputs = panic::catch_unwind(AssertUnwindSafe(|| builder.build(system, deps)))
    .map_err(|payload| SystemError::Aborted(format!("builder panicked: {}", panic_message(payload.as_ref()))))??;
  validate_outputs(&outputs, required)?;
  Ok(outputs)
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
  if let Some(message) = payload.downcast_ref::<&str>() {
    message
  } else if let Some(message) = payload.downcast_ref::<String>() {
    message
  } else {
    "unknown panic"
  }
}

/// Turn per-system outcomes into a complete result or an aggregate error.
fn aggregate(outcomes: Vec<(SystemId, Outcome)>) -> Result<MatrixResult, AggregateEvaluationError> {
  let mut succeeded = BTreeMap::new();
  let mut failures = Vec::new();

  for (system, outcome) in outcomes {
    match outcome {
      Ok(outputs) => {
        info!(%system, outputs = outputs.len(), "system evaluated");
        succeeded.insert(system, outputs);
      }
      Err(e) => {
        error!(%system, error = %e, "system failed");
        failures.push((system, e));
      }
    }
  }

  if !failures.is_empty() {
    return Err(AggregateEvaluationError::new(failures));
  }

  info!(systems = succeeded.len(), "matrix evaluation complete");
  Ok(MatrixResult::from_map(succeeded))
}
