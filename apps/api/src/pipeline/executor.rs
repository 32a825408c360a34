//! Pipeline executor: runs stages one after another against a text generator.
//!
//! Flow per stage: check cancellation/deadline → build prompt from context →
//! await generate(prompt) → record output. No retries, no skipping; the first
//! error ends the run and nothing produced so far is returned.

use std::collections::HashSet;

use serde::Serialize;
use thiserror::Error;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::pipeline::context::{ContextError, PipelineContext};
use crate::pipeline::generator::{GenerationError, TextGenerator};
use crate::pipeline::stage::StageSpec;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("pipeline has no stages")]
    EmptyStageList,

    #[error("stage name '{0}' is declared more than once")]
    DuplicateStageName(String),

    #[error("stage '{stage}' needs '{key}', which is not available at this point")]
    MissingContext { stage: String, key: String },

    #[error("generation failed at stage '{stage}' ({position}/{total}): {source}")]
    GenerationFailure {
        stage: String,
        position: usize,
        total: usize,
        #[source]
        source: GenerationError,
    },

    #[error("run cancelled at stage '{stage}'")]
    Cancelled { stage: String },

    #[error("run deadline exceeded at stage '{stage}'")]
    DeadlineExceeded { stage: String },
}

/// Caller-owned abort signals for one run.
#[derive(Debug, Clone, Default)]
pub struct RunControl {
    cancel: CancellationToken,
    deadline: Option<Instant>,
}

impl RunControl {
    pub fn new(cancel: CancellationToken) -> Self {
        Self {
            cancel,
            deadline: None,
        }
    }

    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(deadline);
        self
    }

    fn check(&self, stage: &str) -> Result<(), PipelineError> {
        if self.cancel.is_cancelled() {
            return Err(PipelineError::Cancelled {
                stage: stage.to_string(),
            });
        }
        if self.deadline.is_some_and(|d| Instant::now() >= d) {
            return Err(PipelineError::DeadlineExceeded {
                stage: stage.to_string(),
            });
        }
        Ok(())
    }

    async fn deadline_reached(&self) {
        match self.deadline {
            Some(deadline) => tokio::time::sleep_until(deadline).await,
            None => std::future::pending().await,
        }
    }
}

/// Outcome of a successful run. Holds no timestamps or ids, so two runs over the
/// same inputs against a deterministic generator compare equal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunResult {
    pub final_text: String,
    pub per_stage_outputs: PipelineContext,
}

/// Runs `stages` in order, starting from `initial`.
///
/// Every stage is invoked exactly once on success. On failure no further stage is
/// invoked and no partial result escapes.
#[tracing::instrument(
    name = "pipeline_run",
    skip_all,
    fields(run_id = %Uuid::new_v4(), stages = stages.len())
)]
pub async fn run(
    stages: &[StageSpec],
    initial: PipelineContext,
    generator: &dyn TextGenerator,
    control: &RunControl,
) -> Result<RunResult, PipelineError> {
    validate_stages(stages)?;

    let total = stages.len();
    let run_start = std::time::Instant::now();
    let mut context = initial;

    info!("Starting pipeline with {total} stages");

    for (index, stage) in stages.iter().enumerate() {
        let name = stage.name();
        control.check(name)?;

        let prompt = stage
            .build_prompt(&context)
            .map_err(|e| missing_context(name, e))?;

        info!("Executing stage {}/{}: {}", index + 1, total, name);
        let stage_start = std::time::Instant::now();

        let output = tokio::select! {
            biased;
            _ = control.cancel.cancelled() => {
                warn!("Run cancelled during stage {name}");
                return Err(PipelineError::Cancelled { stage: name.to_string() });
            }
            _ = control.deadline_reached() => {
                warn!("Run deadline reached during stage {name}");
                return Err(PipelineError::DeadlineExceeded { stage: name.to_string() });
            }
            result = generator.generate(&prompt) => result.map_err(|source| {
                warn!("Stage {name} failed: {source}");
                PipelineError::GenerationFailure {
                    stage: name.to_string(),
                    position: index + 1,
                    total,
                    source,
                }
            })?,
        };

        debug!(
            "Stage {name} produced {} chars in {}ms",
            output.chars().count(),
            stage_start.elapsed().as_millis()
        );

        context
            .record(name, output)
            .map_err(|e| PipelineError::DuplicateStageName(e.key().to_string()))?;
    }

    let final_text = context
        .last_output()
        .map(|o| o.text.clone())
        .ok_or(PipelineError::EmptyStageList)?;

    info!(
        "Pipeline completed {total} stages in {}ms",
        run_start.elapsed().as_millis()
    );

    Ok(RunResult {
        final_text,
        per_stage_outputs: context,
    })
}

fn validate_stages(stages: &[StageSpec]) -> Result<(), PipelineError> {
    if stages.is_empty() {
        return Err(PipelineError::EmptyStageList);
    }
    let mut seen = HashSet::new();
    for stage in stages {
        if !seen.insert(stage.name()) {
            return Err(PipelineError::DuplicateStageName(stage.name().to_string()));
        }
    }
    Ok(())
}

fn missing_context(stage: &str, err: ContextError) -> PipelineError {
    PipelineError::MissingContext {
        stage: stage.to_string(),
        key: err.key().to_string(),
    }
}
