//! Pipeline context: initial inputs plus the append-only record of stage outputs.

use std::collections::BTreeMap;

use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ContextError {
    #[error("input '{0}' was not provided")]
    MissingInput(String),

    #[error("no output recorded for stage '{0}'")]
    MissingOutput(String),

    #[error("output for stage '{0}' is already recorded")]
    AlreadyRecorded(String),
}

impl ContextError {
    /// The input or stage name the error refers to.
    pub fn key(&self) -> &str {
        match self {
            ContextError::MissingInput(key)
            | ContextError::MissingOutput(key)
            | ContextError::AlreadyRecorded(key) => key,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StageOutput {
    pub stage: String,
    pub text: String,
}

/// Outputs are kept in completion order, which is also declared stage order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PipelineContext {
    inputs: BTreeMap<String, String>,
    outputs: Vec<StageOutput>,
}

impl PipelineContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_input(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.inputs.insert(key.into(), value.into());
        self
    }

    pub fn input(&self, key: &str) -> Result<&str, ContextError> {
        self.inputs
            .get(key)
            .map(String::as_str)
            .ok_or_else(|| ContextError::MissingInput(key.to_string()))
    }

    pub fn output(&self, stage: &str) -> Result<&str, ContextError> {
        self.outputs
            .iter()
            .find(|o| o.stage == stage)
            .map(|o| o.text.as_str())
            .ok_or_else(|| ContextError::MissingOutput(stage.to_string()))
    }

    pub fn outputs(&self) -> &[StageOutput] {
        &self.outputs
    }

    pub fn last_output(&self) -> Option<&StageOutput> {
        self.outputs.last()
    }

    /// Number of recorded stage outputs (inputs are not counted).
    pub fn len(&self) -> usize {
        self.outputs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.outputs.is_empty()
    }

    pub(crate) fn record(
        &mut self,
        stage: impl Into<String>,
        text: impl Into<String>,
    ) -> Result<(), ContextError> {
        let stage = stage.into();
        if self.outputs.iter().any(|o| o.stage == stage) {
            return Err(ContextError::AlreadyRecorded(stage));
        }
        self.outputs.push(StageOutput {
            stage,
            text: text.into(),
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inputs_are_readable() {
        let ctx = PipelineContext::new().with_input("tone", "formal");
        assert_eq!(ctx.input("tone").unwrap(), "formal");
        assert_eq!(
            ctx.input("resume").unwrap_err(),
            ContextError::MissingInput("resume".to_string())
        );
    }

    #[test]
    fn test_outputs_keep_recording_order() {
        let mut ctx = PipelineContext::new();
        ctx.record("b", "second").unwrap();
        ctx.record("a", "first").unwrap();
        let stages: Vec<_> = ctx.outputs().iter().map(|o| o.stage.as_str()).collect();
        assert_eq!(stages, vec!["b", "a"]);
        assert_eq!(ctx.last_output().unwrap().text, "first");
        assert_eq!(ctx.len(), 2);
    }

    #[test]
    fn test_record_never_overwrites() {
        let mut ctx = PipelineContext::new();
        ctx.record("draft", "v1").unwrap();
        let err = ctx.record("draft", "v2").unwrap_err();
        assert_eq!(err, ContextError::AlreadyRecorded("draft".to_string()));
        assert_eq!(ctx.output("draft").unwrap(), "v1");
    }

    #[test]
    fn test_missing_output_names_the_stage() {
        let ctx = PipelineContext::new();
        let err = ctx.output("editing").unwrap_err();
        assert_eq!(err.key(), "editing");
        assert!(ctx.is_empty());
    }
}
