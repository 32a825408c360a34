use std::fmt;
use std::sync::Arc;

use crate::pipeline::context::{ContextError, PipelineContext};
use crate::pipeline::prompts::{fill_template, STAGE_PROMPT_TEMPLATE};

type InputBuilder = Arc<dyn Fn(&PipelineContext) -> Result<String, ContextError> + Send + Sync>;

/// Who the generator should act as for one stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleDescription {
    pub role: String,
    pub goal: String,
    pub backstory: String,
}

impl RoleDescription {
    pub fn new(
        role: impl Into<String>,
        goal: impl Into<String>,
        backstory: impl Into<String>,
    ) -> Self {
        Self {
            role: role.into(),
            goal: goal.into(),
            backstory: backstory.into(),
        }
    }
}

/// One named pipeline stage. Immutable after construction and cheap to clone.
///
/// The input builder turns the current context into the stage's task text. It may
/// read the initial inputs and the outputs of earlier stages only; anything else
/// is absent from the context when the builder runs.
#[derive(Clone)]
pub struct StageSpec {
    name: String,
    role: RoleDescription,
    expected_output: String,
    input_builder: InputBuilder,
}

impl StageSpec {
    pub fn new<F>(
        name: impl Into<String>,
        role: RoleDescription,
        expected_output: impl Into<String>,
        input_builder: F,
    ) -> Self
    where
        F: Fn(&PipelineContext) -> Result<String, ContextError> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            role,
            expected_output: expected_output.into(),
            input_builder: Arc::new(input_builder),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn role(&self) -> &RoleDescription {
        &self.role
    }

    pub fn expected_output(&self) -> &str {
        &self.expected_output
    }

    /// Full prompt for this stage: role framing around the builder's task text.
    pub fn build_prompt(&self, context: &PipelineContext) -> Result<String, ContextError> {
        let task = (self.input_builder)(context)?;
        Ok(fill_template(
            STAGE_PROMPT_TEMPLATE,
            &[
                ("role", self.role.role.as_str()),
                ("goal", self.role.goal.as_str()),
                ("backstory", self.role.backstory.as_str()),
                ("task", task.as_str()),
                ("expected_output", self.expected_output.as_str()),
            ],
        ))
    }
}

impl fmt::Debug for StageSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StageSpec")
            .field("name", &self.name)
            .field("role", &self.role)
            .field("expected_output", &self.expected_output)
            .finish_non_exhaustive()
    }
}
