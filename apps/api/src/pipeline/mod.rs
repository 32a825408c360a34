// Sequential document pipeline.
// Stages run strictly in declared order; each stage sees the initial inputs plus
// every earlier stage's output. The first failure ends the run with no partial result.

pub mod context;
pub mod executor;
pub mod generator;
pub mod prompts;
pub mod stage;

pub use context::{ContextError, PipelineContext, StageOutput};
pub use executor::{run, PipelineError, RunControl, RunResult};
pub use generator::{GenerationError, TextGenerator};
pub use stage::{RoleDescription, StageSpec};
