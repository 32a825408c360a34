//! Cover letter generation: documents in, letter out.
//!
//! Flow: extract resume text + extract JD text → initial context → six-stage run.
//! Both documents are read before any generation starts, so a bad upload never
//! costs a model call.

use tracing::info;

use crate::cover_letter::stages::initial_context;
use crate::cover_letter::tone::Tone;
use crate::documents::{load_text, Document};
use crate::errors::AppError;
use crate::pipeline::{run, RunControl, RunResult, StageSpec, TextGenerator};

#[derive(Debug, Clone)]
pub struct CoverLetterRequest {
    pub resume: Document,
    pub job_description: Document,
    pub tone: Tone,
}

pub async fn generate_cover_letter(
    stages: &[StageSpec],
    generator: &dyn TextGenerator,
    request: CoverLetterRequest,
    control: &RunControl,
) -> Result<RunResult, AppError> {
    info!(
        resume = %request.resume.file_name,
        job_description = %request.job_description.file_name,
        tone = %request.tone,
        "Generating cover letter"
    );

    let (resume_text, job_text) = tokio::try_join!(
        load_text(request.resume),
        load_text(request.job_description)
    )?;

    let context = initial_context(&resume_text, &job_text, request.tone);
    let result = run(stages, context, generator, control).await?;

    info!(
        "Cover letter generated: {} chars",
        result.final_text.chars().count()
    );
    Ok(result)
}
