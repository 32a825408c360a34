//! Axum route handlers for the cover letter form and API.

use std::time::Duration;

use axum::{
    extract::{Multipart, State},
    http::header,
    response::{Html, IntoResponse},
    Json,
};
use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::cover_letter::service::{generate_cover_letter, CoverLetterRequest};
use crate::cover_letter::tone::Tone;
use crate::documents::Document;
use crate::errors::AppError;
use crate::pipeline::{RunControl, StageOutput};
use crate::state::AppState;

/// File name offered for the downloadable letter.
pub const DOWNLOAD_NAME: &str = "cover_letter.txt";

const INDEX_HTML: &str = include_str!("../../static/index.html");

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct CoverLetterResponse {
    pub cover_letter: String,
    pub tone: Tone,
    pub stages: Vec<StageOutput>,
    pub download_name: &'static str,
    pub generated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct DownloadRequest {
    pub cover_letter: String,
}

#[derive(Debug)]
struct Upload {
    file_name: String,
    bytes: Bytes,
}

#[derive(Debug, Default)]
struct CoverLetterForm {
    resume: Option<Upload>,
    job_description: Option<Upload>,
    resume_format: Option<String>,
    job_description_format: Option<String>,
    tone: Option<String>,
}

impl CoverLetterForm {
    async fn read(mut multipart: Multipart) -> Result<Self, AppError> {
        let mut form = CoverLetterForm::default();

        while let Some(field) = multipart.next_field().await? {
            let name = field.name().unwrap_or_default().to_string();
            match name.as_str() {
                "resume" | "job_description" => {
                    let file_name = field.file_name().unwrap_or_default().to_string();
                    let bytes = field.bytes().await?;
                    // Browsers submit an empty part for an untouched file input.
                    let upload = (!bytes.is_empty()).then_some(Upload { file_name, bytes });
                    if name == "resume" {
                        form.resume = upload;
                    } else {
                        form.job_description = upload;
                    }
                }
                "resume_format" => form.resume_format = Some(field.text().await?),
                "job_description_format" => form.job_description_format = Some(field.text().await?),
                "tone" => form.tone = Some(field.text().await?),
                _ => debug!("Ignoring unexpected form field '{name}'"),
            }
        }

        Ok(form)
    }

    fn into_request(self) -> Result<CoverLetterRequest, AppError> {
        let tone = self
            .tone
            .ok_or_else(|| AppError::Validation("tone is required".to_string()))?
            .parse::<Tone>()
            .map_err(|e| AppError::Validation(e.to_string()))?;

        let resume = into_document(self.resume, self.resume_format, "resume")?;
        let job_description = into_document(
            self.job_description,
            self.job_description_format,
            "job_description",
        )?;

        Ok(CoverLetterRequest {
            resume,
            job_description,
            tone,
        })
    }
}

fn into_document(
    upload: Option<Upload>,
    declared_format: Option<String>,
    field: &str,
) -> Result<Document, AppError> {
    let upload =
        upload.ok_or_else(|| AppError::Validation(format!("{field} file is required")))?;
    Ok(Document::from_upload(
        upload.file_name,
        declared_format.as_deref(),
        upload.bytes,
    )?)
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// GET /
///
/// The interactive form: two uploads, a tone picker, one button.
pub async fn handle_index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

/// POST /api/v1/cover-letters
///
/// Multipart fields: `resume`, `job_description` (files), `tone` (text), and
/// optional `resume_format` / `job_description_format` tags. Runs the full
/// six-stage pipeline and returns the letter plus every stage's output.
pub async fn handle_generate(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<CoverLetterResponse>, AppError> {
    let received = Instant::now();
    let request = CoverLetterForm::read(multipart).await?.into_request()?;
    let tone = request.tone;

    let control = run_control(&state.shutdown, received, state.config.run_timeout);

    let result =
        generate_cover_letter(&state.stages, state.generator.as_ref(), request, &control).await?;

    Ok(Json(CoverLetterResponse {
        stages: result.per_stage_outputs.outputs().to_vec(),
        cover_letter: result.final_text,
        tone,
        download_name: DOWNLOAD_NAME,
        generated_at: Utc::now(),
    }))
}

/// The run budget counts from request receipt, so a slow upload eats into it.
fn run_control(shutdown: &CancellationToken, received: Instant, timeout: Duration) -> RunControl {
    RunControl::new(shutdown.child_token()).with_deadline(received + timeout)
}

/// POST /api/v1/cover-letters/download
///
/// Echoes a finished letter back as a `cover_letter.txt` attachment.
pub async fn handle_download(
    Json(request): Json<DownloadRequest>,
) -> Result<impl IntoResponse, AppError> {
    if request.cover_letter.trim().is_empty() {
        return Err(AppError::Validation(
            "cover_letter cannot be empty".to_string(),
        ));
    }

    Ok((
        [
            (header::CONTENT_TYPE, "text/plain; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{DOWNLOAD_NAME}\""),
            ),
        ],
        request.cover_letter,
    ))
}
