//! The six cover letter stages, in execution order.
//!
//! input_collection → job_analysis → resume_matching → tone_styling → drafting → editing
//!
//! Each builder pulls exactly the inputs and earlier outputs it needs from the
//! context; nothing is shared between stages implicitly.

use crate::cover_letter::prompts::{
    DRAFTING_TEMPLATE, EDITING_TEMPLATE, INPUT_COLLECTION_TEMPLATE, JOB_ANALYSIS_TEMPLATE,
    RESUME_MATCHING_TEMPLATE, TONE_STYLING_TEMPLATE,
};
use crate::cover_letter::tone::{get_tone_guide, Tone};
use crate::pipeline::prompts::fill_template;
use crate::pipeline::{ContextError, PipelineContext, RoleDescription, StageSpec};

// Initial input keys.
pub const RESUME: &str = "resume";
pub const JOB_DESCRIPTION: &str = "job_description";
pub const TONE: &str = "tone";

// Stage names, also the keys of their outputs.
pub const INPUT_COLLECTION: &str = "input_collection";
pub const JOB_ANALYSIS: &str = "job_analysis";
pub const RESUME_MATCHING: &str = "resume_matching";
pub const TONE_STYLING: &str = "tone_styling";
pub const DRAFTING: &str = "drafting";
pub const EDITING: &str = "editing";

/// Initial context for one cover letter run.
pub fn initial_context(resume: &str, job_description: &str, tone: Tone) -> PipelineContext {
    PipelineContext::new()
        .with_input(RESUME, resume)
        .with_input(JOB_DESCRIPTION, job_description)
        .with_input(TONE, tone.as_str())
}

pub fn cover_letter_stages() -> Vec<StageSpec> {
    vec![
        StageSpec::new(
            INPUT_COLLECTION,
            RoleDescription::new(
                "Input Collector",
                "Gather resume, job description, and tone preference.",
                "You ensure user input is correctly received and passed on.",
            ),
            "A dictionary of inputs.",
            |ctx| {
                Ok(fill_template(
                    INPUT_COLLECTION_TEMPLATE,
                    &[
                        ("resume", ctx.input(RESUME)?),
                        ("job_description", ctx.input(JOB_DESCRIPTION)?),
                        ("tone", ctx.input(TONE)?),
                    ],
                ))
            },
        ),
        StageSpec::new(
            JOB_ANALYSIS,
            RoleDescription::new(
                "Job Description Analyst",
                "Extract key responsibilities, skills, and values from the job description.",
                "You break down job descriptions into actionable items.",
            ),
            "List of job priorities.",
            |ctx| {
                Ok(fill_template(
                    JOB_ANALYSIS_TEMPLATE,
                    &[("job_description", ctx.input(JOB_DESCRIPTION)?)],
                ))
            },
        ),
        StageSpec::new(
            RESUME_MATCHING,
            RoleDescription::new(
                "Resume Matcher",
                "Identify and rank experiences relevant to the job description.",
                "You extract matching content from resumes.",
            ),
            "Ranked list of experiences.",
            |ctx| {
                Ok(fill_template(
                    RESUME_MATCHING_TEMPLATE,
                    &[
                        ("resume", ctx.input(RESUME)?),
                        ("job_analysis", ctx.output(JOB_ANALYSIS)?),
                    ],
                ))
            },
        ),
        StageSpec::new(
            TONE_STYLING,
            RoleDescription::new(
                "Tone Stylist",
                "Create a tone and writing style guide.",
                "You tailor the letter's tone to user and company needs.",
            ),
            "Tone guide.",
            build_tone_styling,
        ),
        StageSpec::new(
            DRAFTING,
            RoleDescription::new(
                "Letter Drafter",
                "Write a compelling cover letter based on all inputs.",
                "You are an expert professional writer.",
            ),
            "Initial draft.",
            |ctx| {
                Ok(fill_template(
                    DRAFTING_TEMPLATE,
                    &[
                        ("collected_inputs", ctx.output(INPUT_COLLECTION)?),
                        ("job_analysis", ctx.output(JOB_ANALYSIS)?),
                        ("resume_matches", ctx.output(RESUME_MATCHING)?),
                        ("style_guide", ctx.output(TONE_STYLING)?),
                    ],
                ))
            },
        ),
        StageSpec::new(
            EDITING,
            RoleDescription::new(
                "Editor",
                "Polish the draft for professionalism and clarity.",
                "You ensure the final draft is perfect.",
            ),
            "Final letter.",
            |ctx| {
                Ok(fill_template(
                    EDITING_TEMPLATE,
                    &[
                        ("draft", ctx.output(DRAFTING)?),
                        ("style_guide", ctx.output(TONE_STYLING)?),
                    ],
                ))
            },
        ),
    ]
}

fn build_tone_styling(ctx: &PipelineContext) -> Result<String, ContextError> {
    let tone_tag = ctx.input(TONE)?;
    // Tags outside the four known tones still get a guide, just without baseline phrasing.
    let tone_guide = tone_tag
        .parse::<Tone>()
        .map(|tone| get_tone_guide(tone).render())
        .unwrap_or_else(|_| format!("Register: {tone_tag}"));

    Ok(fill_template(
        TONE_STYLING_TEMPLATE,
        &[
            ("tone", tone_tag),
            ("tone_guide", tone_guide.as_str()),
            ("job_analysis", ctx.output(JOB_ANALYSIS)?),
        ],
    ))
}
