// Task templates for the six cover letter stages.
// Each template names the context it consumes; builders in stages.rs fill them in.

/// Replace: {resume}, {job_description}, {tone}
pub const INPUT_COLLECTION_TEMPLATE: &str = "Resume:
{resume}

Job Description:
{job_description}

Tone Preference: {tone}

Organise the material above into labelled sections (candidate, target role, tone) \
without dropping any facts.";

/// Replace: {job_description}
pub const JOB_ANALYSIS_TEMPLATE: &str = "Extract top 5 responsibilities and values from the job description.

Job Description:
{job_description}";

/// Replace: {resume}, {job_analysis}
pub const RESUME_MATCHING_TEMPLATE: &str = "Match relevant resume content to the job description.
Rank the candidate's experiences from most to least relevant and cite the resume line \
each match comes from. Do not invent experience the resume does not mention.

Job priorities:
{job_analysis}

Resume:
{resume}";

/// Replace: {tone}, {tone_guide}, {job_analysis}
pub const TONE_STYLING_TEMPLATE: &str = "Create a writing style guide based on tone: {tone}

Baseline guidance for this tone:
{tone_guide}

Adapt the guide to the employer described by these priorities:
{job_analysis}";

/// Replace: {collected_inputs}, {job_analysis}, {resume_matches}, {style_guide}
pub const DRAFTING_TEMPLATE: &str = "Generate a draft cover letter.
Use only facts present in the candidate material. Follow the style guide exactly.

Candidate material:
{collected_inputs}

Job priorities:
{job_analysis}

Ranked matching experience:
{resume_matches}

Style guide:
{style_guide}";

/// Replace: {draft}, {style_guide}
pub const EDITING_TEMPLATE: &str = "Edit the draft for clarity and professionalism.
Fix grammar, tighten wording and keep the style guide's tone. Return only the finished \
letter text.

Style guide:
{style_guide}

Draft:
{draft}";
