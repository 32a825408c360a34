// Cover letter generation.
// Implements: six-stage configuration, tone guidance, document-to-letter service,
// and the HTTP form/API surface. All model calls go through the pipeline executor.

pub mod handlers;
pub mod prompts;
pub mod service;
pub mod stages;
pub mod tone;
