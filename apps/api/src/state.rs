use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use crate::config::Config;
use crate::pipeline::{StageSpec, TextGenerator};

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Generation backend. `LlmClient` in production, stubs in tests.
    pub generator: Arc<dyn TextGenerator>,
    /// The cover letter stages, built once at startup and shared read-only.
    pub stages: Arc<[StageSpec]>,
    pub config: Config,
    /// Cancelled on shutdown; every run gets a child token.
    pub shutdown: CancellationToken,
}
