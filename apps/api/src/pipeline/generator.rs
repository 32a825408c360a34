use std::error::Error as StdError;

use async_trait::async_trait;
use thiserror::Error;

/// Failure reported by a generation backend. The executor treats it as terminal.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct GenerationError {
    message: String,
    #[source]
    source: Option<Box<dyn StdError + Send + Sync>>,
}

impl GenerationError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            source: None,
        }
    }

    /// Keeps the backend's own error reachable through `Error::source`.
    pub fn with_source(
        message: impl Into<String>,
        source: impl Into<Box<dyn StdError + Send + Sync>>,
    ) -> Self {
        Self {
            message: message.into(),
            source: Some(source.into()),
        }
    }
}

/// The text-generation capability the executor depends on.
///
/// Implement this to swap backends without touching stages or the executor.
/// Carried in `AppState` as `Arc<dyn TextGenerator>`.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String, GenerationError>;
}
