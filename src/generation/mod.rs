//! Text generation behind a provider seam.

mod gemini;

pub use gemini::GeminiClient;

use crate::error::Result;
use async_trait::async_trait;
use serde::Serialize;

/// One model from the provider's catalog.
#[derive(Debug, Clone, Serialize)]
pub struct ModelInfo {
    pub name: String,
    pub display_name: Option<String>,
    pub description: Option<String>,
}

/// Trait for the external generation service.
#[async_trait]
pub trait Generator: Send + Sync {
    /// Run one prompt to completion and return the generated text.
    async fn generate(&self, prompt: &str) -> Result<String>;

    /// List the models the service offers.
    async fn list_models(&self) -> Result<Vec<ModelInfo>>;
}
