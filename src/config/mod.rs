//! Configuration module for Akwaaba.
//!
//! Handles loading and managing application settings and prompt templates.

mod prompts;
mod settings;

pub use prompts::{ChatPrompts, Prompts};
pub use settings::{
    DocumentSettings, EmbeddingSettings, GenerationSettings, PromptSettings, RetrievalSettings,
    ScriptureSettings, Settings, SocialSettings, SocialSource,
};
