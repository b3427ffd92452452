//! Configuration settings for Akwaaba.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
#[derive(Default)]
pub struct Settings {
    pub documents: DocumentSettings,
    pub embedding: EmbeddingSettings,
    pub retrieval: RetrievalSettings,
    pub social: SocialSettings,
    pub scripture: ScriptureSettings,
    pub generation: GenerationSettings,
    pub prompts: PromptSettings,
}

/// Local document indexing settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DocumentSettings {
    /// Directory holding the PDF documents to index.
    pub dir: String,
    /// Words per chunk; the final chunk of a document may be shorter.
    pub chunk_size: usize,
}

impl Default for DocumentSettings {
    fn default() -> Self {
        Self {
            dir: "documents".to_string(),
            chunk_size: 300,
        }
    }
}

/// Embedding generation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EmbeddingSettings {
    /// Embedding model to use.
    pub model: String,
    /// Embedding dimensions.
    pub dimensions: u32,
}

impl Default for EmbeddingSettings {
    fn default() -> Self {
        Self {
            model: "text-embedding-3-small".to_string(),
            dimensions: 1536,
        }
    }
}

/// Document retrieval settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrievalSettings {
    /// Number of nearest chunks included in the document context.
    pub top_k: usize,
}

impl Default for RetrievalSettings {
    fn default() -> Self {
        Self { top_k: 2 }
    }
}

/// One monitored social page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SocialSource {
    /// Short label used as the cache key.
    pub label: String,
    /// Display name used in prompt context blocks.
    pub name: String,
    /// Page URL.
    pub url: String,
}

/// Social snippet fetching settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SocialSettings {
    /// Pages to monitor for recent updates.
    pub sources: Vec<SocialSource>,
    /// Whole-cache staleness window in seconds.
    pub cache_ttl_seconds: u64,
    /// Per-request timeout in seconds.
    pub fetch_timeout_seconds: u64,
    /// User-agent header sent with page fetches.
    pub user_agent: String,
    /// Snippets must be strictly longer than this many characters.
    pub min_snippet_chars: usize,
    /// Snippets must be strictly shorter than this many characters.
    pub max_snippet_chars: usize,
    /// At most this many snippets are kept per source.
    pub max_snippets: usize,
}

impl Default for SocialSettings {
    fn default() -> Self {
        Self {
            sources: vec![
                SocialSource {
                    label: "PIWC".to_string(),
                    name: "PIWC Asokwa".to_string(),
                    url: "https://m.facebook.com/piwcasokwa".to_string(),
                },
                SocialSource {
                    label: "COP".to_string(),
                    name: "The Church of Pentecost HQ".to_string(),
                    url: "https://m.facebook.com/thecophq".to_string(),
                },
            ],
            cache_ttl_seconds: 600,
            fetch_timeout_seconds: 10,
            user_agent: "Mozilla/5.0".to_string(),
            min_snippet_chars: 50,
            max_snippet_chars: 400,
            max_snippets: 5,
        }
    }
}

/// Scripture lookup settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScriptureSettings {
    /// Base URL of the scripture API; the reference is appended directly.
    pub base_url: String,
    /// Request timeout in seconds.
    pub timeout_seconds: u64,
}

impl Default for ScriptureSettings {
    fn default() -> Self {
        Self {
            base_url: "https://bible-api.com/".to_string(),
            timeout_seconds: 5,
        }
    }
}

/// Generation service settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationSettings {
    /// Model identifier passed to the generation endpoint.
    pub model: String,
    /// Base URL of the Gemini REST API.
    pub base_url: String,
    /// Maximum concurrent generation calls.
    pub workers: usize,
    /// Request timeout in seconds.
    pub timeout_seconds: u64,
}

impl Default for GenerationSettings {
    fn default() -> Self {
        Self {
            model: "models/gemini-2.5-pro-preview-03-25".to_string(),
            base_url: "https://generativelanguage.googleapis.com/v1beta".to_string(),
            workers: 3,
            timeout_seconds: 300,
        }
    }
}

/// Prompt customization settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
#[derive(Default)]
pub struct PromptSettings {
    /// Directory for custom prompts (overrides defaults).
    pub custom_dir: Option<String>,
    /// Custom variables available in all prompts as {{variable_name}}.
    pub variables: std::collections::HashMap<String, String>,
}

impl Settings {
    /// Load settings from the default configuration file.
    pub fn load() -> crate::error::Result<Self> {
        Self::load_from(None)
    }

    /// Load settings from a specific path, or default location if None.
    pub fn load_from(path: Option<&PathBuf>) -> crate::error::Result<Self> {
        let config_path = match path {
            Some(p) => p.clone(),
            None => Self::default_config_path(),
        };

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let settings: Settings = toml::from_str(&content)?;
            Ok(settings)
        } else {
            Ok(Settings::default())
        }
    }

    /// Get the default configuration file path.
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("akwaaba")
            .join("config.toml")
    }

    /// Expand shell variables in paths (e.g., ~).
    pub fn expand_path(path: &str) -> PathBuf {
        PathBuf::from(shellexpand::tilde(path).to_string())
    }

    /// Get the expanded documents directory path.
    pub fn documents_dir(&self) -> PathBuf {
        Self::expand_path(&self.documents.dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_deployment() {
        let settings = Settings::default();
        assert_eq!(settings.documents.chunk_size, 300);
        assert_eq!(settings.retrieval.top_k, 2);
        assert_eq!(settings.social.cache_ttl_seconds, 600);
        assert_eq!(settings.social.sources.len(), 2);
        assert_eq!(settings.social.sources[0].label, "PIWC");
        assert_eq!(settings.social.sources[1].name, "The Church of Pentecost HQ");
        assert_eq!(settings.scripture.base_url, "https://bible-api.com/");
        assert_eq!(settings.generation.workers, 3);
    }

    #[test]
    fn test_partial_config_fills_defaults() {
        let settings: Settings = toml::from_str(
            r#"
            [retrieval]
            top_k = 4

            [generation]
            model = "models/gemini-1.5-flash"
            "#,
        )
        .unwrap();

        assert_eq!(settings.retrieval.top_k, 4);
        assert_eq!(settings.generation.model, "models/gemini-1.5-flash");
        assert_eq!(settings.generation.workers, 3);
        assert_eq!(settings.documents.chunk_size, 300);
    }
}
