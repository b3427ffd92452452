//! Prompt templates for Akwaaba.
//!
//! Prompts can be customized by placing TOML files in the custom prompts directory.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Collection of all prompt templates.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
#[derive(Default)]
pub struct Prompts {
    pub chat: ChatPrompts,
    /// Custom variables from config, available in all prompts.
    #[serde(skip)]
    pub variables: std::collections::HashMap<String, String>,
}

/// Prompts for chat answer generation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChatPrompts {
    /// Full instruction prompt sent to the generation service. Supports
    /// {{context_sources}} and {{user_input}}.
    pub system: String,
    /// Reply for messages too short to answer.
    pub clarify: String,
}

impl Default for ChatPrompts {
    fn default() -> Self {
        Self {
            system: r#"
You are a smart, friendly assistant for The Church of Pentecost (PIWC Asokwa).
Your goal is to always answer intelligently, even when the question is vague.

Rules:
1. Reformulate unclear user input to make sense of it.
2. Combine church documents, Facebook data, and biblical insights.
3. Always give structured, factual, and referenced answers.
4. Include a short "📘 References" section that points to your sources.
5. If something is uncertain, clarify politely — do not fabricate info.

Context Sources:
{{context_sources}}

User Input:
{{user_input}}

Now provide a clear, structured, and referenced answer.
"#
            .to_string(),

            clarify: "👋 Hello! Could you please provide a little more detail? \
                      You can ask about church policies, leadership, upcoming events, or biblical topics."
                .to_string(),
        }
    }
}

impl Prompts {
    /// Load prompts from the default location, with optional custom directory and variables.
    pub fn load(
        custom_dir: Option<&str>,
        custom_variables: Option<&std::collections::HashMap<String, String>>,
    ) -> crate::error::Result<Self> {
        let mut prompts = Prompts::default();

        // Store custom variables
        if let Some(vars) = custom_variables {
            prompts.variables = vars.clone();
        }

        if let Some(dir) = custom_dir {
            let custom_path = PathBuf::from(shellexpand::tilde(dir).to_string());

            // Load chat prompts if file exists
            let chat_path = custom_path.join("chat.toml");
            if chat_path.exists() {
                let content = std::fs::read_to_string(&chat_path)?;
                prompts.chat = toml::from_str(&content)?;
            }
        }

        Ok(prompts)
    }

    /// Render a prompt template with the given variables.
    pub fn render(template: &str, vars: &std::collections::HashMap<String, String>) -> String {
        let mut result = template.to_string();
        for (key, value) in vars {
            result = result.replace(&format!("{{{{{}}}}}", key), value);
        }
        result
    }

    /// Render a prompt template with both provided variables and custom config variables.
    /// Provided variables take precedence over custom config variables.
    pub fn render_with_custom(
        &self,
        template: &str,
        vars: &std::collections::HashMap<String, String>,
    ) -> String {
        // Start with custom variables, then override with provided vars
        let mut merged = self.variables.clone();
        for (key, value) in vars {
            merged.insert(key.clone(), value.clone());
        }
        Self::render(template, &merged)
    }
}
