//! Context block assembly and prompt rendering.

use std::collections::HashMap;

use crate::chat::classify::ContextProfile;
use crate::config::{Prompts, SocialSource};

/// Build the "Context Sources" block for a profile.
///
/// `snippets` is keyed by source label; a source with no entry contributes
/// an empty body so the surrounding structure stays stable.
pub fn build_context_block(
    profile: ContextProfile,
    doc_context: &str,
    snippets: &HashMap<String, String>,
    sources: &[SocialSource],
) -> String {
    match profile {
        ContextProfile::Events => {
            let mut block = String::from("Recent Facebook Updates:");
            for source in sources {
                let text = snippets.get(&source.label).map(String::as_str).unwrap_or("");
                block.push_str(&format!("\n\n{}:\n{}", source.name, text));
            }
            block
        }
        ContextProfile::Policy => {
            format!("Official church documents:\n{}", doc_context)
        }
        ContextProfile::General => {
            let feeds = sources
                .iter()
                .map(|source| {
                    snippets
                        .get(&source.label)
                        .map(String::as_str)
                        .unwrap_or("")
                })
                .collect::<Vec<_>>()
                .join("\n\n");
            format!(
                "Reference Materials:\n{}\n\nFacebook Insights:\n{}",
                doc_context, feeds
            )
        }
    }
}

/// Render the full generation prompt from the chat system template.
pub fn assemble_prompt(prompts: &Prompts, context_block: &str, message: &str) -> String {
    let mut vars = HashMap::new();
    vars.insert("context_sources".to_string(), context_block.to_string());
    vars.insert("user_input".to_string(), message.to_string());
    prompts.render_with_custom(&prompts.chat.system, &vars)
}
