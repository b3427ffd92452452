//! Chat orchestration.
//!
//! A chat turn classifies the message, gathers document and Facebook
//! context, renders the generation prompt, and post-processes the reply.
//! Successful replies are memoized per exact message.

mod cache;
mod classify;
mod context;

pub use cache::ResponseCache;
pub use classify::{ContextProfile, ProfileRule, QueryClassifier};
pub use context::{assemble_prompt, build_context_block};

use std::sync::Arc;

use tokio::sync::Semaphore;
use tracing::{debug, instrument, warn};

use crate::config::{Prompts, Settings};
use crate::error::{AkwaabaError, Result};
use crate::generation::Generator;
use crate::retrieval::DocumentRetriever;
use crate::social::SocialFetcher;

/// Replies already carrying a references heading are left untouched.
/// Matching the singular form also covers "📘 References".
const REFERENCES_MARKER: &str = "📘 Reference";

/// Footer appended to replies that cite no sources of their own.
const REFERENCES_FOOTER: &str =
    "\n\n📘 References:\n- Church Manuals, Facebook Pages, or available local sources.";

/// Answers chat messages end to end.
pub struct ChatService {
    retriever: DocumentRetriever,
    social: SocialFetcher,
    generator: Arc<dyn Generator>,
    classifier: QueryClassifier,
    prompts: Prompts,
    cache: ResponseCache,
    top_k: usize,
    generation_limit: Semaphore,
}

impl ChatService {
    pub fn new(
        settings: &Settings,
        retriever: DocumentRetriever,
        social: SocialFetcher,
        generator: Arc<dyn Generator>,
        prompts: Prompts,
    ) -> Self {
        Self {
            retriever,
            social,
            generator,
            classifier: QueryClassifier::default(),
            prompts,
            cache: ResponseCache::new(),
            top_k: settings.retrieval.top_k,
            generation_limit: Semaphore::new(settings.generation.workers.max(1)),
        }
    }

    /// Produce the reply for one message.
    ///
    /// The happy path caches its reply; generation failures return an error
    /// message to the user but are never cached, so a retry reaches the
    /// service again. Messages shorter than two characters get a fixed
    /// clarification instead of a generation round trip.
    #[instrument(skip(self, message))]
    pub async fn answer(&self, message: &str) -> String {
        if let Some(reply) = self.cache.get(message) {
            debug!("Serving cached reply");
            return reply;
        }

        if message.trim().chars().count() < 2 {
            return self.prompts.chat.clarify.clone();
        }

        let doc_context = self.retriever.retrieve(message, self.top_k).await;
        let snippets = self.social.fetch_snippets().await;

        let profile = self.classifier.classify(message);
        debug!("Classified message as {:?}", profile);

        let block = build_context_block(profile, &doc_context, &snippets, self.social.sources());
        let prompt = assemble_prompt(&self.prompts, &block, message);

        match self.generate(&prompt).await {
            Ok(text) => {
                let reply = ensure_references_footer(text);
                self.cache.insert(message, &reply);
                reply
            }
            Err(e) => {
                warn!("Generation failed: {}", e);
                format!("⚠️ Error contacting Gemini: {}", e)
            }
        }
    }

    /// Run one generation under the worker-count semaphore.
    async fn generate(&self, prompt: &str) -> Result<String> {
        let _permit = self
            .generation_limit
            .acquire()
            .await
            .map_err(|e| AkwaabaError::Generation(e.to_string()))?;
        self.generator.generate(prompt).await
    }
}

fn ensure_references_footer(mut reply: String) -> String {
    if !reply.contains(REFERENCES_MARKER) {
        reply.push_str(REFERENCES_FOOTER);
    }
    reply
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::embedding::Embedder;
    use crate::generation::ModelInfo;
    use crate::social::SystemClock;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    struct FakeEmbedder;

    #[async_trait]
    impl Embedder for FakeEmbedder {
        async fn embed(&self, _text: &str) -> Result<Vec<f32>> {
            Ok(vec![0.0])
        }

        async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
            Ok(texts.iter().map(|_| vec![0.0]).collect())
        }

        fn dimensions(&self) -> usize {
            1
        }
    }

    struct FakeGenerator {
        reply: std::result::Result<String, String>,
        calls: AtomicUsize,
        prompts: Mutex<Vec<String>>,
    }

    impl FakeGenerator {
        fn replying(reply: &str) -> Arc<Self> {
            Arc::new(Self {
                reply: Ok(reply.to_string()),
                calls: AtomicUsize::new(0),
                prompts: Mutex::new(Vec::new()),
            })
        }

        fn failing(message: &str) -> Arc<Self> {
            Arc::new(Self {
                reply: Err(message.to_string()),
                calls: AtomicUsize::new(0),
                prompts: Mutex::new(Vec::new()),
            })
        }

        fn last_prompt(&self) -> String {
            self.prompts.lock().unwrap().last().cloned().unwrap_or_default()
        }
    }

    #[async_trait]
    impl Generator for FakeGenerator {
        async fn generate(&self, prompt: &str) -> Result<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.prompts.lock().unwrap().push(prompt.to_string());
            match &self.reply {
                Ok(text) => Ok(text.clone()),
                Err(message) => Err(AkwaabaError::Generation(message.clone())),
            }
        }

        async fn list_models(&self) -> Result<Vec<ModelInfo>> {
            Ok(Vec::new())
        }
    }

    fn test_settings() -> Settings {
        let mut settings = Settings::default();
        // No sources: snippet fetching becomes a no-op, keeping tests offline.
        settings.social.sources = Vec::new();
        settings
    }

    fn service_with(generator: Arc<FakeGenerator>) -> ChatService {
        let settings = test_settings();
        let retriever = DocumentRetriever::new(None, Arc::new(FakeEmbedder));
        let social = SocialFetcher::new(&settings.social, Arc::new(SystemClock)).unwrap();
        ChatService::new(&settings, retriever, social, generator, Prompts::default())
    }

    #[tokio::test]
    async fn test_repeat_question_is_served_from_cache() {
        let generator = FakeGenerator::replying("The church was founded in 1953.");
        let service = service_with(generator.clone());

        let first = service.answer("who founded the church").await;
        let second = service.answer("who founded the church").await;

        assert_eq!(first, second);
        assert_eq!(generator.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_short_message_gets_clarification_without_generation() {
        let generator = FakeGenerator::replying("never used");
        let service = service_with(generator.clone());

        let reply = service.answer("H").await;
        assert_eq!(reply, Prompts::default().chat.clarify);

        // One non-whitespace character after trimming is still too short.
        let reply = service.answer("  h  ").await;
        assert_eq!(reply, Prompts::default().chat.clarify);

        assert_eq!(generator.calls.load(Ordering::SeqCst), 0);
        assert!(service.cache.is_empty());
    }

    #[tokio::test]
    async fn test_references_footer_appended_when_missing() {
        let generator = FakeGenerator::replying("The church was founded in 1953.");
        let service = service_with(generator);

        let reply = service.answer("who founded the church").await;
        assert!(reply.ends_with(REFERENCES_FOOTER));
        assert!(reply.starts_with("The church was founded in 1953."));
    }

    #[tokio::test]
    async fn test_references_footer_not_duplicated() {
        let cited = "Founded in 1953.\n\n📘 References:\n- Church of Pentecost history page";
        let generator = FakeGenerator::replying(cited);
        let service = service_with(generator);

        let reply = service.answer("who founded the church").await;
        assert_eq!(reply, cited);
    }

    #[tokio::test]
    async fn test_generation_error_reply_is_not_cached() {
        let generator = FakeGenerator::failing("boom");
        let service = service_with(generator.clone());

        let reply = service.answer("any news today").await;
        assert!(reply.starts_with("⚠️ Error contacting Gemini:"));
        assert!(reply.contains("boom"));
        assert!(service.cache.is_empty());

        // A retry reaches the generator again instead of a cached error.
        let _ = service.answer("any news today").await;
        assert_eq!(generator.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_event_message_prompts_with_facebook_updates() {
        let generator = FakeGenerator::replying("ok");
        let service = service_with(generator.clone());

        let _ = service.answer("any news this week?").await;
        let prompt = generator.last_prompt();
        assert!(prompt.contains("Recent Facebook Updates:"));
        assert!(!prompt.contains("Reference Materials:"));
    }

    #[tokio::test]
    async fn test_policy_message_prompts_with_documents_only() {
        let generator = FakeGenerator::replying("ok");
        let service = service_with(generator.clone());

        let _ = service.answer("what does the manual say about marriage").await;
        let prompt = generator.last_prompt();
        assert!(prompt.contains("Official church documents:"));
        assert!(!prompt.contains("Facebook Insights:"));
    }

    #[tokio::test]
    async fn test_general_message_prompts_with_combined_context() {
        let generator = FakeGenerator::replying("ok");
        let service = service_with(generator.clone());

        let _ = service.answer("who is the resident pastor").await;
        let prompt = generator.last_prompt();
        assert!(prompt.contains("Reference Materials:"));
        assert!(prompt.contains("Facebook Insights:"));
        assert!(prompt.contains("User Input:\nwho is the resident pastor"));
    }
}
