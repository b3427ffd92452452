//! Akwaaba server entry point.

use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use akwaaba::chat::ChatService;
use akwaaba::cli::{Cli, Output};
use akwaaba::config::{Prompts, Settings};
use akwaaba::documents::{self, DocumentChunk};
use akwaaba::embedding::{Embedder, OpenAIEmbedder};
use akwaaba::generation::{GeminiClient, Generator};
use akwaaba::index::ChunkIndex;
use akwaaba::retrieval::DocumentRetriever;
use akwaaba::scripture::ScriptureClient;
use akwaaba::server::{self, AppState};
use akwaaba::social::{SocialFetcher, SystemClock};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::registry()
        .with(EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| format!("akwaaba={}", log_level)),
        ))
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    // Load configuration
    let settings = match &cli.config {
        Some(path) => Settings::load_from(Some(&std::path::PathBuf::from(path)))?,
        None => Settings::load()?,
    };

    // A missing key is not fatal here: generation requests will fail
    // individually until one is provided.
    let api_key = std::env::var("GEMINI_API_KEY")
        .ok()
        .filter(|key| !key.is_empty());
    if api_key.is_some() {
        Output::success("GEMINI_API_KEY loaded successfully");
    } else {
        Output::warning("GEMINI_API_KEY not found; generation requests will fail until it is set");
    }

    let embedder: Arc<dyn Embedder> = Arc::new(OpenAIEmbedder::with_config(
        &settings.embedding.model,
        settings.embedding.dimensions as usize,
    ));

    let chunks = documents::load_documents(&settings.documents_dir(), settings.documents.chunk_size);
    let index = build_index(chunks, embedder.as_ref()).await;

    let prompts = Prompts::load(
        settings.prompts.custom_dir.as_deref(),
        Some(&settings.prompts.variables),
    )?;

    let retriever = DocumentRetriever::new(index, embedder);
    let social = SocialFetcher::new(&settings.social, Arc::new(SystemClock))?;
    let scripture = ScriptureClient::new(&settings.scripture)?;

    let gemini = GeminiClient::new(&settings.generation, api_key)?;
    let model = gemini.model().to_string();
    let generator: Arc<dyn Generator> = Arc::new(gemini);

    let chat = ChatService::new(&settings, retriever, social, generator.clone(), prompts);
    let state = Arc::new(AppState::new(chat, scripture, generator, model));

    server::run(&cli.host, cli.port, state).await?;

    Ok(())
}

/// Embed the loaded chunks into the in-memory index. Empty or failed
/// indexing degrades to running without document context.
async fn build_index(chunks: Vec<DocumentChunk>, embedder: &dyn Embedder) -> Option<ChunkIndex> {
    if chunks.is_empty() {
        Output::warning("No documents indexed; replies will rely on Gemini and Facebook context");
        return None;
    }

    let texts: Vec<String> = chunks.iter().map(|c| c.text.clone()).collect();

    match embedder.embed_batch(&texts).await {
        Ok(embeddings) => match ChunkIndex::new(chunks, embeddings) {
            Ok(index) => {
                Output::success(&format!(
                    "Loaded {} document chunks into the index",
                    index.len()
                ));
                Some(index)
            }
            Err(e) => {
                Output::warning(&format!("Document indexing failed: {}", e));
                None
            }
        },
        Err(e) => {
            Output::warning(&format!("Document embedding failed: {}", e));
            None
        }
    }
}
