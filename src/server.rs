//! HTTP API for the chatbot.
//!
//! Exposes the welcome, chat, and model-listing endpoints and routes
//! scripture questions straight to the Bible API.

use std::sync::Arc;

use axum::{
    extract::State,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use regex::Regex;
use serde::{Deserialize, Serialize};
use tower_http::cors::{Any, CorsLayer};
use tracing::info;

use crate::chat::ChatService;
use crate::cli::Output;
use crate::generation::{Generator, ModelInfo};
use crate::scripture::ScriptureClient;

/// Messages of this shape skip generation and hit the Bible API directly.
const BIBLE_QUERY_PATTERN: &str = r"^what does the bible say about (.*)$";

/// Shared application state.
pub struct AppState {
    chat: ChatService,
    scripture: ScriptureClient,
    generator: Arc<dyn Generator>,
    model: String,
    bible_pattern: Regex,
}

impl AppState {
    pub fn new(
        chat: ChatService,
        scripture: ScriptureClient,
        generator: Arc<dyn Generator>,
        model: String,
    ) -> Self {
        Self {
            chat,
            scripture,
            generator,
            model,
            bible_pattern: Regex::new(BIBLE_QUERY_PATTERN).expect("bible query pattern"),
        }
    }
}

/// Run the HTTP API server.
pub async fn run(host: &str, port: u16, state: Arc<AppState>) -> crate::error::Result<()> {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = Router::new()
        .route("/", get(root))
        .route("/chat", post(chat))
        .route("/models", get(models))
        .layer(cors)
        .with_state(state.clone());

    let addr = format!("{}:{}", host, port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    Output::header("PIWC Asokwa Chatbot API");
    println!();
    Output::success(&format!("Listening on http://{}", addr));
    Output::kv("Model", &state.model);
    println!();
    println!("Endpoints:");
    Output::kv("Welcome", "GET  /");
    Output::kv("Chat", "POST /chat");
    Output::kv("Models", "GET  /models");
    println!();
    Output::info("Press Ctrl+C to stop the server.");

    info!("Chatbot API started successfully using model {}", state.model);

    axum::serve(listener, app).await?;

    Ok(())
}

// === Request/Response Types ===

#[derive(Serialize)]
struct RootResponse {
    message: String,
    model: String,
    docs_url: String,
    status: String,
}

#[derive(Deserialize)]
struct ChatRequest {
    message: String,
}

#[derive(Serialize)]
struct ChatResponse {
    reply: String,
}

#[derive(Serialize)]
struct ModelsResponse {
    models: Vec<ModelInfo>,
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

// === Handlers ===

async fn root(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(RootResponse {
        message: "Welcome to the PIWC Asokwa Chatbot API 🚀".to_string(),
        model: state.model.clone(),
        docs_url: "/docs".to_string(),
        status: "running".to_string(),
    })
}

async fn chat(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ChatRequest>,
) -> impl IntoResponse {
    let message = req.message.trim();

    let reply = match scripture_reference(&state.bible_pattern, message) {
        Some(reference) => state.scripture.lookup(&reference).await,
        None => state.chat.answer(message).await,
    };

    Json(ChatResponse { reply })
}

/// Model listing errors come back as a structured payload, not a 5xx.
async fn models(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    match state.generator.list_models().await {
        Ok(models) => Json(ModelsResponse { models }).into_response(),
        Err(e) => Json(ErrorResponse {
            error: format!("Failed to list models: {}", e),
        })
        .into_response(),
    }
}

/// Extract the topic of a "what does the bible say about ..." message.
/// Matching is case-insensitive; the captured topic comes back lowercased
/// and trimmed.
fn scripture_reference(pattern: &Regex, message: &str) -> Option<String> {
    let lowered = message.to_lowercase();
    pattern
        .captures(&lowered)
        .map(|captures| captures[1].trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pattern() -> Regex {
        Regex::new(BIBLE_QUERY_PATTERN).unwrap()
    }

    #[test]
    fn test_scripture_reference_lowercases_topic() {
        let topic = scripture_reference(&pattern(), "What does the Bible say about LOVE");
        assert_eq!(topic.as_deref(), Some("love"));
    }

    #[test]
    fn test_scripture_reference_trims_topic() {
        let topic = scripture_reference(&pattern(), "what does the bible say about  john 3:16  ");
        assert_eq!(topic.as_deref(), Some("john 3:16"));
    }

    #[test]
    fn test_scripture_reference_with_empty_topic() {
        // A trailing space still matches, capturing an empty topic.
        let topic = scripture_reference(&pattern(), "what does the bible say about ");
        assert_eq!(topic.as_deref(), Some(""));
    }

    #[test]
    fn test_scripture_reference_requires_full_phrase() {
        assert_eq!(
            scripture_reference(&pattern(), "what does the bible say about"),
            None
        );
        assert_eq!(scripture_reference(&pattern(), "tell me about love"), None);
    }
}
