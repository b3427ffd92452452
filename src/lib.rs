//! Akwaaba - PIWC Asokwa chatbot backend
//!
//! A chat API for The Church of Pentecost (PIWC Asokwa) powered by Gemini,
//! Facebook page updates, and local church documents.
//!
//! The name "Akwaaba" comes from the Twi word for "welcome."
//!
//! # Overview
//!
//! Akwaaba allows you to:
//! - Answer member questions with Gemini, grounded in church documents
//! - Pull recent announcements from the church's Facebook pages
//! - Look up Bible verses directly for scripture questions
//! - Serve it all over a small HTTP API
//!
//! # Architecture
//!
//! The library is organized into several modules:
//!
//! - `config` - Configuration management
//! - `documents` - PDF loading and word chunking
//! - `embedding` - Embedding generation
//! - `index` - In-memory vector index over document chunks
//! - `retrieval` - Query-time document context retrieval
//! - `social` - Facebook page snippet fetching with a staleness window
//! - `scripture` - Bible verse lookup
//! - `generation` - Gemini text generation
//! - `chat` - Chat orchestration, classification, and response caching
//! - `server` - HTTP API
//!
//! # Example
//!
//! ```rust,no_run
//! use akwaaba::config::Settings;
//! use akwaaba::scripture::ScriptureClient;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let settings = Settings::load()?;
//!     let scripture = ScriptureClient::new(&settings.scripture)?;
//!
//!     let verse = scripture.lookup("john 3:16").await;
//!     println!("{}", verse);
//!
//!     Ok(())
//! }
//! ```

pub mod chat;
pub mod cli;
pub mod config;
pub mod documents;
pub mod embedding;
pub mod error;
pub mod generation;
pub mod index;
pub mod retrieval;
pub mod scripture;
pub mod server;
pub mod social;

pub use error::{AkwaabaError, Result};
