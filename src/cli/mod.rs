//! CLI module for Akwaaba.

mod output;

pub use output::Output;

use clap::Parser;

/// Akwaaba - PIWC Asokwa chatbot backend
///
/// Serves a chat API backed by Gemini, local church documents, and Facebook
/// page updates. The name "Akwaaba" comes from the Twi word for "welcome."
#[derive(Parser, Debug)]
#[command(name = "akwaaba")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Host to bind to
    #[arg(long, default_value = "127.0.0.1")]
    pub host: String,

    /// Port to bind to
    #[arg(short, long, default_value = "8000")]
    pub port: u16,

    /// Increase verbosity (-v for info, -vv for debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Path to configuration file
    #[arg(short, long)]
    pub config: Option<String>,
}
