//! Scripture lookup via a public bible verse API.

use crate::config::ScriptureSettings;
use crate::error::Result;
use serde::Deserialize;
use tracing::{instrument, warn};

/// Reply when the API answered but the reference is unknown.
pub const VERSE_NOT_FOUND: &str = "❌ Verse not found.";
/// Reply when the API could not be reached or returned an unreadable body.
pub const VERSE_FETCH_ERROR: &str = "⚠️ Error fetching Bible verse.";

#[derive(Debug, Deserialize)]
struct VerseResponse {
    #[serde(default)]
    verses: Vec<Verse>,
}

#[derive(Debug, Deserialize)]
struct Verse {
    text: String,
}

/// Client for the scripture-lookup API.
pub struct ScriptureClient {
    http: reqwest::Client,
    base_url: String,
}

impl ScriptureClient {
    pub fn new(settings: &ScriptureSettings) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(settings.timeout_seconds))
            .build()?;

        Ok(Self {
            http,
            base_url: settings.base_url.clone(),
        })
    }

    /// Verse text for a reference such as "john 3:16". Failures are reported
    /// as fixed reply strings, never as errors.
    #[instrument(skip(self))]
    pub async fn lookup(&self, reference: &str) -> String {
        let url = format!("{}{}", self.base_url, encode_reference(reference));

        let response = match self.http.get(&url).send().await {
            Ok(response) => response,
            Err(e) => {
                warn!("Bible API error: {}", e);
                return VERSE_FETCH_ERROR.to_string();
            }
        };

        if response.status() != reqwest::StatusCode::OK {
            return VERSE_NOT_FOUND.to_string();
        }

        match response.json::<VerseResponse>().await {
            Ok(data) => data
                .verses
                .into_iter()
                .map(|verse| verse.text)
                .collect::<Vec<_>>()
                .join(" "),
            Err(e) => {
                warn!("Bible API error: {}", e);
                VERSE_FETCH_ERROR.to_string()
            }
        }
    }
}

/// Percent-encode spaces; references otherwise pass through unchanged.
fn encode_reference(reference: &str) -> String {
    reference.replace(' ', "%20")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_reference_replaces_spaces_only() {
        assert_eq!(encode_reference("john 3:16"), "john%203:16");
        assert_eq!(encode_reference("1 corinthians 13:4-7"), "1%20corinthians%2013:4-7");
        assert_eq!(encode_reference("jude"), "jude");
    }

    #[test]
    fn test_verse_texts_join_with_spaces() {
        let data: VerseResponse = serde_json::from_str(
            r#"{"reference":"John 3:16-17","verses":[{"text":"For God so loved the world."},{"text":"For God sent not his Son to condemn."}]}"#,
        )
        .unwrap();

        let joined = data
            .verses
            .into_iter()
            .map(|verse| verse.text)
            .collect::<Vec<_>>()
            .join(" ");
        assert_eq!(
            joined,
            "For God so loved the world. For God sent not his Son to condemn."
        );
    }

    #[test]
    fn test_missing_verse_list_parses_as_empty() {
        let data: VerseResponse = serde_json::from_str(r#"{"reference":"nowhere 1:1"}"#).unwrap();
        assert!(data.verses.is_empty());
    }
}
