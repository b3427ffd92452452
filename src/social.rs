//! Social page snippet fetching with a whole-cache staleness window.
//!
//! The monitored pages change slowly, so snippets are cached as one unit:
//! within the staleness window every call is a cache read with zero network
//! activity, after it every source is re-fetched and the cache replaced as a
//! whole. A failing source degrades to an empty block for that source only.

use crate::config::{SocialSettings, SocialSource};
use crate::error::Result;
use chrono::{DateTime, Duration, Utc};
use scraper::{Html, Selector};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tracing::{debug, instrument, warn};

/// Block text when a page was fetched fine but no post-like snippet survived.
pub const NO_RECENT_POSTS: &str = "No recent posts found.";

/// Clock abstraction so the staleness window can be tested deterministically.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock time.
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Snippet blocks for all sources, refreshed as one unit.
struct SnippetCache {
    snippets: HashMap<String, String>,
    fetched_at: DateTime<Utc>,
}

/// Fetches short post-like snippets from the configured pages.
pub struct SocialFetcher {
    http: reqwest::Client,
    sources: Vec<SocialSource>,
    snippet_selector: Selector,
    ttl: Duration,
    min_chars: usize,
    max_chars: usize,
    max_snippets: usize,
    clock: Arc<dyn Clock>,
    cache: Mutex<Option<SnippetCache>>,
}

impl SocialFetcher {
    pub fn new(settings: &SocialSettings, clock: Arc<dyn Clock>) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(settings.fetch_timeout_seconds))
            .user_agent(&settings.user_agent)
            .build()?;

        Ok(Self {
            http,
            sources: settings.sources.clone(),
            snippet_selector: Selector::parse("p, div").expect("snippet selector"),
            ttl: Duration::seconds(settings.cache_ttl_seconds as i64),
            min_chars: settings.min_snippet_chars,
            max_chars: settings.max_snippet_chars,
            max_snippets: settings.max_snippets,
            clock,
            cache: Mutex::new(None),
        })
    }

    /// The monitored sources, in configuration order.
    pub fn sources(&self) -> &[SocialSource] {
        &self.sources
    }

    /// When the cache was last replaced, if ever.
    pub fn last_refreshed_at(&self) -> Option<DateTime<Utc>> {
        self.cache.lock().unwrap().as_ref().map(|c| c.fetched_at)
    }

    /// Snippet text per source label.
    #[instrument(skip(self))]
    pub async fn fetch_snippets(&self) -> HashMap<String, String> {
        let now = self.clock.now();

        {
            let cache = self.cache.lock().unwrap();
            if let Some(cached) = cache.as_ref() {
                if now - cached.fetched_at < self.ttl {
                    debug!("Social cache hit");
                    return cached.snippets.clone();
                }
            }
        }

        let fetches = self.sources.iter().map(|source| self.fetch_source(source));
        let blocks = futures::future::join_all(fetches).await;

        let snippets: HashMap<String, String> = self
            .sources
            .iter()
            .map(|source| source.label.clone())
            .zip(blocks)
            .collect();

        // Replace the whole cache even when some sources failed.
        let mut cache = self.cache.lock().unwrap();
        *cache = Some(SnippetCache {
            snippets: snippets.clone(),
            fetched_at: now,
        });

        snippets
    }

    /// Fetch one page and reduce it to a snippet block. Failures of any kind
    /// become an empty block.
    async fn fetch_source(&self, source: &SocialSource) -> String {
        let response = match self.http.get(&source.url).send().await {
            Ok(response) => response,
            Err(e) => {
                warn!("Fetch error ({}): {}", source.label, e);
                return String::new();
            }
        };

        if !response.status().is_success() {
            warn!("Fetch for {} returned {}", source.label, response.status());
            return String::new();
        }

        match response.text().await {
            Ok(body) => self.extract_snippets(&body),
            Err(e) => {
                warn!("Fetch error ({}): {}", source.label, e);
                String::new()
            }
        }
    }

    /// Keep the text of `p`/`div` elements whose length sits strictly between
    /// the configured bounds (a heuristic for post paragraphs vs nav and
    /// boilerplate), at most `max_snippets` of them in document order.
    fn extract_snippets(&self, html: &str) -> String {
        let document = Html::parse_document(html);

        let mut snippets = Vec::new();
        for element in document.select(&self.snippet_selector) {
            let text: String = element
                .text()
                .map(str::trim)
                .filter(|piece| !piece.is_empty())
                .collect();

            let chars = text.chars().count();
            if chars > self.min_chars && chars < self.max_chars {
                snippets.push(text);
            }
            if snippets.len() == self.max_snippets {
                break;
            }
        }

        if snippets.is_empty() {
            return NO_RECENT_POSTS.to_string();
        }
        snippets.join("\n")
    }
}
