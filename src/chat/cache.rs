//! Exact-string response memoization.

use std::collections::HashMap;
use std::sync::Mutex;

/// Unbounded map from user message to final reply, kept for the process
/// lifetime. Only successful generations belong here; error replies stay
/// uncached so an identical retry can succeed.
pub struct ResponseCache {
    entries: Mutex<HashMap<String, String>>,
}

impl ResponseCache {
    pub fn new() -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Cached reply for an exact message, if any.
    pub fn get(&self, message: &str) -> Option<String> {
        self.entries.lock().unwrap().get(message).cloned()
    }

    /// Store a reply. An existing entry is replaced (last writer wins).
    pub fn insert(&self, message: &str, reply: &str) {
        self.entries
            .lock()
            .unwrap()
            .insert(message.to_string(), reply.to_string());
    }

    pub fn len(&self) -> usize {
        self.entries.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for ResponseCache {
    fn default() -> Self {
        Self::new()
    }
}
