//! Document context retrieval for chat queries.

use crate::embedding::Embedder;
use crate::index::ChunkIndex;
use std::sync::Arc;
use tracing::{debug, warn};

/// Retrieves the most relevant document chunks for a query.
pub struct DocumentRetriever {
    index: Option<ChunkIndex>,
    embedder: Arc<dyn Embedder>,
}

impl DocumentRetriever {
    /// An absent index is valid: retrieval then always yields empty context.
    pub fn new(index: Option<ChunkIndex>, embedder: Arc<dyn Embedder>) -> Self {
        Self { index, embedder }
    }

    /// Whether any document chunks are indexed.
    pub fn has_documents(&self) -> bool {
        self.index.as_ref().is_some_and(|i| !i.is_empty())
    }

    /// Concatenated text of the `k` nearest chunks, double-newline separated.
    /// Without an index this is the empty string and the embedder is never
    /// called. An embedding failure also degrades to empty context.
    pub async fn retrieve(&self, query: &str, k: usize) -> String {
        let Some(index) = self.index.as_ref().filter(|i| !i.is_empty()) else {
            return String::new();
        };

        let query_embedding = match self.embedder.embed(query).await {
            Ok(embedding) => embedding,
            Err(e) => {
                warn!("Query embedding failed: {}", e);
                return String::new();
            }
        };

        let hits = index.search(&query_embedding, k);
        debug!("Retrieved {} chunks for query", hits.len());

        hits.iter()
            .filter_map(|hit| index.get(hit.index))
            .map(|entry| entry.chunk.text.as_str())
            .collect::<Vec<_>>()
            .join("\n\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::documents::DocumentChunk;
    use crate::error::Result;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingEmbedder {
        calls: AtomicUsize,
        embedding: Vec<f32>,
    }

    impl CountingEmbedder {
        fn new(embedding: Vec<f32>) -> Self {
            Self {
                calls: AtomicUsize::new(0),
                embedding,
            }
        }
    }

    #[async_trait]
    impl Embedder for CountingEmbedder {
        async fn embed(&self, _text: &str) -> Result<Vec<f32>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.embedding.clone())
        }

        async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(texts.iter().map(|_| self.embedding.clone()).collect())
        }

        fn dimensions(&self) -> usize {
            self.embedding.len()
        }
    }

    fn chunk(text: &str) -> DocumentChunk {
        DocumentChunk {
            text: text.to_string(),
            source: "manual.pdf".to_string(),
        }
    }

    #[tokio::test]
    async fn test_absent_index_returns_empty_without_embedding() {
        let embedder = Arc::new(CountingEmbedder::new(vec![0.0]));
        let retriever = DocumentRetriever::new(None, embedder.clone());

        assert_eq!(retriever.retrieve("anything", 2).await, "");
        assert_eq!(embedder.calls.load(Ordering::SeqCst), 0);
        assert!(!retriever.has_documents());
    }

    #[tokio::test]
    async fn test_retrieve_joins_top_chunks_nearest_first() {
        let index = ChunkIndex::new(
            vec![chunk("tithing text"), chunk("baptism text"), chunk("choir text")],
            vec![vec![5.0, 0.0], vec![0.0, 0.0], vec![1.0, 0.0]],
        )
        .unwrap();
        let embedder = Arc::new(CountingEmbedder::new(vec![0.0, 0.0]));
        let retriever = DocumentRetriever::new(Some(index), embedder);

        let context = retriever.retrieve("baptism", 2).await;
        assert_eq!(context, "baptism text\n\nchoir text");
    }

    #[tokio::test]
    async fn test_retrieve_with_k_beyond_index_size() {
        let index = ChunkIndex::new(vec![chunk("only one")], vec![vec![0.0]]).unwrap();
        let embedder = Arc::new(CountingEmbedder::new(vec![0.0]));
        let retriever = DocumentRetriever::new(Some(index), embedder);

        assert_eq!(retriever.retrieve("q", 5).await, "only one");
    }
}
