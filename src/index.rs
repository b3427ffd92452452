//! In-memory similarity index over document chunks.
//!
//! Each entry owns both the chunk and its embedding, so retrieval never
//! depends on two collections staying in the same order.

use crate::documents::DocumentChunk;
use crate::error::{AkwaabaError, Result};

/// A chunk paired with its embedding.
#[derive(Debug, Clone)]
pub struct IndexedChunk {
    pub chunk: DocumentChunk,
    pub embedding: Vec<f32>,
}

/// A nearest-neighbor hit.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchHit {
    /// Position of the chunk in insertion order.
    pub index: usize,
    /// Squared Euclidean distance to the query.
    pub distance: f32,
}

/// Flat nearest-neighbor index built once at startup.
pub struct ChunkIndex {
    entries: Vec<IndexedChunk>,
}

impl ChunkIndex {
    /// Pair chunks with their embeddings. The two lists must correspond
    /// one-to-one.
    pub fn new(chunks: Vec<DocumentChunk>, embeddings: Vec<Vec<f32>>) -> Result<Self> {
        if chunks.len() != embeddings.len() {
            return Err(AkwaabaError::Index(format!(
                "{} chunks but {} embeddings",
                chunks.len(),
                embeddings.len()
            )));
        }

        let entries = chunks
            .into_iter()
            .zip(embeddings)
            .map(|(chunk, embedding)| IndexedChunk { chunk, embedding })
            .collect();

        Ok(Self { entries })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&IndexedChunk> {
        self.entries.get(index)
    }

    /// The nearest entries to `query`, ascending by squared L2 distance,
    /// at most `k` of them. Ties keep insertion order.
    pub fn search(&self, query: &[f32], k: usize) -> Vec<SearchHit> {
        let mut hits: Vec<SearchHit> = self
            .entries
            .iter()
            .enumerate()
            .map(|(index, entry)| SearchHit {
                index,
                distance: l2_distance_sq(query, &entry.embedding),
            })
            .collect();

        hits.sort_by(|a, b| {
            a.distance
                .partial_cmp(&b.distance)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        hits.truncate(k);

        hits
    }
}

/// Squared Euclidean distance between two vectors.
pub fn l2_distance_sq(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() {
        return f32::MAX;
    }

    a.iter().zip(b.iter()).map(|(x, y)| (x - y) * (x - y)).sum()
}
