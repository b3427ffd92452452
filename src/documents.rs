//! Local PDF document loading and word-count chunking.
//!
//! Documents are read once at startup. A file that cannot be read or parsed
//! is skipped with a warning; it never aborts the load.

use crate::error::{AkwaabaError, Result};
use std::path::Path;
use tracing::{debug, warn};

/// A contiguous run of words from one source document, the unit of retrieval.
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentChunk {
    /// Chunk text: up to `chunk_size` whitespace-separated words.
    pub text: String,
    /// File name of the source document.
    pub source: String,
}

/// Load every `.pdf` in `dir` and split the extracted text into chunks of
/// `chunk_size` words, in file-then-position order. Files are visited in
/// sorted name order. A missing directory yields zero chunks.
pub fn load_documents(dir: &Path, chunk_size: usize) -> Vec<DocumentChunk> {
    if !dir.exists() {
        warn!("Documents folder {} not found", dir.display());
        return Vec::new();
    }

    let entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            warn!("Cannot read documents folder {}: {}", dir.display(), e);
            return Vec::new();
        }
    };

    let mut paths: Vec<_> = entries
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| {
            path.file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|n| n.ends_with(".pdf"))
        })
        .collect();
    paths.sort();

    let mut chunks = Vec::new();
    for path in paths {
        let source = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or_default()
            .to_string();

        match extract_pdf_text(&path) {
            Ok(text) => {
                let file_chunks = chunk_words(&text, chunk_size);
                debug!("Split {} into {} chunks", source, file_chunks.len());
                chunks.extend(file_chunks.into_iter().map(|text| DocumentChunk {
                    text,
                    source: source.clone(),
                }));
            }
            Err(e) => {
                warn!("Error reading {}: {}", source, e);
            }
        }
    }

    chunks
}

/// Extract the full text of one PDF file.
fn extract_pdf_text(path: &Path) -> Result<String> {
    let bytes = std::fs::read(path)?;
    pdf_extract::extract_text_from_mem(&bytes).map_err(|e| AkwaabaError::Document(e.to_string()))
}

/// Split text into ordered, non-overlapping chunks of `chunk_size` words.
/// The final chunk may be shorter.
pub fn chunk_words(text: &str, chunk_size: usize) -> Vec<String> {
    let chunk_size = chunk_size.max(1);
    let words: Vec<&str> = text.split_whitespace().collect();
    words.chunks(chunk_size).map(|w| w.join(" ")).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_chunk_words_splits_on_word_count() {
        let text = (0..650).map(|i| i.to_string()).collect::<Vec<_>>().join(" ");
        let chunks = chunk_words(&text, 300);

        assert_eq!(chunks.len(), 3);
        assert_eq!(chunks[0].split_whitespace().count(), 300);
        assert_eq!(chunks[1].split_whitespace().count(), 300);
        assert_eq!(chunks[2].split_whitespace().count(), 50);
        assert!(chunks[0].starts_with("0 1 "));
        assert!(chunks[2].ends_with("649"));
    }

    #[test]
    fn test_chunk_words_collapses_whitespace() {
        let chunks = chunk_words("one\ttwo\n\nthree   four", 3);
        assert_eq!(chunks, vec!["one two three", "four"]);
    }

    #[test]
    fn test_chunk_words_empty_text() {
        assert!(chunk_words("", 300).is_empty());
        assert!(chunk_words("   \n\t ", 300).is_empty());
    }

    #[test]
    fn test_chunk_words_short_text_is_one_chunk() {
        let chunks = chunk_words("a few words only", 300);
        assert_eq!(chunks, vec!["a few words only"]);
    }

    #[test]
    fn test_load_documents_missing_dir() {
        let chunks = load_documents(Path::new("/nonexistent/documents"), 300);
        assert!(chunks.is_empty());
    }

    #[test]
    fn test_load_documents_skips_non_pdf_and_corrupt_files() {
        let dir = tempfile::tempdir().unwrap();

        let mut txt = std::fs::File::create(dir.path().join("notes.txt")).unwrap();
        writeln!(txt, "not a document we index").unwrap();

        // Invalid bytes behind a .pdf name must be skipped, not abort the load.
        let mut bad = std::fs::File::create(dir.path().join("broken.pdf")).unwrap();
        bad.write_all(b"this is not a pdf").unwrap();

        let chunks = load_documents(dir.path(), 300);
        assert!(chunks.is_empty());
    }
}
