//! Corpus loading and text chunking.
//!
//! Raw campaign files are cleaned (whitespace collapsed), then split into
//! overlapping chunks by a recursive character splitter: try the coarsest
//! separator first, re-split anything still over the target size with the
//! next finer one, and greedily merge adjacent pieces back together while
//! they fit, carrying a piece-granular overlap window into the next chunk.

use std::collections::VecDeque;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::info;

use lorekeeper_core::Result;

/// Target chunk size in characters.
pub const DEFAULT_CHUNK_SIZE: usize = 1000;

/// Characters carried over between adjacent chunks.
pub const DEFAULT_CHUNK_OVERLAP: usize = 200;

/// Separators from coarse to fine. The empty separator matches anything and
/// splits into single characters, so text with no separator at all still
/// gets chunked at the target size.
const SEPARATORS: &[&str] = &["\n\n", "\n", ". ", " ", ""];

/// A pre-index unit of campaign text tagged with its file of origin
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chunk {
    pub text: String,
    pub source: String,
}

/// Collapse every whitespace run to a single space and trim.
///
/// This is the canonical form fragments are stored and matched in.
#[must_use]
pub fn clean_text(raw: &str) -> String {
    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Recursive character splitter with overlap.
#[derive(Debug, Clone)]
pub struct TextChunker {
    chunk_size: usize,
    overlap: usize,
}

impl Default for TextChunker {
    fn default() -> Self {
        Self::new(DEFAULT_CHUNK_SIZE, DEFAULT_CHUNK_OVERLAP)
    }
}

impl TextChunker {
    /// Create a chunker targeting `chunk_size` characters per chunk with
    /// `overlap` characters shared between neighbors.
    #[must_use]
    pub fn new(chunk_size: usize, overlap: usize) -> Self {
        assert!(overlap < chunk_size, "overlap must be smaller than chunk size");
        Self { chunk_size, overlap }
    }

    /// Split `text` into chunks. Sizes are counted in characters, chunks are
    /// trimmed, and whitespace-only chunks are dropped.
    #[must_use]
    pub fn chunk(&self, text: &str) -> Vec<String> {
        self.split_recursive(text, SEPARATORS)
    }

    fn split_recursive(&self, text: &str, separators: &[&str]) -> Vec<String> {
        // First separator that occurs in the text wins.
        let mut separator = "";
        let mut remaining: &[&str] = &[];
        for (i, sep) in separators.iter().enumerate() {
            if sep.is_empty() || text.contains(sep) {
                separator = sep;
                remaining = &separators[i + 1..];
                break;
            }
        }

        let pieces = split_keeping_separator(text, separator);

        let mut chunks = Vec::new();
        let mut good: Vec<String> = Vec::new();
        for piece in pieces {
            if piece.chars().count() < self.chunk_size {
                good.push(piece);
                continue;
            }
            if !good.is_empty() {
                chunks.extend(self.merge_pieces(&good));
                good.clear();
            }
            if remaining.is_empty() {
                // Nothing finer to split on
                chunks.push(piece);
            } else {
                chunks.extend(self.split_recursive(&piece, remaining));
            }
        }
        if !good.is_empty() {
            chunks.extend(self.merge_pieces(&good));
        }

        chunks
    }

    /// Greedily merge pieces into chunks, retiring pieces from the front of
    /// the window until at most `overlap` characters carry over.
    fn merge_pieces(&self, pieces: &[String]) -> Vec<String> {
        let mut chunks = Vec::new();
        let mut window: VecDeque<&String> = VecDeque::new();
        let mut window_len = 0usize;

        for piece in pieces {
            let piece_len = piece.chars().count();
            if window_len + piece_len > self.chunk_size && !window.is_empty() {
                push_chunk(&mut chunks, &window);
                while window_len > self.overlap
                    || (window_len + piece_len > self.chunk_size && window_len > 0)
                {
                    if let Some(front) = window.pop_front() {
                        window_len -= front.chars().count();
                    }
                }
            }
            window.push_back(piece);
            window_len += piece_len;
        }
        push_chunk(&mut chunks, &window);

        chunks
    }
}

fn push_chunk(chunks: &mut Vec<String>, window: &VecDeque<&String>) {
    let joined: String = window.iter().map(|s| s.as_str()).collect();
    let trimmed = joined.trim();
    if !trimmed.is_empty() {
        chunks.push(trimmed.to_string());
    }
}

/// Split `text` on `separator`, keeping each separator attached to the end
/// of the piece before it. The empty separator splits into characters.
fn split_keeping_separator(text: &str, separator: &str) -> Vec<String> {
    if separator.is_empty() {
        return text.chars().map(|c| c.to_string()).collect();
    }

    let mut pieces = Vec::new();
    let mut rest = text;
    while let Some(pos) = rest.find(separator) {
        let end = pos + separator.len();
        pieces.push(rest[..end].to_string());
        rest = &rest[end..];
    }
    if !rest.is_empty() {
        pieces.push(rest.to_string());
    }

    pieces
}

/// Read every `*.txt` file under `dir` (sorted by name), clean and chunk
/// each one, and tag every chunk with its file name.
pub fn load_corpus(dir: &Path) -> Result<Vec<Chunk>> {
    let chunker = TextChunker::default();

    let mut files: Vec<PathBuf> = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.extension().map_or(false, |ext| ext == "txt") {
            files.push(path);
        }
    }
    files.sort();

    let mut chunks = Vec::new();
    for path in &files {
        let source = path
            .file_name()
            .map_or_else(String::new, |name| name.to_string_lossy().into_owned());
        info!("Processing {}", source);

        let raw = fs::read_to_string(path)?;
        let cleaned = clean_text(&raw);
        for text in chunker.chunk(&cleaned) {
            chunks.push(Chunk {
                text,
                source: source.clone(),
            });
        }
    }
    info!("Processed {} chunks from {} files", chunks.len(), files.len());

    Ok(chunks)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_clean_text_collapses_whitespace() {
        assert_eq!(clean_text("  A  quiet\n\n harbor\ttown. "), "A quiet harbor town.");
        assert_eq!(clean_text("\n \t "), "");
    }

    #[test]
    fn test_short_text_is_one_chunk() {
        let chunker = TextChunker::default();
        assert_eq!(chunker.chunk("Elara rules the north."), vec!["Elara rules the north."]);
    }

    #[test]
    fn test_whitespace_only_text_yields_no_chunks() {
        let chunker = TextChunker::default();
        assert!(chunker.chunk("   ").is_empty());
        assert!(chunker.chunk("").is_empty());
    }

    #[test]
    fn test_sentences_merge_with_overlap() {
        let chunker = TextChunker::new(20, 8);

        let chunks = chunker.chunk("aa bb. cc dd. ee ff. gg hh.");

        assert_eq!(chunks, vec!["aa bb. cc dd.", "cc dd. ee ff. gg hh."]);
    }

    #[test]
    fn test_unbroken_text_splits_at_character_level() {
        let chunker = TextChunker::new(10, 3);

        let chunks = chunker.chunk("abcdefghijklmnopqrst");

        assert_eq!(chunks, vec!["abcdefghij", "hijklmnopq", "opqrst"]);
    }

    #[test]
    fn test_chunks_respect_target_size() {
        let chunker = TextChunker::new(40, 10);
        let text = "The keep stands tall. Merchants gather daily. Guards walk the walls. \
                    Dragons circle far above. The river feeds the town.";

        let chunks = chunker.chunk(&clean_text(text));

        assert!(!chunks.is_empty());
        for chunk in &chunks {
            assert!(chunk.chars().count() <= 40);
            assert!(!chunk.trim().is_empty());
        }
    }

    #[test]
    fn test_load_corpus_sorts_and_filters_files() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("b.txt"), "Dragons  live\nhere.").unwrap();
        std::fs::write(dir.path().join("a.txt"), "Elara rules the north.").unwrap();
        let mut skipped = std::fs::File::create(dir.path().join("notes.md")).unwrap();
        writeln!(skipped, "ignored").unwrap();

        let chunks = load_corpus(dir.path()).unwrap();

        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[0].source, "a.txt");
        assert_eq!(chunks[0].text, "Elara rules the north.");
        assert_eq!(chunks[1].source, "b.txt");
        assert_eq!(chunks[1].text, "Dragons live here.");
    }

    #[test]
    fn test_load_corpus_empty_dir() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_corpus(dir.path()).unwrap().is_empty());
    }
}
