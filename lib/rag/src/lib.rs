//! # lorekeeper RAG
//!
//! Retrieval-augmented answering over a campaign knowledge base.
//!
//! The pipeline has two halves. At build time, campaign text files are
//! cleaned, chunked and embedded into a flat vector index with a parallel
//! fragment store. At question time, the [`Assistant`] embeds the query,
//! retrieves the nearest fragments and composes an answer, falling back to
//! fragment excerpts whenever generation is unavailable or failing.
//!
//! ## Features
//!
//! - **Chunking**: recursive character splitting with overlap
//! - **Embedding**: pluggable [`Embedder`] trait with a deterministic
//!   hash-based implementation included
//! - **Retrieval**: nearest-neighbor search resolved to stored fragments
//! - **Answering**: prompted generation with deterministic fallbacks, or
//!   purely extractive answers with no generator at all
//!
//! ## Example
//!
//! ```rust
//! use std::sync::Arc;
//! use lorekeeper_rag::{build_knowledge, Assistant, Chunk, HashEmbedder, Retriever};
//!
//! let chunks = vec![Chunk {
//!     text: "Queen Elara rules the northern kingdom.".to_string(),
//!     source: "npcs.txt".to_string(),
//! }];
//!
//! let embedder = Arc::new(HashEmbedder::new(64));
//! let (index, store) = build_knowledge(&chunks, embedder.as_ref()).unwrap();
//!
//! let assistant = Assistant::new(Retriever::new(index, store, embedder));
//! let answer = assistant.answer("who rules the northern kingdom", 1).unwrap();
//!
//! assert!(answer.answer.contains("Queen Elara"));
//! assert_eq!(answer.sources, Some(vec!["npcs.txt".to_string()]));
//! ```

pub mod assistant;
pub mod builder;
pub mod chunk;
pub mod embed;
pub mod generate;
pub mod retriever;

// Re-export main types for convenience
pub use assistant::{Answer, AnswerOptions, Assistant, ExplainedAnswer, DEFAULT_TOP_K};
pub use builder::build_knowledge;
pub use chunk::{
    clean_text, load_corpus, Chunk, TextChunker, DEFAULT_CHUNK_OVERLAP, DEFAULT_CHUNK_SIZE,
};
pub use embed::{Embedder, HashEmbedder, DEFAULT_DIM};
pub use generate::Generator;
pub use retriever::Retriever;
