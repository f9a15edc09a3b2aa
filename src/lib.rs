//! # lorekeeper
//!
//! A retrieval-augmented question answering engine for tabletop campaign
//! notes, with built-in answer explanations.
//!
//! Point it at a directory of campaign text files and it chunks, embeds and
//! indexes them; every question is then answered from the nearest fragments,
//! and every answer can explain itself: which query terms mattered, how
//! similar each fragment was, and which answer phrase traces back to which
//! source file.
//!
//! ## Quick Start
//!
//! ### As a CLI
//!
//! ```bash
//! lorekeeper build --corpus-dir ./campaign --data-dir ./data
//! lorekeeper ask "Who is Queen Elara?" --data-dir ./data
//! lorekeeper shell --data-dir ./data
//! ```
//!
//! ### As a Library
//!
//! ```rust
//! use std::sync::Arc;
//! use lorekeeper::prelude::*;
//!
//! let chunks = vec![Chunk {
//!     text: "Queen Elara rules the northern kingdom.".to_string(),
//!     source: "npcs.txt".to_string(),
//! }];
//!
//! let embedder = Arc::new(HashEmbedder::new(64));
//! let (index, store) = build_knowledge(&chunks, embedder.as_ref()).unwrap();
//! let assistant = Assistant::new(Retriever::new(index, store, embedder));
//!
//! let explained = assistant
//!     .answer_explained("Who rules the northern kingdom?", 1)
//!     .unwrap();
//! assert!(explained.answer.answer.contains("Queen Elara"));
//! assert!(explained.explanation.is_some());
//! ```
//!
//! ## Crate Structure
//!
//! lorekeeper is composed of several crates:
//!
//! - `lorekeeper-core` - Vector index, fragment store and vector math
//! - `lorekeeper-explain` - Term importance, highlighting and attribution
//! - `lorekeeper-rag` - Chunking, embedding, retrieval and answering
//! - `lorekeeper-storage` - Knowledge-base artifacts on disk
//!
//! ## Features
//!
//! - **Exact retrieval**: flat nearest-neighbor search, no approximation
//! - **Deterministic embeddings**: hash-based trigram and word buckets,
//!   no model downloads
//! - **Explainable answers**: TF-IDF term weights, fragment similarities,
//!   phrase-level attribution and highlighted fragments
//! - **Graceful degradation**: extractive answers when no generator is
//!   attached, honest fallbacks when one fails
//! - **Durable artifacts**: checksummed vector and manifest files

// Re-export core types
pub use lorekeeper_core::{
    vector, Error, Fragment, FragmentStore, Result, RetrievedFragment, VectorIndex,
};

// Re-export the retrieval pipeline
pub use lorekeeper_rag::{
    build_knowledge, clean_text, load_corpus, Answer, AnswerOptions, Assistant, Chunk, Embedder,
    ExplainedAnswer, Generator, HashEmbedder, Retriever, TextChunker, DEFAULT_CHUNK_OVERLAP,
    DEFAULT_CHUNK_SIZE, DEFAULT_DIM, DEFAULT_TOP_K,
};

// Re-export explanations
pub use lorekeeper_explain::{
    create_explanation, highlight, AttributionEngine, AttributionLink, ExplanationBundle,
    FragmentSimilarity, HighlightedFragment, RetrievalExplanation, SourceUsage,
    TermImportanceExplainer, TermWeight,
};

// Re-export storage
pub use lorekeeper_storage::{KnowledgeStore, LoadedKnowledge, Manifest};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        build_knowledge, create_explanation, Answer, AnswerOptions, Assistant, Chunk, Embedder,
        Error, ExplainedAnswer, ExplanationBundle, Fragment, FragmentStore, Generator,
        HashEmbedder, KnowledgeStore, Result, RetrievedFragment, Retriever, VectorIndex,
    };
}
