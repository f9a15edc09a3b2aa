//! # lorekeeper Core
//!
//! Core library for the lorekeeper campaign assistant.
//!
//! This crate provides the retrieval primitives the rest of the workspace is
//! built on:
//!
//! - [`VectorIndex`] - Exact nearest-neighbor search over embedding vectors
//! - [`FragmentStore`] - Immutable id-ordered store of text fragments
//! - [`vector`] - Scalar vector math shared with the explainers
//! - [`Error`] - The error taxonomy for the retrieval pipeline
//!
//! ## Example
//!
//! ```rust
//! use lorekeeper_core::{FragmentStore, VectorIndex};
//!
//! let index = VectorIndex::build(&[vec![1.0, 0.0], vec![0.0, 1.0]]).unwrap();
//! let store = FragmentStore::from_pairs(vec![
//!     (
//!         "Queen Elara rules the northern reaches.".to_string(),
//!         "npcs.txt".to_string(),
//!     ),
//!     (
//!         "The harbor city trades in salt.".to_string(),
//!         "regions.txt".to_string(),
//!     ),
//! ]);
//!
//! let hits = index.search(&[1.0, 0.0], 1).unwrap();
//! assert_eq!(hits[0].0, 0);
//! assert_eq!(store.get(hits[0].0).unwrap().source, "npcs.txt");
//! ```

pub mod error;
pub mod fragment;
pub mod index;
pub mod vector;

pub use error::{Error, Result};
pub use fragment::{Fragment, FragmentStore, RetrievedFragment};
pub use index::VectorIndex;
