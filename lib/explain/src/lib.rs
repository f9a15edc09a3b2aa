//! # lorekeeper Explain
//!
//! Explainability layer for retrieval-augmented answers.
//!
//! Every answer the assistant produces can be accompanied by a bundle that
//! shows its work: which query terms drove retrieval, how similar each
//! fragment is to the query, which answer phrases echo which fragment, and
//! the fragment texts with query terms highlighted.
//!
//! ## Features
//!
//! - **Term importance**: TF-IDF weights computed over just the query and
//!   the retrieved fragments, so weights reflect this result set
//! - **Answer attribution**: 3-token phrase matching from answer sentences
//!   back to fragments and their sources
//! - **Highlighting**: whole-word query-term markup inside fragment text
//! - **Source usage**: fragment counts per source, most used first
//!
//! ## Example
//!
//! ```rust
//! use lorekeeper_core::{Fragment, RetrievedFragment};
//! use lorekeeper_explain::{highlight, TermImportanceExplainer};
//!
//! let fragments = vec![RetrievedFragment {
//!     fragment: Fragment {
//!         id: 0,
//!         text: "A dragon breathes fire.".to_string(),
//!         source: "monsters.txt".to_string(),
//!     },
//!     distance: 0.0,
//!     score: Some(0.0),
//! }];
//!
//! let explanation = TermImportanceExplainer::new().explain("dragon fire", &fragments);
//! assert!(explanation.top_terms.contains(&"dragon".to_string()));
//! assert_eq!(explanation.fragment_similarities[0].source, "monsters.txt");
//!
//! assert_eq!(highlight("dragon", "The dragon sleeps."), "The **dragon** sleeps.");
//! ```

pub mod attribution;
pub mod bundle;
pub mod highlight;
pub mod text;
pub mod tfidf;

// Re-export main types for convenience
pub use attribution::{AttributionEngine, AttributionLink, SourceUsage};
pub use bundle::{create_explanation, ExplanationBundle, HighlightedFragment};
pub use highlight::highlight;
pub use tfidf::{FragmentSimilarity, RetrievalExplanation, TermImportanceExplainer, TermWeight};
