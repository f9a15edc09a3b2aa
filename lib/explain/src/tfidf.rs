//! Term-importance explanation for retrieval results.
//!
//! Builds a small TF-IDF model over just the query and the retrieved
//! fragments, so term weights are relative to the current result set and are
//! recomputed on every call. Changing how many fragments are retrieved
//! changes the weights; that relativity is intentional and part of the
//! explanation's meaning.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use lorekeeper_core::{vector, RetrievedFragment};

use crate::text;

/// Note attached to a successful retrieval explanation.
const NOTE_EXPLAINED: &str =
    "These fragments were retrieved because they contain terms similar to your query.";

/// Note attached when there was nothing to explain.
const NOTE_NO_FRAGMENTS: &str = "No fragments were retrieved.";

/// Note attached to the degraded result when no usable terms exist.
const NOTE_NO_VOCABULARY: &str =
    "Could not generate an explanation because the query and fragments contain no usable terms.";

/// How many query terms an explanation reports.
const TOP_TERM_COUNT: usize = 5;

/// Weight assigned to one query term
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TermWeight {
    pub term: String,
    pub weight: f32,
}

/// Cosine similarity between the query and one retrieved fragment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FragmentSimilarity {
    /// Position of the fragment in the retrieval result
    pub index: usize,
    pub source: String,
    pub similarity: f32,
}

/// Why a set of fragments was retrieved for a query
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrievalExplanation {
    pub note: String,
    /// The highest-weighted query terms, best first
    pub top_terms: Vec<String>,
    pub term_weights: Vec<TermWeight>,
    /// Per-fragment similarity to the query, most similar first
    pub fragment_similarities: Vec<FragmentSimilarity>,
}

impl RetrievalExplanation {
    fn degraded(note: &str) -> Self {
        Self {
            note: note.to_string(),
            top_terms: Vec::new(),
            term_weights: Vec::new(),
            fragment_similarities: Vec::new(),
        }
    }
}

/// Explains retrieval by weighting query terms against the retrieved set.
#[derive(Debug, Clone, Copy, Default)]
pub struct TermImportanceExplainer;

impl TermImportanceExplainer {
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Explain why `fragments` were retrieved for `query`.
    ///
    /// Query terms with weight above zero are reported best-first, capped at
    /// five; equal weights keep their vocabulary (first-encounter) order.
    /// When the combined texts yield no vocabulary at all the result is a
    /// degraded explanation with empty lists, never an error.
    #[must_use]
    pub fn explain(&self, query: &str, fragments: &[RetrievedFragment]) -> RetrievalExplanation {
        if fragments.is_empty() {
            return RetrievalExplanation::degraded(NOTE_NO_FRAGMENTS);
        }

        let mut documents: Vec<&str> = Vec::with_capacity(fragments.len() + 1);
        documents.push(query);
        documents.extend(fragments.iter().map(|f| f.fragment.text.as_str()));

        let model = match TfidfModel::fit(&documents) {
            Some(model) => model,
            None => return RetrievalExplanation::degraded(NOTE_NO_VOCABULARY),
        };

        let query_row = &model.rows[0];

        let mut term_weights = Vec::new();
        for (i, &weight) in query_row.iter().enumerate() {
            if weight > 0.0 {
                term_weights.push(TermWeight {
                    term: model.vocabulary[i].clone(),
                    weight,
                });
            }
        }
        term_weights
            .sort_by(|a, b| b.weight.partial_cmp(&a.weight).unwrap_or(std::cmp::Ordering::Equal));
        term_weights.truncate(TOP_TERM_COUNT);

        let top_terms = term_weights.iter().map(|t| t.term.clone()).collect();

        let mut fragment_similarities: Vec<FragmentSimilarity> = fragments
            .iter()
            .enumerate()
            .map(|(i, f)| FragmentSimilarity {
                index: i,
                source: f.fragment.source.clone(),
                similarity: vector::cosine_similarity(query_row, &model.rows[i + 1]),
            })
            .collect();
        fragment_similarities.sort_by(|a, b| {
            b.similarity
                .partial_cmp(&a.similarity)
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        RetrievalExplanation {
            note: NOTE_EXPLAINED.to_string(),
            top_terms,
            term_weights,
            fragment_similarities,
        }
    }
}

/// TF-IDF weights over an ad-hoc document set.
///
/// Raw term frequency times smoothed inverse document frequency
/// (`ln((1 + n) / (1 + df)) + 1`), with each document row L2-normalized.
struct TfidfModel {
    /// Terms in first-encounter order across all documents
    vocabulary: Vec<String>,
    /// One normalized weight row per document
    rows: Vec<Vec<f32>>,
}

impl TfidfModel {
    /// Fit the model, or `None` when no document yields a single term.
    fn fit(documents: &[&str]) -> Option<Self> {
        let mut vocabulary: Vec<String> = Vec::new();
        let mut term_ids: HashMap<String, usize> = HashMap::new();
        let mut doc_terms: Vec<Vec<usize>> = Vec::with_capacity(documents.len());

        for doc in documents {
            let mut ids = Vec::new();
            for term in text::terms(doc) {
                let next_id = vocabulary.len();
                let id = *term_ids.entry(term.clone()).or_insert(next_id);
                if id == next_id {
                    vocabulary.push(term);
                }
                ids.push(id);
            }
            doc_terms.push(ids);
        }

        if vocabulary.is_empty() {
            return None;
        }

        // Document frequency per term
        let mut dfs = vec![0u32; vocabulary.len()];
        for ids in &doc_terms {
            let mut unique = ids.clone();
            unique.sort_unstable();
            unique.dedup();
            for id in unique {
                dfs[id] += 1;
            }
        }

        let n = documents.len() as f32;
        let idfs: Vec<f32> = dfs
            .iter()
            .map(|&df| ((1.0 + n) / (1.0 + df as f32)).ln() + 1.0)
            .collect();

        let mut rows = Vec::with_capacity(documents.len());
        for ids in &doc_terms {
            let mut row = vec![0.0f32; vocabulary.len()];
            for &id in ids {
                row[id] += 1.0;
            }
            for (value, idf) in row.iter_mut().zip(&idfs) {
                *value *= idf;
            }
            vector::normalize(&mut row);
            rows.push(row);
        }

        Some(Self { vocabulary, rows })
    }
}
