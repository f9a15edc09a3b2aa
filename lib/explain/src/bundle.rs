//! Combined explanation for one answered query.

use serde::{Deserialize, Serialize};

use lorekeeper_core::RetrievedFragment;

use crate::attribution::{AttributionEngine, AttributionLink, SourceUsage};
use crate::highlight;
use crate::tfidf::{FragmentSimilarity, TermImportanceExplainer, TermWeight};

/// Note attached to the generation side of every bundle.
const GENERATION_NOTE: &str =
    "The answer was generated by combining information from the retrieved context.";

/// A fragment with query terms marked up, ready for display
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HighlightedFragment {
    pub source: String,
    pub text: String,
    pub score: f32,
}

/// Everything the explainers can say about one answer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExplanationBundle {
    pub retrieval_note: String,
    pub generation_note: String,
    pub top_terms: Vec<String>,
    pub term_weights: Vec<TermWeight>,
    pub fragment_similarities: Vec<FragmentSimilarity>,
    pub attribution_links: Vec<AttributionLink>,
    pub sources_by_usage: Vec<SourceUsage>,
    pub highlighted_fragments: Vec<HighlightedFragment>,
}

/// Build the full explanation from the (query, fragments, answer) triple
/// the assistant produced.
///
/// Runs term weighting, answer attribution, source counting and query-term
/// highlighting over the same fragment list the answer was built from, so
/// the bundle always describes what actually happened.
#[must_use]
pub fn create_explanation(
    query: &str,
    fragments: &[RetrievedFragment],
    answer: &str,
) -> ExplanationBundle {
    let retrieval = TermImportanceExplainer::new().explain(query, fragments);

    let engine = AttributionEngine::new();
    let attribution_links = engine.attribute(fragments, answer);
    let sources_by_usage = engine.sources_by_usage(fragments);

    let highlighted_fragments = fragments
        .iter()
        .map(|f| HighlightedFragment {
            source: f.fragment.source.clone(),
            text: highlight::highlight(query, &f.fragment.text),
            score: f.score.unwrap_or(0.0),
        })
        .collect();

    ExplanationBundle {
        retrieval_note: retrieval.note,
        generation_note: GENERATION_NOTE.to_string(),
        top_terms: retrieval.top_terms,
        term_weights: retrieval.term_weights,
        fragment_similarities: retrieval.fragment_similarities,
        attribution_links,
        sources_by_usage,
        highlighted_fragments,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lorekeeper_core::Fragment;

    fn create_test_fragment(id: usize, text: &str, source: &str) -> RetrievedFragment {
        RetrievedFragment {
            fragment: Fragment {
                id,
                text: text.to_string(),
                source: source.to_string(),
            },
            distance: 0.25,
            score: Some(0.25),
        }
    }

    #[test]
    fn test_create_explanation_covers_all_parts() {
        let fragments = vec![
            create_test_fragment(0, "Ancient dragons breathe fire constantly.", "monsters.txt"),
            create_test_fragment(1, "The harbor trades in salted fish.", "trade.txt"),
        ];

        let bundle = create_explanation(
            "dragon fire",
            &fragments,
            "The dragons breathe fire here.",
        );

        assert!(bundle.top_terms.contains(&"fire".to_string()));
        assert!(!bundle.term_weights.is_empty());
        assert_eq!(bundle.fragment_similarities.len(), 2);

        assert_eq!(bundle.attribution_links.len(), 1);
        assert_eq!(bundle.attribution_links[0].source, "monsters.txt");

        assert_eq!(bundle.sources_by_usage.len(), 2);
        assert_eq!(bundle.sources_by_usage[0].count, 1);

        assert_eq!(bundle.highlighted_fragments.len(), 2);
        assert!(bundle.highlighted_fragments[0].text.contains("**fire**"));
        assert_eq!(bundle.highlighted_fragments[0].score, 0.25);

        assert!(!bundle.retrieval_note.is_empty());
        assert_eq!(bundle.generation_note, GENERATION_NOTE);
    }

    #[test]
    fn test_create_explanation_without_fragments() {
        let bundle = create_explanation("dragon", &[], "No idea.");

        assert!(bundle.top_terms.is_empty());
        assert!(bundle.term_weights.is_empty());
        assert!(bundle.fragment_similarities.is_empty());
        assert!(bundle.attribution_links.is_empty());
        assert!(bundle.sources_by_usage.is_empty());
        assert!(bundle.highlighted_fragments.is_empty());
    }

    #[test]
    fn test_bundle_serializes_to_json() {
        let fragments = vec![create_test_fragment(0, "a dragon sleeps", "monsters.txt")];
        let bundle = create_explanation("dragon", &fragments, "A dragon sleeps there.");

        let json = serde_json::to_string(&bundle).unwrap();

        assert!(json.contains("\"term_weights\""));
        assert!(json.contains("\"sources_by_usage\""));
        assert!(json.contains("**dragon**"));
    }
}
