//! Phrase-level attribution of an answer to its context fragments.
//!
//! Sentence splitting here is the literal `". "` delimiter, not real
//! sentence segmentation, and a matched phrase is heuristic evidence that
//! the answer drew on a fragment, not proof of it.

use serde::{Deserialize, Serialize};

use lorekeeper_core::RetrievedFragment;

/// Source label reported when no single fragment contains the phrase.
pub const UNKNOWN_SOURCE: &str = "unknown";

/// Most links one attribution pass reports.
const MAX_LINKS: usize = 5;

/// Tokens per matched phrase.
const PHRASE_LEN: usize = 3;

/// One phrase shared between an answer sentence and the context
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributionLink {
    pub answer_sentence: String,
    /// Three whitespace-delimited tokens, lower-cased
    pub matched_phrase: String,
    /// First context sentence containing the phrase, empty if none
    pub context_sentence: String,
    /// Source of the first fragment containing the phrase, or "unknown"
    pub source: String,
}

/// How many fragments one source label contributed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceUsage {
    pub source: String,
    pub count: usize,
}

/// Links answer sentences back to the fragments they echo.
#[derive(Debug, Clone, Copy, Default)]
pub struct AttributionEngine;

impl AttributionEngine {
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Trace 3-token phrases from the answer back into the fragments.
    ///
    /// Each answer sentence contributes at most one link (its first matching
    /// window), links keep answer-sentence order, and at most five are
    /// returned.
    #[must_use]
    pub fn attribute(
        &self,
        fragments: &[RetrievedFragment],
        answer: &str,
    ) -> Vec<AttributionLink> {
        let context: Vec<String> = fragments
            .iter()
            .map(|f| f.fragment.text.clone())
            .collect();
        let full_context = context.join(" ");
        let full_context_lower = full_context.to_lowercase();
        let context_sentences: Vec<&str> = full_context.split(". ").collect();

        let mut links = Vec::new();
        'sentences: for answer_sentence in answer.split(". ") {
            let words: Vec<&str> = answer_sentence.split_whitespace().collect();
            if words.len() < PHRASE_LEN {
                continue;
            }

            for window in words.windows(PHRASE_LEN) {
                let phrase = window.join(" ").to_lowercase();
                if !full_context_lower.contains(&phrase) {
                    continue;
                }

                let source = fragments
                    .iter()
                    .find(|f| f.fragment.text.to_lowercase().contains(&phrase))
                    .map_or_else(|| UNKNOWN_SOURCE.to_string(), |f| f.fragment.source.clone());

                let context_sentence = context_sentences
                    .iter()
                    .find(|s| s.to_lowercase().contains(&phrase))
                    .map_or_else(String::new, |s| (*s).to_string());

                links.push(AttributionLink {
                    answer_sentence: answer_sentence.to_string(),
                    matched_phrase: phrase,
                    context_sentence,
                    source,
                });
                if links.len() == MAX_LINKS {
                    break 'sentences;
                }
                // One link per answer sentence
                break;
            }
        }

        links
    }

    /// Count fragments per source label, most used first.
    ///
    /// Ties keep the order sources first appear in the fragment list.
    #[must_use]
    pub fn sources_by_usage(&self, fragments: &[RetrievedFragment]) -> Vec<SourceUsage> {
        let mut usage: Vec<SourceUsage> = Vec::new();
        for fragment in fragments {
            match usage.iter_mut().find(|u| u.source == fragment.fragment.source) {
                Some(entry) => entry.count += 1,
                None => usage.push(SourceUsage {
                    source: fragment.fragment.source.clone(),
                    count: 1,
                }),
            }
        }
        usage.sort_by(|a, b| b.count.cmp(&a.count));
        usage
    }
}
