//! Answer orchestration over retrieval, generation and explanation.
//!
//! The assistant never lets a collaborator failure reach the caller as a
//! missing answer: an absent retriever or an empty result set yields a
//! fixed degraded answer, a failing generator falls back to an excerpt of
//! the best fragment, and an absent generator switches to extractive
//! answers. Only embedding failures propagate, because without a query
//! vector there is nothing to answer from.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::warn;

use lorekeeper_core::{Result, RetrievedFragment};
use lorekeeper_explain::{create_explanation, ExplanationBundle};

use crate::generate::Generator;
use crate::retriever::Retriever;

/// Default number of fragments retrieved per question.
pub const DEFAULT_TOP_K: usize = 5;

const ANSWER_MARKER: &str = "Answer:";

const UNAVAILABLE: &str =
    "The knowledge base hasn't been properly initialized. Please run the build step first.";
const INSUFFICIENT: &str =
    "I don't have enough information to answer that question about your campaign.";
const MISSING_MARKER_PREFIX: &str = "Based on the information in your campaign: ";
const GENERATION_FALLBACK_PREFIX: &str = "Based on your campaign information: ";
const EXTRACTIVE_HEADER: &str = "Based on your campaign information:\n\n";
const EXTRACTIVE_NOTE: &str =
    "(Note: Using retrieved text directly as generation model is unavailable)";

/// Which optional parts of an [`Answer`] to fill in
#[derive(Debug, Clone, Copy)]
pub struct AnswerOptions {
    pub include_context: bool,
    pub include_sources: bool,
}

impl Default for AnswerOptions {
    fn default() -> Self {
        Self {
            include_context: true,
            include_sources: true,
        }
    }
}

/// One answered question
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Answer {
    pub answer: String,
    /// Retrieved fragment texts, present when requested. The degraded
    /// paths always carry an empty list instead of omitting the field.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<Vec<String>>,
    /// Distinct source labels in first-seen order, present when requested
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sources: Option<Vec<String>>,
}

impl Answer {
    fn degraded(message: &str) -> Self {
        Self {
            answer: message.to_string(),
            context: Some(Vec::new()),
            sources: Some(Vec::new()),
        }
    }
}

/// An answer together with the explanation of how it was produced
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExplainedAnswer {
    pub answer: Answer,
    /// Absent only when the knowledge base was never initialized
    #[serde(skip_serializing_if = "Option::is_none")]
    pub explanation: Option<ExplanationBundle>,
}

/// Campaign question answering with optional generation.
pub struct Assistant {
    retriever: Option<Retriever>,
    generator: Option<Arc<dyn Generator>>,
}

impl Assistant {
    /// Assistant in extractive mode: answers are composed directly from
    /// retrieved fragments until a generator is attached.
    #[must_use]
    pub fn new(retriever: Retriever) -> Self {
        Self {
            retriever: Some(retriever),
            generator: None,
        }
    }

    /// Attach a generator for prompted answers.
    #[must_use]
    pub fn with_generator(mut self, generator: Arc<dyn Generator>) -> Self {
        self.generator = Some(generator);
        self
    }

    /// Assistant with no knowledge base. Every question gets the fixed
    /// not-initialized answer.
    #[must_use]
    pub fn without_retriever() -> Self {
        Self {
            retriever: None,
            generator: None,
        }
    }

    /// Answer `query` from the `k` nearest fragments.
    pub fn answer(&self, query: &str, k: usize) -> Result<Answer> {
        self.answer_with(query, k, AnswerOptions::default())
    }

    /// Answer `query`, controlling which optional fields are returned.
    pub fn answer_with(&self, query: &str, k: usize, options: AnswerOptions) -> Result<Answer> {
        let retriever = match &self.retriever {
            Some(retriever) => retriever,
            None => return Ok(Answer::degraded(UNAVAILABLE)),
        };

        let fragments = retriever.retrieve(query, k)?;
        Ok(self.answer_from(query, &fragments, options))
    }

    /// Answer `query` and explain the answer from the same retrieval.
    pub fn answer_explained(&self, query: &str, k: usize) -> Result<ExplainedAnswer> {
        let retriever = match &self.retriever {
            Some(retriever) => retriever,
            None => {
                return Ok(ExplainedAnswer {
                    answer: Answer::degraded(UNAVAILABLE),
                    explanation: None,
                })
            }
        };

        let fragments = retriever.retrieve(query, k)?;
        let answer = self.answer_from(query, &fragments, AnswerOptions::default());
        let explanation = create_explanation(query, &fragments, &answer.answer);

        Ok(ExplainedAnswer {
            answer,
            explanation: Some(explanation),
        })
    }

    fn answer_from(
        &self,
        query: &str,
        fragments: &[RetrievedFragment],
        options: AnswerOptions,
    ) -> Answer {
        if fragments.is_empty() {
            return Answer::degraded(INSUFFICIENT);
        }

        let answer = match &self.generator {
            Some(generator) => generate_answer(query, fragments, generator.as_ref()),
            None => extractive_answer(fragments),
        };

        let context = if options.include_context {
            Some(fragments.iter().map(|f| f.fragment.text.clone()).collect())
        } else {
            None
        };
        let sources = if options.include_sources {
            Some(dedupe_sources(fragments))
        } else {
            None
        };

        Answer {
            answer,
            context,
            sources,
        }
    }
}

/// Prompt the generator and post-process its output.
///
/// Everything after the first "Answer:" marker is the answer; output with
/// no marker is kept whole behind a fixed prefix. A generation error falls
/// back to the first 200 characters of the top fragment.
fn generate_answer(
    query: &str,
    fragments: &[RetrievedFragment],
    generator: &dyn Generator,
) -> String {
    let context_text = fragments
        .iter()
        .map(|f| f.fragment.text.as_str())
        .collect::<Vec<_>>()
        .join("\n\n");
    let prompt = format!(
        "Answer a question about the campaign:\nQuestion: {}\nContext: {}\nAnswer:",
        query, context_text
    );

    match generator.generate(&prompt) {
        Ok(generated) => match generated.find(ANSWER_MARKER) {
            Some(pos) => generated[pos + ANSWER_MARKER.len()..].trim().to_string(),
            None => format!("{}{}", MISSING_MARKER_PREFIX, generated),
        },
        Err(e) => {
            warn!("Text generation failed: {}", e);
            format!(
                "{}{}...",
                GENERATION_FALLBACK_PREFIX,
                truncate_chars(&fragments[0].fragment.text, 200)
            )
        }
    }
}

/// Compose an answer from the top fragments when no generator exists.
fn extractive_answer(fragments: &[RetrievedFragment]) -> String {
    let mut answer = String::from(EXTRACTIVE_HEADER);
    for fragment in fragments.iter().take(2) {
        answer.push_str("- ");
        answer.push_str(truncate_chars(&fragment.fragment.text, 150));
        answer.push_str("...\n\n");
    }
    answer.push_str(EXTRACTIVE_NOTE);

    answer
}

fn dedupe_sources(fragments: &[RetrievedFragment]) -> Vec<String> {
    let mut sources = Vec::new();
    for fragment in fragments {
        if !sources.contains(&fragment.fragment.source) {
            sources.push(fragment.fragment.source.clone());
        }
    }
    sources
}

/// First `limit` characters of `text`, never splitting a multi-byte char.
fn truncate_chars(text: &str, limit: usize) -> &str {
    match text.char_indices().nth(limit) {
        Some((pos, _)) => &text[..pos],
        None => text,
    }
}
