//! Query-term highlighting inside fragment text.

use crate::text;

/// Wrap every whole-word occurrence of a meaningful query word in `**`.
///
/// Query words are case-folded and filtered against the shared stop-word
/// list; unlike term weighting, single-character words are kept. Matching is
/// case-insensitive over maximal word-character runs and the original casing
/// is preserved inside the markers. When the query has no words left after
/// stop-word removal the text comes back unchanged.
#[must_use]
pub fn highlight(query: &str, text: &str) -> String {
    let mut query_words: Vec<String> = Vec::new();
    for word in text::words(query) {
        if !text::is_stop_word(&word) && !query_words.contains(&word) {
            query_words.push(word);
        }
    }
    if query_words.is_empty() {
        return text.to_string();
    }

    let mut highlighted = String::with_capacity(text.len());
    let mut word = String::new();
    for c in text.chars() {
        if text::is_word_char(c) {
            word.push(c);
        } else {
            flush_word(&mut highlighted, &mut word, &query_words);
            highlighted.push(c);
        }
    }
    flush_word(&mut highlighted, &mut word, &query_words);

    highlighted
}

fn flush_word(out: &mut String, word: &mut String, query_words: &[String]) {
    if word.is_empty() {
        return;
    }
    if query_words.contains(&word.to_lowercase()) {
        out.push_str("**");
        out.push_str(word);
        out.push_str("**");
    } else {
        out.push_str(word);
    }
    word.clear();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_highlight_whole_words_case_insensitive() {
        let text = "The Dragon sleeps. A dragonling does not.";
        assert_eq!(
            highlight("dragon", text),
            "The **Dragon** sleeps. A dragonling does not."
        );
    }

    #[test]
    fn test_highlight_multiple_query_words() {
        assert_eq!(
            highlight("dragon fire", "fire and dragon fire"),
            "**fire** and **dragon** **fire**"
        );
    }

    #[test]
    fn test_stop_word_only_query_returns_text_unchanged() {
        let text = "The dragon sleeps.";
        assert_eq!(highlight("the and for", text), text);
        assert_eq!(highlight("", text), text);
    }

    #[test]
    fn test_stop_words_in_query_are_not_highlighted() {
        assert_eq!(
            highlight("quem é a rainha", "A rainha é Elara."),
            "A **rainha** **é** Elara."
        );
    }

    #[test]
    fn test_word_at_end_of_text_is_flushed() {
        assert_eq!(highlight("elara", "queen elara"), "queen **elara**");
    }
}
