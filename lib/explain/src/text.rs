//! Tokenization and the stop-word list shared by the explainers.

/// Stop words ignored by term weighting and highlighting.
///
/// The campaign corpus mixes Portuguese source material with English
/// rulebook text, so both languages are covered.
pub const STOP_WORDS: &[&str] = &[
    // Portuguese
    "o", "a", "os", "as", "um", "uma", "uns", "umas", "de", "do", "da", "dos", "das", "em", "no",
    "na", "nos", "nas", "por", "para", "com", "e", "ou", "que", "quem", "quando", "como", "onde",
    "qual", "quais",
    // English ("a" is already covered above)
    "the", "an", "and", "or", "but", "is", "are", "was", "were", "be", "been", "being", "have",
    "has", "had", "do", "does", "did", "to", "at", "in", "on", "by", "with", "about", "for",
];

/// True when `word` (already lower-cased) is a stop word
#[inline]
#[must_use]
pub fn is_stop_word(word: &str) -> bool {
    STOP_WORDS.contains(&word)
}

#[inline]
pub(crate) fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Split text into lower-cased maximal runs of word characters.
///
/// A word character is alphanumeric or `_`.
#[must_use]
pub fn words(text: &str) -> Vec<String> {
    text.split(|c: char| !is_word_char(c))
        .filter(|s| !s.is_empty())
        .map(str::to_lowercase)
        .collect()
}

/// Tokens used for term weighting: words of at least two characters with
/// stop words removed.
#[must_use]
pub fn terms(text: &str) -> Vec<String> {
    words(text)
        .into_iter()
        .filter(|w| w.chars().count() > 1 && !is_stop_word(w))
        .collect()
}
