//! Text embedding behind a swappable trait.

use std::collections::hash_map::DefaultHasher;
use std::collections::HashSet;
use std::hash::{Hash, Hasher};

use lorekeeper_core::{vector, Result};

/// Default dimensionality for [`HashEmbedder`] vectors.
pub const DEFAULT_DIM: usize = 256;

/// Turns text into a fixed-dimension vector.
///
/// Implementations must be deterministic: the same text always embeds to
/// the same vector. `name` identifies the scheme so stored artifacts can
/// refuse to load under a different embedder.
pub trait Embedder: Send + Sync {
    /// Embed one text into a vector of exactly `dim()` components.
    fn embed(&self, text: &str) -> Result<Vec<f32>>;

    /// Dimensionality of every vector this embedder produces.
    fn dim(&self) -> usize;

    /// Stable identifier for the embedding scheme.
    fn name(&self) -> &str;
}

/// Hash-based embedder over character trigrams and whole words.
///
/// The text is lower-cased and padded with two spaces on each side. Each
/// distinct character trigram adds 1.0 to a hashed bucket; each word adds
/// 2.0 (words carry more signal than trigrams). The vector is then
/// L2-normalized. Simple but effective, and a stand-in for a learned model
/// behind the same trait.
#[derive(Debug, Clone)]
pub struct HashEmbedder {
    dim: usize,
}

impl HashEmbedder {
    /// Create an embedder producing `dim`-component vectors.
    #[must_use]
    pub fn new(dim: usize) -> Self {
        assert!(dim > 0, "embedding dimension must be positive");
        Self { dim }
    }
}

impl Default for HashEmbedder {
    fn default() -> Self {
        Self::new(DEFAULT_DIM)
    }
}

impl Embedder for HashEmbedder {
    fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let mut embedding = vec![0.0f32; self.dim];
        let normalized = text.to_lowercase();

        for trigram in generate_trigrams(&normalized) {
            let mut hasher = DefaultHasher::new();
            trigram.hash(&mut hasher);
            let pos = (hasher.finish() as usize) % self.dim;
            embedding[pos] += 1.0;
        }

        for word in normalized.split_whitespace() {
            let mut hasher = DefaultHasher::new();
            word.hash(&mut hasher);
            let pos = (hasher.finish() as usize) % self.dim;
            embedding[pos] += 2.0;
        }

        vector::normalize(&mut embedding);
        Ok(embedding)
    }

    fn dim(&self) -> usize {
        self.dim
    }

    fn name(&self) -> &str {
        "hash-trigram"
    }
}

/// Character trigrams of a padded string, deduplicated
fn generate_trigrams(s: &str) -> HashSet<String> {
    let padded = format!("  {}  ", s);
    let chars: Vec<char> = padded.chars().collect();

    chars
        .windows(3)
        .map(|w| w.iter().collect::<String>())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_embed_is_deterministic() {
        let embedder = HashEmbedder::new(64);
        let a = embedder.embed("the dragon of the north").unwrap();
        let b = embedder.embed("the dragon of the north").unwrap();
        let c = embedder.embed("a quiet harbor town").unwrap();

        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_embed_is_case_insensitive() {
        let embedder = HashEmbedder::new(64);
        assert_eq!(
            embedder.embed("Queen Elara").unwrap(),
            embedder.embed("queen elara").unwrap()
        );
    }

    #[test]
    fn test_embed_output_is_normalized() {
        let embedder = HashEmbedder::new(128);
        let embedding = embedder.embed("hello world").unwrap();

        assert_eq!(embedding.len(), 128);
        let magnitude = vector::norm(&embedding);
        assert!((magnitude - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_embed_empty_text() {
        let embedder = HashEmbedder::new(16);
        let embedding = embedder.embed("").unwrap();

        // The padding alone contributes one whitespace trigram.
        assert_eq!(embedding.len(), 16);
        assert!((vector::norm(&embedding) - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_trigrams_are_distinct() {
        let trigrams = generate_trigrams("aaaa");
        // "  aaaa  " yields many windows but few distinct trigrams.
        assert!(trigrams.contains("aaa"));
        assert!(trigrams.contains("  a"));
        assert!(trigrams.len() < 6);
    }

    #[test]
    #[should_panic(expected = "dimension must be positive")]
    fn test_zero_dim_rejected() {
        let _ = HashEmbedder::new(0);
    }
}
