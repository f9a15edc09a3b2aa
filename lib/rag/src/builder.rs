//! One-shot knowledge building from chunks.

use tracing::info;

use lorekeeper_core::{FragmentStore, Result, VectorIndex};

use crate::chunk::Chunk;
use crate::embed::Embedder;

/// Embed every chunk in input order and build the index/store pair.
///
/// Vector i belongs to fragment i by construction, so the store's
/// position-assigned ids line up with index rows. Embedding and dimension
/// errors propagate; nothing is built partially.
pub fn build_knowledge(
    chunks: &[Chunk],
    embedder: &dyn Embedder,
) -> Result<(VectorIndex, FragmentStore)> {
    let mut vectors = Vec::with_capacity(chunks.len());
    for chunk in chunks {
        vectors.push(embedder.embed(&chunk.text)?);
    }

    let index = VectorIndex::build(&vectors)?;
    let store = FragmentStore::from_pairs(
        chunks
            .iter()
            .map(|c| (c.text.clone(), c.source.clone()))
            .collect(),
    );
    info!(
        "Built index with {} fragments from {} sources",
        store.len(),
        store.sources().len()
    );

    Ok((index, store))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::embed::HashEmbedder;
    use lorekeeper_core::Error;

    fn create_test_chunks() -> Vec<Chunk> {
        vec![
            Chunk {
                text: "Queen Elara rules the north.".to_string(),
                source: "npcs.txt".to_string(),
            },
            Chunk {
                text: "Dragons nest in the peaks.".to_string(),
                source: "monsters.txt".to_string(),
            },
        ]
    }

    #[test]
    fn test_build_aligns_fragments_with_vectors() {
        let embedder = HashEmbedder::new(32);

        let (index, store) = build_knowledge(&create_test_chunks(), &embedder).unwrap();

        assert_eq!(index.len(), 2);
        assert_eq!(index.dim(), 32);
        assert_eq!(store.len(), 2);
        assert_eq!(store.get(1).map(|f| f.source.as_str()), Some("monsters.txt"));

        // Row i really is the embedding of fragment i.
        let expected = embedder.embed("Dragons nest in the peaks.").unwrap();
        assert_eq!(index.vector(1), Some(expected.as_slice()));
    }

    #[test]
    fn test_build_empty_corpus() {
        let embedder = HashEmbedder::new(32);

        let (index, store) = build_knowledge(&[], &embedder).unwrap();

        assert!(index.is_empty());
        assert!(store.is_empty());
    }

    #[test]
    fn test_build_propagates_embedding_errors() {
        struct FailingEmbedder;

        impl Embedder for FailingEmbedder {
            fn embed(&self, _text: &str) -> Result<Vec<f32>> {
                Err(Error::Embedding("no model".to_string()))
            }

            fn dim(&self) -> usize {
                8
            }

            fn name(&self) -> &str {
                "failing"
            }
        }

        let err = build_knowledge(&create_test_chunks(), &FailingEmbedder).unwrap_err();

        assert!(matches!(err, Error::Embedding(_)));
    }
}
