//! Query-time retrieval over a built index.

use std::sync::Arc;

use tracing::warn;

use lorekeeper_core::{Error, FragmentStore, Result, RetrievedFragment, VectorIndex};

use crate::embed::Embedder;

/// Embeds queries and resolves nearest-neighbor hits to fragments.
///
/// Holds the index and store immutably; concurrent `retrieve` calls are
/// safe because nothing here mutates after construction.
pub struct Retriever {
    index: VectorIndex,
    store: FragmentStore,
    embedder: Arc<dyn Embedder>,
}

impl Retriever {
    #[must_use]
    pub fn new(index: VectorIndex, store: FragmentStore, embedder: Arc<dyn Embedder>) -> Self {
        Self {
            index,
            store,
            embedder,
        }
    }

    /// Retrieve the `k` fragments nearest to `query`.
    ///
    /// The query is embedded unconditionally; embedder failures propagate
    /// even when nothing is indexed. An empty index then yields an empty
    /// result without a dimension check. Results come back in ascending
    /// distance order with the distance attached as `score`, and hits
    /// whose id does not resolve in the store are dropped with a warning,
    /// never fabricated.
    pub fn retrieve(&self, query: &str, k: usize) -> Result<Vec<RetrievedFragment>> {
        let embedding = self.embedder.embed(query)?;
        if self.index.is_empty() {
            return Ok(Vec::new());
        }
        if embedding.len() != self.index.dim() {
            return Err(Error::DimensionMismatch {
                expected: self.index.dim(),
                actual: embedding.len(),
            });
        }

        let hits = self.index.search(&embedding, k)?;
        let mut results = Vec::with_capacity(hits.len());
        for (id, distance) in hits {
            match self.store.get(id) {
                Some(fragment) => results.push(RetrievedFragment {
                    fragment: fragment.clone(),
                    distance,
                    score: Some(distance),
                }),
                None => warn!("Dropping search hit {}: no fragment stored under that id", id),
            }
        }

        Ok(results)
    }
}
