use serde::{Deserialize, Serialize};

/// A unit of source text with a stable id and source label
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fragment {
    pub id: usize,
    pub text: String,
    pub source: String,
}

/// Ordered, immutable store of fragments.
///
/// Ids are assigned from position at build time, so fragment `i` is the text
/// behind vector `i` in an index built from the same input order. There is
/// no mutation path after construction.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FragmentStore {
    fragments: Vec<Fragment>,
}

impl FragmentStore {
    /// Build a store from (text, source) pairs in index order
    #[must_use]
    pub fn from_pairs(pairs: Vec<(String, String)>) -> Self {
        let fragments = pairs
            .into_iter()
            .enumerate()
            .map(|(id, (text, source))| Fragment { id, text, source })
            .collect();

        Self { fragments }
    }

    #[inline]
    #[must_use]
    pub fn get(&self, id: usize) -> Option<&Fragment> {
        self.fragments.get(id)
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.fragments.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fragments.is_empty()
    }

    /// Fragments in id order
    pub fn iter(&self) -> impl Iterator<Item = &Fragment> {
        self.fragments.iter()
    }

    /// Distinct source labels in first-seen order
    #[must_use]
    pub fn sources(&self) -> Vec<String> {
        let mut sources: Vec<String> = Vec::new();
        for fragment in &self.fragments {
            if !sources.contains(&fragment.source) {
                sources.push(fragment.source.clone());
            }
        }
        sources
    }
}

/// A fragment returned by retrieval, with its distance to the query.
///
/// Created fresh per query and never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetrievedFragment {
    pub fragment: Fragment,
    /// Squared Euclidean distance between the query and fragment embeddings
    pub distance: f32,
    /// Raw retrieval score; mirrors `distance` when attached
    pub score: Option<f32>,
}
