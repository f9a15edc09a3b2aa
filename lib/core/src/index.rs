use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::vector;

/// Flat nearest-neighbor index over fixed-dimension vectors.
///
/// Vectors are stored contiguously in row-major order and every query scans
/// all of them, so results are exact. The index is write-once: `build`
/// consumes the full vector set and there is no update or delete path, which
/// is what makes concurrent reads safe without locking.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VectorIndex {
    dim: usize,
    data: Vec<f32>,
}

impl VectorIndex {
    /// Build an index from a set of vectors in id order.
    ///
    /// The first vector fixes the dimension; any later vector with a
    /// different length fails with [`Error::DimensionMismatch`]. An empty
    /// input produces an empty index with dimension 0.
    pub fn build(vectors: &[Vec<f32>]) -> Result<Self> {
        let dim = vectors.first().map_or(0, Vec::len);
        let mut data = Vec::with_capacity(dim * vectors.len());

        for v in vectors {
            if v.len() != dim {
                return Err(Error::DimensionMismatch {
                    expected: dim,
                    actual: v.len(),
                });
            }
            data.extend_from_slice(v);
        }

        Ok(Self { dim, data })
    }

    #[inline]
    #[must_use]
    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Number of stored vectors
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        if self.dim == 0 {
            0
        } else {
            self.data.len() / self.dim
        }
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// The stored vector at `id`, if any
    #[inline]
    #[must_use]
    pub fn vector(&self, id: usize) -> Option<&[f32]> {
        if id < self.len() {
            Some(&self.data[id * self.dim..(id + 1) * self.dim])
        } else {
            None
        }
    }

    /// Find the `k` stored vectors nearest to `query`.
    ///
    /// Returns up to `min(k, len)` pairs of (vector id, squared Euclidean
    /// distance) in ascending distance order; equal distances keep the lower
    /// id first. An empty index yields an empty result for any `k`; on a
    /// non-empty index a query of the wrong dimension fails with
    /// [`Error::DimensionMismatch`].
    pub fn search(&self, query: &[f32], k: usize) -> Result<Vec<(usize, f32)>> {
        if self.is_empty() {
            return Ok(Vec::new());
        }

        if query.len() != self.dim {
            return Err(Error::DimensionMismatch {
                expected: self.dim,
                actual: query.len(),
            });
        }

        let mut results: Vec<(usize, f32)> = self
            .data
            .chunks_exact(self.dim)
            .map(|row| vector::squared_euclidean(query, row))
            .enumerate()
            .collect();

        // Stable sort keeps the lower id first on equal distances
        results.sort_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal));
        results.truncate(k);
        Ok(results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_index() -> VectorIndex {
        VectorIndex::build(&[
            vec![0.0, 0.0],
            vec![1.0, 0.0],
            vec![0.0, 2.0],
            vec![3.0, 0.0],
        ])
        .unwrap()
    }

    #[test]
    fn test_search_orders_by_distance() {
        let index = create_test_index();
        let results = index.search(&[0.0, 0.0], 4).unwrap();

        let ids: Vec<usize> = results.iter().map(|r| r.0).collect();
        assert_eq!(ids, vec![0, 1, 2, 3]);

        for pair in results.windows(2) {
            assert!(pair[0].1 <= pair[1].1);
        }
    }

    #[test]
    fn test_search_exact_match_has_zero_distance() {
        let index = create_test_index();
        let results = index.search(&[0.0, 2.0], 1).unwrap();

        assert_eq!(results.len(), 1);
        assert_eq!(results[0].0, 2);
        assert!(results[0].1.abs() < 1e-6);
    }

    #[test]
    fn test_search_ties_prefer_lower_id() {
        let index =
            VectorIndex::build(&[vec![1.0, 0.0], vec![1.0, 0.0], vec![1.0, 0.0]]).unwrap();
        let results = index.search(&[0.0, 0.0], 3).unwrap();

        let ids: Vec<usize> = results.iter().map(|r| r.0).collect();
        assert_eq!(ids, vec![0, 1, 2]);
    }

    #[test]
    fn test_search_caps_at_stored_count() {
        let index = create_test_index();
        assert_eq!(index.search(&[0.0, 0.0], 100).unwrap().len(), 4);
        assert!(index.search(&[0.0, 0.0], 0).unwrap().is_empty());
    }

    #[test]
    fn test_search_empty_index() {
        let index = VectorIndex::build(&[]).unwrap();
        assert!(index.search(&[1.0, 2.0], 5).unwrap().is_empty());
        assert!(index.search(&[], 5).unwrap().is_empty());
    }

    #[test]
    fn test_build_rejects_mixed_dimensions() {
        let err = VectorIndex::build(&[vec![1.0, 2.0], vec![1.0]]).unwrap_err();
        assert!(matches!(
            err,
            Error::DimensionMismatch {
                expected: 2,
                actual: 1
            }
        ));
    }

    #[test]
    fn test_search_rejects_wrong_query_dimension() {
        let index = create_test_index();
        let err = index.search(&[1.0, 2.0, 3.0], 1).unwrap_err();
        assert!(matches!(
            err,
            Error::DimensionMismatch {
                expected: 2,
                actual: 3
            }
        ));
    }

    #[test]
    fn test_vector_accessor() {
        let index = create_test_index();
        assert_eq!(index.vector(2), Some(&[0.0, 2.0][..]));
        assert_eq!(index.vector(4), None);
        assert_eq!(index.len(), 4);
    }
}
