//! Knowledge-base artifacts on disk.
//!
//! A build writes two files into the data directory: `vectors.bin`, the
//! bincode-encoded embedding rows, and `fragments.json`, a manifest tying
//! the fragments to those rows with enough metadata to reject artifacts
//! that do not belong together: format version, vector checksum, embedder
//! name and dimension. Loading validates all of it and either returns a
//! fully consistent index/store pair or nothing.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use lorekeeper_core::{Error as CoreError, FragmentStore, VectorIndex};

use crate::error::{Error, Result};

pub const VECTORS_FILE: &str = "vectors.bin";
pub const MANIFEST_FILE: &str = "fragments.json";

/// Bumped whenever the artifact layout changes incompatibly.
pub const MANIFEST_VERSION: u32 = 1;

/// On-disk form of the vector index
#[derive(Debug, Serialize, Deserialize)]
struct VectorArtifact {
    dim: usize,
    vectors: Vec<Vec<f32>>,
}

/// One stored fragment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FragmentEntry {
    pub text: String,
    pub source: String,
}

/// Metadata tying the fragment list to the vector artifact
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Manifest {
    pub version: u32,
    pub created_at: u64,
    pub embedder: String,
    pub dim: usize,
    /// Hex SHA-256 of the vectors file
    pub checksum: String,
    pub fragments: Vec<FragmentEntry>,
}

/// A validated knowledge base read back from disk
pub struct LoadedKnowledge {
    pub index: VectorIndex,
    pub store: FragmentStore,
    pub embedder: String,
    pub dim: usize,
    pub created_at: u64,
}

impl LoadedKnowledge {
    /// Fail unless the artifacts were built by the named embedder.
    ///
    /// Vectors from different embedders are not comparable even when the
    /// dimensions happen to agree.
    pub fn verify_embedder(&self, name: &str) -> Result<()> {
        if self.embedder != name {
            return Err(Error::EmbedderMismatch {
                stored: self.embedder.clone(),
                requested: name.to_string(),
            });
        }
        Ok(())
    }
}

/// Reads and writes the artifact pair under one data directory.
pub struct KnowledgeStore {
    data_dir: PathBuf,
}

impl KnowledgeStore {
    /// Open a store rooted at `data_dir`, creating the directory if needed.
    pub fn new<P: AsRef<Path>>(data_dir: P) -> Result<Self> {
        let data_dir = data_dir.as_ref().to_path_buf();
        fs::create_dir_all(&data_dir)?;
        Ok(Self { data_dir })
    }

    fn vectors_path(&self) -> PathBuf {
        self.data_dir.join(VECTORS_FILE)
    }

    fn manifest_path(&self) -> PathBuf {
        self.data_dir.join(MANIFEST_FILE)
    }

    /// True when both artifact files are present.
    #[must_use]
    pub fn exists(&self) -> bool {
        self.vectors_path().exists() && self.manifest_path().exists()
    }

    /// Write both artifacts atomically and return the manifest.
    ///
    /// Each file goes through a temp-then-rename in the same directory, so
    /// a crash mid-save never leaves a half-written artifact behind.
    pub fn save(
        &self,
        index: &VectorIndex,
        store: &FragmentStore,
        embedder_name: &str,
    ) -> Result<Manifest> {
        let artifact = VectorArtifact {
            dim: index.dim(),
            vectors: (0..index.len())
                .filter_map(|i| index.vector(i).map(|row| row.to_vec()))
                .collect(),
        };
        let payload = bincode::serialize(&artifact).map_err(|e| Error::Encode(e.to_string()))?;
        let checksum = format!("{:x}", Sha256::digest(&payload));
        write_atomic(&self.vectors_path(), &payload)?;

        let manifest = Manifest {
            version: MANIFEST_VERSION,
            created_at: unix_now(),
            embedder: embedder_name.to_string(),
            dim: index.dim(),
            checksum,
            fragments: store
                .iter()
                .map(|f| FragmentEntry {
                    text: f.text.clone(),
                    source: f.source.clone(),
                })
                .collect(),
        };
        let encoded = serde_json::to_vec(&manifest).map_err(|e| Error::Encode(e.to_string()))?;
        write_atomic(&self.manifest_path(), &encoded)?;

        Ok(manifest)
    }

    /// Read, verify and rebuild the knowledge base.
    ///
    /// Checks run in order: manifest version, vector checksum, row decode,
    /// index rebuild, dimension agreement (skipped for an empty index, whose
    /// dimension is undefined), fragment/vector count agreement. Any failure
    /// is returned as the matching error kind and nothing is kept.
    pub fn load(&self) -> Result<LoadedKnowledge> {
        let manifest_bytes = fs::read(self.manifest_path())?;
        let manifest: Manifest =
            serde_json::from_slice(&manifest_bytes).map_err(|e| Error::Decode(e.to_string()))?;

        if manifest.version != MANIFEST_VERSION {
            return Err(Error::VersionMismatch {
                expected: MANIFEST_VERSION,
                found: manifest.version,
            });
        }

        let payload = fs::read(self.vectors_path())?;
        let checksum = format!("{:x}", Sha256::digest(&payload));
        if checksum != manifest.checksum {
            return Err(Error::ChecksumMismatch(VECTORS_FILE.to_string()));
        }

        let artifact: VectorArtifact =
            bincode::deserialize(&payload).map_err(|e| Error::Decode(e.to_string()))?;
        let index = VectorIndex::build(&artifact.vectors)?;

        if !index.is_empty() && index.dim() != manifest.dim {
            return Err(CoreError::DimensionMismatch {
                expected: manifest.dim,
                actual: index.dim(),
            }
            .into());
        }
        if manifest.fragments.len() != index.len() {
            let first_unresolvable = manifest.fragments.len().min(index.len());
            return Err(CoreError::FragmentNotFound(first_unresolvable).into());
        }

        let store = FragmentStore::from_pairs(
            manifest
                .fragments
                .into_iter()
                .map(|f| (f.text, f.source))
                .collect(),
        );

        Ok(LoadedKnowledge {
            index,
            store,
            embedder: manifest.embedder,
            dim: manifest.dim,
            created_at: manifest.created_at,
        })
    }
}

fn write_atomic(path: &Path, data: &[u8]) -> Result<()> {
    let temp = path.with_extension("tmp");
    fs::write(&temp, data)?;
    fs::rename(&temp, path)?;
    Ok(())
}

fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |d| d.as_secs())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_knowledge() -> (VectorIndex, FragmentStore) {
        let index = VectorIndex::build(&[vec![1.0, 0.0, 0.0], vec![0.0, 1.0, 0.0]]).unwrap();
        let store = FragmentStore::from_pairs(vec![
            ("Elara rules the north.".to_string(), "npcs.txt".to_string()),
            ("Dragons nest in the peaks.".to_string(), "monsters.txt".to_string()),
        ]);
        (index, store)
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let knowledge_store = KnowledgeStore::new(dir.path()).unwrap();
        let (index, store) = create_test_knowledge();

        assert!(!knowledge_store.exists());
        let manifest = knowledge_store.save(&index, &store, "hash-trigram").unwrap();
        assert!(knowledge_store.exists());
        assert_eq!(manifest.version, MANIFEST_VERSION);
        assert_eq!(manifest.dim, 3);
        assert_eq!(manifest.fragments.len(), 2);

        let loaded = knowledge_store.load().unwrap();
        assert_eq!(loaded.index, index);
        assert_eq!(loaded.store, store);
        assert_eq!(loaded.embedder, "hash-trigram");
        assert_eq!(loaded.dim, 3);

        assert!(loaded.verify_embedder("hash-trigram").is_ok());
        assert!(matches!(
            loaded.verify_embedder("other-model"),
            Err(Error::EmbedderMismatch { .. })
        ));
    }

    #[test]
    fn test_save_overwrites_previous_artifacts() {
        let dir = tempfile::tempdir().unwrap();
        let knowledge_store = KnowledgeStore::new(dir.path()).unwrap();
        let (index, store) = create_test_knowledge();
        knowledge_store.save(&index, &store, "hash-trigram").unwrap();

        let smaller = VectorIndex::build(&[vec![0.5, 0.5]]).unwrap();
        let smaller_store = FragmentStore::from_pairs(vec![(
            "One fragment only.".to_string(),
            "notes.txt".to_string(),
        )]);
        knowledge_store.save(&smaller, &smaller_store, "hash-trigram").unwrap();

        let loaded = knowledge_store.load().unwrap();
        assert_eq!(loaded.index.len(), 1);
        assert_eq!(loaded.dim, 2);
    }

    #[test]
    fn test_load_rejects_corrupted_vectors() {
        let dir = tempfile::tempdir().unwrap();
        let knowledge_store = KnowledgeStore::new(dir.path()).unwrap();
        let (index, store) = create_test_knowledge();
        knowledge_store.save(&index, &store, "hash-trigram").unwrap();

        let vectors_path = dir.path().join(VECTORS_FILE);
        let mut bytes = fs::read(&vectors_path).unwrap();
        bytes.push(0xFF);
        fs::write(&vectors_path, &bytes).unwrap();

        assert!(matches!(
            knowledge_store.load(),
            Err(Error::ChecksumMismatch(_))
        ));
    }

    #[test]
    fn test_load_rejects_unknown_manifest_version() {
        let dir = tempfile::tempdir().unwrap();
        let knowledge_store = KnowledgeStore::new(dir.path()).unwrap();
        let (index, store) = create_test_knowledge();
        knowledge_store.save(&index, &store, "hash-trigram").unwrap();

        let manifest_path = dir.path().join(MANIFEST_FILE);
        let mut value: serde_json::Value =
            serde_json::from_slice(&fs::read(&manifest_path).unwrap()).unwrap();
        value["version"] = serde_json::json!(99);
        fs::write(&manifest_path, serde_json::to_vec(&value).unwrap()).unwrap();

        assert!(matches!(
            knowledge_store.load(),
            Err(Error::VersionMismatch {
                expected: MANIFEST_VERSION,
                found: 99
            })
        ));
    }

    #[test]
    fn test_load_rejects_fragment_count_mismatch() {
        let dir = tempfile::tempdir().unwrap();
        let knowledge_store = KnowledgeStore::new(dir.path()).unwrap();
        let (index, store) = create_test_knowledge();
        knowledge_store.save(&index, &store, "hash-trigram").unwrap();

        let manifest_path = dir.path().join(MANIFEST_FILE);
        let mut value: serde_json::Value =
            serde_json::from_slice(&fs::read(&manifest_path).unwrap()).unwrap();
        let dropped = value["fragments"].as_array_mut().unwrap().pop();
        assert!(dropped.is_some());
        fs::write(&manifest_path, serde_json::to_vec(&value).unwrap()).unwrap();

        assert!(matches!(
            knowledge_store.load(),
            Err(Error::Core(CoreError::FragmentNotFound(1)))
        ));
    }

    #[test]
    fn test_load_missing_artifacts_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let knowledge_store = KnowledgeStore::new(dir.path()).unwrap();

        assert!(!knowledge_store.exists());
        assert!(matches!(knowledge_store.load(), Err(Error::Io(_))));
    }

    #[test]
    fn test_empty_knowledge_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let knowledge_store = KnowledgeStore::new(dir.path()).unwrap();
        let index = VectorIndex::default();
        let store = FragmentStore::from_pairs(Vec::new());

        knowledge_store.save(&index, &store, "hash-trigram").unwrap();
        let loaded = knowledge_store.load().unwrap();

        assert!(loaded.index.is_empty());
        assert!(loaded.store.is_empty());
        assert_eq!(loaded.dim, 0);
    }
}
