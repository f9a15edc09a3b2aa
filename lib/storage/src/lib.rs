pub mod artifacts;
pub mod error;

pub use artifacts::{
    FragmentEntry, KnowledgeStore, LoadedKnowledge, Manifest, MANIFEST_FILE, MANIFEST_VERSION,
    VECTORS_FILE,
};
pub use error::{Error, Result};
