use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Encoding error: {0}")]
    Encode(String),

    #[error("Decoding error: {0}")]
    Decode(String),

    #[error("Checksum mismatch for {0}")]
    ChecksumMismatch(String),

    #[error("Unsupported manifest version: expected {expected}, got {found}")]
    VersionMismatch { expected: u32, found: u32 },

    #[error("Knowledge base was built with embedder '{stored}', not '{requested}'")]
    EmbedderMismatch { stored: String, requested: String },

    #[error("Invalid artifact: {0}")]
    Core(#[from] lorekeeper_core::Error),
}
