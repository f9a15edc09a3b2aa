//! Answer generation behind a swappable trait.
//!
//! The assistant treats generation as an unreliable external dependency:
//! any error from `generate` is caught and replaced with a deterministic
//! fallback, and an assistant with no generator at all composes extractive
//! answers from the retrieved fragments instead.

use lorekeeper_core::Result;

/// Produces a text continuation for a prompt.
pub trait Generator: Send + Sync {
    /// Generate a continuation. Errors are reported as
    /// [`Error::Generation`](lorekeeper_core::Error::Generation) and never
    /// propagate past the assistant.
    fn generate(&self, prompt: &str) -> Result<String>;
}
