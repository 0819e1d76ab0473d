//! Per-card artwork: generated images with a solid-color fallback.

/// Google generative-language image backend.
pub mod gemini;
pub mod palette;
pub mod resolver;
