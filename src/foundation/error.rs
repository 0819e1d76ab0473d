/// Convenience result type used across deckforge.
pub type DeckResult<T> = Result<T, DeckError>;

/// Top-level error taxonomy surfaced to callers of the generation pipeline.
///
/// Art generation failures never appear here: the resolver always downgrades them to the
/// solid-color placeholder.
#[derive(thiserror::Error, Debug)]
pub enum DeckError {
    /// Malformed manifest JSON or an unrecognized manifest shape.
    #[error("invalid manifest: {0}")]
    InvalidManifest(String),

    /// Template image or font file unavailable when loading card assets.
    #[error("asset missing: {0}")]
    AssetMissing(String),

    /// A composed card could not be persisted to object storage.
    #[error("upload failed: {0}")]
    Upload(String),

    /// Overlay rasterization or image encoding failed.
    #[error("render error: {0}")]
    Render(String),

    /// Unknown deck, or a deck not owned by the caller.
    #[error("not found: {0}")]
    NotFound(String),

    /// Invalid configuration value.
    #[error("config error: {0}")]
    Config(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl DeckError {
    /// Build a [`DeckError::InvalidManifest`] value.
    pub fn invalid_manifest(msg: impl Into<String>) -> Self {
        Self::InvalidManifest(msg.into())
    }

    /// Build a [`DeckError::AssetMissing`] value.
    pub fn asset_missing(msg: impl Into<String>) -> Self {
        Self::AssetMissing(msg.into())
    }

    /// Build a [`DeckError::Upload`] value.
    pub fn upload(msg: impl Into<String>) -> Self {
        Self::Upload(msg.into())
    }

    /// Build a [`DeckError::Render`] value.
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    /// Build a [`DeckError::NotFound`] value.
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    /// Build a [`DeckError::Config`] value.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
