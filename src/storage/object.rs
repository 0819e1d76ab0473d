use std::sync::Arc;

use crate::foundation::config::StorageConfig;
use crate::foundation::error::DeckResult;
use crate::storage::local::LocalObjectStore;
use crate::storage::s3::S3ObjectStore;

/// Content type of every uploaded card.
pub const PNG_CONTENT_TYPE: &str = "image/png";

/// Blob storage receiving composed cards.
#[async_trait::async_trait]
pub trait ObjectStore: Send + Sync {
    /// Store `bytes` at `path` with public read access and return its public URL.
    async fn put_public(
        &self,
        path: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> anyhow::Result<String>;

    /// Remove everything stored under `prefix`. Missing objects are not an error.
    async fn delete_prefix(&self, prefix: &str) -> anyhow::Result<()>;
}

/// Storage path of a card image: `decks/<deck_id>/<card_id>.png`.
pub fn card_object_path(deck_id: u64, card_id: &str) -> String {
    format!("{}{card_id}.png", deck_object_prefix(deck_id))
}

/// Prefix holding every card image of a deck.
pub fn deck_object_prefix(deck_id: u64) -> String {
    format!("decks/{deck_id}/")
}

/// Normalize an object key to `/`-separated relative segments.
///
/// Rejects absolute keys and parent traversals (`..`).
pub fn normalize_object_key(key: &str) -> anyhow::Result<String> {
    let s = key.replace('\\', "/");
    if s.starts_with('/') {
        anyhow::bail!("object key '{key}' must be relative");
    }

    let mut out = Vec::<&str>::new();
    for part in s.split('/') {
        if part.is_empty() || part == "." {
            continue;
        }
        if part == ".." {
            anyhow::bail!("object key '{key}' must not contain '..'");
        }
        out.push(part);
    }

    if out.is_empty() {
        anyhow::bail!("object key must contain a file name");
    }
    Ok(out.join("/"))
}

/// Join a public base URL and an object key.
pub(crate) fn public_url(base: &str, key: &str) -> String {
    format!("{}/{}", base.trim_end_matches('/'), key.trim_start_matches('/'))
}

/// Build the configured store.
pub async fn connect_object_store(config: &StorageConfig) -> DeckResult<Arc<dyn ObjectStore>> {
    match config {
        StorageConfig::Local { root, public_base } => Ok(Arc::new(LocalObjectStore::new(
            root.clone(),
            public_base.clone(),
        ))),
        StorageConfig::S3 {
            bucket,
            region,
            endpoint,
            public_base,
        } => Ok(Arc::new(
            S3ObjectStore::connect(
                bucket,
                region.as_deref(),
                endpoint.as_deref(),
                public_base,
            )
            .await,
        )),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/storage/object.rs"]
mod tests;
