use std::path::{Path, PathBuf};

use anyhow::Context as _;

use crate::storage::object::{ObjectStore, normalize_object_key, public_url};

/// Object store backed by a local directory.
#[derive(Clone, Debug)]
pub struct LocalObjectStore {
    root: PathBuf,
    public_base: String,
}

impl LocalObjectStore {
    /// Store writing below `root`. URLs default to `file://<absolute root>`.
    pub fn new(root: impl Into<PathBuf>, public_base: Option<String>) -> Self {
        let root = root.into();
        let public_base = public_base.unwrap_or_else(|| {
            let abs = std::path::absolute(&root).unwrap_or_else(|_| root.clone());
            format!("file://{}", abs.display())
        });
        Self { root, public_base }
    }

    /// Directory receiving uploads.
    pub fn root(&self) -> &Path {
        &self.root
    }
}

#[async_trait::async_trait]
impl ObjectStore for LocalObjectStore {
    async fn put_public(
        &self,
        path: &str,
        bytes: Vec<u8>,
        _content_type: &str,
    ) -> anyhow::Result<String> {
        let key = normalize_object_key(path)?;
        let dest = self.root.join(&key);
        if let Some(parent) = dest.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .with_context(|| format!("create upload dir '{}'", parent.display()))?;
        }
        tokio::fs::write(&dest, bytes)
            .await
            .with_context(|| format!("write object '{}'", dest.display()))?;
        Ok(public_url(&self.public_base, &key))
    }

    async fn delete_prefix(&self, prefix: &str) -> anyhow::Result<()> {
        let key = normalize_object_key(prefix)?;
        let dir = self.root.join(&key);
        match tokio::fs::remove_dir_all(&dir).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e).with_context(|| format!("remove '{}'", dir.display())),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/storage/local.rs"]
mod tests;
