//! Local filesystem photo storage
//!
//! Objects are written below a root directory and served back under
//! `/photos/` by the HTTP layer.

use std::path::{Component, Path, PathBuf};

use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use tracing::debug;

use crate::application::ports::outbound::PhotoStoragePort;

/// URL prefix photos are served under
pub const PHOTO_ROUTE: &str = "/photos";

pub struct LocalPhotoStorage {
    root: PathBuf,
    public_base_url: String,
}

impl LocalPhotoStorage {
    pub fn new(root: impl Into<PathBuf>, public_base_url: &str) -> Self {
        Self {
            root: root.into(),
            public_base_url: public_base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolve a key below the root, refusing anything that escapes it
    fn path_for(&self, key: &str) -> Result<PathBuf> {
        let relative = Path::new(key);
        let safe = relative
            .components()
            .all(|c| matches!(c, Component::Normal(_)));
        if key.is_empty() || !safe {
            bail!("Invalid storage key: {}", key);
        }
        Ok(self.root.join(relative))
    }

    fn url_for(&self, key: &str) -> String {
        format!("{}{}/{}", self.public_base_url, PHOTO_ROUTE, key)
    }

    /// The key a public URL was issued for, if it is one of ours
    fn key_for<'a>(&self, url: &'a str) -> Option<&'a str> {
        url.strip_prefix(&self.public_base_url)?
            .strip_prefix(PHOTO_ROUTE)?
            .strip_prefix('/')
    }
}

#[async_trait]
impl PhotoStoragePort for LocalPhotoStorage {
    async fn upload(&self, key: &str, bytes: &[u8], content_type: &str) -> Result<String> {
        let path = self.path_for(key)?;
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .with_context(|| format!("Failed to create photo directory {}", parent.display()))?;
        }
        tokio::fs::write(&path, bytes)
            .await
            .with_context(|| format!("Failed to write photo {}", path.display()))?;

        debug!(key, content_type, size = bytes.len(), "Stored photo");
        Ok(self.url_for(key))
    }

    async fn remove(&self, url: &str) -> Result<()> {
        let Some(key) = self.key_for(url) else {
            debug!("Ignoring removal of foreign photo URL {}", url);
            return Ok(());
        };
        let path = self.path_for(key)?;
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e).with_context(|| format!("Failed to remove photo {}", path.display())),
        }
    }
}
