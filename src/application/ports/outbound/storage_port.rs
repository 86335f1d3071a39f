//! Photo storage port - Binary object storage for character photos

use anyhow::Result;
use async_trait::async_trait;

/// Stores uploaded images and hands back publicly resolvable URLs
#[async_trait]
pub trait PhotoStoragePort: Send + Sync {
    /// Store `bytes` under `key` and return the public URL
    async fn upload(&self, key: &str, bytes: &[u8], content_type: &str) -> Result<String>;

    /// Remove a previously uploaded object by its public URL.
    ///
    /// Removing something that no longer exists is not an error.
    async fn remove(&self, url: &str) -> Result<()>;
}
