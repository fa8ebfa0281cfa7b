// SPDX-License-Identifier: MIT

//! Blob-storage collaborator interface.
//!
//! Media transcoding and upload live outside the core; activity items
//! only carry download URLs. The one touchpoint the core needs is
//! cleanup: deleting an item makes a best-effort attempt to delete its
//! media references through this trait.

use crate::error::Result;
use async_trait::async_trait;

/// External blob-storage collaborator.
#[async_trait]
pub trait MediaStorage: Send + Sync {
    /// Upload bytes to a storage path, returning the storage reference.
    async fn upload(&self, path: &str, bytes: Vec<u8>) -> Result<String>;

    /// Resolve a storage reference to a download URL.
    async fn download_url(&self, reference: &str) -> Result<String>;

    /// Delete a blob by reference.
    async fn delete(&self, reference: &str) -> Result<()>;
}

/// No-op media storage for tests and media-less deployments.
#[derive(Debug, Clone, Default)]
pub struct NoopMediaStorage;

#[async_trait]
impl MediaStorage for NoopMediaStorage {
    async fn upload(&self, path: &str, _bytes: Vec<u8>) -> Result<String> {
        Ok(path.to_string())
    }

    async fn download_url(&self, reference: &str) -> Result<String> {
        Ok(reference.to_string())
    }

    async fn delete(&self, _reference: &str) -> Result<()> {
        Ok(())
    }
}
