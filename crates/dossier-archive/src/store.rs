//! Attachment storage and the upload flow.
//!
//! Blobs are opaque: the store never inspects content and never deduplicates.
//! Repeated uploads of identical filename/content under the same folder
//! create distinct blobs with distinct handles, by design.

use std::sync::Arc;

use chrono::Utc;
use dossier_core::{Attachment, BlobId, FolderId, Result};
use tracing::{debug, info};

use crate::backend::{BlobBackend, FolderBackend};
use crate::resolver::FolderResolver;

/// Opaque upload/download of binary blobs under resolved folder handles.
#[derive(Clone)]
pub struct AttachmentStore {
    blobs: Arc<dyn BlobBackend>,
}

impl AttachmentStore {
    pub fn new(blobs: Arc<dyn BlobBackend>) -> Self {
        Self { blobs }
    }

    /// Store `data` as `filename` under `folder`, returning a stable handle.
    pub async fn put(&self, folder: &FolderId, filename: &str, data: &[u8]) -> Result<BlobId> {
        let id = self.blobs.put(folder, filename, data).await?;
        debug!(
            filename,
            blob_id = %id,
            size_bytes = data.len(),
            "attachment_store: blob stored"
        );
        Ok(id)
    }

    /// Fetch blob content by handle. `Error::NotFound` for unknown handles;
    /// callers in the render path treat that as a per-attachment condition.
    pub async fn get(&self, id: &BlobId) -> Result<Vec<u8>> {
        self.blobs.get(id).await
    }
}

/// The upload flow: resolve the task's folder chain, store the blob, and
/// produce the attachment record for the external record store to append.
pub struct ArchiveService {
    resolver: FolderResolver,
    store: AttachmentStore,
}

impl ArchiveService {
    pub fn new(
        folders: Arc<dyn FolderBackend>,
        blobs: Arc<dyn BlobBackend>,
        root: FolderId,
    ) -> Self {
        Self {
            resolver: FolderResolver::new(folders, root),
            store: AttachmentStore::new(blobs),
        }
    }

    pub fn resolver(&self) -> &FolderResolver {
        &self.resolver
    }

    pub fn store(&self) -> &AttachmentStore {
        &self.store
    }

    /// Upload one attachment for a task.
    ///
    /// Folder resolution or backend failures abort the upload; nothing is
    /// rolled back on the backend (already-created folders remain).
    pub async fn upload_attachment(
        &self,
        project: &str,
        task_code: &str,
        task_title: &str,
        filename: &str,
        data: &[u8],
    ) -> Result<Attachment> {
        let folder = self
            .resolver
            .resolve_task_path(project, task_code, task_title)
            .await?;
        let blob_id = self.store.put(&folder, filename, data).await?;
        let folder_path = FolderResolver::folder_path(project, task_code, task_title);

        info!(
            project,
            task_code,
            filename,
            blob_id = %blob_id,
            folder_path = %folder_path,
            "archive: attachment uploaded"
        );

        Ok(Attachment {
            filename: filename.to_string(),
            blob_id,
            folder_path,
            uploaded_at: Utc::now(),
        })
    }
}
