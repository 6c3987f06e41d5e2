//! Drive backend traits and the in-memory reference implementation.
//!
//! The remote drive exposes two narrow surfaces: a folder namespace
//! (list-by-query, create) and a blob store (put/get/delete plus the office
//! conversion round-trip operations). Both are modeled as async trait objects
//! so production code can target a hosted drive API while tests run against
//! [`MemoryDrive`].

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use dossier_core::{BlobId, Error, FolderEntry, FolderId, Result};
use tracing::debug;
use uuid::Uuid;

/// Folder name matching mode for a backend listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NameQuery {
    /// Name must match exactly.
    Exact(String),
    /// Name must match exactly OR start with `name + " "`. The trailing
    /// space is mandatory: it prevents code `"2.1"` from matching a folder
    /// named `"2.10 ..."`.
    Prefix(String),
}

impl NameQuery {
    pub fn matches(&self, candidate: &str) -> bool {
        match self {
            NameQuery::Exact(n) => candidate == n,
            NameQuery::Prefix(n) => {
                candidate == n || candidate.starts_with(&format!("{} ", n))
            }
        }
    }
}

/// Intermediate editable format an office blob is imported into during the
/// conversion round trip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConvertibleKind {
    Document,
    Spreadsheet,
    Presentation,
}

impl ConvertibleKind {
    /// Map an office file extension (lowercased, no dot) to its intermediate
    /// format. Returns `None` for anything that is not an office document.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext {
            "doc" | "docx" => Some(ConvertibleKind::Document),
            "xls" | "xlsx" => Some(ConvertibleKind::Spreadsheet),
            "ppt" | "pptx" => Some(ConvertibleKind::Presentation),
            _ => None,
        }
    }
}

/// Folder namespace operations.
#[async_trait]
pub trait FolderBackend: Send + Sync {
    /// List folders under `parent` whose names satisfy `query`.
    async fn list(&self, parent: &FolderId, query: &NameQuery) -> Result<Vec<FolderEntry>>;

    /// Create a folder named `name` under `parent`.
    async fn create(&self, parent: &FolderId, name: &str) -> Result<FolderId>;
}

/// Blob storage and conversion operations.
#[async_trait]
pub trait BlobBackend: Send + Sync {
    /// Store `data` as `filename` under `folder`. Repeated puts of identical
    /// content create distinct blobs; there is no deduplication.
    async fn put(&self, folder: &FolderId, filename: &str, data: &[u8]) -> Result<BlobId>;

    /// Fetch blob content. `Error::NotFound` for unknown or deleted handles.
    async fn get(&self, id: &BlobId) -> Result<Vec<u8>>;

    /// Copy a blob into the backend's intermediate editable format, returning
    /// the handle of the temporary copy. The caller owns cleanup.
    async fn copy_as_convertible(
        &self,
        id: &BlobId,
        temp_name: &str,
        kind: ConvertibleKind,
    ) -> Result<BlobId>;

    /// Export a convertible blob as PDF bytes.
    async fn export_pdf(&self, id: &BlobId) -> Result<Vec<u8>>;

    /// Delete a blob. Deleting an unknown handle is an error.
    async fn delete(&self, id: &BlobId) -> Result<()>;
}

#[derive(Debug, Clone)]
struct StoredFolder {
    parent: FolderId,
    name: String,
}

#[derive(Debug, Clone)]
struct StoredBlob {
    #[allow(dead_code)]
    name: String,
    data: Vec<u8>,
    convertible: Option<ConvertibleKind>,
}

#[derive(Default)]
struct DriveState {
    folders: HashMap<FolderId, StoredFolder>,
    blobs: HashMap<BlobId, StoredBlob>,
}

/// In-memory drive implementing both backend traits.
///
/// Used by tests and local development. Counts `list` and `delete` calls so
/// cache-hit and cleanup properties can be asserted, and serves a
/// caller-seeded PDF fixture from `export_pdf` so office conversion flows are
/// exercisable offline.
pub struct MemoryDrive {
    root: FolderId,
    state: Mutex<DriveState>,
    list_calls: AtomicUsize,
    delete_calls: AtomicUsize,
    export_fixture: Mutex<Option<Vec<u8>>>,
    fail_exports: std::sync::atomic::AtomicBool,
}

impl MemoryDrive {
    pub fn new() -> Self {
        Self {
            root: FolderId::from("root"),
            state: Mutex::new(DriveState::default()),
            list_calls: AtomicUsize::new(0),
            delete_calls: AtomicUsize::new(0),
            export_fixture: Mutex::new(None),
            fail_exports: std::sync::atomic::AtomicBool::new(false),
        }
    }

    /// Handle of the drive root folder.
    pub fn root(&self) -> FolderId {
        self.root.clone()
    }

    /// Number of `list` calls issued so far.
    pub fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }

    /// Number of `delete` calls issued so far.
    pub fn delete_calls(&self) -> usize {
        self.delete_calls.load(Ordering::SeqCst)
    }

    /// Seed the PDF bytes returned by `export_pdf`.
    pub fn set_export_fixture(&self, pdf: Vec<u8>) {
        *self.export_fixture.lock().unwrap() = Some(pdf);
    }

    /// Make every subsequent `export_pdf` fail, for cleanup-path tests.
    pub fn fail_exports(&self, fail: bool) {
        self.fail_exports.store(fail, Ordering::SeqCst);
    }

    /// Whether a blob handle currently exists.
    pub fn blob_exists(&self, id: &BlobId) -> bool {
        self.state.lock().unwrap().blobs.contains_key(id)
    }

    /// Resolved name chain of a folder, for path assertions in tests.
    pub fn folder_name_chain(&self, id: &FolderId) -> Vec<String> {
        let state = self.state.lock().unwrap();
        let mut chain = Vec::new();
        let mut cursor = id.clone();
        while let Some(folder) = state.folders.get(&cursor) {
            chain.push(folder.name.clone());
            cursor = folder.parent.clone();
        }
        chain.reverse();
        chain
    }
}

impl Default for MemoryDrive {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl FolderBackend for MemoryDrive {
    async fn list(&self, parent: &FolderId, query: &NameQuery) -> Result<Vec<FolderEntry>> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        let state = self.state.lock().unwrap();
        let entries = state
            .folders
            .iter()
            .filter(|(_, f)| &f.parent == parent && query.matches(&f.name))
            .map(|(id, f)| FolderEntry {
                id: id.clone(),
                name: f.name.clone(),
            })
            .collect();
        Ok(entries)
    }

    async fn create(&self, parent: &FolderId, name: &str) -> Result<FolderId> {
        let id = FolderId(Uuid::new_v4().to_string());
        let mut state = self.state.lock().unwrap();
        state.folders.insert(
            id.clone(),
            StoredFolder {
                parent: parent.clone(),
                name: name.to_string(),
            },
        );
        debug!(folder_id = %id, name, "memory_drive: folder created");
        Ok(id)
    }
}

#[async_trait]
impl BlobBackend for MemoryDrive {
    async fn put(&self, _folder: &FolderId, filename: &str, data: &[u8]) -> Result<BlobId> {
        let id = BlobId(Uuid::new_v4().to_string());
        let mut state = self.state.lock().unwrap();
        state.blobs.insert(
            id.clone(),
            StoredBlob {
                name: filename.to_string(),
                data: data.to_vec(),
                convertible: None,
            },
        );
        Ok(id)
    }

    async fn get(&self, id: &BlobId) -> Result<Vec<u8>> {
        let state = self.state.lock().unwrap();
        state
            .blobs
            .get(id)
            .map(|b| b.data.clone())
            .ok_or_else(|| Error::NotFound(format!("blob {}", id)))
    }

    async fn copy_as_convertible(
        &self,
        id: &BlobId,
        temp_name: &str,
        kind: ConvertibleKind,
    ) -> Result<BlobId> {
        let mut state = self.state.lock().unwrap();
        let source = state
            .blobs
            .get(id)
            .cloned()
            .ok_or_else(|| Error::NotFound(format!("blob {}", id)))?;
        let copy_id = BlobId(Uuid::new_v4().to_string());
        state.blobs.insert(
            copy_id.clone(),
            StoredBlob {
                name: temp_name.to_string(),
                data: source.data,
                convertible: Some(kind),
            },
        );
        Ok(copy_id)
    }

    async fn export_pdf(&self, id: &BlobId) -> Result<Vec<u8>> {
        if self.fail_exports.load(Ordering::SeqCst) {
            return Err(Error::Conversion("export refused by backend".to_string()));
        }
        let state = self.state.lock().unwrap();
        let blob = state
            .blobs
            .get(id)
            .ok_or_else(|| Error::NotFound(format!("blob {}", id)))?;
        if blob.convertible.is_none() {
            return Err(Error::Conversion(format!(
                "blob {} is not in a convertible format",
                id
            )));
        }
        let fixture = self.export_fixture.lock().unwrap();
        Ok(fixture
            .clone()
            .unwrap_or_else(|| b"%PDF-1.4\n% memory-drive export fixture\n%%EOF\n".to_vec()))
    }

    async fn delete(&self, id: &BlobId) -> Result<()> {
        self.delete_calls.fetch_add(1, Ordering::SeqCst);
        let mut state = self.state.lock().unwrap();
        state
            .blobs
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| Error::NotFound(format!("blob {}", id)))
    }
}
