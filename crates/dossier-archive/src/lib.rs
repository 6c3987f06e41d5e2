//! # dossier-archive
//!
//! Hierarchical folder namespace resolution and opaque blob storage over a
//! remote drive backend.
//!
//! The backend is abstracted behind the [`backend::FolderBackend`] and
//! [`backend::BlobBackend`] traits; [`backend::MemoryDrive`] implements both
//! in memory for tests and local development. [`resolver::FolderResolver`]
//! maps `(project, task code, title)` onto a chain of folder handles with an
//! exact-name cache, and [`store::AttachmentStore`] moves blobs in and out of
//! resolved folders.

pub mod backend;
pub mod resolver;
pub mod store;

pub use backend::{BlobBackend, ConvertibleKind, FolderBackend, MemoryDrive, NameQuery};
pub use resolver::{FolderCache, FolderResolver};
pub use store::{ArchiveService, AttachmentStore};
