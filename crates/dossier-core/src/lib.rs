//! # dossier-core
//!
//! Core types, traits, and abstractions for the dossier archive pipeline.
//!
//! This crate provides the foundational data structures, error taxonomy, and
//! configuration that the archive, render, and report crates depend on.

pub mod config;
pub mod defaults;
pub mod error;
pub mod logging;
pub mod models;
pub mod taskcode;

// Re-export commonly used types at crate root
pub use config::ArchiveConfig;
pub use error::{Error, Result};
pub use models::{
    Attachment, BlobId, FolderEntry, FolderId, Project, RenderedPage, Task, TaskStatus,
};
pub use taskcode::{code_sort_key, sanitize_title, sort_tasks_by_code};
