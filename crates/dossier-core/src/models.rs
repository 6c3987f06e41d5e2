//! Data model for the archival and report pipeline.
//!
//! Folder and blob handles are opaque backend-assigned identifiers, never
//! path strings. Attachments are append-only: a task's attachment sequence is
//! in upload order and entries are never mutated in place.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Opaque backend handle for a folder.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FolderId(pub String);

impl FolderId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for FolderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for FolderId {
    fn from(s: &str) -> Self {
        FolderId(s.to_string())
    }
}

/// Opaque backend handle for a stored blob.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BlobId(pub String);

impl BlobId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for BlobId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for BlobId {
    fn from(s: &str) -> Self {
        BlobId(s.to_string())
    }
}

/// One folder listing result from the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FolderEntry {
    pub id: FolderId,
    pub name: String,
}

/// One archived file attached to a task.
///
/// `folder_path` is the human-readable resolved path, kept for diagnostics
/// only; retrieval always goes through `blob_id`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Attachment {
    pub filename: String,
    pub blob_id: BlobId,
    pub folder_path: String,
    pub uploaded_at: DateTime<Utc>,
}

/// Lifecycle status of a task, managed by the external record store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    Upcoming,
    InProgress,
    Completed,
}

impl TaskStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Upcoming => "Upcoming",
            TaskStatus::InProgress => "In Progress",
            TaskStatus::Completed => "Completed",
        }
    }

    /// Parse the status strings used by the external record store.
    /// Unrecognized values fall back to `Upcoming`.
    pub fn parse(s: &str) -> Self {
        match s {
            "Completed" => TaskStatus::Completed,
            "In Progress" => TaskStatus::InProgress,
            _ => TaskStatus::Upcoming,
        }
    }
}

/// A project task with its ordered attachment sequence.
///
/// Task lifecycle is owned by the external record store; this subsystem only
/// reads codes, titles, status, and appends attachments.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    pub id: Uuid,
    pub code: String,
    pub title: String,
    pub status: TaskStatus,
    #[serde(default)]
    pub attachments: Vec<Attachment>,
}

/// Project metadata rendered on the report cover.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub well: Option<String>,
    #[serde(default)]
    pub contract_no: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub start_date: Option<String>,
    #[serde(default)]
    pub end_date: Option<String>,
    #[serde(default)]
    pub rig_down: Option<String>,
    #[serde(default)]
    pub assigned_to: Option<String>,
}

/// One normalized, size-bounded raster page derived from a source attachment.
///
/// Transient: produced per attachment, consumed by the report assembler,
/// never persisted.
#[derive(Debug, Clone)]
pub struct RenderedPage {
    /// JPEG-compressed image bytes.
    pub jpeg: Vec<u8>,
    pub width: u32,
    pub height: u32,
}
