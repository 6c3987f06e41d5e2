//! Hierarchical folder path resolution with an exact-name cache.
//!
//! A task code like `3.1.2` maps onto the folder chain
//! `{project}/Element 3/3.1/3.1.2 {title}` under the configured root.
//! Intermediate segments are resolved with prefix matching because existing
//! folders may carry a human-readable suffix added out-of-band (`"3.1 HSE
//! Committee Meeting"`); the final segment's full name is known precisely and
//! is resolved exactly.
//!
//! Concurrent resolution of the same missing path from two requests may race
//! to create duplicate folders; this inconsistency window is accepted rather
//! than eliminated (the backend offers no atomic create-if-absent). The cache
//! only ever grows, so neither request observes an invalidation.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use dossier_core::defaults::ELEMENT_FOLDER_PREFIX;
use dossier_core::taskcode::sanitize_title;
use dossier_core::{Error, FolderId, Result};
use tracing::{debug, info};

use crate::backend::{FolderBackend, NameQuery};

/// Growth-only cache from `(parent handle, exact name)` to a folder handle.
///
/// Populated only on exact-name hits and creations, never on prefix-matched
/// selections, so a cached entry is never a guess. Entries are never
/// invalidated: folder names are treated as immutable once created.
#[derive(Debug, Default)]
pub struct FolderCache {
    entries: HashMap<(FolderId, String), FolderId>,
}

impl FolderCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, parent: &FolderId, name: &str) -> Option<FolderId> {
        self.entries.get(&(parent.clone(), name.to_string())).cloned()
    }

    pub fn put(&mut self, parent: &FolderId, name: &str, id: FolderId) {
        self.entries.insert((parent.clone(), name.to_string()), id);
    }

    pub fn has_exact(&self, parent: &FolderId, name: &str) -> bool {
        self.entries.contains_key(&(parent.clone(), name.to_string()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Resolves dotted task codes to folder handles, creating missing segments.
pub struct FolderResolver {
    backend: Arc<dyn FolderBackend>,
    root: FolderId,
    cache: Mutex<FolderCache>,
}

impl FolderResolver {
    pub fn new(backend: Arc<dyn FolderBackend>, root: FolderId) -> Self {
        Self {
            backend,
            root,
            cache: Mutex::new(FolderCache::new()),
        }
    }

    /// Number of cached exact-name entries.
    pub fn cache_len(&self) -> usize {
        self.cache.lock().unwrap().len()
    }

    /// Resolve (or create) a folder named `name` under `parent`.
    ///
    /// With `prefix_search`, an existing folder whose name equals `name` or
    /// starts with `name + " "` is accepted. Candidates are ordered exact
    /// match first, then lexicographically. The result is cached only when
    /// the selected name equals `name` exactly; a freshly created folder
    /// always has an exact name and is always cached.
    pub async fn resolve(
        &self,
        parent: &FolderId,
        name: &str,
        prefix_search: bool,
    ) -> Result<FolderId> {
        if !prefix_search {
            if let Some(hit) = self.cache.lock().unwrap().get(parent, name) {
                debug!(folder = name, folder_id = %hit, "folder_resolver: cache hit");
                return Ok(hit);
            }
        }

        let query = if prefix_search {
            NameQuery::Prefix(name.to_string())
        } else {
            NameQuery::Exact(name.to_string())
        };

        let mut candidates = self.backend.list(parent, &query).await?;
        if !candidates.is_empty() {
            candidates.sort_by(|a, b| {
                (a.name != name)
                    .cmp(&(b.name != name))
                    .then_with(|| a.name.cmp(&b.name))
            });
            let chosen = candidates.swap_remove(0);
            if chosen.name == name {
                self.cache
                    .lock()
                    .unwrap()
                    .put(parent, name, chosen.id.clone());
            }
            debug!(
                folder = name,
                selected = %chosen.name,
                folder_id = %chosen.id,
                "folder_resolver: found existing folder"
            );
            return Ok(chosen.id);
        }

        let created = self.backend.create(parent, name).await?;
        self.cache.lock().unwrap().put(parent, name, created.clone());
        info!(folder = name, folder_id = %created, "folder_resolver: created folder");
        Ok(created)
    }

    /// Resolve the full folder chain for a task, creating missing segments.
    ///
    /// An empty task code falls back to the bare project folder. Resolution
    /// is a fold over the code's segments: the first failing segment aborts
    /// with `Error::FolderResolution` naming it. Folders already created by
    /// earlier segments are not rolled back.
    pub async fn resolve_task_path(
        &self,
        project: &str,
        code: &str,
        title: &str,
    ) -> Result<FolderId> {
        let code = code.trim();

        let project_folder = self
            .resolve(&self.root, project, false)
            .await
            .map_err(|e| segment_error(project, e))?;
        if code.is_empty() {
            return Ok(project_folder);
        }

        let segments: Vec<&str> = code.split('.').collect();
        let element_name = format!("{}{}", ELEMENT_FOLDER_PREFIX, segments[0]);
        let mut current = self
            .resolve(&project_folder, &element_name, false)
            .await
            .map_err(|e| segment_error(&element_name, e))?;

        for i in 1..segments.len() {
            let partial = segments[..=i].join(".");
            let is_final = partial == code;
            let step = if is_final {
                // The full leaf name is known precisely, so no prefix search.
                let target = leaf_folder_name(&partial, title);
                self.resolve(&current, &target, false).await
            } else {
                // An existing folder for a partial code may carry a
                // human-readable suffix added out-of-band.
                self.resolve(&current, &partial, true).await
            };
            current = step.map_err(|e| segment_error(&partial, e))?;
        }

        Ok(current)
    }

    /// Human-readable resolved path, for attachment diagnostics.
    pub fn folder_path(project: &str, code: &str, title: &str) -> String {
        let code = code.trim();
        if code.is_empty() {
            return project.to_string();
        }
        let first = code.split('.').next().unwrap_or(code);
        let leaf = leaf_folder_name(code, title);
        format!("{}/{}{}/{}", project, ELEMENT_FOLDER_PREFIX, first, leaf)
    }
}

/// Leaf folder naming convention, reproduced byte-for-byte:
/// `fullCode + (" " + sanitizedTitle if title else "")`.
fn leaf_folder_name(code: &str, title: &str) -> String {
    if title.is_empty() {
        code.to_string()
    } else {
        format!("{} {}", code, sanitize_title(title))
    }
}

fn segment_error(segment: &str, err: Error) -> Error {
    match err {
        Error::FolderResolution(_) => err,
        other => Error::FolderResolution(format!("segment '{}': {}", segment, other)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::MemoryDrive;

    fn resolver(drive: &Arc<MemoryDrive>) -> FolderResolver {
        FolderResolver::new(drive.clone() as Arc<dyn FolderBackend>, drive.root())
    }

    #[tokio::test]
    async fn test_resolve_creates_missing_folder_and_caches_it() {
        let drive = Arc::new(MemoryDrive::new());
        let resolver = resolver(&drive);
        let root = drive.root();

        let id = resolver.resolve(&root, "WELL-A", false).await.unwrap();
        assert_eq!(resolver.cache_len(), 1);

        let lists_before = drive.list_calls();
        let again = resolver.resolve(&root, "WELL-A", false).await.unwrap();
        assert_eq!(id, again);
        // Cache hit: no further backend queries.
        assert_eq!(drive.list_calls(), lists_before);
    }

    #[tokio::test]
    async fn test_prefix_resolution_never_crosses_numeric_suffix() {
        let drive = Arc::new(MemoryDrive::new());
        let root = drive.root();
        let decoy = drive.create(&root, "2.10 Emergency Response").await.unwrap();
        let resolver = resolver(&drive);

        // "2.1" must not select the folder created for "2.10".
        let resolved = resolver.resolve(&root, "2.1", true).await.unwrap();
        assert_ne!(resolved, decoy);
        assert_eq!(drive.folder_name_chain(&resolved), vec!["2.1"]);
    }

    #[tokio::test]
    async fn test_prefix_resolution_accepts_annotated_folder() {
        let drive = Arc::new(MemoryDrive::new());
        let root = drive.root();
        let annotated = drive.create(&root, "2.1 HSE Committee Meeting").await.unwrap();
        let resolver = resolver(&drive);

        let resolved = resolver.resolve(&root, "2.1", true).await.unwrap();
        assert_eq!(resolved, annotated);
        // A prefix-matched selection is a guess and must not be cached.
        assert_eq!(resolver.cache_len(), 0);
    }

    #[tokio::test]
    async fn test_exact_match_wins_over_annotated_sibling() {
        let drive = Arc::new(MemoryDrive::new());
        let root = drive.root();
        drive.create(&root, "2.1 Annotated").await.unwrap();
        let exact = drive.create(&root, "2.1").await.unwrap();
        let resolver = resolver(&drive);

        let resolved = resolver.resolve(&root, "2.1", true).await.unwrap();
        assert_eq!(resolved, exact);
        // Exact hit during prefix search is safe to cache.
        assert!(resolver.cache_len() <= 1);
    }

    #[tokio::test]
    async fn test_ties_break_lexicographically() {
        let drive = Arc::new(MemoryDrive::new());
        let root = drive.root();
        drive.create(&root, "2.1 Zulu").await.unwrap();
        let alpha = drive.create(&root, "2.1 Alpha").await.unwrap();
        let resolver = resolver(&drive);

        let resolved = resolver.resolve(&root, "2.1", true).await.unwrap();
        assert_eq!(resolved, alpha);
    }

    #[tokio::test]
    async fn test_resolve_task_path_builds_element_chain() {
        let drive = Arc::new(MemoryDrive::new());
        let resolver = resolver(&drive);

        let leaf = resolver
            .resolve_task_path("WELL-A", "3.1", "Inspection")
            .await
            .unwrap();
        assert_eq!(
            drive.folder_name_chain(&leaf),
            vec!["WELL-A", "Element 3", "3.1 Inspection"]
        );
    }

    #[tokio::test]
    async fn test_resolve_task_path_deep_code_with_intermediates() {
        let drive = Arc::new(MemoryDrive::new());
        let resolver = resolver(&drive);

        let leaf = resolver
            .resolve_task_path("WELL-A", "3.1.2", "Final Checks")
            .await
            .unwrap();
        assert_eq!(
            drive.folder_name_chain(&leaf),
            vec!["WELL-A", "Element 3", "3.1", "3.1.2 Final Checks"]
        );
    }

    #[tokio::test]
    async fn test_resolve_task_path_reuses_annotated_intermediate() {
        let drive = Arc::new(MemoryDrive::new());
        let resolver = resolver(&drive);

        // Build WELL-A/Element 3 first, then annotate the 3.1 intermediate
        // the way a human would out-of-band.
        let element = resolver
            .resolve_task_path("WELL-A", "3", "")
            .await
            .unwrap();
        let annotated = drive.create(&element, "3.1 Integrity").await.unwrap();

        let leaf = resolver
            .resolve_task_path("WELL-A", "3.1.2", "")
            .await
            .unwrap();
        let chain = drive.folder_name_chain(&leaf);
        assert_eq!(chain, vec!["WELL-A", "Element 3", "3.1 Integrity", "3.1.2"]);
        assert_eq!(drive.folder_name_chain(&annotated)[2], "3.1 Integrity");
    }

    #[tokio::test]
    async fn test_empty_code_falls_back_to_project_folder() {
        let drive = Arc::new(MemoryDrive::new());
        let resolver = resolver(&drive);

        let folder = resolver.resolve_task_path("WELL-A", "", "x").await.unwrap();
        assert_eq!(drive.folder_name_chain(&folder), vec!["WELL-A"]);
    }

    #[tokio::test]
    async fn test_leaf_without_title_is_bare_code() {
        let drive = Arc::new(MemoryDrive::new());
        let resolver = resolver(&drive);

        let leaf = resolver.resolve_task_path("WELL-A", "2.4", "").await.unwrap();
        assert_eq!(
            drive.folder_name_chain(&leaf),
            vec!["WELL-A", "Element 2", "2.4"]
        );
    }

    #[test]
    fn test_folder_path_diagnostic_format() {
        assert_eq!(
            FolderResolver::folder_path("WELL-A", "3.1", "Inspection"),
            "WELL-A/Element 3/3.1 Inspection"
        );
        assert_eq!(
            FolderResolver::folder_path("WELL-A", "3.1", ""),
            "WELL-A/Element 3/3.1"
        );
        assert_eq!(FolderResolver::folder_path("WELL-A", "", "t"), "WELL-A");
    }

    #[test]
    fn test_title_sanitized_in_leaf_name() {
        assert_eq!(
            leaf_folder_name("3.1", "Inspection (final)!"),
            "3.1 Inspection final"
        );
    }
}
