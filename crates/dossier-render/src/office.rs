//! Office-to-PDF conversion via the backend round trip.
//!
//! The backend cannot export office formats directly: the blob is first
//! copied into the backend's editable intermediate format, that copy is
//! exported as PDF, and the copy is deleted. The temporary copy must be
//! cleaned up on every path, including export failure.

use std::sync::Arc;

use dossier_core::{defaults, BlobId, Error, Result};
use dossier_archive::{BlobBackend, ConvertibleKind};
use tracing::{debug, warn};

/// Guard over the temporary convertible copy. [`TempCopy::delete`] is the
/// normal cleanup; `Drop` covers cancellation by spawning the delete onto the
/// current runtime when one is still available.
pub struct TempCopy {
    backend: Arc<dyn BlobBackend>,
    id: Option<BlobId>,
}

impl TempCopy {
    /// Copy `source` into the intermediate format under a `_temp_convert_`
    /// name.
    pub async fn create(
        backend: Arc<dyn BlobBackend>,
        source: &BlobId,
        filename: &str,
        kind: ConvertibleKind,
    ) -> Result<Self> {
        let temp_name = format!("{}{}", defaults::TEMP_CONVERT_PREFIX, filename);
        let id = backend
            .copy_as_convertible(source, &temp_name, kind)
            .await
            .map_err(|e| Error::Conversion(format!("import copy of '{}' failed: {}", filename, e)))?;
        debug!(blob_id = %id, temp_name, "office_convert: temp copy created");
        Ok(Self {
            backend,
            id: Some(id),
        })
    }

    /// Export the temporary copy as PDF bytes.
    pub async fn export_pdf(&self) -> Result<Vec<u8>> {
        let id = self
            .id
            .as_ref()
            .ok_or_else(|| Error::Internal("temp copy already deleted".to_string()))?;
        self.backend.export_pdf(id).await
    }

    /// Delete the temporary copy. A failed delete is logged, not propagated:
    /// the export result matters more than a leaked temp blob.
    pub async fn delete(mut self) {
        if let Some(id) = self.id.take() {
            if let Err(e) = self.backend.delete(&id).await {
                warn!(blob_id = %id, error = %e, "office_convert: temp copy delete failed");
            }
        }
    }
}

impl Drop for TempCopy {
    fn drop(&mut self) {
        if let Some(id) = self.id.take() {
            let backend = self.backend.clone();
            match tokio::runtime::Handle::try_current() {
                Ok(handle) => {
                    handle.spawn(async move {
                        if let Err(e) = backend.delete(&id).await {
                            warn!(
                                blob_id = %id,
                                error = %e,
                                "office_convert: deferred temp copy delete failed"
                            );
                        }
                    });
                }
                Err(_) => {
                    warn!(blob_id = %id, "office_convert: temp copy leaked, no runtime for cleanup");
                }
            }
        }
    }
}

/// Full conversion round trip: copy, export, delete. The delete runs whether
/// or not the export succeeded.
pub async fn convert_office_to_pdf(
    backend: &Arc<dyn BlobBackend>,
    blob_id: &BlobId,
    filename: &str,
    kind: ConvertibleKind,
) -> Result<Vec<u8>> {
    let temp = TempCopy::create(backend.clone(), blob_id, filename, kind).await?;
    let exported = temp.export_pdf().await;
    temp.delete().await;

    match exported {
        Ok(pdf) => {
            debug!(
                filename,
                size_bytes = pdf.len(),
                "office_convert: export complete"
            );
            Ok(pdf)
        }
        Err(Error::Conversion(msg)) => Err(Error::Conversion(msg)),
        Err(other) => Err(Error::Conversion(format!(
            "export of '{}' failed: {}",
            filename, other
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dossier_archive::MemoryDrive;

    async fn seeded_drive() -> (Arc<MemoryDrive>, BlobId) {
        let drive = Arc::new(MemoryDrive::new());
        let folder = drive.root();
        let id = drive
            .put(&folder, "minutes.docx", b"office bytes")
            .await
            .unwrap();
        (drive, id)
    }

    #[tokio::test]
    async fn test_round_trip_exports_pdf_and_deletes_copy() {
        let (drive, id) = seeded_drive().await;
        let backend: Arc<dyn BlobBackend> = drive.clone();

        let pdf = convert_office_to_pdf(&backend, &id, "minutes.docx", ConvertibleKind::Document)
            .await
            .unwrap();
        assert!(pdf.starts_with(b"%PDF"));
        assert_eq!(drive.delete_calls(), 1);
        // Source blob untouched.
        assert!(drive.blob_exists(&id));
    }

    #[tokio::test]
    async fn test_export_failure_still_deletes_copy_exactly_once() {
        let (drive, id) = seeded_drive().await;
        let backend: Arc<dyn BlobBackend> = drive.clone();
        drive.fail_exports(true);

        let err = convert_office_to_pdf(&backend, &id, "minutes.docx", ConvertibleKind::Document)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Conversion(_)));
        assert_eq!(drive.delete_calls(), 1);
    }

    #[tokio::test]
    async fn test_missing_source_fails_without_temp_copy() {
        let drive = Arc::new(MemoryDrive::new());
        let backend: Arc<dyn BlobBackend> = drive.clone();

        let err = convert_office_to_pdf(
            &backend,
            &BlobId::from("ghost"),
            "minutes.docx",
            ConvertibleKind::Document,
        )
        .await
        .unwrap_err();
        assert!(matches!(err, Error::Conversion(_)));
        assert_eq!(drive.delete_calls(), 0);
    }
}
