//! End-to-end: upload through the archive service, then assemble a report.

use std::io::Cursor;
use std::sync::Arc;

use dossier_archive::{ArchiveService, AttachmentStore, BlobBackend, FolderBackend, MemoryDrive};
use dossier_core::{Project, Task, TaskStatus};
use dossier_render::fixtures::StaticRasterizer;
use dossier_render::{DocumentRenderer, RenderConfig};
use dossier_report::{DownloadMode, ReportAssembler};
use image::{DynamicImage, Rgb, RgbImage};
use uuid::Uuid;

fn service(drive: &Arc<MemoryDrive>) -> ArchiveService {
    ArchiveService::new(
        drive.clone() as Arc<dyn FolderBackend>,
        drive.clone() as Arc<dyn BlobBackend>,
        drive.root(),
    )
}

fn assembler(drive: &Arc<MemoryDrive>) -> ReportAssembler {
    let blobs = drive.clone() as Arc<dyn BlobBackend>;
    ReportAssembler::new(
        AttachmentStore::new(blobs.clone()),
        DocumentRenderer::new(
            blobs,
            Arc::new(StaticRasterizer::new(1)),
            RenderConfig::default(),
        ),
    )
}

fn project(name: &str) -> Project {
    Project {
        id: Uuid::new_v4(),
        name: name.to_string(),
        title: Some("Integrity campaign".to_string()),
        well: Some("W-112".to_string()),
        contract_no: None,
        status: Some("Active".to_string()),
        start_date: None,
        end_date: None,
        rig_down: None,
        assigned_to: None,
    }
}

fn portrait_jpeg(width: u32, height: u32) -> Vec<u8> {
    let img = DynamicImage::ImageRgb8(RgbImage::from_pixel(width, height, Rgb([80, 110, 70])));
    let mut out = Vec::new();
    img.write_to(&mut Cursor::new(&mut out), image::ImageFormat::Jpeg)
        .unwrap();
    out
}

fn page_texts(bytes: &[u8]) -> Vec<String> {
    let doc = lopdf::Document::load_mem(bytes).unwrap();
    doc.get_pages()
        .values()
        .map(|&id| String::from_utf8_lossy(&doc.get_page_content(id).unwrap()).into_owned())
        .collect()
}

#[tokio::test]
async fn test_uploaded_photo_appears_as_single_image_page() {
    let drive = Arc::new(MemoryDrive::new());
    let service = service(&drive);

    let attachment = service
        .upload_attachment(
            "WELL-A",
            "3.1",
            "Inspection",
            "inspection.jpg",
            &portrait_jpeg(3000, 4000),
        )
        .await
        .unwrap();
    assert_eq!(attachment.folder_path, "WELL-A/Element 3/3.1 Inspection");

    let tasks = vec![Task {
        id: Uuid::new_v4(),
        code: "3.1".to_string(),
        title: "Inspection".to_string(),
        status: TaskStatus::Completed,
        attachments: vec![attachment],
    }];

    let output = assembler(&drive)
        .build(&project("WELL-A"), &tasks, DownloadMode::Download)
        .await
        .unwrap();

    assert_eq!(output.filename, "WELL-A_Report.pdf");
    assert_eq!(output.media_type, "application/pdf");

    let pages = page_texts(&output.bytes);
    // Cover, summary, one attachment page.
    assert_eq!(pages.len(), 3);
    assert!(pages[0].contains("PROJECT REPORT"));
    assert!(pages[1].contains("Task Summary & Attachments"));
    assert!(pages[2].contains("Attachment 1: inspection.jpg"));
    // Exactly one embedded image across the whole document.
    let image_refs: usize = pages.iter().map(|p| p.matches("/Im").count()).sum();
    assert_eq!(image_refs, 1);
}

#[tokio::test]
async fn test_unsupported_zip_yields_placeholder_not_error() {
    let drive = Arc::new(MemoryDrive::new());
    let service = service(&drive);

    let attachment = service
        .upload_attachment("WELL-A", "3.2", "Evidence", "logs.zip", b"PK\x03\x04data")
        .await
        .unwrap();
    let tasks = vec![Task {
        id: Uuid::new_v4(),
        code: "3.2".to_string(),
        title: "Evidence".to_string(),
        status: TaskStatus::InProgress,
        attachments: vec![attachment],
    }];

    let output = assembler(&drive)
        .build(&project("WELL-A"), &tasks, DownloadMode::Preview)
        .await
        .unwrap();
    assert_eq!(output.content_disposition(), "inline; filename=WELL-A_Report.pdf");

    let text = page_texts(&output.bytes).join("\n");
    assert!(text.contains("[File type ZIP is not supported for preview]"));
    assert!(!text.contains("/Im"));
}

#[tokio::test]
async fn test_mixed_attachments_produce_one_report() {
    let drive = Arc::new(MemoryDrive::new());
    let service = service(&drive);

    let photo = service
        .upload_attachment("WELL-A", "2.1", "Committee", "site.jpg", &portrait_jpeg(800, 600))
        .await
        .unwrap();
    let sheet = service
        .upload_attachment("WELL-A", "2.1", "Committee", "costs.xlsx", b"cells")
        .await
        .unwrap();
    let archive = service
        .upload_attachment("WELL-A", "2.1", "Committee", "old.zip", b"PK\x03\x04")
        .await
        .unwrap();

    let tasks = vec![Task {
        id: Uuid::new_v4(),
        code: "2.1".to_string(),
        title: "Committee".to_string(),
        status: TaskStatus::Completed,
        attachments: vec![photo, sheet, archive],
    }];

    let output = assembler(&drive)
        .build(&project("WELL-A"), &tasks, DownloadMode::Download)
        .await
        .unwrap();

    let text = page_texts(&output.bytes).join("\n");
    // Attachments numbered in upload order.
    assert!(text.contains("Attachment 1: site.jpg"));
    assert!(text.contains("Attachment 2: costs.xlsx"));
    assert!(text.contains("Attachment 3: old.zip"));
    assert!(text.contains("[File type ZIP is not supported for preview]"));
    assert!(text.contains("Generated by the Dossier archive service"));
    // The office temp copy was cleaned up after its export.
    assert_eq!(drive.delete_calls(), 1);
}
