//! Report assembly: cover, statistics, then every task's attachments.
//!
//! Per-attachment failures (missing blob, decode or conversion errors,
//! unsupported types) degrade to inline placeholder notes. Only invalid
//! project metadata or an unavailable backend aborts the build.

use chrono::Utc;
use dossier_core::{taskcode, Attachment, Error, Project, Result, Task};
use dossier_archive::AttachmentStore;
use dossier_render::format::extension_of;
use dossier_render::{AttachmentKind, DocumentRenderer};
use tracing::{info, warn};

use crate::layout::{ReportDocument, ReportElement};
use crate::output::{DownloadMode, ReportOutput};
use crate::writer::write_report;

const PLACEHOLDER_NOT_RETRIEVED: &str = "[Could not retrieve file]";
const PLACEHOLDER_CONVERSION: &str = "[Document conversion failed]";
const PLACEHOLDER_PROCESSING: &str = "[Error processing file]";
const PLACEHOLDER_NO_PREVIEW: &str = "[No preview available]";
const NO_ATTACHMENTS_NOTE: &str = "No attachments for this task";
const FOOTER_NOTE: &str = "Generated by the Dossier archive service";

/// Builds one paginated PDF per project.
pub struct ReportAssembler {
    store: AttachmentStore,
    renderer: DocumentRenderer,
}

impl ReportAssembler {
    pub fn new(store: AttachmentStore, renderer: DocumentRenderer) -> Self {
        Self { store, renderer }
    }

    /// Assemble the report for `project` over `tasks`.
    ///
    /// Tasks are ordered by numeric-aware task code regardless of input
    /// order; attachments keep their upload order.
    pub async fn build(
        &self,
        project: &Project,
        tasks: &[Task],
        mode: DownloadMode,
    ) -> Result<ReportOutput> {
        if project.name.trim().is_empty() {
            return Err(Error::InvalidInput("project name is empty".to_string()));
        }
        let started = std::time::Instant::now();

        let mut ordered: Vec<Task> = tasks.to_vec();
        taskcode::sort_tasks_by_code(&mut ordered);

        let mut doc = ReportDocument::new();
        self.cover(&mut doc, project);
        self.summary(&mut doc, &ordered);

        let mut attachment_index = 0usize;
        for task in &ordered {
            doc.push(ReportElement::Text {
                content: format!("{} - {}", task.code, task.title),
                indent: 0.0,
            });
            doc.push(ReportElement::StatusLine(format!(
                "Status: {}",
                task.status.as_str()
            )));

            if task.attachments.is_empty() {
                doc.push(ReportElement::Text {
                    content: NO_ATTACHMENTS_NOTE.to_string(),
                    indent: 20.0,
                });
                continue;
            }
            for attachment in &task.attachments {
                attachment_index += 1;
                self.attachment(&mut doc, attachment, attachment_index)
                    .await?;
            }
        }

        doc.push(ReportElement::Spacer(36.0));
        doc.push(ReportElement::Note(FOOTER_NOTE.to_string()));

        let bytes = write_report(&doc)?;
        info!(
            project = %project.name,
            task_count = ordered.len(),
            attachment_count = attachment_index,
            size_bytes = bytes.len(),
            duration_ms = started.elapsed().as_millis() as u64,
            "report: assembled"
        );
        Ok(ReportOutput::new(bytes, &project.name, mode))
    }

    fn cover(&self, doc: &mut ReportDocument, project: &Project) {
        doc.push(ReportElement::Spacer(144.0));
        doc.push(ReportElement::Title("PROJECT REPORT".to_string()));
        doc.push(ReportElement::Spacer(24.0));
        doc.push(ReportElement::Subtitle(project.name.clone()));
        if let Some(well) = &project.well {
            doc.push(ReportElement::Subtitle(format!("Well: {}", well)));
        }
        if let Some(title) = &project.title {
            doc.push(ReportElement::Subtitle(title.clone()));
        }
        doc.push(ReportElement::Spacer(22.0));

        let mut rows = Vec::new();
        let optional = [
            ("Well:", &project.well),
            ("Contract No:", &project.contract_no),
            ("Status:", &project.status),
            ("Start Date:", &project.start_date),
            ("End Date:", &project.end_date),
            ("Rig Down:", &project.rig_down),
            ("Assigned To:", &project.assigned_to),
        ];
        for (label, value) in optional {
            if let Some(value) = value {
                rows.push((label.to_string(), value.clone()));
            }
        }
        rows.push((
            "Generated:".to_string(),
            Utc::now().format("%Y-%m-%d %H:%M").to_string(),
        ));
        doc.push(ReportElement::KeyValueTable(rows));
    }

    fn summary(&self, doc: &mut ReportDocument, tasks: &[Task]) {
        let completed = tasks
            .iter()
            .filter(|t| t.status == dossier_core::TaskStatus::Completed)
            .count();
        let total_attachments: usize = tasks.iter().map(|t| t.attachments.len()).sum();
        let percent = (completed as f64 / tasks.len().max(1) as f64 * 100.0).round() as u64;

        doc.push(ReportElement::PageBreak);
        doc.push(ReportElement::Heading(
            "Task Summary & Attachments".to_string(),
        ));
        doc.push(ReportElement::KeyValueTable(vec![
            ("Total Tasks:".to_string(), tasks.len().to_string()),
            (
                "Completed:".to_string(),
                format!("{} ({}%)", completed, percent),
            ),
            (
                "Total Attachments:".to_string(),
                total_attachments.to_string(),
            ),
        ]));
        doc.push(ReportElement::Spacer(22.0));
    }

    /// One attachment: its own page with a header bar, then rendered pages
    /// or a placeholder note.
    async fn attachment(
        &self,
        doc: &mut ReportDocument,
        attachment: &Attachment,
        index: usize,
    ) -> Result<()> {
        doc.push(ReportElement::PageBreak);
        doc.push(ReportElement::HeaderBar {
            left: format!("Attachment {}: {}", index, attachment.filename),
            right: format!("Uploaded: {}", attachment.uploaded_at.format("%Y-%m-%d")),
        });

        let data = match self.store.get(&attachment.blob_id).await {
            Ok(data) => data,
            Err(e) if e.is_attachment_scoped() => {
                warn!(
                    filename = %attachment.filename,
                    blob_id = %attachment.blob_id,
                    error = %e,
                    "report: attachment blob not retrievable"
                );
                doc.push(ReportElement::Note(PLACEHOLDER_NOT_RETRIEVED.to_string()));
                return Ok(());
            }
            Err(e) => return Err(e),
        };

        match self
            .renderer
            .render(&attachment.blob_id, &attachment.filename, &data)
            .await
        {
            Ok(outcome) if outcome.pages.is_empty() => {
                let note = match outcome.kind {
                    AttachmentKind::Unsupported => {
                        let ext = extension_of(&attachment.filename)
                            .map(|e| e.to_uppercase())
                            .unwrap_or_else(|| "UNKNOWN".to_string());
                        format!("[File type {} is not supported for preview]", ext)
                    }
                    _ => PLACEHOLDER_NO_PREVIEW.to_string(),
                };
                doc.push(ReportElement::Note(note));
            }
            Ok(outcome) => {
                let shown = outcome.pages.len();
                for (page_index, page) in outcome.pages.into_iter().enumerate() {
                    if page_index > 0 {
                        doc.push(ReportElement::PageBreak);
                        doc.push(ReportElement::ContinuationBar(format!(
                            "{} - Page {} of {}",
                            attachment.filename,
                            page_index + 1,
                            outcome.total_pages
                        )));
                    }
                    doc.push(ReportElement::Image(page));
                }
                if outcome.total_pages > shown {
                    doc.push(ReportElement::Note(format!(
                        "[Showing first {} of {} pages]",
                        shown, outcome.total_pages
                    )));
                }
            }
            Err(e) if e.is_attachment_scoped() => {
                warn!(
                    filename = %attachment.filename,
                    error = %e,
                    "report: attachment render failed"
                );
                let note = match e {
                    Error::Conversion(_) => PLACEHOLDER_CONVERSION,
                    Error::NotFound(_) => PLACEHOLDER_NOT_RETRIEVED,
                    _ => PLACEHOLDER_PROCESSING,
                };
                doc.push(ReportElement::Note(note.to_string()));
            }
            Err(e) => return Err(e),
        }
        Ok(())
    }
}
