//! Intermediate layout model: the assembler appends elements in reading
//! order, the writer paginates them into physical pages.

use dossier_core::RenderedPage;

/// One layout element of the report, in document order.
#[derive(Debug, Clone)]
pub enum ReportElement {
    /// Vertical gap in points.
    Spacer(f32),
    /// Large centered cover title.
    Title(String),
    /// Centered secondary line under the title.
    Subtitle(String),
    /// Section heading.
    Heading(String),
    /// Body text. `indent` is added to the left margin.
    Text { content: String, indent: f32 },
    /// Small status line under a task header.
    StatusLine(String),
    /// Centered italic placeholder or diagnostic note.
    Note(String),
    /// Two-column label/value rows (cover metadata, statistics).
    KeyValueTable(Vec<(String, String)>),
    /// Full-width filled bar with white text, left and right aligned cells.
    HeaderBar { left: String, right: String },
    /// Centered filled bar marking a continuation page of one attachment.
    ContinuationBar(String),
    /// One rendered attachment page, drawn bordered and scaled to the
    /// content area.
    Image(RenderedPage),
    /// Forced page break.
    PageBreak,
}

/// Ordered element sequence, finalized once into PDF bytes by the writer.
#[derive(Debug, Clone, Default)]
pub struct ReportDocument {
    elements: Vec<ReportElement>,
}

impl ReportDocument {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, element: ReportElement) {
        self.elements.push(element);
    }

    pub fn elements(&self) -> &[ReportElement] {
        &self.elements
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }
}
