//! Finished report artifact and its delivery metadata.

/// How the caller intends to serve the report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DownloadMode {
    /// Forced download (`Content-Disposition: attachment`).
    Download,
    /// Inline browser preview (`Content-Disposition: inline`).
    Preview,
}

/// The assembled report plus everything an HTTP layer needs to serve it.
#[derive(Debug, Clone)]
pub struct ReportOutput {
    pub bytes: Vec<u8>,
    pub filename: String,
    pub media_type: &'static str,
    pub mode: DownloadMode,
}

impl ReportOutput {
    pub fn new(bytes: Vec<u8>, project_name: &str, mode: DownloadMode) -> Self {
        Self {
            bytes,
            filename: format!("{}_Report.pdf", project_name.replace(' ', "_")),
            media_type: "application/pdf",
            mode,
        }
    }

    /// `Content-Disposition` header value for this artifact.
    pub fn content_disposition(&self) -> String {
        let disposition = match self.mode {
            DownloadMode::Download => "attachment",
            DownloadMode::Preview => "inline",
        };
        format!("{}; filename={}", disposition, self.filename)
    }
}
