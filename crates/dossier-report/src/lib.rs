//! # dossier-report
//!
//! Assembles one paginated PDF per project: cover, task statistics, then
//! every task's attachments rendered page by page. Individual attachment
//! failures degrade to inline placeholder notes; only missing project
//! metadata or an unavailable backend aborts the build.

pub mod assembler;
pub mod layout;
pub mod output;
pub mod writer;

pub use assembler::ReportAssembler;
pub use layout::{ReportDocument, ReportElement};
pub use output::{DownloadMode, ReportOutput};
