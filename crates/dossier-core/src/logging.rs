//! Structured logging schema and field name constants.
//!
//! All crates use these constants for consistent structured logging fields so
//! log aggregation tools can query by standardized names across subsystems.
//!
//! ## Log Level Contract
//!
//! | Level | Usage |
//! |-------|-------|
//! | ERROR | Degraded service, requires operator attention |
//! | WARN  | Recoverable issue, automatic fallback applied |
//! | INFO  | Lifecycle events, operation completions |
//! | DEBUG | Decision points, intermediate values, config choices |
//! | TRACE | Per-item iteration (per page, per folder candidate) |

// ─── Identity fields ───────────────────────────────────────────────────────

/// Subsystem originating the log event.
/// Values: "archive", "render", "report"
pub const SUBSYSTEM: &str = "subsystem";

/// Component within a subsystem.
/// Examples: "folder_resolver", "attachment_store", "pdf_rasterizer"
pub const COMPONENT: &str = "component";

/// Logical operation name.
/// Examples: "resolve", "upload", "render", "build_report"
pub const OPERATION: &str = "op";

// ─── Entity fields ─────────────────────────────────────────────────────────

/// Project name being operated on.
pub const PROJECT: &str = "project";

/// Hierarchical task code (dotted).
pub const TASK_CODE: &str = "task_code";

/// Attachment filename.
pub const FILENAME: &str = "filename";

/// Backend folder handle.
pub const FOLDER_ID: &str = "folder_id";

/// Backend blob handle.
pub const BLOB_ID: &str = "blob_id";

// ─── Measurement fields ────────────────────────────────────────────────────

/// Wall-clock duration in milliseconds.
pub const DURATION_MS: &str = "duration_ms";

/// Number of pages produced by a render step.
pub const PAGE_COUNT: &str = "page_count";

/// Byte length of a blob or output document.
pub const SIZE_BYTES: &str = "size_bytes";

// ─── Outcome fields ────────────────────────────────────────────────────────

/// Boolean success/failure indicator.
pub const SUCCESS: &str = "success";

/// Error message when an operation fails.
pub const ERROR_MSG: &str = "error";

/// Initialize a process-wide tracing subscriber with env-filter support.
///
/// Safe to call more than once; later calls are no-ops. Binaries and
/// integration tests call this; library code only emits events.
pub fn init() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}
