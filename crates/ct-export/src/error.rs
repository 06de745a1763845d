use thiserror::Error;

/// Errors surfaced by the raster export backend.
///
/// Export is the only pipeline stage allowed to fail toward the caller;
/// everything upstream degrades silently.
#[derive(Error, Debug)]
pub enum ExportError {
    /// The drawing host never signalled draw completion.
    #[error("surface flatten timed out after {timeout_ms} ms")]
    FlattenTimeout {
        /// Timeout that elapsed, in milliseconds.
        timeout_ms: u64,
    },

    /// The drawing host rejected the flatten operation.
    #[error("drawing host rejected the surface: {0}")]
    Host(String),

    /// The configured font could not be loaded or parsed.
    #[error("font unavailable: {0}")]
    Font(String),
}
