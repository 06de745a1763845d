use thiserror::Error;

/// Errors originating from the core module.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Invalid configuration value or structure.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// Referenced file does not exist.
    #[error("file not found: {path}")]
    FileNotFound {
        /// Path that was not found.
        path: String,
    },

    /// Color string that does not parse as #RRGGBB.
    #[error("invalid color code: {value}")]
    InvalidColor {
        /// The rejected value.
        value: String,
    },

    /// Invalid width/height dimensions.
    #[error("invalid dimensions: {width}x{height}")]
    InvalidDimensions {
        /// Width value.
        width: u32,
        /// Height value.
        height: u32,
    },
}
