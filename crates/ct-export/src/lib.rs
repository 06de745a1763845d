/// Raster export backend for courseTable.
///
/// Replays a `GridLayout` onto an off-screen RGBA surface through a
/// drawing host, then flattens the surface into a shareable PNG.
pub mod error;
pub mod host;
pub mod painter;
pub mod text;

pub use error::ExportError;
pub use host::{DrawCmd, DrawHost, PngHost};
pub use painter::ImageExporter;
