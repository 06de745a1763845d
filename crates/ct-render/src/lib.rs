/// TUI rendering module for courseTable.
///
/// Provides the interactive grid backend: direct buffer rendering of the
/// timetable plus the surrounding header/footer chrome.
pub mod canvas;
pub mod ui;

pub use canvas::GridCanvas;
pub use ui::ViewState;
