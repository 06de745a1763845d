/// Timetable layout pipeline for courseTable.
///
/// Maps raw course records into break-free blocks, filters them by week,
/// and produces the renderer-agnostic layout result both presentation
/// backends consume.

pub mod layout;
pub mod mapper;
pub mod visibility;

pub use layout::{GridLayout, GridPresenter, PositionedBlock, compute_layout};
pub use mapper::{map_record, map_records};
pub use visibility::is_visible;
