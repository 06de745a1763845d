/// Configuration, types, and shared structures for courseTable.
///
/// This crate contains all shared types, color primitives, and configuration
/// logic used across the courseTable workspace.

pub mod block;
pub mod color;
pub mod config;
pub mod error;
pub mod record;
pub mod slots;

pub use block::{ColorAssignment, MappedBlock};
pub use color::Rgb;
pub use config::GridConfig;
pub use error::CoreError;
pub use record::CourseRecord;
pub use slots::{SLOT_COUNT, TOTAL_WEEKS, WEEKDAY_COUNT, TimeSlot};

/// Re-exports pour accès par chemin sémantique.
pub mod grid {
    pub use crate::block::{ColorAssignment, MappedBlock};
    pub use crate::slots::{TIME_SLOTS, TimeSlot};
}
