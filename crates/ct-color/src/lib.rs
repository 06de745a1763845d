/// Color assignment for courseTable.
///
/// Provides the built-in palette, the seeded greedy palette-index assigner,
/// and the contrast engine that guarantees legible text on every card.

pub mod assign;
pub mod contrast;
pub mod palette;

pub use assign::{SlotTable, assign_colors, assign_indices};
pub use contrast::Resolved;
pub use palette::Palette;
