use ct_color::palette::Palette;
use ct_core::block::{ColorAssignment, MappedBlock};
use ct_core::config::GridConfig;
use ct_core::record::CourseRecord;

use crate::mapper;
use crate::visibility;

/// Un bloc positionné et colorié, prêt à être dessiné par n'importe quel
/// backend.
#[derive(Clone, Debug, PartialEq)]
pub struct PositionedBlock {
    /// Grid position and identity.
    pub block: MappedBlock,
    /// Resolved colors for this pass.
    pub color: ColorAssignment,
}

/// Résultat de layout partagé : la sortie unique de la passe de calcul,
/// consommée telle quelle par les deux backends.
///
/// Recalculé à chaque déclencheur de rendu (changement de semaine, refresh
/// manuel, changement de seed) et jeté ensuite.
#[derive(Clone, Debug, PartialEq)]
pub struct GridLayout {
    /// Selected week number.
    pub week: u16,
    /// Seed used for the color pass.
    pub seed: u64,
    /// Visible, positioned, colored blocks.
    pub blocks: Vec<PositionedBlock>,
}

impl GridLayout {
    /// True if no block is visible for the selected week. Rendered as an
    /// empty grid, not an error.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }
}

/// Single upstream computation both backends consume.
///
/// Maps the records, filters them for `week`, and runs the color pass with
/// `seed`. Deterministic: identical records, week, and seed produce an
/// identical layout.
///
/// # Example
/// ```
/// use ct_color::palette::Palette;
/// use ct_core::config::GridConfig;
/// use ct_layout::layout::compute_layout;
/// let layout = compute_layout(&[], &Palette::builtin(), &GridConfig::default(), 1, 0);
/// assert!(layout.is_empty());
/// ```
#[must_use]
pub fn compute_layout(
    records: &[CourseRecord],
    palette: &Palette,
    config: &GridConfig,
    week: u16,
    seed: u64,
) -> GridLayout {
    let mapped = mapper::map_records(records);
    let visible = visibility::visible_blocks(mapped, week);
    let colors = ct_color::assign::assign_colors(
        &visible,
        palette,
        config.base_alpha,
        config.min_contrast,
        config.alpha_step,
        seed,
    );

    let blocks = visible
        .into_iter()
        .zip(colors)
        .map(|(block, color)| PositionedBlock { block, color })
        .collect();

    GridLayout { week, seed, blocks }
}

/// Common interface of the two presentation backends.
///
/// Both strategies consume the same `GridLayout`; neither re-derives color
/// or contrast state.
///
/// # Example
/// ```
/// use ct_layout::layout::{GridLayout, GridPresenter};
///
/// struct CountingPresenter;
/// impl GridPresenter for CountingPresenter {
///     type Output = usize;
///     fn present(&mut self, layout: &GridLayout) -> anyhow::Result<usize> {
///         Ok(layout.blocks.len())
///     }
/// }
/// ```
pub trait GridPresenter {
    /// What the backend yields: nothing for the interactive grid, the
    /// written image path for the raster export.
    type Output;

    /// Render one layout result.
    ///
    /// # Errors
    /// Only the raster backend can fail (flatten rejection or timeout);
    /// the interactive backend is infallible.
    fn present(&mut self, layout: &GridLayout) -> anyhow::Result<Self::Output>;
}
