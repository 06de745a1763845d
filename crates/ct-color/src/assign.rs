use ct_core::block::{ColorAssignment, MappedBlock};
use ct_core::slots::{SLOT_COUNT, WEEKDAY_COUNT};

use crate::contrast;
use crate::palette::Palette;

/// Table d'occupation par jour/créneau d'une passe de rendu.
///
/// Reconstruite de zéro à chaque passe, jamais partagée entre deux rendus.
pub type SlotTable = [[Option<usize>; SLOT_COUNT]; WEEKDAY_COUNT];

/// FNV-1a 64 over the course identity fields.
///
/// Implemented locally so the assignment is stable across platforms and
/// releases; `DefaultHasher` makes no such promise.
fn course_hash(name: &str, location: &str, teacher: &str) -> u64 {
    const OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
    const PRIME: u64 = 0x0000_0100_0000_01b3;

    let mut hash = OFFSET;
    for part in [name, location, teacher] {
        for byte in part.bytes() {
            hash ^= u64::from(byte);
            hash = hash.wrapping_mul(PRIME);
        }
        hash ^= u64::from(b'\0');
        hash = hash.wrapping_mul(PRIME);
    }
    hash
}

/// Candidate palette index before conflict avoidance:
/// `hash(name, location, teacher) + weekday_index + start_index + seed (mod N)`.
///
/// # Example
/// ```
/// use ct_color::assign::base_index;
/// use ct_core::block::MappedBlock;
/// let block = MappedBlock {
///     name: "Analysis".into(), teacher: "Wang".into(), location: "A-301".into(),
///     weekday: 1, start: 0, end: 1, weeks: [1].into(),
/// };
/// assert!(base_index(&block, 16, 0) < 16);
/// assert_eq!(base_index(&block, 16, 3), base_index(&block, 16, 3));
/// ```
#[must_use]
pub fn base_index(block: &MappedBlock, palette_len: usize, seed: u64) -> usize {
    let sum = course_hash(&block.name, &block.location, &block.teacher)
        .wrapping_add(block.weekday_index() as u64)
        .wrapping_add(block.start as u64)
        .wrapping_add(seed);
    (sum % palette_len.max(1) as u64) as usize
}

/// True while `candidate` collides with the previous block of the same day
/// or with the adjacent previous day over the block's slot range.
fn conflicts(
    table: &SlotTable,
    last_index: Option<usize>,
    block: &MappedBlock,
    candidate: usize,
) -> bool {
    if last_index == Some(candidate) {
        return true;
    }
    let day = block.weekday_index();
    if day == 0 {
        return false;
    }
    let previous_day = &table[day - 1];
    (block.start..=block.end.min(SLOT_COUNT - 1)).any(|row| previous_day[row] == Some(candidate))
}

/// Assign a palette index to every visible block.
///
/// Greedy, locally-conflict-avoiding approximation: blocks are walked per
/// day in `(start, name)` order; a candidate is advanced `(i+1) mod N`
/// while it collides with the previous same-day block or the adjacent
/// previous day, for at most N attempts. Hitting the cap accepts the
/// collision; it is a documented limitation of dense schedules, not an
/// error. The returned vector is parallel to `blocks`.
#[must_use]
pub fn assign_indices(blocks: &[MappedBlock], palette_len: usize, seed: u64) -> Vec<usize> {
    if palette_len == 0 {
        return vec![0; blocks.len()];
    }

    let mut order: Vec<usize> = (0..blocks.len()).collect();
    order.sort_by(|&a, &b| {
        let (x, y) = (&blocks[a], &blocks[b]);
        (x.weekday, x.start, x.name.as_str()).cmp(&(y.weekday, y.start, y.name.as_str()))
    });

    let mut table: SlotTable = [[None; SLOT_COUNT]; WEEKDAY_COUNT];
    let mut out = vec![0usize; blocks.len()];
    let mut current_day = usize::MAX;
    let mut last_index: Option<usize> = None;

    for &i in &order {
        let block = &blocks[i];
        let day = block.weekday_index().min(WEEKDAY_COUNT - 1);
        if day != current_day {
            current_day = day;
            last_index = None;
        }

        let mut index = base_index(block, palette_len, seed);
        let mut attempts = 0;
        while attempts < palette_len && conflicts(&table, last_index, block, index) {
            index = (index + 1) % palette_len;
            attempts += 1;
        }
        if attempts == palette_len {
            log::debug!(
                "palette exhausted for '{}' ({}..{}): accepting collision",
                block.name,
                block.start,
                block.end
            );
        }

        for row in block.start..=block.end.min(SLOT_COUNT - 1) {
            table[day][row] = Some(index);
        }
        last_index = Some(index);
        out[i] = index;
    }

    out
}

/// Full color pass: palette index assignment plus contrast resolution.
///
/// The returned vector is parallel to `blocks`. Recomputed on every render
/// trigger; nothing is cached across passes.
#[must_use]
pub fn assign_colors(
    blocks: &[MappedBlock],
    palette: &Palette,
    base_alpha: f32,
    min_contrast: f32,
    alpha_step: f32,
    seed: u64,
) -> Vec<ColorAssignment> {
    let indices = assign_indices(blocks, palette.len(), seed);
    indices
        .into_iter()
        .map(|palette_index| {
            let base = palette.color(palette_index);
            let resolved = contrast::resolve(base, base_alpha, min_contrast, alpha_step);
            ColorAssignment {
                palette_index,
                base,
                alpha: resolved.alpha,
                background: resolved.background,
                text: resolved.text,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    fn block(name: &str, weekday: u8, start: usize, end: usize) -> MappedBlock {
        MappedBlock {
            name: name.into(),
            teacher: "T".into(),
            location: "R".into(),
            weekday,
            start,
            end,
            weeks: BTreeSet::from([1]),
        }
    }

    #[test]
    fn same_day_stacked_blocks_differ() {
        // Identical identity fields force identical base indices; the
        // walk must still separate vertically adjacent neighbours.
        let blocks = vec![
            block("Analysis", 1, 0, 1),
            block("Analysis", 1, 2, 3),
            block("Analysis", 1, 5, 6),
        ];
        let indices = assign_indices(&blocks, 16, 0);
        assert_ne!(indices[0], indices[1]);
        assert_ne!(indices[1], indices[2]);
    }

    #[test]
    fn adjacent_day_overlap_differs() {
        let blocks = vec![block("Analysis", 1, 2, 3), block("Analysis", 2, 3, 4)];
        let indices = assign_indices(&blocks, 16, 0);
        assert_ne!(indices[0], indices[1]);
    }

    #[test]
    fn non_adjacent_days_may_share() {
        // Days 1 and 3 are not adjacent: no conflict is checked between
        // them, so identical hashes land on related indices. This pins the
        // deliberately local scope of the heuristic.
        let a = block("Analysis", 1, 2, 3);
        let mut c = a.clone();
        c.weekday = 3;
        let indices = assign_indices(&[a, c], 16, 0);
        // base differs only by the weekday index contribution (2).
        assert_eq!((indices[0] + 2) % 16, indices[1]);
    }

    #[test]
    fn attempt_cap_terminates_and_accepts_collision() {
        // Two-color palette; day 2's span faces both indices on day 1 plus
        // any same-day predecessor, so every candidate conflicts and the
        // cap must fire instead of looping.
        let blocks = vec![
            block("A", 1, 0, 0),
            block("B", 1, 1, 1),
            block("C", 2, 0, 1),
        ];
        let indices = assign_indices(&blocks, 2, 0);
        assert_ne!(indices[0], indices[1]);
        assert!(indices[2] < 2);
    }

    #[test]
    fn assignment_is_deterministic() {
        let blocks = vec![
            block("Analysis", 1, 0, 1),
            block("Physics", 1, 2, 3),
            block("Chemistry", 2, 0, 1),
            block("English", 2, 2, 3),
        ];
        let a = assign_indices(&blocks, 16, 7);
        let b = assign_indices(&blocks, 16, 7);
        assert_eq!(a, b);
    }

    #[test]
    fn seed_perturbs_assignment() {
        let blocks = vec![block("Analysis", 1, 0, 1)];
        let a = assign_indices(&blocks, 16, 0);
        let b = assign_indices(&blocks, 16, 1);
        assert_ne!(a, b);
    }

    #[test]
    fn input_order_does_not_leak_into_result() {
        // The walk sorts internally; shuffling the input only permutes the
        // parallel output, not which block gets which index.
        let a = block("Analysis", 1, 0, 1);
        let b = block("Physics", 1, 2, 3);
        let forward = assign_indices(&[a.clone(), b.clone()], 16, 0);
        let reversed = assign_indices(&[b, a], 16, 0);
        assert_eq!(forward[0], reversed[1]);
        assert_eq!(forward[1], reversed[0]);
    }

    #[test]
    fn colors_pass_contrast_floor() {
        let blocks = vec![block("Analysis", 3, 5, 6)];
        let colors = assign_colors(&blocks, &Palette::builtin(), 0.8, 4.5, 0.05, 0);
        assert_eq!(colors.len(), 1);
        let c = &colors[0];
        assert!(c.palette_index < 16);
        assert!(c.alpha >= 0.8);
        assert_eq!(
            c.background,
            ct_core::color::composite_over_white(c.base, c.alpha)
        );
    }
}
