/// Nombre de lignes de la grille : 12 périodes fixes, pauses comprises.
pub const SLOT_COUNT: usize = 12;

/// Nombre de colonnes : lundi à dimanche.
pub const WEEKDAY_COUNT: usize = 7;

/// Durée du semestre en semaines. Au-delà : vacances.
pub const TOTAL_WEEKS: u16 = 18;

/// Weekday column headers, Monday first (weekday 1 = Monday).
pub const WEEKDAY_LABELS: [&str; WEEKDAY_COUNT] = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];

/// Kind of a grid row.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SlotKind {
    /// Regular period row, can host a course block.
    Course,
    /// Break row (midday or evening). Never hosts a block.
    Break,
}

/// One row of the fixed timetable grid.
///
/// # Example
/// ```
/// use ct_core::slots::{TIME_SLOTS, SlotKind};
/// assert_eq!(TIME_SLOTS.len(), 12);
/// assert_eq!(TIME_SLOTS[4].kind, SlotKind::Break);
/// ```
#[derive(Clone, Copy, Debug)]
pub struct TimeSlot {
    /// Period label shown in the time gutter ("1".."12", or a break label).
    pub label: &'static str,
    /// Human time range for the row.
    pub range: &'static str,
    /// Course row or break row.
    pub kind: SlotKind,
}

const fn course(label: &'static str, range: &'static str) -> TimeSlot {
    TimeSlot {
        label,
        range,
        kind: SlotKind::Course,
    }
}

const fn pause(label: &'static str, range: &'static str) -> TimeSlot {
    TimeSlot {
        label,
        range,
        kind: SlotKind::Break,
    }
}

/// Table fixe des 12 créneaux. Les périodes 5 et 10 sont les pauses
/// (midi et soir) et n'hébergent jamais de bloc.
pub const TIME_SLOTS: [TimeSlot; SLOT_COUNT] = [
    course("1", "08:00-08:45"),
    course("2", "08:55-09:40"),
    course("3", "10:00-10:45"),
    course("4", "10:55-11:40"),
    pause("Lunch", "11:40-14:00"),
    course("6", "14:00-14:45"),
    course("7", "14:55-15:40"),
    course("8", "16:00-16:45"),
    course("9", "16:55-17:40"),
    pause("Dinner", "17:40-19:00"),
    course("11", "19:00-19:45"),
    course("12", "19:55-20:40"),
];

/// Resolve a raw period number (1..=12) to its slot index.
///
/// Returns `None` for out-of-range periods; those are dropped by the
/// mapper, not reported.
///
/// # Example
/// ```
/// use ct_core::slots::slot_index;
/// assert_eq!(slot_index(1), Some(0));
/// assert_eq!(slot_index(12), Some(11));
/// assert_eq!(slot_index(0), None);
/// assert_eq!(slot_index(13), None);
/// ```
#[must_use]
pub fn slot_index(period: u8) -> Option<usize> {
    if (1..=SLOT_COUNT as u8).contains(&period) {
        Some(usize::from(period) - 1)
    } else {
        None
    }
}

/// True if the slot at `index` is a break row.
///
/// # Example
/// ```
/// use ct_core::slots::is_break;
/// assert!(is_break(4));
/// assert!(is_break(9));
/// assert!(!is_break(0));
/// ```
#[must_use]
pub fn is_break(index: usize) -> bool {
    index < SLOT_COUNT && matches!(TIME_SLOTS[index].kind, SlotKind::Break)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exactly_two_breaks() {
        let breaks: Vec<usize> = (0..SLOT_COUNT).filter(|&i| is_break(i)).collect();
        assert_eq!(breaks, vec![4, 9]);
    }

    #[test]
    fn period_index_roundtrip() {
        for period in 1..=12u8 {
            assert_eq!(slot_index(period), Some(usize::from(period) - 1));
        }
    }

    #[test]
    fn out_of_range_is_none() {
        assert_eq!(slot_index(0), None);
        assert_eq!(slot_index(13), None);
        assert_eq!(slot_index(255), None);
        assert!(!is_break(SLOT_COUNT));
    }
}
