use ct_core::block::MappedBlock;
use ct_core::record::CourseRecord;
use ct_core::slots;

/// Map one raw record into break-free contiguous blocks.
///
/// Each raw period resolves to its slot index; periods landing on a break
/// row or outside 1..=12 are silently dropped. The surviving indices are
/// sorted and scanned for maximal consecutive runs; one block is emitted
/// per run. A course whose periods straddle a break therefore decomposes
/// into several blocks.
///
/// # Example
/// ```
/// use ct_core::record::CourseRecord;
/// use ct_layout::mapper::map_record;
/// let record: CourseRecord = serde_json::from_str(
///     r#"{"name":"Analysis","weekday":1,"periods":[3,4,6,7],"weeks":[1]}"#,
/// ).unwrap();
/// let blocks = map_record(&record);
/// assert_eq!(blocks.len(), 2);
/// assert_eq!((blocks[0].start, blocks[0].end), (2, 3));
/// assert_eq!((blocks[1].start, blocks[1].end), (5, 6));
/// ```
#[must_use]
pub fn map_record(record: &CourseRecord) -> Vec<MappedBlock> {
    if !record.weekday_in_range() {
        log::debug!(
            "dropping record '{}': weekday {} out of range",
            record.name,
            record.weekday
        );
        return Vec::new();
    }

    let mut indices: Vec<usize> = record
        .periods
        .iter()
        .filter_map(|&period| match slots::slot_index(period) {
            Some(index) if !slots::is_break(index) => Some(index),
            Some(_) => {
                log::debug!("dropping break period {period} for '{}'", record.name);
                None
            }
            None => {
                log::debug!("dropping unknown period {period} for '{}'", record.name);
                None
            }
        })
        .collect();

    indices.sort_unstable();
    indices.dedup();

    let mut blocks = Vec::new();
    let mut run_start = match indices.first() {
        Some(&first) => first,
        None => return blocks,
    };
    let mut previous = run_start;

    for &index in &indices[1..] {
        if index != previous + 1 {
            blocks.push(block_from(record, run_start, previous));
            run_start = index;
        }
        previous = index;
    }
    blocks.push(block_from(record, run_start, previous));
    blocks
}

fn block_from(record: &CourseRecord, start: usize, end: usize) -> MappedBlock {
    MappedBlock {
        name: record.name.clone(),
        teacher: record.teacher.clone(),
        location: record.location.clone(),
        weekday: record.weekday,
        start,
        end,
        weeks: record.weeks.clone(),
    }
}

/// Map every record of a schedule fetch.
#[must_use]
pub fn map_records(records: &[CourseRecord]) -> Vec<MappedBlock> {
    records.iter().flat_map(|r| map_record(r)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use ct_core::slots::is_break;

    fn record(periods: &[u8]) -> CourseRecord {
        CourseRecord {
            name: "Analysis".into(),
            teacher: "Wang".into(),
            location: "A-301".into(),
            weekday: 1,
            periods: periods.to_vec(),
            weeks: [1, 2].into(),
        }
    }

    #[test]
    fn straddling_record_splits_in_two() {
        let blocks = map_record(&record(&[3, 4, 6, 7]));
        assert_eq!(blocks.len(), 2);
        assert_eq!((blocks[0].start, blocks[0].end), (2, 3));
        assert_eq!((blocks[1].start, blocks[1].end), (5, 6));
    }

    #[test]
    fn no_block_covers_a_break() {
        // Every break period present in the input must vanish.
        let blocks = map_record(&record(&[4, 5, 6, 9, 10, 11]));
        for block in &blocks {
            for row in block.start..=block.end {
                assert!(!is_break(row), "block covers break row {row}");
            }
        }
        assert_eq!(blocks.len(), 4);
    }

    #[test]
    fn break_only_record_maps_to_nothing() {
        assert!(map_record(&record(&[5, 10])).is_empty());
        assert!(map_record(&record(&[])).is_empty());
    }

    #[test]
    fn out_of_range_periods_are_dropped() {
        let blocks = map_record(&record(&[0, 1, 2, 13, 255]));
        assert_eq!(blocks.len(), 1);
        assert_eq!((blocks[0].start, blocks[0].end), (0, 1));
    }

    #[test]
    fn unsorted_duplicated_input_is_normalized() {
        let blocks = map_record(&record(&[7, 6, 7, 6]));
        assert_eq!(blocks.len(), 1);
        assert_eq!((blocks[0].start, blocks[0].end), (5, 6));
    }

    #[test]
    fn evening_run_stays_contiguous() {
        let blocks = map_record(&record(&[11, 12]));
        assert_eq!(blocks.len(), 1);
        assert_eq!((blocks[0].start, blocks[0].end), (10, 11));
    }

    #[test]
    fn bad_weekday_drops_whole_record() {
        let mut r = record(&[1, 2]);
        r.weekday = 0;
        assert!(map_record(&r).is_empty());
        r.weekday = 8;
        assert!(map_record(&r).is_empty());
    }

    #[test]
    fn blocks_inherit_identity_and_weeks() {
        let blocks = map_record(&record(&[1, 2]));
        assert_eq!(blocks[0].name, "Analysis");
        assert_eq!(blocks[0].teacher, "Wang");
        assert_eq!(blocks[0].location, "A-301");
        assert!(blocks[0].weeks.contains(&2));
    }
}
