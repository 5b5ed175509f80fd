use super::cut_range::CutRange;
use super::segment_store::SegmentStore;
use super::word_unit::{UnitId, WordUnit};

/// Which way a batch toggle went.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupToggle {
    Deleted,
    Restored,
}

/// Keeps cut ranges and unit deletion flags mutually consistent.
///
/// Word-side operations (`toggle_word`, `toggle_words`) patch the range list;
/// `update_cut_ranges` replaces the ranges and re-derives every flag. A unit
/// belongs to a range when its midpoint lies inside it. Ranges are never
/// merged, so overlapping or abutting ranges are expected.
pub struct CutRangeSync;

impl CutRangeSync {
    /// Flips one unit. Returns the new `deleted` value, or `None` for an unknown id.
    pub fn toggle_word(
        segments: &mut SegmentStore,
        ranges: &mut Vec<CutRange>,
        id: &UnitId,
    ) -> Option<bool> {
        let Some(unit) = segments.get(id).cloned() else {
            log::warn!("toggle ignored: unknown unit {id}");
            return None;
        };

        let now_deleted = !unit.deleted;
        segments.set_deleted(id, now_deleted);

        if now_deleted {
            ranges.push(CutRange::new(unit.start, unit.end));
        } else {
            remove_ranges_covering(ranges, &[unit.midpoint()]);
        }

        log::debug!(
            "unit {id} [{:.3}-{:.3}] {}",
            unit.start,
            unit.end,
            if now_deleted { "deleted" } else { "restored" }
        );
        Some(now_deleted)
    }

    /// Batch toggle. When every selected unit is already deleted the group is
    /// restored; otherwise the whole selection is deleted under one range
    /// spanning it. Unknown ids are skipped; `None` if nothing was selectable.
    pub fn toggle_words(
        segments: &mut SegmentStore,
        ranges: &mut Vec<CutRange>,
        ids: &[UnitId],
    ) -> Option<GroupToggle> {
        let selected: Vec<WordUnit> = ids
            .iter()
            .filter_map(|id| {
                let unit = segments.get(id).cloned();
                if unit.is_none() {
                    log::warn!("batch toggle skipping unknown unit {id}");
                }
                unit
            })
            .collect();

        if selected.is_empty() {
            return None;
        }

        if selected.iter().all(|u| u.deleted) {
            for unit in &selected {
                segments.set_deleted(&unit.id, false);
            }
            let midpoints: Vec<f64> = selected.iter().map(WordUnit::midpoint).collect();
            remove_ranges_covering(ranges, &midpoints);
            log::debug!("restored {} units", selected.len());
            Some(GroupToggle::Restored)
        } else {
            for unit in &selected {
                segments.set_deleted(&unit.id, true);
            }
            let start = selected
                .iter()
                .map(|u| u.start)
                .fold(f64::INFINITY, f64::min);
            let end = selected
                .iter()
                .map(|u| u.end)
                .fold(f64::NEG_INFINITY, f64::max);
            ranges.push(CutRange::new(start, end));
            log::debug!("deleted {} units as [{start:.3}-{end:.3}]", selected.len());
            Some(GroupToggle::Deleted)
        }
    }

    /// Replaces the range list and re-derives every unit flag from it.
    ///
    /// Malformed ranges (non-finite, or `start >= end`) are dropped.
    pub fn update_cut_ranges(
        segments: &mut SegmentStore,
        ranges: &mut Vec<CutRange>,
        new_ranges: Vec<CutRange>,
    ) {
        let (valid, dropped): (Vec<_>, Vec<_>) =
            new_ranges.into_iter().partition(CutRange::is_well_formed);
        for r in &dropped {
            log::warn!(
                "dropping malformed cut range {} [{}-{}]",
                r.id,
                r.start,
                r.end
            );
        }

        *ranges = valid;
        for unit in segments.units_mut() {
            let mid = unit.midpoint();
            unit.deleted = ranges.iter().any(|r| r.contains(mid));
        }
        log::debug!(
            "ranges replaced: {} ranges, {} units deleted",
            ranges.len(),
            segments.deleted_count()
        );
    }

    /// Deletes each listed kept unit under its own range. Already-deleted and
    /// unknown ids are skipped. Returns how many units were deleted.
    pub fn delete_each(
        segments: &mut SegmentStore,
        ranges: &mut Vec<CutRange>,
        ids: &[UnitId],
    ) -> usize {
        let mut count = 0;
        for id in ids {
            let Some(unit) = segments.get(id) else {
                continue;
            };
            if unit.deleted {
                continue;
            }
            let range = CutRange::new(unit.start, unit.end);
            segments.set_deleted(id, true);
            ranges.push(range);
            count += 1;
        }
        count
    }

    /// Clears every flag and every range.
    pub fn restore_all(segments: &mut SegmentStore, ranges: &mut Vec<CutRange>) {
        ranges.clear();
        for unit in segments.units_mut() {
            unit.deleted = false;
        }
    }

    /// True when every unit's flag matches midpoint containment in the ranges.
    pub fn is_consistent(segments: &SegmentStore, ranges: &[CutRange]) -> bool {
        segments.iter().all(|u| {
            let mid = u.midpoint();
            u.deleted == ranges.iter().any(|r| r.contains(mid))
        })
    }
}

fn remove_ranges_covering(ranges: &mut Vec<CutRange>, midpoints: &[f64]) {
    ranges.retain(|r| !midpoints.iter().any(|&m| r.contains(m)));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editing::domain::cut_range::RangeId;
    use crate::editing::domain::word_unit::UnitKind;
    use approx::assert_relative_eq;

    fn unit(id: &str, start: f64, end: f64) -> WordUnit {
        WordUnit::new(UnitId::new(id), id, start, end, UnitKind::Word)
    }

    fn ids(names: &[&str]) -> Vec<UnitId> {
        names.iter().map(|n| UnitId::new(*n)).collect()
    }

    fn sample() -> SegmentStore {
        SegmentStore::new(vec![
            unit("a", 0.0, 1.0),
            unit("b", 1.0, 1.5),
            unit("c", 1.5, 2.0),
            unit("d", 2.0, 3.0),
        ])
    }

    fn deleted_ids(segments: &SegmentStore) -> Vec<String> {
        segments
            .iter()
            .filter(|u| u.deleted)
            .map(|u| u.id.to_string())
            .collect()
    }

    // ── toggle_word ──────────────────────────────────────────────────

    #[test]
    fn test_toggle_word_delete_adds_unit_range() {
        let mut segments = sample();
        let mut ranges = Vec::new();
        let result = CutRangeSync::toggle_word(&mut segments, &mut ranges, &UnitId::new("b"));
        assert_eq!(result, Some(true));
        assert_eq!(ranges.len(), 1);
        assert_relative_eq!(ranges[0].start, 1.0);
        assert_relative_eq!(ranges[0].end, 1.5);
        assert_eq!(deleted_ids(&segments), vec!["b"]);
    }

    #[test]
    fn test_toggle_word_twice_restores_state() {
        let mut segments = sample();
        let mut ranges = Vec::new();
        let id = UnitId::new("c");
        CutRangeSync::toggle_word(&mut segments, &mut ranges, &id);
        let result = CutRangeSync::toggle_word(&mut segments, &mut ranges, &id);
        assert_eq!(result, Some(false));
        assert!(ranges.is_empty());
        assert!(deleted_ids(&segments).is_empty());
        assert!(CutRangeSync::is_consistent(&segments, &ranges));
    }

    #[test]
    fn test_toggle_word_does_not_merge_adjacent_ranges() {
        let mut segments = sample();
        let mut ranges = Vec::new();
        CutRangeSync::toggle_word(&mut segments, &mut ranges, &UnitId::new("b"));
        CutRangeSync::toggle_word(&mut segments, &mut ranges, &UnitId::new("c"));
        assert_eq!(ranges.len(), 2);
    }

    #[test]
    fn test_toggle_word_restore_removes_every_covering_range() {
        let mut segments = sample();
        let mut ranges = Vec::new();
        CutRangeSync::toggle_words(&mut segments, &mut ranges, &ids(&["a", "b", "c"]));
        CutRangeSync::toggle_word(&mut segments, &mut ranges, &UnitId::new("b"));
        // b was already deleted by the group, so the toggle restores it
        assert!(ranges.is_empty());
        assert!(!segments.get(&UnitId::new("b")).unwrap().deleted);
    }

    #[test]
    fn test_toggle_unknown_word_is_noop() {
        let mut segments = sample();
        let mut ranges = Vec::new();
        let before = segments.clone();
        assert_eq!(
            CutRangeSync::toggle_word(&mut segments, &mut ranges, &UnitId::new("zzz")),
            None
        );
        assert_eq!(segments, before);
        assert!(ranges.is_empty());
    }

    // ── toggle_words ─────────────────────────────────────────────────

    #[test]
    fn test_toggle_words_group_delete_adds_one_spanning_range() {
        let mut segments = sample();
        let mut ranges = Vec::new();
        let result = CutRangeSync::toggle_words(&mut segments, &mut ranges, &ids(&["c", "b"]));
        assert_eq!(result, Some(GroupToggle::Deleted));
        assert_eq!(ranges.len(), 1);
        assert_relative_eq!(ranges[0].start, 1.0);
        assert_relative_eq!(ranges[0].end, 2.0);
        assert_eq!(deleted_ids(&segments), vec!["b", "c"]);
    }

    #[test]
    fn test_toggle_words_mixed_selection_deletes_all() {
        let mut segments = sample();
        let mut ranges = Vec::new();
        CutRangeSync::toggle_word(&mut segments, &mut ranges, &UnitId::new("a"));
        let result = CutRangeSync::toggle_words(&mut segments, &mut ranges, &ids(&["a", "b"]));
        assert_eq!(result, Some(GroupToggle::Deleted));
        assert_eq!(deleted_ids(&segments), vec!["a", "b"]);
        assert_eq!(ranges.len(), 2);
    }

    #[test]
    fn test_toggle_words_all_deleted_restores_group() {
        let mut segments = sample();
        let mut ranges = Vec::new();
        CutRangeSync::toggle_words(&mut segments, &mut ranges, &ids(&["b", "c"]));
        let result = CutRangeSync::toggle_words(&mut segments, &mut ranges, &ids(&["b", "c"]));
        assert_eq!(result, Some(GroupToggle::Restored));
        assert!(ranges.is_empty());
        assert!(deleted_ids(&segments).is_empty());
    }

    #[test]
    fn test_toggle_words_empty_or_unknown_selection() {
        let mut segments = sample();
        let mut ranges = Vec::new();
        assert_eq!(
            CutRangeSync::toggle_words(&mut segments, &mut ranges, &[]),
            None
        );
        assert_eq!(
            CutRangeSync::toggle_words(&mut segments, &mut ranges, &ids(&["x", "y"])),
            None
        );
        assert!(ranges.is_empty());
    }

    #[test]
    fn test_toggle_words_skips_unknown_ids() {
        let mut segments = sample();
        let mut ranges = Vec::new();
        let result = CutRangeSync::toggle_words(&mut segments, &mut ranges, &ids(&["x", "d"]));
        assert_eq!(result, Some(GroupToggle::Deleted));
        assert_relative_eq!(ranges[0].start, 2.0);
        assert_relative_eq!(ranges[0].end, 3.0);
    }

    // ── update_cut_ranges ────────────────────────────────────────────

    #[test]
    fn test_update_ranges_rederives_flags_by_midpoint() {
        let mut segments = sample();
        let mut ranges = Vec::new();
        // Ends mid-way through "c" (midpoint 1.75), past the midpoint of "b" (1.25)
        CutRangeSync::update_cut_ranges(
            &mut segments,
            &mut ranges,
            vec![CutRange::new(1.1, 1.7)],
        );
        assert_eq!(deleted_ids(&segments), vec!["b"]);
        assert!(CutRangeSync::is_consistent(&segments, &ranges));
    }

    #[test]
    fn test_update_ranges_clears_flags_outside_new_ranges() {
        let mut segments = sample();
        let mut ranges = Vec::new();
        CutRangeSync::toggle_word(&mut segments, &mut ranges, &UnitId::new("a"));
        CutRangeSync::update_cut_ranges(
            &mut segments,
            &mut ranges,
            vec![CutRange::new(2.0, 3.0)],
        );
        assert_eq!(deleted_ids(&segments), vec!["d"]);
    }

    #[test]
    fn test_update_ranges_keeps_overlaps() {
        let mut segments = sample();
        let mut ranges = Vec::new();
        CutRangeSync::update_cut_ranges(
            &mut segments,
            &mut ranges,
            vec![CutRange::new(0.0, 1.2), CutRange::new(0.5, 1.6)],
        );
        assert_eq!(ranges.len(), 2);
        assert_eq!(deleted_ids(&segments), vec!["a", "b"]);
    }

    #[test]
    fn test_update_ranges_drops_malformed() {
        let mut segments = sample();
        let mut ranges = Vec::new();
        CutRangeSync::update_cut_ranges(
            &mut segments,
            &mut ranges,
            vec![
                CutRange::with_id(RangeId::new("bad"), 2.5, 2.0),
                CutRange::with_id(RangeId::new("good"), 0.0, 1.0),
            ],
        );
        assert_eq!(ranges.len(), 1);
        assert_eq!(ranges[0].id, RangeId::new("good"));
        assert_eq!(deleted_ids(&segments), vec!["a"]);
    }

    #[test]
    fn test_update_ranges_empty_restores_everything() {
        let mut segments = sample();
        let mut ranges = Vec::new();
        CutRangeSync::toggle_words(&mut segments, &mut ranges, &ids(&["a", "b", "c", "d"]));
        CutRangeSync::update_cut_ranges(&mut segments, &mut ranges, Vec::new());
        assert!(deleted_ids(&segments).is_empty());
    }

    // ── bulk helpers ─────────────────────────────────────────────────

    #[test]
    fn test_delete_each_creates_one_range_per_unit() {
        let mut segments = sample();
        let mut ranges = Vec::new();
        CutRangeSync::toggle_word(&mut segments, &mut ranges, &UnitId::new("a"));
        let count = CutRangeSync::delete_each(&mut segments, &mut ranges, &ids(&["a", "c", "q"]));
        assert_eq!(count, 1);
        assert_eq!(ranges.len(), 2);
        assert_eq!(deleted_ids(&segments), vec!["a", "c"]);
    }

    #[test]
    fn test_restore_all() {
        let mut segments = sample();
        let mut ranges = Vec::new();
        CutRangeSync::toggle_words(&mut segments, &mut ranges, &ids(&["a", "d"]));
        CutRangeSync::restore_all(&mut segments, &mut ranges);
        assert!(ranges.is_empty());
        assert_eq!(segments.deleted_count(), 0);
    }

    #[test]
    fn test_is_consistent_detects_divergence() {
        let mut segments = sample();
        segments.set_deleted(&UnitId::new("a"), true);
        assert!(!CutRangeSync::is_consistent(&segments, &[]));
        assert!(CutRangeSync::is_consistent(
            &segments,
            &[CutRange::new(0.0, 1.0)]
        ));
    }
}
