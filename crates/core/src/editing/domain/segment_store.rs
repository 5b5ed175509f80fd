use serde::{Deserialize, Serialize};

use super::word_unit::{UnitId, UnitKind, WordUnit};

/// The canonical ordered sequence of transcript units.
///
/// Order is by `start`; units are looked up by id and flagged in place.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SegmentStore {
    units: Vec<WordUnit>,
}

impl SegmentStore {
    pub fn new(units: Vec<WordUnit>) -> Self {
        Self { units }
    }

    pub fn units(&self) -> &[WordUnit] {
        &self.units
    }

    pub(crate) fn units_mut(&mut self) -> &mut [WordUnit] {
        &mut self.units
    }

    pub fn into_units(self) -> Vec<WordUnit> {
        self.units
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, WordUnit> {
        self.units.iter()
    }

    pub fn get(&self, id: &UnitId) -> Option<&WordUnit> {
        self.units.iter().find(|u| &u.id == id)
    }

    pub fn position(&self, id: &UnitId) -> Option<usize> {
        self.units.iter().position(|u| &u.id == id)
    }

    /// Sets the flag and returns the previous value, or `None` for an unknown id.
    pub fn set_deleted(&mut self, id: &UnitId, deleted: bool) -> Option<bool> {
        let unit = self.units.iter_mut().find(|u| &u.id == id)?;
        let previous = unit.deleted;
        unit.deleted = deleted;
        Some(previous)
    }

    pub fn push(&mut self, unit: WordUnit) {
        self.units.push(unit);
    }

    /// Whether start times are monotonic non-decreasing.
    pub fn is_sorted(&self) -> bool {
        self.units.windows(2).all(|w| w[0].start <= w[1].start)
    }

    /// Stable sort by start time; ties keep their relative order.
    pub fn sort_by_start(&mut self) {
        self.units.sort_by(|a, b| a.start.total_cmp(&b.start));
    }

    pub fn deleted_count(&self) -> usize {
        self.units.iter().filter(|u| u.deleted).count()
    }

    pub fn kept_count(&self) -> usize {
        self.units.len() - self.deleted_count()
    }

    pub fn ids_where(&self, predicate: impl Fn(&WordUnit) -> bool) -> Vec<UnitId> {
        self.units
            .iter()
            .filter(|u| predicate(u))
            .map(|u| u.id.clone())
            .collect()
    }

    /// Spoken text that survives export, silence placeholders omitted.
    pub fn kept_text(&self) -> String {
        self.units
            .iter()
            .filter(|u| u.is_kept() && u.kind != UnitKind::Silence)
            .map(|u| u.text.as_str())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl From<Vec<WordUnit>> for SegmentStore {
    fn from(units: Vec<WordUnit>) -> Self {
        Self::new(units)
    }
}

impl<'a> IntoIterator for &'a SegmentStore {
    type Item = &'a WordUnit;
    type IntoIter = std::slice::Iter<'a, WordUnit>;

    fn into_iter(self) -> Self::IntoIter {
        self.units.iter()
    }
}
