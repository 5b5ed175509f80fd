use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RangeId(String);

impl RangeId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RangeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A marked-for-deletion time span as manipulated on the timeline.
///
/// Stored independently of the unit flags; ranges may overlap or sit
/// back-to-back without being merged.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CutRange {
    pub id: RangeId,
    pub start: f64,
    pub end: f64,
}

impl CutRange {
    pub fn new(start: f64, end: f64) -> Self {
        Self {
            id: RangeId::generate(),
            start,
            end,
        }
    }

    pub fn with_id(id: RangeId, start: f64, end: f64) -> Self {
        Self { id, start, end }
    }

    /// Inclusive on both edges.
    pub fn contains(&self, time: f64) -> bool {
        self.start <= time && time <= self.end
    }

    pub fn duration(&self) -> f64 {
        self.end - self.start
    }

    pub fn is_well_formed(&self) -> bool {
        self.start.is_finite() && self.end.is_finite() && self.start < self.end
    }
}
