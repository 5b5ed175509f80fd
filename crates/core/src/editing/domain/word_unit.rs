use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable identifier of a transcript unit, unique within a project.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UnitId(String);

impl UnitId {
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

impl fmt::Display for UnitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for UnitId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnitKind {
    Word,
    Filler,
    Silence,
}

impl fmt::Display for UnitKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(match self {
            UnitKind::Word => "word",
            UnitKind::Filler => "filler",
            UnitKind::Silence => "silence",
        })
    }
}

/// One transcript token: a spoken word, a filler phrase, or a silence placeholder.
///
/// `deleted` is the source of truth for whether the unit survives export.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WordUnit {
    pub id: UnitId,
    pub text: String,
    pub start: f64,
    pub end: f64,
    #[serde(rename = "type")]
    pub kind: UnitKind,
    #[serde(default)]
    pub deleted: bool,
    #[serde(default)]
    pub confidence: f32,
}

impl WordUnit {
    pub fn new(id: UnitId, text: impl Into<String>, start: f64, end: f64, kind: UnitKind) -> Self {
        Self {
            id,
            text: text.into(),
            start,
            end,
            kind,
            deleted: false,
            confidence: 1.0,
        }
    }

    pub fn duration(&self) -> f64 {
        self.end - self.start
    }

    /// Point used to attribute the unit to a cut range.
    pub fn midpoint(&self) -> f64 {
        (self.start + self.end) / 2.0
    }

    pub fn is_kept(&self) -> bool {
        !self.deleted
    }
}
