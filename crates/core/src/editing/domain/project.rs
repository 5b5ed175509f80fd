use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::cut_range::CutRange;
use super::edit_history::HistoryEntry;
use super::project_settings::ProjectSettings;
use super::segment_store::SegmentStore;

/// The editable aggregate: transcript units, cut ranges, media duration and
/// settings. Saved whole and replaced whole on load.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub source_path: PathBuf,
    pub duration: f64,
    /// False for audio-only sources; export then renders audio alone.
    #[serde(default = "has_video_default")]
    pub has_video: bool,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub settings: ProjectSettings,
    pub segments: SegmentStore,
    #[serde(default)]
    pub cut_ranges: Vec<CutRange>,
}

impl Project {
    pub fn new(source_path: impl Into<PathBuf>, duration: f64, segments: SegmentStore) -> Self {
        Self {
            source_path: source_path.into(),
            duration,
            has_video: true,
            language: None,
            model: None,
            settings: ProjectSettings::default(),
            segments,
            cut_ranges: Vec::new(),
        }
    }

    pub fn with_settings(mut self, settings: ProjectSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn with_video(mut self, has_video: bool) -> Self {
        self.has_video = has_video;
        self
    }

    pub fn snapshot(&self) -> HistoryEntry {
        HistoryEntry {
            segments: self.segments.clone(),
            cut_ranges: self.cut_ranges.clone(),
        }
    }

    pub fn restore(&mut self, entry: HistoryEntry) {
        self.segments = entry.segments;
        self.cut_ranges = entry.cut_ranges;
    }
}

fn has_video_default() -> bool {
    true
}
