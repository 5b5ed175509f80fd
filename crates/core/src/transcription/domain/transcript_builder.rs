use super::filler_lexicon::is_filler;
use super::silence_detector::SilenceGap;
use super::transcript::TranscriptWord;
use crate::editing::domain::segment_store::SegmentStore;
use crate::editing::domain::word_unit::{UnitId, UnitKind, WordUnit};

const DEFAULT_LANGUAGE: &str = "en";

/// Builds the ordered unit sequence of a fresh project from recognizer output.
///
/// Words are classified as word or filler by language; silence gaps become
/// placeholder units like `[1.2s]`. Times are rounded to milliseconds and
/// clamped to the media duration.
pub struct TranscriptBuilder {
    language: String,
}

impl TranscriptBuilder {
    pub fn new(language: Option<&str>) -> Self {
        Self {
            language: language.unwrap_or(DEFAULT_LANGUAGE).to_string(),
        }
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    pub fn build(
        &self,
        words: &[TranscriptWord],
        silences: &[SilenceGap],
        duration: f64,
    ) -> SegmentStore {
        let mut units = Vec::with_capacity(words.len() + silences.len());

        for word in words {
            let text = word.text.trim();
            if text.is_empty() {
                continue;
            }
            let kind = if is_filler(text, &self.language) {
                UnitKind::Filler
            } else {
                UnitKind::Word
            };
            let mut unit = WordUnit::new(
                UnitId::generate(),
                text,
                round_ms(word.start),
                round_ms(word.end),
                kind,
            );
            unit.confidence = round_ms(word.confidence as f64) as f32;
            units.push(unit);
        }

        for gap in silences {
            let seconds = (gap.duration() * 10.0).round() / 10.0;
            units.push(WordUnit::new(
                UnitId::generate(),
                format!("[{seconds:.1}s]"),
                round_ms(gap.start),
                round_ms(gap.end),
                UnitKind::Silence,
            ));
        }

        let mut store = SegmentStore::new(
            units
                .into_iter()
                .filter_map(|u| clamp_to_duration(u, duration))
                .collect(),
        );
        store.sort_by_start();
        store
    }
}

fn round_ms(seconds: f64) -> f64 {
    (seconds * 1000.0).round() / 1000.0
}

fn clamp_to_duration(mut unit: WordUnit, duration: f64) -> Option<WordUnit> {
    unit.start = unit.start.max(0.0);
    if duration > 0.0 {
        unit.end = unit.end.min(duration);
    }
    if unit.end > unit.start {
        Some(unit)
    } else {
        log::debug!(
            "dropping empty unit '{}' [{}-{}]",
            unit.text,
            unit.start,
            unit.end
        );
        None
    }
}
