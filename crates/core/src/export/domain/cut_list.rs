use crate::editing::domain::project_settings::Padding;
use crate::editing::domain::word_unit::WordUnit;

/// A maximal run of kept content, padded and clamped to the media.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct KeptInterval {
    pub start: f64,
    pub end: f64,
}

impl KeptInterval {
    pub fn duration(&self) -> f64 {
        self.end - self.start
    }
}

pub fn total_duration(intervals: &[KeptInterval]) -> f64 {
    intervals.iter().map(KeptInterval::duration).sum()
}

/// Length of the joined audio: every cross-fade overlaps its two neighbours
/// by `crossfade_duration`.
pub fn rendered_duration(intervals: &[KeptInterval], crossfade_duration: f64) -> f64 {
    let joins = intervals.len().saturating_sub(1) as f64;
    (total_duration(intervals) - joins * crossfade_duration).max(0.0)
}

/// Collapses the unit sequence into kept intervals.
///
/// Consecutive kept units extend one run; any deleted unit closes it. Each
/// run is padded on both sides and clamped to `[0, duration]` independently,
/// so neighbouring intervals may touch or overlap when padding exceeds the
/// gap between them.
pub struct CutListReducer;

impl CutListReducer {
    pub fn reduce(units: &[WordUnit], padding: Padding, duration: f64) -> Vec<KeptInterval> {
        let mut kept = Vec::new();
        let mut open: Option<KeptInterval> = None;

        for unit in units {
            if unit.deleted {
                if let Some(run) = open.take() {
                    kept.push(pad(run, padding, duration));
                }
                continue;
            }
            match open.as_mut() {
                Some(run) => run.end = unit.end,
                None => {
                    open = Some(KeptInterval {
                        start: unit.start,
                        end: unit.end,
                    })
                }
            }
        }

        if let Some(run) = open {
            kept.push(pad(run, padding, duration));
        }
        kept
    }
}

fn pad(run: KeptInterval, padding: Padding, duration: f64) -> KeptInterval {
    KeptInterval {
        start: (run.start - padding.start).max(0.0),
        end: (run.end + padding.end).min(duration),
    }
}
