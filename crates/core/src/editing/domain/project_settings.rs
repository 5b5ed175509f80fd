use serde::{Deserialize, Serialize};

use super::edit_error::EditError;
use crate::shared::constants::{
    DEFAULT_CROSSFADE_DURATION, DEFAULT_PADDING_END, DEFAULT_PADDING_START,
    DEFAULT_SILENCE_THRESHOLD,
};

/// Seconds added back to each kept run's edges.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Padding {
    pub start: f64,
    pub end: f64,
}

impl Padding {
    pub fn new(start: f64, end: f64) -> Self {
        Self { start, end }
    }

    pub fn none() -> Self {
        Self::new(0.0, 0.0)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectSettings {
    pub padding_start: f64,
    pub padding_end: f64,
    pub crossfade_duration: f64,
    pub silence_threshold: f64,
}

impl Default for ProjectSettings {
    fn default() -> Self {
        Self {
            padding_start: DEFAULT_PADDING_START,
            padding_end: DEFAULT_PADDING_END,
            crossfade_duration: DEFAULT_CROSSFADE_DURATION,
            silence_threshold: DEFAULT_SILENCE_THRESHOLD,
        }
    }
}

impl ProjectSettings {
    pub fn padding(&self) -> Padding {
        Padding::new(self.padding_start, self.padding_end)
    }

    pub fn validate(&self) -> Result<(), EditError> {
        non_negative("padding_start", self.padding_start)?;
        non_negative("padding_end", self.padding_end)?;
        non_negative("crossfade_duration", self.crossfade_duration)?;
        if !(self.silence_threshold.is_finite() && self.silence_threshold > 0.0) {
            return Err(EditError::InvalidSettings {
                field: "silence_threshold",
                value: self.silence_threshold,
                reason: "must be greater than zero",
            });
        }
        Ok(())
    }
}

fn non_negative(field: &'static str, value: f64) -> Result<(), EditError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(EditError::InvalidSettings {
            field,
            value,
            reason: "must be zero or positive",
        })
    }
}
