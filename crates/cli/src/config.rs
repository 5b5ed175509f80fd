use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use talkcut_core::editing::domain::project_settings::ProjectSettings;
use talkcut_core::shared::constants::{
    DEFAULT_CRF, DEFAULT_CROSSFADE_DURATION, DEFAULT_PADDING_END, DEFAULT_PADDING_START,
    DEFAULT_SILENCE_THRESHOLD, DEFAULT_WHISPER_MODEL, WHISPER_MODELS,
};

/// User defaults, stored as JSON under the platform config directory.
/// Command-line flags override these per invocation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub model: String,
    pub language: Option<String>,
    pub padding_start: f64,
    pub padding_end: f64,
    pub crossfade_duration: f64,
    pub silence_threshold: f64,
    pub crf: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            model: DEFAULT_WHISPER_MODEL.to_string(),
            language: None,
            padding_start: DEFAULT_PADDING_START,
            padding_end: DEFAULT_PADDING_END,
            crossfade_duration: DEFAULT_CROSSFADE_DURATION,
            silence_threshold: DEFAULT_SILENCE_THRESHOLD,
            crf: DEFAULT_CRF,
        }
    }
}

pub const KEYS: &[&str] = &[
    "model",
    "language",
    "padding_start",
    "padding_end",
    "crossfade_duration",
    "silence_threshold",
    "crf",
];

impl Settings {
    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("TalkCut").join("settings.json"))
    }

    /// Missing or unreadable settings fall back to defaults.
    pub fn load() -> Self {
        Self::config_path()
            .map(|path| Self::load_from(&path))
            .unwrap_or_default()
    }

    pub fn load_from(path: &Path) -> Self {
        fs::read_to_string(path)
            .ok()
            .and_then(|json| serde_json::from_str(&json).ok())
            .unwrap_or_default()
    }

    pub fn save(&self) -> Result<PathBuf, Box<dyn std::error::Error>> {
        let path = Self::config_path().ok_or("could not determine config directory")?;
        self.save_to(&path)?;
        Ok(path)
    }

    pub fn save_to(&self, path: &Path) -> Result<(), Box<dyn std::error::Error>> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }

    pub fn project_settings(&self) -> ProjectSettings {
        ProjectSettings {
            padding_start: self.padding_start,
            padding_end: self.padding_end,
            crossfade_duration: self.crossfade_duration,
            silence_threshold: self.silence_threshold,
        }
    }

    /// Updates one key from its textual value, validating it.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), Box<dyn std::error::Error>> {
        match key {
            "model" => {
                if !WHISPER_MODELS.contains(&value) {
                    return Err(format!(
                        "Model must be one of: {}, got '{value}'",
                        WHISPER_MODELS.join(", ")
                    )
                    .into());
                }
                self.model = value.to_string();
            }
            "language" => {
                self.language = match value {
                    "" | "auto" => None,
                    code => Some(code.to_string()),
                };
            }
            "padding_start" => self.padding_start = parse_seconds(key, value)?,
            "padding_end" => self.padding_end = parse_seconds(key, value)?,
            "crossfade_duration" => self.crossfade_duration = parse_seconds(key, value)?,
            "silence_threshold" => {
                let v = parse_seconds(key, value)?;
                if v == 0.0 {
                    return Err("silence_threshold must be greater than zero".into());
                }
                self.silence_threshold = v;
            }
            "crf" => {
                let crf: u32 = value.parse()?;
                if crf > 51 {
                    return Err(format!("CRF must be between 0 and 51, got {crf}").into());
                }
                self.crf = crf;
            }
            _ => {
                return Err(format!(
                    "Unknown setting '{key}' (expected one of: {})",
                    KEYS.join(", ")
                )
                .into())
            }
        }
        Ok(())
    }
}

fn parse_seconds(key: &str, value: &str) -> Result<f64, Box<dyn std::error::Error>> {
    let v: f64 = value
        .parse()
        .map_err(|_| format!("{key} must be a number of seconds, got '{value}'"))?;
    if !v.is_finite() || v < 0.0 {
        return Err(format!("{key} must be a non-negative number of seconds, got {value}").into());
    }
    Ok(v)
}
