use std::path::PathBuf;

use thiserror::Error;

use crate::shared::model_resolver::ModelResolveError;

/// Terminal failure of a transcription run. No partial transcript survives.
#[derive(Error, Debug)]
pub enum TranscriptionError {
    #[error("input file not found: {0}")]
    MissingInput(PathBuf),
    #[error("could not read media {path}: {message}")]
    Probe { path: PathBuf, message: String },
    #[error("no audio track in {0}")]
    NoAudioTrack(PathBuf),
    #[error("could not decode audio from {path}: {message}")]
    Decode { path: PathBuf, message: String },
    #[error("speech recognition failed: {0}")]
    Recognition(String),
    #[error("could not resolve whisper model: {0}")]
    ModelResolve(#[from] ModelResolveError),
}
