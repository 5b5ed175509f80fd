//! Text-driven media editing: a transcript of word units is the editing
//! surface, and deletions are rendered into an ffmpeg trim/concat/cross-fade
//! command.

pub mod editing;
pub mod export;
pub mod media;
pub mod persistence;
pub mod pipeline;
pub mod shared;
pub mod transcription;
