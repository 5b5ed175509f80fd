pub mod audio_segment;
pub mod filler_lexicon;
pub mod silence_detector;
pub mod speech_recognizer;
pub mod transcript;
pub mod transcript_builder;
pub mod transcription_error;
