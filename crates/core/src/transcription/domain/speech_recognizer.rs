use super::audio_segment::AudioSegment;
use super::transcript::Recognition;

/// Domain interface for speech-to-text transcription.
///
/// Implementations run inference on 16 kHz mono audio and return
/// word-level timestamps.
pub trait SpeechRecognizer: Send {
    fn transcribe(&self, audio: &AudioSegment) -> Result<Recognition, Box<dyn std::error::Error>>;
}
