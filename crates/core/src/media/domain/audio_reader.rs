use std::path::Path;

use crate::transcription::domain::audio_segment::AudioSegment;

/// Domain interface for decoding the soundtrack of a media file.
pub trait AudioReader: Send {
    /// Decode the best audio stream to mono PCM at `target_sample_rate`.
    /// Returns None if the file has no audio stream.
    fn read_audio(
        &self,
        path: &Path,
        target_sample_rate: u32,
    ) -> Result<Option<AudioSegment>, Box<dyn std::error::Error>>;
}
