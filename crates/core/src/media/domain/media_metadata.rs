/// Container-level facts about a source file, gathered without decoding.
#[derive(Clone, Debug, PartialEq)]
pub struct MediaMetadata {
    /// Seconds; 0.0 when the container does not report a duration.
    pub duration: f64,
    pub has_audio: bool,
    pub has_video: bool,
}

impl MediaMetadata {
    pub fn is_audio_only(&self) -> bool {
        self.has_audio && !self.has_video
    }
}
