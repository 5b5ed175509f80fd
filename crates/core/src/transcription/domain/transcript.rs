/// A recognized word with timing, as produced by a speech recognizer.
#[derive(Clone, Debug, PartialEq)]
pub struct TranscriptWord {
    pub text: String,
    pub start: f64,
    pub end: f64,
    pub confidence: f32,
}

impl TranscriptWord {
    pub fn duration(&self) -> f64 {
        self.end - self.start
    }
}

/// Everything a recognizer reports for one file.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Recognition {
    pub words: Vec<TranscriptWord>,
    /// Language code the words are in, when known.
    pub language: Option<String>,
}
