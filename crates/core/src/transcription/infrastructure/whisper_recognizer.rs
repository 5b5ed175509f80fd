use std::path::{Path, PathBuf};

use whisper_rs::{
    get_lang_str, FullParams, SamplingStrategy, WhisperContext, WhisperContextParameters,
};

use crate::transcription::domain::audio_segment::AudioSegment;
use crate::transcription::domain::speech_recognizer::SpeechRecognizer;
use crate::transcription::domain::transcript::{Recognition, TranscriptWord};

/// Speech recognizer using whisper.cpp via whisper-rs.
///
/// Whisper emits sub-word tokens; a token that starts with whitespace opens
/// a new word, any other token is glued onto the current one. Scripts written
/// without spaces (Chinese, Japanese) get one word per token instead.
#[derive(Debug)]
pub struct WhisperRecognizer {
    model_path: PathBuf,
    language: Option<String>,
    threads: usize,
}

impl WhisperRecognizer {
    pub fn new(model_path: &Path) -> Result<Self, Box<dyn std::error::Error>> {
        if !model_path.exists() {
            return Err(format!("Whisper model not found at: {}", model_path.display()).into());
        }
        Ok(Self {
            model_path: model_path.to_path_buf(),
            language: None,
            threads: default_threads(),
        })
    }

    /// Fixes the spoken language; `None` lets Whisper detect it.
    pub fn with_language(mut self, language: Option<&str>) -> Self {
        self.language = language.map(str::to_string);
        self
    }

    pub fn model_path(&self) -> &Path {
        &self.model_path
    }
}

impl SpeechRecognizer for WhisperRecognizer {
    fn transcribe(&self, audio: &AudioSegment) -> Result<Recognition, Box<dyn std::error::Error>> {
        let ctx = WhisperContext::new_with_params(
            self.model_path.to_str().ok_or("Invalid model path")?,
            WhisperContextParameters::default(),
        )
        .map_err(|e| format!("Failed to load Whisper model: {e}"))?;

        let mut state = ctx
            .create_state()
            .map_err(|e| format!("Failed to create Whisper state: {e}"))?;

        let mut params = FullParams::new(SamplingStrategy::Greedy { best_of: 1 });
        params.set_language(Some(self.language.as_deref().unwrap_or("auto")));
        params.set_translate(false);
        params.set_token_timestamps(true);
        params.set_print_special(false);
        params.set_print_progress(false);
        params.set_print_realtime(false);
        params.set_print_timestamps(false);
        params.set_n_threads(self.threads as i32);

        log::info!(
            "Transcribing {:.1}s of audio with {}",
            audio.duration(),
            self.model_path.display()
        );
        state
            .full(params, audio.samples())
            .map_err(|e| format!("Whisper inference failed: {e}"))?;

        let language = match &self.language {
            Some(language) => Some(language.clone()),
            None => {
                let detected = get_lang_str(state.full_lang_id_from_state()).map(str::to_string);
                log::info!("Detected language: {}", detected.as_deref().unwrap_or("unknown"));
                detected
            }
        };

        let mut merger = WordMerger::default();
        let num_segments = state.full_n_segments();

        for seg_idx in 0..num_segments {
            let Some(segment) = state.get_segment(seg_idx) else {
                continue;
            };

            for tok_idx in 0..segment.n_tokens() {
                let Some(token) = segment.get_token(tok_idx) else {
                    continue;
                };
                let Ok(text) = token.to_str() else {
                    continue;
                };
                let data = token.token_data();
                // Token timestamps are in centiseconds
                merger.push(
                    text,
                    data.t0 as f64 / 100.0,
                    data.t1 as f64 / 100.0,
                    token.token_probability(),
                );
            }
            merger.finish_word();
        }

        Ok(Recognition {
            words: merger.into_words(),
            language,
        })
    }
}

/// Accumulates Whisper tokens into whole words.
#[derive(Default)]
struct WordMerger {
    words: Vec<TranscriptWord>,
    current: Option<PendingWord>,
}

struct PendingWord {
    text: String,
    start: f64,
    end: f64,
    probabilities: Vec<f32>,
}

impl WordMerger {
    fn push(&mut self, token: &str, start: f64, end: f64, probability: f32) {
        let trimmed = token.trim();
        // Special tokens: [_BEG_], [_TT_123], <|endoftext|>, ...
        if trimmed.is_empty() || trimmed.starts_with('[') || trimmed.starts_with('<') {
            return;
        }
        if end < start {
            return;
        }

        let after_unspaced = self
            .current
            .as_ref()
            .is_some_and(|w| w.text.chars().any(is_unspaced_script));
        let opens_word = token.starts_with(char::is_whitespace)
            || trimmed.starts_with(is_unspaced_script)
            || (after_unspaced && starts_alphanumeric(trimmed));
        match self.current.as_mut() {
            Some(word) if !opens_word => {
                word.text.push_str(trimmed);
                word.end = word.end.max(end);
                word.probabilities.push(probability);
            }
            _ => {
                self.finish_word();
                self.current = Some(PendingWord {
                    text: trimmed.to_string(),
                    start,
                    end,
                    probabilities: vec![probability],
                });
            }
        }
    }

    fn finish_word(&mut self) {
        let Some(word) = self.current.take() else {
            return;
        };
        if word.end <= word.start {
            return;
        }
        let confidence =
            word.probabilities.iter().sum::<f32>() / word.probabilities.len().max(1) as f32;
        self.words.push(TranscriptWord {
            text: word.text,
            start: word.start,
            end: word.end,
            confidence,
        });
    }

    fn into_words(mut self) -> Vec<TranscriptWord> {
        self.finish_word();
        self.words
    }
}

/// Han ideographs and kana. Full-width punctuation is excluded so it stays
/// attached to the preceding word.
fn is_unspaced_script(c: char) -> bool {
    matches!(c,
        '\u{3040}'..='\u{30FF}'
        | '\u{3400}'..='\u{4DBF}'
        | '\u{4E00}'..='\u{9FFF}'
        | '\u{F900}'..='\u{FAFF}'
        | '\u{20000}'..='\u{2A6DF}')
}

fn starts_alphanumeric(text: &str) -> bool {
    text.chars().next().is_some_and(char::is_alphanumeric)
}

fn default_threads() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
        .min(4)
}
