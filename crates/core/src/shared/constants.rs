/// Whisper models the transcription step accepts.
pub const WHISPER_MODELS: &[&str] = &[
    "tiny", "tiny.en", "base", "base.en", "small", "small.en", "medium", "medium.en", "large-v3",
];
pub const DEFAULT_WHISPER_MODEL: &str = "base";
pub const WHISPER_MODEL_BASE_URL: &str =
    "https://huggingface.co/ggerganov/whisper.cpp/resolve/main";
pub const WHISPER_SAMPLE_RATE: u32 = 16000;

/// Gaps between speech shorter than this are not turned into silence units.
pub const MIN_SILENCE_DURATION: f64 = 0.5;

/// Undo depth (oldest snapshot dropped beyond this).
pub const HISTORY_LIMIT: usize = 50;

pub const DEFAULT_PADDING_START: f64 = 0.05;
pub const DEFAULT_PADDING_END: f64 = 0.05;
pub const DEFAULT_CROSSFADE_DURATION: f64 = 0.02;
pub const DEFAULT_SILENCE_THRESHOLD: f64 = 0.5;

/// H.264 CRF used for exports unless overridden.
pub const DEFAULT_CRF: u32 = 18;

/// ggml file name for a Whisper model id, e.g. `base` -> `ggml-base.bin`.
pub fn whisper_model_filename(model: &str) -> String {
    format!("ggml-{model}.bin")
}

pub fn whisper_model_url(model: &str) -> String {
    format!(
        "{WHISPER_MODEL_BASE_URL}/{}",
        whisper_model_filename(model)
    )
}
