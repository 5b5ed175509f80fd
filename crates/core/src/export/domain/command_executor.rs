use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use super::command_synthesizer::ExportCommand;
use super::export_error::ExportError;

/// Progress callback receiving a percentage in `[0, 100]`.
/// Returning `false` asks the executor to stop.
pub type ProgressFn = Box<dyn Fn(f64) -> bool + Send>;

/// Configuration for one render run.
pub struct ExecutionConfig {
    /// Length of the rendered output in seconds, used to normalise progress.
    pub expected_duration: f64,
    pub on_progress: Option<ProgressFn>,
    pub cancelled: Arc<AtomicBool>,
}

impl ExecutionConfig {
    pub fn new(expected_duration: f64) -> Self {
        Self {
            expected_duration,
            on_progress: None,
            cancelled: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn with_progress(mut self, on_progress: ProgressFn) -> Self {
        self.on_progress = Some(on_progress);
        self
    }

    pub fn with_cancel_flag(mut self, cancelled: Arc<AtomicBool>) -> Self {
        self.cancelled = cancelled;
        self
    }
}

/// Runs a synthesized export command to completion.
///
/// This is a port; infrastructure decides how the command is actually run.
pub trait CommandExecutor: Send {
    fn execute(&self, command: &ExportCommand, config: ExecutionConfig) -> Result<(), ExportError>;
}
