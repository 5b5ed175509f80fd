use std::path::Path;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use std::time::Instant;

use crate::editing::domain::project::Project;
use crate::export::domain::command_executor::{CommandExecutor, ExecutionConfig, ProgressFn};
use crate::export::domain::command_synthesizer::{CommandSynthesizer, ExportCommand};
use crate::export::domain::cut_list::{rendered_duration, CutListReducer};
use crate::export::domain::export_error::ExportError;

use super::pipeline_logger::{NullPipelineLogger, PipelineLogger};

/// Renders the kept parts of a project to a new media file.
///
/// Reduce the units to kept intervals, synthesize the ffmpeg command, then
/// hand it to a `CommandExecutor`. A project with nothing kept fails with
/// `ExportError::NothingToExport` before anything is spawned.
pub struct ExportProjectUseCase {
    executor: Box<dyn CommandExecutor>,
    synthesizer: CommandSynthesizer,
    logger: Box<dyn PipelineLogger>,
}

impl ExportProjectUseCase {
    pub fn new(executor: Box<dyn CommandExecutor>) -> Self {
        Self {
            executor,
            synthesizer: CommandSynthesizer::new(),
            logger: Box::new(NullPipelineLogger),
        }
    }

    pub fn with_synthesizer(mut self, synthesizer: CommandSynthesizer) -> Self {
        self.synthesizer = synthesizer;
        self
    }

    pub fn with_logger(mut self, logger: Box<dyn PipelineLogger>) -> Self {
        self.logger = logger;
        self
    }

    /// Builds the command without running it.
    pub fn plan(&self, project: &Project, output: &Path) -> Result<ExportCommand, ExportError> {
        self.prepare(project, output).map(|(command, _)| command)
    }

    /// The command plus the length of the rendered audio in seconds.
    fn prepare(&self, project: &Project, output: &Path) -> Result<(ExportCommand, f64), ExportError> {
        project.settings.validate()?;
        let kept = CutListReducer::reduce(
            project.segments.units(),
            project.settings.padding(),
            project.duration,
        );
        let command = self
            .synthesizer
            .synthesize_streams(
                &kept,
                project.settings.crossfade_duration,
                &project.source_path,
                output,
                project.has_video,
            )
            .ok_or(ExportError::NothingToExport)?;
        let expected = rendered_duration(&kept, project.settings.crossfade_duration);
        Ok((command, expected))
    }

    pub fn run(
        &mut self,
        project: &Project,
        output: &Path,
        on_progress: Option<ProgressFn>,
        cancelled: Option<Arc<AtomicBool>>,
    ) -> Result<ExportCommand, ExportError> {
        let (command, expected) = self.prepare(project, output)?;
        self.logger.metric("output_seconds", expected);
        self.logger.metric("intervals", command.interval_count as f64);
        self.logger.info(&format!(
            "Exporting {} intervals ({expected:.2}s) to {}",
            command.interval_count,
            output.display()
        ));
        log::debug!("{}", command.command_line());

        let mut config = ExecutionConfig::new(expected);
        if let Some(cb) = on_progress {
            config = config.with_progress(cb);
        }
        if let Some(flag) = cancelled {
            config = config.with_cancel_flag(flag);
        }

        let started = Instant::now();
        let result = self.executor.execute(&command, config);
        self.logger
            .timing("render", started.elapsed().as_secs_f64() * 1000.0);
        result?;

        self.logger.progress("export", 100.0);
        self.logger.summary();
        Ok(command)
    }
}
