mod config;
mod edit_op;

use std::path::{Path, PathBuf};
use std::process;

use clap::{Parser, Subcommand};

use talkcut_core::editing::domain::project::Project;
use talkcut_core::editing::domain::word_unit::UnitKind;
use talkcut_core::editing::edit_session::EditSession;
use talkcut_core::export::domain::command_synthesizer::CommandSynthesizer;
use talkcut_core::export::domain::cut_list::total_duration;
use talkcut_core::export::infrastructure::ffmpeg_process_executor::FfmpegProcessExecutor;
use talkcut_core::media::infrastructure::ffmpeg_audio_reader::FfmpegAudioReader;
use talkcut_core::media::infrastructure::ffmpeg_media_prober::FfmpegMediaProber;
use talkcut_core::persistence::project_file::{self, PROJECT_EXTENSION};
use talkcut_core::pipeline::export_project_use_case::ExportProjectUseCase;
use talkcut_core::pipeline::pipeline_logger::StdoutPipelineLogger;
use talkcut_core::pipeline::transcribe_media_use_case::TranscribeMediaUseCase;
use talkcut_core::shared::model_resolver;
use talkcut_core::transcription::infrastructure::whisper_recognizer::WhisperRecognizer;

use config::Settings;
use edit_op::EditOp;

/// Cut talking-head videos by editing their transcript.
#[derive(Parser)]
#[command(name = "talkcut")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Transcribe a media file into a new project.
    Transcribe {
        /// Input video or audio file.
        input: PathBuf,

        /// Project file to write (default: <input>.talkcut.json).
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Whisper model id (tiny, base, small, medium, large-v3, with .en variants).
        #[arg(long)]
        model: Option<String>,

        /// Spoken language code; omit to auto-detect.
        #[arg(long)]
        language: Option<String>,

        /// Seconds of context kept before each kept run.
        #[arg(long)]
        padding_start: Option<f64>,

        /// Seconds of context kept after each kept run.
        #[arg(long)]
        padding_end: Option<f64>,

        /// Audio cross-fade length at each join, in seconds.
        #[arg(long)]
        crossfade: Option<f64>,
    },

    /// Print the units of a project with their ids and state.
    Show {
        project: PathBuf,

        /// Print the project as JSON instead.
        #[arg(long)]
        json: bool,
    },

    /// Apply edits in order and save the project.
    ///
    /// Edits: toggle:ID, words:ID,ID, ranges:START-END,..., silences,
    /// fillers, restore, undo, redo.
    Edit {
        project: PathBuf,

        #[arg(required = true)]
        edits: Vec<EditOp>,

        /// Write the result here instead of overwriting the project.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Print the kept intervals and the ffmpeg command without running it.
    Plan {
        project: PathBuf,
        output: PathBuf,

        /// H.264 CRF quality (0=lossless, 51=worst).
        #[arg(long)]
        quality: Option<u32>,
    },

    /// Render the kept parts of a project.
    Export {
        project: PathBuf,
        output: PathBuf,

        /// H.264 CRF quality (0=lossless, 51=worst).
        #[arg(long)]
        quality: Option<u32>,

        /// ffmpeg binary to run.
        #[arg(long)]
        ffmpeg: Option<PathBuf>,
    },

    /// Show or change saved defaults.
    Config {
        /// Setting to change.
        key: Option<String>,

        /// New value (use "auto" to clear the language).
        value: Option<String>,
    },
}

fn main() {
    env_logger::init();

    if let Err(e) = run() {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let settings = Settings::load();

    match cli.command {
        Command::Transcribe {
            input,
            output,
            model,
            language,
            padding_start,
            padding_end,
            crossfade,
        } => {
            let mut settings = settings;
            if let Some(v) = model {
                settings.set("model", &v)?;
            }
            if let Some(v) = language {
                settings.set("language", &v)?;
            }
            if let Some(v) = padding_start {
                settings.set("padding_start", &v.to_string())?;
            }
            if let Some(v) = padding_end {
                settings.set("padding_end", &v.to_string())?;
            }
            if let Some(v) = crossfade {
                settings.set("crossfade_duration", &v.to_string())?;
            }
            let output = output.unwrap_or_else(|| default_project_path(&input));
            run_transcribe(&input, &output, &settings)
        }
        Command::Show { project, json } => run_show(&project, json),
        Command::Edit {
            project,
            edits,
            output,
        } => {
            let output = output.unwrap_or_else(|| project.clone());
            run_edit(&project, &edits, &output)
        }
        Command::Plan {
            project,
            output,
            quality,
        } => run_plan(&project, &output, synthesizer(&settings, quality)?),
        Command::Export {
            project,
            output,
            quality,
            ffmpeg,
        } => run_export(
            &project,
            &output,
            synthesizer(&settings, quality)?,
            ffmpeg.as_deref(),
        ),
        Command::Config { key, value } => run_config(settings, key, value),
    }
}

fn run_transcribe(
    input: &Path,
    output: &Path,
    settings: &Settings,
) -> Result<(), Box<dyn std::error::Error>> {
    if !input.exists() {
        return Err(format!("Input file not found: {}", input.display()).into());
    }
    let project_settings = settings.project_settings();
    project_settings.validate()?;

    log::info!("Resolving whisper model: {}", settings.model);
    let model_path = model_resolver::resolve_whisper_model(
        &settings.model,
        None,
        Some(Box::new(download_progress)),
    )?;
    eprintln!();

    let recognizer =
        WhisperRecognizer::new(&model_path)?.with_language(settings.language.as_deref());
    let mut use_case = TranscribeMediaUseCase::new(
        Box::new(FfmpegMediaProber),
        Box::new(FfmpegAudioReader),
        Box::new(recognizer),
    )
    .with_settings(project_settings)
    .with_logger(Box::new(StdoutPipelineLogger::default()));

    let project = use_case.run(input, &settings.model)?;
    project_file::save(&project, output)?;
    log::info!(
        "{} units ({} words) written to {}",
        project.segments.len(),
        project
            .segments
            .iter()
            .filter(|u| u.kind != UnitKind::Silence)
            .count(),
        output.display()
    );
    Ok(())
}

fn run_show(path: &Path, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let project = project_file::load(path)?;
    if json {
        println!("{}", project_file::to_json(&project)?);
        return Ok(());
    }

    println!("{}", describe(&project));
    for unit in &project.segments {
        let mark = if unit.deleted { "x" } else { " " };
        println!(
            "[{mark}] {:>8.3} {:>8.3}  {:<7} {}  {}",
            unit.start, unit.end, unit.kind, unit.id, unit.text
        );
    }
    println!();
    println!("{}", project.segments.kept_text());
    Ok(())
}

fn run_edit(
    path: &Path,
    edits: &[EditOp],
    output: &Path,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut session = EditSession::new(project_file::load(path)?);
    for edit in edits {
        let outcome = edit.apply(&mut session);
        println!("{edit}: {outcome}");
    }
    let project = session.into_project();
    project_file::save(&project, output)?;
    println!("{}", describe(&project));
    Ok(())
}

fn run_plan(
    path: &Path,
    output: &Path,
    synthesizer: CommandSynthesizer,
) -> Result<(), Box<dyn std::error::Error>> {
    let session = EditSession::new(project_file::load(path)?);
    let kept = session.kept_intervals();
    for (i, interval) in kept.iter().enumerate() {
        println!(
            "{i:>4}: {:>8.3} - {:>8.3}  ({:.3}s)",
            interval.start,
            interval.end,
            interval.duration()
        );
    }
    println!(
        "{} intervals, {:.3}s of {:.3}s kept",
        kept.len(),
        total_duration(&kept),
        session.project().duration
    );

    let use_case = ExportProjectUseCase::new(Box::new(FfmpegProcessExecutor::new()))
        .with_synthesizer(synthesizer);
    let command = use_case.plan(session.project(), output)?;
    println!();
    println!("{command}");
    Ok(())
}

fn run_export(
    path: &Path,
    output: &Path,
    synthesizer: CommandSynthesizer,
    ffmpeg: Option<&Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    let project = project_file::load(path)?;
    if !project.source_path.exists() {
        return Err(format!("Source media not found: {}", project.source_path.display()).into());
    }

    let executor = match ffmpeg {
        Some(program) => FfmpegProcessExecutor::with_program(program),
        None => FfmpegProcessExecutor::new(),
    };
    let mut use_case = ExportProjectUseCase::new(Box::new(executor))
        .with_synthesizer(synthesizer)
        .with_logger(Box::new(StdoutPipelineLogger::default()));

    let progress: Box<dyn Fn(f64) -> bool + Send> = Box::new(|pct| {
        eprint!("\rExporting... {pct:5.1}%");
        true
    });
    use_case.run(&project, output, Some(progress), None)?;
    eprintln!();
    log::info!("Output written to {}", output.display());
    Ok(())
}

fn run_config(
    mut settings: Settings,
    key: Option<String>,
    value: Option<String>,
) -> Result<(), Box<dyn std::error::Error>> {
    match (key, value) {
        (None, _) => {
            if let Some(path) = Settings::config_path() {
                println!("# {}", path.display());
            }
            println!("{}", serde_json::to_string_pretty(&settings)?);
        }
        (Some(key), None) => {
            return Err(format!(
                "Missing value for '{key}' (keys: {})",
                config::KEYS.join(", ")
            )
            .into())
        }
        (Some(key), Some(value)) => {
            settings.set(&key, &value)?;
            let path = settings.save()?;
            log::info!("Saved {key} to {}", path.display());
        }
    }
    Ok(())
}

fn synthesizer(
    settings: &Settings,
    quality: Option<u32>,
) -> Result<CommandSynthesizer, Box<dyn std::error::Error>> {
    let crf = quality.unwrap_or(settings.crf);
    if crf > 51 {
        return Err(format!("Quality must be between 0 and 51, got {crf}").into());
    }
    Ok(CommandSynthesizer::new().with_crf(crf))
}

fn describe(project: &Project) -> String {
    format!(
        "{}: {:.3}s, {} units, {} deleted, {} cut ranges",
        project.source_path.display(),
        project.duration,
        project.segments.len(),
        project.segments.deleted_count(),
        project.cut_ranges.len()
    )
}

fn default_project_path(input: &Path) -> PathBuf {
    input.with_extension(PROJECT_EXTENSION)
}

fn download_progress(downloaded: u64, total: u64) {
    if total > 0 {
        let pct = (downloaded as f64 / total as f64 * 100.0) as u32;
        eprint!("\rDownloading whisper model... {pct}%");
    } else {
        eprint!("\rDownloading whisper model... {downloaded} bytes");
    }
}
