use std::fmt;
use std::path::{Path, PathBuf};

use super::cut_list::KeptInterval;
use crate::shared::constants::DEFAULT_CRF;

pub const FFMPEG_PROGRAM: &str = "ffmpeg";
const VIDEO_OUT: &str = "outv";
const AUDIO_OUT: &str = "outa";
/// Exponential taper on both sides of every audio join.
const CROSSFADE_CURVE: &str = "exp";

/// A fully rendered ffmpeg invocation for one export.
///
/// Pure data: nothing here spawns a process.
#[derive(Clone, Debug, PartialEq)]
pub struct ExportCommand {
    pub args: Vec<String>,
    pub filter_graph: String,
    pub output_path: PathBuf,
    pub interval_count: usize,
    pub crossfade_count: usize,
}

impl ExportCommand {
    pub fn program(&self) -> &'static str {
        FFMPEG_PROGRAM
    }

    /// The invocation as one shell-quoted string.
    pub fn command_line(&self) -> String {
        std::iter::once(FFMPEG_PROGRAM.to_string())
            .chain(self.args.iter().map(|a| shell_quote(a)))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl fmt::Display for ExportCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.command_line())
    }
}

#[derive(Debug, Clone, Default)]
struct FilterChain {
    filters: Vec<String>,
}

impl FilterChain {
    fn push(&mut self, filter: String) {
        self.filters.push(filter);
    }

    fn join(&self) -> String {
        self.filters.join(";")
    }
}

/// Turns kept intervals into a trim / concat / cross-fade filter graph.
///
/// Video joins are hard cuts via one `concat`; audio joins are chained
/// `acrossfade` nodes, left to right. Audio-only sources skip the video
/// chain and let ffmpeg pick the audio encoder from the output extension.
#[derive(Debug, Clone)]
pub struct CommandSynthesizer {
    crf: u32,
}

impl CommandSynthesizer {
    pub fn new() -> Self {
        Self { crf: DEFAULT_CRF }
    }

    pub fn with_crf(mut self, crf: u32) -> Self {
        self.crf = crf;
        self
    }

    pub fn crf(&self) -> u32 {
        self.crf
    }

    /// Returns `None` when there is nothing to export.
    pub fn synthesize(
        &self,
        kept: &[KeptInterval],
        crossfade_duration: f64,
        source: &Path,
        output: &Path,
    ) -> Option<ExportCommand> {
        self.synthesize_streams(kept, crossfade_duration, source, output, true)
    }

    /// Same as `synthesize`, with the video chain only when `has_video`.
    pub fn synthesize_streams(
        &self,
        kept: &[KeptInterval],
        crossfade_duration: f64,
        source: &Path,
        output: &Path,
        has_video: bool,
    ) -> Option<ExportCommand> {
        if kept.is_empty() {
            return None;
        }

        let mut filters = FilterChain::default();

        for (i, interval) in kept.iter().enumerate() {
            if has_video {
                filters.push(format!(
                    "[0:v]trim=start={:.3}:end={:.3},setpts=PTS-STARTPTS[v{i}]",
                    interval.start, interval.end
                ));
            }
            filters.push(format!(
                "[0:a]atrim=start={:.3}:end={:.3},asetpts=PTS-STARTPTS[a{i}]",
                interval.start, interval.end
            ));
        }

        if has_video {
            let video_inputs: String = (0..kept.len()).map(|i| format!("[v{i}]")).collect();
            filters.push(format!(
                "{video_inputs}concat=n={}:v=1:a=0[{VIDEO_OUT}]",
                kept.len()
            ));
        }

        let (audio_label, crossfade_count) =
            chain_crossfades(&mut filters, kept.len(), crossfade_duration);

        let filter_graph = filters.join();

        let mut args: Vec<String> = vec![
            "-y".into(),
            "-i".into(),
            source.to_string_lossy().into_owned(),
            "-filter_complex".into(),
            filter_graph.clone(),
        ];
        if has_video {
            args.extend(["-map".into(), format!("[{VIDEO_OUT}]")]);
        }
        args.extend(["-map".into(), format!("[{audio_label}]")]);

        let crf = self.crf.to_string();
        let encode: Vec<&str> = if has_video {
            vec![
                "-c:v",
                "libx264",
                "-preset",
                "medium",
                "-crf",
                crf.as_str(),
                "-c:a",
                "aac",
                "-b:a",
                "192k",
                "-movflags",
                "+faststart",
            ]
        } else {
            vec!["-vn", "-b:a", "192k"]
        };
        args.extend(encode.iter().map(|s| s.to_string()));
        args.push(output.to_string_lossy().into_owned());

        log::debug!(
            "synthesized export: {} intervals, {crossfade_count} cross-fades",
            kept.len()
        );

        Some(ExportCommand {
            args,
            filter_graph,
            output_path: output.to_path_buf(),
            interval_count: kept.len(),
            crossfade_count,
        })
    }
}

impl Default for CommandSynthesizer {
    fn default() -> Self {
        Self::new()
    }
}

/// Appends `count - 1` chained joins and returns the final audio label.
fn chain_crossfades(filters: &mut FilterChain, count: usize, duration: f64) -> (String, usize) {
    if count == 1 {
        return ("a0".to_string(), 0);
    }

    let mut current = "a0".to_string();
    for i in 1..count {
        let next = if i == count - 1 {
            AUDIO_OUT.to_string()
        } else {
            format!("ax{i}")
        };
        filters.push(format!(
            "[{current}][a{i}]acrossfade=d={duration:.3}:c1={CROSSFADE_CURVE}:c2={CROSSFADE_CURVE}[{next}]"
        ));
        current = next;
    }
    (current, count - 1)
}

fn shell_quote(arg: &str) -> String {
    let safe = !arg.is_empty()
        && arg
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || "-_./:=+,@%".contains(c));
    if safe {
        arg.to_string()
    } else {
        format!("'{}'", arg.replace('\'', r"'\''"))
    }
}
