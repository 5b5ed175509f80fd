use std::collections::VecDeque;
use std::io::{BufRead, BufReader, Read};
use std::path::{Path, PathBuf};
use std::process::{Child, Command, Stdio};
use std::sync::atomic::Ordering;
use std::thread;
use std::time::Duration;

use crossbeam_channel::RecvTimeoutError;

use crate::export::domain::command_executor::{CommandExecutor, ExecutionConfig};
use crate::export::domain::command_synthesizer::{ExportCommand, FFMPEG_PROGRAM};
use crate::export::domain::export_error::ExportError;

/// How many trailing stderr lines are kept for the failure message.
const STDERR_TAIL_LINES: usize = 20;
const POLL_INTERVAL: Duration = Duration::from_millis(100);

#[derive(Debug, Clone, Copy, PartialEq)]
enum ProgressEvent {
    OutTime(f64),
    End,
}

/// Runs export commands through the `ffmpeg` binary.
///
/// Progress is read from `-progress pipe:1` on a helper thread and forwarded
/// over a channel; stderr is drained on another so the child never blocks.
pub struct FfmpegProcessExecutor {
    program: PathBuf,
}

impl FfmpegProcessExecutor {
    pub fn new() -> Self {
        Self {
            program: PathBuf::from(FFMPEG_PROGRAM),
        }
    }

    pub fn with_program(program: &Path) -> Self {
        Self {
            program: program.to_path_buf(),
        }
    }

    fn program_name(&self) -> String {
        self.program.display().to_string()
    }
}

impl Default for FfmpegProcessExecutor {
    fn default() -> Self {
        Self::new()
    }
}

impl CommandExecutor for FfmpegProcessExecutor {
    fn execute(&self, command: &ExportCommand, config: ExecutionConfig) -> Result<(), ExportError> {
        log::info!("Running: {}", command.command_line());

        let mut child = Command::new(&self.program)
            .args(["-hide_banner", "-nostats", "-progress", "pipe:1"])
            .args(&command.args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| ExportError::Spawn {
                program: self.program_name(),
                source: e,
            })?;

        let stdout = child.stdout.take();
        let stderr = child.stderr.take();

        let (tx, rx) = crossbeam_channel::unbounded::<ProgressEvent>();
        if let Some(stdout) = stdout {
            thread::spawn(move || {
                for line in BufReader::new(stdout).lines().map_while(Result::ok) {
                    if let Some(event) = parse_progress_line(&line) {
                        if tx.send(event).is_err() {
                            break;
                        }
                    }
                }
            });
        } else {
            drop(tx);
        }
        let stderr_tail = stderr.map(|s| thread::spawn(move || collect_tail(s, STDERR_TAIL_LINES)));

        let report = |pct: f64| -> bool {
            config
                .on_progress
                .as_ref()
                .map_or(true, |cb| cb(pct))
        };

        let mut last_pct = 0.0_f64;
        loop {
            match rx.recv_timeout(POLL_INTERVAL) {
                Ok(ProgressEvent::OutTime(secs)) => {
                    let pct = progress_percent(secs, config.expected_duration).max(last_pct);
                    if pct > last_pct {
                        last_pct = pct;
                        if !report(pct) {
                            config.cancelled.store(true, Ordering::Relaxed);
                        }
                    }
                }
                Ok(ProgressEvent::End) => {}
                Err(RecvTimeoutError::Timeout) => {}
                Err(RecvTimeoutError::Disconnected) => break,
            }

            if config.cancelled.load(Ordering::Relaxed) {
                kill(&mut child);
                return Err(ExportError::Cancelled);
            }
        }

        let status = child.wait()?;
        let tail = stderr_tail
            .map(|h| h.join().unwrap_or_default())
            .unwrap_or_default();

        if config.cancelled.load(Ordering::Relaxed) {
            return Err(ExportError::Cancelled);
        }

        if !status.success() {
            let message = tail.into_iter().collect::<Vec<_>>().join("\n");
            return Err(ExportError::Failed {
                program: self.program_name(),
                code: status.code(),
                message: message.trim().to_string(),
            });
        }

        if last_pct < 100.0 {
            report(100.0);
        }
        log::info!("Export finished: {}", command.output_path.display());
        Ok(())
    }
}

fn kill(child: &mut Child) {
    if let Err(e) = child.kill() {
        log::warn!("failed to kill ffmpeg: {e}");
    }
    let _ = child.wait();
}

/// Parses one `key=value` line of ffmpeg's `-progress` output.
fn parse_progress_line(line: &str) -> Option<ProgressEvent> {
    let (key, value) = line.trim().split_once('=')?;
    match key {
        // out_time_ms is also reported in microseconds by ffmpeg
        "out_time_us" | "out_time_ms" => value
            .parse::<i64>()
            .ok()
            .filter(|us| *us >= 0)
            .map(|us| ProgressEvent::OutTime(us as f64 / 1_000_000.0)),
        "progress" if value == "end" => Some(ProgressEvent::End),
        _ => None,
    }
}

fn progress_percent(out_time: f64, expected_duration: f64) -> f64 {
    if expected_duration <= 0.0 {
        return 0.0;
    }
    (out_time / expected_duration * 100.0).clamp(0.0, 100.0)
}

fn collect_tail<R: Read>(reader: R, max_lines: usize) -> VecDeque<String> {
    let mut tail = VecDeque::with_capacity(max_lines);
    for line in BufReader::new(reader).lines().map_while(Result::ok) {
        if line.trim().is_empty() {
            continue;
        }
        log::debug!("ffmpeg: {line}");
        if tail.len() == max_lines {
            tail.pop_front();
        }
        tail.push_back(line);
    }
    tail
}
