use std::collections::HashMap;
use std::time::Instant;

/// Observer for transcription and export runs.
///
/// Use cases report stage progress, stage timings and counters through this
/// port; the caller decides whether they go to the terminal, the log or
/// nowhere.
pub trait PipelineLogger: Send {
    /// Report progress of the current stage in percent `[0, 100]`.
    fn progress(&mut self, stage: &str, percent: f64);

    /// Record how long a named stage took.
    fn timing(&mut self, stage: &str, duration_ms: f64);

    /// Record a counter such as word count or kept duration.
    fn metric(&mut self, name: &str, value: f64);

    fn info(&mut self, message: &str);

    /// Emit an end-of-run summary. Default: no-op.
    fn summary(&self) {}
}

/// Discards every event.
pub struct NullPipelineLogger;

impl PipelineLogger for NullPipelineLogger {
    fn progress(&mut self, _stage: &str, _percent: f64) {}
    fn timing(&mut self, _stage: &str, _duration_ms: f64) {}
    fn metric(&mut self, _name: &str, _value: f64) {}
    fn info(&mut self, _message: &str) {}
}

/// Logger for the CLI. Forwards to the `log` facade and keeps stage timings
/// and metrics for a summary at the end of the run.
///
/// Progress lines are emitted only when a stage advances by at least
/// `step_percent`, or reaches 100.
pub struct StdoutPipelineLogger {
    step_percent: f64,
    last_reported: HashMap<String, f64>,
    timings: HashMap<String, f64>,
    metrics: HashMap<String, f64>,
    start_time: Instant,
    messages: Vec<String>,
}

impl StdoutPipelineLogger {
    pub fn new(step_percent: f64) -> Self {
        Self {
            step_percent: step_percent.max(0.1),
            last_reported: HashMap::new(),
            timings: HashMap::new(),
            metrics: HashMap::new(),
            start_time: Instant::now(),
            messages: Vec::new(),
        }
    }

    /// Returns the formatted summary, or `None` if nothing was recorded.
    pub fn summary_string(&self) -> Option<String> {
        if self.timings.is_empty() && self.metrics.is_empty() {
            return None;
        }

        let elapsed_ms = self.start_time.elapsed().as_secs_f64() * 1000.0;
        let mut lines = vec![format!("Run summary ({:.1}s total):", elapsed_ms / 1000.0)];

        let mut stages: Vec<_> = self.timings.iter().collect();
        stages.sort_by(|a, b| a.0.cmp(b.0));
        for (stage, &total_ms) in stages {
            let pct = if elapsed_ms > 0.0 {
                (total_ms / elapsed_ms * 100.0).min(100.0)
            } else {
                0.0
            };
            lines.push(format!("  {stage:12}: {total_ms:8.0}ms  ({pct:4.1}%)"));
        }

        let mut metrics: Vec<_> = self.metrics.iter().collect();
        metrics.sort_by(|a, b| a.0.cmp(b.0));
        for (name, value) in metrics {
            lines.push(format!("  {name}: {value:.2}"));
        }

        Some(lines.join("\n"))
    }

    /// Accumulated milliseconds for a stage.
    pub fn timing_for(&self, stage: &str) -> Option<f64> {
        self.timings.get(stage).copied()
    }

    /// Latest value of a metric.
    pub fn metric_for(&self, name: &str) -> Option<f64> {
        self.metrics.get(name).copied()
    }

    fn should_report(&mut self, stage: &str, percent: f64) -> bool {
        let last = self.last_reported.get(stage).copied();
        let due = match last {
            None => true,
            Some(prev) => percent - prev >= self.step_percent || (percent >= 100.0 && prev < 100.0),
        };
        if due {
            self.last_reported.insert(stage.to_string(), percent);
        }
        due
    }
}

impl Default for StdoutPipelineLogger {
    fn default() -> Self {
        Self::new(5.0)
    }
}

impl PipelineLogger for StdoutPipelineLogger {
    fn progress(&mut self, stage: &str, percent: f64) {
        let percent = percent.clamp(0.0, 100.0);
        if self.should_report(stage, percent) {
            log::info!("{stage}: {percent:.1}%");
        }
    }

    fn timing(&mut self, stage: &str, duration_ms: f64) {
        *self.timings.entry(stage.to_string()).or_default() += duration_ms;
    }

    fn metric(&mut self, name: &str, value: f64) {
        self.metrics.insert(name.to_string(), value);
    }

    fn info(&mut self, message: &str) {
        self.messages.push(message.to_string());
        log::info!("{message}");
    }

    fn summary(&self) {
        if let Some(text) = self.summary_string() {
            log::info!("\n\n{text}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_null_logger_all_methods_are_noop() {
        let mut logger = NullPipelineLogger;
        logger.progress("export", 50.0);
        logger.timing("recognize", 5.0);
        logger.metric("words", 3.0);
        logger.info("hello");
        logger.summary();
    }

    #[test]
    fn test_timing_accumulates_per_stage() {
        let mut logger = StdoutPipelineLogger::default();
        logger.timing("decode", 20.0);
        logger.timing("decode", 30.0);
        logger.timing("recognize", 5.0);

        assert_relative_eq!(logger.timing_for("decode").unwrap(), 50.0);
        assert_relative_eq!(logger.timing_for("recognize").unwrap(), 5.0);
        assert!(logger.timing_for("export").is_none());
    }

    #[test]
    fn test_metric_keeps_latest_value() {
        let mut logger = StdoutPipelineLogger::default();
        logger.metric("kept_seconds", 3.0);
        logger.metric("kept_seconds", 4.5);
        assert_relative_eq!(logger.metric_for("kept_seconds").unwrap(), 4.5);
    }

    #[test]
    fn test_summary_lists_stages_and_metrics() {
        let mut logger = StdoutPipelineLogger::default();
        logger.timing("recognize", 20.0);
        logger.metric("words", 12.0);

        let summary = logger.summary_string().unwrap();
        assert!(summary.contains("Run summary"));
        assert!(summary.contains("recognize"));
        assert!(summary.contains("words: 12.00"));
    }

    #[test]
    fn test_empty_summary_returns_none() {
        assert!(StdoutPipelineLogger::default().summary_string().is_none());
    }

    #[test]
    fn test_progress_reports_in_steps() {
        let mut logger = StdoutPipelineLogger::new(10.0);
        assert!(logger.should_report("export", 0.0));
        assert!(!logger.should_report("export", 4.0));
        assert!(logger.should_report("export", 10.0));
        assert!(!logger.should_report("export", 19.9));
        assert!(logger.should_report("export", 100.0));
        assert!(!logger.should_report("export", 100.0));
    }

    #[test]
    fn test_progress_tracked_per_stage() {
        let mut logger = StdoutPipelineLogger::new(10.0);
        assert!(logger.should_report("decode", 50.0));
        assert!(logger.should_report("export", 1.0));
    }

    #[test]
    fn test_info_stores_messages() {
        let mut logger = StdoutPipelineLogger::default();
        logger.info("hello world");
        assert_eq!(logger.messages, vec!["hello world".to_string()]);
    }
}
