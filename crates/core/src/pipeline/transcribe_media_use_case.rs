use std::path::Path;
use std::time::Instant;

use crate::editing::domain::project::Project;
use crate::editing::domain::project_settings::ProjectSettings;
use crate::media::domain::audio_reader::AudioReader;
use crate::media::domain::media_prober::MediaProber;
use crate::shared::constants::{MIN_SILENCE_DURATION, WHISPER_SAMPLE_RATE};
use crate::transcription::domain::silence_detector::find_gaps;
use crate::transcription::domain::speech_recognizer::SpeechRecognizer;
use crate::transcription::domain::transcript_builder::TranscriptBuilder;
use crate::transcription::domain::transcription_error::TranscriptionError;

use super::pipeline_logger::{NullPipelineLogger, PipelineLogger};

/// Turns a media file into a fresh, fully kept `Project`.
///
/// Probe, decode at 16 kHz mono, recognize, detect silences, build units.
/// Any failure aborts the run; no partial transcript is returned.
pub struct TranscribeMediaUseCase {
    prober: Box<dyn MediaProber>,
    reader: Box<dyn AudioReader>,
    recognizer: Box<dyn SpeechRecognizer>,
    settings: ProjectSettings,
    logger: Box<dyn PipelineLogger>,
}

impl TranscribeMediaUseCase {
    pub fn new(
        prober: Box<dyn MediaProber>,
        reader: Box<dyn AudioReader>,
        recognizer: Box<dyn SpeechRecognizer>,
    ) -> Self {
        Self {
            prober,
            reader,
            recognizer,
            settings: ProjectSettings::default(),
            logger: Box::new(NullPipelineLogger),
        }
    }

    /// Settings stored on the resulting project.
    pub fn with_settings(mut self, settings: ProjectSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn with_logger(mut self, logger: Box<dyn PipelineLogger>) -> Self {
        self.logger = logger;
        self
    }

    pub fn run(&mut self, source: &Path, model_id: &str) -> Result<Project, TranscriptionError> {
        if !source.exists() {
            return Err(TranscriptionError::MissingInput(source.to_path_buf()));
        }

        let started = Instant::now();
        let metadata = self
            .prober
            .probe(source)
            .map_err(|e| TranscriptionError::Probe {
                path: source.to_path_buf(),
                message: e.to_string(),
            })?;
        self.logger
            .timing("probe", started.elapsed().as_secs_f64() * 1000.0);
        if metadata.is_audio_only() {
            self.logger
                .info(&format!("{} has no video; export will be audio only", source.display()));
        }
        self.logger.progress("transcribe", 5.0);

        let started = Instant::now();
        let audio = self
            .reader
            .read_audio(source, WHISPER_SAMPLE_RATE)
            .map_err(|e| TranscriptionError::Decode {
                path: source.to_path_buf(),
                message: e.to_string(),
            })?
            .filter(|audio| !audio.is_empty())
            .ok_or_else(|| TranscriptionError::NoAudioTrack(source.to_path_buf()))?;
        self.logger
            .timing("decode", started.elapsed().as_secs_f64() * 1000.0);
        self.logger.progress("transcribe", 20.0);

        // Some containers do not report a duration
        let duration = if metadata.duration > 0.0 {
            metadata.duration
        } else {
            audio.duration()
        };
        self.logger.metric("duration_seconds", duration);

        let started = Instant::now();
        let recognition = self
            .recognizer
            .transcribe(&audio)
            .map_err(|e| TranscriptionError::Recognition(e.to_string()))?;
        self.logger
            .timing("recognize", started.elapsed().as_secs_f64() * 1000.0);
        self.logger.progress("transcribe", 90.0);

        let silences = find_gaps(&recognition.words, duration, MIN_SILENCE_DURATION);
        let builder = TranscriptBuilder::new(recognition.language.as_deref());
        let segments = builder.build(&recognition.words, &silences, duration);

        self.logger.metric("words", recognition.words.len() as f64);
        self.logger.metric("silences", silences.len() as f64);
        self.logger.progress("transcribe", 100.0);
        self.logger.info(&format!(
            "Transcribed {} into {} units",
            source.display(),
            segments.len()
        ));
        self.logger.summary();

        let mut project = Project::new(source, duration, segments)
            .with_settings(self.settings.clone())
            .with_video(metadata.has_video);
        project.language = Some(builder.language().to_string());
        project.model = Some(model_id.to_string());
        Ok(project)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editing::domain::word_unit::UnitKind;
    use crate::media::domain::media_metadata::MediaMetadata;
    use crate::transcription::domain::audio_segment::AudioSegment;
    use crate::transcription::domain::transcript::{Recognition, TranscriptWord};
    use approx::assert_relative_eq;
    use tempfile::NamedTempFile;

    // --- Stubs ---

    struct StubProber {
        duration: f64,
        fail: bool,
        has_video: bool,
    }

    impl MediaProber for StubProber {
        fn probe(&self, path: &Path) -> Result<MediaMetadata, Box<dyn std::error::Error>> {
            if self.fail {
                return Err("invalid data found when processing input".into());
            }
            Ok(MediaMetadata {
                duration: self.duration,
                has_audio: true,
                has_video: self.has_video,
            })
        }
    }

    struct StubAudioReader {
        segment: Option<AudioSegment>,
    }

    impl AudioReader for StubAudioReader {
        fn read_audio(
            &self,
            _: &Path,
            _: u32,
        ) -> Result<Option<AudioSegment>, Box<dyn std::error::Error>> {
            Ok(self.segment.clone())
        }
    }

    struct StubRecognizer {
        result: Result<Recognition, String>,
    }

    impl SpeechRecognizer for StubRecognizer {
        fn transcribe(&self, _: &AudioSegment) -> Result<Recognition, Box<dyn std::error::Error>> {
            self.result.clone().map_err(Into::into)
        }
    }

    fn word(text: &str, start: f64, end: f64) -> TranscriptWord {
        TranscriptWord {
            text: text.to_string(),
            start,
            end,
            confidence: 0.9,
        }
    }

    fn four_seconds() -> AudioSegment {
        AudioSegment::new(vec![0.0; 4 * 16000], 16000)
    }

    fn use_case(
        prober: StubProber,
        segment: Option<AudioSegment>,
        result: Result<Recognition, String>,
    ) -> TranscribeMediaUseCase {
        TranscribeMediaUseCase::new(
            Box::new(prober),
            Box::new(StubAudioReader { segment }),
            Box::new(StubRecognizer { result }),
        )
    }

    #[test]
    fn test_builds_fresh_project() {
        let source = NamedTempFile::new().unwrap();
        let recognition = Recognition {
            words: vec![
                word("um", 0.0, 0.4),
                word("hello", 0.4, 1.0),
                word("world", 2.0, 2.5),
            ],
            language: Some("en".to_string()),
        };
        let mut uc = use_case(
            StubProber {
                duration: 3.0,
                fail: false,
                has_video: true,
            },
            Some(four_seconds()),
            Ok(recognition),
        );

        let project = uc.run(source.path(), "base.en").unwrap();

        assert_relative_eq!(project.duration, 3.0);
        assert_eq!(project.model.as_deref(), Some("base.en"));
        assert_eq!(project.language.as_deref(), Some("en"));
        assert!(project.cut_ranges.is_empty());
        assert_eq!(project.segments.deleted_count(), 0);
        assert!(project.segments.is_sorted());

        let kinds: Vec<UnitKind> = project.segments.iter().map(|u| u.kind).collect();
        assert_eq!(
            kinds,
            vec![
                UnitKind::Filler,
                UnitKind::Word,
                UnitKind::Silence,
                UnitKind::Word,
                UnitKind::Silence,
            ]
        );
    }

    #[test]
    fn test_falls_back_to_audio_duration() {
        let source = NamedTempFile::new().unwrap();
        let mut uc = use_case(
            StubProber {
                duration: 0.0,
                fail: false,
                has_video: true,
            },
            Some(four_seconds()),
            Ok(Recognition::default()),
        );
        let project = uc.run(source.path(), "tiny").unwrap();
        assert_relative_eq!(project.duration, 4.0);
        // Nothing recognized: the whole file is one silence
        assert_eq!(project.segments.len(), 1);
        assert_eq!(project.segments.units()[0].kind, UnitKind::Silence);
    }

    #[test]
    fn test_missing_input() {
        let mut uc = use_case(
            StubProber {
                duration: 1.0,
                fail: false,
                has_video: true,
            },
            Some(four_seconds()),
            Ok(Recognition::default()),
        );
        let err = uc.run(Path::new("/nonexistent/talk.mp4"), "base").unwrap_err();
        assert!(matches!(err, TranscriptionError::MissingInput(_)));
    }

    #[test]
    fn test_probe_failure_is_terminal() {
        let source = NamedTempFile::new().unwrap();
        let mut uc = use_case(
            StubProber {
                duration: 1.0,
                fail: true,
                has_video: true,
            },
            Some(four_seconds()),
            Ok(Recognition::default()),
        );
        let err = uc.run(source.path(), "base").unwrap_err();
        assert!(matches!(err, TranscriptionError::Probe { .. }));
        assert!(err.to_string().contains("invalid data"));
    }

    #[test]
    fn test_no_audio_track() {
        let source = NamedTempFile::new().unwrap();
        let mut uc = use_case(
            StubProber {
                duration: 1.0,
                fail: false,
                has_video: true,
            },
            None,
            Ok(Recognition::default()),
        );
        let err = uc.run(source.path(), "base").unwrap_err();
        assert!(matches!(err, TranscriptionError::NoAudioTrack(_)));
    }

    #[test]
    fn test_empty_audio_track_counts_as_missing() {
        let source = NamedTempFile::new().unwrap();
        let mut uc = use_case(
            StubProber {
                duration: 1.0,
                fail: false,
                has_video: true,
            },
            Some(AudioSegment::new(Vec::new(), 16000)),
            Ok(Recognition::default()),
        );
        let err = uc.run(source.path(), "base").unwrap_err();
        assert!(matches!(err, TranscriptionError::NoAudioTrack(_)));
    }

    #[test]
    fn test_detected_chinese_drives_filler_rules() {
        let source = NamedTempFile::new().unwrap();
        let recognition = Recognition {
            words: vec![
                word("嗯", 0.0, 0.3),
                word("我们", 0.3, 0.8),
                word("那个", 0.8, 1.2),
                word("开始", 1.2, 1.8),
            ],
            language: Some("zh".to_string()),
        };
        let mut uc = use_case(
            StubProber {
                duration: 1.8,
                fail: false,
                has_video: true,
            },
            Some(four_seconds()),
            Ok(recognition),
        );

        let project = uc.run(source.path(), "base").unwrap();

        assert_eq!(project.language.as_deref(), Some("zh"));
        let kinds: Vec<UnitKind> = project.segments.iter().map(|u| u.kind).collect();
        assert_eq!(
            kinds,
            vec![
                UnitKind::Filler,
                UnitKind::Word,
                UnitKind::Filler,
                UnitKind::Word,
            ]
        );
    }

    #[test]
    fn test_audio_only_source_marks_project() {
        let source = NamedTempFile::new().unwrap();
        let mut uc = use_case(
            StubProber {
                duration: 4.0,
                fail: false,
                has_video: false,
            },
            Some(four_seconds()),
            Ok(Recognition::default()),
        );
        let project = uc.run(source.path(), "base").unwrap();
        assert!(!project.has_video);
    }

    #[test]
    fn test_recognition_failure() {
        let source = NamedTempFile::new().unwrap();
        let mut uc = use_case(
            StubProber {
                duration: 4.0,
                fail: false,
                has_video: true,
            },
            Some(four_seconds()),
            Err("model exploded".to_string()),
        );
        let err = uc.run(source.path(), "base").unwrap_err();
        assert_eq!(err.to_string(), "speech recognition failed: model exploded");
    }

    #[test]
    fn test_settings_are_stored_on_project() {
        let source = NamedTempFile::new().unwrap();
        let settings = ProjectSettings {
            padding_start: 0.2,
            ..ProjectSettings::default()
        };
        let mut uc = use_case(
            StubProber {
                duration: 4.0,
                fail: false,
                has_video: true,
            },
            Some(four_seconds()),
            Ok(Recognition::default()),
        )
        .with_settings(settings.clone());
        let project = uc.run(source.path(), "base").unwrap();
        assert_eq!(project.settings, settings);
    }
}
