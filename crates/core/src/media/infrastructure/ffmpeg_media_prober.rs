use std::path::Path;

use ffmpeg_next::format::stream::Disposition;

use crate::media::domain::media_metadata::MediaMetadata;
use crate::media::domain::media_prober::MediaProber;

const MICROS_PER_SECOND: f64 = 1_000_000.0;

/// Reads container duration and stream presence via libavformat.
pub struct FfmpegMediaProber;

impl MediaProber for FfmpegMediaProber {
    fn probe(&self, path: &Path) -> Result<MediaMetadata, Box<dyn std::error::Error>> {
        ffmpeg_next::init()?;

        let ictx = ffmpeg_next::format::input(path)?;
        let has_audio = ictx
            .streams()
            .best(ffmpeg_next::media::Type::Audio)
            .is_some();
        // Cover art in audio files shows up as a one-frame video stream
        let has_video = ictx.streams().any(|stream| {
            stream.parameters().medium() == ffmpeg_next::media::Type::Video
                && !stream.disposition().contains(Disposition::ATTACHED_PIC)
        });

        // Microseconds; negative when unknown
        let raw = ictx.duration();
        let duration = if raw > 0 {
            raw as f64 / MICROS_PER_SECOND
        } else {
            0.0
        };

        log::debug!(
            "probed {}: {duration:.3}s audio={has_audio} video={has_video}",
            path.display()
        );

        Ok(MediaMetadata {
            duration,
            has_audio,
            has_video,
        })
    }
}
