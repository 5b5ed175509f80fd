use std::path::Path;

use ffmpeg_next::util::frame::audio::Audio;

use crate::media::domain::audio_reader::AudioReader;
use crate::transcription::domain::audio_segment::AudioSegment;

/// Decodes and resamples the best audio stream to planar f32 mono.
pub struct FfmpegAudioReader;

impl AudioReader for FfmpegAudioReader {
    fn read_audio(
        &self,
        path: &Path,
        target_sample_rate: u32,
    ) -> Result<Option<AudioSegment>, Box<dyn std::error::Error>> {
        ffmpeg_next::init()?;

        let mut ictx = ffmpeg_next::format::input(path)?;
        let Some(stream) = ictx.streams().best(ffmpeg_next::media::Type::Audio) else {
            return Ok(None);
        };
        let stream_index = stream.index();

        let mut decoder = ffmpeg_next::codec::context::Context::from_parameters(stream.parameters())?
            .decoder()
            .audio()?;

        let mut resampler = ffmpeg_next::software::resampling::Context::get(
            decoder.format(),
            decoder.channel_layout(),
            decoder.rate(),
            ffmpeg_next::format::Sample::F32(ffmpeg_next::format::sample::Type::Planar),
            ffmpeg_next::ChannelLayout::MONO,
            target_sample_rate,
        )?;

        let mut samples: Vec<f32> = Vec::new();
        let mut decoded = Audio::empty();
        let mut resampled = Audio::empty();

        let mut drain = |decoder: &mut ffmpeg_next::decoder::Audio,
                         samples: &mut Vec<f32>|
         -> Result<(), ffmpeg_next::Error> {
            while decoder.receive_frame(&mut decoded).is_ok() {
                resampler.run(&decoded, &mut resampled)?;
                append_mono(&resampled, samples);
            }
            Ok(())
        };

        for (packet_stream, packet) in ictx.packets() {
            if packet_stream.index() != stream_index {
                continue;
            }
            decoder.send_packet(&packet)?;
            drain(&mut decoder, &mut samples)?;
        }

        decoder.send_eof()?;
        drain(&mut decoder, &mut samples)?;

        // The resampler may hold a tail of buffered output
        if let Ok(Some(delay)) = resampler.flush(&mut resampled) {
            if delay.output > 0 {
                append_mono(&resampled, &mut samples);
            }
        }

        log::debug!(
            "decoded {} samples at {target_sample_rate} Hz from {}",
            samples.len(),
            path.display()
        );
        Ok(Some(AudioSegment::new(samples, target_sample_rate)))
    }
}

fn append_mono(frame: &Audio, out: &mut Vec<f32>) {
    let count = frame.samples();
    if count == 0 {
        return;
    }
    out.extend_from_slice(&frame.plane::<f32>(0)[..count]);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_audio_nonexistent_file() {
        let path = if cfg!(windows) {
            Path::new("Z:\\nonexistent\\talk.mp4")
        } else {
            Path::new("/nonexistent/talk.mp4")
        };
        assert!(FfmpegAudioReader.read_audio(path, 16000).is_err());
    }
}
