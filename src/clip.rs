//! Time-range clipping of audio files.
//!
//! [`ClipSource`] opens a downloaded audio file and writes `[start, end)`
//! segments of it to new files, re-encoding with FFmpeg. Range handling is
//! intentionally forgiving: an inverted range produces a valid zero-length
//! output, and an end point past the source duration is truncated at the
//! source end. The underlying slicing never fails on a "bad" range, only on
//! actual codec or I/O problems.

use std::{
    fmt::{Display, Formatter, Result as FmtResult},
    path::{Path, PathBuf},
    time::Duration,
};

use ffmpeg_next::{
    ChannelLayout, Packet, Rational,
    codec::{Id, context::Context as CodecContext},
    decoder::Audio as AudioDecoder,
    encoder::Audio as AudioEncoder,
    format::{Sample, context::Input, context::Output, sample::Type as SampleType},
    frame::Audio as AudioFrame,
    media::Type,
    software::resampling::Context as ResamplingContext,
};

use crate::{error::RingclipError, timestamp::ClipRange};

/// Audio output format.
///
/// Determines the container and codec used when writing a clip.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioFormat {
    /// MP3 (MPEG Audio Layer III). The default clip format. Requires
    /// libmp3lame in the FFmpeg build.
    Mp3,
    /// AAC in an `ipod`-flavoured MP4 container, the `.m4r` ringtone layout
    /// iOS expects.
    M4r,
    /// WAV (PCM signed 16-bit little-endian). Lossless.
    Wav,
}

impl Display for AudioFormat {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            AudioFormat::Mp3 => write!(f, "MP3"),
            AudioFormat::M4r => write!(f, "M4R"),
            AudioFormat::Wav => write!(f, "WAV"),
        }
    }
}

impl AudioFormat {
    /// Infer the format from a path's extension.
    ///
    /// `.m4a` maps to [`AudioFormat::M4r`] as well; the container is the
    /// same, only the extension differs.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Option<Self> {
        let extension = path.as_ref().extension()?.to_str()?.to_ascii_lowercase();
        match extension.as_str() {
            "mp3" => Some(AudioFormat::Mp3),
            "m4r" | "m4a" => Some(AudioFormat::M4r),
            "wav" => Some(AudioFormat::Wav),
            _ => None,
        }
    }

    /// The FFmpeg container (muxer) name for this format.
    fn container_name(&self) -> &'static str {
        match self {
            AudioFormat::Mp3 => "mp3",
            AudioFormat::M4r => "ipod",
            AudioFormat::Wav => "wav",
        }
    }

    /// The FFmpeg codec ID for this format.
    fn codec_id(&self) -> Id {
        match self {
            AudioFormat::Mp3 => Id::MP3,
            AudioFormat::M4r => Id::AAC,
            AudioFormat::Wav => Id::PCM_S16LE,
        }
    }
}

/// An opened audio source ready for clipping.
///
/// Created via [`ClipSource::open`]; holds the demuxer context and the
/// container-level duration.
///
/// # Example
///
/// ```no_run
/// use ringclip::{ClipRange, ClipSource, RingclipError};
///
/// let range = ClipRange::parse("00:03:000", "00:08:000")?;
/// let mut source = ClipSource::open("downloaded_audio.mp3")?;
/// source.save_clip("alarm_clip.mp3", &range)?;
/// # Ok::<(), RingclipError>(())
/// ```
pub struct ClipSource {
    input_context: Input,
    audio_stream_index: usize,
    duration: Duration,
    path: PathBuf,
}

impl ClipSource {
    /// Open an audio file for clipping.
    ///
    /// Initializes FFmpeg (idempotent), opens the demuxer, and locates the
    /// best audio stream.
    ///
    /// # Errors
    ///
    /// - [`RingclipError::FileOpen`] if the file cannot be opened.
    /// - [`RingclipError::NoAudioStream`] if it has no audio stream.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, RingclipError> {
        let path = path.as_ref().to_path_buf();
        log::debug!("Opening audio source: {}", path.display());

        ffmpeg_next::init().map_err(|error| RingclipError::FileOpen {
            path: path.clone(),
            reason: format!("FFmpeg initialisation failed: {error}"),
        })?;

        let input_context =
            ffmpeg_next::format::input(&path).map_err(|error| RingclipError::FileOpen {
                path: path.clone(),
                reason: error.to_string(),
            })?;

        let audio_stream_index = input_context
            .streams()
            .best(Type::Audio)
            .map(|stream| stream.index())
            .ok_or(RingclipError::NoAudioStream)?;

        let duration_microseconds = input_context.duration();
        let duration = if duration_microseconds > 0 {
            Duration::from_micros(duration_microseconds as u64)
        } else {
            Duration::ZERO
        };

        Ok(ClipSource {
            input_context,
            audio_stream_index,
            duration,
            path,
        })
    }

    /// Container-level duration of the source.
    pub fn duration(&self) -> Duration {
        self.duration
    }

    /// Path this source was opened from.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write the `[start, end)` range of the source to `out_path`.
    ///
    /// The output format is inferred from the extension of `out_path`, so a
    /// clip of an `.mp3` source saved as `.mp3` stays in the same codec
    /// family. An empty or inverted range writes a valid zero-length file; an
    /// end past the source duration is truncated silently.
    ///
    /// # Errors
    ///
    /// - [`RingclipError::UnsupportedAudioFormat`] if the extension is not a
    ///   known audio format.
    /// - [`RingclipError::AudioDecode`] / [`RingclipError::AudioEncode`] if
    ///   transcoding fails.
    pub fn save_clip<P: AsRef<Path>>(
        &mut self,
        out_path: P,
        range: &ClipRange,
    ) -> Result<(), RingclipError> {
        let out_path = out_path.as_ref();
        let format = AudioFormat::from_path(out_path).ok_or_else(|| {
            RingclipError::UnsupportedAudioFormat(out_path.display().to_string())
        })?;
        self.write_segment(out_path, format, Some(range))
    }

    /// Re-encode the whole source into `format` at `out_path`.
    ///
    /// Used for container repackaging (e.g. MP3 clip → `.m4r` ringtone).
    ///
    /// # Errors
    ///
    /// Same as [`save_clip`](ClipSource::save_clip), minus the extension
    /// inference.
    pub fn transcode<P: AsRef<Path>>(
        &mut self,
        out_path: P,
        format: AudioFormat,
    ) -> Result<(), RingclipError> {
        self.write_segment(out_path.as_ref(), format, None)
    }

    /// Decode → resample → encode → mux a segment of the audio stream.
    ///
    /// `range: None` means the full track. The effective range is clamped to
    /// the source duration; when nothing remains, the output still gets a
    /// valid header and trailer so downstream tools see a well-formed file.
    fn write_segment(
        &mut self,
        out_path: &Path,
        format: AudioFormat,
        range: Option<&ClipRange>,
    ) -> Result<(), RingclipError> {
        log::debug!(
            "Writing segment of {} to {} (format={format}, range={})",
            self.path.display(),
            out_path.display(),
            range.map_or_else(|| "full".to_string(), |r| r.to_string()),
        );

        // Clamp the range against the source. An inverted or out-of-bounds
        // range degrades to an empty segment rather than an error.
        let segment = range.map(|r| {
            let start = r.start().as_duration();
            let end = r.end().as_duration().min(self.duration);
            (start, end)
        });
        let segment_is_empty = segment.is_some_and(|(start, end)| start >= end);

        let stream = self
            .input_context
            .stream(self.audio_stream_index)
            .ok_or(RingclipError::NoAudioStream)?;
        let input_time_base = stream.time_base();
        let codec_parameters = stream.parameters();

        let decoder_context = CodecContext::from_parameters(codec_parameters)?;
        let mut decoder = decoder_context
            .decoder()
            .audio()
            .map_err(|error| RingclipError::AudioDecode(error.to_string()))?;

        let output_codec = ffmpeg_next::encoder::find(format.codec_id())
            .ok_or_else(|| RingclipError::UnsupportedAudioFormat(format.to_string()))?;

        // Pick a sample format the encoder supports.
        let output_sample_format = output_codec
            .audio()
            .ok()
            .and_then(|audio_codec| audio_codec.formats())
            .and_then(|mut formats| formats.next())
            .unwrap_or(Sample::I16(SampleType::Packed));

        let output_sample_rate = decoder.rate();
        let output_channel_layout = decoder.channel_layout();

        // Seek to the clip start before touching the output. Audio frames
        // are sync points, so the demuxer lands at (or just before) the
        // requested position.
        let boundaries = match segment {
            Some((start, end)) if !segment_is_empty => {
                let start_micros = start.as_micros() as i64;
                self.input_context.seek(start_micros, ..start_micros)?;
                Some((
                    duration_to_stream_timestamp(start, input_time_base),
                    duration_to_stream_timestamp(end, input_time_base),
                ))
            }
            _ => None,
        };

        let mut output_context = ffmpeg_next::format::output_as(&out_path, format.container_name())
            .map_err(|error| RingclipError::AudioEncode(error.to_string()))?;

        let (mut encoder, encoder_time_base) = create_audio_encoder(
            format,
            output_sample_format,
            output_sample_rate,
            output_channel_layout,
        )?;

        {
            let mut output_stream = output_context.add_stream(output_codec)?;
            output_stream.set_parameters(&encoder);
            output_stream.set_time_base(encoder_time_base);
        }

        output_context
            .write_header()
            .map_err(|error| RingclipError::AudioEncode(error.to_string()))?;

        let mut resampler = ResamplingContext::get(
            decoder.format(),
            decoder.channel_layout(),
            decoder.rate(),
            output_sample_format,
            output_channel_layout,
            output_sample_rate,
        )
        .map_err(|error| RingclipError::AudioEncode(error.to_string()))?;

        let mut decoded_frame = AudioFrame::empty();
        let mut resampled_frame = AudioFrame::empty();
        let mut encoded_packet = Packet::empty();
        let mut samples_written: i64 = 0;

        if !segment_is_empty {
            self.transcode_packets(
                &mut decoder,
                &mut resampler,
                &mut encoder,
                &mut decoded_frame,
                &mut resampled_frame,
                &mut encoded_packet,
                &mut samples_written,
                encoder_time_base,
                boundaries,
                &mut output_context,
            )?;

            // Flush the decoder.
            let _ = decoder.send_eof();
            while decoder.receive_frame(&mut decoded_frame).is_ok() {
                resample_encode_write(
                    &mut resampler,
                    &mut encoder,
                    &decoded_frame,
                    &mut resampled_frame,
                    &mut encoded_packet,
                    &mut samples_written,
                    encoder_time_base,
                    &mut output_context,
                )?;
            }
        }

        // Flush the encoder. For an empty segment this drains nothing but
        // still leaves a structurally valid file.
        let _ = encoder.send_eof();
        while encoder.receive_packet(&mut encoded_packet).is_ok() {
            encoded_packet.set_stream(0);
            encoded_packet.rescale_ts(encoder_time_base, encoder_time_base);
            write_packet(&mut encoded_packet, &mut output_context)?;
        }

        output_context
            .write_trailer()
            .map_err(|error| RingclipError::AudioEncode(error.to_string()))?;

        Ok(())
    }

    /// The packet pump: read, filter by range, decode, and hand frames to
    /// the resample/encode stage.
    #[allow(clippy::too_many_arguments)]
    fn transcode_packets(
        &mut self,
        decoder: &mut AudioDecoder,
        resampler: &mut ResamplingContext,
        encoder: &mut AudioEncoder,
        decoded_frame: &mut AudioFrame,
        resampled_frame: &mut AudioFrame,
        encoded_packet: &mut Packet,
        samples_written: &mut i64,
        encoder_time_base: Rational,
        boundaries: Option<(i64, i64)>,
        output_context: &mut Output,
    ) -> Result<(), RingclipError> {
        for (stream, packet) in self.input_context.packets() {
            if stream.index() != self.audio_stream_index {
                continue;
            }

            if let Some((_, end_timestamp)) = boundaries
                && let Some(packet_pts) = packet.pts()
                && packet_pts >= end_timestamp
            {
                break;
            }

            decoder
                .send_packet(&packet)
                .map_err(|error| RingclipError::AudioDecode(error.to_string()))?;

            while decoder.receive_frame(decoded_frame).is_ok() {
                if let Some((start_timestamp, end_timestamp)) = boundaries
                    && let Some(frame_pts) = decoded_frame.pts()
                {
                    // Seeking lands on the sync point at or before the start;
                    // drop whole frames outside [start, end).
                    if frame_pts < start_timestamp {
                        continue;
                    }
                    if frame_pts >= end_timestamp {
                        return Ok(());
                    }
                }

                resample_encode_write(
                    resampler,
                    encoder,
                    decoded_frame,
                    resampled_frame,
                    encoded_packet,
                    samples_written,
                    encoder_time_base,
                    output_context,
                )?;
            }
        }

        Ok(())
    }
}

/// Create an audio encoder configured for the given output format.
fn create_audio_encoder(
    format: AudioFormat,
    sample_format: Sample,
    sample_rate: u32,
    channel_layout: ChannelLayout,
) -> Result<(AudioEncoder, Rational), RingclipError> {
    let output_codec = ffmpeg_next::encoder::find(format.codec_id())
        .ok_or_else(|| RingclipError::UnsupportedAudioFormat(format.to_string()))?;

    let mut encoder_context = CodecContext::new()
        .encoder()
        .audio()
        .map_err(|error| RingclipError::AudioEncode(error.to_string()))?;

    encoder_context.set_rate(sample_rate as i32);
    encoder_context.set_channel_layout(channel_layout);
    encoder_context.set_format(sample_format);
    encoder_context.set_time_base(Rational(1, sample_rate as i32));

    match format {
        AudioFormat::Mp3 | AudioFormat::M4r => {
            encoder_context.set_bit_rate(192_000);
        }
        AudioFormat::Wav => {
            // Lossless; rate follows sample format.
        }
    }

    let encoder = encoder_context
        .open_as(output_codec)
        .map_err(|error| RingclipError::AudioEncode(error.to_string()))?;

    Ok((encoder, Rational(1, sample_rate as i32)))
}

/// Resample a decoded frame, encode it, and write the resulting packets.
#[allow(clippy::too_many_arguments)]
fn resample_encode_write(
    resampler: &mut ResamplingContext,
    encoder: &mut AudioEncoder,
    decoded_frame: &AudioFrame,
    resampled_frame: &mut AudioFrame,
    encoded_packet: &mut Packet,
    samples_written: &mut i64,
    encoder_time_base: Rational,
    output_context: &mut Output,
) -> Result<(), RingclipError> {
    resampler
        .run(decoded_frame, resampled_frame)
        .map_err(|error| RingclipError::AudioEncode(error.to_string()))?;

    resampled_frame.set_pts(Some(*samples_written));
    *samples_written += resampled_frame.samples() as i64;

    encoder
        .send_frame(resampled_frame)
        .map_err(|error| RingclipError::AudioEncode(error.to_string()))?;

    while encoder.receive_packet(encoded_packet).is_ok() {
        encoded_packet.set_stream(0);
        encoded_packet.rescale_ts(encoder_time_base, encoder_time_base);
        write_packet(encoded_packet, output_context)?;
    }

    Ok(())
}

fn write_packet(packet: &mut Packet, output_context: &mut Output) -> Result<(), RingclipError> {
    packet
        .write_interleaved(output_context)
        .map_err(|error| RingclipError::AudioEncode(error.to_string()))
}

/// Convert a [`Duration`] to a timestamp in the stream's time base.
fn duration_to_stream_timestamp(duration: Duration, time_base: Rational) -> i64 {
    let seconds = duration.as_secs_f64();
    let numerator = time_base.numerator() as f64;
    let denominator = time_base.denominator() as f64;
    (seconds * denominator / numerator) as i64
}

#[cfg(test)]
mod tests {
    use super::AudioFormat;

    #[test]
    fn format_from_extension() {
        assert_eq!(AudioFormat::from_path("clip.mp3"), Some(AudioFormat::Mp3));
        assert_eq!(AudioFormat::from_path("clip.MP3"), Some(AudioFormat::Mp3));
        assert_eq!(AudioFormat::from_path("tone.m4r"), Some(AudioFormat::M4r));
        assert_eq!(AudioFormat::from_path("tone.m4a"), Some(AudioFormat::M4r));
        assert_eq!(AudioFormat::from_path("raw.wav"), Some(AudioFormat::Wav));
        assert_eq!(AudioFormat::from_path("notes.txt"), None);
        assert_eq!(AudioFormat::from_path("no_extension"), None);
    }
}
