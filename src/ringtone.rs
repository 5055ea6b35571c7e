//! Ringtone container repackaging.
//!
//! iPhones only accept ringtones as AAC audio inside an `ipod`-flavoured MP4
//! container with an `.m4r` extension. This module re-encodes a finished
//! clip into that layout.

use std::{path::Path, time::Duration};

use crate::{
    clip::{AudioFormat, ClipSource},
    error::RingclipError,
};

/// iOS truncates ringtones longer than this.
const MAX_RINGTONE_LENGTH: Duration = Duration::from_secs(40);

/// Repackage an audio clip as an iPhone ringtone.
///
/// Re-encodes the whole of `input` as AAC in the `ipod` container at
/// `output`. The conventional extension for `output` is `.m4r`, but the
/// container is written regardless of what the path looks like.
///
/// # Errors
///
/// - [`RingclipError::FileOpen`] / [`RingclipError::NoAudioStream`] if the
///   clip cannot be read back.
/// - [`RingclipError::AudioEncode`] if AAC encoding fails (e.g. no AAC
///   encoder in the FFmpeg build).
///
/// # Example
///
/// ```no_run
/// use ringclip::{RingclipError, ringtone};
///
/// ringtone::package("alarm_clip.mp3", "alarm_clip.m4r")?;
/// # Ok::<(), RingclipError>(())
/// ```
pub fn package<P1: AsRef<Path>, P2: AsRef<Path>>(
    input: P1,
    output: P2,
) -> Result<(), RingclipError> {
    let mut source = ClipSource::open(input.as_ref())?;

    if source.duration() > MAX_RINGTONE_LENGTH {
        log::warn!(
            "Clip runs {:.1}s; iOS ignores ringtones longer than {}s",
            source.duration().as_secs_f64(),
            MAX_RINGTONE_LENGTH.as_secs(),
        );
    }

    source.transcode(output.as_ref(), AudioFormat::M4r)
}
