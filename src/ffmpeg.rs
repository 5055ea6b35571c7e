//! FFmpeg log level plumbing.
//!
//! FFmpeg has its own logging system, separate from the Rust [`log`] facade,
//! and by default it prints warnings to stderr. That output would interleave
//! with the CLI's own progress and success lines, so the binary turns it down
//! to `Error` unless asked for more.

use ffmpeg_next::util::log::Level;

/// FFmpeg internal log verbosity, most quiet first.
///
/// A deliberately reduced set of FFmpeg's `AV_LOG_*` constants; the fine
/// gradations (panic, fatal, verbose, trace) add nothing for a single-shot
/// clipping tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FfmpegLogLevel {
    /// Print nothing at all.
    Quiet,
    /// Recoverable errors only.
    Error,
    /// Warnings and errors (FFmpeg's default).
    Warning,
    /// Informational messages.
    Info,
    /// Debugging output.
    Debug,
}

impl FfmpegLogLevel {
    fn to_ffmpeg_level(self) -> Level {
        match self {
            FfmpegLogLevel::Quiet => Level::Quiet,
            FfmpegLogLevel::Error => Level::Error,
            FfmpegLogLevel::Warning => Level::Warning,
            FfmpegLogLevel::Info => Level::Info,
            FfmpegLogLevel::Debug => Level::Debug,
        }
    }
}

/// Set FFmpeg's internal stderr verbosity.
///
/// This controls what the FFmpeg libraries print themselves; Rust-side
/// diagnostics go through the `log` crate and are configured separately.
pub fn set_ffmpeg_log_level(level: FfmpegLogLevel) {
    ffmpeg_next::util::log::set_level(level.to_ffmpeg_level());
}
