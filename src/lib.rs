//! # ringclip
//!
//! Download the audio track of a remote video, clip a time range out of it,
//! and optionally package the result as an iPhone ringtone.
//!
//! Retrieval is delegated to the external `yt-dlp` binary and all codec work
//! to FFmpeg via [`ffmpeg-next`](https://crates.io/crates/ffmpeg-next); the
//! crate itself owns the timestamp arithmetic, the range clamping, and the
//! title sanitization in between.
//!
//! ## Quick Start
//!
//! ```no_run
//! use ringclip::{ClipRange, ClipSource, FetchOptions, fetch_audio};
//!
//! let fetched = fetch_audio("https://youtu.be/abc123", &FetchOptions::new()).unwrap();
//! let range = ClipRange::parse("00:03:000", "00:08:000").unwrap();
//!
//! let mut source = ClipSource::open(&fetched.path).unwrap();
//! source.save_clip("alarm_clip.mp3", &range).unwrap();
//! ```
//!
//! ## Timestamps
//!
//! Clip boundaries use the `MM:SS:mmm` shape with positional weights of
//! 60000/1000/1 milliseconds and no per-field bounds; `"90:00:000"` is a
//! valid ninety minutes. Inverted ranges clip to an empty file and ends past
//! the source are truncated — range handling never fails.
//!
//! ## Requirements
//!
//! The FFmpeg development libraries must be installed on the system, and
//! `yt-dlp` must be on `PATH` (or configured via
//! [`FetchOptions::with_binary`]).

pub mod clip;
pub mod error;
pub mod fetch;
pub mod ffmpeg;
pub mod filename;
pub mod ringtone;
pub mod timestamp;

pub use clip::{AudioFormat, ClipSource};
pub use error::RingclipError;
pub use fetch::{FetchOptions, FetchedAudio, fetch_audio};
pub use ffmpeg::{FfmpegLogLevel, set_ffmpeg_log_level};
pub use filename::sanitize;
pub use timestamp::{ClipRange, Timestamp};
