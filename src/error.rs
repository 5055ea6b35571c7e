//! Error types for the `ringclip` crate.
//!
//! This module defines [`RingclipError`], the unified error type returned by
//! all fallible operations in the crate. Variants carry enough context (file
//! paths, downloader output, parse reasons) to diagnose a failure without
//! additional logging at the call site.

use std::{io::Error as IoError, path::PathBuf};

use ffmpeg_next::Error as FfmpegError;
use thiserror::Error;

/// The unified error type for all `ringclip` operations.
///
/// Every public method that can fail returns `Result<T, RingclipError>`.
/// The CLI catches all of these once at the top level and renders them as a
/// single failure line.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum RingclipError {
    /// A timestamp string did not match the `MM:SS:mmm` shape.
    #[error("Malformed timestamp {value:?}: {reason} (expected MM:SS:mmm)")]
    MalformedTimestamp {
        /// The string that was passed in.
        value: String,
        /// What made it unparseable.
        reason: String,
    },

    /// The audio source file could not be opened.
    #[error("Failed to open media file at {path}: {reason}")]
    FileOpen {
        /// Path that was passed to [`crate::ClipSource::open`].
        path: PathBuf,
        /// Underlying reason the open failed.
        reason: String,
    },

    /// The file does not contain an audio stream.
    #[error("No audio stream found in file")]
    NoAudioStream,

    /// Audio data could not be decoded.
    #[error("Failed to decode audio: {0}")]
    AudioDecode(String),

    /// Audio data could not be encoded to the target format.
    #[error("Failed to encode audio: {0}")]
    AudioEncode(String),

    /// The output path has an extension no known audio format maps to.
    #[error("Unsupported audio output format: {0}")]
    UnsupportedAudioFormat(String),

    /// The downloader binary could not be launched at all.
    #[error("Failed to launch downloader {binary}: {reason}")]
    DownloaderSpawn {
        /// The binary that was invoked.
        binary: PathBuf,
        /// The spawn error text.
        reason: String,
    },

    /// The downloader ran but exited unsuccessfully.
    #[error("Download of {url} failed: {detail}")]
    DownloadFailed {
        /// The URL that was requested.
        url: String,
        /// Exit status plus a tail of the downloader's stderr.
        detail: String,
    },

    /// The downloader reported success but the expected file never
    /// materialized on disk.
    #[error("Downloaded audio missing at expected path {path}")]
    FetchIntegrity {
        /// Where the audio file was supposed to land.
        path: PathBuf,
    },

    /// The downloader's metadata print-out could not be parsed.
    #[error("Could not parse downloader metadata: {0}")]
    MetadataParse(String),

    /// An error originating from the FFmpeg libraries.
    #[error("FFmpeg error: {0}")]
    Ffmpeg(String),

    /// An I/O error occurred while reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] IoError),
}

impl From<FfmpegError> for RingclipError {
    fn from(error: FfmpegError) -> Self {
        RingclipError::Ffmpeg(error.to_string())
    }
}
