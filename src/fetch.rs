//! Audio retrieval via the external `yt-dlp` binary.
//!
//! Network retrieval and initial transcoding are delegated wholesale to
//! `yt-dlp` (which in turn drives ffmpeg for audio extraction). This module
//! builds the command line, runs it synchronously, recovers the video title
//! from a `--print` JSON payload, and verifies that the promised file
//! actually landed on disk.

use std::{
    path::{Path, PathBuf},
    process::{Command, Stdio},
};

use crate::error::RingclipError;

/// File stem the downloader writes to, before the title rename.
pub const DOWNLOAD_STEM: &str = "downloaded_audio";

/// How many trailing stderr lines to keep for error reporting.
const STDERR_TAIL_LINES: usize = 12;

/// Options for a [`fetch_audio`] invocation.
///
/// # Example
///
/// ```
/// use ringclip::FetchOptions;
///
/// let options = FetchOptions::new()
///     .with_binary("/usr/local/bin/yt-dlp")
///     .with_audio_quality("128");
/// ```
#[derive(Debug, Clone)]
pub struct FetchOptions {
    binary: PathBuf,
    audio_format: String,
    audio_quality: String,
}

impl Default for FetchOptions {
    fn default() -> Self {
        FetchOptions {
            binary: PathBuf::from("yt-dlp"),
            audio_format: "mp3".to_string(),
            audio_quality: "192".to_string(),
        }
    }
}

impl FetchOptions {
    /// Default options: `yt-dlp` from `PATH`, MP3 at 192 kbit/s.
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a specific downloader binary instead of `yt-dlp` from `PATH`.
    #[must_use]
    pub fn with_binary<P: AsRef<Path>>(mut self, binary: P) -> Self {
        self.binary = binary.as_ref().to_path_buf();
        self
    }

    /// Target audio format passed to `--audio-format` (default `mp3`).
    #[must_use]
    pub fn with_audio_format<S: Into<String>>(mut self, format: S) -> Self {
        self.audio_format = format.into();
        self
    }

    /// Target quality passed to `--audio-quality` (default `192`).
    #[must_use]
    pub fn with_audio_quality<S: Into<String>>(mut self, quality: S) -> Self {
        self.audio_quality = quality.into();
        self
    }

    /// The path the downloaded file is expected at after extraction.
    pub fn expected_output(&self) -> PathBuf {
        PathBuf::from(format!("{DOWNLOAD_STEM}.{}", self.audio_format))
    }

    fn build_command(&self, url: &str) -> Command {
        let mut command = Command::new(&self.binary);
        command
            .arg("-f")
            .arg("bestaudio/best")
            .arg("-x")
            .arg("--audio-format")
            .arg(&self.audio_format)
            .arg("--audio-quality")
            .arg(&self.audio_quality)
            .arg("--no-playlist")
            .arg("--no-part")
            .arg("-o")
            .arg(format!("{DOWNLOAD_STEM}.%(ext)s"))
            // --print implies quiet simulation; --no-simulate restores the
            // actual download while keeping stdout to the JSON line below.
            .arg("--no-simulate")
            .arg("--print")
            .arg("%(.{title,ext})j")
            .arg(url)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        command
    }
}

/// A successfully fetched audio track.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedAudio {
    /// Where the audio landed on disk.
    pub path: PathBuf,
    /// The video title as reported by the downloader, unsanitized.
    pub title: String,
}

/// Download the audio track of `url` into the working directory.
///
/// Blocks until the downloader exits; no timeout is applied. On success the
/// file is guaranteed to exist at the returned path.
///
/// # Errors
///
/// - [`RingclipError::DownloaderSpawn`] if the binary cannot be launched.
/// - [`RingclipError::DownloadFailed`] if it exits unsuccessfully; the error
///   carries a tail of its stderr.
/// - [`RingclipError::MetadataParse`] if the title payload is garbled.
/// - [`RingclipError::FetchIntegrity`] if the downloader claims success but
///   the expected file is missing.
pub fn fetch_audio(url: &str, options: &FetchOptions) -> Result<FetchedAudio, RingclipError> {
    log::info!("Fetching audio for {url}");

    let output = options
        .build_command(url)
        .output()
        .map_err(|error| RingclipError::DownloaderSpawn {
            binary: options.binary.clone(),
            reason: error.to_string(),
        })?;

    if !output.status.success() {
        return Err(RingclipError::DownloadFailed {
            url: url.to_string(),
            detail: format!(
                "{}\n{}",
                output.status,
                stderr_tail(&String::from_utf8_lossy(&output.stderr))
            ),
        });
    }

    let stdout = String::from_utf8_lossy(&output.stdout);
    let title = parse_print_payload(stdout.lines().next().unwrap_or_default())?;

    let path = options.expected_output();
    if !path.exists() {
        return Err(RingclipError::FetchIntegrity { path });
    }

    log::info!("Downloaded {:?} to {}", title, path.display());
    Ok(FetchedAudio { path, title })
}

/// Extract the title from the `--print "%(.{title,ext})j"` JSON line.
fn parse_print_payload(line: &str) -> Result<String, RingclipError> {
    let payload: serde_json::Value = serde_json::from_str(line)
        .map_err(|error| RingclipError::MetadataParse(format!("{error} in {line:?}")))?;

    payload
        .get("title")
        .and_then(|title| title.as_str())
        .map(str::to_string)
        .ok_or_else(|| {
            RingclipError::MetadataParse(format!("no title field in payload {line:?}"))
        })
}

/// Last few lines of the downloader's stderr, for error messages.
fn stderr_tail(stderr: &str) -> String {
    let lines: Vec<&str> = stderr.lines().filter(|line| !line.is_empty()).collect();
    if lines.is_empty() {
        return "no stderr output captured".to_string();
    }
    let skip = lines.len().saturating_sub(STDERR_TAIL_LINES);
    lines[skip..].join("\n")
}

#[cfg(test)]
mod tests {
    use super::{FetchOptions, parse_print_payload, stderr_tail};

    #[test]
    fn expected_output_follows_audio_format() {
        assert_eq!(
            FetchOptions::new().expected_output().to_str(),
            Some("downloaded_audio.mp3")
        );
        assert_eq!(
            FetchOptions::new()
                .with_audio_format("wav")
                .expected_output()
                .to_str(),
            Some("downloaded_audio.wav")
        );
    }

    #[test]
    fn print_payload_parses_title() {
        let title = parse_print_payload(r#"{"title": "My Song (Live)", "ext": "webm"}"#).unwrap();
        assert_eq!(title, "My Song (Live)");
    }

    #[test]
    fn print_payload_rejects_garbage() {
        assert!(parse_print_payload("").is_err());
        assert!(parse_print_payload("not json").is_err());
        assert!(parse_print_payload(r#"{"ext": "webm"}"#).is_err());
        assert!(parse_print_payload(r#"{"title": 42}"#).is_err());
    }

    #[test]
    fn stderr_tail_keeps_last_lines() {
        let many: String = (0..40).map(|i| format!("line {i}\n")).collect();
        let tail = stderr_tail(&many);
        assert!(tail.ends_with("line 39"));
        assert!(!tail.contains("line 0\n"));

        assert_eq!(stderr_tail(""), "no stderr output captured");
    }
}
