use std::{fs, path::PathBuf};

use clap::Parser;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use ringclip::{
    ClipRange, ClipSource, FetchOptions, FfmpegLogLevel, RingclipError, fetch_audio, filename,
    ringtone, set_ffmpeg_log_level,
};

const CLI_AFTER_HELP: &str = "Examples:\n  ringclip https://youtu.be/dQw4w9WgXcQ 00:43:500 01:13:500\n  ringclip https://youtu.be/dQw4w9WgXcQ 0:5:0 0:35:0 --iphone";

/// Default output artifact for the MP3 path.
const MP3_OUTPUT: &str = "alarm_clip.mp3";
/// Default output artifact when packaging for iPhone.
const M4R_OUTPUT: &str = "alarm_clip.m4r";

#[derive(Debug, Parser)]
#[command(
    name = "ringclip",
    version,
    about = "Download a video's audio track and clip a segment as a ringtone",
    after_help = CLI_AFTER_HELP
)]
struct Cli {
    /// URL of the video to pull audio from.
    url: String,

    /// Clip start in MM:SS:mmm.
    start_time: String,

    /// Clip end in MM:SS:mmm.
    end_time: String,

    /// Package the clip as an iPhone ringtone (.m4r) instead of MP3.
    #[arg(long)]
    iphone: bool,

    /// Show additional logging output.
    #[arg(long)]
    verbose: bool,

    /// Downloader binary to use instead of `yt-dlp` from PATH.
    #[arg(long)]
    downloader: Option<PathBuf>,
}

fn output_name(iphone: bool) -> &'static str {
    if iphone { M4R_OUTPUT } else { MP3_OUTPUT }
}

fn fetch_options(cli: &Cli) -> FetchOptions {
    match &cli.downloader {
        Some(binary) => FetchOptions::new().with_binary(binary),
        None => FetchOptions::new(),
    }
}

/// Build the persisted source file name from a raw title and extension.
///
/// The title is sanitized on its own so an empty or all-disallowed title
/// falls back to `audio` (rather than collapsing into an extension-only
/// dotfile), then the extension goes back on and the combined name is run
/// through the length guard.
fn source_file_name(title: &str, extension: &str) -> String {
    let stem = filename::sanitize(title);
    filename::sanitize(&format!("{stem}.{extension}"))
}

/// Rename the downloaded file after its sanitized title, keeping the
/// extension. The renamed file is the persisted source artifact.
fn rename_to_title(fetched: &ringclip::FetchedAudio) -> Result<PathBuf, RingclipError> {
    let extension = fetched
        .path
        .extension()
        .and_then(|extension| extension.to_str())
        .unwrap_or("mp3");
    let target = PathBuf::from(source_file_name(&fetched.title, extension));

    if target != fetched.path {
        fs::rename(&fetched.path, &target)?;
    }
    Ok(target)
}

fn run() -> Result<(), RingclipError> {
    let cli = Cli::parse();

    env_logger::init_from_env(
        env_logger::Env::new().default_filter_or(if cli.verbose { "debug" } else { "info" }),
    );
    set_ffmpeg_log_level(if cli.verbose {
        FfmpegLogLevel::Info
    } else {
        FfmpegLogLevel::Error
    });

    // Parse both timestamps up front so a typo fails before any download.
    let range = ClipRange::parse(&cli.start_time, &cli.end_time)?;

    let spinner = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner:.green} {msg}") {
        spinner.set_style(style);
    }
    spinner.set_message("downloading audio...");
    spinner.enable_steady_tick(std::time::Duration::from_millis(100));

    let fetch_result = fetch_audio(&cli.url, &fetch_options(&cli));
    spinner.finish_and_clear();
    let fetched = fetch_result?;

    let source_path = rename_to_title(&fetched)?;
    let output = output_name(cli.iphone);

    let mut source = ClipSource::open(&source_path)?;
    source.save_clip(MP3_OUTPUT, &range)?;

    if cli.iphone {
        ringtone::package(MP3_OUTPUT, M4R_OUTPUT)?;
        fs::remove_file(MP3_OUTPUT)?;
    }

    println!(
        "{} {}",
        "saved".green().bold(),
        format!("{output} ({} ms from {:?})", range.span_millis(), fetched.title).green()
    );

    Ok(())
}

fn main() {
    // Single-shot tool: every failure funnels through one message and the
    // exit code stays zero.
    if let Err(error) = run() {
        println!("An error occurred: {error}");
    }
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::{Cli, M4R_OUTPUT, MP3_OUTPUT, output_name, source_file_name};

    #[test]
    fn output_name_follows_iphone_flag() {
        assert_eq!(output_name(false), MP3_OUTPUT);
        assert_eq!(output_name(true), M4R_OUTPUT);
    }

    #[test]
    fn source_file_name_keeps_extension() {
        assert_eq!(source_file_name("My Song (Live)", "mp3"), "My_Song_Live_.mp3");
    }

    #[test]
    fn empty_title_falls_back_to_audio() {
        // An empty title must not produce an extension-only dotfile.
        assert_eq!(source_file_name("", "mp3"), "audio.mp3");
        assert_eq!(source_file_name("☺☺☺", "mp3"), "_.mp3");
    }

    #[test]
    fn long_title_stays_within_filename_limit() {
        let name = source_file_name(&"x".repeat(400), "mp3");
        assert!(name.len() <= 255);
        assert!(name.ends_with(".mp3"));
    }

    #[test]
    fn positional_arguments_parse() {
        let cli = Cli::try_parse_from([
            "ringclip",
            "https://youtu.be/abc",
            "00:03:000",
            "00:08:000",
        ])
        .unwrap();
        assert_eq!(cli.url, "https://youtu.be/abc");
        assert_eq!(cli.start_time, "00:03:000");
        assert_eq!(cli.end_time, "00:08:000");
        assert!(!cli.iphone);
    }

    #[test]
    fn iphone_flag_parses() {
        let cli = Cli::try_parse_from([
            "ringclip",
            "https://youtu.be/abc",
            "0:3:0",
            "0:8:0",
            "--iphone",
        ])
        .unwrap();
        assert!(cli.iphone);
    }

    #[test]
    fn missing_positionals_are_rejected() {
        assert!(Cli::try_parse_from(["ringclip", "https://youtu.be/abc"]).is_err());
    }
}
