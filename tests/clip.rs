//! Clipping integration tests.
//!
//! Tests require fixture files from `tests/fixtures/generate_fixtures.sh`
//! and are skipped when the fixtures are absent.

use std::{path::Path, time::Duration};

use ringclip::{ClipRange, ClipSource, RingclipError};

fn sample_audio_path() -> &'static str {
    "tests/fixtures/sample_audio.wav"
}

/// Duration of the generated fixture.
const FIXTURE_LENGTH: Duration = Duration::from_secs(10);

/// Container-level durations are only frame-accurate; half a codec frame of
/// slack either way is expected.
fn roughly(actual: Duration, expected: Duration) -> bool {
    let difference = if actual > expected {
        actual - expected
    } else {
        expected - actual
    };
    difference < Duration::from_millis(200)
}

#[test]
fn clip_five_second_range() {
    let path = sample_audio_path();
    if !Path::new(path).exists() {
        return;
    }

    let tmp = tempfile::NamedTempFile::new().expect("Failed to create temp file");
    let output_path = tmp.path().with_extension("wav");

    let range = ClipRange::parse("00:03:000", "00:08:000").unwrap();
    let mut source = ClipSource::open(path).expect("Failed to open fixture");
    assert!(roughly(source.duration(), FIXTURE_LENGTH));

    source.save_clip(&output_path, &range).expect("Failed to clip");

    let clipped = ClipSource::open(&output_path).expect("Failed to reopen clip");
    assert!(
        roughly(clipped.duration(), Duration::from_secs(5)),
        "expected ~5s, got {:?}",
        clipped.duration()
    );

    let _ = std::fs::remove_file(&output_path);
}

#[test]
fn requested_span_round_trips() {
    let path = sample_audio_path();
    if !Path::new(path).exists() {
        return;
    }

    let tmp = tempfile::NamedTempFile::new().expect("Failed to create temp file");
    let output_path = tmp.path().with_extension("wav");

    let range = ClipRange::parse("0:1:250", "0:7:750").unwrap();
    let mut source = ClipSource::open(path).expect("Failed to open fixture");
    source.save_clip(&output_path, &range).expect("Failed to clip");

    let clipped = ClipSource::open(&output_path).expect("Failed to reopen clip");
    assert!(
        roughly(clipped.duration(), Duration::from_millis(range.span_millis())),
        "requested {} ms, got {:?}",
        range.span_millis(),
        clipped.duration()
    );

    let _ = std::fs::remove_file(&output_path);
}

#[test]
fn inverted_range_yields_empty_clip() {
    let path = sample_audio_path();
    if !Path::new(path).exists() {
        return;
    }

    let tmp = tempfile::NamedTempFile::new().expect("Failed to create temp file");
    let output_path = tmp.path().with_extension("wav");

    // Start after end: not an error, just an empty result.
    let range = ClipRange::parse("00:08:000", "00:03:000").unwrap();
    let mut source = ClipSource::open(path).expect("Failed to open fixture");
    source.save_clip(&output_path, &range).expect("Empty clip should not fail");

    assert!(output_path.exists(), "Empty clip should still be written");
    let clipped = ClipSource::open(&output_path).expect("Failed to reopen empty clip");
    assert!(
        clipped.duration() < Duration::from_millis(100),
        "expected ~0s, got {:?}",
        clipped.duration()
    );

    let _ = std::fs::remove_file(&output_path);
}

#[test]
fn end_past_source_is_truncated() {
    let path = sample_audio_path();
    if !Path::new(path).exists() {
        return;
    }

    let tmp = tempfile::NamedTempFile::new().expect("Failed to create temp file");
    let output_path = tmp.path().with_extension("wav");

    let range = ClipRange::parse("00:08:000", "05:00:000").unwrap();
    let mut source = ClipSource::open(path).expect("Failed to open fixture");
    source.save_clip(&output_path, &range).expect("Truncated clip should not fail");

    let clipped = ClipSource::open(&output_path).expect("Failed to reopen clip");
    assert!(
        roughly(clipped.duration(), Duration::from_secs(2)),
        "expected ~2s, got {:?}",
        clipped.duration()
    );

    let _ = std::fs::remove_file(&output_path);
}

#[test]
fn range_entirely_past_source_yields_empty_clip() {
    let path = sample_audio_path();
    if !Path::new(path).exists() {
        return;
    }

    let tmp = tempfile::NamedTempFile::new().expect("Failed to create temp file");
    let output_path = tmp.path().with_extension("wav");

    let range = ClipRange::parse("01:00:000", "02:00:000").unwrap();
    let mut source = ClipSource::open(path).expect("Failed to open fixture");
    source.save_clip(&output_path, &range).expect("Out-of-range clip should not fail");

    let clipped = ClipSource::open(&output_path).expect("Failed to reopen clip");
    assert!(clipped.duration() < Duration::from_millis(100));

    let _ = std::fs::remove_file(&output_path);
}

#[test]
fn unknown_output_extension_is_rejected() {
    let path = sample_audio_path();
    if !Path::new(path).exists() {
        return;
    }

    let range = ClipRange::parse("0:0:0", "0:1:0").unwrap();
    let mut source = ClipSource::open(path).expect("Failed to open fixture");
    let result = source.save_clip("clip.xyz", &range);
    assert!(matches!(
        result,
        Err(RingclipError::UnsupportedAudioFormat(_))
    ));
}

#[test]
fn nonexistent_input_errors() {
    let result = ClipSource::open("this_does_not_exist.mp3");
    assert!(matches!(result, Err(RingclipError::FileOpen { .. })));
}
