//! Ringtone packaging integration tests.
//!
//! Tests require fixture files from `tests/fixtures/generate_fixtures.sh`
//! and are skipped when the fixtures are absent.

use std::{path::Path, time::Duration};

use ringclip::{ClipSource, RingclipError, ringtone};

fn sample_audio_path() -> &'static str {
    "tests/fixtures/sample_audio.wav"
}

#[test]
fn package_produces_readable_m4r() {
    let path = sample_audio_path();
    if !Path::new(path).exists() {
        return;
    }

    let tmp = tempfile::NamedTempFile::new().expect("Failed to create temp file");
    let output_path = tmp.path().with_extension("m4r");

    ringtone::package(path, &output_path).expect("Failed to package ringtone");

    let packaged = ClipSource::open(&output_path).expect("Failed to reopen ringtone");
    let difference = packaged
        .duration()
        .abs_diff(Duration::from_secs(10));
    assert!(
        difference < Duration::from_millis(300),
        "expected ~10s, got {:?}",
        packaged.duration()
    );

    let _ = std::fs::remove_file(&output_path);
}

#[test]
fn package_nonexistent_input_errors() {
    let result = ringtone::package("this_does_not_exist.mp3", "out.m4r");
    assert!(matches!(result, Err(RingclipError::FileOpen { .. })));
}
