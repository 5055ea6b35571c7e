//! Video-title sanitization.
//!
//! Video titles are arbitrary untrusted strings; the downloaded source file
//! is named after the title, so it has to be reduced to something every
//! filesystem accepts.
//!
//! The policy is a single canonical pass: every character outside
//! `[A-Za-z0-9._-]` is replaced by an underscore, then runs of underscores
//! are collapsed. Spaces therefore become underscores rather than being
//! dropped, dots survive so extensions stay intact, and the output is pure
//! ASCII. Results longer than [`MAX_FILENAME_BYTES`] are truncated from the
//! root while preserving the extension after the last dot.

/// Maximum length of a sanitized filename, in bytes.
///
/// 255 bytes is the common per-component limit across ext4, APFS, and NTFS.
pub const MAX_FILENAME_BYTES: usize = 255;

/// Fallback name used when sanitization consumes the entire input.
const FALLBACK_NAME: &str = "audio";

/// Map an arbitrary string to a filesystem-safe file name.
///
/// Never fails; an empty or all-disallowed input yields `"audio"`.
///
/// # Example
///
/// ```
/// use ringclip::sanitize;
///
/// assert_eq!(sanitize("My Song (Live).mp3"), "My_Song_Live_.mp3");
/// assert_eq!(sanitize("***"), "_");
/// assert_eq!(sanitize(""), "audio");
/// ```
pub fn sanitize(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut last_was_underscore = false;

    for character in raw.chars() {
        let mapped = if character.is_ascii_alphanumeric()
            || character == '.'
            || character == '-'
            || character == '_'
        {
            character
        } else {
            '_'
        };

        if mapped == '_' {
            if last_was_underscore {
                continue;
            }
            last_was_underscore = true;
        } else {
            last_was_underscore = false;
        }
        out.push(mapped);
    }

    if out.is_empty() {
        return FALLBACK_NAME.to_string();
    }

    truncate_preserving_extension(out)
}

/// Cap the name at [`MAX_FILENAME_BYTES`], keeping whatever follows the last
/// dot intact.
///
/// The input is ASCII-only by construction, so byte indexing is safe. An
/// extension longer than the whole budget degenerates to plain truncation.
fn truncate_preserving_extension(name: String) -> String {
    if name.len() <= MAX_FILENAME_BYTES {
        return name;
    }

    match name.rfind('.') {
        Some(dot_index) if name.len() - dot_index < MAX_FILENAME_BYTES => {
            let extension = &name[dot_index..];
            let root_budget = MAX_FILENAME_BYTES - extension.len();
            format!("{}{}", &name[..root_budget], extension)
        }
        _ => name[..MAX_FILENAME_BYTES].to_string(),
    }
}
