//! Clip timestamps and time ranges.
//!
//! Timestamps use the `MM:SS:mmm` shape: minutes, seconds, and milliseconds,
//! colon-separated, each a plain non-negative integer. No zero-padding is
//! required and no field has an upper bound — `"90:00:000"` is ninety
//! minutes. The positional weights (60000 / 1000 / 1) are the whole story.

use std::{fmt, str::FromStr, time::Duration};

use crate::error::RingclipError;

/// A point in time within an audio track, stored as milliseconds.
///
/// # Example
///
/// ```
/// use ringclip::Timestamp;
///
/// let ts: Timestamp = "1:23:500".parse().unwrap();
/// assert_eq!(ts.as_millis(), 83_500);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timestamp(u64);

impl Timestamp {
    /// Construct a timestamp from a raw millisecond count.
    pub fn from_millis(milliseconds: u64) -> Self {
        Timestamp(milliseconds)
    }

    /// The timestamp as a millisecond count.
    pub fn as_millis(self) -> u64 {
        self.0
    }

    /// The timestamp as a [`Duration`].
    pub fn as_duration(self) -> Duration {
        Duration::from_millis(self.0)
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let minutes = self.0 / 60_000;
        let seconds = (self.0 / 1_000) % 60;
        let milliseconds = self.0 % 1_000;
        write!(f, "{minutes:02}:{seconds:02}:{milliseconds:03}")
    }
}

impl FromStr for Timestamp {
    type Err = RingclipError;

    /// Parse an `MM:SS:mmm` string.
    ///
    /// # Errors
    ///
    /// Returns [`RingclipError::MalformedTimestamp`] when the string does not
    /// split into exactly three colon-separated components, when any
    /// component is not a non-negative integer, or when the total overflows
    /// the millisecond range.
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let components: Vec<&str> = value.split(':').collect();
        if components.len() != 3 {
            return Err(RingclipError::MalformedTimestamp {
                value: value.to_string(),
                reason: format!("expected 3 components, got {}", components.len()),
            });
        }

        let mut milliseconds: u64 = 0;
        for (component, weight) in components.iter().zip([60_000_u64, 1_000, 1]) {
            let field: u64 =
                component
                    .parse()
                    .map_err(|_| RingclipError::MalformedTimestamp {
                        value: value.to_string(),
                        reason: format!("{component:?} is not a non-negative integer"),
                    })?;
            milliseconds = field
                .checked_mul(weight)
                .and_then(|weighted| milliseconds.checked_add(weighted))
                .ok_or_else(|| RingclipError::MalformedTimestamp {
                    value: value.to_string(),
                    reason: "total overflows the millisecond range".to_string(),
                })?;
        }

        Ok(Timestamp(milliseconds))
    }
}

/// An ordered `[start, end)` pair of timestamps selecting a sub-range of an
/// audio track.
///
/// The range is deliberately unvalidated: an inverted range (`start >= end`)
/// selects nothing and clips to an empty file, and an `end` past the source
/// duration is truncated at the source end. Neither is an error — see
/// [`ClipSource::save_clip`](crate::ClipSource::save_clip).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClipRange {
    start: Timestamp,
    end: Timestamp,
}

impl ClipRange {
    /// Create a range from two timestamps.
    pub fn new(start: Timestamp, end: Timestamp) -> Self {
        ClipRange { start, end }
    }

    /// Parse a range from two `MM:SS:mmm` strings.
    ///
    /// # Errors
    ///
    /// Returns [`RingclipError::MalformedTimestamp`] if either string fails
    /// to parse.
    pub fn parse(start: &str, end: &str) -> Result<Self, RingclipError> {
        Ok(ClipRange {
            start: start.parse()?,
            end: end.parse()?,
        })
    }

    /// The inclusive start of the range.
    pub fn start(&self) -> Timestamp {
        self.start
    }

    /// The exclusive end of the range.
    pub fn end(&self) -> Timestamp {
        self.end
    }

    /// Whether the range selects nothing (`start >= end`).
    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }

    /// The span of the range in milliseconds, zero when inverted.
    pub fn span_millis(&self) -> u64 {
        self.end.as_millis().saturating_sub(self.start.as_millis())
    }
}

impl fmt::Display for ClipRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {})", self.start, self.end)
    }
}
