//! Normalization of `itunes:duration` values.
//!
//! Publishers write durations as plain second counts (`"3600"`), as clock
//! strings (`"1:00:00"`, `"59:59"`), or not at all. Everything is folded into
//! a total number of seconds and rendered as `HH:MM:SS` (when there is at
//! least one hour) or `MM:SS`.
//!
//! Formatting never fails. Unparseable fragments count as zero so a single
//! sloppy episode cannot take down an otherwise valid feed.

const SECONDS_PER_MINUTE: i64 = 60;
const SECONDS_PER_HOUR: i64 = 3600;

/// Colon components that carry meaning: seconds, minutes, hours.
const MAX_CLOCK_COMPONENTS: usize = 3;

/// A duration as it appears in a feed, before normalization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawDuration {
    /// Whole seconds.
    Seconds(i64),
    /// Free-form text: `"H:M:S"`, `"M:S"`, or `"S"`.
    Text(String),
}

impl Default for RawDuration {
    fn default() -> Self {
        RawDuration::Seconds(0)
    }
}

impl From<i64> for RawDuration {
    fn from(seconds: i64) -> Self {
        RawDuration::Seconds(seconds)
    }
}

impl From<f64> for RawDuration {
    /// Truncates toward zero. `NaN` and infinities become zero.
    fn from(seconds: f64) -> Self {
        if seconds.is_finite() {
            // `as` saturates at the i64 bounds
            RawDuration::Seconds(seconds.trunc() as i64)
        } else {
            RawDuration::Seconds(0)
        }
    }
}

impl From<&str> for RawDuration {
    fn from(text: &str) -> Self {
        RawDuration::Text(text.to_owned())
    }
}

impl From<String> for RawDuration {
    fn from(text: String) -> Self {
        RawDuration::Text(text)
    }
}

impl RawDuration {
    /// Total seconds represented by this value, never negative.
    pub fn total_seconds(&self) -> u64 {
        let total = match self {
            RawDuration::Seconds(n) => *n,
            RawDuration::Text(text) if text.contains(':') => clock_seconds(text),
            RawDuration::Text(text) => lenient_int(text),
        };
        // Negative durations are meaningless; clamp them to zero
        u64::try_from(total).unwrap_or(0)
    }
}

/// Formats a feed duration as `HH:MM:SS` or `MM:SS`.
///
/// # Examples
///
/// ```
/// use podfeed::feed::{format_duration, RawDuration};
///
/// assert_eq!(format_duration(&RawDuration::Seconds(3661)), "01:01:01");
/// assert_eq!(format_duration(&RawDuration::from("5:09")), "05:09");
/// assert_eq!(format_duration(&RawDuration::from("soon")), "00:00");
/// ```
pub fn format_duration(value: &RawDuration) -> String {
    let total = value.total_seconds();
    let hours = total / SECONDS_PER_HOUR as u64;
    let minutes = (total % SECONDS_PER_HOUR as u64) / SECONDS_PER_MINUTE as u64;
    let seconds = total % SECONDS_PER_MINUTE as u64;

    if hours > 0 {
        format!("{hours:02}:{minutes:02}:{seconds:02}")
    } else {
        format!("{minutes:02}:{seconds:02}")
    }
}

/// Sums colon-separated components right to left as seconds, minutes, hours.
///
/// Components left of the hours position are ignored.
fn clock_seconds(text: &str) -> i64 {
    text.rsplit(':')
        .take(MAX_CLOCK_COMPONENTS)
        .zip([1, SECONDS_PER_MINUTE, SECONDS_PER_HOUR])
        .fold(0i64, |acc, (part, unit)| {
            acc.saturating_add(lenient_int(part).saturating_mul(unit))
        })
}

/// Parses the leading integer of `text`, yielding 0 when there is none.
///
/// Accepts leading whitespace and an optional sign, then reads ASCII digits
/// up to the first non-digit: `"12abc"` is 12, `"1.5"` is 1, `"abc"` is 0.
/// Values too large for `i64` saturate.
fn lenient_int(text: &str) -> i64 {
    let trimmed = text.trim_start();
    let (negative, rest) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };

    let magnitude = rest
        .bytes()
        .take_while(u8::is_ascii_digit)
        .fold(0i64, |acc, digit| {
            acc.saturating_mul(10)
                .saturating_add(i64::from(digit - b'0'))
        });

    if negative {
        -magnitude
    } else {
        magnitude
    }
}
