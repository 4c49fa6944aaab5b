//! Conversion between subtitle timestamps (`HH:MM:SS,mmm`) and seconds.
//!
//! Parsing is best-effort: a field that is not a number reads as zero, so a
//! malformed timestamp still produces a value instead of an error.

use std::fmt;

const MILLIS_PER_SECOND: u64 = 1_000;
const MILLIS_PER_MINUTE: u64 = 60 * MILLIS_PER_SECOND;
const MILLIS_PER_HOUR: u64 = 60 * MILLIS_PER_MINUTE;

/// Parse `HH:MM:SS,mmm` (or `HH:MM:SS.mmm`) into seconds.
pub fn parse_timestamp(text: &str) -> f64 {
    let mut fields = text.trim().splitn(3, ':');
    let hours = numeric_field(fields.next());
    let minutes = numeric_field(fields.next());
    let (seconds, millis) = match fields.next() {
        Some(rest) => match rest.split_once([',', '.']) {
            Some((s, ms)) => (numeric_field(Some(s)), numeric_field(Some(ms))),
            None => (numeric_field(Some(rest)), 0.0),
        },
        None => (0.0, 0.0),
    };

    hours * 3600.0 + minutes * 60.0 + seconds + millis / 1000.0
}

fn numeric_field(field: Option<&str>) -> f64 {
    field
        .and_then(|f| f.trim().parse::<u64>().ok())
        .map(|v| v as f64)
        .unwrap_or(0.0)
}

/// Format seconds as `HH:MM:SS,mmm`.
pub fn format_timestamp(seconds: f64) -> String {
    SrtTimestamp(seconds).to_string()
}

/// Seconds value that displays in subtitle timestamp form.
///
/// Negative and non-finite values display as `00:00:00,000`.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct SrtTimestamp(pub f64);

impl SrtTimestamp {
    fn total_millis(self) -> u64 {
        if !self.0.is_finite() || self.0 <= 0.0 {
            return 0;
        }
        // half-way values round up, and a remainder of 999.5ms carries into the next second
        (self.0 * 1000.0).round() as u64
    }
}

impl fmt::Display for SrtTimestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let total = self.total_millis();
        write!(
            f,
            "{:02}:{:02}:{:02},{:03}",
            total / MILLIS_PER_HOUR,
            (total % MILLIS_PER_HOUR) / MILLIS_PER_MINUTE,
            (total % MILLIS_PER_MINUTE) / MILLIS_PER_SECOND,
            total % MILLIS_PER_SECOND,
        )
    }
}
