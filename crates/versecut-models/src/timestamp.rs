//! Elapsed-time parsing and formatting.
//!
//! Marker exports and verse tables measure time as minutes and seconds from
//! the start of the recitation, rendered `MM:SS.mmm`. Minutes are not wrapped
//! into hours; a long chapter simply shows `75:12.500`.

/// Parse an elapsed timestamp string to total seconds.
///
/// Supports formats:
/// - `MM:SS` or `MM:SS.mmm`
/// - `SS` or `SS.mmm`
///
/// # Examples
/// ```
/// use versecut_models::timestamp::parse_timestamp;
/// assert_eq!(parse_timestamp("05:30").unwrap(), 330.0);
/// assert_eq!(parse_timestamp("00:07.860").unwrap(), 7.86);
/// assert_eq!(parse_timestamp("90").unwrap(), 90.0);
/// ```
pub fn parse_timestamp(ts: &str) -> Result<f64, TimestampError> {
    let ts = ts.trim();
    if ts.is_empty() {
        return Err(TimestampError::Empty);
    }

    let parts: Vec<&str> = ts.split(':').collect();
    match parts.len() {
        1 => {
            let seconds: f64 = parts[0]
                .parse()
                .map_err(|_| TimestampError::InvalidValue("seconds", parts[0].to_string()))?;
            if seconds < 0.0 {
                return Err(TimestampError::Negative);
            }
            Ok(seconds)
        }
        2 => {
            let minutes: f64 = parts[0]
                .parse()
                .map_err(|_| TimestampError::InvalidValue("minutes", parts[0].to_string()))?;
            let seconds: f64 = parts[1]
                .parse()
                .map_err(|_| TimestampError::InvalidValue("seconds", parts[1].to_string()))?;
            if minutes < 0.0 || seconds < 0.0 {
                return Err(TimestampError::Negative);
            }
            Ok(minutes * 60.0 + seconds)
        }
        _ => Err(TimestampError::InvalidFormat(ts.to_string())),
    }
}

/// Format total seconds as `MM:SS.mmm`.
///
/// Milliseconds are always emitted so that formatted values round-trip
/// through [`parse_timestamp`] without drift.
///
/// # Examples
/// ```
/// use versecut_models::timestamp::format_timestamp;
/// assert_eq!(format_timestamp(330.0), "05:30.000");
/// assert_eq!(format_timestamp(7.86), "00:07.860");
/// ```
pub fn format_timestamp(total_secs: f64) -> String {
    let total_ms = (total_secs * 1000.0).round() as u64;
    let ms = total_ms % 1000;
    let total_sec = total_ms / 1000;
    let secs = total_sec % 60;
    let mins = total_sec / 60;
    format!("{:02}:{:02}.{:03}", mins, secs, ms)
}

/// Shift a timestamp by a signed number of seconds, clamping at zero.
///
/// # Examples
/// ```
/// use versecut_models::timestamp::offset_timestamp;
/// assert_eq!(offset_timestamp("00:10.000", -0.2).unwrap(), "00:09.800");
/// assert_eq!(offset_timestamp("00:00.100", -1.0).unwrap(), "00:00.000");
/// ```
pub fn offset_timestamp(ts: &str, offset_secs: f64) -> Result<String, TimestampError> {
    let total = parse_timestamp(ts)? + offset_secs;
    Ok(format_timestamp(total.max(0.0)))
}

/// Absolute difference between two timestamps, in seconds.
pub fn time_difference(a: &str, b: &str) -> Result<f64, TimestampError> {
    Ok((parse_timestamp(b)? - parse_timestamp(a)?).abs())
}

/// Timestamp parsing error.
#[derive(Debug, Clone, PartialEq)]
pub enum TimestampError {
    /// Timestamp string is empty
    Empty,
    /// Timestamp contains negative values
    Negative,
    /// Invalid numeric value for a component
    InvalidValue(&'static str, String),
    /// Invalid timestamp format
    InvalidFormat(String),
}

impl std::fmt::Display for TimestampError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Empty => write!(f, "Timestamp cannot be empty"),
            Self::Negative => write!(f, "Timestamp cannot be negative"),
            Self::InvalidValue(component, value) => {
                write!(f, "Invalid {} value: {}", component, value)
            }
            Self::InvalidFormat(ts) => {
                write!(f, "Invalid timestamp format '{}'. Use MM:SS or MM:SS.mmm", ts)
            }
        }
    }
}

impl std::error::Error for TimestampError {}
