//! Unix timestamp and calendar date conversion.

use std::str::FromStr;

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, SecondsFormat, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Result, ToolError};

/// Inputs with at most this many characters are seconds, longer ones are
/// milliseconds.
const MAX_SECONDS_DIGITS: usize = 10;

const READABLE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
const LOCAL_ISO_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3f";
const NAIVE_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"];

#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum TimezoneMode {
    #[default]
    Local,
    Utc,
}

impl FromStr for TimezoneMode {
    type Err = ToolError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "local" | "" => Ok(Self::Local),
            "utc" => Ok(Self::Utc),
            other => Err(ToolError::format(format!("unknown timezone mode {other}"))),
        }
    }
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct TimestampInfo {
    pub iso: String,
    pub readable: String,
    pub seconds: i64,
    pub millis: i64,
}

fn describe(instant: DateTime<Utc>, mode: TimezoneMode) -> TimestampInfo {
    let millis = instant.timestamp_millis();
    let (iso, readable) = match mode {
        TimezoneMode::Utc => (
            instant.to_rfc3339_opts(SecondsFormat::Millis, true),
            instant.format(READABLE_FORMAT).to_string(),
        ),
        TimezoneMode::Local => {
            let local = instant.with_timezone(&Local);
            (
                local.format(LOCAL_ISO_FORMAT).to_string(),
                local.format(READABLE_FORMAT).to_string(),
            )
        }
    };
    TimestampInfo {
        iso,
        readable,
        seconds: millis.div_euclid(1000),
        millis,
    }
}

/// Describes a millisecond instant, e.g. the current time.
pub fn describe_millis(millis: i64, mode: TimezoneMode) -> Result<TimestampInfo> {
    let instant = DateTime::<Utc>::from_timestamp_millis(millis)
        .ok_or_else(|| ToolError::format(format!("timestamp {millis} is out of range")))?;
    Ok(describe(instant, mode))
}

/// Ten characters or fewer are read as seconds, anything longer as
/// milliseconds.
pub fn timestamp_to_date(input: &str, mode: TimezoneMode) -> Result<TimestampInfo> {
    let trimmed = input.trim();
    let value: i64 = trimmed
        .parse()
        .map_err(|_| ToolError::format(format!("invalid timestamp {trimmed:?}")))?;
    let millis = if trimmed.len() <= MAX_SECONDS_DIGITS {
        value
            .checked_mul(1000)
            .ok_or_else(|| ToolError::format(format!("timestamp {value} is out of range")))?
    } else {
        value
    };
    describe_millis(millis, mode)
}

fn interpret_naive(naive: NaiveDateTime, mode: TimezoneMode) -> Result<DateTime<Utc>> {
    match mode {
        TimezoneMode::Utc => Ok(Utc.from_utc_datetime(&naive)),
        TimezoneMode::Local => Local
            .from_local_datetime(&naive)
            .earliest()
            .map(|local| local.with_timezone(&Utc))
            .ok_or_else(|| ToolError::format(format!("{naive} does not exist in local time"))),
    }
}

/// Accepts RFC 3339, `YYYY-MM-DD HH:MM:SS` (read in `mode`) or a bare
/// `YYYY-MM-DD` (midnight UTC).
pub fn date_to_timestamp(input: &str, mode: TimezoneMode) -> Result<TimestampInfo> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(ToolError::format("date cannot be empty"));
    }
    if let Ok(instant) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(describe(instant.with_timezone(&Utc), mode));
    }
    if let Some(naive) = NAIVE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(trimmed, fmt).ok())
    {
        return Ok(describe(interpret_naive(naive, mode)?, mode));
    }
    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        let midnight = date.and_hms_opt(0, 0, 0).unwrap_or_default();
        return Ok(describe(Utc.from_utc_datetime(&midnight), mode));
    }
    Err(ToolError::format(format!("unrecognized date {trimmed:?}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn ten_digits_are_seconds() {
        let info = timestamp_to_date("1234567890", TimezoneMode::Utc).unwrap();
        assert_eq!(
            info,
            TimestampInfo {
                iso: "2009-02-13T23:31:30.000Z".into(),
                readable: "2009-02-13 23:31:30".into(),
                seconds: 1_234_567_890,
                millis: 1_234_567_890_000,
            }
        );
    }

    #[test]
    fn longer_inputs_are_milliseconds() {
        let info = timestamp_to_date("1234567890123", TimezoneMode::Utc).unwrap();
        assert_eq!(info.seconds, 1_234_567_890);
        assert_eq!(info.iso, "2009-02-13T23:31:30.123Z");
    }

    #[test]
    fn rejects_non_numeric_timestamps() {
        assert!(matches!(
            timestamp_to_date("soon", TimezoneMode::Utc),
            Err(ToolError::Format(_))
        ));
    }

    #[test]
    fn parses_plain_and_rfc3339_dates() {
        let plain = date_to_timestamp("2009-02-13 23:31:30", TimezoneMode::Utc).unwrap();
        assert_eq!(plain.seconds, 1_234_567_890);
        let offset = date_to_timestamp("2009-02-14T00:31:30+01:00", TimezoneMode::Local).unwrap();
        assert_eq!(offset.millis, 1_234_567_890_000);
        let day = date_to_timestamp("1970-01-02", TimezoneMode::Utc).unwrap();
        assert_eq!(day.seconds, 86_400);
    }

    #[test]
    fn rejects_unrecognized_dates() {
        assert!(date_to_timestamp("", TimezoneMode::Utc).is_err());
        assert!(date_to_timestamp("13/02/2009", TimezoneMode::Utc).is_err());
    }

    #[test]
    fn negative_millis_floor_to_previous_second() {
        let info = describe_millis(-1, TimezoneMode::Utc).unwrap();
        assert_eq!(info.seconds, -1);
        assert_eq!(info.readable, "1969-12-31 23:59:59");
    }

    #[test]
    fn mode_parses_from_name() {
        assert_eq!("UTC".parse::<TimezoneMode>().unwrap(), TimezoneMode::Utc);
        assert!("mars".parse::<TimezoneMode>().is_err());
    }
}
