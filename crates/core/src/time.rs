use chrono::{DateTime, NaiveDateTime, Utc};

/// Layout used when a record timestamp is written as text.
pub const RECORD_DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// A simple clock abstraction for deterministic time in services and tests.
#[derive(Debug, Clone, Copy, Default)]
pub enum Clock {
    #[default]
    Default,
    Fixed(DateTime<Utc>),
}

impl Clock {
    /// Returns a clock fixed at the given timestamp.
    #[must_use]
    pub fn fixed(at: DateTime<Utc>) -> Self {
        Self::Fixed(at)
    }

    /// Returns the current time according to the clock.
    #[must_use]
    pub fn now(&self) -> DateTime<Utc> {
        match self {
            Clock::Default => Utc::now(),
            Clock::Fixed(t) => *t,
        }
    }
}

/// Formats a record timestamp as `YYYY-MM-DD HH:MM:SS` (UTC).
#[must_use]
pub fn format_record_date(at: DateTime<Utc>) -> String {
    at.format(RECORD_DATE_FORMAT).to_string()
}

/// Parses a timestamp written by [`format_record_date`].
///
/// # Errors
///
/// Returns `chrono::ParseError` if the text does not match the layout.
pub fn parse_record_date(raw: &str) -> Result<DateTime<Utc>, chrono::ParseError> {
    NaiveDateTime::parse_from_str(raw.trim(), RECORD_DATE_FORMAT).map(|naive| naive.and_utc())
}

/// Deterministic timestamp for tests and examples (2023-11-14T22:13:20Z).
pub const FIXED_TEST_TIMESTAMP: i64 = 1_700_000_000;

/// Returns a deterministic `DateTime<Utc>` for tests and doc examples.
///
/// # Panics
///
/// Panics if the fixed timestamp cannot be represented.
#[must_use]
pub fn fixed_now() -> DateTime<Utc> {
    DateTime::<Utc>::from_timestamp(FIXED_TEST_TIMESTAMP, 0)
        .expect("fixed timestamp should be valid")
}

/// Returns a `Clock` fixed at the deterministic test timestamp.
#[must_use]
pub fn fixed_clock() -> Clock {
    Clock::fixed(fixed_now())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_date_round_trips_to_the_second() {
        let text = format_record_date(fixed_now());
        assert_eq!(text, "2023-11-14 22:13:20");
        assert_eq!(parse_record_date(&text).unwrap(), fixed_now());
    }

    #[test]
    fn fixed_clock_does_not_move() {
        let clock = fixed_clock();
        assert_eq!(clock.now(), clock.now());
    }
}
