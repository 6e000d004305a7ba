//! Weekly posting calendar.
//!
//! A [`PostingSchedule`] is a set of weekdays plus one wall-clock time in
//! one IANA time zone (by default Monday, Wednesday and Friday at 07:00
//! Europe/London). The scheduler only ever asks one question of it: when is
//! the next fire time strictly after a given instant.

use std::fmt;

use chrono::{Datelike, Days, LocalResult, NaiveDate, NaiveTime, TimeZone, Utc, Weekday};
use chrono_tz::Tz;

use crate::error::CoreError;
use crate::types::Timestamp;

/// Default posting days.
pub const DEFAULT_WEEKDAYS: &str = "mon,wed,fri";

/// Default posting time (24h `HH:MM`).
pub const DEFAULT_TIME: &str = "07:00";

/// Default time zone for interpreting [`DEFAULT_TIME`].
pub const DEFAULT_TIMEZONE: &str = "Europe/London";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostingSchedule {
    /// Sorted Monday-first, no duplicates, never empty.
    weekdays: Vec<Weekday>,
    time: NaiveTime,
    tz: Tz,
}

impl PostingSchedule {
    /// Build a schedule from already-typed parts.
    pub fn new(weekdays: &[Weekday], time: NaiveTime, tz: Tz) -> Result<Self, CoreError> {
        let mut days = weekdays.to_vec();
        days.sort_by_key(|d| d.num_days_from_monday());
        days.dedup();

        if days.is_empty() {
            return Err(CoreError::Validation(
                "Posting schedule needs at least one weekday".into(),
            ));
        }

        Ok(Self {
            weekdays: days,
            time,
            tz,
        })
    }

    /// Parse a schedule from its configuration strings.
    ///
    /// * `weekdays` -- comma-separated day names, e.g. `"mon,wed,fri"`.
    /// * `time` -- 24h `HH:MM`.
    /// * `tz` -- IANA zone name, e.g. `"Europe/London"`.
    pub fn parse(weekdays: &str, time: &str, tz: &str) -> Result<Self, CoreError> {
        let days = weekdays
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|s| {
                s.parse::<Weekday>()
                    .map_err(|_| CoreError::Validation(format!("Unknown weekday '{s}'")))
            })
            .collect::<Result<Vec<_>, _>>()?;

        let time = NaiveTime::parse_from_str(time.trim(), "%H:%M").map_err(|_| {
            CoreError::Validation(format!("Posting time '{time}' must be HH:MM"))
        })?;

        let tz = tz
            .trim()
            .parse::<Tz>()
            .map_err(|_| CoreError::Validation(format!("Unknown time zone '{tz}'")))?;

        Self::new(&days, time, tz)
    }

    pub fn weekdays(&self) -> &[Weekday] {
        &self.weekdays
    }

    pub fn time(&self) -> NaiveTime {
        self.time
    }

    pub fn timezone(&self) -> Tz {
        self.tz
    }

    /// The first fire time strictly after `after`.
    ///
    /// Strictness is what keeps a tick from firing twice: feeding a fire
    /// time back in always yields the following slot.
    pub fn next_after(&self, after: Timestamp) -> Timestamp {
        let mut date = after.with_timezone(&self.tz).date_naive();
        loop {
            if self.weekdays.contains(&date.weekday()) {
                let candidate = self.fire_time_on(date);
                if candidate > after {
                    return candidate;
                }
            }
            date = date + Days::new(1);
        }
    }

    /// Resolve the local fire time on `date` to a UTC instant.
    ///
    /// On a DST fall-back day the earlier of the two instants wins. On a
    /// spring-forward day where the wall-clock time does not exist, the
    /// post fires one hour later in wall-clock terms.
    fn fire_time_on(&self, date: NaiveDate) -> Timestamp {
        let local = date.and_time(self.time);
        let resolved = match self.tz.from_local_datetime(&local) {
            LocalResult::Single(t) => t,
            LocalResult::Ambiguous(earliest, _) => earliest,
            LocalResult::None => self
                .tz
                .from_local_datetime(&(local + chrono::Duration::hours(1)))
                .earliest()
                .unwrap_or_else(|| self.tz.from_utc_datetime(&local)),
        };
        resolved.with_timezone(&Utc)
    }
}

impl fmt::Display for PostingSchedule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let days: Vec<String> = self.weekdays.iter().map(|d| d.to_string()).collect();
        write!(
            f,
            "{} at {} {}",
            days.join("/"),
            self.time.format("%H:%M"),
            self.tz.name()
        )
    }
}

impl Default for PostingSchedule {
    fn default() -> Self {
        Self {
            weekdays: vec![Weekday::Mon, Weekday::Wed, Weekday::Fri],
            time: NaiveTime::from_hms_opt(7, 0, 0).unwrap_or_default(),
            tz: chrono_tz::Europe::London,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
