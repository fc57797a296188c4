//! Recurrence configuration and initial-delay computation.
//!
//! A periodic report fires at a fixed local time of day (`at_seconds` past
//! midnight in the report's UTC offset), on a daily, weekly, or monthly
//! cadence, optionally bounded by an end timestamp. The computation here is
//! pure: for a fixed config and a fixed `now` it always produces the same
//! delay.

use chrono::{DateTime, Datelike, Duration, FixedOffset, NaiveDate, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Seconds in a day; `at_seconds` must be strictly below this.
pub const SECONDS_PER_DAY: u32 = 86_400;

/// Widest UTC offset accepted, in minutes (UTC+14 / UTC-12 fit within this).
const MAX_TZ_OFFSET_MINUTES: i32 = 18 * 60;

/// How often a report recurs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Cadence {
    /// Runs once, on demand; never scheduled.
    OneTime,
    Daily,
    /// `day` counts from Monday = 0 through Sunday = 6.
    Weekly { day: u8 },
    /// `day` of month, restricted to 1..=28 so every month has it.
    Monthly { day: u8 },
}

/// How long a periodic report keeps recurring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ReportWindow {
    Infinite,
    Until { end: DateTime<Utc> },
}

/// Errors from an internally inconsistent recurrence configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum RecurrenceError {
    #[error("one-time reports have no recurrence delay")]
    NotPeriodic,

    #[error("fire time or timezone offset out of range")]
    FireTimeOutOfRange,

    #[error("cadence day out of range")]
    DayOutOfRange,

    #[error("report end date is before the next scheduled run")]
    EndsBeforeNextRun,
}

/// Recurrence configuration of one report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecurrenceConfig {
    pub cadence: Cadence,
    /// Local fire time as seconds past midnight.
    pub at_seconds: u32,
    /// Fixed UTC offset of the report's timezone, in minutes east.
    pub tz_offset_minutes: i32,
    #[serde(default = "ReportWindow::infinite")]
    pub window: ReportWindow,
}

impl ReportWindow {
    fn infinite() -> Self {
        ReportWindow::Infinite
    }
}

impl RecurrenceConfig {
    pub fn is_periodic(&self) -> bool {
        self.cadence != Cadence::OneTime
    }

    /// Seconds from `now` until the next occurrence of this recurrence.
    ///
    /// Deterministic for a fixed `(self, now)` pair. The next occurrence is
    /// the first local `at_seconds` strictly after `now`, advanced to the
    /// configured weekday or day-of-month where the cadence requires it.
    pub fn initial_delay_seconds(&self, now: DateTime<Utc>) -> Result<u64, RecurrenceError> {
        if self.at_seconds >= SECONDS_PER_DAY || self.tz_offset_minutes.abs() > MAX_TZ_OFFSET_MINUTES
        {
            return Err(RecurrenceError::FireTimeOutOfRange);
        }

        let offset = FixedOffset::east_opt(self.tz_offset_minutes * 60)
            .ok_or(RecurrenceError::FireTimeOutOfRange)?;
        let local_now = now.with_timezone(&offset);

        let next_local = match self.cadence {
            Cadence::OneTime => return Err(RecurrenceError::NotPeriodic),
            Cadence::Daily => {
                let mut candidate = self.at_time_on(local_now.date_naive(), offset)?;
                if candidate <= now {
                    candidate += Duration::days(1);
                }
                candidate
            }
            Cadence::Weekly { day } => {
                if day > 6 {
                    return Err(RecurrenceError::DayOutOfRange);
                }
                let mut candidate = self.at_time_on(local_now.date_naive(), offset)?;
                // At most 7 steps to land on the requested weekday, strictly
                // after now.
                while candidate <= now
                    || candidate.with_timezone(&offset).weekday().num_days_from_monday()
                        != u32::from(day)
                {
                    candidate += Duration::days(1);
                }
                candidate
            }
            Cadence::Monthly { day } => {
                if !(1..=28).contains(&day) {
                    return Err(RecurrenceError::DayOutOfRange);
                }
                let today = local_now.date_naive();
                let this_month = NaiveDate::from_ymd_opt(today.year(), today.month(), day.into())
                    .ok_or(RecurrenceError::DayOutOfRange)?;
                let candidate = self.at_time_on(this_month, offset)?;
                if candidate <= now {
                    let (year, month) = if today.month() == 12 {
                        (today.year() + 1, 1)
                    } else {
                        (today.year(), today.month() + 1)
                    };
                    let next_month = NaiveDate::from_ymd_opt(year, month, day.into())
                        .ok_or(RecurrenceError::DayOutOfRange)?;
                    self.at_time_on(next_month, offset)?
                } else {
                    candidate
                }
            }
        };

        if let ReportWindow::Until { end } = self.window {
            if end < next_local {
                return Err(RecurrenceError::EndsBeforeNextRun);
            }
        }

        // next_local > now by construction, so the difference is positive.
        Ok((next_local - now).num_seconds() as u64)
    }

    /// The UTC instant of `at_seconds` on the given local date.
    fn at_time_on(
        &self,
        date: NaiveDate,
        offset: FixedOffset,
    ) -> Result<DateTime<Utc>, RecurrenceError> {
        let naive = date
            .and_hms_opt(
                self.at_seconds / 3_600,
                (self.at_seconds / 60) % 60,
                self.at_seconds % 60,
            )
            .ok_or(RecurrenceError::FireTimeOutOfRange)?;
        // Fixed offsets are never ambiguous.
        offset
            .from_local_datetime(&naive)
            .single()
            .map(|dt| dt.with_timezone(&Utc))
            .ok_or(RecurrenceError::FireTimeOutOfRange)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(hms: &str) -> u32 {
        let parts: Vec<u32> = hms.split(':').map(|p| p.parse().unwrap()).collect();
        parts[0] * 3_600 + parts[1] * 60 + parts[2]
    }

    fn utc(s: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(s).unwrap().with_timezone(&Utc)
    }

    fn daily(at_seconds: u32, tz_offset_minutes: i32) -> RecurrenceConfig {
        RecurrenceConfig {
            cadence: Cadence::Daily,
            at_seconds,
            tz_offset_minutes,
            window: ReportWindow::Infinite,
        }
    }

    #[test]
    fn daily_later_today() {
        let cfg = daily(at("10:00:00"), 0);
        let now = utc("2026-03-02T08:00:00Z");
        assert_eq!(cfg.initial_delay_seconds(now).unwrap(), 2 * 3_600);
    }

    #[test]
    fn daily_rolls_to_tomorrow() {
        let cfg = daily(at("10:00:00"), 0);
        let now = utc("2026-03-02T10:00:00Z");
        // Exactly at the fire time counts as past: next run is tomorrow.
        assert_eq!(cfg.initial_delay_seconds(now).unwrap(), 24 * 3_600);
    }

    #[test]
    fn daily_respects_tz_offset() {
        // 09:00 at UTC+8 is 01:00 UTC.
        let cfg = daily(at("09:00:00"), 8 * 60);
        let now = utc("2026-03-02T00:00:00Z");
        assert_eq!(cfg.initial_delay_seconds(now).unwrap(), 3_600);
    }

    #[test]
    fn daily_is_deterministic() {
        let cfg = daily(at("06:30:00"), -5 * 60);
        let now = utc("2026-07-14T03:21:09Z");
        let first = cfg.initial_delay_seconds(now).unwrap();
        let second = cfg.initial_delay_seconds(now).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn weekly_advances_to_requested_day() {
        let cfg = RecurrenceConfig {
            cadence: Cadence::Weekly { day: 4 }, // Friday
            at_seconds: at("12:00:00"),
            tz_offset_minutes: 0,
            window: ReportWindow::Infinite,
        };
        // 2026-03-02 is a Monday.
        let now = utc("2026-03-02T00:00:00Z");
        let delay = cfg.initial_delay_seconds(now).unwrap();
        assert_eq!(delay, 4 * 86_400 + 12 * 3_600);
    }

    #[test]
    fn weekly_same_day_past_fire_time_waits_a_week() {
        let cfg = RecurrenceConfig {
            cadence: Cadence::Weekly { day: 0 }, // Monday
            at_seconds: at("08:00:00"),
            tz_offset_minutes: 0,
            window: ReportWindow::Infinite,
        };
        let now = utc("2026-03-02T09:00:00Z"); // Monday, 09:00
        assert_eq!(cfg.initial_delay_seconds(now).unwrap(), 7 * 86_400 - 3_600);
    }

    #[test]
    fn monthly_rolls_over_year_boundary() {
        let cfg = RecurrenceConfig {
            cadence: Cadence::Monthly { day: 5 },
            at_seconds: at("00:00:00"),
            tz_offset_minutes: 0,
            window: ReportWindow::Infinite,
        };
        let now = utc("2026-12-10T00:00:00Z");
        let delay = cfg.initial_delay_seconds(now).unwrap();
        let next = now + Duration::seconds(delay as i64);
        assert_eq!(next, utc("2027-01-05T00:00:00Z"));
    }

    #[test]
    fn monthly_day_out_of_range() {
        let cfg = RecurrenceConfig {
            cadence: Cadence::Monthly { day: 31 },
            at_seconds: 0,
            tz_offset_minutes: 0,
            window: ReportWindow::Infinite,
        };
        assert_eq!(
            cfg.initial_delay_seconds(Utc::now()),
            Err(RecurrenceError::DayOutOfRange)
        );
    }

    #[test]
    fn weekly_day_out_of_range() {
        let cfg = RecurrenceConfig {
            cadence: Cadence::Weekly { day: 7 },
            at_seconds: 0,
            tz_offset_minutes: 0,
            window: ReportWindow::Infinite,
        };
        assert_eq!(
            cfg.initial_delay_seconds(Utc::now()),
            Err(RecurrenceError::DayOutOfRange)
        );
    }

    #[test]
    fn one_time_has_no_delay() {
        let cfg = RecurrenceConfig {
            cadence: Cadence::OneTime,
            at_seconds: 0,
            tz_offset_minutes: 0,
            window: ReportWindow::Infinite,
        };
        assert_eq!(
            cfg.initial_delay_seconds(Utc::now()),
            Err(RecurrenceError::NotPeriodic)
        );
    }

    #[test]
    fn window_expiry_rejected() {
        let mut cfg = daily(at("10:00:00"), 0);
        cfg.window = ReportWindow::Until {
            end: utc("2026-03-02T09:00:00Z"),
        };
        let now = utc("2026-03-02T08:00:00Z");
        // Next run would be 10:00 but the window closes at 09:00.
        assert_eq!(
            cfg.initial_delay_seconds(now),
            Err(RecurrenceError::EndsBeforeNextRun)
        );
    }

    #[test]
    fn window_open_at_next_run_accepted() {
        let mut cfg = daily(at("10:00:00"), 0);
        cfg.window = ReportWindow::Until {
            end: utc("2026-03-02T10:00:00Z"),
        };
        let now = utc("2026-03-02T08:00:00Z");
        assert_eq!(cfg.initial_delay_seconds(now).unwrap(), 2 * 3_600);
    }

    #[test]
    fn fire_time_out_of_range() {
        let cfg = daily(SECONDS_PER_DAY, 0);
        assert_eq!(
            cfg.initial_delay_seconds(Utc::now()),
            Err(RecurrenceError::FireTimeOutOfRange)
        );
    }
}
