//! Time spans and date-times.

use chrono::{Datelike, Local, NaiveDate, NaiveDateTime, TimeDelta, Timelike};
use rand::Rng;

use crate::error::{AnyError, Result};
use crate::generator::Any;

pub const MAX_SPAN_DAYS: u32 = 1000;
pub const MAX_SPAN_HOURS: u32 = 23;
pub const MAX_SPAN_MINUTES: u32 = 59;
pub const MAX_SPAN_SECONDS: u32 = 59;

/// Days bound of an unconstrained span (exclusive)
const DEFAULT_SPAN_DAYS: u32 = 10;

/// Years between now and the far end of an unlimited date range
pub const YEAR_SPAN: i32 = 180;

/// Earliest year of an unlimited past range
pub const MIN_YEAR: i32 = 1900;

/// Inclusive upper bounds per dimension of a generated span
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TimeSpanSpec {
    pub max_days: Option<u32>,
    pub max_hours: Option<u32>,
    pub max_minutes: Option<u32>,
    pub max_seconds: Option<u32>,
}

impl TimeSpanSpec {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn days(mut self, days: u32) -> Self {
        self.max_days = Some(days);
        self
    }

    pub fn hours(mut self, hours: u32) -> Self {
        self.max_hours = Some(hours);
        self
    }

    pub fn minutes(mut self, minutes: u32) -> Self {
        self.max_minutes = Some(minutes);
        self
    }

    pub fn seconds(mut self, seconds: u32) -> Self {
        self.max_seconds = Some(seconds);
        self
    }

    fn validate(&self) -> Result<()> {
        let ceilings = [
            ("max_days", self.max_days, MAX_SPAN_DAYS),
            ("max_hours", self.max_hours, MAX_SPAN_HOURS),
            ("max_minutes", self.max_minutes, MAX_SPAN_MINUTES),
            ("max_seconds", self.max_seconds, MAX_SPAN_SECONDS),
        ];
        for (name, bound, ceiling) in ceilings {
            if let Some(bound) = bound.filter(|bound| *bound > ceiling) {
                return Err(AnyError::invalid_argument(
                    name,
                    format!("{} exceeds the maximum of {}", bound, ceiling),
                ));
            }
        }

        let mut specified = [
            self.max_days,
            self.max_hours,
            self.max_minutes,
            self.max_seconds,
        ]
        .into_iter()
        .flatten()
        .peekable();
        if specified.peek().is_some() && specified.all(|bound| bound == 0) {
            return Err(AnyError::invalid_argument(
                "max_days",
                "cannot set every limit to zero",
            ));
        }
        Ok(())
    }

    fn is_unbounded(&self) -> bool {
        self.max_days.is_none()
            && self.max_hours.is_none()
            && self.max_minutes.is_none()
            && self.max_seconds.is_none()
    }
}

/// Direction and bound of a generated date-time
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateTimeSpec {
    pub future: bool,
    pub limit: Option<NaiveDateTime>,
    pub now: Option<NaiveDateTime>,
}

impl Default for DateTimeSpec {
    fn default() -> Self {
        Self::future()
    }
}

impl DateTimeSpec {
    /// Strictly after now
    pub fn future() -> Self {
        Self {
            future: true,
            limit: None,
            now: None,
        }
    }

    /// Strictly before now
    pub fn past() -> Self {
        Self {
            future: false,
            limit: None,
            now: None,
        }
    }

    /// Far end of the range (inclusive)
    pub fn limit(mut self, limit: NaiveDateTime) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Pin the reference instant instead of reading the local clock
    pub fn now(mut self, now: NaiveDateTime) -> Self {
        self.now = Some(now);
        self
    }
}

fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

fn days_in_month(year: i32, month: u32) -> u32 {
    match month {
        4 | 6 | 9 | 11 => 30,
        2 if is_leap_year(year) => 29,
        2 => 28,
        _ => 31,
    }
}

fn at(year: i32, month: u32, day: u32, hour: u32, minute: u32, second: u32) -> Result<NaiveDateTime> {
    NaiveDate::from_ymd_opt(year, month, day)
        .and_then(|date| date.and_hms_opt(hour, minute, second))
        .ok_or_else(|| {
            AnyError::invalid_argument(
                "limit",
                format!(
                    "{:04}-{:02}-{:02} {:02}:{:02}:{:02} is not representable",
                    year, month, day, hour, minute, second
                ),
            )
        })
}

impl Any {
    /// Random span below ten days
    pub fn time_span(&mut self) -> Result<TimeDelta> {
        self.time_span_with(&TimeSpanSpec::default())
    }

    /// Random span bounded per dimension
    pub fn time_span_with(&mut self, spec: &TimeSpanSpec) -> Result<TimeDelta> {
        spec.validate()?;

        let (days, hours, minutes, seconds) = if spec.is_unbounded() {
            (
                DEFAULT_SPAN_DAYS - 1,
                MAX_SPAN_HOURS,
                MAX_SPAN_MINUTES,
                MAX_SPAN_SECONDS,
            )
        } else {
            (
                spec.max_days.unwrap_or(0),
                spec.max_hours.unwrap_or(0),
                spec.max_minutes.unwrap_or(0),
                spec.max_seconds.unwrap_or(0),
            )
        };

        let draw = |any: &mut Any| -> Result<TimeDelta> {
            let source = any.source();
            let total = i64::from(source.gen_range(0..=days)) * 86_400
                + i64::from(source.gen_range(0..=hours)) * 3_600
                + i64::from(source.gen_range(0..=minutes)) * 60
                + i64::from(source.gen_range(0..=seconds));
            Ok(TimeDelta::seconds(total))
        };

        if self.config().exclude_defaults {
            self.redraw(draw, TimeDelta::is_zero)
        } else {
            draw(self)
        }
    }

    /// Random local date-time strictly in the future
    pub fn date_time(&mut self) -> Result<NaiveDateTime> {
        self.date_time_with(&DateTimeSpec::future())
    }

    /// Random local date-time on one side of now.
    ///
    /// Fields are drawn from year down to second; each one is narrowed by
    /// the near end (now) and the far end (limit) while every coarser field
    /// still equals that end.
    pub fn date_time_with(&mut self, spec: &DateTimeSpec) -> Result<NaiveDateTime> {
        let now = spec.now.unwrap_or_else(|| Local::now().naive_local());
        let now = now.with_nanosecond(0).unwrap_or(now);
        let one_second = TimeDelta::seconds(1);

        let (low, high) = if spec.future {
            let high = match spec.limit {
                Some(limit) if limit < now + one_second => {
                    return Err(AnyError::invalid_argument(
                        "limit",
                        format!("{} is not at least one second after now ({})", limit, now),
                    ));
                }
                Some(limit) => limit,
                None => at(now.year() + YEAR_SPAN, 12, 31, 23, 59, 59)?,
            };
            (now, high)
        } else {
            let low = match spec.limit {
                Some(limit) if limit > now - one_second => {
                    return Err(AnyError::invalid_argument(
                        "limit",
                        format!("{} is not at least one second before now ({})", limit, now),
                    ));
                }
                Some(limit) => limit,
                None => {
                    // the 1900 floor only applies while it is still before now
                    let floor = at((now.year() - YEAR_SPAN).max(MIN_YEAR), 1, 1, 0, 0, 0)?;
                    if floor < now {
                        floor
                    } else {
                        at(now.year() - YEAR_SPAN, 1, 1, 0, 0, 0)?
                    }
                }
            };
            (low, now)
        };

        let future = spec.future;
        let draw = |any: &mut Any| -> Result<NaiveDateTime> {
            let candidate = any.date_time_between(low, high)?;
            if candidate != now {
                return Ok(candidate);
            }
            Ok(if future {
                now + one_second
            } else {
                now - one_second
            })
        };

        if self.config().exclude_defaults {
            let epoch = NaiveDateTime::default();
            self.redraw(draw, |value| *value == epoch)
        } else {
            draw(self)
        }
    }

    fn date_time_between(&mut self, low: NaiveDateTime, high: NaiveDateTime) -> Result<NaiveDateTime> {
        if low > high {
            return Err(AnyError::invalid_argument(
                "limit",
                format!("{} is after {}", low, high),
            ));
        }
        let source = self.source();

        let year = source.gen_range(low.year()..=high.year());
        let mut at_low = year == low.year();
        let mut at_high = year == high.year();

        let month = source.gen_range(
            if at_low { low.month() } else { 1 }..=if at_high { high.month() } else { 12 },
        );
        at_low &= month == low.month();
        at_high &= month == high.month();

        let day = source.gen_range(
            if at_low { low.day() } else { 1 }..=if at_high {
                high.day()
            } else {
                days_in_month(year, month)
            },
        );
        at_low &= day == low.day();
        at_high &= day == high.day();

        let hour = source.gen_range(
            if at_low { low.hour() } else { 0 }..=if at_high { high.hour() } else { 23 },
        );
        at_low &= hour == low.hour();
        at_high &= hour == high.hour();

        let minute = source.gen_range(
            if at_low { low.minute() } else { 0 }..=if at_high { high.minute() } else { 59 },
        );
        at_low &= minute == low.minute();
        at_high &= minute == high.minute();

        let second = source.gen_range(
            if at_low { low.second() } else { 0 }..=if at_high { high.second() } else { 59 },
        );

        at(year, month, day, hour, minute, second)
    }
}
