// This file is part of polychron. For terms of use, please see the file
// called LICENSE at the top level of the polychron source tree.

//! Dates paired with a time of day, and offset-aware instants.

use crate::chronology::AsChronology;
use crate::date::CalendarDate;
use crate::error::CalendarError;
use crate::fields::{FieldMap, ResolverMode};
use crate::types::{Time, NANOS_PER_DAY, NANOS_PER_HOUR, NANOS_PER_MINUTE, NANOS_PER_SECOND};
use core::fmt;

const SECONDS_PER_DAY: i64 = 86_400;

/// A unit of date or time arithmetic.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[allow(clippy::exhaustive_enums)] // this is stable
pub enum TimeUnit {
    /// Nanoseconds
    Nanos,
    /// Microseconds
    Micros,
    /// Milliseconds
    Millis,
    /// Seconds
    Seconds,
    /// Minutes
    Minutes,
    /// Hours
    Hours,
    /// Half days (12 hours)
    HalfDays,
    /// Days
    Days,
    /// Weeks
    Weeks,
    /// Months
    Months,
    /// Years
    Years,
    /// Decades
    Decades,
    /// Centuries
    Centuries,
    /// Millennia
    Millennia,
}

impl TimeUnit {
    /// The length of one sub-day unit in nanoseconds, or `None` for units of
    /// a day and longer.
    fn nanos(self) -> Option<i64> {
        match self {
            Self::Nanos => Some(1),
            Self::Micros => Some(1_000),
            Self::Millis => Some(1_000_000),
            Self::Seconds => Some(NANOS_PER_SECOND),
            Self::Minutes => Some(NANOS_PER_MINUTE),
            Self::Hours => Some(NANOS_PER_HOUR),
            Self::HalfDays => Some(12 * NANOS_PER_HOUR),
            Self::Days
            | Self::Weeks
            | Self::Months
            | Self::Years
            | Self::Decades
            | Self::Centuries
            | Self::Millennia => None,
        }
    }

    /// How many months one unit spans, or `None` for units below a month.
    fn months(self) -> Option<i64> {
        match self {
            Self::Months => Some(1),
            Self::Years => Some(12),
            Self::Decades => Some(120),
            Self::Centuries => Some(1_200),
            Self::Millennia => Some(12_000),
            _ => None,
        }
    }
}

/// A date in an arbitrary chronology paired with a time of day.
///
/// The date and time are independent: time arithmetic folds whole-day
/// carries into the date and never changes how the date part is labeled.
///
/// # Examples
///
/// ```
/// use polychron::types::Time;
/// use polychron::{CalendarDate, CalendarDateTime, Iso, TimeUnit};
///
/// let date = CalendarDate::try_new(1999, 12, 31, Iso).expect("date exists");
/// let datetime = CalendarDateTime::new(date, Time::try_new(23, 0, 0, 0).expect("in range"));
/// let later = datetime.checked_add(90, TimeUnit::Minutes).expect("in range");
/// assert_eq!(later.date().year(), 2000);
/// assert_eq!(u8::from(later.time().hour), 0);
/// assert_eq!(u8::from(later.time().minute), 30);
/// ```
pub struct CalendarDateTime<A: AsChronology> {
    date: CalendarDate<A>,
    time: Time,
}

impl<A: AsChronology> CalendarDateTime<A> {
    /// Pair a date with a time of day.
    pub const fn new(date: CalendarDate<A>, time: Time) -> Self {
        Self { date, time }
    }

    /// The date at midnight.
    pub fn at_midnight(date: CalendarDate<A>) -> Self {
        Self {
            date,
            time: Time::midnight(),
        }
    }

    /// Resolve a field map into a date, then pair it with `time`.
    ///
    /// See [`CalendarDate::resolve`] for the resolution semantics.
    pub fn resolve(
        fields: &mut FieldMap,
        mode: ResolverMode,
        time: Time,
        chronology: A,
    ) -> Result<Option<Self>, CalendarError> {
        Ok(CalendarDate::resolve(fields, mode, chronology)?
            .map(|date| Self { date, time }))
    }

    /// The date part.
    pub fn date(&self) -> &CalendarDate<A> {
        &self.date
    }

    /// The time part.
    pub fn time(&self) -> Time {
        self.time
    }

    /// Split into parts.
    pub fn into_parts(self) -> (CalendarDate<A>, Time) {
        (self.date, self.time)
    }

    /// Add an amount of a unit, folding whole-day carries into the date.
    ///
    /// Large sub-day amounts are first split into whole days plus an
    /// in-range remainder, so the nanosecond arithmetic cannot overflow
    /// regardless of `amount`.
    pub fn checked_add(&self, amount: i64, unit: TimeUnit) -> Result<Self, CalendarError>
    where
        A: Clone,
    {
        match unit {
            TimeUnit::Days => Ok(Self {
                date: self.date.plus_days(amount)?,
                time: self.time,
            }),
            TimeUnit::Weeks => Ok(Self {
                date: self.date.plus_weeks(amount)?,
                time: self.time,
            }),
            TimeUnit::Months
            | TimeUnit::Years
            | TimeUnit::Decades
            | TimeUnit::Centuries
            | TimeUnit::Millennia => {
                let per_unit = unit.months().ok_or(CalendarError::Overflow("time-unit"))?;
                let months = amount
                    .checked_mul(per_unit)
                    .ok_or(CalendarError::Overflow("proleptic-month"))?;
                Ok(Self {
                    date: self.date.plus_months(months)?,
                    time: self.time,
                })
            }
            _ => {
                let unit_nanos = unit.nanos().ok_or(CalendarError::Overflow("time-unit"))?;
                let units_per_day = NANOS_PER_DAY / unit_nanos;
                let days = amount.div_euclid(units_per_day);
                let nanos = amount.rem_euclid(units_per_day) * unit_nanos;
                let total = self.time.nano_of_day() + nanos;
                let days = days
                    .checked_add(total.div_euclid(NANOS_PER_DAY))
                    .ok_or(CalendarError::Overflow("epoch-day"))?;
                Ok(Self {
                    date: self.date.plus_days(days)?,
                    time: Time::from_nano_of_day(total.rem_euclid(NANOS_PER_DAY)),
                })
            }
        }
    }

    /// Subtract an amount of a unit.
    pub fn checked_sub(&self, amount: i64, unit: TimeUnit) -> Result<Self, CalendarError>
    where
        A: Clone,
    {
        let negated = amount
            .checked_neg()
            .ok_or(CalendarError::Overflow("amount"))?;
        self.checked_add(negated, unit)
    }
}

impl<A: AsChronology> PartialEq for CalendarDateTime<A> {
    fn eq(&self, other: &Self) -> bool {
        self.date == other.date && self.time == other.time
    }
}

impl<A: AsChronology> Eq for CalendarDateTime<A> {}

impl<A: AsChronology> PartialOrd for CalendarDateTime<A> {
    fn partial_cmp(&self, other: &Self) -> Option<core::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl<A: AsChronology> Ord for CalendarDateTime<A> {
    fn cmp(&self, other: &Self) -> core::cmp::Ordering {
        self.date.cmp(&other.date).then(self.time.cmp(&other.time))
    }
}

impl<A: AsChronology + Clone> Clone for CalendarDateTime<A> {
    fn clone(&self) -> Self {
        Self {
            date: self.date.clone(),
            time: self.time,
        }
    }
}

impl<A: AsChronology + Copy> Copy for CalendarDateTime<A> {}

impl<A: AsChronology> fmt::Debug for CalendarDateTime<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:?} {:02}:{:02}:{:02}.{:09}",
            self.date,
            self.time.hour.number(),
            self.time.minute.number(),
            self.time.second.number(),
            self.time.nanosecond.number(),
        )
    }
}

/// A fixed offset from UTC, in seconds, within `-18:00..=+18:00`.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct UtcOffset(i32);

impl UtcOffset {
    const MAX_SECONDS: i32 = 18 * 3600;

    /// UTC itself.
    pub const fn utc() -> Self {
        Self(0)
    }

    /// Construct an offset from a count of seconds east of UTC.
    pub fn try_from_seconds(seconds: i32) -> Result<Self, CalendarError> {
        if seconds.abs() > Self::MAX_SECONDS {
            return Err(CalendarError::OutOfRange {
                field: "utc-offset",
                value: i64::from(seconds),
                min: i64::from(-Self::MAX_SECONDS),
                max: i64::from(Self::MAX_SECONDS),
            });
        }
        Ok(Self(seconds))
    }

    /// Construct an offset from whole hours east of UTC.
    pub fn try_from_hours(hours: i32) -> Result<Self, CalendarError> {
        Self::try_from_seconds(hours.saturating_mul(3600))
    }

    /// The offset in seconds east of UTC.
    pub const fn seconds(self) -> i32 {
        self.0
    }
}

/// A date-time anchored to a fixed UTC offset, nameable as an instant.
///
/// # Examples
///
/// ```
/// use polychron::types::Time;
/// use polychron::{CalendarDate, CalendarDateTime, Iso, UtcOffset, ZonedCalendarDateTime};
///
/// let date = CalendarDate::try_new(1970, 1, 1, Iso).expect("date exists");
/// let zoned = ZonedCalendarDateTime::new(
///     CalendarDateTime::new(date, Time::try_new(1, 0, 0, 0).expect("in range")),
///     UtcOffset::try_from_hours(1).expect("in range"),
/// );
/// assert_eq!(zoned.epoch_seconds(), 0);
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ZonedCalendarDateTime<A: AsChronology> {
    datetime: CalendarDateTime<A>,
    offset: UtcOffset,
}

impl<A: AsChronology> ZonedCalendarDateTime<A> {
    /// Anchor a local date-time to an offset.
    pub const fn new(datetime: CalendarDateTime<A>, offset: UtcOffset) -> Self {
        Self { datetime, offset }
    }

    /// The local date-time.
    pub fn datetime(&self) -> &CalendarDateTime<A> {
        &self.datetime
    }

    /// The UTC offset.
    pub fn offset(&self) -> UtcOffset {
        self.offset
    }

    /// Seconds since the Unix epoch of the instant this names.
    pub fn epoch_seconds(&self) -> i64 {
        self.datetime.date.epoch_day() * SECONDS_PER_DAY
            + self.datetime.time.second_of_day()
            - i64::from(self.offset.seconds())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::iso::Iso;

    fn datetime(
        (y, mo, d): (i32, u8, u8),
        (h, mi, s): (u8, u8, u8),
    ) -> CalendarDateTime<Iso> {
        CalendarDateTime::new(
            CalendarDate::try_new(y, mo, d, Iso).expect("date exists"),
            Time::try_new(h, mi, s, 0).expect("in range"),
        )
    }

    #[test]
    fn test_time_arithmetic_carries_into_date() {
        let start = datetime((1999, 12, 31), (23, 30, 0));
        let later = start.checked_add(45, TimeUnit::Minutes).expect("in range");
        assert_eq!(later.date().year(), 2000);
        assert_eq!(later.date().month(), 1);
        assert_eq!(u8::from(later.time().hour), 0);
        assert_eq!(u8::from(later.time().minute), 15);

        let back = later.checked_sub(45, TimeUnit::Minutes).expect("in range");
        assert_eq!(back, start);
    }

    #[test]
    fn test_huge_sub_day_amounts_do_not_overflow() {
        let start = datetime((1970, 1, 1), (0, 0, 0));
        // About 292 years of seconds; naive nanosecond math would overflow.
        let later = start
            .checked_add(9_200_000_000, TimeUnit::Seconds)
            .expect("in range");
        assert_eq!(later.date().epoch_day(), 9_200_000_000 / 86_400);
        assert_eq!(
            later.time().second_of_day(),
            9_200_000_000 % 86_400
        );
    }

    #[test]
    fn test_negative_amounts_borrow_from_date() {
        let start = datetime((2000, 1, 1), (0, 0, 0));
        let earlier = start.checked_sub(1, TimeUnit::Nanos).expect("in range");
        assert_eq!(earlier.date().year(), 1999);
        assert_eq!(earlier.time().nano_of_day(), crate::types::NANOS_PER_DAY - 1);
    }

    #[test]
    fn test_date_units() {
        let start = datetime((2020, 2, 29), (12, 0, 0));
        let next_year = start.checked_add(1, TimeUnit::Years).expect("in range");
        // Leap day clamps to Feb 28 the following year.
        assert_eq!(
            (next_year.date().year(), next_year.date().month(), next_year.date().day_of_month()),
            (2021, 2, 28)
        );
        assert_eq!(next_year.time(), start.time());
        let next_week = start.checked_add(1, TimeUnit::Weeks).expect("in range");
        assert_eq!(next_week.date().day_of_month(), 7);
        let next_century = start.checked_add(1, TimeUnit::Centuries).expect("in range");
        // 2120 is a leap year, so the day survives.
        assert_eq!(
            (next_century.date().year(), next_century.date().month(), next_century.date().day_of_month()),
            (2120, 2, 29)
        );
        let back_a_millennium = start.checked_add(-1, TimeUnit::Millennia).expect("in range");
        assert_eq!(back_a_millennium.date().year(), 1020);
    }

    #[test]
    fn test_half_days() {
        let start = datetime((2020, 1, 1), (18, 0, 0));
        let later = start.checked_add(1, TimeUnit::HalfDays).expect("in range");
        assert_eq!(later.date().day_of_month(), 2);
        assert_eq!(u8::from(later.time().hour), 6);
    }

    #[test]
    fn test_datetime_ordering() {
        let a = datetime((2020, 1, 1), (10, 0, 0));
        let b = datetime((2020, 1, 1), (11, 0, 0));
        let c = datetime((2020, 1, 2), (0, 0, 0));
        assert!(a < b && b < c);
    }

    #[test]
    fn test_utc_offset_bounds() {
        assert!(UtcOffset::try_from_hours(18).is_ok());
        assert!(UtcOffset::try_from_hours(19).is_err());
        assert!(UtcOffset::try_from_seconds(-64_801).is_err());
        assert_eq!(UtcOffset::utc().seconds(), 0);
    }

    #[test]
    fn test_epoch_seconds_subtracts_offset() {
        let tokyo = UtcOffset::try_from_hours(9).expect("in range");
        let zoned = ZonedCalendarDateTime::new(datetime((1970, 1, 1), (9, 0, 0)), tokyo);
        assert_eq!(zoned.epoch_seconds(), 0);

        let negative = UtcOffset::try_from_hours(-5).expect("in range");
        let zoned = ZonedCalendarDateTime::new(datetime((1969, 12, 31), (19, 0, 0)), negative);
        assert_eq!(zoned.epoch_seconds(), 0);
    }
}
