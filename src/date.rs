// This file is part of polychron. For terms of use, please see the file
// called LICENSE at the top level of the polychron source tree.

//! Dates in an arbitrary chronology. See [`CalendarDate`].

use crate::chronology::{lookup_era_by_code, AsChronology, Chronology};
use crate::error::CalendarError;
use crate::fields::{DateField, FieldMap, ResolverMode};
use crate::types::{Era, Weekday};
use calendrical_calculations::helpers::i64_to_i32;
use core::fmt;

/// Casts a field value carried as `i64` down to a year, rejecting values no
/// chronology could represent.
pub(crate) fn cast_year(value: i64) -> Result<i32, CalendarError> {
    i64_to_i32(value).map_err(|_| CalendarError::OutOfRange {
        field: DateField::Year.name(),
        value,
        min: i64::from(i32::MIN),
        max: i64::from(i32::MAX),
    })
}

/// A fully resolved calendar date: the canonical epoch day together with its
/// chronology-local decomposition.
///
/// Every `ResolvedDate` is internally consistent: the year/month/day triple
/// and the era/year-of-era pair both name the date at `epoch_day`. Dates are
/// ordered by epoch day.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ResolvedDate {
    pub(crate) epoch_day: i64,
    pub(crate) year: i32,
    pub(crate) month: u8,
    pub(crate) day: u8,
    pub(crate) era: Era,
    pub(crate) year_of_era: i32,
}

impl ResolvedDate {
    /// Resolve an epoch day in a chronology.
    pub(crate) fn from_epoch_day<C: Chronology + ?Sized>(
        chronology: &C,
        epoch_day: i64,
    ) -> Result<Self, CalendarError> {
        let (year, month, day) = chronology.from_epoch_day(epoch_day)?;
        let (era, year_of_era) = chronology.era_year_for(epoch_day, year);
        Ok(Self {
            epoch_day,
            year,
            month,
            day,
            era,
            year_of_era,
        })
    }

    /// Resolve a proleptic-year/month/day triple in a chronology.
    pub(crate) fn from_ymd<C: Chronology + ?Sized>(
        chronology: &C,
        year: i32,
        month: u8,
        day: u8,
    ) -> Result<Self, CalendarError> {
        let epoch_day = chronology.to_epoch_day(year, month, day)?;
        let (era, year_of_era) = chronology.era_year_for(epoch_day, year);
        Ok(Self {
            epoch_day,
            year,
            month,
            day,
            era,
            year_of_era,
        })
    }

    /// The date `days` days later (or earlier, if negative).
    pub(crate) fn plus_days<C: Chronology + ?Sized>(
        &self,
        chronology: &C,
        days: i64,
    ) -> Result<Self, CalendarError> {
        if days == 0 {
            return Ok(*self);
        }
        let epoch_day = self
            .epoch_day
            .checked_add(days)
            .ok_or(CalendarError::Overflow("epoch-day"))?;
        Self::from_epoch_day(chronology, epoch_day)
    }

    /// The date `months` months later, clamping the day of month into the
    /// target month where it would otherwise overflow.
    pub(crate) fn plus_months<C: Chronology + ?Sized>(
        &self,
        chronology: &C,
        months: i64,
    ) -> Result<Self, CalendarError> {
        if months == 0 {
            return Ok(*self);
        }
        let month0 = i64::from(self.year) * 12 + i64::from(self.month) - 1;
        let month0 = month0
            .checked_add(months)
            .ok_or(CalendarError::Overflow("proleptic-month"))?;
        let year = cast_year(month0.div_euclid(12))?;
        let month = (month0.rem_euclid(12) + 1) as u8;
        let day = self.day.min(chronology.days_in_month(year, month));
        Self::from_ymd(chronology, year, month, day)
    }

    /// The date `weeks` weeks later.
    pub(crate) fn plus_weeks<C: Chronology + ?Sized>(
        &self,
        chronology: &C,
        weeks: i64,
    ) -> Result<Self, CalendarError> {
        let days = weeks
            .checked_mul(7)
            .ok_or(CalendarError::Overflow("epoch-day"))?;
        self.plus_days(chronology, days)
    }

    /// The next date falling on `weekday`, or this date if it already does.
    pub(crate) fn next_or_same<C: Chronology + ?Sized>(
        &self,
        chronology: &C,
        weekday: Weekday,
    ) -> Result<Self, CalendarError> {
        self.plus_days(chronology, weekday.days_since(self.day_of_week()))
    }

    /// The weekday of this date. Epoch day zero was a Thursday.
    pub(crate) fn day_of_week(&self) -> Weekday {
        Weekday::from((self.epoch_day + 4).rem_euclid(7) as usize)
    }
}

/// A date in a chronology `C`, wrapped so the chronology may be owned,
/// shared, or borrowed.
///
/// The generic parameter `A` is anything implementing
/// [`AsChronology`]: `C` itself, `Rc<C>`, `Arc<C>`, `Arc<dyn Chronology>`, or
/// [`Ref<C>`](crate::Ref).
///
/// # Examples
///
/// ```
/// use polychron::{CalendarDate, Iso};
///
/// let date = CalendarDate::try_new(1970, 1, 1, Iso).expect("date exists");
/// assert_eq!(date.epoch_day(), 0);
/// assert_eq!(date.year_of_era(), 1970);
/// ```
pub struct CalendarDate<A: AsChronology> {
    pub(crate) inner: ResolvedDate,
    pub(crate) chronology: A,
}

impl<A: AsChronology> CalendarDate<A> {
    /// Construct a date from a proleptic year, month, and day of month,
    /// validating all three.
    pub fn try_new(year: i32, month: u8, day: u8, chronology: A) -> Result<Self, CalendarError> {
        let inner = ResolvedDate::from_ymd(chronology.as_chronology(), year, month, day)?;
        Ok(Self { inner, chronology })
    }

    /// Construct a date from an epoch day.
    ///
    /// Fails if the epoch day lies outside the chronology's supported range.
    pub fn try_new_from_epoch_day(epoch_day: i64, chronology: A) -> Result<Self, CalendarError> {
        chronology
            .as_chronology()
            .epoch_day_range()
            .check(DateField::EpochDay, epoch_day)?;
        let inner = ResolvedDate::from_epoch_day(chronology.as_chronology(), epoch_day)?;
        Ok(Self { inner, chronology })
    }

    /// Construct a date from an era code, year of era, month, and day.
    ///
    /// The era must actually contain the constructed date. A year of era that
    /// runs past the end of its era, such as Heisei 33, is rejected even
    /// though the underlying day exists under a later era.
    ///
    /// # Examples
    ///
    /// ```
    /// use polychron::{CalendarDate, JapaneseChronology, Ref};
    ///
    /// let japanese = JapaneseChronology::new();
    /// let date = CalendarDate::try_new_in_era("heisei", 31, 4, 30, Ref(&japanese))
    ///     .expect("last day of Heisei");
    /// assert_eq!(date.year(), 2019);
    /// assert!(CalendarDate::try_new_in_era("heisei", 31, 5, 1, Ref(&japanese)).is_err());
    /// ```
    pub fn try_new_in_era(
        era: &str,
        year_of_era: i32,
        month: u8,
        day: u8,
        chronology: A,
    ) -> Result<Self, CalendarError> {
        let chrono = chronology.as_chronology();
        let era = lookup_era_by_code(chrono, era)?;
        let year = chrono.to_proleptic_year(era, year_of_era)?;
        let inner = ResolvedDate::from_ymd(chrono, year, month, day)?;
        if inner.era != era {
            return Err(CalendarError::FieldConflict {
                field: DateField::Era.name(),
                existing: i64::from(era.value()),
                attempted: i64::from(inner.era.value()),
            });
        }
        Ok(Self { inner, chronology })
    }

    /// Resolve a map of fields into a date.
    ///
    /// Consumed fields are removed from `fields`; entries that took no part
    /// in resolution remain. Returns `Ok(None)` when the map holds no
    /// combination of fields that determines a date.
    ///
    /// # Examples
    ///
    /// ```
    /// use polychron::fields::{DateField, FieldMap, ResolverMode};
    /// use polychron::{CalendarDate, Iso};
    ///
    /// let mut fields = FieldMap::new();
    /// fields.insert(DateField::Year, 2001);
    /// fields.insert(DateField::MonthOfYear, 2);
    /// fields.insert(DateField::DayOfMonth, 29);
    ///
    /// // Smart mode clamps day 29 into non-leap February.
    /// let date = CalendarDate::resolve(&mut fields, ResolverMode::Smart, Iso)
    ///     .expect("resolvable")
    ///     .expect("enough fields");
    /// assert_eq!((date.month(), date.day_of_month()), (2, 28));
    /// ```
    pub fn resolve(
        fields: &mut FieldMap,
        mode: ResolverMode,
        chronology: A,
    ) -> Result<Option<Self>, CalendarError> {
        let inner = crate::resolve::resolve_date(chronology.as_chronology(), fields, mode)?;
        Ok(inner.map(|inner| Self { inner, chronology }))
    }

    /// Convert this date into another chronology by way of its epoch day.
    ///
    /// # Examples
    ///
    /// ```
    /// use polychron::{CalendarDate, HijrahChronology, Iso, Ref};
    ///
    /// let hijrah = HijrahChronology::new_tabular();
    /// let date = CalendarDate::try_new(1970, 1, 1, Iso)
    ///     .expect("date exists")
    ///     .to_chronology(Ref(&hijrah))
    ///     .expect("within table range");
    /// assert_eq!((date.year(), date.month(), date.day_of_month()), (1389, 10, 22));
    /// ```
    pub fn to_chronology<A2: AsChronology>(
        &self,
        chronology: A2,
    ) -> Result<CalendarDate<A2>, CalendarError> {
        CalendarDate::try_new_from_epoch_day(self.inner.epoch_day, chronology)
    }

    /// Convert this date to the ISO chronology.
    pub fn to_iso(&self) -> Result<CalendarDate<crate::Iso>, CalendarError> {
        self.to_chronology(crate::Iso)
    }

    /// The canonical epoch day of this date.
    pub fn epoch_day(&self) -> i64 {
        self.inner.epoch_day
    }

    /// The proleptic year.
    pub fn year(&self) -> i32 {
        self.inner.year
    }

    /// The 1-based month of year.
    pub fn month(&self) -> u8 {
        self.inner.month
    }

    /// The 1-based day of month.
    pub fn day_of_month(&self) -> u8 {
        self.inner.day
    }

    /// The era containing this date.
    pub fn era(&self) -> Era {
        self.inner.era
    }

    /// The year within the era, starting at 1.
    pub fn year_of_era(&self) -> i32 {
        self.inner.year_of_era
    }

    /// The weekday of this date.
    pub fn day_of_week(&self) -> Weekday {
        self.inner.day_of_week()
    }

    /// The ordinal of this date within its year, starting at 1.
    pub fn day_of_year(&self) -> u16 {
        self.chronology.as_chronology().day_of_year(
            self.inner.year,
            self.inner.month,
            self.inner.day,
        )
    }

    /// The length of this date's month.
    pub fn days_in_month(&self) -> u8 {
        self.chronology
            .as_chronology()
            .days_in_month(self.inner.year, self.inner.month)
    }

    /// The length of this date's year.
    pub fn days_in_year(&self) -> u16 {
        self.chronology.as_chronology().days_in_year(self.inner.year)
    }

    /// Whether this date falls in a leap year.
    pub fn is_in_leap_year(&self) -> bool {
        self.chronology.as_chronology().is_leap_year(self.inner.year)
    }

    /// The position of this day within the aligned week of its month.
    pub fn aligned_day_of_week_in_month(&self) -> u8 {
        (self.inner.day - 1) % 7 + 1
    }

    /// The aligned week of the month, starting at 1.
    pub fn aligned_week_of_month(&self) -> u8 {
        (self.inner.day - 1) / 7 + 1
    }

    /// The position of this day within the aligned week of its year.
    pub fn aligned_day_of_week_in_year(&self) -> u16 {
        (self.day_of_year() - 1) % 7 + 1
    }

    /// The aligned week of the year, starting at 1.
    pub fn aligned_week_of_year(&self) -> u16 {
        (self.day_of_year() - 1) / 7 + 1
    }

    /// The date `days` days later (or earlier, if negative).
    pub fn plus_days(&self, days: i64) -> Result<Self, CalendarError>
    where
        A: Clone,
    {
        let inner = self.inner.plus_days(self.chronology.as_chronology(), days)?;
        Ok(Self {
            inner,
            chronology: self.chronology.clone(),
        })
    }

    /// The date `weeks` weeks later.
    pub fn plus_weeks(&self, weeks: i64) -> Result<Self, CalendarError>
    where
        A: Clone,
    {
        let inner = self.inner.plus_weeks(self.chronology.as_chronology(), weeks)?;
        Ok(Self {
            inner,
            chronology: self.chronology.clone(),
        })
    }

    /// The date `months` months later, clamping the day of month into the
    /// target month where needed.
    pub fn plus_months(&self, months: i64) -> Result<Self, CalendarError>
    where
        A: Clone,
    {
        let inner = self
            .inner
            .plus_months(self.chronology.as_chronology(), months)?;
        Ok(Self {
            inner,
            chronology: self.chronology.clone(),
        })
    }

    /// The chronology wrapper this date was constructed with.
    pub fn chronology(&self) -> &A {
        &self.chronology
    }
}

impl<A: AsChronology> PartialEq for CalendarDate<A> {
    fn eq(&self, other: &Self) -> bool {
        self.inner == other.inner
    }
}

impl<A: AsChronology> Eq for CalendarDate<A> {}

impl<A: AsChronology> PartialOrd for CalendarDate<A> {
    fn partial_cmp(&self, other: &Self) -> Option<core::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl<A: AsChronology> Ord for CalendarDate<A> {
    /// Dates in the same chronology are ordered by epoch day.
    fn cmp(&self, other: &Self) -> core::cmp::Ordering {
        self.inner.epoch_day.cmp(&other.inner.epoch_day)
    }
}

impl<A: AsChronology + Clone> Clone for CalendarDate<A> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner,
            chronology: self.chronology.clone(),
        }
    }
}

impl<A: AsChronology + Copy> Copy for CalendarDate<A> {}

impl<A: AsChronology> fmt::Debug for CalendarDate<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Date({} {} {:04}-{:02}-{:02}, epoch day {})",
            self.chronology.as_chronology().debug_name(),
            self.inner.era,
            self.inner.year_of_era,
            self.inner.month,
            self.inner.day,
            self.inner.epoch_day,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::iso::Iso;
    use crate::Ref;
    use std::sync::Arc;

    #[test]
    fn test_wrapper_types() {
        let owned = CalendarDate::try_new(2024, 6, 1, Iso).expect("date exists");
        let arced =
            CalendarDate::try_new(2024, 6, 1, Arc::new(Iso)).expect("date exists");
        let iso = Iso;
        let borrowed = CalendarDate::try_new(2024, 6, 1, Ref(&iso)).expect("date exists");
        assert_eq!(owned.epoch_day(), arced.epoch_day());
        assert_eq!(owned.epoch_day(), borrowed.epoch_day());
    }

    #[test]
    fn test_dyn_chronology_date() {
        let chronology: Arc<dyn crate::Chronology> = Arc::new(Iso);
        let date = CalendarDate::try_new_from_epoch_day(0, chronology).expect("in range");
        assert_eq!((date.year(), date.month(), date.day_of_month()), (1970, 1, 1));
        assert_eq!(date.day_of_week(), crate::types::Weekday::Thursday);
    }

    #[test]
    fn test_plus_months_clamps() {
        let date = CalendarDate::try_new(2024, 1, 31, Iso).expect("date exists");
        let next = date.plus_months(1).expect("in range");
        assert_eq!((next.month(), next.day_of_month()), (2, 29));
        let prev = date.plus_months(-2).expect("in range");
        assert_eq!((prev.year(), prev.month(), prev.day_of_month()), (2023, 11, 30));
    }

    #[test]
    fn test_ordering_by_epoch_day() {
        let a = CalendarDate::try_new(2020, 5, 1, Iso).expect("date exists");
        let b = CalendarDate::try_new(2020, 5, 2, Iso).expect("date exists");
        assert!(a < b);
        assert_eq!(a.cmp(&a), core::cmp::Ordering::Equal);
    }
}
