// This file is part of polychron. For terms of use, please see the file
// called LICENSE at the top level of the polychron source tree.

//! Date fields, their valid ranges, and the mutable field map consumed by
//! resolution.

use crate::error::CalendarError;
use core::fmt;
use std::collections::BTreeMap;

/// The closed set of date fields a chronology can interpret.
///
/// Fields are ordered from the least significant to the most significant,
/// matching the order in which resolution consumes them.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[allow(clippy::exhaustive_enums)] // this is the full vocabulary
pub enum DateField {
    /// Day of the week, `1` (Monday) through `7` (Sunday).
    DayOfWeek,
    /// Position of the day within an aligned week of the month, `1..=7`.
    AlignedDayOfWeekInMonth,
    /// Position of the day within an aligned week of the year, `1..=7`.
    AlignedDayOfWeekInYear,
    /// Day within the month, starting at 1.
    DayOfMonth,
    /// Day within the year, starting at 1.
    DayOfYear,
    /// Epoch day, the count of days since 1970-01-01 (ISO).
    EpochDay,
    /// Aligned week within the month; week 1 starts on the first of the month.
    AlignedWeekOfMonth,
    /// Aligned week within the year; week 1 starts on the first of the year.
    AlignedWeekOfYear,
    /// Month within the year, starting at 1.
    MonthOfYear,
    /// Months elapsed since month 1 of proleptic year 0.
    ProlepticMonth,
    /// Year within the era, starting at 1.
    YearOfEra,
    /// Proleptic year of the chronology.
    Year,
    /// Numeric era value.
    Era,
}

impl DateField {
    /// A stable lowercase name, used in error messages.
    pub const fn name(self) -> &'static str {
        match self {
            Self::DayOfWeek => "day-of-week",
            Self::AlignedDayOfWeekInMonth => "aligned-day-of-week-in-month",
            Self::AlignedDayOfWeekInYear => "aligned-day-of-week-in-year",
            Self::DayOfMonth => "day-of-month",
            Self::DayOfYear => "day-of-year",
            Self::EpochDay => "epoch-day",
            Self::AlignedWeekOfMonth => "aligned-week-of-month",
            Self::AlignedWeekOfYear => "aligned-week-of-year",
            Self::MonthOfYear => "month-of-year",
            Self::ProlepticMonth => "proleptic-month",
            Self::YearOfEra => "year-of-era",
            Self::Year => "year",
            Self::Era => "era",
        }
    }
}

impl fmt::Display for DateField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// An inclusive range of valid values for a field.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct ValueRange {
    min: i64,
    max: i64,
}

impl ValueRange {
    /// Construct a range. `min` must not exceed `max`.
    pub const fn new(min: i64, max: i64) -> Self {
        debug_assert!(min <= max);
        Self { min, max }
    }

    /// The smallest valid value.
    pub const fn min(self) -> i64 {
        self.min
    }

    /// The largest valid value.
    pub const fn max(self) -> i64 {
        self.max
    }

    /// Whether `value` lies within this range.
    pub const fn contains(self, value: i64) -> bool {
        self.min <= value && value <= self.max
    }

    /// Validate `value` against this range, naming `field` in the error.
    ///
    /// # Examples
    ///
    /// ```
    /// use polychron::fields::{DateField, ValueRange};
    ///
    /// let range = ValueRange::new(1, 12);
    /// assert!(range.check(DateField::MonthOfYear, 12).is_ok());
    /// assert!(range.check(DateField::MonthOfYear, 13).is_err());
    /// ```
    pub fn check(self, field: DateField, value: i64) -> Result<(), CalendarError> {
        if self.contains(value) {
            Ok(())
        } else {
            Err(CalendarError::OutOfRange {
                field: field.name(),
                value,
                min: self.min,
                max: self.max,
            })
        }
    }
}

/// How leniently resolution treats out-of-range field combinations.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[allow(clippy::exhaustive_enums)] // this is stable
pub enum ResolverMode {
    /// Interpret out-of-range values by arithmetic carry from a base date.
    Lenient,
    /// Validate each field against its outer range, then clamp the day of
    /// month into the actual month length where needed.
    #[default]
    Smart,
    /// Validate every field exactly; reject any combination that does not
    /// name a real date.
    Strict,
}

/// A mutable mapping from fields to `i64` values.
///
/// Resolution consumes entries from the map as it combines them; whatever
/// remains afterwards was not used. Derived values are merged back in with
/// [`FieldMap::insert_checked`], which rejects a differing duplicate.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FieldMap {
    values: BTreeMap<DateField, i64>,
}

impl FieldMap {
    /// Construct an empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a caller-supplied value, returning the previous value if the
    /// field was already present.
    pub fn insert(&mut self, field: DateField, value: i64) -> Option<i64> {
        self.values.insert(field, value)
    }

    /// Merge a derived value into the map.
    ///
    /// Inserting the value a field already holds is a no-op; inserting a
    /// different value is a [`CalendarError::FieldConflict`].
    pub fn insert_checked(&mut self, field: DateField, value: i64) -> Result<(), CalendarError> {
        match self.values.insert(field, value) {
            Some(existing) if existing != value => Err(CalendarError::FieldConflict {
                field: field.name(),
                existing,
                attempted: value,
            }),
            _ => Ok(()),
        }
    }

    /// The value for `field`, if present.
    pub fn get(&self, field: DateField) -> Option<i64> {
        self.values.get(&field).copied()
    }

    /// Whether the map holds a value for `field`.
    pub fn contains(&self, field: DateField) -> bool {
        self.values.contains_key(&field)
    }

    /// Remove and return the value for `field`.
    pub fn remove(&mut self, field: DateField) -> Option<i64> {
        self.values.remove(&field)
    }

    /// The number of fields in the map.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the map is empty.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterate over the fields and values, in field order.
    pub fn iter(&self) -> impl Iterator<Item = (DateField, i64)> + '_ {
        self.values.iter().map(|(&f, &v)| (f, v))
    }
}

impl FromIterator<(DateField, i64)> for FieldMap {
    fn from_iter<T: IntoIterator<Item = (DateField, i64)>>(iter: T) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_checked_detects_conflicts() {
        let mut fields = FieldMap::new();
        fields.insert_checked(DateField::Year, 2000).expect("fresh");
        fields
            .insert_checked(DateField::Year, 2000)
            .expect("same value is fine");
        let err = fields
            .insert_checked(DateField::Year, 2001)
            .expect_err("differing duplicate");
        assert!(matches!(err, CalendarError::FieldConflict { .. }));
    }

    #[test]
    fn test_remove_consumes() {
        let mut fields: FieldMap = [(DateField::DayOfMonth, 14)].into_iter().collect();
        assert_eq!(fields.remove(DateField::DayOfMonth), Some(14));
        assert!(fields.is_empty());
    }
}
