// This file is part of polychron. For terms of use, please see the file
// called LICENSE at the top level of the polychron source tree.

//! The ISO-8601 chronology, i.e. the proleptic Gregorian calendar. This is
//! the canonical chronology every other one converts through.

use crate::chronology::Chronology;
use crate::error::CalendarError;
use crate::fields::{DateField, ValueRange};
use crate::types::Era;
use calendrical_calculations::rata_die::RataDie;
use tinystr::tinystr;

/// Fixed dates (rata die) count days from 0001-01-01 being day 1; epoch days
/// count from 1970-01-01 being day 0.
const UNIX_EPOCH_RATA_DIE: i64 = 719_163;

/// Supported proleptic year range for solar chronologies.
pub(crate) const MIN_ISO_YEAR: i32 = -999_999;
pub(crate) const MAX_ISO_YEAR: i32 = 999_999;

const ERAS: [Era; 2] = [
    Era::new(tinystr!(16, "bce"), 0),
    Era::new(tinystr!(16, "ce"), 1),
];

pub(crate) fn rata_die_to_epoch_day(rata_die: RataDie) -> i64 {
    rata_die.to_i64_date() - UNIX_EPOCH_RATA_DIE
}

pub(crate) fn epoch_day_to_rata_die(epoch_day: i64) -> RataDie {
    RataDie::new(epoch_day + UNIX_EPOCH_RATA_DIE)
}

pub(crate) fn iso_days_in_month(year: i32, month: u8) -> u8 {
    match month {
        4 | 6 | 9 | 11 => 30,
        2 if calendrical_calculations::iso::is_leap_year(year) => 29,
        2 => 28,
        _ => 31,
    }
}

pub(crate) fn iso_days_in_year(year: i32) -> u16 {
    if calendrical_calculations::iso::is_leap_year(year) {
        366
    } else {
        365
    }
}

/// Validates an ISO year/month/day triple and converts it to an epoch day.
pub(crate) fn iso_to_epoch_day(year: i32, month: u8, day: u8) -> Result<i64, CalendarError> {
    ValueRange::new(i64::from(MIN_ISO_YEAR), i64::from(MAX_ISO_YEAR))
        .check(DateField::Year, i64::from(year))?;
    ValueRange::new(1, 12).check(DateField::MonthOfYear, i64::from(month))?;
    let month_len = iso_days_in_month(year, month);
    ValueRange::new(1, i64::from(month_len)).check(DateField::DayOfMonth, i64::from(day))?;
    Ok(rata_die_to_epoch_day(
        calendrical_calculations::iso::fixed_from_iso(year, month, day),
    ))
}

/// Converts an epoch day to an ISO year/month/day triple.
pub(crate) fn iso_from_epoch_day(epoch_day: i64) -> Result<(i32, u8, u8), CalendarError> {
    iso_epoch_day_range().check(DateField::EpochDay, epoch_day)?;
    calendrical_calculations::iso::iso_from_fixed(epoch_day_to_rata_die(epoch_day)).map_err(|_| {
        CalendarError::Overflow("epoch-day")
    })
}

pub(crate) fn iso_epoch_day_range() -> ValueRange {
    ValueRange::new(
        rata_die_to_epoch_day(calendrical_calculations::iso::fixed_from_iso(
            MIN_ISO_YEAR,
            1,
            1,
        )),
        rata_die_to_epoch_day(calendrical_calculations::iso::fixed_from_iso(
            MAX_ISO_YEAR,
            12,
            31,
        )),
    )
}

/// Field ranges shared by the ISO chronology and the solar chronologies
/// derived from it by a year offset.
pub(crate) fn solar_field_range(field: DateField, year_range: ValueRange) -> ValueRange {
    match field {
        DateField::DayOfWeek
        | DateField::AlignedDayOfWeekInMonth
        | DateField::AlignedDayOfWeekInYear => ValueRange::new(1, 7),
        DateField::DayOfMonth => ValueRange::new(1, 31),
        DateField::DayOfYear => ValueRange::new(1, 366),
        DateField::EpochDay => iso_epoch_day_range(),
        DateField::AlignedWeekOfMonth => ValueRange::new(1, 5),
        DateField::AlignedWeekOfYear => ValueRange::new(1, 53),
        DateField::MonthOfYear => ValueRange::new(1, 12),
        DateField::ProlepticMonth => {
            ValueRange::new(year_range.min() * 12, year_range.max() * 12 + 11)
        }
        DateField::YearOfEra => {
            ValueRange::new(1, (1 - year_range.min()).max(year_range.max()))
        }
        DateField::Year => year_range,
        DateField::Era => ValueRange::new(0, 1),
    }
}

/// The ISO-8601 chronology.
///
/// # Examples
///
/// ```
/// use polychron::{CalendarDate, Iso};
///
/// let date = CalendarDate::try_new(-1, 12, 31, Iso).expect("date exists");
/// assert_eq!(date.era().code(), tinystr::tinystr!(16, "bce"));
/// assert_eq!(date.year_of_era(), 2);
/// ```
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[allow(clippy::exhaustive_structs)] // unit struct
pub struct Iso;

impl Chronology for Iso {
    fn id(&self) -> &str {
        "iso"
    }

    fn calendar_type(&self) -> Option<&str> {
        Some("iso8601")
    }

    fn debug_name(&self) -> &'static str {
        "ISO"
    }

    fn eras(&self) -> &[Era] {
        &ERAS
    }

    fn era_of(&self, proleptic_year: i32) -> Era {
        if proleptic_year >= 1 {
            Era::new(tinystr!(16, "ce"), 1)
        } else {
            Era::new(tinystr!(16, "bce"), 0)
        }
    }

    fn to_proleptic_year(&self, era: Era, year_of_era: i32) -> Result<i32, CalendarError> {
        match era.code().as_str() {
            "ce" => Ok(year_of_era),
            "bce" => year_of_era
                .checked_neg()
                .and_then(|y| y.checked_add(1))
                .ok_or(CalendarError::Overflow("year")),
            _ => Err(CalendarError::UnknownEra(era.code(), self.debug_name())),
        }
    }

    fn to_epoch_day(&self, year: i32, month: u8, day: u8) -> Result<i64, CalendarError> {
        iso_to_epoch_day(year, month, day)
    }

    fn from_epoch_day(&self, epoch_day: i64) -> Result<(i32, u8, u8), CalendarError> {
        iso_from_epoch_day(epoch_day)
    }

    fn months_in_year(&self, _year: i32) -> u8 {
        12
    }

    fn days_in_month(&self, year: i32, month: u8) -> u8 {
        iso_days_in_month(year, month)
    }

    fn days_in_year(&self, year: i32) -> u16 {
        iso_days_in_year(year)
    }

    fn is_leap_year(&self, year: i32) -> bool {
        calendrical_calculations::iso::is_leap_year(year)
    }

    fn field_range(&self, field: DateField) -> ValueRange {
        solar_field_range(
            field,
            ValueRange::new(i64::from(MIN_ISO_YEAR), i64::from(MAX_ISO_YEAR)),
        )
    }

    fn epoch_day_range(&self) -> ValueRange {
        iso_epoch_day_range()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::CalendarDate;

    #[test]
    fn test_unix_epoch_anchor() {
        assert_eq!(iso_to_epoch_day(1970, 1, 1).expect("date exists"), 0);
        assert_eq!(iso_to_epoch_day(1969, 12, 31).expect("date exists"), -1);
        assert_eq!(iso_to_epoch_day(1970, 1, 2).expect("date exists"), 1);
        assert_eq!(iso_from_epoch_day(0).expect("in range"), (1970, 1, 1));
    }

    #[test]
    fn test_known_epoch_days() {
        // 2000-01-01 is 10957 days after the epoch.
        assert_eq!(iso_to_epoch_day(2000, 1, 1).expect("date exists"), 10957);
        assert_eq!(iso_from_epoch_day(10957).expect("in range"), (2000, 1, 1));
        // 0001-01-01 has rata die 1.
        assert_eq!(iso_to_epoch_day(1, 1, 1).expect("date exists"), -719_162);
    }

    #[test]
    fn test_month_lengths() {
        assert_eq!(iso_days_in_month(2000, 2), 29);
        assert_eq!(iso_days_in_month(1900, 2), 28);
        assert_eq!(iso_days_in_month(2024, 2), 29);
        assert_eq!(iso_days_in_month(2023, 4), 30);
        assert_eq!(iso_days_in_month(2023, 12), 31);
        assert_eq!(iso_days_in_year(2000), 366);
        assert_eq!(iso_days_in_year(1900), 365);
    }

    #[test]
    fn test_rejects_invalid_dates() {
        assert!(iso_to_epoch_day(2001, 2, 29).is_err());
        assert!(iso_to_epoch_day(2001, 13, 1).is_err());
        assert!(iso_to_epoch_day(2001, 0, 1).is_err());
        assert!(iso_to_epoch_day(2001, 4, 31).is_err());
    }

    #[test]
    fn test_era_mapping_round_trip() {
        // ISO year 0 is 1 BCE, year -1 is 2 BCE.
        let date = CalendarDate::try_new(0, 6, 1, Iso).expect("date exists");
        assert_eq!(date.year_of_era(), 1);
        assert_eq!(date.era().value(), 0);
        for year in [-1000, -1, 0, 1, 1970, 9999] {
            let era = Iso.era_of(year);
            let (found_era, year_of_era) = Iso.era_year_for(0, year);
            assert_eq!(era, found_era);
            assert_eq!(
                Iso.to_proleptic_year(era, year_of_era).expect("valid era"),
                year
            );
        }
    }
}
