// This file is part of polychron. For terms of use, please see the file
// called LICENSE at the top level of the polychron source tree.

//! The Thai Buddhist chronology: the Gregorian calendar with years counted
//! in the Buddhist Era, 543 years ahead of the Common Era.

use crate::chronology::Chronology;
use crate::error::CalendarError;
use crate::fields::{DateField, ValueRange};
use crate::iso;
use crate::types::Era;
use tinystr::tinystr;

/// ISO year y is Buddhist Era year y + 543.
const BUDDHIST_ERA_OFFSET: i32 = 543;

const ERAS: [Era; 2] = [
    Era::new(tinystr!(16, "be-inverse"), 0),
    Era::new(tinystr!(16, "be"), 1),
];

/// The Thai Buddhist chronology.
///
/// # Examples
///
/// ```
/// use polychron::{CalendarDate, ThaiBuddhistChronology};
///
/// let date = CalendarDate::try_new(2513, 1, 1, ThaiBuddhistChronology).expect("date exists");
/// assert_eq!(date.epoch_day(), 0); // ISO 1970-01-01
/// ```
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[allow(clippy::exhaustive_structs)] // unit struct
pub struct ThaiBuddhistChronology;

fn iso_year(proleptic_year: i32) -> Result<i32, CalendarError> {
    proleptic_year
        .checked_sub(BUDDHIST_ERA_OFFSET)
        .ok_or(CalendarError::Overflow("year"))
}

impl Chronology for ThaiBuddhistChronology {
    fn id(&self) -> &str {
        "thai-buddhist"
    }

    fn calendar_type(&self) -> Option<&str> {
        Some("buddhist")
    }

    fn debug_name(&self) -> &'static str {
        "ThaiBuddhist"
    }

    fn eras(&self) -> &[Era] {
        &ERAS
    }

    fn era_of(&self, proleptic_year: i32) -> Era {
        if proleptic_year >= 1 {
            Era::new(tinystr!(16, "be"), 1)
        } else {
            Era::new(tinystr!(16, "be-inverse"), 0)
        }
    }

    fn to_proleptic_year(&self, era: Era, year_of_era: i32) -> Result<i32, CalendarError> {
        match era.code().as_str() {
            "be" => Ok(year_of_era),
            "be-inverse" => year_of_era
                .checked_neg()
                .and_then(|y| y.checked_add(1))
                .ok_or(CalendarError::Overflow("year")),
            _ => Err(CalendarError::UnknownEra(era.code(), self.debug_name())),
        }
    }

    fn to_epoch_day(&self, year: i32, month: u8, day: u8) -> Result<i64, CalendarError> {
        iso::iso_to_epoch_day(iso_year(year)?, month, day)
    }

    fn from_epoch_day(&self, epoch_day: i64) -> Result<(i32, u8, u8), CalendarError> {
        let (year, month, day) = iso::iso_from_epoch_day(epoch_day)?;
        Ok((year + BUDDHIST_ERA_OFFSET, month, day))
    }

    fn months_in_year(&self, _year: i32) -> u8 {
        12
    }

    fn days_in_month(&self, year: i32, month: u8) -> u8 {
        iso::iso_days_in_month(year.saturating_sub(BUDDHIST_ERA_OFFSET), month)
    }

    fn days_in_year(&self, year: i32) -> u16 {
        iso::iso_days_in_year(year.saturating_sub(BUDDHIST_ERA_OFFSET))
    }

    fn is_leap_year(&self, year: i32) -> bool {
        calendrical_calculations::iso::is_leap_year(year.saturating_sub(BUDDHIST_ERA_OFFSET))
    }

    fn field_range(&self, field: DateField) -> ValueRange {
        iso::solar_field_range(
            field,
            ValueRange::new(
                i64::from(iso::MIN_ISO_YEAR) + i64::from(BUDDHIST_ERA_OFFSET),
                i64::from(iso::MAX_ISO_YEAR) + i64::from(BUDDHIST_ERA_OFFSET),
            ),
        )
    }

    fn epoch_day_range(&self) -> ValueRange {
        iso::iso_epoch_day_range()
    }
}
