// This file is part of polychron. For terms of use, please see the file
// called LICENSE at the top level of the polychron source tree.

//! The Republic of China (Minguo) chronology: the Gregorian calendar with
//! years counted from 1912 CE, the founding year of the Republic.

use crate::chronology::Chronology;
use crate::error::CalendarError;
use crate::fields::{DateField, ValueRange};
use crate::iso;
use crate::types::Era;
use tinystr::tinystr;

/// ISO year 1912 is Minguo year 1.
const MINGUO_ERA_OFFSET: i32 = 1911;

const ERAS: [Era; 2] = [
    Era::new(tinystr!(16, "roc-inverse"), 0),
    Era::new(tinystr!(16, "roc"), 1),
];

/// The Minguo chronology.
///
/// # Examples
///
/// ```
/// use polychron::{CalendarDate, MinguoChronology};
///
/// let date = CalendarDate::try_new(113, 5, 20, MinguoChronology).expect("date exists");
/// assert_eq!(date.to_iso().expect("in range").year(), 2024);
/// ```
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[allow(clippy::exhaustive_structs)] // unit struct
pub struct MinguoChronology;

fn iso_year(proleptic_year: i32) -> Result<i32, CalendarError> {
    proleptic_year
        .checked_add(MINGUO_ERA_OFFSET)
        .ok_or(CalendarError::Overflow("year"))
}

impl Chronology for MinguoChronology {
    fn id(&self) -> &str {
        "minguo"
    }

    fn calendar_type(&self) -> Option<&str> {
        Some("roc")
    }

    fn debug_name(&self) -> &'static str {
        "Minguo"
    }

    fn eras(&self) -> &[Era] {
        &ERAS
    }

    fn era_of(&self, proleptic_year: i32) -> Era {
        if proleptic_year >= 1 {
            Era::new(tinystr!(16, "roc"), 1)
        } else {
            Era::new(tinystr!(16, "roc-inverse"), 0)
        }
    }

    fn to_proleptic_year(&self, era: Era, year_of_era: i32) -> Result<i32, CalendarError> {
        match era.code().as_str() {
            "roc" => Ok(year_of_era),
            "roc-inverse" => year_of_era
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
        Ok((year - MINGUO_ERA_OFFSET, month, day))
    }

    fn months_in_year(&self, _year: i32) -> u8 {
        12
    }

    fn days_in_month(&self, year: i32, month: u8) -> u8 {
        iso::iso_days_in_month(year.saturating_add(MINGUO_ERA_OFFSET), month)
    }

    fn days_in_year(&self, year: i32) -> u16 {
        iso::iso_days_in_year(year.saturating_add(MINGUO_ERA_OFFSET))
    }

    fn is_leap_year(&self, year: i32) -> bool {
        calendrical_calculations::iso::is_leap_year(year.saturating_add(MINGUO_ERA_OFFSET))
    }

    fn field_range(&self, field: DateField) -> ValueRange {
        iso::solar_field_range(
            field,
            ValueRange::new(
                i64::from(iso::MIN_ISO_YEAR) - i64::from(MINGUO_ERA_OFFSET),
                i64::from(iso::MAX_ISO_YEAR) - i64::from(MINGUO_ERA_OFFSET),
            ),
        )
    }

    fn epoch_day_range(&self) -> ValueRange {
        iso::iso_epoch_day_range()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{CalendarDate, Iso};

    #[test]
    fn test_minguo_epoch() {
        // ROC year 1 began on ISO 1912-01-01 (in this proleptic reckoning).
        let roc = CalendarDate::try_new(1, 1, 1, MinguoChronology).expect("date exists");
        let iso = CalendarDate::try_new(1912, 1, 1, Iso).expect("date exists");
        assert_eq!(roc.epoch_day(), iso.epoch_day());
        assert_eq!(roc.era().code(), tinystr!(16, "roc"));
        assert_eq!(roc.year_of_era(), 1);
    }

    #[test]
    fn test_minguo_before_era() {
        // ISO 1911 is the year before ROC 1, i.e. roc-inverse year 1.
        let date = CalendarDate::try_new(1911, 7, 1, Iso)
            .expect("date exists")
            .to_chronology(MinguoChronology)
            .expect("in range");
        assert_eq!(date.year(), 0);
        assert_eq!(date.era().code(), tinystr!(16, "roc-inverse"));
        assert_eq!(date.year_of_era(), 1);
    }

    #[test]
    fn test_minguo_era_inverse() {
        for year in [-50, 0, 1, 113] {
            let (era, year_of_era) = MinguoChronology.era_year_for(0, year);
            assert_eq!(
                MinguoChronology
                    .to_proleptic_year(era, year_of_era)
                    .expect("valid era"),
                year
            );
        }
    }

    #[test]
    fn test_minguo_leap_years() {
        // ROC 113 is ISO 2024, a leap year.
        assert!(MinguoChronology.is_leap_year(113));
        assert!(!MinguoChronology.is_leap_year(112));
        assert_eq!(MinguoChronology.days_in_month(113, 2), 29);
    }
}
