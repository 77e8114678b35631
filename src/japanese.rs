// This file is part of polychron. For terms of use, please see the file
// called LICENSE at the top level of the polychron source tree.

//! The Japanese Imperial chronology: the Gregorian calendar with eras that
//! begin on the accession dates of emperors, from Meiji onward.
//!
//! Era boundaries fall mid-year, so the era and year-of-era of a date depend
//! on the exact day, not just the year: 1989-01-07 is Showa 64 while
//! 1989-01-08 is Heisei 1.

use crate::chronology::Chronology;
use crate::error::CalendarError;
use crate::fields::{DateField, ValueRange};
use crate::iso;
use crate::types::{Era, EraStartDate};
use tinystr::{tinystr, TinyStr16};

/// The modern eras, in chronological order.
const MODERN_ERAS: [(EraStartDate, TinyStr16, i8); 5] = [
    (
        EraStartDate {
            year: 1868,
            month: 9,
            day: 8,
        },
        tinystr!(16, "meiji"),
        -1,
    ),
    (
        EraStartDate {
            year: 1912,
            month: 7,
            day: 30,
        },
        tinystr!(16, "taisho"),
        0,
    ),
    (
        EraStartDate {
            year: 1926,
            month: 12,
            day: 25,
        },
        tinystr!(16, "showa"),
        1,
    ),
    (
        EraStartDate {
            year: 1989,
            month: 1,
            day: 8,
        },
        tinystr!(16, "heisei"),
        2,
    ),
    (
        EraStartDate {
            year: 2019,
            month: 5,
            day: 1,
        },
        tinystr!(16, "reiwa"),
        3,
    ),
];

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
struct EraEntry {
    start: EraStartDate,
    start_epoch_day: i64,
    era: Era,
}

fn start_epoch_day(start: EraStartDate) -> i64 {
    iso::rata_die_to_epoch_day(calendrical_calculations::iso::fixed_from_iso(
        start.year,
        start.month,
        start.day,
    ))
}

/// The Japanese Imperial chronology.
///
/// The built-in era table runs from Meiji (1868) to Reiwa; dates before the
/// start of Meiji are not representable. A custom era table can be supplied
/// with [`JapaneseChronology::try_from_eras`].
///
/// # Examples
///
/// ```
/// use polychron::{CalendarDate, JapaneseChronology, Ref};
/// use tinystr::tinystr;
///
/// let japanese = JapaneseChronology::new();
/// let date = CalendarDate::try_new(1989, 1, 7, Ref(&japanese)).expect("date exists");
/// assert_eq!(date.era().code(), tinystr!(16, "showa"));
/// assert_eq!(date.year_of_era(), 64);
///
/// let next = date.plus_days(1).expect("in range");
/// assert_eq!(next.era().code(), tinystr!(16, "heisei"));
/// assert_eq!(next.year_of_era(), 1);
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct JapaneseChronology {
    entries: Vec<EraEntry>,
    // Parallel to `entries`, so eras() can hand out a slice.
    eras: Vec<Era>,
}

impl Default for JapaneseChronology {
    fn default() -> Self {
        Self::new()
    }
}

impl JapaneseChronology {
    /// Construct the chronology with the built-in modern era table.
    pub fn new() -> Self {
        let entries: Vec<EraEntry> = MODERN_ERAS
            .iter()
            .map(|&(start, code, value)| EraEntry {
                start,
                start_epoch_day: start_epoch_day(start),
                era: Era::new(code, value),
            })
            .collect();
        let eras = entries.iter().map(|e| e.era).collect();
        Self { entries, eras }
    }

    /// Construct a chronology from a custom era table.
    ///
    /// Entries must be in chronological order with strictly increasing era
    /// values and valid start dates.
    pub fn try_from_eras(
        table: &[(EraStartDate, TinyStr16, i8)],
    ) -> Result<Self, CalendarError> {
        if table.is_empty() {
            return Err(CalendarError::invalid_data("eras", "era table is empty"));
        }
        let mut entries = Vec::with_capacity(table.len());
        for &(start, code, value) in table {
            if !(1..=12).contains(&start.month) || !(1..=31).contains(&start.day) {
                return Err(CalendarError::invalid_data(
                    code.as_str(),
                    "era start date is not a valid calendar date",
                ));
            }
            let entry = EraEntry {
                start,
                start_epoch_day: start_epoch_day(start),
                era: Era::new(code, value),
            };
            if let Some(prev) = entries.last() {
                let prev: &EraEntry = prev;
                if entry.start_epoch_day <= prev.start_epoch_day
                    || entry.era.value() <= prev.era.value()
                {
                    return Err(CalendarError::invalid_data(
                        code.as_str(),
                        "era table is not in chronological order",
                    ));
                }
            }
            entries.push(entry);
        }
        let eras = entries.iter().map(|e| e.era).collect();
        Ok(Self { entries, eras })
    }

    /// The entry in force on `epoch_day`. Falls back to the first entry for
    /// epoch days that precede the table; such days are rejected before any
    /// date is built from them.
    fn entry_for_epoch_day(&self, epoch_day: i64) -> Option<&EraEntry> {
        let idx = self
            .entries
            .partition_point(|e| e.start_epoch_day <= epoch_day);
        self.entries
            .get(idx.saturating_sub(1))
            .or_else(|| self.entries.first())
    }

    fn entry_for_code(&self, code: TinyStr16) -> Option<(usize, &EraEntry)> {
        self.entries
            .iter()
            .enumerate()
            .find(|(_, e)| e.era.code() == code)
    }

    /// The largest year-of-era of the entry at `idx`: eras run through the
    /// calendar year in which the next era begins.
    fn max_year_of_era(&self, idx: usize) -> i32 {
        match self.entries.get(idx + 1) {
            Some(next) => next.start.year - self.entries.get(idx).map_or(0, |e| e.start.year) + 1,
            None => iso::MAX_ISO_YEAR - self.entries.get(idx).map_or(0, |e| e.start.year) + 1,
        }
    }
}

impl Chronology for JapaneseChronology {
    fn id(&self) -> &str {
        "japanese"
    }

    fn calendar_type(&self) -> Option<&str> {
        Some("japanese")
    }

    fn debug_name(&self) -> &'static str {
        "Japanese"
    }

    fn eras(&self) -> &[Era] {
        &self.eras
    }

    /// The era in force on January 1 of the given ISO year, since a year that
    /// spans an era boundary belongs to two eras.
    fn era_of(&self, proleptic_year: i32) -> Era {
        let jan1 = EraStartDate {
            year: proleptic_year,
            month: 1,
            day: 1,
        };
        self.entries
            .iter()
            .rev()
            .find(|e| e.start <= jan1)
            .or_else(|| self.entries.first())
            .map_or(Era::new(tinystr!(16, "invalid"), 0), |e| e.era)
    }

    fn to_proleptic_year(&self, era: Era, year_of_era: i32) -> Result<i32, CalendarError> {
        let (idx, entry) = self
            .entry_for_code(era.code())
            .ok_or(CalendarError::UnknownEra(era.code(), self.debug_name()))?;
        let max = self.max_year_of_era(idx);
        ValueRange::new(1, i64::from(max))
            .check(DateField::YearOfEra, i64::from(year_of_era))?;
        Ok(entry.start.year + year_of_era - 1)
    }

    fn era_year_for(&self, epoch_day: i64, proleptic_year: i32) -> (Era, i32) {
        match self.entry_for_epoch_day(epoch_day) {
            Some(entry) => (entry.era, proleptic_year - entry.start.year + 1),
            None => (Era::new(tinystr!(16, "invalid"), 0), proleptic_year),
        }
    }

    fn to_epoch_day(&self, year: i32, month: u8, day: u8) -> Result<i64, CalendarError> {
        let epoch_day = iso::iso_to_epoch_day(year, month, day)?;
        self.epoch_day_range().check(DateField::EpochDay, epoch_day)?;
        Ok(epoch_day)
    }

    fn from_epoch_day(&self, epoch_day: i64) -> Result<(i32, u8, u8), CalendarError> {
        self.epoch_day_range().check(DateField::EpochDay, epoch_day)?;
        iso::iso_from_epoch_day(epoch_day)
    }

    fn months_in_year(&self, _year: i32) -> u8 {
        12
    }

    fn days_in_month(&self, year: i32, month: u8) -> u8 {
        iso::iso_days_in_month(year, month)
    }

    fn days_in_year(&self, year: i32) -> u16 {
        iso::iso_days_in_year(year)
    }

    fn is_leap_year(&self, year: i32) -> bool {
        calendrical_calculations::iso::is_leap_year(year)
    }

    fn field_range(&self, field: DateField) -> ValueRange {
        let first_year = self
            .entries
            .first()
            .map_or(i64::from(iso::MIN_ISO_YEAR), |e| i64::from(e.start.year));
        match field {
            DateField::Era => ValueRange::new(
                self.eras.first().map_or(0, |e| i64::from(e.value())),
                self.eras.last().map_or(0, |e| i64::from(e.value())),
            ),
            DateField::YearOfEra => {
                ValueRange::new(1, i64::from(iso::MAX_ISO_YEAR) - first_year + 1)
            }
            _ => iso::solar_field_range(
                field,
                ValueRange::new(first_year, i64::from(iso::MAX_ISO_YEAR)),
            ),
        }
    }

    fn epoch_day_range(&self) -> ValueRange {
        let start = self
            .entries
            .first()
            .map_or(iso::iso_epoch_day_range().min(), |e| e.start_epoch_day);
        ValueRange::new(start, iso::iso_epoch_day_range().max())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{CalendarDate, Ref};

    #[test]
    fn test_era_boundaries() {
        let japanese = JapaneseChronology::new();
        let cases = [
            ((1868, 9, 8), "meiji", 1),
            ((1912, 7, 29), "meiji", 45),
            ((1912, 7, 30), "taisho", 1),
            ((1926, 12, 24), "taisho", 15),
            ((1926, 12, 25), "showa", 1),
            ((1989, 1, 7), "showa", 64),
            ((1989, 1, 8), "heisei", 1),
            ((2019, 4, 30), "heisei", 31),
            ((2019, 5, 1), "reiwa", 1),
            ((2026, 8, 30), "reiwa", 8),
        ];
        for ((year, month, day), code, year_of_era) in cases {
            let date = CalendarDate::try_new(year, month, day, Ref(&japanese)).expect("date exists");
            assert_eq!(date.era().code().as_str(), code, "{year}-{month}-{day}");
            assert_eq!(date.year_of_era(), year_of_era, "{year}-{month}-{day}");
        }
    }

    #[test]
    fn test_pre_meiji_rejected() {
        let japanese = JapaneseChronology::new();
        assert!(CalendarDate::try_new(1868, 9, 7, Ref(&japanese)).is_err());
        assert!(CalendarDate::try_new(1800, 1, 1, Ref(&japanese)).is_err());
        assert!(CalendarDate::try_new(1868, 9, 8, Ref(&japanese)).is_ok());
    }

    #[test]
    fn test_year_of_era_past_era_end() {
        let japanese = JapaneseChronology::new();
        // Heisei ran 31 years; Heisei 33 does not exist.
        let heisei = Era::new(tinystr!(16, "heisei"), 2);
        assert!(japanese.to_proleptic_year(heisei, 31).is_ok());
        let err = japanese
            .to_proleptic_year(heisei, 33)
            .expect_err("Heisei ended after year 31");
        assert!(matches!(err, CalendarError::OutOfRange { .. }));
    }

    #[test]
    fn test_era_of_uses_january_first() {
        let japanese = JapaneseChronology::new();
        // 1989 began in Showa even though Heisei started a week later.
        assert_eq!(japanese.era_of(1989).code(), tinystr!(16, "showa"));
        assert_eq!(japanese.era_of(1990).code(), tinystr!(16, "heisei"));
        // 1912 began in Meiji; Taisho started in July.
        assert_eq!(japanese.era_of(1912).code(), tinystr!(16, "meiji"));
    }

    #[test]
    fn test_custom_era_table() {
        let table = [
            (
                EraStartDate {
                    year: 1989,
                    month: 1,
                    day: 8,
                },
                tinystr!(16, "heisei"),
                2,
            ),
            (
                EraStartDate {
                    year: 2019,
                    month: 5,
                    day: 1,
                },
                tinystr!(16, "reiwa"),
                3,
            ),
        ];
        let japanese = JapaneseChronology::try_from_eras(&table).expect("valid table");
        assert_eq!(japanese.eras().len(), 2);
        assert!(CalendarDate::try_new(1988, 1, 1, Ref(&japanese)).is_err());

        let reversed = [table[1], table[0]];
        assert!(JapaneseChronology::try_from_eras(&reversed).is_err());
        assert!(JapaneseChronology::try_from_eras(&[]).is_err());
    }
}
