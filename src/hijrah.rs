// This file is part of polychron. For terms of use, please see the file
// called LICENSE at the top level of the polychron source tree.

//! The Hijrah (Islamic) chronology, backed by a table of month start days.
//!
//! Hijrah months follow lunar observation, so no closed formula reproduces
//! every variant in use. This module instead stores one epoch day per month
//! of the supported year range and answers every query by table lookup. The
//! built-in variant uses the civil tabular arithmetic; observational
//! variants such as Umm al-Qura are loaded from configuration text with
//! [`HijrahChronology::try_from_properties`].

use crate::chronology::Chronology;
use crate::error::CalendarError;
use crate::fields::{DateField, ValueRange};
use crate::iso;
use crate::types::{Era, EraStartDate};
use tinystr::tinystr;

/// Rata die of 1 Muharram AH 1 in the civil tabular reckoning,
/// i.e. ISO 622-07-19.
const TABULAR_EPOCH_RATA_DIE: i64 = 227_015;

/// Year range covered by the built-in tabular variant.
const TABULAR_MIN_YEAR: i32 = 1300;
const TABULAR_MAX_YEAR: i32 = 1600;

const ERAS: [Era; 1] = [Era::new(tinystr!(16, "ah"), 1)];

/// Whether a year is a leap year of the 30-year civil tabular cycle.
fn tabular_leap_year(year: i32) -> bool {
    (11 * i64::from(year) + 14).rem_euclid(30) < 11
}

/// Month lengths of the civil tabular rule: odd months 30 days, even months
/// 29, with month 12 taking 30 in leap years.
fn tabular_month_length(year: i32, month: u8) -> u8 {
    if month % 2 == 1 || (month == 12 && tabular_leap_year(year)) {
        30
    } else {
        29
    }
}

/// Epoch day of 1 Muharram of a year, under the civil tabular rule.
fn tabular_year_start(year: i32) -> i64 {
    let y = i64::from(year);
    TABULAR_EPOCH_RATA_DIE - 719_163 + (y - 1) * 354 + (3 + 11 * y).div_euclid(30)
}

/// The Hijrah chronology.
///
/// Holds one epoch day per month start of its supported year range, plus a
/// final sentinel marking the end of the last year. The table is built once
/// at construction; share the chronology with `Arc` rather than rebuilding.
///
/// # Examples
///
/// ```
/// use polychron::{CalendarDate, HijrahChronology, Ref};
///
/// let hijrah = HijrahChronology::new_tabular();
/// let date = CalendarDate::try_new_from_epoch_day(0, Ref(&hijrah)).expect("in range");
/// assert_eq!((date.year(), date.month(), date.day_of_month()), (1389, 10, 22));
/// assert_eq!(date.era().code(), tinystr::tinystr!(16, "ah"));
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HijrahChronology {
    id: String,
    calendar_type: Option<String>,
    version: String,
    min_year: i32,
    /// `starts[(year - min_year) * 12 + month - 1]` is the epoch day of the
    /// first day of that month. Strictly increasing, with one trailing
    /// sentinel for the end of the last year.
    starts: Vec<i64>,
}

impl HijrahChronology {
    /// Construct the built-in civil tabular variant, covering AH 1300
    /// through AH 1600.
    pub fn new_tabular() -> Self {
        let years = TABULAR_MAX_YEAR - TABULAR_MIN_YEAR + 1;
        let mut starts = Vec::with_capacity(years as usize * 12 + 1);
        let mut day = tabular_year_start(TABULAR_MIN_YEAR);
        for year in TABULAR_MIN_YEAR..=TABULAR_MAX_YEAR {
            for month in 1..=12u8 {
                starts.push(day);
                day += i64::from(tabular_month_length(year, month));
            }
        }
        starts.push(day);
        Self {
            id: String::from("islamic-civil"),
            calendar_type: Some(String::from("islamic-civil")),
            version: String::from("tabular"),
            min_year: TABULAR_MIN_YEAR,
            starts,
        }
    }

    /// Construct a Hijrah variant from configuration text.
    ///
    /// The format is line-oriented `key=value` pairs. `#` starts a comment.
    /// The keys `id`, `version`, and `iso-start` are required; `type` is
    /// optional. `iso-start` is the ISO date of 1 Muharram of the first
    /// listed year. Every other key is a year number whose value is the
    /// twelve month lengths of that year, each between 29 and 32, separated by
    /// whitespace. Years must be contiguous.
    ///
    /// # Examples
    ///
    /// ```
    /// use polychron::{Chronology, HijrahChronology};
    ///
    /// let config = "\
    /// id=islamic-test
    /// version=1.0
    /// iso-start=2000-04-06
    /// 1421=30 29 30 29 30 29 30 29 30 29 30 29
    /// ";
    /// let hijrah = HijrahChronology::try_from_properties(config).expect("well-formed");
    /// assert_eq!(hijrah.id(), "islamic-test");
    /// assert_eq!(hijrah.year_range(), (1421, 1421));
    /// ```
    pub fn try_from_properties(text: &str) -> Result<Self, CalendarError> {
        let mut id = None;
        let mut calendar_type = None;
        let mut version = None;
        let mut iso_start: Option<EraStartDate> = None;
        let mut years: std::collections::BTreeMap<i32, [u8; 12]> =
            std::collections::BTreeMap::new();

        for line in text.lines() {
            let line = line.split('#').next().unwrap_or("").trim();
            if line.is_empty() {
                continue;
            }
            let (key, value) = line
                .split_once('=')
                .ok_or_else(|| CalendarError::invalid_data(line, "expected key=value"))?;
            let (key, value) = (key.trim(), value.trim());
            match key {
                "id" => id = Some(String::from(value)),
                "type" => calendar_type = Some(String::from(value)),
                "version" => version = Some(String::from(value)),
                "iso-start" => {
                    iso_start = Some(value.parse().map_err(|_| {
                        CalendarError::invalid_data(key, "expected an ISO date")
                    })?)
                }
                _ => {
                    let year: i32 = key
                        .parse()
                        .map_err(|_| CalendarError::invalid_data(key, "unrecognized key"))?;
                    let mut lengths = [0u8; 12];
                    let mut count = 0;
                    for part in value.split_whitespace() {
                        let length: u8 = part.parse().map_err(|_| {
                            CalendarError::invalid_data(key, "month length is not a number")
                        })?;
                        if !(29..=32).contains(&length) {
                            return Err(CalendarError::invalid_data(
                                key,
                                "month length outside 29..=32",
                            ));
                        }
                        if let Some(slot) = lengths.get_mut(count) {
                            *slot = length;
                        }
                        count += 1;
                    }
                    if count != 12 {
                        return Err(CalendarError::invalid_data(
                            key,
                            "expected exactly 12 month lengths",
                        ));
                    }
                    if years.insert(year, lengths).is_some() {
                        return Err(CalendarError::invalid_data(key, "year listed twice"));
                    }
                }
            }
        }

        let id = id.ok_or_else(|| CalendarError::invalid_data("id", "missing"))?;
        let version = version.ok_or_else(|| CalendarError::invalid_data("version", "missing"))?;
        let iso_start =
            iso_start.ok_or_else(|| CalendarError::invalid_data("iso-start", "missing"))?;
        let (&min_year, _) = years
            .first_key_value()
            .ok_or_else(|| CalendarError::invalid_data("1", "no year entries"))?;

        let mut starts = Vec::with_capacity(years.len() * 12 + 1);
        let mut day = iso::iso_to_epoch_day(iso_start.year, iso_start.month, iso_start.day)?;
        let mut expected = min_year;
        for (&year, lengths) in &years {
            if year != expected {
                return Err(CalendarError::invalid_data(
                    "iso-start",
                    "year entries are not contiguous",
                ));
            }
            expected += 1;
            for &length in lengths {
                starts.push(day);
                day += i64::from(length);
            }
        }
        starts.push(day);

        Ok(Self {
            id,
            calendar_type,
            version,
            min_year,
            starts,
        })
    }

    /// The version string of the configuration data behind this variant.
    pub fn version(&self) -> &str {
        &self.version
    }

    /// The inclusive range of supported years.
    pub fn year_range(&self) -> (i32, i32) {
        (self.min_year, self.max_year())
    }

    /// The ISO date of the first supported day, 1 Muharram of the first
    /// tabulated year.
    pub fn iso_start(&self) -> Result<(i32, u8, u8), CalendarError> {
        let first = self
            .starts
            .first()
            .copied()
            .ok_or(CalendarError::Overflow("epoch-day"))?;
        iso::iso_from_epoch_day(first)
    }

    fn max_year(&self) -> i32 {
        self.min_year + (self.starts.len().saturating_sub(1) / 12) as i32 - 1
    }

    fn month_index(&self, year: i32, month: u8) -> Option<usize> {
        if year < self.min_year || year > self.max_year() || !(1..=12).contains(&month) {
            return None;
        }
        Some((year - self.min_year) as usize * 12 + usize::from(month) - 1)
    }

    fn month_start(&self, year: i32, month: u8) -> Option<i64> {
        self.starts.get(self.month_index(year, month)?).copied()
    }

    fn month_length(&self, year: i32, month: u8) -> Option<u8> {
        let idx = self.month_index(year, month)?;
        let start = self.starts.get(idx)?;
        let end = self.starts.get(idx + 1)?;
        Some((end - start) as u8)
    }

    fn year_length(&self, year: i32) -> Option<u16> {
        let start = self.month_start(year, 1)?;
        let end = if year == self.max_year() {
            self.starts.last().copied()?
        } else {
            self.month_start(year + 1, 1)?
        };
        Some((end - start) as u16)
    }

    fn year_out_of_range(&self, year: i32) -> CalendarError {
        CalendarError::OutOfRange {
            field: DateField::Year.name(),
            value: i64::from(year),
            min: i64::from(self.min_year),
            max: i64::from(self.max_year()),
        }
    }
}

impl Chronology for HijrahChronology {
    fn id(&self) -> &str {
        &self.id
    }

    fn calendar_type(&self) -> Option<&str> {
        self.calendar_type.as_deref()
    }

    fn debug_name(&self) -> &'static str {
        "Hijrah"
    }

    fn eras(&self) -> &[Era] {
        &ERAS
    }

    fn era_of(&self, _proleptic_year: i32) -> Era {
        Era::new(tinystr!(16, "ah"), 1)
    }

    fn to_proleptic_year(&self, era: Era, year_of_era: i32) -> Result<i32, CalendarError> {
        match era.code().as_str() {
            "ah" => Ok(year_of_era),
            _ => Err(CalendarError::UnknownEra(era.code(), self.debug_name())),
        }
    }

    fn to_epoch_day(&self, year: i32, month: u8, day: u8) -> Result<i64, CalendarError> {
        if year < self.min_year || year > self.max_year() {
            return Err(self.year_out_of_range(year));
        }
        ValueRange::new(1, 12).check(DateField::MonthOfYear, i64::from(month))?;
        let length = self
            .month_length(year, month)
            .ok_or_else(|| self.year_out_of_range(year))?;
        ValueRange::new(1, i64::from(length)).check(DateField::DayOfMonth, i64::from(day))?;
        let start = self
            .month_start(year, month)
            .ok_or_else(|| self.year_out_of_range(year))?;
        Ok(start + i64::from(day) - 1)
    }

    fn from_epoch_day(&self, epoch_day: i64) -> Result<(i32, u8, u8), CalendarError> {
        self.epoch_day_range().check(DateField::EpochDay, epoch_day)?;
        // The sentinel guarantees at least one start beyond any in-range day.
        let idx = self
            .starts
            .partition_point(|&start| start <= epoch_day)
            .saturating_sub(1);
        let start = self
            .starts
            .get(idx)
            .copied()
            .ok_or(CalendarError::Overflow("epoch-day"))?;
        let year = self.min_year + (idx / 12) as i32;
        let month = (idx % 12) as u8 + 1;
        let day = (epoch_day - start + 1) as u8;
        Ok((year, month, day))
    }

    fn months_in_year(&self, _year: i32) -> u8 {
        12
    }

    fn days_in_month(&self, year: i32, month: u8) -> u8 {
        self.month_length(year, month)
            .unwrap_or_else(|| tabular_month_length(year, month))
    }

    fn days_in_year(&self, year: i32) -> u16 {
        self.year_length(year)
            .unwrap_or(if tabular_leap_year(year) { 355 } else { 354 })
    }

    fn is_leap_year(&self, year: i32) -> bool {
        self.days_in_year(year) == 355
    }

    fn field_range(&self, field: DateField) -> ValueRange {
        let (min_year, max_year) = self.year_range();
        match field {
            DateField::DayOfWeek
            | DateField::AlignedDayOfWeekInMonth
            | DateField::AlignedDayOfWeekInYear => ValueRange::new(1, 7),
            DateField::DayOfMonth => ValueRange::new(1, 30),
            DateField::DayOfYear => ValueRange::new(1, 355),
            DateField::EpochDay => self.epoch_day_range(),
            DateField::AlignedWeekOfMonth => ValueRange::new(1, 5),
            DateField::AlignedWeekOfYear => ValueRange::new(1, 51),
            DateField::MonthOfYear => ValueRange::new(1, 12),
            DateField::ProlepticMonth => ValueRange::new(
                i64::from(min_year) * 12,
                i64::from(max_year) * 12 + 11,
            ),
            DateField::YearOfEra | DateField::Year => {
                ValueRange::new(i64::from(min_year), i64::from(max_year))
            }
            DateField::Era => ValueRange::new(1, 1),
        }
    }

    fn epoch_day_range(&self) -> ValueRange {
        let first = self.starts.first().copied().unwrap_or(0);
        let last = self.starts.last().copied().unwrap_or(1);
        ValueRange::new(first, last - 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{CalendarDate, Iso, Ref};

    #[test]
    fn test_tabular_anchor() {
        // ISO 1970-01-01 is 22 Shawwal 1389 in the civil reckoning.
        let hijrah = HijrahChronology::new_tabular();
        assert_eq!(hijrah.from_epoch_day(0).expect("in range"), (1389, 10, 22));
        assert_eq!(hijrah.to_epoch_day(1389, 10, 22).expect("date exists"), 0);
    }

    #[test]
    fn test_tabular_leap_cycle() {
        // Leap years of the 30-year cycle.
        let leap_years = [2, 5, 7, 10, 13, 16, 18, 21, 24, 26, 29];
        for offset in 0..30 {
            let expected = leap_years.contains(&offset);
            assert_eq!(tabular_leap_year(1350 + offset), tabular_leap_year(offset));
            assert_eq!(tabular_leap_year(offset), expected, "cycle year {offset}");
        }
        let hijrah = HijrahChronology::new_tabular();
        // 1410 = 47 * 30, so cycle offset 0 is year 1410; 1412 is leap.
        assert!(hijrah.is_leap_year(1412));
        assert!(!hijrah.is_leap_year(1410));
        assert_eq!(hijrah.days_in_year(1412), 355);
        assert_eq!(hijrah.days_in_month(1412, 12), 30);
        assert_eq!(hijrah.days_in_month(1410, 12), 29);
    }

    #[test]
    fn test_month_starts_strictly_increase() {
        let hijrah = HijrahChronology::new_tabular();
        let mut prev = None;
        let (min, max) = hijrah.year_range();
        for year in min..=max {
            for month in 1..=12 {
                let start = hijrah.month_start(year, month).expect("in table");
                if let Some(prev) = prev {
                    let diff = start - prev;
                    assert!(diff == 29 || diff == 30, "{year}-{month}: gap {diff}");
                }
                prev = Some(start);
            }
        }
    }

    #[test]
    fn test_rejects_outside_table() {
        let hijrah = HijrahChronology::new_tabular();
        assert!(hijrah.to_epoch_day(1299, 12, 29).is_err());
        assert!(hijrah.to_epoch_day(1601, 1, 1).is_err());
        let before = hijrah.epoch_day_range().min() - 1;
        assert!(hijrah.from_epoch_day(before).is_err());
        let after = hijrah.epoch_day_range().max() + 1;
        assert!(hijrah.from_epoch_day(after).is_err());
    }

    #[test]
    fn test_round_trip_through_iso() {
        let hijrah = HijrahChronology::new_tabular();
        for (y, m, d) in [(1389, 10, 22), (1412, 12, 30), (1445, 1, 1), (1300, 1, 1)] {
            let date = CalendarDate::try_new(y, m, d, Ref(&hijrah)).expect("date exists");
            let back = date
                .to_iso()
                .expect("in range")
                .to_chronology(Ref(&hijrah))
                .expect("in range");
            assert_eq!((back.year(), back.month(), back.day_of_month()), (y, m, d));
        }
    }

    #[test]
    fn test_day_30_only_in_long_months() {
        let hijrah = HijrahChronology::new_tabular();
        assert!(hijrah.to_epoch_day(1410, 1, 30).is_ok());
        assert!(hijrah.to_epoch_day(1410, 2, 30).is_err());
        assert!(hijrah.to_epoch_day(1410, 2, 29).is_ok());
    }

    const SAMPLE: &str = "\
# sample variant for tests
id=islamic-test
type=islamic-umalqura
version=1.0
iso-start=2000-04-06
1421=30 29 30 29 30 29 30 29 30 29 30 29
1422=30 30 29 30 29 30 29 30 29 30 29 29
";

    #[test]
    fn test_properties_parsing() {
        let hijrah = HijrahChronology::try_from_properties(SAMPLE).expect("well-formed");
        assert_eq!(hijrah.id(), "islamic-test");
        assert_eq!(hijrah.calendar_type(), Some("islamic-umalqura"));
        assert_eq!(hijrah.version(), "1.0");
        assert_eq!(hijrah.year_range(), (1421, 1422));
        assert_eq!(hijrah.iso_start().expect("non-empty table"), (2000, 4, 6));

        // 1 Muharram 1421 sits on the configured ISO start date.
        let start = Iso.to_epoch_day(2000, 4, 6).expect("date exists");
        assert_eq!(hijrah.to_epoch_day(1421, 1, 1).expect("date exists"), start);
        // Month 2 of 1422 has 30 days in this variant.
        assert_eq!(hijrah.days_in_month(1422, 2), 30);
        assert!(hijrah.to_epoch_day(1422, 2, 30).is_ok());
        assert!(hijrah.to_epoch_day(1421, 2, 30).is_err());
    }

    #[test]
    fn test_properties_validation() {
        for (config, what) in [
            ("version=1\niso-start=2000-04-06\n1421=30 29 30 29 30 29 30 29 30 29 30 29\n", "missing id"),
            ("id=x\nversion=1\n1421=30 29 30 29 30 29 30 29 30 29 30 29\n", "missing iso-start"),
            ("id=x\nversion=1\niso-start=2000-04-06\n1421=30 29 30\n", "short year"),
            ("id=x\nversion=1\niso-start=2000-04-06\n1421=30 29 30 29 30 29 30 29 30 29 30 28\n", "bad length"),
            ("id=x\nversion=1\niso-start=2000-04-06\n1421=30 29 30 29 30 29 30 29 30 29 30 29\n1423=30 29 30 29 30 29 30 29 30 29 30 29\n", "gap in years"),
            ("id=x\nversion=1\niso-start=bogus\n1421=30 29 30 29 30 29 30 29 30 29 30 29\n", "bad iso-start"),
            ("id=x\nversion=1\niso-start=2000-04-06\n1421=30 29 30 29 30 29 30 29 30 29 30 33\n", "overlong month"),
        ] {
            assert!(
                HijrahChronology::try_from_properties(config).is_err(),
                "{what}"
            );
        }

        // Sighting data may record months a day or two past the arithmetic
        // bounds; those are tolerated.
        let stretched =
            "id=x\nversion=1\niso-start=2000-04-06\n1421=32 29 30 29 30 29 30 29 30 29 30 29\n";
        let hijrah = HijrahChronology::try_from_properties(stretched).expect("within tolerance");
        assert_eq!(hijrah.days_in_month(1421, 1), 32);
        assert!(hijrah.to_epoch_day(1421, 1, 32).is_ok());
    }
}
