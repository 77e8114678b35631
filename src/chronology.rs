// This file is part of polychron. For terms of use, please see the file
// called LICENSE at the top level of the polychron source tree.

//! The [`Chronology`] trait and the wrapper traits that let dates be generic
//! over how their chronology is owned.

use crate::error::CalendarError;
use crate::fields::{DateField, ValueRange};
use crate::types::Era;
use core::fmt;
use std::rc::Rc;
use std::sync::Arc;

/// A calendar system: a bidirectional mapping between epoch days and
/// proleptic-year/month/day triples, plus the era structure laid over the
/// proleptic years.
///
/// The trait is object-safe so that chronologies of different kinds can live
/// together behind `Arc<dyn Chronology>`, for example in a
/// [`ChronologyRegistry`](crate::ChronologyRegistry). All methods take scalar
/// arguments and return scalar results or [`CalendarError`].
///
/// Epoch days count days since 1970-01-01 in the ISO calendar, with that day
/// being day zero. Proleptic years are chronology-local: proleptic year 1 is
/// the first year of the chronology's most recent "forward" era extended
/// backward without bound (except where a chronology restricts its supported
/// range).
pub trait Chronology: fmt::Debug + Send + Sync {
    /// A unique identifier for this chronology, such as `"iso"` or
    /// `"islamic-civil"`.
    fn id(&self) -> &str;

    /// The BCP-47 calendar type, where one exists.
    fn calendar_type(&self) -> Option<&str> {
        None
    }

    /// The name used for this chronology in error messages.
    fn debug_name(&self) -> &'static str;

    /// The eras of this chronology, ordered by numeric value, oldest first.
    /// Never empty.
    fn eras(&self) -> &[Era];

    /// The era containing a proleptic year.
    ///
    /// Years before the chronology's first era map to the first era; such
    /// years fail later, when a date is actually constructed.
    fn era_of(&self, proleptic_year: i32) -> Era;

    /// The proleptic year named by an era and a year-of-era.
    fn to_proleptic_year(&self, era: Era, year_of_era: i32) -> Result<i32, CalendarError>;

    /// The era and year-of-era of a date, given both its epoch day and its
    /// proleptic year.
    ///
    /// The epoch day matters for chronologies whose eras change mid-year;
    /// others derive the answer from the proleptic year alone.
    fn era_year_for(&self, _epoch_day: i64, proleptic_year: i32) -> (Era, i32) {
        let era = self.era_of(proleptic_year);
        let year_of_era = if era.value() >= 1 {
            proleptic_year
        } else {
            1 - proleptic_year
        };
        (era, year_of_era)
    }

    /// Convert a validated proleptic-year/month/day triple to an epoch day.
    ///
    /// Fails with [`CalendarError::OutOfRange`] if the triple does not name a
    /// date this chronology supports.
    fn to_epoch_day(&self, year: i32, month: u8, day: u8) -> Result<i64, CalendarError>;

    /// Convert an epoch day back to a proleptic-year/month/day triple.
    fn from_epoch_day(&self, epoch_day: i64) -> Result<(i32, u8, u8), CalendarError>;

    /// The number of months in a proleptic year.
    fn months_in_year(&self, year: i32) -> u8;

    /// The number of days in a month of a proleptic year.
    ///
    /// For years outside the chronology's supported range this returns a
    /// plausible length; exact validation happens in [`Self::to_epoch_day`].
    fn days_in_month(&self, year: i32, month: u8) -> u8;

    /// The number of days in a proleptic year.
    fn days_in_year(&self, year: i32) -> u16;

    /// Whether a proleptic year is a leap year.
    fn is_leap_year(&self, year: i32) -> bool;

    /// The outer range of valid values for a field, before any refinement by
    /// other fields.
    fn field_range(&self, field: DateField) -> ValueRange;

    /// The range of epoch days this chronology can represent.
    fn epoch_day_range(&self) -> ValueRange;

    /// Split a proleptic-month count into a proleptic year and a 1-based
    /// month, by floored division.
    fn split_proleptic_month(&self, proleptic_month: i64) -> (i64, i64) {
        (
            proleptic_month.div_euclid(12),
            proleptic_month.rem_euclid(12) + 1,
        )
    }

    /// The ordinal of a day within its year, starting at 1.
    fn day_of_year(&self, year: i32, month: u8, day: u8) -> u16 {
        let mut ordinal = u16::from(day);
        let mut m = 1u8;
        while m < month {
            ordinal = ordinal.saturating_add(u16::from(self.days_in_month(year, m)));
            m = m.saturating_add(1);
        }
        ordinal
    }
}

impl dyn Chronology + '_ {
    /// Find an era of this chronology by its numeric value.
    pub fn era_by_value(&self, value: i64) -> Result<Era, CalendarError> {
        lookup_era_by_value(self, value)
    }

    /// Find an era of this chronology by its string code.
    pub fn era_by_code(&self, code: &str) -> Result<Era, CalendarError> {
        lookup_era_by_code(self, code)
    }
}

pub(crate) fn lookup_era_by_value<C: Chronology + ?Sized>(
    chronology: &C,
    value: i64,
) -> Result<Era, CalendarError> {
    let eras = chronology.eras();
    eras.iter()
        .find(|era| i64::from(era.value()) == value)
        .copied()
        .ok_or_else(|| CalendarError::OutOfRange {
            field: DateField::Era.name(),
            value,
            min: eras.first().map_or(0, |e| i64::from(e.value())),
            max: eras.last().map_or(0, |e| i64::from(e.value())),
        })
}

pub(crate) fn lookup_era_by_code<C: Chronology + ?Sized>(
    chronology: &C,
    code: &str,
) -> Result<Era, CalendarError> {
    chronology
        .eras()
        .iter()
        .find(|era| era.code().as_str() == code)
        .copied()
        .ok_or_else(|| {
            CalendarError::UnknownEra(
                code.parse().unwrap_or(tinystr::tinystr!(16, "invalid")),
                chronology.debug_name(),
            )
        })
}

/// The latest era of a chronology, used when lenient and smart resolution
/// invent a missing era.
pub(crate) fn latest_era<C: Chronology + ?Sized>(chronology: &C) -> Era {
    let eras = chronology.eras();
    debug_assert!(!eras.is_empty());
    eras.last()
        .copied()
        .unwrap_or_else(|| Era::new(tinystr::tinystr!(16, "invalid"), 1))
}

/// A type that can be converted into a reference to a [`Chronology`].
///
/// This is implemented by chronologies themselves, by `Rc` and `Arc` around
/// them (including `Arc<dyn Chronology>`), and by [`Ref`]. It lets
/// [`CalendarDate`](crate::CalendarDate) be generic over how its chronology
/// is owned without cloning large chronologies into every date.
pub trait AsChronology {
    /// The chronology being wrapped.
    type Chronology: Chronology + ?Sized;

    /// Borrow the wrapped chronology.
    fn as_chronology(&self) -> &Self::Chronology;
}

impl<C: Chronology> AsChronology for C {
    type Chronology = C;
    fn as_chronology(&self) -> &C {
        self
    }
}

impl<C: Chronology + ?Sized> AsChronology for Rc<C> {
    type Chronology = C;
    fn as_chronology(&self) -> &C {
        self
    }
}

impl<C: Chronology + ?Sized> AsChronology for Arc<C> {
    type Chronology = C;
    fn as_chronology(&self) -> &C {
        self
    }
}

/// A transparent wrapper for a borrowed chronology.
///
/// Unlike `&C` itself, `Ref<C>` implements [`AsChronology`], so a date can
/// borrow a chronology owned elsewhere:
///
/// ```
/// use polychron::{CalendarDate, Iso, Ref};
///
/// let iso = Iso;
/// let date = CalendarDate::try_new(2024, 2, 29, Ref(&iso)).expect("leap day exists");
/// assert_eq!(date.day_of_month(), 29);
/// ```
#[derive(PartialEq, Eq, Debug)]
#[allow(clippy::exhaustive_structs)] // newtype
pub struct Ref<'a, C: ?Sized>(pub &'a C);

impl<C: ?Sized> Copy for Ref<'_, C> {}

impl<C: ?Sized> Clone for Ref<'_, C> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<C: Chronology + ?Sized> AsChronology for Ref<'_, C> {
    type Chronology = C;
    fn as_chronology(&self) -> &C {
        self.0
    }
}
