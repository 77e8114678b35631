// This file is part of polychron. For terms of use, please see the file
// called LICENSE at the top level of the polychron source tree.

//! Resolution of a bag of date fields into a single date.
//!
//! Resolution runs in passes over a [`FieldMap`]: derived splits first
//! (proleptic month, then era and year-of-era), then the field groups that
//! can pin down a day, most specific first. Each pass removes the fields it
//! consumes and merges derived values back with conflict checking, so two
//! routes to the same field must agree on its value.

use crate::chronology::{latest_era, lookup_era_by_value, Chronology};
use crate::date::{cast_year, ResolvedDate};
use crate::error::CalendarError;
use crate::fields::{DateField, FieldMap, ResolverMode};
use crate::types::Weekday;

pub(crate) fn resolve_date<C: Chronology + ?Sized>(
    chronology: &C,
    fields: &mut FieldMap,
    mode: ResolverMode,
) -> Result<Option<ResolvedDate>, CalendarError> {
    // An epoch day determines the date outright; it is range checked in
    // every mode since there is nothing to be lenient about.
    if let Some(epoch_day) = fields.remove(DateField::EpochDay) {
        chronology
            .epoch_day_range()
            .check(DateField::EpochDay, epoch_day)?;
        return ResolvedDate::from_epoch_day(chronology, epoch_day).map(Some);
    }
    split_proleptic_month(chronology, fields, mode)?;
    combine_era_and_year(chronology, fields, mode)?;
    if let Some(date) = resolve_ymd(chronology, fields, mode)? {
        return Ok(Some(date));
    }
    if let Some(date) = resolve_year_day(chronology, fields, mode)? {
        return Ok(Some(date));
    }
    if let Some(date) = resolve_aligned_week_of_month(chronology, fields, mode)? {
        return Ok(Some(date));
    }
    if let Some(date) = resolve_aligned_week_of_year(chronology, fields, mode)? {
        return Ok(Some(date));
    }
    Ok(None)
}

/// Splits a proleptic-month count into year and month-of-year fields.
fn split_proleptic_month<C: Chronology + ?Sized>(
    chronology: &C,
    fields: &mut FieldMap,
    mode: ResolverMode,
) -> Result<(), CalendarError> {
    let Some(proleptic_month) = fields.remove(DateField::ProlepticMonth) else {
        return Ok(());
    };
    if mode != ResolverMode::Lenient {
        chronology
            .field_range(DateField::ProlepticMonth)
            .check(DateField::ProlepticMonth, proleptic_month)?;
    }
    let (year, month) = chronology.split_proleptic_month(proleptic_month);
    fields.insert_checked(DateField::MonthOfYear, month)?;
    fields.insert_checked(DateField::Year, year)?;
    Ok(())
}

/// Combines year-of-era with an era into a proleptic year.
///
/// When the era is absent, smart and lenient modes assume the latest era of
/// the chronology unless a proleptic year is already present to derive it
/// from; strict mode leaves the year-of-era unconsumed instead.
fn combine_era_and_year<C: Chronology + ?Sized>(
    chronology: &C,
    fields: &mut FieldMap,
    mode: ResolverMode,
) -> Result<(), CalendarError> {
    let Some(year_of_era) = fields.remove(DateField::YearOfEra) else {
        return Ok(());
    };
    if mode != ResolverMode::Lenient {
        chronology
            .field_range(DateField::YearOfEra)
            .check(DateField::YearOfEra, year_of_era)?;
    }
    if let Some(era_value) = fields.remove(DateField::Era) {
        // Era values are never lenient; an unknown value is an error.
        let era = lookup_era_by_value(chronology, era_value)?;
        let year = chronology.to_proleptic_year(era, cast_year(year_of_era)?)?;
        fields.insert_checked(DateField::Year, i64::from(year))?;
    } else if let Some(year) = fields.get(DateField::Year) {
        let era = chronology.era_of(cast_year(year)?);
        let derived = chronology.to_proleptic_year(era, cast_year(year_of_era)?)?;
        fields.insert_checked(DateField::Year, i64::from(derived))?;
    } else if mode == ResolverMode::Strict {
        // Strict mode does not invent an era; the field stays unconsumed.
        fields.insert(DateField::YearOfEra, year_of_era);
    } else {
        let era = latest_era(chronology);
        let year = chronology.to_proleptic_year(era, cast_year(year_of_era)?)?;
        fields.insert_checked(DateField::Year, i64::from(year))?;
    }
    Ok(())
}

fn checked_sub_one(value: i64, field: DateField) -> Result<i64, CalendarError> {
    value
        .checked_sub(1)
        .ok_or(CalendarError::Overflow(field.name()))
}

/// Year + month + day of month.
fn resolve_ymd<C: Chronology + ?Sized>(
    chronology: &C,
    fields: &mut FieldMap,
    mode: ResolverMode,
) -> Result<Option<ResolvedDate>, CalendarError> {
    if !fields.contains(DateField::Year)
        || !fields.contains(DateField::MonthOfYear)
        || !fields.contains(DateField::DayOfMonth)
    {
        return Ok(None);
    }
    let (Some(year), Some(month), Some(day)) = (
        fields.remove(DateField::Year),
        fields.remove(DateField::MonthOfYear),
        fields.remove(DateField::DayOfMonth),
    ) else {
        return Ok(None);
    };
    let year = cast_year(year)?;
    match mode {
        ResolverMode::Lenient => {
            let months = checked_sub_one(month, DateField::MonthOfYear)?;
            let days = checked_sub_one(day, DateField::DayOfMonth)?;
            ResolvedDate::from_ymd(chronology, year, 1, 1)?
                .plus_months(chronology, months)?
                .plus_days(chronology, days)
                .map(Some)
        }
        ResolverMode::Smart => {
            chronology
                .field_range(DateField::MonthOfYear)
                .check(DateField::MonthOfYear, month)?;
            chronology
                .field_range(DateField::DayOfMonth)
                .check(DateField::DayOfMonth, day)?;
            let month = month as u8;
            let day = (day as u8).min(chronology.days_in_month(year, month));
            ResolvedDate::from_ymd(chronology, year, month, day).map(Some)
        }
        ResolverMode::Strict => {
            chronology
                .field_range(DateField::MonthOfYear)
                .check(DateField::MonthOfYear, month)?;
            chronology
                .field_range(DateField::DayOfMonth)
                .check(DateField::DayOfMonth, day)?;
            ResolvedDate::from_ymd(chronology, year, month as u8, day as u8).map(Some)
        }
    }
}

/// Year + day of year.
fn resolve_year_day<C: Chronology + ?Sized>(
    chronology: &C,
    fields: &mut FieldMap,
    mode: ResolverMode,
) -> Result<Option<ResolvedDate>, CalendarError> {
    if !fields.contains(DateField::Year) || !fields.contains(DateField::DayOfYear) {
        return Ok(None);
    }
    let (Some(year), Some(day_of_year)) = (
        fields.remove(DateField::Year),
        fields.remove(DateField::DayOfYear),
    ) else {
        return Ok(None);
    };
    let year = cast_year(year)?;
    if mode == ResolverMode::Lenient {
        let days = checked_sub_one(day_of_year, DateField::DayOfYear)?;
        return ResolvedDate::from_ymd(chronology, year, 1, 1)?
            .plus_days(chronology, days)
            .map(Some);
    }
    chronology
        .field_range(DateField::DayOfYear)
        .check(DateField::DayOfYear, day_of_year)?;
    date_of_year_day(chronology, year, day_of_year).map(Some)
}

/// Walks the months of `year` to find the date at ordinal `day_of_year`.
fn date_of_year_day<C: Chronology + ?Sized>(
    chronology: &C,
    year: i32,
    day_of_year: i64,
) -> Result<ResolvedDate, CalendarError> {
    let total = i64::from(chronology.days_in_year(year));
    if day_of_year < 1 || day_of_year > total {
        return Err(CalendarError::OutOfRange {
            field: DateField::DayOfYear.name(),
            value: day_of_year,
            min: 1,
            max: total,
        });
    }
    let mut remaining = day_of_year;
    for month in 1..=chronology.months_in_year(year) {
        let length = i64::from(chronology.days_in_month(year, month));
        if remaining <= length {
            return ResolvedDate::from_ymd(chronology, year, month, remaining as u8);
        }
        remaining -= length;
    }
    Err(CalendarError::Overflow(DateField::DayOfYear.name()))
}

/// Normalizes a day-of-week that may lie outside `1..=7` into a week delta
/// and an in-range weekday.
fn normalize_day_of_week(day_of_week: i64) -> Result<(i64, Weekday), CalendarError> {
    let shifted = checked_sub_one(day_of_week, DateField::DayOfWeek)?;
    let weekday = Weekday::from((shifted.rem_euclid(7) + 1) as usize);
    Ok((shifted.div_euclid(7), weekday))
}

enum AlignedKind {
    /// Offset within the aligned week, `1..=7` from its first day.
    AlignedDay(DateField),
    /// Roll forward from the start of the aligned week to a weekday.
    DayOfWeek,
}

/// Year + month + aligned week of month + (aligned day | day of week).
fn resolve_aligned_week_of_month<C: Chronology + ?Sized>(
    chronology: &C,
    fields: &mut FieldMap,
    mode: ResolverMode,
) -> Result<Option<ResolvedDate>, CalendarError> {
    if !fields.contains(DateField::Year)
        || !fields.contains(DateField::MonthOfYear)
        || !fields.contains(DateField::AlignedWeekOfMonth)
    {
        return Ok(None);
    }
    let kind = if fields.contains(DateField::AlignedDayOfWeekInMonth) {
        AlignedKind::AlignedDay(DateField::AlignedDayOfWeekInMonth)
    } else if fields.contains(DateField::DayOfWeek) {
        AlignedKind::DayOfWeek
    } else {
        return Ok(None);
    };
    let (Some(year), Some(month), Some(week)) = (
        fields.remove(DateField::Year),
        fields.remove(DateField::MonthOfYear),
        fields.remove(DateField::AlignedWeekOfMonth),
    ) else {
        return Ok(None);
    };
    let year = cast_year(year)?;

    let base = if mode == ResolverMode::Lenient {
        let months = checked_sub_one(month, DateField::MonthOfYear)?;
        ResolvedDate::from_ymd(chronology, year, 1, 1)?.plus_months(chronology, months)?
    } else {
        chronology
            .field_range(DateField::MonthOfYear)
            .check(DateField::MonthOfYear, month)?;
        chronology
            .field_range(DateField::AlignedWeekOfMonth)
            .check(DateField::AlignedWeekOfMonth, week)?;
        ResolvedDate::from_ymd(chronology, year, month as u8, 1)?
    };
    let date = resolve_within_aligned_week(chronology, fields, mode, kind, base, week)?;
    if mode == ResolverMode::Strict && i64::from(date.month) != month {
        return Err(CalendarError::StrictDrift {
            field: DateField::MonthOfYear.name(),
            expected: month,
            actual: i64::from(date.month),
        });
    }
    Ok(Some(date))
}

/// Year + aligned week of year + (aligned day | day of week).
fn resolve_aligned_week_of_year<C: Chronology + ?Sized>(
    chronology: &C,
    fields: &mut FieldMap,
    mode: ResolverMode,
) -> Result<Option<ResolvedDate>, CalendarError> {
    if !fields.contains(DateField::Year) || !fields.contains(DateField::AlignedWeekOfYear) {
        return Ok(None);
    }
    let kind = if fields.contains(DateField::AlignedDayOfWeekInYear) {
        AlignedKind::AlignedDay(DateField::AlignedDayOfWeekInYear)
    } else if fields.contains(DateField::DayOfWeek) {
        AlignedKind::DayOfWeek
    } else {
        return Ok(None);
    };
    let (Some(year), Some(week)) = (
        fields.remove(DateField::Year),
        fields.remove(DateField::AlignedWeekOfYear),
    ) else {
        return Ok(None);
    };
    let year = cast_year(year)?;

    if mode != ResolverMode::Lenient {
        chronology
            .field_range(DateField::AlignedWeekOfYear)
            .check(DateField::AlignedWeekOfYear, week)?;
    }
    let base = ResolvedDate::from_ymd(chronology, year, 1, 1)?;
    let date = resolve_within_aligned_week(chronology, fields, mode, kind, base, week)?;
    if mode == ResolverMode::Strict && i64::from(date.year) != i64::from(year) {
        return Err(CalendarError::StrictDrift {
            field: DateField::Year.name(),
            expected: i64::from(year),
            actual: i64::from(date.year),
        });
    }
    Ok(Some(date))
}

/// Steps from the first day of a unit to the requested aligned week, then to
/// the requested day within it.
fn resolve_within_aligned_week<C: Chronology + ?Sized>(
    chronology: &C,
    fields: &mut FieldMap,
    mode: ResolverMode,
    kind: AlignedKind,
    base: ResolvedDate,
    week: i64,
) -> Result<ResolvedDate, CalendarError> {
    let weeks = checked_sub_one(week, DateField::AlignedWeekOfMonth)?;
    let date = base.plus_weeks(chronology, weeks)?;
    match kind {
        AlignedKind::AlignedDay(field) => {
            let Some(day) = fields.remove(field) else {
                return Err(CalendarError::Overflow(field.name()));
            };
            if mode != ResolverMode::Lenient {
                chronology.field_range(field).check(field, day)?;
            }
            date.plus_days(chronology, checked_sub_one(day, field)?)
        }
        AlignedKind::DayOfWeek => {
            let Some(day_of_week) = fields.remove(DateField::DayOfWeek) else {
                return Err(CalendarError::Overflow(DateField::DayOfWeek.name()));
            };
            if mode == ResolverMode::Lenient {
                let (extra_weeks, weekday) = normalize_day_of_week(day_of_week)?;
                date.plus_weeks(chronology, extra_weeks)?
                    .next_or_same(chronology, weekday)
            } else {
                chronology
                    .field_range(DateField::DayOfWeek)
                    .check(DateField::DayOfWeek, day_of_week)?;
                date.next_or_same(chronology, Weekday::from(day_of_week as usize))
            }
        }
    }
}
