// This file is part of polychron. For terms of use, please see the file
// called LICENSE at the top level of the polychron source tree.

use crate::fields::{DateField, FieldMap, ResolverMode};
use crate::types::Time;
use crate::*;
use std::sync::Arc;

/// Epoch days covered by every built-in chronology, including the Hijrah
/// table and the Japanese era range.
const SHARED_EPOCH_DAYS: [i64; 6] = [-20_000, -287, 0, 6_946, 18_055, 40_000];

#[test]
fn test_round_trip_through_every_chronology() {
    let registry = ChronologyRegistry::with_defaults();
    for id in ["iso", "minguo", "thai-buddhist", "japanese", "islamic-civil"] {
        let chronology = registry.get(id).expect("registered");
        for epoch_day in SHARED_EPOCH_DAYS {
            let date = CalendarDate::try_new_from_epoch_day(epoch_day, chronology.clone())
                .expect("in range");
            assert_eq!(date.epoch_day(), epoch_day, "{id}");
            // Rebuilding from the chronology-local labels is the identity.
            let rebuilt = CalendarDate::try_new(
                date.year(),
                date.month(),
                date.day_of_month(),
                chronology.clone(),
            )
            .expect("labels are valid");
            assert_eq!(rebuilt.epoch_day(), epoch_day, "{id}");
            // And so is a conversion to ISO and back.
            let there_and_back = date
                .to_iso()
                .expect("in range")
                .to_chronology(chronology.clone())
                .expect("in range");
            assert_eq!(there_and_back.epoch_day(), epoch_day, "{id}");
        }
    }
}

#[test]
fn test_conversion_preserves_the_day() {
    // One real day, five labelings.
    let registry = ChronologyRegistry::with_defaults();
    let iso = CalendarDate::try_new(2019, 5, 1, Iso).expect("date exists");
    let expectations = [
        ("minguo", (108, 5, 1)),
        ("thai-buddhist", (2562, 5, 1)),
        ("japanese", (2019, 5, 1)),
        ("islamic-civil", (1440, 8, 25)),
    ];
    for (id, (year, month, day)) in expectations {
        let chronology = registry.get(id).expect("registered");
        let converted = iso.to_chronology(chronology).expect("in range");
        assert_eq!(
            (converted.year(), converted.month(), converted.day_of_month()),
            (year, month, day),
            "{id}"
        );
        assert_eq!(converted.day_of_week(), iso.day_of_week(), "{id}");
    }
    // First day of Reiwa.
    let japanese = registry.get("japanese").expect("registered");
    let converted = iso.to_chronology(japanese).expect("in range");
    assert_eq!(converted.era().code().as_str(), "reiwa");
    assert_eq!(converted.year_of_era(), 1);
}

#[test]
fn test_resolution_is_deterministic() {
    let registry = ChronologyRegistry::with_defaults();
    let entries = [
        (DateField::Era, 1),
        (DateField::YearOfEra, 1440),
        (DateField::MonthOfYear, 8),
        (DateField::DayOfMonth, 26),
    ];
    let chronology = registry.get("islamic-civil").expect("registered");
    let mut first_run = None;
    for _ in 0..3 {
        let mut fields: FieldMap = entries.iter().copied().collect();
        let date = CalendarDate::resolve(&mut fields, ResolverMode::Strict, chronology.clone())
            .expect("resolves")
            .expect("enough fields");
        assert!(fields.is_empty(), "all fields consumed");
        let epoch_day = first_run.get_or_insert(date.epoch_day());
        assert_eq!(*epoch_day, date.epoch_day());
    }
}

#[test]
fn test_resolved_dates_agree_across_chronologies() {
    // The same real-world day expressed in each chronology's own fields
    // resolves to the same epoch day everywhere.
    let registry = ChronologyRegistry::with_defaults();
    let cases: [(&str, &[(DateField, i64)]); 4] = [
        (
            "iso",
            &[
                (DateField::Year, 2019),
                (DateField::MonthOfYear, 5),
                (DateField::DayOfMonth, 1),
            ],
        ),
        (
            "minguo",
            &[
                (DateField::YearOfEra, 108),
                (DateField::MonthOfYear, 5),
                (DateField::DayOfMonth, 1),
            ],
        ),
        (
            "thai-buddhist",
            &[(DateField::Year, 2562), (DateField::DayOfYear, 121)],
        ),
        (
            "islamic-civil",
            &[
                (DateField::Year, 1440),
                (DateField::MonthOfYear, 8),
                (DateField::DayOfMonth, 25),
            ],
        ),
    ];
    let expected = CalendarDate::try_new(2019, 5, 1, Iso)
        .expect("date exists")
        .epoch_day();
    for (id, entries) in cases {
        let chronology = registry.get(id).expect("registered");
        let mut fields: FieldMap = entries.iter().copied().collect();
        let date = CalendarDate::resolve(&mut fields, ResolverMode::Smart, chronology)
            .expect("resolves")
            .expect("enough fields");
        assert_eq!(date.epoch_day(), expected, "{id}");
    }
}

#[test]
fn test_datetime_arithmetic_in_a_dyn_chronology() {
    let registry = ChronologyRegistry::with_defaults();
    let hijrah = registry.get("islamic-civil").expect("registered");
    let date = CalendarDate::try_new(1440, 8, 26, hijrah).expect("date exists");
    let datetime = CalendarDateTime::new(
        date,
        Time::try_new(23, 0, 0, 0).expect("in range"),
    );
    let later = datetime.checked_add(2, TimeUnit::Hours).expect("in range");
    // The carry crosses into 27 Sha'ban.
    assert_eq!(later.date().day_of_month(), 27);
    assert_eq!(u8::from(later.time().hour), 1);
}

#[test]
fn test_custom_chronology_in_registry() {
    let config = "\
id=islamic-test
type=islamic-umalqura
version=1.0
iso-start=2000-04-06
1421=30 29 30 29 30 29 30 29 30 29 30 29
1422=30 30 29 30 29 30 29 30 29 30 29 29
";
    let mut registry = ChronologyRegistry::with_defaults();
    let custom = HijrahChronology::try_from_properties(config).expect("well-formed");
    registry.register(Arc::new(custom));
    assert_eq!(registry.len(), 6);

    let chronology = registry.get("islamic-test").expect("just registered");
    let date = CalendarDate::try_new(1421, 1, 1, chronology).expect("date exists");
    assert_eq!(
        date.to_iso().expect("in range").epoch_day(),
        CalendarDate::try_new(2000, 4, 6, Iso)
            .expect("date exists")
            .epoch_day()
    );
    // Dates outside the two configured years are rejected.
    assert!(matches!(
        CalendarDate::try_new(1423, 1, 1, registry.get("islamic-test").expect("registered")),
        Err(CalendarError::OutOfRange { .. })
    ));
}
