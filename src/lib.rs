// This file is part of polychron. For terms of use, please see the file
// called LICENSE at the top level of the polychron source tree.

//! Field resolution and date conversion for pluggable calendar systems.
//!
//! A [`Chronology`] maps between epoch days (days since 1970-01-01 ISO) and
//! its own year/month/day reckoning, and describes the eras laid over its
//! years. [`CalendarDate`] carries a date in any chronology; converting
//! between chronologies goes through the epoch day, so a round trip always
//! returns the starting date.
//!
//! The other half of the crate is resolution: turning a loose bag of field
//! values like "year-of-era 5, month 1, day 1" into a concrete date, with
//! [lenient, smart, or strict](fields::ResolverMode) treatment of values
//! that do not line up.
//!
//! # Examples
//!
//! Resolving fields and converting between chronologies:
//!
//! ```rust
//! use polychron::fields::{DateField, FieldMap, ResolverMode};
//! use polychron::{CalendarDate, HijrahChronology, Iso, Ref};
//!
//! let mut fields = FieldMap::new();
//! fields.insert(DateField::Year, 1970);
//! fields.insert(DateField::MonthOfYear, 1);
//! fields.insert(DateField::DayOfMonth, 1);
//!
//! let date = CalendarDate::resolve(&mut fields, ResolverMode::Strict, Iso)
//!     .expect("fields agree")
//!     .expect("fields are sufficient");
//! assert_eq!(date.epoch_day(), 0);
//!
//! let hijrah = HijrahChronology::new_tabular();
//! let converted = date.to_chronology(Ref(&hijrah)).expect("within table range");
//! assert_eq!(converted.year(), 1389);
//! assert_eq!(converted.month(), 10);
//! assert_eq!(converted.day_of_month(), 22);
//! ```
//!
//! Picking a chronology at runtime through the registry:
//!
//! ```rust
//! use polychron::{CalendarDate, ChronologyRegistry};
//!
//! let registry = ChronologyRegistry::with_defaults();
//! let japanese = registry.get("japanese").expect("registered by default");
//! let date = CalendarDate::try_new_from_epoch_day(6946, japanese)
//!     .expect("in range"); // ISO 1989-01-07
//! assert_eq!(date.era().code().as_str(), "showa");
//! assert_eq!(date.year_of_era(), 64);
//! ```

#![cfg_attr(
    not(test),
    deny(
        clippy::indexing_slicing,
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::panic,
        clippy::exhaustive_structs,
        clippy::exhaustive_enums,
        missing_debug_implementations,
    )
)]
#![warn(missing_docs)]

// Make sure inherent docs go first
mod date;
mod datetime;

mod chronology;
mod error;
pub mod fields;
pub mod hijrah;
pub mod iso;
pub mod japanese;
pub mod minguo;
mod registry;
mod resolve;
pub mod thai_buddhist;
pub mod types;

#[cfg(test)]
mod tests;

pub use chronology::{AsChronology, Chronology, Ref};
pub use date::CalendarDate;
pub use datetime::{CalendarDateTime, TimeUnit, UtcOffset, ZonedCalendarDateTime};
pub use error::CalendarError;
pub use hijrah::HijrahChronology;
pub use iso::Iso;
pub use japanese::JapaneseChronology;
pub use minguo::MinguoChronology;
pub use registry::ChronologyRegistry;
pub use thai_buddhist::ThaiBuddhistChronology;
