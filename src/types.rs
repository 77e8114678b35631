// This file is part of polychron. For terms of use, please see the file
// called LICENSE at the top level of the polychron source tree.

//! This module contains various types used by `polychron`.

use crate::error::CalendarError;
use core::fmt;
use core::str::FromStr;
use tinystr::TinyStr16;

/// An era of a chronology, pairing a stable string code with the numeric
/// value exposed through the `era` field.
///
/// Eras are ordered by their numeric value, oldest first.
///
/// # Examples
///
/// ```
/// use polychron::types::Era;
/// use tinystr::tinystr;
///
/// let ce = Era::new(tinystr!(16, "ce"), 1);
/// assert_eq!(ce.code(), tinystr!(16, "ce"));
/// assert_eq!(ce.value(), 1);
/// ```
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Era {
    value: i8,
    code: TinyStr16,
}

impl Era {
    /// Construct an era from its code and numeric value.
    pub const fn new(code: TinyStr16, value: i8) -> Self {
        Self { value, code }
    }

    /// The stable string code of this era, such as `"ce"` or `"reiwa"`.
    pub const fn code(self) -> TinyStr16 {
        self.code
    }

    /// The numeric value of this era within its chronology.
    pub const fn value(self) -> i8 {
        self.value
    }
}

impl fmt::Display for Era {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.code.fmt(f)
    }
}

/// The ISO date on which an era starts, in the era's underlying solar
/// calendar. Comparable so era tables can be kept sorted and searched.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[allow(clippy::exhaustive_structs)] // this type is stable
pub struct EraStartDate {
    /// The ISO year the era started in
    pub year: i32,
    /// The ISO month the era started in
    pub month: u8,
    /// The ISO day the era started in
    pub day: u8,
}

impl FromStr for EraStartDate {
    type Err = CalendarError;
    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let (sign, rest) = match input.strip_prefix('-') {
            Some(rest) => (-1, rest),
            None => (1, input),
        };
        let mut parts = rest.split('-');
        let year: i32 = sign * parts.next().ok_or(CalendarError::Parse)?.parse::<i32>()?;
        let month = parts.next().ok_or(CalendarError::Parse)?.parse()?;
        let day = parts.next().ok_or(CalendarError::Parse)?.parse()?;
        if parts.next().is_some() {
            return Err(CalendarError::Parse);
        }
        Ok(EraStartDate { year, month, day })
    }
}

/// A weekday in a 7-day week, numbered the ISO-8601 way.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[allow(missing_docs)] // The weekday names are self-explanatory
#[allow(clippy::exhaustive_enums)] // This is stable
#[repr(i8)]
pub enum Weekday {
    Monday = 1,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl From<usize> for Weekday {
    /// Convert from an ISO-8601 weekday number to a [`Weekday`] enum. Accepts
    /// both 0 and 7 as Sunday.
    ///
    /// # Examples
    ///
    /// ```
    /// use polychron::types::Weekday;
    ///
    /// assert_eq!(Weekday::Sunday, Weekday::from(0));
    /// assert_eq!(Weekday::Monday, Weekday::from(1));
    /// assert_eq!(Weekday::Sunday, Weekday::from(7));
    /// assert_eq!(Weekday::Monday, Weekday::from(8));
    /// ```
    fn from(input: usize) -> Self {
        match input % 7 {
            0 => Self::Sunday,
            1 => Self::Monday,
            2 => Self::Tuesday,
            3 => Self::Wednesday,
            4 => Self::Thursday,
            5 => Self::Friday,
            _ => Self::Saturday,
        }
    }
}

impl Weekday {
    /// The number of days from `other` forward to `self`, in `0..7`.
    pub(crate) fn days_since(self, other: Weekday) -> i64 {
        (self as i64 - other as i64).rem_euclid(7)
    }
}

macro_rules! dt_unit {
    ($name:ident, $storage:ident, $value:expr, $(#[$docs:meta])+) => {
        $(#[$docs])+
        #[derive(Debug, Default, Clone, Copy, PartialEq, Hash, PartialOrd, Eq, Ord)]
        pub struct $name($storage);

        impl $name {
            /// Gets the numeric value for this component.
            pub const fn number(self) -> $storage {
                self.0
            }

            /// Returns the smallest value this component can take.
            pub const fn zero() -> $name {
                Self(0)
            }
        }

        impl FromStr for $name {
            type Err = CalendarError;

            fn from_str(input: &str) -> Result<Self, Self::Err> {
                let val: $storage = input.parse()?;
                if val > $value {
                    Err(CalendarError::Overflow(stringify!($name)))
                } else {
                    Ok(Self(val))
                }
            }
        }

        impl TryFrom<$storage> for $name {
            type Error = CalendarError;

            fn try_from(input: $storage) -> Result<Self, Self::Error> {
                if input > $value {
                    Err(CalendarError::Overflow(stringify!($name)))
                } else {
                    Ok(Self(input))
                }
            }
        }

        impl TryFrom<usize> for $name {
            type Error = CalendarError;

            fn try_from(input: usize) -> Result<Self, Self::Error> {
                if input > $value {
                    Err(CalendarError::Overflow(stringify!($name)))
                } else {
                    Ok(Self(input as $storage))
                }
            }
        }

        impl From<$name> for $storage {
            fn from(input: $name) -> Self {
                input.0
            }
        }

        impl From<$name> for usize {
            fn from(input: $name) -> Self {
                input.0 as usize
            }
        }
    };
}

dt_unit!(
    Hour,
    u8,
    23,
    /// An hour component of a time, in `0..=23`.
);

dt_unit!(
    Minute,
    u8,
    59,
    /// A minute component of a time, in `0..=59`.
);

dt_unit!(
    Second,
    u8,
    59,
    /// A second component of a time, in `0..=59`. Leap seconds are not
    /// representable.
);

dt_unit!(
    Nanosecond,
    u32,
    999_999_999,
    /// A subsecond component of a time, in nanoseconds.
);

pub(crate) const NANOS_PER_SECOND: i64 = 1_000_000_000;
pub(crate) const NANOS_PER_MINUTE: i64 = 60 * NANOS_PER_SECOND;
pub(crate) const NANOS_PER_HOUR: i64 = 60 * NANOS_PER_MINUTE;
pub(crate) const NANOS_PER_DAY: i64 = 24 * NANOS_PER_HOUR;

/// A time of day on a 24-hour clock, with nanosecond precision.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[allow(clippy::exhaustive_structs)] // this type is stable
pub struct Time {
    /// Hour
    pub hour: Hour,
    /// Minute
    pub minute: Minute,
    /// Second
    pub second: Second,
    /// Subsecond
    pub nanosecond: Nanosecond,
}

impl Time {
    /// Construct a new [`Time`] from already-validated components.
    pub const fn new(hour: Hour, minute: Minute, second: Second, nanosecond: Nanosecond) -> Self {
        Self {
            hour,
            minute,
            second,
            nanosecond,
        }
    }

    /// Construct a new [`Time`], whilst validating that all components are in
    /// range.
    ///
    /// # Examples
    ///
    /// ```
    /// use polychron::types::Time;
    ///
    /// assert!(Time::try_new(23, 59, 59, 999_999_999).is_ok());
    /// assert!(Time::try_new(24, 0, 0, 0).is_err());
    /// ```
    pub fn try_new(hour: u8, minute: u8, second: u8, nanosecond: u32) -> Result<Self, CalendarError> {
        Ok(Self {
            hour: hour.try_into()?,
            minute: minute.try_into()?,
            second: second.try_into()?,
            nanosecond: nanosecond.try_into()?,
        })
    }

    /// Midnight, the first instant of a day.
    pub fn midnight() -> Self {
        Self::default()
    }

    /// The number of nanoseconds since midnight, in `0..86_400_000_000_000`.
    pub fn nano_of_day(self) -> i64 {
        i64::from(self.hour.number()) * NANOS_PER_HOUR
            + i64::from(self.minute.number()) * NANOS_PER_MINUTE
            + i64::from(self.second.number()) * NANOS_PER_SECOND
            + i64::from(self.nanosecond.number())
    }

    /// The number of seconds since midnight, discarding subsecond precision.
    pub fn second_of_day(self) -> i64 {
        self.nano_of_day() / NANOS_PER_SECOND
    }

    /// Reconstructs a [`Time`] from a nano-of-day value.
    ///
    /// The input must already be in `0..NANOS_PER_DAY`; callers obtain it by
    /// folding arithmetic carries into whole days first.
    pub(crate) fn from_nano_of_day(nanos: i64) -> Self {
        debug_assert!((0..NANOS_PER_DAY).contains(&nanos));
        let nanos = nanos.rem_euclid(NANOS_PER_DAY);
        Self {
            hour: Hour((nanos / NANOS_PER_HOUR) as u8),
            minute: Minute((nanos / NANOS_PER_MINUTE % 60) as u8),
            second: Second((nanos / NANOS_PER_SECOND % 60) as u8),
            nanosecond: Nanosecond((nanos % NANOS_PER_SECOND) as u32),
        }
    }
}
