// This file is part of polychron. For terms of use, please see the file
// called LICENSE at the top level of the polychron source tree.

use displaydoc::Display;
use tinystr::{tinystr, TinyStr16};
use writeable::Writeable;

impl std::error::Error for CalendarError {}

/// A list of error outcomes for various operations in this crate.
///
/// Range and conflict errors carry the offending field together with the
/// values involved, so callers can report exactly which input was rejected.
#[derive(Display, Debug, Copy, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum CalendarError {
    /// An input could not be parsed.
    #[displaydoc("Could not parse as integer")]
    Parse,
    /// A field value lies outside the range the chronology defines for it.
    #[displaydoc("{field} must be between {min} and {max}, got {value}")]
    OutOfRange {
        /// The name of the field
        field: &'static str,
        /// The rejected value
        value: i64,
        /// The minimum valid value
        min: i64,
        /// The maximum valid value
        max: i64,
    },
    /// Two different values were derived for the same field during resolution.
    #[displaydoc("Conflict found: {field} {existing} differs from {attempted}")]
    FieldConflict {
        /// The name of the field
        field: &'static str,
        /// The value already present in the field map
        existing: i64,
        /// The conflicting value derived later
        attempted: i64,
    },
    /// Strict resolution produced a date outside the originally specified unit.
    #[displaydoc("Strict mode rejected resolved date: {field} {expected} became {actual}")]
    StrictDrift {
        /// The name of the field that drifted
        field: &'static str,
        /// The value the caller specified
        expected: i64,
        /// The value on the resolved date
        actual: i64,
    },
    /// Unknown era for a given chronology
    #[displaydoc("No era named {0} for chronology {1}")]
    UnknownEra(TinyStr16, &'static str),
    /// No chronology registered under a given id
    #[displaydoc("No chronology registered under id {0}")]
    UnknownChronology(TinyStr16),
    /// Malformed chronology configuration data
    #[displaydoc("Invalid chronology data for key {key}: {reason}")]
    InvalidData {
        /// The configuration key that failed validation
        key: TinyStr16,
        /// Why the entry was rejected
        reason: &'static str,
    },
    /// Arithmetic overflowed during a date or time computation.
    #[displaydoc("Arithmetic overflow computing {0}")]
    Overflow(&'static str),
}

impl From<core::num::ParseIntError> for CalendarError {
    fn from(_: core::num::ParseIntError) -> Self {
        CalendarError::Parse
    }
}

impl CalendarError {
    /// Create an error for a chronology id that is not registered.
    ///
    /// # Examples
    ///
    /// ```
    /// use polychron::CalendarError;
    ///
    /// let err = CalendarError::unknown_chronology("maya");
    /// assert!(matches!(err, CalendarError::UnknownChronology(_)));
    /// ```
    pub fn unknown_chronology(id: impl Writeable) -> Self {
        Self::UnknownChronology(truncate_to_tiny(&id.write_to_string()))
    }

    /// Create an [`CalendarError::InvalidData`] for a configuration key.
    pub(crate) fn invalid_data(key: &str, reason: &'static str) -> Self {
        Self::InvalidData {
            key: truncate_to_tiny(key),
            reason,
        }
    }
}

/// Truncates a string to at most 16 ASCII bytes for embedding in an error.
fn truncate_to_tiny(s: &str) -> TinyStr16 {
    s.get(0..s.len().min(16))
        .and_then(|x| x.parse::<TinyStr16>().ok())
        .unwrap_or(tinystr!(16, "invalid"))
}
