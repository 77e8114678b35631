// This file is part of polychron. For terms of use, please see the file
// called LICENSE at the top level of the polychron source tree.

//! A registry of chronologies keyed by id, for callers that pick a calendar
//! system at runtime.

use crate::chronology::Chronology;
use crate::error::CalendarError;
use crate::hijrah::HijrahChronology;
use crate::iso::Iso;
use crate::japanese::JapaneseChronology;
use crate::minguo::MinguoChronology;
use crate::thai_buddhist::ThaiBuddhistChronology;
use std::collections::HashMap;
use std::sync::Arc;

/// A set of chronologies, shared behind `Arc` and looked up by id or by
/// BCP-47 calendar type.
///
/// The registry itself is plain data: wrap it in `Arc` (it is cheap to
/// clone the `Arc`ed chronologies out of it) and build it once at startup.
///
/// # Examples
///
/// ```
/// use polychron::{CalendarDate, ChronologyRegistry};
///
/// let registry = ChronologyRegistry::with_defaults();
/// let hijrah = registry.get("islamic-civil").expect("registered by default");
/// let date = CalendarDate::try_new_from_epoch_day(0, hijrah).expect("in range");
/// assert_eq!(date.year(), 1389);
/// ```
#[derive(Clone, Debug, Default)]
pub struct ChronologyRegistry {
    by_id: HashMap<String, Arc<dyn Chronology>>,
}

impl ChronologyRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry holding the five built-in chronologies: ISO, Minguo,
    /// Thai Buddhist, Japanese, and the tabular Hijrah variant.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(Iso));
        registry.register(Arc::new(MinguoChronology));
        registry.register(Arc::new(ThaiBuddhistChronology));
        registry.register(Arc::new(JapaneseChronology::new()));
        registry.register(Arc::new(HijrahChronology::new_tabular()));
        registry
    }

    /// Register a chronology under its [`Chronology::id`], returning the
    /// previous chronology with that id, if any.
    pub fn register(&mut self, chronology: Arc<dyn Chronology>) -> Option<Arc<dyn Chronology>> {
        self.by_id.insert(String::from(chronology.id()), chronology)
    }

    /// The chronology registered under `id`, if any.
    pub fn lookup(&self, id: &str) -> Option<Arc<dyn Chronology>> {
        self.by_id.get(id).cloned()
    }

    /// The chronology registered under `id`, or an
    /// [`CalendarError::UnknownChronology`] error.
    pub fn get(&self, id: &str) -> Result<Arc<dyn Chronology>, CalendarError> {
        self.lookup(id)
            .ok_or_else(|| CalendarError::unknown_chronology(id))
    }

    /// The first chronology whose [`Chronology::calendar_type`] matches, if
    /// any.
    pub fn lookup_by_calendar_type(&self, calendar_type: &str) -> Option<Arc<dyn Chronology>> {
        self.by_id
            .values()
            .find(|c| c.calendar_type() == Some(calendar_type))
            .cloned()
    }

    /// The registered ids, in no particular order.
    pub fn ids(&self) -> impl Iterator<Item = &str> + '_ {
        self.by_id.keys().map(String::as_str)
    }

    /// The number of registered chronologies.
    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    /// Whether the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }
}
