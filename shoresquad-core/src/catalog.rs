//! Ordered collection of cleanup events and the list filters.

use std::fmt;

use chrono::{Datelike, Duration, NaiveDate, NaiveTime};

use crate::error::ShoreSquadError;
use crate::model::{Coordinate, Difficulty, Event, EventId};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
/// Selections offered above the event list.
pub enum EventFilter {
    /// Every event.
    #[default]
    All,
    /// Events from today through seven days ahead, inclusive.
    ThisWeek,
    /// Events in the current calendar month.
    ThisMonth,
    /// Demonstration selection: every other event by position.
    MyCrew,
}

impl EventFilter {
    /// All filters in display order.
    pub const ALL: [EventFilter; 4] = [
        EventFilter::All,
        EventFilter::ThisWeek,
        EventFilter::ThisMonth,
        EventFilter::MyCrew,
    ];

    /// The filter after this one, wrapping around.
    #[must_use]
    pub fn next(self) -> Self {
        match self {
            EventFilter::All => EventFilter::ThisWeek,
            EventFilter::ThisWeek => EventFilter::ThisMonth,
            EventFilter::ThisMonth => EventFilter::MyCrew,
            EventFilter::MyCrew => EventFilter::All,
        }
    }
}

impl fmt::Display for EventFilter {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            EventFilter::All => "All",
            EventFilter::ThisWeek => "This week",
            EventFilter::ThisMonth => "This month",
            EventFilter::MyCrew => "My crew",
        };
        write!(formatter, "{label}")
    }
}

/// Cleanup events in authoring order.
#[derive(Debug, Clone, Default)]
pub struct EventCatalog {
    events: Vec<Event>,
}

impl EventCatalog {
    /// Build a catalog, rejecting duplicate identifiers.
    ///
    /// # Errors
    ///
    /// Returns [`ShoreSquadError::DuplicateEvent`] for the first repeated id.
    pub fn new(events: Vec<Event>) -> Result<Self, ShoreSquadError> {
        let mut catalog = Self::default();
        for event in events {
            catalog.insert(event)?;
        }
        Ok(catalog)
    }

    /// The built-in Southern California cleanups.
    #[must_use]
    pub fn sample() -> Self {
        Self {
            events: sample_events(),
        }
    }

    /// Every event in authoring order.
    #[must_use]
    pub fn list(&self) -> &[Event] {
        &self.events
    }

    /// Number of events.
    #[must_use]
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Whether the catalog holds no events.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Look up an event by id.
    #[must_use]
    pub fn get(&self, id: &EventId) -> Option<&Event> {
        self.events.iter().find(|event| &event.id == id)
    }

    /// Append an event.
    ///
    /// # Errors
    ///
    /// Returns [`ShoreSquadError::DuplicateEvent`] when the id is taken.
    pub fn insert(&mut self, event: Event) -> Result<(), ShoreSquadError> {
        if self.get(&event.id).is_some() {
            return Err(ShoreSquadError::DuplicateEvent(event.id));
        }
        self.events.push(event);
        Ok(())
    }

    /// Bump the crew count of an event, returning the new count.
    pub fn increment_crew(&mut self, id: &EventId) -> Option<u32> {
        let event = self.events.iter_mut().find(|event| &event.id == id)?;
        event.crew_count = event.crew_count.saturating_add(1);
        Some(event.crew_count)
    }

    /// Events selected by `filter`, relative to `today`.
    #[must_use]
    pub fn filter(&self, filter: EventFilter, today: NaiveDate) -> Vec<Event> {
        match filter {
            EventFilter::All => self.events.clone(),
            EventFilter::ThisWeek => {
                let end = today + Duration::days(7);
                self.events
                    .iter()
                    .filter(|event| event.date >= today && event.date <= end)
                    .cloned()
                    .collect()
            }
            EventFilter::ThisMonth => self
                .events
                .iter()
                .filter(|event| {
                    event.date.year() == today.year() && event.date.month() == today.month()
                })
                .cloned()
                .collect(),
            EventFilter::MyCrew => self.events.iter().step_by(2).cloned().collect(),
        }
    }
}

fn sample_events() -> Vec<Event> {
    let date = |year, month, day| NaiveDate::from_ymd_opt(year, month, day).unwrap_or_default();
    let time = |hour, minute| NaiveTime::from_hms_opt(hour, minute, 0).unwrap_or_default();

    vec![
        Event {
            id: EventId::from("coral-cove"),
            title: "Coral Cove Cleanup".into(),
            date: date(2026, 10, 24),
            time: time(9, 0),
            location: "Coral Cove, El Segundo".into(),
            coordinate: Coordinate::new(33.9425, -118.4081),
            description: "Sweep the high-tide line for plastics and fishing line.".into(),
            crew_count: 12,
            difficulty: Difficulty::Easy,
        },
        Event {
            id: EventId::from("kelp-forest"),
            title: "Kelp Forest Beach Day".into(),
            date: date(2026, 11, 7),
            time: time(8, 30),
            location: "Kelp Forest Beach, Santa Monica".into(),
            coordinate: Coordinate::new(34.0195, -118.4912),
            description: "Family-friendly cleanup followed by a tide-pool walk.".into(),
            crew_count: 8,
            difficulty: Difficulty::Moderate,
        },
        Event {
            id: EventId::from("harbor-pier"),
            title: "Harbor Pier Restoration".into(),
            date: date(2026, 11, 21),
            time: time(10, 0),
            location: "Harbor Pier, Oxnard".into(),
            coordinate: Coordinate::new(34.2195, -119.1772),
            description: "Clear debris under the pier pilings. Gloves provided.".into(),
            crew_count: 5,
            difficulty: Difficulty::Hard,
        },
    ]
}
