//! Error kinds surfaced by the application context.

use std::fmt;
use std::time::Duration;

use crate::forms::ValidationError;
use crate::model::EventId;
use crate::ports::PortError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// External capability the application can degrade without.
pub enum Capability {
    /// Device position.
    Geolocation,
    /// Interactive map widget.
    Map,
    /// Current beach conditions.
    Weather,
}

impl fmt::Display for Capability {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Capability::Geolocation => "geolocation",
            Capability::Map => "map",
            Capability::Weather => "weather",
        };
        write!(formatter, "{name}")
    }
}

#[derive(thiserror::Error, Debug)]
/// Failures of application operations. None of them is fatal.
pub enum ShoreSquadError {
    /// A form field is missing or malformed.
    #[error(transparent)]
    Validation(#[from] ValidationError),
    /// A capability is absent, denied, or did not become ready.
    #[error("{capability} unavailable: {reason}")]
    CapabilityUnavailable {
        /// Which capability failed.
        capability: Capability,
        /// Human-readable cause.
        reason: String,
    },
    /// The key-value store could not be used.
    #[error("Persistence unavailable: {0}")]
    PersistenceUnavailable(#[from] PortError),
    /// The user tried to join an event before joining the crew.
    #[error("Join the crew before joining an event")]
    MustJoinCrewFirst,
    /// No catalog event has this identifier.
    #[error("Unknown event: {0}")]
    UnknownEvent(EventId),
    /// An event with this identifier already exists in the catalog.
    #[error("Duplicate event id: {0}")]
    DuplicateEvent(EventId),
}

impl ShoreSquadError {
    /// Wrap an adapter error as a capability outage.
    #[must_use]
    pub fn unavailable(capability: Capability, source: &PortError) -> Self {
        ShoreSquadError::CapabilityUnavailable {
            capability,
            reason: source.to_string(),
        }
    }

    /// Capability outage caused by a readiness timeout.
    #[must_use]
    pub fn timed_out(capability: Capability, after: Duration) -> Self {
        ShoreSquadError::CapabilityUnavailable {
            capability,
            reason: format!("not ready after {} ms", after.as_millis()),
        }
    }
}
