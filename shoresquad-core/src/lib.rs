//! Core types and service wiring for the ShoreSquad beach cleanup coordinator.

/// Capability bundle handed to the application context.
pub mod capabilities;
/// Cleanup event catalog and list filters.
pub mod catalog;
/// Crew membership and participation records.
pub mod crew;
/// Error kinds surfaced to the front end.
pub mod error;
/// Form validation.
pub mod forms;
/// Collision-free timestamp identifiers.
pub mod ids;
/// Map readiness and marker placement.
pub mod map;
/// Domain models shared by all crates.
pub mod model;
/// Timed user-facing messages.
pub mod notification;
/// Traits describing the external capabilities.
pub mod ports;
/// Haversine distances and nearest-event ranking.
pub mod proximity;
/// High-level service facade used by clients.
pub mod service;
/// JSON collections persisted in the key-value store.
pub mod storage;

pub use capabilities::*;
pub use catalog::*;
pub use error::*;
pub use model::*;
pub use ports::*;
pub use service::*;
