//! Great-circle distances and nearest-event ranking.

use crate::model::{Coordinate, Event};

/// Mean Earth radius in kilometers.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Haversine distance between two coordinates, in kilometers.
#[must_use]
pub fn distance_km(from: Coordinate, to: Coordinate) -> f64 {
    let lat1 = from.latitude.to_radians();
    let lat2 = to.latitude.to_radians();
    let dlat = (to.latitude - from.latitude).to_radians();
    let dlon = (to.longitude - from.longitude).to_radians();

    let a = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);
    // Rounding can push `a` just past 1.0 for near-antipodal points.
    let a = a.clamp(0.0, 1.0);
    2.0 * EARTH_RADIUS_KM * a.sqrt().atan2((1.0 - a).sqrt())
}

#[derive(Debug, Clone, Copy)]
/// An event paired with its distance from the reference point.
pub struct RankedEvent<'catalog> {
    /// The ranked event.
    pub event: &'catalog Event,
    /// Full-precision distance in kilometers.
    pub distance_km: f64,
}

impl RankedEvent<'_> {
    /// Distance rounded to one decimal, e.g. `"11.5 km"`.
    #[must_use]
    pub fn display_distance(&self) -> String {
        format_km(self.distance_km)
    }
}

/// Format kilometers with one decimal.
#[must_use]
pub fn format_km(distance_km: f64) -> String {
    format!("{distance_km:.1} km")
}

/// Pair every event with its distance from `origin`, nearest first.
///
/// Ties keep catalog order.
#[must_use]
pub fn rank(origin: Coordinate, events: &[Event]) -> Vec<RankedEvent<'_>> {
    let mut ranked: Vec<RankedEvent<'_>> = events
        .iter()
        .map(|event| RankedEvent {
            event,
            distance_km: distance_km(origin, event.coordinate),
        })
        .collect();
    ranked.sort_by(|left, right| left.distance_km.total_cmp(&right.distance_km));
    ranked
}
