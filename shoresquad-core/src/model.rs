//! Domain data structures for cleanup events, crew members, and participations.

use std::fmt;

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

/// Placeholder shown for events created without a description.
pub const DEFAULT_DESCRIPTION: &str = "No description provided";

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
/// Geographic position in decimal degrees.
pub struct Coordinate {
    /// Latitude, positive north.
    pub latitude: f64,
    /// Longitude, positive east.
    pub longitude: f64,
}

impl Coordinate {
    /// Construct a coordinate from latitude and longitude in degrees.
    #[must_use]
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "{:.4}, {:.4}", self.latitude, self.longitude)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
/// How demanding a cleanup is expected to be.
pub enum Difficulty {
    /// Short walk, light litter.
    #[default]
    Easy,
    /// Longer shifts or rougher terrain.
    Moderate,
    /// Heavy debris or hard-to-reach spots.
    Hard,
}

impl fmt::Display for Difficulty {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Difficulty::Easy => "Easy",
            Difficulty::Moderate => "Moderate",
            Difficulty::Hard => "Hard",
        };
        write!(formatter, "{label}")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
/// Stable identifier of a cleanup event.
pub struct EventId(pub String);

impl fmt::Display for EventId {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "{}", self.0)
    }
}

impl From<&str> for EventId {
    fn from(raw: &str) -> Self {
        EventId(raw.to_owned())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
/// A beach cleanup that crew members can sign up for.
pub struct Event {
    /// Unique identifier within the catalog.
    pub id: EventId,
    /// Display title.
    pub title: String,
    /// Calendar day of the cleanup.
    pub date: NaiveDate,
    /// Meeting time.
    pub time: NaiveTime,
    /// Human-readable meeting place.
    pub location: String,
    /// Where the cleanup happens.
    pub coordinate: Coordinate,
    /// Free text shown on the event card.
    #[serde(default = "default_description")]
    pub description: String,
    /// Number of people who joined through this app.
    #[serde(default)]
    pub crew_count: u32,
    /// Expected effort.
    #[serde(default)]
    pub difficulty: Difficulty,
}

fn default_description() -> String {
    DEFAULT_DESCRIPTION.to_owned()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
/// Identifier of a crew member, derived from the creation time.
pub struct MemberId(pub u64);

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
/// Someone who joined the crew via the join form.
pub struct CrewMember {
    /// Unique identifier.
    pub id: MemberId,
    /// Display name.
    pub name: String,
    /// Contact address, validated on join.
    pub email: String,
    /// Why they want to help.
    pub motivation: String,
    /// Day the member joined.
    pub joined_date: NaiveDate,
    /// Cleanups this member took part in. Nothing increments it yet.
    #[serde(default)]
    pub cleanups_attended: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
/// Identifier of a participation record.
pub struct ParticipationId(pub u64);

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
/// Record that the local user joined a specific event.
pub struct Participation {
    /// Unique identifier.
    pub id: ParticipationId,
    /// Event that was joined. Not checked against the catalog.
    pub event_id: EventId,
    /// Event title at the time of joining.
    pub event_title: String,
    /// When the join happened.
    pub joined_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
/// Message left through the contact form.
pub struct ContactMessage {
    /// Sender name.
    pub name: String,
    /// Sender address.
    pub email: String,
    /// Message body.
    pub message: String,
    /// Submission time.
    pub sent_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
/// Aggregate numbers shown on the crew panel.
pub struct CrewStats {
    /// Number of joined members.
    pub member_count: usize,
    /// Sum of attended cleanups across all members.
    pub total_cleanups_attended: u64,
    /// Illustrative estimate in kilograms.
    pub estimated_trash_collected: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
/// Current conditions at a beach.
pub struct WeatherReport {
    /// Air temperature in degrees Celsius.
    pub temperature_c: i32,
    /// Short description such as "Sunny".
    pub condition: String,
    /// Relative humidity in percent.
    pub humidity_pct: u8,
    /// Wind speed in knots.
    pub wind_speed_knots: u16,
}

impl fmt::Display for WeatherReport {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            formatter,
            "{} · {}°C · {}% humidity",
            self.condition, self.temperature_c, self.humidity_pct
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// What a map marker stands for.
pub enum MarkerKind {
    /// A cleanup location from the catalog.
    Cleanup,
    /// The position reported by geolocation.
    UserLocation,
}

#[derive(Debug, Clone, PartialEq)]
/// A pin displayed on the map.
pub struct Marker {
    /// Where to place the pin.
    pub coordinate: Coordinate,
    /// Short label.
    pub title: String,
    /// Text shown when the pin is selected.
    pub popup: String,
    /// Marker category, used for styling.
    pub kind: MarkerKind,
}

impl Marker {
    /// Marker for a catalog event.
    #[must_use]
    pub fn for_event(event: &Event) -> Self {
        Self {
            coordinate: event.coordinate,
            title: event.title.clone(),
            popup: format!("{} · {} {}", event.title, event.date, event.time.format("%H:%M")),
            kind: MarkerKind::Cleanup,
        }
    }

    /// Marker for the user's own position.
    #[must_use]
    pub fn user_location(coordinate: Coordinate) -> Self {
        Self {
            coordinate,
            title: String::from("You"),
            popup: String::from("Your location"),
            kind: MarkerKind::UserLocation,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn weather_report_renders_summary_line() {
        let report = WeatherReport {
            temperature_c: 22,
            condition: "Sunny".into(),
            humidity_pct: 65,
            wind_speed_knots: 12,
        };
        assert_eq!(report.to_string(), "Sunny · 22°C · 65% humidity");
    }

    #[test]
    fn participation_uses_camel_case_fields() {
        let participation = Participation {
            id: ParticipationId(7),
            event_id: EventId::from("coral-cove"),
            event_title: "Coral Cove Cleanup".into(),
            joined_at: DateTime::from_timestamp(1_700_000_000, 0).unwrap(),
        };
        let json = serde_json::to_value(&participation).unwrap();
        assert_eq!(json["eventId"], "coral-cove");
        assert_eq!(json["eventTitle"], "Coral Cove Cleanup");
        assert_eq!(json["id"], 7);
    }

    #[test]
    fn event_without_description_gets_placeholder() {
        let raw = r#"{
            "id": "x",
            "title": "Dune Sweep",
            "date": "2026-11-01",
            "time": "09:00:00",
            "location": "North Dunes",
            "coordinate": { "latitude": 1.0, "longitude": 2.0 }
        }"#;
        let event: Event = serde_json::from_str(raw).unwrap();
        assert_eq!(event.description, DEFAULT_DESCRIPTION);
        assert_eq!(event.crew_count, 0);
        assert_eq!(event.difficulty, Difficulty::Easy);
    }
}
