//! Input validation for the create-event, join-crew, and contact forms.

use std::fmt;
use std::sync::LazyLock;

use chrono::{NaiveDate, NaiveTime};
use regex::Regex;

use crate::model::{Coordinate, DEFAULT_DESCRIPTION, Difficulty};

static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is a valid regex")
});

/// Check an address against the `local@domain.tld` shape.
#[must_use]
pub fn is_valid_email(email: &str) -> bool {
    EMAIL_PATTERN.is_match(email)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
/// Every input field across all forms.
pub enum Field {
    /// Person's name.
    Name,
    /// Email address.
    Email,
    /// Join-crew motivation.
    Motivation,
    /// Contact message body.
    Message,
    /// Event title.
    Title,
    /// Event date.
    Date,
    /// Event time.
    Time,
    /// Event location name.
    Location,
    /// Event description.
    Description,
    /// Event coordinates.
    Coordinate,
}

impl fmt::Display for Field {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Field::Name => "name",
            Field::Email => "email",
            Field::Motivation => "motivation",
            Field::Message => "message",
            Field::Title => "title",
            Field::Date => "date",
            Field::Time => "time",
            Field::Location => "location",
            Field::Description => "description",
            Field::Coordinate => "coordinates",
        };
        write!(formatter, "{name}")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Why a field was rejected.
pub enum IssueKind {
    /// Required but empty.
    Missing,
    /// Present but not in the expected format.
    Malformed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// One rejected field.
pub struct FieldIssue {
    /// The offending field.
    pub field: Field,
    /// What is wrong with it.
    pub kind: IssueKind,
}

impl fmt::Display for FieldIssue {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            IssueKind::Missing => write!(formatter, "{} is required", self.field),
            IssueKind::Malformed => write!(formatter, "{} is not valid", self.field),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// All problems found in one form submission.
pub struct ValidationError {
    issues: Vec<FieldIssue>,
}

impl ValidationError {
    /// Every rejected field, in form order.
    #[must_use]
    pub fn issues(&self) -> &[FieldIssue] {
        &self.issues
    }

    /// Whether `field` was rejected for `kind`.
    #[must_use]
    pub fn has(&self, field: Field, kind: IssueKind) -> bool {
        self.issues
            .iter()
            .any(|issue| issue.field == field && issue.kind == kind)
    }

    /// Whether `field` was rejected for any reason.
    #[must_use]
    pub fn cites(&self, field: Field) -> bool {
        self.issues.iter().any(|issue| issue.field == field)
    }
}

impl std::error::Error for ValidationError {}

impl fmt::Display for ValidationError {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for issue in &self.issues {
            if !first {
                write!(formatter, "; ")?;
            }
            first = false;
            write!(formatter, "{issue}")?;
        }
        Ok(())
    }
}

/// Collects field issues while a form is checked.
#[derive(Debug, Default)]
struct Checker {
    issues: Vec<FieldIssue>,
}

impl Checker {
    fn require<'input>(&mut self, field: Field, value: &'input str) -> Option<&'input str> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            self.issues.push(FieldIssue {
                field,
                kind: IssueKind::Missing,
            });
            None
        } else {
            Some(trimmed)
        }
    }

    fn malformed(&mut self, field: Field) {
        self.issues.push(FieldIssue {
            field,
            kind: IssueKind::Malformed,
        });
    }

    fn email(&mut self, value: &str) -> Option<String> {
        let email = self.require(Field::Email, value)?;
        if is_valid_email(email) {
            Some(email.to_owned())
        } else {
            self.malformed(Field::Email);
            None
        }
    }

    fn is_clean(&self) -> bool {
        self.issues.is_empty()
    }

    fn into_error(self) -> ValidationError {
        ValidationError {
            issues: self.issues,
        }
    }
}

#[derive(Debug, Clone, Default)]
/// Raw join-crew form input.
pub struct JoinCrewForm {
    /// Name as typed.
    pub name: String,
    /// Email as typed.
    pub email: String,
    /// Motivation as typed.
    pub motivation: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Join-crew input that passed validation.
pub struct CrewApplication {
    /// Trimmed name.
    pub name: String,
    /// Trimmed, well-formed email.
    pub email: String,
    /// Trimmed motivation.
    pub motivation: String,
}

impl JoinCrewForm {
    /// Build a form from its three fields.
    #[must_use]
    pub fn new<N: Into<String>, E: Into<String>, M: Into<String>>(
        name: N,
        email: E,
        motivation: M,
    ) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            motivation: motivation.into(),
        }
    }

    /// Check every field and return the cleaned input.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] listing each empty or malformed field.
    pub fn validate(&self) -> Result<CrewApplication, ValidationError> {
        let mut checker = Checker::default();
        let name = checker.require(Field::Name, &self.name).map(str::to_owned);
        let email = checker.email(&self.email);
        let motivation = checker
            .require(Field::Motivation, &self.motivation)
            .map(str::to_owned);

        match (name, email, motivation) {
            (Some(name), Some(email), Some(motivation)) if checker.is_clean() => {
                Ok(CrewApplication {
                    name,
                    email,
                    motivation,
                })
            }
            _ => Err(checker.into_error()),
        }
    }
}

#[derive(Debug, Clone, Default)]
/// Raw contact form input.
pub struct ContactForm {
    /// Sender name as typed.
    pub name: String,
    /// Sender email as typed.
    pub email: String,
    /// Message as typed.
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Contact input that passed validation.
pub struct ContactRequest {
    /// Trimmed name.
    pub name: String,
    /// Trimmed, well-formed email.
    pub email: String,
    /// Message body, trimmed.
    pub message: String,
}

impl ContactForm {
    /// Check every field and return the cleaned input.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] listing each empty or malformed field.
    pub fn validate(&self) -> Result<ContactRequest, ValidationError> {
        let mut checker = Checker::default();
        let name = checker.require(Field::Name, &self.name).map(str::to_owned);
        let email = checker.email(&self.email);
        let message = checker
            .require(Field::Message, &self.message)
            .map(str::to_owned);

        match (name, email, message) {
            (Some(name), Some(email), Some(message)) if checker.is_clean() => Ok(ContactRequest {
                name,
                email,
                message,
            }),
            _ => Err(checker.into_error()),
        }
    }
}

#[derive(Debug, Clone, Default)]
/// Raw create-event form input.
pub struct CreateEventForm {
    /// Title as typed.
    pub title: String,
    /// Date as `YYYY-MM-DD`.
    pub date: String,
    /// Time as `HH:MM`.
    pub time: String,
    /// Meeting place as typed.
    pub location: String,
    /// Optional description.
    pub description: String,
    /// Optional `"lat, lon"` pair.
    pub coordinate: String,
}

#[derive(Debug, Clone, PartialEq)]
/// Create-event input that passed validation.
pub struct EventDraft {
    /// Trimmed title.
    pub title: String,
    /// Parsed date.
    pub date: NaiveDate,
    /// Parsed time.
    pub time: NaiveTime,
    /// Trimmed location name.
    pub location: String,
    /// Description or the placeholder text.
    pub description: String,
    /// Parsed coordinate, if one was entered.
    pub coordinate: Option<Coordinate>,
    /// Difficulty for new events.
    pub difficulty: Difficulty,
}

impl CreateEventForm {
    /// Check every field and return the parsed draft.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] listing each empty or unparsable field.
    pub fn validate(&self) -> Result<EventDraft, ValidationError> {
        let mut checker = Checker::default();
        let title = checker.require(Field::Title, &self.title).map(str::to_owned);

        let date = checker.require(Field::Date, &self.date).and_then(|raw| {
            let parsed = NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok();
            if parsed.is_none() {
                checker.malformed(Field::Date);
            }
            parsed
        });

        let time = checker.require(Field::Time, &self.time).and_then(|raw| {
            let parsed = NaiveTime::parse_from_str(raw, "%H:%M").ok();
            if parsed.is_none() {
                checker.malformed(Field::Time);
            }
            parsed
        });

        let location = checker
            .require(Field::Location, &self.location)
            .map(str::to_owned);

        let coordinate = match self.coordinate.trim() {
            "" => None,
            raw => {
                let parsed = parse_coordinate(raw);
                if parsed.is_none() {
                    checker.malformed(Field::Coordinate);
                }
                parsed
            }
        };

        let description = match self.description.trim() {
            "" => DEFAULT_DESCRIPTION.to_owned(),
            text => text.to_owned(),
        };

        match (title, date, time, location) {
            (Some(title), Some(date), Some(time), Some(location)) if checker.is_clean() => {
                Ok(EventDraft {
                    title,
                    date,
                    time,
                    location,
                    description,
                    coordinate,
                    difficulty: Difficulty::default(),
                })
            }
            _ => Err(checker.into_error()),
        }
    }
}

/// Parse `"lat, lon"` in decimal degrees, rejecting out-of-range values.
#[must_use]
pub fn parse_coordinate(raw: &str) -> Option<Coordinate> {
    let (lat, lon) = raw.split_once(',')?;
    let latitude: f64 = lat.trim().parse().ok()?;
    let longitude: f64 = lon.trim().parse().ok()?;
    if !(-90.0..=90.0).contains(&latitude) || !(-180.0..=180.0).contains(&longitude) {
        return None;
    }
    Some(Coordinate::new(latitude, longitude))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_pattern_matches_simple_addresses() {
        assert!(is_valid_email("a@b.com"));
        assert!(is_valid_email("crew.lead@shore.squad.org"));
        assert!(!is_valid_email("not-an-email"));
        assert!(!is_valid_email("a@b"));
        assert!(!is_valid_email("a b@c.com"));
        assert!(!is_valid_email("a@@b.com"));
    }

    #[test]
    fn join_form_reports_every_failing_field() {
        let err = JoinCrewForm::new("  ", "nope", "").validate().unwrap_err();
        assert!(err.has(Field::Name, IssueKind::Missing));
        assert!(err.has(Field::Email, IssueKind::Malformed));
        assert!(err.has(Field::Motivation, IssueKind::Missing));
        assert_eq!(
            err.to_string(),
            "name is required; email is not valid; motivation is required"
        );
    }

    #[test]
    fn empty_email_is_missing_not_malformed() {
        let err = JoinCrewForm::new("Alice", "", "x").validate().unwrap_err();
        assert!(err.has(Field::Email, IssueKind::Missing));
        assert!(!err.has(Field::Email, IssueKind::Malformed));
    }

    #[test]
    fn join_form_trims_input() {
        let application = JoinCrewForm::new(" Alice ", " a@b.com", "love the sea ")
            .validate()
            .unwrap();
        assert_eq!(application.name, "Alice");
        assert_eq!(application.email, "a@b.com");
        assert_eq!(application.motivation, "love the sea");
    }

    #[test]
    fn contact_form_requires_message() {
        let form = ContactForm {
            name: "Bo".into(),
            email: "bo@sea.org".into(),
            message: String::new(),
        };
        let err = form.validate().unwrap_err();
        assert_eq!(err.issues().len(), 1);
        assert!(err.has(Field::Message, IssueKind::Missing));
    }

    #[test]
    fn create_event_parses_date_time_and_defaults() {
        let form = CreateEventForm {
            title: "Dune Sweep".into(),
            date: "2026-11-01".into(),
            time: "09:30".into(),
            location: "North Dunes".into(),
            ..CreateEventForm::default()
        };
        let draft = form.validate().unwrap();
        assert_eq!(draft.date, NaiveDate::from_ymd_opt(2026, 11, 1).unwrap());
        assert_eq!(draft.time, NaiveTime::from_hms_opt(9, 30, 0).unwrap());
        assert_eq!(draft.description, DEFAULT_DESCRIPTION);
        assert_eq!(draft.coordinate, None);
    }

    #[test]
    fn create_event_flags_unparsable_values() {
        let form = CreateEventForm {
            title: "Dune Sweep".into(),
            date: "01/11/2026".into(),
            time: "9am".into(),
            location: "North Dunes".into(),
            coordinate: "north".into(),
            ..CreateEventForm::default()
        };
        let err = form.validate().unwrap_err();
        assert!(err.has(Field::Date, IssueKind::Malformed));
        assert!(err.has(Field::Time, IssueKind::Malformed));
        assert!(err.has(Field::Coordinate, IssueKind::Malformed));
        assert!(!err.cites(Field::Title));
    }

    #[test]
    fn coordinates_must_be_in_range() {
        assert_eq!(
            parse_coordinate("34.0195, -118.4912"),
            Some(Coordinate::new(34.0195, -118.4912))
        );
        assert_eq!(parse_coordinate("91, 0"), None);
        assert_eq!(parse_coordinate("0, 181"), None);
        assert_eq!(parse_coordinate("12.5"), None);
    }
}
