//! Application context combining the catalog, the crew, and every capability.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::capabilities::Capabilities;
use crate::catalog::{EventCatalog, EventFilter};
use crate::crew::CrewStore;
use crate::error::{Capability, ShoreSquadError};
use crate::forms::{ContactForm, CreateEventForm, JoinCrewForm};
use crate::ids::IdGenerator;
use crate::map::{self, MapSettings};
use crate::model::{
    ContactMessage, Coordinate, CrewMember, CrewStats, Event, EventId, Marker, Participation,
    WeatherReport,
};
use crate::ports::MapState;
use crate::proximity::{format_km, rank};
use crate::storage::{CONTACT_MESSAGES_KEY, EVENTS_KEY, load_collection, persist_quietly};

const CREATED_EVENT_PREFIX: &str = "event-";

/// Tunables of the application context.
#[derive(Debug, Clone, PartialEq)]
pub struct ServiceSettings {
    /// Map view and readiness budget.
    pub map: MapSettings,
    /// Beach whose weather is shown in the header.
    pub weather_location: String,
}

impl Default for ServiceSettings {
    fn default() -> Self {
        Self {
            map: MapSettings::default(),
            weather_location: String::from("Malibu"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
/// One line of the nearby-events report.
pub struct NearbyEntry {
    /// Ranked event.
    pub event_id: EventId,
    /// Title at ranking time.
    pub title: String,
    /// Full-precision distance in kilometers.
    pub distance_km: f64,
}

#[derive(Debug, Clone, PartialEq)]
/// Events ranked by distance from the user's position.
pub struct NearbyReport {
    /// Position the ranking is relative to.
    pub origin: Coordinate,
    /// Nearest first.
    pub entries: Vec<NearbyEntry>,
}

impl NearbyReport {
    /// Header line with the position at four decimals.
    #[must_use]
    pub fn headline(&self) -> String {
        format!("Found at: {}", self.origin)
    }

    /// `"<title> (<distance> away)"` per event, nearest first.
    #[must_use]
    pub fn lines(&self) -> Vec<String> {
        self.entries
            .iter()
            .map(|entry| format!("{} ({} away)", entry.title, format_km(entry.distance_km)))
            .collect()
    }
}

/// Public entry point for everything the front end can do.
pub struct ShoreSquadService {
    capabilities: Capabilities,
    settings: ServiceSettings,
    ids: Arc<IdGenerator>,
    catalog: EventCatalog,
    created: Vec<EventId>,
    crew: CrewStore,
    contact_messages: Vec<ContactMessage>,
}

impl ShoreSquadService {
    /// Build the context from the sample catalog plus whatever the store holds.
    #[must_use]
    pub fn new(capabilities: Capabilities, settings: ServiceSettings) -> Self {
        Self::with_catalog(capabilities, settings, EventCatalog::sample())
    }

    /// Build the context around a specific base catalog.
    #[must_use]
    pub fn with_catalog(
        capabilities: Capabilities,
        settings: ServiceSettings,
        mut catalog: EventCatalog,
    ) -> Self {
        let ids = Arc::new(IdGenerator::default());
        let store = capabilities.store.as_ref();

        let mut created = Vec::new();
        for event in load_collection::<Event>(store, EVENTS_KEY) {
            if let Some(serial) = created_serial(&event.id) {
                ids.observe(serial);
            }
            let id = event.id.clone();
            match catalog.insert(event) {
                Ok(()) => created.push(id),
                Err(err) => warn!(error = %err, "skipping stored event"),
            }
        }

        let contact_messages = load_collection(store, CONTACT_MESSAGES_KEY);
        let crew = CrewStore::load(
            Arc::clone(&capabilities.store),
            Arc::clone(&capabilities.clock),
            Arc::clone(&ids),
        );

        // Sample events carry their authored counts; replay joins on top.
        for record in crew.participations() {
            if !created.contains(&record.event_id) {
                catalog.increment_crew(&record.event_id);
            }
        }

        debug!(events = catalog.len(), created = created.len(), "service ready");

        Self {
            capabilities,
            settings,
            ids,
            catalog,
            created,
            crew,
            contact_messages,
        }
    }

    /// Current settings.
    #[must_use]
    pub fn settings(&self) -> &ServiceSettings {
        &self.settings
    }

    /// The full catalog.
    #[must_use]
    pub fn catalog(&self) -> &EventCatalog {
        &self.catalog
    }

    /// Events matching `filter` as of today.
    #[must_use]
    pub fn events(&self, filter: EventFilter) -> Vec<Event> {
        self.catalog.filter(filter, self.capabilities.clock.today())
    }

    /// Joined crew members in join order.
    #[must_use]
    pub fn members(&self) -> &[CrewMember] {
        self.crew.members()
    }

    /// Crew panel numbers.
    #[must_use]
    pub fn crew_stats(&self) -> CrewStats {
        self.crew.stats()
    }

    /// Whether the user already joined `event_id`.
    #[must_use]
    pub fn has_joined(&self, event_id: &EventId) -> bool {
        self.crew.has_joined(event_id)
    }

    /// Submitted contact messages, oldest first.
    #[must_use]
    pub fn contact_messages(&self) -> &[ContactMessage] {
        &self.contact_messages
    }

    /// Handle the join-crew form.
    ///
    /// # Errors
    ///
    /// Returns [`ShoreSquadError::Validation`] for empty or malformed fields.
    pub fn join_crew(&mut self, form: &JoinCrewForm) -> Result<CrewMember, ShoreSquadError> {
        let member = self.crew.join(form)?;
        track_event("crew_joined", &member.name);
        Ok(member)
    }

    /// Join a catalog event and bump its crew count.
    ///
    /// # Errors
    ///
    /// Returns [`ShoreSquadError::UnknownEvent`] for ids not in the catalog and
    /// [`ShoreSquadError::MustJoinCrewFirst`] when nobody joined the crew.
    pub fn join_event(&mut self, event_id: &EventId) -> Result<Participation, ShoreSquadError> {
        let title = self
            .catalog
            .get(event_id)
            .map(|event| event.title.clone())
            .ok_or_else(|| ShoreSquadError::UnknownEvent(event_id.clone()))?;

        let participation = self.crew.record_participation(event_id, &title)?;
        self.catalog.increment_crew(event_id);
        if self.created.contains(event_id) {
            self.persist_created_events();
        }
        track_event("event_joined", &title);
        Ok(participation)
    }

    /// Handle the create-event form and append the event to the catalog.
    ///
    /// Events without coordinates are placed at the map's default centre.
    ///
    /// # Errors
    ///
    /// Returns [`ShoreSquadError::Validation`] for missing or unparsable fields.
    pub fn create_event(&mut self, form: &CreateEventForm) -> Result<Event, ShoreSquadError> {
        let draft = form.validate()?;
        let serial = self.ids.next(self.capabilities.clock.now());

        let event = Event {
            id: EventId(format!("{CREATED_EVENT_PREFIX}{serial}")),
            title: draft.title,
            date: draft.date,
            time: draft.time,
            location: draft.location,
            coordinate: draft.coordinate.unwrap_or(self.settings.map.center),
            description: draft.description,
            crew_count: 0,
            difficulty: draft.difficulty,
        };

        self.catalog.insert(event.clone())?;
        self.created.push(event.id.clone());
        self.persist_created_events();
        self.capabilities.map.add_marker(Marker::for_event(&event));

        info!(event = %event.id, "event created");
        track_event("event_created", &event.title);
        Ok(event)
    }

    /// Handle the contact form.
    ///
    /// # Errors
    ///
    /// Returns [`ShoreSquadError::Validation`] for empty or malformed fields.
    pub fn submit_contact(
        &mut self,
        form: &ContactForm,
    ) -> Result<ContactMessage, ShoreSquadError> {
        let request = form.validate()?;
        let message = ContactMessage {
            name: request.name,
            email: request.email,
            message: request.message,
            sent_at: self.capabilities.clock.now(),
        };

        self.contact_messages.push(message.clone());
        persist_quietly(
            self.capabilities.store.as_ref(),
            CONTACT_MESSAGES_KEY,
            &self.contact_messages,
        );
        track_event("contact_form_submitted", &message.email);
        Ok(message)
    }

    /// Conditions at the configured beach.
    ///
    /// # Errors
    ///
    /// Returns [`ShoreSquadError::CapabilityUnavailable`] when the weather source fails.
    pub async fn weather(&self) -> Result<WeatherReport, ShoreSquadError> {
        self.weather_request().await
    }

    /// Detached form of [`Self::weather`] that can be spawned on a runtime.
    pub fn weather_request(
        &self,
    ) -> impl Future<Output = Result<WeatherReport, ShoreSquadError>> + Send + 'static {
        let weather = Arc::clone(&self.capabilities.weather);
        let location = self.settings.weather_location.clone();
        async move {
            weather.current(&location).await.map_err(|err| {
                warn!(error = %err, "weather unavailable");
                ShoreSquadError::unavailable(Capability::Weather, &err)
            })
        }
    }

    /// Wait for the map and place the catalog markers on it.
    ///
    /// # Errors
    ///
    /// Returns [`ShoreSquadError::CapabilityUnavailable`] when the map does not load in time.
    pub async fn init_map(&self) -> Result<(), ShoreSquadError> {
        self.map_setup().await
    }

    /// Detached form of [`Self::init_map`] that can be spawned on a runtime.
    ///
    /// Markers are taken from the catalog as it is when this is called.
    pub fn map_setup(&self) -> impl Future<Output = Result<(), ShoreSquadError>> + Send + 'static {
        let map = Arc::clone(&self.capabilities.map);
        let settings = self.settings.map;
        let events = self.catalog.list().to_vec();
        async move { map::initialize(map.as_ref(), settings, &events).await }
    }

    /// What the map currently shows.
    #[must_use]
    pub fn map_state(&self) -> MapState {
        self.capabilities.map.state()
    }

    /// Tell the map its drawing area changed.
    pub fn resize_map(&self) {
        self.capabilities.map.invalidate_size();
    }

    /// Locate the user, mark them on the map, and rank events by distance.
    ///
    /// # Errors
    ///
    /// Returns [`ShoreSquadError::CapabilityUnavailable`] when no position is available;
    /// ranking is skipped in that case.
    pub async fn find_nearby(&self) -> Result<NearbyReport, ShoreSquadError> {
        let origin = self
            .capabilities
            .geolocation
            .current_position()
            .await
            .map_err(|err| {
                warn!(error = %err, "geolocation unavailable");
                ShoreSquadError::unavailable(Capability::Geolocation, &err)
            })?;

        info!(%origin, "user located");
        self.capabilities.map.add_marker(Marker::user_location(origin));
        self.capabilities.map.pan_to(origin);

        let entries = rank(origin, self.catalog.list())
            .into_iter()
            .map(|ranked| NearbyEntry {
                event_id: ranked.event.id.clone(),
                title: ranked.event.title.clone(),
                distance_km: ranked.distance_km,
            })
            .collect();

        Ok(NearbyReport { origin, entries })
    }

    fn persist_created_events(&self) {
        let events: Vec<&Event> = self
            .catalog
            .list()
            .iter()
            .filter(|event| self.created.contains(&event.id))
            .collect();
        persist_quietly(self.capabilities.store.as_ref(), EVENTS_KEY, &events);
    }
}

fn created_serial(id: &EventId) -> Option<u64> {
    id.0.strip_prefix(CREATED_EVENT_PREFIX)?.parse().ok()
}

fn track_event(name: &str, detail: &str) {
    info!(target: "shoresquad::analytics", event = name, detail, "analytics");
}
