use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use shoresquad_core::{
    Capabilities, Capability, Coordinate, EventFilter, EventId, FixedClock, GeolocationPort,
    KeyValueStore, MapPort, MapState, Marker, MarkerKind, MemoryStore, PortError,
    ServiceSettings, ShoreSquadError, ShoreSquadService, WeatherPort, WeatherReport,
    forms::{ContactForm, CreateEventForm, Field, IssueKind, JoinCrewForm},
    map::MapSettings,
    storage::{CONTACT_MESSAGES_KEY, CREW_MEMBERS_KEY, EVENTS_KEY, PARTICIPATIONS_KEY},
};

struct Position(Option<Coordinate>);

#[async_trait]
impl GeolocationPort for Position {
    async fn current_position(&self) -> Result<Coordinate, PortError> {
        self.0.ok_or(PortError::Unsupported)
    }
}

struct Sunny;

#[async_trait]
impl WeatherPort for Sunny {
    async fn current(&self, _location: &str) -> Result<WeatherReport, PortError> {
        Ok(WeatherReport {
            temperature_c: 22,
            condition: "Sunny".into(),
            humidity_pct: 65,
            wind_speed_knots: 12,
        })
    }
}

struct Offline;

#[async_trait]
impl WeatherPort for Offline {
    async fn current(&self, _location: &str) -> Result<WeatherReport, PortError> {
        Err(PortError::Internal("no signal".into()))
    }
}

struct TestMap {
    loads: bool,
    state: Mutex<MapState>,
    resizes: AtomicU32,
}

impl TestMap {
    fn new(loads: bool) -> Self {
        Self {
            loads,
            state: Mutex::new(MapState::default()),
            resizes: AtomicU32::new(0),
        }
    }
}

#[async_trait]
impl MapPort for TestMap {
    async fn ready(&self) -> Result<(), PortError> {
        if self.loads {
            Ok(())
        } else {
            std::future::pending().await
        }
    }

    fn set_view(&self, center: Coordinate, zoom: u8) {
        let mut state = self.state.lock().unwrap();
        state.center = Some(center);
        state.zoom = zoom;
    }

    fn add_marker(&self, marker: Marker) {
        self.state.lock().unwrap().markers.push(marker);
    }

    fn pan_to(&self, center: Coordinate) {
        self.state.lock().unwrap().center = Some(center);
    }

    fn invalidate_size(&self) {
        self.resizes.fetch_add(1, Ordering::SeqCst);
    }

    fn state(&self) -> MapState {
        self.state.lock().unwrap().clone()
    }
}

fn now() -> DateTime<Utc> {
    "2026-10-18T09:00:00Z".parse().unwrap()
}

fn capabilities(position: Option<Coordinate>, store: Arc<dyn KeyValueStore>) -> Capabilities {
    Capabilities::new(
        Arc::new(Position(position)),
        Arc::new(Sunny),
        Arc::new(TestMap::new(true)),
    )
    .with_store(store)
    .with_clock(Arc::new(FixedClock::new(now())))
}

fn service(store: Arc<dyn KeyValueStore>) -> ShoreSquadService {
    ShoreSquadService::new(capabilities(None, store), ServiceSettings::default())
}

fn alice() -> JoinCrewForm {
    JoinCrewForm::new("Alice", "a@b.com", "x")
}

#[test]
fn joining_an_event_requires_the_crew_first() {
    let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
    let mut app = service(Arc::clone(&store));
    let coral = EventId::from("coral-cove");

    let result = app.join_event(&coral);
    assert!(matches!(result, Err(ShoreSquadError::MustJoinCrewFirst)));
    assert!(!app.has_joined(&coral));
    assert!(store.read(PARTICIPATIONS_KEY).unwrap().is_none());
    assert_eq!(app.catalog().get(&coral).unwrap().crew_count, 12);
}

#[test]
fn join_flow_updates_crew_counts_and_persists() {
    let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
    let mut app = service(Arc::clone(&store));
    let coral = EventId::from("coral-cove");

    app.join_crew(&alice()).unwrap();
    let participation = app.join_event(&coral).unwrap();
    assert_eq!(participation.event_title, "Coral Cove Cleanup");
    assert_eq!(app.catalog().get(&coral).unwrap().crew_count, 13);
    assert!(app.has_joined(&coral));

    let reloaded = service(store);
    assert!(reloaded.has_joined(&coral));
    assert_eq!(reloaded.catalog().get(&coral).unwrap().crew_count, 13);
    assert_eq!(reloaded.crew_stats().member_count, 1);
    assert_eq!(reloaded.crew_stats().estimated_trash_collected, 12);
}

#[test]
fn unknown_event_ids_are_rejected() {
    let mut app = service(Arc::new(MemoryStore::new()));
    app.join_crew(&alice()).unwrap();
    assert!(matches!(
        app.join_event(&EventId::from("nowhere")),
        Err(ShoreSquadError::UnknownEvent(_))
    ));
}

#[test]
fn invalid_join_form_is_reported_per_field() {
    let mut app = service(Arc::new(MemoryStore::new()));
    let err = app.join_crew(&JoinCrewForm::new("Alice", "not-an-email", "x")).unwrap_err();
    match err {
        ShoreSquadError::Validation(validation) => {
            assert!(validation.has(Field::Email, IssueKind::Malformed));
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(app.members().is_empty());
}

#[test]
fn created_events_join_the_catalog_and_survive_restart() {
    let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
    let mut app = service(Arc::clone(&store));

    let form = CreateEventForm {
        title: "Dune Sweep".into(),
        date: "2026-10-20".into(),
        time: "07:45".into(),
        location: "North Dunes".into(),
        coordinate: "34.1, -118.9".into(),
        ..CreateEventForm::default()
    };
    let event = app.create_event(&form).unwrap();
    assert_eq!(event.coordinate, Coordinate::new(34.1, -118.9));
    assert_eq!(app.catalog().len(), 4);
    assert!(
        app.events(EventFilter::ThisWeek)
            .iter()
            .any(|listed| listed.id == event.id)
    );
    assert!(store.read(EVENTS_KEY).unwrap().is_some());

    app.join_crew(&alice()).unwrap();
    app.join_event(&event.id).unwrap();

    let reloaded = service(store);
    let restored = reloaded.catalog().get(&event.id).unwrap();
    assert_eq!(restored.title, "Dune Sweep");
    assert_eq!(restored.crew_count, 1);
    assert_eq!(reloaded.catalog().list().last().unwrap().id, event.id);
}

#[test]
fn created_event_without_coordinates_uses_map_centre() {
    let mut app = service(Arc::new(MemoryStore::new()));
    let form = CreateEventForm {
        title: "Pier Patrol".into(),
        date: "2026-12-01".into(),
        time: "10:00".into(),
        location: "Old Pier".into(),
        ..CreateEventForm::default()
    };
    let event = app.create_event(&form).unwrap();
    assert_eq!(event.coordinate, MapSettings::default().center);
    assert_eq!(event.description, "No description provided");
}

#[test]
fn contact_messages_are_appended_to_the_store() {
    let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
    let mut app = service(Arc::clone(&store));
    let form = ContactForm {
        name: "Bo".into(),
        email: "bo@sea.org".into(),
        message: "Can I bring my dog?".into(),
    };
    app.submit_contact(&form).unwrap();
    app.submit_contact(&form).unwrap();

    let raw = store.read(CONTACT_MESSAGES_KEY).unwrap().unwrap();
    let stored: Vec<serde_json::Value> = serde_json::from_slice(&raw).unwrap();
    assert_eq!(stored.len(), 2);
    assert_eq!(stored[0]["email"], "bo@sea.org");
    assert!(stored[0].get("sentAt").is_some());
    assert_eq!(service(store).contact_messages().len(), 2);
}

#[test]
fn malformed_store_contents_start_fresh() {
    let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
    store.write(CREW_MEMBERS_KEY, b"garbage").unwrap();
    store.write(EVENTS_KEY, b"{}").unwrap();
    let app = service(store);
    assert!(app.members().is_empty());
    assert_eq!(app.catalog().len(), 3);
}

#[test]
fn this_month_filter_uses_the_clock() {
    let app = service(Arc::new(MemoryStore::new()));
    let titles: Vec<String> = app
        .events(EventFilter::ThisMonth)
        .into_iter()
        .map(|event| event.title)
        .collect();
    assert_eq!(titles, ["Coral Cove Cleanup"]);
}

#[tokio::test]
async fn find_nearby_ranks_events_and_marks_the_user() {
    let origin = Coordinate::new(33.9425, -118.4081);
    let app = ShoreSquadService::new(
        capabilities(Some(origin), Arc::new(MemoryStore::new())),
        ServiceSettings::default(),
    );
    app.init_map().await.unwrap();

    let report = app.find_nearby().await.unwrap();
    let order: Vec<&str> = report.entries.iter().map(|e| e.event_id.0.as_str()).collect();
    assert_eq!(order, ["coral-cove", "kelp-forest", "harbor-pier"]);
    assert_eq!(report.headline(), "Found at: 33.9425, -118.4081");
    assert!(report.lines()[0].starts_with("Coral Cove Cleanup (0.0 km away)"));

    let state = app.map_state();
    assert_eq!(state.markers.len(), 4);
    assert_eq!(state.markers[3].kind, MarkerKind::UserLocation);
    assert_eq!(state.center, Some(origin));
}

#[tokio::test]
async fn find_nearby_without_position_is_capability_unavailable() {
    let app = service(Arc::new(MemoryStore::new()));
    let result = app.find_nearby().await;
    assert!(matches!(
        result,
        Err(ShoreSquadError::CapabilityUnavailable {
            capability: Capability::Geolocation,
            ..
        })
    ));
    assert!(app.map_state().markers.is_empty());
}

#[tokio::test]
async fn weather_outage_is_capability_unavailable() {
    let sunny = service(Arc::new(MemoryStore::new()));
    assert_eq!(
        sunny.weather().await.unwrap().to_string(),
        "Sunny · 22°C · 65% humidity"
    );

    let offline = ShoreSquadService::new(
        Capabilities::new(
            Arc::new(Position(None)),
            Arc::new(Offline),
            Arc::new(TestMap::new(true)),
        ),
        ServiceSettings::default(),
    );
    assert!(matches!(
        offline.weather().await,
        Err(ShoreSquadError::CapabilityUnavailable {
            capability: Capability::Weather,
            ..
        })
    ));
}

#[tokio::test(start_paused = true)]
async fn map_that_does_not_load_times_out() {
    let settings = ServiceSettings {
        map: MapSettings {
            ready_timeout: Duration::from_secs(5),
            ..MapSettings::default()
        },
        ..ServiceSettings::default()
    };
    let app = ShoreSquadService::new(
        Capabilities::new(
            Arc::new(Position(None)),
            Arc::new(Sunny),
            Arc::new(TestMap::new(false)),
        ),
        settings,
    );
    let result = app.init_map().await;
    assert!(matches!(
        result,
        Err(ShoreSquadError::CapabilityUnavailable {
            capability: Capability::Map,
            ..
        })
    ));
    assert!(app.map_state().markers.is_empty());
}

#[test]
fn sample_crew_counts_are_rebuilt_from_participations() {
    let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
    let mut app = service(Arc::clone(&store));
    let kelp = EventId::from("kelp-forest");
    app.join_crew(&alice()).unwrap();
    app.join_event(&kelp).unwrap();
    app.join_event(&kelp).unwrap();

    let reloaded = service(Arc::clone(&store));
    assert_eq!(reloaded.catalog().get(&kelp).unwrap().crew_count, 10);
    let harbor = EventId::from("harbor-pier");
    assert_eq!(reloaded.catalog().get(&harbor).unwrap().crew_count, 5);

    // Created events keep their persisted count instead of being rebuilt.
    let created = {
        let mut app = service(Arc::clone(&store));
        let form = CreateEventForm {
            title: "Dune Sweep".into(),
            date: "2026-10-20".into(),
            time: "07:45".into(),
            location: "North Dunes".into(),
            ..CreateEventForm::default()
        };
        let event = app.create_event(&form).unwrap();
        app.join_event(&event.id).unwrap();
        event.id
    };
    assert_eq!(service(store).catalog().get(&created).unwrap().crew_count, 1);
}

#[test]
fn resizing_reaches_the_map() {
    let map = Arc::new(TestMap::new(true));
    let port: Arc<dyn MapPort> = Arc::<TestMap>::clone(&map);
    let app = ShoreSquadService::new(
        Capabilities::new(Arc::new(Position(None)), Arc::new(Sunny), port),
        ServiceSettings::default(),
    );
    app.resize_map();
    app.resize_map();
    assert_eq!(map.resizes.load(Ordering::SeqCst), 2);
}
