use std::time::{Duration, Instant};

use shoresquad_core::{
    Event, EventFilter, ShoreSquadError, ShoreSquadService, WeatherReport,
    forms::{ContactForm, CreateEventForm, Field, JoinCrewForm, ValidationError},
    notification::{NotificationCenter, NotificationLevel},
    service::NearbyReport,
};
use tokio::sync::mpsc;
use tracing::warn;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Screen {
    Events,
    Crew,
    Map,
    Nearby,
    Form,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum FormKind {
    CreateEvent,
    JoinCrew,
    Contact,
}

impl FormKind {
    pub(crate) fn title(self) -> &'static str {
        match self {
            FormKind::CreateEvent => "Create a cleanup",
            FormKind::JoinCrew => "Join the crew",
            FormKind::Contact => "Contact us",
        }
    }
}

pub(crate) struct FormField {
    pub field: Field,
    pub label: &'static str,
    pub required: bool,
    pub value: String,
}

impl FormField {
    fn new(field: Field, label: &'static str, required: bool) -> Self {
        Self {
            field,
            label,
            required,
            value: String::new(),
        }
    }
}

pub(crate) struct FormState {
    pub kind: FormKind,
    pub fields: Vec<FormField>,
    pub focus: usize,
    pub error: Option<ValidationError>,
}

impl FormState {
    pub(crate) fn new(kind: FormKind) -> Self {
        let fields = match kind {
            FormKind::CreateEvent => vec![
                FormField::new(Field::Title, "Title", true),
                FormField::new(Field::Date, "Date (YYYY-MM-DD)", true),
                FormField::new(Field::Time, "Time (HH:MM)", true),
                FormField::new(Field::Location, "Location", true),
                FormField::new(Field::Coordinate, "Coordinates (lat, lon)", false),
                FormField::new(Field::Description, "Description", false),
            ],
            FormKind::JoinCrew => vec![
                FormField::new(Field::Name, "Name", true),
                FormField::new(Field::Email, "Email", true),
                FormField::new(Field::Motivation, "Why do you want to help?", true),
            ],
            FormKind::Contact => vec![
                FormField::new(Field::Name, "Name", true),
                FormField::new(Field::Email, "Email", true),
                FormField::new(Field::Message, "Message", true),
            ],
        };
        Self {
            kind,
            fields,
            focus: 0,
            error: None,
        }
    }

    pub(crate) fn focus_next(&mut self) {
        self.focus = (self.focus + 1) % self.fields.len().max(1);
    }

    pub(crate) fn focus_prev(&mut self) {
        let len = self.fields.len().max(1);
        self.focus = (self.focus + len - 1) % len;
    }

    pub(crate) fn focused_mut(&mut self) -> Option<&mut FormField> {
        self.fields.get_mut(self.focus)
    }

    fn value(&self, index: usize) -> String {
        self.fields
            .get(index)
            .map(|field| field.value.clone())
            .unwrap_or_default()
    }

    fn create_event(&self) -> CreateEventForm {
        CreateEventForm {
            title: self.value(0),
            date: self.value(1),
            time: self.value(2),
            location: self.value(3),
            coordinate: self.value(4),
            description: self.value(5),
        }
    }

    fn join_crew(&self) -> JoinCrewForm {
        JoinCrewForm::new(self.value(0), self.value(1), self.value(2))
    }

    fn contact(&self) -> ContactForm {
        ContactForm {
            name: self.value(0),
            email: self.value(1),
            message: self.value(2),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum WeatherLine {
    Loading,
    Ready(String),
    Unavailable,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum MapStatus {
    Loading,
    Ready,
    Failed,
}

/// Result of a background startup task.
#[derive(Debug)]
pub(crate) enum StartupUpdate {
    Weather(Result<WeatherReport, ShoreSquadError>),
    Map(Result<(), ShoreSquadError>),
}

pub(crate) struct App {
    pub service: ShoreSquadService,

    pub screen: Screen,
    pub previous_screen: Screen,
    pub filter: EventFilter,
    pub visible_events: Vec<Event>,
    pub event_list_index: usize,

    pub weather: WeatherLine,
    pub map_status: MapStatus,
    pub nearby: Option<NearbyReport>,
    pub form: Option<FormState>,

    pub notifications: NotificationCenter,
    pub is_loading: bool,
}

impl App {
    pub(crate) fn new(service: ShoreSquadService, notification_ttl: Duration) -> Self {
        let mut app = Self {
            service,
            screen: Screen::Events,
            previous_screen: Screen::Events,
            filter: EventFilter::All,
            visible_events: Vec::new(),
            event_list_index: 0,
            weather: WeatherLine::Loading,
            map_status: MapStatus::Loading,
            nearby: None,
            form: None,
            notifications: NotificationCenter::new(notification_ttl),
            is_loading: false,
        };
        app.refresh_events();
        app
    }

    /// Fetch weather and load the map in the background.
    ///
    /// Each result is sent as soon as it is ready, so a slow map never holds
    /// back the weather line or the input loop.
    pub(crate) fn spawn_startup(&self) -> mpsc::UnboundedReceiver<StartupUpdate> {
        let (tx, rx) = mpsc::unbounded_channel();

        let weather = self.service.weather_request();
        let weather_tx = tx.clone();
        tokio::spawn(async move {
            // The receiver is gone only when the app is shutting down.
            let _sent = weather_tx.send(StartupUpdate::Weather(weather.await));
        });

        let map = self.service.map_setup();
        tokio::spawn(async move {
            let _sent = tx.send(StartupUpdate::Map(map.await));
        });

        rx
    }

    pub(crate) fn apply_startup(&mut self, update: StartupUpdate) {
        match update {
            StartupUpdate::Weather(Ok(report)) => {
                self.weather = WeatherLine::Ready(report.to_string());
            }
            StartupUpdate::Weather(Err(err)) => {
                warn!(error = %err, "weather unavailable");
                self.weather = WeatherLine::Unavailable;
            }
            StartupUpdate::Map(Ok(())) => self.map_status = MapStatus::Ready,
            StartupUpdate::Map(Err(err)) => {
                warn!(error = %err, "map unavailable");
                self.map_status = MapStatus::Failed;
                self.notify(
                    NotificationLevel::Warning,
                    "Map failed to load. Event list is still available.",
                );
            }
        }
    }

    pub(crate) fn refresh_events(&mut self) {
        self.visible_events = self.service.events(self.filter);
        if self.event_list_index >= self.visible_events.len() {
            self.event_list_index = self.visible_events.len().saturating_sub(1);
        }
    }

    pub(crate) fn cycle_filter(&mut self) {
        self.filter = self.filter.next();
        self.event_list_index = 0;
        self.refresh_events();
    }

    pub(crate) fn selected_event(&self) -> Option<&Event> {
        self.visible_events.get(self.event_list_index)
    }

    pub(crate) fn open_form(&mut self, kind: FormKind) {
        if self.screen != Screen::Form {
            self.previous_screen = self.screen;
        }
        self.form = Some(FormState::new(kind));
        self.screen = Screen::Form;
    }

    pub(crate) fn close_form(&mut self) {
        self.form = None;
        self.screen = self.previous_screen;
    }

    pub(crate) fn notify<M: Into<String>>(&mut self, level: NotificationLevel, message: M) {
        self.notifications.push(level, message, Instant::now());
    }

    pub(crate) fn join_selected_event(&mut self) {
        let Some(event_id) = self.selected_event().map(|event| event.id.clone()) else {
            self.notify(NotificationLevel::Warning, "No event selected");
            return;
        };

        if self.service.has_joined(&event_id) {
            self.notify(NotificationLevel::Info, "You already joined this cleanup");
            return;
        }

        match self.service.join_event(&event_id) {
            Ok(participation) => {
                self.notify(
                    NotificationLevel::Success,
                    format!(
                        "You joined \"{}\"! See you at the cleanup!",
                        participation.event_title
                    ),
                );
                self.refresh_events();
            }
            Err(ShoreSquadError::MustJoinCrewFirst) => {
                self.notify(
                    NotificationLevel::Warning,
                    "Join the crew first, then pick your cleanup",
                );
                self.open_form(FormKind::JoinCrew);
            }
            Err(err) => self.notify(NotificationLevel::Error, err.to_string()),
        }
    }

    pub(crate) fn submit_form(&mut self) {
        let Some(form) = self.form.as_ref() else {
            return;
        };

        let outcome = match form.kind {
            FormKind::CreateEvent => self
                .service
                .create_event(&form.create_event())
                .map(|event| format!("Event \"{}\" created successfully!", event.title)),
            FormKind::JoinCrew => self
                .service
                .join_crew(&form.join_crew())
                .map(|member| format!("Welcome aboard, {}!", member.name)),
            FormKind::Contact => self.service.submit_contact(&form.contact()).map(|message| {
                format!(
                    "Thank you, {}! We'll get back to you soon at {}.",
                    message.name, message.email
                )
            }),
        };

        match outcome {
            Ok(message) => {
                self.close_form();
                self.refresh_events();
                self.notify(NotificationLevel::Success, message);
            }
            Err(ShoreSquadError::Validation(error)) => {
                let summary = error.to_string();
                if let Some(form) = self.form.as_mut() {
                    form.error = Some(error);
                }
                self.notify(NotificationLevel::Error, summary);
            }
            Err(err) => self.notify(NotificationLevel::Error, err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use shoresquad_core::{MemoryStore, ServiceSettings};
    use shoresquad_provider_simulated::{SimulatedSettings, capabilities};

    use super::*;

    fn app_with(settings: SimulatedSettings) -> App {
        let capabilities = capabilities(settings).with_store(Arc::new(MemoryStore::new()));
        let service = ShoreSquadService::new(capabilities, ServiceSettings::default());
        App::new(service, Duration::from_secs(4))
    }

    fn app() -> App {
        app_with(SimulatedSettings::default())
    }

    #[tokio::test(start_paused = true)]
    async fn weather_arrives_while_a_broken_map_is_still_loading() {
        let mut app = app_with(SimulatedSettings {
            map_available: false,
            ..SimulatedSettings::default()
        });
        let started = tokio::time::Instant::now();
        let mut updates = app.spawn_startup();

        let first = updates.recv().await.unwrap();
        assert!(matches!(first, StartupUpdate::Weather(Ok(_))));
        assert!(started.elapsed() < Duration::from_secs(1));
        app.apply_startup(first);
        assert_eq!(app.weather, WeatherLine::Ready("Sunny · 22°C · 65% humidity".into()));
        assert_eq!(app.map_status, MapStatus::Loading);

        let second = updates.recv().await.unwrap();
        assert!(started.elapsed() >= Duration::from_secs(5));
        app.apply_startup(second);
        assert_eq!(app.map_status, MapStatus::Failed);
        assert!(app.notifications.current(Instant::now()).is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn working_map_becomes_ready() {
        let mut app = app();
        let mut updates = app.spawn_startup();
        while let Some(update) = updates.recv().await {
            app.apply_startup(update);
        }
        assert_eq!(app.map_status, MapStatus::Ready);
        assert!(matches!(app.weather, WeatherLine::Ready(_)));
        assert_eq!(app.service.map_state().markers.len(), 3);
    }

    fn type_into(app: &mut App, values: &[&str]) {
        let form = app.form.as_mut().unwrap();
        for (field, value) in form.fields.iter_mut().zip(values) {
            field.value = (*value).to_owned();
        }
    }

    #[test]
    fn joining_without_crew_opens_the_join_form() {
        let mut app = app();
        app.join_selected_event();
        assert_eq!(app.screen, Screen::Form);
        assert_eq!(app.form.as_ref().unwrap().kind, FormKind::JoinCrew);
    }

    #[test]
    fn invalid_submission_keeps_form_open_with_errors() {
        let mut app = app();
        app.open_form(FormKind::JoinCrew);
        type_into(&mut app, &["Alice", "not-an-email", "x"]);
        app.submit_form();

        let form = app.form.as_ref().unwrap();
        assert!(form.error.as_ref().unwrap().cites(Field::Email));
        assert_eq!(app.screen, Screen::Form);
    }

    #[test]
    fn joining_crew_then_event_marks_it_joined() {
        let mut app = app();
        app.open_form(FormKind::JoinCrew);
        type_into(&mut app, &["Alice", "a@b.com", "x"]);
        app.submit_form();
        assert_eq!(app.screen, Screen::Events);
        assert!(app.form.is_none());

        app.join_selected_event();
        let selected = app.selected_event().unwrap();
        assert!(app.service.has_joined(&selected.id));
        assert_eq!(selected.crew_count, 13);
    }

    #[test]
    fn form_focus_wraps_both_ways() {
        let mut form = FormState::new(FormKind::Contact);
        form.focus_prev();
        assert_eq!(form.focus, 2);
        form.focus_next();
        assert_eq!(form.focus, 0);
    }

    #[test]
    fn filter_cycle_resets_selection() {
        let mut app = app();
        app.event_list_index = 2;
        app.cycle_filter();
        assert_eq!(app.filter, EventFilter::ThisWeek);
        assert_eq!(app.event_list_index, 0);
    }
}
