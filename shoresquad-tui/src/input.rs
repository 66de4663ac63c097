use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::app::{App, FormKind, Screen};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Action {
    None,
    Quit,
    /// Run `service.find_nearby`() and show the ranking
    FindNearby,
    /// Run `service.join_event`(...) for the highlighted event
    JoinSelectedEvent,
    /// Validate and submit the open form
    SubmitForm,
}

pub(crate) fn handle_key_event(key: KeyEvent, app: &mut App) -> Action {
    use KeyCode::{Char, Down, Enter, Esc, Tab, Up};

    // Global quit shortcut
    if key.code == Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        return Action::Quit;
    }

    // Forms take every printable key, shortcuts included
    if app.screen == Screen::Form {
        return handle_form_key(key, app);
    }

    if !key.modifiers.is_empty() && key.modifiers != KeyModifiers::SHIFT {
        return Action::None;
    }

    match key.code {
        Char('q') => return Action::Quit,
        Char('n') => return Action::FindNearby,
        Char('1') => app.screen = Screen::Events,
        Char('2') => app.screen = Screen::Crew,
        Char('3') => app.screen = Screen::Map,
        Char('c') => app.open_form(FormKind::CreateEvent),
        Char('j') => app.open_form(FormKind::JoinCrew),
        Char('m') => app.open_form(FormKind::Contact),
        _ => {}
    }

    let mut action = Action::None;

    match app.screen {
        Screen::Events => match key.code {
            Up => {
                if app.event_list_index > 0 {
                    app.event_list_index -= 1;
                }
            }
            Down => {
                if app.event_list_index + 1 < app.visible_events.len() {
                    app.event_list_index += 1;
                }
            }
            Tab | Char('f') => app.cycle_filter(),
            Enter | Char(' ') => {
                action = Action::JoinSelectedEvent;
            }
            Esc => app.notifications.dismiss_all(),
            _ => {}
        },

        Screen::Nearby => match key.code {
            Esc | Char('b') => {
                app.screen = Screen::Events;
            }
            _ => {}
        },

        Screen::Crew | Screen::Map => {
            if key.code == Esc {
                app.screen = Screen::Events;
            }
        }

        Screen::Form => {}
    }
    action
}

fn handle_form_key(key: KeyEvent, app: &mut App) -> Action {
    use KeyCode::{BackTab, Backspace, Char, Down, Enter, Esc, Tab, Up};

    if key.code == Esc {
        app.close_form();
        return Action::None;
    }

    let Some(form) = app.form.as_mut() else {
        app.close_form();
        return Action::None;
    };

    match key.code {
        Tab | Down => form.focus_next(),
        BackTab | Up => form.focus_prev(),
        Enter => return Action::SubmitForm,
        Backspace => {
            if let Some(field) = form.focused_mut() {
                field.value.pop();
            }
        }
        Char(character) => {
            if !key.modifiers.contains(KeyModifiers::CONTROL)
                && !key.modifiers.contains(KeyModifiers::ALT)
                && let Some(field) = form.focused_mut()
            {
                field.value.push(character);
            }
        }
        _ => {}
    }
    Action::None
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::{Duration, Instant};

    use shoresquad_core::{
        EventFilter, MemoryStore, ServiceSettings, ShoreSquadService,
        notification::NotificationLevel,
    };
    use shoresquad_provider_simulated::{SimulatedSettings, capabilities};

    use super::*;

    fn app() -> App {
        let capabilities =
            capabilities(SimulatedSettings::default()).with_store(Arc::new(MemoryStore::new()));
        App::new(
            ShoreSquadService::new(capabilities, ServiceSettings::default()),
            Duration::from_secs(4),
        )
    }

    fn press(app: &mut App, code: KeyCode) -> Action {
        handle_key_event(KeyEvent::new(code, KeyModifiers::NONE), app)
    }

    #[test]
    fn quit_keys() {
        let mut app = app();
        assert_eq!(press(&mut app, KeyCode::Char('q')), Action::Quit);
        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(handle_key_event(ctrl_c, &mut app), Action::Quit);
    }

    #[test]
    fn event_list_selection_is_clamped() {
        let mut app = app();
        press(&mut app, KeyCode::Up);
        assert_eq!(app.event_list_index, 0);
        for _ in 0..10 {
            press(&mut app, KeyCode::Down);
        }
        assert_eq!(app.event_list_index, app.visible_events.len() - 1);
        assert_eq!(press(&mut app, KeyCode::Enter), Action::JoinSelectedEvent);
    }

    #[test]
    fn f_cycles_the_filter() {
        let mut app = app();
        press(&mut app, KeyCode::Char('f'));
        assert_eq!(app.filter, EventFilter::ThisWeek);
    }

    #[test]
    fn typing_in_a_form_does_not_trigger_shortcuts() {
        let mut app = app();
        press(&mut app, KeyCode::Char('m'));
        assert_eq!(app.screen, Screen::Form);

        for ch in "qnj".chars() {
            assert_eq!(press(&mut app, KeyCode::Char(ch)), Action::None);
        }
        press(&mut app, KeyCode::Backspace);
        assert_eq!(app.form.as_ref().unwrap().fields[0].value, "qn");

        press(&mut app, KeyCode::Tab);
        assert_eq!(app.form.as_ref().unwrap().focus, 1);
        assert_eq!(press(&mut app, KeyCode::Enter), Action::SubmitForm);

        press(&mut app, KeyCode::Esc);
        assert_eq!(app.screen, Screen::Events);
        assert!(app.form.is_none());
    }

    #[test]
    fn escape_on_events_clears_notifications() {
        let mut app = app();
        app.notify(NotificationLevel::Error, "Something went wrong");
        assert!(app.notifications.current(Instant::now()).is_some());

        press(&mut app, KeyCode::Esc);
        assert!(app.notifications.current(Instant::now()).is_none());
    }

    #[test]
    fn nearby_screen_goes_back_to_events() {
        let mut app = app();
        app.screen = Screen::Nearby;
        press(&mut app, KeyCode::Char('b'));
        assert_eq!(app.screen, Screen::Events);
    }
}
