use std::time::Instant;

use ratatui::{
    prelude::*,
    widgets::{
        Block, Borders, Cell, Clear, List, ListItem, Paragraph, Row, Table, TableState, Tabs, Wrap,
        canvas::{Canvas, Map, MapResolution},
    },
};
use shoresquad_core::{MarkerKind, notification::NotificationLevel};

use crate::app::{App, FormState, MapStatus, Screen, WeatherLine};

/// Longitude half-span shown at zoom level 0.
const WORLD_HALF_SPAN_DEG: f64 = 640.0;

pub(crate) fn draw(frame: &mut Frame<'_>, app: &App) {
    let area = frame.area();

    // Outer layout: title, tabs, main content, status line
    let layout_chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(1),
            Constraint::Min(0),
            Constraint::Length(3),
        ])
        .split(area);

    let chunks = layout_chunks.as_ref();
    let [header_area, tabs_area, content_area, status_area] = chunks else {
        return;
    };

    draw_header(frame, app, *header_area);
    draw_tabs(frame, app, *tabs_area);

    // The form is an overlay; keep the screen underneath visible.
    let base_screen = if app.screen == Screen::Form {
        app.previous_screen
    } else {
        app.screen
    };
    match base_screen {
        Screen::Events | Screen::Form => draw_events(frame, app, *content_area),
        Screen::Crew => draw_crew(frame, app, *content_area),
        Screen::Map => draw_map(frame, app, *content_area),
        Screen::Nearby => draw_nearby(frame, app, *content_area),
    }

    if let Some(form) = app.form.as_ref()
        && app.screen == Screen::Form
    {
        draw_form(frame, form, area);
    }

    draw_status(frame, app, *status_area);
}

fn draw_header(frame: &mut Frame<'_>, app: &App, area: Rect) {
    let weather = match &app.weather {
        WeatherLine::Loading => "Checking the surf…".to_owned(),
        WeatherLine::Ready(line) => line.clone(),
        WeatherLine::Unavailable => "Weather unavailable".to_owned(),
    };
    let location = &app.service.settings().weather_location;

    let header = Paragraph::new(Line::from(vec![
        Span::styled(
            "ShoreSquad",
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        ),
        Span::raw(" – rally your crew, track weather, hit the next beach cleanup"),
    ]))
    .block(
        Block::default()
            .borders(Borders::ALL)
            .title(format!("{location}: {weather}")),
    );
    frame.render_widget(header, area);
}

fn draw_tabs(frame: &mut Frame<'_>, app: &App, area: Rect) {
    let selected = match app.screen {
        Screen::Crew => 1,
        Screen::Map => 2,
        Screen::Events | Screen::Nearby | Screen::Form => 0,
    };
    let tabs = Tabs::new(vec!["1 Events", "2 Crew", "3 Map"])
        .select(selected)
        .highlight_style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        );
    frame.render_widget(tabs, area);
}

fn draw_events(frame: &mut Frame<'_>, app: &App, area: Rect) {
    let layout_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(0),    // table
            Constraint::Length(4), // description
        ])
        .split(area);

    let chunks = layout_chunks.as_ref();
    let [table_area, detail_area] = chunks else {
        return;
    };

    let title = format!("Upcoming cleanups [{}] (↑/↓, f filter, Enter join)", app.filter);

    if app.visible_events.is_empty() {
        let paragraph = Paragraph::new("No cleanups match this filter. Press f to try another.")
            .block(Block::default().borders(Borders::ALL).title(title))
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, area);
        return;
    }

    let rows = app.visible_events.iter().map(|event| {
        let joined = app.service.has_joined(&event.id);
        let action = if joined {
            Cell::from("✅ Joined").style(Style::default().fg(Color::Green))
        } else {
            Cell::from("Join")
        };

        Row::new(vec![
            Cell::from(event.date.format("%a %d %b %Y").to_string()),
            Cell::from(event.time.format("%H:%M").to_string()),
            Cell::from(event.title.clone()),
            Cell::from(event.location.clone()),
            Cell::from(event.difficulty.to_string()),
            Cell::from(format!("{} going", event.crew_count)),
            action,
        ])
    });

    let column_widths = [
        Constraint::Length(16),
        Constraint::Length(6),
        Constraint::Min(20),
        Constraint::Min(16),
        Constraint::Length(9),
        Constraint::Length(9),
        Constraint::Length(9),
    ];

    let table = Table::new(rows, column_widths)
        .header(
            Row::new(vec!["Date", "Time", "Cleanup", "Where", "Level", "Crew", ""])
                .style(Style::default().add_modifier(Modifier::BOLD)),
        )
        .block(Block::default().borders(Borders::ALL).title(title))
        .row_highlight_style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )
        .column_spacing(1);

    let mut state = TableState::default();
    state.select(Some(app.event_list_index));
    frame.render_stateful_widget(table, *table_area, &mut state);

    let description = app
        .selected_event()
        .map_or("", |event| event.description.as_str());
    let detail = Paragraph::new(description)
        .block(Block::default().borders(Borders::ALL).title("About"))
        .wrap(Wrap { trim: true });
    frame.render_widget(detail, *detail_area);
}

fn draw_crew(frame: &mut Frame<'_>, app: &App, area: Rect) {
    let layout_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(5), Constraint::Min(0)])
        .split(area);

    let chunks = layout_chunks.as_ref();
    let [stats_area, members_area] = chunks else {
        return;
    };

    let stats = app.service.crew_stats();
    let summary = Paragraph::new(vec![
        Line::from(format!("Crew members: {}", stats.member_count)),
        Line::from(format!("Cleanups attended: {}", stats.total_cleanups_attended)),
        Line::from(format!(
            "Estimated trash collected: {} kg",
            stats.estimated_trash_collected
        )),
    ])
    .block(Block::default().borders(Borders::ALL).title("Crew stats"));
    frame.render_widget(summary, *stats_area);

    let items = if app.service.members().is_empty() {
        vec![ListItem::new("Nobody here yet. Press j to join the crew.")]
    } else {
        app.service
            .members()
            .iter()
            .map(|member| {
                ListItem::new(format!(
                    "{} <{}> · joined {}",
                    member.name,
                    member.email,
                    member.joined_date.format("%d %b %Y")
                ))
            })
            .collect()
    };

    let list = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .title("Members (j to join)"),
    );
    frame.render_widget(list, *members_area);
}

fn draw_map(frame: &mut Frame<'_>, app: &App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title("Cleanup map (n find nearby)");

    match app.map_status {
        MapStatus::Loading => {
            let paragraph = Paragraph::new("Loading map…").block(block);
            frame.render_widget(paragraph, area);
            return;
        }
        MapStatus::Failed => {
            let paragraph = Paragraph::new("Map failed to load. Event list is still available.")
                .style(Style::default().fg(Color::Red))
                .block(block)
                .wrap(Wrap { trim: true });
            frame.render_widget(paragraph, area);
            return;
        }
        MapStatus::Ready => {}
    }

    let state = app.service.map_state();
    let center = state
        .center
        .unwrap_or(app.service.settings().map.center);
    let lon_half_span = WORLD_HALF_SPAN_DEG / 2_f64.powi(i32::from(state.zoom));
    let lat_half_span = lon_half_span / 2.0;

    let canvas = Canvas::default()
        .block(block)
        .x_bounds([
            center.longitude - lon_half_span,
            center.longitude + lon_half_span,
        ])
        .y_bounds([
            center.latitude - lat_half_span,
            center.latitude + lat_half_span,
        ])
        .paint(|ctx| {
            ctx.draw(&Map {
                resolution: MapResolution::High,
                color: Color::DarkGray,
            });
            ctx.layer();
            for marker in &state.markers {
                let (symbol, color) = match marker.kind {
                    MarkerKind::Cleanup => ("● ", Color::Cyan),
                    MarkerKind::UserLocation => ("◆ ", Color::Yellow),
                };
                ctx.print(
                    marker.coordinate.longitude,
                    marker.coordinate.latitude,
                    Line::from(vec![
                        Span::styled(symbol, Style::default().fg(color)),
                        Span::raw(marker.title.clone()),
                    ]),
                );
            }
        });
    frame.render_widget(canvas, area);
}

fn draw_nearby(frame: &mut Frame<'_>, app: &App, area: Rect) {
    let Some(report) = app.nearby.as_ref() else {
        let paragraph = Paragraph::new("Press n to find cleanups near you.")
            .block(Block::default().borders(Borders::ALL).title("Nearby"));
        frame.render_widget(paragraph, area);
        return;
    };

    let items = report
        .lines()
        .into_iter()
        .map(ListItem::new)
        .collect::<Vec<ListItem<'_>>>();

    let list = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .title(format!("{} (Esc/b back)", report.headline())),
    );
    frame.render_widget(list, area);
}

fn draw_form(frame: &mut Frame<'_>, form: &FormState, area: Rect) {
    let popup = centered_rect(60, 60, area);
    frame.render_widget(Clear, popup);

    let mut lines = Vec::new();
    for (idx, field) in form.fields.iter().enumerate() {
        let has_issue = form
            .error
            .as_ref()
            .is_some_and(|error| error.cites(field.field));
        let focused = idx == form.focus;

        let mut label_style = Style::default().add_modifier(Modifier::BOLD);
        if has_issue {
            label_style = label_style.fg(Color::Red);
        } else if focused {
            label_style = label_style.fg(Color::Yellow);
        }

        let marker = if field.required { " *" } else { "" };
        lines.push(Line::from(Span::styled(
            format!("{}{marker}", field.label),
            label_style,
        )));

        let cursor = if focused { "▏" } else { "" };
        let prefix = if focused { "> " } else { "  " };
        lines.push(Line::from(format!("{prefix}{}{cursor}", field.value)));
        lines.push(Line::default());
    }

    if let Some(error) = form.error.as_ref() {
        for issue in error.issues() {
            lines.push(Line::from(Span::styled(
                issue.to_string(),
                Style::default().fg(Color::Red),
            )));
        }
    }

    let paragraph = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!(
                    "{} (Tab next · Enter submit · Esc cancel)",
                    form.kind.title()
                )),
        )
        .wrap(Wrap { trim: false });
    frame.render_widget(paragraph, popup);
}

fn draw_status(frame: &mut Frame<'_>, app: &App, area: Rect) {
    let nav_hint = match app.screen {
        Screen::Events => concat!(
            "↑/↓ move · Enter join · f filter · n nearby · ",
            "c create · j join crew · m contact · Esc dismiss · q quit"
        ),
        Screen::Crew | Screen::Map => "1/2/3 switch view · n nearby · Esc back · q quit",
        Screen::Nearby => "Esc/b back to events · q quit",
        Screen::Form => "Tab/↓ next field · Shift-Tab/↑ previous · Enter submit · Esc cancel",
    };

    let notification = app.notifications.current(Instant::now());

    let status_text = if app.is_loading {
        format!("Loading… · {nav_hint}")
    } else if let Some(notification) = notification {
        notification.message.clone()
    } else {
        nav_hint.to_owned()
    };

    let status_style = match notification.map(|notification| notification.level) {
        _ if app.is_loading => Style::default().fg(Color::Yellow),
        Some(NotificationLevel::Success) => Style::default().fg(Color::Green),
        Some(NotificationLevel::Warning) => Style::default().fg(Color::Yellow),
        Some(NotificationLevel::Error) => Style::default().fg(Color::Red),
        Some(NotificationLevel::Info) => Style::default().fg(Color::Cyan),
        None => Style::default(),
    };

    let status = Paragraph::new(status_text)
        .block(Block::default().borders(Borders::ALL).title("Status"))
        .style(status_style)
        .wrap(Wrap { trim: true });

    frame.render_widget(status, area);
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);
    let Some(middle) = vertical.get(1) else {
        return area;
    };

    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(*middle);
    horizontal.get(1).copied().unwrap_or(area)
}
