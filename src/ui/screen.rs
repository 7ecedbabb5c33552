//! Screen chrome: header, content dispatch, status bar

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph},
    Frame,
};

use crate::acquisition::ActionState;
use crate::app::{App, InputMode, Route};
use crate::ui::{logs, series, show, tasks, Theme};

/// Main render function - dispatches to route-specific renderers
pub fn render_app(frame: &mut Frame, app: &App) {
    let area = frame.area();

    frame.render_widget(Clear, area);
    frame.render_widget(Block::default().style(Style::default().bg(Theme::BACKGROUND)), area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(1),    // Content
            Constraint::Length(1), // Status bar
        ])
        .split(area);

    render_header(frame, chunks[0], app);
    match app.route {
        Route::Series => series::render(frame, chunks[1], app),
        Route::Show(_) => show::render(frame, chunks[1], app),
        Route::Logs => logs::render(frame, chunks[1], app),
        Route::Tasks => tasks::render(frame, chunks[1], app),
    }
    render_status_bar(frame, chunks[2], app);
}

fn render_header(frame: &mut Frame, area: Rect, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(16), Constraint::Min(1)])
        .split(area);

    let block = || {
        Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Theme::border())
    };

    let logo = Paragraph::new(Line::from(vec![
        Span::styled(
            "SERIES",
            Style::default()
                .fg(Theme::PRIMARY)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            "TUI",
            Style::default()
                .fg(Theme::SECONDARY)
                .add_modifier(Modifier::BOLD),
        ),
    ]))
    .alignment(Alignment::Center)
    .block(block());
    frame.render_widget(logo, chunks[0]);

    let nav = [
        ("1", Route::Series),
        ("2", Route::Logs),
        ("3", Route::Tasks),
    ];
    let mut spans = Vec::new();
    for (key, route) in nav {
        let active = std::mem::discriminant(&app.route) == std::mem::discriminant(&route);
        spans.push(Span::styled(format!(" {} ", key), Theme::keybind()));
        spans.push(Span::styled(
            format!("{} ", route.title()),
            if active {
                Theme::tab_active()
            } else {
                Theme::tab_inactive()
            },
        ));
        spans.push(Span::raw(" "));
    }
    if let Route::Show(_) = app.route {
        spans.push(Span::styled(" SHOW ", Theme::tab_active()));
    }
    spans.push(Span::styled(format!("  {}", app.route), Theme::dimmed()));

    frame.render_widget(Paragraph::new(Line::from(spans)).block(block()), chunks[1]);
}

/// Short label for the acquisition state, shown in the status bar
pub fn action_label(app: &App) -> Option<String> {
    let view = app.show_view()?;
    match view.action_state() {
        ActionState::Idle => None,
        ActionState::SearchInFlight => Some("SEARCHING…".to_string()),
        ActionState::GrabInFlight(pk) => Some(format!("GRABBING {}…", pk)),
    }
}

fn help_text(app: &App) -> &'static str {
    match (&app.route, &app.input_mode) {
        (_, InputMode::Editing) => " ↵:search  ESC:done ",
        (Route::Series, _) => " ↵:open  a:all/missing  r:reload  q:quit ",
        (Route::Show(_), _) => " TAB:tabs  /:query  s:search  g:grab  ESC:back ",
        (Route::Logs, _) => " ↑↓:scroll  r:reload  ESC:back ",
        (Route::Tasks, _) => " ↵:sync all  ESC:back ",
    }
}

fn render_status_bar(frame: &mut Frame, area: Rect, app: &App) {
    let mode_indicator = match app.input_mode {
        InputMode::Normal => Span::styled(
            " NORMAL ",
            Style::default().fg(Theme::BACKGROUND).bg(Theme::PRIMARY),
        ),
        InputMode::Editing => Span::styled(
            " INSERT ",
            Style::default().fg(Theme::BACKGROUND).bg(Theme::ACCENT),
        ),
    };

    let mut spans = vec![
        mode_indicator,
        Span::styled(format!(" {} ", app.route.title()), Theme::dimmed()),
    ];
    if let Some(label) = action_label(app) {
        spans.push(Span::styled(format!(" {} ", label), Theme::in_progress()));
    }
    spans.push(Span::raw(" │ "));
    spans.push(Span::styled(help_text(app), Theme::dimmed()));

    frame.render_widget(Paragraph::new(Line::from(spans)).style(Theme::status_bar()), area);
}
