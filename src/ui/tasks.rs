//! Background task triggers

use ratatui::{
    layout::{Alignment, Rect},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::app::{App, TaskStatus};
use crate::ui::{panel, Theme};

pub fn render(frame: &mut Frame, area: Rect, app: &App) {
    let block = panel("TASKS", true);

    let status = match &app.tasks {
        TaskStatus::Idle => Line::from(vec![
            Span::styled("  ↵  ", Theme::keybind()),
            Span::styled("Sync all shows with the series manager", Theme::dimmed()),
        ]),
        TaskStatus::Confirming => Line::from(vec![
            Span::styled("Sync all shows now? ", Theme::warning()),
            Span::styled("[y]", Theme::keybind()),
            Span::styled("es / ", Theme::dimmed()),
            Span::styled("[n]", Theme::keybind()),
            Span::styled("o", Theme::dimmed()),
        ]),
        TaskStatus::Pending => Line::from(Span::styled("⟳ Sync all requested...", Theme::in_progress())),
        TaskStatus::Done => Line::from(Span::styled("✓ Sync all started", Theme::success())),
        TaskStatus::Failed(msg) => Line::from(Span::styled(format!("✗ Sync all failed: {}", msg), Theme::error())),
    };

    let content = Paragraph::new(vec![
        Line::from(""),
        Line::from(Span::styled("SYNC ALL", Theme::accent())),
        Line::from(""),
        status,
    ])
    .alignment(Alignment::Center)
    .block(block);

    frame.render_widget(content, area);
}
