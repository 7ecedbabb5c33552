//! Backend log table

use ratatui::{
    layout::{Constraint, Rect},
    text::Span,
    widgets::{Cell, Row, Table},
    Frame,
};

use crate::app::App;
use crate::ui::{panel, render_loading_state, render_message, window_start, Theme};

pub fn render(frame: &mut Frame, area: Rect, app: &App) {
    let logs = &app.logs;
    let block = panel(format!("LOGS ({})", logs.records.len()), true);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    if render_loading_state(frame, inner, &logs.loading) {
        return;
    }

    if logs.records.is_empty() {
        render_message(frame, inner, "No log records", Theme::dimmed());
        return;
    }

    let height = (inner.height as usize).saturating_sub(1);
    let start = window_start(&logs.list, height);
    let rows: Vec<Row> = logs
        .records
        .iter()
        .enumerate()
        .skip(start)
        .take(height)
        .map(|(i, entry)| {
            let row = Row::new(vec![
                Cell::from(Span::styled(entry.time_display(), Theme::dimmed())),
                Cell::from(Span::styled(
                    entry.level.to_uppercase(),
                    Theme::log_level(&entry.level),
                )),
                Cell::from(Span::styled(entry.component.clone(), Theme::secondary())),
                Cell::from(entry.message.clone()),
            ]);
            if i == logs.list.selected {
                row.style(Theme::highlighted())
            } else {
                row
            }
        })
        .collect();

    let header = Row::new(vec!["TIME", "LEVEL", "COMPONENT", "MESSAGE"]).style(Theme::title());
    let table = Table::new(
        rows,
        [
            Constraint::Length(19),
            Constraint::Length(8),
            Constraint::Length(16),
            Constraint::Min(20),
        ],
    )
    .header(header)
    .style(Theme::text());
    frame.render_widget(table, inner);
}
