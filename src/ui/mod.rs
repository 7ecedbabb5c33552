//! Terminal UI components
//!
//! Built with ratatui. Every screen renders from `&App`; state changes only
//! happen in `app` and the acquisition controller.

pub mod logs;
pub mod screen;
pub mod series;
pub mod show;
pub mod tasks;
pub mod theme;

use ratatui::{
    layout::{Alignment, Rect},
    text::Span,
    widgets::{Block, BorderType, Borders, Paragraph},
    Frame,
};

use crate::app::{ListState, LoadingState};

pub use screen::render_app;
pub use theme::Theme;

/// First row to draw so the selection stays inside `height` rows.
///
/// Derived from the selection alone; the window keeps the selected row on
/// its last line once the selection passes the first page.
pub fn window_start(list: &ListState, height: usize) -> usize {
    list.selected.saturating_sub(height.saturating_sub(1))
}

/// Rounded block with a styled title
pub fn panel(title: impl Into<String>, focused: bool) -> Block<'static> {
    Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(if focused {
            Theme::border_focused()
        } else {
            Theme::border()
        })
        .title(Span::styled(format!(" {} ", title.into()), Theme::title()))
}

/// Centered one-line message inside `area`
pub fn render_message(frame: &mut Frame, area: Rect, text: &str, style: ratatui::style::Style) {
    let msg = Paragraph::new(text.to_string())
        .style(style)
        .alignment(Alignment::Center);
    frame.render_widget(msg, area);
}

/// Loading/error placeholder; returns true if something was drawn
pub fn render_loading_state(frame: &mut Frame, area: Rect, loading: &LoadingState) -> bool {
    match loading {
        LoadingState::Loading(msg) => {
            let text = format!("⟳ {}", msg.as_deref().unwrap_or("Loading..."));
            render_message(frame, area, &text, Theme::loading());
            true
        }
        LoadingState::Error(msg) => {
            render_message(frame, area, &format!("✗ {}", msg), Theme::error());
            true
        }
        LoadingState::Idle => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_window_start_follows_selection() {
        let mut list = ListState::new(20);
        assert_eq!(window_start(&list, 5), 0);

        list.selected = 4;
        assert_eq!(window_start(&list, 5), 0);

        list.selected = 7;
        assert_eq!(window_start(&list, 5), 3);

        list.selected = 2;
        assert_eq!(window_start(&list, 5), 0);

        assert_eq!(window_start(&list, 0), 2);
    }

    #[test]
    fn test_window_start_scrolls_back_one_row_at_a_time() {
        let mut list = ListState::new(30);
        list.last();
        assert_eq!(window_start(&list, 5), 25);

        let mut starts = Vec::new();
        for _ in 0..6 {
            list.up();
            starts.push(window_start(&list, 5));
        }
        assert_eq!(starts, vec![24, 23, 22, 21, 20, 19]);
        for (i, start) in starts.iter().enumerate() {
            let selected = 28 - i;
            assert!(*start <= selected && selected < start + 5);
        }
    }
}
