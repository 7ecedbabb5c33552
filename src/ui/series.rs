//! Tracked series list

use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{List, ListItem},
    Frame,
};

use crate::app::App;
use crate::models::ShowSummary;
use crate::ui::{panel, render_loading_state, render_message, window_start, Theme};

pub fn render(frame: &mut Frame, area: Rect, app: &App) {
    let series = &app.series;
    let filter = if series.only_missing {
        "missing only"
    } else {
        "all"
    };
    let block = panel(
        format!("SERIES ({}) [{}]", series.shows.len(), filter),
        true,
    );
    let inner = block.inner(area);
    frame.render_widget(block, area);

    if render_loading_state(frame, inner, &series.loading) {
        return;
    }

    if series.shows.is_empty() {
        let text = if series.only_missing {
            "Nothing missing. Press a to list all shows."
        } else {
            "No shows tracked"
        };
        render_message(frame, inner, text, Theme::dimmed());
        return;
    }

    let height = inner.height as usize;
    let start = window_start(&series.list, height);
    let items: Vec<ListItem> = series
        .shows
        .iter()
        .enumerate()
        .skip(start)
        .take(height)
        .map(|(i, show)| render_item(show, i == series.list.selected))
        .collect();

    frame.render_widget(List::new(items).style(Theme::text()), inner);
}

fn render_item(show: &ShowSummary, is_selected: bool) -> ListItem<'static> {
    let mut spans = vec![
        Span::styled(
            if is_selected { "▸ " } else { "  " },
            if is_selected {
                Theme::accent()
            } else {
                Theme::dimmed()
            },
        ),
        Span::styled(
            show.metadata.title.clone(),
            if is_selected {
                Theme::highlighted()
            } else {
                Theme::text()
            },
        ),
    ];

    if let Some(year) = show.metadata.year {
        spans.push(Span::styled(format!(" ({})", year), Theme::year()));
    }

    if !show.missing_seasons.is_empty() {
        let seasons: Vec<String> = show
            .missing_seasons
            .iter()
            .map(|s| format!("S{:02}", s))
            .collect();
        spans.push(Span::raw("  "));
        spans.push(Span::styled(
            format!("missing {}", seasons.join(" ")),
            Theme::missing(),
        ));
    }

    ListItem::new(Line::from(spans))
}
