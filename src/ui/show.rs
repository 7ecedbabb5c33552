//! Show detail view
//!
//! Metadata panel, tab bar, and one body per tab. The search tab carries the
//! query box and the indexer results with a grab control per row.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Cell, List, ListItem, Paragraph, Row, Table, Tabs, Wrap},
    Frame,
};

use crate::acquisition::{ShowView, Tab};
use crate::app::{App, InputMode};
use crate::models::{IndexerHit, Show};
use crate::ui::{panel, render_message, window_start, Theme};

const GRAB_LABEL: &str = "[GRAB]";
const GRABBING_LABEL: &str = "GRABBING…";

/// Render the show route
pub fn render(frame: &mut Frame, area: Rect, app: &App) {
    let Some(view) = app.show_view() else {
        render_message(frame, area, "No show selected", Theme::dimmed());
        return;
    };

    // Nothing is fabricated before the first fetch lands
    let Some(show) = view.snapshot() else {
        let block = panel(format!("SHOW {}", view.show_id()), false);
        let inner = block.inner(area);
        frame.render_widget(block, area);
        render_message(frame, inner, "⟳ Loading show...", Theme::loading());
        return;
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(8), // Metadata
            Constraint::Length(1), // Tabs
            Constraint::Min(3),    // Body
        ])
        .split(area);

    render_metadata(frame, chunks[0], show);
    render_tabs(frame, chunks[1], view.active_tab());

    match view.active_tab() {
        Tab::Seasons => render_seasons(frame, chunks[2], show, app),
        Tab::Releases => render_releases(frame, chunks[2], show, app),
        Tab::Search => render_search(frame, chunks[2], view, show, app),
    }
}

fn render_metadata(frame: &mut Frame, area: Rect, show: &Show) {
    let meta = &show.metadata;
    let block = panel(meta.title.to_uppercase(), false);

    let mut header = vec![Span::styled(meta.title.clone(), Theme::accent())];
    if let Some(year) = meta.year {
        header.push(Span::styled(format!(" ({})", year), Theme::year()));
    }
    if let Some(title_en) = meta.title_en.as_deref().filter(|t| !t.is_empty()) {
        header.push(Span::styled(format!("  {}", title_en), Theme::dimmed()));
    }

    let mut facts = Vec::new();
    if let Some(country) = meta.country.as_deref().filter(|c| !c.is_empty()) {
        facts.push(Span::styled(country.to_string(), Theme::secondary()));
        facts.push(Span::raw("  "));
    }
    if !meta.genres.is_empty() {
        facts.push(Span::styled(meta.genres.join(" · "), Theme::dimmed()));
    }

    let lines = vec![
        Line::from(header),
        Line::from(facts),
        Line::from(""),
        Line::from(Span::styled(meta.overview.clone(), Theme::text())),
    ];

    let para = Paragraph::new(lines)
        .block(block)
        .wrap(Wrap { trim: true });
    frame.render_widget(para, area);
}

fn render_tabs(frame: &mut Frame, area: Rect, active: Tab) {
    let titles: Vec<Line> = Tab::ALL
        .iter()
        .map(|tab| Line::from(format!(" {} ", tab.label())))
        .collect();
    let selected = Tab::ALL.iter().position(|t| *t == active).unwrap_or(0);

    let tabs = Tabs::new(titles)
        .select(selected)
        .style(Theme::tab_inactive())
        .highlight_style(Theme::tab_active())
        .divider(Span::styled("│", Theme::dimmed()));
    frame.render_widget(tabs, area);
}

fn render_seasons(frame: &mut Frame, area: Rect, show: &Show, app: &App) {
    let seasons: Vec<_> = show.coverage.numbered().collect();
    let block = panel(format!("SEASONS ({})", seasons.len()), true);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    if seasons.is_empty() {
        render_message(frame, inner, "No season data", Theme::dimmed());
        return;
    }

    let height = inner.height as usize;
    let start = window_start(&app.show_list, height);
    let items: Vec<ListItem> = seasons
        .iter()
        .enumerate()
        .skip(start)
        .take(height)
        .map(|(i, season)| {
            let is_selected = i == app.show_list.selected;
            let episodes = Span::styled(
                format!("{:>4} episodes", season.episode_count),
                if season.episode_count == 0 {
                    Theme::missing()
                } else {
                    Theme::dimmed()
                },
            );
            let line = Line::from(vec![
                Span::styled(
                    if is_selected { "▸ " } else { "  " },
                    Theme::accent(),
                ),
                Span::styled(
                    format!("Season {:<3}", season.season_number),
                    if is_selected {
                        Theme::highlighted()
                    } else {
                        Theme::text()
                    },
                ),
                Span::raw(" "),
                episodes,
            ]);
            ListItem::new(line)
        })
        .collect();

    frame.render_widget(List::new(items).style(Theme::text()), inner);
}

fn render_releases(frame: &mut Frame, area: Rect, show: &Show, app: &App) {
    let block = panel(format!("RELEASES ({})", show.releases.len()), true);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    if show.releases.is_empty() {
        render_message(frame, inner, "No releases recorded", Theme::dimmed());
        return;
    }

    let height = (inner.height as usize).saturating_sub(1);
    let start = window_start(&app.show_list, height);
    let rows: Vec<Row> = show
        .releases
        .iter()
        .enumerate()
        .skip(start)
        .take(height)
        .map(|(i, release)| {
            let status = if release.torrent_is_finished {
                Cell::from(Span::styled("✓", Theme::success()))
            } else {
                Cell::from(Span::styled("…", Theme::dimmed()))
            };
            let row = Row::new(vec![
                status,
                Cell::from(release.name.clone()),
                Cell::from(Span::styled(release.search_term.clone(), Theme::secondary())),
                Cell::from(Span::styled(release.updated_at_display(), Theme::dimmed())),
            ]);
            if i == app.show_list.selected {
                row.style(Theme::highlighted())
            } else {
                row
            }
        })
        .collect();

    let header = Row::new(vec!["", "NAME", "SEARCH", "UPDATED"]).style(Theme::title());
    let table = Table::new(
        rows,
        [
            Constraint::Length(2),
            Constraint::Min(20),
            Constraint::Length(24),
            Constraint::Length(19),
        ],
    )
    .header(header)
    .style(Theme::text());
    frame.render_widget(table, inner);
}

fn render_search(frame: &mut Frame, area: Rect, view: &ShowView, show: &Show, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(3)])
        .split(area);

    render_query_box(frame, chunks[0], view, app);
    render_results(frame, chunks[1], view, show, app);
}

fn render_query_box(frame: &mut Frame, area: Rect, view: &ShowView, app: &App) {
    let editing = app.input_mode == InputMode::Editing;
    let default = view.default_query();

    let mut spans = vec![Span::styled("⌕ ", Theme::secondary())];
    if editing {
        let (before, after) = view.query().split_at_cursor(default);
        spans.push(Span::styled(before.to_string(), Theme::input()));
        spans.push(Span::styled("│", Theme::input_cursor()));
        spans.push(Span::styled(after.to_string(), Theme::input()));
    } else {
        spans.push(Span::styled(view.effective_query().to_string(), Theme::input()));
    }

    // Submit control
    let submit = if view.search_in_flight() {
        Span::styled("  SEARCHING…", Theme::in_progress())
    } else if app.acquisition.can_search() {
        Span::styled("  [s] SEARCH", Theme::keybind())
    } else {
        Span::styled("  [s] SEARCH", Theme::disabled())
    };
    spans.push(submit);

    let para = Paragraph::new(Line::from(spans)).block(panel("QUERY", editing));
    frame.render_widget(para, area);
}

/// Label and style of the grab control for one row
pub fn grab_control(view: &ShowView, hit: &IndexerHit, can_grab: bool) -> (&'static str, Style) {
    match view.grab_in_flight() {
        Some(pk) if pk == hit.primary_key => (GRABBING_LABEL, Theme::in_progress()),
        _ if can_grab => (GRAB_LABEL, Theme::grab_marker()),
        _ => (GRAB_LABEL, Theme::disabled()),
    }
}

fn render_results(frame: &mut Frame, area: Rect, view: &ShowView, show: &Show, app: &App) {
    let hits = &show.search_results;
    let block = panel(format!("RESULTS ({})", hits.len()), !matches!(app.input_mode, InputMode::Editing));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    if hits.is_empty() {
        render_message(frame, inner, "No results. Press s to search.", Theme::dimmed());
        return;
    }

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(2), Constraint::Length(1)])
        .split(inner);
    let (table_area, detail_area) = (chunks[0], chunks[1]);

    let can_grab = app.acquisition.can_grab();
    let height = (table_area.height as usize).saturating_sub(1);
    let start = window_start(&app.show_list, height);

    let rows: Vec<Row> = hits
        .iter()
        .enumerate()
        .skip(start)
        .take(height)
        .map(|(i, hit)| {
            let (label, style) = grab_control(view, hit, can_grab);
            let row = Row::new(vec![
                Cell::from(Span::styled(label, style)),
                Cell::from(hit.title.clone()),
                Cell::from(Span::styled(hit.indexer.clone(), Theme::secondary())),
                Cell::from(Span::styled(hit.age_descriptor(), Theme::dimmed())),
                Cell::from(Span::styled(hit.format_size(), Theme::file_size())),
                Cell::from(Span::styled(
                    format!("{}/{}", hit.seeders, hit.leechers),
                    Theme::seeds(hit.seeders),
                )),
                Cell::from(Span::styled(hit.grabs.to_string(), Theme::dimmed())),
            ]);
            if i == app.show_list.selected {
                row.style(Theme::highlighted())
            } else {
                row
            }
        })
        .collect();

    let header = Row::new(vec!["", "TITLE", "INDEXER", "AGE", "SIZE", "S/L", "GRABS"])
        .style(Theme::title());
    let table = Table::new(
        rows,
        [
            Constraint::Length(10),
            Constraint::Min(24),
            Constraint::Length(14),
            Constraint::Length(8),
            Constraint::Length(9),
            Constraint::Length(9),
            Constraint::Length(6),
        ],
    )
    .header(header)
    .style(Theme::text());
    frame.render_widget(table, table_area);

    let detail = match hits.get(app.show_list.selected) {
        Some(hit) if !hit.info_url.is_empty() => Line::from(vec![
            Span::styled("↗ ", Theme::secondary()),
            Span::styled(hit.info_url.clone(), Theme::secondary()),
        ]),
        _ => Line::from(Span::styled("no info link", Theme::dimmed())),
    };
    frame.render_widget(Paragraph::new(detail), detail_area);
}
