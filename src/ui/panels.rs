//! Panel widgets: lists, grids, tiles, the detail pane and modals
//!
//! Every panel is drawn from the scene's item order and labels. The item
//! holding focus is inverted; an unfocused panel still marks the item it
//! will restore when focus comes back.

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap},
    Frame,
};

use super::{centered, Theme};
use crate::app::{App, InputMode};
use crate::models::{CatalogKind, DetailRecord};
use crate::playback::resume::format_position;
use crate::scene::{self, Scene, GRID_COLUMNS};

fn panel_block(scene: &Scene, zone: &str, title: &str) -> Block<'static> {
    let focused = scene.graph.focus_within(zone);
    Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(if focused {
            Theme::border_focused()
        } else {
            Theme::border()
        })
        .title(Span::styled(format!(" {} ", title), Theme::title()))
}

fn item_style(scene: &Scene, zone: &str, key: &str) -> Style {
    if scene.graph.is_focused(key) {
        Theme::focused()
    } else if scene.graph.last_focused_child(zone) == Some(key) {
        Theme::remembered()
    } else {
        Theme::text()
    }
}

/// Index of the item to keep on screen
fn anchor(scene: &Scene, zone: &str, items: &[String]) -> Option<usize> {
    let key = scene
        .graph
        .focused()
        .filter(|k| items.iter().any(|i| i == *k))
        .or_else(|| scene.graph.last_focused_child(zone))?;
    items.iter().position(|i| i == key)
}

/// Vertical list panel (profiles, categories)
pub fn render_list(frame: &mut Frame, area: Rect, scene: &Scene, zone: &str) {
    let Some(panel) = scene.panel(zone) else {
        return;
    };
    let block = panel_block(scene, zone, &panel.title);

    let items: Vec<ListItem> = panel
        .items
        .iter()
        .map(|key| {
            let label = scene.label(key).unwrap_or(key);
            ListItem::new(Line::from(Span::styled(
                format!(" {} ", label),
                item_style(scene, zone, key),
            )))
        })
        .collect();

    let mut state = ListState::default().with_selected(anchor(scene, zone, &panel.items));
    frame.render_stateful_widget(List::new(items).block(block), area, &mut state);
}

/// Grid panel, `GRID_COLUMNS` cells per row, scrolled to the focused row
pub fn render_grid(frame: &mut Frame, area: Rect, scene: &Scene, zone: &str) {
    let Some(panel) = scene.panel(zone) else {
        return;
    };
    let title = if scene.streams.len() > scene.visible {
        format!("{} ({} of {})", panel.title, scene.visible, scene.streams.len())
    } else if !panel.items.is_empty() {
        format!("{} ({})", panel.title, panel.items.len())
    } else {
        panel.title.clone()
    };
    let block = panel_block(scene, zone, &title);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    if panel.items.is_empty() {
        let hint = if scene.loading.is_loading() {
            Span::styled("⟳ Loading...", Theme::loading())
        } else {
            Span::styled(empty_grid_hint(scene), Theme::dimmed())
        };
        frame.render_widget(
            Paragraph::new(Line::from(hint)).alignment(Alignment::Center),
            inner,
        );
        return;
    }

    let cell_width = (inner.width as usize / GRID_COLUMNS).max(1);
    let rows: Vec<Line> = panel
        .items
        .chunks(GRID_COLUMNS)
        .map(|row| {
            Line::from(
                row.iter()
                    .map(|key| {
                        let label = scene.label(key).unwrap_or(key);
                        Span::styled(fit(label, cell_width), item_style(scene, zone, key))
                    })
                    .collect::<Vec<_>>(),
            )
        })
        .collect();

    let focused_row = anchor(scene, zone, &panel.items).unwrap_or(0) / GRID_COLUMNS;
    let height = inner.height.max(1) as usize;
    let offset = focused_row.saturating_sub(height - 1);
    let visible: Vec<Line> = rows.into_iter().skip(offset).take(height).collect();
    frame.render_widget(Paragraph::new(visible), inner);
}

fn empty_grid_hint(scene: &Scene) -> &'static str {
    match scene.kind {
        scene::SceneKind::Browse(_) if scene.selected_category.is_none() => "Select a category",
        scene::SceneKind::Search => "Type at least three characters and press Enter",
        scene::SceneKind::Favorites => "No favorites yet",
        scene::SceneKind::ContinueWatching => "Nothing to continue",
        _ => "Nothing here",
    }
}

/// Pad or cut `label` to exactly `width` columns
fn fit(label: &str, width: usize) -> String {
    let inner = width.saturating_sub(2);
    let mut text: String = label.chars().take(inner).collect();
    if label.chars().count() > inner && inner > 0 {
        text.pop();
        text.push('…');
    }
    format!(" {:<w$} ", text, w = inner)
}

/// Landing tiles, one box per item
pub fn render_tiles(frame: &mut Frame, area: Rect, scene: &Scene, zone: &str) {
    let Some(panel) = scene.panel(zone) else {
        return;
    };
    let area = centered(area, 100, 40);
    let constraints: Vec<Constraint> = panel
        .items
        .iter()
        .map(|_| Constraint::Ratio(1, panel.items.len().max(1) as u32))
        .collect();
    let cells = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(constraints)
        .split(area);

    for (key, cell) in panel.items.iter().zip(cells.iter()) {
        let focused = scene.graph.is_focused(key);
        let label = scene.label(key).unwrap_or(key);
        let tile = Paragraph::new(vec![Line::from(""), Line::from(label.to_string())])
            .alignment(Alignment::Center)
            .style(if focused { Theme::focused() } else { Theme::text() })
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_type(BorderType::Rounded)
                    .border_style(if focused {
                        Theme::border_focused()
                    } else {
                        Theme::border()
                    }),
            );
        frame.render_widget(tile, *cell);
    }
}

/// Detail pane: metadata on top, actions below
pub fn render_detail(frame: &mut Frame, area: Rect, scene: &Scene) {
    let Some(panel) = scene.panel(scene::DETAIL) else {
        return;
    };
    let block = panel_block(scene, scene::DETAIL, &panel.title);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let mut meta: Vec<Line> = Vec::new();
    match (&scene.detail, &scene.selected_stream) {
        (None, None) if scene.selected_history.is_some() => {
            if let Some(record) = &scene.selected_history {
                meta.push(Line::from(Span::styled(record.to_string(), Theme::title())));
                meta.push(Line::from(Span::styled(
                    format!("You left off at {}", format_position(record.last_position_secs)),
                    Theme::secondary(),
                )));
            }
        }
        (Some(DetailRecord::Movie(m)), _) => {
            meta.push(Line::from(Span::styled(m.name.clone(), Theme::title())));
            let facts: Vec<String> = [
                m.release_date.clone(),
                m.genre.clone(),
                m.duration_secs.map(|d| format!("{}m", d / 60)),
                m.rating.filter(|r| *r > 0.0).map(|r| format!("★ {:.1}", r)),
            ]
            .into_iter()
            .flatten()
            .collect();
            meta.push(Line::from(Span::styled(facts.join(" · "), Theme::secondary())));
            if let Some(director) = &m.director {
                meta.push(Line::from(Span::styled(format!("Director: {}", director), Theme::dimmed())));
            }
            if let Some(cast) = &m.cast {
                meta.push(Line::from(Span::styled(format!("Cast: {}", cast), Theme::dimmed())));
            }
        }
        (Some(DetailRecord::Series(s)), _) => {
            meta.push(Line::from(Span::styled(s.name.clone(), Theme::title())));
            let facts: Vec<String> = [
                s.release_date.clone(),
                s.genre.clone(),
                Some(format!("{} seasons", s.season_numbers().len())),
            ]
            .into_iter()
            .flatten()
            .collect();
            meta.push(Line::from(Span::styled(facts.join(" · "), Theme::secondary())));
        }
        (None, Some(stream)) if stream.kind == CatalogKind::Live => {
            meta.push(Line::from(Span::styled(stream.name.clone(), Theme::title())));
            meta.push(Line::from(Span::styled("Live channel", Theme::secondary())));
        }
        (None, Some(stream)) if scene.loading.is_loading() => {
            meta.push(Line::from(Span::styled(stream.name.clone(), Theme::title())));
            meta.push(Line::from(Span::styled("⟳ Loading...", Theme::loading())));
        }
        _ => {
            meta.push(Line::from(Span::styled("Select a title", Theme::dimmed())));
        }
    }
    if let Some(plot) = scene.detail.as_ref().and_then(|d| d.plot()) {
        meta.push(Line::from(""));
        meta.push(Line::from(Span::styled(plot.to_string(), Theme::text())));
    }
    meta.push(Line::from(""));

    let meta_height = (meta.len() as u16 + 2).min(inner.height / 2);
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(meta_height), Constraint::Min(1)])
        .split(inner);
    frame.render_widget(Paragraph::new(meta).wrap(Wrap { trim: true }), rows[0]);

    let items: Vec<ListItem> = panel
        .items
        .iter()
        .map(|key| {
            let label = scene.label(key).unwrap_or(key);
            ListItem::new(Span::styled(
                format!(" {} ", label),
                item_style(scene, scene::DETAIL, key),
            ))
        })
        .collect();
    let mut state = ListState::default().with_selected(anchor(scene, scene::DETAIL, &panel.items));
    frame.render_stateful_widget(List::new(items), rows[1], &mut state);
}

/// Search box plus the content kind selector
pub fn render_search_bar(frame: &mut Frame, area: Rect, app: &App) {
    let scene = &app.scene;
    let editing = app.input_mode == InputMode::Editing;
    let query = &app.search.query;

    let text = if editing {
        let split = query
            .char_indices()
            .nth(app.search.cursor)
            .map(|(i, _)| i)
            .unwrap_or(query.len());
        let (before, after) = query.split_at(split);
        format!("⌕ {}│{}", before, after)
    } else if query.is_empty() {
        "⌕ Press Enter to type...".to_string()
    } else {
        format!("⌕ {}", query)
    };

    let input_style = if editing {
        Theme::input().fg(Theme::PRIMARY)
    } else if scene.graph.is_focused(scene::SEARCH_INPUT_KEY) {
        Theme::focused()
    } else {
        Theme::input()
    };

    let mut spans = vec![Span::styled(format!(" {} ", text), input_style), Span::raw("   ")];
    for kind in [CatalogKind::Movies, CatalogKind::Series, CatalogKind::Live] {
        let key = scene::search_kind_key(kind);
        let style = if scene.graph.is_focused(&key) {
            Theme::focused()
        } else if scene.search_kind == kind {
            Theme::remembered()
        } else {
            Theme::dimmed()
        };
        spans.push(Span::styled(format!(" {} ", kind), style));
        spans.push(Span::raw(" "));
    }

    let block = panel_block(scene, scene::SEARCH_BAR, "Search");
    frame.render_widget(Paragraph::new(Line::from(spans)).block(block), area);
}

/// Centered modal for `zone`
pub fn render_modal(frame: &mut Frame, area: Rect, scene: &Scene, zone: &str) {
    let Some(panel) = scene.panel(zone) else {
        return;
    };
    let height = panel.items.len() as u16 + 4;
    let width = 44.min(area.width.saturating_sub(4));
    let popup = Rect {
        x: area.x + area.width.saturating_sub(width) / 2,
        y: area.y + area.height.saturating_sub(height) / 2,
        width,
        height: height.min(area.height),
    };
    frame.render_widget(Clear, popup);

    let mut lines = vec![Line::from("")];
    for key in &panel.items {
        let label = scene.label(key).unwrap_or(key);
        lines.push(Line::from(Span::styled(
            format!("  {}  ", label),
            item_style(scene, zone, key),
        )));
    }
    let modal = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Double)
                .border_style(Theme::border_focused())
                .title(Span::styled(format!(" {} ", panel.title), Theme::title()))
                .style(Theme::text()),
        );
    frame.render_widget(modal, popup);
}
