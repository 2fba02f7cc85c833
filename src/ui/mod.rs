//! Terminal UI
//!
//! Pure rendering of `App` state with ratatui. Nothing here mutates the
//! app; focus, panels and labels all come from the current scene.

pub mod panels;
pub mod player;
pub mod theme;

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph},
    Frame,
};

use crate::app::{App, InputMode};
use crate::scene::{self, SceneKind};

pub use theme::Theme;

/// Draw the whole screen
pub fn render(frame: &mut Frame, app: &App) {
    let area = frame.area();

    frame.render_widget(Clear, area);
    frame.render_widget(Block::default().style(Theme::text()), area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(1),    // Content
            Constraint::Length(1), // Status bar
        ])
        .split(area);

    render_header(frame, chunks[0], app);
    render_content(frame, chunks[1], app);
    render_status_bar(frame, chunks[2], app);

    if app.scene.is_modal_open() {
        panels::render_modal(frame, area, &app.scene, scene::RESUME);
    }
    if let Some(ref error) = app.error {
        render_error_popup(frame, area, error);
    }
}

fn render_header(frame: &mut Frame, area: Rect, app: &App) {
    let account = match (&app.profile, &app.account) {
        (Some(p), Some(a)) => format!("{} · {} ", p.profile_name, a.status),
        _ => String::new(),
    };
    let line = Line::from(vec![
        Span::styled(" COUCH", Theme::title()),
        Span::styled("TV ", Theme::secondary()),
        Span::styled(format!(" {} ", app.scene.kind.title()), Theme::text()),
    ]);
    let header = Paragraph::new(line).block(
        Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Theme::border())
            .title_top(Line::from(Span::styled(account, Theme::dimmed())).right_aligned()),
    );
    frame.render_widget(header, area);
}

fn render_content(frame: &mut Frame, area: Rect, app: &App) {
    let scene = &app.scene;
    match scene.kind {
        SceneKind::Login => {
            if scene.panel(scene::PROFILES).is_some_and(|p| p.items.is_empty()) {
                let hint = Paragraph::new(vec![
                    Line::from(""),
                    Line::from(Span::styled("No saved profiles", Theme::title())),
                    Line::from(""),
                    Line::from(Span::styled(
                        "Add one with: couchtv login <name> --url <host> --username <user> --password <pass>",
                        Theme::dimmed(),
                    )),
                ])
                .alignment(Alignment::Center);
                frame.render_widget(hint, area);
            } else {
                let cols = Layout::default()
                    .direction(Direction::Horizontal)
                    .constraints([Constraint::Percentage(65), Constraint::Percentage(35)])
                    .split(centered(area, 60, 80));
                panels::render_list(frame, cols[0], scene, scene::PROFILES);
                panels::render_list(frame, cols[1], scene, scene::MANAGE);
            }
        }
        SceneKind::Landing => panels::render_tiles(frame, area, scene, scene::TILES),
        SceneKind::Browse(_) => {
            let cols = Layout::default()
                .direction(Direction::Horizontal)
                .constraints([
                    Constraint::Percentage(22),
                    Constraint::Percentage(48),
                    Constraint::Percentage(30),
                ])
                .split(area);
            panels::render_list(frame, cols[0], scene, scene::SIDEBAR);
            panels::render_grid(frame, cols[1], scene, scene::GRID);
            panels::render_detail(frame, cols[2], scene);
        }
        SceneKind::Favorites | SceneKind::ContinueWatching => {
            let cols = two_columns(area);
            panels::render_grid(frame, cols[0], scene, scene::GRID);
            panels::render_detail(frame, cols[1], scene);
        }
        SceneKind::Search => {
            let rows = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Length(3), Constraint::Min(1)])
                .split(area);
            panels::render_search_bar(frame, rows[0], app);
            let cols = two_columns(rows[1]);
            panels::render_grid(frame, cols[0], scene, scene::GRID);
            panels::render_detail(frame, cols[1], scene);
        }
        SceneKind::Player => player::render(frame, area, app),
    }
}

fn two_columns(area: Rect) -> std::rc::Rc<[Rect]> {
    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(62), Constraint::Percentage(38)])
        .split(area)
}

fn render_status_bar(frame: &mut Frame, area: Rect, app: &App) {
    let mode = match app.input_mode {
        InputMode::Normal => Span::styled(" NAV ", Theme::focused()),
        InputMode::Editing => Span::styled(" TYPE ", Theme::focused().bg(Theme::SECONDARY)),
    };

    let message = if let Some(msg) = app.scene.loading.message() {
        let style = if app.scene.loading.is_error() {
            Theme::error()
        } else {
            Theme::loading()
        };
        Span::styled(format!(" {} ", msg), style)
    } else if let Some(status) = &app.status {
        Span::styled(format!(" {} ", status), Theme::success())
    } else {
        Span::raw("")
    };

    let help = match app.scene.kind {
        SceneKind::Player => " ←→:seek  ↵:play/pause  ESC:stop ",
        SceneKind::Search => " /:type  ↵:select  ESC:back  q:quit ",
        _ => " ←↑↓→:move  ↵:select  ESC:back  q:quit ",
    };

    let line = Line::from(vec![
        mode,
        message,
        Span::raw(" │ "),
        Span::styled(help, Theme::dimmed()),
    ]);
    frame.render_widget(Paragraph::new(line).style(Theme::status_bar()), area);
}

fn render_error_popup(frame: &mut Frame, area: Rect, error: &str) {
    let popup = Rect {
        x: area.x + area.width.saturating_sub(60.min(area.width)) / 2,
        y: area.y + area.height.saturating_sub(5) / 2,
        width: 60.min(area.width.saturating_sub(4)),
        height: 5.min(area.height),
    };
    frame.render_widget(Clear, popup);

    let block = Paragraph::new(vec![
        Line::from(""),
        Line::from(Span::styled(error, Theme::error())),
    ])
    .alignment(Alignment::Center)
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Double)
            .border_style(Theme::error())
            .title(Span::styled(" ✗ ERROR ", Theme::error()))
            .style(Theme::text()),
    );
    frame.render_widget(block, popup);
}

/// Rectangle of `percent_x` by `percent_y` centered in `area`
pub fn centered(area: Rect, percent_x: u16, percent_y: u16) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);
    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1])[1]
}
