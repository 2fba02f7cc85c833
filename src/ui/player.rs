//! Now Playing view
//!
//! Video itself renders in the player window; the terminal shows what is
//! playing, the position (the pending target while scrubbing) and the
//! controls.

use ratatui::{
    layout::{Alignment, Rect},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
    Frame,
};

use super::Theme;
use crate::app::App;
use crate::models::ContentKind;
use crate::playback::resume::format_position;
use crate::playback::{PlaybackSessionController, SessionState};

const BAR_WIDTH: usize = 40;

/// Filled cells of a `width`-cell progress bar
pub fn filled_cells(position: f64, duration: f64, width: usize) -> usize {
    if duration <= 0.0 {
        return 0;
    }
    let ratio = (position / duration).clamp(0.0, 1.0);
    ((ratio * width as f64).round() as usize).min(width)
}

fn title_line(player: &PlaybackSessionController) -> String {
    let Some(request) = player.request() else {
        return String::new();
    };
    match (request.season_number, request.episode_number) {
        (Some(s), Some(e)) => format!("{} S{:02}E{:02}", request.display_name, s, e),
        _ => request.display_name.clone(),
    }
}

pub fn render(frame: &mut Frame, area: Rect, app: &App) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Theme::border_focused())
        .title(Span::styled(" ▶ NOW PLAYING ", Theme::success()));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let Some(player) = app.player() else {
        frame.render_widget(
            Paragraph::new(Span::styled("Stopping...", Theme::loading())).alignment(Alignment::Center),
            inner,
        );
        return;
    };

    let is_live = player
        .request()
        .is_some_and(|r| r.content_kind == ContentKind::Live);
    let position = player.display_position();
    let duration = player.duration();
    let scrubbing = player.pending_target().is_some();

    let state = match (player.state(), scrubbing) {
        (_, true) => Span::styled("⇆ SEEKING", Theme::loading()),
        (SessionState::Paused, false) => Span::styled("❚❚ PAUSED", Theme::secondary()),
        (SessionState::Playing, false) => Span::styled("▶ PLAYING", Theme::success()),
        (SessionState::Idle, false) => Span::styled("■ STOPPED", Theme::dimmed()),
    };

    let mut lines = vec![
        Line::from(""),
        Line::from(Span::styled(title_line(player), Theme::title())),
        Line::from(""),
        Line::from(state),
        Line::from(""),
    ];

    if is_live {
        lines.push(Line::from(Span::styled("● LIVE", Theme::error())));
    } else {
        let filled = filled_cells(position, duration, BAR_WIDTH);
        lines.push(Line::from(vec![
            Span::styled("█".repeat(filled), Theme::progress_bar()),
            Span::styled("░".repeat(BAR_WIDTH - filled), Theme::dimmed()),
        ]));
        let total = if duration > 0.0 {
            format_position(duration)
        } else {
            "--:--".to_string()
        };
        lines.push(Line::from(Span::styled(
            format!("{} / {}", format_position(position), total),
            if scrubbing { Theme::title() } else { Theme::dimmed() },
        )));
    }

    lines.push(Line::from(""));
    lines.push(Line::from(vec![
        Span::styled(" ←→ ", Theme::keybind()),
        Span::styled(format!("Seek {}s  ", app_step(app)), Theme::dimmed()),
        Span::styled(" ↵ ", Theme::keybind()),
        Span::styled("Play/Pause  ", Theme::dimmed()),
        Span::styled(" ESC ", Theme::keybind()),
        Span::styled("Stop", Theme::dimmed()),
    ]));

    frame.render_widget(Paragraph::new(lines).alignment(Alignment::Center), inner);
}

fn app_step(app: &App) -> u64 {
    app.scrub_step().round() as u64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filled_cells() {
        assert_eq!(filled_cells(0.0, 100.0, 40), 0);
        assert_eq!(filled_cells(50.0, 100.0, 40), 20);
        assert_eq!(filled_cells(150.0, 100.0, 40), 40);
        // Unknown duration
        assert_eq!(filled_cells(30.0, 0.0, 40), 0);
    }
}
