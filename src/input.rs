//! Logical input signals
//!
//! Everything the core reacts to is one of six signals. Hosts translate
//! their own key events: terminal keys via crossterm, or raw remote-control
//! key codes (TV platforms report Back as 10009).

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind};
use serde::{Deserialize, Serialize};

use crate::focus::Direction;

/// Remote-control Back key code on TV platforms
pub const REMOTE_BACK: u32 = 10009;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InputSignal {
    Up,
    Down,
    Left,
    Right,
    Enter,
    Back,
}

impl InputSignal {
    /// Direction for the four arrow signals
    pub fn direction(self) -> Option<Direction> {
        match self {
            InputSignal::Up => Some(Direction::Up),
            InputSignal::Down => Some(Direction::Down),
            InputSignal::Left => Some(Direction::Left),
            InputSignal::Right => Some(Direction::Right),
            InputSignal::Enter | InputSignal::Back => None,
        }
    }

    /// Map a terminal key event
    ///
    /// Arrows and vim keys move, Enter activates, Esc and Backspace go back.
    pub fn from_key(key: &KeyEvent) -> Option<Self> {
        if key.kind == KeyEventKind::Release {
            return None;
        }
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => Some(InputSignal::Up),
            KeyCode::Down | KeyCode::Char('j') => Some(InputSignal::Down),
            KeyCode::Left | KeyCode::Char('h') => Some(InputSignal::Left),
            KeyCode::Right | KeyCode::Char('l') => Some(InputSignal::Right),
            KeyCode::Enter | KeyCode::Char(' ') => Some(InputSignal::Enter),
            KeyCode::Esc | KeyCode::Backspace => Some(InputSignal::Back),
            _ => None,
        }
    }

    /// Map a platform key code (DOM `keyCode` numbering)
    pub fn from_remote_code(code: u32) -> Option<Self> {
        match code {
            37 => Some(InputSignal::Left),
            38 => Some(InputSignal::Up),
            39 => Some(InputSignal::Right),
            40 => Some(InputSignal::Down),
            13 => Some(InputSignal::Enter),
            8 | 27 | REMOTE_BACK => Some(InputSignal::Back),
            _ => None,
        }
    }
}
