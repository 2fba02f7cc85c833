//! Couch theme
//!
//! Palette and style helpers. Colors are picked to stay readable from
//! across a room: high-contrast focus highlight, muted everything else.

use ratatui::style::{Color, Modifier, Style};

pub struct Theme;

impl Theme {
    /// #101418 (near-black slate)
    pub const BACKGROUND: Color = Color::Rgb(0x10, 0x14, 0x18);
    /// #1b2128, panels and the status bar
    pub const SURFACE: Color = Color::Rgb(0x1b, 0x21, 0x28);
    /// #f5a623 (amber), the focus color
    pub const PRIMARY: Color = Color::Rgb(0xf5, 0xa6, 0x23);
    /// #5ec8e5 (sky)
    pub const SECONDARY: Color = Color::Rgb(0x5e, 0xc8, 0xe5);
    pub const TEXT: Color = Color::Rgb(0xe8, 0xe6, 0xe3);
    pub const DIM: Color = Color::Rgb(0x7a, 0x80, 0x88);
    pub const SUCCESS: Color = Color::Rgb(0x6f, 0xcf, 0x6f);
    pub const ERROR: Color = Color::Rgb(0xff, 0x5a, 0x5a);
    pub const FRAME: Color = Color::Rgb(0x3a, 0x42, 0x4c);

    fn fg(color: Color) -> Style {
        Style::new().fg(color)
    }

    fn bold(color: Color) -> Style {
        Self::fg(color).add_modifier(Modifier::BOLD)
    }

    /// Body text on the page background
    pub fn text() -> Style {
        Self::fg(Self::TEXT).bg(Self::BACKGROUND)
    }

    /// Focused item: inverted on the focus color
    pub fn focused() -> Style {
        Self::bold(Self::BACKGROUND).bg(Self::PRIMARY)
    }

    /// Remembered item of an unfocused panel
    pub fn remembered() -> Style {
        Self::bold(Self::PRIMARY)
    }

    pub fn title() -> Style {
        Self::bold(Self::PRIMARY)
    }

    pub fn dimmed() -> Style {
        Self::fg(Self::DIM)
    }

    pub fn secondary() -> Style {
        Self::fg(Self::SECONDARY)
    }

    pub fn keybind() -> Style {
        Self::secondary()
    }

    pub fn loading() -> Style {
        Self::bold(Self::SECONDARY)
    }

    pub fn success() -> Style {
        Self::bold(Self::SUCCESS)
    }

    pub fn error() -> Style {
        Self::bold(Self::ERROR)
    }

    pub fn border() -> Style {
        Self::fg(Self::FRAME)
    }

    /// Border of the panel holding focus
    pub fn border_focused() -> Style {
        Self::bold(Self::PRIMARY)
    }

    /// Search field and status bar
    pub fn input() -> Style {
        Self::fg(Self::TEXT).bg(Self::SURFACE)
    }

    pub fn status_bar() -> Style {
        Self::input()
    }

    pub fn progress_bar() -> Style {
        Self::fg(Self::PRIMARY).bg(Self::SURFACE)
    }
}

/// 8-bit sRGB triple
pub type Rgb = (u8, u8, u8);

/// Relative luminance, https://www.w3.org/TR/WCAG20/#relativeluminancedef
pub fn relative_luminance((r, g, b): Rgb) -> f64 {
    let linear = |channel: u8| {
        let v = f64::from(channel) / 255.0;
        if v <= 0.03928 {
            v / 12.92
        } else {
            ((v + 0.055) / 1.055).powf(2.4)
        }
    };
    0.2126 * linear(r) + 0.7152 * linear(g) + 0.0722 * linear(b)
}

/// Contrast ratio between 1 (same color) and 21 (black on white)
pub fn contrast_ratio(fg: Rgb, bg: Rgb) -> f64 {
    let a = relative_luminance(fg);
    let b = relative_luminance(bg);
    (a.max(b) + 0.05) / (a.min(b) + 0.05)
}

/// WCAG AA for normal text
pub fn meets_wcag_aa(fg: Rgb, bg: Rgb) -> bool {
    contrast_ratio(fg, bg) >= 4.5
}

pub fn color_to_rgb(color: Color) -> Option<Rgb> {
    if let Color::Rgb(r, g, b) = color {
        Some((r, g, b))
    } else {
        None
    }
}
