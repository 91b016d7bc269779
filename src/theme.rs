//! Named color palettes for the panel.

use ratatui::style::Color;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Theme {
    pub name: &'static str,
    pub background: Color,
    pub surface: Color,
    pub text: Color,
    pub muted: Color,
    pub accent: Color,
    pub highlight: Color,
    pub error: Color,
}

pub const THEMES: [Theme; 3] = [
    Theme {
        name: "light",
        background: Color::Rgb(0xf5, 0xf5, 0xf5),
        surface: Color::Rgb(0xff, 0xff, 0xff),
        text: Color::Rgb(0x20, 0x20, 0x20),
        muted: Color::Rgb(0x88, 0x88, 0x88),
        accent: Color::Rgb(0xcc, 0xcc, 0xcc),
        highlight: Color::Rgb(0xe0, 0xe0, 0xe0),
        error: Color::Rgb(0xc0, 0x39, 0x2b),
    },
    Theme {
        name: "dark",
        background: Color::Rgb(0x1e, 0x1e, 0x1e),
        surface: Color::Rgb(0x2a, 0x2a, 0x2a),
        text: Color::Rgb(0xe6, 0xe6, 0xe6),
        muted: Color::Rgb(0x7a, 0x7a, 0x7a),
        accent: Color::Rgb(0x4a, 0x90, 0xd9),
        highlight: Color::Rgb(0x3a, 0x3a, 0x3a),
        error: Color::Rgb(0xe7, 0x4c, 0x3c),
    },
    Theme {
        name: "nord",
        background: Color::Rgb(0x2e, 0x34, 0x40),
        surface: Color::Rgb(0x3b, 0x42, 0x52),
        text: Color::Rgb(0xec, 0xef, 0xf4),
        muted: Color::Rgb(0x81, 0xa1, 0xc1),
        accent: Color::Rgb(0x88, 0xc0, 0xd0),
        highlight: Color::Rgb(0x4c, 0x56, 0x6a),
        error: Color::Rgb(0xbf, 0x61, 0x6a),
    },
];

impl Theme {
    /// Look up a theme by name; unknown names get the first theme.
    pub fn by_name(name: &str) -> Theme {
        THEMES
            .iter()
            .copied()
            .find(|t| t.name.eq_ignore_ascii_case(name))
            .unwrap_or(THEMES[0])
    }

    pub fn next(&self) -> Theme {
        let idx = THEMES.iter().position(|t| t.name == self.name).unwrap_or(0);
        THEMES[(idx + 1) % THEMES.len()]
    }
}

impl Default for Theme {
    fn default() -> Self {
        THEMES[0]
    }
}
