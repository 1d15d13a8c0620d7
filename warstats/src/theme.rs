//! Color themes.
//!
//! Two built-in themes:
//!
//! - `dark` uses the ANSI 16 colors, so it works on any terminal.
//! - `catppuccin_mocha` uses the Catppuccin Mocha palette in RGB and needs
//!   truecolor.

use ratatui::style::Color;
use warstats_core::types::Faction;

/// Colors for every surface the viewer draws. Callers read fields directly,
/// e.g. `Style::default().fg(theme.border_active)`.
#[derive(Debug, Clone)]
pub struct Theme {
    // Panel borders
    pub border_active: Color,
    pub border_inactive: Color,

    // Factions
    pub warden: Color,
    pub colonial: Color,

    // Roster rows
    /// Rank badge of a player who opened a new rank.
    pub rank_ranked: Color,
    /// Rank badge `-` of a tied player.
    pub rank_tied: Color,
    pub commends: Color,
    pub username: Color,
    /// Secondary text: steam ids, dates, hints.
    pub muted: Color,

    // Overlays
    /// Background of the highlighted entry in the selector and search hits.
    pub highlight_bg: Color,
    pub highlight_fg: Color,

    // Status bar
    pub status_bar_bg: Color,
    pub status_bar_fg: Color,
    /// Mode indicator in NORMAL mode.
    pub status_mode_normal: Color,
    /// Mode indicator in SEARCH and SELECT modes.
    pub status_mode_input: Color,
    pub error: Color,
}

impl Theme {
    /// The built-in ANSI 16-color theme, and the fallback for unknown names.
    pub fn dark() -> Self {
        Self {
            border_active: Color::Cyan,
            border_inactive: Color::DarkGray,

            warden: Color::Blue,
            colonial: Color::Green,

            rank_ranked: Color::Yellow,
            rank_tied: Color::DarkGray,
            commends: Color::Cyan,
            username: Color::Reset,
            muted: Color::DarkGray,

            highlight_bg: Color::Cyan,
            highlight_fg: Color::Black,

            status_bar_bg: Color::DarkGray,
            status_bar_fg: Color::White,
            status_mode_normal: Color::Cyan,
            status_mode_input: Color::Green,
            error: Color::Red,
        }
    }

    /// Catppuccin Mocha in RGB truecolor.
    ///
    /// Palette source: <https://github.com/catppuccin/catppuccin> Mocha variant.
    pub fn catppuccin_mocha() -> Self {
        let green = Color::Rgb(166, 227, 161); // #a6e3a1
        let red = Color::Rgb(243, 139, 168); // #f38ba8
        let yellow = Color::Rgb(249, 226, 175); // #f9e2af
        let blue = Color::Rgb(137, 180, 250); // #89b4fa
        let teal = Color::Rgb(148, 226, 213); // #94e2d5
        let lavender = Color::Rgb(180, 190, 254); // #b4befe
        let overlay1 = Color::Rgb(127, 132, 156); // #7f849c
        let surface1 = Color::Rgb(69, 71, 90); // #45475a
        let base = Color::Rgb(30, 30, 46); // #1e1e2e
        let text = Color::Rgb(205, 214, 244); // #cdd6f4
        let peach = Color::Rgb(250, 179, 135); // #fab387

        Self {
            border_active: lavender,
            border_inactive: overlay1,

            warden: blue,
            colonial: green,

            rank_ranked: peach,
            rank_tied: overlay1,
            commends: teal,
            username: text,
            muted: overlay1,

            highlight_bg: lavender,
            highlight_fg: base,

            status_bar_bg: surface1,
            status_bar_fg: text,
            status_mode_normal: lavender,
            status_mode_input: yellow,
            error: red,
        }
    }

    /// Accent color for a faction's panel title and winner badge.
    pub fn faction(&self, faction: Faction) -> Color {
        match faction {
            Faction::Warden => self.warden,
            Faction::Colonial => self.colonial,
        }
    }

    /// Resolves a theme name from config. Unknown names fall back to `dark()`
    /// with a warning in the log.
    pub fn from_name(name: &str) -> Self {
        match name {
            "catppuccin-mocha" | "catppuccin_mocha" => Self::catppuccin_mocha(),
            "dark" => Self::dark(),
            other => {
                tracing::warn!(theme = other, "unknown theme, falling back to 'dark'");
                Self::dark()
            }
        }
    }
}
