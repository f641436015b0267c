//! Color theme and glyphs for the AuthEase TUI.
//!
//! Uses the Kanagawa Wave palette by default with an optional high-contrast
//! override.

use ratatui::style::{Color, Modifier, Style};

use authease_types::Verdict;

/// Kanagawa Wave color palette constants.
mod colors {
    use super::Color;

    // === Backgrounds (Sumi Ink) ===
    pub const BG_DARK: Color = Color::Rgb(22, 22, 29); // sumiInk0
    pub const BG_PANEL: Color = Color::Rgb(31, 31, 40); // sumiInk3
    pub const BG_HIGHLIGHT: Color = Color::Rgb(42, 42, 55); // sumiInk4
    pub const BG_POPUP: Color = Color::Rgb(54, 54, 70); // sumiInk5
    pub const BG_BORDER: Color = Color::Rgb(84, 84, 109); // sumiInk6

    // === Foregrounds (Fuji) ===
    pub const TEXT_PRIMARY: Color = Color::Rgb(220, 215, 186); // fujiWhite
    pub const TEXT_SECONDARY: Color = Color::Rgb(200, 192, 147); // oldWhite
    pub const TEXT_MUTED: Color = Color::Rgb(114, 113, 105); // fujiGray

    // === Primary/Brand ===
    pub const PRIMARY: Color = Color::Rgb(149, 127, 184); // oniViolet

    // === Accent Colors ===
    pub const CYAN: Color = Color::Rgb(127, 180, 202); // springBlue
    pub const GREEN: Color = Color::Rgb(152, 187, 108); // springGreen
    pub const YELLOW: Color = Color::Rgb(230, 195, 132); // carpYellow
    pub const ORANGE: Color = Color::Rgb(255, 160, 102); // surimiOrange
    pub const RED: Color = Color::Rgb(255, 93, 98); // peachRed
}

/// Resolved theme palette used by the UI.
#[derive(Debug, Clone, Copy)]
pub struct Palette {
    pub bg_dark: Color,
    pub bg_panel: Color,
    pub bg_highlight: Color,
    pub bg_popup: Color,
    pub bg_border: Color,
    pub text_primary: Color,
    pub text_secondary: Color,
    pub text_muted: Color,
    pub primary: Color,
    pub accent: Color,
    pub green: Color,
    pub yellow: Color,
    pub peach: Color,
    pub red: Color,
}

impl Palette {
    #[must_use]
    pub fn standard() -> Self {
        Self {
            bg_dark: colors::BG_DARK,
            bg_panel: colors::BG_PANEL,
            bg_highlight: colors::BG_HIGHLIGHT,
            bg_popup: colors::BG_POPUP,
            bg_border: colors::BG_BORDER,
            text_primary: colors::TEXT_PRIMARY,
            text_secondary: colors::TEXT_SECONDARY,
            text_muted: colors::TEXT_MUTED,
            primary: colors::PRIMARY,
            accent: colors::CYAN,
            green: colors::GREEN,
            yellow: colors::YELLOW,
            peach: colors::ORANGE,
            red: colors::RED,
        }
    }

    #[must_use]
    pub fn high_contrast() -> Self {
        Self {
            bg_dark: Color::Black,
            bg_panel: Color::Black,
            bg_highlight: Color::DarkGray,
            bg_popup: Color::Black,
            bg_border: Color::Gray,
            text_primary: Color::White,
            text_secondary: Color::Gray,
            text_muted: Color::DarkGray,
            primary: Color::White,
            accent: Color::Cyan,
            green: Color::Green,
            yellow: Color::Yellow,
            peach: Color::Yellow,
            red: Color::Red,
        }
    }

    /// Color for a verdict band, from green (real) to red (AI).
    #[must_use]
    pub fn verdict(&self, verdict: Verdict) -> Color {
        match verdict {
            Verdict::RealContent => self.green,
            Verdict::LikelyReal => self.yellow,
            Verdict::LikelyAiGenerated => self.peach,
            Verdict::AiGenerated => self.red,
        }
    }
}

/// Display preferences from `[app]` in the config file.
#[derive(Debug, Clone, Copy, Default)]
pub struct UiOptions {
    pub ascii_only: bool,
    pub high_contrast: bool,
}

#[must_use]
pub fn palette(options: UiOptions) -> Palette {
    if options.high_contrast {
        Palette::high_contrast()
    } else {
        Palette::standard()
    }
}

/// ASCII/Unicode glyphs for icons and spinners.
#[derive(Debug, Clone, Copy)]
pub struct Glyphs {
    pub bullet: &'static str,
    pub selected: &'static str,
    pub correct: &'static str,
    pub incorrect: &'static str,
    pub ai: &'static str,
    pub human: &'static str,
    pub arrow_left: &'static str,
    pub arrow_right: &'static str,
    pub separator: &'static str,
    pub spinner_frames: &'static [&'static str],
}

const SPINNER_FRAMES: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];
const SPINNER_FRAMES_ASCII: &[&str] = &["|", "/", "-", "\\"];

#[must_use]
pub fn glyphs(options: UiOptions) -> Glyphs {
    if options.ascii_only {
        Glyphs {
            bullet: "*",
            selected: ">",
            correct: "OK",
            incorrect: "X",
            ai: "[AI]",
            human: "[HUMAN]",
            arrow_left: "<",
            arrow_right: ">",
            separator: "|",
            spinner_frames: SPINNER_FRAMES_ASCII,
        }
    } else {
        Glyphs {
            bullet: "•",
            selected: "▸",
            correct: "✓",
            incorrect: "✗",
            ai: "◆ AI",
            human: "● HUMAN",
            arrow_left: "◂",
            arrow_right: "▸",
            separator: "│",
            spinner_frames: SPINNER_FRAMES,
        }
    }
}

#[must_use]
pub fn spinner_frame(tick: usize, options: UiOptions) -> &'static str {
    let frames = glyphs(options).spinner_frames;
    frames[tick % frames.len()]
}

/// Pre-defined styles for common UI elements.
pub mod styles {
    use super::{Modifier, Palette, Style};

    #[must_use]
    pub fn title(palette: &Palette) -> Style {
        Style::default()
            .fg(palette.primary)
            .add_modifier(Modifier::BOLD)
    }

    #[must_use]
    pub fn tab_active(palette: &Palette) -> Style {
        Style::default()
            .fg(palette.bg_dark)
            .bg(palette.accent)
            .add_modifier(Modifier::BOLD)
    }

    #[must_use]
    pub fn tab_inactive(palette: &Palette) -> Style {
        Style::default().fg(palette.text_secondary)
    }

    #[must_use]
    pub fn border(palette: &Palette) -> Style {
        Style::default().fg(palette.bg_border)
    }

    #[must_use]
    pub fn key_hint(palette: &Palette) -> Style {
        Style::default().fg(palette.text_muted)
    }

    #[must_use]
    pub fn key_highlight(palette: &Palette) -> Style {
        Style::default()
            .fg(palette.peach)
            .add_modifier(Modifier::BOLD)
    }
}

#[cfg(test)]
mod tests {
    use authease_types::Verdict;

    use super::{Palette, UiOptions, colors, glyphs, spinner_frame};

    #[test]
    fn spinner_frame_cycles() {
        let options = UiOptions::default();
        assert_ne!(spinner_frame(0, options), spinner_frame(1, options));
        assert_eq!(spinner_frame(0, options), spinner_frame(10, options));
    }

    #[test]
    fn ascii_glyphs_are_ascii() {
        let options = UiOptions {
            ascii_only: true,
            high_contrast: false,
        };
        let g = glyphs(options);
        for glyph in [g.bullet, g.selected, g.correct, g.incorrect, g.ai, g.human] {
            assert!(glyph.is_ascii(), "{glyph}");
        }
        assert!(g.spinner_frames.iter().all(|f| f.is_ascii()));
        assert_eq!(spinner_frame(5, options), "/");
    }

    #[test]
    fn verdict_colors_run_green_to_red() {
        let palette = Palette::high_contrast();
        assert_eq!(palette.verdict(Verdict::RealContent), palette.green);
        assert_eq!(palette.verdict(Verdict::LikelyReal), palette.yellow);
        assert_eq!(palette.verdict(Verdict::AiGenerated), palette.red);

        let standard = Palette::standard();
        assert_eq!(standard.verdict(Verdict::LikelyReal), colors::YELLOW);
        assert_eq!(standard.verdict(Verdict::LikelyAiGenerated), standard.peach);
    }
}
