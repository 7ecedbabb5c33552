//! Color palette and style helpers for seriestui
//!
//! A dark phosphor palette: amber for focus, teal for structure.

use ratatui::style::{Color, Modifier, Style};

/// Application color palette
pub struct Theme;

impl Theme {
    // ═══════════════════════════════════════════════════════════════════════
    // CORE PALETTE
    // ═══════════════════════════════════════════════════════════════════════

    /// Background: #101214
    pub const BACKGROUND: Color = Color::Rgb(0x10, 0x12, 0x14);

    /// Primary: #ffb000 (amber)
    pub const PRIMARY: Color = Color::Rgb(0xff, 0xb0, 0x00);

    /// Secondary: #3fc1c9 (teal)
    pub const SECONDARY: Color = Color::Rgb(0x3f, 0xc1, 0xc9);

    /// Accent: #f5f07a (pale yellow)
    pub const ACCENT: Color = Color::Rgb(0xf5, 0xf0, 0x7a);

    /// Text: #d8dee4
    pub const TEXT: Color = Color::Rgb(0xd8, 0xde, 0xe4);

    /// Dim: #5a626b
    pub const DIM: Color = Color::Rgb(0x5a, 0x62, 0x6b);

    /// Success: #5fd068
    pub const SUCCESS: Color = Color::Rgb(0x5f, 0xd0, 0x68);

    /// Warning: #ff8c42
    pub const WARNING: Color = Color::Rgb(0xff, 0x8c, 0x42);

    /// Error: #ff5555
    pub const ERROR: Color = Color::Rgb(0xff, 0x55, 0x55);

    // ═══════════════════════════════════════════════════════════════════════
    // DERIVED COLORS
    // ═══════════════════════════════════════════════════════════════════════

    /// Panels and the status bar
    pub const BACKGROUND_LIGHT: Color = Color::Rgb(0x1b, 0x1f, 0x23);

    pub const BORDER: Color = Color::Rgb(0x2e, 0x6b, 0x70);

    pub const BORDER_FOCUSED: Color = Self::PRIMARY;

    // ═══════════════════════════════════════════════════════════════════════
    // STYLE HELPERS
    // ═══════════════════════════════════════════════════════════════════════

    /// Default text style
    pub fn text() -> Style {
        Style::default().fg(Self::TEXT).bg(Self::BACKGROUND)
    }

    /// Selected row (inverted with primary color)
    pub fn highlighted() -> Style {
        Style::default()
            .fg(Self::BACKGROUND)
            .bg(Self::PRIMARY)
            .add_modifier(Modifier::BOLD)
    }

    pub fn dimmed() -> Style {
        Style::default().fg(Self::DIM)
    }

    pub fn error() -> Style {
        Style::default()
            .fg(Self::ERROR)
            .add_modifier(Modifier::BOLD)
    }

    pub fn success() -> Style {
        Style::default()
            .fg(Self::SUCCESS)
            .add_modifier(Modifier::BOLD)
    }

    pub fn warning() -> Style {
        Style::default().fg(Self::WARNING)
    }

    /// Block titles
    pub fn title() -> Style {
        Style::default()
            .fg(Self::PRIMARY)
            .add_modifier(Modifier::BOLD)
    }

    pub fn secondary() -> Style {
        Style::default().fg(Self::SECONDARY)
    }

    pub fn accent() -> Style {
        Style::default()
            .fg(Self::ACCENT)
            .add_modifier(Modifier::BOLD)
    }

    pub fn border() -> Style {
        Style::default().fg(Self::BORDER)
    }

    pub fn border_focused() -> Style {
        Style::default()
            .fg(Self::BORDER_FOCUSED)
            .add_modifier(Modifier::BOLD)
    }

    // ═══════════════════════════════════════════════════════════════════════
    // COMPONENT STYLES
    // ═══════════════════════════════════════════════════════════════════════

    /// Active tab label
    pub fn tab_active() -> Style {
        Style::default()
            .fg(Self::BACKGROUND)
            .bg(Self::SECONDARY)
            .add_modifier(Modifier::BOLD)
    }

    pub fn tab_inactive() -> Style {
        Style::default().fg(Self::DIM)
    }

    /// Controls that cannot be used right now
    pub fn disabled() -> Style {
        Style::default()
            .fg(Self::DIM)
            .add_modifier(Modifier::CROSSED_OUT)
    }

    /// Action waiting on the backend
    pub fn in_progress() -> Style {
        Style::default()
            .fg(Self::ACCENT)
            .add_modifier(Modifier::BOLD | Modifier::SLOW_BLINK)
    }

    /// Grab marker on a usable row
    pub fn grab_marker() -> Style {
        Style::default()
            .fg(Self::SUCCESS)
            .add_modifier(Modifier::BOLD)
    }

    pub fn input() -> Style {
        Style::default().fg(Self::TEXT).bg(Self::BACKGROUND_LIGHT)
    }

    pub fn input_cursor() -> Style {
        Style::default().fg(Self::BACKGROUND).bg(Self::PRIMARY)
    }

    /// Keybinding hint style
    pub fn keybind() -> Style {
        Style::default().fg(Self::ACCENT)
    }

    pub fn status_bar() -> Style {
        Style::default().fg(Self::TEXT).bg(Self::BACKGROUND_LIGHT)
    }

    pub fn loading() -> Style {
        Style::default()
            .fg(Self::PRIMARY)
            .add_modifier(Modifier::BOLD)
    }

    /// Seed count (high seeds = green, low = red)
    pub fn seeds_high() -> Style {
        Style::default().fg(Self::SUCCESS)
    }

    pub fn seeds_medium() -> Style {
        Style::default().fg(Self::WARNING)
    }

    pub fn seeds_low() -> Style {
        Style::default().fg(Self::ERROR)
    }

    pub fn seeds(count: u32) -> Style {
        match count {
            c if c >= 50 => Self::seeds_high(),
            c if c >= 5 => Self::seeds_medium(),
            _ => Self::seeds_low(),
        }
    }

    pub fn file_size() -> Style {
        Style::default().fg(Self::DIM)
    }

    /// Year/date metadata
    pub fn year() -> Style {
        Style::default().fg(Self::SECONDARY)
    }

    /// Seasons with no episodes on disk
    pub fn missing() -> Style {
        Style::default().fg(Self::WARNING)
    }

    /// Backend log level column
    pub fn log_level(level: &str) -> Style {
        match level.to_ascii_uppercase().as_str() {
            "ERROR" | "CRITICAL" => Self::error(),
            "WARNING" | "WARN" => Self::warning(),
            "DEBUG" => Self::dimmed(),
            _ => Self::secondary(),
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// COLOR UTILITIES
// ═══════════════════════════════════════════════════════════════════════════

/// Relative luminance, per https://www.w3.org/TR/WCAG20/#relativeluminancedef
pub fn relative_luminance(r: u8, g: u8, b: u8) -> f64 {
    fn channel(c: u8) -> f64 {
        let c = c as f64 / 255.0;
        if c <= 0.03928 {
            c / 12.92
        } else {
            ((c + 0.055) / 1.055).powf(2.4)
        }
    }

    0.2126 * channel(r) + 0.7152 * channel(g) + 0.0722 * channel(b)
}

/// Contrast ratio between 1 (same color) and 21 (black/white)
pub fn contrast_ratio(fg: (u8, u8, u8), bg: (u8, u8, u8)) -> f64 {
    let a = relative_luminance(fg.0, fg.1, fg.2);
    let b = relative_luminance(bg.0, bg.1, bg.2);
    let (lighter, darker) = if a > b { (a, b) } else { (b, a) };
    (lighter + 0.05) / (darker + 0.05)
}

/// WCAG AA for normal text (4.5:1)
pub fn meets_wcag_aa(fg: (u8, u8, u8), bg: (u8, u8, u8)) -> bool {
    contrast_ratio(fg, bg) >= 4.5
}

/// WCAG AA for large text (3:1)
pub fn meets_wcag_aa_large(fg: (u8, u8, u8), bg: (u8, u8, u8)) -> bool {
    contrast_ratio(fg, bg) >= 3.0
}

/// RGB tuple of a ratatui color (Rgb variant only)
pub fn color_to_rgb(color: Color) -> Option<(u8, u8, u8)> {
    match color {
        Color::Rgb(r, g, b) => Some((r, g, b)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rgb(color: Color) -> (u8, u8, u8) {
        color_to_rgb(color).expect("Theme colors should all be RGB")
    }

    const FOREGROUNDS: [(&str, Color); 8] = [
        ("primary", Theme::PRIMARY),
        ("secondary", Theme::SECONDARY),
        ("accent", Theme::ACCENT),
        ("text", Theme::TEXT),
        ("success", Theme::SUCCESS),
        ("warning", Theme::WARNING),
        ("error", Theme::ERROR),
        ("dim", Theme::DIM),
    ];

    #[test]
    fn test_text_meets_wcag_aa() {
        let ratio = contrast_ratio(rgb(Theme::TEXT), rgb(Theme::BACKGROUND));
        assert!(ratio >= 4.5, "text contrast {:.2}:1", ratio);
    }

    #[test]
    fn test_foregrounds_readable_on_background() {
        let bg = rgb(Theme::BACKGROUND);
        for (name, color) in FOREGROUNDS.iter().filter(|(n, _)| *n != "dim") {
            assert!(
                meets_wcag_aa_large(rgb(*color), bg),
                "{} on background: {:.2}:1",
                name,
                contrast_ratio(rgb(*color), bg)
            );
        }
    }

    #[test]
    fn test_inverted_styles_readable() {
        let bg = rgb(Theme::BACKGROUND);
        assert!(meets_wcag_aa(bg, rgb(Theme::PRIMARY)));
        assert!(meets_wcag_aa(bg, rgb(Theme::SECONDARY)));
    }

    #[test]
    fn test_text_on_panels_readable() {
        assert!(meets_wcag_aa(
            rgb(Theme::TEXT),
            rgb(Theme::BACKGROUND_LIGHT)
        ));
    }

    #[test]
    fn test_seed_thresholds() {
        assert_eq!(Theme::seeds(120), Theme::seeds_high());
        assert_eq!(Theme::seeds(7), Theme::seeds_medium());
        assert_eq!(Theme::seeds(0), Theme::seeds_low());
    }

    #[test]
    fn test_log_level_styles() {
        assert_eq!(Theme::log_level("error"), Theme::error());
        assert_eq!(Theme::log_level("WARNING"), Theme::warning());
        assert_eq!(Theme::log_level("INFO"), Theme::secondary());
    }

    #[test]
    fn test_contrast_ratio_bounds() {
        assert!((contrast_ratio((0, 0, 0), (255, 255, 255)) - 21.0).abs() < 0.1);
        assert!((contrast_ratio((90, 90, 90), (90, 90, 90)) - 1.0).abs() < 0.001);
    }
}
