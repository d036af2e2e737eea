//! Colors and styles.
//!
//! UI chrome uses a dark neon scheme. Data colors come from two fixed
//! palettes: 26 topic colors (`k1` is the first) and 13 tissue colors
//! assigned to tissues in sorted order, cycling when there are more.

use ratatui::style::{Color, Modifier, Style};

pub const ACCENT: Color = Color::Rgb(0, 255, 255);
pub const POSITIVE: Color = Color::Rgb(0, 255, 128);
pub const NEGATIVE: Color = Color::Rgb(255, 20, 147);
pub const WARNING: Color = Color::Rgb(255, 140, 0);
pub const NEUTRAL: Color = Color::Rgb(147, 112, 219);
pub const MUTED: Color = Color::Rgb(100, 149, 237);
pub const TEXT: Color = Color::White;
pub const TEXT_DIM: Color = Color::Rgb(170, 170, 170);

pub const TOPIC_PALETTE: [Color; 26] = [
    Color::Rgb(0xF0, 0xA3, 0xFF),
    Color::Rgb(0x00, 0x75, 0xDC),
    Color::Rgb(0x99, 0x3F, 0x00),
    Color::Rgb(0x4C, 0x00, 0x5C),
    Color::Rgb(0x19, 0x19, 0x19),
    Color::Rgb(0x00, 0x5C, 0x31),
    Color::Rgb(0x2B, 0xCE, 0x48),
    Color::Rgb(0xFF, 0xCC, 0x99),
    Color::Rgb(0x80, 0x80, 0x80),
    Color::Rgb(0x94, 0xFF, 0xB5),
    Color::Rgb(0x8F, 0x7C, 0x00),
    Color::Rgb(0x9D, 0xCC, 0x00),
    Color::Rgb(0xC2, 0x00, 0x88),
    Color::Rgb(0x00, 0x33, 0x80),
    Color::Rgb(0xFF, 0xA4, 0x05),
    Color::Rgb(0xFF, 0xA8, 0xBB),
    Color::Rgb(0x42, 0x66, 0x00),
    Color::Rgb(0xFF, 0x00, 0x10),
    Color::Rgb(0x5E, 0xF1, 0xF2),
    Color::Rgb(0x00, 0x99, 0x8F),
    Color::Rgb(0xE0, 0xFF, 0x66),
    Color::Rgb(0x74, 0x0A, 0xFF),
    Color::Rgb(0x99, 0x00, 0x00),
    Color::Rgb(0xFF, 0xFF, 0x80),
    Color::Rgb(0xFF, 0xFF, 0x00),
    Color::Rgb(0xFF, 0x50, 0x05),
];

pub const TISSUE_PALETTE: [Color; 13] = [
    Color::Rgb(0xFF, 0xFF, 0x00),
    Color::Rgb(0x1C, 0xE6, 0xFF),
    Color::Rgb(0xFF, 0x34, 0xFF),
    Color::Rgb(0xFF, 0x4A, 0x46),
    Color::Rgb(0x00, 0x89, 0x41),
    Color::Rgb(0x00, 0x6F, 0xA6),
    Color::Rgb(0xA3, 0x00, 0x59),
    Color::Rgb(0xFF, 0xDB, 0xE5),
    Color::Rgb(0x7A, 0x49, 0x00),
    Color::Rgb(0x00, 0x00, 0xA6),
    Color::Rgb(0x63, 0xFF, 0xAC),
    Color::Rgb(0xB7, 0x97, 0x62),
    Color::Rgb(0x00, 0x4D, 0x43),
];

/// Color of a topic label. `kN` takes palette slot `N - 1`; anything else
/// (or beyond the palette) falls back to `fallback_index`.
pub fn topic_color(topic: &str, fallback_index: usize) -> Color {
    let slot = topic
        .strip_prefix('k')
        .and_then(|n| n.parse::<usize>().ok())
        .filter(|n| (1..=TOPIC_PALETTE.len()).contains(n))
        .map(|n| n - 1)
        .unwrap_or(fallback_index % TOPIC_PALETTE.len());
    TOPIC_PALETTE[slot]
}

/// Color of a tissue given the sorted tissue list.
pub fn tissue_color(tissues: &[String], tissue: &str) -> Color {
    let index = tissues.iter().position(|t| t == tissue).unwrap_or(0);
    TISSUE_PALETTE[index % TISSUE_PALETTE.len()]
}

pub fn accent() -> Style {
    Style::default().fg(ACCENT)
}

pub fn accent_bold() -> Style {
    accent().add_modifier(Modifier::BOLD)
}

pub fn positive() -> Style {
    Style::default().fg(POSITIVE)
}

pub fn negative() -> Style {
    Style::default().fg(NEGATIVE)
}

pub fn warning() -> Style {
    Style::default().fg(WARNING)
}

pub fn neutral() -> Style {
    Style::default().fg(NEUTRAL)
}

pub fn muted() -> Style {
    Style::default().fg(MUTED)
}

pub fn text() -> Style {
    Style::default().fg(TEXT)
}

pub fn text_dim() -> Style {
    Style::default().fg(TEXT_DIM)
}

pub fn panel_border(focused: bool) -> Style {
    if focused {
        accent()
    } else {
        muted()
    }
}

pub fn panel_title(focused: bool) -> Style {
    if focused {
        accent_bold()
    } else {
        text_dim()
    }
}

/// Enabled/disabled styling for paging controls.
pub fn control(enabled: bool) -> Style {
    if enabled {
        neutral()
    } else {
        Style::default().fg(Color::DarkGray)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn topic_colors_follow_palette_order() {
        assert_eq!(topic_color("k1", 0), Color::Rgb(0xF0, 0xA3, 0xFF));
        assert_eq!(topic_color("k26", 0), Color::Rgb(0xFF, 0x50, 0x05));
    }

    #[test]
    fn unknown_topics_use_fallback_slot() {
        assert_eq!(topic_color("k27", 1), TOPIC_PALETTE[1]);
        assert_eq!(topic_color("immune", 27), TOPIC_PALETTE[1]);
        assert_eq!(topic_color("k0", 2), TOPIC_PALETTE[2]);
    }

    #[test]
    fn tissue_colors_cycle() {
        let tissues: Vec<String> = (0..14).map(|i| format!("t{i:02}")).collect();
        assert_eq!(tissue_color(&tissues, "t00"), TISSUE_PALETTE[0]);
        assert_eq!(tissue_color(&tissues, "t13"), TISSUE_PALETTE[0]);
        assert_eq!(tissue_color(&tissues, "t01"), TISSUE_PALETTE[1]);
    }

    #[test]
    fn focus_styles_differ() {
        assert_ne!(panel_border(true), panel_border(false));
        assert_ne!(control(true), control(false));
    }
}
