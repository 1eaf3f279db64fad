//! Color theme for the dashboard

use agentlens_core::insights::Tone;
use ratatui::style::Color;

/// Fixed palette cycled over cost segments by position
pub const CHART_PALETTE: [Color; 5] = [
    Color::Blue,
    Color::Green,
    Color::Yellow,
    Color::LightRed,
    Color::Magenta,
];

/// Accent color for headers and highlights
pub const ACCENT: Color = Color::Cyan;

/// Color for secondary labels
pub const MUTED: Color = Color::DarkGray;

/// Series colors
pub const CONVERSATIONS_COLOR: Color = Color::Cyan;
pub const MESSAGES_COLOR: Color = Color::Green;
pub const SENTIMENT_COLOR: Color = Color::LightRed;
pub const RESOLUTION_COLOR: Color = Color::Green;

/// Map a trend-glyph tone to its terminal color
pub fn tone_color(tone: Tone) -> Color {
    match tone {
        Tone::Positive => Color::Green,
        Tone::Negative => Color::Red,
        Tone::Neutral => Color::DarkGray,
    }
}

/// Palette color for a segment index (already cycled by the projection)
pub fn palette_color(index: usize) -> Color {
    CHART_PALETTE[index % CHART_PALETTE.len()]
}
