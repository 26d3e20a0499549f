use crate::models::Difficulty;
use ratatui::style::Color;
use unicode_width::UnicodeWidthChar;

/// Shortens `s` to at most `max_width` terminal columns, ending in "..." when
/// anything was cut and there is room for it.
pub fn truncate_string(s: &str, max_width: usize) -> String {
    let total: usize = s.chars().map(|c| c.width().unwrap_or(0)).sum();
    if total <= max_width {
        return s.to_string();
    }
    let suffix = if max_width >= 3 { "..." } else { "" };
    let budget = max_width - suffix.len();
    let mut out = String::new();
    let mut used = 0;
    for c in s.chars() {
        let w = c.width().unwrap_or(0);
        if used + w > budget {
            break;
        }
        out.push(c);
        used += w;
    }
    out.push_str(suffix);
    out
}

pub fn format_percent(value: f64) -> String {
    format!("{:.1}%", value)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccuracyBand {
    Good,
    Fair,
    Poor,
}

pub fn accuracy_band(accuracy: f64) -> AccuracyBand {
    if accuracy >= 80.0 {
        AccuracyBand::Good
    } else if accuracy >= 60.0 {
        AccuracyBand::Fair
    } else {
        AccuracyBand::Poor
    }
}

pub fn accuracy_color(accuracy: f64) -> Color {
    match accuracy_band(accuracy) {
        AccuracyBand::Good => Color::Green,
        AccuracyBand::Fair => Color::Yellow,
        AccuracyBand::Poor => Color::Red,
    }
}

pub fn difficulty_color(difficulty: Difficulty) -> Color {
    match difficulty {
        Difficulty::Easy => Color::Green,
        Difficulty::Medium => Color::Yellow,
        Difficulty::Hard => Color::Red,
    }
}

/// Keeps a list selection inside `[0, len)`; empty lists select 0.
pub fn clamp_index(index: usize, len: usize) -> usize {
    index.min(len.saturating_sub(1))
}
