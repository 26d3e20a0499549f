mod dashboard;
mod dialogs;
mod exams;
pub mod layout;
mod navbar;
mod performance;
mod questions;

use crate::app::{App, Screen};
use crate::input::TextField;
use layout::calculate_app_chunks;
use ratatui::{
    layout::{Alignment, Position, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use unicode_width::UnicodeWidthStr;

pub use dialogs::{draw_confirmation, draw_toasts};
pub use navbar::draw_navbar;

pub fn draw(f: &mut Frame, app: &App) {
    let layout = calculate_app_chunks(f.area());

    draw_navbar(f, app.route(), layout.navbar_area);

    let hints = match &app.screen {
        Screen::Dashboard(view) => {
            dashboard::draw_dashboard(f, view, layout.body_area);
            dashboard::help_hints()
        }
        Screen::Questions(view) => {
            questions::draw_questions(f, view, layout.body_area);
            questions::help_hints(view)
        }
        Screen::Exams(view) => {
            exams::draw_exams(f, view, layout.body_area);
            exams::help_hints(view)
        }
        Screen::Performance(view) => {
            performance::draw_performance(f, view, layout.body_area);
            performance::help_hints(view)
        }
    };
    draw_help(f, &hints, layout.help_area);

    draw_toasts(f, &app.toasts, f.area());
}

fn key_style() -> Style {
    Style::default()
        .fg(Color::Cyan)
        .add_modifier(Modifier::BOLD)
}

pub(crate) fn help_line(hints: &[(&str, &str)]) -> Line<'static> {
    let mut spans = Vec::new();
    for (key, label) in hints {
        spans.push(Span::styled(key.to_string(), key_style()));
        spans.push(Span::from(format!(" {}  ", label)));
    }
    Line::from(spans)
}

fn draw_help(f: &mut Frame, hints: &[(&str, &str)], area: Rect) {
    let help = Paragraph::new(help_line(hints))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(help, area);
}

/// Single-line input box. When focused, the terminal cursor is placed at the
/// field's cursor and the text scrolls to keep it visible.
pub(crate) fn draw_text_field(
    f: &mut Frame,
    field: &TextField,
    title: &str,
    focused: bool,
    area: Rect,
) {
    let border_style = if focused {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default()
    };
    let inner_width = area.width.saturating_sub(2);
    let before_cursor: String = field.value().chars().take(field.cursor()).collect();
    let cursor_col = before_cursor.width() as u16;
    let scroll = cursor_col.saturating_sub(inner_width.saturating_sub(1));

    let paragraph = Paragraph::new(field.value().to_string())
        .scroll((0, scroll))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(border_style)
                .title(title.to_string()),
        );
    f.render_widget(paragraph, area);

    if focused && area.width > 2 && area.height > 2 {
        f.set_cursor_position(Position::new(
            area.x + 1 + cursor_col - scroll,
            area.y + 1,
        ));
    }
}
