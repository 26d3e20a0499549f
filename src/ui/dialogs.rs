use crate::toast::{ToastKind, ToastQueue};
use crate::ui::layout::centered_fixed;
use crate::utils::truncate_string;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

const TOAST_WIDTH: u16 = 44;
const TOAST_HEIGHT: u16 = 4;

/// Blocking y/n prompt drawn over `area`.
pub fn draw_confirmation(f: &mut Frame, title: &str, message: &str, area: Rect) {
    let popup = centered_fixed(60, 9, area);
    f.render_widget(Clear, popup);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow))
        .title(Span::styled(
            format!(" {} ", title),
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        ));
    let inner = block.inner(popup);
    f.render_widget(block, popup);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([Constraint::Min(1), Constraint::Length(1)])
        .split(inner);

    let body = Paragraph::new(message.to_string())
        .style(Style::default().fg(Color::White))
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });
    f.render_widget(body, chunks[0]);

    let help = Paragraph::new(Line::from(vec![
        Span::styled(
            "y",
            Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::BOLD),
        ),
        Span::from(" Yes  "),
        Span::styled(
            "n",
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        ),
        Span::from(" No"),
    ]))
    .alignment(Alignment::Center);
    f.render_widget(help, chunks[1]);
}

fn toast_color(kind: ToastKind) -> Color {
    match kind {
        ToastKind::Success => Color::Green,
        ToastKind::Info => Color::Cyan,
        ToastKind::Error => Color::Red,
    }
}

/// Stacks toasts in the top-right corner, newest at the bottom.
pub fn draw_toasts(f: &mut Frame, toasts: &ToastQueue, area: Rect) {
    let width = TOAST_WIDTH.min(area.width);
    let x = area.x + area.width - width;

    for (i, toast) in toasts.iter().enumerate() {
        let y = area.y + 1 + i as u16 * TOAST_HEIGHT;
        if y + TOAST_HEIGHT > area.y + area.height {
            break;
        }
        let rect = Rect::new(x, y, width, TOAST_HEIGHT);
        let color = toast_color(toast.kind);

        f.render_widget(Clear, rect);
        let message = truncate_string(&toast.message, (width as usize).saturating_sub(2) * 2);
        let paragraph = Paragraph::new(message)
            .wrap(Wrap { trim: true })
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(color))
                    .title(Span::styled(
                        format!(" {} ", toast.title),
                        Style::default().fg(color).add_modifier(Modifier::BOLD),
                    )),
            );
        f.render_widget(paragraph, rect);
    }
}
