use crate::dashboard::DashboardView;
use crate::utils::{accuracy_color, format_percent};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

pub fn help_hints() -> Vec<(&'static str, &'static str)> {
    vec![
        ("1-4/Tab", "Switch view"),
        ("a", "Questions"),
        ("n", "New exam"),
        ("p", "Performance"),
        ("r", "Refresh"),
        ("q", "Quit"),
    ]
}

fn stat_card(f: &mut Frame, label: &str, value: String, color: Color, area: Rect) {
    let text = Text::from(vec![
        Line::from(""),
        Line::from(Span::styled(
            value,
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            label.to_string(),
            Style::default().fg(Color::Gray),
        )),
    ]);
    let card = Paragraph::new(text)
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(card, area);
}

pub fn draw_dashboard(f: &mut Frame, view: &DashboardView, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(5),
            Constraint::Min(3),
        ])
        .split(area);

    let title = Paragraph::new("Study dashboard")
        .style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(title, chunks[0]);

    let cards = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Ratio(1, 4); 4])
        .split(chunks[1]);

    match &view.stats {
        Some(stats) => {
            stat_card(f, "Questions", stats.total_questions.to_string(), Color::Cyan, cards[0]);
            stat_card(f, "Exams", stats.total_exams.to_string(), Color::Magenta, cards[1]);
            stat_card(f, "Subjects", stats.total_subjects.to_string(), Color::Blue, cards[2]);
            stat_card(
                f,
                "Overall accuracy",
                format_percent(stats.overall_accuracy),
                accuracy_color(stats.overall_accuracy),
                cards[3],
            );
        }
        None => {
            let placeholder = if view.failed { "-" } else { "..." };
            for (card, label) in cards
                .iter()
                .zip(["Questions", "Exams", "Subjects", "Overall accuracy"])
            {
                stat_card(f, label, placeholder.to_string(), Color::DarkGray, *card);
            }
        }
    }

    let mut actions = Text::default();
    actions.push_line(Line::from(Span::styled(
        "Quick actions",
        Style::default().add_modifier(Modifier::BOLD),
    )));
    actions.push_line(Line::from(""));
    for (key, label) in [
        ("a", "Browse and add questions"),
        ("n", "Assemble a new mock exam"),
        ("p", "Review accuracy per subject"),
    ] {
        actions.push_line(Line::from(vec![
            Span::styled(
                format!("  {}  ", key),
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::from(label),
        ]));
    }
    if view.failed {
        actions.push_line(Line::from(""));
        actions.push_line(Line::from(Span::styled(
            "Could not reach the question bank service. Press r to retry.",
            Style::default().fg(Color::Red),
        )));
    }
    let actions = Paragraph::new(actions).block(Block::default().borders(Borders::ALL));
    f.render_widget(actions, chunks[2]);
}
