use crate::performance::PerformanceView;
use crate::ui::dialogs::draw_confirmation;
use crate::ui::layout::calculate_performance_chunks;
use crate::utils::{accuracy_color, format_percent, truncate_string};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Bar, BarChart, BarGroup, Block, Borders, Gauge, Paragraph},
    Frame,
};

const BAR_LABEL_WIDTH: usize = 9;
const ROW_HEIGHT: u16 = 2;

pub fn help_hints(view: &PerformanceView) -> Vec<(&'static str, &'static str)> {
    if view.confirm_reset {
        return vec![("y", "Reset"), ("n", "Cancel")];
    }
    vec![("↑/↓", "Scroll"), ("r", "Refresh"), ("R", "Reset statistics")]
}

pub fn draw_performance(f: &mut Frame, view: &PerformanceView, area: Rect) {
    let layout = calculate_performance_chunks(area);

    draw_overall(f, view, layout.stats_area);
    draw_chart(f, view, layout.chart_area);
    draw_ratio(f, view, layout.ratio_area);
    draw_breakdown(f, view, layout.breakdown_area);

    if view.confirm_reset {
        draw_confirmation(
            f,
            "Reset statistics",
            "Erase every recorded answer and start your statistics over?",
            area,
        );
    }
}

fn draw_overall(f: &mut Frame, view: &PerformanceView, area: Rect) {
    let cells = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Ratio(1, 4); 4])
        .split(area);

    let overall = &view.overall;
    let stats = [
        ("Answers", overall.total_answers.to_string(), Color::Cyan),
        ("Correct", overall.total_correct.to_string(), Color::Green),
        (
            "Accuracy",
            format_percent(overall.overall_accuracy),
            accuracy_color(overall.overall_accuracy),
        ),
        ("Subjects studied", overall.subjects_count.to_string(), Color::Blue),
    ];

    for ((label, value, color), cell) in stats.into_iter().zip(cells.iter()) {
        let paragraph = Paragraph::new(vec![
            Line::from(Span::styled(
                value,
                Style::default().fg(color).add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(label, Style::default().fg(Color::Gray))),
        ])
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
        f.render_widget(paragraph, *cell);
    }
}

fn draw_chart(f: &mut Frame, view: &PerformanceView, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Accuracy by subject ");

    if view.entries.is_empty() {
        let message = if view.loading {
            "Loading..."
        } else {
            "No answers recorded yet. Take an exam to see statistics."
        };
        f.render_widget(
            Paragraph::new(message)
                .style(Style::default().fg(Color::DarkGray))
                .block(block),
            area,
        );
        return;
    }

    let bars: Vec<Bar> = view
        .entries
        .iter()
        .map(|entry| {
            let accuracy = entry.accuracy.clamp(0.0, 100.0);
            Bar::default()
                .value(accuracy.round() as u64)
                .label(Line::from(truncate_string(
                    &entry.subject_name,
                    BAR_LABEL_WIDTH,
                )))
                .text_value(format!("{:.0}%", accuracy))
                .style(Style::default().fg(accuracy_color(accuracy)))
        })
        .collect();

    let chart = BarChart::default()
        .block(block)
        .data(BarGroup::default().bars(&bars))
        .bar_width(BAR_LABEL_WIDTH as u16)
        .bar_gap(1)
        .max(100);
    f.render_widget(chart, area);
}

fn draw_ratio(f: &mut Frame, view: &PerformanceView, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Correct vs incorrect ");
    let inner = block.inner(area);
    f.render_widget(block, area);

    let Some(ratio) = view.correct_ratio() else {
        f.render_widget(
            Paragraph::new("No answers yet").style(Style::default().fg(Color::DarkGray)),
            inner,
        );
        return;
    };

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([Constraint::Length(1), Constraint::Length(1), Constraint::Min(0)])
        .split(inner);

    let gauge = Gauge::default()
        .gauge_style(Style::default().fg(Color::Green).bg(Color::Red))
        .ratio(ratio)
        .label(format_percent(ratio * 100.0));
    f.render_widget(gauge, rows[0]);

    let incorrect = view
        .overall
        .total_answers
        .saturating_sub(view.overall.total_correct);
    f.render_widget(
        Paragraph::new(Line::from(vec![
            Span::styled(
                format!("{} correct", view.overall.total_correct),
                Style::default().fg(Color::Green),
            ),
            Span::from("  "),
            Span::styled(format!("{} incorrect", incorrect), Style::default().fg(Color::Red)),
        ])),
        rows[1],
    );
}

fn draw_breakdown(f: &mut Frame, view: &PerformanceView, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Subject breakdown ");
    let inner = block.inner(area);
    f.render_widget(block, area);

    let visible = (inner.height / ROW_HEIGHT).max(1) as usize;
    let start = view.selected.saturating_sub(visible - 1);

    for (row, (i, entry)) in view
        .entries
        .iter()
        .enumerate()
        .skip(start)
        .take(visible)
        .enumerate()
    {
        let y = inner.y + row as u16 * ROW_HEIGHT;
        if y + ROW_HEIGHT > inner.y + inner.height {
            break;
        }
        let label_area = Rect::new(inner.x, y, inner.width, 1);
        let gauge_area = Rect::new(inner.x, y + 1, inner.width, 1);

        let name_style = if i == view.selected {
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().add_modifier(Modifier::BOLD)
        };
        f.render_widget(
            Paragraph::new(Line::from(vec![
                Span::styled(entry.subject_name.clone(), name_style),
                Span::styled(
                    format!(
                        "  {} answered, {} correct, {} incorrect",
                        entry.total_answers,
                        entry.correct_answers,
                        entry.incorrect_answers()
                    ),
                    Style::default().fg(Color::Gray),
                ),
            ])),
            label_area,
        );

        let accuracy = entry.accuracy.clamp(0.0, 100.0);
        let gauge = Gauge::default()
            .gauge_style(Style::default().fg(accuracy_color(accuracy)))
            .ratio(accuracy / 100.0)
            .label(format_percent(accuracy));
        f.render_widget(gauge, gauge_area);
    }
}
