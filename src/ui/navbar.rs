use crate::app::Route;
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::Line,
    widgets::{Block, Borders, Tabs},
    Frame,
};

pub fn draw_navbar(f: &mut Frame, current: Route, area: Rect) {
    let titles: Vec<Line> = Route::ALL
        .iter()
        .map(|route| Line::from(format!("{} {}", route.index() + 1, route.title())))
        .collect();

    let tabs = Tabs::new(titles)
        .select(current.index())
        .style(Style::default().fg(Color::Gray))
        .highlight_style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD | Modifier::REVERSED),
        )
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Question Bank "),
        );
    f.render_widget(tabs, area);
}
