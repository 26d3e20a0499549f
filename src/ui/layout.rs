use ratatui::layout::{Constraint, Direction, Layout, Rect};

pub struct AppLayout {
    pub navbar_area: Rect,
    pub body_area: Rect,
    pub help_area: Rect,
}

pub struct PerformanceLayout {
    pub stats_area: Rect,
    pub chart_area: Rect,
    pub ratio_area: Rect,
    pub breakdown_area: Rect,
}

pub fn calculate_app_chunks(area: Rect) -> AppLayout {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(5),
            Constraint::Length(3),
        ])
        .split(area);

    AppLayout {
        navbar_area: chunks[0],
        body_area: chunks[1],
        help_area: chunks[2],
    }
}

pub fn calculate_performance_chunks(area: Rect) -> PerformanceLayout {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4),
            Constraint::Percentage(50),
            Constraint::Min(4),
        ])
        .split(area);

    let middle = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(65), Constraint::Percentage(35)])
        .split(rows[1]);

    PerformanceLayout {
        stats_area: rows[0],
        chart_area: middle[0],
        ratio_area: middle[1],
        breakdown_area: rows[2],
    }
}

/// A rectangle of the given percentages, centred inside `area`.
pub fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

/// Fixed-height popup, horizontally sized by percentage, clamped to `area`.
pub fn centered_fixed(percent_x: u16, height: u16, area: Rect) -> Rect {
    let height = height.min(area.height);
    let width = (u32::from(area.width) * u32::from(percent_x.min(100)) / 100) as u16;
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}
