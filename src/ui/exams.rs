use crate::exams::{
    action_label, ExamField, ExamForm, ExamRun, ExamSession, ExamsView, FormStage,
    QUANTITY_CHOICES,
};
use crate::models::{ExamStatus, OptionLetter, Subject};
use crate::ui::dialogs::draw_confirmation;
use crate::ui::draw_text_field;
use crate::ui::layout::{centered_fixed, centered_rect};
use crate::utils::{accuracy_color, difficulty_color, format_percent, truncate_string};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Clear, Gauge, List, ListItem, ListState, Paragraph, Wrap},
    Frame,
};

pub fn help_hints(view: &ExamsView) -> Vec<(&'static str, &'static str)> {
    match &view.session {
        ExamSession::InProgress(_) => {
            return vec![
                ("a-d/1-4", "Answer"),
                ("↑/↓ Space", "Highlight/select"),
                ("Enter", "Next"),
                ("Esc", "Leave"),
            ];
        }
        ExamSession::Loading { .. } => return vec![("Esc", "Cancel")],
        ExamSession::Closed => {}
    }
    if view.form.is_some() {
        return vec![
            ("Tab/↑↓", "Field"),
            ("←/→", "Change"),
            ("Space", "Toggle"),
            ("Enter", "Create"),
            ("Esc", "Cancel"),
        ];
    }
    vec![
        ("↑/↓", "Navigate"),
        ("Enter", "Start/Continue"),
        ("n", "New exam"),
        ("d", "Delete"),
        ("r", "Refresh"),
    ]
}

pub fn draw_exams(f: &mut Frame, view: &ExamsView, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(area);

    draw_exam_list(f, view, chunks[0]);
    draw_exam_detail(f, view, chunks[1]);

    match &view.session {
        ExamSession::InProgress(run) => draw_runner(f, run, area),
        ExamSession::Loading { .. } => {
            let popup = centered_fixed(40, 5, area);
            f.render_widget(Clear, popup);
            f.render_widget(
                Paragraph::new("Loading exam...")
                    .alignment(Alignment::Center)
                    .block(Block::default().borders(Borders::ALL)),
                popup,
            );
        }
        ExamSession::Closed => {
            if let Some(form) = &view.form {
                draw_exam_form(f, form, &view.subjects, area);
            } else if view.confirm_delete.is_some() {
                draw_confirmation(
                    f,
                    "Delete exam",
                    "Delete this exam and its recorded answers?",
                    area,
                );
            }
        }
    }
}

fn status_color(status: ExamStatus) -> Color {
    match status {
        ExamStatus::NotStarted => Color::Gray,
        ExamStatus::InProgress => Color::Yellow,
        ExamStatus::Completed => Color::Green,
    }
}

fn draw_exam_list(f: &mut Frame, view: &ExamsView, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!(" Exams ({}) ", view.exams.len()));

    if view.loading && view.exams.is_empty() {
        f.render_widget(Paragraph::new("Loading exams...").block(block), area);
        return;
    }
    if view.exams.is_empty() {
        f.render_widget(
            Paragraph::new("No exams yet. Press n to create one.")
                .style(Style::default().fg(Color::DarkGray))
                .block(block),
            area,
        );
        return;
    }

    let name_width = (area.width as usize).saturating_sub(22);
    let items: Vec<ListItem> = view
        .exams
        .iter()
        .map(|exam| {
            let status = exam.status();
            ListItem::new(Line::from(vec![
                Span::styled(
                    format!("{:<9}", action_label(exam)),
                    Style::default().fg(status_color(status)),
                ),
                Span::from(format!(
                    "{:>3}/{:<3} ",
                    exam.answered_questions, exam.total_questions
                )),
                Span::from(truncate_string(&exam.name, name_width)),
            ]))
        })
        .collect();

    let list = List::new(items).block(block).highlight_style(
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD | Modifier::REVERSED),
    );
    let mut state = ListState::default().with_selected(Some(view.selected));
    f.render_stateful_widget(list, area, &mut state);
}

fn draw_exam_detail(f: &mut Frame, view: &ExamsView, area: Rect) {
    let block = Block::default().borders(Borders::ALL).title(" Progress ");
    let Some(exam) = view.selected_exam() else {
        f.render_widget(block, area);
        return;
    };
    let inner = block.inner(area);
    f.render_widget(block, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(2),
            Constraint::Length(1),
            Constraint::Length(2),
            Constraint::Min(1),
        ])
        .split(inner);

    f.render_widget(
        Paragraph::new(Span::styled(
            exam.name.clone(),
            Style::default().add_modifier(Modifier::BOLD),
        ))
        .wrap(Wrap { trim: true }),
        rows[0],
    );

    let status = exam.status();
    let gauge = Gauge::default()
        .gauge_style(Style::default().fg(status_color(status)))
        .ratio(exam.progress_ratio())
        .label(format!(
            "{}/{} answered",
            exam.answered_questions, exam.total_questions
        ));
    f.render_widget(gauge, rows[1]);

    let score = if status == ExamStatus::NotStarted {
        Line::from(Span::styled("Not started", Style::default().fg(Color::Gray)))
    } else {
        Line::from(vec![
            Span::from("Score: "),
            Span::styled(
                format_percent(exam.score),
                Style::default()
                    .fg(accuracy_color(exam.score))
                    .add_modifier(Modifier::BOLD),
            ),
        ])
    };
    f.render_widget(Paragraph::new(score), rows[2]);
}

fn draw_exam_form(f: &mut Frame, form: &ExamForm, subjects: &[Subject], area: Rect) {
    let popup = centered_rect(70, 80, area);
    f.render_widget(Clear, popup);

    let title = match form.stage {
        FormStage::Editing => " New exam ",
        FormStage::Generating => " New exam (selecting questions...) ",
        FormStage::Creating => " New exam (saving...) ",
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(title);
    let inner = block.inner(popup);
    f.render_widget(block, popup);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Min(3),
        ])
        .split(inner);

    draw_text_field(
        f,
        &form.name,
        "Exam name",
        form.focus == ExamField::Name,
        rows[0],
    );

    let quantity_spans: Vec<Span> = QUANTITY_CHOICES
        .iter()
        .map(|q| {
            if *q == form.quantity() {
                Span::styled(
                    format!(" [{}] ", q),
                    Style::default()
                        .fg(Color::Yellow)
                        .add_modifier(Modifier::BOLD),
                )
            } else {
                Span::from(format!("  {}  ", q))
            }
        })
        .collect();
    f.render_widget(
        Paragraph::new(Line::from(quantity_spans))
            .block(field_block("Questions", form.focus == ExamField::Quantity)),
        rows[1],
    );

    let difficulty = match form.difficulty {
        Some(d) => Span::styled(d.label(), Style::default().fg(difficulty_color(d))),
        None => Span::from("Any"),
    };
    f.render_widget(
        Paragraph::new(difficulty)
            .block(field_block("Difficulty", form.focus == ExamField::Difficulty)),
        rows[2],
    );

    let only_new = if form.only_new { "[x] Only new questions" } else { "[ ] Only new questions" };
    f.render_widget(
        Paragraph::new(only_new).block(field_block("Filter", form.focus == ExamField::OnlyNew)),
        rows[3],
    );

    let subjects_focused = form.focus == ExamField::Subjects;
    let mut subject_text = Text::default();
    if subjects.is_empty() {
        subject_text.push_line(Line::from(Span::styled(
            "No subjects yet",
            Style::default().fg(Color::DarkGray),
        )));
    }
    let mut line = Vec::new();
    for (i, subject) in subjects.iter().enumerate() {
        let checked = if form.subject_ids.contains(&subject.id) { "x" } else { " " };
        let mut style = Style::default();
        if subjects_focused && i == form.subject_cursor {
            style = style.fg(Color::Yellow).add_modifier(Modifier::REVERSED);
        }
        line.push(Span::styled(format!("[{}] {}", checked, subject.name), style));
        line.push(Span::from("  "));
    }
    subject_text.push_line(Line::from(line));
    let label = if form.subject_ids.is_empty() {
        "Subjects (all)"
    } else {
        "Subjects"
    };
    f.render_widget(
        Paragraph::new(subject_text)
            .wrap(Wrap { trim: true })
            .block(field_block(label, subjects_focused)),
        rows[4],
    );
}

fn field_block(title: &str, focused: bool) -> Block<'static> {
    let style = if focused {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default()
    };
    Block::default()
        .borders(Borders::ALL)
        .border_style(style)
        .title(title.to_string())
}

fn draw_runner(f: &mut Frame, run: &ExamRun, area: Rect) {
    let popup = centered_rect(85, 90, area);
    f.render_widget(Clear, popup);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(Span::styled(
            format!(" {} ", run.exam.name),
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ));
    let inner = block.inner(popup);
    f.render_widget(block, popup);

    let Some(question) = run.current_question() else {
        return;
    };

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Min(3),
            Constraint::Length(10),
            Constraint::Length(1),
        ])
        .split(inner);

    let position = format!("Question {} of {}", run.index + 1, run.total());
    f.render_widget(
        Paragraph::new(Line::from(vec![
            Span::styled(position, Style::default().add_modifier(Modifier::BOLD)),
            Span::from("  "),
            Span::styled(
                question.difficulty.label(),
                Style::default().fg(difficulty_color(question.difficulty)),
            ),
            Span::from("  "),
            Span::styled(question.subject_name.clone(), Style::default().fg(Color::Gray)),
        ])),
        rows[0],
    );

    let progress = Gauge::default()
        .gauge_style(Style::default().fg(Color::Cyan))
        .ratio(run.index as f64 / run.total() as f64)
        .label("");
    f.render_widget(progress, rows[1]);

    f.render_widget(
        Paragraph::new(question.text.clone())
            .wrap(Wrap { trim: true })
            .block(Block::default().borders(Borders::ALL).title("Question")),
        rows[2],
    );

    let selected = run.current_answer();
    let option_rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(2); 4])
        .split(rows[3]);
    for (letter, row) in OptionLetter::ALL.iter().zip(option_rows.iter()) {
        let is_selected = selected == Some(*letter);
        let is_highlighted = run.highlighted == letter.index();
        let mut style = Style::default();
        if is_selected {
            style = style.fg(Color::Green).add_modifier(Modifier::BOLD);
        }
        if is_highlighted {
            style = style.add_modifier(Modifier::REVERSED);
        }
        let bullet = if is_selected { "(•)" } else { "( )" };
        f.render_widget(
            Paragraph::new(format!(
                "{} {}) {}",
                bullet,
                letter.as_char(),
                question.option_text(*letter)
            ))
            .style(style)
            .wrap(Wrap { trim: true }),
            *row,
        );
    }

    let next_label = if run.submitting {
        "Submitting..."
    } else if run.is_last() {
        "Enter: Finish"
    } else {
        "Enter: Next"
    };
    let next_style = if run.can_advance() {
        Style::default()
            .fg(Color::Green)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    f.render_widget(
        Paragraph::new(Span::styled(next_label, next_style)).alignment(Alignment::Right),
        rows[4],
    );
}
