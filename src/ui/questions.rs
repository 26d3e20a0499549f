use crate::models::OptionLetter;
use crate::questions::{QuestionField, QuestionForm, QuestionsMode, QuestionsView};
use crate::ui::dialogs::draw_confirmation;
use crate::ui::draw_text_field;
use crate::ui::layout::centered_rect;
use crate::utils::{difficulty_color, truncate_string};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap},
    Frame,
};

pub fn help_hints(view: &QuestionsView) -> Vec<(&'static str, &'static str)> {
    if view.form.is_some() {
        return vec![
            ("Tab/↑↓", "Field"),
            ("←/→", "Change choice"),
            ("Ctrl+S", "Save"),
            ("Esc", "Cancel"),
        ];
    }
    if view.mode == QuestionsMode::Search {
        return vec![("Type", "Search"), ("Enter/Esc", "Done")];
    }
    vec![
        ("↑/↓", "Navigate"),
        ("/", "Search"),
        ("s", "Subject"),
        ("f", "Difficulty"),
        ("c", "Clear"),
        ("a", "Add"),
        ("d", "Delete"),
        ("r", "Refresh"),
    ]
}

pub fn draw_questions(f: &mut Frame, view: &QuestionsView, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(5)])
        .split(area);

    draw_filter_bar(f, view, chunks[0]);

    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(chunks[1]);

    draw_question_list(f, view, body[0]);
    draw_question_detail(f, view, body[1]);

    if let Some(form) = &view.form {
        draw_question_form(f, form, area);
    } else if view.confirm_delete.is_some() {
        draw_confirmation(
            f,
            "Delete question",
            "Delete this question? This cannot be undone.",
            area,
        );
    }
}

fn draw_filter_bar(f: &mut Frame, view: &QuestionsView, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(50),
            Constraint::Percentage(30),
            Constraint::Percentage(20),
        ])
        .split(area);

    draw_text_field(
        f,
        &view.search,
        "Search (/)",
        view.mode == QuestionsMode::Search && view.form.is_none(),
        chunks[0],
    );

    let subject = Paragraph::new(view.subject_filter_label())
        .block(Block::default().borders(Borders::ALL).title("Subject (s)"));
    f.render_widget(subject, chunks[1]);

    let difficulty_label = view
        .filter
        .difficulty
        .map(|d| d.label())
        .unwrap_or("All");
    let difficulty = Paragraph::new(difficulty_label)
        .block(Block::default().borders(Borders::ALL).title("Difficulty (f)"));
    f.render_widget(difficulty, chunks[2]);
}

fn draw_question_list(f: &mut Frame, view: &QuestionsView, area: Rect) {
    let title = format!(" Questions ({}/{}) ", view.filtered.len(), view.questions.len());
    let block = Block::default().borders(Borders::ALL).title(title);

    if view.loading && view.questions.is_empty() {
        f.render_widget(Paragraph::new("Loading questions...").block(block), area);
        return;
    }
    if view.filtered.is_empty() {
        let message = if view.questions.is_empty() {
            "No questions yet. Press a to add one."
        } else {
            "No questions match the current filters."
        };
        f.render_widget(
            Paragraph::new(message)
                .style(Style::default().fg(Color::DarkGray))
                .block(block),
            area,
        );
        return;
    }

    let text_width = (area.width as usize).saturating_sub(16);
    let items: Vec<ListItem> = view
        .filtered
        .iter()
        .map(|q| {
            let mut spans = vec![Span::styled(
                format!("{:<7}", q.difficulty.label()),
                Style::default().fg(difficulty_color(q.difficulty)),
            )];
            if q.is_new {
                spans.push(Span::styled("new ", Style::default().fg(Color::Magenta)));
            }
            spans.push(Span::from(truncate_string(&q.text, text_width)));
            ListItem::new(Line::from(spans))
        })
        .collect();

    let list = List::new(items)
        .block(block)
        .highlight_style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD | Modifier::REVERSED),
        );
    let mut state = ListState::default().with_selected(Some(view.selected));
    f.render_stateful_widget(list, area, &mut state);
}

fn draw_question_detail(f: &mut Frame, view: &QuestionsView, area: Rect) {
    let block = Block::default().borders(Borders::ALL).title(" Details ");
    let Some(question) = view.selected_question() else {
        f.render_widget(block, area);
        return;
    };

    let mut text = Text::default();
    text.push_line(Line::from(Span::styled(
        question.text.clone(),
        Style::default().add_modifier(Modifier::BOLD),
    )));
    text.push_line(Line::from(""));
    for letter in OptionLetter::ALL {
        let is_correct = question.correct_option == Some(letter);
        let style = if is_correct {
            Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)
        } else {
            Style::default()
        };
        let marker = if is_correct { " ✓" } else { "" };
        text.push_line(Line::from(Span::styled(
            format!("{}) {}{}", letter.as_char(), question.option_text(letter), marker),
            style,
        )));
    }
    text.push_line(Line::from(""));
    text.push_line(Line::from(vec![
        Span::styled("Subject: ", Style::default().fg(Color::Gray)),
        Span::from(question.subject_name.clone()),
    ]));
    text.push_line(Line::from(vec![
        Span::styled("Difficulty: ", Style::default().fg(Color::Gray)),
        Span::styled(
            question.difficulty.label(),
            Style::default().fg(difficulty_color(question.difficulty)),
        ),
    ]));

    let detail = Paragraph::new(text).wrap(Wrap { trim: true }).block(block);
    f.render_widget(detail, area);
}

fn choice_line(label: &str, value: String, focused: bool) -> Paragraph<'static> {
    let border = if focused {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default()
    };
    Paragraph::new(format!("◀ {} ▶", value)).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(border)
            .title(label.to_string()),
    )
}

fn draw_question_form(f: &mut Frame, form: &QuestionForm, area: Rect) {
    let popup = centered_rect(80, 90, area);
    f.render_widget(Clear, popup);

    let title = if form.submitting {
        " Add question (saving...) "
    } else {
        " Add question "
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(title);
    let inner = block.inner(popup);
    f.render_widget(block, popup);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3); 7])
        .split(inner);

    draw_text_field(
        f,
        &form.text,
        QuestionField::Text.label(),
        form.focus == QuestionField::Text,
        rows[0],
    );

    let options_top = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50); 2])
        .split(rows[1]);
    let options_bottom = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50); 2])
        .split(rows[2]);
    let option_cells = [
        (QuestionField::OptionA, options_top[0]),
        (QuestionField::OptionB, options_top[1]),
        (QuestionField::OptionC, options_bottom[0]),
        (QuestionField::OptionD, options_bottom[1]),
    ];
    for (field, cell) in option_cells {
        if let Some(value) = form.text_field(field) {
            draw_text_field(f, value, field.label(), form.focus == field, cell);
        }
    }

    let correct = form
        .correct_option
        .map(|l| l.as_char().to_string())
        .unwrap_or_else(|| "select".to_string());
    f.render_widget(
        choice_line(
            QuestionField::Correct.label(),
            correct,
            form.focus == QuestionField::Correct,
        ),
        rows[3],
    );

    let difficulty = form
        .difficulty
        .map(|d| d.label().to_string())
        .unwrap_or_else(|| "select".to_string());
    f.render_widget(
        choice_line(
            QuestionField::Difficulty.label(),
            difficulty,
            form.focus == QuestionField::Difficulty,
        ),
        rows[4],
    );

    draw_text_field(
        f,
        &form.subject_name,
        QuestionField::Subject.label(),
        form.focus == QuestionField::Subject,
        rows[5],
    );

    let hint = Paragraph::new("Enter on the last field or Ctrl+S saves. New subject names are created automatically.")
        .style(Style::default().fg(Color::DarkGray))
        .wrap(Wrap { trim: true });
    f.render_widget(hint, rows[6]);
}
