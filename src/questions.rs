use crate::app::Effect;
use crate::filter::QuestionFilter;
use crate::input::TextField;
use crate::logger;
use crate::models::{Difficulty, NewQuestion, OptionLetter, Question, Subject};
use crate::toast::Toast;
use crate::utils::clamp_index;
use crate::worker::{ApiRequest, ApiResponse};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuestionField {
    Text,
    OptionA,
    OptionB,
    OptionC,
    OptionD,
    Correct,
    Difficulty,
    Subject,
}

impl QuestionField {
    pub const ORDER: [QuestionField; 8] = [
        QuestionField::Text,
        QuestionField::OptionA,
        QuestionField::OptionB,
        QuestionField::OptionC,
        QuestionField::OptionD,
        QuestionField::Correct,
        QuestionField::Difficulty,
        QuestionField::Subject,
    ];

    fn position(&self) -> usize {
        Self::ORDER.iter().position(|f| f == self).unwrap_or(0)
    }

    pub fn next(&self) -> Self {
        Self::ORDER[(self.position() + 1) % Self::ORDER.len()]
    }

    pub fn prev(&self) -> Self {
        Self::ORDER[(self.position() + Self::ORDER.len() - 1) % Self::ORDER.len()]
    }

    pub fn label(&self) -> &'static str {
        match self {
            QuestionField::Text => "Question text",
            QuestionField::OptionA => "Option A",
            QuestionField::OptionB => "Option B",
            QuestionField::OptionC => "Option C",
            QuestionField::OptionD => "Option D",
            QuestionField::Correct => "Correct option",
            QuestionField::Difficulty => "Difficulty",
            QuestionField::Subject => "Subject",
        }
    }
}

#[derive(Debug, Clone)]
pub struct QuestionForm {
    pub text: TextField,
    pub option_a: TextField,
    pub option_b: TextField,
    pub option_c: TextField,
    pub option_d: TextField,
    pub correct_option: Option<OptionLetter>,
    pub difficulty: Option<Difficulty>,
    pub subject_name: TextField,
    pub focus: QuestionField,
    pub submitting: bool,
}

impl Default for QuestionForm {
    fn default() -> Self {
        Self {
            text: TextField::new(),
            option_a: TextField::new(),
            option_b: TextField::new(),
            option_c: TextField::new(),
            option_d: TextField::new(),
            correct_option: None,
            difficulty: None,
            subject_name: TextField::new(),
            focus: QuestionField::Text,
            submitting: false,
        }
    }
}

impl QuestionForm {
    pub fn text_field(&self, field: QuestionField) -> Option<&TextField> {
        match field {
            QuestionField::Text => Some(&self.text),
            QuestionField::OptionA => Some(&self.option_a),
            QuestionField::OptionB => Some(&self.option_b),
            QuestionField::OptionC => Some(&self.option_c),
            QuestionField::OptionD => Some(&self.option_d),
            QuestionField::Subject => Some(&self.subject_name),
            QuestionField::Correct | QuestionField::Difficulty => None,
        }
    }

    fn focused_text_mut(&mut self) -> Option<&mut TextField> {
        match self.focus {
            QuestionField::Text => Some(&mut self.text),
            QuestionField::OptionA => Some(&mut self.option_a),
            QuestionField::OptionB => Some(&mut self.option_b),
            QuestionField::OptionC => Some(&mut self.option_c),
            QuestionField::OptionD => Some(&mut self.option_d),
            QuestionField::Subject => Some(&mut self.subject_name),
            QuestionField::Correct | QuestionField::Difficulty => None,
        }
    }

    fn cycle_choice(&mut self, forward: bool) {
        match self.focus {
            QuestionField::Correct => {
                let current = self.correct_option.map(|l| l.index());
                let next = match (current, forward) {
                    (None, true) => 0,
                    (None, false) => 3,
                    (Some(i), true) => (i + 1) % 4,
                    (Some(i), false) => (i + 3) % 4,
                };
                self.correct_option = Some(OptionLetter::ALL[next]);
            }
            QuestionField::Difficulty => {
                let current = self
                    .difficulty
                    .and_then(|d| Difficulty::ALL.iter().position(|x| *x == d));
                let next = match (current, forward) {
                    (None, true) => 0,
                    (None, false) => 2,
                    (Some(i), true) => (i + 1) % 3,
                    (Some(i), false) => (i + 2) % 3,
                };
                self.difficulty = Some(Difficulty::ALL[next]);
            }
            _ => {}
        }
    }

    /// Every field is required; the first missing one is reported.
    pub fn validate(&self) -> Result<NewQuestion, String> {
        for field in QuestionField::ORDER {
            let missing = match self.text_field(field) {
                Some(text) => text.is_blank(),
                None => match field {
                    QuestionField::Correct => self.correct_option.is_none(),
                    QuestionField::Difficulty => self.difficulty.is_none(),
                    _ => false,
                },
            };
            if missing {
                return Err(format!("{} is required", field.label()));
            }
        }

        let (Some(correct_option), Some(difficulty)) = (self.correct_option, self.difficulty)
        else {
            return Err("Correct option is required".to_string());
        };

        Ok(NewQuestion {
            text: self.text.value().trim().to_string(),
            option_a: self.option_a.value().trim().to_string(),
            option_b: self.option_b.value().trim().to_string(),
            option_c: self.option_c.value().trim().to_string(),
            option_d: self.option_d.value().trim().to_string(),
            correct_option,
            difficulty,
            subject_name: self.subject_name.value().trim().to_string(),
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuestionsMode {
    Browse,
    Search,
}

#[derive(Debug)]
pub struct QuestionsView {
    pub questions: Vec<Question>,
    pub filtered: Vec<Question>,
    pub subjects: Vec<Subject>,
    pub filter: QuestionFilter,
    pub search: TextField,
    pub mode: QuestionsMode,
    pub selected: usize,
    pub form: Option<QuestionForm>,
    pub confirm_delete: Option<i64>,
    pub loading: bool,
}

impl Default for QuestionsView {
    fn default() -> Self {
        Self::new()
    }
}

impl QuestionsView {
    pub fn new() -> Self {
        Self {
            questions: Vec::new(),
            filtered: Vec::new(),
            subjects: Vec::new(),
            filter: QuestionFilter::default(),
            search: TextField::new(),
            mode: QuestionsMode::Browse,
            selected: 0,
            form: None,
            confirm_delete: None,
            loading: true,
        }
    }

    pub fn mount_effects(&self) -> Vec<Effect> {
        vec![
            Effect::Request(ApiRequest::FetchQuestions),
            Effect::Request(ApiRequest::FetchSubjects),
        ]
    }

    pub fn captures_input(&self) -> bool {
        self.form.is_some() || self.confirm_delete.is_some() || self.mode == QuestionsMode::Search
    }

    pub fn selected_question(&self) -> Option<&Question> {
        self.filtered.get(self.selected)
    }

    pub fn subject_filter_label(&self) -> String {
        match self.filter.subject_id {
            None => "All subjects".to_string(),
            Some(id) => self
                .subjects
                .iter()
                .find(|s| s.id == id)
                .map(|s| s.name.clone())
                .unwrap_or_else(|| format!("Subject #{}", id)),
        }
    }

    pub fn refilter(&mut self) {
        self.filtered = self.filter.apply(&self.questions);
        self.selected = clamp_index(self.selected, self.filtered.len());
    }

    fn cycle_subject_filter(&mut self) {
        let position = self
            .filter
            .subject_id
            .and_then(|id| self.subjects.iter().position(|s| s.id == id));
        self.filter.subject_id = match position {
            None if self.filter.subject_id.is_none() => self.subjects.first().map(|s| s.id),
            None => None,
            Some(i) => self.subjects.get(i + 1).map(|s| s.id),
        };
        self.refilter();
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> Vec<Effect> {
        if self.form.is_some() {
            return self.handle_form_key(key);
        }
        if let Some(id) = self.confirm_delete {
            return match key.code {
                KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => {
                    self.confirm_delete = None;
                    vec![Effect::Request(ApiRequest::DeleteQuestion(id))]
                }
                KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                    self.confirm_delete = None;
                    vec![]
                }
                _ => vec![],
            };
        }
        if self.mode == QuestionsMode::Search {
            match key.code {
                KeyCode::Enter | KeyCode::Esc => self.mode = QuestionsMode::Browse,
                _ => {
                    if self.search.handle_key(key) {
                        self.filter.search = self.search.value().to_string();
                        self.refilter();
                    }
                }
            }
            return vec![];
        }

        match key.code {
            KeyCode::Up | KeyCode::Char('k') => {
                self.selected = self.selected.saturating_sub(1);
            }
            KeyCode::Down | KeyCode::Char('j') => {
                if self.selected < self.filtered.len().saturating_sub(1) {
                    self.selected += 1;
                }
            }
            KeyCode::Char('/') => self.mode = QuestionsMode::Search,
            KeyCode::Char('s') => self.cycle_subject_filter(),
            KeyCode::Char('f') => {
                self.filter.difficulty = Difficulty::cycle(self.filter.difficulty);
                self.refilter();
            }
            KeyCode::Char('c') => {
                self.filter.clear();
                self.search.clear();
                self.refilter();
            }
            KeyCode::Char('a') => self.form = Some(QuestionForm::default()),
            KeyCode::Char('d') => {
                self.confirm_delete = self.selected_question().map(|q| q.id);
            }
            KeyCode::Char('r') => {
                self.loading = true;
                return self.mount_effects();
            }
            _ => {}
        }
        vec![]
    }

    fn handle_form_key(&mut self, key: KeyEvent) -> Vec<Effect> {
        let Some(form) = self.form.as_mut() else {
            return vec![];
        };
        if form.submitting {
            return vec![];
        }

        let submit = (key.code == KeyCode::Char('s')
            && key.modifiers.contains(KeyModifiers::CONTROL))
            || (key.code == KeyCode::Enter && form.focus == QuestionField::Subject);
        if submit {
            return match form.validate() {
                Ok(question) => {
                    form.submitting = true;
                    vec![Effect::Request(ApiRequest::CreateQuestion(question))]
                }
                Err(message) => vec![Effect::Toast(Toast::error(&message))],
            };
        }

        match key.code {
            KeyCode::Esc => self.form = None,
            KeyCode::Tab | KeyCode::Down | KeyCode::Enter => form.focus = form.focus.next(),
            KeyCode::BackTab | KeyCode::Up => form.focus = form.focus.prev(),
            _ => {
                if let Some(field) = form.focused_text_mut() {
                    field.handle_key(key);
                } else {
                    match key.code {
                        KeyCode::Left => form.cycle_choice(false),
                        KeyCode::Right | KeyCode::Char(' ') => form.cycle_choice(true),
                        KeyCode::Char(c) if form.focus == QuestionField::Correct => {
                            if let Some(letter) = OptionLetter::from_char(c) {
                                form.correct_option = Some(letter);
                            }
                        }
                        _ => {}
                    }
                }
            }
        }
        vec![]
    }

    pub fn handle_response(&mut self, response: ApiResponse) -> Vec<Effect> {
        match response {
            ApiResponse::Questions(Ok(questions)) => {
                self.questions = questions;
                self.loading = false;
                self.refilter();
                vec![]
            }
            ApiResponse::Questions(Err(e)) => {
                self.loading = false;
                logger::error(&format!("Failed to load questions: {}", e));
                vec![Effect::Toast(Toast::error("Failed to load questions"))]
            }
            ApiResponse::Subjects(Ok(subjects)) => {
                self.subjects = subjects;
                vec![]
            }
            ApiResponse::Subjects(Err(e)) => {
                logger::error(&format!("Failed to load subjects: {}", e));
                vec![]
            }
            ApiResponse::QuestionCreated(Ok(())) => {
                self.form = None;
                vec![
                    Effect::Toast(Toast::success("Question added")),
                    Effect::Request(ApiRequest::FetchQuestions),
                    Effect::Request(ApiRequest::FetchSubjects),
                ]
            }
            ApiResponse::QuestionCreated(Err(e)) => {
                logger::error(&format!("Failed to add question: {}", e));
                if let Some(form) = self.form.as_mut() {
                    form.submitting = false;
                }
                vec![Effect::Toast(Toast::error("Failed to add question"))]
            }
            ApiResponse::QuestionDeleted { id, result } => {
                let toast = match result {
                    Ok(()) => Toast::success("Question deleted"),
                    Err(e) => {
                        logger::error(&format!("Failed to delete question {}: {}", id, e));
                        Toast::error("Failed to delete question")
                    }
                };
                vec![
                    Effect::Toast(toast),
                    Effect::Request(ApiRequest::FetchQuestions),
                ]
            }
            _ => vec![],
        }
    }
}
