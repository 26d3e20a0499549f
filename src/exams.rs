use crate::api::ApiError;
use crate::app::Effect;
use crate::input::TextField;
use crate::logger;
use crate::models::{
    AnswerSubmission, CreateExamRequest, Difficulty, ExamDetail, ExamStatus, ExamSummary,
    GenerateExamRequest, OptionLetter, Question, Subject,
};
use crate::toast::Toast;
use crate::utils::clamp_index;
use crate::worker::{ApiRequest, ApiResponse};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::collections::{BTreeSet, HashMap};

pub const QUANTITY_CHOICES: [u32; 4] = [5, 10, 15, 20];
pub const DEFAULT_QUANTITY_INDEX: usize = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExamField {
    Name,
    Quantity,
    Difficulty,
    OnlyNew,
    Subjects,
}

impl ExamField {
    pub const ORDER: [ExamField; 5] = [
        ExamField::Name,
        ExamField::Quantity,
        ExamField::Difficulty,
        ExamField::OnlyNew,
        ExamField::Subjects,
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
}

/// Which half of the generate-then-create sequence is in flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormStage {
    Editing,
    Generating,
    Creating,
}

#[derive(Debug, Clone)]
pub struct ExamForm {
    pub name: TextField,
    pub quantity_index: usize,
    pub difficulty: Option<Difficulty>,
    pub only_new: bool,
    pub subject_ids: BTreeSet<i64>,
    pub subject_cursor: usize,
    pub focus: ExamField,
    pub stage: FormStage,
}

impl Default for ExamForm {
    fn default() -> Self {
        Self {
            name: TextField::new(),
            quantity_index: DEFAULT_QUANTITY_INDEX,
            difficulty: None,
            only_new: false,
            subject_ids: BTreeSet::new(),
            subject_cursor: 0,
            focus: ExamField::Name,
            stage: FormStage::Editing,
        }
    }
}

impl ExamForm {
    pub fn quantity(&self) -> u32 {
        QUANTITY_CHOICES[clamp_index(self.quantity_index, QUANTITY_CHOICES.len())]
    }

    pub fn is_busy(&self) -> bool {
        self.stage != FormStage::Editing
    }

    pub fn exam_name(&self) -> &str {
        self.name.value().trim()
    }

    pub fn generate_request(&self) -> Result<GenerateExamRequest, String> {
        if self.name.is_blank() {
            return Err("Exam name is required".to_string());
        }
        Ok(GenerateExamRequest {
            quantity: self.quantity(),
            subject_ids: self.subject_ids.iter().copied().collect(),
            difficulty: self.difficulty,
            only_new: self.only_new,
        })
    }

    fn toggle_subject(&mut self, subjects: &[Subject]) {
        if let Some(subject) = subjects.get(self.subject_cursor)
            && !self.subject_ids.remove(&subject.id)
        {
            self.subject_ids.insert(subject.id);
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advance {
    Next,
    Finished,
}

/// One pass through an exam. `index` always points at a question because a
/// run cannot be built from an empty exam. `token` tells this pass apart from
/// earlier passes over the same exam.
#[derive(Debug, Clone, PartialEq)]
pub struct ExamRun {
    pub exam: ExamDetail,
    pub token: u64,
    pub index: usize,
    pub answers: HashMap<i64, OptionLetter>,
    pub highlighted: usize,
    pub submitting: bool,
}

impl ExamRun {
    pub fn start(exam: ExamDetail) -> Option<Self> {
        if exam.questions.is_empty() {
            return None;
        }
        Some(Self {
            exam,
            token: 0,
            index: 0,
            answers: HashMap::new(),
            highlighted: 0,
            submitting: false,
        })
    }

    pub fn current_question(&self) -> Option<&Question> {
        self.exam.questions.get(self.index)
    }

    pub fn current_answer(&self) -> Option<OptionLetter> {
        self.current_question()
            .and_then(|q| self.answers.get(&q.id).copied())
    }

    pub fn select(&mut self, letter: OptionLetter) {
        if self.submitting {
            return;
        }
        if let Some(id) = self.current_question().map(|q| q.id) {
            self.answers.insert(id, letter);
            self.highlighted = letter.index();
        }
    }

    pub fn can_advance(&self) -> bool {
        !self.submitting && self.current_answer().is_some()
    }

    pub fn is_last(&self) -> bool {
        self.index + 1 >= self.exam.questions.len()
    }

    pub fn total(&self) -> usize {
        self.exam.questions.len()
    }

    /// Marks the current answer as in flight and returns the body to send.
    pub fn begin_submit(&mut self) -> Option<AnswerSubmission> {
        if !self.can_advance() {
            return None;
        }
        let question_id = self.current_question()?.id;
        let user_answer = self.current_answer()?;
        self.submitting = true;
        Some(AnswerSubmission {
            question_id,
            user_answer,
        })
    }

    /// True when an ack for `question_id` sent by the run with `token` is the
    /// one this run is waiting on.
    pub fn awaits_ack(&self, token: u64, question_id: i64) -> bool {
        self.submitting
            && self.token == token
            && self.current_question().map(|q| q.id) == Some(question_id)
    }

    /// Applies a server acknowledgement. Acks for anything other than the
    /// in-flight question are ignored.
    pub fn confirm_submitted(&mut self, question_id: i64) -> Option<Advance> {
        if !self.awaits_ack(self.token, question_id) {
            return None;
        }
        self.submitting = false;
        if self.is_last() {
            return Some(Advance::Finished);
        }
        self.index += 1;
        self.highlighted = self.current_answer().map(|l| l.index()).unwrap_or(0);
        Some(Advance::Next)
    }

    pub fn submit_failed(&mut self) {
        self.submitting = false;
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ExamSession {
    Closed,
    Loading { exam_id: i64 },
    InProgress(ExamRun),
}

pub fn action_label(exam: &ExamSummary) -> &'static str {
    match exam.status() {
        ExamStatus::NotStarted => "Start",
        ExamStatus::InProgress => "Continue",
        ExamStatus::Completed => "Review",
    }
}

fn can_start(exam: &ExamSummary) -> bool {
    exam.total_questions == 0 || exam.answered_questions < exam.total_questions
}

#[derive(Debug)]
pub struct ExamsView {
    pub exams: Vec<ExamSummary>,
    pub subjects: Vec<Subject>,
    pub selected: usize,
    pub form: Option<ExamForm>,
    pub confirm_delete: Option<i64>,
    pub session: ExamSession,
    pub loading: bool,
    runs_started: u64,
}

impl Default for ExamsView {
    fn default() -> Self {
        Self::new()
    }
}

impl ExamsView {
    pub fn new() -> Self {
        Self {
            exams: Vec::new(),
            subjects: Vec::new(),
            selected: 0,
            form: None,
            confirm_delete: None,
            session: ExamSession::Closed,
            loading: true,
            runs_started: 0,
        }
    }

    pub fn mount_effects(&self) -> Vec<Effect> {
        vec![
            Effect::Request(ApiRequest::FetchExams),
            Effect::Request(ApiRequest::FetchSubjects),
        ]
    }

    pub fn captures_input(&self) -> bool {
        self.form.is_some() || self.confirm_delete.is_some() || self.session != ExamSession::Closed
    }

    pub fn selected_exam(&self) -> Option<&ExamSummary> {
        self.exams.get(self.selected)
    }

    pub fn run(&self) -> Option<&ExamRun> {
        match &self.session {
            ExamSession::InProgress(run) => Some(run),
            _ => None,
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> Vec<Effect> {
        match self.session {
            ExamSession::InProgress(_) => return self.handle_runner_key(key),
            ExamSession::Loading { .. } => {
                if key.code == KeyCode::Esc {
                    self.session = ExamSession::Closed;
                }
                return vec![];
            }
            ExamSession::Closed => {}
        }
        if self.form.is_some() {
            return self.handle_form_key(key);
        }
        if let Some(id) = self.confirm_delete {
            return match key.code {
                KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => {
                    self.confirm_delete = None;
                    vec![Effect::Request(ApiRequest::DeleteExam(id))]
                }
                KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                    self.confirm_delete = None;
                    vec![]
                }
                _ => vec![],
            };
        }

        match key.code {
            KeyCode::Up | KeyCode::Char('k') => {
                self.selected = self.selected.saturating_sub(1);
            }
            KeyCode::Down | KeyCode::Char('j') => {
                if self.selected < self.exams.len().saturating_sub(1) {
                    self.selected += 1;
                }
            }
            KeyCode::Char('n') => self.form = Some(ExamForm::default()),
            KeyCode::Char('d') => {
                self.confirm_delete = self.selected_exam().map(|e| e.id);
            }
            KeyCode::Char('r') => {
                self.loading = true;
                return self.mount_effects();
            }
            KeyCode::Enter => return self.open_selected(),
            _ => {}
        }
        vec![]
    }

    fn open_selected(&mut self) -> Vec<Effect> {
        let Some(exam) = self.selected_exam() else {
            return vec![];
        };
        if !can_start(exam) {
            return vec![Effect::Toast(Toast::info(
                "Exam completed",
                "Every question in this exam has been answered",
            ))];
        }
        let exam_id = exam.id;
        self.session = ExamSession::Loading { exam_id };
        vec![Effect::Request(ApiRequest::FetchExam(exam_id))]
    }

    fn handle_form_key(&mut self, key: KeyEvent) -> Vec<Effect> {
        let subjects = &self.subjects;
        let Some(form) = self.form.as_mut() else {
            return vec![];
        };
        if form.is_busy() {
            return vec![];
        }

        let submit = key.code == KeyCode::Enter
            || (key.code == KeyCode::Char('s') && key.modifiers.contains(KeyModifiers::CONTROL));
        if submit {
            return match form.generate_request() {
                Ok(request) => {
                    form.stage = FormStage::Generating;
                    vec![Effect::Request(ApiRequest::GenerateExam(request))]
                }
                Err(message) => vec![Effect::Toast(Toast::error(&message))],
            };
        }

        match key.code {
            KeyCode::Esc => {
                self.form = None;
                return vec![];
            }
            KeyCode::Tab | KeyCode::Down => form.focus = form.focus.next(),
            KeyCode::BackTab | KeyCode::Up => form.focus = form.focus.prev(),
            _ => match form.focus {
                ExamField::Name => {
                    form.name.handle_key(key);
                }
                ExamField::Quantity => match key.code {
                    KeyCode::Left => form.quantity_index = form.quantity_index.saturating_sub(1),
                    KeyCode::Right => {
                        form.quantity_index =
                            clamp_index(form.quantity_index + 1, QUANTITY_CHOICES.len())
                    }
                    _ => {}
                },
                ExamField::Difficulty => {
                    if matches!(key.code, KeyCode::Left | KeyCode::Right | KeyCode::Char(' ')) {
                        form.difficulty = Difficulty::cycle(form.difficulty);
                    }
                }
                ExamField::OnlyNew => {
                    if key.code == KeyCode::Char(' ') {
                        form.only_new = !form.only_new;
                    }
                }
                ExamField::Subjects => match key.code {
                    KeyCode::Left => form.subject_cursor = form.subject_cursor.saturating_sub(1),
                    KeyCode::Right => {
                        form.subject_cursor = clamp_index(form.subject_cursor + 1, subjects.len())
                    }
                    KeyCode::Char(' ') => form.toggle_subject(subjects),
                    _ => {}
                },
            },
        }
        vec![]
    }

    fn handle_runner_key(&mut self, key: KeyEvent) -> Vec<Effect> {
        let ExamSession::InProgress(run) = &mut self.session else {
            return vec![];
        };
        if key.code == KeyCode::Esc {
            self.session = ExamSession::Closed;
            return vec![];
        }
        if run.submitting {
            return vec![];
        }

        match key.code {
            KeyCode::Char(c @ '1'..='4') => {
                let index = c as usize - '1' as usize;
                run.select(OptionLetter::ALL[index]);
            }
            KeyCode::Char(c) => {
                if let Some(letter) = OptionLetter::from_char(c) {
                    run.select(letter);
                } else if c == ' ' {
                    let index = clamp_index(run.highlighted, OptionLetter::ALL.len());
                    run.select(OptionLetter::ALL[index]);
                } else if c == 'k' {
                    run.highlighted = run.highlighted.saturating_sub(1);
                } else if c == 'j' {
                    run.highlighted = clamp_index(run.highlighted + 1, OptionLetter::ALL.len());
                }
            }
            KeyCode::Up => run.highlighted = run.highlighted.saturating_sub(1),
            KeyCode::Down => {
                run.highlighted = clamp_index(run.highlighted + 1, OptionLetter::ALL.len())
            }
            KeyCode::Enter => {
                let exam_id = run.exam.id;
                let run_token = run.token;
                if let Some(answer) = run.begin_submit() {
                    return vec![Effect::Request(ApiRequest::SubmitAnswer {
                        exam_id,
                        run_token,
                        answer,
                    })];
                }
            }
            _ => {}
        }
        vec![]
    }

    pub fn handle_response(&mut self, response: ApiResponse) -> Vec<Effect> {
        match response {
            ApiResponse::Exams(Ok(exams)) => {
                self.exams = exams;
                self.loading = false;
                self.selected = clamp_index(self.selected, self.exams.len());
                vec![]
            }
            ApiResponse::Exams(Err(e)) => {
                self.loading = false;
                logger::error(&format!("Failed to load exams: {}", e));
                vec![Effect::Toast(Toast::error("Failed to load exams"))]
            }
            ApiResponse::Subjects(Ok(subjects)) => {
                if let Some(form) = self.form.as_mut() {
                    form.subject_cursor = clamp_index(form.subject_cursor, subjects.len());
                }
                self.subjects = subjects;
                vec![]
            }
            ApiResponse::Subjects(Err(e)) => {
                logger::error(&format!("Failed to load subjects: {}", e));
                vec![]
            }
            ApiResponse::ExamQuestionsGenerated(result) => self.on_generated(result),
            ApiResponse::ExamCreated(result) => {
                let Some(form) = self.form.as_mut() else {
                    return vec![];
                };
                if form.stage != FormStage::Creating {
                    return vec![];
                }
                match result {
                    Ok(()) => {
                        logger::log(&format!("Exam '{}' created", form.exam_name()));
                        self.form = None;
                        vec![
                            Effect::Toast(Toast::success("Exam created")),
                            Effect::Request(ApiRequest::FetchExams),
                        ]
                    }
                    Err(e) => {
                        logger::error(&format!("Failed to create exam: {}", e));
                        form.stage = FormStage::Editing;
                        vec![Effect::Toast(Toast::error("Failed to create exam"))]
                    }
                }
            }
            ApiResponse::Exam { id, result } => {
                if self.session != (ExamSession::Loading { exam_id: id }) {
                    return vec![];
                }
                match result {
                    Ok(detail) => match ExamRun::start(detail) {
                        Some(mut run) => {
                            self.runs_started += 1;
                            run.token = self.runs_started;
                            self.session = ExamSession::InProgress(run);
                            vec![]
                        }
                        None => {
                            self.session = ExamSession::Closed;
                            vec![Effect::Toast(Toast::info(
                                "Empty exam",
                                "This exam has no questions",
                            ))]
                        }
                    },
                    Err(e) => {
                        logger::error(&format!("Failed to load exam {}: {}", id, e));
                        self.session = ExamSession::Closed;
                        vec![Effect::Toast(Toast::error("Failed to load exam"))]
                    }
                }
            }
            ApiResponse::ExamDeleted { id, result } => match result {
                Ok(()) => vec![
                    Effect::Toast(Toast::success("Exam deleted")),
                    Effect::Request(ApiRequest::FetchExams),
                ],
                Err(e) => {
                    logger::error(&format!("Failed to delete exam {}: {}", id, e));
                    vec![Effect::Toast(Toast::error("Failed to delete exam"))]
                }
            },
            ApiResponse::AnswerSubmitted {
                exam_id,
                run_token,
                question_id,
                result,
            } => self.on_answer_submitted(exam_id, run_token, question_id, result),
            _ => vec![],
        }
    }

    fn on_generated(
        &mut self,
        result: Result<Vec<Question>, ApiError>,
    ) -> Vec<Effect> {
        let Some(form) = self.form.as_mut() else {
            return vec![];
        };
        if form.stage != FormStage::Generating {
            return vec![];
        }
        match result {
            Ok(questions) if questions.is_empty() => {
                form.stage = FormStage::Editing;
                vec![Effect::Toast(Toast::error(
                    "No questions match the selected filters",
                ))]
            }
            Ok(questions) => {
                form.stage = FormStage::Creating;
                let request = CreateExamRequest {
                    name: form.exam_name().to_string(),
                    question_ids: questions.iter().map(|q| q.id).collect(),
                };
                vec![Effect::Request(ApiRequest::CreateExam(request))]
            }
            Err(e) => {
                logger::error(&format!("Failed to generate exam questions: {}", e));
                form.stage = FormStage::Editing;
                vec![Effect::Toast(Toast::error(
                    &e.user_message("Failed to generate questions"),
                ))]
            }
        }
    }

    fn on_answer_submitted(
        &mut self,
        exam_id: i64,
        run_token: u64,
        question_id: i64,
        result: Result<(), ApiError>,
    ) -> Vec<Effect> {
        let ExamSession::InProgress(run) = &mut self.session else {
            logger::log(&format!(
                "Ignoring answer ack for exam {} after the run closed",
                exam_id
            ));
            return vec![];
        };
        if run.exam.id != exam_id || !run.awaits_ack(run_token, question_id) {
            logger::log(&format!(
                "Ignoring stale answer ack for exam {} question {} (run {})",
                exam_id, question_id, run_token
            ));
            return vec![];
        }
        match result {
            Ok(()) => match run.confirm_submitted(question_id) {
                Some(Advance::Finished) => {
                    let name = run.exam.name.clone();
                    self.session = ExamSession::Closed;
                    vec![
                        Effect::Toast(Toast::info(
                            "Exam complete",
                            &format!("All answers for '{}' were submitted", name),
                        )),
                        Effect::Request(ApiRequest::FetchExams),
                    ]
                }
                Some(Advance::Next) | None => vec![],
            },
            Err(e) => {
                logger::error(&format!(
                    "Failed to submit answer for question {}: {}",
                    question_id, e
                ));
                run.submit_failed();
                vec![Effect::Toast(Toast::error("Failed to submit answer"))]
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::mock::sample_question;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::empty())
    }

    fn requests(effects: &[Effect]) -> Vec<ApiRequest> {
        effects
            .iter()
            .filter_map(|e| match e {
                Effect::Request(r) => Some(r.clone()),
                _ => None,
            })
            .collect()
    }

    fn toast_messages(effects: &[Effect]) -> Vec<String> {
        effects
            .iter()
            .filter_map(|e| match e {
                Effect::Toast(t) => Some(t.message.clone()),
                _ => None,
            })
            .collect()
    }

    fn detail(question_count: i64) -> ExamDetail {
        ExamDetail {
            id: 10,
            name: "Warm-up".to_string(),
            questions: (1..=question_count)
                .map(|i| sample_question(i, &format!("Question {}", i), 1, Difficulty::Easy))
                .collect(),
        }
    }

    fn summary(id: i64, total: u32, answered: u32) -> ExamSummary {
        ExamSummary {
            id,
            name: format!("Exam {}", id),
            total_questions: total,
            answered_questions: answered,
            score: 0.0,
        }
    }

    fn running_view(question_count: i64) -> ExamsView {
        let mut view = ExamsView::new();
        view.session = ExamSession::InProgress(ExamRun::start(detail(question_count)).unwrap());
        view
    }

    fn submit_form(view: &mut ExamsView, name: &str) -> Vec<Effect> {
        view.handle_key(key(KeyCode::Char('n')));
        for c in name.chars() {
            view.handle_key(key(KeyCode::Char(c)));
        }
        view.handle_key(key(KeyCode::Enter))
    }

    #[test]
    fn test_run_rejects_empty_exam() {
        assert!(ExamRun::start(detail(0)).is_none());
    }

    #[test]
    fn test_next_enabled_only_with_answer() {
        let mut run = ExamRun::start(detail(2)).unwrap();
        assert!(!run.can_advance());
        assert!(run.begin_submit().is_none());

        run.select(OptionLetter::C);
        assert!(run.can_advance());
        assert_eq!(run.current_answer(), Some(OptionLetter::C));
    }

    #[test]
    fn test_advance_waits_for_acknowledgement() {
        let mut run = ExamRun::start(detail(2)).unwrap();
        run.select(OptionLetter::B);
        let answer = run.begin_submit().unwrap();
        assert_eq!(answer.question_id, 1);
        assert_eq!(answer.user_answer, OptionLetter::B);
        assert!(run.submitting);
        assert!(!run.can_advance());
        assert_eq!(run.index, 0);

        // Stale ack for a different question changes nothing.
        assert_eq!(run.confirm_submitted(2), None);
        assert_eq!(run.index, 0);

        assert_eq!(run.confirm_submitted(1), Some(Advance::Next));
        assert_eq!(run.index, 1);
        assert!(!run.can_advance());

        run.select(OptionLetter::A);
        run.begin_submit().unwrap();
        assert_eq!(run.confirm_submitted(2), Some(Advance::Finished));
        assert_eq!(run.index, 1);
    }

    #[test]
    fn test_failed_submission_keeps_question_and_selection() {
        let mut run = ExamRun::start(detail(3)).unwrap();
        run.select(OptionLetter::D);
        run.begin_submit().unwrap();
        run.submit_failed();

        assert_eq!(run.index, 0);
        assert_eq!(run.current_answer(), Some(OptionLetter::D));
        assert!(run.can_advance());
    }

    #[test]
    fn test_selection_locked_while_submitting() {
        let mut run = ExamRun::start(detail(1)).unwrap();
        run.select(OptionLetter::A);
        run.begin_submit().unwrap();
        run.select(OptionLetter::B);
        assert_eq!(run.current_answer(), Some(OptionLetter::A));
    }

    #[test]
    fn test_action_labels_follow_progress() {
        assert_eq!(action_label(&summary(1, 10, 0)), "Start");
        assert_eq!(action_label(&summary(1, 10, 3)), "Continue");
        assert_eq!(action_label(&summary(1, 10, 10)), "Review");
    }

    #[test]
    fn test_open_exam_fetches_detail() {
        let mut view = ExamsView::new();
        view.handle_response(ApiResponse::Exams(Ok(vec![summary(10, 3, 0)])));
        let effects = view.handle_key(key(KeyCode::Enter));
        assert_eq!(requests(&effects), vec![ApiRequest::FetchExam(10)]);
        assert_eq!(view.session, ExamSession::Loading { exam_id: 10 });

        view.handle_response(ApiResponse::Exam {
            id: 10,
            result: Ok(detail(3)),
        });
        let run = view.run().unwrap();
        assert_eq!(run.index, 0);
        assert!(run.answers.is_empty());
    }

    #[test]
    fn test_completed_exam_cannot_be_started() {
        let mut view = ExamsView::new();
        view.handle_response(ApiResponse::Exams(Ok(vec![summary(10, 3, 3)])));
        let effects = view.handle_key(key(KeyCode::Enter));
        assert!(requests(&effects).is_empty());
        assert_eq!(view.session, ExamSession::Closed);
        assert_eq!(toast_messages(&effects).len(), 1);
    }

    #[test]
    fn test_empty_exam_detail_does_not_open() {
        let mut view = ExamsView::new();
        view.session = ExamSession::Loading { exam_id: 10 };
        let effects = view.handle_response(ApiResponse::Exam {
            id: 10,
            result: Ok(detail(0)),
        });
        assert_eq!(view.session, ExamSession::Closed);
        assert_eq!(toast_messages(&effects), vec!["This exam has no questions"]);
    }

    #[test]
    fn test_detail_for_abandoned_load_is_ignored() {
        let mut view = ExamsView::new();
        view.session = ExamSession::Loading { exam_id: 10 };
        view.handle_key(key(KeyCode::Esc));
        view.handle_response(ApiResponse::Exam {
            id: 10,
            result: Ok(detail(2)),
        });
        assert_eq!(view.session, ExamSession::Closed);
    }

    #[test]
    fn test_runner_keys_select_and_submit() {
        let mut view = running_view(2);
        assert!(view.handle_key(key(KeyCode::Enter)).is_empty());

        view.handle_key(key(KeyCode::Char('2')));
        assert_eq!(view.run().unwrap().current_answer(), Some(OptionLetter::B));

        view.handle_key(key(KeyCode::Down));
        view.handle_key(key(KeyCode::Char(' ')));
        assert_eq!(view.run().unwrap().current_answer(), Some(OptionLetter::C));

        view.handle_key(key(KeyCode::Char('d')));
        view.handle_key(key(KeyCode::Up));
        view.handle_key(key(KeyCode::Char('c')));

        let effects = view.handle_key(key(KeyCode::Enter));
        assert_eq!(
            requests(&effects),
            vec![ApiRequest::SubmitAnswer {
                exam_id: 10,
                run_token: 0,
                answer: AnswerSubmission {
                    question_id: 1,
                    user_answer: OptionLetter::C
                }
            }]
        );
        // A second Enter while in flight does not resubmit.
        assert!(view.handle_key(key(KeyCode::Enter)).is_empty());
    }

    #[test]
    fn test_last_ack_closes_run_and_refetches() {
        let mut view = running_view(1);
        view.handle_key(key(KeyCode::Char('a')));
        view.handle_key(key(KeyCode::Enter));

        let effects = view.handle_response(ApiResponse::AnswerSubmitted {
            exam_id: 10,
            run_token: 0,
            question_id: 1,
            result: Ok(()),
        });
        assert_eq!(view.session, ExamSession::Closed);
        assert_eq!(requests(&effects), vec![ApiRequest::FetchExams]);
    }

    #[test]
    fn test_submit_failure_toasts_and_stays() {
        let mut view = running_view(2);
        view.handle_key(key(KeyCode::Char('a')));
        view.handle_key(key(KeyCode::Enter));

        let effects = view.handle_response(ApiResponse::AnswerSubmitted {
            exam_id: 10,
            run_token: 0,
            question_id: 1,
            result: Err(ApiError::Transport("reset".to_string())),
        });
        assert_eq!(toast_messages(&effects), vec!["Failed to submit answer"]);
        let run = view.run().unwrap();
        assert_eq!(run.index, 0);
        assert!(run.can_advance());
    }

    #[test]
    fn test_ack_after_leaving_is_ignored() {
        let mut view = running_view(2);
        view.handle_key(key(KeyCode::Char('a')));
        view.handle_key(key(KeyCode::Enter));
        view.handle_key(key(KeyCode::Esc));

        let effects = view.handle_response(ApiResponse::AnswerSubmitted {
            exam_id: 10,
            run_token: 0,
            question_id: 1,
            result: Ok(()),
        });
        assert!(effects.is_empty());
        assert_eq!(view.session, ExamSession::Closed);
    }

    fn open_exam(view: &mut ExamsView) {
        view.handle_key(key(KeyCode::Enter));
        view.handle_response(ApiResponse::Exam {
            id: 10,
            result: Ok(detail(2)),
        });
    }

    fn submitted_token(effects: &[Effect]) -> u64 {
        match requests(effects).as_slice() {
            [ApiRequest::SubmitAnswer { run_token, .. }] => *run_token,
            other => panic!("expected one submission, got {:?}", other),
        }
    }

    fn ack(run_token: u64, result: Result<(), ApiError>) -> ApiResponse {
        ApiResponse::AnswerSubmitted {
            exam_id: 10,
            run_token,
            question_id: 1,
            result,
        }
    }

    /// Leaves a run with an answer in flight, re-opens the same exam and
    /// submits again. Returns the (old, new) run tokens.
    fn reopened_with_answer_in_flight(view: &mut ExamsView) -> (u64, u64) {
        view.handle_response(ApiResponse::Exams(Ok(vec![summary(10, 2, 0)])));
        open_exam(view);
        view.handle_key(key(KeyCode::Char('a')));
        let old = submitted_token(&view.handle_key(key(KeyCode::Enter)));
        view.handle_key(key(KeyCode::Esc));

        open_exam(view);
        view.handle_key(key(KeyCode::Char('b')));
        let new = submitted_token(&view.handle_key(key(KeyCode::Enter)));
        (old, new)
    }

    #[test]
    fn test_reopened_run_gets_fresh_token() {
        let mut view = ExamsView::new();
        let (old, new) = reopened_with_answer_in_flight(&mut view);
        assert_ne!(old, new);
        assert_eq!(view.run().unwrap().token, new);
    }

    #[test]
    fn test_failed_ack_from_abandoned_run_is_ignored() {
        let mut view = ExamsView::new();
        let (old, new) = reopened_with_answer_in_flight(&mut view);

        let effects =
            view.handle_response(ack(old, Err(ApiError::Transport("reset".to_string()))));
        assert!(effects.is_empty());
        assert!(view.run().unwrap().submitting);

        view.handle_response(ack(new, Ok(())));
        let run = view.run().unwrap();
        assert_eq!(run.index, 1);
        assert!(!run.submitting);
    }

    #[test]
    fn test_success_ack_from_abandoned_run_does_not_advance() {
        let mut view = ExamsView::new();
        let (old, new) = reopened_with_answer_in_flight(&mut view);

        assert!(view.handle_response(ack(old, Ok(()))).is_empty());
        let run = view.run().unwrap();
        assert_eq!(run.index, 0);
        assert!(run.submitting);

        let effects =
            view.handle_response(ack(new, Err(ApiError::Transport("reset".to_string()))));
        assert_eq!(toast_messages(&effects), vec!["Failed to submit answer"]);
        let run = view.run().unwrap();
        assert_eq!(run.index, 0);
        assert_eq!(run.current_answer(), Some(OptionLetter::B));
    }

    #[test]
    fn test_ack_without_submission_in_flight_is_ignored() {
        let mut view = running_view(2);
        view.handle_key(key(KeyCode::Char('a')));
        let effects = view.handle_response(ack(0, Err(ApiError::Transport("x".to_string()))));
        assert!(effects.is_empty());
        assert!(view.run().unwrap().can_advance());
    }

    #[test]
    fn test_form_defaults() {
        let form = ExamForm::default();
        assert_eq!(form.quantity(), 10);
        assert!(form.subject_ids.is_empty());
        assert!(form.difficulty.is_none());
        assert!(!form.only_new);
        assert!(form.generate_request().is_err());
    }

    #[test]
    fn test_form_edits_build_generate_request() {
        let mut view = ExamsView::new();
        view.handle_response(ApiResponse::Subjects(Ok(vec![
            Subject { id: 4, name: "Physics".to_string() },
            Subject { id: 7, name: "Chemistry".to_string() },
        ])));
        view.handle_key(key(KeyCode::Char('n')));
        for c in "Midterm".chars() {
            view.handle_key(key(KeyCode::Char(c)));
        }
        view.handle_key(key(KeyCode::Tab));
        view.handle_key(key(KeyCode::Right));
        view.handle_key(key(KeyCode::Tab));
        view.handle_key(key(KeyCode::Char(' ')));
        view.handle_key(key(KeyCode::Tab));
        view.handle_key(key(KeyCode::Char(' ')));
        view.handle_key(key(KeyCode::Tab));
        view.handle_key(key(KeyCode::Right));
        view.handle_key(key(KeyCode::Char(' ')));

        let effects = view.handle_key(key(KeyCode::Enter));
        assert_eq!(
            requests(&effects),
            vec![ApiRequest::GenerateExam(GenerateExamRequest {
                quantity: 15,
                subject_ids: vec![7],
                difficulty: Some(Difficulty::Easy),
                only_new: true,
            })]
        );
    }

    #[test]
    fn test_blank_name_is_rejected() {
        let mut view = ExamsView::new();
        let effects = submit_form(&mut view, "   ");
        assert!(requests(&effects).is_empty());
        assert_eq!(toast_messages(&effects), vec!["Exam name is required"]);
    }

    #[test]
    fn test_generate_then_create_sequence() {
        let mut view = ExamsView::new();
        let effects = submit_form(&mut view, "Final");
        assert_eq!(
            requests(&effects),
            vec![ApiRequest::GenerateExam(GenerateExamRequest {
                quantity: 10,
                subject_ids: vec![],
                difficulty: None,
                only_new: false,
            })]
        );
        // Busy form ignores resubmission.
        assert!(view.handle_key(key(KeyCode::Enter)).is_empty());

        let effects =
            view.handle_response(ApiResponse::ExamQuestionsGenerated(Ok(detail(3).questions)));
        assert_eq!(
            requests(&effects),
            vec![ApiRequest::CreateExam(CreateExamRequest {
                name: "Final".to_string(),
                question_ids: vec![1, 2, 3],
            })]
        );

        let effects = view.handle_response(ApiResponse::ExamCreated(Ok(())));
        assert!(view.form.is_none());
        assert_eq!(requests(&effects), vec![ApiRequest::FetchExams]);
    }

    #[test]
    fn test_generate_failure_surfaces_server_message() {
        let mut view = ExamsView::new();
        submit_form(&mut view, "Final");
        let effects = view.handle_response(ApiResponse::ExamQuestionsGenerated(Err(
            ApiError::Status {
                status: 400,
                message: Some("Not enough questions available".to_string()),
            },
        )));
        assert!(requests(&effects).is_empty());
        assert_eq!(toast_messages(&effects), vec!["Not enough questions available"]);
        assert_eq!(view.form.as_ref().unwrap().stage, FormStage::Editing);
    }

    #[test]
    fn test_generate_failure_without_message_uses_fallback() {
        let mut view = ExamsView::new();
        submit_form(&mut view, "Final");
        let effects = view.handle_response(ApiResponse::ExamQuestionsGenerated(Err(
            ApiError::Transport("refused".to_string()),
        )));
        assert_eq!(toast_messages(&effects), vec!["Failed to generate questions"]);
    }

    #[test]
    fn test_empty_generation_aborts() {
        let mut view = ExamsView::new();
        submit_form(&mut view, "Final");
        let effects = view.handle_response(ApiResponse::ExamQuestionsGenerated(Ok(vec![])));
        assert!(requests(&effects).is_empty());
        assert_eq!(
            toast_messages(&effects),
            vec!["No questions match the selected filters"]
        );
    }

    #[test]
    fn test_create_failure_keeps_form() {
        let mut view = ExamsView::new();
        submit_form(&mut view, "Final");
        view.handle_response(ApiResponse::ExamQuestionsGenerated(Ok(detail(2).questions)));
        let effects = view.handle_response(ApiResponse::ExamCreated(Err(ApiError::Status {
            status: 500,
            message: None,
        })));
        assert_eq!(toast_messages(&effects), vec!["Failed to create exam"]);
        let form = view.form.as_ref().unwrap();
        assert_eq!(form.stage, FormStage::Editing);
        assert_eq!(form.exam_name(), "Final");
    }

    #[test]
    fn test_exam_delete_refetches_only_on_success() {
        let mut view = ExamsView::new();
        view.handle_response(ApiResponse::Exams(Ok(vec![summary(10, 3, 0)])));
        view.handle_key(key(KeyCode::Char('d')));
        let effects = view.handle_key(key(KeyCode::Char('y')));
        assert_eq!(requests(&effects), vec![ApiRequest::DeleteExam(10)]);

        let effects = view.handle_response(ApiResponse::ExamDeleted {
            id: 10,
            result: Ok(()),
        });
        assert_eq!(requests(&effects), vec![ApiRequest::FetchExams]);

        let effects = view.handle_response(ApiResponse::ExamDeleted {
            id: 10,
            result: Err(ApiError::Status {
                status: 404,
                message: None,
            }),
        });
        assert!(requests(&effects).is_empty());
        assert_eq!(view.exams.len(), 1);
    }
}
