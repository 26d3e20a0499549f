//! In-memory stand-in for the remote service. Records every call in order so
//! tests can assert on request sequencing.

use super::{ApiError, QuestionBankApi};
use crate::models::{
    AnswerSubmission, CreateExamRequest, Difficulty, ExamDetail, ExamSummary,
    GenerateExamRequest, NewQuestion, OptionLetter, OverallPerformance, PerformanceEntry,
    Question, Subject,
};
use async_trait::async_trait;
use std::sync::Mutex;

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    ListQuestions,
    CreateQuestion(NewQuestion),
    DeleteQuestion(i64),
    GenerateExam(GenerateExamRequest),
    ListSubjects,
    ListExams,
    CreateExam(CreateExamRequest),
    GetExam(i64),
    DeleteExam(i64),
    SubmitAnswer(i64, AnswerSubmission),
    Performance,
    OverallPerformance,
    ResetPerformance,
}

pub struct MockApi {
    pub questions: Vec<Question>,
    pub subjects: Vec<Subject>,
    pub exams: Vec<ExamSummary>,
    pub exam_detail: Option<ExamDetail>,
    pub performance: Vec<PerformanceEntry>,
    pub overall: OverallPerformance,
    pub generated: Result<Vec<Question>, ApiError>,
    pub fail_create_exam: bool,
    pub fail_submit_answer: bool,
    calls: Mutex<Vec<Call>>,
}

pub fn sample_question(id: i64, text: &str, subject_id: i64, difficulty: Difficulty) -> Question {
    Question {
        id,
        text: text.to_string(),
        option_a: format!("{} option A", text),
        option_b: format!("{} option B", text),
        option_c: format!("{} option C", text),
        option_d: format!("{} option D", text),
        correct_option: Some(OptionLetter::A),
        difficulty,
        subject_id,
        subject_name: format!("Subject {}", subject_id),
        is_new: false,
    }
}

impl MockApi {
    pub fn new() -> Self {
        let questions = vec![
            sample_question(1, "Capital of France?", 1, Difficulty::Easy),
            sample_question(2, "Derivative of x^2?", 2, Difficulty::Medium),
            sample_question(3, "Year the Berlin wall fell?", 3, Difficulty::Hard),
        ];
        Self {
            subjects: vec![
                Subject { id: 1, name: "Subject 1".to_string() },
                Subject { id: 2, name: "Subject 2".to_string() },
                Subject { id: 3, name: "Subject 3".to_string() },
            ],
            exams: vec![ExamSummary {
                id: 10,
                name: "Warm-up".to_string(),
                total_questions: 3,
                answered_questions: 0,
                score: 0.0,
            }],
            exam_detail: Some(ExamDetail {
                id: 10,
                name: "Warm-up".to_string(),
                questions: questions.clone(),
            }),
            performance: vec![PerformanceEntry {
                subject_id: 1,
                subject_name: "Subject 1".to_string(),
                correct_answers: 3,
                total_answers: 4,
                accuracy: 75.0,
            }],
            overall: OverallPerformance {
                total_correct: 3,
                total_answers: 4,
                overall_accuracy: 75.0,
                subjects_count: 1,
            },
            generated: Ok(questions.clone()),
            questions,
            fail_create_exam: false,
            fail_submit_answer: false,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }

    fn record(&self, call: Call) {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(call);
        }
    }
}

fn server_error() -> ApiError {
    ApiError::Status {
        status: 500,
        message: None,
    }
}

#[async_trait]
impl QuestionBankApi for MockApi {
    async fn list_questions(&self) -> Result<Vec<Question>, ApiError> {
        self.record(Call::ListQuestions);
        Ok(self.questions.clone())
    }

    async fn create_question(&self, question: &NewQuestion) -> Result<(), ApiError> {
        self.record(Call::CreateQuestion(question.clone()));
        Ok(())
    }

    async fn delete_question(&self, id: i64) -> Result<(), ApiError> {
        self.record(Call::DeleteQuestion(id));
        Ok(())
    }

    async fn generate_exam(
        &self,
        request: &GenerateExamRequest,
    ) -> Result<Vec<Question>, ApiError> {
        self.record(Call::GenerateExam(request.clone()));
        self.generated.clone()
    }

    async fn list_subjects(&self) -> Result<Vec<Subject>, ApiError> {
        self.record(Call::ListSubjects);
        Ok(self.subjects.clone())
    }

    async fn list_exams(&self) -> Result<Vec<ExamSummary>, ApiError> {
        self.record(Call::ListExams);
        Ok(self.exams.clone())
    }

    async fn create_exam(&self, request: &CreateExamRequest) -> Result<(), ApiError> {
        self.record(Call::CreateExam(request.clone()));
        if self.fail_create_exam {
            return Err(server_error());
        }
        Ok(())
    }

    async fn get_exam(&self, id: i64) -> Result<ExamDetail, ApiError> {
        self.record(Call::GetExam(id));
        self.exam_detail.clone().ok_or(ApiError::Status {
            status: 404,
            message: Some("Exam not found".to_string()),
        })
    }

    async fn delete_exam(&self, id: i64) -> Result<(), ApiError> {
        self.record(Call::DeleteExam(id));
        Ok(())
    }

    async fn submit_answer(
        &self,
        exam_id: i64,
        answer: &AnswerSubmission,
    ) -> Result<(), ApiError> {
        self.record(Call::SubmitAnswer(exam_id, *answer));
        if self.fail_submit_answer {
            return Err(ApiError::Transport("connection reset".to_string()));
        }
        Ok(())
    }

    async fn performance(&self) -> Result<Vec<PerformanceEntry>, ApiError> {
        self.record(Call::Performance);
        Ok(self.performance.clone())
    }

    async fn overall_performance(&self) -> Result<OverallPerformance, ApiError> {
        self.record(Call::OverallPerformance);
        Ok(self.overall.clone())
    }

    async fn reset_performance(&self) -> Result<(), ApiError> {
        self.record(Call::ResetPerformance);
        Ok(())
    }
}
