pub mod client;
pub mod error;
#[cfg(test)]
pub mod mock;

pub use client::HttpApi;
pub use error::ApiError;

use crate::models::{
    AnswerSubmission, CreateExamRequest, ExamDetail, ExamSummary, GenerateExamRequest,
    NewQuestion, OverallPerformance, PerformanceEntry, Question, Subject,
};
use async_trait::async_trait;

/// The remote question-bank service. Views never call this directly; requests
/// go through the API worker.
#[async_trait]
pub trait QuestionBankApi: Send + Sync {
    async fn list_questions(&self) -> Result<Vec<Question>, ApiError>;
    async fn create_question(&self, question: &NewQuestion) -> Result<(), ApiError>;
    async fn delete_question(&self, id: i64) -> Result<(), ApiError>;
    async fn generate_exam(&self, request: &GenerateExamRequest)
        -> Result<Vec<Question>, ApiError>;

    async fn list_subjects(&self) -> Result<Vec<Subject>, ApiError>;

    async fn list_exams(&self) -> Result<Vec<ExamSummary>, ApiError>;
    async fn create_exam(&self, request: &CreateExamRequest) -> Result<(), ApiError>;
    async fn get_exam(&self, id: i64) -> Result<ExamDetail, ApiError>;
    async fn delete_exam(&self, id: i64) -> Result<(), ApiError>;
    async fn submit_answer(&self, exam_id: i64, answer: &AnswerSubmission)
        -> Result<(), ApiError>;

    async fn performance(&self) -> Result<Vec<PerformanceEntry>, ApiError>;
    async fn overall_performance(&self) -> Result<OverallPerformance, ApiError>;
    async fn reset_performance(&self) -> Result<(), ApiError>;
}
