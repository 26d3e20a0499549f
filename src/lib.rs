pub mod api;
pub mod app;
pub mod config;
pub mod dashboard;
pub mod exams;
pub mod filter;
pub mod input;
pub mod logger;
pub mod models;
pub mod performance;
pub mod questions;
pub mod toast;
pub mod ui;
pub mod utils;
pub mod worker;


// Re-exports for convenience
pub use api::{ApiError, HttpApi, QuestionBankApi};
pub use app::{App, Effect, Route};
pub use config::Config;
pub use filter::QuestionFilter;
pub use models::{Difficulty, ExamDetail, ExamSummary, OptionLetter, Question, Subject};
pub use worker::{spawn_api_worker, ApiRequest, ApiResponse, Envelope};
