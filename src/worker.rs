use crate::api::{ApiError, QuestionBankApi};
use crate::logger;
use crate::models::{
    AnswerSubmission, CreateExamRequest, DashboardStats, ExamDetail, ExamSummary,
    GenerateExamRequest, NewQuestion, OverallPerformance, PerformanceEntry, Question, Subject,
};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

pub const CHANNEL_CAPACITY: usize = 32;

/// A request or response tagged with the view mount generation that issued it.
#[derive(Debug, Clone, PartialEq)]
pub struct Envelope<T> {
    pub generation: u64,
    pub payload: T,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ApiRequest {
    FetchQuestions,
    FetchSubjects,
    CreateQuestion(NewQuestion),
    DeleteQuestion(i64),
    GenerateExam(GenerateExamRequest),
    CreateExam(CreateExamRequest),
    FetchExams,
    FetchExam(i64),
    DeleteExam(i64),
    SubmitAnswer {
        exam_id: i64,
        run_token: u64,
        answer: AnswerSubmission,
    },
    FetchPerformance,
    FetchOverallPerformance,
    ResetPerformance,
    FetchDashboard,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ApiResponse {
    Questions(Result<Vec<Question>, ApiError>),
    Subjects(Result<Vec<Subject>, ApiError>),
    QuestionCreated(Result<(), ApiError>),
    QuestionDeleted {
        id: i64,
        result: Result<(), ApiError>,
    },
    ExamQuestionsGenerated(Result<Vec<Question>, ApiError>),
    ExamCreated(Result<(), ApiError>),
    Exams(Result<Vec<ExamSummary>, ApiError>),
    Exam {
        id: i64,
        result: Result<ExamDetail, ApiError>,
    },
    ExamDeleted {
        id: i64,
        result: Result<(), ApiError>,
    },
    AnswerSubmitted {
        exam_id: i64,
        run_token: u64,
        question_id: i64,
        result: Result<(), ApiError>,
    },
    Performance(Result<Vec<PerformanceEntry>, ApiError>),
    OverallPerformance(Result<OverallPerformance, ApiError>),
    PerformanceReset(Result<(), ApiError>),
    Dashboard(Result<DashboardStats, ApiError>),
}

/// Runs one request against the service and wraps the outcome.
pub async fn execute(api: &dyn QuestionBankApi, request: ApiRequest) -> ApiResponse {
    match request {
        ApiRequest::FetchQuestions => ApiResponse::Questions(api.list_questions().await),
        ApiRequest::FetchSubjects => ApiResponse::Subjects(api.list_subjects().await),
        ApiRequest::CreateQuestion(question) => {
            ApiResponse::QuestionCreated(api.create_question(&question).await)
        }
        ApiRequest::DeleteQuestion(id) => ApiResponse::QuestionDeleted {
            id,
            result: api.delete_question(id).await,
        },
        ApiRequest::GenerateExam(config) => {
            ApiResponse::ExamQuestionsGenerated(api.generate_exam(&config).await)
        }
        ApiRequest::CreateExam(request) => ApiResponse::ExamCreated(api.create_exam(&request).await),
        ApiRequest::FetchExams => ApiResponse::Exams(api.list_exams().await),
        ApiRequest::FetchExam(id) => ApiResponse::Exam {
            id,
            result: api.get_exam(id).await,
        },
        ApiRequest::DeleteExam(id) => ApiResponse::ExamDeleted {
            id,
            result: api.delete_exam(id).await,
        },
        ApiRequest::SubmitAnswer {
            exam_id,
            run_token,
            answer,
        } => ApiResponse::AnswerSubmitted {
            exam_id,
            run_token,
            question_id: answer.question_id,
            result: api.submit_answer(exam_id, &answer).await,
        },
        ApiRequest::FetchPerformance => ApiResponse::Performance(api.performance().await),
        ApiRequest::FetchOverallPerformance => {
            ApiResponse::OverallPerformance(api.overall_performance().await)
        }
        ApiRequest::ResetPerformance => {
            ApiResponse::PerformanceReset(api.reset_performance().await)
        }
        ApiRequest::FetchDashboard => ApiResponse::Dashboard(fetch_dashboard(api).await),
    }
}

async fn fetch_dashboard(api: &dyn QuestionBankApi) -> Result<DashboardStats, ApiError> {
    let (questions, exams, subjects, overall) = futures::try_join!(
        api.list_questions(),
        api.list_exams(),
        api.list_subjects(),
        api.overall_performance(),
    )?;
    Ok(DashboardStats {
        total_questions: questions.len(),
        total_exams: exams.len(),
        total_subjects: subjects.len(),
        overall_accuracy: overall.overall_accuracy,
    })
}

/// Drains the request channel, running every request on its own task so slow
/// calls never hold up the others. Exits once the request sender is dropped.
pub fn spawn_api_worker(
    api: Arc<dyn QuestionBankApi>,
    mut requests: mpsc::Receiver<Envelope<ApiRequest>>,
    responses: mpsc::Sender<Envelope<ApiResponse>>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(Envelope {
            generation,
            payload,
        }) = requests.recv().await
        {
            logger::log(&format!("Worker received {:?} (generation {})", payload, generation));
            let api = Arc::clone(&api);
            let responses = responses.clone();
            tokio::spawn(async move {
                let payload = execute(api.as_ref(), payload).await;
                if responses
                    .send(Envelope {
                        generation,
                        payload,
                    })
                    .await
                    .is_err()
                {
                    logger::log("Response channel closed, dropping API response");
                }
            });
        }
        logger::log("Worker request channel disconnected, exiting");
    })
}
