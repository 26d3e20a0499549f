use super::{ApiError, QuestionBankApi};
use crate::logger;
use crate::models::{
    AnswerSubmission, CreateExamRequest, ExamDetail, ExamSummary, GenerateExamRequest,
    NewQuestion, OverallPerformance, PerformanceEntry, Question, Subject,
};
use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct HttpApi {
    client: Client,
    base_url: String,
}

impl HttpApi {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ApiError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        logger::log(&format!("{} {}", method, url));
        self.client.request(method, url)
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let response = self.request(Method::GET, path).send().await?;
        decode_json(response).await
    }

    async fn post_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let response = self.request(Method::POST, path).json(body).send().await?;
        decode_json(response).await
    }

    async fn send_expecting_success(&self, request: RequestBuilder) -> Result<(), ApiError> {
        let response = request.send().await?;
        ensure_success(response).await.map(|_| ())
    }
}

async fn ensure_success(response: Response) -> Result<String, ApiError> {
    let status = response.status();
    let body = response.text().await?;
    if !status.is_success() {
        logger::error(&format!("HTTP {} body: {}", status.as_u16(), body));
        return Err(ApiError::from_status(status.as_u16(), &body));
    }
    Ok(body)
}

async fn decode_json<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
    let body = ensure_success(response).await?;
    serde_json::from_str(&body).map_err(|e| {
        logger::error(&format!("Failed to decode response: {}\nRaw: {}", e, body));
        ApiError::Decode(e.to_string())
    })
}

#[async_trait]
impl QuestionBankApi for HttpApi {
    async fn list_questions(&self) -> Result<Vec<Question>, ApiError> {
        self.get_json("/api/questions").await
    }

    async fn create_question(&self, question: &NewQuestion) -> Result<(), ApiError> {
        self.send_expecting_success(self.request(Method::POST, "/api/questions").json(question))
            .await
    }

    async fn delete_question(&self, id: i64) -> Result<(), ApiError> {
        self.send_expecting_success(self.request(Method::DELETE, &format!("/api/questions/{}", id)))
            .await
    }

    async fn generate_exam(
        &self,
        request: &GenerateExamRequest,
    ) -> Result<Vec<Question>, ApiError> {
        self.post_json("/api/questions/generate-exam", request).await
    }

    async fn list_subjects(&self) -> Result<Vec<Subject>, ApiError> {
        self.get_json("/api/subjects").await
    }

    async fn list_exams(&self) -> Result<Vec<ExamSummary>, ApiError> {
        self.get_json("/api/exams").await
    }

    async fn create_exam(&self, request: &CreateExamRequest) -> Result<(), ApiError> {
        self.send_expecting_success(self.request(Method::POST, "/api/exams").json(request))
            .await
    }

    async fn get_exam(&self, id: i64) -> Result<ExamDetail, ApiError> {
        self.get_json(&format!("/api/exams/{}", id)).await
    }

    async fn delete_exam(&self, id: i64) -> Result<(), ApiError> {
        self.send_expecting_success(self.request(Method::DELETE, &format!("/api/exams/{}", id)))
            .await
    }

    async fn submit_answer(
        &self,
        exam_id: i64,
        answer: &AnswerSubmission,
    ) -> Result<(), ApiError> {
        let path = format!("/api/exams/{}/answer", exam_id);
        self.send_expecting_success(self.request(Method::POST, &path).json(answer))
            .await
    }

    async fn performance(&self) -> Result<Vec<PerformanceEntry>, ApiError> {
        self.get_json("/api/performance").await
    }

    async fn overall_performance(&self) -> Result<OverallPerformance, ApiError> {
        self.get_json("/api/performance/overall").await
    }

    async fn reset_performance(&self) -> Result<(), ApiError> {
        self.send_expecting_success(self.request(Method::POST, "/api/performance/reset"))
            .await
    }
}
