//! Fit scoring through an OpenAI-compatible chat completion endpoint
//!
//! The vacancy and résumé summaries are sent under fixed section headers with
//! a fixed rubric as the system message. The model output is returned as-is
//! for display.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;
const MAX_TOKENS: u32 = 1000;
const TEMPERATURE: f32 = 0.0;

/// Scoring rubric: short justification, a separate résumé-quality assessment
/// that feeds the final score, then a score from 1 to 10.
pub const SYSTEM_PROMPT: &str = "\
Проскорь кандидата, насколько он подходит для данной вакансии.

Сначала напиши короткий анализ, который будет пояснять оценку.
Отдельно оцени качество заполнения резюме (понятно ли, с какими задачами сталкивался кандидат и каким образом их решал?). Эта оценка должна учитываться при выставлении финальной оценки - нам важно нанимать таких кандидатов, которые могут рассказать про свою работу
Потом представь результат в виде оценки от 1 до 10.";

#[derive(Debug, Error)]
pub enum ScoringError {
    #[error("HTTP error: {0}")]
    Http(#[from] ureq::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("model returned empty content")]
    EmptyContent,
}

/// Combine both summaries into the user message.
pub fn build_user_prompt(vacancy_text: &str, resume_text: &str) -> String {
    format!("# ВАКАНСИЯ\n{}\n\n# РЕЗЮМЕ\n{}", vacancy_text, resume_text)
}

/// Anything that can answer a system + user prompt pair.
pub trait Scorer {
    fn score(&self, system: &str, user: &str) -> Result<String, ScoringError>;
}

#[derive(Debug, Clone)]
pub struct ChatConfig {
    pub api_key: String,
    pub base_url: String,
    pub model: String,
    pub timeout: Duration,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
pub struct ChatResponse {
    pub choices: Vec<Choice>,
    #[serde(default)]
    pub usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
pub struct Choice {
    pub message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
pub struct ResponseMessage {
    pub content: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct Usage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
}

impl ChatResponse {
    /// Content of the first choice.
    pub fn text(&self) -> Option<&str> {
        self.choices
            .first()
            .and_then(|c| c.message.content.as_deref())
            .filter(|text| !text.trim().is_empty())
    }
}

#[derive(Debug, Deserialize)]
struct ApiErrorEnvelope {
    error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: String,
}

/// Pull the human-readable message out of an error body, falling back to the
/// raw body.
fn api_error_message(body: String) -> String {
    serde_json::from_str::<ApiErrorEnvelope>(&body)
        .map(|e| e.error.message)
        .unwrap_or(body)
}

/// Chat completion client. One request per call, no retries.
pub struct ChatClient {
    agent: ureq::Agent,
    config: ChatConfig,
}

impl ChatClient {
    pub fn new(config: ChatConfig) -> Self {
        let agent = ureq::Agent::new_with_config(
            ureq::Agent::config_builder()
                .timeout_global(Some(config.timeout))
                .http_status_as_error(false)
                .build(),
        );
        Self { agent, config }
    }

    pub fn model(&self) -> &str {
        &self.config.model
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/chat/completions",
            self.config.base_url.trim_end_matches('/')
        )
    }

    fn request_body(&self, system: &str, user: &str) -> Result<String, ScoringError> {
        let request = ChatRequest {
            model: &self.config.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: system,
                },
                ChatMessage {
                    role: "user",
                    content: user,
                },
            ],
            max_tokens: MAX_TOKENS,
            temperature: TEMPERATURE,
        };
        Ok(serde_json::to_string(&request)?)
    }
}

impl Scorer for ChatClient {
    fn score(&self, system: &str, user: &str) -> Result<String, ScoringError> {
        let body = self.request_body(system, user)?;

        let resp = self
            .agent
            .post(self.endpoint().as_str())
            .header("Authorization", format!("Bearer {}", self.config.api_key))
            .header("Content-Type", "application/json")
            .send(body)?;

        let status = resp.status();
        let text = resp.into_body().read_to_string()?;

        if !status.is_success() {
            return Err(ScoringError::Api {
                status: status.as_u16(),
                message: api_error_message(text),
            });
        }

        let response: ChatResponse = serde_json::from_str(&text)?;
        if let Some(usage) = &response.usage {
            debug!(
                prompt_tokens = usage.prompt_tokens,
                completion_tokens = usage.completion_tokens,
                "scoring call succeeded"
            );
        }

        response
            .text()
            .map(String::from)
            .ok_or(ScoringError::EmptyContent)
    }
}
