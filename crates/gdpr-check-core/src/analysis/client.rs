use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};
use url::Url;

use super::analyzer::{AnalyzerError, AnalyzerResult, ComplianceAnalyzer};
use super::config::{CompletionParams, LlmConfig};
use super::parse::{parse_analysis, parse_improvements};
use super::prompts::{
    analysis_prompt, improvements_prompt, ANALYSIS_SYSTEM_PROMPT, IMPROVEMENTS_SYSTEM_PROMPT,
};
use super::types::{AnalysisResult, ImprovementSuggestions};

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ModelList {
    #[serde(default)]
    data: Vec<ModelEntry>,
}

#[derive(Debug, Deserialize)]
struct ModelEntry {
    id: String,
}

/// Client for an OpenAI-compatible chat completions API.
pub struct LlmClient {
    http: Client,
    base: Url,
    config: LlmConfig,
}

impl LlmClient {
    pub fn new(config: LlmConfig) -> AnalyzerResult<Self> {
        let http = Client::builder()
            .connect_timeout(config.connect_timeout())
            .timeout(config.request_timeout())
            .user_agent(concat!("gdpr-check/", env!("CARGO_PKG_VERSION")))
            .build()?;

        let base = base_url(&config.base_url)?;

        Ok(Self { http, base, config })
    }

    pub const fn config(&self) -> &LlmConfig {
        &self.config
    }

    fn api_key(&self) -> AnalyzerResult<&str> {
        self.config
            .api_key
            .as_deref()
            .ok_or(AnalyzerError::MissingApiKey)
    }

    async fn handle_response<T: for<'de> Deserialize<'de>>(response: Response) -> AnalyzerResult<T> {
        let status = response.status();
        if status.is_success() {
            return Ok(response.json().await?);
        }

        let body = response.text().await.unwrap_or_default();
        Err(AnalyzerError::Api {
            status: status.as_u16(),
            message: api_error_message(&body),
        })
    }

    #[instrument(skip(self, system, user), fields(model = %self.config.model))]
    async fn complete(
        &self,
        system: &str,
        user: &str,
        params: CompletionParams,
    ) -> AnalyzerResult<String> {
        let key = self.api_key()?;
        let request = ChatRequest {
            model: &self.config.model,
            messages: [
                ChatMessage {
                    role: "system",
                    content: system,
                },
                ChatMessage {
                    role: "user",
                    content: user,
                },
            ],
            temperature: params.temperature,
            max_tokens: params.max_tokens,
        };

        let response = self
            .http
            .post(self.base.join("chat/completions")?)
            .bearer_auth(key)
            .json(&request)
            .send()
            .await?;

        let body: ChatResponse = Self::handle_response(response).await?;
        let content = body
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or(AnalyzerError::EmptyResponse)?;

        debug!(chars = content.len(), "Model completion received");
        Ok(content)
    }
}

#[async_trait]
impl ComplianceAnalyzer for LlmClient {
    async fn assess_compliance(
        &self,
        text: &str,
        document_name: &str,
    ) -> AnalyzerResult<AnalysisResult> {
        let prompt = analysis_prompt(text, document_name);
        let raw = self
            .complete(ANALYSIS_SYSTEM_PROMPT, &prompt, self.config.analysis)
            .await?;
        Ok(parse_analysis(&raw))
    }

    async fn suggest_improvements(
        &self,
        analysis: &AnalysisResult,
    ) -> AnalyzerResult<ImprovementSuggestions> {
        let prompt = improvements_prompt(analysis);
        let raw = self
            .complete(IMPROVEMENTS_SYSTEM_PROMPT, &prompt, self.config.improvements)
            .await?;
        Ok(parse_improvements(&raw))
    }

    #[instrument(skip(self))]
    async fn list_models(&self) -> AnalyzerResult<Vec<String>> {
        let key = self.api_key()?;
        let response = self
            .http
            .get(self.base.join("models")?)
            .bearer_auth(key)
            .send()
            .await?;

        let list: ModelList = Self::handle_response(response).await?;
        Ok(list.data.into_iter().map(|m| m.id).collect())
    }

    fn default_model(&self) -> &str {
        &self.config.model
    }
}

/// Parses `raw` as a base URL, adding the trailing slash `Url::join` needs to
/// keep the last path segment.
pub(crate) fn base_url(raw: &str) -> Result<Url, url::ParseError> {
    if raw.ends_with('/') {
        Url::parse(raw)
    } else {
        Url::parse(&format!("{raw}/"))
    }
}

/// Pulls `error.message` out of an OpenAI-style error body, falling back to
/// the raw body.
fn api_error_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| {
            v.pointer("/error/message")
                .or_else(|| v.pointer("/detail"))
                .and_then(|m| m.as_str())
                .map(String::from)
        })
        .unwrap_or_else(|| body.trim().to_string())
}
