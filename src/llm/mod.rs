//! LLM integration
//!
//! An OpenAI-compatible chat-completions client plus the prompt templates
//! and reply parsing used for transcript analysis.

pub mod prompts;

pub use prompts::AnalysisTask;

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::config::LlmProviderConfig;
use crate::domain::model::{ClipPlan, ClipSegment};
use crate::error::{Result, SpeechClipError};

/// Request timeout for chat completions
const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// One chat message in a completion request
#[derive(Debug, Clone, Serialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    /// A system-role message
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    /// A user-role message
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

/// Sampling parameters for a completion request
#[derive(Debug, Clone, Serialize)]
pub struct ChatParams {
    pub temperature: f64,
    pub max_tokens: u32,
    pub top_p: f64,
}

impl Default for ChatParams {
    fn default() -> Self {
        Self {
            temperature: 0.7,
            max_tokens: 2000,
            top_p: 0.9,
        }
    }
}

/// Token usage reported by the provider
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct TokenUsage {
    #[serde(default)]
    pub prompt_tokens: u64,
    #[serde(default)]
    pub completion_tokens: u64,
    #[serde(default)]
    pub total_tokens: u64,
}

/// A completed chat reply
#[derive(Debug, Clone)]
pub struct ChatReply {
    pub content: String,
    pub model: String,
    pub usage: TokenUsage,
}

#[derive(Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    temperature: f64,
    max_tokens: u32,
    top_p: f64,
    stream: bool,
}

#[derive(Deserialize)]
struct CompletionResponse {
    choices: Vec<CompletionChoice>,
    #[serde(default)]
    usage: TokenUsage,
    #[serde(default)]
    model: String,
}

#[derive(Deserialize)]
struct CompletionChoice {
    message: CompletionMessage,
}

#[derive(Deserialize)]
struct CompletionMessage {
    content: String,
}

/// Port for chat completion backends, so analysis can run against a fake
#[async_trait]
pub trait ChatBackend: Send + Sync {
    /// Send a chat completion request and return the first choice
    async fn chat(&self, messages: &[ChatMessage], params: &ChatParams) -> Result<ChatReply>;
}

/// Chat-completions client for one configured provider
pub struct LlmClient {
    provider: String,
    api_key: String,
    base_url: String,
    model: String,
    client: reqwest::Client,
}

impl LlmClient {
    /// Create a client for a provider entry. A missing API key fails here,
    /// before any request is attempted.
    pub fn new(provider: impl Into<String>, config: &LlmProviderConfig) -> Result<Self> {
        let provider = provider.into();
        let api_key = config
            .resolve_api_key()
            .ok_or_else(|| SpeechClipError::ModelLoad {
                message: format!("missing API key for provider '{}'", provider),
            })?;

        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| SpeechClipError::Network {
                message: format!("failed to build HTTP client: {}", e),
            })?;

        Ok(Self {
            provider,
            api_key,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            client,
        })
    }

    /// Provider name this client talks to
    pub fn provider(&self) -> &str {
        &self.provider
    }
}

#[async_trait]
impl ChatBackend for LlmClient {
    async fn chat(&self, messages: &[ChatMessage], params: &ChatParams) -> Result<ChatReply> {
        let url = format!("{}/chat/completions", self.base_url);
        let request = CompletionRequest {
            model: &self.model,
            messages,
            temperature: params.temperature,
            max_tokens: params.max_tokens,
            top_p: params.top_p,
            stream: false,
        };

        debug!("Sending chat request to {} ({})", self.provider, url);

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| SpeechClipError::Network {
                message: format!("request to {} failed: {}", self.provider, e),
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SpeechClipError::Network {
                message: format!("{} returned {}: {}", self.provider, status, body.trim()),
            });
        }

        let parsed: CompletionResponse =
            response.json().await.map_err(|e| SpeechClipError::Network {
                message: format!("invalid response from {}: {}", self.provider, e),
            })?;

        let choice = parsed
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| SpeechClipError::Network {
                message: format!("{} returned no choices", self.provider),
            })?;

        info!(
            "Chat completion from {} used {} tokens",
            self.provider, parsed.usage.total_tokens
        );

        Ok(ChatReply {
            content: choice.message.content,
            model: parsed.model,
            usage: parsed.usage,
        })
    }
}

// Reply parsing for the smart-clip task

#[derive(Deserialize)]
struct RawPlan {
    segments: Vec<RawSegment>,
}

#[derive(Deserialize)]
struct RawSegment {
    start_time: serde_json::Value,
    end_time: serde_json::Value,
    #[serde(default)]
    description: String,
    #[serde(default)]
    reason: String,
    #[serde(default)]
    score: Option<serde_json::Value>,
}

/// Parse an LLM smart-clip reply into a clip plan.
///
/// Models wrap JSON in code fences and emit times as either numbers or
/// numeric strings; both are tolerated. Segments that fail validation are
/// dropped, and an empty result is an error.
pub fn parse_clip_plan(content: &str, source: impl Into<std::path::PathBuf>) -> Result<ClipPlan> {
    let json = strip_code_fences(content);

    let raw: RawPlan = serde_json::from_str(json).map_err(|e| SpeechClipError::Validation {
        message: format!("LLM reply is not a valid clip plan: {}", e),
    })?;

    let mut segments = Vec::new();
    for raw_segment in raw.segments {
        let (Some(start), Some(end)) = (
            value_as_seconds(&raw_segment.start_time),
            value_as_seconds(&raw_segment.end_time),
        ) else {
            continue;
        };

        match ClipSegment::new(start, end, raw_segment.description) {
            Ok(mut segment) => {
                segment.reason = raw_segment.reason;
                segment.score = raw_segment
                    .score
                    .as_ref()
                    .and_then(value_as_score)
                    .unwrap_or(5);
                segments.push(segment);
            }
            Err(e) => {
                tracing::warn!("Dropping invalid segment from LLM reply: {}", e);
            }
        }
    }

    if segments.is_empty() {
        return Err(SpeechClipError::Validation {
            message: "LLM reply contained no usable segments".to_string(),
        });
    }

    Ok(ClipPlan::new(source, segments))
}

/// Strip surrounding markdown code fences from a reply
fn strip_code_fences(content: &str) -> &str {
    let trimmed = content.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };

    // Drop an optional language tag after the opening fence
    let rest = rest.strip_prefix("json").unwrap_or(rest);
    let rest = rest.trim_start_matches(['\r', '\n']);
    rest.strip_suffix("```").map(str::trim).unwrap_or(trimmed)
}

/// Interpret a JSON value as seconds (number or numeric string)
fn value_as_seconds(value: &serde_json::Value) -> Option<f64> {
    match value {
        serde_json::Value::Number(n) => n.as_f64(),
        serde_json::Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Interpret a JSON value as a 1-10 score
fn value_as_score(value: &serde_json::Value) -> Option<u8> {
    let score = match value {
        serde_json::Value::Number(n) => n.as_f64()?,
        serde_json::Value::String(s) => s.trim().parse().ok()?,
        _ => return None,
    };
    Some(score.clamp(1.0, 10.0).round() as u8)
}
