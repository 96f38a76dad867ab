use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt::Debug;
use std::time::Duration;

#[async_trait]
pub trait LlmClient: Send + Sync + Debug {
    async fn chat(&self, system: &str, user: &str) -> Result<String>;
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct LlmConfig {
    #[serde(default = "default_provider")]
    pub provider: String, // "openai" or "none"
    #[serde(default)]
    pub openai: OpenAIConfig,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            openai: OpenAIConfig::default(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct OpenAIConfig {
    #[serde(default)]
    pub api_key: String,
    #[serde(default = "default_openai_model")]
    pub model: String,
    pub base_url: Option<String>,
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    /// Upper bound on a whole request, connect to last byte.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for OpenAIConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            model: default_openai_model(),
            base_url: None,
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_provider() -> String {
    "openai".to_string()
}
fn default_openai_model() -> String {
    "gpt-4".to_string()
}
fn default_temperature() -> f32 {
    0.8
}
fn default_max_tokens() -> u32 {
    400
}
pub(crate) fn default_timeout_secs() -> u64 {
    60
}

/// Builds the remote client, or `None` when no provider is usable.
///
/// A provider without credentials is treated as absent rather than an error.
pub fn create_llm(config: &LlmConfig) -> Result<Option<Box<dyn LlmClient>>> {
    match config.provider.as_str() {
        "openai" => {
            if config.openai.api_key.trim().is_empty() {
                log::info!("No OpenAI API key configured, remote generation disabled");
                return Ok(None);
            }
            Ok(Some(Box::new(OpenAIClient::new(&config.openai)?)))
        }
        "none" => Ok(None),
        _ => Err(anyhow!("Unknown LLM provider: {}", config.provider)),
    }
}

fn http_client(timeout: Duration) -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .context("Failed to build HTTP client")
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

fn chat_messages<'a>(system: &'a str, user: &'a str) -> Vec<ChatMessage<'a>> {
    vec![
        ChatMessage { role: "system", content: system },
        ChatMessage { role: "user", content: user },
    ]
}

#[derive(Deserialize)]
struct ReplyMessage {
    content: Option<String>,
}

/// Sends a JSON body and decodes a JSON reply, folding HTTP errors into `Err`.
async fn post_json<B, R>(request: reqwest::RequestBuilder, body: &B, service: &str) -> Result<R>
where
    B: Serialize + ?Sized,
    R: DeserializeOwned,
{
    let resp = request
        .json(body)
        .send()
        .await
        .with_context(|| format!("{} request failed", service))?;

    let status = resp.status();
    if !status.is_success() {
        let error_text = resp.text().await.unwrap_or_default();
        return Err(anyhow!("{} API error ({}): {}", service, status, error_text));
    }

    resp.json()
        .await
        .with_context(|| format!("Failed to decode {} reply", service))
}

// --- Ollama-compatible local server ---

#[derive(Debug)]
pub struct OllamaClient {
    chat_url: String,
    model: String,
    client: reqwest::Client,
}

impl OllamaClient {
    pub fn new(base_url: &str, model: &str, timeout: Duration) -> Result<Self> {
        Ok(Self {
            chat_url: format!("{}/api/chat", base_url.trim_end_matches('/')),
            model: model.to_string(),
            client: http_client(timeout)?,
        })
    }
}

#[derive(Serialize)]
struct OllamaChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    stream: bool,
}

#[derive(Deserialize)]
struct OllamaChatResponse {
    message: ReplyMessage,
}

#[async_trait]
impl LlmClient for OllamaClient {
    async fn chat(&self, system: &str, user: &str) -> Result<String> {
        let body = OllamaChatRequest {
            model: &self.model,
            messages: chat_messages(system, user),
            stream: false,
        };
        let reply: OllamaChatResponse =
            post_json(self.client.post(&self.chat_url), &body, "Local model").await?;
        reply
            .message
            .content
            .context("Local model reply had no content")
    }
}

// --- OpenAI-compatible chat completions ---

#[derive(Debug)]
struct OpenAIClient {
    api_key: String,
    completions_url: String,
    model: String,
    temperature: f32,
    max_tokens: u32,
    client: reqwest::Client,
}

impl OpenAIClient {
    fn new(cfg: &OpenAIConfig) -> Result<Self> {
        let base_url = cfg.base_url.as_deref().unwrap_or("https://api.openai.com/v1");
        Ok(Self {
            api_key: cfg.api_key.clone(),
            completions_url: format!("{}/chat/completions", base_url.trim_end_matches('/')),
            model: cfg.model.clone(),
            temperature: cfg.temperature,
            max_tokens: cfg.max_tokens,
            client: http_client(Duration::from_secs(cfg.timeout_secs))?,
        })
    }
}

#[derive(Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Deserialize)]
struct CompletionResponse {
    #[serde(default)]
    choices: Vec<CompletionChoice>,
}

#[derive(Deserialize)]
struct CompletionChoice {
    message: ReplyMessage,
}

impl CompletionResponse {
    fn into_text(self) -> Result<String> {
        self.choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .context("OpenAI response empty or missing content")
    }
}

#[async_trait]
impl LlmClient for OpenAIClient {
    async fn chat(&self, system: &str, user: &str) -> Result<String> {
        let body = CompletionRequest {
            model: &self.model,
            messages: chat_messages(system, user),
            temperature: self.temperature,
            max_tokens: self.max_tokens,
        };
        let request = self.client.post(&self.completions_url).bearer_auth(&self.api_key);
        let reply: CompletionResponse = post_json(request, &body, "OpenAI").await?;
        reply.into_text()
    }
}
