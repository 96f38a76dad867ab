use crate::services::llm::{default_timeout_secs, LlmClient, OllamaClient};
use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use url::Url;

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct LocalConfig {
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    #[serde(default = "default_local_base_url")]
    pub base_url: String,
    #[serde(default = "default_local_model")]
    pub model: String,
    #[serde(default = "default_probe_timeout")]
    pub probe_timeout_ms: u64,
    /// Upper bound on one generation request.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for LocalConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            base_url: default_local_base_url(),
            model: default_local_model(),
            probe_timeout_ms: default_probe_timeout(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_enabled() -> bool {
    true
}
fn default_local_base_url() -> String {
    "http://127.0.0.1:11434".to_string()
}
fn default_local_model() -> String {
    "tinyllama".to_string()
}
fn default_probe_timeout() -> u64 {
    1500
}

impl LocalConfig {
    pub fn endpoint(&self, path: &str) -> Result<Url> {
        let mut base = Url::parse(&self.base_url)
            .with_context(|| format!("Invalid local model base_url: {}", self.base_url))?;
        if !base.path().ends_with('/') {
            let with_slash = format!("{}/", base.path());
            base.set_path(&with_slash);
        }
        base.join(path)
            .with_context(|| format!("Invalid local model endpoint: {}", path))
    }
}

/// The optional on-machine text generator.
///
/// Detected once at startup and handed to the pipeline; never re-probed.
#[derive(Debug)]
pub enum LocalGenerator {
    Unavailable,
    Ready(Box<dyn LlmClient>),
}

#[derive(Deserialize)]
struct TagsResponse {
    #[serde(default)]
    models: Vec<TagEntry>,
}

#[derive(Deserialize)]
struct TagEntry {
    name: String,
}

impl LocalGenerator {
    pub async fn detect(config: &LocalConfig) -> Self {
        if !config.enabled {
            log::info!("Local generation disabled in config");
            return LocalGenerator::Unavailable;
        }

        let ready = async {
            probe(config).await?;
            let timeout = Duration::from_secs(config.timeout_secs);
            OllamaClient::new(&config.base_url, &config.model, timeout)
        };

        match ready.await {
            Ok(client) => {
                log::info!("Local model '{}' ready at {}", config.model, config.base_url);
                LocalGenerator::Ready(Box::new(client))
            }
            Err(e) => {
                log::info!("Local generation unavailable: {:#}", e);
                LocalGenerator::Unavailable
            }
        }
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, LocalGenerator::Ready(_))
    }

    pub fn client(&self) -> Option<&dyn LlmClient> {
        match self {
            LocalGenerator::Ready(client) => Some(client.as_ref()),
            LocalGenerator::Unavailable => None,
        }
    }
}

async fn probe(config: &LocalConfig) -> Result<()> {
    let url = config.endpoint("api/tags")?;
    let client = reqwest::Client::builder()
        .timeout(Duration::from_millis(config.probe_timeout_ms))
        .build()?;

    let resp = client.get(url).send().await?;
    if !resp.status().is_success() {
        return Err(anyhow!("Local model server answered {}", resp.status()));
    }

    let tags: TagsResponse = resp.json().await?;
    if !model_is_listed(&tags, &config.model) {
        return Err(anyhow!("Model '{}' is not installed locally", config.model));
    }
    Ok(())
}

fn model_is_listed(tags: &TagsResponse, model: &str) -> bool {
    tags.models.iter().any(|m| {
        m.name == model
            || m.name
                .strip_prefix(model)
                .is_some_and(|rest| rest.starts_with(':'))
    })
}
