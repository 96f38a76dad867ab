use crate::core::request::ScriptRequest;
use crate::services::composer::compose;
use crate::services::llm::LlmClient;
use crate::services::local::LocalGenerator;
use crate::services::prompt::{build_prompt, SYSTEM_PROMPT};
use async_trait::async_trait;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScriptSource {
    Remote,
    Local,
    Template,
}

impl fmt::Display for ScriptSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ScriptSource::Remote => "remote model",
            ScriptSource::Local => "local model",
            ScriptSource::Template => "template",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedScript {
    pub text: String,
    pub source: ScriptSource,
}

/// One best-effort way of producing a script. `None` means "try the next one".
#[async_trait]
pub trait GenerationStep: Send + Sync {
    fn source(&self) -> ScriptSource;
    async fn attempt(&self, request: &ScriptRequest) -> Option<String>;
}

pub struct RemoteStep {
    llm: Box<dyn LlmClient>,
}

impl RemoteStep {
    pub fn new(llm: Box<dyn LlmClient>) -> Self {
        Self { llm }
    }
}

#[async_trait]
impl GenerationStep for RemoteStep {
    fn source(&self) -> ScriptSource {
        ScriptSource::Remote
    }

    async fn attempt(&self, request: &ScriptRequest) -> Option<String> {
        ask(self.llm.as_ref(), request, self.source()).await
    }
}

pub struct LocalStep {
    local: LocalGenerator,
}

impl LocalStep {
    pub fn new(local: LocalGenerator) -> Self {
        Self { local }
    }
}

#[async_trait]
impl GenerationStep for LocalStep {
    fn source(&self) -> ScriptSource {
        ScriptSource::Local
    }

    async fn attempt(&self, request: &ScriptRequest) -> Option<String> {
        let client = self.local.client()?;
        ask(client, request, self.source()).await
    }
}

async fn ask(llm: &dyn LlmClient, request: &ScriptRequest, source: ScriptSource) -> Option<String> {
    let prompt = build_prompt(request);
    match llm.chat(SYSTEM_PROMPT, &prompt).await {
        Ok(text) => {
            let text = text.trim();
            if text.is_empty() {
                log::warn!("{} returned an empty script", source);
                None
            } else {
                Some(text.to_string())
            }
        }
        Err(e) => {
            log::warn!("{} generation failed: {:#}", source, e);
            None
        }
    }
}

/// Ordered generation attempts, ending in the template composer.
#[derive(Default)]
pub struct ScriptPipeline {
    steps: Vec<Box<dyn GenerationStep>>,
}

impl ScriptPipeline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_parts(remote: Option<Box<dyn LlmClient>>, local: LocalGenerator) -> Self {
        let mut pipeline = Self::new();
        if let Some(llm) = remote {
            pipeline = pipeline.with_step(Box::new(RemoteStep::new(llm)));
        }
        if local.is_ready() {
            pipeline = pipeline.with_step(Box::new(LocalStep::new(local)));
        }
        pipeline
    }

    pub fn with_step(mut self, step: Box<dyn GenerationStep>) -> Self {
        self.steps.push(step);
        self
    }

    pub fn sources(&self) -> Vec<ScriptSource> {
        self.steps.iter().map(|s| s.source()).collect()
    }

    pub async fn generate(&self, request: &ScriptRequest) -> GeneratedScript {
        for step in &self.steps {
            log::debug!("Trying {}", step.source());
            if let Some(text) = step.attempt(request).await {
                return GeneratedScript { text, source: step.source() };
            }
        }

        log::info!("Using template script");
        GeneratedScript {
            text: compose(request),
            source: ScriptSource::Template,
        }
    }
}
