use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::core::request::{parse_characters, Choice, ScriptRequest};
use crate::services::llm::LlmConfig;
use crate::services::local::LocalConfig;

pub const DEFAULT_CONFIG_PATH: &str = "config.yml";
pub const OPENAI_KEY_ENV: &str = "OPENAI_API_KEY";

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    #[serde(default = "default_output")]
    pub output_folder: String,

    #[serde(default)]
    pub unattended: bool,

    #[serde(default)]
    pub llm: LlmConfig,

    #[serde(default)]
    pub local: LocalConfig,

    #[serde(default)]
    pub defaults: FormDefaults,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            output_folder: default_output(),
            unattended: false,
            llm: LlmConfig::default(),
            local: LocalConfig::default(),
            defaults: FormDefaults::default(),
        }
    }
}

/// Initial values for the form, stored as the labels a user would type.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct FormDefaults {
    #[serde(default = "default_title")]
    pub title: String,
    #[serde(default = "default_genre")]
    pub genre: String,
    #[serde(default = "default_tone")]
    pub tone: String,
    #[serde(default = "default_platform")]
    pub platform: String,
    #[serde(default = "default_length")]
    pub length_seconds: u32,
    #[serde(default = "default_hook")]
    pub hook_strength: String,
    /// Offered when the user opts into named characters.
    #[serde(default = "default_characters")]
    pub characters: String,
    #[serde(default)]
    pub add_characters: bool,
    #[serde(default = "default_notes")]
    pub notes: String,
    #[serde(default = "default_include_cta")]
    pub include_cta: bool,
}

impl Default for FormDefaults {
    fn default() -> Self {
        Self {
            title: default_title(),
            genre: default_genre(),
            tone: default_tone(),
            platform: default_platform(),
            length_seconds: default_length(),
            hook_strength: default_hook(),
            characters: default_characters(),
            add_characters: false,
            notes: default_notes(),
            include_cta: default_include_cta(),
        }
    }
}

impl FormDefaults {
    pub fn to_request(&self) -> ScriptRequest {
        ScriptRequest {
            title: self.title.clone(),
            genre: Choice::parse(&self.genre),
            tone: Choice::parse(&self.tone),
            platform: Choice::parse(&self.platform),
            length_seconds: self.length_seconds,
            hook_strength: Choice::parse(&self.hook_strength),
            characters: if self.add_characters {
                parse_characters(&self.characters)
            } else {
                Vec::new()
            },
            notes: self.notes.clone(),
            include_cta: self.include_cta,
        }
    }
}

fn default_output() -> String {
    "output".to_string()
}
fn default_title() -> String {
    ScriptRequest::default().title
}
fn default_genre() -> String {
    ScriptRequest::default().genre.to_string()
}
fn default_tone() -> String {
    ScriptRequest::default().tone.to_string()
}
fn default_platform() -> String {
    ScriptRequest::default().platform.to_string()
}
fn default_length() -> u32 {
    ScriptRequest::default().length_seconds
}
fn default_hook() -> String {
    ScriptRequest::default().hook_strength.to_string()
}
fn default_characters() -> String {
    "Hero, Sidekick".to_string()
}
fn default_notes() -> String {
    ScriptRequest::default().notes
}
fn default_include_cta() -> bool {
    true
}

impl Config {
    /// Loads `path`, falling back to built-in defaults when the file is absent.
    pub fn load(path: &Path) -> Result<Self> {
        let mut config = if path.exists() {
            let content = fs::read_to_string(path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            Self::parse(&content).with_context(|| format!("Failed to parse {}", path.display()))?
        } else {
            log::info!("{} not found, using defaults", path.display());
            Config::default()
        };
        config.apply_env(std::env::var(OPENAI_KEY_ENV).ok());
        Ok(config)
    }

    pub fn parse(content: &str) -> Result<Self> {
        Ok(serde_yaml_ng::from_str(content)?)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let content = serde_yaml_ng::to_string(self)?;
        fs::write(path, content).with_context(|| format!("Failed to write {}", path.display()))?;
        Ok(())
    }

    /// A key from the environment fills in only when the file has none.
    fn apply_env(&mut self, openai_key: Option<String>) {
        if let Some(key) = openai_key.filter(|k| !k.trim().is_empty()) {
            if self.llm.openai.api_key.trim().is_empty() {
                log::debug!("Using OpenAI API key from {}", OPENAI_KEY_ENV);
                self.llm.openai.api_key = key;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::request::{Genre, HookStrength, Platform};

    #[test]
    fn test_empty_file_uses_defaults() {
        let config = Config::parse("{}").unwrap();
        assert_eq!(config.output_folder, "output");
        assert!(!config.unattended);
        assert_eq!(config.llm.provider, "openai");
        assert_eq!(config.llm.openai.model, "gpt-4");
        assert_eq!(config.llm.openai.max_tokens, 400);
        assert!(config.local.enabled);
        assert_eq!(config.defaults.to_request(), ScriptRequest::default());
    }

    #[test]
    fn test_partial_yaml() {
        let yaml = r#"
unattended: true
llm:
  openai:
    api_key: sk-file
    base_url: http://localhost:8080/v1
    timeout_secs: 20
local:
  enabled: false
defaults:
  title: Launch Day
  genre: Product Promo
  platform: Podcast Intro
  hook_strength: mild
  add_characters: true
  characters: "Ava, , Ben"
"#;
        let config = Config::parse(yaml).unwrap();
        assert!(config.unattended);
        assert_eq!(config.llm.openai.api_key, "sk-file");
        assert_eq!(config.llm.openai.timeout_secs, 20);
        assert_eq!(config.llm.openai.model, "gpt-4");
        assert_eq!(config.local.timeout_secs, 60);
        assert!(!config.local.enabled);
        assert_eq!(config.local.model, "tinyllama");

        let request = config.defaults.to_request();
        assert_eq!(request.title, "Launch Day");
        assert_eq!(request.genre, Choice::Known(Genre::ProductPromo));
        assert_eq!(request.platform, Choice::Known(Platform::PodcastIntro));
        assert_eq!(request.hook_strength, Choice::Known(HookStrength::Mild));
        assert_eq!(request.characters, vec!["Ava", "Ben"]);
        assert_eq!(request.length_seconds, 45);
    }

    #[test]
    fn test_env_key_only_fills_missing_key() {
        let mut config = Config::default();
        config.apply_env(Some("sk-env".to_string()));
        assert_eq!(config.llm.openai.api_key, "sk-env");

        config.llm.openai.api_key = "sk-file".to_string();
        config.apply_env(Some("sk-env".to_string()));
        assert_eq!(config.llm.openai.api_key, "sk-file");

        let mut config = Config::default();
        config.apply_env(Some("  ".to_string()));
        assert!(config.llm.openai.api_key.is_empty());
    }

    #[test]
    fn test_save_and_load_round_trip() -> Result<()> {
        let temp_dir = tempfile::tempdir()?;
        let path = temp_dir.path().join("config.yml");

        let mut config = Config::default();
        config.output_folder = "scripts".to_string();
        config.llm.openai.api_key = "sk-saved".to_string();
        config.save(&path)?;

        let loaded = Config::load(&path)?;
        assert_eq!(loaded.output_folder, "scripts");
        assert_eq!(loaded.llm.openai.api_key, "sk-saved");
        Ok(())
    }

    #[test]
    fn test_missing_file_is_not_an_error() -> Result<()> {
        let temp_dir = tempfile::tempdir()?;
        let config = Config::load(&temp_dir.path().join("absent.yml"))?;
        assert_eq!(config.output_folder, "output");
        Ok(())
    }
}
