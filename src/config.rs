//! Client configuration: API key resolution plus optional TOML overrides.
//!
//! The key comes from an explicit argument or, failing that, from an
//! environment variable (`XAI_API_KEY` unless a config file names another).
//! Resolution happens once, when the `ClientConfig` is built; nothing else
//! in the crate reads the environment.

use reqwest::header::HeaderValue;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use std::fs;
use std::path::Path;
use std::time::Duration;

use crate::error::GrokError;
use crate::types::{ChatParams, DEFAULT_MAX_TOKENS, DEFAULT_MODEL, DEFAULT_TEMPERATURE};

pub const API_KEY_ENV: &str = "XAI_API_KEY";
pub const DEFAULT_BASE_URL: &str = "https://api.x.ai/v1";
pub const DEFAULT_SYSTEM_PROMPT: &str = "You are a helpful assistant.";

// ---------------------------------------------------------------------------
// Resolved configuration
// ---------------------------------------------------------------------------

/// Immutable configuration held by a `GrokClient`.
#[derive(Debug)]
pub struct ClientConfig {
    api_key: SecretString,
    pub base_url: String,
    /// Request timeout. `None` leaves the transport default in place.
    pub timeout: Option<Duration>,
    pub defaults: GenerationDefaults,
    /// System turn prepended by `simple_query`. `None` sends the prompt alone.
    pub system_prompt: Option<String>,
}

/// Default generation parameters used by the convenience helpers.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationDefaults {
    pub model: String,
    pub temperature: f64,
    pub max_tokens: u32,
}

impl Default for GenerationDefaults {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            temperature: DEFAULT_TEMPERATURE,
            max_tokens: DEFAULT_MAX_TOKENS,
        }
    }
}

impl GenerationDefaults {
    /// Parameters for one call, optionally overriding the model.
    pub fn params(&self, model: Option<&str>) -> ChatParams {
        ChatParams::default()
            .with_model(model.unwrap_or(&self.model))
            .with_temperature(self.temperature)
            .with_max_tokens(self.max_tokens)
    }
}

impl ClientConfig {
    /// Build a configuration from an explicit key, falling back to `XAI_API_KEY`.
    pub fn resolve(explicit: Option<String>) -> Result<Self, GrokError> {
        let key = resolve_api_key(explicit, API_KEY_ENV, std::env::var(API_KEY_ENV).ok())?;
        Ok(Self::with_key(key))
    }

    /// Build a configuration around an already-resolved key, with all defaults.
    pub fn with_key(api_key: SecretString) -> Self {
        Self {
            api_key,
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: None,
            defaults: GenerationDefaults::default(),
            system_prompt: Some(DEFAULT_SYSTEM_PROMPT.to_string()),
        }
    }

    /// Load overrides from a TOML file and resolve the key.
    ///
    /// The explicit key still wins over whatever environment variable the
    /// file points at.
    pub fn load(path: impl AsRef<Path>, explicit: Option<String>) -> Result<Self, GrokError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|e| {
            GrokError::Config(format!("Failed to read config file {}: {e}", path.display()))
        })?;
        let file = FileConfig::parse(&contents).map_err(|e| {
            GrokError::Config(format!("Failed to parse config file {}: {e}", path.display()))
        })?;
        let env_name = file.api_key_env();
        let key = resolve_api_key(explicit, env_name, std::env::var(env_name).ok())?;
        Ok(file.apply(Self::with_key(key)))
    }

    /// Load `path` if it exists, otherwise resolve with defaults.
    pub fn load_or_resolve(path: impl AsRef<Path>, explicit: Option<String>) -> Result<Self, GrokError> {
        if path.as_ref().exists() {
            Self::load(path, explicit)
        } else {
            Self::resolve(explicit)
        }
    }

    pub fn api_key(&self) -> &str {
        self.api_key.expose_secret()
    }

    /// Full chat-completions endpoint URL.
    pub fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.base_url.trim_end_matches('/'))
    }
}

/// Apply the precedence rule: explicit argument, then the value of `env_var`.
///
/// Blank values are treated as absent. A key that cannot be sent in an
/// `Authorization` header (control characters, embedded newlines) is a
/// configuration error rather than a failure at send time.
pub fn resolve_api_key(
    explicit: Option<String>,
    env_var: &str,
    env_value: Option<String>,
) -> Result<SecretString, GrokError> {
    let key = explicit
        .filter(|k| !k.trim().is_empty())
        .or_else(|| env_value.filter(|k| !k.trim().is_empty()))
        .map(|k| k.trim().to_string())
        .ok_or_else(|| GrokError::MissingApiKey {
            env_var: env_var.to_string(),
        })?;

    if HeaderValue::from_str(&format!("Bearer {key}")).is_err() {
        return Err(GrokError::Config(
            "API key contains characters that are not allowed in an HTTP header".into(),
        ));
    }

    Ok(SecretString::new(key))
}

// ---------------------------------------------------------------------------
// TOML file
// ---------------------------------------------------------------------------

/// On-disk configuration (`grok.toml`). Every field is optional.
#[derive(Debug, Default, Deserialize)]
pub struct FileConfig {
    #[serde(default)]
    pub client: ClientSection,
    #[serde(default)]
    pub defaults: DefaultsSection,
}

#[derive(Debug, Default, Deserialize)]
pub struct ClientSection {
    pub base_url: Option<String>,
    /// Name of the environment variable holding the key.
    pub api_key_env: Option<String>,
    pub timeout_secs: Option<u64>,
    pub system_prompt: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct DefaultsSection {
    pub model: Option<String>,
    pub temperature: Option<f64>,
    pub max_tokens: Option<u32>,
}

impl FileConfig {
    pub fn parse(contents: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(contents)
    }

    pub fn api_key_env(&self) -> &str {
        self.client.api_key_env.as_deref().unwrap_or(API_KEY_ENV)
    }

    /// Overlay the file's values onto `config`.
    pub fn apply(self, mut config: ClientConfig) -> ClientConfig {
        if let Some(url) = self.client.base_url {
            config.base_url = url;
        }
        if let Some(secs) = self.client.timeout_secs {
            config.timeout = Some(Duration::from_secs(secs));
        }
        if let Some(prompt) = self.client.system_prompt {
            // An empty prompt in the file disables the system turn.
            config.system_prompt = Some(prompt).filter(|p| !p.is_empty());
        }
        if let Some(model) = self.defaults.model {
            config.defaults.model = model;
        }
        if let Some(t) = self.defaults.temperature {
            config.defaults.temperature = t;
        }
        if let Some(n) = self.defaults.max_tokens {
            config.defaults.max_tokens = n;
        }
        config
    }
}
