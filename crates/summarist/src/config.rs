//! Configuration management
//!
//! Settings are resolved once at startup and handed to constructors:
//! defaults, then an optional YAML file, then `SUMMARIST_*` environment
//! overrides. Nothing reads configuration from global state afterwards.

use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use crate::errors::ConfigError;
use crate::generation::SamplingConfig;

/// Config file picked up from the working directory when none is given
pub const DEFAULT_CONFIG_FILE: &str = "summarist.yaml";

pub const DEFAULT_MODEL: &str = "gemini-1.5-flash-001";
pub const DEFAULT_ENDPOINT: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;
pub const DEFAULT_STORE_PATH: &str = "generation_records.csv";
pub const DEFAULT_BIND: &str = "127.0.0.1:8501";

/// Top-level settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
  pub generation: GenerationSettings,
  pub store: StoreSettings,
  pub access: AccessSettings,
  pub server: ServerSettings,
  pub logs: LogSettings,
}

/// Generation service connection and sampling
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationSettings {
  pub api_key: Option<String>,
  pub model: String,
  pub endpoint: String,
  pub timeout_secs: u64,
  pub sampling: SamplingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreSettings {
  pub path: PathBuf,
}

/// Access phrases that unlock the download
#[derive(Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AccessSettings {
  pub phrases: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
  pub bind: SocketAddr,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LogSettings {
  /// Activity log location; defaults under the home directory
  pub path: Option<PathBuf>,
  /// Skip mirroring activity entries to the console
  pub silent: bool,
}

impl Default for GenerationSettings {
  fn default() -> Self {
    Self {
      api_key: None,
      model: DEFAULT_MODEL.to_string(),
      endpoint: DEFAULT_ENDPOINT.to_string(),
      timeout_secs: DEFAULT_TIMEOUT_SECS,
      sampling: SamplingConfig::default(),
    }
  }
}

// Secrets stay out of debug output
impl std::fmt::Debug for GenerationSettings {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("GenerationSettings")
      .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
      .field("model", &self.model)
      .field("endpoint", &self.endpoint)
      .field("timeout_secs", &self.timeout_secs)
      .field("sampling", &self.sampling)
      .finish()
  }
}

impl std::fmt::Debug for AccessSettings {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("AccessSettings").field("phrases", &self.phrases.len()).finish()
  }
}

impl Default for StoreSettings {
  fn default() -> Self {
    Self { path: PathBuf::from(DEFAULT_STORE_PATH) }
  }
}

impl Default for ServerSettings {
  fn default() -> Self {
    Self { bind: SocketAddr::from(([127, 0, 0, 1], 8501)) }
  }
}

impl LogSettings {
  /// Resolved activity log path
  pub fn resolved_path(&self) -> PathBuf {
    self.path.clone().unwrap_or_else(|| {
      dirs::home_dir()
        .unwrap_or_else(|| Path::new("/tmp").to_path_buf())
        .join(".summarist")
        .join("activity.logs.jsonl")
    })
  }
}

impl Settings {
  /// Load settings from a YAML file without applying overrides
  pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path)
      .map_err(|source| ConfigError::Read { path: path.to_path_buf(), source })?;

    serde_yaml::from_str(&content)
      .map_err(|e| ConfigError::Parse { path: path.to_path_buf(), message: e.to_string() })
  }

  /// Resolve settings from `path` (or the default file) plus the process environment
  pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
    let mut settings = match path {
      Some(path) => Self::load_from_file(path)?,
      None if Path::new(DEFAULT_CONFIG_FILE).exists() => Self::load_from_file(DEFAULT_CONFIG_FILE)?,
      None => Self::default(),
    };

    settings.apply_overrides(|key| std::env::var(key).ok())?;
    settings.validate()?;
    Ok(settings)
  }

  /// Apply `SUMMARIST_*` overrides read through `lookup`. Blank values are ignored.
  pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
  where
    F: Fn(&str) -> Option<String>,
  {
    let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

    if let Some(key) = get("SUMMARIST_API_KEY").or_else(|| get("GEMINI_API_KEY")) {
      self.generation.api_key = Some(key);
    }
    if let Some(model) = get("SUMMARIST_MODEL") {
      self.generation.model = model;
    }
    if let Some(endpoint) = get("SUMMARIST_ENDPOINT") {
      self.generation.endpoint = endpoint;
    }
    if let Some(path) = get("SUMMARIST_STORE_PATH") {
      self.store.path = PathBuf::from(path);
    }
    if let Some(phrases) = get("SUMMARIST_ACCESS_PHRASES") {
      self.access.phrases = phrases
        .split(',')
        .map(str::trim)
        .filter(|phrase| !phrase.is_empty())
        .map(str::to_string)
        .collect();
    }
    if let Some(bind) = get("SUMMARIST_BIND") {
      self.server.bind = bind.parse().map_err(|e: std::net::AddrParseError| {
        ConfigError::InvalidValue { key: "SUMMARIST_BIND".to_string(), message: e.to_string() }
      })?;
    }

    Ok(())
  }

  /// Reject sampling values the generation service would refuse
  pub fn validate(&self) -> Result<(), ConfigError> {
    let sampling = &self.generation.sampling;
    let invalid = |key: &str, message: String| ConfigError::InvalidValue { key: key.to_string(), message };

    if sampling.max_output_tokens == 0 {
      return Err(invalid("generation.sampling.max_output_tokens", "must be positive".to_string()));
    }
    if !(0.0..=2.0).contains(&sampling.temperature) {
      return Err(invalid(
        "generation.sampling.temperature",
        format!("{} is outside 0.0..=2.0", sampling.temperature),
      ));
    }
    if !(sampling.top_p > 0.0 && sampling.top_p <= 1.0) {
      return Err(invalid("generation.sampling.top_p", format!("{} is outside (0, 1]", sampling.top_p)));
    }
    if sampling.top_k == Some(0) {
      return Err(invalid("generation.sampling.top_k", "must be positive when set".to_string()));
    }
    if self.generation.timeout_secs == 0 {
      return Err(invalid("generation.timeout_secs", "must be positive".to_string()));
    }

    Ok(())
  }

  /// The API key, or an error when none was configured
  pub fn api_key(&self) -> Result<&str, ConfigError> {
    self
      .generation
      .api_key
      .as_deref()
      .filter(|key| !key.trim().is_empty())
      .ok_or(ConfigError::MissingApiKey)
  }
}
