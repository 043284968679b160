use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::consts;
use crate::errors::PixelleError;
use crate::tts::TtsSettings;

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct LlmConfig {
    pub api_key: String,
    pub base_url: String,
    pub model: String,
    /// Key came from `PIXELLE_LLM_API_KEY`.
    #[serde(skip)]
    pub api_key_from_env: bool,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: consts::DEFAULT_LLM_BASE_URL.to_string(),
            model: consts::DEFAULT_LLM_MODEL.to_string(),
            api_key_from_env: false,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct TtsLocalConfig {
    pub voice: String,
    pub speed: f32,
}

impl Default for TtsLocalConfig {
    fn default() -> Self {
        Self {
            voice: consts::DEFAULT_TTS_VOICE.to_string(),
            speed: consts::DEFAULT_TTS_SPEED,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(default)]
pub struct TtsConfig {
    pub local: TtsLocalConfig,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct ComfyUiConfig {
    pub comfyui_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub runninghub_api_key: Option<String>,
    pub tts: TtsConfig,
}

impl Default for ComfyUiConfig {
    fn default() -> Self {
        Self {
            comfyui_url: consts::DEFAULT_COMFYUI_URL.to_string(),
            runninghub_api_key: None,
            tts: TtsConfig::default(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub api_port: u16,
    pub web_port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: consts::DEFAULT_HOST.to_string(),
            api_port: consts::API_PORT,
            web_port: consts::WEB_PORT,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(default)]
pub struct AppConfig {
    pub llm: LlmConfig,
    pub comfyui: ComfyUiConfig,
    pub server: ServerConfig,
}

/// Partial update coming from the settings page or `PUT /api/config`.
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct ConfigUpdate {
    #[serde(default)]
    pub llm_api_key: Option<String>,
    #[serde(default)]
    pub llm_base_url: Option<String>,
    #[serde(default)]
    pub llm_model: Option<String>,
    #[serde(default)]
    pub comfyui_url: Option<String>,
    /// An empty string clears the key.
    #[serde(default)]
    pub runninghub_api_key: Option<String>,
    #[serde(default)]
    pub tts_voice: Option<String>,
    #[serde(default)]
    pub tts_speed: Option<f32>,
}

fn require_http_url(field: &str, value: &str) -> Result<(), PixelleError> {
    let value = value.trim();
    match url::Url::parse(value) {
        Ok(parsed) if matches!(parsed.scheme(), "http" | "https") && parsed.host_str().is_some() => {
            Ok(())
        }
        Ok(_) => Err(PixelleError::ValidationError(format!(
            "{field} must be an http:// or https:// URL with a host, got {value:?}"
        ))),
        Err(e) => Err(PixelleError::ValidationError(format!(
            "{field} is not a valid URL ({e}), got {value:?}"
        ))),
    }
}

pub fn mask_secret(secret: &str) -> String {
    let chars: Vec<char> = secret.chars().collect();
    match chars.len() {
        0 => String::new(),
        n if n <= 8 => "*".repeat(n),
        n => {
            let head: String = chars[..4].iter().collect();
            let tail: String = chars[n - 4..].iter().collect();
            format!("{head}****{tail}")
        }
    }
}

impl AppConfig {
    pub fn validate(&self) -> Result<(), PixelleError> {
        require_http_url("llm.base_url", &self.llm.base_url)?;
        require_http_url("comfyui.comfyui_url", &self.comfyui.comfyui_url)?;

        if self.server.api_port == 0 || self.server.web_port == 0 {
            return Err(PixelleError::ValidationError(
                "server ports must be non-zero".to_string(),
            ));
        }

        let speed = self.comfyui.tts.local.speed;
        if !(consts::MIN_TTS_SPEED..=consts::MAX_TTS_SPEED).contains(&speed) {
            return Err(PixelleError::ValidationError(format!(
                "tts speed {speed} outside {}..={}",
                consts::MIN_TTS_SPEED,
                consts::MAX_TTS_SPEED
            )));
        }
        Ok(())
    }

    pub fn is_llm_configured(&self) -> bool {
        !self.llm.api_key.trim().is_empty()
            && !self.llm.base_url.trim().is_empty()
            && !self.llm.model.trim().is_empty()
    }

    pub fn redacted(&self) -> AppConfig {
        let mut config = self.clone();
        config.llm.api_key = mask_secret(&config.llm.api_key);
        config.comfyui.runninghub_api_key =
            config.comfyui.runninghub_api_key.as_deref().map(mask_secret);
        config
    }

    /// Applies `update` on a copy and validates it; `self` is untouched on error.
    pub fn apply_update(&self, update: &ConfigUpdate) -> Result<AppConfig, PixelleError> {
        let mut config = self.clone();

        if let Some(api_key) = &update.llm_api_key {
            config.llm.api_key = api_key.trim().to_string();
            config.llm.api_key_from_env = false;
        }
        if let Some(base_url) = &update.llm_base_url {
            config.llm.base_url = base_url.trim().trim_end_matches('/').to_string();
        }
        if let Some(model) = &update.llm_model {
            config.llm.model = model.trim().to_string();
        }
        if let Some(url) = &update.comfyui_url {
            config.comfyui.comfyui_url = url.trim().trim_end_matches('/').to_string();
        }
        if let Some(key) = &update.runninghub_api_key {
            let key = key.trim();
            config.comfyui.runninghub_api_key = (!key.is_empty()).then(|| key.to_string());
        }
        if update.tts_voice.is_some() || update.tts_speed.is_some() {
            let local = &config.comfyui.tts.local;
            let settings = TtsSettings::new(
                update.tts_voice.as_deref().unwrap_or(&local.voice),
                update.tts_speed.unwrap_or(local.speed),
            )?;
            config.comfyui.tts.local.voice = settings.voice;
            config.comfyui.tts.local.speed = settings.speed;
        }

        config.validate()?;
        Ok(config)
    }
}

pub trait ConfigLoader: Send + Sync {
    fn load_config(&self) -> Result<AppConfig, PixelleError>;
    fn save_config(&self, config: &AppConfig) -> Result<(), PixelleError>;
}

pub struct FileConfigLoader {
    path: PathBuf,
    env_api_key: Option<String>,
}

impl FileConfigLoader {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let env_api_key = std::env::var(consts::ENV_LLM_API_KEY)
            .ok()
            .filter(|key| !key.trim().is_empty());
        Self {
            path: path.into(),
            env_api_key,
        }
    }

    pub fn with_env_api_key(mut self, key: Option<String>) -> Self {
        self.env_api_key = key;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ConfigLoader for FileConfigLoader {
    fn load_config(&self) -> Result<AppConfig, PixelleError> {
        let mut config = if self.path.exists() {
            let config_str = std::fs::read_to_string(&self.path)?;
            if config_str.trim().is_empty() {
                AppConfig::default()
            } else {
                serde_yaml::from_str::<AppConfig>(&config_str).map_err(|e| {
                    PixelleError::ConfigError(format!("{}: {}", self.path.display(), e))
                })?
            }
        } else {
            log::warn!(
                "config file {} not found, using defaults",
                self.path.display()
            );
            AppConfig::default()
        };

        if config.llm.api_key.trim().is_empty() {
            if let Some(key) = &self.env_api_key {
                config.llm.api_key = key.clone();
                config.llm.api_key_from_env = true;
            }
        }

        Ok(config)
    }

    fn save_config(&self, config: &AppConfig) -> Result<(), PixelleError> {
        config.validate()?;

        let mut persisted = config.clone();
        if persisted.llm.api_key_from_env {
            persisted.llm.api_key = String::new();
        }
        let yaml = serde_yaml::to_string(&persisted)?;

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let tmp_path = self.path.with_extension("yaml.tmp");
        std::fs::write(&tmp_path, yaml)?;
        std::fs::rename(&tmp_path, &self.path)?;

        log::info!("config saved to {}", self.path.display());
        Ok(())
    }
}
