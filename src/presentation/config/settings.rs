use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, File};
use serde::Deserialize;

use crate::infrastructure::callback::DEFAULT_CALLBACK_TIMEOUT;

use super::Environment;

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub server: ServerSettings,
    pub auth: AuthSettings,
    pub transcription: TranscriptionSettings,
    pub storage: StorageSettings,
    pub jobs: JobSettings,
    pub callback: CallbackSettings,
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    pub max_upload_mb: usize,
    pub enable_sync_endpoint: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AuthSettings {
    pub api_key: String,
    pub header_name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TranscriptionSettings {
    pub provider: TranscriptionProviderSetting,
    pub model: String,
    pub api_key: Option<String>,
    pub base_url: Option<String>,
    pub azure_deployment: Option<String>,
    pub azure_api_version: String,
    pub scaffold_transcript: String,
    pub scaffold_delay_ms: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TranscriptionProviderSetting {
    #[serde(rename = "openai")]
    OpenAi,
    Azure,
    Scaffold,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageSettings {
    pub provider: StorageProviderSetting,
    pub local_path: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageProviderSetting {
    Local,
    Memory,
}

#[derive(Debug, Clone, Deserialize)]
pub struct JobSettings {
    pub queue_capacity: usize,
    pub max_concurrent: Option<usize>,
    pub transcription_timeout_secs: Option<u64>,
    pub retention_secs: u64,
    pub sweep_interval_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CallbackSettings {
    pub timeout_secs: u64,
    pub required: bool,
    pub notify_on_failure: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    pub json: bool,
    pub filter: Option<String>,
}

impl Settings {
    /// Defaults, then `appsettings.<env>.toml`, then `APP__SECTION__KEY`
    /// variables, then the `SERVICE_API_KEY` / `PORT` shorthands.
    pub fn load(environment: Environment) -> Result<Self, SettingsError> {
        let config = Self::defaults()?
            .add_source(
                File::with_name(&format!("appsettings.{}", environment.file_suffix()))
                    .required(false),
            )
            .add_source(
                config::Environment::with_prefix("APP")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .set_override_option("auth.api_key", std::env::var("SERVICE_API_KEY").ok())?
            .set_override_option("server.port", std::env::var("PORT").ok())?
            .build()?;

        Self::from_config(config)
    }

    pub fn defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
        Config::builder()
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 8000)?
            .set_default("server.max_upload_mb", 25)?
            .set_default("server.enable_sync_endpoint", false)?
            .set_default("auth.api_key", "")?
            .set_default("auth.header_name", "x-service-api-key")?
            .set_default("transcription.provider", "openai")?
            .set_default("transcription.model", "whisper-1")?
            .set_default("transcription.azure_api_version", "2024-06-01")?
            .set_default("transcription.scaffold_transcript", "scaffold transcript")?
            .set_default("transcription.scaffold_delay_ms", 0)?
            .set_default("storage.provider", "local")?
            .set_default(
                "storage.local_path",
                std::env::temp_dir()
                    .join("whisper-relay")
                    .to_string_lossy()
                    .to_string(),
            )?
            .set_default("jobs.queue_capacity", 64)?
            .set_default("jobs.retention_secs", 3600)?
            .set_default("jobs.sweep_interval_secs", 60)?
            .set_default("callback.timeout_secs", DEFAULT_CALLBACK_TIMEOUT.as_secs())?
            .set_default("callback.required", false)?
            .set_default("callback.notify_on_failure", true)?
            .set_default("logging.json", false)
    }

    pub fn from_config(config: Config) -> Result<Self, SettingsError> {
        let settings: Settings = config.try_deserialize()?;
        if settings.auth.api_key.trim().is_empty() {
            return Err(SettingsError::MissingApiKey);
        }
        Ok(settings)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("configuration: {0}")]
    Config(#[from] ConfigError),
    #[error("service api key is not set (SERVICE_API_KEY or APP__AUTH__API_KEY)")]
    MissingApiKey,
}
