mod environment;
mod settings;

pub use environment::Environment;
pub use settings::{
    AuthSettings, CallbackSettings, JobSettings, LoggingSettings, ServerSettings, Settings,
    SettingsError, StorageProviderSetting, StorageSettings, TranscriptionProviderSetting,
    TranscriptionSettings,
};
