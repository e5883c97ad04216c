mod audio_format;
mod azure_whisper_engine;
mod openai_whisper_engine;
mod scaffold_engine;
mod transcription_engine_factory;

pub use audio_format::AudioFormat;
pub use azure_whisper_engine::AzureWhisperEngine;
pub use openai_whisper_engine::OpenAiWhisperEngine;
pub use scaffold_engine::ScaffoldTranscriptionEngine;
pub use transcription_engine_factory::TranscriptionEngineFactory;
