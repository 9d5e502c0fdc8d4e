pub mod config;
pub mod engine;
pub mod http;
pub mod matcher;
pub mod store;
pub mod supervisor;

pub use config::Config;
pub use engine::{
    EngineErrorCode, EngineEvent, NatsRecognitionEngine, RecognitionEngine, RecognitionSession,
    SessionConfig,
};
pub use http::{create_router, AppState};
pub use matcher::match_phrase;
pub use store::{default_phrases, Phrase, PhraseStore};
pub use supervisor::{
    is_supported_language, ListenerConfig, ListeningStats, MatchCallback, RecognitionSupervisor,
    SUPPORTED_LANGUAGES,
};
