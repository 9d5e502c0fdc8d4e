use anyhow::Result;
use std::fmt;
use tokio::sync::mpsc;

/// Options passed to the engine when a session is created.
///
/// The language is fixed for the session's lifetime; changing it means
/// tearing the session down and creating a new one.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// BCP-47 language tag the engine should recognize
    pub language: String,
    /// Keep the session open across utterances instead of ending after the first
    pub continuous: bool,
    /// Deliver interim (non-final) transcripts
    pub interim_results: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            language: "ar-SA".to_string(),
            continuous: true,
            interim_results: false,
        }
    }
}

/// Error codes reported by a recognition engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineErrorCode {
    /// The user denied microphone permission
    NotAllowed,
    /// The host blocked the recognition service
    ServiceNotAllowed,
    /// No speech before the engine's silence timeout
    NoSpeech,
    /// The engine lost its network connection
    Network,
    /// Any other engine-reported code
    Other(String),
}

impl EngineErrorCode {
    /// Fatal codes end the listening intent. Everything else is waited out:
    /// the engine ends the session on its own and the end event decides.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::NotAllowed | Self::ServiceNotAllowed)
    }

    /// Map a wire code to a variant. Unknown codes are preserved as `Other`.
    pub fn from_code(code: &str) -> Self {
        match code {
            "not-allowed" => Self::NotAllowed,
            "service-not-allowed" => Self::ServiceNotAllowed,
            "no-speech" => Self::NoSpeech,
            "network" => Self::Network,
            other => Self::Other(other.to_string()),
        }
    }
}

impl fmt::Display for EngineErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let code = match self {
            Self::NotAllowed => "not-allowed",
            Self::ServiceNotAllowed => "service-not-allowed",
            Self::NoSpeech => "no-speech",
            Self::Network => "network",
            Self::Other(code) => code,
        };
        f.write_str(code)
    }
}

/// Notification from a recognition session.
///
/// Events arrive on the channel returned by [`RecognitionSession::start`] in
/// the order the engine emits them.
#[derive(Debug, Clone)]
pub enum EngineEvent {
    /// The engine accepted the session and is receiving audio
    Started,
    /// A finalized transcript for one utterance segment
    Result { transcript: String },
    /// The engine reported an error; the session may still end on its own
    Error { code: EngineErrorCode },
    /// The session terminated, whether requested or not
    Ended,
}

/// One connection to a recognition engine, bounded by create/teardown.
///
/// `start` and `stop` are asynchronous requests: completion is observed only
/// through the event channel, never through the return value.
#[async_trait::async_trait]
pub trait RecognitionSession: Send {
    /// Ask the engine to begin recognizing.
    ///
    /// Returns the channel on which session notifications arrive.
    async fn start(&mut self) -> Result<mpsc::Receiver<EngineEvent>>;

    /// Ask the engine to end the session.
    ///
    /// Completion is observed via [`EngineEvent::Ended`], not the return value.
    async fn stop(&mut self) -> Result<()>;

    /// Language tag this session was created with
    fn language(&self) -> &str;
}

/// A speech recognition engine capability.
///
/// Terminated sessions are not guaranteed restartable, so callers always
/// `create` a fresh session instead of reusing a handle.
pub trait RecognitionEngine: Send + Sync {
    /// Whether the capability is usable in this environment.
    ///
    /// The supervisor queries this once at construction and caches the answer.
    fn is_available(&self) -> bool;

    /// Create a new session with the given options.
    fn create(&self, config: SessionConfig) -> Result<Box<dyn RecognitionSession>>;

    /// Get engine name for logging
    fn name(&self) -> &str;
}
