use serde::{Deserialize, Serialize};

/// Control message published when a session is opened
#[derive(Debug, Serialize, Deserialize)]
pub struct StartSessionMessage {
    pub session_id: String,
    pub language: String,
    pub continuous: bool,
    #[serde(rename = "interim")]
    pub interim_results: bool,
    pub timestamp: String, // RFC3339 timestamp
}

/// Control message published when the caller stops listening
#[derive(Debug, Serialize, Deserialize)]
pub struct StopSessionMessage {
    pub session_id: String,
    pub timestamp: String,
}

/// Acknowledgement that the STT service accepted a session
#[derive(Debug, Serialize, Deserialize)]
pub struct SessionStartedMessage {
    pub session_id: String,
}

/// Transcript message received from the STT service
#[derive(Debug, Serialize, Deserialize)]
pub struct TranscriptMessage {
    pub session_id: String,
    pub text: String,
    pub partial: bool,
    pub timestamp: String,
    pub confidence: f32,
}

/// Error report received from the STT service
#[derive(Debug, Serialize, Deserialize)]
pub struct RecognitionErrorMessage {
    pub session_id: String,
    /// Wire error code, e.g. "not-allowed", "no-speech", "network"
    pub code: String,
}

/// End-of-session notice received from the STT service
#[derive(Debug, Serialize, Deserialize)]
pub struct SessionEndedMessage {
    pub session_id: String,
    pub reason: Option<String>,
}
