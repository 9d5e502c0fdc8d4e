use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Snapshot of a supervisor's listening state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListeningStats {
    /// Whether a recognition session is currently live
    pub is_listening: bool,

    /// Whether the engine capability is usable at all
    pub is_supported: bool,

    /// When listening was last started, if it ever was
    pub started_at: Option<DateTime<Utc>>,

    /// Sessions created so far, including automatic restarts
    pub sessions_created: usize,

    /// Finalized transcripts received across all sessions
    pub transcripts_seen: usize,

    /// Transcripts that matched a phrase
    pub matches_found: usize,
}
