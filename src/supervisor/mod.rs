//! Continuous-listening supervision
//!
//! This module provides the `RecognitionSupervisor` abstraction that manages:
//! - Session lifecycle against the recognition engine (start, stop, teardown)
//! - Automatic restart when the engine ends a session the caller still wants
//! - Fatal-vs-transient error classification
//! - Fresh phrase-list and callback lookup on every transcript
//! - Listening statistics and state reporting

mod config;
mod stats;
mod supervisor;

pub use config::{is_supported_language, ListenerConfig, SUPPORTED_LANGUAGES};
pub use stats::ListeningStats;
pub use supervisor::{MatchCallback, RecognitionSupervisor};
