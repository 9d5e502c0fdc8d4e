//! Speech recognition engine abstraction
//!
//! The supervisor never talks to a concrete engine directly; it drives the
//! `RecognitionEngine` / `RecognitionSession` traits and consumes the event
//! stream a session hands back. The one shipped binding delegates to a
//! remote STT service over NATS.

pub mod backend;
pub mod messages;
pub mod nats;

pub use backend::{
    EngineErrorCode, EngineEvent, RecognitionEngine, RecognitionSession, SessionConfig,
};
pub use messages::{
    RecognitionErrorMessage, SessionEndedMessage, SessionStartedMessage, StartSessionMessage,
    StopSessionMessage, TranscriptMessage,
};
pub use nats::NatsRecognitionEngine;
