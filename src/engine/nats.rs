use super::backend::{EngineErrorCode, EngineEvent, RecognitionEngine, RecognitionSession, SessionConfig};
use super::messages::{
    RecognitionErrorMessage, SessionEndedMessage, SessionStartedMessage, StartSessionMessage,
    StopSessionMessage, TranscriptMessage,
};
use anyhow::{Context, Result};
use async_nats::Client;
use chrono::Utc;
use futures::stream::StreamExt;
use serde::de::DeserializeOwned;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{info, warn};

// Subjects shared with the STT service. Control messages go out on the
// session subjects; the service publishes events under stt.event.* with the
// session id in the payload.
const SESSION_START_SUBJECT: &str = "stt.session.start";
const SESSION_STOP_SUBJECT: &str = "stt.session.stop";
const EVENT_SUBJECT_WILDCARD: &str = "stt.event.>";
const EVENT_SUBJECT_PREFIX: &str = "stt.event.";

/// Recognition engine backed by a remote STT service over NATS.
///
/// The service does the actual speech-to-text work; this side only announces
/// sessions and consumes the transcript/error/end events it publishes.
pub struct NatsRecognitionEngine {
    client: Client,
}

impl NatsRecognitionEngine {
    /// Connect to the NATS server the STT service lives on
    pub async fn connect(url: &str) -> Result<Self> {
        info!("Connecting to NATS at {}", url);

        let client = async_nats::connect(url)
            .await
            .context("Failed to connect to NATS")?;

        info!("Connected to NATS successfully");

        Ok(Self { client })
    }
}

impl RecognitionEngine for NatsRecognitionEngine {
    fn is_available(&self) -> bool {
        self.client.connection_state() == async_nats::connection::State::Connected
    }

    fn create(&self, config: SessionConfig) -> Result<Box<dyn RecognitionSession>> {
        Ok(Box::new(NatsSession {
            client: self.client.clone(),
            session_id: format!("listen-{}", uuid::Uuid::new_v4()),
            config,
            forward_task: None,
        }))
    }

    fn name(&self) -> &str {
        "nats-stt"
    }
}

/// One announced session against the remote STT service
pub struct NatsSession {
    client: Client,
    session_id: String,
    config: SessionConfig,
    forward_task: Option<JoinHandle<()>>,
}

#[async_trait::async_trait]
impl RecognitionSession for NatsSession {
    async fn start(&mut self) -> Result<mpsc::Receiver<EngineEvent>> {
        // Subscribe before announcing so no event can slip past
        let mut subscriber = self
            .client
            .subscribe(EVENT_SUBJECT_WILDCARD)
            .await
            .context("Failed to subscribe to STT events")?;

        let start = StartSessionMessage {
            session_id: self.session_id.clone(),
            language: self.config.language.clone(),
            continuous: self.config.continuous,
            interim_results: self.config.interim_results,
            timestamp: Utc::now().to_rfc3339(),
        };
        let payload = serde_json::to_vec(&start)?;

        self.client
            .publish(SESSION_START_SUBJECT, payload.into())
            .await
            .context("Failed to publish session start")?;

        info!(
            "Announced recognition session {} (language={})",
            self.session_id, self.config.language
        );

        let (events_tx, events_rx) = mpsc::channel(64);
        let session_id = self.session_id.clone();
        let interim = self.config.interim_results;

        let task = tokio::spawn(async move {
            while let Some(msg) = subscriber.next().await {
                let Some(kind) = msg.subject.as_str().strip_prefix(EVENT_SUBJECT_PREFIX) else {
                    continue;
                };

                let event = match kind {
                    "started" => decode::<SessionStartedMessage>(&msg.payload)
                        .filter(|m| m.session_id == session_id)
                        .map(|_| EngineEvent::Started),
                    "transcript" => decode::<TranscriptMessage>(&msg.payload)
                        .filter(|m| m.session_id == session_id)
                        .and_then(|m| {
                            // Interim results are off: only finalized
                            // transcripts reach the supervisor
                            if m.partial && !interim {
                                None
                            } else {
                                Some(EngineEvent::Result { transcript: m.text })
                            }
                        }),
                    "error" => decode::<RecognitionErrorMessage>(&msg.payload)
                        .filter(|m| m.session_id == session_id)
                        .map(|m| EngineEvent::Error {
                            code: EngineErrorCode::from_code(&m.code),
                        }),
                    "ended" => decode::<SessionEndedMessage>(&msg.payload)
                        .filter(|m| m.session_id == session_id)
                        .map(|_| EngineEvent::Ended),
                    _ => None,
                };

                let Some(event) = event else { continue };

                let ended = matches!(event, EngineEvent::Ended);
                if events_tx.send(event).await.is_err() {
                    // Receiver detached; nobody is listening to this session
                    break;
                }
                if ended {
                    break;
                }
            }
            // Subscriber drained or session over; dropping events_tx closes
            // the channel and the consumer sees the session as ended.
        });

        self.forward_task = Some(task);

        Ok(events_rx)
    }

    async fn stop(&mut self) -> Result<()> {
        let stop = StopSessionMessage {
            session_id: self.session_id.clone(),
            timestamp: Utc::now().to_rfc3339(),
        };
        let payload = serde_json::to_vec(&stop)?;

        self.client
            .publish(SESSION_STOP_SUBJECT, payload.into())
            .await
            .context("Failed to publish session stop")?;

        info!("Requested stop of recognition session {}", self.session_id);

        Ok(())
    }

    fn language(&self) -> &str {
        &self.config.language
    }
}

impl Drop for NatsSession {
    fn drop(&mut self) {
        if let Some(task) = self.forward_task.take() {
            task.abort();
        }
    }
}

fn decode<T: DeserializeOwned>(payload: &[u8]) -> Option<T> {
    match serde_json::from_slice(payload) {
        Ok(message) => Some(message),
        Err(e) => {
            warn!("Failed to parse STT message: {}", e);
            None
        }
    }
}
