use super::config::ListenerConfig;
use super::stats::ListeningStats;
use crate::engine::{EngineEvent, RecognitionEngine, RecognitionSession, SessionConfig};
use crate::matcher::match_phrase;
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::{mpsc, Mutex, RwLock};
use tracing::{error, info, warn};

/// Callback invoked with the matched phrase text
pub type MatchCallback = Arc<dyn Fn(&str) + Send + Sync>;

/// Listening lifecycle. A user stop and a fatal error both land in `Stopped`,
/// which is what suppresses the restart; there is no separate stop flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ListenerState {
    Idle,
    Starting,
    Listening,
    Restarting,
    Stopped,
}

impl ListenerState {
    /// Whether the caller's intent is still "keep listening"
    fn wants_listening(self) -> bool {
        matches!(self, Self::Starting | Self::Listening | Self::Restarting)
    }
}

/// A recognition supervisor that keeps a continuous listening session alive.
///
/// The underlying engine ends sessions on its own (silence timeouts, network
/// hiccups, session limits); the supervisor restarts after such ends, while a
/// caller-requested stop detaches the session's notifications first so a late
/// end event can never restart it. The phrase list and the match callback are
/// read fresh on every transcript, so callers can replace them at any time
/// without tearing the session down.
pub struct RecognitionSupervisor {
    config: ListenerConfig,

    /// Engine capability; shared with driver tasks for restarts
    engine: Arc<dyn RecognitionEngine>,

    /// Probed once at construction, read-only afterwards
    supported: bool,

    inner: Arc<SupervisorInner>,
}

/// State shared between the supervisor handle and its driver tasks
struct SupervisorInner {
    /// Tagged lifecycle state; every transition happens under this lock
    state: Mutex<ListenerState>,

    /// Observed listening state, exposed to callers
    is_listening: AtomicBool,

    /// Detach epoch. Bumped on every start and stop; a driver task only acts
    /// on events whose epoch still matches its own.
    epoch: AtomicU64,

    /// The one live session handle, if any
    active: Mutex<Option<Box<dyn RecognitionSession>>>,

    /// Latest phrase list, read at match time
    phrases: RwLock<Vec<String>>,

    /// Latest match callback, read at match time
    on_match: RwLock<Option<MatchCallback>>,

    /// When listening was last started
    started_at: Mutex<Option<DateTime<Utc>>>,

    /// Sessions created, including automatic restarts
    sessions_created: AtomicUsize,

    /// Finalized transcripts received
    transcripts_seen: AtomicUsize,

    /// Transcripts that matched a phrase
    matches_found: AtomicUsize,
}

impl RecognitionSupervisor {
    /// Create a supervisor over `engine`.
    ///
    /// Engine availability is probed here, once; `is_supported` never changes
    /// afterwards.
    pub fn new(engine: Arc<dyn RecognitionEngine>, config: ListenerConfig) -> Self {
        let supported = engine.is_available();
        if !supported {
            warn!("Recognition engine {} is not available", engine.name());
        }

        Self {
            config,
            engine,
            supported,
            inner: Arc::new(SupervisorInner {
                state: Mutex::new(ListenerState::Idle),
                is_listening: AtomicBool::new(false),
                epoch: AtomicU64::new(0),
                active: Mutex::new(None),
                phrases: RwLock::new(Vec::new()),
                on_match: RwLock::new(None),
                started_at: Mutex::new(None),
                sessions_created: AtomicUsize::new(0),
                transcripts_seen: AtomicUsize::new(0),
                matches_found: AtomicUsize::new(0),
            }),
        }
    }

    /// Begin listening.
    ///
    /// A no-op while already listening or when the engine is unavailable.
    /// Failures stay inside: they are logged and leave `is_listening` false.
    pub async fn start_listening(&self) {
        if !self.supported {
            warn!("Ignoring start request: recognition engine is not available");
            return;
        }

        {
            let mut state = self.inner.state.lock().await;
            if state.wants_listening() {
                warn!("Already listening");
                return;
            }
            *state = ListenerState::Starting;
        }

        {
            let mut started_at = self.inner.started_at.lock().await;
            *started_at = Some(Utc::now());
        }

        let epoch = self.inner.epoch.fetch_add(1, Ordering::SeqCst) + 1;
        let session_config = self.session_config();

        let events = match self
            .inner
            .open_session(&self.engine, &session_config)
            .await
        {
            Ok(events) => events,
            Err(e) => {
                error!("Failed to open recognition session: {:#}", e);
                let mut state = self.inner.state.lock().await;
                *state = ListenerState::Idle;
                return;
            }
        };

        info!(
            "Listening started (engine={}, language={})",
            self.engine.name(),
            session_config.language
        );

        let inner = Arc::clone(&self.inner);
        let engine = Arc::clone(&self.engine);
        tokio::spawn(async move {
            drive_sessions(inner, engine, session_config, epoch, events).await;
        });
    }

    /// Stop listening.
    ///
    /// A no-op while not listening. The current session's notifications are
    /// detached before teardown is requested, so no restart can follow, and
    /// the supervisor does not wait for the engine to confirm.
    pub async fn stop_listening(&self) {
        let session = {
            let mut state = self.inner.state.lock().await;
            if !state.wants_listening() {
                return;
            }
            // Stopped must be visible before any teardown side effect
            *state = ListenerState::Stopped;
            self.inner.epoch.fetch_add(1, Ordering::SeqCst);
            self.inner.is_listening.store(false, Ordering::SeqCst);

            let mut active = self.inner.active.lock().await;
            active.take()
        };

        if let Some(mut session) = session {
            if let Err(e) = session.stop().await {
                warn!("Failed to stop recognition session: {:#}", e);
            }
        }

        info!("Listening stopped by caller");
    }

    /// Stop listening and release the engine. Call when discarding the
    /// supervisor; dropping it also detaches any in-flight session.
    pub async fn shutdown(&self) {
        self.stop_listening().await;
    }

    /// Whether a recognition session is currently live
    pub fn is_listening(&self) -> bool {
        self.inner.is_listening.load(Ordering::SeqCst)
    }

    /// Whether the engine capability is usable at all
    pub fn is_supported(&self) -> bool {
        self.supported
    }

    /// Replace the phrase list. Takes effect on the very next transcript,
    /// without restarting the session.
    pub async fn set_phrases(&self, phrases: Vec<String>) {
        let mut current = self.inner.phrases.write().await;
        *current = phrases;
    }

    /// Replace the match callback. Same freshness rule as `set_phrases`.
    pub async fn set_on_match(&self, callback: MatchCallback) {
        let mut current = self.inner.on_match.write().await;
        *current = Some(callback);
    }

    /// Get a snapshot of the listening state
    pub async fn stats(&self) -> ListeningStats {
        let started_at = *self.inner.started_at.lock().await;

        ListeningStats {
            is_listening: self.is_listening(),
            is_supported: self.supported,
            started_at,
            sessions_created: self.inner.sessions_created.load(Ordering::SeqCst),
            transcripts_seen: self.inner.transcripts_seen.load(Ordering::SeqCst),
            matches_found: self.inner.matches_found.load(Ordering::SeqCst),
        }
    }

    fn session_config(&self) -> SessionConfig {
        SessionConfig {
            language: self.config.language.clone(),
            // Only finalized transcripts are matched, across utterances
            continuous: true,
            interim_results: false,
        }
    }
}

impl Drop for RecognitionSupervisor {
    fn drop(&mut self) {
        // Detach any in-flight session so its end notification cannot drive
        // a restart after the owner is gone. The handle itself is dropped
        // with the shared state.
        self.inner.epoch.fetch_add(1, Ordering::SeqCst);
        self.inner.is_listening.store(false, Ordering::SeqCst);
    }
}

impl SupervisorInner {
    /// Create and start a fresh session, replacing the previous handle.
    ///
    /// The previous handle is dropped before the replacement starts, so at
    /// most one live session exists at any instant.
    async fn open_session(
        &self,
        engine: &Arc<dyn RecognitionEngine>,
        config: &SessionConfig,
    ) -> Result<mpsc::Receiver<EngineEvent>> {
        let mut session = engine
            .create(config.clone())
            .context("Engine refused to create a session")?;

        {
            let mut active = self.active.lock().await;
            *active = None;
        }

        let events = session
            .start()
            .await
            .context("Failed to start recognition session")?;

        self.sessions_created.fetch_add(1, Ordering::SeqCst);

        {
            let mut active = self.active.lock().await;
            *active = Some(session);
        }

        Ok(events)
    }

    /// Run one transcript through the matcher and fire the callback on a hit.
    ///
    /// Both the phrase list and the callback are dereferenced here, per
    /// event, so replacements apply to the next transcript.
    async fn handle_transcript(&self, transcript: &str) {
        self.transcripts_seen.fetch_add(1, Ordering::SeqCst);

        let matched = {
            let phrases = self.phrases.read().await;
            match_phrase(transcript, &phrases).map(str::to_string)
        };

        let Some(matched) = matched else {
            return;
        };

        self.matches_found.fetch_add(1, Ordering::SeqCst);
        info!("Transcript matched phrase: {}", matched);

        let callback = { self.on_match.read().await.clone() };
        if let Some(callback) = callback {
            callback(&matched);
        }
    }
}

/// Driver task: consume one session's events to completion, in order, and
/// roll over to a fresh session whenever the engine ends one that the caller
/// still wants. Exactly one driver runs per listening run; `epoch` detaches
/// it the moment the caller stops or a newer run starts.
async fn drive_sessions(
    inner: Arc<SupervisorInner>,
    engine: Arc<dyn RecognitionEngine>,
    config: SessionConfig,
    epoch: u64,
    mut events: mpsc::Receiver<EngineEvent>,
) {
    'sessions: loop {
        while let Some(event) = events.recv().await {
            if inner.epoch.load(Ordering::SeqCst) != epoch {
                // Detached: this is a late notification from a handle the
                // caller already tore down
                break 'sessions;
            }

            match event {
                EngineEvent::Started => {
                    let mut state = inner.state.lock().await;
                    if matches!(*state, ListenerState::Starting | ListenerState::Restarting) {
                        *state = ListenerState::Listening;
                        inner.is_listening.store(true, Ordering::SeqCst);
                        info!("Recognition session is live");
                    }
                }
                EngineEvent::Result { transcript } => {
                    inner.handle_transcript(&transcript).await;
                }
                EngineEvent::Error { code } if code.is_fatal() => {
                    error!("Recognition error: {}", code);
                    // Permission was denied or the service is blocked. Clear
                    // the listening intent; the engine's end event follows
                    // and performs the teardown without a restart.
                    let mut state = inner.state.lock().await;
                    *state = ListenerState::Stopped;
                }
                EngineEvent::Error { code } => {
                    // Transient. The engine ends the session on its own and
                    // the end event drives the restart decision.
                    warn!("Transient recognition error: {}", code);
                }
                EngineEvent::Ended => break,
            }
        }

        // The session ended (or its channel closed with it). Decide whether
        // this termination was ours or the engine's.
        let mut state = inner.state.lock().await;

        if inner.epoch.load(Ordering::SeqCst) != epoch {
            break 'sessions;
        }

        if !state.wants_listening() {
            // User stop or fatal error: tear down for good
            inner.is_listening.store(false, Ordering::SeqCst);
            let mut active = inner.active.lock().await;
            *active = None;
            break 'sessions;
        }

        // Unexpected end while the caller still wants to listen: acquire a
        // fresh session. Terminated handles are not restartable.
        *state = ListenerState::Restarting;
        info!("Recognition session ended unexpectedly; restarting");

        match inner.open_session(&engine, &config).await {
            Ok(next_events) => {
                *state = ListenerState::Starting;
                events = next_events;
            }
            Err(e) => {
                error!("Failed to restart recognition session: {:#}", e);
                *state = ListenerState::Stopped;
                inner.is_listening.store(false, Ordering::SeqCst);
                break 'sessions;
            }
        }
    }
}
