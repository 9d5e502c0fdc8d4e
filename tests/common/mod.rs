// Scripted recognition engine for exercising the supervisor without a real
// STT service. Tests drive each created session by injecting engine events
// through its probe and observing start/stop/drop on the handle.

use anyhow::{bail, Result};
use dhikr_counter::engine::{EngineEvent, RecognitionEngine, RecognitionSession, SessionConfig};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::mpsc;

/// Handle the test keeps for one created session
pub struct SessionProbe {
    events: mpsc::Sender<EngineEvent>,
    started: Arc<AtomicBool>,
    stopped: Arc<AtomicBool>,
    dropped: Arc<AtomicBool>,
    pub config: SessionConfig,
}

impl SessionProbe {
    /// Inject an event the supervisor is expected to consume
    pub async fn emit(&self, event: EngineEvent) {
        self.events
            .send(event)
            .await
            .expect("supervisor dropped the event channel");
    }

    /// Inject an event on a handle the supervisor may already have detached
    pub async fn emit_late(&self, event: EngineEvent) {
        let _ = self.events.send(event).await;
    }

    pub fn was_started(&self) -> bool {
        self.started.load(Ordering::SeqCst)
    }

    pub fn was_stopped(&self) -> bool {
        self.stopped.load(Ordering::SeqCst)
    }

    pub fn was_dropped(&self) -> bool {
        self.dropped.load(Ordering::SeqCst)
    }
}

/// Engine whose sessions are driven by the test
pub struct ScriptedEngine {
    available: bool,
    probes: Mutex<Vec<Arc<SessionProbe>>>,
}

impl ScriptedEngine {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            available: true,
            probes: Mutex::new(Vec::new()),
        })
    }

    pub fn unavailable() -> Arc<Self> {
        Arc::new(Self {
            available: false,
            probes: Mutex::new(Vec::new()),
        })
    }

    /// Total sessions created so far, including restarts
    pub fn sessions_created(&self) -> usize {
        self.probes.lock().unwrap().len()
    }

    /// Probe for the `index`-th created session
    pub fn probe(&self, index: usize) -> Arc<SessionProbe> {
        Arc::clone(&self.probes.lock().unwrap()[index])
    }

    /// Sessions that were started and neither stopped nor dropped
    pub fn live_sessions(&self) -> usize {
        self.probes
            .lock()
            .unwrap()
            .iter()
            .filter(|p| p.was_started() && !p.was_stopped() && !p.was_dropped())
            .count()
    }
}

struct ScriptedSession {
    config: SessionConfig,
    events: Option<mpsc::Receiver<EngineEvent>>,
    started: Arc<AtomicBool>,
    stopped: Arc<AtomicBool>,
    dropped: Arc<AtomicBool>,
}

#[async_trait::async_trait]
impl RecognitionSession for ScriptedSession {
    async fn start(&mut self) -> Result<mpsc::Receiver<EngineEvent>> {
        self.started.store(true, Ordering::SeqCst);
        match self.events.take() {
            Some(events) => Ok(events),
            None => bail!("session already started"),
        }
    }

    async fn stop(&mut self) -> Result<()> {
        self.stopped.store(true, Ordering::SeqCst);
        Ok(())
    }

    fn language(&self) -> &str {
        &self.config.language
    }
}

impl Drop for ScriptedSession {
    fn drop(&mut self) {
        self.dropped.store(true, Ordering::SeqCst);
    }
}

impl RecognitionEngine for ScriptedEngine {
    fn is_available(&self) -> bool {
        self.available
    }

    fn create(&self, config: SessionConfig) -> Result<Box<dyn RecognitionSession>> {
        let (events_tx, events_rx) = mpsc::channel(16);
        let started = Arc::new(AtomicBool::new(false));
        let stopped = Arc::new(AtomicBool::new(false));
        let dropped = Arc::new(AtomicBool::new(false));

        let probe = Arc::new(SessionProbe {
            events: events_tx,
            started: Arc::clone(&started),
            stopped: Arc::clone(&stopped),
            dropped: Arc::clone(&dropped),
            config: config.clone(),
        });
        self.probes.lock().unwrap().push(probe);

        Ok(Box::new(ScriptedSession {
            config,
            events: Some(events_rx),
            started,
            stopped,
            dropped,
        }))
    }

    fn name(&self) -> &str {
        "scripted"
    }
}

/// Poll until `check` returns true, panicking after two seconds
pub async fn wait_until<F: Fn() -> bool>(description: &str, check: F) {
    let deadline = tokio::time::Instant::now() + Duration::from_secs(2);
    while !check() {
        if tokio::time::Instant::now() > deadline {
            panic!("timed out waiting for: {}", description);
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
}

/// Give in-flight events time to be processed before asserting that nothing
/// further happened
pub async fn settle() {
    tokio::time::sleep(Duration::from_millis(50)).await;
}
