use crate::store::PhraseStore;
use crate::supervisor::RecognitionSupervisor;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Shared application state for HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Supervisor driving the recognition engine
    pub supervisor: Arc<RecognitionSupervisor>,

    /// Durable phrase counters
    pub store: Arc<Mutex<PhraseStore>>,
}

impl AppState {
    pub fn new(supervisor: Arc<RecognitionSupervisor>, store: Arc<Mutex<PhraseStore>>) -> Self {
        Self { supervisor, store }
    }
}
