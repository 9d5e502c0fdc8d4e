use super::state::AppState;
use crate::store::Phrase;
use crate::supervisor::{ListeningStats, SUPPORTED_LANGUAGES};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use serde::{Deserialize, Serialize};
use tracing::info;

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct AddPhraseRequest {
    /// Phrase text; trimmed and lowercased before storage
    pub text: String,
}

#[derive(Debug, Serialize)]
pub struct ListenResponse {
    pub status: String,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct StopListeningResponse {
    pub status: String,
    pub message: String,
    pub stats: ListeningStats,
}

#[derive(Debug, Serialize)]
pub struct PhraseListResponse {
    pub phrases: Vec<Phrase>,
    pub total_count: u64,
}

#[derive(Debug, Serialize)]
pub struct LanguageInfo {
    pub code: String,
    pub name: String,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /listen/start
/// Begin continuous listening. Idempotent while already listening.
pub async fn start_listening(State(state): State<AppState>) -> impl IntoResponse {
    if !state.supervisor.is_supported() {
        return (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(ErrorResponse {
                error: "Speech recognition is not available; check the STT service connection"
                    .to_string(),
            }),
        )
            .into_response();
    }

    if state.supervisor.is_listening() {
        return (
            StatusCode::OK,
            Json(ListenResponse {
                status: "listening".to_string(),
                message: "Already listening".to_string(),
            }),
        )
            .into_response();
    }

    info!("Listening start requested over HTTP");
    state.supervisor.start_listening().await;

    (
        StatusCode::OK,
        Json(ListenResponse {
            status: "starting".to_string(),
            message: "Listening started".to_string(),
        }),
    )
        .into_response()
}

/// POST /listen/stop
/// Stop listening. Idempotent while not listening.
pub async fn stop_listening(State(state): State<AppState>) -> impl IntoResponse {
    info!("Listening stop requested over HTTP");

    state.supervisor.stop_listening().await;
    let stats = state.supervisor.stats().await;

    (
        StatusCode::OK,
        Json(StopListeningResponse {
            status: "stopped".to_string(),
            message: "Listening stopped".to_string(),
            stats,
        }),
    )
        .into_response()
}

/// GET /listen/status
/// Get a snapshot of the supervisor state
pub async fn get_status(State(state): State<AppState>) -> impl IntoResponse {
    let stats = state.supervisor.stats().await;
    (StatusCode::OK, Json(stats)).into_response()
}

/// GET /phrases
/// List phrases and their counters
pub async fn list_phrases(State(state): State<AppState>) -> impl IntoResponse {
    let store = state.store.lock().await;

    (
        StatusCode::OK,
        Json(PhraseListResponse {
            phrases: store.phrases().to_vec(),
            total_count: store.total_count(),
        }),
    )
        .into_response()
}

/// POST /phrases
/// Add a phrase with a zero counter
pub async fn add_phrase(
    State(state): State<AppState>,
    Json(req): Json<AddPhraseRequest>,
) -> impl IntoResponse {
    if req.text.trim().is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: "Phrase text must not be empty".to_string(),
            }),
        )
            .into_response();
    }

    let (added, phrases, response) = {
        let mut store = state.store.lock().await;
        let added = store.add_phrase(&req.text);
        (
            added,
            store.phrase_texts(),
            PhraseListResponse {
                phrases: store.phrases().to_vec(),
                total_count: store.total_count(),
            },
        )
    };

    if !added {
        return (
            StatusCode::CONFLICT,
            Json(ErrorResponse {
                error: format!("Phrase \"{}\" already exists", req.text.trim().to_lowercase()),
            }),
        )
            .into_response();
    }

    // A live session must see the new phrase on its next transcript
    state.supervisor.set_phrases(phrases).await;

    info!("Added phrase over HTTP");

    (StatusCode::OK, Json(response)).into_response()
}

/// DELETE /phrases/:text
/// Remove a phrase and its counter
pub async fn delete_phrase(
    State(state): State<AppState>,
    Path(text): Path<String>,
) -> impl IntoResponse {
    let (deleted, phrases, response) = {
        let mut store = state.store.lock().await;
        let deleted = store.delete_phrase(&text);
        (
            deleted,
            store.phrase_texts(),
            PhraseListResponse {
                phrases: store.phrases().to_vec(),
                total_count: store.total_count(),
            },
        )
    };

    if !deleted {
        return (
            StatusCode::NOT_FOUND,
            Json(ErrorResponse {
                error: format!("Phrase \"{}\" not found", text),
            }),
        )
            .into_response();
    }

    state.supervisor.set_phrases(phrases).await;

    info!("Deleted phrase \"{}\" over HTTP", text);

    (StatusCode::OK, Json(response)).into_response()
}

/// POST /counts/reset
/// Zero all counters. Stops listening first if a session is live.
pub async fn reset_counts(State(state): State<AppState>) -> impl IntoResponse {
    if state.supervisor.is_listening() {
        state.supervisor.stop_listening().await;
    }

    let response = {
        let mut store = state.store.lock().await;
        store.reset_counts();
        PhraseListResponse {
            phrases: store.phrases().to_vec(),
            total_count: store.total_count(),
        }
    };

    info!("Counters reset over HTTP");

    (StatusCode::OK, Json(response)).into_response()
}

/// GET /languages
/// List the languages the recognition service accepts
pub async fn list_languages() -> impl IntoResponse {
    let languages: Vec<LanguageInfo> = SUPPORTED_LANGUAGES
        .iter()
        .map(|(code, name)| LanguageInfo {
            code: code.to_string(),
            name: name.to_string(),
        })
        .collect();

    (StatusCode::OK, Json(languages)).into_response()
}

/// GET /health
/// Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}
