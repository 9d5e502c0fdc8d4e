// Unit tests for the STT wire messages and error-code mapping.

use dhikr_counter::engine::{
    EngineErrorCode, RecognitionErrorMessage, SessionEndedMessage, StartSessionMessage,
    StopSessionMessage, TranscriptMessage,
};

#[test]
fn test_start_session_serialization() {
    let msg = StartSessionMessage {
        session_id: "listen-test".to_string(),
        language: "ar-SA".to_string(),
        continuous: true,
        interim_results: false,
        timestamp: "2026-08-06T14:30:00Z".to_string(),
    };

    let json = serde_json::to_string(&msg).unwrap();
    assert!(json.contains("listen-test"));
    assert!(json.contains("ar-SA"));
    assert!(json.contains("\"continuous\":true"));
    assert!(json.contains("\"interim\":false"));

    let deserialized: StartSessionMessage = serde_json::from_str(&json).unwrap();
    assert_eq!(deserialized.session_id, "listen-test");
    assert_eq!(deserialized.language, "ar-SA");
    assert!(deserialized.continuous);
    assert!(!deserialized.interim_results);
}

#[test]
fn test_stop_session_serialization() {
    let msg = StopSessionMessage {
        session_id: "listen-test".to_string(),
        timestamp: "2026-08-06T14:35:00Z".to_string(),
    };

    let json = serde_json::to_string(&msg).unwrap();

    let deserialized: StopSessionMessage = serde_json::from_str(&json).unwrap();
    assert_eq!(deserialized.session_id, "listen-test");
}

#[test]
fn test_transcript_deserialization() {
    let json = r#"{
        "session_id": "listen-test",
        "text": "subhanallah wa bihamdihi",
        "partial": false,
        "timestamp": "2026-08-06T14:30:05Z",
        "confidence": 0.95
    }"#;

    let msg: TranscriptMessage = serde_json::from_str(json).unwrap();

    assert_eq!(msg.session_id, "listen-test");
    assert_eq!(msg.text, "subhanallah wa bihamdihi");
    assert!(!msg.partial);
    assert!((msg.confidence - 0.95).abs() < f32::EPSILON);
}

#[test]
fn test_error_message_deserialization() {
    let json = r#"{"session_id": "listen-test", "code": "not-allowed"}"#;

    let msg: RecognitionErrorMessage = serde_json::from_str(json).unwrap();
    assert_eq!(msg.code, "not-allowed");
}

#[test]
fn test_session_ended_reason_is_optional() {
    let with_reason: SessionEndedMessage =
        serde_json::from_str(r#"{"session_id": "listen-test", "reason": "silence timeout"}"#)
            .unwrap();
    assert_eq!(with_reason.reason.as_deref(), Some("silence timeout"));

    let without_reason: SessionEndedMessage =
        serde_json::from_str(r#"{"session_id": "listen-test", "reason": null}"#).unwrap();
    assert!(without_reason.reason.is_none());
}

#[test]
fn test_error_code_mapping() {
    assert_eq!(
        EngineErrorCode::from_code("not-allowed"),
        EngineErrorCode::NotAllowed
    );
    assert_eq!(
        EngineErrorCode::from_code("service-not-allowed"),
        EngineErrorCode::ServiceNotAllowed
    );
    assert_eq!(
        EngineErrorCode::from_code("no-speech"),
        EngineErrorCode::NoSpeech
    );
    assert_eq!(EngineErrorCode::from_code("network"), EngineErrorCode::Network);
    assert_eq!(
        EngineErrorCode::from_code("audio-capture"),
        EngineErrorCode::Other("audio-capture".to_string())
    );
}

#[test]
fn test_only_permission_codes_are_fatal() {
    assert!(EngineErrorCode::NotAllowed.is_fatal());
    assert!(EngineErrorCode::ServiceNotAllowed.is_fatal());

    assert!(!EngineErrorCode::NoSpeech.is_fatal());
    assert!(!EngineErrorCode::Network.is_fatal());
    assert!(!EngineErrorCode::Other("aborted".to_string()).is_fatal());
}

#[test]
fn test_error_code_display_matches_wire_codes() {
    assert_eq!(EngineErrorCode::NotAllowed.to_string(), "not-allowed");
    assert_eq!(EngineErrorCode::NoSpeech.to_string(), "no-speech");
    assert_eq!(
        EngineErrorCode::Other("aborted".to_string()).to_string(),
        "aborted"
    );
}
