// Wire-shape tests for the client/server events and the NATS messages
// exchanged with the transcription service.

use base64::Engine;
use meetline::stt::{AudioFrameMessage, SttResultMessage, StreamOpenMessage};
use meetline::{ClientEvent, ServerEvent};

#[test]
fn client_events_use_snake_case_tags() {
    let event: ClientEvent =
        serde_json::from_str(r#"{"type":"start_session","meeting_id":"m-1"}"#).unwrap();
    assert!(matches!(
        event,
        ClientEvent::StartSession { ref meeting_id } if meeting_id == "m-1"
    ));

    let event: ClientEvent =
        serde_json::from_str(r#"{"type":"change_style","style_id":"s-1"}"#).unwrap();
    assert!(matches!(
        event,
        ClientEvent::ChangeStyle { ref style_id } if style_id == "s-1"
    ));

    let event: ClientEvent = serde_json::from_str(r#"{"type":"stop_session"}"#).unwrap();
    assert!(matches!(event, ClientEvent::StopSession));
}

#[test]
fn server_events_serialize_with_type_tag() {
    let json = serde_json::to_string(&ServerEvent::InterimTranscript {
        text: "hel".to_string(),
    })
    .unwrap();
    assert!(json.contains(r#""type":"interim_transcript""#));
    assert!(json.contains(r#""text":"hel""#));

    let json = serde_json::to_string(&ServerEvent::FinalTranscript {
        text: "hello there".to_string(),
    })
    .unwrap();
    assert!(json.contains(r#""type":"final_transcript""#));

    let json = serde_json::to_string(&ServerEvent::AiResponse {
        text: "Sounds good.".to_string(),
    })
    .unwrap();
    assert!(json.contains(r#""type":"ai_response""#));
}

#[test]
fn server_event_roundtrip() {
    let event = ServerEvent::SessionStarted {
        session_id: "abc".to_string(),
    };
    let json = serde_json::to_string(&event).unwrap();
    let back: ServerEvent = serde_json::from_str(&json).unwrap();
    assert_eq!(back, event);
}

#[test]
fn audio_frame_serialization() {
    let msg = AudioFrameMessage {
        session_id: "session-1".to_string(),
        sequence: 0,
        pcm: base64::engine::general_purpose::STANDARD.encode([0u8; 100]),
        sample_rate: 16000,
        channels: 1,
        timestamp: "2026-08-07T14:30:00Z".to_string(),
        final_frame: false,
    };

    let json = serde_json::to_string(&msg).unwrap();
    assert!(json.contains("session-1"));
    assert!(json.contains("16000"));
    assert!(json.contains("\"final\":false"));
    assert!(json.contains("\"sequence\":0"));

    let deserialized: AudioFrameMessage = serde_json::from_str(&json).unwrap();
    assert_eq!(deserialized.session_id, "session-1");
    assert_eq!(deserialized.sample_rate, 16000);
    assert_eq!(deserialized.channels, 1);
    assert!(!deserialized.final_frame);
}

#[test]
fn audio_frame_final_marker() {
    let msg = AudioFrameMessage {
        session_id: "session-1".to_string(),
        sequence: 10,
        pcm: String::new(), // Empty for the final marker
        sample_rate: 16000,
        channels: 1,
        timestamp: "2026-08-07T14:30:00Z".to_string(),
        final_frame: true,
    };

    let json = serde_json::to_string(&msg).unwrap();
    assert!(json.contains("\"final\":true"));

    let deserialized: AudioFrameMessage = serde_json::from_str(&json).unwrap();
    assert!(deserialized.final_frame);
    assert!(deserialized.pcm.is_empty());
    assert_eq!(deserialized.sequence, 10);
}

#[test]
fn stream_open_roundtrip() {
    let msg = StreamOpenMessage {
        session_id: "session-1".to_string(),
        language: "ko-KR".to_string(),
        sample_rate: 16000,
        channels: 1,
        timestamp: "2026-08-07T14:30:00Z".to_string(),
    };

    let json = serde_json::to_string(&msg).unwrap();
    let back: StreamOpenMessage = serde_json::from_str(&json).unwrap();
    assert_eq!(back.session_id, "session-1");
    assert_eq!(back.language, "ko-KR");
}

#[test]
fn stt_result_minimal_payload() {
    let json = r#"{
        "session_id": "session-1",
        "text": "hello",
        "partial": true,
        "timestamp": "2026-08-07T14:30:05Z"
    }"#;

    let msg: SttResultMessage = serde_json::from_str(json).unwrap();
    assert_eq!(msg.text, "hello");
    assert!(msg.partial);
    assert!(!msg.end_of_stream);
    assert!(msg.error.is_none());
}

#[test]
fn stt_result_end_of_stream() {
    let json = r#"{
        "session_id": "session-1",
        "end_of_stream": true,
        "timestamp": "2026-08-07T14:30:05Z"
    }"#;

    let msg: SttResultMessage = serde_json::from_str(json).unwrap();
    assert!(msg.end_of_stream);
    assert!(msg.text.is_empty());
}

#[test]
fn stt_result_error_payload() {
    let json = r#"{
        "session_id": "session-1",
        "error": "upstream reset",
        "timestamp": "2026-08-07T14:30:05Z"
    }"#;

    let msg: SttResultMessage = serde_json::from_str(json).unwrap();
    assert_eq!(msg.error.as_deref(), Some("upstream reset"));
}

#[test]
fn pcm_encoding_roundtrip() {
    let original_samples: Vec<i16> = vec![100, -200, 300, -400];

    let pcm_bytes: Vec<u8> = original_samples
        .iter()
        .flat_map(|&s| s.to_le_bytes())
        .collect();

    let msg = AudioFrameMessage {
        session_id: "session-1".to_string(),
        sequence: 0,
        pcm: base64::engine::general_purpose::STANDARD.encode(&pcm_bytes),
        sample_rate: 16000,
        channels: 1,
        timestamp: "2026-08-07T14:30:00Z".to_string(),
        final_frame: false,
    };

    let json = serde_json::to_string(&msg).unwrap();
    let deserialized: AudioFrameMessage = serde_json::from_str(&json).unwrap();

    let decoded_bytes = base64::engine::general_purpose::STANDARD
        .decode(&deserialized.pcm)
        .unwrap();
    let decoded_samples: Vec<i16> = decoded_bytes
        .chunks_exact(2)
        .map(|chunk| i16::from_le_bytes([chunk[0], chunk[1]]))
        .collect();

    assert_eq!(decoded_samples, original_samples);
}
