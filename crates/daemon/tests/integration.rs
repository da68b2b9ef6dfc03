//! Integration tests for the Cubedeck daemon IPC protocol.
//!
//! These tests verify protocol correctness without a live daemon:
//! - Command serialization/deserialization
//! - Response formatting
//! - Protocol flow

use cubedeck_ipc::{IpcCommand, IpcResponse, MAX_IPC_MESSAGE_SIZE};

/// Every command the frontend or CLI can send survives the wire format.
#[test]
fn test_all_commands_roundtrip() {
    let commands = vec![
        IpcCommand::Resize {
            width: 900.0,
            height: 1200.0,
        },
        IpcCommand::ToggleFooter,
        IpcCommand::ResizeFooter { height: 320.0 },
        IpcCommand::SetTheaterMode { on: true },
        IpcCommand::SetTheaterMode { on: false },
        IpcCommand::SetScramble {
            scramble: Some("R U R' U' F2".to_string()),
        },
        IpcCommand::SetScramble { scramble: None },
        IpcCommand::SetMemo {
            memo: Some("4.56".to_string()),
        },
        IpcCommand::SetMemo { memo: None },
        IpcCommand::SetPb {
            pb: Some("12.34".to_string()),
        },
        IpcCommand::SetPb { pb: None },
        IpcCommand::SetTime {
            time: Some("0.00".to_string()),
        },
        IpcCommand::SetTime { time: None },
        IpcCommand::SetTimeBlinking { blinking: true },
        IpcCommand::BlinkTime,
        IpcCommand::SetPuzzles {
            puzzles: vec!["3x3".to_string(), "3x3 BLD".to_string()],
        },
        IpcCommand::SetActivePuzzle {
            name: "3x3 BLD".to_string(),
        },
        IpcCommand::SetPuzzleName {
            name: "3x3 Blindfolded".to_string(),
        },
        IpcCommand::RemovePuzzle {
            name: "3x3".to_string(),
        },
        IpcCommand::ClosePuzzles,
        IpcCommand::TimeAdded {
            time_ms: 12_340,
            memo_ms: Some(4_560),
        },
        IpcCommand::QueryLayout,
        IpcCommand::QueryState,
        IpcCommand::Stop,
    ];

    for cmd in commands {
        let json = serde_json::to_string(&cmd).expect("serialize");
        let parsed: IpcCommand = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(cmd, parsed, "Roundtrip failed for {:?}", cmd);
    }
}

/// Response variants survive the wire format.
#[test]
fn test_responses_roundtrip() {
    let responses = vec![
        IpcResponse::Ok,
        IpcResponse::Error {
            message: "View is still loading".to_string(),
        },
        IpcResponse::Layout {
            footer_height: 300.0,
            footer_closedness: 0.0,
            footer_offset: 0.0,
            footer_opacity: 1.0,
            header_offset: 0.0,
            header_opacity: 1.0,
            memo_opacity: 0.0,
            pb_opacity: 0.0,
            scramble_opacity: 1.0,
            middle_height: 856.0,
            middle_y: 44.0,
            time_size: 150.0,
            time_y: 328.0,
            animating: false,
        },
        IpcResponse::ViewState {
            footer_height: 300.0,
            footer_open: true,
            footer_visible: true,
            header_visible: true,
            memo_visible: false,
            pb_available: true,
            pb_visible: false,
            scramble_available: true,
            scramble_visible: true,
            theater_mode: false,
            loading: false,
        },
    ];

    for resp in responses {
        let json = serde_json::to_string(&resp).expect("serialize");
        let parsed: IpcResponse = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(resp, parsed, "Roundtrip failed");
    }
}

/// Commands are newline-delimited on the wire and never contain a raw
/// newline themselves.
#[test]
fn test_protocol_newline_delimited() {
    let cmd = IpcCommand::SetScramble {
        scramble: Some("R U R' U'".to_string()),
    };
    let json = serde_json::to_string(&cmd).expect("serialize");
    assert!(!json.contains('\n'));

    let protocol_msg = format!("{}\n", json);
    assert!(protocol_msg.ends_with('\n'));

    let parsed: IpcCommand = serde_json::from_str(protocol_msg.trim()).expect("parse");
    assert_eq!(cmd, parsed);
}

/// The serde tag matches the documented snake_case wire names.
#[test]
fn test_wire_names_are_snake_case() {
    let json = serde_json::to_string(&IpcCommand::SetTheaterMode { on: true }).unwrap();
    assert!(json.contains(r#""type":"set_theater_mode""#));

    let json = serde_json::to_string(&IpcCommand::QueryLayout).unwrap();
    assert!(json.contains(r#""type":"query_layout""#));

    let json = serde_json::to_string(&IpcResponse::Ok).unwrap();
    assert!(json.contains(r#""status":"ok""#));
}

/// A realistic command stays far inside the message size bound.
#[test]
fn test_typical_message_fits_size_bound() {
    let cmd = IpcCommand::SetPuzzles {
        puzzles: (0..50).map(|i| format!("Puzzle {}", i)).collect(),
    };
    let json = serde_json::to_string(&cmd).unwrap();
    assert!(json.len() < MAX_IPC_MESSAGE_SIZE);
}

/// Malformed input produces a parse error, never a panic.
#[test]
fn test_invalid_commands_rejected() {
    let result: Result<IpcCommand, _> = serde_json::from_str("not valid json");
    assert!(result.is_err());

    let result: Result<IpcCommand, _> = serde_json::from_str(r#"{"type":"warp_drive"}"#);
    assert!(result.is_err());

    // Wrong payload type for a known command.
    let result: Result<IpcCommand, _> =
        serde_json::from_str(r#"{"type":"resize","width":"wide","height":10}"#);
    assert!(result.is_err());
}
