//! Cubedeck IPC Protocol
//!
//! Shared types for daemon-frontend-CLI communication. Messages are single
//! lines of JSON over a loopback TCP connection: one command per
//! connection, one response back.

use serde::{Deserialize, Serialize};

/// Loopback address the daemon listens on.
pub const DEFAULT_ADDR: &str = "127.0.0.1:7437";

/// Upper bound on a single IPC message in bytes.
pub const MAX_IPC_MESSAGE_SIZE: usize = 64 * 1024;

/// Commands sent to the daemon.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum IpcCommand {
    /// Report a new window size.
    Resize {
        /// Window width in pixels.
        width: f64,
        /// Window height in pixels.
        height: f64,
    },

    /// Flip the footer between open and collapsed.
    ToggleFooter,
    /// Drag the footer resize handle to a requested height.
    ResizeFooter {
        /// Requested footer height in pixels (clamped by the daemon).
        height: f64,
    },

    /// Enable or disable theater mode (everything hidden but the time).
    SetTheaterMode {
        on: bool,
    },

    /// Update the scramble sequence; `null` hides it.
    SetScramble {
        scramble: Option<String>,
    },
    /// Update the memo time; `null` hides it.
    SetMemo {
        memo: Option<String>,
    },
    /// Update the personal-best label; `null` hides it.
    SetPb {
        pb: Option<String>,
    },

    /// Set the timer text.
    SetTime {
        time: Option<String>,
    },
    /// Set whether the timer's editing blinker is blinking.
    SetTimeBlinking {
        blinking: bool,
    },
    /// Advance the timer's editing blinker by one phase.
    BlinkTime,

    /// Replace the puzzle list shown in the header dropdown.
    SetPuzzles {
        puzzles: Vec<String>,
    },
    /// Select the active puzzle.
    SetActivePuzzle {
        name: String,
    },
    /// Rename the active puzzle.
    SetPuzzleName {
        name: String,
    },
    /// Remove a puzzle from the header dropdown.
    RemovePuzzle {
        name: String,
    },
    /// Close the header's puzzle dropdown if it is open.
    ClosePuzzles,

    /// Record a newly completed solve.
    TimeAdded {
        /// Solve time in milliseconds.
        time_ms: u64,
        /// Memorization time in milliseconds, if tracked.
        memo_ms: Option<u64>,
    },

    /// Query the current attribute snapshot.
    QueryLayout,
    /// Query the discrete view state.
    QueryState,

    /// Stop the daemon.
    Stop,
}

/// Responses from the daemon.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum IpcResponse {
    /// Command executed successfully.
    Ok,
    /// Command failed with an error.
    Error {
        /// Error message describing what went wrong.
        message: String,
    },
    /// Attribute snapshot query response.
    Layout {
        footer_height: f64,
        footer_closedness: f64,
        footer_offset: f64,
        footer_opacity: f64,
        header_offset: f64,
        header_opacity: f64,
        memo_opacity: f64,
        pb_opacity: f64,
        scramble_opacity: f64,
        middle_height: f64,
        middle_y: f64,
        time_size: f64,
        time_y: f64,
        /// Whether any attribute is still in flight.
        animating: bool,
    },
    /// Discrete state query response.
    ViewState {
        footer_height: f64,
        footer_open: bool,
        footer_visible: bool,
        header_visible: bool,
        memo_visible: bool,
        pb_available: bool,
        pb_visible: bool,
        scramble_available: bool,
        scramble_visible: bool,
        theater_mode: bool,
        /// Whether the entry animations are still playing.
        loading: bool,
    },
}

impl IpcResponse {
    /// Create an error response.
    pub fn error(message: impl Into<String>) -> Self {
        Self::Error {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_serialization_is_tagged() {
        let cmd = IpcCommand::ToggleFooter;
        let json = serde_json::to_string(&cmd).unwrap();
        assert!(json.contains("toggle_footer"));

        let cmd2: IpcCommand = serde_json::from_str(&json).unwrap();
        assert_eq!(cmd, cmd2);
    }

    #[test]
    fn test_null_payload_clears_value() {
        let cmd = IpcCommand::SetScramble { scramble: None };
        let json = serde_json::to_string(&cmd).unwrap();
        let cmd2: IpcCommand = serde_json::from_str(&json).unwrap();
        assert_eq!(cmd, cmd2);

        let explicit: IpcCommand =
            serde_json::from_str(r#"{"type":"set_scramble","scramble":null}"#).unwrap();
        assert_eq!(explicit, cmd);
    }

    #[test]
    fn test_resize_command_carries_dimensions() {
        let cmd = IpcCommand::Resize {
            width: 900.0,
            height: 1200.0,
        };
        let json = serde_json::to_string(&cmd).unwrap();
        assert!(json.contains("resize"));
        let cmd2: IpcCommand = serde_json::from_str(&json).unwrap();
        assert_eq!(cmd, cmd2);
    }

    #[test]
    fn test_error_response() {
        let resp = IpcResponse::error("view is still loading");
        if let IpcResponse::Error { message } = resp {
            assert_eq!(message, "view is still loading");
        } else {
            panic!("Expected Error response");
        }
    }

    #[test]
    fn test_line_delimited_protocol() {
        // The wire format is JSON + newline.
        let cmd = IpcCommand::QueryLayout;
        let wire_format = serde_json::to_string(&cmd).unwrap() + "\n";
        assert!(!wire_format.trim().contains('\n'));
        let parsed: IpcCommand = serde_json::from_str(wire_format.trim()).unwrap();
        assert_eq!(cmd, parsed);
    }

    #[test]
    fn test_invalid_json_handling() {
        let result: Result<IpcCommand, _> = serde_json::from_str("not valid json");
        assert!(result.is_err());

        let result: Result<IpcCommand, _> = serde_json::from_str(r#"{"type":"unknown_command"}"#);
        assert!(result.is_err());
    }
}
