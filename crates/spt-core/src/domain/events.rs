//! Log events emitted by the Sonic Pi server on its log transport.
//!
//! Events are transient: decoded from a datagram, rendered, then dropped.

use super::style::PartKind;

/// One `(type tag, text)` pair of a multi-part message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessagePart {
    pub kind: PartKind,
    pub text: String,
}

impl MessagePart {
    pub fn new(kind: PartKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
        }
    }
}

/// A structured event received from the server.
#[derive(Debug, Clone, PartialEq)]
pub enum LogEvent {
    /// Informational message (`/log/info`, `/info`).
    Info { style: i32, text: String },

    /// Output of a running job (`/log/multi_message`, `/multi_message`).
    MultiMessage {
        run_id: i64,
        thread: String,
        time: String,
        parts: Vec<MessagePart>,
    },

    /// Exception raised while a job was running (`/error`).
    RuntimeError {
        run_id: i64,
        message: String,
        trace: String,
        line: i32,
    },

    /// Code rejected by the parser (`/syntax_error`).
    ///
    /// `line < 0` means the server could not attribute the error to a line.
    SyntaxError {
        run_id: i64,
        message: String,
        code: String,
        line: i32,
        line_source: String,
    },
}

impl LogEvent {
    /// Short name of the event kind, used in diagnostics.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Info { .. } => "info",
            Self::MultiMessage { .. } => "multi_message",
            Self::RuntimeError { .. } => "runtime_error",
            Self::SyntaxError { .. } => "syntax_error",
        }
    }

    /// Whether a syntax error carries a usable line number.
    pub fn has_line(&self) -> bool {
        match self {
            Self::SyntaxError { line, .. } | Self::RuntimeError { line, .. } => *line >= 0,
            Self::Info { .. } | Self::MultiMessage { .. } => false,
        }
    }
}
