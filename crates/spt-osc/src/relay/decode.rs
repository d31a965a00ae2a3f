//! Decoding of inbound log messages into [`LogEvent`]s.

use rosc::{OscMessage, OscType};
use spt_core::{LogEvent, MessagePart, PartKind};
use thiserror::Error;

/// Why a log message could not be turned into an event.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DecodeError {
    #[error("no handler for address {0}")]
    UnknownAddress(String),

    #[error("{address}: missing argument {index} ({field})")]
    MissingArgument {
        address: String,
        index: usize,
        field: &'static str,
    },

    #[error("{address}: argument {index} ({field}) should be {expected}")]
    WrongType {
        address: String,
        index: usize,
        field: &'static str,
        expected: &'static str,
    },
}

/// Logical kind of a log address.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    Info,
    MultiMessage,
    RuntimeError,
    SyntaxError,
}

/// Map a log address to its event kind.
pub fn route(address: &str) -> Option<EventKind> {
    match address {
        "/log/info" | "/info" => Some(EventKind::Info),
        "/log/multi_message" | "/multi_message" => Some(EventKind::MultiMessage),
        "/error" => Some(EventKind::RuntimeError),
        "/syntax_error" => Some(EventKind::SyntaxError),
        _ => None,
    }
}

/// Decode one OSC message from the server's log transport.
pub fn decode_message(msg: &OscMessage) -> Result<LogEvent, DecodeError> {
    let kind = route(&msg.addr).ok_or_else(|| DecodeError::UnknownAddress(msg.addr.clone()))?;
    let args = Args {
        address: &msg.addr,
        values: &msg.args,
    };

    match kind {
        EventKind::Info => Ok(LogEvent::Info {
            style: args.int_or(0, "style", 0)?,
            text: args.text(1, "message")?,
        }),
        EventKind::MultiMessage => {
            let count = usize::try_from(args.long(3, "count")?).unwrap_or(0);
            // The count is untrusted; the loop reports the first missing pair.
            let available = args.values.len().saturating_sub(4) / 2;
            let mut parts = Vec::with_capacity(count.min(available));
            for i in 0..count {
                let tag = args.int(4 + 2 * i, "part type")?;
                let text = args.text(5 + 2 * i, "part text")?;
                parts.push(MessagePart::new(PartKind::from_tag(tag), text));
            }
            Ok(LogEvent::MultiMessage {
                run_id: args.long(0, "run")?,
                thread: args.text(1, "thread")?,
                time: args.text(2, "time")?,
                parts,
            })
        }
        EventKind::RuntimeError => Ok(LogEvent::RuntimeError {
            run_id: args.long(0, "run")?,
            message: args.text(1, "message")?,
            trace: args.text(2, "trace")?,
            line: args.int_or(3, "line", -1)?,
        }),
        EventKind::SyntaxError => Ok(LogEvent::SyntaxError {
            run_id: args.long(0, "run")?,
            message: args.text(1, "message")?,
            code: args.text(2, "code")?,
            line: args.int_or(3, "line", -1)?,
            line_source: args.text_or(4, "line source", "")?,
        }),
    }
}

struct Args<'a> {
    address: &'a str,
    values: &'a [OscType],
}

impl Args<'_> {
    fn get(&self, index: usize, field: &'static str) -> Result<&OscType, DecodeError> {
        self.values
            .get(index)
            .ok_or_else(|| DecodeError::MissingArgument {
                address: self.address.to_string(),
                index,
                field,
            })
    }

    fn wrong_type(&self, index: usize, field: &'static str, expected: &'static str) -> DecodeError {
        DecodeError::WrongType {
            address: self.address.to_string(),
            index,
            field,
            expected,
        }
    }

    fn long(&self, index: usize, field: &'static str) -> Result<i64, DecodeError> {
        match self.get(index, field)? {
            OscType::Int(i) => Ok(i64::from(*i)),
            OscType::Long(i) => Ok(*i),
            OscType::String(s) => s
                .trim()
                .parse()
                .map_err(|_| self.wrong_type(index, field, "an integer")),
            _ => Err(self.wrong_type(index, field, "an integer")),
        }
    }

    fn int(&self, index: usize, field: &'static str) -> Result<i32, DecodeError> {
        let value = self.long(index, field)?;
        i32::try_from(value).map_err(|_| self.wrong_type(index, field, "a 32-bit integer"))
    }

    fn int_or(&self, index: usize, field: &'static str, default: i32) -> Result<i32, DecodeError> {
        if index >= self.values.len() {
            return Ok(default);
        }
        self.int(index, field)
    }

    fn text(&self, index: usize, field: &'static str) -> Result<String, DecodeError> {
        Ok(display_arg(self.get(index, field)?))
    }

    fn text_or(
        &self,
        index: usize,
        field: &'static str,
        default: &str,
    ) -> Result<String, DecodeError> {
        if index >= self.values.len() {
            return Ok(default.to_string());
        }
        self.text(index, field)
    }
}

/// Render an argument the way the server meant it to be read.
fn display_arg(arg: &OscType) -> String {
    match arg {
        OscType::String(s) => s.clone(),
        OscType::Int(i) => i.to_string(),
        OscType::Long(i) => i.to_string(),
        OscType::Float(f) => format_float(f64::from(*f)),
        OscType::Double(d) => format_float(*d),
        OscType::Bool(b) => b.to_string(),
        OscType::Char(c) => c.to_string(),
        OscType::Nil => "nil".to_string(),
        OscType::Inf => "inf".to_string(),
        other => format!("{other:?}"),
    }
}

fn format_float(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 {
        format!("{value:.1}")
    } else {
        value.to_string()
    }
}
