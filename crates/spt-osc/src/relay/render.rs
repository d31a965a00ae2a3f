//! Rendering of log events as styled terminal lines.
//!
//! Rendering is pure: it produces [`RenderedLine`]s made of styled spans and
//! leaves escape codes to the terminal adapter. An empty line is a blank
//! separator.

use spt_core::{LogEvent, MessagePart, StyleKind};

/// A run of text in one style.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Span {
    pub text: String,
    pub style: StyleKind,
}

impl Span {
    pub fn new(text: impl Into<String>, style: StyleKind) -> Self {
        Self {
            text: text.into(),
            style,
        }
    }
}

/// One output line.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RenderedLine {
    pub spans: Vec<Span>,
}

impl RenderedLine {
    pub fn blank() -> Self {
        Self::default()
    }

    fn single(text: impl Into<String>, style: StyleKind) -> Self {
        Self {
            spans: vec![Span::new(text, style)],
        }
    }

    fn pair(first: Span, second: Span) -> Self {
        Self {
            spans: vec![first, second],
        }
    }

    /// The line's text with styling removed.
    pub fn plain_text(&self) -> String {
        self.spans.iter().map(|s| s.text.as_str()).collect()
    }
}

/// Render an event into output lines.
pub fn render_event(event: &LogEvent) -> Vec<RenderedLine> {
    match event {
        LogEvent::Info { text, .. } => vec![
            RenderedLine::single(format!("=> {text}"), StyleKind::Info),
            RenderedLine::blank(),
        ],
        LogEvent::MultiMessage {
            run_id,
            time,
            parts,
            ..
        } => render_multi_message(*run_id, time, parts),
        LogEvent::RuntimeError { message, trace, .. } => {
            let mut lines: Vec<RenderedLine> = split_lines(&unescape(message))
                .enumerate()
                .map(|(i, line)| {
                    let prefix = if i == 0 { "Runtime Error: " } else { "" };
                    RenderedLine::single(format!("{prefix}{line}"), StyleKind::Runtime)
                })
                .collect();
            lines.push(RenderedLine::single(unescape(trace), StyleKind::Trace));
            lines.push(RenderedLine::blank());
            lines
        }
        LogEvent::SyntaxError {
            message, code, line, ..
        } => {
            let prefix = if event.has_line() {
                format!("[Line {line}]: ")
            } else {
                String::new()
            };
            vec![
                RenderedLine::single(format!("Error: {}", unescape(message)), StyleKind::Syntax),
                RenderedLine::pair(
                    Span::new(prefix, StyleKind::Line),
                    Span::new(code.clone(), StyleKind::Code),
                ),
            ]
        }
    }
}

/// Header line followed by a tree: `├─`/`│` for every part but the last,
/// `└─` and a blank gutter for the last one.
fn render_multi_message(run_id: i64, time: &str, parts: &[MessagePart]) -> Vec<RenderedLine> {
    let mut lines = vec![RenderedLine::single(
        format!("{{run: {run_id}, time: {time}}}"),
        StyleKind::Multi,
    )];

    let last = parts.len().saturating_sub(1);
    for (i, part) in parts.iter().enumerate() {
        for (j, text) in split_lines(&part.text).enumerate() {
            let prefix = match (i < last, j == 0) {
                (true, true) => "  ├─ ",
                (true, false) => "  │",
                (false, true) => "  └─ ",
                (false, false) => "   ",
            };
            lines.push(RenderedLine::pair(
                Span::new(prefix, StyleKind::Multi),
                Span::new(text, StyleKind::Part(part.kind)),
            ));
        }
    }

    lines.push(RenderedLine::blank());
    lines
}

/// Split on `\n`, `\r\n` and lone `\r`; a trailing terminator adds no line.
fn split_lines(text: &str) -> impl Iterator<Item = &str> {
    let mut rest = text;
    std::iter::from_fn(move || {
        if rest.is_empty() {
            return None;
        }
        match rest.find(['\n', '\r']) {
            Some(pos) => {
                let line = &rest[..pos];
                let skip = if rest[pos..].starts_with("\r\n") { 2 } else { 1 };
                rest = &rest[pos + skip..];
                Some(line)
            }
            None => {
                let line = rest;
                rest = "";
                Some(line)
            }
        }
    })
}

fn unescape(text: &str) -> String {
    html_escape::decode_html_entities(text).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use spt_core::PartKind;

    fn texts(lines: &[RenderedLine]) -> Vec<String> {
        lines.iter().map(RenderedLine::plain_text).collect()
    }

    #[test]
    fn multi_message_draws_tree_branches() {
        let event = LogEvent::MultiMessage {
            run_id: 1,
            thread: String::new(),
            time: "0.5".into(),
            parts: vec![
                MessagePart::new(PartKind::from_tag(0), "a\nb"),
                MessagePart::new(PartKind::from_tag(0), "c"),
            ],
        };
        let lines = render_event(&event);
        assert_eq!(
            texts(&lines),
            vec!["{run: 1, time: 0.5}", "  ├─ a", "  │b", "  └─ c", ""]
        );

        // Prefixes carry the header style, text the part style
        assert_eq!(lines[1].spans[0].style, StyleKind::Multi);
        assert_eq!(lines[1].spans[1].style, StyleKind::Part(PartKind::Standard));
    }

    #[test]
    fn last_part_continuation_uses_blank_gutter() {
        let event = LogEvent::MultiMessage {
            run_id: 7,
            thread: "live_loop_foo".into(),
            time: "3.0".into(),
            parts: vec![MessagePart::new(PartKind::Info, "one\r\ntwo")],
        };
        assert_eq!(
            texts(&render_event(&event)),
            vec!["{run: 7, time: 3.0}", "  └─ one", "   two", ""]
        );
    }

    #[test]
    fn info_is_prefixed_and_followed_by_blank_line() {
        let event = LogEvent::Info {
            style: 0,
            text: "Sonic Pi server ready".into(),
        };
        assert_eq!(texts(&render_event(&event)), vec!["=> Sonic Pi server ready", ""]);
    }

    #[test]
    fn runtime_error_unescapes_message_and_trace() {
        let event = LogEvent::RuntimeError {
            run_id: 2,
            message: "undefined method &#39;foo&#39;\nfor main:Object".into(),
            trace: "buffer 0, line 3 &lt;eval&gt;".into(),
            line: 3,
        };
        assert_eq!(
            texts(&render_event(&event)),
            vec![
                "Runtime Error: undefined method 'foo'",
                "for main:Object",
                "buffer 0, line 3 <eval>",
                "",
            ]
        );
    }

    #[test]
    fn syntax_error_shows_line_when_known() {
        let with_line = LogEvent::SyntaxError {
            run_id: 1,
            message: "unexpected &quot;)&quot;".into(),
            code: "play 60)".into(),
            line: 4,
            line_source: String::new(),
        };
        let lines = render_event(&with_line);
        assert_eq!(texts(&lines), vec!["Error: unexpected \")\"", "[Line 4]: play 60)"]);
        assert_eq!(lines[1].spans[0].style, StyleKind::Line);
        assert_eq!(lines[1].spans[1].style, StyleKind::Code);

        let without_line = LogEvent::SyntaxError {
            run_id: 1,
            message: "bad".into(),
            code: "play 60)".into(),
            line: -1,
            line_source: String::new(),
        };
        assert_eq!(texts(&render_event(&without_line)), vec!["Error: bad", "play 60)"]);
    }

    #[test]
    fn split_lines_matches_line_semantics() {
        assert_eq!(split_lines("").count(), 0);
        assert_eq!(split_lines("a\n").collect::<Vec<_>>(), vec!["a"]);
        assert_eq!(split_lines("a\n\nb").collect::<Vec<_>>(), vec!["a", "", "b"]);
        assert_eq!(split_lines("a\rb").collect::<Vec<_>>(), vec!["a", "b"]);
    }
}
