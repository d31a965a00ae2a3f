//! Closed style table for rendering log events.
//!
//! Every role a span of rendered text can play maps to exactly one
//! [`TextStyle`]. Terminal adapters translate the descriptor into escape
//! codes; nothing here knows about ANSI.

/// Terminal palette used by the log renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Color {
    Magenta,
    Blue,
    Yellow,
    Red,
}

/// Structured style descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TextStyle {
    pub bold: bool,
    pub reverse: bool,
    pub fg: Option<Color>,
    pub bg: Option<Color>,
}

impl TextStyle {
    pub const PLAIN: Self = Self {
        bold: false,
        reverse: false,
        fg: None,
        bg: None,
    };

    const fn bold() -> Self {
        Self {
            bold: true,
            ..Self::PLAIN
        }
    }

    const fn bold_fg(color: Color) -> Self {
        Self {
            fg: Some(color),
            ..Self::bold()
        }
    }

    const fn bold_bg(color: Color) -> Self {
        Self {
            bg: Some(color),
            ..Self::bold()
        }
    }

    pub fn is_plain(&self) -> bool {
        *self == Self::PLAIN
    }
}

/// Type tag of one part of a multi-part message.
///
/// The server sends small integers; anything outside 0..=6 renders plain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PartKind {
    Standard,
    Info,
    Warning,
    Error,
    HighlightMagenta,
    HighlightBlue,
    HighlightYellow,
    Plain,
}

impl PartKind {
    pub fn from_tag(tag: i32) -> Self {
        match tag {
            0 => Self::Standard,
            1 => Self::Info,
            2 => Self::Warning,
            3 => Self::Error,
            4 => Self::HighlightMagenta,
            5 => Self::HighlightBlue,
            6 => Self::HighlightYellow,
            _ => Self::Plain,
        }
    }
}

/// Role of a rendered span.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StyleKind {
    /// Info message body.
    Info,
    /// Multi-message header and tree branches.
    Multi,
    /// Text of one multi-message part.
    Part(PartKind),
    /// Runtime error message.
    Runtime,
    /// Runtime error backtrace.
    Trace,
    /// Syntax error message.
    Syntax,
    /// `[Line N]: ` prefix of a syntax error.
    Line,
    /// Offending code of a syntax error.
    Code,
}

impl StyleKind {
    pub const fn style(self) -> TextStyle {
        match self {
            Self::Info => TextStyle {
                reverse: true,
                ..TextStyle::bold()
            },
            Self::Multi => TextStyle::bold(),
            Self::Part(kind) => match kind {
                PartKind::Standard => TextStyle::bold_fg(Color::Magenta),
                PartKind::Info => TextStyle::bold_fg(Color::Blue),
                PartKind::Warning => TextStyle::bold_fg(Color::Yellow),
                PartKind::Error => TextStyle::bold_fg(Color::Red),
                PartKind::HighlightMagenta => TextStyle::bold_bg(Color::Magenta),
                PartKind::HighlightBlue => TextStyle::bold_bg(Color::Blue),
                PartKind::HighlightYellow => TextStyle::bold_bg(Color::Yellow),
                PartKind::Plain => TextStyle::PLAIN,
            },
            Self::Runtime => TextStyle::bold_bg(Color::Magenta),
            Self::Syntax => TextStyle::bold_bg(Color::Blue),
            Self::Line => TextStyle::bold_fg(Color::Magenta),
            Self::Trace | Self::Code => TextStyle::PLAIN,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_part_tags_render_plain() {
        assert_eq!(PartKind::from_tag(7), PartKind::Plain);
        assert_eq!(PartKind::from_tag(-1), PartKind::Plain);
        assert!(StyleKind::Part(PartKind::from_tag(42)).style().is_plain());
    }

    #[test]
    fn part_tags_map_to_palette() {
        let error = StyleKind::Part(PartKind::from_tag(3)).style();
        assert!(error.bold);
        assert_eq!(error.fg, Some(Color::Red));
        assert_eq!(error.bg, None);

        let highlight = StyleKind::Part(PartKind::from_tag(5)).style();
        assert_eq!(highlight.bg, Some(Color::Blue));
        assert_eq!(highlight.fg, None);
    }

    #[test]
    fn info_is_reversed() {
        let info = StyleKind::Info.style();
        assert!(info.bold && info.reverse);
        assert!(StyleKind::Trace.style().is_plain());
        assert!(StyleKind::Code.style().is_plain());
    }
}
