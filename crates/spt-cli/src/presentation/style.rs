//! Style descriptor to `console` style mapping.

use console::Style;
use spt_core::{Color, TextStyle};

fn to_console_color(color: Color) -> console::Color {
    match color {
        Color::Magenta => console::Color::Magenta,
        Color::Blue => console::Color::Blue,
        Color::Yellow => console::Color::Yellow,
        Color::Red => console::Color::Red,
    }
}

pub fn to_console_style(style: TextStyle) -> Style {
    let mut out = Style::new();
    if style.bold {
        out = out.bold();
    }
    if style.reverse {
        out = out.reverse();
    }
    if let Some(fg) = style.fg {
        out = out.fg(to_console_color(fg));
    }
    if let Some(bg) = style.bg {
        out = out.bg(to_console_color(bg));
    }
    out
}
