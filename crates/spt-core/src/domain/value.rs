//! OSC argument values and string coercion for cue messages.

use std::fmt;

/// A single OSC argument as sent by this tool.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// 32-bit integer (`i` tag).
    Int(i32),
    /// Integer that does not fit in 32 bits (`h` tag).
    Long(i64),
    /// 32-bit float (`f` tag).
    Float(f32),
    /// UTF-8 string (`s` tag).
    Str(String),
}

impl Value {
    /// Infer a typed value from a raw command-line argument.
    ///
    /// Precedence is integer, then float, then a double-quoted string literal
    /// (quotes stripped), then the raw string unchanged. Quoting is how a caller
    /// forces `"3"` to be sent as text rather than as an integer.
    pub fn coerce(raw: &str) -> Self {
        if let Ok(i) = raw.parse::<i32>() {
            return Self::Int(i);
        }
        if let Ok(i) = raw.parse::<i64>() {
            return Self::Long(i);
        }
        if let Ok(f) = raw.parse::<f32>() {
            return Self::Float(f);
        }
        if raw.len() > 1 && raw.starts_with('"') && raw.ends_with('"') {
            return Self::Str(raw[1..raw.len() - 1].to_string());
        }
        Self::Str(raw.to_string())
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::Str(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::Str(s)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Self::Int(i)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(i) => write!(f, "{i}"),
            Self::Long(i) => write!(f, "{i}"),
            Self::Float(x) => write!(f, "{x}"),
            Self::Str(s) => write!(f, "{s:?}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integers_stay_integral() {
        assert_eq!(Value::coerce("3"), Value::Int(3));
        assert_eq!(Value::coerce("-12"), Value::Int(-12));
    }

    #[test]
    fn wide_integers_become_long() {
        assert_eq!(Value::coerce("4294967296"), Value::Long(4_294_967_296));
    }

    #[test]
    fn floats_parse_after_integers() {
        assert_eq!(Value::coerce("3.5"), Value::Float(3.5));
        assert_eq!(Value::coerce("1e3"), Value::Float(1000.0));
    }

    #[test]
    fn quoted_strings_are_stripped() {
        assert_eq!(Value::coerce("\"abc\""), Value::Str("abc".to_string()));
        // Quoting a number keeps it textual
        assert_eq!(Value::coerce("\"3\""), Value::Str("3".to_string()));
        assert_eq!(Value::coerce("\"\""), Value::Str(String::new()));
    }

    #[test]
    fn bare_strings_pass_through() {
        assert_eq!(Value::coerce("abc"), Value::Str("abc".to_string()));
        assert_eq!(Value::coerce(""), Value::Str(String::new()));
        // A lone quote is not a quoted literal
        assert_eq!(Value::coerce("\""), Value::Str("\"".to_string()));
        assert_eq!(Value::coerce("\"abc"), Value::Str("\"abc".to_string()));
    }
}
