//! Value notation: `<name>`, `[name]`, `[name=default]`, `<name...>`, `[name...]`.

use crate::error::ValueError;
use crate::model::Value;
use std::fmt;

/// Parse a value-notation token into a [`Value`].
///
/// The outer brackets decide required (`<>`) vs optional (`[]`). A trailing
/// `...` marks the value variadic. The first `=` splits off a default, which
/// is rejected on required values.
pub fn parse_value(s: &str) -> Result<Value, ValueError> {
    let s = s.trim();
    if s.len() < 3 {
        return Err(ValueError::TooShort(s.to_string()));
    }

    let required = match (s.chars().next(), s.chars().last()) {
        (Some('<'), Some('>')) => true,
        (Some('['), Some(']')) => false,
        _ => return Err(ValueError::Brackets(s.to_string())),
    };

    // Both brackets are single-byte ASCII.
    let mut inner = &s[1..s.len() - 1];
    if inner.is_empty() {
        return Err(ValueError::EmptyName(s.to_string()));
    }

    let variadic = match inner.strip_suffix("...") {
        Some("") => return Err(ValueError::EmptyVariadicName(s.to_string())),
        Some(rest) => {
            inner = rest;
            true
        }
        None => false,
    };

    let default = match inner.split_once('=') {
        Some(_) if required => return Err(ValueError::RequiredDefault(s.to_string())),
        Some(("", _)) => return Err(ValueError::EmptyDefaultName(s.to_string())),
        Some((name, default)) => {
            inner = name;
            Some(default.to_string())
        }
        None => None,
    };

    Ok(Value {
        name: inner.to_string(),
        required,
        default,
        variadic,
    })
}

/// Canonical notation, the inverse of [`parse_value`].
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (open, close) = if self.required { ('<', '>') } else { ('[', ']') };
        write!(f, "{open}{}", self.name)?;
        if let Some(ref default) = self.default {
            write!(f, "={default}")?;
        }
        if self.variadic {
            f.write_str("...")?;
        }
        write!(f, "{close}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn value(name: &str, required: bool, default: Option<&str>, variadic: bool) -> Value {
        Value {
            name: name.to_string(),
            required,
            default: default.map(str::to_string),
            variadic,
        }
    }

    #[test]
    fn parses_canonical_shapes() {
        let cases = [
            ("<name>", value("name", true, None, false)),
            ("[name]", value("name", false, None, false)),
            ("[type=json]", value("type", false, Some("json"), false)),
            ("<files...>", value("files", true, None, true)),
            ("[args...]", value("args", false, None, true)),
            ("<x>", value("x", true, None, false)),
        ];
        for (input, want) in cases {
            assert_eq!(parse_value(input), Ok(want), "input {input:?}");
        }
    }

    #[test]
    fn canonical_shapes_display_back() {
        for input in ["<n>", "[n]", "[n=d]", "<n...>", "[n...]"] {
            let v = parse_value(input).unwrap();
            assert!(!(v.required && v.default.is_some()));
            assert_eq!(v.to_string(), input);
        }
    }

    #[test]
    fn trims_surrounding_whitespace() {
        assert_eq!(parse_value("  <path>\t").unwrap().name, "path");
    }

    #[test]
    fn default_splits_on_first_equals() {
        let v = parse_value("[opt=a=b]").unwrap();
        assert_eq!(v.name, "opt");
        assert_eq!(v.default.as_deref(), Some("a=b"));
    }

    #[test]
    fn empty_default_is_kept() {
        let v = parse_value("[opt=]").unwrap();
        assert_eq!(v.default.as_deref(), Some(""));
    }

    #[test]
    fn variadic_with_default() {
        let v = parse_value("[args=x...]").unwrap();
        assert_eq!(v, value("args", false, Some("x"), true));
    }

    #[test]
    fn rejects_malformed_notation() {
        let cases: &[(&str, fn(String) -> ValueError)] = &[
            ("", ValueError::TooShort),
            ("<>", ValueError::TooShort),
            ("<name]", ValueError::Brackets),
            ("name", ValueError::Brackets),
            ("(name)", ValueError::Brackets),
            ("<...>", ValueError::EmptyVariadicName),
            ("<name=foo>", ValueError::RequiredDefault),
            ("[=foo]", ValueError::EmptyDefaultName),
        ];
        for (input, want) in cases {
            assert_eq!(parse_value(input), Err(want(input.to_string())), "input {input:?}");
        }
    }

    #[test]
    fn error_messages_quote_input() {
        let err = parse_value("<name]").unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid value notation: \"<name]\" (must be <...> or [...])"
        );
    }
}
