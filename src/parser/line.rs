//! Line classifier: fixed patterns recognized by the state machine.

use regex::Regex;
use std::sync::LazyLock;

// -- Regex patterns -----------------------------------------------------------

static RE_SHEBANG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^#!(.+)$").unwrap());

// The value must contain a non-blank character; `#?/tag   ` opens a block.
static RE_META_INLINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^#\?/([[:word:]]+)[[:space:]]+([^[:space:]].*)$").unwrap()
});

static RE_META_OPEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^#\?/([[:word:]]+)[[:space:]]*$").unwrap());

static RE_DOC_OPEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^#@/([[:word:]]*)[[:space:]]*(.*)$").unwrap());

static RE_CONTINUATION: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^ # ?(.*)$").unwrap());

static RE_CLOSE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^ ##[[:space:]]*$").unwrap());

static RE_FUNC_PAREN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[[:space:]]*([[:word:]][[:word:]-]*)[[:space:]]*\(\)[[:space:]]*\{?").unwrap()
});

static RE_FUNC_KEYWORD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[[:space:]]*function[[:space:]]+([[:word:]][[:word:]-]*)").unwrap()
});

/// Shape of a single source line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Line<'a> {
    /// `#!interpreter`, trimmed.
    Shebang(&'a str),
    /// `#?/tag value`, value trimmed.
    MetaInline { tag: &'a str, value: &'a str },
    /// `#?/tag` alone.
    MetaOpen { tag: &'a str },
    /// `#@/visibility extra`, extra trimmed.
    DocOpen { visibility: &'a str, extra: &'a str },
    /// ` ##`
    Close,
    /// ` # content`: content without the prefix, otherwise verbatim.
    Continuation(&'a str),
    /// `name() {` or `function name`.
    Function(&'a str),
    Other,
}

impl<'a> Line<'a> {
    /// Classify a line. Close is tested before continuation since ` ##`
    /// also has the continuation shape.
    pub fn classify(line: &'a str) -> Line<'a> {
        if RE_CLOSE.is_match(line) {
            return Line::Close;
        }
        if let Some(caps) = RE_CONTINUATION.captures(line) {
            return Line::Continuation(capture(&caps, 1));
        }
        if let Some(caps) = RE_SHEBANG.captures(line) {
            return Line::Shebang(capture(&caps, 1).trim());
        }
        if let Some(caps) = RE_META_INLINE.captures(line) {
            return Line::MetaInline {
                tag: capture(&caps, 1),
                value: capture(&caps, 2).trim(),
            };
        }
        if let Some(caps) = RE_META_OPEN.captures(line) {
            return Line::MetaOpen {
                tag: capture(&caps, 1),
            };
        }
        if let Some(caps) = RE_DOC_OPEN.captures(line) {
            return Line::DocOpen {
                visibility: capture(&caps, 1),
                extra: capture(&caps, 2).trim(),
            };
        }
        if let Some(name) = function_name(line) {
            return Line::Function(name);
        }
        Line::Other
    }
}

/// Function name declared on `line`, if any. The `function` keyword form
/// takes precedence.
pub fn function_name(line: &str) -> Option<&str> {
    RE_FUNC_KEYWORD
        .captures(line)
        .or_else(|| RE_FUNC_PAREN.captures(line))
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// Split a block content line into `@tagname` and its trimmed remainder.
pub fn split_tag(content: &str) -> Option<(&str, &str)> {
    let rest = content.trim().strip_prefix('@')?;
    match rest.find([' ', '\t']) {
        Some(idx) => Some((&rest[..idx], rest[idx + 1..].trim())),
        None => Some((rest, "")),
    }
}

fn capture<'a>(caps: &regex::Captures<'a>, idx: usize) -> &'a str {
    caps.get(idx).map_or("", |m| m.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shebang() {
        assert_eq!(Line::classify("#!/bin/bash"), Line::Shebang("/bin/bash"));
        assert_eq!(Line::classify("#! /usr/bin/env bash "), Line::Shebang("/usr/bin/env bash"));
        assert_eq!(Line::classify("#!"), Line::Other);
    }

    #[test]
    fn meta_lines() {
        assert_eq!(
            Line::classify("#?/name greet"),
            Line::MetaInline { tag: "name", value: "greet" }
        );
        assert_eq!(
            Line::classify("#?/synopsis   deploy <cmd>  "),
            Line::MetaInline { tag: "synopsis", value: "deploy <cmd>" }
        );
        assert_eq!(Line::classify("#?/description"), Line::MetaOpen { tag: "description" });
        assert_eq!(Line::classify("#?/description   "), Line::MetaOpen { tag: "description" });
        assert_eq!(Line::classify("#?/"), Line::Other);
    }

    #[test]
    fn doc_open() {
        assert_eq!(
            Line::classify("#@/subcommand push"),
            Line::DocOpen { visibility: "subcommand", extra: "push" }
        );
        assert_eq!(Line::classify("#@/"), Line::DocOpen { visibility: "", extra: "" });
        assert_eq!(
            Line::classify("#@/command  "),
            Line::DocOpen { visibility: "command", extra: "" }
        );
    }

    #[test]
    fn continuation_and_close() {
        assert_eq!(Line::classify(" # text"), Line::Continuation("text"));
        assert_eq!(Line::classify(" #    indented"), Line::Continuation("   indented"));
        assert_eq!(Line::classify(" #"), Line::Continuation(""));
        assert_eq!(Line::classify(" ##"), Line::Close);
        assert_eq!(Line::classify(" ##  "), Line::Close);
        assert_eq!(Line::classify("# not a continuation"), Line::Other);
        assert_eq!(Line::classify("  # two spaces"), Line::Other);
    }

    #[test]
    fn functions() {
        assert_eq!(Line::classify("cmd_push() {"), Line::Function("cmd_push"));
        assert_eq!(Line::classify("main()"), Line::Function("main"));
        assert_eq!(Line::classify("  my-func () { :; }"), Line::Function("my-func"));
        assert_eq!(Line::classify("function my_func {"), Line::Function("my_func"));
        assert_eq!(Line::classify("function helper() {"), Line::Function("helper"));
        assert_eq!(Line::classify("echo hello"), Line::Other);
        assert_eq!(Line::classify(""), Line::Other);
    }

    #[test]
    fn tag_split() {
        assert_eq!(split_tag("@flag -v Verbose"), Some(("flag", "-v Verbose")));
        assert_eq!(split_tag("  @stdout"), Some(("stdout", "")));
        assert_eq!(split_tag("@exit\t0   ok "), Some(("exit", "0   ok")));
        assert_eq!(split_tag("plain text"), None);
        assert_eq!(split_tag("email me@example.com"), None);
    }
}
