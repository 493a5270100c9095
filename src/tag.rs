//! `@tag` parsers for documentation blocks.
//!
//! Every parser consumes a structured prefix from the tag's text and keeps
//! the trimmed remainder as the description.

use crate::error::TagError;
use crate::model::*;
use crate::value::parse_value;

/// A parsed documentation tag, pending attachment to its block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Tag {
    Flag(Flag),
    Option(OptionEntry),
    Operand(Operand),
    Env(Env),
    Reads(Reads),
    Stdin(Stdin),
    Exit(Exit),
    Stdout(Stdout),
    Stderr(Stderr),
    Sets(Sets),
    Writes(Writes),
    Deprecated(Deprecated),
}

impl Tag {
    /// Parse the text following `@name` on a tag line.
    pub fn parse(name: &str, text: &str, line: usize) -> Result<Tag, TagError> {
        let text = text.trim();
        Ok(match name {
            "flag" => Tag::Flag(parse_flag(text, line)?),
            "option" => Tag::Option(parse_option(text, line)?),
            "operand" => Tag::Operand(parse_operand(text, line)?),
            "env" => {
                let (name, description) = leading_token("env", "a variable name", text)?;
                Tag::Env(Env { name, description, line })
            }
            "reads" => {
                let (path, description) = leading_token("reads", "a path", text)?;
                Tag::Reads(Reads { path, description, line })
            }
            "stdin" => Tag::Stdin(Stdin { description: text.to_string(), line }),
            "exit" => {
                let (code, description) = leading_token("exit", "an exit code", text)?;
                Tag::Exit(Exit { code, description, line })
            }
            "stdout" => Tag::Stdout(Stdout { description: text.to_string(), line }),
            "stderr" => Tag::Stderr(Stderr { description: text.to_string(), line }),
            "sets" => {
                let (name, description) = leading_token("sets", "a variable name", text)?;
                Tag::Sets(Sets { name, description, line })
            }
            "writes" => {
                let (path, description) = leading_token("writes", "a path", text)?;
                Tag::Writes(Writes { path, description, line })
            }
            "deprecated" => Tag::Deprecated(Deprecated { message: text.to_string(), line }),
            _ => return Err(TagError::Unknown(name.to_string())),
        })
    }

    /// Append continuation text to the description (or deprecation message).
    pub fn append_description(&mut self, text: &str) {
        let field = match self {
            Tag::Flag(t) => &mut t.description,
            Tag::Option(t) => &mut t.description,
            Tag::Operand(t) => &mut t.description,
            Tag::Env(t) => &mut t.description,
            Tag::Reads(t) => &mut t.description,
            Tag::Stdin(t) => &mut t.description,
            Tag::Exit(t) => &mut t.description,
            Tag::Stdout(t) => &mut t.description,
            Tag::Stderr(t) => &mut t.description,
            Tag::Sets(t) => &mut t.description,
            Tag::Writes(t) => &mut t.description,
            Tag::Deprecated(t) => &mut t.message,
        };
        if !field.is_empty() {
            field.push(' ');
        }
        field.push_str(text);
    }

    /// Move the tag into its block. Singular tags overwrite, the rest append.
    pub fn attach(self, block: &mut Block) {
        match self {
            Tag::Flag(t) => block.flags.push(t),
            Tag::Option(t) => block.options.push(t),
            Tag::Operand(t) => block.operands.push(t),
            Tag::Env(t) => block.env.push(t),
            Tag::Reads(t) => block.reads.push(t),
            Tag::Stdin(t) => block.stdin = Some(t),
            Tag::Exit(t) => block.exit.push(t),
            Tag::Stdout(t) => block.stdout = Some(t),
            Tag::Stderr(t) => block.stderr = Some(t),
            Tag::Sets(t) => block.sets.push(t),
            Tag::Writes(t) => block.writes.push(t),
            Tag::Deprecated(t) => block.deprecated = Some(t),
        }
    }
}

fn parse_flag(text: &str, line: usize) -> Result<Flag, TagError> {
    let (short, long, rest) = consume_flags(text);
    if short.is_none() && long.is_none() {
        return Err(TagError::MissingFlag { tag: "flag" });
    }
    Ok(Flag {
        short,
        long,
        description: rest.trim().to_string(),
        line,
    })
}

fn parse_option(text: &str, line: usize) -> Result<OptionEntry, TagError> {
    let (short, long, rest) = consume_flags(text);
    if short.is_none() && long.is_none() {
        return Err(TagError::MissingFlag { tag: "option" });
    }

    let (token, rest) = split_first_token(rest);
    if token.is_empty() {
        return Err(TagError::MissingValue);
    }
    let value = parse_value(token).map_err(|source| TagError::Value { tag: "option", source })?;

    Ok(OptionEntry {
        short,
        long,
        value,
        description: rest.trim().to_string(),
        line,
    })
}

fn parse_operand(text: &str, line: usize) -> Result<Operand, TagError> {
    if text.is_empty() {
        return Err(TagError::MissingToken {
            tag: "operand",
            what: "a value notation",
        });
    }
    let (token, rest) = split_first_token(text);
    let value = parse_value(token).map_err(|source| TagError::Value { tag: "operand", source })?;
    Ok(Operand {
        value,
        description: rest.trim().to_string(),
        line,
    })
}

/// Mandatory leading token plus description, shared by env/sets/reads/writes/exit.
fn leading_token(
    tag: &'static str,
    what: &'static str,
    text: &str,
) -> Result<(String, String), TagError> {
    let (token, rest) = split_first_token(text);
    if token.is_empty() {
        return Err(TagError::MissingToken { tag, what });
    }
    Ok((token.to_string(), rest.trim().to_string()))
}

/// Consume `-s`, `--long` or `-s | --long` from the front of `text`.
///
/// Stops at the first token that is not a flag spelling, or after a
/// spelling not followed by a `|` separator.
fn consume_flags(text: &str) -> (Option<String>, Option<String>, &str) {
    let mut short = None;
    let mut long = None;
    let mut text = text.trim();

    while !text.is_empty() {
        if text.starts_with("--") {
            let (name, rest) = split_first_token(text);
            long = Some(name.to_string());
            text = rest.trim();
        } else if text.starts_with('-') {
            let (name, rest) = split_first_token(text);
            short = Some(name.to_string());
            text = rest.trim();
        } else {
            break;
        }

        match text.strip_prefix('|') {
            Some(rest) => text = rest.trim(),
            None => break,
        }
    }

    (short, long, text)
}

/// Split off the first space- or tab-delimited token.
fn split_first_token(s: &str) -> (&str, &str) {
    let s = s.trim();
    match s.find([' ', '\t']) {
        Some(idx) => (&s[..idx], &s[idx + 1..]),
        None => (s, ""),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flag(short: Option<&str>, long: Option<&str>, description: &str) -> Flag {
        Flag {
            short: short.map(str::to_string),
            long: long.map(str::to_string),
            description: description.to_string(),
            line: 1,
        }
    }

    fn parse(name: &str, text: &str) -> Result<Tag, TagError> {
        Tag::parse(name, text, 1)
    }

    #[test]
    fn flag_spellings() {
        let cases = [
            ("-v", flag(Some("-v"), None, "")),
            ("--verbose", flag(None, Some("--verbose"), "")),
            ("-v | --verbose", flag(Some("-v"), Some("--verbose"), "")),
            (
                "-v | --verbose Enable verbose output",
                flag(Some("-v"), Some("--verbose"), "Enable verbose output"),
            ),
            ("-v Enable verbose output", flag(Some("-v"), None, "Enable verbose output")),
            (
                "--dry-run Preview changes without deploying",
                flag(None, Some("--dry-run"), "Preview changes without deploying"),
            ),
            ("--verbose | -v Both", flag(Some("-v"), Some("--verbose"), "Both")),
            ("  -q  |  --quiet   Silence  ", flag(Some("-q"), Some("--quiet"), "Silence")),
        ];
        for (input, want) in cases {
            assert_eq!(parse("flag", input), Ok(Tag::Flag(want)), "input {input:?}");
        }
    }

    #[test]
    fn flag_requires_a_spelling() {
        assert_eq!(parse("flag", ""), Err(TagError::MissingFlag { tag: "flag" }));
        assert_eq!(parse("flag", "verbose mode"), Err(TagError::MissingFlag { tag: "flag" }));
    }

    #[test]
    fn flag_without_separator_absorbs_into_description() {
        let Ok(Tag::Flag(f)) = parse("flag", "-v --verbose Loud") else {
            panic!("expected flag");
        };
        assert_eq!(f.short.as_deref(), Some("-v"));
        assert_eq!(f.long, None);
        assert_eq!(f.description, "--verbose Loud");
    }

    #[test]
    fn option_with_required_value() {
        let Ok(Tag::Option(o)) = parse("option", "-f | --format <type> Output format") else {
            panic!("expected option");
        };
        assert_eq!(o.short.as_deref(), Some("-f"));
        assert_eq!(o.long.as_deref(), Some("--format"));
        assert_eq!(o.value.name, "type");
        assert!(o.value.required);
        assert_eq!(o.description, "Output format");
    }

    #[test]
    fn option_with_default() {
        let want = OptionEntry {
            short: None,
            long: Some("--format".into()),
            value: Value {
                name: "type".into(),
                required: false,
                default: Some("json".into()),
                variadic: false,
            },
            description: "Output format".into(),
            line: 1,
        };
        assert_eq!(parse("option", "--format [type=json] Output format"), Ok(Tag::Option(want)));
    }

    #[test]
    fn option_failures() {
        assert_eq!(parse("option", ""), Err(TagError::MissingFlag { tag: "option" }));
        assert_eq!(parse("option", "--format"), Err(TagError::MissingValue));
        assert!(matches!(
            parse("option", "--format type Output"),
            Err(TagError::Value { tag: "option", .. })
        ));
    }

    #[test]
    fn operand() {
        let Ok(Tag::Operand(o)) = parse("operand", "[name=World] Name to greet") else {
            panic!("expected operand");
        };
        assert_eq!(o.value.default.as_deref(), Some("World"));
        assert_eq!(o.description, "Name to greet");

        let Ok(Tag::Operand(o)) = parse("operand", "<files...>") else {
            panic!("expected operand");
        };
        assert!(o.value.variadic);
        assert_eq!(o.description, "");
    }

    #[test]
    fn operand_failures() {
        assert_eq!(
            parse("operand", ""),
            Err(TagError::MissingToken { tag: "operand", what: "a value notation" })
        );
        let err = parse("operand", "<name] Bad").unwrap_err();
        assert!(err.to_string().starts_with("@operand value: invalid value notation"));
    }

    #[test]
    fn token_tags() {
        assert_eq!(
            parse("env", "DEPLOY_TOKEN Auth token"),
            Ok(Tag::Env(Env {
                name: "DEPLOY_TOKEN".into(),
                description: "Auth token".into(),
                line: 1
            }))
        );
        assert_eq!(
            parse("exit", "64\tUsage error"),
            Ok(Tag::Exit(Exit {
                code: "64".into(),
                description: "Usage error".into(),
                line: 1
            }))
        );
        assert_eq!(
            parse("reads", "~/.deployrc"),
            Ok(Tag::Reads(Reads {
                path: "~/.deployrc".into(),
                description: String::new(),
                line: 1
            }))
        );
        let Ok(Tag::Exit(e)) = parse("exit", ">0 Failure") else {
            panic!("expected exit");
        };
        assert_eq!(e.code, ">0");
    }

    #[test]
    fn token_tags_require_a_token() {
        for (name, what) in [
            ("env", "a variable name"),
            ("sets", "a variable name"),
            ("reads", "a path"),
            ("writes", "a path"),
            ("exit", "an exit code"),
        ] {
            let err = parse(name, "   ").unwrap_err();
            assert_eq!(err.to_string(), format!("@{name} requires {what}"));
        }
    }

    #[test]
    fn free_text_tags_may_be_empty() {
        assert_eq!(parse("stdout", ""), Ok(Tag::Stdout(Stdout { description: String::new(), line: 1 })));
        assert_eq!(
            parse("deprecated", ""),
            Ok(Tag::Deprecated(Deprecated { message: String::new(), line: 1 }))
        );
        assert_eq!(
            parse("stdin", "  Reads data  "),
            Ok(Tag::Stdin(Stdin { description: "Reads data".into(), line: 1 }))
        );
    }

    #[test]
    fn unknown_tag() {
        let err = parse("bogustag", "x").unwrap_err();
        assert_eq!(err, TagError::Unknown("bogustag".into()));
        assert_eq!(err.to_string(), "unknown tag @bogustag");
    }

    #[test]
    fn append_description_joins_with_space() {
        let mut tag = parse("env", "VAR").unwrap();
        tag.append_description("first");
        tag.append_description("second");
        let Tag::Env(env) = tag else { panic!("expected env") };
        assert_eq!(env.description, "first second");

        let mut tag = parse("deprecated", "Old.").unwrap();
        tag.append_description("Use new.");
        let Tag::Deprecated(dep) = tag else { panic!("expected deprecated") };
        assert_eq!(dep.message, "Old. Use new.");
    }

    #[test]
    fn attach_overwrites_singular_and_appends_collections() {
        let mut block = Block::default();
        parse("stdout", "first").unwrap().attach(&mut block);
        parse("stdout", "second").unwrap().attach(&mut block);
        parse("exit", "0 ok").unwrap().attach(&mut block);
        parse("exit", "1 fail").unwrap().attach(&mut block);

        assert_eq!(block.stdout.map(|s| s.description).as_deref(), Some("second"));
        let codes: Vec<_> = block.exit.iter().map(|e| e.code.as_str()).collect();
        assert_eq!(codes, ["0", "1"]);
    }
}
