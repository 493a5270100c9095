//! Shedoc parser: line-by-line state machine.
//!
//! Three states: top level, inside a multi-line `#?/` metadata value, and
//! inside a `#@/` documentation block. A line that does not fit the current
//! block finalizes it and is then replayed against the top-level rules, so
//! blocks may end with ` ##`, with the next opener, with code, or with EOF.

pub mod line;

use crate::error::ParseError;
use crate::model::*;
use crate::tag::Tag;
use line::{split_tag, Line};
use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;
use tracing::{debug, trace};

// -- Public API ---------------------------------------------------------------

/// Parse the script at `path`. Fails only if the file cannot be opened or read.
pub fn parse(path: impl AsRef<Path>) -> Result<Document, ParseError> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| ParseError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    let mut doc = parse_reader(file)?;
    doc.path = Some(path.to_string_lossy().to_string());
    Ok(doc)
}

/// Parse a script from any byte stream. Fails only on read errors.
pub fn parse_reader(reader: impl Read) -> Result<Document, ParseError> {
    let mut reader = BufReader::new(reader);
    let mut parser = Parser::default();
    let mut buf = Vec::new();

    loop {
        buf.clear();
        let n = reader.read_until(b'\n', &mut buf).map_err(ParseError::Read)?;
        if n == 0 {
            break;
        }
        let decoded = String::from_utf8_lossy(&buf);
        let text = decoded.as_ref();
        let text = text.strip_suffix('\n').unwrap_or(text);
        let text = text.strip_suffix('\r').unwrap_or(text);
        parser.feed(text);
    }

    Ok(parser.finish())
}

/// Parse an in-memory script.
pub fn parse_str(input: &str) -> Document {
    let mut parser = Parser::default();
    for line in input.lines() {
        parser.feed(line);
    }
    parser.finish()
}

// -- Parser state -------------------------------------------------------------

/// Accumulation state between lines.
#[derive(Debug, Default, PartialEq, Eq)]
pub enum State {
    #[default]
    Top,
    Meta(MetaAccum),
    Doc(DocAccum),
}

/// A multi-line `#?/tag` value being collected.
#[derive(Debug, PartialEq, Eq)]
pub struct MetaAccum {
    pub tag: String,
    pub line: usize,
    pub lines: Vec<String>,
}

/// A `#@/` block being collected.
#[derive(Debug, PartialEq, Eq)]
pub struct DocAccum {
    pub block: Block,
    /// Description lines seen before the first tag.
    pub description: Vec<String>,
    /// Set once the first `@tag` line is seen.
    pub in_tags: bool,
    pub pending: Option<PendingTag>,
}

/// A parsed tag still open to continuation lines.
#[derive(Debug, PartialEq, Eq)]
pub struct PendingTag {
    pub tag: Tag,
    pub continuation: Vec<String>,
}

/// Drives [`State`] over a line stream and owns the document being built.
#[derive(Debug, Default)]
pub struct Parser {
    doc: Document,
    state: State,
    line: usize,
}

impl Parser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current state, for inspection between lines.
    pub fn state(&self) -> &State {
        &self.state
    }

    /// Consume one line (without its terminator).
    pub fn feed(&mut self, text: &str) {
        self.line += 1;
        let state = std::mem::take(&mut self.state);
        self.state = self.step(state, text);
    }

    /// Finalize any open block and return the document.
    pub fn finish(mut self) -> Document {
        let state = std::mem::take(&mut self.state);
        self.close(state);
        self.doc
    }

    fn step(&mut self, state: State, text: &str) -> State {
        let line = Line::classify(text);
        match state {
            State::Top => self.top(line),
            State::Meta(acc) => self.meta(acc, line),
            State::Doc(acc) => self.doc_block(acc, line),
        }
    }

    // -- Transitions ----------------------------------------------------------

    fn top(&mut self, line: Line<'_>) -> State {
        match line {
            Line::Shebang(interpreter) => {
                self.doc.shebang = Some(interpreter.to_string());
                State::Top
            }
            Line::MetaInline { tag, value } => {
                self.set_meta(tag, value.to_string(), self.line);
                State::Top
            }
            Line::MetaOpen { tag } => {
                trace!(line = self.line, tag, "metadata block opened");
                State::Meta(MetaAccum {
                    tag: tag.to_string(),
                    line: self.line,
                    lines: Vec::new(),
                })
            }
            Line::DocOpen { visibility, extra } => {
                let (visibility, name) = block_header(visibility, extra);
                trace!(line = self.line, %visibility, "documentation block opened");
                State::Doc(DocAccum {
                    block: Block::new(visibility, name, self.line),
                    description: Vec::new(),
                    in_tags: false,
                    pending: None,
                })
            }
            Line::Function(name) => {
                self.bind_function(name);
                State::Top
            }
            Line::Close | Line::Continuation(_) | Line::Other => State::Top,
        }
    }

    fn meta(&mut self, mut acc: MetaAccum, line: Line<'_>) -> State {
        match line {
            Line::Close => {
                self.finish_meta(acc);
                State::Top
            }
            Line::Continuation(content) => {
                acc.lines.push(content.to_string());
                State::Meta(acc)
            }
            interrupt => {
                self.finish_meta(acc);
                self.top(interrupt)
            }
        }
    }

    fn doc_block(&mut self, mut acc: DocAccum, line: Line<'_>) -> State {
        let content = match line {
            Line::Close => {
                self.finish_doc(acc);
                return State::Top;
            }
            Line::Continuation(content) => content,
            interrupt => {
                self.finish_doc(acc);
                return self.top(interrupt);
            }
        };

        if let Some((name, text)) = split_tag(content) {
            finish_tag(&mut acc);
            acc.in_tags = true;
            match Tag::parse(name, text, self.line) {
                Ok(tag) => {
                    acc.pending = Some(PendingTag {
                        tag,
                        continuation: Vec::new(),
                    })
                }
                Err(err) => self.warn(self.line, err.to_string()),
            }
        } else if content.trim().is_empty() {
            finish_tag(&mut acc);
        } else if let Some(pending) = acc.pending.as_mut() {
            pending.continuation.push(content.trim().to_string());
        } else if !acc.in_tags {
            acc.description.push(content.to_string());
        }

        State::Doc(acc)
    }

    /// Finalize whatever `state` is accumulating, as on an interrupt.
    fn close(&mut self, state: State) {
        match state {
            State::Top => {}
            State::Meta(acc) => self.finish_meta(acc),
            State::Doc(acc) => self.finish_doc(acc),
        }
    }

    // -- Finalization ---------------------------------------------------------

    fn finish_meta(&mut self, acc: MetaAccum) {
        debug!(line = acc.line, tag = %acc.tag, "metadata block finalized");
        self.set_meta(&acc.tag, acc.lines.join("\n"), acc.line);
    }

    fn finish_doc(&mut self, mut acc: DocAccum) {
        finish_tag(&mut acc);
        let mut block = acc.block;
        block.description = acc.description.join("\n");
        debug!(
            line = block.line,
            visibility = %block.visibility,
            name = block.name.as_deref().unwrap_or(""),
            "documentation block finalized"
        );
        self.doc.blocks.push(block);
    }

    fn set_meta(&mut self, tag: &str, value: String, line: usize) {
        match tag.parse::<MetaTag>() {
            Ok(tag) => self.doc.meta.set(tag, value),
            Err(message) => self.warn(line, message),
        }
    }

    /// Bind to the most recently finalized block unless it already has a function.
    fn bind_function(&mut self, name: &str) {
        if let Some(block) = self.doc.blocks.last_mut() {
            if block.function_name.is_none() {
                trace!(line = self.line, function = name, "function bound to block");
                block.function_name = Some(name.to_string());
            }
        }
    }

    fn warn(&mut self, line: usize, message: String) {
        debug!(line, %message, "parse warning");
        self.doc.warnings.push(Warning { line, message });
    }
}

/// Attach the pending tag, with its continuation text, to the block.
fn finish_tag(acc: &mut DocAccum) {
    if let Some(PendingTag {
        mut tag,
        continuation,
    }) = acc.pending.take()
    {
        if !continuation.is_empty() {
            tag.append_description(&continuation.join(" "));
        }
        tag.attach(&mut acc.block);
    }
}

/// Visibility and name from a `#@/visibility extra` header. Unknown
/// visibilities fall back to public without a warning.
fn block_header(visibility: &str, extra: &str) -> (Visibility, Option<String>) {
    match visibility {
        "command" => (Visibility::Command, None),
        "subcommand" if !extra.is_empty() => (Visibility::Subcommand, Some(extra.to_string())),
        "subcommand" => (Visibility::Subcommand, None),
        "private" => (Visibility::Private, None),
        _ => (Visibility::Public, None),
    }
}
