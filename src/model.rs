//! Data model for parsed documentation: format-agnostic.
//!
//! Serializes to the JSON shape consumed by tooling: `meta`, `visibility`
//! and every `line` are always present, everything else is omitted when
//! empty.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Complete parsed document from a single script.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Document {
    /// Source path; `None` for stream input.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    /// Interpreter from the `#!` line.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shebang: Option<String>,
    pub meta: Meta,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub blocks: Vec<Block>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<Warning>,
}

impl Document {
    /// The command block, if any. The last one wins when a script has several.
    pub fn command(&self) -> Option<&Block> {
        self.blocks
            .iter()
            .rev()
            .find(|b| b.visibility == Visibility::Command)
    }

    /// Subcommand blocks in source order.
    pub fn subcommands(&self) -> impl Iterator<Item = &Block> {
        self.blocks
            .iter()
            .filter(|b| b.visibility == Visibility::Subcommand)
    }
}

/// File-level metadata from `#?/` tags.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Meta {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub synopsis: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub examples: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub section: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub license: Option<String>,
}

impl Meta {
    fn slot(&mut self, tag: MetaTag) -> &mut Option<String> {
        match tag {
            MetaTag::Name => &mut self.name,
            MetaTag::Version => &mut self.version,
            MetaTag::Synopsis => &mut self.synopsis,
            MetaTag::Description => &mut self.description,
            MetaTag::Examples => &mut self.examples,
            MetaTag::Section => &mut self.section,
            MetaTag::Author => &mut self.author,
            MetaTag::License => &mut self.license,
        }
    }

    /// Overwrite a field. An empty value clears it.
    pub fn set(&mut self, tag: MetaTag, value: String) {
        *self.slot(tag) = if value.is_empty() { None } else { Some(value) };
    }

    pub fn get(&self, tag: MetaTag) -> Option<&str> {
        let value = match tag {
            MetaTag::Name => &self.name,
            MetaTag::Version => &self.version,
            MetaTag::Synopsis => &self.synopsis,
            MetaTag::Description => &self.description,
            MetaTag::Examples => &self.examples,
            MetaTag::Section => &self.section,
            MetaTag::Author => &self.author,
            MetaTag::License => &self.license,
        };
        value.as_deref()
    }
}

/// The recognized `#?/` tag names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetaTag {
    Name,
    Version,
    Synopsis,
    Description,
    Examples,
    Section,
    Author,
    License,
}

impl FromStr for MetaTag {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "name" => MetaTag::Name,
            "version" => MetaTag::Version,
            "synopsis" => MetaTag::Synopsis,
            "description" => MetaTag::Description,
            "examples" => MetaTag::Examples,
            "section" => MetaTag::Section,
            "author" => MetaTag::Author,
            "license" => MetaTag::License,
            _ => return Err(format!("unknown shedoc tag: #?/{s}")),
        })
    }
}

/// Access level of a documentation block.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    Command,
    Subcommand,
    #[default]
    Public,
    Private,
}

impl Visibility {
    pub fn as_str(self) -> &'static str {
        match self {
            Visibility::Command => "command",
            Visibility::Subcommand => "subcommand",
            Visibility::Public => "public",
            Visibility::Private => "private",
        }
    }
}

impl fmt::Display for Visibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single `#@/` documentation block.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Block {
    pub visibility: Visibility,
    /// Subcommand token; only set for subcommand blocks.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub description: String,
    /// Function declared right after the block, bound at most once.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub function_name: Option<String>,
    pub line: usize,

    // Inputs
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub flags: Vec<Flag>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<OptionEntry>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub operands: Vec<Operand>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub env: Vec<Env>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub reads: Vec<Reads>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stdin: Option<Stdin>,

    // Outputs
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub exit: Vec<Exit>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stdout: Option<Stdout>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stderr: Option<Stderr>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub sets: Vec<Sets>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub writes: Vec<Writes>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub deprecated: Option<Deprecated>,
}

impl Block {
    pub fn new(visibility: Visibility, name: Option<String>, line: usize) -> Self {
        Block {
            visibility,
            name,
            line,
            ..Default::default()
        }
    }

    /// Every short and long spelling of the block's flags, then its options.
    pub fn switches(&self) -> Vec<(&str, &str)> {
        let flags = self
            .flags
            .iter()
            .map(|f| (f.short.as_deref(), f.long.as_deref(), f.description.as_str()));
        let options = self
            .options
            .iter()
            .map(|o| (o.short.as_deref(), o.long.as_deref(), o.description.as_str()));
        flags
            .chain(options)
            .flat_map(|(short, long, desc)| [short, long].into_iter().flatten().map(move |s| (s, desc)))
            .collect()
    }

    /// First description line, or the deprecation notice for deprecated blocks.
    pub fn summary(&self) -> String {
        match &self.deprecated {
            Some(dep) => format!("[deprecated] {}", dep.message),
            None => first_line(&self.description).to_string(),
        }
    }
}

/// Parsed value notation: `<name>`, `[name]`, `[name=default]`, `<name...>`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Value {
    pub name: String,
    pub required: bool,
    /// `Some("")` for `[name=]`; left out of JSON like any empty field.
    #[serde(skip_serializing_if = "is_blank")]
    pub default: Option<String>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub variadic: bool,
}

/// `@flag -s | --long description`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Flag {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub short: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub long: Option<String>,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub description: String,
    pub line: usize,
}

/// `@option -f | --format <value> description`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OptionEntry {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub short: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub long: Option<String>,
    pub value: Value,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub description: String,
    pub line: usize,
}

/// `@operand <name> description`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Operand {
    pub value: Value,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub description: String,
    pub line: usize,
}

/// `@env VAR description`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Env {
    pub name: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub description: String,
    pub line: usize,
}

/// `@reads path description`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Reads {
    pub path: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub description: String,
    pub line: usize,
}

/// `@stdin description`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Stdin {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub description: String,
    pub line: usize,
}

/// `@exit code description`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Exit {
    pub code: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub description: String,
    pub line: usize,
}

/// `@stdout description`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Stdout {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub description: String,
    pub line: usize,
}

/// `@stderr description`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Stderr {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub description: String,
    pub line: usize,
}

/// `@sets VAR description`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Sets {
    pub name: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub description: String,
    pub line: usize,
}

/// `@writes path description`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Writes {
    pub path: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub description: String,
    pub line: usize,
}

/// `@deprecated [message]`. Present with an empty message is still deprecated.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Deprecated {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub message: String,
    pub line: usize,
}

/// Non-fatal parse issue.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Warning {
    pub line: usize,
    pub message: String,
}

fn is_blank(s: &Option<String>) -> bool {
    s.as_deref().map_or(true, str::is_empty)
}

/// First line of a possibly multi-line string.
pub fn first_line(s: &str) -> &str {
    s.split('\n').next().unwrap_or(s)
}
