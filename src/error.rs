//! Error types.
//!
//! Only I/O can fail a parse. Everything wrong with the comment content is
//! reported through [`TagError`]/[`ValueError`] and turned into a
//! [`Warning`](crate::model::Warning) by the parser.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Rejections from the value-notation parser.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValueError {
    #[error("invalid value notation: {0:?}")]
    TooShort(String),

    #[error("invalid value notation: {0:?} (must be <...> or [...])")]
    Brackets(String),

    #[error("invalid value notation: {0:?} (empty name)")]
    EmptyName(String),

    #[error("invalid value notation: {0:?} (empty name before ...)")]
    EmptyVariadicName(String),

    #[error("invalid value notation: {0:?} (empty name before =)")]
    EmptyDefaultName(String),

    #[error("invalid value notation: {0:?} (defaults not allowed in required values)")]
    RequiredDefault(String),
}

/// Rejections from a documentation tag parser.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TagError {
    #[error("unknown tag @{0}")]
    Unknown(String),

    #[error("@{tag} requires at least one flag name")]
    MissingFlag { tag: &'static str },

    #[error("@option requires a value notation (e.g., <value> or [value])")]
    MissingValue,

    #[error("@{tag} requires {what}")]
    MissingToken {
        tag: &'static str,
        what: &'static str,
    },

    #[error("@{tag} value: {source}")]
    Value {
        tag: &'static str,
        #[source]
        source: ValueError,
    },
}

/// Hard parse failures. Never raised for malformed comments.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("failed to open {}: {source}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to read input: {0}")]
    Read(#[source] io::Error),
}

/// Shell name outside bash, zsh and fish.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unsupported shell: {0:?} (supported: bash, zsh, fish)")]
pub struct UnsupportedShell(pub String);

/// Renderer failures.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("{format} generation requires #?/name")]
    MissingName { format: &'static str },

    #[error("failed to write output: {0}")]
    Write(#[from] io::Error),

    #[error("failed to encode JSON: {0}")]
    Json(#[from] serde_json::Error),
}
