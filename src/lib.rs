//! shedoc: structured documentation for shell scripts.
//!
//! Scripts carry file metadata in `#?/` comments and per-function
//! documentation in `#@/` blocks:
//!
//! ```text
//! #!/usr/bin/env bash
//! #?/name greet
//! #?/version 1.0.0
//!
//! #@/command
//!  # Prints a greeting.
//!  #
//!  # @flag -l | --loud Shout it
//!  # @operand [name=World] Who to greet
//!  ##
//! main() { ... }
//! ```
//!
//! [`parse`] turns a script into a [`Document`]; the [`render`] registry
//! turns a Document into JSON, help text, a man page or completion scripts.

pub mod complete;
pub mod error;
pub mod model;
pub mod parser;
pub mod render;
pub mod tag;
pub mod value;

pub use error::{ParseError, RenderError, TagError, ValueError};
pub use model::{Block, Document, Meta, MetaTag, Value, Visibility, Warning};
pub use parser::{parse, parse_reader, parse_str};
pub use render::{registry, Registry, Renderer};
pub use value::parse_value;
