//! Renderer module: trait-based format dispatch.

pub mod completion;
pub mod help;
pub mod json;
pub mod man;

use crate::error::RenderError;
use crate::model::{Block, Document, Value};
use std::collections::HashMap;
use std::io::Write;
use std::sync::OnceLock;

/// Renders a Document into one output format.
pub trait Renderer: Send + Sync {
    fn render(&self, out: &mut dyn Write, doc: &Document) -> Result<(), RenderError>;
}

/// Format name → renderer lookup table.
#[derive(Default)]
pub struct Registry {
    renderers: HashMap<String, Box<dyn Renderer>>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding the built-in formats.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register("json", json::JsonRenderer);
        registry.register("help", help::HelpRenderer);
        registry.register("man", man::ManRenderer::default());
        registry.register("completion:bash", completion::BashCompletion);
        registry.register("completion:zsh", completion::ZshCompletion);
        registry.register("completion:fish", completion::FishCompletion);
        registry
    }

    /// Register `renderer` under `name`, replacing any previous entry.
    pub fn register(&mut self, name: impl Into<String>, renderer: impl Renderer + 'static) {
        self.renderers.insert(name.into(), Box::new(renderer));
    }

    pub fn get(&self, name: &str) -> Option<&dyn Renderer> {
        self.renderers.get(name).map(|r| r.as_ref())
    }

    /// Registered format names, sorted.
    pub fn formats(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.renderers.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

static REGISTRY: OnceLock<Registry> = OnceLock::new();

/// Process-wide registry, populated with the built-in formats on first use.
pub fn registry() -> &'static Registry {
    REGISTRY.get_or_init(Registry::with_defaults)
}

// -- Shared label formatting --------------------------------------------------

/// `-s, --long`, `-s`, or `    --long`.
pub(crate) fn switch_label(short: Option<&str>, long: Option<&str>) -> String {
    match (short, long) {
        (Some(s), Some(l)) => format!("{s}, {l}"),
        (Some(s), None) => s.to_string(),
        (None, Some(l)) => format!("    {l}"),
        (None, None) => String::new(),
    }
}

/// Switch label followed by the option's value notation.
pub(crate) fn option_label(short: Option<&str>, long: Option<&str>, value: &Value) -> String {
    format!("{} {value}", switch_label(short, long))
}

/// Command block and subcommand blocks, the inputs every format works from.
pub(crate) fn command_parts(doc: &Document) -> (Option<&Block>, Vec<&Block>) {
    (doc.command(), doc.subcommands().collect())
}
