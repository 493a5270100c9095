//! Help renderer: `--help` style plain text.

use crate::error::RenderError;
use crate::model::{first_line, Block, Document};
use crate::render::{command_parts, option_label, switch_label, Renderer};
use std::io::Write;

/// Column where switch descriptions start, after the two-space indent.
const LABEL_WIDTH: usize = 24;

pub struct HelpRenderer;

impl Renderer for HelpRenderer {
    fn render(&self, out: &mut dyn Write, doc: &Document) -> Result<(), RenderError> {
        let meta = &doc.meta;

        if let Some(ref name) = meta.name {
            match meta.description.as_deref() {
                Some(desc) => writeln!(out, "{name} - {}", first_line(desc))?,
                None => writeln!(out, "{name}")?,
            }
            writeln!(out)?;
        }

        if let Some(ref synopsis) = meta.synopsis {
            writeln!(out, "Usage:")?;
            writeln!(out, "  {synopsis}")?;
            writeln!(out)?;
        }

        let (cmd, subcommands) = command_parts(doc);

        if !subcommands.is_empty() {
            writeln!(out, "Commands:")?;
            let rows: Vec<(&str, String)> = subcommands
                .iter()
                .map(|sub| (sub.name.as_deref().unwrap_or(""), command_summary(sub)))
                .collect();
            write_aligned(out, &rows)?;
            writeln!(out)?;
        }

        let Some(cmd) = cmd else {
            return Ok(());
        };

        if !cmd.flags.is_empty() || !cmd.options.is_empty() {
            writeln!(out, "Options:")?;
            for flag in &cmd.flags {
                let label = switch_label(flag.short.as_deref(), flag.long.as_deref());
                write_switch(out, &label, &flag.description)?;
            }
            for opt in &cmd.options {
                let label = option_label(opt.short.as_deref(), opt.long.as_deref(), &opt.value);
                write_switch(out, &label, &opt.description)?;
            }
            writeln!(out)?;
        }

        if !cmd.env.is_empty() {
            writeln!(out, "Environment:")?;
            let rows: Vec<(&str, String)> = cmd
                .env
                .iter()
                .map(|e| (e.name.as_str(), first_line(&e.description).to_string()))
                .collect();
            write_aligned(out, &rows)?;
            writeln!(out)?;
        }

        if !cmd.exit.is_empty() {
            writeln!(out, "Exit Codes:")?;
            let rows: Vec<(&str, String)> = cmd
                .exit
                .iter()
                .map(|e| (e.code.as_str(), e.description.clone()))
                .collect();
            write_aligned(out, &rows)?;
            writeln!(out)?;
        }

        Ok(())
    }
}

/// First description line, prefixed for deprecated subcommands.
fn command_summary(sub: &Block) -> String {
    let desc = first_line(&sub.description);
    match &sub.deprecated {
        Some(_) if !desc.is_empty() => format!("[deprecated] {desc}"),
        Some(dep) => format!("[deprecated] {}", dep.message),
        None => desc.to_string(),
    }
}

/// Two-column rows, the first column padded to its widest entry.
fn write_aligned(out: &mut dyn Write, rows: &[(&str, String)]) -> Result<(), RenderError> {
    let width = rows.iter().map(|(key, _)| key.chars().count()).max().unwrap_or(0);
    for (key, desc) in rows {
        if desc.is_empty() {
            writeln!(out, "  {key}")?;
        } else {
            writeln!(out, "  {key:<width$}  {desc}")?;
        }
    }
    Ok(())
}

fn write_switch(out: &mut dyn Write, label: &str, desc: &str) -> Result<(), RenderError> {
    if desc.is_empty() {
        writeln!(out, "  {label}")?;
    } else {
        writeln!(out, "  {label:<LABEL_WIDTH$}{desc}")?;
    }
    Ok(())
}
