//! Man page renderer: troff `man` macros.

use crate::error::RenderError;
use crate::model::{first_line, Document};
use crate::render::{command_parts, option_label, switch_label, Renderer};
use std::io::Write;

#[derive(Debug, Clone, Default)]
pub struct ManRenderer {
    /// `.TH` date; today's local date when unset.
    date: Option<String>,
}

impl ManRenderer {
    /// Renderer stamping pages with a fixed date instead of today's.
    pub fn with_date(date: impl Into<String>) -> Self {
        ManRenderer {
            date: Some(date.into()),
        }
    }

    fn date(&self) -> String {
        match self.date {
            Some(ref date) => date.clone(),
            None => chrono::Local::now().format("%Y-%m-%d").to_string(),
        }
    }
}

impl Renderer for ManRenderer {
    fn render(&self, out: &mut dyn Write, doc: &Document) -> Result<(), RenderError> {
        let meta = &doc.meta;
        let name = meta.name.as_deref().unwrap_or("UNKNOWN");
        let section = meta.section.as_deref().unwrap_or("1");

        writeln!(
            out,
            ".TH {} {} {} {}",
            man_escape(&name.to_uppercase()),
            man_escape(section),
            quoted(&self.date()),
            quoted(meta.version.as_deref().unwrap_or(""))
        )?;

        writeln!(out, ".SH NAME")?;
        match meta.description.as_deref() {
            Some(desc) => writeln!(out, "{} \\- {}", man_escape(name), man_escape(first_line(desc)))?,
            None => writeln!(out, "{}", man_escape(name))?,
        }

        if let Some(ref synopsis) = meta.synopsis {
            writeln!(out, ".SH SYNOPSIS")?;
            writeln!(out, ".B {}", man_escape(synopsis))?;
        }

        if let Some(ref desc) = meta.description {
            writeln!(out, ".SH DESCRIPTION")?;
            writeln!(out, "{}", man_escape(desc))?;
        }

        let (cmd, subcommands) = command_parts(doc);

        if let Some(cmd) = cmd.filter(|c| !c.flags.is_empty() || !c.options.is_empty()) {
            writeln!(out, ".SH OPTIONS")?;
            for flag in &cmd.flags {
                let label = switch_label(flag.short.as_deref(), flag.long.as_deref());
                write_entry(out, &label, &flag.description)?;
            }
            for opt in &cmd.options {
                let label = option_label(opt.short.as_deref(), opt.long.as_deref(), &opt.value);
                write_entry(out, &label, &opt.description)?;
            }
        }

        if !subcommands.is_empty() {
            writeln!(out, ".SH COMMANDS")?;
            for sub in &subcommands {
                writeln!(out, ".TP\n.B {}", man_escape(sub.name.as_deref().unwrap_or("")))?;
                if let Some(ref dep) = sub.deprecated {
                    let message = if dep.message.is_empty() {
                        "This command is deprecated."
                    } else {
                        dep.message.as_str()
                    };
                    writeln!(out, "[deprecated] {}", man_escape(message))?;
                } else if !sub.description.is_empty() {
                    writeln!(out, "{}", man_escape(&sub.description))?;
                }

                for flag in &sub.flags {
                    let label = switch_label(flag.short.as_deref(), flag.long.as_deref());
                    writeln!(out, ".RS")?;
                    write_entry(out, &label, &flag.description)?;
                    writeln!(out, ".RE")?;
                }
                for opt in &sub.options {
                    let label = option_label(opt.short.as_deref(), opt.long.as_deref(), &opt.value);
                    writeln!(out, ".RS")?;
                    write_entry(out, &label, &opt.description)?;
                    writeln!(out, ".RE")?;
                }
            }
        }

        if let Some(cmd) = cmd {
            if !cmd.env.is_empty() {
                writeln!(out, ".SH ENVIRONMENT")?;
                for env in &cmd.env {
                    write_entry(out, &env.name, &env.description)?;
                }
            }

            let files: Vec<(&str, &str)> = cmd
                .reads
                .iter()
                .map(|r| (r.path.as_str(), r.description.as_str()))
                .chain(cmd.writes.iter().map(|w| (w.path.as_str(), w.description.as_str())))
                .collect();
            if !files.is_empty() {
                writeln!(out, ".SH FILES")?;
                for (path, desc) in files {
                    write_entry(out, path, desc)?;
                }
            }

            if !cmd.exit.is_empty() {
                writeln!(out, ".SH EXIT STATUS")?;
                for exit in &cmd.exit {
                    write_entry(out, &exit.code, &exit.description)?;
                }
            }
        }

        if let Some(ref examples) = meta.examples {
            writeln!(out, ".SH EXAMPLES")?;
            for line in examples.split('\n') {
                writeln!(out, ".PP")?;
                writeln!(out, ".B {}", man_escape(line))?;
            }
        }

        if let Some(ref author) = meta.author {
            writeln!(out, ".SH AUTHOR")?;
            writeln!(out, "{}", man_escape(author))?;
        }

        Ok(())
    }
}

/// `.TP` tagged paragraph: bold tag, then the description if any.
fn write_entry(out: &mut dyn Write, tag: &str, desc: &str) -> Result<(), RenderError> {
    writeln!(out, ".TP\n.B {}", man_escape(tag))?;
    if !desc.is_empty() {
        writeln!(out, "{}", man_escape(desc))?;
    }
    Ok(())
}

/// Quoted macro argument. Only `\` and `"` are escaped; hyphens stay literal.
fn quoted(s: &str) -> String {
    format!("\"{}\"", s.replace('\\', "\\\\").replace('"', "\\(dq"))
}

/// Escape text for troff: backslashes, hyphens, and a leading `.` or `'`
/// that would otherwise start a request.
fn man_escape(s: &str) -> String {
    s.split('\n')
        .map(|line| {
            let escaped = line.replace('\\', "\\\\").replace('-', "\\-");
            let trimmed = escaped.trim_start();
            if trimmed.starts_with('.') || trimmed.starts_with('\'') {
                let (prefix, rest) = escaped.split_at(escaped.len() - trimmed.len());
                format!("{prefix}\\&{rest}")
            } else {
                escaped
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}
