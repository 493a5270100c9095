//! Static shell completion scripts (bash, zsh, fish).

use crate::error::RenderError;
use crate::model::{Block, Document, Flag, OptionEntry};
use crate::render::{command_parts, Renderer};
use std::io::Write;

pub struct BashCompletion;
pub struct ZshCompletion;
pub struct FishCompletion;

fn require_name<'a>(doc: &'a Document, format: &'static str) -> Result<&'a str, RenderError> {
    doc.meta
        .name
        .as_deref()
        .ok_or(RenderError::MissingName { format })
}

fn func_name(cmd_name: &str) -> String {
    format!("_{}", cmd_name.replace('-', "_"))
}

fn sub_name(sub: &Block) -> &str {
    sub.name.as_deref().unwrap_or("")
}

// -- Bash ---------------------------------------------------------------------

impl Renderer for BashCompletion {
    fn render(&self, out: &mut dyn Write, doc: &Document) -> Result<(), RenderError> {
        let cmd_name = require_name(doc, "completion")?;
        let func_name = func_name(cmd_name);
        let (cmd, subcommands) = command_parts(doc);

        writeln!(out, "# bash completion for {cmd_name}")?;
        writeln!(out, "{func_name}() {{")?;
        writeln!(out, "  local cur prev words cword")?;
        writeln!(out, "  _init_completion || return")?;
        writeln!(out)?;

        let global: Vec<&str> = cmd
            .map(|c| c.switches().into_iter().map(|(word, _)| word).collect())
            .unwrap_or_default();

        if !subcommands.is_empty() {
            let names: Vec<&str> = subcommands.iter().map(|s| sub_name(s)).collect();
            writeln!(out, "  local commands=\"{}\"", names.join(" "))?;
            writeln!(out)?;

            writeln!(out, "  # Complete subcommand-specific flags")?;
            writeln!(out, "  local i cmd")?;
            writeln!(out, "  for ((i=1; i < cword; i++)); do")?;
            writeln!(out, "    case \"${{words[i]}}\" in")?;
            for sub in &subcommands {
                let words: Vec<&str> = sub.switches().into_iter().map(|(word, _)| word).collect();
                if words.is_empty() {
                    continue;
                }
                writeln!(out, "      {})", sub_name(sub))?;
                writeln!(
                    out,
                    "        COMPREPLY=($(compgen -W \"{}\" -- \"$cur\"))",
                    words.join(" ")
                )?;
                writeln!(out, "        return")?;
                writeln!(out, "        ;;")?;
            }
            writeln!(out, "    esac")?;
            writeln!(out, "  done")?;
            writeln!(out)?;

            let all: Vec<&str> = names.iter().chain(global.iter()).copied().collect();
            writeln!(out, "  COMPREPLY=($(compgen -W \"{}\" -- \"$cur\"))", all.join(" "))?;
        } else if !global.is_empty() {
            writeln!(out, "  COMPREPLY=($(compgen -W \"{}\" -- \"$cur\"))", global.join(" "))?;
        }

        writeln!(out, "}}")?;
        writeln!(out)?;
        writeln!(out, "complete -F {func_name} {cmd_name}")?;
        Ok(())
    }
}

// -- Zsh ----------------------------------------------------------------------

impl Renderer for ZshCompletion {
    fn render(&self, out: &mut dyn Write, doc: &Document) -> Result<(), RenderError> {
        let cmd_name = require_name(doc, "completion")?;
        let func_name = func_name(cmd_name);
        let (cmd, subcommands) = command_parts(doc);

        writeln!(out, "#compdef {cmd_name}")?;
        writeln!(out)?;
        writeln!(out, "{func_name}() {{")?;

        if subcommands.is_empty() {
            let args = cmd.map(zsh_args).unwrap_or_default();
            write_zsh_arguments(out, "  ", &args)?;
        } else {
            writeln!(out, "  local -a global_args")?;
            writeln!(out, "  global_args=(")?;
            for arg in cmd.map(zsh_args).unwrap_or_default() {
                writeln!(out, "    {arg}")?;
            }
            writeln!(out, "    '1:command:->commands'")?;
            writeln!(out, "    '*::arg:->args'")?;
            writeln!(out, "  )")?;
            writeln!(out)?;
            writeln!(out, "  _arguments -s $global_args")?;
            writeln!(out)?;
            writeln!(out, "  case $state in")?;
            writeln!(out, "    commands)")?;
            writeln!(out, "      local -a commands")?;
            writeln!(out, "      commands=(")?;
            for sub in &subcommands {
                let desc = sh_quote(&sub.summary());
                writeln!(out, "        '{}:{desc}'", sub_name(sub))?;
            }
            writeln!(out, "      )")?;
            writeln!(out, "      _describe 'command' commands")?;
            writeln!(out, "      ;;")?;
            writeln!(out, "    args)")?;
            writeln!(out, "      case $words[1] in")?;
            for sub in &subcommands {
                let args = zsh_args(sub);
                if args.is_empty() {
                    continue;
                }
                writeln!(out, "        {})", sub_name(sub))?;
                write_zsh_arguments(out, "          ", &args)?;
                writeln!(out, "          ;;")?;
            }
            writeln!(out, "      esac")?;
            writeln!(out, "      ;;")?;
            writeln!(out, "  esac")?;
        }

        writeln!(out, "}}")?;
        writeln!(out)?;
        writeln!(out, "{func_name}")?;
        Ok(())
    }
}

/// `_arguments -s` with one spec per continuation line.
fn write_zsh_arguments(out: &mut dyn Write, indent: &str, args: &[String]) -> Result<(), RenderError> {
    write!(out, "{indent}_arguments -s")?;
    for arg in args {
        write!(out, " \\\n{indent}  {arg}")?;
    }
    writeln!(out)?;
    Ok(())
}

/// `_arguments` specs for a block's flags, then its options.
fn zsh_args(block: &Block) -> Vec<String> {
    let flags = block.flags.iter().filter_map(zsh_flag);
    let options = block.options.iter().filter_map(zsh_option);
    flags.chain(options).collect()
}

fn zsh_flag(flag: &Flag) -> Option<String> {
    let spec = zsh_switch(flag.short.as_deref(), flag.long.as_deref())?;
    Some(format!("{spec}'[{}]'", zsh_quote(&flag.description)))
}

fn zsh_option(opt: &OptionEntry) -> Option<String> {
    let spec = zsh_switch(opt.short.as_deref(), opt.long.as_deref())?;
    Some(format!(
        "{spec}'[{}]:{}:'",
        zsh_quote(&opt.description),
        opt.value.name
    ))
}

/// Exclusion group plus brace expansion when both spellings exist.
fn zsh_switch(short: Option<&str>, long: Option<&str>) -> Option<String> {
    match (short, long) {
        (Some(s), Some(l)) => Some(format!("'({s} {l})'{{{s},{l}}}")),
        (Some(one), None) | (None, Some(one)) => Some(one.to_string()),
        (None, None) => None,
    }
}

/// Escape for a single-quoted shell word.
fn sh_quote(s: &str) -> String {
    s.replace('\'', "'\\''")
}

/// Escape for the `[...]` description of an `_arguments` spec.
fn zsh_quote(s: &str) -> String {
    sh_quote(s).replace('[', "\\[").replace(']', "\\]")
}

// -- Fish ---------------------------------------------------------------------

impl Renderer for FishCompletion {
    fn render(&self, out: &mut dyn Write, doc: &Document) -> Result<(), RenderError> {
        let cmd_name = require_name(doc, "completion")?;
        let (cmd, subcommands) = command_parts(doc);
        let has_subcommands = !subcommands.is_empty();

        writeln!(out, "# fish completion for {cmd_name}")?;
        writeln!(out)?;

        if let Some(cmd) = cmd {
            let condition = has_subcommands.then_some("__fish_use_subcommand");
            write_fish_block(out, cmd_name, cmd, condition)?;
        }

        if has_subcommands {
            writeln!(out)?;
            writeln!(out, "# Subcommands")?;
            for sub in &subcommands {
                write!(
                    out,
                    "complete -c {cmd_name} -n '__fish_use_subcommand' -a {}",
                    sub_name(sub)
                )?;
                let desc = sub.summary();
                if !desc.is_empty() {
                    write!(out, " -d '{}'", fish_escape(&desc))?;
                }
                writeln!(out)?;
            }

            for sub in &subcommands {
                if sub.flags.is_empty() && sub.options.is_empty() {
                    continue;
                }
                writeln!(out)?;
                writeln!(out, "# {} subcommand", sub_name(sub))?;
                let condition = format!("__fish_seen_subcommand_from {}", sub_name(sub));
                write_fish_block(out, cmd_name, sub, Some(&condition))?;
            }
        }

        writeln!(out)?;
        Ok(())
    }
}

fn write_fish_block(
    out: &mut dyn Write,
    cmd_name: &str,
    block: &Block,
    condition: Option<&str>,
) -> Result<(), RenderError> {
    for flag in &block.flags {
        let spec = FishSpec {
            short: flag.short.as_deref(),
            long: flag.long.as_deref(),
            requires_arg: false,
            desc: &flag.description,
        };
        spec.write(out, cmd_name, condition)?;
    }
    for opt in &block.options {
        let spec = FishSpec {
            short: opt.short.as_deref(),
            long: opt.long.as_deref(),
            requires_arg: true,
            desc: &opt.description,
        };
        spec.write(out, cmd_name, condition)?;
    }
    Ok(())
}

struct FishSpec<'a> {
    short: Option<&'a str>,
    long: Option<&'a str>,
    requires_arg: bool,
    desc: &'a str,
}

impl FishSpec<'_> {
    fn write(&self, out: &mut dyn Write, cmd_name: &str, condition: Option<&str>) -> Result<(), RenderError> {
        write!(out, "complete -c {cmd_name}")?;
        if let Some(condition) = condition {
            write!(out, " -n '{condition}'")?;
        }
        if let Some(short) = self.short {
            write!(out, " -s {}", short.trim_start_matches('-'))?;
        }
        if let Some(long) = self.long {
            write!(out, " -l {}", long.trim_start_matches('-'))?;
        }
        if self.requires_arg {
            write!(out, " -r")?;
        }
        if !self.desc.is_empty() {
            write!(out, " -d '{}'", fish_escape(self.desc))?;
        }
        writeln!(out)?;
        Ok(())
    }
}

fn fish_escape(s: &str) -> String {
    s.replace('\\', "\\\\").replace('\'', "\\'")
}
