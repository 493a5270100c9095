//! Dynamic completion: candidates for a partially typed command line.
//!
//! The shell hands over the line and cursor (`COMP_LINE`/`COMP_POINT`), the
//! script is parsed on the spot and the matching subcommands and switches
//! are printed back one per line.

use crate::error::UnsupportedShell;
use crate::model::{Block, Document};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
}

impl FromStr for Shell {
    type Err = UnsupportedShell;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "bash" => Ok(Shell::Bash),
            "zsh" => Ok(Shell::Zsh),
            "fish" => Ok(Shell::Fish),
            _ => Err(UnsupportedShell(s.to_string())),
        }
    }
}

impl fmt::Display for Shell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Shell::Bash => "bash",
            Shell::Zsh => "zsh",
            Shell::Fish => "fish",
        })
    }
}

/// A completion word with its description.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub word: String,
    pub description: String,
}

impl Candidate {
    fn new(word: &str, description: impl Into<String>) -> Self {
        Candidate {
            word: word.to_string(),
            description: description.into(),
        }
    }

    /// Output line for `shell`: the bare word, or `word<TAB>description`
    /// for fish.
    pub fn line(&self, shell: Shell) -> String {
        match shell {
            Shell::Fish => format!("{}\t{}", self.word, self.description.replace('\t', " ")),
            Shell::Bash | Shell::Zsh => self.word.clone(),
        }
    }
}

/// Candidates for `comp_line` with the cursor at byte offset `comp_point`.
///
/// Text after the cursor is ignored. Nothing is offered while the command
/// name itself is being typed or when the previous word is an option that
/// expects a value.
pub fn candidates(doc: &Document, comp_line: &str, comp_point: usize) -> Vec<Candidate> {
    let line = truncate(comp_line, comp_point);
    let mut words: Vec<&str> = line.split_whitespace().collect();
    let at_new_word = line.ends_with(char::is_whitespace);

    let current = if at_new_word {
        ""
    } else if words.len() > 1 {
        words.pop().unwrap_or("")
    } else {
        return Vec::new();
    };

    // Command name.
    if !words.is_empty() {
        words.remove(0);
    }

    let cmd = doc.command();
    let subcommands: Vec<&Block> = doc.subcommands().collect();
    if cmd.is_none() && subcommands.is_empty() {
        return Vec::new();
    }

    let selected = words
        .iter()
        .find_map(|w| subcommands.iter().copied().find(|s| s.name.as_deref() == Some(*w)));

    if let Some(prev) = words.last() {
        let takes_value = [cmd, selected].into_iter().flatten().any(|b| {
            b.options
                .iter()
                .any(|o| o.short.as_deref() == Some(*prev) || o.long.as_deref() == Some(*prev))
        });
        if takes_value {
            return Vec::new();
        }
    }

    let mut out = Vec::new();
    match selected {
        Some(sub) => out.extend(switch_candidates(sub)),
        None => out.extend(subcommands.iter().map(|sub| {
            Candidate::new(sub.name.as_deref().unwrap_or(""), sub.summary())
        })),
    }
    if let Some(cmd) = cmd {
        out.extend(switch_candidates(cmd));
    }

    out.retain(|c| c.word.starts_with(current));
    out
}

fn switch_candidates(block: &Block) -> impl Iterator<Item = Candidate> + '_ {
    block
        .switches()
        .into_iter()
        .map(|(word, desc)| Candidate::new(word, desc))
}

/// Cut at `point`, backing off to the nearest char boundary.
fn truncate(line: &str, point: usize) -> &str {
    if point >= line.len() {
        return line;
    }
    let mut end = point;
    while !line.is_char_boundary(end) {
        end -= 1;
    }
    &line[..end]
}

/// Shell snippet that registers `shedoc complete <abs_path>` as the
/// completion handler for `cmd_name`.
pub fn setup_script(shell: Shell, abs_path: &str, cmd_name: &str) -> String {
    match shell {
        Shell::Bash => format!("complete -C \"shedoc complete {abs_path}\" {cmd_name}\n"),
        Shell::Zsh => {
            let func = format!("_{}_shedoc", cmd_name.replace('-', "_"));
            format!(
                "{func}() {{
  local COMP_LINE COMP_POINT
  COMP_LINE=\"${{words[*]}}\"
  COMP_POINT=${{#COMP_LINE}}
  local completions
  completions=($(COMP_LINE=\"$COMP_LINE\" COMP_POINT=\"$COMP_POINT\" shedoc complete {abs_path}))
  compadd -a completions
}}
compdef {func} {cmd_name}
"
            )
        }
        Shell::Fish => format!(
            "complete -c {cmd_name} -a '(COMP_LINE=(commandline) COMP_POINT=(commandline -C) shedoc complete --shell fish {abs_path})'\n"
        ),
    }
}
