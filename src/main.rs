//! shedoc: parse `#?/` and `#@/` documentation in shell scripts.
//!
//! - `shedoc deploy.sh` prints the parsed document as JSON
//! - `shedoc -t man deploy.sh` renders a man page (also `help`, `completion:*`)
//! - `shedoc complete deploy.sh` answers tab completion for the script itself

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use shedoc::complete::{self, Shell};
use shedoc::{Document, MetaTag};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "shedoc",
    version,
    about = "Parse and output shell script documentation",
    args_conflicts_with_subcommands = true,
    subcommand_negates_reqs = true
)]
struct Cli {
    /// Input scripts (glob patterns supported). Use - for stdin.
    #[arg(required = true)]
    files: Vec<String>,

    /// Output format: json, help, man, completion:bash, completion:zsh, completion:fish
    #[arg(short = 't', long, default_value = "json", conflicts_with = "get")]
    to: String,

    /// Print a single #?/ tag value
    #[arg(short = 'g', long)]
    get: Option<String>,

    /// Write output to a file instead of stdout
    #[arg(short = 'o', long)]
    output: Option<PathBuf>,

    /// Include warnings in the rendered output
    #[arg(short = 'w', long)]
    warnings: bool,

    /// Do not print warnings on stderr
    #[arg(short = 'q', long)]
    quiet: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Dynamic shell completion for a shedoc-annotated script
    Complete {
        /// Annotated script
        file: PathBuf,

        /// Handler output format (bash, zsh, fish)
        #[arg(long, default_value = "bash", conflicts_with = "setup")]
        shell: String,

        /// Print shell registration code instead (bash, zsh, fish)
        #[arg(long)]
        setup: Option<String>,
    },
}

fn main() -> Result<()> {
    init_logging();
    let cli = Cli::parse();

    match cli.command {
        Some(Command::Complete { ref file, ref shell, ref setup }) => match setup {
            Some(setup) => complete_setup(file, setup),
            None => complete_handler(file, shell),
        },
        None => run(&cli),
    }
}

/// Diagnostics on stderr, `RUST_LOG` overriding the default `warn`.
fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

fn run(cli: &Cli) -> Result<()> {
    let mut docs = parse_inputs(&cli.files)?;

    if !cli.quiet {
        let stderr = io::stderr();
        let mut err = stderr.lock();
        for doc in &docs {
            let source = doc.path.as_deref().unwrap_or("<stdin>");
            for warning in &doc.warnings {
                writeln!(err, "{source}:{}: warning: {}", warning.line, warning.message)?;
            }
        }
    }

    if !cli.warnings {
        for doc in &mut docs {
            doc.warnings.clear();
        }
    }

    // Validate before touching the output file.
    if let Some(ref tag) = cli.get {
        let Ok(tag) = tag.parse::<MetaTag>() else {
            bail!("unknown tag: {tag:?}");
        };
        return write_output(cli.output.as_deref(), |out| write_tags(out, &docs, tag));
    }

    let registry = shedoc::registry();
    let Some(renderer) = registry.get(&cli.to) else {
        bail!(
            "unknown format: {:?}\navailable formats: {}",
            cli.to,
            registry.formats().join(", ")
        );
    };

    if cli.to != "json" && docs.len() > 1 {
        bail!("format {:?} supports a single file; got {}", cli.to, docs.len());
    }

    write_output(cli.output.as_deref(), |out| {
        for doc in &docs {
            renderer
                .render(out, doc)
                .with_context(|| format!("failed to render {}", cli.to))?;
        }
        Ok(())
    })
}

/// Run `f` against stdout or a freshly created output file.
fn write_output(path: Option<&Path>, f: impl FnOnce(&mut dyn Write) -> Result<()>) -> Result<()> {
    match path {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("failed to create output file: {}", path.display()))?;
            let mut out = BufWriter::new(file);
            f(&mut out)?;
            out.flush()
                .with_context(|| format!("failed to write {}", path.display()))
        }
        None => {
            let stdout = io::stdout();
            let mut out = stdout.lock();
            f(&mut out)?;
            out.flush().context("failed to write stdout")
        }
    }
}

/// One line per document with a non-empty value.
fn write_tags(out: &mut dyn Write, docs: &[Document], tag: MetaTag) -> Result<()> {
    for doc in docs {
        if let Some(value) = doc.meta.get(tag) {
            writeln!(out, "{value}")?;
        }
    }
    Ok(())
}

fn parse_inputs(args: &[String]) -> Result<Vec<Document>> {
    let mut docs = Vec::new();
    for input in expand_globs(args)? {
        if input == Path::new("-") {
            let doc = shedoc::parse_reader(io::stdin().lock()).context("failed to parse stdin")?;
            docs.push(doc);
            continue;
        }
        let doc = shedoc::parse(&input)
            .with_context(|| format!("failed to parse {}", input.display()))?;
        debug!(path = %input.display(), blocks = doc.blocks.len(), "parsed");
        docs.push(doc);
    }
    Ok(docs)
}

/// Expand glob patterns, keeping argument order. Matches of one pattern are
/// sorted; a pattern matching nothing is kept literally so opening it fails
/// with a clear error.
fn expand_globs(patterns: &[String]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for pattern in patterns {
        let path = Path::new(pattern);
        if pattern == "-" || path.is_file() {
            files.push(path.to_path_buf());
            continue;
        }
        let mut matches: Vec<_> = glob::glob(pattern)
            .with_context(|| format!("invalid glob pattern: {}", pattern))?
            .filter_map(|r| r.ok())
            .filter(|p| p.is_file())
            .collect();
        if matches.is_empty() {
            files.push(path.to_path_buf());
            continue;
        }
        matches.sort();
        files.extend(matches);
    }
    Ok(files)
}

// -- complete -----------------------------------------------------------------

fn complete_setup(file: &Path, shell: &str) -> Result<()> {
    let shell: Shell = shell.parse()?;
    let doc = shedoc::parse(file).with_context(|| format!("failed to parse {}", file.display()))?;
    let abs = std::path::absolute(file)
        .with_context(|| format!("failed to resolve absolute path: {}", file.display()))?;
    let cmd_name = match doc.meta.name {
        Some(ref name) => name.clone(),
        None => file
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_default(),
    };

    print!("{}", complete::setup_script(shell, &abs.to_string_lossy(), &cmd_name));
    Ok(())
}

/// Completion never fails loudly: missing context or an unreadable script
/// prints nothing.
fn complete_handler(file: &Path, shell: &str) -> Result<()> {
    let shell: Shell = shell.parse()?;
    let comp_line = std::env::var("COMP_LINE").unwrap_or_default();
    if comp_line.is_empty() {
        return Ok(());
    }
    let comp_point = std::env::var("COMP_POINT")
        .ok()
        .and_then(|p| p.trim().parse::<usize>().ok())
        .unwrap_or(comp_line.len());

    let doc = match shedoc::parse(file) {
        Ok(doc) => doc,
        Err(err) => {
            debug!(%err, "completion skipped");
            return Ok(());
        }
    };

    let stdout = io::stdout();
    let mut out = stdout.lock();
    for candidate in complete::candidates(&doc, &comp_line, comp_point) {
        writeln!(out, "{}", candidate.line(shell))?;
    }
    Ok(())
}
