//! Markdown -> manpage CLI, grounded on `mkd2man.c`'s flag set and
//! title/date defaulting behavior: title falls back to the input
//! filename (uppercased), section defaults to 1, date falls back to the
//! input file's modification time (or "now" for stdin), and stdin
//! without an explicit `--title` is rejected.

use std::io::{Read, Write};
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use chrono::{DateTime, Local};
use clap::Parser;

use soldown::man::ManRenderer;
use soldown::render;

/// Render a Markdown file (or stdin) to manpage (mdoc) output.
#[derive(Parser, Debug)]
#[command(name = "soldown-man", version, about)]
struct Cli {
    /// Input file; reads stdin if omitted (in which case --title is required).
    input: Option<PathBuf>,

    /// Manpage date (default: the input file's modification time, or now for stdin).
    #[arg(short, long)]
    date: Option<String>,

    /// Manpage section number (default: 1).
    #[arg(short, long, default_value_t = 1)]
    section: u32,

    /// Manpage title (default: the input filename, uppercased).
    #[arg(short, long)]
    title: Option<String>,
}

fn default_title(input: &PathBuf) -> String {
    input
        .file_stem()
        .map(|stem| stem.to_string_lossy().to_uppercase())
        .unwrap_or_default()
}

fn default_date(input: Option<&PathBuf>) -> String {
    let timestamp = input
        .and_then(|path| std::fs::metadata(path).ok())
        .and_then(|metadata| metadata.modified().ok())
        .map(DateTime::<Local>::from)
        .unwrap_or_else(Local::now);
    timestamp.format("%B %d, %Y").to_string()
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.input.is_none() && cli.title.is_none() {
        bail!("When reading from stdin the title must be specified with --title");
    }

    let title = match cli.title {
        Some(title) => title,
        None => default_title(cli.input.as_ref().expect("checked above")),
    };
    let date = cli.date.unwrap_or_else(|| default_date(cli.input.as_ref()));

    let input = match &cli.input {
        Some(path) => {
            std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?
        }
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("reading stdin")?;
            buf
        }
    };

    let mut renderer = ManRenderer {
        title,
        date,
        section: cli.section,
    };
    let output = render(&input, &mut renderer);

    std::io::stdout()
        .write_all(output.as_bytes())
        .context("writing output")?;
    Ok(())
}
