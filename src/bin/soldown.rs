//! Markdown -> XHTML/HTML4 CLI, grounded on `main.c`'s stdin-to-stdout shape
//! and extended with flag parsing in the idiom of the codebase this crate
//! grew from.

use std::io::{Read, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};

use soldown::render;
use soldown::html4::Html4Renderer;
use soldown::xhtml::XhtmlRenderer;

#[derive(Clone, Copy, Debug, ValueEnum)]
enum OutputFormat {
    Xhtml,
    Html4,
}

/// Render a Markdown file (or stdin) to HTML.
#[derive(Parser, Debug)]
#[command(name = "soldown", version, about)]
struct Cli {
    /// Input file; reads stdin if omitted.
    input: Option<PathBuf>,

    /// Output format.
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Xhtml)]
    format: OutputFormat,
}

fn read_input(path: Option<&PathBuf>) -> Result<String> {
    match path {
        Some(path) => {
            std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))
        }
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("reading stdin")?;
            Ok(buf)
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let input = read_input(cli.input.as_ref())?;

    let output = match cli.format {
        OutputFormat::Xhtml => render(&input, &mut XhtmlRenderer),
        OutputFormat::Html4 => render(&input, &mut Html4Renderer),
    };

    std::io::stdout()
        .write_all(output.as_bytes())
        .context("writing output")?;
    Ok(())
}
