//! sqlform CLI
//!
//! Parses one SELECT query and reports whether it is well formed. Optional
//! modes print the tokens, the tree, the tree as JSON or the normalized SQL.

use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::Context;
use clap::{ArgAction, Parser};
use tracing::{Level, debug, info};
use tracing_subscriber::FmtSubscriber;

use sqlform_core::{ParseError, TokenStream, dump, parse};

/// Validate and format SQL SELECT queries.
#[derive(Parser, Debug)]
#[command(name = "sqlform")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Query file; standard input when absent or `-`.
    file: Option<PathBuf>,

    /// Decode input that is not UTF-8 as Latin-1, one character per byte.
    #[arg(long = "force-8bit", env = "SQLFORM_FORCE_8BIT")]
    force_8bit: bool,

    /// Print the token stream before parsing.
    #[arg(long)]
    tokens: bool,

    /// Print the parsed tree, one node per line.
    #[arg(long, conflicts_with = "json")]
    dump: bool,

    /// Print the parsed tree as JSON.
    #[arg(long)]
    json: bool,

    /// Print the query as normalized SQL.
    #[arg(long)]
    format: bool,

    /// Enable verbose output (-v debug, -vv trace).
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

impl Cli {
    const fn log_level(&self) -> Level {
        match self.verbose {
            0 => Level::WARN,
            1 => Level::DEBUG,
            _ => Level::TRACE,
        }
    }
}

fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    // Setup logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(cli.log_level())
        .with_target(false)
        .without_time()
        .with_writer(io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let source = read_input(cli.file.as_deref(), cli.force_8bit)?;
    debug!(bytes = source.len(), force_8bit = cli.force_8bit, "read input");

    if cli.tokens {
        if let Err(err) = print_tokens(&source) {
            report(&source, &err);
            return Ok(ExitCode::FAILURE);
        }
    }

    let ast = match parse(&source) {
        Ok(ast) => ast,
        Err(err) => {
            report(&source, &err);
            return Ok(ExitCode::FAILURE);
        }
    };
    info!(
        nodes = ast.node_count(),
        max_pushback = ast.max_pushback(),
        "query is valid"
    );

    if cli.dump {
        print!("{}", dump(&ast));
    }
    if cli.json {
        println!("{}", serde_json::to_string_pretty(&ast)?);
    }
    if cli.format {
        println!("{ast}");
    }

    Ok(ExitCode::SUCCESS)
}

/// Reads the whole query from `path`, or from standard input.
fn read_input(path: Option<&Path>, force_8bit: bool) -> anyhow::Result<String> {
    let bytes = match path {
        Some(path) if path != Path::new("-") => {
            fs::read(path).with_context(|| format!("failed to read {}", path.display()))?
        }
        _ => {
            let mut bytes = Vec::new();
            io::stdin()
                .read_to_end(&mut bytes)
                .context("failed to read standard input")?;
            bytes
        }
    };
    decode(bytes, force_8bit)
}

/// UTF-8, or Latin-1 in 8-bit mode when the bytes are not UTF-8.
fn decode(bytes: Vec<u8>, force_8bit: bool) -> anyhow::Result<String> {
    match String::from_utf8(bytes) {
        Ok(text) => Ok(text),
        Err(err) if force_8bit => Ok(err.into_bytes().into_iter().map(char::from).collect()),
        Err(err) => Err(err).context("input is not valid UTF-8 (try --force-8bit)"),
    }
}

fn print_tokens(source: &str) -> Result<(), ParseError> {
    let mut stream = TokenStream::new(source);
    loop {
        let token = stream.next_token()?;
        println!(
            "{}:{}\t{:?}\t{}",
            token.position.line, token.position.column, token.kind, token.text
        );
        if token.is_eof() {
            return Ok(());
        }
    }
}

/// Writes a parse error with the offending line and a caret under the
/// token.
fn report(source: &str, err: &ParseError) {
    eprintln!("error: {err}");
    let line = err.position.line_text(source);
    if !line.is_empty() {
        let column = usize::try_from(err.position.column).unwrap_or(1);
        eprintln!("  | {line}");
        eprintln!("  | {:>column$}", "^");
    }
}
