//! OFX CLI tool.
//!
//! Reads an OFX document from a file (or stdin with `-`), parses it, and
//! prints the JSON rendering to stdout or `-o <file>`. The core never
//! touches I/O; everything here is the shim around it.
//!
//! Examples:
//!   ofx statement.ofx               - print compact JSON to stdout
//!   ofx statement.ofx --pretty      - indented JSON
//!   cat statement.ofx | ofx -       - read from stdin
//!   ofx statement.ofx -o out.json   - write to a file

use std::io::{self, Read};

use clap::Parser;
use tracing_subscriber::EnvFilter;

const EXIT_SUCCESS: i32 = 0;
const EXIT_PARSE_ERROR: i32 = 1;
// Usage errors exit with code 2, from clap.
const EXIT_IO_ERROR: i32 = 3;

/// Convert OFX financial documents to JSON.
#[derive(Parser, Debug)]
#[command(name = "ofx", version)]
struct Cli {
    /// Input file path, or '-' for stdin
    input: String,

    /// Output file path ('-' for stdout)
    #[arg(short, long, default_value = "-")]
    output: String,

    /// Pretty-print the JSON output
    #[arg(long)]
    pretty: bool,
}

#[derive(Debug)]
enum CliError {
    /// Parse or value error, reported with source context.
    Parse {
        error: ofx_tree::ParseError,
        /// Normalized source text; error spans refer to it.
        source: String,
        filename: String,
    },
    Io(io::Error),
}

impl CliError {
    fn exit_code(&self) -> i32 {
        match self {
            CliError::Parse { .. } => EXIT_PARSE_ERROR,
            CliError::Io(_) => EXIT_IO_ERROR,
        }
    }
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CliError::Parse { error, .. } => write!(f, "{}", error),
            CliError::Io(err) => write!(f, "{}", err),
        }
    }
}

impl From<io::Error> for CliError {
    fn from(err: io::Error) -> Self {
        CliError::Io(err)
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    match run(&cli) {
        Ok(()) => std::process::exit(EXIT_SUCCESS),
        Err(e) => {
            match &e {
                CliError::Parse {
                    error,
                    source,
                    filename,
                } if error.span().is_some() => {
                    error.write_report(filename, source, io::stderr());
                }
                _ => eprintln!("error: {e}"),
            }
            std::process::exit(e.exit_code());
        }
    }
}

fn run(cli: &Cli) -> Result<(), CliError> {
    let raw = read_input(&cli.input)?;
    // Parse spans refer to the normalized text, so normalize here and keep
    // it for error reports.
    let source = ofx_tree::normalize(&raw).into_owned();
    let filename = if cli.input == "-" {
        "<stdin>".to_string()
    } else {
        cli.input.clone()
    };

    let root = ofx_tree::parse(&source).map_err(|error| CliError::Parse {
        error,
        source: source.clone(),
        filename,
    })?;

    let value = ofx_json::to_value(root.as_ref());
    let output = if cli.pretty {
        serde_json::to_string_pretty(&value).map_err(io::Error::other)?
    } else {
        value.to_string()
    };
    write_output(&cli.output, &output)
}

fn read_input(path: &str) -> Result<String, CliError> {
    if path == "-" {
        let mut buf = String::new();
        io::stdin().read_to_string(&mut buf)?;
        Ok(buf)
    } else {
        Ok(std::fs::read_to_string(path)?)
    }
}

fn write_output(path: &str, output: &str) -> Result<(), CliError> {
    if path == "-" {
        println!("{output}");
    } else {
        std::fs::write(path, output)?;
    }
    Ok(())
}
