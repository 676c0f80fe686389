//! Sharlox
//!
//! Scanner front end for the Lox scripting language.

mod feedback;
mod frontend;
mod utils;

use std::fs;
use std::path::{Path, PathBuf};
use std::process;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use log::info;

use feedback::ScanFeedback;
use frontend::scanner::{scan, ScanResult};

/// Exit code when the source had lexical errors
const EXIT_LEXICAL_ERROR: i32 = 65;

/// Sharlox scanner
#[derive(Parser, Debug)]
#[command(name = "sharlox")]
#[command(version)]
#[command(about = "Sharlox - tokenize Lox source files")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print the tokens of a source file
    Tokenize {
        /// Input source file
        input: PathBuf,

        /// Output format
        #[arg(long, value_enum, default_value_t = Format::Text)]
        format: Format,
    },
    /// Check a source file for lexical errors
    Check {
        /// Input source file
        input: PathBuf,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum Format {
    /// One `KIND lexeme literal` line per token
    Text,
    /// Structured JSON report
    Json,
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    match run(&cli) {
        Ok(code) => process::exit(code),
        Err(e) => {
            eprintln!("Error: {:#}", e);
            process::exit(1);
        }
    }
}

fn run(cli: &Cli) -> Result<i32> {
    match &cli.command {
        Commands::Tokenize { input, format } => tokenize_file(input, *format),
        Commands::Check { input } => check_file(input),
    }
}

fn read_source(input: &Path) -> Result<String> {
    info!("reading {}", input.display());
    fs::read_to_string(input).with_context(|| format!("could not read {}", input.display()))
}

fn exit_code(result: &ScanResult) -> i32 {
    if result.had_error() {
        EXIT_LEXICAL_ERROR
    } else {
        0
    }
}

fn print_diagnostics(result: &ScanResult) {
    for error in &result.errors {
        eprintln!("{}", error.report());
    }
}

/// Scan a source file and print its tokens
fn tokenize_file(input: &Path, format: Format) -> Result<i32> {
    let source = read_source(input)?;
    let result = scan(&source);

    match format {
        Format::Text => {
            print_diagnostics(&result);
            for token in &result.tokens {
                println!("{}", token);
            }
        }
        Format::Json => {
            let feedback = ScanFeedback::from_result(&result, &input.to_string_lossy());
            let json = feedback.to_json().context("could not serialize scan report")?;
            println!("{}", json);
        }
    }

    Ok(exit_code(&result))
}

/// Check a source file for lexical errors without printing tokens
fn check_file(input: &Path) -> Result<i32> {
    println!("Checking: {}", input.display());

    let source = read_source(input)?;
    let result = scan(&source);
    print_diagnostics(&result);

    if result.had_error() {
        println!("❌ {} lexical error(s)", result.errors.len());
    } else {
        println!("✅ No errors found ({} tokens)", result.tokens.len() - 1);
    }

    Ok(exit_code(&result))
}
