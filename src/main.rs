//! SPL front-end command line interface
//!
//! Usage:
//!   splc [OPTIONS] <FILE>
//!
//! Examples:
//!   splc program.spl                  # Check the program, report the first error
//!   splc --emit=tokens program.spl    # Dump the token stream
//!   splc --emit=ast program.spl       # Dump the type-annotated AST
//!   splc --emit=symbols program.spl   # Dump every scope and symbol
//!   splc -vv program.spl              # Log phases and scopes

use std::{fs, path::PathBuf, process, time::Instant};

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use log::{debug, info};
use splc::{analyze_source, display_error, lexer::lexer::tokenize};

/// Parser and semantic analyzer for the SPL teaching language
#[derive(Parser, Debug)]
#[command(name = "splc")]
#[command(version)]
#[command(about = "Parses and checks SPL programs", long_about = None)]
struct Cli {
    /// Source file to check
    #[arg(value_name = "FILE")]
    input: PathBuf,

    /// What to emit on success
    #[arg(long, default_value = "check")]
    emit: EmitKind,

    /// Verbose output (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Only report errors
    #[arg(short, long)]
    quiet: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum EmitKind {
    /// Nothing beyond a success line
    Check,
    /// Token stream, one token per line
    Tokens,
    /// Type-annotated Abstract Syntax Tree
    Ast,
    /// Scopes and their symbols
    Symbols,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level = if cli.quiet {
        log::LevelFilter::Error
    } else {
        match cli.verbose {
            0 => log::LevelFilter::Warn,
            1 => log::LevelFilter::Info,
            2 => log::LevelFilter::Debug,
            _ => log::LevelFilter::Trace,
        }
    };

    env_logger::Builder::from_default_env()
        .filter_level(log_level)
        .format_timestamp(None)
        .init();

    debug!("Input file: {:?}", cli.input);

    let source = fs::read_to_string(&cli.input)
        .with_context(|| format!("Failed to read input file: {:?}", cli.input))?;
    let file_name = cli.input.display().to_string();

    let start = Instant::now();

    if let EmitKind::Tokens = cli.emit {
        match tokenize(&source, Some(file_name.clone())) {
            Ok(tokens) => {
                for token in tokens.iter() {
                    println!("{}", token.debug());
                }
                return Ok(());
            }
            Err(error) => {
                display_error(&error, &source);
                process::exit(1);
            }
        }
    }

    let analysis = match analyze_source(&source, &file_name) {
        Ok(analysis) => analysis,
        Err(error) => {
            display_error(&error, &source);
            process::exit(1);
        }
    };

    info!("Checked {} in {:.2?}", file_name, start.elapsed());

    match cli.emit {
        EmitKind::Check => {
            if !cli.quiet {
                println!("{}: ok", file_name);
            }
        }
        EmitKind::Ast => {
            let mut annotated = 0;
            analysis.program.for_each_expression(&mut |expr| {
                if expr.get_type().is_some() {
                    annotated += 1;
                }
            });
            info!("{} annotated expressions", annotated);
            println!("{:#?}", analysis.program);
        }
        EmitKind::Symbols => print!("{}", analysis.symbols),
        EmitKind::Tokens => {}
    }

    Ok(())
}
