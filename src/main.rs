//! Lispy CLI
//!
//! Main entry point for the `lispy` command.

use clap::{Parser, Subcommand};
use miette::Result;
use std::path::PathBuf;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use lispy::repl::{self, ReplConfig};
use lispy::{Interpreter, SourceFile};

#[derive(Parser)]
#[command(name = "lispy")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "A small Lisp with quoted lists, closures and currying", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the interactive REPL (the default)
    Repl {
        /// Load and save line history in this file
        #[arg(long, value_name = "FILE")]
        history: Option<PathBuf>,
    },

    /// Evaluate every expression in a source file
    Run {
        /// Input file
        #[arg(value_name = "FILE")]
        input: PathBuf,
    },

    /// Evaluate one line and print the result
    Eval {
        /// Expression, read the same way as a REPL line
        #[arg(value_name = "EXPR")]
        expr: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    let default_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)))
        .init();

    if cli.verbose {
        tracing::info!("Verbose mode enabled");
    }

    match cli.command {
        None => repl::run(&ReplConfig::default()),
        Some(Commands::Repl { history }) => repl::run(&ReplConfig {
            history,
            ..ReplConfig::default()
        }),
        Some(Commands::Run { input }) => run(&input),
        Some(Commands::Eval { expr }) => eval(&expr),
    }
}

fn run(input: &std::path::Path) -> Result<()> {
    tracing::info!("Running {:?}", input);

    let source = std::fs::read_to_string(input)
        .map_err(|e| miette::miette!("Failed to read input file: {}", e))?;
    let file = SourceFile::new(input.to_string_lossy().to_string(), source);

    let values = lispy::reader::read_file(&file)?;
    tracing::debug!("Read {} expressions", values.len());

    let mut interpreter = Interpreter::new();
    for value in values {
        let result = interpreter.eval(value);
        // Only print non-unit results
        if !result.is_unit() {
            println!("{}", result);
        }
    }
    Ok(())
}

fn eval(expr: &str) -> Result<()> {
    let mut interpreter = Interpreter::new();
    let result = repl::eval_line(&mut interpreter, expr)?;
    match result {
        lispy::Value::Error(e) => Err(e.into()),
        value => {
            println!("{}", value);
            Ok(())
        }
    }
}
