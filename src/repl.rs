//! Interactive read-eval-print loop

use std::path::PathBuf;

use miette::{Result, miette};
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;

use crate::diagnostics::ReadError;
use crate::interp::{Interpreter, Value};
use crate::reader;

/// REPL settings, built from the command line
#[derive(Debug, Clone)]
pub struct ReplConfig {
    pub prompt: String,
    /// File to load history from and save it to on exit
    pub history: Option<PathBuf>,
}

impl Default for ReplConfig {
    fn default() -> Self {
        Self {
            prompt: "lispy> ".to_string(),
            history: None,
        }
    }
}

/// Read one input line as a call and evaluate it
pub fn eval_line(interpreter: &mut Interpreter, line: &str) -> Result<Value, ReadError> {
    let value = reader::read_line(line)?;
    Ok(interpreter.eval(value))
}

/// Run the REPL until `:quit` or end of input
pub fn run(config: &ReplConfig) -> Result<()> {
    println!("Lispy Version {}", crate::VERSION);
    println!("Type :help for help, :quit to exit");
    println!();

    let mut editor =
        DefaultEditor::new().map_err(|e| miette!("Failed to start line editor: {}", e))?;
    if let Some(path) = &config.history {
        // A missing history file is normal on first run
        if editor.load_history(path).is_err() {
            tracing::debug!("no history loaded from {:?}", path);
        }
    }

    let mut interpreter = Interpreter::new();

    loop {
        let line = match editor.readline(&config.prompt) {
            Ok(line) => line,
            Err(ReadlineError::Interrupted) => continue,
            Err(ReadlineError::Eof) => break,
            Err(e) => return Err(miette!("Failed to read input: {}", e)),
        };

        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        let _ = editor.add_history_entry(trimmed);

        match trimmed {
            ":quit" | ":q" => break,
            ":help" | ":h" => print_help(),
            ":env" => {
                for name in interpreter.env().global().names() {
                    println!("  {}", name);
                }
            }
            _ => match eval_line(&mut interpreter, trimmed) {
                Ok(value) => println!("{}", value),
                Err(e) => eprintln!("{:?}", miette::Report::new(e)),
            },
        }
    }

    if let Some(path) = &config.history {
        editor
            .save_history(path)
            .map_err(|e| miette!("Failed to save history to {}: {}", path.display(), e))?;
    }

    println!("Goodbye!");
    Ok(())
}

fn print_help() {
    println!("Commands:");
    println!("  :help, :h    Show this help");
    println!("  :quit, :q    Exit the REPL");
    println!("  :env         List global definitions");
    println!();
    println!("Examples:");
    println!("  + 1 2");
    println!("  def {{x}} 5");
    println!("  (lambda {{x y}} {{+ x y}}) 1 2");
    println!();
}
