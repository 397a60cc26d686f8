//! Interactive read-eval-print loop.

use std::path::PathBuf;

use colored::Colorize;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;

use crate::bytecode::{Compiler, Op, Vm};
use crate::lexer::Scanner;
use crate::parser::Parser;
use crate::JoltError;

const HISTORY_FILE: &str = ".jolt_history";

/// The REPL holds one compiler and one VM for the whole session, so slot
/// assignments and variable state carry over from line to line.
pub struct Repl {
    compiler: Compiler,
    vm: Vm,
    history_file: PathBuf,
}

impl Repl {
    pub fn new() -> Self {
        Self {
            compiler: Compiler::new(),
            vm: Vm::new(),
            history_file: Self::history_path(),
        }
    }

    fn history_path() -> PathBuf {
        if let Some(home) = dirs::home_dir() {
            home.join(HISTORY_FILE)
        } else {
            PathBuf::from(HISTORY_FILE)
        }
    }

    pub fn run(&mut self) {
        println!("jolt {}", env!("CARGO_PKG_VERSION"));
        println!("Type \".help\" for available commands.\n");

        let mut rl = match DefaultEditor::new() {
            Ok(editor) => editor,
            Err(err) => {
                eprintln!("{} {}", "error:".red(), err);
                return;
            }
        };
        let _ = rl.load_history(&self.history_file);

        loop {
            match rl.readline("> ") {
                Ok(line) => {
                    let line = line.trim();
                    if line.is_empty() {
                        continue;
                    }
                    let _ = rl.add_history_entry(line);

                    match line {
                        ".exit" | ".quit" | "exit" | "quit" => break,
                        ".help" => {
                            println!(".help    show this message");
                            println!(".exit    leave the repl");
                            continue;
                        }
                        _ => {}
                    }

                    match self.eval_line(line) {
                        Ok(Some(value)) => println!("{}", value),
                        Ok(None) => println!("undefined"),
                        Err(err) => eprintln!("{} {}", "error:".red(), err),
                    }
                }
                Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => break,
                Err(err) => {
                    eprintln!("{} {}", "error:".red(), err);
                    break;
                }
            }
        }

        let _ = rl.save_history(&self.history_file);
    }

    /// Evaluate one line against the session's compiler and VM state,
    /// keeping the final statement's value for printing.
    fn eval_line(&mut self, line: &str) -> Result<Option<crate::Value>, JoltError> {
        let tokens = Scanner::new(line).scan_tokens()?;
        let program = Parser::new(tokens).parse()?;
        let mut chunk = self.compiler.compile(&program)?;

        if let Some((Op::Pop, offset)) = chunk.last_instruction() {
            chunk.code.truncate(offset);
        }

        self.vm.run(&chunk)?;
        Ok(self.vm.top())
    }
}

impl Default for Repl {
    fn default() -> Self {
        Self::new()
    }
}
