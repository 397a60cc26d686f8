//! Jolt CLI: run files, evaluate expressions, dump bytecode, or start
//! the REPL.

use std::env;
use std::fs;
use std::process;

use colored::Colorize;

const VERSION: &str = env!("CARGO_PKG_VERSION");

/// CLI command to execute.
enum Command {
    /// Start the REPL
    Repl,
    /// Run a script file
    Run { file: String },
    /// Evaluate a string and print the result
    Eval { code: String },
    /// Print the bytecode listing of a script file
    Dump { file: String },
}

fn main() {
    let args: Vec<String> = env::args().skip(1).collect();

    let command = match parse_args(&args) {
        Ok(command) => command,
        Err(message) => {
            eprintln!("{} {}", "error:".red(), message);
            eprintln!();
            print_usage();
            process::exit(1);
        }
    };

    match command {
        Command::Repl => jolt::repl::Repl::new().run(),
        Command::Run { file } => {
            let source = read_source(&file);
            if let Err(err) = jolt::run(&source) {
                fail(err);
            }
        }
        Command::Eval { code } => match jolt::eval(&code) {
            Ok(Some(value)) => println!("{}", value),
            Ok(None) => println!("undefined"),
            Err(err) => fail(err),
        },
        Command::Dump { file } => {
            let source = read_source(&file);
            match jolt::compile(&source) {
                Ok(chunk) => print!("{}", chunk),
                Err(err) => fail(err),
            }
        }
    }
}

fn parse_args(args: &[String]) -> Result<Command, String> {
    match args.first().map(String::as_str) {
        None => Ok(Command::Repl),
        Some("--help") | Some("-h") => {
            print_usage();
            process::exit(0);
        }
        Some("--version") | Some("-V") => {
            println!("jolt {}", VERSION);
            process::exit(0);
        }
        Some("run") => match args.get(1) {
            Some(file) => Ok(Command::Run { file: file.clone() }),
            None => Err("'run' expects a file".to_string()),
        },
        Some("eval") | Some("-e") => match args.get(1) {
            Some(code) => Ok(Command::Eval { code: code.clone() }),
            None => Err("'eval' expects an expression".to_string()),
        },
        Some("dump") => match args.get(1) {
            Some(file) => Ok(Command::Dump { file: file.clone() }),
            None => Err("'dump' expects a file".to_string()),
        },
        Some(other) => Err(format!("unknown command '{}'", other)),
    }
}

fn print_usage() {
    println!("jolt {}", VERSION);
    println!();
    println!("Usage:");
    println!("  jolt                 start the repl");
    println!("  jolt run <file>      execute a script");
    println!("  jolt eval <code>     evaluate an expression and print it");
    println!("  jolt dump <file>     print the bytecode listing");
    println!("  jolt --version       print the version");
}

fn read_source(file: &str) -> String {
    match fs::read_to_string(file) {
        Ok(source) => source,
        Err(err) => {
            eprintln!("{} failed to read '{}': {}", "error:".red(), file, err);
            process::exit(1);
        }
    }
}

fn fail(err: jolt::JoltError) -> ! {
    eprintln!("{} {}", "error:".red(), err);
    process::exit(1);
}
