//! CLI wrapper for the just-lite interpreter.
//!
//! Usage:
//!   just-lite <file.js>              # Execute a script
//!   just-lite -e "code"              # Evaluate code and print the last value
//!   just-lite --dump-tree <file.js>  # Print the parse tree
//!   just-lite                        # Start REPL (interactive mode)
//!
//! `--config <file>` may precede any of these.

use just_lite::parser::parse_to_token_tree;
use just_lite::runner::api::{JsRunner, StatementOutcome};
use just_lite::runner::config::EngineConfig;
use just_lite::runner::ds::value::JsValue;
use std::env;
use std::fs;
use std::io::{self, Write};
use std::path::Path;
use std::process;

fn init_tracing() {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    // Only initialize if RUST_LOG is set
    if env::var("RUST_LOG").is_ok() {
        tracing_subscriber::registry()
            .with(fmt::layer().with_writer(io::stderr).with_target(true))
            .with(EnvFilter::from_default_env())
            .init();
    }
}

fn main() {
    init_tracing();

    let mut args: Vec<String> = env::args().skip(1).collect();

    let mut config = EngineConfig::default();
    if args.first().map(String::as_str) == Some("--config") {
        if args.len() < 2 {
            print_usage();
            process::exit(1);
        }
        config = match EngineConfig::load(Path::new(&args[1])) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("{}", e);
                process::exit(1);
            }
        };
        args.drain(..2);
    }

    match args.as_slice() {
        [] => run_repl(config),
        [flag] if flag == "-h" || flag == "--help" => {
            print_usage();
            process::exit(0);
        }
        [flag, code] if flag == "-e" || flag == "--eval" => eval_code(code, config),
        [flag, file] if flag == "--dump-tree" => dump_tree(file),
        [file] => run_file(file, config),
        _ => {
            print_usage();
            process::exit(1);
        }
    }
}

fn print_usage() {
    eprintln!("just-lite - interpreter for a small JavaScript subset");
    eprintln!();
    eprintln!("Usage:");
    eprintln!("  just-lite [--config <file>] <file.js>       Execute a script");
    eprintln!("  just-lite [--config <file>] -e \"code\"       Evaluate code");
    eprintln!("  just-lite --dump-tree <file.js>             Print the parse tree");
    eprintln!("  just-lite [--config <file>]                 Start REPL");
}

fn read_source(filename: &str) -> String {
    match fs::read_to_string(filename) {
        Ok(content) => content,
        Err(e) => {
            eprintln!("Error reading file '{}': {}", filename, e);
            process::exit(1);
        }
    }
}

fn run_file(filename: &str, config: EngineConfig) {
    let source = read_source(filename);
    let mut runner = JsRunner::with_config(config);
    if let Err(e) = runner.run_script(&source) {
        eprintln!("{}", e);
        process::exit(1);
    }
}

fn eval_code(code: &str, config: EngineConfig) {
    let mut runner = JsRunner::with_config(config);
    match runner.run_script(code) {
        Ok(JsValue::Undefined) => {}
        Ok(value) => println!("{}", value),
        Err(e) => {
            eprintln!("{}", e);
            process::exit(1);
        }
    }
}

fn dump_tree(filename: &str) {
    let source = read_source(filename);
    match parse_to_token_tree(&source) {
        Ok(tree) => println!("{}", tree),
        Err(e) => {
            eprintln!("{}", e);
            process::exit(1);
        }
    }
}

fn run_repl(config: EngineConfig) {
    println!("just-lite v{}", env!("CARGO_PKG_VERSION"));
    println!("Type code and press Enter. Type .exit to quit.");
    println!();

    let prompt = config.repl_prompt.clone();
    let echo_undefined = config.echo_undefined;
    let mut runner = JsRunner::with_config(config);

    let stdin = io::stdin();
    let mut stdout = io::stdout();

    loop {
        print!("{}", prompt);
        let _ = stdout.flush();

        let mut input = String::new();
        match stdin.read_line(&mut input) {
            Ok(0) => break, // EOF
            Ok(_) => {}
            Err(e) => {
                eprintln!("Error reading input: {}", e);
                break;
            }
        }

        let input = input.trim();
        if input == ".exit" || input == ".quit" {
            break;
        }
        if input.is_empty() {
            continue;
        }

        for outcome in runner.eval_repl_line(input) {
            match outcome {
                StatementOutcome::Value(JsValue::Undefined) if !echo_undefined => {}
                StatementOutcome::Value(val) => println!("{}", val),
                StatementOutcome::Error(e) => eprintln!("{}", e),
            }
        }
    }

    println!();
}
