//! # just-lite - a tree-walking interpreter for a small JavaScript subset
//!
//! The supported language covers `var`/`let`/`const`, numbers, strings,
//! booleans, `undefined`, arrays, template literals, `if`/`else`, `while`,
//! ternaries, named functions, `console.log` and `prompt`. Coercions follow
//! JavaScript: `"5" - 2` is `3`, `"5" + 2` is `"52"`, `true + 1` is `2`.
//!
//! Calls see a snapshot of the caller's bindings: a function can read
//! everything visible at the call site, but nothing it writes survives the
//! call. Only the returned value flows back.
//!
//! ## Quick Start
//!
//! ### Parsing
//!
//! ```
//! use just_lite::parser::JsParser;
//!
//! let code = "let x = 5 + 3;";
//! let ast = JsParser::parse_to_ast_from_str(code).unwrap();
//! println!("Parsed {} statements", ast.body.len());
//! ```
//!
//! ### Running a script
//!
//! ```
//! use just_lite::runner::api::JsRunner;
//! use just_lite::runner::config::EngineConfig;
//! use just_lite::runner::ds::value::JsValue;
//! use just_lite::runner::host::BufferedHost;
//!
//! let host = BufferedHost::new();
//! let output = host.output_handle();
//! let mut runner = JsRunner::with_host(Box::new(host), EngineConfig::default());
//!
//! runner
//!     .run_script("function add(x, y) { return x + y; } let s = add(2, 3); console.log(`s = ${s}`);")
//!     .unwrap();
//!
//! assert_eq!(runner.get_binding("s").unwrap(), JsValue::Number(5.0));
//! assert_eq!(output.borrow()[0], "s = 5");
//! ```
//!
//! ### REPL mode
//!
//! Each line is a batch of top-level statements. A failing statement is
//! reported and the session carries on with the next one.
//!
//! ```
//! use just_lite::runner::api::{JsRunner, StatementOutcome};
//! use just_lite::runner::ds::value::JsValue;
//!
//! let mut runner = JsRunner::new();
//! let outcomes = runner.eval_repl_line("let a = 1; b; a += 2;");
//! assert!(matches!(outcomes[1], StatementOutcome::Error(_)));
//! assert_eq!(outcomes[2], StatementOutcome::Value(JsValue::Number(3.0)));
//! ```
//!
//! ## Architecture
//!
//! - **[`parser`]** - pest grammar and AST types
//! - **[`runner`]** - Interpreter
//!   - **[`runner::ds`]** - Values, coercions, scope chain, errors
//!   - **[`runner::eval`]** - Expression evaluation, statements, calls
//!   - **[`runner::host`]** - Console I/O seen by scripts
//!   - **[`runner::api`]** - Session entry points for scripts and the REPL
//!   - **[`runner::config`]** - Engine limits and REPL settings

#[macro_use]
extern crate lazy_static;

pub mod parser;
pub mod runner;
mod stack;
