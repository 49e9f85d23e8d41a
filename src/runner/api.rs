use tracing::{debug, warn};

use crate::parser::ast::{ProgramData, StatementType};
use crate::parser::parse_to_ast;
use crate::runner::config::EngineConfig;
use crate::runner::ds::error::JErrorType;
use crate::runner::ds::value::JsValue;
use crate::runner::eval::statement::execute_statement;
use crate::runner::eval::types::{EvalContext, ValueResult};
use crate::runner::host::{HostIo, StdHost};

/// What happened to each top-level statement of one REPL line.
#[derive(Debug, Clone, PartialEq)]
pub enum StatementOutcome {
    Value(JsValue),
    Error(JErrorType),
}

/// One interpreter session. Bindings persist from one call to the next.
pub struct JsRunner {
    ctx: EvalContext,
}

impl JsRunner {
    pub fn new() -> Self {
        Self::with_host(Box::new(StdHost::new()), EngineConfig::default())
    }

    pub fn with_config(config: EngineConfig) -> Self {
        Self::with_host(Box::new(StdHost::new()), config)
    }

    pub fn with_host(host: Box<dyn HostIo>, config: EngineConfig) -> Self {
        JsRunner {
            ctx: EvalContext::with_host(host, config),
        }
    }

    pub fn get_binding(&self, name: &str) -> ValueResult {
        self.ctx.get_binding(name)
    }

    /// Runs one top-level statement. On failure the statement is abandoned
    /// and the scope chain is put back to the global scope.
    pub fn run_statement(&mut self, stmt: &StatementType) -> ValueResult {
        match execute_statement(stmt, &mut self.ctx) {
            Ok(completion) => Ok(completion.get_value()),
            Err(e) => {
                warn!(statement = stmt.kind_name(), error = %e, "statement aborted");
                self.ctx.reset_to_global();
                Err(e)
            }
        }
    }

    /// REPL mode: every statement on the line runs even if an earlier one
    /// failed. A line that does not parse yields a single error.
    pub fn eval_repl_line(&mut self, source: &str) -> Vec<StatementOutcome> {
        let program = match parse_to_ast(source) {
            Ok(p) => p,
            Err(e) => {
                warn!(error = %e, "line rejected by parser");
                return vec![StatementOutcome::Error(e)];
            }
        };
        program
            .body
            .iter()
            .map(|stmt| match self.run_statement(stmt) {
                Ok(v) => StatementOutcome::Value(v),
                Err(e) => StatementOutcome::Error(e),
            })
            .collect()
    }

    /// Script mode: stops at the first error. Yields the value of the last
    /// statement.
    pub fn run_program(&mut self, program: &ProgramData) -> ValueResult {
        let mut last = JsValue::Undefined;
        for stmt in &program.body {
            last = self.run_statement(stmt)?;
        }
        Ok(last)
    }

    pub fn run_script(&mut self, source: &str) -> ValueResult {
        let program = parse_to_ast(source)?;
        debug!(statements = program.body.len(), "running script");
        self.run_program(&program)
    }
}

impl Default for JsRunner {
    fn default() -> Self {
        Self::new()
    }
}
