//! Core types for the evaluation engine.

use crate::runner::config::EngineConfig;
use crate::runner::ds::error::JErrorType;
use crate::runner::ds::scope::{Environment, GLOBAL_SCOPE_ID};
use crate::runner::ds::value::JsValue;
use crate::runner::host::{HostIo, StdHost};

/// Completion record type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompletionType {
    /// Execution continues with the next statement.
    Normal,
    /// A `return` is unwinding to the enclosing call.
    Return,
}

/// Every statement evaluation returns a completion record.
#[derive(Debug, Clone, PartialEq)]
pub struct Completion {
    pub completion_type: CompletionType,
    pub value: Option<JsValue>,
}

impl Completion {
    pub fn normal() -> Self {
        Completion {
            completion_type: CompletionType::Normal,
            value: None,
        }
    }

    pub fn normal_with_value(value: JsValue) -> Self {
        Completion {
            completion_type: CompletionType::Normal,
            value: Some(value),
        }
    }

    pub fn return_value(value: JsValue) -> Self {
        Completion {
            completion_type: CompletionType::Return,
            value: Some(value),
        }
    }

    pub fn is_return(&self) -> bool {
        self.completion_type == CompletionType::Return
    }

    /// Get the value, or undefined if none.
    pub fn get_value(&self) -> JsValue {
        self.value.clone().unwrap_or(JsValue::Undefined)
    }
}

/// Result type for statement evaluation.
pub type EvalResult = Result<Completion, JErrorType>;

/// Result type for expression evaluation.
pub type ValueResult = Result<JsValue, JErrorType>;

/// Everything one session threads through evaluation: the scope chain, the
/// console and the limits.
pub struct EvalContext {
    pub env: Environment,
    pub config: EngineConfig,
    host: Box<dyn HostIo>,
    call_depth: usize,
}

impl EvalContext {
    pub fn new() -> Self {
        Self::with_host(Box::new(StdHost::new()), EngineConfig::default())
    }

    pub fn with_host(host: Box<dyn HostIo>, config: EngineConfig) -> Self {
        EvalContext {
            env: Environment::new(),
            config,
            host,
            call_depth: 0,
        }
    }

    pub fn get_binding(&self, name: &str) -> ValueResult {
        self.env.lookup(name)
    }

    pub fn call_depth(&self) -> usize {
        self.call_depth
    }

    pub(crate) fn host_mut(&mut self) -> &mut dyn HostIo {
        self.host.as_mut()
    }

    pub(crate) fn enter_call(&mut self) -> Result<(), JErrorType> {
        if self.call_depth >= self.config.max_call_depth {
            return Err(JErrorType::RangeError(
                "Maximum call stack size exceeded".to_string(),
            ));
        }
        self.call_depth += 1;
        Ok(())
    }

    pub(crate) fn exit_call(&mut self) {
        self.call_depth = self.call_depth.saturating_sub(1);
    }

    /// Drops whatever an abandoned top-level statement left on the scope
    /// stack.
    pub(crate) fn reset_to_global(&mut self) {
        self.env.unwind_to(GLOBAL_SCOPE_ID);
        self.call_depth = 0;
    }
}

impl Default for EvalContext {
    fn default() -> Self {
        Self::new()
    }
}
