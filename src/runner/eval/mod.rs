//! Evaluation module for executing the AST.
//!
//! Expressions produce values, statements produce completion records, and
//! calls run function bodies in their own frame.

pub mod expression;
pub mod function;
pub mod statement;
pub mod types;

pub use types::{Completion, CompletionType, EvalContext, EvalResult, ValueResult};

/// Deep script recursion is bounded by the call depth limit, not by the
/// native stack.
pub(crate) use crate::stack::ensure_sufficient_stack;
