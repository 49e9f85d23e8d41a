//! Stack safety for the recursive parts of the crate.
//!
//! The AST builder and the evaluator recurse once per level of nesting in the
//! source. Both grow the stack on demand instead of overflowing it.

/// Bytes of stack that must remain before recursing further.
const RED_ZONE: usize = 100 * 1024;

/// Size of each new stack segment.
const STACK_PER_RECURSION: usize = 1024 * 1024;

/// Stack handed to one run of the generated pest parser, which cannot grow
/// its own.
const PARSE_STACK_SIZE: usize = 64 * 1024 * 1024;

/// Runs `f`, first moving to a fresh stack segment if the current one is
/// nearly exhausted.
#[inline]
pub(crate) fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    stacker::maybe_grow(RED_ZONE, STACK_PER_RECURSION, f)
}

/// Runs `f` on a dedicated stack large enough for the deepest nesting the
/// parser accepts.
pub(crate) fn with_parse_stack<R>(f: impl FnOnce() -> R) -> R {
    stacker::maybe_grow(PARSE_STACK_SIZE, PARSE_STACK_SIZE, f)
}
