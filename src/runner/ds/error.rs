use thiserror::Error;

/// Every failure the engine can report. Messages follow the wording a
/// JavaScript console would use.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum JErrorType {
    #[error("SyntaxError: Unexpected token '{0}'")]
    ReservedWordAsIdentifier(String),
    #[error("SyntaxError: Identifier '{0}' has already been declared")]
    IdentifierAlreadyDeclared(String),
    #[error("SyntaxError: {label} at line {line}, column {column}")]
    UnmatchedDelimiter {
        label: String,
        line: usize,
        column: usize,
    },
    #[error("SyntaxError: Unexpected end of input")]
    UnexpectedEndOfInput,
    #[error("SyntaxError: {0}")]
    SyntaxError(String),

    #[error("ReferenceError: {0} is not defined")]
    ReferenceError(String),
    #[error("TypeError: {0} is not a function")]
    IsNotAFunction(String),
    #[error("TypeError: Assignment to constant variable '{0}'")]
    ConstAssignmentError(String),
    #[error("TypeError: {name} expects {expected} argument(s) but {found} were given")]
    ArityError {
        name: String,
        expected: usize,
        found: usize,
    },
    #[error("TypeError: {0}")]
    TypeError(String),
    #[error("RangeError: {0}")]
    RangeError(String),
}

impl JErrorType {
    /// Syntax-level errors are the ones raised before (or instead of) giving a
    /// statement any runtime meaning.
    pub fn is_syntax_error(&self) -> bool {
        matches!(
            self,
            JErrorType::ReservedWordAsIdentifier(_)
                | JErrorType::IdentifierAlreadyDeclared(_)
                | JErrorType::UnmatchedDelimiter { .. }
                | JErrorType::UnexpectedEndOfInput
                | JErrorType::SyntaxError(_)
        )
    }

    pub fn is_semantic_error(&self) -> bool {
        !self.is_syntax_error()
    }
}
