use std::fmt;
use std::fmt::{Display, Formatter};

use crate::runner::ds::operations::type_conversion::{number_to_string, TYPE_STR_UNDEFINED};

/// A runtime value. Numbers are always IEEE-754 doubles; the Not-a-Number
/// sentinel is `Number(NaN)`.
#[derive(Debug, Clone, PartialEq)]
pub enum JsValue {
    Undefined,
    Boolean(bool),
    String(String),
    Number(f64),
    Array(Vec<JsValue>),
    /// Names a declared function. Not a closure.
    Function(String),
}

impl JsValue {
    pub fn nan() -> Self {
        JsValue::Number(f64::NAN)
    }

    pub fn is_nan(&self) -> bool {
        matches!(self, JsValue::Number(n) if n.is_nan())
    }

    pub fn is_undefined(&self) -> bool {
        matches!(self, JsValue::Undefined)
    }
}

impl From<f64> for JsValue {
    fn from(n: f64) -> Self {
        JsValue::Number(n)
    }
}

impl From<bool> for JsValue {
    fn from(b: bool) -> Self {
        JsValue::Boolean(b)
    }
}

impl From<&str> for JsValue {
    fn from(s: &str) -> Self {
        JsValue::String(s.to_string())
    }
}

/// The form the REPL echoes: strings are quoted, arrays are bracketed.
impl Display for JsValue {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            JsValue::Undefined => write!(f, "{}", TYPE_STR_UNDEFINED),
            JsValue::Boolean(b) => write!(f, "{}", b),
            JsValue::String(s) => write!(f, "{:?}", s),
            JsValue::Number(n) => write!(f, "{}", number_to_string(*n)),
            JsValue::Array(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                write!(f, "]")
            }
            JsValue::Function(name) => write!(f, "[Function: {}]", name),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_matches_repl_echo() {
        let v = JsValue::Array(vec![
            JsValue::Number(1.0),
            JsValue::String("a".to_string()),
            JsValue::Undefined,
        ]);
        assert_eq!(v.to_string(), "[1, \"a\", undefined]");
        assert_eq!(JsValue::nan().to_string(), "NaN");
        assert_eq!(JsValue::Function("add".to_string()).to_string(), "[Function: add]");
    }

    #[test]
    fn nan_sentinel_is_not_the_text_nan() {
        assert!(JsValue::nan().is_nan());
        assert!(!JsValue::String("NaN".to_string()).is_nan());
    }
}
