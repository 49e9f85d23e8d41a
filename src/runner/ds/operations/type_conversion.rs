use crate::runner::ds::value::JsValue;

pub const TYPE_STR_UNDEFINED: &str = "undefined";
pub const TYPE_STR_BOOLEAN: &str = "boolean";
pub const TYPE_STR_STRING: &str = "string";
pub const TYPE_STR_NUMBER: &str = "number";
pub const TYPE_STR_OBJECT: &str = "object";
pub const TYPE_STR_FUNCTION: &str = "function";

pub fn get_type(a: &JsValue) -> &'static str {
    match a {
        JsValue::Undefined => TYPE_STR_UNDEFINED,
        JsValue::Boolean(_) => TYPE_STR_BOOLEAN,
        JsValue::String(_) => TYPE_STR_STRING,
        JsValue::Number(_) => TYPE_STR_NUMBER,
        JsValue::Array(_) => TYPE_STR_OBJECT,
        JsValue::Function(_) => TYPE_STR_FUNCTION,
    }
}

/// Falsy: `undefined`, `0`, NaN, `false` and the empty string. Everything
/// else, `"0"` included, is truthy.
pub fn to_boolean(v: &JsValue) -> bool {
    match v {
        JsValue::Undefined => false,
        JsValue::Boolean(b) => *b,
        JsValue::Number(n) => !(*n == 0.0 || n.is_nan()),
        JsValue::String(s) => !s.is_empty(),
        JsValue::Array(_) | JsValue::Function(_) => true,
    }
}

/// Parses the textual form of a number. Surrounding whitespace is ignored;
/// the empty string and anything that is not a decimal literal (or
/// `Infinity`) yields `None`.
pub fn parse_numeric_text(s: &str) -> Option<f64> {
    let s = s.trim();
    match s {
        "" => return None,
        "Infinity" | "+Infinity" => return Some(f64::INFINITY),
        "-Infinity" => return Some(f64::NEG_INFINITY),
        _ => {}
    }
    if !s
        .chars()
        .all(|c| c.is_ascii_digit() || matches!(c, '.' | 'e' | 'E' | '+' | '-'))
    {
        return None;
    }
    // Integer literal first so that long digit runs keep their exact value
    // whenever they fit.
    if let Ok(i) = s.parse::<i64>() {
        return Some(i as f64);
    }
    s.parse::<f64>().ok()
}

pub fn to_number(v: &JsValue) -> f64 {
    match v {
        JsValue::Undefined => f64::NAN,
        JsValue::Boolean(b) => {
            if *b {
                1.0
            } else {
                0.0
            }
        }
        JsValue::String(s) => parse_numeric_text(s).unwrap_or(f64::NAN),
        JsValue::Number(n) => *n,
        JsValue::Array(_) => parse_numeric_text(&to_js_string(v)).unwrap_or(f64::NAN),
        JsValue::Function(_) => f64::NAN,
    }
}

pub fn number_to_string(n: f64) -> String {
    if n.is_nan() {
        "NaN".to_string()
    } else if n.is_infinite() {
        if n > 0.0 {
            "Infinity".to_string()
        } else {
            "-Infinity".to_string()
        }
    } else if n == 0.0 {
        "0".to_string()
    } else if n.abs() >= 1e21 || n.abs() < 1e-6 {
        // Exponent form carries an explicit sign: 1e+21, 1e-7.
        let formatted = format!("{:e}", n);
        match formatted.split_once('e') {
            Some((mantissa, exponent)) if !exponent.starts_with('-') => {
                format!("{}e+{}", mantissa, exponent)
            }
            _ => formatted,
        }
    } else {
        format!("{}", n)
    }
}

/// String conversion used by `+`, template literals and the console.
pub fn to_js_string(v: &JsValue) -> String {
    match v {
        JsValue::Undefined => TYPE_STR_UNDEFINED.to_string(),
        JsValue::Boolean(b) => b.to_string(),
        JsValue::String(s) => s.clone(),
        JsValue::Number(n) => number_to_string(*n),
        JsValue::Array(items) => items
            .iter()
            .map(|item| match item {
                JsValue::Undefined => String::new(),
                _ => to_js_string(item),
            })
            .collect::<Vec<_>>()
            .join(","),
        JsValue::Function(name) => format!("function {}() {{ [code] }}", name),
    }
}

/// A value usable as an array index: a non-negative integral number, or text
/// spelling one.
pub fn to_array_index(v: &JsValue) -> Option<usize> {
    let n = match v {
        JsValue::Number(n) => *n,
        JsValue::String(s) => parse_numeric_text(s)?,
        _ => return None,
    };
    if n.is_finite() && n >= 0.0 && n.fract() == 0.0 && n <= usize::MAX as f64 {
        Some(n as usize)
    } else {
        None
    }
}
