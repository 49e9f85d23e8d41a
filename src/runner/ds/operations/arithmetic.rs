use std::borrow::Cow;

use crate::runner::ds::operations::type_conversion::{
    to_array_index, to_boolean, to_js_string, to_number,
};
use crate::runner::ds::value::JsValue;

/// `+`: concatenation as soon as either side is text (or an array, which
/// stringifies), numeric addition otherwise.
pub fn add_values(a: &JsValue, b: &JsValue) -> JsValue {
    match (a, b) {
        (JsValue::Number(x), JsValue::Number(y)) => JsValue::Number(x + y),
        (JsValue::String(x), _) => JsValue::String(format!("{}{}", x, to_js_string(b))),
        (_, JsValue::String(y)) => JsValue::String(format!("{}{}", to_js_string(a), y)),
        (JsValue::Array(_), _) | (_, JsValue::Array(_)) => {
            JsValue::String(format!("{}{}", to_js_string(a), to_js_string(b)))
        }
        _ => JsValue::Number(to_number(a) + to_number(b)),
    }
}

pub fn subtract_values(a: &JsValue, b: &JsValue) -> JsValue {
    JsValue::Number(to_number(a) - to_number(b))
}

pub fn multiply_values(a: &JsValue, b: &JsValue) -> JsValue {
    JsValue::Number(to_number(a) * to_number(b))
}

/// IEEE division: `x / 0` is an infinity, `0 / 0` is NaN.
pub fn divide_values(a: &JsValue, b: &JsValue) -> JsValue {
    JsValue::Number(to_number(a) / to_number(b))
}

pub fn modulo_values(a: &JsValue, b: &JsValue) -> JsValue {
    JsValue::Number(to_number(a) % to_number(b))
}

pub fn negate_value(a: &JsValue) -> JsValue {
    JsValue::Number(-to_number(a))
}

pub fn logical_not(a: &JsValue) -> JsValue {
    JsValue::Boolean(!to_boolean(a))
}

/// `.length` of an array (element count) or text (character count).
pub fn get_length(a: &JsValue) -> JsValue {
    match a {
        JsValue::Array(items) => JsValue::Number(items.len() as f64),
        JsValue::String(s) => JsValue::Number(s.chars().count() as f64),
        JsValue::Number(n) if n.is_nan() => JsValue::nan(),
        _ => JsValue::Undefined,
    }
}

/// Reads `a[index]`. Out-of-range or non-index positions read as undefined.
pub fn get_index(a: &JsValue, index: &JsValue) -> JsValue {
    let i = match to_array_index(index) {
        Some(i) => i,
        None => return JsValue::Undefined,
    };
    match a {
        JsValue::Array(items) => items.get(i).cloned().unwrap_or(JsValue::Undefined),
        JsValue::String(s) => s
            .chars()
            .nth(i)
            .map(|c| JsValue::String(c.to_string()))
            .unwrap_or(JsValue::Undefined),
        _ => JsValue::Undefined,
    }
}

/// Reads `a[i][j]...`, borrowing from `a` while the path stays inside arrays.
pub fn get_nested_index<'v>(a: &'v JsValue, indices: &[JsValue]) -> Cow<'v, JsValue> {
    let mut current = a;
    for (n, index) in indices.iter().enumerate() {
        match current {
            JsValue::Array(items) => match to_array_index(index).and_then(|i| items.get(i)) {
                Some(item) => current = item,
                None => return Cow::Owned(JsValue::Undefined),
            },
            _ => {
                let element = get_index(current, index);
                return Cow::Owned(get_nested_index(&element, &indices[n + 1..]).into_owned());
            }
        }
    }
    Cow::Borrowed(current)
}
