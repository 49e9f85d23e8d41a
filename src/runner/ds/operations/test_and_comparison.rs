use crate::runner::ds::operations::type_conversion::{parse_numeric_text, to_js_string, to_number};
use crate::runner::ds::value::JsValue;

/// `===`: same tag and same value, no coercion. Arrays compare element-wise.
pub fn strict_equality(a: &JsValue, b: &JsValue) -> bool {
    match (a, b) {
        (JsValue::Undefined, JsValue::Undefined) => true,
        (JsValue::Boolean(x), JsValue::Boolean(y)) => x == y,
        (JsValue::String(x), JsValue::String(y)) => x == y,
        (JsValue::Number(x), JsValue::Number(y)) => x == y,
        (JsValue::Function(x), JsValue::Function(y)) => x == y,
        (JsValue::Array(x), JsValue::Array(y)) => {
            x.len() == y.len() && x.iter().zip(y.iter()).all(|(p, q)| strict_equality(p, q))
        }
        _ => false,
    }
}

/// Number view of a primitive for `==`. Text that does not parse has none.
fn loose_number(v: &JsValue) -> Option<f64> {
    match v {
        JsValue::Number(n) => Some(*n),
        JsValue::Boolean(b) => Some(if *b { 1.0 } else { 0.0 }),
        JsValue::String(s) => parse_numeric_text(s),
        _ => None,
    }
}

/// `==`. `!=` is always its exact complement.
pub fn loose_equality(a: &JsValue, b: &JsValue) -> bool {
    match (a, b) {
        (JsValue::Undefined, JsValue::Undefined) => true,
        (JsValue::Undefined, _) | (_, JsValue::Undefined) => false,
        (JsValue::String(x), JsValue::String(y)) => x == y,
        (JsValue::Boolean(x), JsValue::Boolean(y)) => x == y,
        (JsValue::Array(_), JsValue::Array(_)) | (JsValue::Function(_), JsValue::Function(_)) => {
            strict_equality(a, b)
        }
        (JsValue::Function(_), _) | (_, JsValue::Function(_)) => false,
        (JsValue::Array(_), _) => loose_equality(&JsValue::String(to_js_string(a)), b),
        (_, JsValue::Array(_)) => loose_equality(a, &JsValue::String(to_js_string(b))),
        _ => match (loose_number(a), loose_number(b)) {
            (Some(x), Some(y)) => x == y,
            _ => false,
        },
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelationalOperator {
    LessThan,
    LessThanEqual,
    GreaterThan,
    GreaterThanEqual,
}

/// Two strings compare lexicographically; any other pair compares as numbers,
/// and an operand without a numeric value makes the comparison false.
pub fn compare_values(op: RelationalOperator, a: &JsValue, b: &JsValue) -> bool {
    if let (JsValue::String(x), JsValue::String(y)) = (a, b) {
        return match op {
            RelationalOperator::LessThan => x < y,
            RelationalOperator::LessThanEqual => x <= y,
            RelationalOperator::GreaterThan => x > y,
            RelationalOperator::GreaterThanEqual => x >= y,
        };
    }
    let (x, y) = (to_number(a), to_number(b));
    match op {
        RelationalOperator::LessThan => x < y,
        RelationalOperator::LessThanEqual => x <= y,
        RelationalOperator::GreaterThan => x > y,
        RelationalOperator::GreaterThanEqual => x >= y,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn s(v: &str) -> JsValue {
        JsValue::String(v.to_string())
    }

    #[test]
    fn loose_equality_coerces_text_and_booleans() {
        assert!(loose_equality(&JsValue::Number(10.0), &s("10")));
        assert!(loose_equality(&JsValue::Boolean(true), &JsValue::Number(1.0)));
        assert!(loose_equality(&s("1"), &JsValue::Boolean(true)));
        assert!(!loose_equality(&s("hello"), &JsValue::Number(5.0)));
        assert!(!loose_equality(&JsValue::Undefined, &JsValue::Number(0.0)));
        assert!(loose_equality(&JsValue::Undefined, &JsValue::Undefined));
        assert!(!loose_equality(&JsValue::nan(), &JsValue::nan()));
    }

    #[test]
    fn strict_equality_never_coerces() {
        assert!(!strict_equality(&JsValue::Number(10.0), &s("10")));
        assert!(strict_equality(&s("5"), &s("5")));
        assert!(strict_equality(
            &JsValue::Array(vec![JsValue::Number(1.0)]),
            &JsValue::Array(vec![JsValue::Number(1.0)])
        ));
    }

    #[test]
    fn array_loose_equals_its_text() {
        let arr = JsValue::Array(vec![JsValue::Number(1.0), JsValue::Number(2.0)]);
        assert!(loose_equality(&arr, &s("1,2")));
    }

    #[test]
    fn relational() {
        use RelationalOperator::*;
        assert!(compare_values(GreaterThan, &JsValue::Number(10.0), &s("5")));
        assert!(compare_values(LessThan, &s("apple"), &s("banana")));
        assert!(!compare_values(LessThan, &s("abc"), &JsValue::Number(5.0)));
        assert!(!compare_values(GreaterThanEqual, &s("abc"), &JsValue::Number(5.0)));
        assert!(compare_values(LessThanEqual, &JsValue::Boolean(true), &JsValue::Number(1.0)));
        assert!(!compare_values(LessThan, &JsValue::Undefined, &JsValue::Number(1.0)));
    }
}
