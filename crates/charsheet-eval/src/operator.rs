//! Operators and the default operator table

use std::cmp::Ordering;
use std::fmt;

use once_cell::sync::Lazy;

use crate::error::{EvalError, EvalResult};
use crate::value::Value;

/// Binary operator implementation signature
pub type BinaryImpl = fn(Value, Value) -> EvalResult<Value>;

/// Unary operator implementation signature
pub type UnaryImpl = fn(Value) -> EvalResult<Value>;

/// An operator: a symbol with a precedence and up to two evaluation
/// behaviors (binary, unary). Operators are immutable value objects; the
/// registry copies them by value into each evaluator instance.
///
/// Higher precedence binds tighter. The grouping operators `(` / `)` use
/// precedence 0; every evaluating operator must use a precedence >= 10 so
/// it never outranks a group marker on the parse stack.
#[derive(Clone)]
pub struct Operator {
    symbol: String,
    precedence: u8,
    binary: Option<BinaryImpl>,
    unary: Option<UnaryImpl>,
}

impl Operator {
    pub fn new(
        symbol: impl Into<String>,
        precedence: u8,
        binary: Option<BinaryImpl>,
        unary: Option<UnaryImpl>,
    ) -> Self {
        Self {
            symbol: symbol.into(),
            precedence,
            binary,
            unary,
        }
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn precedence(&self) -> u8 {
        self.precedence
    }

    /// Symbol length in bytes.
    pub fn len(&self) -> usize {
        self.symbol.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbol.is_empty()
    }

    /// Whether this operator may bind as a unary prefix.
    pub fn is_unary(&self) -> bool {
        self.unary.is_some()
    }

    pub(crate) fn is_open_paren(&self) -> bool {
        self.symbol == "("
    }

    pub(crate) fn is_close_paren(&self) -> bool {
        self.symbol == ")"
    }

    /// Apply the operator to two operands.
    pub fn evaluate_binary(&self, left: Value, right: Value) -> EvalResult<Value> {
        match self.binary {
            Some(imp) => imp(left, right),
            None => Err(EvalError::InvalidOperand(format!(
                "operator '{}' cannot be applied to two operands",
                self.symbol
            ))),
        }
    }

    /// Apply the operator to a single operand.
    pub fn evaluate_unary(&self, operand: Value) -> EvalResult<Value> {
        match self.unary {
            Some(imp) => imp(operand),
            None => Err(EvalError::InvalidOperand(format!(
                "operator '{}' cannot be applied to a single operand",
                self.symbol
            ))),
        }
    }
}

impl fmt::Debug for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Operator")
            .field("symbol", &self.symbol)
            .field("precedence", &self.precedence)
            .finish()
    }
}

// === Default operator table ===
//
// Registration order is significant: the scanner tests operators in table
// order at each position, so multi-character symbols must precede their
// single-character prefixes ("<=" before "<", "!=" before "!").
static DEFAULT_OPERATORS: Lazy<Vec<Operator>> = Lazy::new(|| {
    vec![
        Operator::new("(", 0, None, None),
        Operator::new(")", 0, None, None),
        Operator::new("+", 50, Some(op_add), Some(op_identity)),
        Operator::new("-", 50, Some(op_subtract), Some(op_negate)),
        Operator::new("^", 70, Some(op_power), None),
        Operator::new("*", 60, Some(op_multiply), None),
        Operator::new("/", 60, Some(op_divide), None),
        Operator::new("==", 30, Some(op_equal), None),
        Operator::new("!=", 30, Some(op_not_equal), None),
        Operator::new("<=", 40, Some(op_less_than_or_equal), None),
        Operator::new("<", 40, Some(op_less_than), None),
        Operator::new(">=", 40, Some(op_greater_than_or_equal), None),
        Operator::new(">", 40, Some(op_greater_than), None),
        Operator::new("&&", 20, Some(op_and), None),
        Operator::new("||", 10, Some(op_or), None),
        Operator::new("!", 80, None, Some(op_not)),
        Operator::new("%", 60, Some(op_modulo), None),
    ]
});

/// The process-wide default operator table, in registration order.
pub(crate) fn default_operators() -> &'static [Operator] {
    &DEFAULT_OPERATORS
}

// === Operator implementations ===

/// Addition falls back to string concatenation when either side is not
/// numeric.
fn op_add(left: Value, right: Value) -> EvalResult<Value> {
    match (left.as_number(), right.as_number()) {
        (Some(l), Some(r)) => Ok(Value::Number(l + r)),
        _ => Ok(Value::Str(left.as_string() + &right.as_string())),
    }
}

fn op_subtract(left: Value, right: Value) -> EvalResult<Value> {
    Ok(Value::Number(left.to_number()? - right.to_number()?))
}

fn op_multiply(left: Value, right: Value) -> EvalResult<Value> {
    Ok(Value::Number(left.to_number()? * right.to_number()?))
}

fn op_divide(left: Value, right: Value) -> EvalResult<Value> {
    Ok(Value::Number(left.to_number()? / right.to_number()?))
}

fn op_power(left: Value, right: Value) -> EvalResult<Value> {
    Ok(Value::Number(left.to_number()?.powf(right.to_number()?)))
}

fn op_modulo(left: Value, right: Value) -> EvalResult<Value> {
    Ok(Value::Number(left.to_number()? % right.to_number()?))
}

fn op_equal(left: Value, right: Value) -> EvalResult<Value> {
    Ok(Value::from(values_equal(&left, &right)))
}

fn op_not_equal(left: Value, right: Value) -> EvalResult<Value> {
    Ok(Value::from(!values_equal(&left, &right)))
}

fn op_less_than(left: Value, right: Value) -> EvalResult<Value> {
    Ok(Value::from(compare_values(&left, &right) == Ordering::Less))
}

fn op_less_than_or_equal(left: Value, right: Value) -> EvalResult<Value> {
    Ok(Value::from(
        compare_values(&left, &right) != Ordering::Greater,
    ))
}

fn op_greater_than(left: Value, right: Value) -> EvalResult<Value> {
    Ok(Value::from(
        compare_values(&left, &right) == Ordering::Greater,
    ))
}

fn op_greater_than_or_equal(left: Value, right: Value) -> EvalResult<Value> {
    Ok(Value::from(compare_values(&left, &right) != Ordering::Less))
}

fn op_and(left: Value, right: Value) -> EvalResult<Value> {
    Ok(Value::from(left.is_truthy() && right.is_truthy()))
}

fn op_or(left: Value, right: Value) -> EvalResult<Value> {
    Ok(Value::from(left.is_truthy() || right.is_truthy()))
}

fn op_identity(operand: Value) -> EvalResult<Value> {
    Ok(operand)
}

fn op_negate(operand: Value) -> EvalResult<Value> {
    Ok(Value::Number(-operand.to_number()?))
}

fn op_not(operand: Value) -> EvalResult<Value> {
    Ok(Value::from(!operand.is_truthy()))
}

/// Compare two values numerically when both sides coerce, otherwise as
/// strings.
fn compare_values(left: &Value, right: &Value) -> Ordering {
    match (left.as_number(), right.as_number()) {
        (Some(l), Some(r)) => l.partial_cmp(&r).unwrap_or(Ordering::Equal),
        _ => left.as_string().cmp(&right.as_string()),
    }
}

/// Equality follows the same coercion rule as ordering.
fn values_equal(left: &Value, right: &Value) -> bool {
    match (left.as_number(), right.as_number()) {
        (Some(l), Some(r)) => l == r,
        _ => left.as_string() == right.as_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn find(symbol: &str) -> &'static Operator {
        default_operators()
            .iter()
            .find(|op| op.symbol() == symbol)
            .unwrap()
    }

    #[test]
    fn test_registration_order_puts_two_char_symbols_first() {
        let symbols: Vec<&str> = default_operators().iter().map(Operator::symbol).collect();
        let pos = |s: &str| symbols.iter().position(|&x| x == s).unwrap();
        assert!(pos("<=") < pos("<"));
        assert!(pos(">=") < pos(">"));
        assert!(pos("!=") < pos("!"));
    }

    #[test]
    fn test_add_concatenates_non_numeric() {
        let result = op_add(Value::Str("ST ".into()), Value::Number(12.0)).unwrap();
        assert_eq!(result, Value::Str("ST 12".into()));
        let result = op_add(Value::Str("2".into()), Value::Str("3".into())).unwrap();
        assert_eq!(result, Value::Number(5.0));
    }

    #[test]
    fn test_comparisons_coerce_numbers() {
        assert_eq!(
            find("<").evaluate_binary("2".into(), "10".into()).unwrap(),
            Value::from(true)
        );
        assert_eq!(
            find("==")
                .evaluate_binary("abc".into(), "abc".into())
                .unwrap(),
            Value::from(true)
        );
    }

    #[test]
    fn test_unary_negate_requires_number() {
        assert_eq!(
            find("-").evaluate_unary("5".into()).unwrap(),
            Value::Number(-5.0)
        );
        assert!(find("-").evaluate_unary("abc".into()).is_err());
    }

    #[test]
    fn test_paren_has_no_evaluation() {
        assert!(find("(").evaluate_binary(1.0.into(), 2.0.into()).is_err());
        assert!(find("(").evaluate_unary(1.0.into()).is_err());
    }

    #[test]
    fn test_not_negates_truthiness() {
        assert_eq!(find("!").evaluate_unary("true".into()).unwrap(), Value::from(false));
        assert_eq!(find("!").evaluate_unary(0.0.into()).unwrap(), Value::from(true));
    }
}
