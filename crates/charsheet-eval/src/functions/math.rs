//! Math functions

use crate::args::{self, eval_to_number};
use crate::error::{EvalError, EvalResult};
use crate::evaluator::Evaluator;
use crate::value::Value;

pub fn fn_abs(evaluator: &Evaluator, arguments: &str) -> EvalResult<Value> {
    Ok(Value::Number(eval_to_number(evaluator, arguments)?.abs()))
}

pub fn fn_cbrt(evaluator: &Evaluator, arguments: &str) -> EvalResult<Value> {
    Ok(Value::Number(eval_to_number(evaluator, arguments)?.cbrt()))
}

pub fn fn_ceil(evaluator: &Evaluator, arguments: &str) -> EvalResult<Value> {
    Ok(Value::Number(eval_to_number(evaluator, arguments)?.ceil()))
}

pub fn fn_exp(evaluator: &Evaluator, arguments: &str) -> EvalResult<Value> {
    Ok(Value::Number(eval_to_number(evaluator, arguments)?.exp()))
}

pub fn fn_floor(evaluator: &Evaluator, arguments: &str) -> EvalResult<Value> {
    Ok(Value::Number(eval_to_number(evaluator, arguments)?.floor()))
}

/// Natural logarithm.
pub fn fn_log(evaluator: &Evaluator, arguments: &str) -> EvalResult<Value> {
    Ok(Value::Number(eval_to_number(evaluator, arguments)?.ln()))
}

pub fn fn_log1p(evaluator: &Evaluator, arguments: &str) -> EvalResult<Value> {
    Ok(Value::Number(eval_to_number(evaluator, arguments)?.ln_1p()))
}

pub fn fn_log10(evaluator: &Evaluator, arguments: &str) -> EvalResult<Value> {
    Ok(Value::Number(eval_to_number(evaluator, arguments)?.log10()))
}

pub fn fn_sqrt(evaluator: &Evaluator, arguments: &str) -> EvalResult<Value> {
    Ok(Value::Number(eval_to_number(evaluator, arguments)?.sqrt()))
}

/// Round half up, toward positive infinity: `round(-2.5)` is `-2`.
pub fn fn_round(evaluator: &Evaluator, arguments: &str) -> EvalResult<Value> {
    let n = eval_to_number(evaluator, arguments)?;
    Ok(Value::Number((n + 0.5).floor()))
}

pub fn fn_pow(evaluator: &Evaluator, arguments: &str) -> EvalResult<Value> {
    let parts = args::expect_args("pow", arguments, 2)?;
    let base = eval_to_number(evaluator, parts[0])?;
    let exponent = eval_to_number(evaluator, parts[1])?;
    Ok(Value::Number(base.powf(exponent)))
}

/// Fold the maximum over every top-level argument.
pub fn fn_max(evaluator: &Evaluator, arguments: &str) -> EvalResult<Value> {
    fold(evaluator, "max", arguments, f64::max)
}

/// Fold the minimum over every top-level argument.
pub fn fn_min(evaluator: &Evaluator, arguments: &str) -> EvalResult<Value> {
    fold(evaluator, "min", arguments, f64::min)
}

fn fold(
    evaluator: &Evaluator,
    name: &str,
    arguments: &str,
    combine: fn(f64, f64) -> f64,
) -> EvalResult<Value> {
    let mut result: Option<f64> = None;
    for part in args::split(arguments) {
        let n = eval_to_number(evaluator, part)?;
        result = Some(match result {
            Some(current) => combine(current, n),
            None => n,
        });
    }
    match result {
        Some(n) => Ok(Value::Number(n)),
        None => Err(EvalError::Argument(format!(
            "{name} expects at least 1 argument"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn eval(text: &str) -> Value {
        Evaluator::new().evaluate(text).unwrap()
    }

    #[test]
    fn test_single_argument_functions() {
        assert_eq!(eval("abs(1-5)"), Value::Number(4.0));
        assert_eq!(eval("ceil(3.2)"), Value::Number(4.0));
        assert_eq!(eval("floor(3.9)"), Value::Number(3.0));
        assert_eq!(eval("sqrt(16)"), Value::Number(4.0));
        assert_eq!(eval("cbrt(27)"), Value::Number(3.0));
        assert_eq!(eval("log10(100)"), Value::Number(2.0));
        assert_eq!(eval("log(exp(1))"), Value::Number(1.0));
        assert_eq!(eval("log1p(0)"), Value::Number(0.0));
    }

    #[test]
    fn test_round_half_up() {
        assert_eq!(eval("round(2.5)"), Value::Number(3.0));
        assert_eq!(eval("round(-2.5)"), Value::Number(-2.0));
        assert_eq!(eval("round(2.4)"), Value::Number(2.0));
    }

    #[test]
    fn test_pow() {
        assert_eq!(eval("pow(2, 10)"), Value::Number(1024.0));
        assert!(matches!(
            Evaluator::new().evaluate("pow(2)"),
            Err(EvalError::Argument(_))
        ));
    }

    #[test]
    fn test_min_max_fold_variadically() {
        assert_eq!(eval("max(1,min(2,3))"), Value::Number(2.0));
        assert_eq!(eval("max(1,5,3)"), Value::Number(5.0));
        assert_eq!(eval("min(4)"), Value::Number(4.0));
        assert!(matches!(
            Evaluator::new().evaluate("min()"),
            Err(EvalError::Argument(_))
        ));
    }

    #[test]
    fn test_arguments_are_sub_expressions() {
        assert_eq!(eval("max(2*3, 4)"), Value::Number(6.0));
        assert_eq!(eval("sqrt(pow(3,2) + pow(4,2))"), Value::Number(5.0));
    }
}
