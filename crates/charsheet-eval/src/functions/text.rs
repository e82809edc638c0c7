//! Text formatting functions

use crate::args::eval_to_number;
use crate::error::EvalResult;
use crate::evaluator::Evaluator;
use crate::value::{fmt_number, Value};

/// `signed(x)` formats a number with an explicit leading sign.
pub fn fn_signed(evaluator: &Evaluator, arguments: &str) -> EvalResult<Value> {
    let n = eval_to_number(evaluator, arguments)?;
    let text = if n >= 0.0 {
        format!("+{}", fmt_number(n))
    } else {
        fmt_number(n)
    };
    Ok(Value::Str(text))
}
