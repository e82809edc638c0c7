//! Function argument handling
//!
//! Splits a function's raw argument text on top-level commas and evaluates
//! individual arguments as sub-expressions.

use crate::error::{EvalError, EvalResult};
use crate::evaluator::Evaluator;

/// Split raw argument text into top-level comma-separated sub-expressions.
///
/// Commas inside nested `(...)` groups are preserved verbatim, so nested
/// function calls stay intact. Empty input yields no arguments.
pub fn split(args: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    if args.is_empty() {
        return parts;
    }
    let mut remaining = args;
    loop {
        let (arg, rest) = next_arg(remaining);
        parts.push(arg);
        match rest {
            Some(rest) => remaining = rest,
            None => return parts,
        }
    }
}

/// Peel the first top-level argument off the front of the text.
///
/// Returns the argument and the remainder after the separating comma, or
/// `None` when this was the last argument.
pub fn next_arg(args: &str) -> (&str, Option<&str>) {
    let mut depth = 0usize;
    for (i, ch) in args.bytes().enumerate() {
        match ch {
            b'(' => depth += 1,
            b')' => depth = depth.saturating_sub(1),
            b',' if depth == 0 => return (&args[..i], Some(&args[i + 1..])),
            _ => {}
        }
    }
    (args, None)
}

/// Evaluate one argument as a sub-expression and require a numeric result.
pub fn eval_to_number(evaluator: &Evaluator, arg: &str) -> EvalResult<f64> {
    evaluator.evaluate(arg)?.to_number()
}

/// Evaluate one argument as a sub-expression and take its truthiness.
pub fn eval_to_bool(evaluator: &Evaluator, arg: &str) -> EvalResult<bool> {
    Ok(evaluator.evaluate(arg)?.is_truthy())
}

/// Evaluate one argument as a sub-expression and take its textual form.
pub fn eval_to_string(evaluator: &Evaluator, arg: &str) -> EvalResult<String> {
    Ok(evaluator.evaluate(arg)?.as_string())
}

/// Require an exact top-level argument count.
pub(crate) fn expect_args<'a>(
    name: &str,
    args: &'a str,
    expected: usize,
) -> EvalResult<Vec<&'a str>> {
    let parts = split(args);
    if parts.len() != expected {
        return Err(EvalError::Argument(format!(
            "{name} expects {expected} argument(s), got {}",
            parts.len()
        )));
    }
    Ok(parts)
}
