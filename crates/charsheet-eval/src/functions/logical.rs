//! Logical functions

use crate::args::{self, eval_to_bool};
use crate::error::EvalResult;
use crate::evaluator::Evaluator;
use crate::value::Value;

/// `if(condition, then, else)` evaluates the condition's truthiness,
/// then evaluates and returns only the chosen branch.
pub fn fn_if(evaluator: &Evaluator, arguments: &str) -> EvalResult<Value> {
    let parts = args::expect_args("if", arguments, 3)?;
    let branch = if eval_to_bool(evaluator, parts[0])? {
        parts[1]
    } else {
        parts[2]
    };
    evaluator.evaluate(branch)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EvalError;
    use pretty_assertions::assert_eq;

    fn eval(text: &str) -> Value {
        Evaluator::new().evaluate(text).unwrap()
    }

    #[test]
    fn test_if_chooses_branch() {
        assert_eq!(eval("if(1 > 0, 10, 20)"), Value::Str("10".into()));
        assert_eq!(eval("if(1 < 0, 10, 20)"), Value::Str("20".into()));
    }

    #[test]
    fn test_if_condition_truthiness() {
        assert_eq!(eval("if(3, 1, 2)"), Value::Str("1".into()));
        assert_eq!(eval("if(0, 1, 2)"), Value::Str("2".into()));
    }

    #[test]
    fn test_if_only_evaluates_chosen_branch() {
        // The unused branch would fail numeric coercion if evaluated.
        assert_eq!(
            Evaluator::new()
                .evaluate_to_number("if(1 > 0, 5, bogus(1)) + 1")
                .unwrap(),
            6.0
        );
    }

    #[test]
    fn test_if_requires_three_arguments() {
        assert!(matches!(
            Evaluator::new().evaluate("if(1, 2)"),
            Err(EvalError::Argument(_))
        ));
    }
}
