//! Dice functions

use charsheet_dice::Dice;

use crate::args::{self, eval_to_number, eval_to_string};
use crate::error::{EvalError, EvalResult};
use crate::evaluator::Evaluator;
use crate::value::Value;

/// `dice(sides)`, `dice(count, sides)`, `dice(count, sides, modifier)` or
/// `dice(count, sides, modifier, multiplier)` builds a dice specification
/// and returns its canonical textual form.
pub fn fn_dice(evaluator: &Evaluator, arguments: &str) -> EvalResult<Value> {
    let mut numbers = Vec::new();
    for part in args::split(arguments) {
        numbers.push(eval_to_number(evaluator, part)? as i32);
    }
    let dice = match numbers.as_slice() {
        [sides] => Dice::new(1, *sides, 0, 1),
        [count, sides] => Dice::new(*count, *sides, 0, 1),
        [count, sides, modifier] => Dice::new(*count, *sides, *modifier, 1),
        [count, sides, modifier, multiplier] => Dice::new(*count, *sides, *modifier, *multiplier),
        _ => {
            return Err(EvalError::Argument(
                "dice expects 1 to 4 arguments".to_string(),
            ))
        }
    };
    Ok(Value::Str(dice.to_text(false)))
}

/// `roll(spec)` rolls a dice specification such as `2d6+1`. An argument
/// containing `(` is evaluated as an expression first, so
/// `roll(dice(1,8))` works.
pub fn fn_roll(evaluator: &Evaluator, arguments: &str) -> EvalResult<Value> {
    let spec = if arguments.contains('(') {
        eval_to_string(evaluator, arguments)?
    } else {
        arguments.to_string()
    };
    let total = Dice::parse(&spec).roll(false);
    Ok(Value::Number(f64::from(total)))
}
