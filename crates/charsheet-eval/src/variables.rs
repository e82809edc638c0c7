//! Variable substitution
//!
//! Literal text may embed `$name` references. Substitution is textual: the
//! resolved value is spliced into the surrounding text and the whole string
//! is rescanned from the top, so resolved values may themselves contain
//! further `$` references. Total passes are bounded to keep a resolver that
//! returns self-referential text from looping forever.

use crate::error::{EvalError, EvalResult};
use crate::evaluator::Evaluator;

/// Upper bound on substitution passes over one piece of text.
const MAX_SUBSTITUTION_PASSES: usize = 64;

/// Replace every `$name` reference in the text with its resolved value.
///
/// A variable name is the maximal run following `$` of ASCII letters,
/// digits (not as the first character), `_`, `.` and `#`.
pub(crate) fn replace_variables(evaluator: &Evaluator, text: &str) -> EvalResult<String> {
    let mut expression = text.to_string();
    let mut passes = 0;
    while let Some(dollar) = expression.find('$') {
        passes += 1;
        if passes > MAX_SUBSTITUTION_PASSES {
            return Err(EvalError::RunawaySubstitution(MAX_SUBSTITUTION_PASSES));
        }
        let bytes = expression.as_bytes();
        let mut last = dollar;
        for (i, &ch) in bytes.iter().enumerate().skip(dollar + 1) {
            let name_char = ch == b'_'
                || ch == b'.'
                || ch == b'#'
                || ch.is_ascii_alphabetic()
                || (i != dollar + 1 && ch.is_ascii_digit());
            if name_char {
                last = i;
            } else {
                break;
            }
        }
        if last == dollar {
            return Err(EvalError::InvalidVariableReference(dollar));
        }
        let name = &expression[dollar + 1..=last];
        let value = evaluator
            .resolver()
            .and_then(|resolver| resolver.resolve_variable(name));
        let value = match value {
            Some(value) if !value.trim().is_empty() => value,
            _ => return Err(EvalError::UnresolvedVariable(name.to_string())),
        };
        log::trace!("substituted ${name} -> {value}");
        let mut buffer = String::with_capacity(expression.len() + value.len());
        buffer.push_str(&expression[..dollar]);
        buffer.push_str(&value);
        buffer.push_str(&expression[last + 1..]);
        expression = buffer;
    }
    Ok(expression)
}
