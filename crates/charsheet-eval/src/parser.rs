//! Precedence-reduction parser
//!
//! A two-stack (operand stack, operator stack) engine that builds an
//! expression tree directly from the token stream produced by the scanner,
//! with no intermediate token array. Operators already on the stack with
//! precedence >= the incoming operator's are reduced first, which makes
//! equal-precedence chains reduce left-to-right (`2^3^2` is `(2^3)^2`).
//!
//! Both stacks are locals of a single `parse` call.

use crate::ast::Operand;
use crate::error::{EvalError, EvalResult};
use crate::evaluator::Evaluator;
use crate::operator::Operator;
use crate::scanner::{self, ScanHit};

/// An operator on the parse stack, paired with the unary operator that was
/// bound to the group it opened (meaningful only for `(`).
struct StackedOperator {
    operator: Operator,
    unary: Option<Operator>,
}

/// Parse expression text into a tree. Returns `None` for an expression
/// that produced no operand at all (the empty-string result).
pub(crate) fn parse(evaluator: &Evaluator, expression: &str) -> EvalResult<Option<Operand>> {
    let mut operand_stack: Vec<Operand> = Vec::new();
    let mut operator_stack: Vec<StackedOperator> = Vec::new();
    let mut have_operand = false;
    let mut have_operator = false;
    let mut unary: Option<Operator> = None;
    let bytes = expression.as_bytes();
    let max = bytes.len();
    let mut i = 0;
    while i < max {
        if bytes[i].is_ascii_whitespace() {
            i += 1;
            continue;
        }
        let next = scanner::next_operator(evaluator.operators(), expression, i);
        if next.as_ref().map_or(true, |hit| hit.index > i) {
            let operator_index = next.as_ref().map(|hit| hit.index);
            i = process_operand(expression, i, operator_index, &mut operand_stack, unary.take())?;
            have_operand = true;
            have_operator = false;
        }
        let Some(hit) = next else {
            continue;
        };
        // The operand step above advanced i to the occurrence.
        if hit.operator.is_unary() && (have_operator || i == 0) {
            i = hit.index + hit.operator.len();
            if unary.is_some() {
                return Err(EvalError::ConsecutiveUnaryOperators(i));
            }
            unary = Some(hit.operator.clone());
        } else {
            i = process_operator(
                evaluator,
                expression,
                hit.index,
                hit.operator.clone(),
                &mut operator_stack,
                &mut operand_stack,
                have_operand,
                unary.take(),
            )?;
        }
        if !hit.operator.is_close_paren() {
            have_operand = false;
            have_operator = true;
        }
    }
    // Drain what's left on the operator stack into tree nodes.
    while let Some(top) = operator_stack.last() {
        if top.operator.is_open_paren() {
            return Err(EvalError::UnmatchedParen);
        }
        process_tree(&mut operand_stack, &mut operator_stack);
    }
    match operand_stack.len() {
        0 => Ok(None),
        1 => Ok(operand_stack.pop()),
        _ => Err(EvalError::InvalidExpression),
    }
}

/// Push the operand span between the current index and the next operator
/// occurrence (or end of string). Returns the index to resume scanning at.
fn process_operand(
    expression: &str,
    start: usize,
    operator_index: Option<usize>,
    operand_stack: &mut Vec<Operand>,
    unary: Option<Operator>,
) -> EvalResult<usize> {
    let (text, result) = match operator_index {
        Some(index) => (expression[start..index].trim(), index),
        None => (expression[start..].trim(), expression.len()),
    };
    if text.is_empty() {
        return Err(EvalError::EmptyOperand(start));
    }
    operand_stack.push(Operand::Literal {
        text: text.to_string(),
        unary,
    });
    Ok(result)
}

/// Handle an operator occurrence at `index`. Returns the index to resume
/// scanning at (just past the operator actually consumed).
#[allow(clippy::too_many_arguments)]
fn process_operator(
    evaluator: &Evaluator,
    expression: &str,
    index: usize,
    operator: Operator,
    operator_stack: &mut Vec<StackedOperator>,
    operand_stack: &mut Vec<Operand>,
    have_operand: bool,
    unary: Option<Operator>,
) -> EvalResult<usize> {
    let mut operator = operator;
    let mut index = index;
    if have_operand && operator.is_open_paren() {
        // The span just completed was a function name.
        let close = process_function(evaluator, expression, index, operand_stack)?;
        index = close.index + close.operator.len();
        match scanner::next_operator(evaluator.operators(), expression, index) {
            None => return Ok(index),
            Some(next) => {
                operator = next.operator.clone();
                index = next.index;
            }
        }
    }
    if operator.is_open_paren() {
        operator_stack.push(StackedOperator { operator: operator.clone(), unary });
    } else if operator.is_close_paren() {
        while operator_stack
            .last()
            .is_some_and(|top| !top.operator.is_open_paren())
        {
            process_tree(operand_stack, operator_stack);
        }
        let Some(open) = operator_stack.pop() else {
            return Err(EvalError::UnmatchedParen);
        };
        if let Some(group_unary) = open.unary {
            let Some(inner) = operand_stack.pop() else {
                return Err(EvalError::InvalidExpression);
            };
            operand_stack.push(Operand::unary_group(inner, group_unary));
        }
    } else {
        while operator_stack.last().is_some_and(|top| {
            !top.operator.is_open_paren() && top.operator.precedence() >= operator.precedence()
        }) {
            process_tree(operand_stack, operator_stack);
        }
        operator_stack.push(StackedOperator { operator: operator.clone(), unary });
    }
    Ok(index + operator.len())
}

/// Function-call recognition: find the matching close paren, capture the
/// raw argument text verbatim, and replace the preceding literal span with
/// a function operand.
fn process_function<'a>(
    evaluator: &'a Evaluator,
    expression: &str,
    operator_index: usize,
    operand_stack: &mut Vec<Operand>,
) -> EvalResult<ScanHit<'a>> {
    let mut parens = 1;
    let mut next = operator_index;
    let mut last_hit = None;
    while parens > 0 {
        let hit = scanner::next_operator(evaluator.operators(), expression, next + 1)
            .ok_or(EvalError::UnclosedFunctionCall)?;
        if hit.operator.is_open_paren() {
            parens += 1;
        } else if hit.operator.is_close_paren() {
            parens -= 1;
        }
        next = hit.index;
        last_hit = Some(hit);
    }
    let Some(Operand::Literal { text, unary }) = operand_stack.pop() else {
        return Err(EvalError::InvalidExpression);
    };
    let Some(function) = evaluator.function(&text) else {
        return Err(EvalError::FunctionNotDefined(text));
    };
    operand_stack.push(Operand::Function {
        name: text,
        function,
        args: expression[operator_index + 1..next].to_string(),
        unary,
    });
    // The while loop always runs at least once, so a hit is recorded.
    last_hit.ok_or(EvalError::UnclosedFunctionCall)
}

/// Reduction step: pop the top operator and the top one or two operands,
/// build a tree node, push it back. Only called with a non-empty operator
/// stack.
fn process_tree(operand_stack: &mut Vec<Operand>, operator_stack: &mut Vec<StackedOperator>) {
    let right = operand_stack.pop();
    let left = operand_stack.pop();
    if let Some(stacked) = operator_stack.pop() {
        operand_stack.push(Operand::reduce(left, right, stacked.operator));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evaluator::Evaluator;

    fn parse_text(text: &str) -> EvalResult<Option<Operand>> {
        let evaluator = Evaluator::new();
        parse(&evaluator, text)
    }

    #[test]
    fn test_parse_literal() {
        let operand = parse_text("  42  ").unwrap().unwrap();
        match operand {
            Operand::Literal { text, unary } => {
                assert_eq!(text, "42");
                assert!(unary.is_none());
            }
            other => panic!("expected literal, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_empty_is_none() {
        assert!(parse_text("").unwrap().is_none());
    }

    #[test]
    fn test_parse_binary_tree() {
        let operand = parse_text("1+2").unwrap().unwrap();
        match operand {
            Operand::Tree { left, right, operator, .. } => {
                assert!(left.is_some());
                assert!(right.is_some());
                assert_eq!(operator.unwrap().symbol(), "+");
            }
            other => panic!("expected tree, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_unary_binds_to_operand() {
        let operand = parse_text("-5").unwrap().unwrap();
        match operand {
            Operand::Literal { text, unary } => {
                assert_eq!(text, "5");
                assert_eq!(unary.unwrap().symbol(), "-");
            }
            other => panic!("expected literal, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_function_captures_raw_args() {
        let operand = parse_text("max(1, min(2,3))").unwrap().unwrap();
        match operand {
            Operand::Function { name, args, .. } => {
                assert_eq!(name, "max");
                assert_eq!(args, "1, min(2,3)");
            }
            other => panic!("expected function, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_unknown_function() {
        assert!(matches!(
            parse_text("bogus(1)"),
            Err(EvalError::FunctionNotDefined(name)) if name == "bogus"
        ));
    }

    #[test]
    fn test_parse_unclosed_function_call() {
        assert!(matches!(
            parse_text("max(1,2"),
            Err(EvalError::UnclosedFunctionCall)
        ));
    }

    #[test]
    fn test_parse_consecutive_unaries() {
        assert!(matches!(
            parse_text("--5"),
            Err(EvalError::ConsecutiveUnaryOperators(_))
        ));
    }

    #[test]
    fn test_parse_unmatched_parens() {
        assert!(matches!(parse_text("(1+2"), Err(EvalError::UnmatchedParen)));
        assert!(matches!(parse_text("1+2)"), Err(EvalError::UnmatchedParen)));
    }

    #[test]
    fn test_parse_blank_operand_span() {
        // A span holding only non-ASCII whitespace trims to nothing.
        assert!(matches!(
            parse_text("1+\u{00a0}*2"),
            Err(EvalError::EmptyOperand(_))
        ));
    }
}
