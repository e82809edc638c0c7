//! Expression evaluator
//!
//! The evaluator ties the pieces together: it owns an instance-local copy
//! of the operator table and function map (seeded from the process-wide
//! defaults), holds the caller's variable resolver, and evaluates parsed
//! trees lazily.
//!
//! Instances are cheap and hold no state across calls; the parse stacks
//! live inside a single `evaluate` call. Registering operators or functions
//! takes `&mut self`, so the borrow checker rules out mutating a registry
//! while an evaluation on the same instance is in flight.

use ahash::AHashMap;

use crate::ast::Operand;
use crate::error::{EvalError, EvalResult};
use crate::functions::{self, FunctionImpl};
use crate::operator::{self, Operator};
use crate::parser;
use crate::value::Value;
use crate::variables;

/// External capability mapping a variable name to its current textual
/// value. `None` (or a blank string) means "cannot resolve".
pub trait VariableResolver {
    fn resolve_variable(&self, name: &str) -> Option<String>;
}

/// A plain map works as a resolver, which is convenient for tests and
/// simple callers.
impl VariableResolver for std::collections::HashMap<String, String> {
    fn resolve_variable(&self, name: &str) -> Option<String> {
        self.get(name).cloned()
    }
}

/// A formula expression evaluator.
///
/// Cloning an evaluator copies its operator/function registries and shares
/// its resolver. This is the "new evaluator from parent" that functions use
/// when they need an independently extensible registry for sub-expressions.
#[derive(Clone)]
pub struct Evaluator<'a> {
    resolver: Option<&'a dyn VariableResolver>,
    operators: Vec<Operator>,
    functions: AHashMap<String, FunctionImpl>,
}

impl Default for Evaluator<'_> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> Evaluator<'a> {
    /// Create an evaluator that does no variable resolution.
    pub fn new() -> Self {
        Self {
            resolver: None,
            operators: operator::default_operators().to_vec(),
            functions: functions::default_functions().clone(),
        }
    }

    /// Create an evaluator resolving `$variables` through `resolver`.
    pub fn with_resolver(resolver: &'a dyn VariableResolver) -> Self {
        Self {
            resolver: Some(resolver),
            ..Self::new()
        }
    }

    /// The current variable resolver, if any.
    pub fn resolver(&self) -> Option<&'a dyn VariableResolver> {
        self.resolver
    }

    pub fn set_resolver(&mut self, resolver: Option<&'a dyn VariableResolver>) {
        self.resolver = resolver;
    }

    /// Register an operator on this instance. The process-wide defaults are
    /// unaffected.
    pub fn add_operator(&mut self, operator: Operator) {
        self.operators.push(operator);
    }

    /// Register a function on this instance under a case-sensitive name.
    /// The process-wide defaults are unaffected.
    pub fn add_function(&mut self, name: impl Into<String>, function: FunctionImpl) {
        self.functions.insert(name.into(), function);
    }

    pub(crate) fn operators(&self) -> &[Operator] {
        &self.operators
    }

    pub(crate) fn function(&self, name: &str) -> Option<FunctionImpl> {
        self.functions.get(name).copied()
    }

    /// Evaluate an expression. The result is a number or a string; an
    /// expression with no operands at all yields the empty string.
    pub fn evaluate(&self, expression: &str) -> EvalResult<Value> {
        match parser::parse(self, expression)? {
            Some(root) => self.evaluate_operand(&root),
            None => Ok(Value::Str(String::new())),
        }
    }

    /// Evaluate an expression and require a numeric result.
    pub fn evaluate_to_number(&self, expression: &str) -> EvalResult<f64> {
        self.evaluate(expression)?.to_number()
    }

    /// Evaluate an expression and floor the numeric result to an integer.
    pub fn evaluate_to_integer(&self, expression: &str) -> EvalResult<i64> {
        Ok(self.evaluate_to_number(expression)?.floor() as i64)
    }

    /// Recursively evaluate one node of a parsed tree.
    fn evaluate_operand(&self, operand: &Operand) -> EvalResult<Value> {
        match operand {
            Operand::Literal { text, unary } => {
                let value = Value::Str(variables::replace_variables(self, text)?);
                match unary {
                    Some(unary) => unary.evaluate_unary(value),
                    None => Ok(value),
                }
            }
            Operand::Function {
                name,
                function,
                args,
                unary,
            } => {
                let args = variables::replace_variables(self, args)?;
                log::trace!("calling {name}({args})");
                let value = function(self, &args)?;
                match unary {
                    Some(unary) => unary.evaluate_unary(value),
                    None => Ok(value),
                }
            }
            Operand::Tree {
                left,
                right,
                operator,
                unary,
            } => match (left, right) {
                (Some(left), Some(right)) => {
                    let left = self.evaluate_operand(left)?;
                    let right = self.evaluate_operand(right)?;
                    let operator = operator.as_ref().ok_or(EvalError::InvalidExpression)?;
                    let value = operator.evaluate_binary(left, right)?;
                    match unary {
                        Some(unary) => unary.evaluate_unary(value),
                        None => Ok(value),
                    }
                }
                (Some(child), None) | (None, Some(child)) => {
                    let value = self.evaluate_operand(child)?;
                    if let Some(unary) = unary {
                        return unary.evaluate_unary(value);
                    }
                    match operator {
                        Some(operator) => operator.evaluate_unary(value),
                        None => Ok(value),
                    }
                }
                (None, None) => Err(EvalError::InvalidExpression),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;

    #[test]
    fn test_literal_evaluates_to_string() {
        let evaluator = Evaluator::new();
        assert_eq!(evaluator.evaluate("42").unwrap(), Value::Str("42".into()));
        assert_eq!(evaluator.evaluate("abc").unwrap(), Value::Str("abc".into()));
    }

    #[test]
    fn test_empty_expression_is_empty_string() {
        let evaluator = Evaluator::new();
        assert_eq!(evaluator.evaluate("").unwrap(), Value::Str(String::new()));
        assert_eq!(evaluator.evaluate("   ").unwrap(), Value::Str(String::new()));
    }

    #[test]
    fn test_evaluate_to_integer_floors() {
        let evaluator = Evaluator::new();
        assert_eq!(evaluator.evaluate_to_integer("3.9").unwrap(), 3);
        assert_eq!(evaluator.evaluate_to_integer("-3.1").unwrap(), -4);
    }

    #[test]
    fn test_evaluate_to_number_rejects_text() {
        let evaluator = Evaluator::new();
        assert!(matches!(
            evaluator.evaluate_to_number("abc"),
            Err(EvalError::NumberCoercion { .. })
        ));
    }

    #[test]
    fn test_instance_registration_does_not_touch_defaults() {
        fn fn_answer(_evaluator: &Evaluator, _args: &str) -> EvalResult<Value> {
            Ok(Value::Number(42.0))
        }
        let mut extended = Evaluator::new();
        extended.add_function("answer", fn_answer);
        assert_eq!(
            extended.evaluate("answer()").unwrap(),
            Value::Number(42.0)
        );
        let fresh = Evaluator::new();
        assert!(matches!(
            fresh.evaluate("answer()"),
            Err(EvalError::FunctionNotDefined(_))
        ));
    }

    #[test]
    fn test_clone_copies_registry_and_shares_resolver() {
        fn fn_zero(_evaluator: &Evaluator, _args: &str) -> EvalResult<Value> {
            Ok(Value::Number(0.0))
        }
        let mut vars = HashMap::new();
        vars.insert("x".to_string(), "7".to_string());
        let mut parent = Evaluator::with_resolver(&vars);
        parent.add_function("zero", fn_zero);
        let child = parent.clone();
        assert_eq!(child.evaluate_to_number("zero() + $x").unwrap(), 7.0);
    }

    #[test]
    fn test_function_names_are_case_sensitive() {
        let evaluator = Evaluator::new();
        assert!(matches!(
            evaluator.evaluate("ABS(1)"),
            Err(EvalError::FunctionNotDefined(_))
        ));
    }
}
