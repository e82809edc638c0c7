//! Evaluation error types

use thiserror::Error;

/// Result type for expression evaluation
pub type EvalResult<T> = std::result::Result<T, EvalError>;

/// Errors that can occur while parsing or evaluating an expression
#[derive(Debug, Error)]
pub enum EvalError {
    /// A span between operators contains no text
    #[error("empty operand at index {0}")]
    EmptyOperand(usize),

    /// Two unary operators bound back-to-back with no operand between them
    #[error("consecutive unary operators are not allowed (index={0})")]
    ConsecutiveUnaryOperators(usize),

    /// A close paren with no corresponding open paren
    #[error("unmatched parenthesis")]
    UnmatchedParen,

    /// Scanning for a function's matching close paren exhausted the input
    #[error("function call is not closed")]
    UnclosedFunctionCall,

    /// A parsed function name is not in the registry
    #[error("function not defined: {0}")]
    FunctionNotDefined(String),

    /// A `$` with no valid name characters following it
    #[error("invalid variable reference at index {0}")]
    InvalidVariableReference(usize),

    /// The variable resolver returned nothing for a referenced name
    #[error("unable to resolve variable ${0}")]
    UnresolvedVariable(String),

    /// Variable substitution kept producing `$` references past the pass
    /// bound, which means the resolver output refers back to itself
    #[error("variable substitution exceeded {0} passes")]
    RunawaySubstitution(usize),

    /// An operator was applied to operands it cannot interpret
    #[error("invalid operand: {0}")]
    InvalidOperand(String),

    /// Evaluation reached a tree shape it cannot interpret
    #[error("expression is invalid")]
    InvalidExpression,

    /// A function received unusable arguments
    #[error("invalid argument: {0}")]
    Argument(String),

    /// A value that was required to be numeric could not be parsed as one
    #[error("cannot convert '{value}' to a number")]
    NumberCoercion {
        value: String,
        #[source]
        source: std::num::ParseFloatError,
    },
}
