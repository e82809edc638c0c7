//! # charsheet-eval
//!
//! Formula expression evaluator for charsheet derived values.
//!
//! Character data files store derived values (height, weight, age, spell
//! levels, attribute bonuses) as textual formulas such as
//! `"roll(dice(1,8,0,1))"` or `"max($st, 10) + 2"`. This crate parses and
//! evaluates those formulas:
//!
//! - infix and unary operators with precedence and parenthesized grouping
//! - named functions with comma-separated argument lists, extensible per
//!   evaluator instance
//! - late-bound `$variable` substitution through a caller-supplied
//!   [`VariableResolver`]
//!
//! Results are numbers or strings; parsing and evaluation are synchronous
//! on the calling thread.
//!
//! ## Example
//!
//! ```rust
//! use charsheet_eval::Evaluator;
//! use std::collections::HashMap;
//!
//! let mut vars = HashMap::new();
//! vars.insert("st".to_string(), "12".to_string());
//!
//! let evaluator = Evaluator::with_resolver(&vars);
//! assert_eq!(evaluator.evaluate_to_number("$st + 1").unwrap(), 13.0);
//! assert_eq!(evaluator.evaluate_to_integer("$st / 5").unwrap(), 2);
//! ```

pub mod args;
pub mod error;
pub mod evaluator;
pub mod functions;
pub mod operator;
pub mod value;

mod ast;
mod parser;
mod scanner;
mod variables;

pub use error::{EvalError, EvalResult};
pub use evaluator::{Evaluator, VariableResolver};
pub use functions::FunctionImpl;
pub use operator::{BinaryImpl, Operator, UnaryImpl};
pub use value::Value;
