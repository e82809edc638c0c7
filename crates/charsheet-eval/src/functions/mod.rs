//! Built-in expression functions

pub mod dice;
pub mod logical;
pub mod math;
pub mod text;

use ahash::AHashMap;
use once_cell::sync::Lazy;

use crate::error::EvalResult;
use crate::evaluator::Evaluator;
use crate::value::Value;

/// Function implementation signature.
///
/// A function receives the calling evaluator (for sub-expression
/// evaluation with the same resolver and registries) and its raw argument
/// text, variables already substituted. It splits and evaluates the
/// arguments itself.
pub type FunctionImpl = fn(&Evaluator, &str) -> EvalResult<Value>;

// === Default function map ===
static DEFAULT_FUNCTIONS: Lazy<AHashMap<String, FunctionImpl>> = Lazy::new(|| {
    let mut functions: AHashMap<String, FunctionImpl> = AHashMap::new();
    let mut register = |name: &str, function: FunctionImpl| {
        functions.insert(name.to_string(), function);
    };
    register("abs", math::fn_abs);
    register("cbrt", math::fn_cbrt);
    register("ceil", math::fn_ceil);
    register("dice", dice::fn_dice);
    register("exp", math::fn_exp);
    register("floor", math::fn_floor);
    register("if", logical::fn_if);
    register("log", math::fn_log);
    register("log1p", math::fn_log1p);
    register("log10", math::fn_log10);
    register("max", math::fn_max);
    register("min", math::fn_min);
    register("pow", math::fn_pow);
    register("roll", dice::fn_roll);
    register("round", math::fn_round);
    register("signed", text::fn_signed);
    register("sqrt", math::fn_sqrt);
    functions
});

/// The process-wide default function map. Names are case-sensitive.
pub(crate) fn default_functions() -> &'static AHashMap<String, FunctionImpl> {
    &DEFAULT_FUNCTIONS
}
