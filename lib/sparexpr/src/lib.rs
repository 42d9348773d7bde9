#![doc = include_str!("../README.md")]
#![doc(test(attr(deny(warnings))))]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

mod binding;
mod builtins;
mod coercion;
mod error;
mod eval;
mod expression;
mod registry;
mod term;
mod trace;

pub use crate::binding::BindingRow;
pub use crate::builtins::register_builtin_functions;
pub use crate::coercion::{ArgumentKind, NativeValue, coerce_arg, deg_to_rad};
pub use crate::error::EvalError;
pub use crate::eval::{ExpressionEvaluator, MAX_EXPRESSION_DEPTH};
pub use crate::expression::Expression;
pub use crate::registry::{
    FunctionImpl, FunctionName, FunctionNameParseError, FunctionRegistry, FunctionSignature,
    RegisteredFunction,
};
pub use crate::term::{
    NumericValue, as_numeric, as_string, effective_boolean_value, is_numeric, is_numeric_datatype,
    numeric_value,
};
pub use crate::trace::{
    MemorySink, NoopSink, TRACE_TARGET, TraceContext, TraceEvent, TraceLevel, TraceSink,
    TracingSink,
};
