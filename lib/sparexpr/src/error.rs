use crate::registry::FunctionName;
use sparterm::{Term, Variable};

/// An error raised while evaluating an expression.
///
/// Errors from nested function calls are propagated unchanged to the caller.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum EvalError {
    /// The expression references a variable the binding row does not bind
    #[error("The variable {0} is not bound")]
    UnboundVariable(Variable),
    /// No function is registered under this name
    #[error("The function {0} is not registered")]
    UnknownFunction(FunctionName),
    /// The function is registered with another number of arguments
    #[error("The function {name} takes {expected} argument(s) but {actual} were given")]
    ArityMismatch {
        name: FunctionName,
        expected: usize,
        actual: usize,
    },
    /// A term could not be coerced to the kind of value an operation needs
    #[error("Expected {expected} but got '{got_lexical}'")]
    TypeError {
        expected: &'static str,
        got_lexical: String,
    },
    /// The expression tree is nested deeper than the evaluator allows
    #[error("The expression is nested more than {limit} levels deep")]
    TooDeep { limit: usize },
}

impl EvalError {
    /// Builds a [`EvalError::TypeError`] reporting the string value of `term`.
    #[inline]
    pub fn type_error(expected: &'static str, term: &Term) -> Self {
        Self::TypeError {
            expected,
            got_lexical: crate::term::as_string(term),
        }
    }
}
