use crate::binding::BindingRow;
use crate::coercion::{NativeValue, coerce_arg};
use crate::error::EvalError;
use crate::expression::Expression;
use crate::registry::{FunctionName, FunctionRegistry};
use crate::term::effective_boolean_value;
use crate::trace::{NoopSink, TraceLevel, TraceSink};
use sparterm::{Term, TermExt};
use std::fmt;
use std::sync::Arc;

/// The default maximal nesting of an [`Expression`] tree.
pub const MAX_EXPRESSION_DEPTH: usize = 128;

/// Evaluates [`Expression`]s against [`BindingRow`]s.
///
/// Functions are resolved in the [`FunctionRegistry`] given at construction.
/// Evaluation is a single recursive pass over the tree: function arguments are evaluated from left to right
/// and the first error is returned unchanged to the caller.
///
/// ```
/// use sparexpr::{BindingRow, Expression, ExpressionEvaluator, FunctionName, FunctionRegistry};
/// use sparterm::{Literal, Variable};
/// use std::sync::Arc;
///
/// let evaluator = ExpressionEvaluator::new(Arc::new(FunctionRegistry::with_builtins()));
/// let name = Variable::new("name")?;
/// let row = BindingRow::from_iter([(name.clone(), Literal::from("Paris").into())]);
/// let expression = Expression::call(FunctionName::builtin("STRLEN"), [name.into()]);
/// assert_eq!(evaluator.evaluate(&expression, &row)?, Literal::from(5).into());
/// # Result::<_, Box<dyn std::error::Error>>::Ok(())
/// ```
#[derive(Clone)]
pub struct ExpressionEvaluator {
    registry: Arc<FunctionRegistry>,
    sink: Arc<dyn TraceSink>,
    max_depth: usize,
}

impl ExpressionEvaluator {
    pub fn new(registry: Arc<FunctionRegistry>) -> Self {
        Self {
            registry,
            sink: Arc::new(NoopSink),
            max_depth: MAX_EXPRESSION_DEPTH,
        }
    }

    /// Reports the evaluation steps to `sink`.
    #[inline]
    #[must_use]
    pub fn with_trace_sink(mut self, sink: Arc<dyn TraceSink>) -> Self {
        self.sink = sink;
        self
    }

    /// Sets the maximal nesting of the evaluated trees.
    ///
    /// Deeper trees fail with [`EvalError::TooDeep`].
    #[inline]
    #[must_use]
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    #[inline]
    pub fn registry(&self) -> &FunctionRegistry {
        &self.registry
    }

    pub fn evaluate(&self, expression: &Expression, row: &BindingRow) -> Result<Term, EvalError> {
        self.eval(expression, row, 1)
    }

    /// Evaluates the expression and returns its [effective boolean value](https://www.w3.org/TR/sparql11-query/#ebv).
    pub fn evaluate_effective_boolean_value(
        &self,
        expression: &Expression,
        row: &BindingRow,
    ) -> Result<bool, EvalError> {
        let term = self.evaluate(expression, row)?;
        effective_boolean_value(&term).inspect_err(|e| self.report_error(expression, e))
    }

    /// Evaluates the expression as a `FILTER` condition: errors are considered as `false`.
    pub fn evaluate_filter(&self, expression: &Expression, row: &BindingRow) -> bool {
        self.evaluate_effective_boolean_value(expression, row)
            .unwrap_or(false)
    }

    fn eval(
        &self,
        expression: &Expression,
        row: &BindingRow,
        depth: usize,
    ) -> Result<Term, EvalError> {
        if depth > self.max_depth {
            let error = EvalError::TooDeep {
                limit: self.max_depth,
            };
            self.report_error(expression, &error);
            return Err(error);
        }
        match expression {
            Expression::Variable(variable) => {
                let Some(term) = row.get(variable) else {
                    let error = EvalError::UnboundVariable(variable.clone());
                    self.report_error(expression, &error);
                    return Err(error);
                };
                self.report_term(term);
                Ok(term.clone())
            }
            Expression::Term(term) => {
                self.report_term(term);
                Ok(term.clone())
            }
            Expression::FunctionCall(name, arguments) => {
                let arguments = arguments
                    .iter()
                    .map(|argument| self.eval(argument, row, depth + 1))
                    .collect::<Result<Vec<_>, _>>()?;
                self.call(expression, name, &arguments)
            }
        }
    }

    fn call(
        &self,
        expression: &Expression,
        name: &FunctionName,
        arguments: &[Term],
    ) -> Result<Term, EvalError> {
        let function = self
            .registry
            .lookup(name, arguments.len())
            .inspect_err(|e| self.report_error(expression, e))?;
        if self.sink.enabled(TraceLevel::Debug) {
            self.sink.emit(
                TraceLevel::Debug,
                "found function",
                &[
                    ("function", name),
                    ("signature", function.signature()),
                ],
            );
        }
        let values = arguments
            .iter()
            .zip(function.signature().arguments())
            .enumerate()
            .map(|(i, (term, kind))| {
                let value = coerce_arg(term, *kind)?;
                if self.sink.enabled(TraceLevel::Trace) {
                    self.sink.emit(
                        TraceLevel::Trace,
                        "coerced argument",
                        &[("index", &i), ("kind", kind), ("value", &value)],
                    );
                }
                Ok(value)
            })
            .collect::<Result<Vec<NativeValue>, EvalError>>()
            .inspect_err(|e| self.report_error(expression, e))?;
        let result = function
            .call(&values)
            .inspect_err(|e| self.report_error(expression, e))?;
        if self.sink.enabled(TraceLevel::Debug) {
            self.sink.emit(
                TraceLevel::Debug,
                "function returned",
                &[("function", name), ("result", &result)],
            );
        }
        Ok(result)
    }

    fn report_term(&self, term: &Term) {
        if self.sink.enabled(TraceLevel::Trace) {
            self.sink.emit(
                TraceLevel::Trace,
                "term",
                &[("kind", &term.kind()), ("term", term)],
            );
        }
    }

    fn report_error(&self, expression: &Expression, error: &EvalError) {
        if self.sink.enabled(TraceLevel::Warn) {
            self.sink.emit(
                TraceLevel::Warn,
                "evaluation failed",
                &[("expression", expression), ("error", error)],
            );
        }
    }
}

impl fmt::Debug for ExpressionEvaluator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExpressionEvaluator")
            .field("registry", &self.registry)
            .field("max_depth", &self.max_depth)
            .finish_non_exhaustive()
    }
}
