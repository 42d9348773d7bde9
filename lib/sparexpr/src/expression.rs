use crate::registry::FunctionName;
use sparterm::{BlankNode, Literal, NamedNode, Term, Variable};
use std::fmt;

/// An expression tree, evaluated against a [`BindingRow`](crate::BindingRow).
///
/// The `Display` implementation returns a SPARQL compatible serialization:
/// ```
/// use sparexpr::{Expression, FunctionName};
/// use sparterm::Variable;
///
/// let expression = Expression::call(
///     FunctionName::builtin("strlen"),
///     [Expression::call(FunctionName::builtin("str"), [Variable::new("place")?.into()])],
/// );
/// assert_eq!(expression.to_string(), "STRLEN(STR(?place))");
/// # Result::<_, Box<dyn std::error::Error>>::Ok(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Expression {
    Variable(Variable),
    Term(Term),
    FunctionCall(FunctionName, Vec<Self>),
}

impl Expression {
    /// Builds a function call.
    #[inline]
    pub fn call(name: impl Into<FunctionName>, arguments: impl IntoIterator<Item = Self>) -> Self {
        Self::FunctionCall(name.into(), arguments.into_iter().collect())
    }

    /// The number of nested levels of this tree. Leaves are at depth 1.
    pub fn depth(&self) -> usize {
        match self {
            Self::Variable(_) | Self::Term(_) => 1,
            Self::FunctionCall(_, arguments) => {
                1 + arguments.iter().map(Self::depth).max().unwrap_or(0)
            }
        }
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Variable(variable) => variable.fmt(f),
            Self::Term(term) => term.fmt(f),
            Self::FunctionCall(name, arguments) => {
                write!(f, "{name}(")?;
                for (i, argument) in arguments.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    argument.fmt(f)?;
                }
                f.write_str(")")
            }
        }
    }
}

impl From<Variable> for Expression {
    #[inline]
    fn from(variable: Variable) -> Self {
        Self::Variable(variable)
    }
}

impl From<Term> for Expression {
    #[inline]
    fn from(term: Term) -> Self {
        Self::Term(term)
    }
}

impl From<NamedNode> for Expression {
    #[inline]
    fn from(node: NamedNode) -> Self {
        Self::Term(node.into())
    }
}

impl From<BlankNode> for Expression {
    #[inline]
    fn from(node: BlankNode) -> Self {
        Self::Term(node.into())
    }
}

impl From<Literal> for Expression {
    #[inline]
    fn from(literal: Literal) -> Self {
        Self::Term(literal.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sparterm::vocab::xsd;

    #[test]
    fn depth() {
        let leaf = Expression::from(Literal::from(1_i64));
        assert_eq!(leaf.depth(), 1);
        let call = Expression::call(
            xsd::DOUBLE,
            [Expression::call(FunctionName::builtin("ABS"), [leaf.clone()]), leaf],
        );
        assert_eq!(call.depth(), 3);
        assert_eq!(Expression::call(FunctionName::builtin("F"), []).depth(), 1);
    }

    #[test]
    fn display_of_iri_call() {
        let expression = Expression::call(xsd::FLOAT, [Literal::from("1").into()]);
        assert_eq!(
            expression.to_string(),
            "<http://www.w3.org/2001/XMLSchema#float>(\"1\")"
        );
    }
}
