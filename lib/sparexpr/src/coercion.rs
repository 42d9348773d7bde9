use crate::error::EvalError;
use crate::term::{as_numeric, as_string, effective_boolean_value};
use sparterm::Term;
use std::fmt;

/// The kind of value a function expects for one of its arguments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArgumentKind {
    /// The term itself, without coercion
    Term,
    /// A number, read with [`as_numeric`](crate::as_numeric)
    Numeric,
    /// The string value of any term, read with [`as_string`](crate::as_string)
    String,
    /// The lexical form of a literal, IRIs and blank nodes are rejected
    Literal,
    /// The effective boolean value of the term
    Boolean,
}

impl ArgumentKind {
    fn description(self) -> &'static str {
        match self {
            Self::Term => "a term",
            Self::Numeric => "a numeric value",
            Self::String => "a string value",
            Self::Literal => "a literal",
            Self::Boolean => "a boolean value",
        }
    }
}

impl fmt::Display for ArgumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Term => "term",
            Self::Numeric => "numeric",
            Self::String => "string",
            Self::Literal => "literal",
            Self::Boolean => "boolean",
        })
    }
}

/// An argument value after coercion, as given to function implementations.
#[derive(Debug, Clone, PartialEq)]
pub enum NativeValue {
    Term(Term),
    Numeric(f64),
    String(String),
    Boolean(bool),
}

impl NativeValue {
    /// The coerced number, or a type error if this value has another kind.
    #[inline]
    pub fn numeric(&self) -> Result<f64, EvalError> {
        if let Self::Numeric(value) = self {
            Ok(*value)
        } else {
            Err(self.mismatch(ArgumentKind::Numeric))
        }
    }

    #[inline]
    pub fn string(&self) -> Result<&str, EvalError> {
        if let Self::String(value) = self {
            Ok(value)
        } else {
            Err(self.mismatch(ArgumentKind::String))
        }
    }

    #[inline]
    pub fn boolean(&self) -> Result<bool, EvalError> {
        if let Self::Boolean(value) = self {
            Ok(*value)
        } else {
            Err(self.mismatch(ArgumentKind::Boolean))
        }
    }

    #[inline]
    pub fn term(&self) -> Result<&Term, EvalError> {
        if let Self::Term(value) = self {
            Ok(value)
        } else {
            Err(self.mismatch(ArgumentKind::Term))
        }
    }

    fn mismatch(&self, expected: ArgumentKind) -> EvalError {
        EvalError::TypeError {
            expected: expected.description(),
            got_lexical: self.to_string(),
        }
    }
}

impl fmt::Display for NativeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Term(term) => term.fmt(f),
            Self::Numeric(value) => value.fmt(f),
            Self::String(value) => f.write_str(value),
            Self::Boolean(value) => value.fmt(f),
        }
    }
}

/// Coerces a term to the value kind a function declared for the argument.
///
/// ```
/// use sparexpr::{ArgumentKind, NativeValue, coerce_arg};
/// use sparterm::{Literal, NamedNode};
///
/// assert_eq!(
///     coerce_arg(&Literal::from("38.898").into(), ArgumentKind::Numeric)?,
///     NativeValue::Numeric(38.898)
/// );
/// assert!(coerce_arg(&NamedNode::new("http://example.com")?.into(), ArgumentKind::Literal).is_err());
/// # Result::<_, Box<dyn std::error::Error>>::Ok(())
/// ```
pub fn coerce_arg(term: &Term, kind: ArgumentKind) -> Result<NativeValue, EvalError> {
    Ok(match kind {
        ArgumentKind::Term => NativeValue::Term(term.clone()),
        ArgumentKind::Numeric => NativeValue::Numeric(as_numeric(term)?),
        ArgumentKind::String => NativeValue::String(as_string(term)),
        ArgumentKind::Literal => {
            let Term::Literal(literal) = term else {
                return Err(EvalError::type_error(kind.description(), term));
            };
            NativeValue::String(literal.value().to_owned())
        }
        ArgumentKind::Boolean => NativeValue::Boolean(effective_boolean_value(term)?),
    })
}

/// Converts an angle from degrees to radians.
#[inline]
pub fn deg_to_rad(degrees: f64) -> f64 {
    degrees.to_radians()
}

#[cfg(test)]
mod tests {
    use super::*;
    use sparterm::vocab::xsd;
    use sparterm::{BlankNode, Literal, NamedNode};
    use std::f64::consts::PI;

    #[test]
    fn term_kind_keeps_the_term() {
        let term = Term::from(BlankNode::new_unchecked("b"));
        assert_eq!(
            coerce_arg(&term, ArgumentKind::Term).unwrap(),
            NativeValue::Term(term)
        );
    }

    #[test]
    fn numeric_kind_is_strict() {
        let term = Literal::new_typed_literal("1.5", xsd::INTEGER).into();
        assert_eq!(
            coerce_arg(&term, ArgumentKind::Numeric),
            Err(EvalError::TypeError {
                expected: "a numeric literal",
                got_lexical: "1.5".into()
            })
        );
    }

    #[test]
    fn string_and_literal_kinds() {
        let iri = Term::from(NamedNode::new_unchecked("http://example.com/"));
        assert_eq!(
            coerce_arg(&iri, ArgumentKind::String).unwrap(),
            NativeValue::String("http://example.com/".into())
        );
        coerce_arg(&iri, ArgumentKind::Literal).unwrap_err();
        assert_eq!(
            coerce_arg(&Literal::from(3_i64).into(), ArgumentKind::Literal).unwrap(),
            NativeValue::String("3".into())
        );
    }

    #[test]
    fn boolean_kind_uses_ebv() {
        assert_eq!(
            coerce_arg(&Literal::from("").into(), ArgumentKind::Boolean).unwrap(),
            NativeValue::Boolean(false)
        );
    }

    #[test]
    fn accessors_report_mismatches() {
        let value = NativeValue::String("north".into());
        assert_eq!(value.string().unwrap(), "north");
        assert_eq!(
            value.numeric(),
            Err(EvalError::TypeError {
                expected: "a numeric value",
                got_lexical: "north".into()
            })
        );
        value.term().unwrap_err();
        value.boolean().unwrap_err();
    }

    #[test]
    fn degrees_to_radians() {
        assert!((deg_to_rad(180.) - PI).abs() < 1e-15);
        assert!((deg_to_rad(-90.) + PI / 2.).abs() < 1e-15);
        assert_eq!(deg_to_rad(0.), 0.);
    }
}
