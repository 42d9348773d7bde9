//! SPARQL value semantics of [`Term`]s: effective boolean value, numeric and string views.

use crate::error::EvalError;
use oxsdatatypes::{Boolean, Decimal, Double, Float, Integer};
use sparterm::vocab::xsd;
use sparterm::{Literal, NamedNodeRef, Term};
use std::str::FromStr;

/// Value bounds of the `xsd:integer` derived datatypes.
///
/// Values outside of the `i64` range are not supported.
const INTEGER_BOUNDS: [(NamedNodeRef<'static>, i64, i64); 12] = [
    (xsd::BYTE, -128, 127),
    (xsd::SHORT, -32_768, 32_767),
    (xsd::INT, -2_147_483_648, 2_147_483_647),
    (xsd::LONG, i64::MIN, i64::MAX),
    (xsd::UNSIGNED_BYTE, 0, 255),
    (xsd::UNSIGNED_SHORT, 0, 65_535),
    (xsd::UNSIGNED_INT, 0, 4_294_967_295),
    (xsd::UNSIGNED_LONG, 0, i64::MAX),
    (xsd::POSITIVE_INTEGER, 1, i64::MAX),
    (xsd::NON_NEGATIVE_INTEGER, 0, i64::MAX),
    (xsd::NEGATIVE_INTEGER, i64::MIN, -1),
    (xsd::NON_POSITIVE_INTEGER, i64::MIN, 0),
];

/// A numeric literal value that keeps track of its XSD type.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NumericValue {
    Integer(Integer),
    Decimal(Decimal),
    Float(Float),
    Double(Double),
}

impl NumericValue {
    /// Parses `lexical` strictly following the lexical space of `datatype`.
    ///
    /// Returns `None` if `datatype` is not numeric or if `lexical` is not in its lexical space.
    ///
    /// ```
    /// use sparexpr::NumericValue;
    /// use sparterm::vocab::xsd;
    ///
    /// assert!(NumericValue::parse("42", xsd::INTEGER).is_some());
    /// assert!(NumericValue::parse("1.5", xsd::INTEGER).is_none());
    /// assert!(NumericValue::parse("300", xsd::BYTE).is_none());
    /// assert!(NumericValue::parse("-INF", xsd::DOUBLE).is_some());
    /// ```
    pub fn parse(lexical: &str, datatype: NamedNodeRef<'_>) -> Option<Self> {
        if datatype == xsd::INTEGER {
            Integer::from_str(lexical).ok().map(Self::Integer)
        } else if datatype == xsd::DECIMAL {
            Decimal::from_str(lexical).ok().map(Self::Decimal)
        } else if datatype == xsd::DOUBLE {
            parse_double(lexical).map(Self::Double)
        } else if datatype == xsd::FLOAT {
            if !is_floating_point_lexical(lexical) {
                return None;
            }
            Float::from_str(lexical).ok().map(Self::Float)
        } else {
            let &(_, min, max) = INTEGER_BOUNDS.iter().find(|(t, _, _)| *t == datatype)?;
            let value = Integer::from_str(lexical).ok()?;
            (min..=max)
                .contains(&i64::from(value))
                .then_some(Self::Integer(value))
        }
    }

    #[inline]
    pub fn to_f64(self) -> f64 {
        match self {
            Self::Integer(value) => Double::from(value).into(),
            Self::Decimal(value) => Double::from(value).into(),
            Self::Float(value) => value.into(),
            Self::Double(value) => value.into(),
        }
    }

    /// False iff the value is zero or NaN.
    #[inline]
    pub fn is_truthy(self) -> bool {
        let value = match self {
            Self::Integer(value) => Boolean::from(value),
            Self::Decimal(value) => Boolean::from(value),
            Self::Float(value) => Boolean::from(value),
            Self::Double(value) => Boolean::from(value),
        };
        value.into()
    }

    /// Serializes back to a typed literal with the canonical XSD datatype.
    pub fn into_literal(self) -> Literal {
        match self {
            Self::Integer(value) => Literal::new_typed_literal(value.to_string(), xsd::INTEGER),
            Self::Decimal(value) => Literal::new_typed_literal(value.to_string(), xsd::DECIMAL),
            Self::Float(value) => Literal::new_typed_literal(value.to_string(), xsd::FLOAT),
            Self::Double(value) => Literal::new_typed_literal(value.to_string(), xsd::DOUBLE),
        }
    }
}

/// Checks if `datatype` is one of the numeric XSD datatypes SPARQL operates on.
pub fn is_numeric_datatype(datatype: NamedNodeRef<'_>) -> bool {
    [xsd::INTEGER, xsd::DECIMAL, xsd::FLOAT, xsd::DOUBLE]
        .into_iter()
        .chain(xsd::DERIVED_INTEGER_TYPES)
        .any(|t| t == datatype)
}

/// Computes the [effective boolean value](https://www.w3.org/TR/sparql11-query/#ebv) of a term.
///
/// Boolean and numeric literals with an invalid lexical form are `false`.
/// IRIs, blank nodes, language-tagged strings and literals of other datatypes are type errors.
///
/// ```
/// use sparexpr::effective_boolean_value;
/// use sparterm::{Literal, NamedNode};
///
/// assert!(effective_boolean_value(&Literal::from("a").into())?);
/// assert!(!effective_boolean_value(&Literal::from(0.0).into())?);
/// assert!(effective_boolean_value(&NamedNode::new("http://example.com")?.into()).is_err());
/// # Result::<_, Box<dyn std::error::Error>>::Ok(())
/// ```
pub fn effective_boolean_value(term: &Term) -> Result<bool, EvalError> {
    if let Term::Literal(literal) = term {
        let datatype = literal.datatype();
        if datatype == xsd::BOOLEAN {
            return Ok(Boolean::from_str(literal.value()).is_ok_and(bool::from));
        }
        if datatype == xsd::STRING {
            return Ok(!literal.value().is_empty());
        }
        if is_numeric_datatype(datatype) {
            return Ok(NumericValue::parse(literal.value(), datatype)
                .is_some_and(NumericValue::is_truthy));
        }
    }
    Err(EvalError::type_error("a boolean, numeric or string literal", term))
}

/// Reads a term as a typed numeric value.
///
/// Simple literals are read using the `xsd:double` lexical space.
pub fn numeric_value(term: &Term) -> Result<NumericValue, EvalError> {
    if let Term::Literal(literal) = term {
        let value = if literal.datatype() == xsd::STRING {
            parse_double(literal.value()).map(NumericValue::Double)
        } else {
            NumericValue::parse(literal.value(), literal.datatype())
        };
        if let Some(value) = value {
            return Ok(value);
        }
    }
    Err(EvalError::type_error("a numeric literal", term))
}

/// Reads a term as a number.
///
/// ```
/// use sparexpr::as_numeric;
/// use sparterm::Literal;
/// use sparterm::vocab::xsd;
///
/// assert_eq!(as_numeric(&Literal::new_typed_literal("38.898", xsd::DOUBLE).into())?, 38.898);
/// assert_eq!(as_numeric(&Literal::from("-77.037").into())?, -77.037);
/// assert!(as_numeric(&Literal::new_typed_literal("1.5", xsd::INTEGER).into()).is_err());
/// # Result::<_, Box<dyn std::error::Error>>::Ok(())
/// ```
#[inline]
pub fn as_numeric(term: &Term) -> Result<f64, EvalError> {
    numeric_value(term).map(NumericValue::to_f64)
}

/// The string value of a term: the IRI of a named node, the lexical form of a literal
/// or the label of a blank node.
#[inline]
pub fn as_string(term: &Term) -> String {
    string_value(term).to_owned()
}

pub(crate) fn string_value(term: &Term) -> &str {
    match term {
        Term::NamedNode(node) => node.as_str(),
        Term::BlankNode(node) => node.as_str(),
        Term::Literal(literal) => literal.value(),
    }
}

/// Checks if the term is a numeric literal with a valid lexical form.
pub fn is_numeric(term: &Term) -> bool {
    matches!(term, Term::Literal(literal) if NumericValue::parse(literal.value(), literal.datatype()).is_some())
}

fn parse_double(lexical: &str) -> Option<Double> {
    if !is_floating_point_lexical(lexical) {
        return None;
    }
    Double::from_str(lexical).ok()
}

/// Restricts the Rust float syntax to the XSD one (no `inf`, `infinity` or `nan` spellings).
fn is_floating_point_lexical(lexical: &str) -> bool {
    matches!(lexical, "INF" | "+INF" | "-INF" | "NaN")
        || (lexical.bytes().any(|b| b.is_ascii_digit())
            && lexical
                .bytes()
                .all(|b| b.is_ascii_digit() || matches!(b, b'+' | b'-' | b'.' | b'e' | b'E')))
}
