//! SPARQL built-in functions and XSD constructor casts.

use crate::coercion::ArgumentKind;
use crate::error::EvalError;
use crate::registry::{FunctionName, FunctionRegistry, FunctionSignature};
use crate::term::{NumericValue, is_numeric, numeric_value};
use oxsdatatypes::{Boolean, Decimal, Double, Float, Integer};
use sparterm::vocab::xsd;
use sparterm::{Literal, NamedNodeRef, Term};
use std::str::FromStr;

type UnaryFn = fn(&Term) -> Result<Term, EvalError>;
type BinaryFn = fn(&Term, &Term) -> Result<Term, EvalError>;

/// Registers the built-in functions in `registry`.
///
/// They are the SPARQL 1.1 term accessors and tests, the string functions `STRLEN`, `UCASE`, `LCASE`,
/// `STRSTARTS`, `STRENDS`, `CONTAINS` and `LANGMATCHES`, the numeric functions `ABS`, `CEIL`,
/// `FLOOR` and `ROUND`, and the `xsd:string`, `xsd:boolean`, `xsd:integer`, `xsd:decimal`,
/// `xsd:float` and `xsd:double` casts.
pub fn register_builtin_functions(registry: FunctionRegistry) -> FunctionRegistry {
    let unary_functions: [(&str, UnaryFn); 15] = [
        ("STR", str_value),
        ("LANG", lang),
        ("DATATYPE", datatype),
        ("ISIRI", is_iri),
        ("ISURI", is_iri),
        ("ISBLANK", is_blank),
        ("ISLITERAL", is_literal),
        ("ISNUMERIC", is_numeric_fn),
        ("STRLEN", strlen),
        ("UCASE", ucase),
        ("LCASE", lcase),
        ("ABS", abs),
        ("CEIL", ceil),
        ("FLOOR", floor),
        ("ROUND", round),
    ];
    let binary_functions: [(&str, BinaryFn); 4] = [
        ("STRSTARTS", strstarts),
        ("STRENDS", strends),
        ("CONTAINS", contains),
        ("SAMETERM", same_term),
    ];
    let casts: [(NamedNodeRef<'static>, UnaryFn); 6] = [
        (xsd::STRING, cast_string),
        (xsd::BOOLEAN, cast_boolean),
        (xsd::INTEGER, cast_integer),
        (xsd::DECIMAL, cast_decimal),
        (xsd::FLOAT, cast_float),
        (xsd::DOUBLE, cast_double),
    ];

    let mut registry = registry;
    for (keyword, function) in unary_functions {
        registry = with_unary(registry, FunctionName::builtin(keyword), function);
    }
    for (keyword, function) in binary_functions {
        registry = with_binary(registry, FunctionName::builtin(keyword), function);
    }
    for (datatype, function) in casts {
        registry = with_unary(registry, datatype.into(), function);
    }
    registry.with_function(
        FunctionName::builtin("LANGMATCHES"),
        FunctionSignature::new([ArgumentKind::Literal, ArgumentKind::Literal]),
        |args| match args {
            [tag, range] => Ok(Literal::from(lang_matches(tag.string()?, range.string()?)).into()),
            _ => Err(arity_mismatch(FunctionName::builtin("LANGMATCHES"), 2, args.len())),
        },
    )
}

fn with_unary(registry: FunctionRegistry, name: FunctionName, function: UnaryFn) -> FunctionRegistry {
    registry.with_function(
        name.clone(),
        FunctionSignature::new([ArgumentKind::Term]),
        move |args| match args {
            [arg] => function(arg.term()?),
            _ => Err(arity_mismatch(name.clone(), 1, args.len())),
        },
    )
}

fn with_binary(
    registry: FunctionRegistry,
    name: FunctionName,
    function: BinaryFn,
) -> FunctionRegistry {
    registry.with_function(
        name.clone(),
        FunctionSignature::new([ArgumentKind::Term, ArgumentKind::Term]),
        move |args| match args {
            [left, right] => function(left.term()?, right.term()?),
            _ => Err(arity_mismatch(name.clone(), 2, args.len())),
        },
    )
}

fn arity_mismatch(name: FunctionName, expected: usize, actual: usize) -> EvalError {
    EvalError::ArityMismatch {
        name,
        expected,
        actual,
    }
}

fn str_value(term: &Term) -> Result<Term, EvalError> {
    match term {
        Term::NamedNode(node) => Ok(Literal::new_simple_literal(node.as_str()).into()),
        Term::Literal(literal) => Ok(Literal::new_simple_literal(literal.value()).into()),
        Term::BlankNode(_) => Err(EvalError::type_error("an IRI or a literal", term)),
    }
}

fn lang(term: &Term) -> Result<Term, EvalError> {
    let Term::Literal(literal) = term else {
        return Err(EvalError::type_error("a literal", term));
    };
    Ok(Literal::new_simple_literal(literal.language().unwrap_or_default()).into())
}

fn datatype(term: &Term) -> Result<Term, EvalError> {
    let Term::Literal(literal) = term else {
        return Err(EvalError::type_error("a literal", term));
    };
    Ok(literal.datatype().into())
}

fn is_iri(term: &Term) -> Result<Term, EvalError> {
    Ok(Literal::from(term.is_named_node()).into())
}

fn is_blank(term: &Term) -> Result<Term, EvalError> {
    Ok(Literal::from(term.is_blank_node()).into())
}

fn is_literal(term: &Term) -> Result<Term, EvalError> {
    Ok(Literal::from(term.is_literal()).into())
}

fn is_numeric_fn(term: &Term) -> Result<Term, EvalError> {
    Ok(Literal::from(is_numeric(term)).into())
}

/// The value and language tag of a simple literal or a language-tagged string.
fn string_literal(term: &Term) -> Result<(&str, Option<&str>), EvalError> {
    match term {
        Term::Literal(literal) if literal.is_plain() => Ok((literal.value(), literal.language())),
        _ => Err(EvalError::type_error("a string literal", term)),
    }
}

fn plain_literal(value: String, language: Option<&str>) -> Term {
    let literal = match language {
        Some(language) => Literal::new_language_tagged_literal_unchecked(value, language),
        None => Literal::new_simple_literal(value),
    };
    literal.into()
}

fn strlen(term: &Term) -> Result<Term, EvalError> {
    let (value, _) = string_literal(term)?;
    let length = i64::try_from(value.chars().count()).unwrap_or(i64::MAX);
    Ok(Literal::from(length).into())
}

fn ucase(term: &Term) -> Result<Term, EvalError> {
    let (value, language) = string_literal(term)?;
    Ok(plain_literal(value.to_uppercase(), language))
}

fn lcase(term: &Term) -> Result<Term, EvalError> {
    let (value, language) = string_literal(term)?;
    Ok(plain_literal(value.to_lowercase(), language))
}

/// Reads two [argument compatible](https://www.w3.org/TR/sparql11-query/#func-arg-compatibility) string literals.
fn compatible_strings<'a>(left: &'a Term, right: &'a Term) -> Result<(&'a str, &'a str), EvalError> {
    let (left_value, left_language) = string_literal(left)?;
    let (right_value, right_language) = string_literal(right)?;
    if right_language.is_none() || left_language == right_language {
        Ok((left_value, right_value))
    } else {
        Err(EvalError::type_error(
            "a string literal compatible with the first argument",
            right,
        ))
    }
}

fn strstarts(left: &Term, right: &Term) -> Result<Term, EvalError> {
    let (value, prefix) = compatible_strings(left, right)?;
    Ok(Literal::from(value.starts_with(prefix)).into())
}

fn strends(left: &Term, right: &Term) -> Result<Term, EvalError> {
    let (value, suffix) = compatible_strings(left, right)?;
    Ok(Literal::from(value.ends_with(suffix)).into())
}

fn contains(left: &Term, right: &Term) -> Result<Term, EvalError> {
    let (value, pattern) = compatible_strings(left, right)?;
    Ok(Literal::from(value.contains(pattern)).into())
}

fn same_term(left: &Term, right: &Term) -> Result<Term, EvalError> {
    Ok(Literal::from(left == right).into())
}

/// [langMatches](https://www.w3.org/TR/sparql11-query/#func-langMatches) with RFC 4647 basic filtering.
fn lang_matches(tag: &str, range: &str) -> bool {
    if range == "*" {
        return !tag.is_empty();
    }
    if tag.len() < range.len() || !tag.is_char_boundary(range.len()) {
        return false;
    }
    let (prefix, rest) = tag.split_at(range.len());
    prefix.eq_ignore_ascii_case(range) && (rest.is_empty() || rest.starts_with('-'))
}

fn overflow(term: &Term) -> EvalError {
    EvalError::type_error("a value within the datatype range", term)
}

fn abs(term: &Term) -> Result<Term, EvalError> {
    let value = match numeric_value(term)? {
        NumericValue::Integer(value) => {
            NumericValue::Integer(value.checked_abs().ok_or_else(|| overflow(term))?)
        }
        NumericValue::Decimal(value) => {
            NumericValue::Decimal(value.checked_abs().ok_or_else(|| overflow(term))?)
        }
        NumericValue::Float(value) => NumericValue::Float(value.abs()),
        NumericValue::Double(value) => NumericValue::Double(value.abs()),
    };
    Ok(value.into_literal().into())
}

fn ceil(term: &Term) -> Result<Term, EvalError> {
    let value = match numeric_value(term)? {
        NumericValue::Integer(value) => NumericValue::Integer(value),
        NumericValue::Decimal(value) => {
            NumericValue::Decimal(value.checked_ceil().ok_or_else(|| overflow(term))?)
        }
        NumericValue::Float(value) => NumericValue::Float(value.ceil()),
        NumericValue::Double(value) => NumericValue::Double(value.ceil()),
    };
    Ok(value.into_literal().into())
}

fn floor(term: &Term) -> Result<Term, EvalError> {
    let value = match numeric_value(term)? {
        NumericValue::Integer(value) => NumericValue::Integer(value),
        NumericValue::Decimal(value) => {
            NumericValue::Decimal(value.checked_floor().ok_or_else(|| overflow(term))?)
        }
        NumericValue::Float(value) => NumericValue::Float(value.floor()),
        NumericValue::Double(value) => NumericValue::Double(value.floor()),
    };
    Ok(value.into_literal().into())
}

fn round(term: &Term) -> Result<Term, EvalError> {
    let value = match numeric_value(term)? {
        NumericValue::Integer(value) => NumericValue::Integer(value),
        NumericValue::Decimal(value) => {
            NumericValue::Decimal(value.checked_round().ok_or_else(|| overflow(term))?)
        }
        NumericValue::Float(value) => NumericValue::Float(value.round()),
        NumericValue::Double(value) => NumericValue::Double(value.round()),
    };
    Ok(value.into_literal().into())
}

/// What a cast reads from its argument.
enum CastSource<'a> {
    Boolean(bool),
    Numeric(NumericValue),
    String(&'a str),
}

fn cast_source<'a>(term: &'a Term, target: &'static str) -> Result<CastSource<'a>, EvalError> {
    if let Term::Literal(literal) = term {
        if literal.datatype() == xsd::STRING {
            return Ok(CastSource::String(literal.value().trim()));
        }
        if literal.datatype() == xsd::BOOLEAN {
            if let Ok(value) = Boolean::from_str(literal.value()) {
                return Ok(CastSource::Boolean(value.into()));
            }
        } else if let Some(value) = NumericValue::parse(literal.value(), literal.datatype()) {
            return Ok(CastSource::Numeric(value));
        }
    }
    Err(EvalError::type_error(target, term))
}

fn cast_string(term: &Term) -> Result<Term, EvalError> {
    match term {
        Term::NamedNode(node) => Ok(Literal::new_simple_literal(node.as_str()).into()),
        Term::Literal(literal) => Ok(Literal::new_simple_literal(literal.value()).into()),
        Term::BlankNode(_) => Err(EvalError::type_error(
            "a value castable to xsd:string",
            term,
        )),
    }
}

fn cast_boolean(term: &Term) -> Result<Term, EvalError> {
    const TARGET: &str = "a value castable to xsd:boolean";
    let value = match cast_source(term, TARGET)? {
        CastSource::Boolean(value) => value,
        CastSource::Numeric(value) => value.is_truthy(),
        CastSource::String(value) => Boolean::from_str(value)
            .map_err(|_| EvalError::type_error(TARGET, term))?
            .into(),
    };
    Ok(Literal::from(value).into())
}

fn cast_integer(term: &Term) -> Result<Term, EvalError> {
    const TARGET: &str = "a value castable to xsd:integer";
    let error = || EvalError::type_error(TARGET, term);
    let value = match cast_source(term, TARGET)? {
        CastSource::Boolean(value) => Integer::from(value),
        CastSource::Numeric(NumericValue::Integer(value)) => value,
        CastSource::Numeric(NumericValue::Decimal(value)) => {
            Integer::try_from(value).map_err(|_| error())?
        }
        CastSource::Numeric(NumericValue::Float(value)) => {
            Integer::try_from(value).map_err(|_| error())?
        }
        CastSource::Numeric(NumericValue::Double(value)) => {
            Integer::try_from(value).map_err(|_| error())?
        }
        CastSource::String(value) => Integer::from_str(value).map_err(|_| error())?,
    };
    Ok(NumericValue::Integer(value).into_literal().into())
}

fn cast_decimal(term: &Term) -> Result<Term, EvalError> {
    const TARGET: &str = "a value castable to xsd:decimal";
    let error = || EvalError::type_error(TARGET, term);
    let value = match cast_source(term, TARGET)? {
        CastSource::Boolean(value) => Decimal::from(value),
        CastSource::Numeric(NumericValue::Integer(value)) => Decimal::from(value),
        CastSource::Numeric(NumericValue::Decimal(value)) => value,
        CastSource::Numeric(NumericValue::Float(value)) => {
            Decimal::try_from(value).map_err(|_| error())?
        }
        CastSource::Numeric(NumericValue::Double(value)) => {
            Decimal::try_from(value).map_err(|_| error())?
        }
        CastSource::String(value) => Decimal::from_str(value).map_err(|_| error())?,
    };
    Ok(NumericValue::Decimal(value).into_literal().into())
}

fn cast_float(term: &Term) -> Result<Term, EvalError> {
    const TARGET: &str = "a value castable to xsd:float";
    let value = match cast_source(term, TARGET)? {
        CastSource::Boolean(value) => Float::from(Boolean::from(value)),
        CastSource::Numeric(NumericValue::Integer(value)) => Float::from(value),
        CastSource::Numeric(NumericValue::Decimal(value)) => Float::from(value),
        CastSource::Numeric(NumericValue::Float(value)) => value,
        CastSource::Numeric(NumericValue::Double(value)) => Float::from(value),
        CastSource::String(value) => match NumericValue::parse(value, xsd::FLOAT) {
            Some(NumericValue::Float(value)) => value,
            _ => return Err(EvalError::type_error(TARGET, term)),
        },
    };
    Ok(NumericValue::Float(value).into_literal().into())
}

fn cast_double(term: &Term) -> Result<Term, EvalError> {
    const TARGET: &str = "a value castable to xsd:double";
    let value = match cast_source(term, TARGET)? {
        CastSource::Boolean(value) => Double::from(Boolean::from(value)),
        CastSource::Numeric(NumericValue::Integer(value)) => Double::from(value),
        CastSource::Numeric(NumericValue::Decimal(value)) => Double::from(value),
        CastSource::Numeric(NumericValue::Float(value)) => Double::from(value),
        CastSource::Numeric(NumericValue::Double(value)) => value,
        CastSource::String(value) => match NumericValue::parse(value, xsd::DOUBLE) {
            Some(NumericValue::Double(value)) => value,
            _ => return Err(EvalError::type_error(TARGET, term)),
        },
    };
    Ok(NumericValue::Double(value).into_literal().into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coercion::{NativeValue, coerce_arg};
    use sparterm::{BlankNode, NamedNode};

    fn call(name: impl Into<FunctionName>, args: &[Term]) -> Result<Term, EvalError> {
        let registry = FunctionRegistry::with_builtins();
        let function = registry.lookup(&name.into(), args.len())?;
        let args = args
            .iter()
            .zip(function.signature().arguments())
            .map(|(arg, kind)| coerce_arg(arg, *kind))
            .collect::<Result<Vec<_>, _>>()?;
        function.call(&args)
    }

    fn builtin(keyword: &str, args: &[Term]) -> Result<Term, EvalError> {
        call(FunctionName::builtin(keyword), args)
    }

    fn typed(value: &str, datatype: NamedNodeRef<'_>) -> Term {
        Literal::new_typed_literal(value, datatype).into()
    }

    fn tagged(value: &str, language: &str) -> Term {
        Literal::new_language_tagged_literal_unchecked(value, language).into()
    }

    #[test]
    fn str_of_each_kind() {
        let iri = Term::from(NamedNode::new_unchecked("http://example.com/"));
        assert_eq!(
            builtin("str", &[iri]).unwrap(),
            Literal::from("http://example.com/").into()
        );
        assert_eq!(
            builtin("STR", &[tagged("chat", "fr")]).unwrap(),
            Literal::from("chat").into()
        );
        builtin("STR", &[BlankNode::new_unchecked("b").into()]).unwrap_err();
    }

    #[test]
    fn lang_and_datatype() {
        assert_eq!(
            builtin("LANG", &[tagged("chat", "fr")]).unwrap(),
            Literal::from("fr").into()
        );
        assert_eq!(
            builtin("LANG", &[Literal::from("chat").into()]).unwrap(),
            Literal::from("").into()
        );
        assert_eq!(
            builtin("DATATYPE", &[Literal::from(1_i64).into()]).unwrap(),
            xsd::INTEGER.into()
        );
        builtin("DATATYPE", &[BlankNode::new_unchecked("b").into()]).unwrap_err();
    }

    #[test]
    fn term_tests() {
        let iri = Term::from(NamedNode::new_unchecked("http://example.com/"));
        let yes = Term::from(Literal::from(true));
        let no = Term::from(Literal::from(false));
        assert_eq!(builtin("ISIRI", &[iri.clone()]).unwrap(), yes);
        assert_eq!(builtin("ISURI", &[iri.clone()]).unwrap(), yes);
        assert_eq!(builtin("ISBLANK", &[iri.clone()]).unwrap(), no);
        assert_eq!(builtin("ISLITERAL", &[iri]).unwrap(), no);
        assert_eq!(
            builtin("ISNUMERIC", &[typed("12", xsd::INT)]).unwrap(),
            yes
        );
        assert_eq!(
            builtin("ISNUMERIC", &[typed("1.2", xsd::INT)]).unwrap(),
            no
        );
    }

    #[test]
    fn string_functions() {
        assert_eq!(
            builtin("STRLEN", &[Literal::from("chât").into()]).unwrap(),
            Literal::from(4_i64).into()
        );
        assert_eq!(
            builtin("UCASE", &[tagged("chat", "fr")]).unwrap(),
            tagged("CHAT", "fr")
        );
        assert_eq!(
            builtin("LCASE", &[Literal::from("ABC").into()]).unwrap(),
            Literal::from("abc").into()
        );
        builtin("STRLEN", &[typed("1", xsd::INTEGER)]).unwrap_err();
    }

    #[test]
    fn argument_compatibility() {
        assert_eq!(
            builtin(
                "STRSTARTS",
                &[tagged("foobar", "en"), Literal::from("foo").into()]
            )
            .unwrap(),
            Literal::from(true).into()
        );
        assert_eq!(
            builtin("STRENDS", &[tagged("foobar", "en"), tagged("bar", "en")]).unwrap(),
            Literal::from(true).into()
        );
        assert_eq!(
            builtin(
                "CONTAINS",
                &[Literal::from("foobar").into(), Literal::from("x").into()]
            )
            .unwrap(),
            Literal::from(false).into()
        );
        builtin("CONTAINS", &[Literal::from("foobar").into(), tagged("o", "en")]).unwrap_err();
        builtin("CONTAINS", &[tagged("foobar", "fr"), tagged("o", "en")]).unwrap_err();
    }

    #[test]
    fn same_term_is_strict() {
        assert_eq!(
            builtin(
                "SAMETERM",
                &[typed("1", xsd::INTEGER), typed("01", xsd::INTEGER)]
            )
            .unwrap(),
            Literal::from(false).into()
        );
    }

    #[test]
    fn lang_matches_basic_filtering() {
        assert!(lang_matches("fr-be", "fr"));
        assert!(lang_matches("FR", "fr"));
        assert!(!lang_matches("fra", "fr"));
        assert!(lang_matches("en", "*"));
        assert!(!lang_matches("", "*"));
        assert!(!lang_matches("é", "e"));
        assert_eq!(
            builtin(
                "LANGMATCHES",
                &[Literal::from("en-US").into(), Literal::from("en").into()]
            )
            .unwrap(),
            Literal::from(true).into()
        );
        assert_eq!(
            builtin("LANGMATCHES", &[Literal::from("fr").into(), Literal::from("en").into()])
                .unwrap(),
            Literal::from(false).into()
        );
        builtin(
            "LANGMATCHES",
            &[NamedNode::new_unchecked("http://example.com/").into(), Literal::from("*").into()],
        )
        .unwrap_err();
    }

    #[test]
    fn langmatches_reads_coerced_strings() {
        let registry = FunctionRegistry::with_builtins();
        let function = registry
            .lookup(&FunctionName::builtin("LANGMATCHES"), 2)
            .unwrap();
        let uncoerced = [
            NativeValue::Term(Literal::from("en-US").into()),
            NativeValue::Term(Literal::from("en").into()),
        ];
        function.call(&uncoerced).unwrap_err();
        let coerced = [
            NativeValue::String("en-US".into()),
            NativeValue::String("en".into()),
        ];
        assert_eq!(function.call(&coerced).unwrap(), Literal::from(true).into());
    }

    #[test]
    fn numeric_functions_keep_the_type() {
        assert_eq!(
            builtin("ABS", &[typed("-3", xsd::INTEGER)]).unwrap(),
            typed("3", xsd::INTEGER)
        );
        assert_eq!(
            builtin("ABS", &[typed("-1.5", xsd::DOUBLE)]).unwrap(),
            typed("1.5", xsd::DOUBLE)
        );
        assert_eq!(
            builtin("CEIL", &[typed("1.5", xsd::DOUBLE)]).unwrap(),
            typed("2", xsd::DOUBLE)
        );
        assert_eq!(
            builtin("FLOOR", &[typed("-1.5", xsd::FLOAT)]).unwrap(),
            typed("-2", xsd::FLOAT)
        );
        assert_eq!(
            builtin("ROUND", &[typed("7", xsd::INTEGER)]).unwrap(),
            typed("7", xsd::INTEGER)
        );
        builtin("ABS", &[Literal::from(true).into()]).unwrap_err();
    }

    #[test]
    fn casts() {
        assert_eq!(
            call(xsd::INTEGER, &[Literal::from(" 42 ").into()]).unwrap(),
            typed("42", xsd::INTEGER)
        );
        assert_eq!(
            call(xsd::INTEGER, &[typed("3.9", xsd::DOUBLE)]).unwrap(),
            typed("3", xsd::INTEGER)
        );
        assert_eq!(
            call(xsd::DOUBLE, &[Literal::from(true).into()]).unwrap(),
            typed("1", xsd::DOUBLE)
        );
        assert_eq!(
            call(xsd::FLOAT, &[Literal::from("INF").into()]).unwrap(),
            typed("INF", xsd::FLOAT)
        );
        assert_eq!(
            call(xsd::BOOLEAN, &[typed("0", xsd::INTEGER)]).unwrap(),
            Literal::from(false).into()
        );
        assert_eq!(
            call(
                xsd::STRING,
                &[NamedNode::new_unchecked("http://example.com/").into()]
            )
            .unwrap(),
            Literal::from("http://example.com/").into()
        );
        call(xsd::INTEGER, &[Literal::from("1.5").into()]).unwrap_err();
        call(xsd::DECIMAL, &[NamedNode::new_unchecked("http://example.com/").into()])
            .unwrap_err();
        call(xsd::BOOLEAN, &[Literal::from("yes").into()]).unwrap_err();
    }

    #[test]
    fn fixed_arity() {
        assert_eq!(
            builtin("STR", &[]).unwrap_err(),
            EvalError::ArityMismatch {
                name: FunctionName::builtin("STR"),
                expected: 1,
                actual: 0,
            }
        );
    }
}
