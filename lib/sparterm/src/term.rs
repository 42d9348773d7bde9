use oxrdf::{Literal, NamedNodeRef, Term};
use std::cmp::Ordering;
use std::fmt;

/// The kind of a [`Term`], without its content.
///
/// Its `Display` output is the name used in error messages and traces:
/// ```
/// use sparterm::{BlankNode, Term, TermExt, TermKind};
///
/// let term = Term::from(BlankNode::new("b")?);
/// assert_eq!(term.kind(), TermKind::BlankNode);
/// assert_eq!(term.kind().to_string(), "blank node");
/// # Result::<_, Box<dyn std::error::Error>>::Ok(())
/// ```
#[derive(Eq, PartialEq, Ord, PartialOrd, Debug, Clone, Copy, Hash)]
pub enum TermKind {
    BlankNode,
    NamedNode,
    Literal,
}

impl fmt::Display for TermKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::NamedNode => "IRI",
            Self::BlankNode => "blank node",
            Self::Literal => "literal",
        })
    }
}

/// Accessors on [`Term`] used during expression evaluation.
pub trait TermExt {
    fn kind(&self) -> TermKind;

    /// The datatype of this term if it is a literal.
    fn datatype(&self) -> Option<NamedNodeRef<'_>>;
}

impl TermExt for Term {
    #[inline]
    fn kind(&self) -> TermKind {
        match self {
            Self::NamedNode(_) => TermKind::NamedNode,
            Self::BlankNode(_) => TermKind::BlankNode,
            Self::Literal(_) => TermKind::Literal,
        }
    }

    #[inline]
    fn datatype(&self) -> Option<NamedNodeRef<'_>> {
        if let Self::Literal(literal) = self {
            Some(literal.datatype())
        } else {
            None
        }
    }
}

/// Total order on terms following the SPARQL `ORDER BY` conventions.
///
/// Blank nodes come first, then IRIs, then literals.
/// Terms of the same kind are ordered by their identifier, IRI or lexical form.
/// Literals with the same lexical form are then ordered by datatype IRI and language tag.
/// ```
/// use sparterm::{BlankNode, Literal, NamedNode, Term, compare_terms};
///
/// let mut terms = vec![
///     Term::from(Literal::new_simple_literal("a")),
///     Term::from(NamedNode::new("http://example.org/")?),
///     Term::from(BlankNode::new("b")?),
/// ];
/// terms.sort_by(compare_terms);
/// assert!(terms[0].is_blank_node() && terms[1].is_named_node() && terms[2].is_literal());
/// # Result::<_, Box<dyn std::error::Error>>::Ok(())
/// ```
pub fn compare_terms(a: &Term, b: &Term) -> Ordering {
    match (a, b) {
        (Term::BlankNode(a), Term::BlankNode(b)) => a.as_str().cmp(b.as_str()),
        (Term::NamedNode(a), Term::NamedNode(b)) => a.as_str().cmp(b.as_str()),
        (Term::Literal(a), Term::Literal(b)) => compare_literals(a, b),
        _ => a.kind().cmp(&b.kind()),
    }
}

fn compare_literals(a: &Literal, b: &Literal) -> Ordering {
    a.value()
        .cmp(b.value())
        .then_with(|| a.datatype().as_str().cmp(b.datatype().as_str()))
        .then_with(|| a.language().cmp(&b.language()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vocab::xsd;
    use oxrdf::{BlankNode, NamedNode};

    #[test]
    fn ordering_by_kind_then_value() {
        let mut terms = vec![
            Term::from(Literal::new_simple_literal("a")),
            Term::from(NamedNode::new_unchecked("http://example.org/b")),
            Term::from(BlankNode::new_unchecked("z")),
            Term::from(NamedNode::new_unchecked("http://example.org/a")),
            Term::from(BlankNode::new_unchecked("a")),
        ];
        terms.sort_by(compare_terms);
        assert_eq!(
            terms,
            [
                Term::from(BlankNode::new_unchecked("a")),
                Term::from(BlankNode::new_unchecked("z")),
                Term::from(NamedNode::new_unchecked("http://example.org/a")),
                Term::from(NamedNode::new_unchecked("http://example.org/b")),
                Term::from(Literal::new_simple_literal("a")),
            ]
        );
    }

    #[test]
    fn literals_with_the_same_lexical_form() {
        let integer = Term::from(Literal::new_typed_literal("1", xsd::INTEGER));
        let string = Term::from(Literal::new_simple_literal("1"));
        let english = Term::from(Literal::new_language_tagged_literal_unchecked("1", "en"));
        let french = Term::from(Literal::new_language_tagged_literal_unchecked("1", "fr"));
        assert_eq!(compare_terms(&integer, &string), Ordering::Less);
        assert_eq!(compare_terms(&english, &french), Ordering::Less);
        assert_eq!(compare_terms(&french, &french), Ordering::Equal);
    }

    #[test]
    fn kind_and_datatype() {
        let literal = Term::from(Literal::from(true));
        assert_eq!(literal.kind(), TermKind::Literal);
        assert_eq!(literal.datatype(), Some(xsd::BOOLEAN));
        let iri = Term::from(NamedNode::new_unchecked("http://example.org/x"));
        assert_eq!(iri.kind().to_string(), "IRI");
        assert_eq!(Term::from(BlankNode::new_unchecked("b")).datatype(), None);
    }
}
