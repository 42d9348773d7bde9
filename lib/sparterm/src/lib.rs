//! Sparterm is the term layer of the [sparexpr](https://crates.io/crates/sparexpr) expression evaluator.
//!
//! The RDF terms themselves come from [oxrdf] and are re-exported here.
//! Sparterm adds what expression evaluation needs on top of them:
//! * [`TermExt`] to get the [kind](TermKind) and the datatype of any [`Term`].
//! * [`compare_terms`], a total order on terms following SPARQL `ORDER BY`.
//! * [`vocab::xsd::DERIVED_INTEGER_TYPES`], the numeric datatypes derived from `xsd:integer`.
//!
//! Usage example:
//! ```
//! use sparterm::vocab::xsd;
//! use sparterm::{Literal, Term, TermExt};
//! use std::str::FromStr;
//!
//! let term = Term::from_str("\"38.889\"^^<http://www.w3.org/2001/XMLSchema#decimal>")?;
//! assert_eq!(term, Literal::new_typed_literal("38.889", xsd::DECIMAL).into());
//! assert_eq!(term.datatype(), Some(xsd::DECIMAL));
//! # Result::<_,Box<dyn std::error::Error>>::Ok(())
//! ```

mod term;
pub mod vocab;

pub use crate::term::{TermExt, TermKind, compare_terms};
pub use oxrdf::{
    BlankNode, BlankNodeIdParseError, IriParseError, LanguageTagParseError, Literal, NamedNode,
    NamedNodeRef, Term, TermParseError, Variable, VariableNameParseError,
};
