//! Reading of binding rows from the [SPARQL JSON results format](https://www.w3.org/TR/sparql11-results-json/).

use anyhow::{Context, Result};
use serde::Deserialize;
use sparexpr::BindingRow;
use sparterm::{BlankNode, Literal, NamedNode, Term, Variable};
use std::collections::BTreeMap;
use std::io::Read;

#[derive(Deserialize)]
struct SparqlJsonResults {
    results: SparqlJsonSolutions,
}

#[derive(Deserialize)]
struct SparqlJsonSolutions {
    bindings: Vec<BTreeMap<String, SparqlJsonTerm>>,
}

#[derive(Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
enum SparqlJsonTerm {
    Uri {
        value: String,
    },
    Bnode {
        value: String,
    },
    #[serde(alias = "typed-literal")]
    Literal {
        value: String,
        #[serde(rename = "xml:lang")]
        lang: Option<String>,
        datatype: Option<String>,
    },
}

impl SparqlJsonTerm {
    fn into_term(self) -> Result<Term> {
        Ok(match self {
            Self::Uri { value } => NamedNode::new(&value)
                .with_context(|| format!("Invalid IRI {value}"))?
                .into(),
            Self::Bnode { value } => BlankNode::new(&value)
                .with_context(|| format!("Invalid blank node identifier {value}"))?
                .into(),
            Self::Literal {
                value,
                lang: Some(lang),
                ..
            } => Literal::new_language_tagged_literal(value, &lang)
                .with_context(|| format!("Invalid language tag {lang}"))?
                .into(),
            Self::Literal {
                value,
                lang: None,
                datatype: Some(datatype),
            } => Literal::new_typed_literal(
                value,
                NamedNode::new(&datatype)
                    .with_context(|| format!("Invalid datatype IRI {datatype}"))?,
            )
            .into(),
            Self::Literal {
                value,
                lang: None,
                datatype: None,
            } => Literal::new_simple_literal(value).into(),
        })
    }
}

/// Reads the solutions of a SPARQL JSON results document as binding rows.
pub fn read_sparql_json_bindings(reader: impl Read) -> Result<Vec<BindingRow>> {
    let results: SparqlJsonResults =
        serde_json::from_reader(reader).context("Invalid SPARQL JSON results")?;
    results
        .results
        .bindings
        .into_iter()
        .map(|solution| {
            solution
                .into_iter()
                .map(|(name, term)| {
                    let variable = Variable::new(&name)
                        .with_context(|| format!("Invalid variable name {name}"))?;
                    Ok((variable, term.into_term()?))
                })
                .collect()
        })
        .collect()
}
