//! The [`oxrdf` vocabularies](oxrdf::vocab) with the datatype groups used by SPARQL operators.

pub use oxrdf::vocab::rdf;

pub mod xsd {
    //! [RDF compatible XSD datatypes](https://www.w3.org/TR/rdf11-concepts/#dfn-rdf-compatible-xsd-types).
    use oxrdf::NamedNodeRef;
    pub use oxrdf::vocab::xsd::*;

    /// Datatypes derived from `xsd:integer` that SPARQL treats as numeric.
    pub const DERIVED_INTEGER_TYPES: [NamedNodeRef<'static>; 12] = [
        BYTE,
        INT,
        LONG,
        NEGATIVE_INTEGER,
        NON_NEGATIVE_INTEGER,
        NON_POSITIVE_INTEGER,
        POSITIVE_INTEGER,
        SHORT,
        UNSIGNED_BYTE,
        UNSIGNED_INT,
        UNSIGNED_LONG,
        UNSIGNED_SHORT,
    ];

}
