//! Statement graph: the read-only triple store a policy is modelled from.
//!
//! - **Data model** ([`Term`], [`Literal`], [`Statement`]): owned RDF terms
//! - **Query layer** ([`Graph`]): indexed pattern matching over statements
//! - **Loading** ([`parse`]): documents in Turtle, N-Triples, RDF/XML or JSON-LD
//!   are parsed with `oxigraph` and converted into the owned data model
//!
//! Statements are immutable once loaded; every consumer borrows the graph.

pub mod parse;
pub mod store;

use std::fmt;

use serde::{Deserialize, Serialize};

pub use parse::DocumentFormat;
pub use store::{Graph, GraphResult};

use crate::vocab::XSD_NS;

/// A typed literal value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Literal {
    /// Lexical form.
    pub value: String,
    /// Datatype IRI (`xsd:string` for plain literals).
    pub datatype: String,
    /// Language tag of `rdf:langString` literals.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
}

impl Literal {
    pub fn new(value: impl Into<String>, datatype: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            datatype: datatype.into(),
            language: None,
        }
    }

    /// A plain `xsd:string` literal.
    pub fn string(value: impl Into<String>) -> Self {
        Self::new(value, format!("{XSD_NS}string"))
    }
}

/// A node or value in the graph.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", tag = "termType")]
pub enum Term {
    /// A named node.
    Iri { value: String },
    /// An unnamed node, identified only within one graph.
    Blank { id: String },
    /// A typed literal.
    Literal(Literal),
}

impl Term {
    pub fn iri(value: impl Into<String>) -> Self {
        Term::Iri {
            value: value.into(),
        }
    }

    pub fn blank(id: impl Into<String>) -> Self {
        Term::Blank { id: id.into() }
    }

    pub fn literal(value: impl Into<String>, datatype: impl Into<String>) -> Self {
        Term::Literal(Literal::new(value, datatype))
    }

    /// The IRI if this is a named node.
    pub fn as_iri(&self) -> Option<&str> {
        match self {
            Term::Iri { value } => Some(value),
            _ => None,
        }
    }

    pub fn as_literal(&self) -> Option<&Literal> {
        match self {
            Term::Literal(lit) => Some(lit),
            _ => None,
        }
    }

    /// The IRI, blank-node id or lexical form.
    pub fn value(&self) -> &str {
        match self {
            Term::Iri { value } => value,
            Term::Blank { id } => id,
            Term::Literal(lit) => &lit.value,
        }
    }

    pub fn is_iri(&self) -> bool {
        matches!(self, Term::Iri { .. })
    }

    pub fn is_blank(&self) -> bool {
        matches!(self, Term::Blank { .. })
    }

    pub fn is_literal(&self) -> bool {
        matches!(self, Term::Literal(_))
    }

    /// Whether this term is the named node `iri`.
    pub fn is(&self, iri: &str) -> bool {
        self.as_iri() == Some(iri)
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Term::Iri { value } => write!(f, "<{value}>"),
            Term::Blank { id } => write!(f, "_:{id}"),
            Term::Literal(lit) => match &lit.language {
                Some(lang) => write!(f, "\"{}\"@{lang}", lit.value),
                None => write!(f, "\"{}\"^^<{}>", lit.value, lit.datatype),
            },
        }
    }
}

/// A (subject, predicate, object) statement.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Statement {
    /// An IRI or blank node.
    pub subject: Term,
    /// The predicate IRI.
    pub predicate: String,
    /// Any term.
    pub object: Term,
}

impl Statement {
    pub fn new(subject: Term, predicate: impl Into<String>, object: Term) -> Self {
        Self {
            subject,
            predicate: predicate.into(),
            object,
        }
    }
}

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} <{}> {} .", self.subject, self.predicate, self.object)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn term_accessors() {
        let iri = Term::iri("http://example.com/a");
        assert!(iri.is_iri());
        assert_eq!(iri.as_iri(), Some("http://example.com/a"));
        assert!(iri.is("http://example.com/a"));

        let lit = Term::Literal(Literal::string("hello"));
        assert!(lit.is_literal());
        assert_eq!(lit.value(), "hello");
        assert_eq!(lit.as_iri(), None);
        assert_eq!(
            lit.as_literal().unwrap().datatype,
            "http://www.w3.org/2001/XMLSchema#string"
        );
    }

    #[test]
    fn statement_display_is_ntriples_like() {
        let st = Statement::new(
            Term::blank("b0"),
            "http://example.com/p",
            Term::literal("5", "http://www.w3.org/2001/XMLSchema#integer"),
        );
        assert_eq!(
            st.to_string(),
            "_:b0 <http://example.com/p> \"5\"^^<http://www.w3.org/2001/XMLSchema#integer> ."
        );
    }
}
