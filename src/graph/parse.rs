//! Document loading backed by oxigraph's RDF parsers.
//!
//! Parsed quads are flattened into the default graph and converted into the
//! owned [`Term`] model; RDF-star triple terms are skipped.

use std::fmt;
use std::str::FromStr;

use oxigraph::io::{RdfFormat, RdfParser};
use oxigraph::model::Term as OxTerm;
use serde::{Deserialize, Serialize};

use crate::error::GraphError;

use super::store::{Graph, GraphResult};
use super::{Literal, Statement, Term};

/// Serialization of a policy or ontology document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentFormat {
    Turtle,
    NTriples,
    RdfXml,
    JsonLd,
}

impl DocumentFormat {
    /// Canonical media type.
    pub fn media_type(self) -> &'static str {
        match self {
            DocumentFormat::Turtle => "text/turtle",
            DocumentFormat::NTriples => "application/n-triples",
            DocumentFormat::RdfXml => "application/rdf+xml",
            DocumentFormat::JsonLd => "application/ld+json",
        }
    }

    /// Pick a format from an HTTP `Content-Type` value.
    ///
    /// Parameters (`; charset=...`) are ignored and `text/xml` is read as
    /// RDF/XML, which is what ontology servers usually mean by it.
    pub fn from_content_type(content_type: &str) -> Option<Self> {
        let media = content_type
            .split(';')
            .next()
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase();
        match media.as_str() {
            "text/turtle" | "application/x-turtle" => Some(DocumentFormat::Turtle),
            "application/n-triples" | "text/plain" => Some(DocumentFormat::NTriples),
            "application/rdf+xml" | "text/xml" | "application/xml" => {
                Some(DocumentFormat::RdfXml)
            }
            "application/ld+json" | "application/json" => Some(DocumentFormat::JsonLd),
            _ => None,
        }
    }

    /// Pick a format from a file extension.
    pub fn from_extension(extension: &str) -> Option<Self> {
        match extension.to_ascii_lowercase().as_str() {
            "ttl" | "turtle" => Some(DocumentFormat::Turtle),
            "nt" => Some(DocumentFormat::NTriples),
            "rdf" | "owl" | "xml" => Some(DocumentFormat::RdfXml),
            "jsonld" | "json" => Some(DocumentFormat::JsonLd),
            _ => None,
        }
    }

    fn rdf_format(self) -> GraphResult<RdfFormat> {
        RdfFormat::from_media_type(self.media_type()).ok_or(GraphError::UnsupportedFormat {
            format: self.to_string(),
        })
    }
}

impl fmt::Display for DocumentFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DocumentFormat::Turtle => "turtle",
            DocumentFormat::NTriples => "ntriples",
            DocumentFormat::RdfXml => "rdfxml",
            DocumentFormat::JsonLd => "jsonld",
        };
        f.write_str(name)
    }
}

impl FromStr for DocumentFormat {
    type Err = GraphError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "turtle" | "ttl" => Ok(DocumentFormat::Turtle),
            "ntriples" | "n-triples" | "nt" => Ok(DocumentFormat::NTriples),
            "rdfxml" | "rdf/xml" | "xml" => Ok(DocumentFormat::RdfXml),
            "jsonld" | "json-ld" | "json" => Ok(DocumentFormat::JsonLd),
            other => Err(GraphError::UnsupportedFormat {
                format: other.to_string(),
            }),
        }
    }
}

impl Graph {
    /// Parse a document into a new graph.
    ///
    /// `base_iri` resolves relative IRIs; JSON-LD policies usually want their
    /// policy `uid` here.
    pub fn parse(input: &str, format: DocumentFormat, base_iri: Option<&str>) -> GraphResult<Self> {
        let mut parser = RdfParser::from_format(format.rdf_format()?);
        if let Some(base) = base_iri {
            parser = parser.with_base_iri(base).map_err(|e| GraphError::InvalidBaseIri {
                iri: base.to_string(),
                message: e.to_string(),
            })?;
        }

        let mut graph = Graph::new();
        let mut skipped = 0usize;
        for quad in parser.for_slice(input.as_bytes()) {
            let quad = quad.map_err(|e| GraphError::Parse {
                format: format.to_string(),
                message: e.to_string(),
            })?;
            let subject = OxTerm::from(quad.subject);
            match (convert(subject), convert(quad.object)) {
                (Some(subject), Some(object)) => {
                    graph.insert(Statement::new(subject, quad.predicate.as_str(), object));
                }
                _ => skipped += 1,
            }
        }

        if skipped > 0 {
            tracing::debug!(skipped, "ignored statements with triple terms");
        }
        tracing::debug!(%format, statements = graph.len(), "parsed document");
        Ok(graph)
    }
}

fn convert(term: OxTerm) -> Option<Term> {
    #[allow(unreachable_patterns)]
    match term {
        OxTerm::NamedNode(node) => Some(Term::iri(node.into_string())),
        OxTerm::BlankNode(node) => Some(Term::blank(node.into_string())),
        OxTerm::Literal(lit) => {
            let language = lit.language().map(str::to_string);
            let datatype = lit.datatype().as_str().to_string();
            Some(Term::Literal(Literal {
                value: lit.value().to_string(),
                datatype,
                language,
            }))
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TTL: &str = r#"
        @prefix odrl: <http://www.w3.org/ns/odrl/2/> .
        @prefix xsd: <http://www.w3.org/2001/XMLSchema#> .
        <http://example.com/policy:1> a odrl:Set ;
            odrl:permission [ odrl:action odrl:use ; odrl:target <http://example.com/asset:1> ] .
        <http://example.com/c> odrl:rightOperand "10"^^xsd:integer ;
            <http://www.w3.org/2000/01/rdf-schema#label> "Ten"@en .
    "#;

    #[test]
    fn parse_turtle() {
        let graph = Graph::parse(TTL, DocumentFormat::Turtle, None).unwrap();
        assert_eq!(graph.len(), 6);

        let policy = Term::iri("http://example.com/policy:1");
        let rule = graph
            .first_object(&policy, "http://www.w3.org/ns/odrl/2/permission")
            .unwrap();
        assert!(rule.is_blank());

        let c = Term::iri("http://example.com/c");
        let lit = graph
            .first_object(&c, "http://www.w3.org/ns/odrl/2/rightOperand")
            .and_then(Term::as_literal)
            .unwrap();
        assert_eq!(lit.value, "10");
        assert_eq!(lit.datatype, "http://www.w3.org/2001/XMLSchema#integer");

        let label = graph
            .first_object(&c, "http://www.w3.org/2000/01/rdf-schema#label")
            .and_then(Term::as_literal)
            .unwrap();
        assert_eq!(label.language.as_deref(), Some("en"));
    }

    #[test]
    fn relative_iris_resolve_against_base() {
        let ttl = "<a> <http://example.com/p> <b> .";
        let graph = Graph::parse(ttl, DocumentFormat::Turtle, Some("http://example.com/")).unwrap();
        assert!(graph.has_outgoing(&Term::iri("http://example.com/a")));
    }

    #[test]
    fn syntax_errors_are_reported() {
        let err = Graph::parse("<a> <b> .", DocumentFormat::Turtle, None).unwrap_err();
        assert!(matches!(err, GraphError::Parse { .. }));
    }

    #[test]
    fn content_type_selection() {
        assert_eq!(
            DocumentFormat::from_content_type("text/turtle; charset=utf-8"),
            Some(DocumentFormat::Turtle)
        );
        assert_eq!(
            DocumentFormat::from_content_type("text/xml"),
            Some(DocumentFormat::RdfXml)
        );
        assert_eq!(DocumentFormat::from_content_type("text/html"), None);
    }

    #[test]
    fn format_names() {
        assert_eq!("ttl".parse::<DocumentFormat>().unwrap(), DocumentFormat::Turtle);
        assert_eq!("json-ld".parse::<DocumentFormat>().unwrap(), DocumentFormat::JsonLd);
        assert!("yaml".parse::<DocumentFormat>().is_err());
        assert_eq!(DocumentFormat::from_extension("nt"), Some(DocumentFormat::NTriples));
    }
}
