//! Direct vs. described node references.
//!
//! An action, asset or party may be named directly (`odrl:action odrl:use`) or
//! through a node that is itself described by further statements
//! (`odrl:action [ rdf:value odrl:share ; odrl:refinement ... ]`). Which case
//! applies is decided once, at construction, by probing the graph for any
//! outgoing statement from the referenced node.

use serde::Serialize;

use crate::graph::{Graph, Term};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase", tag = "kind", content = "node")]
pub enum NodeRef {
    /// The referenced term is the value itself.
    Direct(Term),
    /// The referenced term is a node with its own statements.
    Described(Term),
}

impl NodeRef {
    /// Classify `term` by probing `graph` for outgoing statements.
    pub fn probe(graph: &Graph, term: &Term) -> Self {
        if !term.is_literal() && graph.has_outgoing(term) {
            NodeRef::Described(term.clone())
        } else {
            NodeRef::Direct(term.clone())
        }
    }

    /// The referenced term, whichever the case.
    pub fn term(&self) -> &Term {
        match self {
            NodeRef::Direct(term) | NodeRef::Described(term) => term,
        }
    }

    pub fn is_described(&self) -> bool {
        matches!(self, NodeRef::Described(_))
    }

    /// The described node, if any.
    pub fn described(&self) -> Option<&Term> {
        match self {
            NodeRef::Described(term) => Some(term),
            NodeRef::Direct(_) => None,
        }
    }

    /// Follow `predicate` on a described node, falling back to the node itself.
    pub fn resolve<'g>(&'g self, graph: &'g Graph, predicate: &str) -> &'g Term {
        match self {
            NodeRef::Described(node) => graph.first_object(node, predicate).unwrap_or(node),
            NodeRef::Direct(term) => term,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::Statement;
    use crate::vocab::rdf;

    #[test]
    fn probe_and_resolve() {
        let share = Term::iri("http://www.w3.org/ns/odrl/2/share");
        let node = Term::blank("a1");
        let graph = Graph::from_statements([Statement::new(node.clone(), rdf::VALUE, share.clone())]);

        let described = NodeRef::probe(&graph, &node);
        assert!(described.is_described());
        assert_eq!(described.resolve(&graph, rdf::VALUE), &share);

        let direct = NodeRef::probe(&graph, &share);
        assert!(!direct.is_described());
        assert_eq!(direct.resolve(&graph, rdf::VALUE), &share);
    }

    #[test]
    fn described_without_value_falls_back_to_node() {
        let use_ = Term::iri("http://www.w3.org/ns/odrl/2/use");
        let graph = Graph::from_statements([Statement::new(
            use_.clone(),
            "http://www.w3.org/2000/01/rdf-schema#label",
            Term::literal("Use", "http://www.w3.org/2001/XMLSchema#string"),
        )]);
        let reference = NodeRef::probe(&graph, &use_);
        assert!(reference.is_described());
        assert_eq!(reference.resolve(&graph, rdf::VALUE), &use_);
    }
}
