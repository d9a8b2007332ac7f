//! Logical constraints and reconstruction of their `rdf:first`/`rdf:rest`
//! list encoding.
//!
//! A holder node names its collection through one of four operand predicates
//! (`odrl:xone`, `odrl:and`, `odrl:or`, `odrl:andSequence`). The collection is
//! normally an RDF list; serialisations that drop the list wrapper instead
//! repeat the operand predicate once per member, which is accepted too.

use std::collections::HashSet;

use serde::Serialize;

use crate::error::ModelResult;
use crate::graph::{Graph, Term};
use crate::vocab::{odrl, rdf};

use super::constraint::Constraint;

/// The operator joining the members of a logical constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum LogicalOperand {
    Xone,
    And,
    Or,
    AndSequence,
}

impl LogicalOperand {
    /// Lookup order when probing a holder node.
    pub const ALL: [LogicalOperand; 4] = [
        LogicalOperand::Xone,
        LogicalOperand::And,
        LogicalOperand::Or,
        LogicalOperand::AndSequence,
    ];

    pub fn local_name(self) -> &'static str {
        match self {
            LogicalOperand::Xone => "xone",
            LogicalOperand::And => "and",
            LogicalOperand::Or => "or",
            LogicalOperand::AndSequence => "andSequence",
        }
    }

    pub fn iri(self) -> String {
        odrl(self.local_name())
    }

    /// Lead-in for the combined sentence.
    pub fn lead_in(self) -> &'static str {
        match self {
            LogicalOperand::Xone => "Exactly one of the following applies: ",
            LogicalOperand::And => "All of the following apply: ",
            LogicalOperand::Or => "At least one of the following applies: ",
            LogicalOperand::AndSequence => "All of the following apply, in this order: ",
        }
    }

    /// Word placed before the last member.
    pub fn conjunction(self) -> &'static str {
        match self {
            LogicalOperand::Xone | LogicalOperand::Or => "or",
            LogicalOperand::And => "and",
            LogicalOperand::AndSequence => "and then",
        }
    }
}

/// Ordered members joined by one logical operand.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LogicalConstraintSet {
    pub operand: LogicalOperand,
    /// Members in encoded order; may be empty.
    pub constraints: Vec<Constraint>,
}

impl LogicalConstraintSet {
    /// Probe `node` for a logical operand and rebuild its members.
    ///
    /// Returns `Ok(None)` when no operand predicate is present, which means
    /// `node` is a plain constraint.
    pub fn detect(graph: &Graph, node: &Term) -> ModelResult<Option<Self>> {
        let mut found: Option<(LogicalOperand, Vec<&Term>)> = None;

        for operand in LogicalOperand::ALL {
            let heads = graph.objects(node, &operand.iri());
            if heads.is_empty() {
                continue;
            }
            if let Some((kept, _)) = &found {
                tracing::warn!(
                    node = %node,
                    kept = kept.local_name(),
                    ignored = operand.local_name(),
                    "more than one logical operand on a constraint node"
                );
                continue;
            }
            found = Some((operand, heads));
        }

        let Some((operand, heads)) = found else {
            return Ok(None);
        };

        let members = match heads.as_slice() {
            [head] if is_terminal(head) || graph.first_object(head, rdf::FIRST).is_some() => {
                walk_list(graph, *head).elements
            }
            _ => heads,
        };

        let constraints = members
            .into_iter()
            .map(|member| Constraint::from_node(graph, member))
            .collect::<ModelResult<Vec<_>>>()?;

        tracing::debug!(
            node = %node,
            operand = operand.local_name(),
            members = constraints.len(),
            "logical constraint"
        );
        Ok(Some(Self {
            operand,
            constraints,
        }))
    }
}

/// Outcome of walking an RDF list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListWalk<'g> {
    /// `rdf:first` values in list order.
    pub elements: Vec<&'g Term>,
    /// Whether the walk reached the terminal.
    pub complete: bool,
}

/// Whether `term` ends a list: `rdf:nil`, or a `"nil"`/`"null"` literal.
pub fn is_terminal(term: &Term) -> bool {
    match term {
        Term::Iri { value } => value == rdf::NIL,
        Term::Literal(lit) => matches!(lit.value.as_str(), "nil" | "null"),
        Term::Blank { .. } => false,
    }
}

/// Collect the elements of the RDF list starting at `head`.
///
/// A node without `rdf:first` or `rdf:rest`, or one already visited, ends
/// the walk early; the elements read so far are kept.
pub fn walk_list<'g>(graph: &'g Graph, head: &'g Term) -> ListWalk<'g> {
    let mut elements = Vec::new();
    let mut visited: HashSet<&Term> = HashSet::new();
    let mut node = head;

    loop {
        if is_terminal(node) {
            return ListWalk {
                elements,
                complete: true,
            };
        }
        if !visited.insert(node) {
            tracing::warn!(node = %node, collected = elements.len(), "list revisits a node; truncated");
            break;
        }
        let Some(first) = graph.first_object(node, rdf::FIRST) else {
            tracing::warn!(node = %node, collected = elements.len(), "list node without rdf:first; truncated");
            break;
        };
        elements.push(first);
        let Some(rest) = graph.first_object(node, rdf::REST) else {
            tracing::warn!(node = %node, collected = elements.len(), "list node without rdf:rest; truncated");
            break;
        };
        node = rest;
    }

    ListWalk {
        elements,
        complete: false,
    }
}
