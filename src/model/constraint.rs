//! Constraints: a left operand compared to one or more right operands.
//!
//! Constraints hang off rules (`odrl:constraint`) and off actions, assets and
//! parties (`odrl:refinement`). A holder's constraints are either a flat,
//! unordered set or a single logical constraint set; see [`ConstraintGroup`].

use serde::Serialize;

use crate::error::{ModelResult, StructuralError};
use crate::graph::{Graph, Term};
use crate::vocab::{self, odrl_terms, rdf, xsd};

use super::logical::LogicalConstraintSet;

/// One right-hand comparand of a constraint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase", tag = "kind")]
pub enum RightOperand {
    /// A named node.
    Iri { iri: String },
    /// A typed literal. `is_iri` flags literals whose lexical form is itself
    /// an `http(s)` IRI.
    #[serde(rename_all = "camelCase")]
    Literal {
        value: String,
        datatype: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        language: Option<String>,
        is_iri: bool,
    },
}

impl RightOperand {
    /// Build from the object of an `odrl:rightOperand` statement.
    ///
    /// A blank node carrying `rdf:value` is unwrapped once.
    pub fn from_term(graph: &Graph, term: &Term) -> Self {
        match term {
            Term::Iri { value } => RightOperand::Iri { iri: value.clone() },
            Term::Literal(lit) => RightOperand::Literal {
                value: lit.value.clone(),
                datatype: lit.datatype.clone(),
                language: lit.language.clone(),
                is_iri: vocab::is_http_iri(&lit.value),
            },
            Term::Blank { id } => match graph.first_object(term, rdf::VALUE) {
                Some(inner) if !inner.is_blank() => Self::from_term(graph, inner),
                _ => RightOperand::Iri {
                    iri: format!("_:{id}"),
                },
            },
        }
    }

    /// The IRI or lexical form.
    pub fn value(&self) -> &str {
        match self {
            RightOperand::Iri { iri } => iri,
            RightOperand::Literal { value, .. } => value,
        }
    }

    /// Datatype IRI of a literal operand.
    pub fn datatype(&self) -> Option<&str> {
        match self {
            RightOperand::Iri { .. } => None,
            RightOperand::Literal { datatype, .. } => Some(datatype),
        }
    }

    /// Whether this operand names something by IRI.
    pub fn is_iri(&self) -> bool {
        match self {
            RightOperand::Iri { .. } => true,
            RightOperand::Literal { is_iri, .. } => *is_iri,
        }
    }

    /// Whether this is a literal of the given datatype.
    pub fn is_of_datatype(&self, datatype: &str) -> bool {
        self.datatype() == Some(datatype)
    }

    /// Whether this is an `xsd:duration` literal.
    pub fn is_duration(&self) -> bool {
        self.is_of_datatype(&xsd("duration"))
    }
}

/// A single comparison.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Constraint {
    /// Constraint node identifier (IRI or blank-node id).
    pub uid: String,
    pub left_operand: String,
    pub operator: String,
    /// Never empty.
    pub right_operands: Vec<RightOperand>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
}

impl Constraint {
    /// Read a constraint rooted at `node`.
    ///
    /// Left operand, operator and at least one right operand are mandatory.
    pub fn from_node(graph: &Graph, node: &Term) -> ModelResult<Self> {
        let uid = node.value().to_string();

        let left_operand = graph
            .first_object(node, odrl_terms::LEFT_OPERAND)
            .map(|t| t.value().to_string())
            .ok_or_else(|| StructuralError::NoLeftOperand {
                constraint: uid.clone(),
            })?;

        let operator = graph
            .first_object(node, odrl_terms::OPERATOR)
            .map(|t| t.value().to_string())
            .ok_or_else(|| StructuralError::NoOperator {
                constraint: uid.clone(),
            })?;

        let right_operands: Vec<RightOperand> = graph
            .objects(node, odrl_terms::RIGHT_OPERAND)
            .into_iter()
            .map(|t| RightOperand::from_term(graph, t))
            .collect();
        if right_operands.is_empty() {
            return Err(StructuralError::NoRightOperand { constraint: uid });
        }

        let unit = graph
            .first_object(node, odrl_terms::UNIT)
            .map(|t| t.value().to_string());

        Ok(Self {
            uid,
            left_operand,
            operator,
            right_operands,
            unit,
        })
    }

    /// Whether the left operand is `iri`.
    pub fn has_left_operand(&self, iri: &str) -> bool {
        self.left_operand == iri
    }
}

/// The constraints attached to one holder node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase", tag = "kind")]
pub enum ConstraintGroup {
    /// Independent constraints, order irrelevant.
    Flat { constraints: Vec<Constraint> },
    /// One logical set whose members keep their encoded order.
    Logical(LogicalConstraintSet),
}

impl Default for ConstraintGroup {
    fn default() -> Self {
        ConstraintGroup::Flat {
            constraints: Vec::new(),
        }
    }
}

impl ConstraintGroup {
    /// Read every constraint reachable from `holder` through `predicate`
    /// (`odrl:constraint` or `odrl:refinement`).
    pub fn from_holder(graph: &Graph, holder: &Term, predicate: &str) -> ModelResult<Self> {
        let mut plain = Vec::new();
        let mut logical = Vec::new();

        for object in graph.objects(holder, predicate) {
            match LogicalConstraintSet::detect(graph, object)? {
                Some(set) => logical.push(set),
                None => plain.push(Constraint::from_node(graph, object)?),
            }
        }

        if plain.is_empty() && logical.len() == 1 {
            return Ok(ConstraintGroup::Logical(logical.remove(0)));
        }

        if !logical.is_empty() {
            tracing::warn!(
                holder = %holder,
                logical = logical.len(),
                plain = plain.len(),
                "mixed logical and plain constraints; flattening"
            );
            for set in logical {
                plain.extend(set.constraints);
            }
        }

        Ok(ConstraintGroup::Flat { constraints: plain })
    }

    /// All member constraints, in order.
    pub fn constraints(&self) -> &[Constraint] {
        match self {
            ConstraintGroup::Flat { constraints } => constraints,
            ConstraintGroup::Logical(set) => &set.constraints,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Constraint> {
        self.constraints().iter()
    }

    pub fn len(&self) -> usize {
        self.constraints().len()
    }

    pub fn is_empty(&self) -> bool {
        self.constraints().is_empty()
    }

    /// The logical set, if this group is one.
    pub fn as_logical(&self) -> Option<&LogicalConstraintSet> {
        match self {
            ConstraintGroup::Logical(set) => Some(set),
            ConstraintGroup::Flat { .. } => None,
        }
    }
}
