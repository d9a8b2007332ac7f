//! Actions: what a rule permits, prohibits or obliges.

use serde::Serialize;

use crate::error::ModelResult;
use crate::graph::{Graph, Term};
use crate::vocab::{dpv, odrl_terms, rdf};

use super::constraint::{ConstraintGroup, RightOperand};
use super::node::NodeRef;
use super::rule::RuleKind;

/// Context an action is performed in, taken from `dpv:Context` refinements.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionContext {
    pub operands: Vec<RightOperand>,
    /// `odrl:isAnyOf`: any one of the operands, rather than all of them.
    pub any_of: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Action {
    pub reference: NodeRef,
    /// The action IRI, read through `rdf:value` on a described node.
    pub iri: String,
    pub refinements: ConstraintGroup,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<ActionContext>,
    /// Kind of the owning rule.
    pub rule_kind: RuleKind,
}

impl Action {
    /// Build the action named by the object of an `odrl:action` statement.
    pub fn build(graph: &Graph, object: &Term, rule_kind: RuleKind) -> ModelResult<Self> {
        let reference = NodeRef::probe(graph, object);
        let iri = reference.resolve(graph, rdf::VALUE).value().to_string();

        let refinements = match reference.described() {
            Some(node) => ConstraintGroup::from_holder(graph, node, odrl_terms::REFINEMENT)?,
            None => ConstraintGroup::default(),
        };
        let context = context_of(&refinements);

        Ok(Self {
            reference,
            iri,
            refinements,
            context,
            rule_kind,
        })
    }

    /// Whether this is the action `iri`.
    pub fn is(&self, iri: &str) -> bool {
        self.iri == iri
    }

    /// Right operands of every refinement on `left_operand`.
    pub fn refinement_operands(&self, left_operand: &str) -> Vec<&RightOperand> {
        self.refinements
            .iter()
            .filter(|c| c.has_left_operand(left_operand))
            .flat_map(|c| c.right_operands.iter())
            .collect()
    }
}

fn context_of(refinements: &ConstraintGroup) -> Option<ActionContext> {
    let mut contexts = refinements
        .iter()
        .filter(|c| c.has_left_operand(dpv::CONTEXT))
        .peekable();
    let any_of = contexts.peek()?.operator == odrl_terms::IS_ANY_OF;
    let operands = contexts
        .flat_map(|c| c.right_operands.iter().cloned())
        .collect();
    Some(ActionContext { operands, any_of })
}
