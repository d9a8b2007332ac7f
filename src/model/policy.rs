//! Policies: the roots of the model.

use std::collections::HashSet;
use std::fmt;

use serde::Serialize;

use crate::error::ModelResult;
use crate::graph::{Graph, Term};
use crate::vocab::{dcterms, odrl_terms, rdf};

use super::party::RoleMap;
use super::rule::{BuildContext, Duty, DutyBudget, Permission, Prohibition};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum PolicyKind {
    Policy,
    Set,
    Offer,
    Agreement,
    Request,
}

impl PolicyKind {
    pub const ALL: [PolicyKind; 5] = [
        PolicyKind::Policy,
        PolicyKind::Set,
        PolicyKind::Offer,
        PolicyKind::Agreement,
        PolicyKind::Request,
    ];

    pub fn iri(self) -> &'static str {
        match self {
            PolicyKind::Policy => odrl_terms::POLICY,
            PolicyKind::Set => odrl_terms::SET,
            PolicyKind::Offer => odrl_terms::OFFER,
            PolicyKind::Agreement => odrl_terms::AGREEMENT,
            PolicyKind::Request => odrl_terms::REQUEST,
        }
    }

    pub fn from_iri(iri: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.iri() == iri)
    }
}

impl fmt::Display for PolicyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(crate::vocab::local_name(self.iri()))
    }
}

/// A policy node found in a graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PolicyRef {
    pub node: Term,
    pub kind: PolicyKind,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Policy {
    pub uid: String,
    pub kind: PolicyKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub creator: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub issued: Option<String>,
    pub parties: RoleMap,
    pub permissions: Vec<Permission>,
    pub prohibitions: Vec<Prohibition>,
    pub obligations: Vec<Duty>,
}

impl Policy {
    /// Find every policy node in `graph`, in load order.
    ///
    /// Nodes typed with one of the policy classes come first; untyped nodes
    /// that still carry rules are reported as plain [`PolicyKind::Policy`].
    pub fn discover(graph: &Graph) -> Vec<PolicyRef> {
        let mut seen: HashSet<&Term> = HashSet::new();
        let mut found = Vec::new();

        for st in graph.iter().filter(|st| st.predicate == rdf::TYPE) {
            let Some(kind) = st.object.as_iri().and_then(PolicyKind::from_iri) else {
                continue;
            };
            if seen.insert(&st.subject) {
                found.push(PolicyRef {
                    node: st.subject.clone(),
                    kind,
                });
            }
        }

        let rule_predicates = [
            odrl_terms::PERMISSION,
            odrl_terms::PROHIBITION,
            odrl_terms::OBLIGATION,
        ];
        for st in graph
            .iter()
            .filter(|st| rule_predicates.contains(&st.predicate.as_str()))
        {
            if seen.insert(&st.subject) {
                found.push(PolicyRef {
                    node: st.subject.clone(),
                    kind: PolicyKind::Policy,
                });
            }
        }

        found
    }

    /// Build the policy rooted at `node` and every rule it references.
    ///
    /// Duties are nested at most `max_depth` levels deep and at most
    /// `max_duties` of them are built in total.
    pub fn build(
        graph: &Graph,
        node: &Term,
        kind: PolicyKind,
        max_depth: usize,
        max_duties: usize,
    ) -> ModelResult<Self> {
        let creator = graph
            .first_object(node, dcterms::CREATOR)
            .map(|t| t.value().to_string());
        let issued = graph
            .first_object(node, dcterms::ISSUED)
            .map(|t| t.value().to_string());
        let parties = RoleMap::from_node(graph, node)?;

        let uid = node.value().to_string();
        let budget = DutyBudget::new(max_duties);
        let ctx = BuildContext::new(max_depth)
            .with_policy_parties(&parties)
            .with_duty_budget(&budget)
            .owned_by(&uid);

        let permissions = graph
            .objects(node, odrl_terms::PERMISSION)
            .into_iter()
            .enumerate()
            .map(|(i, rule)| Permission::build(graph, rule, ctx.at(i + 1)))
            .collect::<ModelResult<Vec<_>>>()?;
        let prohibitions = graph
            .objects(node, odrl_terms::PROHIBITION)
            .into_iter()
            .enumerate()
            .map(|(i, rule)| Prohibition::build(graph, rule, ctx.at(i + 1)))
            .collect::<ModelResult<Vec<_>>>()?;
        let obligations = Duty::build_all(graph, node, odrl_terms::OBLIGATION, ctx)?;

        tracing::info!(
            policy = %node,
            %kind,
            permissions = permissions.len(),
            prohibitions = prohibitions.len(),
            obligations = obligations.len(),
            duties = budget.built(),
            "built policy model"
        );

        Ok(Self {
            uid,
            kind,
            creator,
            issued,
            parties,
            permissions,
            prohibitions,
            obligations,
        })
    }

    /// Build every policy found in `graph`.
    pub fn from_graph(graph: &Graph, max_depth: usize, max_duties: usize) -> ModelResult<Vec<Self>> {
        Self::discover(graph)
            .into_iter()
            .map(|found| Self::build(graph, &found.node, found.kind, max_depth, max_duties))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::DocumentFormat;
    use crate::model::{DEFAULT_MAX_DEPTH, DEFAULT_MAX_DUTIES};

    fn graph(ttl: &str) -> Graph {
        let doc = format!(
            "@prefix odrl: <http://www.w3.org/ns/odrl/2/> .\n\
             @prefix dct: <http://purl.org/dc/terms/> .\n\
             @prefix ex: <http://example.com/> .\n{ttl}"
        );
        Graph::parse(&doc, DocumentFormat::Turtle, None).unwrap()
    }

    #[test]
    fn discovers_typed_and_untyped_policies() {
        let g = graph(
            "ex:p1 a odrl:Offer ; odrl:permission [ odrl:action odrl:use ; odrl:target ex:A ] .
             ex:p2 odrl:prohibition [ odrl:action odrl:sell ; odrl:target ex:A ] .",
        );
        let found = Policy::discover(&g);
        assert_eq!(found.len(), 2);
        assert_eq!(found[0].node, Term::iri("http://example.com/p1"));
        assert_eq!(found[0].kind, PolicyKind::Offer);
        assert_eq!(found[1].kind, PolicyKind::Policy);
    }

    #[test]
    fn rules_are_classified_by_predicate() {
        let g = graph(
            "ex:p a odrl:Set ; dct:creator \"Alice\" ; dct:issued \"2024-01-01\" ;
                odrl:permission [ odrl:action odrl:use ; odrl:target ex:A ] ;
                odrl:prohibition [ odrl:action odrl:sell ; odrl:target ex:A ] ;
                odrl:obligation [ odrl:action odrl:compensate ] .",
        );
        let policies = Policy::from_graph(&g, DEFAULT_MAX_DEPTH, DEFAULT_MAX_DUTIES).unwrap();
        assert_eq!(policies.len(), 1);
        let p = &policies[0];
        assert_eq!(p.kind, PolicyKind::Set);
        assert_eq!(p.creator.as_deref(), Some("Alice"));
        assert_eq!(p.issued.as_deref(), Some("2024-01-01"));
        assert_eq!(p.permissions.len(), 1);
        assert_eq!(p.prohibitions.len(), 1);
        assert_eq!(p.obligations.len(), 1);
    }

    #[test]
    fn broken_rule_aborts_policy() {
        let g = graph(
            "ex:p a odrl:Set ; odrl:permission [ odrl:target ex:A ] .",
        );
        let err = Policy::from_graph(&g, DEFAULT_MAX_DEPTH, DEFAULT_MAX_DUTIES).unwrap_err();
        assert_eq!(err.error_code(), "E_NO_ACTION_DEFINED");
    }

    #[test]
    fn kind_round_trips_through_iri() {
        for kind in PolicyKind::ALL {
            assert_eq!(PolicyKind::from_iri(kind.iri()), Some(kind));
        }
        assert_eq!(PolicyKind::Agreement.to_string(), "Agreement");
    }
}
