//! Parties and the roles they play in a rule.
//!
//! The set of roles is fixed by the ODRL vocabulary and the OCCE profile, so
//! [`Role`] is a closed enum and [`RoleMap`] a fixed table indexed by it.

use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::error::ModelResult;
use crate::graph::{Graph, Term};
use crate::vocab::{dcterms, foaf, occe, odrl, odrl_terms, rdf};

use super::asset::values;
use super::constraint::ConstraintGroup;
use super::node::NodeRef;

/// Function a party has in a rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Role {
    Assignee,
    Assigner,
    AttributedParty,
    AttributingParty,
    CompensatedParty,
    CompensatingParty,
    ConsentedParty,
    ConsentingParty,
    ContractedParty,
    ContractingParty,
    InformedParty,
    InformingParty,
    TrackedParty,
    TrackingParty,
    SharingParty,
    SharedParty,
    AcknowledgingParty,
    AcknowledgedParty,
    CollaboratingParty,
    CollaboratedParty,
    NegotiatingParty,
    NegotiatedParty,
}

const ROLE_COUNT: usize = 22;

impl Role {
    pub const ALL: [Role; ROLE_COUNT] = [
        Role::Assignee,
        Role::Assigner,
        Role::AttributedParty,
        Role::AttributingParty,
        Role::CompensatedParty,
        Role::CompensatingParty,
        Role::ConsentedParty,
        Role::ConsentingParty,
        Role::ContractedParty,
        Role::ContractingParty,
        Role::InformedParty,
        Role::InformingParty,
        Role::TrackedParty,
        Role::TrackingParty,
        Role::SharingParty,
        Role::SharedParty,
        Role::AcknowledgingParty,
        Role::AcknowledgedParty,
        Role::CollaboratingParty,
        Role::CollaboratedParty,
        Role::NegotiatingParty,
        Role::NegotiatedParty,
    ];

    /// Local name of the role predicate, shared by both namespaces.
    pub fn local_name(self) -> &'static str {
        match self {
            Role::Assignee => "assignee",
            Role::Assigner => "assigner",
            Role::AttributedParty => "attributedParty",
            Role::AttributingParty => "attributingParty",
            Role::CompensatedParty => "compensatedParty",
            Role::CompensatingParty => "compensatingParty",
            Role::ConsentedParty => "consentedParty",
            Role::ConsentingParty => "consentingParty",
            Role::ContractedParty => "contractedParty",
            Role::ContractingParty => "contractingParty",
            Role::InformedParty => "informedParty",
            Role::InformingParty => "informingParty",
            Role::TrackedParty => "trackedParty",
            Role::TrackingParty => "trackingParty",
            Role::SharingParty => "sharingParty",
            Role::SharedParty => "sharedParty",
            Role::AcknowledgingParty => "acknowledgingParty",
            Role::AcknowledgedParty => "acknowledgedParty",
            Role::CollaboratingParty => "collaboratingParty",
            Role::CollaboratedParty => "collaboratedParty",
            Role::NegotiatingParty => "negotiatingParty",
            Role::NegotiatedParty => "negotiatedParty",
        }
    }

    /// The role predicates: ODRL first, then OCCE.
    pub fn predicates(self) -> [String; 2] {
        [odrl(self.local_name()), occe(self.local_name())]
    }

    fn index(self) -> usize {
        self as usize
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub enum PartyKind {
    Party,
    Collection,
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Party {
    pub reference: NodeRef,
    pub kind: PartyKind,
    pub types: Vec<String>,
    /// IRIs identifying the party or, for a collection, its members' source.
    pub sources: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub refinements: ConstraintGroup,
}

impl Party {
    /// Build the party named by the object of a role statement.
    pub fn build(graph: &Graph, object: &Term) -> ModelResult<Self> {
        let reference = NodeRef::probe(graph, object);

        let Some(node) = reference.described() else {
            return Ok(Self {
                sources: vec![object.value().to_string()],
                reference,
                kind: PartyKind::Party,
                types: Vec::new(),
                name: None,
                refinements: ConstraintGroup::default(),
            });
        };

        let types = values(graph, node, rdf::TYPE);
        let mut sources = values(graph, node, odrl_terms::SOURCE);
        if sources.is_empty() {
            sources = values(graph, node, odrl_terms::UID);
        }
        if sources.is_empty() && node.is_iri() {
            sources.push(node.value().to_string());
        }
        let name = graph
            .first_object(node, dcterms::TITLE)
            .or_else(|| graph.first_object(node, foaf::NAME))
            .map(|t| t.value().to_string());
        let refinements = ConstraintGroup::from_holder(graph, node, odrl_terms::REFINEMENT)?;
        let kind = if types.iter().any(|t| t == odrl_terms::PARTY_COLLECTION) {
            PartyKind::Collection
        } else {
            PartyKind::Party
        };

        Ok(Self {
            reference,
            kind,
            types,
            sources,
            name,
            refinements,
        })
    }
}

/// Parties per role.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RoleMap {
    slots: [Vec<Party>; ROLE_COUNT],
}

impl RoleMap {
    /// Read every role predicate, in both namespaces, on `node`.
    pub fn from_node(graph: &Graph, node: &Term) -> ModelResult<Self> {
        let mut map = Self::default();
        for role in Role::ALL {
            for predicate in role.predicates() {
                for object in graph.objects(node, &predicate) {
                    map.push(role, Party::build(graph, object)?);
                }
            }
        }
        Ok(map)
    }

    pub fn get(&self, role: Role) -> &[Party] {
        &self.slots[role.index()]
    }

    pub fn push(&mut self, role: Role, party: Party) {
        self.slots[role.index()].push(party);
    }

    /// Fill every role left empty here from `parent`.
    pub fn inherit(&mut self, parent: &RoleMap) {
        for (slot, inherited) in self.slots.iter_mut().zip(&parent.slots) {
            if slot.is_empty() {
                slot.clone_from(inherited);
            }
        }
    }

    /// Non-empty roles, in [`Role::ALL`] order.
    pub fn iter(&self) -> impl Iterator<Item = (Role, &[Party])> {
        Role::ALL
            .into_iter()
            .map(|role| (role, self.get(role)))
            .filter(|(_, parties)| !parties.is_empty())
    }

    pub fn is_empty(&self) -> bool {
        self.slots.iter().all(Vec::is_empty)
    }
}

impl Serialize for RoleMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        for (role, parties) in self.iter() {
            map.serialize_entry(role.local_name(), parties)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::DocumentFormat;

    fn graph(ttl: &str) -> Graph {
        let doc = format!(
            "@prefix odrl: <http://www.w3.org/ns/odrl/2/> .\n\
             @prefix occe: <https://w3id.org/occe/> .\n\
             @prefix foaf: <http://xmlns.com/foaf/0.1/> .\n\
             @prefix ex: <http://example.com/> .\n{ttl}"
        );
        Graph::parse(&doc, DocumentFormat::Turtle, None).unwrap()
    }

    #[test]
    fn role_table_is_complete() {
        assert_eq!(Role::ALL.len(), ROLE_COUNT);
        for (i, role) in Role::ALL.iter().enumerate() {
            assert_eq!(role.index(), i);
        }
    }

    #[test]
    fn roles_from_both_namespaces() {
        let g = graph(
            "ex:rule odrl:assigner ex:B ;
                     occe:collaboratingParty [ a odrl:PartyCollection ; odrl:source ex:lab ; foaf:name \"Lab\" ] .",
        );
        let map = RoleMap::from_node(&g, &Term::iri("http://example.com/rule")).unwrap();

        let assigners = map.get(Role::Assigner);
        assert_eq!(assigners.len(), 1);
        assert_eq!(assigners[0].sources, ["http://example.com/B"]);
        assert_eq!(assigners[0].kind, PartyKind::Party);

        let collab = &map.get(Role::CollaboratingParty)[0];
        assert_eq!(collab.kind, PartyKind::Collection);
        assert_eq!(collab.name.as_deref(), Some("Lab"));
        assert_eq!(collab.sources, ["http://example.com/lab"]);

        assert!(map.get(Role::Assignee).is_empty());
        assert_eq!(map.iter().count(), 2);
    }

    #[test]
    fn inherit_fills_only_empty_roles() {
        let g = graph(
            "ex:policy odrl:assigner ex:P ; odrl:assignee ex:Q .
             ex:rule odrl:assigner ex:R .",
        );
        let policy = RoleMap::from_node(&g, &Term::iri("http://example.com/policy")).unwrap();
        let mut rule = RoleMap::from_node(&g, &Term::iri("http://example.com/rule")).unwrap();
        rule.inherit(&policy);
        assert_eq!(rule.get(Role::Assigner)[0].sources, ["http://example.com/R"]);
        assert_eq!(rule.get(Role::Assignee)[0].sources, ["http://example.com/Q"]);
    }

    #[test]
    fn serializes_non_empty_roles_by_name() {
        let g = graph("ex:rule odrl:informedParty ex:I .");
        let map = RoleMap::from_node(&g, &Term::iri("http://example.com/rule")).unwrap();
        let json = serde_json::to_value(&map).unwrap();
        let obj = json.as_object().unwrap();
        assert_eq!(obj.len(), 1);
        assert!(obj.contains_key("informedParty"));
    }
}
