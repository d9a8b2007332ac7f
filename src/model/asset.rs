//! Assets: the targets and outputs of a rule.

use serde::Serialize;

use crate::error::ModelResult;
use crate::graph::{Graph, Term};
use crate::vocab::{dcterms, odrl_terms, rdf};

use super::constraint::ConstraintGroup;
use super::node::NodeRef;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Asset {
    pub reference: NodeRef,
    /// `odrl:uid` of a described asset, otherwise the referenced term.
    pub iri: String,
    pub types: Vec<String>,
    /// Locations identifying the asset (`odrl:uid`, `odrl:source`, or the IRI itself).
    pub urls: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub refinements: ConstraintGroup,
}

impl Asset {
    /// Build the asset named by the object of an `odrl:target`/`odrl:output` statement.
    pub fn build(graph: &Graph, object: &Term) -> ModelResult<Self> {
        let reference = NodeRef::probe(graph, object);
        let iri = reference.resolve(graph, odrl_terms::UID).value().to_string();

        let (types, urls, title, refinements) = match reference.described() {
            Some(node) => {
                let types = values(graph, node, rdf::TYPE);
                let mut urls = values(graph, node, odrl_terms::UID);
                if urls.is_empty() {
                    urls = values(graph, node, odrl_terms::SOURCE);
                }
                if urls.is_empty() && node.is_iri() {
                    urls.push(node.value().to_string());
                }
                let title = graph
                    .first_object(node, dcterms::TITLE)
                    .map(|t| t.value().to_string());
                let refinements =
                    ConstraintGroup::from_holder(graph, node, odrl_terms::REFINEMENT)?;
                (types, urls, title, refinements)
            }
            None => (
                Vec::new(),
                vec![iri.clone()],
                None,
                ConstraintGroup::default(),
            ),
        };

        Ok(Self {
            reference,
            iri,
            types,
            urls,
            title,
            refinements,
        })
    }

    /// Whether the asset is declared an `odrl:AssetCollection`.
    pub fn is_collection(&self) -> bool {
        self.types.iter().any(|t| t == odrl_terms::ASSET_COLLECTION)
    }
}

pub(crate) fn values(graph: &Graph, node: &Term, predicate: &str) -> Vec<String> {
    graph
        .objects(node, predicate)
        .into_iter()
        .map(|t| t.value().to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::DocumentFormat;

    fn target(ttl: &str) -> Asset {
        let doc = format!(
            "@prefix odrl: <http://www.w3.org/ns/odrl/2/> .\n\
             @prefix dct: <http://purl.org/dc/terms/> .\n\
             @prefix ex: <http://example.com/> .\n{ttl}"
        );
        let g = Graph::parse(&doc, DocumentFormat::Turtle, None).unwrap();
        let object = g
            .first_object(&Term::iri("http://example.com/rule"), odrl_terms::TARGET)
            .unwrap()
            .clone();
        Asset::build(&g, &object).unwrap()
    }

    #[test]
    fn direct_target_is_its_own_url() {
        let asset = target("ex:rule odrl:target ex:A .");
        assert_eq!(asset.iri, "http://example.com/A");
        assert_eq!(asset.urls, ["http://example.com/A"]);
        assert!(!asset.is_collection());
    }

    #[test]
    fn described_collection() {
        let asset = target(
            "ex:rule odrl:target [ a odrl:AssetCollection ; odrl:source ex:dataset ;
                dct:title \"Cohort data\" ;
                odrl:refinement [ odrl:leftOperand odrl:count ; odrl:operator odrl:lt ; odrl:rightOperand 10 ] ] .",
        );
        assert!(asset.is_collection());
        assert_eq!(asset.urls, ["http://example.com/dataset"]);
        assert_eq!(asset.title.as_deref(), Some("Cohort data"));
        assert_eq!(asset.refinements.len(), 1);
    }

    #[test]
    fn uid_wins_over_source() {
        let asset = target(
            "ex:rule odrl:target [ odrl:uid ex:one ; odrl:source ex:two ] .",
        );
        assert_eq!(asset.iri, "http://example.com/one");
        assert_eq!(asset.urls, ["http://example.com/one"]);
    }
}
