//! Human-readable labels for IRIs.
//!
//! Resolution order, first hit wins:
//!
//! 1. the static [`SentenceDictionary`]
//! 2. a label statement in the policy graph
//! 3. a label statement in the IRI's remotely fetched defining document
//! 4. the IRI itself
//!
//! Every result is memoised for the lifetime of one [`LabelResolver`], i.e.
//! one translation run. The memo holds a `OnceCell` per IRI, so concurrent
//! callers asking for the same IRI await the first caller's lookup instead
//! of fetching again. Fetched documents are memoised the same way, keyed by
//! document URL, so terms of one vocabulary share a single download.

pub mod fetch;

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, LazyLock};

use dashmap::DashMap;
use regex::Regex;
use tokio::sync::OnceCell;

use crate::graph::{Graph, Term};
use crate::sentences::{SentenceDictionary, interpolate};
use crate::vocab::{DPV_NS, rdfs, skos};

pub use fetch::{FetchResult, HttpFetcher, OntologyFetcher, document_url};

static QNAME_LIKE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z]+:[a-zA-Z]+$").expect("qname regex is valid"));

type Memo<T> = DashMap<String, Arc<OnceCell<T>>>;

/// Per-run label resolver.
pub struct LabelResolver<'g> {
    graph: &'g Graph,
    dictionary: &'static SentenceDictionary,
    fetcher: Option<Arc<dyn OntologyFetcher>>,
    labels: Memo<String>,
    documents: Memo<Option<Arc<Graph>>>,
    fetches: AtomicUsize,
}

impl<'g> LabelResolver<'g> {
    /// A resolver over `graph` that never leaves the process.
    pub fn new(graph: &'g Graph) -> Self {
        Self {
            graph,
            dictionary: SentenceDictionary::standard(),
            fetcher: None,
            labels: DashMap::new(),
            documents: DashMap::new(),
            fetches: AtomicUsize::new(0),
        }
    }

    /// Enable remote lookups through `fetcher`.
    pub fn with_fetcher(mut self, fetcher: Arc<dyn OntologyFetcher>) -> Self {
        self.fetcher = Some(fetcher);
        self
    }

    pub fn dictionary(&self) -> &'static SentenceDictionary {
        self.dictionary
    }

    /// Number of remote fetches issued so far.
    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::Relaxed)
    }

    /// Label for `iri`. Never fails; the raw IRI is the last resort.
    pub async fn resolve(&self, iri: &str) -> String {
        if let Some(phrase) = self.dictionary.phrase(iri) {
            return phrase.to_string();
        }

        let cell = self.labels.entry(iri.to_string()).or_default().clone();
        cell.get_or_init(|| self.lookup(iri)).await.clone()
    }

    /// Template for a constraint's `(left operand, operator)` pair, filled
    /// from `args`.
    pub fn resolve_template(&self, left_operand: &str, operator: &str, args: &[(&str, &str)]) -> Option<String> {
        self.dictionary
            .constraint_template(left_operand, operator)
            .map(|template| interpolate(template, args))
    }

    async fn lookup(&self, iri: &str) -> String {
        if let Some(label) = label_in(self.graph, iri) {
            tracing::debug!(iri, %label, "label from policy graph");
            return label;
        }

        if let Some(document) = self.document(iri).await
            && let Some(label) = label_in(&document, iri)
        {
            tracing::debug!(iri, %label, "label from remote document");
            return label;
        }

        tracing::debug!(iri, "no label found; using IRI");
        iri.to_string()
    }

    async fn document(&self, iri: &str) -> Option<Arc<Graph>> {
        let fetcher = self.fetcher.as_ref()?;
        if !crate::vocab::is_http_iri(iri) {
            return None;
        }
        let cell = self.documents.entry(document_url(iri)).or_default().clone();
        cell.get_or_init(|| async {
            self.fetches.fetch_add(1, Ordering::Relaxed);
            match fetcher.fetch(iri).await {
                Ok(graph) => Some(Arc::new(graph)),
                Err(err) => {
                    tracing::warn!(iri, error = %err, "ontology fetch failed; falling back to IRI");
                    None
                }
            }
        })
        .await
        .clone()
    }
}

/// Pick a label for `iri` from `graph`.
///
/// DPV terms use `skos:prefLabel`, everything else `rdfs:label`. English or
/// untagged labels are preferred; a leading `"has "` is dropped and
/// QName-shaped labels are ignored.
pub fn label_in(graph: &Graph, iri: &str) -> Option<String> {
    let subject = Term::iri(iri);
    let predicates: &[&str] = if iri.starts_with(DPV_NS) || iri.contains("dpv#") {
        &[skos::PREF_LABEL, rdfs::LABEL]
    } else {
        &[rdfs::LABEL]
    };

    predicates.iter().find_map(|predicate| {
        let candidates: Vec<(&str, Option<&str>)> = graph
            .objects(&subject, predicate)
            .into_iter()
            .filter_map(Term::as_literal)
            .map(|lit| (lit.value.as_str(), lit.language.as_deref()))
            .filter(|(value, _)| !value.trim().is_empty() && !QNAME_LIKE.is_match(value))
            .collect();

        let best = candidates
            .iter()
            .find(|(_, lang)| lang.is_some_and(|l| l.eq_ignore_ascii_case("en") || l.starts_with("en-")))
            .or_else(|| candidates.iter().find(|(_, lang)| lang.is_none()))
            .or_else(|| candidates.first())?;

        let label = best.0.trim();
        Some(label.strip_prefix("has ").unwrap_or(label).to_string())
    })
}
