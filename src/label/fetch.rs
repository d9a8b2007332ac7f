//! Remote ontology documents.
//!
//! [`OntologyFetcher`] is the injected capability the label resolver uses to
//! dereference an IRI. [`HttpFetcher`] implements it with `ureq` on tokio's
//! blocking pool, content-negotiating RDF and retrying transient failures.

use std::time::Duration;

use async_trait::async_trait;

use crate::config::FetchConfig;
use crate::error::FetchError;
use crate::graph::{DocumentFormat, Graph};
use crate::vocab;

pub type FetchResult<T> = std::result::Result<T, FetchError>;

/// Term-ID prefixes served through the Ontobee browser instead of their IRI.
const ONTOBEE_PREFIXES: &[&str] = &[
    "ICO_", "NCIT_", "HP_", "UBERON_", "MP_", "SYMP_", "SIO_", "DUO_", "EFO_", "T4FS_", "EDAM_",
];

/// Dereferences an IRI into the graph of its defining document.
#[async_trait]
pub trait OntologyFetcher: Send + Sync {
    async fn fetch(&self, iri: &str) -> FetchResult<Graph>;
}

/// URL to request for `iri`: the Ontobee page for known term-ID prefixes,
/// otherwise the IRI without its fragment.
pub fn document_url(iri: &str) -> String {
    if let Some(prefix) = ONTOBEE_PREFIXES.iter().find(|p| iri.contains(*p)) {
        let ontology = prefix.trim_end_matches('_');
        return format!("https://ontobee.org/ontology/{ontology}?iri={iri}");
    }
    strip_fragment(iri).to_string()
}

fn strip_fragment(iri: &str) -> &str {
    iri.split_once('#').map_or(iri, |(document, _)| document)
}

/// Fetches ontology documents over HTTP.
///
/// No credentials or cookies are sent.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    agent: ureq::Agent,
    config: FetchConfig,
}

impl HttpFetcher {
    pub fn new(config: &FetchConfig) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout(config.timeout())
            .redirects(5)
            .build();
        Self {
            agent,
            config: config.clone(),
        }
    }

    fn is_transient(err: &FetchError) -> bool {
        match err {
            FetchError::Transport { .. } => true,
            FetchError::Status { status, .. } => *status >= 500,
            _ => false,
        }
    }
}

#[async_trait]
impl OntologyFetcher for HttpFetcher {
    async fn fetch(&self, iri: &str) -> FetchResult<Graph> {
        if !vocab::is_http_iri(iri) {
            return Err(FetchError::NotHttp { iri: iri.to_string() });
        }
        let url = document_url(iri);

        let mut attempt = 0u32;
        loop {
            let agent = self.agent.clone();
            let accept = self.config.accept.clone();
            let (task_url, base) = (url.clone(), iri.to_string());
            let result = tokio::task::spawn_blocking(move || fetch_blocking(&agent, &task_url, &base, &accept))
                .await
                .map_err(|e| FetchError::Task {
                    url: url.clone(),
                    message: e.to_string(),
                })
                .and_then(|r| r);

            match result {
                Err(err) if attempt < self.config.retries && Self::is_transient(&err) => {
                    attempt += 1;
                    let delay: Duration = self.config.backoff(attempt);
                    tracing::debug!(%url, attempt, ?delay, error = %err, "retrying ontology fetch");
                    tokio::time::sleep(delay).await;
                }
                other => return other,
            }
        }
    }
}

fn fetch_blocking(agent: &ureq::Agent, url: &str, iri: &str, accept: &str) -> FetchResult<Graph> {
    let response = match agent.get(url).set("Accept", accept).call() {
        Ok(response) => response,
        Err(ureq::Error::Status(code, _)) => {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: code,
            });
        }
        Err(ureq::Error::Transport(transport)) => {
            return Err(FetchError::Transport {
                url: url.to_string(),
                message: transport.to_string(),
            });
        }
    };

    let content_type = response.content_type().to_string();
    let format = DocumentFormat::from_content_type(&content_type).ok_or_else(|| FetchError::ContentType {
        url: url.to_string(),
        content_type: content_type.clone(),
    })?;
    let body = response.into_string().map_err(|e| FetchError::Transport {
        url: url.to_string(),
        message: e.to_string(),
    })?;

    let graph = Graph::parse(&body, format, Some(strip_fragment(iri))).map_err(|source| FetchError::Parse {
        url: url.to_string(),
        source,
    })?;
    tracing::debug!(%url, %format, statements = graph.len(), "fetched ontology document");
    Ok(graph)
}
