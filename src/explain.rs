//! The `Explainer` facade: document → graph → model → sentences.
//!
//! Owns the configuration and the two injected collaborators (ontology
//! fetcher, text translator). Each call to [`Explainer::translate`] is one
//! translation run with its own label memo.

use std::sync::Arc;

use crate::config::ExplainConfig;
use crate::error::{LanguageError, OdrlResult};
use crate::graph::{DocumentFormat, Graph};
use crate::label::{HttpFetcher, LabelResolver, OntologyFetcher};
use crate::model::{Policy, PolicyRef};
use crate::translate::language::{HttpTextTranslator, TextTranslator, localize, needs_translation};
use crate::translate::{Translation, Translator};

pub struct Explainer {
    config: ExplainConfig,
    fetcher: Option<Arc<dyn OntologyFetcher>>,
    translator: Option<Arc<dyn TextTranslator>>,
}

impl std::fmt::Debug for Explainer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Explainer")
            .field("config", &self.config)
            .field("fetcher", &self.fetcher.is_some())
            .field("translator", &self.translator.is_some())
            .finish()
    }
}

impl Explainer {
    /// Build with the HTTP collaborators the configuration asks for.
    pub fn new(config: ExplainConfig) -> OdrlResult<Self> {
        config.validate()?;
        let fetcher = config
            .fetch
            .enabled
            .then(|| Arc::new(HttpFetcher::new(&config.fetch)) as Arc<dyn OntologyFetcher>);
        let translator = HttpTextTranslator::from_config(&config.translation)
            .map(|t| Arc::new(t) as Arc<dyn TextTranslator>);
        Ok(Self {
            config,
            fetcher,
            translator,
        })
    }

    /// Replace the ontology fetcher.
    pub fn with_fetcher(mut self, fetcher: Arc<dyn OntologyFetcher>) -> Self {
        self.fetcher = Some(fetcher);
        self
    }

    /// Replace the text translation service.
    pub fn with_translator(mut self, translator: Arc<dyn TextTranslator>) -> Self {
        self.translator = Some(translator);
        self
    }

    pub fn config(&self) -> &ExplainConfig {
        &self.config
    }

    /// Parse `input` and merge the configured vocabulary documents into it.
    ///
    /// A vocabulary that cannot be fetched is skipped with a warning.
    pub async fn load_graph(
        &self,
        input: &str,
        format: DocumentFormat,
        base: Option<&str>,
    ) -> OdrlResult<Graph> {
        let mut graph = Graph::parse(input, format, base)?;
        tracing::info!(%format, statements = graph.len(), "parsed policy document");

        let Some(fetcher) = &self.fetcher else {
            return Ok(graph);
        };
        for url in &self.config.fetch.preload {
            match fetcher.fetch(url).await {
                Ok(vocabulary) => {
                    let added = graph.merge(vocabulary);
                    tracing::debug!(%url, added, "merged vocabulary");
                }
                Err(err) => tracing::warn!(%url, error = %err, "vocabulary preload failed; skipping"),
            }
        }
        Ok(graph)
    }

    /// Policy nodes in `graph`.
    pub fn policies(&self, graph: &Graph) -> Vec<PolicyRef> {
        Policy::discover(graph)
    }

    /// Typed model of every policy in `graph`.
    pub fn models(&self, graph: &Graph) -> OdrlResult<Vec<Policy>> {
        Ok(Policy::from_graph(graph, self.config.max_duty_depth, self.config.max_duties)?)
    }

    /// Translate every policy in an already loaded graph, into `language`
    /// when given.
    pub async fn translate_graph(
        &self,
        graph: &Graph,
        language: Option<&str>,
    ) -> OdrlResult<Vec<Translation>> {
        let policies = self.models(graph)?;

        let mut labels = LabelResolver::new(graph);
        if let Some(fetcher) = &self.fetcher {
            labels = labels.with_fetcher(Arc::clone(fetcher));
        }
        let translator = Translator::new(labels);
        let mut translations = translator.translate_all(&policies).await;

        let source = self.config.source_language.as_str();
        if let Some(target) = language
            && needs_translation(source, target)
        {
            let service = self.translator.as_ref().ok_or_else(|| LanguageError::NoService {
                target: target.to_string(),
            })?;
            for translation in &mut translations {
                localize(translation, service.as_ref(), source, target).await?;
            }
        }

        Ok(translations)
    }

    /// One full run: parse, preload, model, translate.
    pub async fn translate(
        &self,
        input: &str,
        format: DocumentFormat,
        base: Option<&str>,
        language: Option<&str>,
    ) -> OdrlResult<Vec<Translation>> {
        let graph = self.load_graph(input, format, base).await?;
        self.translate_graph(&graph, language).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{FetchError, OdrlError};
    use crate::label::FetchResult;
    use async_trait::async_trait;

    struct Vocabulary;

    #[async_trait]
    impl OntologyFetcher for Vocabulary {
        async fn fetch(&self, iri: &str) -> FetchResult<Graph> {
            if iri.ends_with("broken.ttl") {
                return Err(FetchError::Status {
                    url: iri.into(),
                    status: 500,
                });
            }
            Graph::parse(
                "<http://www.w3.org/ns/odrl/2/use> <http://www.w3.org/2000/01/rdf-schema#label> \"Use\"@en .",
                DocumentFormat::NTriples,
                None,
            )
            .map_err(|source| FetchError::Parse {
                url: iri.into(),
                source,
            })
        }
    }

    const POLICY: &str = "@prefix odrl: <http://www.w3.org/ns/odrl/2/> .
@prefix ex: <http://example.com/> .
ex:p a odrl:Set ; odrl:permission [ odrl:uid ex:perm ; odrl:action odrl:use ; odrl:target ex:A ] .";

    fn explainer(preload: &[&str]) -> Explainer {
        let mut config = ExplainConfig::offline();
        config.fetch.preload = preload.iter().map(|s| s.to_string()).collect();
        Explainer::new(config)
            .unwrap()
            .with_fetcher(Arc::new(Vocabulary))
    }

    #[tokio::test]
    async fn preload_supplies_labels() {
        let explainer = explainer(&["http://vocab.example/odrl.ttl", "http://vocab.example/broken.ttl"]);
        let translations = explainer
            .translate(POLICY, DocumentFormat::Turtle, None, None)
            .await
            .unwrap();
        assert_eq!(translations.len(), 1);
        assert_eq!(
            translations[0].permissions["http://example.com/perm"].actions[0].sentence,
            "Permission to use the asset http://example.com/A"
        );
    }

    #[tokio::test]
    async fn other_language_without_service_fails() {
        let explainer = explainer(&[]);
        let err = explainer
            .translate(POLICY, DocumentFormat::Turtle, None, Some("french"))
            .await
            .unwrap_err();
        assert!(matches!(err, OdrlError::Language(LanguageError::NoService { .. })));

        // Same language needs no service.
        assert!(
            explainer
                .translate(POLICY, DocumentFormat::Turtle, None, Some("English"))
                .await
                .is_ok()
        );
    }

    #[tokio::test]
    async fn lists_policies() {
        let explainer = explainer(&[]);
        let graph = explainer
            .load_graph(POLICY, DocumentFormat::Turtle, None)
            .await
            .unwrap();
        let found = explainer.policies(&graph);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].node.value(), "http://example.com/p");
    }

    #[test]
    fn invalid_config_is_rejected() {
        let mut config = ExplainConfig::offline();
        config.max_duty_depth = 0;
        assert!(matches!(Explainer::new(config), Err(OdrlError::Config(_))));
    }
}
