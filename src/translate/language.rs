//! Translating generated sentences into another natural language.
//!
//! Sentences are generated in the source language (English by default) and,
//! when a different target language is requested, every one of them is sent
//! through a [`TextTranslator`]. A failure aborts the run: a half-translated
//! result is never returned.

use async_trait::async_trait;
use futures_util::future::try_join_all;
use serde::{Deserialize, Serialize};

use crate::config::TranslationConfig;
use crate::error::LanguageError;

use super::Translation;

pub type LanguageResult<T> = std::result::Result<T, LanguageError>;

/// Language names accepted in place of ISO 639-1 codes.
const LANGUAGE_NAMES: &[(&str, &str)] = &[
    ("english", "en"),
    ("french", "fr"),
    ("german", "de"),
    ("spanish", "es"),
    ("italian", "it"),
    ("portuguese", "pt"),
    ("dutch", "nl"),
    ("polish", "pl"),
    ("russian", "ru"),
    ("chinese", "zh"),
    ("japanese", "ja"),
    ("arabic", "ar"),
    ("hebrew", "he"),
    ("romanian", "ro"),
    ("turkish", "tr"),
    ("swedish", "sv"),
    ("ukrainian", "uk"),
];

/// Translates one sentence between two languages.
#[async_trait]
pub trait TextTranslator: Send + Sync {
    async fn translate(&self, text: &str, source: &str, target: &str) -> LanguageResult<String>;
}

/// Lower-cased primary language code: `"English"` → `"en"`, `"fr-CA"` → `"fr"`.
pub fn normalize_language(language: &str) -> String {
    let lower = language.trim().to_lowercase();
    if let Some((_, code)) = LANGUAGE_NAMES.iter().find(|(name, _)| *name == lower) {
        return (*code).to_string();
    }
    lower
        .split(['-', '_'])
        .next()
        .unwrap_or_default()
        .to_string()
}

/// Whether translating from `source` to `target` would change anything.
pub fn needs_translation(source: &str, target: &str) -> bool {
    normalize_language(source) != normalize_language(target)
}

/// Translate every sentence of `translation` in place.
///
/// Does nothing when `target` is the source language. Sentences are sent
/// concurrently; the first failure is returned and `translation` is left
/// untouched.
pub async fn localize(
    translation: &mut Translation,
    translator: &dyn TextTranslator,
    source: &str,
    target: &str,
) -> LanguageResult<()> {
    if !needs_translation(source, target) {
        return Ok(());
    }
    let (source, target) = (normalize_language(source), normalize_language(target));

    let mut texts = translation.texts_mut();
    let translated = try_join_all(
        texts
            .iter()
            .map(|text| translator.translate(text.as_str(), &source, &target)),
    )
    .await?;

    tracing::debug!(sentences = translated.len(), %source, %target, "localized translation");
    for (slot, text) in texts.iter_mut().zip(translated) {
        **slot = text;
    }
    Ok(())
}

#[derive(Debug, Serialize)]
struct TranslateRequest<'a> {
    q: &'a str,
    source: &'a str,
    target: &'a str,
    format: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    api_key: Option<&'a str>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TranslateResponse {
    translated_text: String,
}

/// Client of a LibreTranslate-compatible `/translate` endpoint.
#[derive(Debug, Clone)]
pub struct HttpTextTranslator {
    agent: ureq::Agent,
    endpoint: String,
    api_key: Option<String>,
}

impl HttpTextTranslator {
    pub fn new(endpoint: impl Into<String>, config: &TranslationConfig) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build();
        Self {
            agent,
            endpoint: endpoint.into(),
            api_key: config.api_key.clone(),
        }
    }

    /// The configured service, or `None` when no endpoint is set.
    pub fn from_config(config: &TranslationConfig) -> Option<Self> {
        config
            .endpoint
            .as_ref()
            .map(|endpoint| Self::new(endpoint.clone(), config))
    }

    fn translate_blocking(&self, text: &str, source: &str, target: &str) -> LanguageResult<String> {
        let service_error = |message: String| LanguageError::Service {
            source_language: source.to_string(),
            target: target.to_string(),
            message,
        };

        let request = TranslateRequest {
            q: text,
            source,
            target,
            format: "text",
            api_key: self.api_key.as_deref(),
        };
        let resp = self
            .agent
            .post(&self.endpoint)
            .send_json(&request)
            .map_err(|e| service_error(e.to_string()))?;
        let body: TranslateResponse = resp
            .into_json()
            .map_err(|e| service_error(format!("failed to parse JSON: {e}")))?;
        Ok(body.translated_text)
    }
}

#[async_trait]
impl TextTranslator for HttpTextTranslator {
    async fn translate(&self, text: &str, source: &str, target: &str) -> LanguageResult<String> {
        let this = self.clone();
        let (text, source, target) = (text.to_string(), source.to_string(), target.to_string());
        let (src, tgt) = (source.clone(), target.clone());
        tokio::task::spawn_blocking(move || this.translate_blocking(&text, &source, &target))
            .await
            .map_err(|e| LanguageError::Service {
                source_language: src,
                target: tgt,
                message: e.to_string(),
            })?
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::translate::{TranslatedAction, TranslatedPermission};
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct Shouting {
        calls: AtomicUsize,
        fail_on: Option<&'static str>,
    }

    #[async_trait]
    impl TextTranslator for Shouting {
        async fn translate(&self, text: &str, _source: &str, target: &str) -> LanguageResult<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail_on == Some(text) {
                return Err(LanguageError::Service {
                    source_language: "en".into(),
                    target: target.into(),
                    message: "rejected".into(),
                });
            }
            Ok(format!("[{target}] {}", text.to_uppercase()))
        }
    }

    fn sample() -> Translation {
        let mut t = Translation {
            policy: "http://example.com/p".into(),
            description: "This is a policy".into(),
            ..Default::default()
        };
        t.permissions.insert(
            "http://example.com/perm".into(),
            TranslatedPermission {
                cce: Some("Research Use".into()),
                actions: vec![TranslatedAction {
                    sentence: "Permission to use".into(),
                    refinements: vec!["Count lesser than 3".into()],
                }],
                constraints: vec!["Must operate under the EU jurisdiction".into()],
                ..Default::default()
            },
        );
        t
    }

    #[test]
    fn language_codes() {
        assert_eq!(normalize_language("English"), "en");
        assert_eq!(normalize_language("fr-CA"), "fr");
        assert_eq!(normalize_language(" de "), "de");
        assert_eq!(normalize_language("pt_BR"), "pt");
        assert!(!needs_translation("en", "english"));
        assert!(needs_translation("en", "french"));
    }

    #[tokio::test]
    async fn every_sentence_is_translated() {
        let translator = Shouting {
            calls: AtomicUsize::new(0),
            fail_on: None,
        };
        let mut t = sample();
        localize(&mut t, &translator, "en", "French").await.unwrap();

        assert_eq!(translator.calls.load(Ordering::SeqCst), 4);
        assert_eq!(t.description, "[fr] THIS IS A POLICY");
        let perm = &t.permissions["http://example.com/perm"];
        assert_eq!(perm.actions[0].sentence, "[fr] PERMISSION TO USE");
        assert_eq!(perm.actions[0].refinements[0], "[fr] COUNT LESSER THAN 3");
        assert_eq!(perm.cce.as_deref(), Some("Research Use"));
    }

    #[tokio::test]
    async fn same_language_is_a_no_op() {
        let translator = Shouting {
            calls: AtomicUsize::new(0),
            fail_on: None,
        };
        let mut t = sample();
        localize(&mut t, &translator, "en", "en-GB").await.unwrap();
        assert_eq!(translator.calls.load(Ordering::SeqCst), 0);
        assert_eq!(t, sample());
    }

    #[tokio::test]
    async fn failure_aborts_and_leaves_input_untouched() {
        let translator = Shouting {
            calls: AtomicUsize::new(0),
            fail_on: Some("Count lesser than 3"),
        };
        let mut t = sample();
        let err = localize(&mut t, &translator, "en", "de").await.unwrap_err();
        assert!(matches!(err, LanguageError::Service { .. }));
        assert_eq!(t, sample());
    }

    #[test]
    fn service_from_config() {
        let mut config = TranslationConfig::default();
        assert!(HttpTextTranslator::from_config(&config).is_none());
        config.endpoint = Some("http://localhost:5000/translate".into());
        let service = HttpTextTranslator::from_config(&config).unwrap();
        assert_eq!(service.endpoint, "http://localhost:5000/translate");
    }
}
