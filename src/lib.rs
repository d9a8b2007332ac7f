// thiserror's #[error("...{field}...")] format strings reference struct fields,
// but the compiler doesn't see through the derive macro and reports false positives.
#![allow(unused_assignments)]

//! # odrl-explain
//!
//! Reads ODRL usage policies from an RDF graph, builds a typed model of them
//! and explains every rule in plain language.
//!
//! ## Architecture
//!
//! - **Graph** (`graph`): owned triple store with wildcard pattern queries, loaded via `oxigraph`
//! - **Model** (`model`): policies, rules, actions, assets, parties, constraints and logical constraint lists
//! - **Sentences** (`sentences`, `duration`): typed phrase dictionary and `xsd:duration` rendering
//! - **Labels** (`label`): dictionary → graph → remote ontology → raw IRI, memoised per run
//! - **Translation** (`translate`): recursive sentence generation and optional localisation
//!
//! ## Library usage
//!
//! ```no_run
//! use odrl_explain::config::ExplainConfig;
//! use odrl_explain::explain::Explainer;
//! use odrl_explain::graph::DocumentFormat;
//!
//! # async fn run() -> odrl_explain::error::OdrlResult<()> {
//! let explainer = Explainer::new(ExplainConfig::offline())?;
//! let policy = std::fs::read_to_string("policy.ttl").unwrap();
//! let translations = explainer
//!     .translate(&policy, DocumentFormat::Turtle, None, None)
//!     .await?;
//! println!("{}", translations[0].description);
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod duration;
pub mod error;
pub mod explain;
pub mod graph;
pub mod label;
pub mod model;
pub mod sentences;
pub mod translate;
pub mod vocab;
