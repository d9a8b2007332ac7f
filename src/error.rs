//! Rich diagnostic error types for odrl-explain.
//!
//! Each subsystem defines its own error type with miette `#[diagnostic]` derives,
//! so callers get an error code, help text and the source chain. Structural
//! errors carry the stable `E_*` codes that downstream HTTP layers map to
//! status codes; those strings must not change.

use miette::Diagnostic;
use thiserror::Error;

use crate::model::RuleKind;

/// Top-level error type.
///
/// Each variant wraps a subsystem-specific error, preserving the full
/// diagnostic chain through to the caller.
#[derive(Debug, Error, Diagnostic)]
pub enum OdrlError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Structural(#[from] StructuralError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Graph(#[from] GraphError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Language(#[from] LanguageError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Config(#[from] ConfigError),
}

/// Convenience alias for top-level results.
pub type OdrlResult<T> = std::result::Result<T, OdrlError>;

// ---------------------------------------------------------------------------
// Structural errors
// ---------------------------------------------------------------------------

/// A rule or constraint is missing a mandatory component.
///
/// Fatal to the policy being modelled: the whole translation of that policy
/// is aborted.
#[derive(Debug, Error, Diagnostic)]
pub enum StructuralError {
    #[error("E_NO_ACTION_DEFINED: at least one action must be defined in the {kind} {rule}")]
    #[diagnostic(
        code(E_NO_ACTION_DEFINED),
        help("Add an `odrl:action` to the rule, e.g. `odrl:action odrl:use`.")
    )]
    NoAction { kind: RuleKind, rule: String },

    #[error("E_NO_TARGET_DEFINED: a target property must be defined in the {kind} {rule}")]
    #[diagnostic(
        code(E_NO_TARGET_DEFINED),
        help(
            "Permissions and prohibitions need an `odrl:target` asset. \
             Only duties and obligations may omit it."
        )
    )]
    NoTarget { kind: RuleKind, rule: String },

    #[error("E_NO_LEFT_OPERAND_DEFINED: the constraint {constraint} must have a \"leftOperand\" property defined")]
    #[diagnostic(
        code(E_NO_LEFT_OPERAND_DEFINED),
        help("Every constraint compares an `odrl:leftOperand` against an `odrl:rightOperand`.")
    )]
    NoLeftOperand { constraint: String },

    #[error("E_NO_OPERATOR_DEFINED: the constraint {constraint} must have an \"operator\" property defined")]
    #[diagnostic(
        code(E_NO_OPERATOR_DEFINED),
        help("Add an `odrl:operator` such as `odrl:eq`, `odrl:lt` or `odrl:isAnyOf`.")
    )]
    NoOperator { constraint: String },

    #[error("E_NO_RIGHT_OPERAND_DEFINED: the constraint {constraint} must have a \"rightOperand\" property defined")]
    #[diagnostic(
        code(E_NO_RIGHT_OPERAND_DEFINED),
        help("Add at least one `odrl:rightOperand` value or IRI to the constraint.")
    )]
    NoRightOperand { constraint: String },

    #[error("E_MAX_DEPTH_EXCEEDED: duty {rule} is nested deeper than {max_depth} levels")]
    #[diagnostic(
        code(E_MAX_DEPTH_EXCEEDED),
        help(
            "Duties, remedies and consequences may nest, but not without bound. \
             Check the policy for a consequence that refers back to itself, \
             or raise `max_duty_depth` in the configuration."
        )
    )]
    DepthExceeded { rule: String, max_depth: usize },

    #[error("E_MAX_DUTIES_EXCEEDED: building duty {rule} would exceed {max_duties} duties in one policy")]
    #[diagnostic(
        code(E_MAX_DUTIES_EXCEEDED),
        help(
            "A duty referenced from several rules is expanded once per reference. \
             Check the policy for consequences shared across many levels, \
             or raise `max_duties` in the configuration."
        )
    )]
    TooManyDuties { rule: String, max_duties: usize },
}

impl StructuralError {
    /// The stable error code, e.g. `E_NO_ACTION_DEFINED`.
    pub fn error_code(&self) -> &'static str {
        match self {
            StructuralError::NoAction { .. } => "E_NO_ACTION_DEFINED",
            StructuralError::NoTarget { .. } => "E_NO_TARGET_DEFINED",
            StructuralError::NoLeftOperand { .. } => "E_NO_LEFT_OPERAND_DEFINED",
            StructuralError::NoOperator { .. } => "E_NO_OPERATOR_DEFINED",
            StructuralError::NoRightOperand { .. } => "E_NO_RIGHT_OPERAND_DEFINED",
            StructuralError::DepthExceeded { .. } => "E_MAX_DEPTH_EXCEEDED",
            StructuralError::TooManyDuties { .. } => "E_MAX_DUTIES_EXCEEDED",
        }
    }
}

/// Result type for model construction.
pub type ModelResult<T> = std::result::Result<T, StructuralError>;

// ---------------------------------------------------------------------------
// Graph errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic)]
pub enum GraphError {
    #[error("parse error in {format} document: {message}")]
    #[diagnostic(
        code(odrl::graph::parse),
        help("The document could not be parsed. Verify it is valid {format} and that the right --format was given.")
    )]
    Parse { format: String, message: String },

    #[error("unsupported document format: \"{format}\"")]
    #[diagnostic(
        code(odrl::graph::unsupported_format),
        help("Supported formats are: turtle, ntriples, rdfxml and jsonld.")
    )]
    UnsupportedFormat { format: String },

    #[error("invalid base IRI \"{iri}\": {message}")]
    #[diagnostic(
        code(odrl::graph::base_iri),
        help("The base IRI must be absolute, e.g. `https://example.com/policy/1`.")
    )]
    InvalidBaseIri { iri: String, message: String },
}

// ---------------------------------------------------------------------------
// Fetch errors
// ---------------------------------------------------------------------------

/// Remote ontology fetch failures.
///
/// Never fatal to a translation run: the label resolver logs them and falls
/// back to the raw IRI.
#[derive(Debug, Error, Diagnostic)]
pub enum FetchError {
    #[error("not a dereferenceable IRI: \"{iri}\"")]
    #[diagnostic(
        code(odrl::fetch::not_http),
        help("Only http:// and https:// IRIs can be fetched.")
    )]
    NotHttp { iri: String },

    #[error("HTTP {status} fetching \"{url}\"")]
    #[diagnostic(
        code(odrl::fetch::status),
        help("The ontology server answered with an error status.")
    )]
    Status { url: String, status: u16 },

    #[error("transport error fetching \"{url}\": {message}")]
    #[diagnostic(
        code(odrl::fetch::transport),
        help("Check that the URL is reachable and the network is available.")
    )]
    Transport { url: String, message: String },

    #[error("unsupported content type \"{content_type}\" from \"{url}\"")]
    #[diagnostic(
        code(odrl::fetch::content_type),
        help("The server did not return an RDF serialization.")
    )]
    ContentType { url: String, content_type: String },

    #[error("unparsable ontology document from \"{url}\": {source}")]
    #[diagnostic(
        code(odrl::fetch::parse),
        help("The response body is not valid RDF in the announced format.")
    )]
    Parse {
        url: String,
        #[source]
        source: GraphError,
    },

    #[error("fetch task for \"{url}\" failed: {message}")]
    #[diagnostic(code(odrl::fetch::task), help("The blocking fetch task panicked or was cancelled."))]
    Task { url: String, message: String },
}

// ---------------------------------------------------------------------------
// Language (text translation service) errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic)]
pub enum LanguageError {
    #[error("no text translation service configured for target language \"{target}\"")]
    #[diagnostic(
        code(odrl::language::no_service),
        help("Set `translation.endpoint` in the configuration, or omit --language.")
    )]
    NoService { target: String },

    #[error("text translation from {source_language} to {target} failed: {message}")]
    #[diagnostic(
        code(odrl::language::service),
        help(
            "The translation service rejected the request or was unreachable. \
             A failed sentence aborts the run; no untranslated fallback is used."
        )
    )]
    Service {
        source_language: String,
        target: String,
        message: String,
    },
}

// ---------------------------------------------------------------------------
// Config errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic)]
pub enum ConfigError {
    #[error("failed to read config: {path}")]
    #[diagnostic(
        code(odrl::config::read),
        help("Ensure the config file exists and is readable.")
    )]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {path}")]
    #[diagnostic(
        code(odrl::config::parse),
        help("Check the TOML syntax in the config file: {message}")
    )]
    Parse { path: String, message: String },

    #[error("failed to write config: {path}")]
    #[diagnostic(
        code(odrl::config::write),
        help("Ensure you have write permissions to the config directory.")
    )]
    Write {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid configuration: {message}")]
    #[diagnostic(code(odrl::config::invalid), help("Fix the offending value and retry."))]
    Invalid { message: String },
}
