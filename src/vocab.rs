//! Namespace constants for the vocabularies a usage policy draws on.
//!
//! Terms are plain `&'static str` IRIs; [`odrl`] and friends build full IRIs
//! for local names that are only known at runtime (roles, logical operands).

pub const ODRL_NS: &str = "http://www.w3.org/ns/odrl/2/";
pub const RDF_NS: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#";
pub const RDFS_NS: &str = "http://www.w3.org/2000/01/rdf-schema#";
pub const SKOS_NS: &str = "http://www.w3.org/2004/02/skos/core#";
pub const XSD_NS: &str = "http://www.w3.org/2001/XMLSchema#";
pub const OCCE_NS: &str = "https://w3id.org/occe/";
pub const DPV_NS: &str = "https://w3id.org/dpv#";
pub const DCTERMS_NS: &str = "http://purl.org/dc/terms/";
pub const DCE_NS: &str = "http://purl.org/dc/elements/1.1/";
pub const CC_NS: &str = "http://creativecommons.org/ns#";
pub const OBO_NS: &str = "http://purl.obolibrary.org/obo/";
pub const FOAF_NS: &str = "http://xmlns.com/foaf/0.1/";

/// Full IRI of an ODRL term.
pub fn odrl(local: &str) -> String {
    format!("{ODRL_NS}{local}")
}

/// Full IRI of an OCCE profile term.
pub fn occe(local: &str) -> String {
    format!("{OCCE_NS}{local}")
}

/// Full IRI of an XML Schema datatype.
pub fn xsd(local: &str) -> String {
    format!("{XSD_NS}{local}")
}

pub mod rdf {
    pub const TYPE: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#type";
    pub const VALUE: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#value";
    pub const FIRST: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#first";
    pub const REST: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#rest";
    pub const NIL: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#nil";
}

pub mod rdfs {
    pub const LABEL: &str = "http://www.w3.org/2000/01/rdf-schema#label";
}

pub mod skos {
    pub const PREF_LABEL: &str = "http://www.w3.org/2004/02/skos/core#prefLabel";
}

pub mod dcterms {
    pub const CREATOR: &str = "http://purl.org/dc/terms/creator";
    pub const ISSUED: &str = "http://purl.org/dc/terms/issued";
    pub const COVERAGE: &str = "http://purl.org/dc/terms/coverage";
    pub const TITLE: &str = "http://purl.org/dc/terms/title";
}

pub mod dce {
    pub const SUBJECT: &str = "http://purl.org/dc/elements/1.1/subject";
}

pub mod foaf {
    pub const NAME: &str = "http://xmlns.com/foaf/0.1/name";
}

pub mod dpv {
    pub const CONTEXT: &str = "https://w3id.org/dpv#Context";
}

pub mod cc {
    pub const ATTRIBUTION: &str = "http://creativecommons.org/ns#Attribution";
}

pub mod obo {
    /// "Collaborate" in the NCI thesaurus.
    pub const COLLABORATE: &str = "http://purl.obolibrary.org/obo/NCIT_C73529";
    /// "Notification" in the NCI thesaurus.
    pub const NOTIFY: &str = "http://purl.obolibrary.org/obo/NCIT_C19026";
}

pub mod occe_terms {
    pub const COLLABORATE: &str = "https://w3id.org/occe/collaborate";
    pub const NEGOTIATE: &str = "https://w3id.org/occe/negotiate";
}

/// ODRL core terms used structurally by the model.
pub mod odrl_terms {
    pub const POLICY: &str = "http://www.w3.org/ns/odrl/2/Policy";
    pub const SET: &str = "http://www.w3.org/ns/odrl/2/Set";
    pub const OFFER: &str = "http://www.w3.org/ns/odrl/2/Offer";
    pub const AGREEMENT: &str = "http://www.w3.org/ns/odrl/2/Agreement";
    pub const REQUEST: &str = "http://www.w3.org/ns/odrl/2/Request";

    pub const PERMISSION: &str = "http://www.w3.org/ns/odrl/2/permission";
    pub const PROHIBITION: &str = "http://www.w3.org/ns/odrl/2/prohibition";
    pub const OBLIGATION: &str = "http://www.w3.org/ns/odrl/2/obligation";
    pub const DUTY: &str = "http://www.w3.org/ns/odrl/2/duty";
    pub const REMEDY: &str = "http://www.w3.org/ns/odrl/2/remedy";
    pub const CONSEQUENCE: &str = "http://www.w3.org/ns/odrl/2/consequence";

    pub const ACTION: &str = "http://www.w3.org/ns/odrl/2/action";
    pub const TARGET: &str = "http://www.w3.org/ns/odrl/2/target";
    pub const OUTPUT: &str = "http://www.w3.org/ns/odrl/2/output";
    pub const CONSTRAINT: &str = "http://www.w3.org/ns/odrl/2/constraint";
    pub const REFINEMENT: &str = "http://www.w3.org/ns/odrl/2/refinement";
    pub const UID: &str = "http://www.w3.org/ns/odrl/2/uid";
    pub const SOURCE: &str = "http://www.w3.org/ns/odrl/2/source";

    pub const LEFT_OPERAND: &str = "http://www.w3.org/ns/odrl/2/leftOperand";
    pub const OPERATOR: &str = "http://www.w3.org/ns/odrl/2/operator";
    pub const RIGHT_OPERAND: &str = "http://www.w3.org/ns/odrl/2/rightOperand";
    pub const UNIT: &str = "http://www.w3.org/ns/odrl/2/unit";

    pub const ASSET: &str = "http://www.w3.org/ns/odrl/2/Asset";
    pub const ASSET_COLLECTION: &str = "http://www.w3.org/ns/odrl/2/AssetCollection";
    pub const PARTY_COLLECTION: &str = "http://www.w3.org/ns/odrl/2/PartyCollection";

    pub const SHARE: &str = "http://www.w3.org/ns/odrl/2/share";
    pub const INFORM: &str = "http://www.w3.org/ns/odrl/2/inform";
    pub const COMPENSATE: &str = "http://www.w3.org/ns/odrl/2/compensate";
    pub const RECIPIENT: &str = "http://www.w3.org/ns/odrl/2/recipient";
    pub const PERCENTAGE: &str = "http://www.w3.org/ns/odrl/2/percentage";
    pub const IS_ANY_OF: &str = "http://www.w3.org/ns/odrl/2/isAnyOf";
}

/// XML Schema datatypes whose values render as numbers.
pub const XSD_NUMERIC_TYPES: &[&str] = &[
    "integer",
    "decimal",
    "float",
    "double",
    "int",
    "long",
    "short",
    "byte",
    "nonNegativeInteger",
    "nonPositiveInteger",
    "positiveInteger",
    "negativeInteger",
    "unsignedInt",
    "unsignedLong",
    "unsignedShort",
    "unsignedByte",
];

/// XML Schema datatypes whose values render as calendar dates.
pub const XSD_DATE_TYPES: &[&str] = &[
    "date",
    "dateTime",
    "dateTimeStamp",
    "gYear",
    "gYearMonth",
    "gMonth",
    "gMonthDay",
    "gDay",
];

/// Last path or fragment segment of an IRI.
pub fn local_name(iri: &str) -> &str {
    iri.rsplit(['#', '/']).next().unwrap_or(iri)
}

/// Whether a string is an absolute `http(s)` IRI.
pub fn is_http_iri(value: &str) -> bool {
    let rest = value
        .strip_prefix("http://")
        .or_else(|| value.strip_prefix("https://"));
    matches!(rest, Some(r) if !r.is_empty() && !r.starts_with('/') && !r.contains(char::is_whitespace))
}
