//! Static phrase dictionary.
//!
//! Three kinds of entries:
//!
//! - **Templates** keyed by a typed `(Category, Operator)` pair, for phrases
//!   that depend on both what is compared and how (`payAmount` + `eq` gives
//!   "paying an amount equal to {{rightOperand}}")
//! - **Phrases** keyed by a single IRI (operators, well-known right operands,
//!   action overrides)
//! - **CCE names** keyed by a community-consensus category identifier
//!
//! Templates use `{{name}}` placeholders filled by [`interpolate`].

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;

use crate::model::PolicyKind;
use crate::vocab::{self, XSD_DATE_TYPES, XSD_NUMERIC_TYPES, odrl, occe_terms};

// ---------------------------------------------------------------------------
// Keys
// ---------------------------------------------------------------------------

/// ODRL constraint operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    Lt,
    Lteq,
    Eq,
    Neq,
    Gt,
    Gteq,
    IsA,
    HasPart,
    IsPartOf,
    IsAllOf,
    IsAnyOf,
    IsNoneOf,
}

impl Operator {
    pub const ALL: [Operator; 12] = [
        Operator::Lt,
        Operator::Lteq,
        Operator::Eq,
        Operator::Neq,
        Operator::Gt,
        Operator::Gteq,
        Operator::IsA,
        Operator::HasPart,
        Operator::IsPartOf,
        Operator::IsAllOf,
        Operator::IsAnyOf,
        Operator::IsNoneOf,
    ];

    pub fn local_name(self) -> &'static str {
        match self {
            Operator::Lt => "lt",
            Operator::Lteq => "lteq",
            Operator::Eq => "eq",
            Operator::Neq => "neq",
            Operator::Gt => "gt",
            Operator::Gteq => "gteq",
            Operator::IsA => "isA",
            Operator::HasPart => "hasPart",
            Operator::IsPartOf => "isPartOf",
            Operator::IsAllOf => "isAllOf",
            Operator::IsAnyOf => "isAnyOf",
            Operator::IsNoneOf => "isNoneOf",
        }
    }

    pub fn from_iri(iri: &str) -> Option<Self> {
        let local = iri.strip_prefix(vocab::ODRL_NS)?;
        Self::ALL.into_iter().find(|op| op.local_name() == local)
    }
}

/// What a template phrases: a left operand, or the datatype family of the
/// right operand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    PayAmount,
    Event,
    Percentage,
    Recipient,
    /// `timeInterval` with an `xsd:duration` right operand.
    TimeInterval,
    /// `delayPeriod` with an `xsd:duration` right operand.
    DelayPeriod,
    Time,
    Numeric,
    Date,
    String,
}

impl Category {
    /// Category of a left operand with its own phrasing.
    pub fn for_left_operand(iri: &str) -> Option<Self> {
        match iri.strip_prefix(vocab::ODRL_NS)? {
            "payAmount" => Some(Category::PayAmount),
            "event" => Some(Category::Event),
            "percentage" => Some(Category::Percentage),
            "recipient" => Some(Category::Recipient),
            _ => None,
        }
    }

    /// Category of a duration-valued left operand.
    pub fn for_duration(left_operand: &str) -> Option<Self> {
        match left_operand.strip_prefix(vocab::ODRL_NS)? {
            "timeInterval" => Some(Category::TimeInterval),
            "delayPeriod" => Some(Category::DelayPeriod),
            _ => None,
        }
    }

    /// Category of a right-operand datatype.
    pub fn for_datatype(datatype: &str) -> Option<Self> {
        let local = datatype.strip_prefix(vocab::XSD_NS)?;
        match local {
            "time" => Some(Category::Time),
            "string" => Some(Category::String),
            _ if XSD_NUMERIC_TYPES.contains(&local) => Some(Category::Numeric),
            _ if XSD_DATE_TYPES.contains(&local) => Some(Category::Date),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Tables
// ---------------------------------------------------------------------------

use Category as C;
use Operator as O;

const TEMPLATES: &[(Category, Operator, &str)] = &[
    (C::PayAmount, O::Eq, "paying an amount equal to {{rightOperand}}"),
    (C::Event, O::Lt, "must happen before {{rightOperand}}"),
    (C::Event, O::Lteq, "must happen before or while {{rightOperand}}"),
    (C::Event, O::Eq, "must happen while {{rightOperand}}"),
    (C::Event, O::Neq, "must not happen while {{rightOperand}}"),
    (C::Event, O::Gt, "must happen after {{rightOperand}}"),
    (C::Event, O::Gteq, "must happen while or after {{rightOperand}}"),
    (C::Percentage, O::Lt, "percentage must be less than {{rightOperand}}"),
    (C::Percentage, O::Lteq, "percentage must be less than or equal to {{rightOperand}}"),
    (C::Percentage, O::Eq, "percentage must be equal to {{rightOperand}}"),
    (C::Percentage, O::Neq, "percentage must be different from {{rightOperand}}"),
    (C::Percentage, O::Gt, "percentage must be greater than {{rightOperand}}"),
    (C::Percentage, O::Gteq, "percentage must be equal to or greater than {{rightOperand}}"),
    (C::Recipient, O::Eq, "recipient defined as {{rightOperand}}"),
    (C::Recipient, O::Neq, "recipient being all parties except {{rightOperand}}"),
    (C::TimeInterval, O::Eq, "on an interval of {{rightOperand}}"),
    (C::DelayPeriod, O::Eq, "with a delay of {{rightOperand}}"),
    (C::DelayPeriod, O::Gt, "with a delay superior to {{rightOperand}}"),
    (C::DelayPeriod, O::Gteq, "with a delay superior or equal to {{rightOperand}}"),
    (C::Time, O::Lt, "before"),
    (C::Time, O::Lteq, "before/at"),
    (C::Time, O::Eq, "at"),
    (C::Time, O::Neq, "not at"),
    (C::Time, O::Gt, "after"),
    (C::Time, O::Gteq, "from"),
    (C::Numeric, O::Lt, "lesser than"),
    (C::Numeric, O::Lteq, "lesser than or equal to"),
    (C::Numeric, O::Eq, "equal to"),
    (C::Numeric, O::Neq, "different from"),
    (C::Numeric, O::Gt, "greater than"),
    (C::Numeric, O::Gteq, "greater than or equal to"),
    (C::Date, O::Lt, "before"),
    (C::Date, O::Lteq, "before/on"),
    (C::Date, O::Eq, "on"),
    (C::Date, O::Neq, "different from"),
    (C::Date, O::Gt, "after"),
    (C::Date, O::Gteq, "from"),
    (C::String, O::Neq, "different from"),
];

const OPERATOR_PHRASES: &[(Operator, &str)] = &[
    (O::Lt, "lesser than"),
    (O::Lteq, "lesser than or equal to"),
    (O::Eq, "equal to"),
    (O::Neq, "not equal to"),
    (O::Gt, "greater than"),
    (O::Gteq, "greater than or equal to"),
];

const CCE_NAMES: &[(&str, &str)] = &[
    ("commercial_entity", "Commercial Entity"),
    ("geographical_area", "Geographical Area"),
    ("regulatory_jurisdiction", "Regulatory Jurisdiction"),
    ("research_use", "Research Use"),
    ("clinical_care", "Clinical Care Use"),
    ("clinical_research_use", "Clinical Research Use"),
    ("disease_specific_use", "Disease Specific Use"),
    ("use_as_control", "Use As Control"),
    ("profit_motivated_use", "Profit Motivated Use"),
    ("time_period", "Time Period"),
    ("collaboration", "Collaboration"),
    ("fees", "Fees"),
    ("return_of_results", "Return Of Results"),
    ("return_of_incidental_findings", "Return Of Incidental Findings"),
    (
        "reidentification_of_individuals_without_irp",
        "(Re-)Identification Of Individuals Without Involvement Of The Resource Provider",
    ),
    (
        "reidentification_of_individuals_with_irp",
        "(Re-)Identification Of Individuals Mediated By The Resource Provider",
    ),
    ("publication_moratorium", "Publication Moratorium"),
    ("publication", "Publication"),
    ("user_authentication", "User Authentication"),
    ("ethics_approval", "Ethics Approval"),
];

static DICTIONARY: LazyLock<SentenceDictionary> = LazyLock::new(SentenceDictionary::build);

static PLACEHOLDER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{\{\s*([A-Za-z_][A-Za-z0-9_]*)\s*\}\}").expect("placeholder regex is valid")
});

// ---------------------------------------------------------------------------
// Dictionary
// ---------------------------------------------------------------------------

/// Lookup tables for every fixed phrase.
#[derive(Debug)]
pub struct SentenceDictionary {
    templates: HashMap<(Category, Operator), &'static str>,
    phrases: HashMap<String, &'static str>,
    cce: HashMap<&'static str, &'static str>,
}

impl SentenceDictionary {
    /// The shared, process-wide dictionary.
    pub fn standard() -> &'static SentenceDictionary {
        &DICTIONARY
    }

    fn build() -> Self {
        let templates = TEMPLATES
            .iter()
            .map(|&(category, operator, text)| ((category, operator), text))
            .collect();

        let mut phrases: HashMap<String, &'static str> = OPERATOR_PHRASES
            .iter()
            .map(|&(op, text)| (odrl(op.local_name()), text))
            .collect();
        phrases.insert(odrl("policyUsage"), "the rule is exercised");
        phrases.insert(occe_terms::COLLABORATE.to_string(), "collaborate with");

        Self {
            templates,
            phrases,
            cce: CCE_NAMES.iter().copied().collect(),
        }
    }

    /// Template for a `(category, operator)` pair.
    pub fn template(&self, category: Category, operator: Operator) -> Option<&'static str> {
        self.templates.get(&(category, operator)).copied()
    }

    /// Template for a constraint's left operand and operator IRIs.
    pub fn constraint_template(&self, left_operand: &str, operator: &str) -> Option<&'static str> {
        let category = Category::for_left_operand(left_operand)?;
        self.template(category, Operator::from_iri(operator)?)
    }

    /// Operator phrase chosen by the right operand's datatype.
    pub fn datatype_operator(&self, datatype: &str, operator: &str) -> Option<&'static str> {
        let category = Category::for_datatype(datatype)?;
        self.template(category, Operator::from_iri(operator)?)
    }

    /// Phrase for a single IRI.
    pub fn phrase(&self, iri: &str) -> Option<&'static str> {
        self.phrases.get(iri).copied()
    }

    /// Display name of a community-consensus category.
    pub fn cce(&self, key: &str) -> Option<&'static str> {
        self.cce.get(key).copied()
    }

    /// Description template of a policy type, with `{{creator}}` and
    /// `{{issued}}` placeholders.
    pub fn policy_description(&self, kind: PolicyKind) -> &'static str {
        match kind {
            PolicyKind::Policy | PolicyKind::Set => {
                "This is a policy{{creator}}{{issued}} that assigns rules that apply generically"
            }
            PolicyKind::Offer => {
                "This is a policy{{creator}}{{issued}} where rules are assigned by individuals or organizations and applied generically"
            }
            PolicyKind::Agreement => {
                "This is a policy{{creator}}{{issued}} where rules are assigned by individuals or organizations and applied to specific other individuals or organizations"
            }
            PolicyKind::Request => {
                "This is a policy{{creator}}{{issued}} where individuals or organizations request rules to be granted to them"
            }
        }
    }
}

/// Fill `{{name}}` placeholders from `args`; unknown names become empty.
pub fn interpolate(template: &str, args: &[(&str, &str)]) -> String {
    PLACEHOLDER
        .replace_all(template, |caps: &regex::Captures<'_>| {
            let name = &caps[1];
            args.iter()
                .find(|(key, _)| *key == name)
                .map(|(_, value)| (*value).to_string())
                .unwrap_or_default()
        })
        .into_owned()
}

/// Join `items` as "a, b and c", with `conjunction` before the last item.
/// Empty items are skipped.
pub fn join_list(items: &[String], conjunction: &str) -> String {
    let items: Vec<&str> = items
        .iter()
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .collect();
    match items.as_slice() {
        [] => String::new(),
        [only] => (*only).to_string(),
        [head @ .., last] => format!("{} {conjunction} {last}", head.join(", ")),
    }
}
