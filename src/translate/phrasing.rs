//! Small phrasing helpers shared by the translator.

use crate::model::{Asset, Party};
use crate::sentences::join_list;
use crate::vocab::{cc, obo, occe_terms, odrl_terms};

/// Collapse runs of whitespace and trim.
pub fn squash_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// "Name located at a and b", or only the sources when unnamed.
pub fn party_text(party: &Party) -> String {
    let sources = join_list(&party.sources, "and");
    match (&party.name, sources.is_empty()) {
        (Some(name), false) => format!("{name} located at {sources}"),
        (Some(name), true) => name.clone(),
        (None, _) => sources,
    }
}

pub fn parties_text(parties: &[Party]) -> String {
    let texts: Vec<String> = parties.iter().map(party_text).collect();
    join_list(&texts, "and")
}

/// "the asset (Title) located at url", or "the collection of assets ..."
pub fn target_text(asset: &Asset) -> String {
    let mut text = String::from(if asset.is_collection() {
        "the collection of assets"
    } else {
        "the asset"
    });
    if let Some(title) = &asset.title {
        text.push_str(&format!(" ({title})"));
        if !asset.urls.is_empty() {
            text.push_str(" located at");
        }
    }
    if !asset.urls.is_empty() {
        text.push(' ');
        text.push_str(&join_list(&asset.urls, "and"));
    }
    text
}

/// Actions whose sentence deviates from the generic shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionPhrasing {
    /// `odrl:share`: "with" the recipients.
    Share,
    /// `odrl:inform`: "<informed party> about".
    Inform,
    /// `odrl:compensate`: the compensated party, or the assigner.
    Compensate,
    /// `cc:Attribution`: the acknowledged party, no targets.
    Attribution,
    /// Collaborate: "with" the collaborating party, no targets.
    Collaborate,
    /// `occe:negotiate`: "with" the negotiated party, no targets.
    Negotiate,
    /// Notify: no targets.
    Notify,
    Generic,
}

impl ActionPhrasing {
    pub fn of(iri: &str) -> Self {
        match iri {
            odrl_terms::SHARE => ActionPhrasing::Share,
            odrl_terms::INFORM => ActionPhrasing::Inform,
            odrl_terms::COMPENSATE => ActionPhrasing::Compensate,
            cc::ATTRIBUTION => ActionPhrasing::Attribution,
            obo::COLLABORATE | occe_terms::COLLABORATE => ActionPhrasing::Collaborate,
            occe_terms::NEGOTIATE => ActionPhrasing::Negotiate,
            obo::NOTIFY => ActionPhrasing::Notify,
            _ => ActionPhrasing::Generic,
        }
    }

    /// Whether the targets are left out of the sentence.
    pub fn hides_targets(self) -> bool {
        matches!(
            self,
            ActionPhrasing::Attribution
                | ActionPhrasing::Collaborate
                | ActionPhrasing::Negotiate
                | ActionPhrasing::Notify
        )
    }
}
