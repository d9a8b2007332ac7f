//! Policy model → nested English sentences.
//!
//! The [`Translator`] walks a [`Policy`] and produces a [`Translation`]: one
//! sentence per action, one sentence per refinement and constraint, with
//! duties, remedies and consequences nested under the rule that owns them
//! and keyed by their own identifier; rules sharing an identifier are merged
//! into one entry. Labels come from the run's [`LabelResolver`]; sibling
//! rules and operands are resolved concurrently.

pub mod language;
pub mod phrasing;

use std::collections::BTreeMap;
use std::collections::btree_map::Entry;

use futures_util::future::{BoxFuture, join_all};
use serde::{Deserialize, Serialize};

use crate::duration;
use crate::label::LabelResolver;
use crate::model::{
    Action, Constraint, ConstraintGroup, Duty, Permission, Policy, Prohibition, RightOperand, Role,
    Rule, RuleKind,
};
use crate::sentences::{Category, Operator, interpolate, join_list};
use crate::vocab::{self, dpv, odrl_terms};

use phrasing::{ActionPhrasing, parties_text, squash_whitespace, target_text};

// ---------------------------------------------------------------------------
// Output tree
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranslatedAction {
    pub sentence: String,
    pub refinements: Vec<String>,
}

/// A duty, remedy or consequence.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranslatedDuty {
    pub actions: Vec<TranslatedAction>,
    pub consequences: BTreeMap<String, TranslatedDuty>,
    pub constraints: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranslatedPermission {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cce: Option<String>,
    pub actions: Vec<TranslatedAction>,
    pub duties: BTreeMap<String, TranslatedDuty>,
    pub constraints: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranslatedProhibition {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cce: Option<String>,
    pub actions: Vec<TranslatedAction>,
    pub remedies: BTreeMap<String, TranslatedDuty>,
    pub constraints: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranslatedObligation {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cce: Option<String>,
    pub actions: Vec<TranslatedAction>,
    pub consequences: BTreeMap<String, TranslatedDuty>,
    pub constraints: Vec<String>,
}

/// Everything said about one policy.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Translation {
    /// Identifier of the policy node.
    pub policy: String,
    pub description: String,
    pub permissions: BTreeMap<String, TranslatedPermission>,
    pub prohibitions: BTreeMap<String, TranslatedProhibition>,
    pub obligations: BTreeMap<String, TranslatedObligation>,
}

impl TranslatedAction {
    fn texts_mut<'a>(&'a mut self, out: &mut Vec<&'a mut String>) {
        out.push(&mut self.sentence);
        out.extend(self.refinements.iter_mut());
    }
}

fn rule_texts_mut<'a>(
    actions: &'a mut [TranslatedAction],
    constraints: &'a mut [String],
    out: &mut Vec<&'a mut String>,
) {
    for action in actions {
        action.texts_mut(out);
    }
    out.extend(constraints.iter_mut());
}

impl TranslatedDuty {
    fn texts_mut<'a>(&'a mut self, out: &mut Vec<&'a mut String>) {
        rule_texts_mut(&mut self.actions, &mut self.constraints, out);
        for consequence in self.consequences.values_mut() {
            consequence.texts_mut(out);
        }
    }
}

/// Rules that share an identifier fold into one output entry.
trait MergeRule {
    fn merge(&mut self, other: Self);
}

fn merge_keyed<T: MergeRule>(map: &mut BTreeMap<String, T>, uid: String, entry: T) {
    match map.entry(uid) {
        Entry::Vacant(slot) => {
            slot.insert(entry);
        }
        Entry::Occupied(mut slot) => {
            tracing::debug!(rule = %slot.key(), "merging rules with the same identifier");
            slot.get_mut().merge(entry);
        }
    }
}

fn keyed<T: MergeRule>(entries: impl IntoIterator<Item = (String, T)>) -> BTreeMap<String, T> {
    let mut map = BTreeMap::new();
    for (uid, entry) in entries {
        merge_keyed(&mut map, uid, entry);
    }
    map
}

fn merge_all<T: MergeRule>(into: &mut BTreeMap<String, T>, from: BTreeMap<String, T>) {
    for (uid, entry) in from {
        merge_keyed(into, uid, entry);
    }
}

impl MergeRule for TranslatedDuty {
    fn merge(&mut self, other: Self) {
        self.actions.extend(other.actions);
        self.constraints.extend(other.constraints);
        merge_all(&mut self.consequences, other.consequences);
    }
}

impl MergeRule for TranslatedPermission {
    fn merge(&mut self, other: Self) {
        self.cce = self.cce.take().or(other.cce);
        self.actions.extend(other.actions);
        self.constraints.extend(other.constraints);
        merge_all(&mut self.duties, other.duties);
    }
}

impl MergeRule for TranslatedProhibition {
    fn merge(&mut self, other: Self) {
        self.cce = self.cce.take().or(other.cce);
        self.actions.extend(other.actions);
        self.constraints.extend(other.constraints);
        merge_all(&mut self.remedies, other.remedies);
    }
}

impl MergeRule for TranslatedObligation {
    fn merge(&mut self, other: Self) {
        self.cce = self.cce.take().or(other.cce);
        self.actions.extend(other.actions);
        self.constraints.extend(other.constraints);
        merge_all(&mut self.consequences, other.consequences);
    }
}

impl Translation {
    /// Every generated sentence, depth first. Map keys and the CCE name are
    /// identifiers and are not included.
    pub fn texts_mut(&mut self) -> Vec<&mut String> {
        let mut out = vec![&mut self.description];
        for p in self.permissions.values_mut() {
            rule_texts_mut(&mut p.actions, &mut p.constraints, &mut out);
            for duty in p.duties.values_mut() {
                duty.texts_mut(&mut out);
            }
        }
        for p in self.prohibitions.values_mut() {
            rule_texts_mut(&mut p.actions, &mut p.constraints, &mut out);
            for remedy in p.remedies.values_mut() {
                remedy.texts_mut(&mut out);
            }
        }
        for o in self.obligations.values_mut() {
            rule_texts_mut(&mut o.actions, &mut o.constraints, &mut out);
            for consequence in o.consequences.values_mut() {
                consequence.texts_mut(&mut out);
            }
        }
        out
    }
}

// ---------------------------------------------------------------------------
// Translator
// ---------------------------------------------------------------------------

/// Translates policies using one run's label resolver.
pub struct Translator<'g> {
    labels: LabelResolver<'g>,
}

impl<'g> Translator<'g> {
    pub fn new(labels: LabelResolver<'g>) -> Self {
        Self { labels }
    }

    pub fn labels(&self) -> &LabelResolver<'g> {
        &self.labels
    }

    /// Translate every policy, in order.
    pub async fn translate_all(&self, policies: &[Policy]) -> Vec<Translation> {
        join_all(policies.iter().map(|p| self.translate(p))).await
    }

    pub async fn translate(&self, policy: &Policy) -> Translation {
        tracing::info!(policy = %policy.uid, kind = %policy.kind, "translating policy");

        let (permissions, prohibitions, obligations) = tokio::join!(
            join_all(policy.permissions.iter().map(|p| self.permission(p))),
            join_all(policy.prohibitions.iter().map(|p| self.prohibition(p))),
            join_all(policy.obligations.iter().map(|o| self.obligation(o))),
        );

        let translation = Translation {
            policy: policy.uid.clone(),
            description: self.description(policy),
            permissions: keyed(permissions),
            prohibitions: keyed(prohibitions),
            obligations: keyed(obligations),
        };
        tracing::info!(
            policy = %policy.uid,
            fetches = self.labels.fetch_count(),
            "translated policy"
        );
        translation
    }

    fn description(&self, policy: &Policy) -> String {
        let creator = policy
            .creator
            .as_ref()
            .map(|c| format!(" created by {c}"))
            .unwrap_or_default();
        let issued = match (&policy.issued, policy.creator.is_some()) {
            (Some(date), true) => format!(" and issued on {date}"),
            (Some(date), false) => format!(" issued on {date}"),
            (None, _) => String::new(),
        };
        let template = self.labels.dictionary().policy_description(policy.kind);
        interpolate(template, &[("creator", &creator), ("issued", &issued)])
    }

    fn cce(&self, rule: &Rule) -> Option<String> {
        let key = rule.cce.as_deref()?;
        let name = self.labels.dictionary().cce(key).unwrap_or(key);
        Some(name.to_string())
    }

    async fn permission(&self, permission: &Permission) -> (String, TranslatedPermission) {
        let rule = &permission.rule;
        let ((actions, constraints), duties) =
            tokio::join!(self.rule_body(rule), self.duties(&permission.duties));
        let translated = TranslatedPermission {
            cce: self.cce(rule),
            actions,
            duties,
            constraints,
        };
        (rule.uid.clone(), translated)
    }

    async fn prohibition(&self, prohibition: &Prohibition) -> (String, TranslatedProhibition) {
        let rule = &prohibition.rule;
        let ((actions, constraints), remedies) =
            tokio::join!(self.rule_body(rule), self.duties(&prohibition.remedies));
        let translated = TranslatedProhibition {
            cce: self.cce(rule),
            actions,
            remedies,
            constraints,
        };
        (rule.uid.clone(), translated)
    }

    async fn obligation(&self, obligation: &Duty) -> (String, TranslatedObligation) {
        let rule = &obligation.rule;
        let ((actions, constraints), consequences) =
            tokio::join!(self.rule_body(rule), self.duties(&obligation.consequences));
        let translated = TranslatedObligation {
            cce: self.cce(rule),
            actions,
            consequences,
            constraints,
        };
        (rule.uid.clone(), translated)
    }

    async fn duties(&self, duties: &[Duty]) -> BTreeMap<String, TranslatedDuty> {
        keyed(join_all(duties.iter().map(|d| self.duty(d))).await)
    }

    // Boxed: duty → consequences → duty is recursive. The depth is bounded
    // when the model is built.
    fn duty<'a>(&'a self, duty: &'a Duty) -> BoxFuture<'a, (String, TranslatedDuty)> {
        Box::pin(async move {
            let ((actions, constraints), consequences) =
                tokio::join!(self.rule_body(&duty.rule), self.duties(&duty.consequences));
            let translated = TranslatedDuty {
                actions,
                consequences,
                constraints,
            };
            (duty.rule.uid.clone(), translated)
        })
    }

    /// Action sentences and the rule-level constraint sentences.
    async fn rule_body(&self, rule: &Rule) -> (Vec<TranslatedAction>, Vec<String>) {
        let actions = join_all(rule.actions.iter().map(|a| self.action(rule, a))).await;

        let mut constraints = self.group(&rule.constraints).await;
        for target in &rule.targets {
            constraints.extend(self.group(&target.refinements).await);
        }
        for (_, parties) in rule.parties.iter() {
            for party in parties {
                constraints.extend(self.group(&party.refinements).await);
            }
        }
        if let Some(coverage) = &rule.coverage {
            let jurisdiction = self.term(coverage).await;
            let lead = match rule.kind {
                RuleKind::Permission => "Must",
                RuleKind::Prohibition => "Prohibition to",
                RuleKind::Duty => "Obligation to",
            };
            constraints.push(format!("{lead} operate under the {jurisdiction} jurisdiction"));
        }

        (actions, constraints)
    }

    async fn action(&self, rule: &Rule, action: &Action) -> TranslatedAction {
        let (sentence, refinements) =
            tokio::join!(self.action_sentence(rule, action), self.group(&action.refinements));
        TranslatedAction {
            sentence,
            refinements,
        }
    }

    /// "Permission [for the assignee(s) X] to <action> <targets> <role
    /// phrases>[, granted by the assigner(s) Y]".
    pub async fn action_sentence(&self, rule: &Rule, action: &Action) -> String {
        let phrasing = ActionPhrasing::of(&action.iri);
        let (head, assigned) = match rule.kind {
            RuleKind::Permission => ("Permission", "granted"),
            RuleKind::Prohibition => ("Prohibition", "issued"),
            RuleKind::Duty => ("Obligation", "imposed"),
        };
        let parties = &rule.parties;

        let mut sentence = String::from(head);
        let assignees = parties.get(Role::Assignee);
        if !assignees.is_empty() {
            sentence.push_str(&format!(" for the assignee(s) {}", parties_text(assignees)));
        }

        let label = self.action_label(&action.iri).await;
        sentence.push_str(" to ");
        sentence.push_str(&label);

        if phrasing == ActionPhrasing::Inform {
            let informed = parties.get(Role::InformedParty);
            if !informed.is_empty() {
                sentence.push_str(&format!(" {} about", parties_text(informed)));
            }
        }

        let mut show_targets = !phrasing.hides_targets();
        if let Some(context) = &action.context {
            show_targets = false;
            let labels = join_all(context.operands.iter().map(|o| self.operand(o))).await;
            let conjunction = if context.any_of { "or" } else { "and" };
            sentence.push(' ');
            sentence.push_str(&join_list(&labels, conjunction));
        }
        if show_targets && !rule.targets.is_empty() {
            let targets: Vec<String> = rule.targets.iter().map(target_text).collect();
            sentence.push(' ');
            sentence.push_str(&join_list(&targets, "and/or"));
        }

        match phrasing {
            ActionPhrasing::Share => {
                let mut recipients: Vec<String> = action
                    .refinement_operands(odrl_terms::RECIPIENT)
                    .into_iter()
                    .map(|o| o.value().to_string())
                    .collect();
                recipients.extend(
                    parties
                        .get(Role::SharedParty)
                        .iter()
                        .map(phrasing::party_text),
                );
                if !recipients.is_empty() {
                    sentence.push_str(&format!(" with {}", join_list(&recipients, "and")));
                }
            }
            ActionPhrasing::Collaborate => {
                let collaborating = parties.get(Role::CollaboratingParty);
                if !collaborating.is_empty() {
                    let with = if label.ends_with(" with") { "" } else { " with" };
                    sentence.push_str(&format!("{with} {}", parties_text(collaborating)));
                }
            }
            ActionPhrasing::Negotiate => {
                let negotiated = parties.get(Role::NegotiatedParty);
                if !negotiated.is_empty() {
                    sentence.push_str(&format!(" with {}", parties_text(negotiated)));
                }
            }
            ActionPhrasing::Attribution => {
                let acknowledged = parties.get(Role::AcknowledgedParty);
                if !acknowledged.is_empty() {
                    sentence.push_str(&format!(" {}", parties_text(acknowledged)));
                }
            }
            ActionPhrasing::Compensate => {
                let compensated = parties.get(Role::CompensatedParty);
                if compensated.is_empty() {
                    sentence.push_str(" the assigner");
                } else {
                    sentence.push_str(&format!(" {}", parties_text(compensated)));
                }
            }
            ActionPhrasing::Inform | ActionPhrasing::Notify | ActionPhrasing::Generic => {}
        }

        let consenting = parties.get(Role::ConsentingParty);
        if !consenting.is_empty() {
            sentence.push_str(&format!(" from {}", parties_text(consenting)));
        }

        let assigners = parties.get(Role::Assigner);
        if !assigners.is_empty() {
            sentence.push_str(&format!(
                ", {assigned} by the assigner(s) {}",
                parties_text(assigners)
            ));
        }

        squash_whitespace(&sentence)
    }

    /// Lower-cased action label; a raw IRI fallback is kept as is.
    async fn action_label(&self, iri: &str) -> String {
        let label = self.labels.resolve(iri).await;
        if label == iri {
            label
        } else {
            label.to_lowercase()
        }
    }

    /// Sentences for a refinement or constraint holder. A logical group
    /// becomes one combined sentence.
    pub async fn group(&self, group: &ConstraintGroup) -> Vec<String> {
        let sentences: Vec<String> = join_all(group.iter().map(|c| self.constraint(c)))
            .await
            .into_iter()
            .flatten()
            .collect();

        match group.as_logical() {
            Some(set) if !sentences.is_empty() => vec![format!(
                "{}{}",
                set.operand.lead_in(),
                join_list(&sentences, set.operand.conjunction())
            )],
            _ => sentences,
        }
    }

    /// One sentence for one constraint. `dpv:Context` refinements belong to
    /// the action sentence and yield `None`.
    pub async fn constraint(&self, constraint: &Constraint) -> Option<String> {
        if constraint.has_left_operand(dpv::CONTEXT) {
            return None;
        }
        let dictionary = self.labels.dictionary();

        let mut operands = join_all(constraint.right_operands.iter().map(|o| self.operand(o))).await;
        if constraint.has_left_operand(odrl_terms::PERCENTAGE) {
            for operand in &mut operands {
                if !operand.ends_with('%') {
                    operand.push('%');
                }
            }
        }
        let conjunction = if constraint.operator == odrl_terms::IS_ANY_OF {
            "or"
        } else {
            "and"
        };
        let mut right = join_list(&operands, conjunction);
        if let Some(unit) = &constraint.unit {
            right = format!("{right} {}", self.term(unit).await);
        }

        let duration_template = constraint
            .right_operands
            .first()
            .filter(|o| o.is_duration())
            .and_then(|_| Category::for_duration(&constraint.left_operand))
            .zip(Operator::from_iri(&constraint.operator))
            .and_then(|(category, operator)| dictionary.template(category, operator));
        if let Some(template) = duration_template {
            return Some(interpolate(template, &[("rightOperand", &right)]));
        }
        if let Some(sentence) = self.labels.resolve_template(
            &constraint.left_operand,
            &constraint.operator,
            &[("rightOperand", &right)],
        ) {
            return Some(sentence);
        }

        let left = self.labels.resolve(&constraint.left_operand).await;
        let by_datatype = constraint
            .right_operands
            .first()
            .and_then(RightOperand::datatype)
            .and_then(|datatype| dictionary.datatype_operator(datatype, &constraint.operator));
        let operator = match by_datatype {
            Some(phrase) => phrase.to_string(),
            None => self.labels.resolve(&constraint.operator).await,
        };

        Some(squash_whitespace(&format!("{left} {operator} {right}")))
    }

    async fn operand(&self, operand: &RightOperand) -> String {
        let value = operand.value();
        if operand.is_duration() {
            return duration::humanize(value).unwrap_or_else(|| value.to_string());
        }
        if operand.is_iri() {
            return self.labels.resolve(value).await;
        }
        value.to_string()
    }

    /// Label for an IRI, or a literal value as is.
    async fn term(&self, value: &str) -> String {
        if vocab::is_http_iri(value) {
            self.labels.resolve(value).await
        } else {
            value.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{DocumentFormat, Graph};
    use crate::model::{DEFAULT_MAX_DEPTH, DEFAULT_MAX_DUTIES};

    const PREFIXES: &str = "@prefix odrl: <http://www.w3.org/ns/odrl/2/> .
@prefix rdfs: <http://www.w3.org/2000/01/rdf-schema#> .
@prefix xsd: <http://www.w3.org/2001/XMLSchema#> .
@prefix dct: <http://purl.org/dc/terms/> .
@prefix dc: <http://purl.org/dc/elements/1.1/> .
@prefix dpv: <https://w3id.org/dpv#> .
@prefix rdf: <http://www.w3.org/1999/02/22-rdf-syntax-ns#> .
@prefix cc: <http://creativecommons.org/ns#> .
@prefix obo: <http://purl.obolibrary.org/obo/> .
@prefix occe: <https://w3id.org/occe/> .
@prefix ex: <http://example.com/> .
odrl:use rdfs:label \"Use\" .
odrl:share rdfs:label \"Share\" .
odrl:compensate rdfs:label \"Compensate\" .
odrl:count rdfs:label \"Count\" .
odrl:dateTime rdfs:label \"Datetime\" .
odrl:inform rdfs:label \"Inform\" .
cc:Attribution rdfs:label \"Give credit to\" .
obo:NCIT_C73529 rdfs:label \"Collaborate\" .
occe:negotiate rdfs:label \"Negotiate\" .
ex:Items rdfs:label \"items\" .
";

    fn graph(ttl: &str) -> Graph {
        Graph::parse(&format!("{PREFIXES}{ttl}"), DocumentFormat::Turtle, None).unwrap()
    }

    async fn translate(ttl: &str) -> Translation {
        let g = graph(ttl);
        let policies = Policy::from_graph(&g, DEFAULT_MAX_DEPTH, DEFAULT_MAX_DUTIES).unwrap();
        assert_eq!(policies.len(), 1);
        Translator::new(LabelResolver::new(&g))
            .translate(&policies[0])
            .await
    }

    #[tokio::test]
    async fn permission_sentence_order() {
        let t = translate(
            "ex:p a odrl:Set ; odrl:permission [
                odrl:uid ex:perm ; odrl:action odrl:use ; odrl:target ex:A ; odrl:assigner ex:B ] .",
        )
        .await;

        let perm = &t.permissions["http://example.com/perm"];
        assert_eq!(perm.actions.len(), 1);
        assert!(perm.constraints.is_empty());
        assert_eq!(
            perm.actions[0].sentence,
            "Permission to use the asset http://example.com/A, granted by the assigner(s) http://example.com/B"
        );
    }

    #[tokio::test]
    async fn description_mentions_creator_and_date() {
        let t = translate(
            "ex:p a odrl:Agreement ; dct:creator \"Alice\" ; dct:issued \"2024-01-01\" ;
               odrl:permission [ odrl:action odrl:use ; odrl:target ex:A ] .",
        )
        .await;
        assert!(t.description.starts_with(
            "This is a policy created by Alice and issued on 2024-01-01 where rules are assigned"
        ));
    }

    #[tokio::test]
    async fn assignee_and_cce() {
        let t = translate(
            "ex:p a odrl:Set ; odrl:permission [
                odrl:uid ex:perm ; dc:subject \"research_use\" ;
                odrl:action odrl:use ; odrl:target ex:A ; odrl:assignee ex:C ] .",
        )
        .await;
        let perm = &t.permissions["http://example.com/perm"];
        assert_eq!(perm.cce.as_deref(), Some("Research Use"));
        assert_eq!(
            perm.actions[0].sentence,
            "Permission for the assignee(s) http://example.com/C to use the asset http://example.com/A"
        );
    }

    #[tokio::test]
    async fn share_recipients_come_from_refinements() {
        let t = translate(
            "ex:p a odrl:Set ; odrl:permission [
                odrl:uid ex:perm ; odrl:target ex:A ;
                odrl:action [ rdf:value odrl:share ;
                    odrl:refinement [ odrl:leftOperand odrl:recipient ; odrl:operator odrl:eq ; odrl:rightOperand ex:R ] ] ] .",
        )
        .await;
        let action = &t.permissions["http://example.com/perm"].actions[0];
        assert_eq!(
            action.sentence,
            "Permission to share the asset http://example.com/A with http://example.com/R"
        );
        assert_eq!(
            action.refinements,
            vec!["recipient defined as http://example.com/R".to_string()]
        );
    }

    #[tokio::test]
    async fn compensate_defaults_to_assigner() {
        let t = translate(
            "ex:p a odrl:Set ; odrl:obligation [ odrl:uid ex:o ; odrl:action odrl:compensate ] .",
        )
        .await;
        assert_eq!(
            t.obligations["http://example.com/o"].actions[0].sentence,
            "Obligation to compensate the assigner"
        );
    }

    #[tokio::test]
    async fn constraint_sentences() {
        let t = translate(
            "ex:p a odrl:Set ; odrl:permission [
                odrl:uid ex:perm ; odrl:action odrl:use ; odrl:target ex:A ;
                odrl:constraint
                    [ odrl:leftOperand odrl:count ; odrl:operator odrl:lteq ; odrl:rightOperand \"10\"^^xsd:integer ] ,
                    [ odrl:leftOperand odrl:timeInterval ; odrl:operator odrl:eq ; odrl:rightOperand \"P1D\"^^xsd:duration ] ,
                    [ odrl:leftOperand odrl:percentage ; odrl:operator odrl:lt ; odrl:rightOperand \"50\"^^xsd:decimal ] ,
                    [ odrl:leftOperand odrl:dateTime ; odrl:operator odrl:gt ; odrl:rightOperand \"2025-01-01\"^^xsd:date ] ] .",
        )
        .await;
        let constraints = &t.permissions["http://example.com/perm"].constraints;
        assert_eq!(constraints.len(), 4);
        for expected in [
            "Count lesser than or equal to 10",
            "on an interval of 1 day(s)",
            "percentage must be less than 50%",
            "Datetime after 2025-01-01",
        ] {
            assert!(
                constraints.iter().any(|c| c == expected),
                "missing {expected:?} in {constraints:?}"
            );
        }
    }

    #[tokio::test]
    async fn logical_constraint_is_one_sentence() {
        let t = translate(
            "ex:p a odrl:Set ; odrl:permission [
                odrl:uid ex:perm ; odrl:action odrl:use ; odrl:target ex:A ;
                odrl:constraint [ odrl:andSequence (
                    [ odrl:leftOperand odrl:count ; odrl:operator odrl:lt ; odrl:rightOperand \"1\"^^xsd:integer ]
                    [ odrl:leftOperand odrl:count ; odrl:operator odrl:lt ; odrl:rightOperand \"2\"^^xsd:integer ] ) ] ] .",
        )
        .await;
        assert_eq!(
            t.permissions["http://example.com/perm"].constraints,
            vec![
                "All of the following apply, in this order: Count lesser than 1 and then Count lesser than 2"
                    .to_string()
            ]
        );
    }

    #[tokio::test]
    async fn context_replaces_targets() {
        let t = translate(
            "ex:p a odrl:Set ; odrl:permission [
                odrl:uid ex:perm ; odrl:target ex:A ;
                odrl:action [ rdf:value odrl:use ;
                    odrl:refinement [ odrl:leftOperand dpv:Context ; odrl:operator odrl:isAnyOf ;
                                      odrl:rightOperand \"teaching\" , \"research\" ] ] ] .",
        )
        .await;
        let action = &t.permissions["http://example.com/perm"].actions[0];
        assert!(action.sentence.starts_with("Permission to use "));
        assert!(action.sentence.contains(" or "));
        assert!(!action.sentence.contains("the asset"));
        assert!(action.refinements.is_empty());
    }

    #[tokio::test]
    async fn remedies_and_consequences_nest() {
        let t = translate(
            "ex:p a odrl:Set ;
               odrl:prohibition [ odrl:uid ex:no ; odrl:action odrl:share ; odrl:target ex:A ;
                                  odrl:remedy [ odrl:uid ex:fix ; odrl:action odrl:compensate ] ] ;
               odrl:obligation [ odrl:uid ex:ob ; odrl:action odrl:use ;
                                 odrl:consequence [ odrl:uid ex:then ; odrl:action odrl:compensate ;
                                     odrl:consequence [ odrl:uid ex:after ; odrl:action odrl:use ] ] ] .",
        )
        .await;

        let remedy = &t.prohibitions["http://example.com/no"].remedies["http://example.com/fix"];
        assert_eq!(remedy.actions[0].sentence, "Obligation to compensate the assigner");

        let then = &t.obligations["http://example.com/ob"].consequences["http://example.com/then"];
        assert!(then.consequences.contains_key("http://example.com/after"));
    }

    #[tokio::test]
    async fn coverage_becomes_a_constraint() {
        let t = translate(
            "ex:p a odrl:Set ; odrl:prohibition [
                odrl:uid ex:no ; odrl:action odrl:use ; odrl:target ex:A ; dct:coverage \"EU\" ] .",
        )
        .await;
        assert_eq!(
            t.prohibitions["http://example.com/no"].constraints,
            vec!["Prohibition to operate under the EU jurisdiction".to_string()]
        );
    }

    #[tokio::test]
    async fn role_phrasing_per_action() {
        let t = translate(
            "ex:p a odrl:Set ;
               odrl:permission
                 [ odrl:uid ex:consent ; odrl:action odrl:use ; odrl:target ex:A ; odrl:consentingParty ex:S ] ,
                 [ odrl:uid ex:occe ; odrl:action occe:collaborate ; odrl:target ex:A ; occe:collaboratingParty ex:L ] ,
                 [ odrl:uid ex:obo ; odrl:action obo:NCIT_C73529 ; odrl:target ex:A ; odrl:collaboratingParty ex:L ] ,
                 [ odrl:uid ex:deal ; odrl:action occe:negotiate ; odrl:target ex:A ; occe:negotiatedParty ex:N ] ;
               odrl:obligation
                 [ odrl:uid ex:tell ; odrl:action odrl:inform ; odrl:target ex:A ; odrl:informedParty ex:I ] ,
                 [ odrl:uid ex:credit ; odrl:action cc:Attribution ; odrl:target ex:A ; odrl:acknowledgedParty ex:K ] .",
        )
        .await;

        let permission = |uid: &str| t.permissions[uid].actions[0].sentence.clone();
        let obligation = |uid: &str| t.obligations[uid].actions[0].sentence.clone();
        assert_eq!(
            permission("http://example.com/consent"),
            "Permission to use the asset http://example.com/A from http://example.com/S"
        );
        assert_eq!(
            permission("http://example.com/occe"),
            "Permission to collaborate with http://example.com/L"
        );
        assert_eq!(
            permission("http://example.com/obo"),
            "Permission to collaborate with http://example.com/L"
        );
        assert_eq!(
            permission("http://example.com/deal"),
            "Permission to negotiate with http://example.com/N"
        );
        assert_eq!(
            obligation("http://example.com/tell"),
            "Obligation to inform http://example.com/I about the asset http://example.com/A"
        );
        assert_eq!(
            obligation("http://example.com/credit"),
            "Obligation to give credit to http://example.com/K"
        );
    }

    #[tokio::test]
    async fn unit_follows_the_right_operand() {
        let t = translate(
            "ex:p a odrl:Set ; odrl:permission [
                odrl:uid ex:perm ; odrl:action odrl:use ; odrl:target ex:A ;
                odrl:constraint [ odrl:leftOperand odrl:count ; odrl:operator odrl:lteq ;
                                  odrl:rightOperand \"10\"^^xsd:integer ; odrl:unit ex:Items ] ] .",
        )
        .await;
        assert_eq!(
            t.permissions["http://example.com/perm"].constraints,
            vec!["Count lesser than or equal to 10 items".to_string()]
        );
    }

    #[tokio::test]
    async fn target_and_party_refinements_follow_rule_constraints() {
        let t = translate(
            "ex:p a odrl:Set ; odrl:permission [
                odrl:uid ex:perm ; odrl:action odrl:use ;
                odrl:constraint [ odrl:leftOperand odrl:count ; odrl:operator odrl:lt ; odrl:rightOperand \"5\"^^xsd:integer ] ;
                odrl:target [ odrl:uid ex:A ;
                    odrl:refinement [ odrl:leftOperand odrl:count ; odrl:operator odrl:lt ; odrl:rightOperand \"3\"^^xsd:integer ] ] ;
                odrl:assignee [ odrl:source ex:C ;
                    odrl:refinement [ odrl:leftOperand odrl:dateTime ; odrl:operator odrl:gt ; odrl:rightOperand \"2025-01-01\"^^xsd:date ] ] ] .",
        )
        .await;
        let perm = &t.permissions["http://example.com/perm"];
        assert_eq!(
            perm.actions[0].sentence,
            "Permission for the assignee(s) http://example.com/C to use the asset http://example.com/A"
        );
        assert_eq!(
            perm.constraints,
            vec![
                "Count lesser than 5".to_string(),
                "Count lesser than 3".to_string(),
                "Datetime after 2025-01-01".to_string(),
            ]
        );
    }

    #[tokio::test]
    async fn rules_sharing_a_uid_are_merged() {
        let t = translate(
            "ex:p a odrl:Set ; odrl:permission
                [ odrl:uid ex:r ; odrl:action odrl:use ; odrl:target ex:A ;
                  odrl:duty [ odrl:uid ex:d ; odrl:action odrl:compensate ] ] ,
                [ odrl:uid ex:r ; odrl:action odrl:share ; odrl:target ex:B ;
                  odrl:duty [ odrl:uid ex:d ; odrl:action odrl:inform ] ] .",
        )
        .await;
        assert_eq!(t.permissions.len(), 1);
        let merged = &t.permissions["http://example.com/r"];
        let sentences: Vec<&str> = merged.actions.iter().map(|a| a.sentence.as_str()).collect();
        assert_eq!(sentences.len(), 2);
        assert!(sentences.contains(&"Permission to use the asset http://example.com/A"));
        assert!(sentences.contains(&"Permission to share the asset http://example.com/B"));
        assert_eq!(merged.duties["http://example.com/d"].actions.len(), 2);
    }

    #[tokio::test]
    async fn every_sentence_is_reachable_for_localisation() {
        let mut t = translate(
            "ex:p a odrl:Set ; odrl:permission [
                odrl:uid ex:perm ; odrl:action odrl:use ; odrl:target ex:A ;
                odrl:duty [ odrl:uid ex:d ; odrl:action odrl:compensate ] ] .",
        )
        .await;
        // description, permission action, duty action
        assert_eq!(t.texts_mut().len(), 3);
    }
}
