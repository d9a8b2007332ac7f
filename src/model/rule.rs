//! Rules: permissions, prohibitions and duties.
//!
//! A rule subtree materialises in one synchronous pass. Duties nest
//! (permission duties, prohibition remedies, duty consequences); the nesting
//! is bounded by [`BuildContext::max_depth`] so a consequence chain that
//! loops back on itself fails with `E_MAX_DEPTH_EXCEEDED` instead of
//! recursing forever. Shared duty nodes are expanded once per reference, so
//! a [`DutyBudget`] also caps the total number of duties built for a policy
//! (`E_MAX_DUTIES_EXCEEDED`).

use std::cell::Cell;
use std::fmt;

use serde::Serialize;

use crate::error::{ModelResult, StructuralError};
use crate::graph::{Graph, Term};
use crate::vocab::{dce, dcterms, odrl_terms};

use super::action::Action;
use super::asset::Asset;
use super::constraint::ConstraintGroup;
use super::party::RoleMap;

/// Default bound on duty nesting.
pub const DEFAULT_MAX_DEPTH: usize = 32;

/// Default bound on the number of duties built for one policy.
pub const DEFAULT_MAX_DUTIES: usize = 4096;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum RuleKind {
    Permission,
    Prohibition,
    /// An obligation, or a duty attached to another rule.
    Duty,
}

impl fmt::Display for RuleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            RuleKind::Permission => "permission",
            RuleKind::Prohibition => "prohibition",
            RuleKind::Duty => "duty",
        })
    }
}

/// Running count of the duties built for one policy.
#[derive(Debug)]
pub struct DutyBudget {
    max: usize,
    built: Cell<usize>,
}

impl DutyBudget {
    pub fn new(max: usize) -> Self {
        Self {
            max,
            built: Cell::new(0),
        }
    }

    pub fn built(&self) -> usize {
        self.built.get()
    }

    fn spend(&self, node: &Term) -> ModelResult<()> {
        let built = self.built.get() + 1;
        if built > self.max {
            return Err(StructuralError::TooManyDuties {
                rule: node.value().to_string(),
                max_duties: self.max,
            });
        }
        self.built.set(built);
        Ok(())
    }
}

/// State threaded through rule construction.
#[derive(Debug, Clone, Copy)]
pub struct BuildContext<'a> {
    /// Nesting level: 0 for rules referenced by the policy.
    pub depth: usize,
    pub max_depth: usize,
    /// Parties declared on the policy node, inherited by rules that do not
    /// name a party for that role.
    pub policy_parties: Option<&'a RoleMap>,
    /// Shared across the whole policy; unbounded when absent.
    pub duties: Option<&'a DutyBudget>,
    /// Identifier of the policy or rule that references this one.
    pub owner: Option<&'a str>,
    /// 1-based position among the owner's references of the same kind.
    pub position: usize,
}

impl<'a> BuildContext<'a> {
    pub fn new(max_depth: usize) -> Self {
        Self {
            depth: 0,
            max_depth,
            policy_parties: None,
            duties: None,
            owner: None,
            position: 0,
        }
    }

    pub fn with_policy_parties(mut self, parties: &'a RoleMap) -> Self {
        self.policy_parties = Some(parties);
        self
    }

    pub fn with_duty_budget(mut self, budget: &'a DutyBudget) -> Self {
        self.duties = Some(budget);
        self
    }

    pub fn owned_by(mut self, owner: &'a str) -> Self {
        self.owner = Some(owner);
        self
    }

    pub fn at(mut self, position: usize) -> Self {
        self.position = position;
        self
    }

    /// `<owner>#<kind>-<position>`, the key of a rule node that has neither
    /// an `odrl:uid` nor an IRI of its own.
    fn positional_uid(&self, kind: RuleKind) -> Option<String> {
        self.owner
            .map(|owner| format!("{owner}#{kind}-{}", self.position))
    }

    fn nested(self) -> Self {
        Self {
            depth: self.depth + 1,
            ..self
        }
    }
}

impl Default for BuildContext<'_> {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_DEPTH)
    }
}

/// Fields shared by every kind of rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Rule {
    /// `odrl:uid` if declared, otherwise the rule node's IRI. Blank rule
    /// nodes get a positional key (`<owner>#permission-1`) that is stable
    /// across parses of the same document.
    pub uid: String,
    pub kind: RuleKind,
    /// Community-consensus category (`dc:subject`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cce: Option<String>,
    /// Jurisdiction (`dcterms:coverage`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub coverage: Option<String>,
    pub actions: Vec<Action>,
    pub targets: Vec<Asset>,
    pub outputs: Vec<Asset>,
    pub parties: RoleMap,
    pub constraints: ConstraintGroup,
}

impl Rule {
    /// Build the shared part of the rule rooted at `node`.
    ///
    /// Every rule needs an action; every rule but a duty needs a target.
    pub fn build(graph: &Graph, node: &Term, kind: RuleKind, ctx: BuildContext<'_>) -> ModelResult<Self> {
        let uid = match graph.first_object(node, odrl_terms::UID) {
            Some(declared) => declared.value().to_string(),
            None if node.is_blank() => ctx
                .positional_uid(kind)
                .unwrap_or_else(|| node.value().to_string()),
            None => node.value().to_string(),
        };

        let cce = graph
            .first_object(node, dce::SUBJECT)
            .map(|t| t.value().to_string());
        let coverage = graph
            .first_object(node, dcterms::COVERAGE)
            .map(|t| t.value().to_string());

        let action_objects = graph.objects(node, odrl_terms::ACTION);
        if action_objects.is_empty() {
            return Err(StructuralError::NoAction { kind, rule: uid });
        }
        let actions = action_objects
            .into_iter()
            .map(|object| Action::build(graph, object, kind))
            .collect::<ModelResult<Vec<_>>>()?;

        let target_objects = graph.objects(node, odrl_terms::TARGET);
        if target_objects.is_empty() && kind != RuleKind::Duty {
            return Err(StructuralError::NoTarget { kind, rule: uid });
        }
        let targets = target_objects
            .into_iter()
            .map(|object| Asset::build(graph, object))
            .collect::<ModelResult<Vec<_>>>()?;
        let outputs = graph
            .objects(node, odrl_terms::OUTPUT)
            .into_iter()
            .map(|object| Asset::build(graph, object))
            .collect::<ModelResult<Vec<_>>>()?;

        let mut parties = RoleMap::from_node(graph, node)?;
        if let Some(inherited) = ctx.policy_parties {
            parties.inherit(inherited);
        }

        let constraints = ConstraintGroup::from_holder(graph, node, odrl_terms::CONSTRAINT)?;

        tracing::debug!(
            %kind,
            rule = %uid,
            depth = ctx.depth,
            actions = actions.len(),
            targets = targets.len(),
            constraints = constraints.len(),
            "built rule"
        );

        Ok(Self {
            uid,
            kind,
            cce,
            coverage,
            actions,
            targets,
            outputs,
            parties,
            constraints,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Permission {
    #[serde(flatten)]
    pub rule: Rule,
    pub duties: Vec<Duty>,
}

impl Permission {
    pub fn build(graph: &Graph, node: &Term, ctx: BuildContext<'_>) -> ModelResult<Self> {
        let rule = Rule::build(graph, node, RuleKind::Permission, ctx)?;
        let duties = Duty::build_all(graph, node, odrl_terms::DUTY, ctx.nested().owned_by(&rule.uid))?;
        Ok(Self { rule, duties })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Prohibition {
    #[serde(flatten)]
    pub rule: Rule,
    pub remedies: Vec<Duty>,
}

impl Prohibition {
    pub fn build(graph: &Graph, node: &Term, ctx: BuildContext<'_>) -> ModelResult<Self> {
        let rule = Rule::build(graph, node, RuleKind::Prohibition, ctx)?;
        let remedies =
            Duty::build_all(graph, node, odrl_terms::REMEDY, ctx.nested().owned_by(&rule.uid))?;
        Ok(Self { rule, remedies })
    }
}

/// An obligation, a permission duty, a remedy or a consequence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Duty {
    #[serde(flatten)]
    pub rule: Rule,
    pub consequences: Vec<Duty>,
}

impl Duty {
    pub fn build(graph: &Graph, node: &Term, ctx: BuildContext<'_>) -> ModelResult<Self> {
        if ctx.depth > ctx.max_depth {
            return Err(StructuralError::DepthExceeded {
                rule: node.value().to_string(),
                max_depth: ctx.max_depth,
            });
        }
        if let Some(budget) = ctx.duties {
            budget.spend(node)?;
        }
        let rule = Rule::build(graph, node, RuleKind::Duty, ctx)?;
        let consequences = Self::build_all(
            graph,
            node,
            odrl_terms::CONSEQUENCE,
            ctx.nested().owned_by(&rule.uid),
        )?;
        Ok(Self { rule, consequences })
    }

    /// Build every duty referenced from `parent` through `predicate`.
    pub fn build_all(
        graph: &Graph,
        parent: &Term,
        predicate: &str,
        ctx: BuildContext<'_>,
    ) -> ModelResult<Vec<Self>> {
        graph
            .objects(parent, predicate)
            .into_iter()
            .enumerate()
            .map(|(i, node)| Self::build(graph, node, ctx.at(i + 1)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::DocumentFormat;
    use crate::model::Role;

    fn graph(ttl: &str) -> Graph {
        let doc = format!(
            "@prefix odrl: <http://www.w3.org/ns/odrl/2/> .\n\
             @prefix dc: <http://purl.org/dc/elements/1.1/> .\n\
             @prefix dct: <http://purl.org/dc/terms/> .\n\
             @prefix ex: <http://example.com/> .\n{ttl}"
        );
        Graph::parse(&doc, DocumentFormat::Turtle, None).unwrap()
    }

    fn rule_node() -> Term {
        Term::iri("http://example.com/rule")
    }

    #[test]
    fn missing_action_is_structural() {
        let g = graph("ex:rule odrl:target ex:A .");
        for kind in [RuleKind::Permission, RuleKind::Prohibition] {
            let err = Rule::build(&g, &rule_node(), kind, BuildContext::default()).unwrap_err();
            assert_eq!(err.error_code(), "E_NO_ACTION_DEFINED");
        }
    }

    #[test]
    fn target_optional_only_for_duties() {
        let g = graph("ex:rule odrl:action odrl:compensate .");
        let err = Permission::build(&g, &rule_node(), BuildContext::default()).unwrap_err();
        assert_eq!(err.error_code(), "E_NO_TARGET_DEFINED");

        let duty = Duty::build(&g, &rule_node(), BuildContext::default()).unwrap();
        assert!(duty.rule.targets.is_empty());
        assert_eq!(duty.rule.kind, RuleKind::Duty);
    }

    #[test]
    fn permission_with_duty_and_metadata() {
        let g = graph(
            "ex:rule odrl:action odrl:use ; odrl:target ex:A ; odrl:assigner ex:B ;
                dc:subject \"research_use\" ; dct:coverage ex:EU ;
                odrl:duty ex:d1 .
             ex:d1 odrl:action odrl:attribute ; odrl:consequence ex:d2 .
             ex:d2 odrl:action odrl:compensate .",
        );
        let p = Permission::build(&g, &rule_node(), BuildContext::default()).unwrap();
        assert_eq!(p.rule.uid, "http://example.com/rule");
        assert_eq!(p.rule.cce.as_deref(), Some("research_use"));
        assert_eq!(p.rule.coverage.as_deref(), Some("http://example.com/EU"));
        assert_eq!(p.rule.parties.get(Role::Assigner).len(), 1);
        assert_eq!(p.duties.len(), 1);
        assert_eq!(p.duties[0].rule.uid, "http://example.com/d1");
        assert_eq!(p.duties[0].consequences[0].rule.uid, "http://example.com/d2");
    }

    #[test]
    fn declared_uid_wins() {
        let g = graph("ex:rule odrl:uid ex:r1 ; odrl:action odrl:use ; odrl:target ex:A .");
        let p = Permission::build(&g, &rule_node(), BuildContext::default()).unwrap();
        assert_eq!(p.rule.uid, "http://example.com/r1");
    }

    #[test]
    fn consequence_cycle_hits_depth_bound() {
        let g = graph(
            "ex:rule odrl:action odrl:use ; odrl:consequence ex:rule2 .
             ex:rule2 odrl:action odrl:use ; odrl:consequence ex:rule .",
        );
        let err = Duty::build(&g, &rule_node(), BuildContext::new(4)).unwrap_err();
        assert_eq!(err.error_code(), "E_MAX_DEPTH_EXCEEDED");
    }

    /// Two duties per level, each with both duties of the next level as
    /// consequences: the expanded tree doubles with every level.
    fn layered_duties(levels: usize) -> String {
        let mut ttl = String::from("ex:rule odrl:action odrl:use ; odrl:consequence ex:d0a , ex:d0b .\n");
        for level in 0..levels {
            for side in ["a", "b"] {
                ttl.push_str(&format!("ex:d{level}{side} odrl:action odrl:compensate"));
                if level + 1 < levels {
                    let next = level + 1;
                    ttl.push_str(&format!(" ; odrl:consequence ex:d{next}a , ex:d{next}b"));
                }
                ttl.push_str(" .\n");
            }
        }
        ttl
    }

    #[test]
    fn shared_consequences_exhaust_duty_budget() {
        let g = graph(&layered_duties(30));
        let budget = DutyBudget::new(DEFAULT_MAX_DUTIES);
        let ctx = BuildContext::default().with_duty_budget(&budget);
        let err = Duty::build(&g, &rule_node(), ctx).unwrap_err();
        assert_eq!(err.error_code(), "E_MAX_DUTIES_EXCEEDED");
        assert_eq!(budget.built(), DEFAULT_MAX_DUTIES);
    }

    #[test]
    fn shallow_shared_consequences_fit_the_budget() {
        let g = graph(&layered_duties(3));
        let budget = DutyBudget::new(DEFAULT_MAX_DUTIES);
        let ctx = BuildContext::default().with_duty_budget(&budget);
        let duty = Duty::build(&g, &rule_node(), ctx).unwrap();
        assert_eq!(duty.consequences.len(), 2);
        assert_eq!(duty.consequences[0].consequences[1].consequences.len(), 2);
        // root + 2 + 4 + 8
        assert_eq!(budget.built(), 15);
    }

    #[test]
    fn blank_rules_get_positional_keys() {
        let doc = "ex:rule odrl:action odrl:use ; odrl:target ex:A ;
                     odrl:duty [ odrl:action odrl:compensate ] , [ odrl:action odrl:attribute ] .";
        let uids = |g: &Graph| {
            let p = Permission::build(g, &rule_node(), BuildContext::default()).unwrap();
            p.duties.iter().map(|d| d.rule.uid.clone()).collect::<Vec<_>>()
        };
        let first = uids(&graph(doc));
        assert_eq!(
            first,
            ["http://example.com/rule#duty-1", "http://example.com/rule#duty-2"]
        );
        assert_eq!(uids(&graph(doc)), first);
    }

    #[test]
    fn policy_parties_are_inherited() {
        let g = graph(
            "ex:policy odrl:assignee ex:Q .
             ex:rule odrl:action odrl:use ; odrl:target ex:A .",
        );
        let parties = RoleMap::from_node(&g, &Term::iri("http://example.com/policy")).unwrap();
        let ctx = BuildContext::default().with_policy_parties(&parties);
        let p = Permission::build(&g, &rule_node(), ctx).unwrap();
        assert_eq!(p.rule.parties.get(Role::Assignee)[0].sources, ["http://example.com/Q"]);
    }

    #[test]
    fn serialized_rule_is_flattened() {
        let g = graph("ex:rule odrl:action odrl:use ; odrl:target ex:A .");
        let p = Permission::build(&g, &rule_node(), BuildContext::default()).unwrap();
        let json = serde_json::to_value(&p).unwrap();
        assert_eq!(json["uid"], "http://example.com/rule");
        assert_eq!(json["kind"], "permission");
        assert!(json["duties"].as_array().unwrap().is_empty());
    }
}
