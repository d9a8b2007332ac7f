//! In-memory statement store with subject, predicate and object indexes.
//!
//! [`Graph::matching`] is the single query primitive every model component is
//! built on. It answers `None` when nothing matches, so callers can tell an
//! absent node apart from a present one with an empty collection.

use std::collections::{HashMap, HashSet};

use crate::error::GraphError;

use super::{Statement, Term};

/// Result type for graph operations.
pub type GraphResult<T> = std::result::Result<T, GraphError>;

/// Read-only (after loading) set of statements.
#[derive(Debug, Default, Clone)]
pub struct Graph {
    statements: Vec<Statement>,
    /// Dedup set; a graph holds each statement once.
    seen: HashSet<Statement>,
    by_subject: HashMap<Term, Vec<usize>>,
    by_predicate: HashMap<String, Vec<usize>>,
    by_object: HashMap<Term, Vec<usize>>,
    /// Number of graphs merged in so far, used to scope their blank nodes.
    merges: usize,
}

impl Graph {
    /// Create an empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a graph from a list of statements.
    pub fn from_statements(statements: impl IntoIterator<Item = Statement>) -> Self {
        let mut graph = Self::new();
        for st in statements {
            graph.insert(st);
        }
        graph
    }

    /// Add a statement. Returns `false` if it was already present.
    pub fn insert(&mut self, statement: Statement) -> bool {
        if self.seen.contains(&statement) {
            return false;
        }
        let idx = self.statements.len();
        self.by_subject
            .entry(statement.subject.clone())
            .or_default()
            .push(idx);
        self.by_predicate
            .entry(statement.predicate.clone())
            .or_default()
            .push(idx);
        self.by_object
            .entry(statement.object.clone())
            .or_default()
            .push(idx);
        self.seen.insert(statement.clone());
        self.statements.push(statement);
        true
    }

    /// Merge another graph into this one.
    ///
    /// Blank nodes of `other` are renamed so they cannot collide with blank
    /// nodes already present. Returns the number of statements added.
    pub fn merge(&mut self, other: Graph) -> usize {
        self.merges += 1;
        let scope = self.merges;
        let rename = |term: Term| match term {
            Term::Blank { id } => Term::blank(format!("m{scope}_{id}")),
            other => other,
        };

        let mut added = 0;
        for st in other.statements {
            let st = Statement {
                subject: rename(st.subject),
                predicate: st.predicate,
                object: rename(st.object),
            };
            if self.insert(st) {
                added += 1;
            }
        }
        added
    }

    /// Match statements against an optional subject, predicate and object.
    ///
    /// Unconstrained positions are wildcards. Returns `None` when no statement
    /// matches; a returned list is never empty.
    pub fn matching(
        &self,
        subject: Option<&Term>,
        predicate: Option<&str>,
        object: Option<&Term>,
    ) -> Option<Vec<&Statement>> {
        // Start from the most selective index available.
        let mut indexes: Vec<&[usize]> = Vec::with_capacity(3);
        if let Some(s) = subject {
            indexes.push(self.by_subject.get(s)?.as_slice());
        }
        if let Some(p) = predicate {
            indexes.push(self.by_predicate.get(p)?.as_slice());
        }
        if let Some(o) = object {
            indexes.push(self.by_object.get(o)?.as_slice());
        }
        let candidates = indexes.into_iter().min_by_key(|list| list.len());

        let accept = |st: &Statement| {
            subject.is_none_or(|s| &st.subject == s)
                && predicate.is_none_or(|p| st.predicate == p)
                && object.is_none_or(|o| &st.object == o)
        };

        let matches: Vec<&Statement> = match candidates {
            Some(indices) => indices
                .iter()
                .map(|&i| &self.statements[i])
                .filter(|st| accept(*st))
                .collect(),
            None => self.statements.iter().collect(),
        };

        if matches.is_empty() {
            None
        } else {
            Some(matches)
        }
    }

    /// All objects of `(subject, predicate, ?)`, in load order.
    pub fn objects(&self, subject: &Term, predicate: &str) -> Vec<&Term> {
        self.matching(Some(subject), Some(predicate), None)
            .map(|sts| sts.into_iter().map(|st| &st.object).collect())
            .unwrap_or_default()
    }

    /// The first object of `(subject, predicate, ?)`.
    pub fn first_object(&self, subject: &Term, predicate: &str) -> Option<&Term> {
        self.matching(Some(subject), Some(predicate), None)
            .and_then(|sts| sts.into_iter().next())
            .map(|st| &st.object)
    }

    /// All subjects of `(?, predicate, object)`, in load order.
    pub fn subjects(&self, predicate: &str, object: &Term) -> Vec<&Term> {
        self.matching(None, Some(predicate), Some(object))
            .map(|sts| sts.into_iter().map(|st| &st.subject).collect())
            .unwrap_or_default()
    }

    /// Whether `node` is the subject of at least one statement.
    pub fn has_outgoing(&self, node: &Term) -> bool {
        self.by_subject.get(node).is_some_and(|v| !v.is_empty())
    }

    /// Iterate all statements in load order.
    pub fn iter(&self) -> impl Iterator<Item = &Statement> {
        self.statements.iter()
    }

    /// Number of statements.
    pub fn len(&self) -> usize {
        self.statements.len()
    }

    /// Whether the graph holds no statements.
    pub fn is_empty(&self) -> bool {
        self.statements.is_empty()
    }
}
