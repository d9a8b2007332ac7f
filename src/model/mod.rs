//! Typed policy model reconstructed from a statement graph.
//!
//! - **Entities** ([`Action`], [`Asset`], [`Party`]): the nouns of a rule,
//!   each with optional refinements
//! - **Constraints** ([`Constraint`], [`ConstraintGroup`],
//!   [`LogicalConstraintSet`]): comparisons attached to rules and entities
//! - **Rules** ([`Permission`], [`Prohibition`], [`Duty`]): actions bound to
//!   targets, parties and constraints
//! - **Policies** ([`Policy`]): the roots, discovered from the graph
//!
//! Construction is eager and synchronous; a missing mandatory component fails
//! with a [`StructuralError`](crate::error::StructuralError).

pub mod action;
pub mod asset;
pub mod constraint;
pub mod logical;
pub mod node;
pub mod party;
pub mod policy;
pub mod rule;

pub use action::{Action, ActionContext};
pub use asset::Asset;
pub use constraint::{Constraint, ConstraintGroup, RightOperand};
pub use logical::{LogicalConstraintSet, LogicalOperand};
pub use node::NodeRef;
pub use party::{Party, PartyKind, Role, RoleMap};
pub use policy::{Policy, PolicyKind, PolicyRef};
pub use rule::{
    BuildContext, DEFAULT_MAX_DEPTH, DEFAULT_MAX_DUTIES, Duty, DutyBudget, Permission, Prohibition, Rule,
    RuleKind,
};
