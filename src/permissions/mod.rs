//! Permission computation engine
//!
//! Evaluates a declarative tree of permission predicates against a set of
//! runtime models and produces a flat map of access decisions, keyed
//! `action` or `action.subaction`, optionally annotated with denial
//! reasons and remediation hints.

mod compute;
mod decision;
mod engine;
mod entity;
mod model;
mod predicate;

pub use compute::{
    check_expected_models, compute_permissions, expected_models, try_permission, Attempt,
    UNKNOWN_ERROR,
};
pub use decision::{Permissions, Reasons, SideMap, REASONS_KEY, REMEDIATION_OPTIONS_KEY};
pub use engine::{EngineConfig, PermissionEngine};
pub use entity::{
    PermissionEntity, PermissionMap, PermissionMapBuilder, PermissionNode, Subactions,
    KEY_SEPARATOR, RESERVED_PREFIX,
};
pub use model::{is_truthy, ModelSet};
pub use predicate::{Denial, PermissionFn, PermissionResult};
