//! Permission computation
//!
//! Validates the supplied models against what an entity's predicates
//! declare, runs every predicate with denials contained, and flattens
//! the results into a [`Permissions`] map.

use std::panic::{self, AssertUnwindSafe};

use super::decision::Permissions;
use super::entity::{PermissionEntity, PermissionMap};
use super::model::ModelSet;
use super::predicate::{Denial, PermissionFn};
use crate::core::{EngineError, EngineResult};

/// Reason recorded when a predicate fails without a usable error code
pub const UNKNOWN_ERROR: &str = "UNKNOWN_ERROR";

/// Uniform outcome of invoking one predicate
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attempt {
    pub access: bool,
    pub reason: Option<String>,
    pub remediation_option: Option<String>,
}

impl Attempt {
    fn granted(access: bool) -> Self {
        Self {
            access,
            reason: None,
            remediation_option: None,
        }
    }

    fn denied(reason: &str, remediation_option: &str) -> Self {
        Self {
            access: false,
            reason: Some(reason.to_string()),
            remediation_option: (!remediation_option.is_empty())
                .then(|| remediation_option.to_string()),
        }
    }
}

/// Union of the model names declared under an entity, first-seen order
pub fn expected_models(entity: &PermissionEntity) -> Vec<String> {
    let mut expected: Vec<String> = Vec::new();
    for (_, node) in entity.actions() {
        for name in node.required_models() {
            if !expected.iter().any(|seen| seen == name) {
                expected.push(name.to_string());
            }
        }
    }
    expected
}

/// Fail unless the truthy models are exactly the ones the entity declares
///
/// Order is irrelevant; a missing or an extra model both fail.
pub fn check_expected_models(
    entity: &PermissionEntity,
    entity_name: &str,
    models: &ModelSet,
) -> EngineResult<()> {
    let expected = expected_models(entity);
    let given = models.supplied_names();

    let same = expected.len() == given.len()
        && given.iter().all(|name| expected.iter().any(|e| e == name));

    if !same {
        return Err(EngineError::ModelMismatch {
            entity: entity_name.to_string(),
            expected,
            given: given.into_iter().map(str::to_string).collect(),
        });
    }
    Ok(())
}

/// Invoke a predicate; nothing it does escapes this call
///
/// A panicking predicate is reported as `UNKNOWN_ERROR`, but the process
/// panic hook still runs first, so the default hook prints the panic
/// message (and a backtrace when `RUST_BACKTRACE` is set) to stderr.
/// Hosts that want silent containment must install their own hook.
pub fn try_permission(permission: &PermissionFn, models: &ModelSet) -> Attempt {
    let outcome = panic::catch_unwind(AssertUnwindSafe(|| permission.call(models)));

    match outcome {
        Ok(Ok(access)) => Attempt::granted(access),
        Ok(Err(Denial::Custom(err))) => {
            let reason = err.code().filter(|code| !code.is_empty()).unwrap_or(UNKNOWN_ERROR);
            Attempt::denied(reason, err.remediation_options().unwrap_or(""))
        }
        Ok(Err(Denial::Unexpected(msg))) => {
            tracing::warn!("Permission predicate failed: {}", msg);
            Attempt::denied(UNKNOWN_ERROR, "")
        }
        Err(payload) => {
            let msg = payload
                .downcast_ref::<&str>()
                .map(|s| s.to_string())
                .or_else(|| payload.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "non-string panic payload".to_string());
            tracing::warn!("Permission predicate panicked: {}", msg);
            Attempt::denied(UNKNOWN_ERROR, "")
        }
    }
}

/// Evaluate every action of `entity_name` against `models`
///
/// Configuration errors (unknown entity, model mismatch) abort before any
/// predicate runs. Predicate denials only ever show up as `false`.
pub fn compute_permissions(
    entities: &PermissionMap,
    entity_name: &str,
    models: &ModelSet,
    provide_reasons: bool,
) -> EngineResult<Permissions> {
    let entity = entities
        .get(entity_name)
        .ok_or_else(|| EngineError::InvalidEntity(entity_name.to_string()))?;

    check_expected_models(entity, entity_name, models)?;

    let mut permissions = Permissions::new(provide_reasons);
    for (key, permission) in entity.predicates() {
        let attempt = try_permission(permission, models);
        tracing::debug!(
            "Permission {}.{} -> {} ({})",
            entity_name,
            key,
            attempt.access,
            attempt.reason.as_deref().unwrap_or("ok")
        );
        permissions.record(key, attempt.access, attempt.reason, attempt.remediation_option);
    }

    Ok(permissions)
}
