//! Long-lived engine owning a permission map
//!
//! Wraps [`compute_permissions`] with a default configuration and
//! per-evaluation tracing.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::compute::compute_permissions;
use super::decision::Permissions;
use super::entity::PermissionMap;
use super::model::ModelSet;
use crate::core::EngineResult;

/// Engine configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Attach `$reasons` and `$remediationOptions` to every result
    pub provide_reasons: bool,
}

impl EngineConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_reasons(mut self, provide_reasons: bool) -> Self {
        self.provide_reasons = provide_reasons;
        self
    }
}

/// Evaluates entities of one permission map
#[derive(Debug, Clone)]
pub struct PermissionEngine {
    map: PermissionMap,
    config: EngineConfig,
}

impl PermissionEngine {
    /// Create an engine with the default configuration
    pub fn new(map: PermissionMap) -> Self {
        Self::with_config(map, EngineConfig::default())
    }

    pub fn with_config(map: PermissionMap, config: EngineConfig) -> Self {
        tracing::info!(
            "Creating permission engine ({} entities, reasons: {})",
            map.len(),
            config.provide_reasons
        );
        Self { map, config }
    }

    pub fn map(&self) -> &PermissionMap {
        &self.map
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Evaluate an entity using the configured `provide_reasons`
    pub fn compute(&self, entity_name: &str, models: &ModelSet) -> EngineResult<Permissions> {
        self.evaluate(entity_name, models, self.config.provide_reasons)
    }

    /// Evaluate an entity, always attaching reasons
    pub fn compute_with_reasons(
        &self,
        entity_name: &str,
        models: &ModelSet,
    ) -> EngineResult<Permissions> {
        self.evaluate(entity_name, models, true)
    }

    fn evaluate(
        &self,
        entity_name: &str,
        models: &ModelSet,
        provide_reasons: bool,
    ) -> EngineResult<Permissions> {
        let evaluation_id = Uuid::new_v4();
        let span = tracing::debug_span!("compute_permissions", %evaluation_id, entity = entity_name);
        let _guard = span.enter();

        match compute_permissions(&self.map, entity_name, models, provide_reasons) {
            Ok(permissions) => {
                let denied = permissions.iter().filter(|(_, access)| !access).count();
                tracing::debug!(
                    "Computed {} permissions for {} ({} denied)",
                    permissions.len(),
                    entity_name,
                    denied
                );
                Ok(permissions)
            }
            Err(e) => {
                tracing::error!("Permission computation failed: {}", e);
                Err(e)
            }
        }
    }
}
