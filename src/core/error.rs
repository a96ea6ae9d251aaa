//! Configuration errors raised by the permission engine
//!
//! These describe a wiring defect between the caller and the permission
//! map. They abort an evaluation entirely and are never turned into
//! per-action denials.

use thiserror::Error;

/// Result type alias for engine operations
pub type EngineResult<T> = Result<T, EngineError>;

/// Errors that stop an evaluation (or a permission map build) outright
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// The requested entity is not part of the permission map
    #[error("Invalid entity {0}")]
    InvalidEntity(String),

    /// The supplied models do not match what the entity's predicates declare
    #[error(
        "Wrong expected models for \"{entity}\". Expected: {}; Given: {}.",
        .expected.join(", "),
        .given.join(", ")
    )]
    ModelMismatch {
        entity: String,
        expected: Vec<String>,
        given: Vec<String>,
    },

    /// The entity tree has a shape the engine refuses to evaluate
    #[error("Malformed entity \"{entity}\" at \"{key}\": {reason}")]
    MalformedEntity {
        entity: String,
        key: String,
        reason: String,
    },
}

impl EngineError {
    /// Name of the entity this error refers to
    pub fn entity(&self) -> &str {
        match self {
            EngineError::InvalidEntity(name) => name,
            EngineError::ModelMismatch { entity, .. } => entity,
            EngineError::MalformedEntity { entity, .. } => entity,
        }
    }

    pub(crate) fn malformed(
        entity: impl Into<String>,
        key: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        EngineError::MalformedEntity {
            entity: entity.into(),
            key: key.into(),
            reason: reason.into(),
        }
    }
}
