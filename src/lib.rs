//! Permission computation for fine-grained, per-action authorization.
//!
//! Callers describe each entity as a tree of predicates (actions and
//! optional subactions), each registered with the models it reads. An
//! evaluation checks that exactly those models were supplied, runs every
//! predicate and returns a flat decision map such as
//! `{ "delete": false, "delete.editHash": true }`.
//!
//! # Example
//!
//! ```
//! use permengine::errors::{forbidden, ErrorExtra};
//! use permengine::permissions::{
//!     compute_permissions, ModelSet, PermissionEntity, PermissionFn, PermissionMap,
//! };
//! use serde_json::json;
//!
//! let map = PermissionMap::builder()
//!     .entity(
//!         "users",
//!         PermissionEntity::new().action(
//!             "delete",
//!             PermissionFn::new(["user"], |_| {
//!                 Err(forbidden(
//!                     Some("NOT_OWNER"),
//!                     Some(ErrorExtra::remediation("request-transfer")),
//!                 )
//!                 .into())
//!             }),
//!         ),
//!     )
//!     .build()?;
//!
//! let models = ModelSet::new().with("user", json!({ "id": 1 }));
//! let permissions = compute_permissions(&map, "users", &models, true)?;
//!
//! assert_eq!(
//!     permissions.to_json(),
//!     json!({
//!         "delete": false,
//!         "$reasons": { "delete": "NOT_OWNER" },
//!         "$remediationOptions": { "delete": "request-transfer" }
//!     })
//! );
//! # Ok::<(), permengine::EngineError>(())
//! ```

pub mod core;
pub mod errors;
pub mod logging;
pub mod permissions;

pub use crate::core::{EngineError, EngineResult};
pub use errors::CustomError;
pub use permissions::{
    compute_permissions, EngineConfig, ModelSet, PermissionEngine, PermissionEntity,
    PermissionFn, PermissionMap, Permissions,
};
