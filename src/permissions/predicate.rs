//! Permission predicates and their declared model dependencies

use std::fmt;
use std::sync::Arc;

use super::model::ModelSet;
use crate::errors::CustomError;

/// Why a predicate refused to answer with a plain boolean
#[derive(Debug, Clone)]
pub enum Denial {
    /// Structured denial carrying a reason code and remediation hint
    Custom(CustomError),
    /// Anything else that went wrong inside the predicate
    Unexpected(String),
}

impl From<CustomError> for Denial {
    fn from(err: CustomError) -> Self {
        Denial::Custom(err)
    }
}

impl From<anyhow::Error> for Denial {
    fn from(err: anyhow::Error) -> Self {
        Denial::Unexpected(format!("{:#}", err))
    }
}

impl fmt::Display for Denial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Denial::Custom(err) => write!(
                f,
                "denied ({}): {}",
                err.status_code,
                err.code().unwrap_or("no code")
            ),
            Denial::Unexpected(msg) => write!(f, "unexpected failure: {}", msg),
        }
    }
}

/// Outcome of a single predicate: `Ok(access)` or a denial
pub type PermissionResult = Result<bool, Denial>;

type CheckFn = dyn Fn(&ModelSet) -> PermissionResult + Send + Sync;

/// A predicate registered together with the models it reads
///
/// The `requires` list is the predicate's dependency contract: an entity
/// can only be evaluated when the supplied models match the union of
/// what its predicates require.
#[derive(Clone)]
pub struct PermissionFn {
    requires: Vec<String>,
    check: Arc<CheckFn>,
}

impl PermissionFn {
    /// Create a predicate from its required model names and a check closure
    pub fn new<I, S, F>(requires: I, check: F) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
        F: Fn(&ModelSet) -> PermissionResult + Send + Sync + 'static,
    {
        Self {
            requires: requires.into_iter().map(Into::into).collect(),
            check: Arc::new(check),
        }
    }

    /// Predicate that always yields the given answer
    pub fn constant<I, S>(requires: I, access: bool) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(requires, move |_| Ok(access))
    }

    /// Model names this predicate declares it needs, in declared order
    pub fn requires(&self) -> &[String] {
        &self.requires
    }

    /// Run the check; denials are returned, not contained
    pub fn call(&self, models: &ModelSet) -> PermissionResult {
        (self.check)(models)
    }
}

impl fmt::Debug for PermissionFn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PermissionFn")
            .field("requires", &self.requires)
            .finish_non_exhaustive()
    }
}
