//! Permission entities and the permission map
//!
//! An entity is a two-level tree: each action holds either a predicate
//! (`delete`) or a set of subactions, each holding a predicate
//! (`delete.editHash`). The shape is fixed when the map is built, so
//! evaluation never has to inspect nodes at runtime.

use super::predicate::PermissionFn;
use crate::core::{EngineError, EngineResult};

/// Separator between an action and its subaction in result keys
pub const KEY_SEPARATOR: char = '.';

/// Prefix reserved for the side-maps of a decision result
pub const RESERVED_PREFIX: char = '$';

/// Subactions of a nested action, in declared order
#[derive(Debug, Clone, Default)]
pub struct Subactions {
    entries: Vec<(String, PermissionFn)>,
}

impl Subactions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a subaction predicate
    pub fn action(mut self, name: impl Into<String>, permission: PermissionFn) -> Self {
        self.entries.push((name.into(), permission));
        self
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &PermissionFn)> {
        self.entries.iter().map(|(name, f)| (name.as_str(), f))
    }

    pub fn get(&self, name: &str) -> Option<&PermissionFn> {
        self.entries.iter().find(|(key, _)| key == name).map(|(_, f)| f)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// A node in an entity's action slot
#[derive(Debug, Clone)]
pub enum PermissionNode {
    /// Direct action decided by one predicate
    Predicate(PermissionFn),
    /// Action split into named subactions
    Nested(Subactions),
}

impl PermissionNode {
    pub fn is_predicate(&self) -> bool {
        matches!(self, PermissionNode::Predicate(_))
    }

    pub fn is_nested(&self) -> bool {
        matches!(self, PermissionNode::Nested(_))
    }

    pub fn as_predicate(&self) -> Option<&PermissionFn> {
        match self {
            PermissionNode::Predicate(f) => Some(f),
            PermissionNode::Nested(_) => None,
        }
    }

    pub fn as_nested(&self) -> Option<&Subactions> {
        match self {
            PermissionNode::Predicate(_) => None,
            PermissionNode::Nested(subactions) => Some(subactions),
        }
    }

    /// Model names required by every predicate under this node, with repeats
    pub fn required_models(&self) -> Vec<&str> {
        match self {
            PermissionNode::Predicate(f) => f.requires().iter().map(String::as_str).collect(),
            PermissionNode::Nested(subactions) => subactions
                .iter()
                .flat_map(|(_, f)| f.requires().iter().map(String::as_str))
                .collect(),
        }
    }
}

/// Named tree of permission checks
#[derive(Debug, Clone, Default)]
pub struct PermissionEntity {
    actions: Vec<(String, PermissionNode)>,
}

impl PermissionEntity {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a direct action
    pub fn action(mut self, name: impl Into<String>, permission: PermissionFn) -> Self {
        self.actions
            .push((name.into(), PermissionNode::Predicate(permission)));
        self
    }

    /// Add an action made of subactions
    pub fn nested(mut self, name: impl Into<String>, subactions: Subactions) -> Self {
        self.actions
            .push((name.into(), PermissionNode::Nested(subactions)));
        self
    }

    /// Add an action whose subactions are declared in a closure
    ///
    /// ```
    /// use permengine::permissions::{PermissionEntity, PermissionFn};
    ///
    /// let entity = PermissionEntity::new().subactions("delete", |sub| {
    ///     sub.action("editHash", PermissionFn::constant(["user"], true))
    /// });
    /// assert!(entity.get("delete").is_some_and(|node| node.is_nested()));
    /// ```
    pub fn subactions<F>(self, name: impl Into<String>, build: F) -> Self
    where
        F: FnOnce(Subactions) -> Subactions,
    {
        self.nested(name, build(Subactions::new()))
    }

    /// Actions in declared order
    pub fn actions(&self) -> impl Iterator<Item = (&str, &PermissionNode)> {
        self.actions.iter().map(|(name, node)| (name.as_str(), node))
    }

    pub fn get(&self, action: &str) -> Option<&PermissionNode> {
        self.actions
            .iter()
            .find(|(key, _)| key == action)
            .map(|(_, node)| node)
    }

    /// Every predicate with its flattened result key, in evaluation order
    pub fn predicates(&self) -> Vec<(String, &PermissionFn)> {
        let mut out = Vec::new();
        for (action, node) in &self.actions {
            match node {
                PermissionNode::Predicate(f) => out.push((action.clone(), f)),
                PermissionNode::Nested(subactions) => {
                    for (subaction, f) in subactions.iter() {
                        out.push((format!("{}{}{}", action, KEY_SEPARATOR, subaction), f));
                    }
                }
            }
        }
        out
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    /// Reject shapes that would produce ambiguous or reserved result keys
    pub fn validate(&self, entity_name: &str) -> EngineResult<()> {
        let mut seen: Vec<&str> = Vec::new();
        for (action, node) in &self.actions {
            check_key(entity_name, action)?;
            if seen.contains(&action.as_str()) {
                return Err(EngineError::malformed(entity_name, action, "duplicate action"));
            }
            seen.push(action);

            if let PermissionNode::Nested(subactions) = node {
                if subactions.is_empty() {
                    return Err(EngineError::malformed(
                        entity_name,
                        action,
                        "nested action has no subactions",
                    ));
                }
                let mut seen_sub: Vec<&str> = Vec::new();
                for (subaction, _) in subactions.iter() {
                    let key = format!("{}{}{}", action, KEY_SEPARATOR, subaction);
                    check_key(entity_name, subaction).map_err(|_| {
                        EngineError::malformed(entity_name, &key, invalid_key_reason(subaction))
                    })?;
                    if seen_sub.contains(&subaction) {
                        return Err(EngineError::malformed(entity_name, key, "duplicate subaction"));
                    }
                    seen_sub.push(subaction);
                }
            }
        }

        for (key, permission) in self.predicates() {
            if permission.requires().iter().any(|model| model.trim().is_empty()) {
                return Err(EngineError::malformed(entity_name, key, "empty model name"));
            }
        }
        Ok(())
    }
}

fn invalid_key_reason(key: &str) -> &'static str {
    if key.is_empty() {
        "empty key"
    } else if key.contains(KEY_SEPARATOR) {
        "key contains the '.' separator"
    } else {
        "key starts with the reserved '$' prefix"
    }
}

fn check_key(entity_name: &str, key: &str) -> EngineResult<()> {
    if key.is_empty() || key.contains(KEY_SEPARATOR) || key.starts_with(RESERVED_PREFIX) {
        return Err(EngineError::malformed(
            entity_name,
            key,
            invalid_key_reason(key),
        ));
    }
    Ok(())
}

/// Registry of permission entities, read-only once built
#[derive(Debug, Clone, Default)]
pub struct PermissionMap {
    entities: Vec<(String, PermissionEntity)>,
}

impl PermissionMap {
    pub fn builder() -> PermissionMapBuilder {
        PermissionMapBuilder::default()
    }

    pub fn get(&self, name: &str) -> Option<&PermissionEntity> {
        self.entities
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, entity)| entity)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entities.iter().map(|(name, _)| name.as_str())
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }
}

/// Collects entities and validates every one of them on [`build`](Self::build)
#[derive(Debug, Default)]
pub struct PermissionMapBuilder {
    entities: Vec<(String, PermissionEntity)>,
}

impl PermissionMapBuilder {
    pub fn entity(mut self, name: impl Into<String>, entity: PermissionEntity) -> Self {
        self.entities.push((name.into(), entity));
        self
    }

    pub fn build(self) -> EngineResult<PermissionMap> {
        for (index, (name, entity)) in self.entities.iter().enumerate() {
            if self.entities[..index].iter().any(|(other, _)| other == name) {
                return Err(EngineError::malformed(name, name, "duplicate entity"));
            }
            entity.validate(name)?;
        }
        tracing::debug!("Permission map built with {} entities", self.entities.len());
        Ok(PermissionMap {
            entities: self.entities,
        })
    }
}
