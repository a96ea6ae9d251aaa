//! Flat decision map produced by an evaluation

use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_json::Value;

/// Reserved result key holding the reason side-map
pub const REASONS_KEY: &str = "$reasons";

/// Reserved result key holding the remediation side-map
pub const REMEDIATION_OPTIONS_KEY: &str = "$remediationOptions";

/// Ordered string-to-string side-map keyed like the decisions
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SideMap {
    entries: Vec<(String, String)>,
}

impl SideMap {
    pub(crate) fn insert(&mut self, key: String, value: String) {
        self.entries.push((key, value));
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Serialize for SideMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, value) in &self.entries {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

/// Denial reasons and remediation hints, keyed like the decisions
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Reasons {
    pub reasons: SideMap,
    pub remediation_options: SideMap,
}

/// Decisions for every action of one entity
///
/// Keys are `action` or `action.subaction`, in the entity's declared
/// order. Reasons are only carried when the caller asked for them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Permissions {
    access: Vec<(String, bool)>,
    reasons: Option<Reasons>,
}

impl Permissions {
    pub(crate) fn new(provide_reasons: bool) -> Self {
        Self {
            access: Vec::new(),
            reasons: provide_reasons.then(Reasons::default),
        }
    }

    pub(crate) fn record(
        &mut self,
        key: String,
        access: bool,
        reason: Option<String>,
        remediation_option: Option<String>,
    ) {
        if let Some(side) = self.reasons.as_mut() {
            if let Some(reason) = reason {
                side.reasons.insert(key.clone(), reason);
            }
            if let Some(option) = remediation_option {
                side.remediation_options.insert(key.clone(), option);
            }
        }
        self.access.push((key, access));
    }

    /// Decision for a key, `None` if the entity has no such action
    pub fn get(&self, key: &str) -> Option<bool> {
        self.access
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, access)| *access)
    }

    /// Whether access is granted; unknown keys are denied
    pub fn is_allowed(&self, key: &str) -> bool {
        self.get(key).unwrap_or(false)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, bool)> {
        self.access.iter().map(|(k, access)| (k.as_str(), *access))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.access.iter().map(|(k, _)| k.as_str())
    }

    pub fn len(&self) -> usize {
        self.access.len()
    }

    pub fn is_empty(&self) -> bool {
        self.access.is_empty()
    }

    pub fn has_reasons(&self) -> bool {
        self.reasons.is_some()
    }

    pub fn reasons(&self) -> Option<&Reasons> {
        self.reasons.as_ref()
    }

    pub fn reason(&self, key: &str) -> Option<&str> {
        self.reasons.as_ref().and_then(|r| r.reasons.get(key))
    }

    pub fn remediation_option(&self, key: &str) -> Option<&str> {
        self.reasons
            .as_ref()
            .and_then(|r| r.remediation_options.get(key))
    }

    /// Flat JSON object, with `$reasons`/`$remediationOptions` when requested
    pub fn to_json(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }
}

impl Serialize for Permissions {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let extra = if self.reasons.is_some() { 2 } else { 0 };
        let mut map = serializer.serialize_map(Some(self.access.len() + extra))?;
        for (key, access) in &self.access {
            map.serialize_entry(key, access)?;
        }
        if let Some(side) = &self.reasons {
            map.serialize_entry(REASONS_KEY, &side.reasons)?;
            map.serialize_entry(REMEDIATION_OPTIONS_KEY, &side.remediation_options)?;
        }
        map.end()
    }
}
