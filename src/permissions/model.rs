//! Model set supplied to one evaluation
//!
//! A model is any runtime value a predicate needs to decide access
//! (the acting user, the resource being touched, ...). Entries with a
//! falsy value count as "not supplied".

use serde_json::Value;

/// Ordered mapping from model name to an optional value
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ModelSet {
    entries: Vec<(String, Option<Value>)>,
}

impl ModelSet {
    /// Create an empty model set
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a model, keeping the original position on replace
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Option<Value>>) {
        let name = name.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(key, _)| *key == name) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((name, value)),
        }
    }

    /// Builder variant of [`ModelSet::insert`]
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Option<Value>>) -> Self {
        self.insert(name, value);
        self
    }

    /// Build a model set from a JSON object
    ///
    /// Returns `None` for anything that is not an object.
    pub fn from_json(value: Value) -> Option<Self> {
        match value {
            Value::Object(map) => Some(Self {
                entries: map.into_iter().map(|(k, v)| (k, Some(v))).collect(),
            }),
            _ => None,
        }
    }

    /// Get a supplied model; falsy values read as absent
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.entries
            .iter()
            .find(|(key, _)| key == name)
            .and_then(|(_, value)| value.as_ref())
            .filter(|value| is_truthy(value))
    }

    /// Whether a model is supplied with a truthy value
    pub fn is_supplied(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// All model names, supplied or not, in insertion order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(key, _)| key.as_str())
    }

    /// Names of the models carrying a truthy value, in insertion order
    pub fn supplied_names(&self) -> Vec<&str> {
        self.entries
            .iter()
            .filter(|(_, value)| value.as_ref().is_some_and(is_truthy))
            .map(|(key, _)| key.as_str())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Top-level object fields become models; any other JSON gives an empty set
impl From<Value> for ModelSet {
    fn from(value: Value) -> Self {
        Self::from_json(value).unwrap_or_default()
    }
}

/// Falsy: `null`, `false`, zero and the empty string. Arrays and objects
/// are always truthy, even when empty.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}
