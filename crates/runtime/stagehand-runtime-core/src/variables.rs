//! Global variable store shared by every actor stream of a run.

use hashbrown::HashMap;
use serde::{Deserialize, Serialize};

use stagehand_api_core::Value;

/// Single variable entry with provenance information.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariableEntry {
    pub value: Value,
    /// Actor stream that wrote the value last.
    pub source: String,
    /// Runtime epoch of the last write.
    pub epoch: u64,
}

/// Named values with last-writer-wins semantics. Reads never fail: an unset
/// (or null) variable reads as `0`.
#[derive(Debug, Default)]
pub struct VariableStore {
    inner: HashMap<String, VariableEntry>,
}

impl VariableStore {
    pub fn new() -> Self {
        Self {
            inner: HashMap::new(),
        }
    }

    /// Current value, defaulting to `0`.
    pub fn get(&self, name: &str) -> Value {
        match self.inner.get(name) {
            Some(entry) if !entry.value.is_null() => entry.value.clone(),
            _ => Value::ZERO,
        }
    }

    /// Stored value without defaulting (`None` when never written).
    pub fn get_raw(&self, name: &str) -> Option<&Value> {
        self.inner.get(name).map(|entry| &entry.value)
    }

    pub fn entry(&self, name: &str) -> Option<&VariableEntry> {
        self.inner.get(name)
    }

    /// Overwrite `name`, returning the previous entry if any.
    pub fn set(
        &mut self,
        name: &str,
        value: Value,
        source: &str,
        epoch: u64,
    ) -> Option<VariableEntry> {
        self.inner.insert(
            name.to_string(),
            VariableEntry {
                value,
                source: source.to_string(),
                epoch,
            },
        )
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    pub fn clear(&mut self) {
        self.inner.clear();
    }

    /// Plain `name -> value` snapshot, sorted by name.
    pub fn snapshot(&self) -> Vec<(String, Value)> {
        let mut out: Vec<(String, Value)> = self
            .inner
            .iter()
            .map(|(name, entry)| (name.clone(), entry.value.clone()))
            .collect();
        out.sort_by(|a, b| a.0.cmp(&b.0));
        out
    }
}
