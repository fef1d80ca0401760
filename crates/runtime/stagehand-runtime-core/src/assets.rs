//! Asset registry contract and an in-memory library.

use hashbrown::HashMap;

use stagehand_api_core::{AssetHandle, IdAllocator};

/// Looks up previously registered assets by name.
pub trait AssetRegistry {
    fn lookup(&self, name: &str) -> Option<AssetHandle>;
}

#[derive(Debug, Clone)]
struct AssetRecord {
    handle: AssetHandle,
    source: String,
}

/// Name -> asset table. The source string (a data URL, a path...) is kept for
/// renderers and never interpreted here.
#[derive(Debug, Default)]
pub struct AssetLibrary {
    ids: IdAllocator,
    items: HashMap<String, AssetRecord>,
}

impl AssetLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register or replace an asset. Re-registering a name keeps its handle.
    pub fn register(&mut self, name: &str, source: impl Into<String>) -> AssetHandle {
        let source = source.into();
        if let Some(record) = self.items.get_mut(name) {
            record.source = source;
            return record.handle;
        }
        let handle = self.ids.alloc_asset();
        self.items
            .insert(name.to_string(), AssetRecord { handle, source });
        handle
    }

    pub fn source(&self, handle: AssetHandle) -> Option<&str> {
        self.items
            .values()
            .find(|record| record.handle == handle)
            .map(|record| record.source.as_str())
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl AssetRegistry for AssetLibrary {
    fn lookup(&self, name: &str) -> Option<AssetHandle> {
        self.items.get(name).map(|record| record.handle)
    }
}
