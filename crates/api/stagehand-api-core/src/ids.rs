//! Identifiers and a simple allocator for render views and assets.

use serde::{Deserialize, Serialize};

/// Opaque handle returned by the render collaborator for one actor view.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct ViewHandle(pub u32);

/// Opaque handle of a registered asset (e.g. an uploaded image).
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct AssetHandle(pub u32);

/// Monotonic allocator for view and asset handles.
#[derive(Default, Debug)]
pub struct IdAllocator {
    next_view: u32,
    next_asset: u32,
}

impl IdAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn alloc_view(&mut self) -> ViewHandle {
        let id = ViewHandle(self.next_view);
        self.next_view = self.next_view.wrapping_add(1);
        id
    }

    #[inline]
    pub fn alloc_asset(&mut self) -> AssetHandle {
        let id = AssetHandle(self.next_asset);
        self.next_asset = self.next_asset.wrapping_add(1);
        id
    }

    /// Views are recreated on every run; assets outlive runs.
    #[inline]
    pub fn reset_views(&mut self) {
        self.next_view = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alloc_monotonic() {
        let mut alloc = IdAllocator::new();
        assert_eq!(alloc.alloc_view(), ViewHandle(0));
        assert_eq!(alloc.alloc_view(), ViewHandle(1));
        assert_eq!(alloc.alloc_asset(), AssetHandle(0));
        alloc.reset_views();
        assert_eq!(alloc.alloc_view(), ViewHandle(0));
        assert_eq!(alloc.alloc_asset(), AssetHandle(1));
    }
}
