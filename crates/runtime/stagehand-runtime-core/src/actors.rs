//! Actor state store and lifecycle.

use indexmap::IndexMap;
use serde::Serialize;

use stagehand_api_core::ViewHandle;

use crate::assets::AssetRegistry;
use crate::error::MissingAssetError;
use crate::view::ActorView;

/// Per-actor transient state plus the handle of its render view.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Actor {
    pub name: String,
    pub x: f64,
    pub y: f64,
    /// Absolute factor; each `looks-scale` replaces it.
    pub scale: f64,
    /// Degrees, accumulated and never normalized.
    pub rotation: f64,
    pub visible: bool,
    pub view: ViewHandle,
    /// Serial of the speech bubble currently shown, if any.
    #[serde(skip)]
    pub(crate) bubble: Option<u64>,
}

impl Actor {
    fn new(name: &str, view: ViewHandle) -> Self {
        Self {
            name: name.to_string(),
            x: 0.0,
            y: 0.0,
            scale: 1.0,
            rotation: 0.0,
            visible: true,
            view,
            bubble: None,
        }
    }

    pub fn has_bubble(&self) -> bool {
        self.bubble.is_some()
    }
}

/// Actors keyed by name, in creation order.
#[derive(Debug, Default)]
pub struct ActorStore {
    actors: IndexMap<String, Actor>,
}

impl ActorStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&Actor> {
        self.actors.get(name)
    }

    pub(crate) fn get_mut(&mut self, name: &str) -> Option<&mut Actor> {
        self.actors.get_mut(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Actor> {
        self.actors.values()
    }

    pub fn names(&self) -> Vec<String> {
        self.actors.keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.actors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actors.is_empty()
    }

    pub(crate) fn clear(&mut self) {
        self.actors.clear();
    }

    /// Resolve `asset` and register a fresh actor at the origin. A missing asset
    /// leaves the store untouched.
    pub(crate) fn create<V: ActorView>(
        &mut self,
        name: &str,
        asset: &str,
        assets: &dyn AssetRegistry,
        view: &mut V,
    ) -> Result<ViewHandle, MissingAssetError> {
        let handle = assets.lookup(asset).ok_or_else(|| MissingAssetError {
            actor: name.to_string(),
            asset: asset.to_string(),
        })?;
        let view_handle = view.create(name, handle);
        view.set_position(view_handle, 0.0, 0.0);
        self.actors
            .insert(name.to_string(), Actor::new(name, view_handle));
        Ok(view_handle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::AssetLibrary;
    use crate::view::RecordingView;
    use stagehand_api_core::ViewOp;

    #[test]
    fn create_places_actor_at_origin() {
        let mut assets = AssetLibrary::new();
        assets.register("cat_img", "cat.png");
        let mut view = RecordingView::new();
        let mut store = ActorStore::new();

        store
            .create("cat", "cat_img", &assets, &mut view)
            .expect("asset registered");
        let actor = store.get("cat").expect("actor stored");
        assert_eq!((actor.x, actor.y, actor.scale, actor.rotation), (0.0, 0.0, 1.0, 0.0));
        assert!(actor.visible);
        assert!(matches!(view.ops().0[1], ViewOp::SetPosition { x, y, .. } if x == 0.0 && y == 0.0));
    }

    #[test]
    fn missing_asset_creates_nothing() {
        let assets = AssetLibrary::new();
        let mut view = RecordingView::new();
        let mut store = ActorStore::new();
        let err = store
            .create("cat", "ghost", &assets, &mut view)
            .expect_err("asset is not registered");
        assert_eq!(err.asset, "ghost");
        assert!(store.is_empty());
        assert!(view.ops().is_empty());
    }
}
