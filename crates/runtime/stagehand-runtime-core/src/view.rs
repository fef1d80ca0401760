//! Render-view contract. The runtime only ever calls into a view; it never
//! reads state back.

use stagehand_api_core::{AssetHandle, IdAllocator, ViewBatch, ViewHandle, ViewOp};

pub trait ActorView {
    /// Create a view for `actor` showing `asset`.
    fn create(&mut self, actor: &str, asset: AssetHandle) -> ViewHandle;
    fn set_position(&mut self, view: ViewHandle, x: f64, y: f64);
    fn set_visible(&mut self, view: ViewHandle, visible: bool);
    /// Combined transform: scale factor, then rotation in degrees.
    fn set_transform(&mut self, view: ViewHandle, scale: f64, rotation: f64);
    fn show_bubble(&mut self, view: ViewHandle, text: &str);
    fn remove_bubble(&mut self, view: ViewHandle);
    /// Drop every actor view.
    fn clear_all(&mut self);
}

/// Headless view that records each call as a [`ViewOp`].
#[derive(Debug, Default)]
pub struct RecordingView {
    ids: IdAllocator,
    ops: ViewBatch,
}

impl RecordingView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ops(&self) -> &ViewBatch {
        &self.ops
    }

    /// Hand over the recorded operations, leaving the log empty.
    pub fn take_ops(&mut self) -> ViewBatch {
        std::mem::take(&mut self.ops)
    }
}

impl ActorView for RecordingView {
    fn create(&mut self, actor: &str, asset: AssetHandle) -> ViewHandle {
        let view = self.ids.alloc_view();
        self.ops.push(ViewOp::Create {
            view,
            actor: actor.to_string(),
            asset,
        });
        view
    }

    fn set_position(&mut self, view: ViewHandle, x: f64, y: f64) {
        self.ops.push(ViewOp::SetPosition { view, x, y });
    }

    fn set_visible(&mut self, view: ViewHandle, visible: bool) {
        self.ops.push(ViewOp::SetVisible { view, visible });
    }

    fn set_transform(&mut self, view: ViewHandle, scale: f64, rotation: f64) {
        self.ops.push(ViewOp::SetTransform {
            view,
            scale,
            rotation,
        });
    }

    fn show_bubble(&mut self, view: ViewHandle, text: &str) {
        self.ops.push(ViewOp::ShowBubble {
            view,
            text: text.to_string(),
        });
    }

    fn remove_bubble(&mut self, view: ViewHandle) {
        self.ops.push(ViewOp::RemoveBubble { view });
    }

    fn clear_all(&mut self) {
        self.ids.reset_views();
        self.ops.push(ViewOp::ClearAll);
    }
}
