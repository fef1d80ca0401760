//! Render-view operations: a serializable record of every call the runtime makes
//! on the render collaborator.
//!
//! ViewOp serializes to JSON as, e.g.:
//!   { "op": "set_position", "view": 0, "x": 10.0, "y": 0.0 }
//!
//! ViewBatch is a simple Vec<ViewOp> with helpers.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::{AssetHandle, ViewHandle};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum ViewOp {
    Create {
        view: ViewHandle,
        actor: String,
        asset: AssetHandle,
    },
    SetPosition {
        view: ViewHandle,
        x: f64,
        y: f64,
    },
    SetVisible {
        view: ViewHandle,
        visible: bool,
    },
    SetTransform {
        view: ViewHandle,
        scale: f64,
        rotation: f64,
    },
    ShowBubble {
        view: ViewHandle,
        text: String,
    },
    RemoveBubble {
        view: ViewHandle,
    },
    ClearAll,
}

impl ViewOp {
    /// The view this operation targets, if any.
    pub fn view(&self) -> Option<ViewHandle> {
        match self {
            ViewOp::Create { view, .. }
            | ViewOp::SetPosition { view, .. }
            | ViewOp::SetVisible { view, .. }
            | ViewOp::SetTransform { view, .. }
            | ViewOp::ShowBubble { view, .. }
            | ViewOp::RemoveBubble { view } => Some(*view),
            ViewOp::ClearAll => None,
        }
    }
}

/// A batch of view operations in emission order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ViewBatch(pub Vec<ViewOp>);

impl ViewBatch {
    pub fn new() -> Self {
        ViewBatch(Vec::new())
    }

    pub fn push(&mut self, op: ViewOp) {
        self.0.push(op);
    }

    pub fn iter(&self) -> impl Iterator<Item = &ViewOp> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Operations targeting one view, in order.
    pub fn for_view(&self, view: ViewHandle) -> impl Iterator<Item = &ViewOp> {
        self.0.iter().filter(move |op| op.view() == Some(view))
    }
}

impl fmt::Display for ViewOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ViewOp::Create { view, actor, asset } => {
                write!(f, "create #{} actor={actor} asset=#{}", view.0, asset.0)
            }
            ViewOp::SetPosition { view, x, y } => write!(f, "position #{} ({x}, {y})", view.0),
            ViewOp::SetVisible { view, visible } => write!(f, "visible #{} {visible}", view.0),
            ViewOp::SetTransform {
                view,
                scale,
                rotation,
            } => write!(f, "transform #{} scale({scale}) rotate({rotation}deg)", view.0),
            ViewOp::ShowBubble { view, text } => write!(f, "bubble #{} {text:?}", view.0),
            ViewOp::RemoveBubble { view } => write!(f, "bubble-remove #{}", view.0),
            ViewOp::ClearAll => write!(f, "clear-all"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn viewop_json_shape() {
        let op = ViewOp::SetPosition {
            view: ViewHandle(2),
            x: 10.0,
            y: 0.0,
        };
        let json = serde_json::to_value(&op).unwrap();
        assert_eq!(json["op"], "set_position");
        assert_eq!(json["view"], 2);
        let parsed: ViewOp = serde_json::from_value(json).unwrap();
        assert_eq!(parsed, op);
    }

    #[test]
    fn batch_filters_by_view() {
        let mut b = ViewBatch::new();
        b.push(ViewOp::ClearAll);
        b.push(ViewOp::RemoveBubble { view: ViewHandle(0) });
        b.push(ViewOp::RemoveBubble { view: ViewHandle(1) });
        assert_eq!(b.for_view(ViewHandle(1)).count(), 1);
        assert_eq!(b.len(), 3);
    }
}
