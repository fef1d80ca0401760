//! stagehand-api-core: dynamic values and render-view operations shared by the
//! script decoder and the runtime (engine-agnostic).

pub mod coercion;
pub mod compare;
pub mod ids;
pub mod value;
pub mod view_ops;

pub use ids::{AssetHandle, IdAllocator, ViewHandle};
pub use value::{Value, ValueKind};
pub use view_ops::{ViewBatch, ViewOp};
