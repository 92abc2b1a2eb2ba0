pub mod distribute;
pub mod geometry;
pub mod host;
pub mod reconcile;
pub mod tree;

pub use distribute::{distribute, distribute_with, DistributionFn, DistributionPolicy};
pub use geometry::{infer, infer_layout, match_shape, Extent, InferredLayout, WindowId, WindowRect};
pub use host::{BufferHandle, HostAdapter, HostOp, MemoryHost};
pub use reconcile::{reconcile, ReconcileMode, ReconcileReport};
pub use tree::{
    Axis, BufferRef, LayoutNode, LeafNode, Orientation, SplitNode, ViewState, SIZE_TOLERANCE,
};
